//! Runtime dispatch
//!
//! Runs the subordinate scripts of a trigger with the calling convention
//! git used for the entry point: the same arguments, the same stdin bytes
//! for every script of a stdin-fed trigger, the repository root as working
//! directory. Scripts run one at a time, in resolution order.
//!
//! Gate triggers stop at the first failing script and return its status;
//! advisory triggers run everything and always succeed.

use super::resolver::{HookResolver, HookScript};
use githooks_core::{Result, Trigger};
use std::ffi::OsString;
use std::path::PathBuf;

/// Environment variable naming the trigger being dispatched
pub const TRIGGER_ENV: &str = "GIT_HOOKS_TRIGGER";

/// Exit status used when a script could not be started
pub const SPAWN_FAILURE_STATUS: i32 = 126;

/// Executes a single subordinate script
pub trait ScriptRunner {
    /// Run `script` and return its exit status
    ///
    /// `stdin` is `Some` for triggers git feeds on stdin, in which case the
    /// script receives exactly those bytes.
    fn run(
        &self,
        trigger: &Trigger,
        script: &HookScript,
        args: &[OsString],
        stdin: Option<&[u8]>,
    ) -> Result<i32>;
}

/// Runner spawning scripts as child processes
#[derive(Debug, Clone)]
pub struct ProcessRunner {
    working_dir: PathBuf,
}

impl ProcessRunner {
    /// Create a runner executing scripts from `working_dir`
    pub fn new(working_dir: impl Into<PathBuf>) -> Self {
        Self {
            working_dir: working_dir.into(),
        }
    }
}

impl ScriptRunner for ProcessRunner {
    fn run(
        &self,
        trigger: &Trigger,
        script: &HookScript,
        args: &[OsString],
        stdin: Option<&[u8]>,
    ) -> Result<i32> {
        let mut expr = duct::cmd(script.path.as_path(), args)
            .dir(&self.working_dir)
            .env(TRIGGER_ENV, trigger.name())
            .unchecked();
        if let Some(bytes) = stdin {
            expr = expr.stdin_bytes(bytes.to_vec());
        }

        let output = expr.run()?;
        // Killed by a signal: no exit code
        Ok(output.status.code().unwrap_or(1))
    }
}

/// Result of dispatching one trigger
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchOutcome {
    /// Exit status to hand back to git
    pub status: i32,
    /// Number of scripts that ran
    pub executed: usize,
    /// Number of scripts that exited non-zero
    pub failed: usize,
    /// Whether a gate trigger stopped early
    pub aborted: bool,
}

/// Fold script exit statuses into the trigger's exit status
///
/// Statuses are pulled lazily: for a gate trigger nothing after the first
/// non-zero status is consumed, so scripts behind it never run.
pub fn aggregate<I>(trigger: &Trigger, statuses: I) -> DispatchOutcome
where
    I: IntoIterator<Item = i32>,
{
    let mut executed = 0;
    let mut failed = 0;
    let abort_status = statuses
        .into_iter()
        .inspect(|_| executed += 1)
        .filter(|&status| status != 0)
        .inspect(|_| failed += 1)
        .find(|_| trigger.aborts_on_failure());

    DispatchOutcome {
        status: abort_status.unwrap_or(0),
        executed,
        failed,
        aborted: abort_status.is_some(),
    }
}

/// Dispatches triggers to their subordinate scripts
pub struct Dispatcher<'a, R = ProcessRunner>
where
    R: ScriptRunner,
{
    resolver: &'a HookResolver,
    runner: R,
}

impl<'a, R> Dispatcher<'a, R>
where
    R: ScriptRunner,
{
    /// Create a dispatcher
    pub fn new(resolver: &'a HookResolver, runner: R) -> Self {
        Self { resolver, runner }
    }

    /// Run every script resolved for `trigger`
    ///
    /// `stdin` holds the bytes git wrote to the entry point; it is ignored
    /// for triggers that are not stdin-fed.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArguments` when the argument count does not match the
    /// trigger, or an error if hook directories cannot be read. Script
    /// failures are reported through [`DispatchOutcome::status`].
    #[tracing::instrument(skip(self, args, stdin), fields(trigger = trigger.name()))]
    pub fn dispatch(
        &self,
        trigger: &Trigger,
        args: &[OsString],
        stdin: Option<&[u8]>,
    ) -> Result<DispatchOutcome> {
        trigger.check_args(args.len())?;

        let scripts = self.resolver.scripts(trigger)?;
        if scripts.is_empty() {
            tracing::debug!("No hook scripts to run");
            return Ok(DispatchOutcome::default());
        }

        let stdin = trigger.pipes_stdin().then(|| stdin.unwrap_or_default());
        let outcome = aggregate(
            trigger,
            scripts
                .iter()
                .map(|script| self.run_script(trigger, script, args, stdin)),
        );

        if outcome.aborted {
            tracing::warn!(
                status = outcome.status,
                "{} aborted after {} of {} scripts",
                trigger.name(),
                outcome.executed,
                scripts.len()
            );
        } else if outcome.failed > 0 {
            tracing::warn!("{} of {} scripts failed", outcome.failed, outcome.executed);
        }

        Ok(outcome)
    }

    fn run_script(
        &self,
        trigger: &Trigger,
        script: &HookScript,
        args: &[OsString],
        stdin: Option<&[u8]>,
    ) -> i32 {
        tracing::debug!(scope = %script.scope, "Running {}", script.path.display());

        match self.runner.run(trigger, script, args, stdin) {
            Ok(0) => 0,
            Ok(status) => {
                tracing::warn!(
                    "{} ({}) exited with status {status}",
                    script.name,
                    script.scope
                );
                status
            }
            Err(e) => {
                tracing::warn!("Failed to execute {}: {e}", script.path.display());
                SPAWN_FAILURE_STATUS
            }
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use githooks_core::Error;
    use std::cell::RefCell;
    use std::collections::HashMap;
    use std::fs;
    use tempfile::TempDir;

    /// Runner returning canned statuses and recording what it was given
    #[derive(Default)]
    struct RecordingRunner {
        statuses: HashMap<String, i32>,
        calls: RefCell<Vec<(String, Vec<OsString>, Option<Vec<u8>>)>>,
    }

    impl RecordingRunner {
        fn with_status(mut self, name: &str, status: i32) -> Self {
            self.statuses.insert(name.to_string(), status);
            self
        }

        fn ran(&self) -> Vec<String> {
            self.calls.borrow().iter().map(|c| c.0.clone()).collect()
        }
    }

    impl ScriptRunner for RecordingRunner {
        fn run(
            &self,
            _trigger: &Trigger,
            script: &HookScript,
            args: &[OsString],
            stdin: Option<&[u8]>,
        ) -> Result<i32> {
            self.calls.borrow_mut().push((
                script.name.clone(),
                args.to_vec(),
                stdin.map(<[u8]>::to_vec),
            ));
            if script.name.starts_with("broken") {
                return Err(Error::Message("exec format error".to_string()));
            }
            Ok(self.statuses.get(&script.name).copied().unwrap_or(0))
        }
    }

    fn project_with(names: &[&str], trigger: &str) -> (TempDir, HookResolver) {
        let temp = TempDir::new().unwrap();
        let dir = temp.path().join("repo/.githooks").join(trigger);
        fs::create_dir_all(&dir).unwrap();
        for name in names {
            let path = dir.join(name);
            fs::write(&path, "#!/bin/sh\n").unwrap();
            #[cfg(unix)]
            {
                use std::os::unix::fs::PermissionsExt;
                fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
            }
        }
        let resolver = HookResolver::new(temp.path().join("repo"), temp.path().join("home"));
        (temp, resolver)
    }

    #[test]
    fn test_aggregate_gate_stops_at_first_failure() {
        let trigger = Trigger::lookup("pre-commit").unwrap();
        let mut pulled = 0;
        let outcome = aggregate(
            trigger,
            [0, 3, 5].into_iter().inspect(|_| pulled += 1),
        );

        assert_eq!(pulled, 2);
        assert_eq!(
            outcome,
            DispatchOutcome {
                status: 3,
                executed: 2,
                failed: 1,
                aborted: true
            }
        );
    }

    #[test]
    fn test_aggregate_advisory_runs_everything() {
        let trigger = Trigger::lookup("post-commit").unwrap();
        let outcome = aggregate(trigger, [1, 0, 7]);

        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.executed, 3);
        assert_eq!(outcome.failed, 2);
        assert!(!outcome.aborted);
    }

    #[test]
    fn test_aggregate_empty() {
        let trigger = Trigger::lookup("pre-push").unwrap();
        assert_eq!(aggregate(trigger, []), DispatchOutcome::default());
    }

    #[test]
    #[cfg(unix)]
    fn test_gate_failure_skips_later_scripts() {
        let (_temp, resolver) = project_with(&["a", "b", "c"], "pre-commit");
        let runner = RecordingRunner::default().with_status("b", 1);
        let dispatcher = Dispatcher::new(&resolver, runner);

        let outcome = dispatcher
            .dispatch(Trigger::lookup("pre-commit").unwrap(), &[], None)
            .unwrap();

        assert_eq!(outcome.status, 1);
        assert_eq!(dispatcher.runner.ran(), vec!["a", "b"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_advisory_failure_runs_every_script() {
        let (_temp, resolver) = project_with(&["a", "b", "c"], "post-commit");
        let runner = RecordingRunner::default().with_status("a", 2);
        let dispatcher = Dispatcher::new(&resolver, runner);

        let outcome = dispatcher
            .dispatch(Trigger::lookup("post-commit").unwrap(), &[], None)
            .unwrap();

        assert_eq!(outcome.status, 0);
        assert_eq!(outcome.failed, 1);
        assert_eq!(dispatcher.runner.ran(), vec!["a", "b", "c"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_stdin_fed_to_every_script() {
        let (_temp, resolver) = project_with(&["one", "two"], "pre-push");
        let dispatcher = Dispatcher::new(&resolver, RecordingRunner::default());
        let args = [OsString::from("origin"), OsString::from("git@host:repo")];
        let input = b"refs/heads/main abc refs/heads/main def\n";

        dispatcher
            .dispatch(Trigger::lookup("pre-push").unwrap(), &args, Some(input))
            .unwrap();

        let calls = dispatcher.runner.calls.borrow();
        assert_eq!(calls.len(), 2);
        for (_, got_args, got_stdin) in calls.iter() {
            assert_eq!(got_args.as_slice(), &args);
            assert_eq!(got_stdin.as_deref(), Some(&input[..]));
        }
    }

    #[test]
    #[cfg(unix)]
    fn test_stdin_not_fed_to_argument_triggers() {
        let (_temp, resolver) = project_with(&["one"], "commit-msg");
        let dispatcher = Dispatcher::new(&resolver, RecordingRunner::default());

        dispatcher
            .dispatch(
                Trigger::lookup("commit-msg").unwrap(),
                &[OsString::from(".git/COMMIT_EDITMSG")],
                Some(b"ignored"),
            )
            .unwrap();

        assert_eq!(dispatcher.runner.calls.borrow()[0].2, None);
    }

    #[test]
    fn test_arity_mismatch_runs_nothing() {
        let (_temp, resolver) = project_with(&["one"], "pre-push");
        let dispatcher = Dispatcher::new(&resolver, RecordingRunner::default());

        let err = dispatcher
            .dispatch(
                Trigger::lookup("pre-push").unwrap(),
                &[OsString::from("origin")],
                None,
            )
            .unwrap_err();

        assert!(matches!(err, Error::InvalidArguments { got: 1, .. }));
        assert!(dispatcher.runner.ran().is_empty());
    }

    #[test]
    #[cfg(unix)]
    fn test_spawn_failure_counts_as_failure() {
        let (_temp, resolver) = project_with(&["broken", "next"], "pre-commit");
        let dispatcher = Dispatcher::new(&resolver, RecordingRunner::default());

        let outcome = dispatcher
            .dispatch(Trigger::lookup("pre-commit").unwrap(), &[], None)
            .unwrap();

        assert_eq!(outcome.status, SPAWN_FAILURE_STATUS);
        assert_eq!(dispatcher.runner.ran(), vec!["broken"]);
    }

    #[test]
    #[cfg(unix)]
    fn test_process_runner_passes_args_stdin_and_env() {
        let temp = TempDir::new().unwrap();
        let out = temp.path().join("out");
        let script_path = temp.path().join("record");
        fs::write(
            &script_path,
            format!(
                "#!/bin/sh\necho \"$GIT_HOOKS_TRIGGER $1 $2\" > '{}'\ncat >> '{}'\nexit 4\n",
                out.display(),
                out.display()
            ),
        )
        .unwrap();
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(&script_path, fs::Permissions::from_mode(0o755)).unwrap();
        }

        let script = HookScript {
            name: "record".to_string(),
            path: script_path,
            scope: crate::hooks::HookScope::Project,
        };
        let runner = ProcessRunner::new(temp.path());
        let status = runner
            .run(
                Trigger::lookup("pre-push").unwrap(),
                &script,
                &[OsString::from("origin"), OsString::from("url")],
                Some(b"line\n"),
            )
            .unwrap();

        assert_eq!(status, 4);
        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "pre-push origin url\nline\n"
        );
    }
}

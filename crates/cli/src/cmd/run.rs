//! Run command implementation
//!
//! Invoked by the installed entry points as `git hooks run <trigger> "$@"`.
//! Resolves the trigger's scripts and runs them with git's arguments and
//! stdin; the aggregate status becomes the exit status git sees.

use anyhow::Context;
use clap::Args;
use githooks_core::Trigger;
use githooks_engine::{Dispatcher, ProcessRunner};
use std::ffi::OsString;
use std::io::Read;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Run command
#[derive(Debug, Args)]
pub struct RunCommand {
    /// Trigger that fired (e.g. pre-commit)
    pub trigger: String,

    /// Arguments git passed to the hook
    #[arg(trailing_var_arg = true, allow_hyphen_values = true)]
    pub args: Vec<OsString>,
}

impl Command for RunCommand {
    type Output = i32;

    fn execute(&self, context: &RuntimeContext) -> Result<i32> {
        let trigger = Trigger::lookup(&self.trigger)?;
        trigger.check_args(self.args.len())?;

        let repo = context.repository()?;
        let resolver = context.resolver(&repo)?;

        let stdin = if trigger.pipes_stdin() {
            let mut buffer = Vec::new();
            std::io::stdin()
                .read_to_end(&mut buffer)
                .context("Failed to read hook input from stdin")?;
            Some(buffer)
        } else {
            None
        };

        let dispatcher = Dispatcher::new(&resolver, ProcessRunner::new(&repo.root));
        let outcome = dispatcher.dispatch(trigger, &self.args, stdin.as_deref())?;
        tracing::debug!(
            status = outcome.status,
            executed = outcome.executed,
            "Dispatch finished"
        );

        Ok(outcome.status)
    }
}

//! Git access layer
//!
//! git-hooks never reimplements git: repository detection, configuration
//! and identity queries all go through the `git` executable, and its exit
//! status and output are the only source of truth. The [`GitProvider`]
//! trait keeps that interface narrow; [`GitCli`] implements it by spawning
//! `git` with `duct`.
//!
//! Nothing here caches state between calls. Every operation re-reads what
//! git reports at that moment.

use githooks_core::{Error, Result};
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use std::process::Output;

/// Git config key holding the global template directory
pub const TEMPLATE_DIR_KEY: &str = "init.templateDir";

/// Git config key overriding the hooks home
pub const HOOKS_HOME_KEY: &str = "hooks.home";

/// Multi-valued git config key listing contributed hook directories
pub const CONTRIB_KEY: &str = "hooks.contrib";

/// A repository as reported by `git rev-parse`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    /// Working tree root, or the git directory for bare repositories
    pub root: PathBuf,
    /// Absolute git directory
    pub git_dir: PathBuf,
    /// Directory git runs hooks from (honours `core.hooksPath`)
    pub hooks_dir: PathBuf,
    /// Whether the repository is bare
    pub bare: bool,
}

/// Git operations needed by git-hooks
pub trait GitProvider {
    /// Find the repository containing `dir`
    ///
    /// Returns `Ok(None)` when `dir` is not inside a repository.
    fn discover(&self, dir: &Path) -> Result<Option<Repository>>;

    /// Read every value of a config key as git merges them for `dir`
    ///
    /// With `dir = None` only the global configuration is consulted.
    fn config_get_all(&self, dir: Option<&Path>, key: &str) -> Result<Vec<String>>;

    /// Read a key from the global configuration
    fn global_config_get(&self, key: &str) -> Result<Option<String>>;

    /// Set a key in the global configuration
    fn global_config_set(&self, key: &str, value: &str) -> Result<()>;

    /// Remove a key from the global configuration
    ///
    /// Returns `false` when the key was not set.
    fn global_config_unset(&self, key: &str) -> Result<bool>;

    /// Root commit of the repository at `repo`, `None` before the first commit
    fn root_commit(&self, repo: &Path) -> Result<Option<String>>;

    /// Author identity git would record for a commit in `repo`
    fn author_ident(&self, repo: &Path) -> Result<String>;

    /// Create a new repository at `dir`
    fn init(&self, dir: &Path) -> Result<()>;
}

/// Git provider spawning the `git` executable
#[derive(Debug, Clone)]
pub struct GitCli {
    program: PathBuf,
    env: Vec<(String, OsString)>,
}

impl GitCli {
    /// Locate `git` on `PATH`
    ///
    /// # Errors
    ///
    /// Returns `ExternalToolFailure` when no `git` executable can be found.
    pub fn new() -> Result<Self> {
        let program = which::which("git")
            .map_err(|e| Error::external("git", format!("git executable not found: {e}")))?;
        Ok(Self::with_program(program))
    }

    /// Use a specific git executable
    #[must_use]
    pub fn with_program(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            env: Vec::new(),
        }
    }

    /// Set an environment variable on every git invocation
    ///
    /// Used to isolate git from the user's configuration
    /// (`GIT_CONFIG_GLOBAL`, `GIT_CONFIG_NOSYSTEM`, ...).
    #[must_use]
    pub fn with_env(mut self, key: impl Into<String>, value: impl Into<OsString>) -> Self {
        self.env.push((key.into(), value.into()));
        self
    }

    fn describe(args: &[&str]) -> String {
        format!("git {}", args.join(" "))
    }

    fn output(&self, dir: Option<&Path>, args: &[&str]) -> Result<Output> {
        tracing::debug!(?args, dir = ?dir, "Running git");

        let mut expr = duct::cmd(self.program.as_path(), args)
            .stdout_capture()
            .stderr_capture()
            .unchecked();
        if let Some(dir) = dir {
            expr = expr.dir(dir);
        }
        for (key, value) in &self.env {
            expr = expr.env(key, value);
        }
        // stderr is matched against git's English messages
        expr = expr.env("LC_ALL", "C").env_remove("LANGUAGE");

        expr.run()
            .map_err(|e| Error::external(Self::describe(args), e.to_string()))
    }

    fn failure(args: &[&str], output: &Output) -> Error {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let message = stderr
            .lines()
            .find(|line| !line.trim().is_empty())
            .map_or_else(|| format!("exited with {}", output.status), str::to_string);
        Error::external(Self::describe(args), message)
    }

    fn stdout(output: &Output) -> String {
        String::from_utf8_lossy(&output.stdout).trim_end().to_string()
    }

    /// Run an arbitrary git command and return its trimmed stdout
    ///
    /// # Errors
    ///
    /// Returns `ExternalToolFailure` when git cannot be spawned or exits non-zero.
    pub fn read(&self, dir: Option<&Path>, args: &[&str]) -> Result<String> {
        let output = self.output(dir, args)?;
        if !output.status.success() {
            return Err(Self::failure(args, &output));
        }
        Ok(Self::stdout(&output))
    }

    fn absolute(dir: &Path, path: &str) -> PathBuf {
        let path = PathBuf::from(path);
        if path.is_absolute() {
            path
        } else {
            dir.join(path)
        }
    }
}

impl GitProvider for GitCli {
    fn discover(&self, dir: &Path) -> Result<Option<Repository>> {
        let args = [
            "rev-parse",
            "--is-bare-repository",
            "--absolute-git-dir",
            "--git-path",
            "hooks",
        ];
        let output = self.output(Some(dir), &args)?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            if stderr.contains("not a git repository") {
                tracing::debug!(dir = %dir.display(), "Not inside a git repository");
                return Ok(None);
            }
            return Err(Self::failure(&args, &output));
        }

        let stdout = Self::stdout(&output);
        let mut lines = stdout.lines();
        let (Some(bare), Some(git_dir), Some(hooks)) = (lines.next(), lines.next(), lines.next())
        else {
            return Err(Error::external(
                Self::describe(&args),
                format!("unexpected output: {stdout}"),
            ));
        };

        let bare = bare.trim() == "true";
        let git_dir = PathBuf::from(git_dir.trim());
        let hooks_dir = Self::absolute(dir, hooks.trim());

        let root = if bare {
            git_dir.clone()
        } else {
            PathBuf::from(self.read(Some(dir), &["rev-parse", "--show-toplevel"])?)
        };

        Ok(Some(Repository {
            root,
            git_dir,
            hooks_dir,
            bare,
        }))
    }

    fn config_get_all(&self, dir: Option<&Path>, key: &str) -> Result<Vec<String>> {
        let args: Vec<&str> = match dir {
            Some(_) => vec!["config", "--get-all", key],
            None => vec!["config", "--global", "--get-all", key],
        };
        let output = self.output(dir, &args)?;
        match output.status.code() {
            Some(0) => Ok(Self::stdout(&output)
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect()),
            // Exit 1: the key is not set
            Some(1) => Ok(Vec::new()),
            _ => Err(Self::failure(&args, &output)),
        }
    }

    fn global_config_get(&self, key: &str) -> Result<Option<String>> {
        let args = ["config", "--global", "--get", key];
        let output = self.output(None, &args)?;
        match output.status.code() {
            Some(0) => Ok(Some(Self::stdout(&output)).filter(|value| !value.is_empty())),
            Some(1) => Ok(None),
            _ => Err(Self::failure(&args, &output)),
        }
    }

    fn global_config_set(&self, key: &str, value: &str) -> Result<()> {
        self.read(None, &["config", "--global", key, value])
            .map(|_| ())
    }

    fn global_config_unset(&self, key: &str) -> Result<bool> {
        let args = ["config", "--global", "--unset-all", key];
        let output = self.output(None, &args)?;
        match output.status.code() {
            Some(0) => Ok(true),
            // Exit 5: the key is not set
            Some(5) => Ok(false),
            _ => Err(Self::failure(&args, &output)),
        }
    }

    fn root_commit(&self, repo: &Path) -> Result<Option<String>> {
        let head = self.output(Some(repo), &["rev-parse", "--verify", "--quiet", "HEAD"])?;
        if !head.status.success() {
            return Ok(None);
        }

        // Several roots are possible after merging unrelated histories; the
        // last one listed is the oldest.
        let roots = self.read(Some(repo), &["rev-list", "--max-parents=0", "HEAD"])?;
        Ok(roots.lines().last().map(str::to_string))
    }

    fn author_ident(&self, repo: &Path) -> Result<String> {
        self.read(Some(repo), &["var", "GIT_AUTHOR_IDENT"])
    }

    fn init(&self, dir: &Path) -> Result<()> {
        let dir = dir.to_string_lossy();
        self.read(None, &["init", "--quiet", dir.as_ref()]).map(|_| ())
    }
}

//! CLI command implementations
//!
//! This module contains all command implementations for the git-hooks CLI.

pub mod global;
pub mod identity;
pub mod install;
pub mod list;
pub mod run;
pub mod update;

#[cfg(test)]
pub(crate) mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use crate::common::RuntimeContext;
    use githooks_config::{GitCli, GitProvider, Overrides};
    use std::fs;
    use std::path::{Path, PathBuf};
    use tempfile::TempDir;

    /// Git that ignores the user's and system configuration
    pub(crate) fn isolated_git(temp: &TempDir) -> GitCli {
        let global = temp.path().join("gitconfig");
        if !global.exists() {
            fs::write(&global, "").unwrap();
        }

        GitCli::new()
            .unwrap()
            .with_env("GIT_CONFIG_GLOBAL", global)
            .with_env("GIT_CONFIG_NOSYSTEM", "1")
            .with_env("GIT_CEILING_DIRECTORIES", temp.path())
            .with_env("GIT_AUTHOR_NAME", "Hook Tester")
            .with_env("GIT_AUTHOR_EMAIL", "hooks@example.com")
            .with_env("GIT_COMMITTER_NAME", "Hook Tester")
            .with_env("GIT_COMMITTER_EMAIL", "hooks@example.com")
    }

    /// Context rooted at `dir` with the hooks home and template inside `temp`
    pub(crate) fn isolated_context(temp: &TempDir, dir: &Path) -> RuntimeContext {
        let overrides = Overrides {
            hooks_home: Some(temp.path().join("home")),
            template_dir: Some(temp.path().join("template")),
        };
        RuntimeContext::new(isolated_git(temp), dir, overrides)
    }

    /// Fresh repository at `<temp>/repo`
    pub(crate) fn init_repo(temp: &TempDir) -> PathBuf {
        let root = temp.path().join("repo");
        fs::create_dir_all(&root).unwrap();
        isolated_git(temp).init(&root).unwrap();
        root.canonicalize().unwrap()
    }
}

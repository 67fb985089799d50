//! Identity command implementation
//!
//! Print the repository identity: the root commit id that names the
//! repository's user hook directory under the hooks home.

use clap::Args;
use githooks_config::GitProvider;
use githooks_core::Error;
use owo_colors::OwoColorize;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;

/// Identity command
#[derive(Debug, Args)]
pub struct IdentityCommand;

impl Command for IdentityCommand {
    type Output = String;

    fn execute(&self, context: &RuntimeContext) -> Result<String> {
        let repo = context.repository()?;

        let author = context.git.author_ident(&repo.root)?;
        tracing::debug!(%author, "Author identity");

        let identity = context.git.root_commit(&repo.root)?.ok_or_else(|| {
            Error::Message(format!(
                "{} has no commits yet, so it has no identity",
                repo.root.display()
            ))
        })?;

        println!("{}", identity.cyan());
        Ok(identity)
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::cmd::tests::{init_repo, isolated_context};
    use crate::error::CommandError;
    use githooks_config::{GitCli, Overrides};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_identity_without_commits() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let context = isolated_context(&temp, &root);

        let err = IdentityCommand.execute(&context).unwrap_err();
        assert!(matches!(err, CommandError::Hooks(Error::Message(_))));
    }

    #[test]
    fn test_identity_is_root_commit() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let context = isolated_context(&temp, &root);
        let git = &context.git;
        git.read(
            Some(&root),
            &["commit", "--allow-empty", "--no-verify", "-m", "first"],
        )
        .unwrap();
        let first = git.read(Some(&root), &["rev-parse", "HEAD"]).unwrap();
        git.read(
            Some(&root),
            &["commit", "--allow-empty", "--no-verify", "-m", "second"],
        )
        .unwrap();

        let identity = IdentityCommand.execute(&context).unwrap();
        assert_eq!(identity, first);
    }

    #[test]
    fn test_identity_outside_repository() {
        let temp = TempDir::new().unwrap();
        let context = isolated_context(&temp, temp.path());

        let err = IdentityCommand.execute(&context).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Hooks(Error::NotARepository { .. })
        ));
    }

    #[test]
    fn test_identity_without_author() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let global = temp.path().join("gitconfig");
        fs::write(&global, "[user]\n\tuseConfigOnly = true\n").unwrap();
        let git = GitCli::new()
            .unwrap()
            .with_env("GIT_CONFIG_GLOBAL", global)
            .with_env("GIT_CONFIG_NOSYSTEM", "1")
            .with_env("GIT_CEILING_DIRECTORIES", temp.path())
            .with_env("GIT_AUTHOR_NAME", "")
            .with_env("GIT_AUTHOR_EMAIL", "")
            .with_env("EMAIL", "");
        let overrides = Overrides {
            hooks_home: Some(temp.path().join("home")),
            template_dir: None,
        };
        let context = RuntimeContext::new(git, &root, overrides);

        let err = IdentityCommand.execute(&context).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Hooks(Error::ExternalToolFailure { .. })
        ));
    }
}

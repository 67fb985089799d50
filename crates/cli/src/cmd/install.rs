//! Install and uninstall command implementations
//!
//! Write the dispatch entry points into the repository's hooks directory,
//! or remove them and put back whatever they replaced.

use clap::Args;
use githooks_engine::install::{
    self, HooksDir, InstallAction, InstallReport, UninstallAction, UninstallReport,
};
use owo_colors::OwoColorize;
use tracing::info;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::{CommandError, Result};
use crate::ui::StatusIcon;

/// Install command
#[derive(Debug, Args)]
pub struct InstallCommand {
    /// Reinstall over existing git-hooks entry points
    #[arg(short, long)]
    pub force: bool,
}

impl Command for InstallCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let repo = context.repository()?;
        let hooks = HooksDir::of(&repo);

        info!(dir = %hooks.path().display(), force = self.force, "Installing hooks");
        let report = install::install(&hooks, self.force)?;
        print_install_report(&report);
        check_install_report(&report)
    }
}

/// Uninstall command
#[derive(Debug, Args)]
pub struct UninstallCommand;

impl Command for UninstallCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let repo = context.repository()?;
        let hooks = HooksDir::of(&repo);

        info!(dir = %hooks.path().display(), "Uninstalling hooks");
        let report = install::uninstall(&hooks)?;
        print_uninstall_report(&report);
        check_uninstall_report(&report)
    }
}

/// Print one line per trigger that needs attention, then a summary
pub(crate) fn print_install_report(report: &InstallReport) {
    for outcome in &report.outcomes {
        let name = outcome.trigger.name();
        match &outcome.result {
            Ok(InstallAction::BackedUp) => println!(
                "  {} {}: existing hook moved to {}",
                StatusIcon::Info,
                name.bold(),
                format!("{name}{}", githooks_engine::hooks::BACKUP_SUFFIX).cyan()
            ),
            Ok(_) => tracing::debug!("{name}: installed"),
            Err(e) => println!("  {} {}: {e}", StatusIcon::Error, name.bold()),
        }
    }

    let installed = report.total() - report.failed();
    let icon = if report.is_success() {
        StatusIcon::Success
    } else {
        StatusIcon::Warning
    };
    println!(
        "{icon} Installed {installed} of {} hooks in {}",
        report.total(),
        report.hooks_dir.display().cyan()
    );
}

pub(crate) fn check_install_report(report: &InstallReport) -> Result<()> {
    if report.is_success() {
        Ok(())
    } else {
        Err(CommandError::InstallFailed {
            failed: report.failed(),
            total: report.total(),
        })
    }
}

pub(crate) fn print_uninstall_report(report: &UninstallReport) {
    for outcome in &report.outcomes {
        let name = outcome.trigger.name();
        match &outcome.result {
            Ok(UninstallAction::Restored) => println!(
                "  {} {}: original hook restored",
                StatusIcon::Info,
                name.bold()
            ),
            Ok(UninstallAction::Removed) => tracing::debug!("{name}: removed"),
            Err(e) => println!("  {} {}: {e}", StatusIcon::Error, name.bold()),
        }
    }

    let icon = if report.is_success() {
        StatusIcon::Success
    } else {
        StatusIcon::Warning
    };
    println!(
        "{icon} Removed {} of {} hooks from {}",
        report.total() - report.failed(),
        report.total(),
        report.hooks_dir.display().cyan()
    );

    let restored = report.count(UninstallAction::Restored);
    if restored > 0 {
        println!(
            "{} Restored {restored} original hook{}",
            StatusIcon::Info,
            if restored == 1 { "" } else { "s" }
        );
    }
}

pub(crate) fn check_uninstall_report(report: &UninstallReport) -> Result<()> {
    if report.is_success() {
        Ok(())
    } else {
        Err(CommandError::UninstallFailed {
            failed: report.failed(),
            total: report.total(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;
    use crate::cmd::tests::{isolated_context, init_repo};
    use githooks_core::{Error, Trigger};
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_install_outside_repository() {
        let temp = TempDir::new().unwrap();
        let context = isolated_context(&temp, temp.path());

        let err = InstallCommand { force: false }.execute(&context).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Hooks(Error::NotARepository { .. })
        ));
    }

    #[test]
    fn test_install_twice_conflicts() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let context = isolated_context(&temp, &root);

        InstallCommand { force: false }.execute(&context).unwrap();
        let err = InstallCommand { force: false }.execute(&context).unwrap_err();
        assert!(matches!(
            err,
            CommandError::Hooks(Error::ExistingHooksConflict { .. })
        ));

        InstallCommand { force: true }.execute(&context).unwrap();
    }

    #[test]
    fn test_install_failure_is_aggregated() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let context = isolated_context(&temp, &root);
        let hooks = root.join(".git/hooks");
        fs::create_dir_all(&hooks).unwrap();
        fs::write(hooks.join("pre-commit"), "#!/bin/sh\n").unwrap();
        fs::write(hooks.join("pre-commit.origin"), "#!/bin/sh\n").unwrap();

        let err = InstallCommand { force: false }.execute(&context).unwrap_err();
        match err {
            CommandError::InstallFailed { failed, total } => {
                assert_eq!(failed, 1);
                assert_eq!(total, Trigger::all().len());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_uninstall_not_installed() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let context = isolated_context(&temp, &root);

        let err = UninstallCommand.execute(&context).unwrap_err();
        assert!(matches!(err, CommandError::Hooks(Error::NotExistHooks)));
    }

    #[test]
    fn test_install_then_uninstall() {
        let temp = TempDir::new().unwrap();
        let root = init_repo(&temp);
        let context = isolated_context(&temp, &root);

        InstallCommand { force: false }.execute(&context).unwrap();
        UninstallCommand.execute(&context).unwrap();

        assert!(!root.join(".git/hooks/pre-commit").exists());
    }
}

//! Global template command implementations
//!
//! `install-global` installs the entry points into a template directory and
//! points `init.templateDir` at it so every repository created or cloned
//! afterwards starts out installed. `uninstall-global` reverses that.

use anyhow::Context;
use clap::Args;
use githooks_engine::template;
use owo_colors::OwoColorize;
use std::path::PathBuf;
use tracing::info;

use super::install::{
    check_install_report, check_uninstall_report, print_install_report, print_uninstall_report,
};
use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;

/// Install-global command
#[derive(Debug, Args)]
pub struct InstallGlobalCommand {
    /// Template directory (default: $XDG_DATA_HOME/git-hooks/template)
    #[arg(long, value_name = "DIR")]
    pub template_dir: Option<PathBuf>,
}

impl Command for InstallGlobalCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let template_dir = match &self.template_dir {
            Some(dir) => dir.clone(),
            None => context.config(None)?.template_dir,
        };

        info!(dir = %template_dir.display(), "Installing global template");
        let report = template::install_global(context.provider(), &template_dir)
            .with_context(|| format!("Failed to install template in {}", template_dir.display()))?;

        print_install_report(&report.install);
        if report.repointed()
            && let Some(previous) = &report.previous
        {
            println!(
                "{} init.templateDir was {}",
                StatusIcon::Warning,
                previous.yellow()
            );
        }
        println!(
            "{} Set init.templateDir to {}",
            StatusIcon::Success,
            report.template_dir.display().cyan()
        );
        println!(
            "{} New repositories will have git hooks installed; run `git hooks install` in existing ones",
            StatusIcon::Info
        );

        check_install_report(&report.install)
    }
}

/// Uninstall-global command
#[derive(Debug, Args)]
pub struct UninstallGlobalCommand;

impl Command for UninstallGlobalCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        info!("Uninstalling global template");
        let report = template::uninstall_global(context.provider())?;

        if let Some(uninstall) = &report.uninstall {
            print_uninstall_report(uninstall);
        }
        println!(
            "{} Removed init.templateDir ({})",
            StatusIcon::Success,
            report.template_dir.display().cyan()
        );
        if report.removed_dir {
            tracing::debug!("Removed empty template directory");
        }

        match &report.uninstall {
            Some(uninstall) => check_uninstall_report(uninstall),
            None => Ok(()),
        }
    }
}

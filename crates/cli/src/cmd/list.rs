//! List command implementation
//!
//! Show whether git-hooks is installed in the current repository, the
//! state of every trigger's entry point, and the scripts each trigger
//! would run.

use anyhow::Context;
use clap::Args;
use githooks_core::Error;
use githooks_engine::install::{self, HookEntry, InstallState, TriggerStatus};
use githooks_engine::{HookResolver, HookScope, HookScript};
use indexmap::IndexMap;
use owo_colors::OwoColorize;
use std::path::PathBuf;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::StatusIcon;

/// List command
#[derive(Debug, Args)]
pub struct ListCommand {
    /// Output format
    #[arg(short, long, default_value = "simple", value_parser = ["simple", "json"])]
    pub format: String,

    /// Exit with an error unless git-hooks is installed
    #[arg(long)]
    pub check: bool,
}

impl Command for ListCommand {
    type Output = ();

    fn execute(&self, context: &RuntimeContext) -> Result<()> {
        let state = install::list(context.provider(), context.working_dir())?;

        let scripts = match &state {
            InstallState::Installed(statuses) => {
                let repo = context.repository()?;
                let resolver = context.resolver(&repo)?;
                Some((repo.hooks_dir, resolve_scripts(&resolver, statuses)?))
            }
            _ => None,
        };

        match self.format.as_str() {
            "json" => print_json(&state, scripts.as_ref())?,
            _ => print_simple(&state, scripts.as_ref()),
        }

        if self.check {
            match state {
                InstallState::NotARepository => {
                    return Err(Error::NotARepository {
                        path: context.working_dir().to_path_buf(),
                    }
                    .into());
                }
                InstallState::NotInstalled => return Err(Error::NotInstalled.into()),
                InstallState::Installed(_) => {}
            }
        }

        Ok(())
    }
}

/// Scripts of one trigger, grouped by scope in execution order
type ScopedScripts = IndexMap<HookScope, Vec<HookScript>>;

type ResolvedScripts = Vec<ScopedScripts>;

fn resolve_scripts(resolver: &HookResolver, statuses: &[TriggerStatus]) -> Result<ResolvedScripts> {
    statuses
        .iter()
        .map(|status| Ok(resolver.scripts_by_scope(status.trigger)?))
        .collect()
}

fn to_json(
    state: &InstallState,
    scripts: Option<&(PathBuf, ResolvedScripts)>,
) -> Result<serde_json::Value> {
    let (InstallState::Installed(statuses), Some((hooks_dir, scripts))) = (state, scripts) else {
        return Ok(serde_json::to_value(state).context("Failed to serialize state")?);
    };

    let hooks: Vec<_> = statuses
        .iter()
        .zip(scripts)
        .map(|(status, scopes)| {
            let groups: Vec<_> = scopes
                .iter()
                .map(|(scope, scripts)| {
                    serde_json::json!({
                        "scope": scope,
                        "scripts": scripts,
                    })
                })
                .collect();
            serde_json::json!({
                "trigger": status.trigger.name(),
                "entry": status.entry,
                "backup": status.backup,
                "scripts": groups,
            })
        })
        .collect();

    Ok(serde_json::json!({
        "state": "installed",
        "hooks_dir": hooks_dir,
        "hooks": hooks,
    }))
}

fn print_json(state: &InstallState, scripts: Option<&(PathBuf, ResolvedScripts)>) -> Result<()> {
    let json = to_json(state, scripts)?;
    println!(
        "{}",
        serde_json::to_string_pretty(&json).context("Failed to serialize state")?
    );
    Ok(())
}

fn print_simple(state: &InstallState, scripts: Option<&(PathBuf, ResolvedScripts)>) {
    let (statuses, hooks_dir, scripts) = match (state, scripts) {
        (InstallState::NotARepository, _) => {
            println!("{} Not a git repository", StatusIcon::Info);
            return;
        }
        (InstallState::Installed(statuses), Some((hooks_dir, scripts))) => {
            (statuses, hooks_dir, scripts)
        }
        _ => {
            println!("{} git hooks is not installed", StatusIcon::Info);
            return;
        }
    };

    println!(
        "{} git hooks is installed in {}",
        StatusIcon::Success,
        hooks_dir.display().cyan()
    );
    println!();

    let width = statuses
        .iter()
        .map(|s| s.trigger.name().len())
        .max()
        .unwrap_or(0);

    for (status, scripts) in statuses.iter().zip(scripts) {
        let name = status.trigger.name();
        let backup = if status.backup {
            format!(" (runs {name}.origin)")
        } else {
            String::new()
        };

        match &status.entry {
            HookEntry::Managed { version, .. } => println!(
                "{} {:width$}  {}{}",
                StatusIcon::Success,
                name.bold(),
                format!("managed {version}").dimmed(),
                backup.dimmed()
            ),
            HookEntry::Foreign { .. } => println!(
                "{} {:width$}  {}",
                StatusIcon::Warning,
                name.bold(),
                "foreign hook, not managed".yellow()
            ),
            HookEntry::Absent => println!(
                "{} {:width$}  {}",
                StatusIcon::None,
                name.dimmed(),
                "missing".dimmed()
            ),
        }

        for (scope, scripts) in scripts {
            println!("      {}", scope.name().dimmed());
            for script in scripts {
                println!("        {} {}", StatusIcon::Hook, script.name.green());
            }
        }
    }
}

//! Update command implementation
//!
//! Check the release feed for a newer build for this platform and replace
//! the running executable with it. Release archives are gzip-compressed
//! tarballs.

use anyhow::{Context, anyhow};
use clap::Args;
use flate2::read::GzDecoder;
use githooks_core::platform::CURRENT_PLATFORM;
use githooks_engine::release::{self, DEFAULT_FEED};
use owo_colors::OwoColorize;
use reqwest::blocking::{Client, Response};
use reqwest::header::ACCEPT;
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};
use tar::Archive;
use tracing::{debug, info};
use walkdir::WalkDir;

use crate::command::Command;
use crate::common::RuntimeContext;
use crate::error::Result;
use crate::ui::{StatusIcon, create_spinner};

/// Name of the executable inside a release archive
const BINARY_NAME: &str = "git-hooks";

/// Update command
#[derive(Debug, Args)]
pub struct UpdateCommand {
    /// Only report whether a newer release exists
    #[arg(long)]
    pub check: bool,

    /// Release feed URL
    #[arg(long, value_name = "URL", env = "GIT_HOOKS_RELEASE_FEED")]
    pub feed: Option<String>,
}

impl Command for UpdateCommand {
    type Output = ();

    fn execute(&self, _context: &RuntimeContext) -> Result<()> {
        let feed = self.feed.as_deref().unwrap_or(DEFAULT_FEED);
        let current = env!("CARGO_PKG_VERSION");

        let spinner = create_spinner("Checking for updates...");
        let body = fetch(feed);
        spinner.finish_and_clear();
        let releases = release::parse_feed(&body?)?;

        let Some((latest, asset, version)) = release::latest(&releases, &CURRENT_PLATFORM) else {
            println!(
                "{} No release provides {}",
                StatusIcon::Warning,
                CURRENT_PLATFORM.release_asset_name().yellow()
            );
            return Ok(());
        };
        debug!(tag = %latest.tag_name, asset = %asset.name, "Latest release");

        if !release::is_newer(current, version) {
            println!(
                "{} git-hooks {} is up to date",
                StatusIcon::Success,
                current.green()
            );
            return Ok(());
        }

        if self.check {
            println!(
                "{} git-hooks {} is available (current: {})",
                StatusIcon::Info,
                version.to_string().green(),
                current.dimmed()
            );
            return Ok(());
        }

        let target = std::env::current_exe().context("Failed to locate the running executable")?;
        info!(from = current, to = %version, "Updating git-hooks");

        let spinner = create_spinner(&format!("Downloading {}...", asset.name));
        let result = install_asset(&asset.browser_download_url, &asset.name, &target);
        spinner.finish_and_clear();
        result?;

        println!(
            "{} Updated git-hooks {} → {}",
            StatusIcon::Success,
            current.dimmed(),
            version.to_string().green()
        );
        Ok(())
    }
}

fn client() -> anyhow::Result<Client> {
    Client::builder()
        .user_agent(concat!("git-hooks/", env!("CARGO_PKG_VERSION")))
        .build()
        .context("Failed to create HTTP client")
}

fn fetch(url: &str) -> anyhow::Result<String> {
    debug!(url, "Fetching release feed");
    client()?
        .get(url)
        .header(ACCEPT, "application/vnd.github+json")
        .send()
        .and_then(Response::error_for_status)
        .and_then(Response::text)
        .with_context(|| format!("Failed to fetch {url}"))
}

/// Download and unpack `url`, then swap the binary it contains in for `target`
fn install_asset(url: &str, name: &str, target: &Path) -> anyhow::Result<()> {
    let workdir = tempfile::tempdir().context("Failed to create temporary directory")?;

    debug!(url, "Downloading release asset");
    let archive = client()?
        .get(url)
        .send()
        .and_then(Response::error_for_status)
        .and_then(Response::bytes)
        .with_context(|| format!("Failed to download {url}"))?;

    unpack(&archive[..], workdir.path()).with_context(|| format!("Failed to unpack {name}"))?;

    let binary = find_binary(workdir.path())?
        .ok_or_else(|| anyhow!("{name} does not contain a {BINARY_NAME} executable"))?;
    replace_executable(&binary, target)
}

/// Extract a gzip-compressed tarball into `dest`
fn unpack(archive: impl Read, dest: &Path) -> anyhow::Result<()> {
    Archive::new(GzDecoder::new(archive)).unpack(dest)?;
    Ok(())
}

fn find_binary(dir: &Path) -> anyhow::Result<Option<PathBuf>> {
    let wanted = format!("{BINARY_NAME}{}", std::env::consts::EXE_SUFFIX);
    for entry in WalkDir::new(dir).follow_links(false).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to read {}", dir.display()))?;
        if entry.file_type().is_file() && entry.file_name() == wanted.as_str() {
            return Ok(Some(entry.into_path()));
        }
    }
    Ok(None)
}

/// Copy `binary` next to `target` and rename it into place
fn replace_executable(binary: &Path, target: &Path) -> anyhow::Result<()> {
    let dir = target
        .parent()
        .ok_or_else(|| anyhow!("{} has no parent directory", target.display()))?;
    let staged = dir.join(format!(".{BINARY_NAME}.update"));

    fs::copy(binary, &staged)
        .with_context(|| format!("Failed to stage new binary in {}", dir.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        fs::set_permissions(&staged, fs::Permissions::from_mode(0o755))
            .with_context(|| format!("Failed to set permissions on {}", staged.display()))?;
    }

    fs::rename(&staged, target).map_err(|e| {
        let _ = fs::remove_file(&staged);
        anyhow!("Failed to replace {}: {e}", target.display())
    })
}

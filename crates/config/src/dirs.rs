//! Directory utilities
//!
//! Default locations used when neither the command line nor git config
//! names a directory:
//! - hooks home: `~/.githooks`
//! - data directory: `$XDG_DATA_HOME/git-hooks` or `~/.local/share/git-hooks`
//! - global template: `<data directory>/template`

use std::path::{Path, PathBuf};
use xdg::BaseDirectories;

/// Name of the per-repository directory holding subordinate scripts
pub const PROJECT_HOOKS_DIR: &str = ".githooks";

/// Get the git-hooks data directory
///
/// Returns `$XDG_DATA_HOME/git-hooks` or `~/.local/share/git-hooks`
#[must_use]
pub fn data_dir() -> Option<PathBuf> {
    BaseDirectories::with_prefix("git-hooks").get_data_home()
}

/// Get the default global template directory
///
/// Returns `$XDG_DATA_HOME/git-hooks/template`
#[must_use]
pub fn default_template_dir() -> Option<PathBuf> {
    data_dir().map(|d| d.join("template"))
}

/// Get the default hooks home (`~/.githooks`)
#[must_use]
pub fn default_hooks_home() -> Option<PathBuf> {
    ::dirs::home_dir().map(|home| home.join(PROJECT_HOOKS_DIR))
}

/// Expand a leading tilde (`~` or `~/`) to the home directory
#[must_use]
pub fn expand_tilde(path: &Path) -> PathBuf {
    // Early return for common case (no tilde) - avoids string conversion
    if !path.as_os_str().as_encoded_bytes().starts_with(b"~") {
        return path.to_path_buf();
    }

    let Some(home) = ::dirs::home_dir() else {
        return path.to_path_buf();
    };

    match path.to_str() {
        Some("~") => home,
        Some(s) if s.starts_with("~/") => home.join(&s[2..]),
        _ => path.to_path_buf(),
    }
}

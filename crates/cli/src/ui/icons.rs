//! Status icons for console output
//!
//! Plain text markers so output stays readable in any terminal and in logs.

use owo_colors::OwoColorize;
use std::fmt;

/// Icon constants
pub struct Icons;

impl Icons {
    /// Operation completed
    pub const STATUS_SUCCESS: &'static str = "[OK]";
    /// Completed with something worth a look
    pub const STATUS_WARNING: &'static str = "[!]";
    /// Operation failed
    pub const STATUS_ERROR: &'static str = "[X]";
    /// Informational line
    pub const STATUS_INFO: &'static str = "[i]";
    /// A hook script
    pub const STATUS_HOOK: &'static str = "[*]";
    /// Nothing to report (not installed, no scripts)
    pub const STATUS_NONE: &'static str = "[ ]";
}

/// Status icon type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusIcon {
    /// Green `[OK]`
    Success,
    /// Yellow `[!]`
    Warning,
    /// Red `[X]`
    Error,
    /// Cyan `[i]`
    Info,
    /// Magenta `[*]`
    Hook,
    /// Dimmed `[ ]`
    None,
}

impl StatusIcon {
    /// Uncolored icon text
    pub fn get(self) -> &'static str {
        match self {
            Self::Success => Icons::STATUS_SUCCESS,
            Self::Warning => Icons::STATUS_WARNING,
            Self::Error => Icons::STATUS_ERROR,
            Self::Info => Icons::STATUS_INFO,
            Self::Hook => Icons::STATUS_HOOK,
            Self::None => Icons::STATUS_NONE,
        }
    }
}

impl fmt::Display for StatusIcon {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let icon = self.get();
        match self {
            Self::Success => write!(f, "{}", icon.green()),
            Self::Warning => write!(f, "{}", icon.yellow()),
            Self::Error => write!(f, "{}", icon.red()),
            Self::Info => write!(f, "{}", icon.cyan()),
            Self::Hook => write!(f, "{}", icon.magenta()),
            Self::None => write!(f, "{}", icon.dimmed()),
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used, clippy::panic)]
    use super::*;

    #[test]
    fn test_status_icon_text() {
        assert_eq!(StatusIcon::Success.get(), "[OK]");
        assert_eq!(StatusIcon::Error.get(), "[X]");
        assert_eq!(StatusIcon::Hook.get(), "[*]");
        assert_eq!(StatusIcon::None.get(), "[ ]");
    }

    #[test]
    fn test_display_contains_icon() {
        assert!(StatusIcon::Warning.to_string().contains("[!]"));
    }
}

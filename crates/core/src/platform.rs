//! Platform detection
//!
//! Provides OS and architecture information using standard Unix conventions:
//! - macOS → `"darwin"` (kernel name)
//! - Linux → `"linux"`
//! - Windows → `"windows"`
//!
//! Release assets are published per platform as
//! `git-hooks_<os>_<arch>.tar.gz`, with Go-style architecture names.

use std::sync::LazyLock;

/// Current platform information (cached)
///
/// # Example
/// ```
/// use githooks_core::platform::CURRENT_PLATFORM;
///
/// let asset = CURRENT_PLATFORM.release_asset_name();
/// assert!(asset.starts_with("git-hooks_"));
/// ```
pub static CURRENT_PLATFORM: LazyLock<Platform> = LazyLock::new(Platform::detect);

/// Platform information
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Platform {
    /// OS: "darwin" (macOS), "linux", "windows", "unknown"
    pub os: &'static str,
    /// CPU architecture: "x86_64", "aarch64", etc.
    pub arch: &'static str,
}

impl Platform {
    /// Detect the platform this binary was compiled for
    pub fn detect() -> Self {
        Self {
            os: Self::detect_os(),
            arch: std::env::consts::ARCH,
        }
    }

    const fn detect_os() -> &'static str {
        #[cfg(target_os = "macos")]
        {
            "darwin"
        }

        #[cfg(target_os = "linux")]
        {
            "linux"
        }

        #[cfg(target_os = "windows")]
        {
            "windows"
        }

        #[cfg(not(any(target_os = "macos", target_os = "linux", target_os = "windows")))]
        {
            "unknown"
        }
    }

    /// Architecture name as used in release asset names
    pub fn release_arch(&self) -> &'static str {
        match self.arch {
            "x86_64" => "amd64",
            "x86" => "386",
            "aarch64" => "arm64",
            "arm" => "arm",
            other => other,
        }
    }

    /// Name of the release archive built for this platform
    pub fn release_asset_name(&self) -> String {
        format!("git-hooks_{}_{}.tar.gz", self.os, self.release_arch())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_release_arch_uses_go_names() {
        let platform = Platform {
            os: "darwin",
            arch: "x86",
        };
        assert_eq!(platform.release_arch(), "386");
        assert_eq!(platform.release_asset_name(), "git-hooks_darwin_386.tar.gz");

        let platform = Platform {
            os: "linux",
            arch: "aarch64",
        };
        assert_eq!(platform.release_asset_name(), "git-hooks_linux_arm64.tar.gz");
    }

    #[test]
    fn test_unknown_arch_passes_through() {
        let platform = Platform {
            os: "linux",
            arch: "riscv64",
        };
        assert_eq!(platform.release_arch(), "riscv64");
    }
}

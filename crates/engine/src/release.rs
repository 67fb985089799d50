//! Release feed handling for self-update
//!
//! The feed is the JSON list returned by the GitHub releases API. Only the
//! fields needed to pick an asset are deserialized.

use githooks_core::platform::Platform;
use githooks_core::{Error, Result};
use serde::Deserialize;

/// Default release feed
pub const DEFAULT_FEED: &str = "https://api.github.com/repos/git-hooks/git-hooks/releases";

/// A published release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Release {
    /// Tag the release was cut from (`v1.2.3`)
    pub tag_name: String,
    /// Draft releases are never installed
    #[serde(default)]
    pub draft: bool,
    /// Pre-releases are never installed
    #[serde(default)]
    pub prerelease: bool,
    /// Downloadable files
    #[serde(default)]
    pub assets: Vec<ReleaseAsset>,
}

/// A downloadable file of a release
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ReleaseAsset {
    /// File name
    pub name: String,
    /// Download URL
    pub browser_download_url: String,
}

impl Release {
    /// Semantic version of the tag
    #[must_use]
    pub fn version(&self) -> Option<Version> {
        Version::parse(&self.tag_name)
    }

    /// Asset built for `platform`
    #[must_use]
    pub fn asset_for(&self, platform: &Platform) -> Option<&ReleaseAsset> {
        let name = platform.release_asset_name();
        self.assets.iter().find(|asset| asset.name == name)
    }
}

/// `major.minor.patch` version
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(pub u64, pub u64, pub u64);

impl Version {
    /// Parse `1.2.3` or `v1.2.3`; a missing minor or patch is zero
    #[must_use]
    pub fn parse(tag: &str) -> Option<Self> {
        let tag = tag.trim();
        let tag = tag.strip_prefix('v').unwrap_or(tag);
        // Ignore pre-release and build suffixes
        let core = tag.split(['-', '+']).next()?;

        let mut parts = core.split('.').map(str::parse::<u64>);
        let major = parts.next()?.ok()?;
        let minor = parts.next().transpose().ok()?.unwrap_or(0);
        let patch = parts.next().transpose().ok()?.unwrap_or(0);
        if parts.next().is_some() {
            return None;
        }
        Some(Self(major, minor, patch))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.0, self.1, self.2)
    }
}

/// Parse a release feed
///
/// # Errors
///
/// Returns an error if the document is not a JSON list of releases.
pub fn parse_feed(json: &str) -> Result<Vec<Release>> {
    serde_json::from_str(json).map_err(|e| Error::Message(format!("Invalid release feed: {e}")))
}

/// Newest stable release with an asset for `platform`
#[must_use]
pub fn latest<'a>(
    releases: &'a [Release],
    platform: &Platform,
) -> Option<(&'a Release, &'a ReleaseAsset, Version)> {
    releases
        .iter()
        .filter(|release| !release.draft && !release.prerelease)
        .filter_map(|release| {
            let version = release.version()?;
            let asset = release.asset_for(platform)?;
            Some((release, asset, version))
        })
        .max_by_key(|(_, _, version)| *version)
}

/// Whether `candidate` is newer than the running `current` version
#[must_use]
pub fn is_newer(current: &str, candidate: Version) -> bool {
    Version::parse(current).is_none_or(|current| candidate > current)
}

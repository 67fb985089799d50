//! Dispatch entry point synthesis
//!
//! Every trigger gets the same tiny POSIX shell script. It carries the
//! installed marker on its second line and hands control to
//! `git hooks run`, which does the resolution and fan-out. `exec` keeps
//! the process's stdin, arguments and exit status intact, so the native
//! calling convention of the trigger passes straight through.

use githooks_core::Trigger;

/// Prefix of the marker line identifying a managed entry point
pub const MARKER: &str = "# git-hooks: managed";

/// Suffix appended to a displaced foreign hook (`pre-commit.origin`)
pub const BACKUP_SUFFIX: &str = ".origin";

/// Version written into the marker
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Marker fields parsed from an entry point
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Marker {
    /// Trigger recorded in the marker
    pub trigger: Option<String>,
    /// git-hooks version that wrote the entry point
    pub version: Option<String>,
}

/// Generate the dispatch entry point for `trigger`
#[must_use]
pub fn synthesize(trigger: &Trigger) -> String {
    let name = trigger.name();
    format!(
        "#!/bin/sh\n\
         {MARKER} trigger={name} version={VERSION}\n\
         #\n\
         # Installed by git-hooks. Put your scripts in .githooks/{name}/ instead\n\
         # of editing this file; `git hooks uninstall` removes it and restores\n\
         # any hook it replaced.\n\
         \n\
         exec git hooks run {name} \"$@\"\n"
    )
}

/// Find the marker in the first lines of an entry point
///
/// Only the header is searched so a foreign script mentioning the marker
/// text somewhere in its body is not mistaken for a managed one.
#[must_use]
pub fn parse_marker(content: &str) -> Option<Marker> {
    content.lines().take(3).find_map(|line| {
        let fields = line.strip_prefix(MARKER)?;
        let mut marker = Marker {
            trigger: None,
            version: None,
        };
        for field in fields.split_whitespace() {
            match field.split_once('=') {
                Some(("trigger", value)) => marker.trigger = Some(value.to_string()),
                Some(("version", value)) => marker.version = Some(value.to_string()),
                _ => {}
            }
        }
        Some(marker)
    })
}

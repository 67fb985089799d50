//! Progress indicators
//!
//! This module provides spinner helpers using indicatif.

use indicatif::{ProgressBar, ProgressStyle};
use std::io::IsTerminal;

/// Create a spinner for indeterminate operations
///
/// The spinner is hidden when stderr is not a terminal.
pub fn create_spinner(message: &str) -> ProgressBar {
    if !std::io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }

    let pb = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::default_spinner().template("{spinner} {msg}") {
        pb.set_style(style);
    }
    pb.set_message(message.to_string());
    pb.enable_steady_tick(std::time::Duration::from_millis(100));
    pb
}

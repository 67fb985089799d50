//! Terminal output helpers for git-hooks
//!
//! - Status icons
//! - Progress spinners

pub mod icons;
pub mod progress;

pub use icons::{Icons, StatusIcon};
pub use progress::create_spinner;

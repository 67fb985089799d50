//! Core types and utilities for git-hooks
//!
//! This is the foundation crate (Layer 0) that all other git-hooks crates depend on.
//! It provides:
//! - The trigger catalog (every supported git hook and its calling convention)
//! - Base error types
//! - Platform detection
//!
//! This crate has no dependencies on other git-hooks crates.

pub mod error;
pub mod platform;
pub mod trigger;

pub use error::{Error, Result};
pub use trigger::{Arity, Trigger};

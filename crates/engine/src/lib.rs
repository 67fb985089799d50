//! # git-hooks engine
//!
//! Core library for the git-hooks manager.
//!
//! This crate provides:
//!
//! - **Entry points**: Synthesis and recognition of the managed dispatch scripts
//! - **Installation**: Installing and removing entry points in a hooks directory
//! - **Global template**: Installing into git's `init.templateDir`
//! - **Resolution**: Finding subordinate scripts across hook scopes
//! - **Dispatch**: Running them with the trigger's calling convention
//! - **Releases**: Reading the release feed for self-update

pub mod hooks;
pub mod install;
pub mod release;
pub mod template;

// Re-export error types from core
pub use githooks_core::{Error, Result};

// Re-export commonly used types
pub use hooks::{DispatchOutcome, Dispatcher, HookResolver, HookScope, HookScript, ProcessRunner};
pub use install::{HookEntry, HooksDir, InstallState, TriggerStatus};
pub use template::{install_global, uninstall_global};

//! Hook resolution and dispatch
//!
//! ## Execution Model
//!
//! - git runs the entry point installed for a trigger
//! - the entry point execs `git hooks run <trigger>`
//! - the resolver lists the subordinate scripts for the trigger
//! - the dispatcher runs them in order and aggregates their exit statuses
//!
//! ## Module Organization
//!
//! - `script`: Entry point synthesis and marker parsing
//! - `resolver`: Hook directory and script discovery
//! - `dispatcher`: Sequential execution and exit status aggregation

pub mod dispatcher;
pub mod resolver;
pub mod script;

// Re-export main types for convenience
pub use dispatcher::{DispatchOutcome, Dispatcher, ProcessRunner, ScriptRunner, aggregate};
pub use resolver::{HookDirectory, HookDirectorySet, HookResolver, HookScope, HookScript};
pub use script::{BACKUP_SUFFIX, MARKER, Marker, parse_marker, synthesize};

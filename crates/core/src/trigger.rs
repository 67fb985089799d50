//! Trigger catalog
//!
//! Every git hook supported by git-hooks, together with the calling
//! convention git uses when it fires it:
//!
//! - how many arguments the hook receives
//! - whether git pipes data on stdin
//! - whether a non-zero exit status aborts the operation (gate) or is
//!   ignored by git (advisory)
//!
//! The catalog is static and ordered; install writes one entry point per
//! trigger in this order.

use crate::{Error, Result};
use serde::Serialize;
use std::fmt;

/// Number of arguments git passes to a hook
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct Arity {
    /// Minimum number of arguments
    pub min: usize,
    /// Maximum number of arguments (`None` = unbounded)
    pub max: Option<usize>,
}

impl Arity {
    const fn exactly(n: usize) -> Self {
        Self {
            min: n,
            max: Some(n),
        }
    }

    const fn between(min: usize, max: usize) -> Self {
        Self {
            min,
            max: Some(max),
        }
    }

    const fn any() -> Self {
        Self { min: 0, max: None }
    }

    /// Check whether `count` arguments satisfy this arity
    #[must_use]
    pub fn accepts(&self, count: usize) -> bool {
        count >= self.min && self.max.is_none_or(|max| count <= max)
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.max {
            Some(max) if max == self.min => write!(f, "{max}"),
            Some(max) => write!(f, "{}-{max}", self.min),
            None => write!(f, "at least {}", self.min),
        }
    }
}

/// A git hook trigger and its native calling convention
#[derive(Debug, PartialEq, Eq, Hash, Serialize)]
pub struct Trigger {
    name: &'static str,
    arity: Arity,
    stdin: bool,
    gate: bool,
}

impl Trigger {
    const fn gate(name: &'static str, arity: Arity, stdin: bool) -> Self {
        Self {
            name,
            arity,
            stdin,
            gate: true,
        }
    }

    const fn advisory(name: &'static str, arity: Arity, stdin: bool) -> Self {
        Self {
            name,
            arity,
            stdin,
            gate: false,
        }
    }

    /// All supported triggers, in installation order
    #[must_use]
    pub fn all() -> &'static [Trigger] {
        &TRIGGERS
    }

    /// Look up a trigger by its hook name
    #[must_use]
    pub fn from_name(name: &str) -> Option<&'static Trigger> {
        TRIGGERS.iter().find(|t| t.name == name)
    }

    /// Look up a trigger by name, failing with `UnknownTrigger`
    pub fn lookup(name: &str) -> Result<&'static Trigger> {
        Self::from_name(name).ok_or_else(|| Error::UnknownTrigger(name.to_string()))
    }

    /// Hook file name git invokes (e.g. `pre-commit`)
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Argument arity of the hook
    #[inline]
    #[must_use]
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Whether git writes data to the hook's stdin
    #[inline]
    #[must_use]
    pub fn pipes_stdin(&self) -> bool {
        self.stdin
    }

    /// Whether a non-zero exit status aborts the git operation
    #[inline]
    #[must_use]
    pub fn aborts_on_failure(&self) -> bool {
        self.gate
    }

    /// Validate an argument count against the calling convention
    pub fn check_args(&self, count: usize) -> Result<()> {
        if self.arity.accepts(count) {
            Ok(())
        } else {
            Err(Error::InvalidArguments {
                trigger: self.name.to_string(),
                expected: self.arity.to_string(),
                got: count,
            })
        }
    }
}

impl fmt::Display for Trigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

static TRIGGERS: [Trigger; 21] = [
    Trigger::gate("applypatch-msg", Arity::exactly(1), false),
    Trigger::gate("pre-applypatch", Arity::exactly(0), false),
    Trigger::advisory("post-applypatch", Arity::exactly(0), false),
    Trigger::gate("pre-commit", Arity::exactly(0), false),
    Trigger::gate("pre-merge-commit", Arity::exactly(0), false),
    Trigger::gate("prepare-commit-msg", Arity::between(1, 3), false),
    Trigger::gate("commit-msg", Arity::exactly(1), false),
    Trigger::advisory("post-commit", Arity::exactly(0), false),
    Trigger::gate("pre-rebase", Arity::between(1, 2), false),
    Trigger::advisory("post-checkout", Arity::exactly(3), false),
    Trigger::advisory("post-merge", Arity::exactly(1), false),
    Trigger::gate("pre-push", Arity::exactly(2), true),
    Trigger::gate("pre-receive", Arity::exactly(0), true),
    Trigger::gate("update", Arity::exactly(3), false),
    Trigger::advisory("post-receive", Arity::exactly(0), true),
    Trigger::advisory("post-update", Arity::any(), false),
    Trigger::gate("push-to-checkout", Arity::exactly(1), false),
    Trigger::gate("pre-auto-gc", Arity::exactly(0), false),
    Trigger::advisory("post-rewrite", Arity::exactly(1), true),
    Trigger::gate("sendemail-validate", Arity::between(1, 2), false),
    Trigger::advisory("post-index-change", Arity::exactly(2), false),
];

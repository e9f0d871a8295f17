//! # Validator Configuration
//!
//! Limits applied to every `validate` call. The struct deserializes from
//! YAML or JSON with every field optional, so a config file only needs to
//! name what it overrides.

use serde::{Deserialize, Serialize};

/// Default bound on nested `$ref` evaluations.
pub const DEFAULT_MAX_STACK_DEPTH: usize = 128;

/// Default cap on collected violations. Zero means unlimited.
pub const DEFAULT_MAX_ERRORS: usize = 0;

/// Evaluation limits for a [`Validator`](crate::Validator).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ValidatorConfig {
    /// Maximum number of schema frames (root plus followed `$ref`s) before
    /// evaluation fails with a stack overflow.
    pub max_stack_depth: usize,
    /// Stop after this many violations. `0` collects all of them.
    pub max_errors: usize,
}

impl Default for ValidatorConfig {
    fn default() -> Self {
        Self {
            max_stack_depth: DEFAULT_MAX_STACK_DEPTH,
            max_errors: DEFAULT_MAX_ERRORS,
        }
    }
}

impl ValidatorConfig {
    pub fn with_max_stack_depth(mut self, depth: usize) -> Self {
        self.max_stack_depth = depth;
        self
    }

    pub fn with_max_errors(mut self, max_errors: usize) -> Self {
        self.max_errors = max_errors;
        self
    }
}

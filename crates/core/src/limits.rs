//! Size limits for indexes
//!
//! This module defines configurable limits that are enforced when indexes are
//! constructed, when registries are built, and during autofill. Violations
//! result in `IndexError::LimitExceeded`.
//!
//! Custom limits are set per index (`CompositeIndex::with_limits`) or loaded
//! from the registry configuration file.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Limits for key depth and autofill fan-out
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Limits {
    /// Maximum number of key types in one index (default: 16)
    pub max_key_depth: usize,

    /// Maximum number of key sequences a single autofill may derive
    /// (default: 10_000)
    pub max_autofill_combinations: usize,
}

impl Default for Limits {
    fn default() -> Self {
        Limits {
            max_key_depth: 16,
            max_autofill_combinations: 10_000,
        }
    }
}

impl Limits {
    /// Create limits with small values for testing
    ///
    /// This is useful for unit tests that need to test limit enforcement
    /// without building extremely deep indexes or wide fan-outs.
    pub fn with_small_limits() -> Self {
        Limits {
            max_key_depth: 4,
            max_autofill_combinations: 16,
        }
    }

    /// Validate the depth of a key-type sequence
    pub fn validate_key_depth(&self, depth: usize) -> Result<(), LimitError> {
        if depth > self.max_key_depth {
            return Err(LimitError::KeyDepthExceeded {
                actual: depth,
                max: self.max_key_depth,
            });
        }
        Ok(())
    }

    /// Validate the number of key sequences an autofill would derive
    pub fn validate_combinations(&self, combinations: usize) -> Result<(), LimitError> {
        if combinations > self.max_autofill_combinations {
            return Err(LimitError::TooManyCombinations {
                actual: combinations,
                max: self.max_autofill_combinations,
            });
        }
        Ok(())
    }
}

/// Limit validation errors
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LimitError {
    /// Key-type sequence deeper than allowed
    #[error("Key depth exceeded: {actual} key types exceeds maximum {max}")]
    KeyDepthExceeded {
        /// Actual depth
        actual: usize,
        /// Maximum allowed depth
        max: usize,
    },

    /// Autofill would derive too many key sequences
    #[error("Too many autofill combinations: {actual} exceeds maximum {max}")]
    TooManyCombinations {
        /// Number of combinations
        actual: usize,
        /// Maximum allowed
        max: usize,
    },
}

impl LimitError {
    /// Short machine-readable reason
    pub fn reason_code(&self) -> &'static str {
        match self {
            LimitError::KeyDepthExceeded { .. } => "key_depth_exceeded",
            LimitError::TooManyCombinations { .. } => "too_many_combinations",
        }
    }
}

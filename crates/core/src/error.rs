//! Error types for metaindex
//!
//! This module defines all error types used throughout the system.
//! We use `thiserror` for automatic `Display` and `Error` trait implementations.
//!
//! A duplicate terminal key on `put` is not an error: it is reported as
//! `Ok(false)`. Everything here is a programmer error or a failed build and
//! propagates unchanged to the caller.

use crate::key::KeyError;
use crate::limits::LimitError;
use thiserror::Error;

/// Result type alias for metaindex operations
pub type Result<T> = std::result::Result<T, IndexError>;

/// Error types for indexes and registries
#[derive(Debug, Error)]
pub enum IndexError {
    /// Key of the wrong type, at the wrong position, or wrong sequence length
    #[error("Invalid key for index '{index}': {reason}")]
    InvalidKey {
        /// Title of the index
        index: String,
        /// What was wrong with the key
        reason: KeyError,
    },

    /// Query sequence that cannot address this index
    #[error("Invalid query on index '{index}': {reason}")]
    InvalidQuery {
        /// Title of the index
        index: String,
        /// What was wrong with the query
        reason: KeyError,
    },

    /// Construction or build called without the input it needs
    #[error("Empty input: {0}")]
    EmptyInput(String),

    /// Two indexes with the same value type and key-type sequence
    #[error("Registry '{registry}' build failed: index '{index}' duplicates an existing signature")]
    BuildFailure {
        /// Title of the registry
        registry: String,
        /// Title of the colliding index
        index: String,
    },

    /// No index registered for the requested signature
    #[error("No index found for value type {value_type} with key types {key_types}")]
    NotFound {
        /// Requested value type
        value_type: String,
        /// Requested key types, rendered as a list
        key_types: String,
    },

    /// Autofill requested on an index whose key types are not all covered
    #[error("Index '{index}' cannot be autofilled: key types {uncovered} have no extraction rule")]
    NotAutofillCapable {
        /// Title of the index
        index: String,
        /// Key types without a rule, rendered as a list
        uncovered: String,
    },

    /// Value handed to a type-erased index is not of its value type
    #[error("Index '{index}' stores {expected} values, got {found}")]
    ValueTypeMismatch {
        /// Title of the index
        index: String,
        /// Value type of the index
        expected: String,
        /// Type of the value supplied
        found: String,
    },

    /// A configured limit was exceeded
    #[error("Limit exceeded: {0}")]
    LimitExceeded(#[from] LimitError),

    /// Configuration could not be read or parsed
    #[error("Configuration error: {0}")]
    Config(String),
}

impl IndexError {
    /// Build an `InvalidKey` error
    pub fn invalid_key(index: impl Into<String>, reason: KeyError) -> Self {
        IndexError::InvalidKey {
            index: index.into(),
            reason,
        }
    }

    /// Build an `InvalidQuery` error
    pub fn invalid_query(index: impl Into<String>, reason: KeyError) -> Self {
        IndexError::InvalidQuery {
            index: index.into(),
            reason,
        }
    }

    /// Build an `EmptyInput` error
    pub fn empty_input(what: impl Into<String>) -> Self {
        IndexError::EmptyInput(what.into())
    }

    /// Build a `Config` error
    pub fn config(message: impl Into<String>) -> Self {
        IndexError::Config(message.into())
    }

    /// Whether this is `NotFound`
    pub fn is_not_found(&self) -> bool {
        matches!(self, IndexError::NotFound { .. })
    }
}

//! Core types and traits for metaindex
//!
//! This crate defines the foundational types used throughout the system:
//! - TypeTag: Stable, ordered identity of a Rust type
//! - SortOrder: Ascending or descending comparison of a key type
//! - Key / KeyItem / KeyType: Typed, comparable index key components
//! - IndexKey: Capability trait every key type implements
//! - TypeKey: Type-identity key used by the registry
//! - KeySequence: Ordered key slots addressing a value or a subtree
//! - Limits: Depth and autofill fan-out limits
//! - Error: Error type hierarchy

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod error;
pub mod key;
pub mod key_sequence;
pub mod limits;
pub mod types;

pub use error::{IndexError, Result};
pub use key::{IndexKey, Key, KeyError, KeyItem, KeyType, NoKey, SelfIndexing, TypeKey};
pub use key_sequence::KeySequence;
pub use limits::{LimitError, Limits};
pub use types::{SortOrder, TypeTag};

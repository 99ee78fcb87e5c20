//! Composite index engine for metaindex
//!
//! This crate implements one composite index:
//! - CompositeIndex: Recursive tree of ordered maps, one level per key type
//! - ExtractionRules: Explicit table of accessors that derive keys from values
//! - Autofill: Cartesian derivation of key sequences from extraction rules
//! - IndexDump: Deterministic diagnostic rendering (text and JSON)
//! - ErasedIndex: Object-safe view used to hold indexes of different value types
//!
//! Registries of indexes live in `metaindex-registry`.

#![warn(missing_docs)]
#![warn(clippy::all)]

mod autofill;
pub mod dump;
pub mod erased;
pub mod extract;
pub mod index;

pub use dump::{DumpEntry, IndexDump};
pub use erased::ErasedIndex;
pub use extract::{Arity, ExtractionRules, Extractor};
pub use index::CompositeIndex;

//! metaindex - in-memory composite multi-key indexes
//!
//! A [`CompositeIndex`] stores values under ordered sequences of typed keys
//! and answers prefix queries in ascending key order. An [`IndexRegistry`]
//! indexes the indexes themselves by value type and key-type sequence, and a
//! [`LinkedIndexManager`] cascades autofill into indexes of self-indexing
//! types.
//!
//! # Quick Start
//!
//! ```
//! use metaindex::{
//!     CompositeIndex, ExtractionRules, IndexKey, IndexRegistry, KeyItem, KeySequence, KeyType,
//! };
//!
//! #[derive(Debug, Clone, PartialEq)]
//! struct Book {
//!     author: &'static str,
//!     year: i64,
//! }
//!
//! struct AuthorKey(&'static str);
//! impl IndexKey for AuthorKey {
//!     fn key_item(&self) -> Option<KeyItem> {
//!         Some(KeyItem::from(self.0))
//!     }
//! }
//!
//! struct YearKey(i64);
//! impl IndexKey for YearKey {
//!     fn key_item(&self) -> Option<KeyItem> {
//!         Some(KeyItem::Int(self.0))
//!     }
//! }
//!
//! let key_types = vec![KeyType::of::<AuthorKey>(), KeyType::of::<YearKey>()];
//! let index = CompositeIndex::<Book>::new("books", key_types.clone())?.with_rules(
//!     ExtractionRules::new()
//!         .one("author", |b: &Book| Some(AuthorKey(b.author)))
//!         .one("year", |b: &Book| Some(YearKey(b.year))),
//! );
//!
//! let mut registry = IndexRegistry::builder("library").index(index).build()?;
//! registry.autofill(&Book { author: "a", year: 1995 }, None)?;
//! registry.autofill(&Book { author: "a", year: 1990 }, None)?;
//!
//! let found = registry.query::<Book>(&key_types, &KeySequence::of(&AuthorKey("a")))?;
//! assert_eq!(found[0].year, 1990);
//! # Ok::<(), metaindex::IndexError>(())
//! ```
//!
//! # Architecture
//!
//! - `metaindex-core`: keys, key sequences, limits, errors
//! - `metaindex-engine`: the recursive index, extraction rules, autofill, dumps
//! - `metaindex-registry`: registries, linked indexes, configuration

pub use metaindex_core::{
    IndexError, IndexKey, Key, KeyError, KeyItem, KeySequence, KeyType, LimitError, Limits, NoKey,
    Result, SelfIndexing, SortOrder, TypeKey, TypeTag,
};
pub use metaindex_engine::{
    Arity, CompositeIndex, DumpEntry, ErasedIndex, ExtractionRules, Extractor, IndexDump,
};
pub use metaindex_registry::{
    IndexRegistry, IndexRegistryBuilder, Link, LinkId, LinkedIndexManager, RegistryConfig,
    CONFIG_FILE_NAME,
};

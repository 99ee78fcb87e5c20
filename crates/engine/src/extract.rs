//! Extraction rules: explicit accessor table for autofill
//!
//! An index built with [`ExtractionRules`] knows, for each of its key types,
//! which accessors on the value type produce keys of that type. Autofill uses
//! the table to derive every key sequence of a value without the caller
//! supplying keys.
//!
//! # Example
//!
//! ```
//! use metaindex_core::{IndexKey, KeyItem, KeyType};
//! use metaindex_engine::ExtractionRules;
//!
//! struct TagKey(String);
//! impl IndexKey for TagKey {
//!     fn key_item(&self) -> Option<KeyItem> {
//!         Some(KeyItem::Str(self.0.clone()))
//!     }
//! }
//!
//! struct Book {
//!     tags: Vec<String>,
//! }
//!
//! let rules = ExtractionRules::<Book>::new()
//!     .many("tags", |b: &Book| b.tags.iter().cloned().map(TagKey).collect::<Vec<_>>());
//! assert!(rules.covers(&KeyType::of::<TagKey>()));
//! ```

use metaindex_core::{IndexKey, Key, KeyType};
use std::fmt;
use std::sync::Arc;

type ExtractFn<V> = Arc<dyn Fn(&V) -> Vec<Option<Key>> + Send + Sync>;

/// Whether an accessor returns one key or a list of keys
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Arity {
    /// Single-valued accessor (may return null)
    One,
    /// List-valued accessor; each element fans out into its own entry
    Many,
}

/// Named accessor producing keys of one key type from a value
pub struct Extractor<V> {
    name: &'static str,
    key_type: KeyType,
    arity: Arity,
    extract: ExtractFn<V>,
}

impl<V> Extractor<V> {
    /// Accessor name, used in diagnostics
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Key type this accessor produces
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// One or many
    pub fn arity(&self) -> Arity {
        self.arity
    }

    /// Run the accessor; null keys come back as `None`
    pub fn extract(&self, value: &V) -> Vec<Option<Key>> {
        (self.extract)(value)
    }
}

impl<V> Clone for Extractor<V> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            key_type: self.key_type,
            arity: self.arity,
            extract: Arc::clone(&self.extract),
        }
    }
}

impl<V> fmt::Debug for Extractor<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extractor")
            .field("name", &self.name)
            .field("key_type", &self.key_type)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Table from key type to the accessors that produce it
///
/// Several accessors may produce the same key type; autofill uses the union
/// of their keys for that position.
pub struct ExtractionRules<V> {
    extractors: Vec<Extractor<V>>,
    self_key: Option<KeyType>,
}

impl<V> ExtractionRules<V> {
    /// Create an empty table
    pub fn new() -> Self {
        Self {
            extractors: Vec::new(),
            self_key: None,
        }
    }

    /// Register a single-valued accessor
    pub fn one<K, F>(mut self, name: &'static str, accessor: F) -> Self
    where
        V: 'static,
        K: IndexKey,
        F: Fn(&V) -> Option<K> + Send + Sync + 'static,
    {
        self.extractors.push(Extractor {
            name,
            key_type: KeyType::of::<K>(),
            arity: Arity::One,
            extract: Arc::new(move |value: &V| vec![accessor(value).and_then(|k| k.to_key())]),
        });
        self
    }

    /// Register a list-valued accessor
    pub fn many<K, I, F>(mut self, name: &'static str, accessor: F) -> Self
    where
        V: 'static,
        K: IndexKey,
        I: IntoIterator<Item = K>,
        F: Fn(&V) -> I + Send + Sync + 'static,
    {
        self.extractors.push(Extractor {
            name,
            key_type: KeyType::of::<K>(),
            arity: Arity::Many,
            extract: Arc::new(move |value: &V| {
                accessor(value).into_iter().map(|k| k.to_key()).collect()
            }),
        });
        self
    }

    /// Declare `K` as the value's own key type
    ///
    /// Positions of this key type are filled with the self key passed to
    /// autofill.
    pub fn self_key<K: IndexKey>(mut self) -> Self {
        self.self_key = Some(KeyType::of::<K>());
        self
    }

    /// Declared self-key type
    pub fn self_key_type(&self) -> Option<KeyType> {
        self.self_key
    }

    /// Whether autofill can produce keys of `key_type`
    pub fn covers(&self, key_type: &KeyType) -> bool {
        self.self_key.as_ref() == Some(key_type)
            || self.extractors.iter().any(|e| &e.key_type == key_type)
    }

    /// Accessors producing `key_type`, in registration order
    pub fn extractors_for<'a>(
        &'a self,
        key_type: &'a KeyType,
    ) -> impl Iterator<Item = &'a Extractor<V>> + 'a {
        self.extractors
            .iter()
            .filter(move |e| &e.key_type == key_type)
    }

    /// Every accessor, in registration order
    pub fn iter(&self) -> std::slice::Iter<'_, Extractor<V>> {
        self.extractors.iter()
    }

    /// Accessor names, in registration order
    pub fn names(&self) -> Vec<&'static str> {
        self.extractors.iter().map(|e| e.name).collect()
    }

    /// Number of accessors
    pub fn len(&self) -> usize {
        self.extractors.len()
    }

    /// Whether no accessor and no self key are registered
    pub fn is_empty(&self) -> bool {
        self.extractors.is_empty() && self.self_key.is_none()
    }
}

impl<V> Default for ExtractionRules<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> Clone for ExtractionRules<V> {
    fn clone(&self) -> Self {
        Self {
            extractors: self.extractors.clone(),
            self_key: self.self_key,
        }
    }
}

impl<V> fmt::Debug for ExtractionRules<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionRules")
            .field("extractors", &self.extractors)
            .field("self_key", &self.self_key)
            .finish()
    }
}

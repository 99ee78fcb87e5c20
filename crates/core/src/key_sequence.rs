//! Ordered sequences of key slots
//!
//! A [`KeySequence`] addresses one value in a composite index, or, with
//! wildcard slots and missing trailing positions, a whole subtree of values.
//! Each slot is an `Option<Key>`: `None` is a null key, which `put` rejects
//! and `get` treats as a wildcard.

use crate::key::{IndexKey, Key};
use serde::Serialize;
use std::fmt;

/// Ordered sequence of key slots
///
/// # Examples
///
/// ```
/// use metaindex_core::KeySequence;
///
/// let keys = KeySequence::new().with(&"tolkien").wildcard();
/// assert_eq!(keys.len(), 2);
/// assert!(keys.has_null());
/// assert_eq!(keys.tail().len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub struct KeySequence {
    slots: Vec<Option<Key>>,
}

impl KeySequence {
    /// Create an empty sequence
    pub fn new() -> Self {
        Self { slots: Vec::new() }
    }

    /// Create a sequence from raw slots
    pub fn from_slots(slots: Vec<Option<Key>>) -> Self {
        Self { slots }
    }

    /// Create a one-key sequence
    pub fn of<K: IndexKey>(key: &K) -> Self {
        Self::new().with(key)
    }

    /// Append the key of `key` (a null slot if it has no item)
    pub fn with<K: IndexKey>(mut self, key: &K) -> Self {
        self.slots.push(key.to_key());
        self
    }

    /// Append an already built key
    pub fn with_key(mut self, key: Key) -> Self {
        self.slots.push(Some(key));
        self
    }

    /// Append a wildcard slot
    pub fn wildcard(mut self) -> Self {
        self.slots.push(None);
        self
    }

    /// Append a slot in place
    pub fn push(&mut self, slot: Option<Key>) {
        self.slots.push(slot);
    }

    /// Number of slots
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    /// Whether the sequence has no slots
    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// First slot, `None` if the sequence is empty
    pub fn head(&self) -> Option<&Option<Key>> {
        self.slots.first()
    }

    /// Every slot after the first, as a new sequence
    pub fn tail(&self) -> KeySequence {
        Self {
            slots: self.slots.iter().skip(1).cloned().collect(),
        }
    }

    /// Head and tail as borrowed parts
    pub fn split_head(&self) -> Option<(&Option<Key>, &[Option<Key>])> {
        self.slots.split_first()
    }

    /// All slots
    pub fn slots(&self) -> &[Option<Key>] {
        &self.slots
    }

    /// Slot at `position`
    pub fn get(&self, position: usize) -> Option<&Option<Key>> {
        self.slots.get(position)
    }

    /// Whether any slot is null
    pub fn has_null(&self) -> bool {
        self.slots.iter().any(Option::is_none)
    }

    /// Whether the sequence has exactly `depth` slots and none is null
    pub fn is_fully_specified(&self, depth: usize) -> bool {
        self.slots.len() == depth && !self.has_null()
    }

    /// Iterate over the slots
    pub fn iter(&self) -> std::slice::Iter<'_, Option<Key>> {
        self.slots.iter()
    }

    /// Concrete keys, skipping null slots
    pub fn keys(&self) -> impl Iterator<Item = &Key> {
        self.slots.iter().flatten()
    }
}

impl From<Vec<Key>> for KeySequence {
    fn from(keys: Vec<Key>) -> Self {
        Self {
            slots: keys.into_iter().map(Some).collect(),
        }
    }
}

impl From<Vec<Option<Key>>> for KeySequence {
    fn from(slots: Vec<Option<Key>>) -> Self {
        Self { slots }
    }
}

impl FromIterator<Key> for KeySequence {
    fn from_iter<I: IntoIterator<Item = Key>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().map(Some).collect(),
        }
    }
}

impl FromIterator<Option<Key>> for KeySequence {
    fn from_iter<I: IntoIterator<Item = Option<Key>>>(iter: I) -> Self {
        Self {
            slots: iter.into_iter().collect(),
        }
    }
}

impl<'a> IntoIterator for &'a KeySequence {
    type Item = &'a Option<Key>;
    type IntoIter = std::slice::Iter<'a, Option<Key>>;

    fn into_iter(self) -> Self::IntoIter {
        self.slots.iter()
    }
}

impl fmt::Display for KeySequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("[")?;
        for (i, slot) in self.slots.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            match slot {
                Some(key) => write!(f, "{}", key)?,
                None => f.write_str("*")?,
            }
        }
        f.write_str("]")
    }
}

//! CompositeIndex: recursive tree-of-maps index
//!
//! ## Design
//!
//! A `CompositeIndex<V>` is one level of a tree. Every level is keyed by one
//! key type of the index's key-type sequence:
//!
//! ```text
//! root   [AuthorKey]   children: austen → node, tolkien → node
//! level1 [YearKey]     leaves:   1937 → hobbit, 1954 → fellowship
//! ```
//!
//! Levels above the last hold `children`, the last level holds `leaves`. A
//! node never holds both; which one is decided by the remaining depth alone.
//! Both maps are `BTreeMap`s ordered by [`Key`], so every traversal is
//! deterministic and ascending in each key type's direction.
//!
//! ## Ownership
//!
//! Each node owns its children directly. Child nodes are created on demand by
//! `put` and are never handed out to callers; only the root is addressable.
//! The key-type sequence and title are shared between nodes via `Arc`.
//!
//! ## Queries
//!
//! `get` is a prefix query: missing trailing positions and `None` slots are
//! wildcards that expand to every match of the subtree.

use crate::extract::ExtractionRules;
use metaindex_core::{
    IndexError, Key, KeyError, KeySequence, KeyType, Limits, Result, TypeTag,
};
use std::collections::btree_map::Entry;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;
use tracing::debug;

/// State carried by root nodes only
pub(crate) struct RootState<V> {
    pub(crate) rules: ExtractionRules<V>,
    pub(crate) limits: Limits,
}

/// One node of a composite index
///
/// # Example
///
/// ```
/// use metaindex_core::{IndexKey, KeyItem, KeySequence, KeyType};
/// use metaindex_engine::CompositeIndex;
///
/// struct AuthorKey(&'static str);
/// impl IndexKey for AuthorKey {
///     fn key_item(&self) -> Option<KeyItem> {
///         Some(KeyItem::from(self.0))
///     }
/// }
///
/// struct YearKey(i64);
/// impl IndexKey for YearKey {
///     fn key_item(&self) -> Option<KeyItem> {
///         Some(KeyItem::Int(self.0))
///     }
/// }
///
/// let mut books = CompositeIndex::<&str>::new(
///     "books by author",
///     vec![KeyType::of::<AuthorKey>(), KeyType::of::<YearKey>()],
/// )?;
/// books.put("book1", &KeySequence::new().with(&AuthorKey("a")).with(&YearKey(1990)))?;
/// books.put("book2", &KeySequence::new().with(&AuthorKey("a")).with(&YearKey(1995)))?;
///
/// assert_eq!(books.get(&KeySequence::of(&AuthorKey("a")))?, vec![&"book1", &"book2"]);
/// assert_eq!(books.size(), 2);
/// # Ok::<(), metaindex_core::IndexError>(())
/// ```
pub struct CompositeIndex<V> {
    title: Arc<str>,
    value_type: TypeTag,
    key_types: Arc<[KeyType]>,
    level: usize,
    children: BTreeMap<Key, CompositeIndex<V>>,
    leaves: BTreeMap<Key, V>,
    pub(crate) root: Option<RootState<V>>,
}

impl<V: 'static> CompositeIndex<V> {
    /// Create an empty root index with default limits
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `key_types` is empty
    /// - `LimitExceeded` if `key_types` is deeper than the default limit
    pub fn new(title: impl Into<String>, key_types: Vec<KeyType>) -> Result<Self> {
        Self::with_limits(title, key_types, Limits::default())
    }

    /// Create an empty root index with custom limits
    pub fn with_limits(
        title: impl Into<String>,
        key_types: Vec<KeyType>,
        limits: Limits,
    ) -> Result<Self> {
        let title: String = title.into();
        if key_types.is_empty() {
            return Err(IndexError::empty_input(format!(
                "index '{}' has no key types",
                title
            )));
        }
        limits.validate_key_depth(key_types.len())?;

        Ok(Self {
            title: Arc::from(title),
            value_type: TypeTag::of::<V>(),
            key_types: Arc::from(key_types),
            level: 0,
            children: BTreeMap::new(),
            leaves: BTreeMap::new(),
            root: Some(RootState {
                rules: ExtractionRules::new(),
                limits,
            }),
        })
    }
}

impl<V> CompositeIndex<V> {
    /// Attach extraction rules used by autofill
    pub fn with_rules(mut self, rules: ExtractionRules<V>) -> Self {
        if let Some(root) = self.root.as_mut() {
            root.rules = rules;
        }
        self
    }

    fn child(
        title: Arc<str>,
        value_type: TypeTag,
        key_types: Arc<[KeyType]>,
        level: usize,
    ) -> Self {
        Self {
            title,
            value_type,
            key_types,
            level,
            children: BTreeMap::new(),
            leaves: BTreeMap::new(),
            root: None,
        }
    }

    // ========== Accessors ==========

    /// Diagnostic title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Type of the stored values
    pub fn value_type(&self) -> TypeTag {
        self.value_type
    }

    /// Full key-type sequence of the index
    pub fn key_types(&self) -> &[KeyType] {
        &self.key_types
    }

    /// Number of key types of the index
    pub fn depth(&self) -> usize {
        self.key_types.len()
    }

    /// Level of this node, 0 for the root
    pub fn level(&self) -> usize {
        self.level
    }

    /// Number of key types this node and its descendants consume
    pub fn remaining_depth(&self) -> usize {
        self.key_types.len() - self.level
    }

    /// Whether this node is externally addressable
    pub fn is_root(&self) -> bool {
        self.root.is_some()
    }

    /// Whether this node stores values rather than child nodes
    pub fn is_leaf_level(&self) -> bool {
        self.remaining_depth() == 1
    }

    /// Extraction rules (root only)
    pub fn rules(&self) -> Option<&ExtractionRules<V>> {
        self.root.as_ref().map(|r| &r.rules)
    }

    /// Limits (root only)
    pub fn limits(&self) -> Option<&Limits> {
        self.root.as_ref().map(|r| &r.limits)
    }

    /// Key types that no extraction rule covers
    ///
    /// Every key type is uncovered on a node without rules.
    pub fn uncovered_key_types(&self) -> Vec<KeyType> {
        match self.rules() {
            Some(rules) => self
                .key_types
                .iter()
                .filter(|kt| !rules.covers(kt))
                .copied()
                .collect(),
            None => self.key_types.to_vec(),
        }
    }

    /// Whether every key type is covered by an extraction rule or the self key
    pub fn is_autofill_capable(&self) -> bool {
        self.is_root() && self.uncovered_key_types().is_empty()
    }

    // ========== Mutation ==========

    /// Store `value` under a fully specified key sequence
    ///
    /// Returns `Ok(false)` without storing when the sequence is empty, has a
    /// null slot, or its terminal key is already occupied (first write wins).
    ///
    /// # Errors
    ///
    /// `InvalidKey` when the sequence length differs from the remaining depth
    /// or a key does not have the key type of its position.
    pub fn put(&mut self, value: V, keys: &KeySequence) -> Result<bool> {
        if keys.is_empty() || keys.has_null() {
            debug!(index = %self.title, keys = %keys, "rejected put with empty or null key");
            return Ok(false);
        }

        let depth = self.remaining_depth();
        if keys.len() != depth {
            return Err(IndexError::invalid_key(
                &*self.title,
                KeyError::LengthMismatch {
                    expected: depth,
                    actual: keys.len(),
                },
            ));
        }
        self.check_key_types(keys.slots())
            .map_err(|reason| IndexError::invalid_key(&*self.title, reason))?;

        let inserted = self.put_slots(value, keys.slots());
        if !inserted {
            debug!(index = %self.title, keys = %keys, "terminal key already present");
        }
        Ok(inserted)
    }

    /// Route through children, creating them on demand. Slots are validated.
    fn put_slots(&mut self, value: V, slots: &[Option<Key>]) -> bool {
        let (head, tail) = match slots.split_first() {
            Some((Some(head), tail)) => (head, tail),
            _ => return false,
        };

        if tail.is_empty() {
            return match self.leaves.entry(head.clone()) {
                Entry::Occupied(_) => false,
                Entry::Vacant(slot) => {
                    slot.insert(value);
                    true
                }
            };
        }

        let title = Arc::clone(&self.title);
        let key_types = Arc::clone(&self.key_types);
        let value_type = self.value_type;
        let level = self.level + 1;
        self.children
            .entry(head.clone())
            .or_insert_with(|| Self::child(title, value_type, key_types, level))
            .put_slots(value, tail)
    }

    /// Check every concrete key against the key type of its position
    fn check_key_types(&self, slots: &[Option<Key>]) -> std::result::Result<(), KeyError> {
        for (offset, slot) in slots.iter().enumerate() {
            let position = self.level + offset;
            let expected = self.key_types[position];
            if let Some(key) = slot {
                if key.key_type() != expected {
                    return Err(KeyError::TypeMismatch {
                        position,
                        expected: expected.to_string(),
                        found: key.key_type().to_string(),
                    });
                }
            }
        }
        Ok(())
    }

    fn check_query(&self, keys: &KeySequence) -> Result<()> {
        let depth = self.remaining_depth();
        if keys.len() > depth {
            return Err(IndexError::invalid_query(
                &*self.title,
                KeyError::TooLong {
                    actual: keys.len(),
                    max: depth,
                },
            ));
        }
        self.check_key_types(keys.slots())
            .map_err(|reason| IndexError::invalid_query(&*self.title, reason))
    }

    // ========== Queries ==========

    /// Prefix query
    ///
    /// Missing trailing positions and `None` slots match everything. Results
    /// are concatenated in ascending key order. A fully specified sequence
    /// returns at most one value.
    ///
    /// # Errors
    ///
    /// `InvalidQuery` when the sequence is longer than the index depth or a
    /// concrete key has the wrong key type.
    pub fn get(&self, keys: &KeySequence) -> Result<Vec<&V>> {
        self.check_query(keys)?;
        let mut out = Vec::new();
        self.collect(keys.slots(), &mut out);
        Ok(out)
    }

    /// First value matched by `keys`, if any
    pub fn get_first(&self, keys: &KeySequence) -> Result<Option<&V>> {
        Ok(self.get(keys)?.into_iter().next())
    }

    /// Prefix query with mutable access to the matched values
    pub fn get_mut(&mut self, keys: &KeySequence) -> Result<Vec<&mut V>> {
        self.check_query(keys)?;
        let mut out = Vec::new();
        self.collect_mut(keys.slots(), &mut out);
        Ok(out)
    }

    /// Every value in ascending composite-key order
    pub fn select_all(&self) -> Vec<&V> {
        let mut out = Vec::with_capacity(self.size());
        self.collect(&[], &mut out);
        out
    }

    fn collect<'a>(&'a self, slots: &[Option<Key>], out: &mut Vec<&'a V>) {
        let (head, tail) = match slots.split_first() {
            Some((head, tail)) => (head.as_ref(), tail),
            None => (None, slots),
        };

        if self.is_leaf_level() {
            match head {
                Some(key) => out.extend(self.leaves.get(key)),
                None => out.extend(self.leaves.values()),
            }
            return;
        }

        match head {
            Some(key) => {
                if let Some(child) = self.children.get(key) {
                    child.collect(tail, out);
                }
            }
            None => {
                for child in self.children.values() {
                    child.collect(tail, out);
                }
            }
        }
    }

    fn collect_mut<'a>(&'a mut self, slots: &[Option<Key>], out: &mut Vec<&'a mut V>) {
        let (head, tail) = match slots.split_first() {
            Some((head, tail)) => (head.as_ref(), tail),
            None => (None, slots),
        };

        if self.remaining_depth() == 1 {
            match head {
                Some(key) => out.extend(self.leaves.get_mut(key)),
                None => out.extend(self.leaves.values_mut()),
            }
            return;
        }

        match head {
            Some(key) => {
                if let Some(child) = self.children.get_mut(key) {
                    child.collect_mut(tail, out);
                }
            }
            None => {
                for child in self.children.values_mut() {
                    child.collect_mut(tail, out);
                }
            }
        }
    }

    /// Number of values stored under this node (recomputed on every call)
    pub fn size(&self) -> usize {
        self.leaves.len() + self.children.values().map(|c| c.size()).sum::<usize>()
    }

    /// Whether no value is stored under this node
    pub fn is_empty(&self) -> bool {
        self.leaves.is_empty() && self.children.values().all(|c| c.is_empty())
    }

    /// Every value with its full key sequence, in ascending order
    pub fn enumerate_entries(&self) -> Vec<(&V, KeySequence)> {
        let mut out = Vec::new();
        let mut path = Vec::with_capacity(self.remaining_depth());
        self.walk(&mut path, &mut out);
        out
    }

    fn walk<'a>(&'a self, path: &mut Vec<Key>, out: &mut Vec<(&'a V, KeySequence)>) {
        for (key, value) in &self.leaves {
            let keys: KeySequence = path.iter().cloned().chain(Some(key.clone())).collect();
            out.push((value, keys));
        }
        for (key, child) in &self.children {
            path.push(key.clone());
            child.walk(path, out);
            path.pop();
        }
    }

    /// Keys present at this node's level, in order
    pub fn level_keys(&self) -> Vec<&Key> {
        if self.is_leaf_level() {
            self.leaves.keys().collect()
        } else {
            self.children.keys().collect()
        }
    }
}

impl<V: fmt::Debug> fmt::Debug for CompositeIndex<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompositeIndex")
            .field("title", &self.title)
            .field("value_type", &self.value_type)
            .field("key_types", &self.key_types)
            .field("level", &self.level)
            .field("children", &self.children)
            .field("leaves", &self.leaves)
            .finish()
    }
}

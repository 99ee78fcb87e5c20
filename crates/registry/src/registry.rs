//! IndexRegistry: an index of indexes
//!
//! ## Design
//!
//! The registry is itself a [`CompositeIndex`] whose values are type-erased
//! indexes and whose keys are type-identity keys. Every registered index is
//! stored under its signature:
//!
//! ```text
//! [TypeKey(Book), TypeKey(AuthorKey), TypeKey(YearKey), TypeKey(NoKey)]
//!  value type     key type 0          key type 1        padding
//! ```
//!
//! The metamap has `max_depth = longest key-type sequence + 1` positions.
//! Signatures of shorter indexes are padded with `NoKey` so every signature
//! ends on the leaf level. A signature can be stored once; a second index
//! with the same value type and key types fails the build.
//!
//! Looking up an index rebuilds the signature from the value type parameter
//! and the requested key types and asks the metamap for its first match.

use crate::config::RegistryConfig;
use metaindex_core::{
    IndexError, IndexKey, Key, KeySequence, KeyType, Limits, NoKey, Result, TypeKey, TypeTag,
};
use metaindex_engine::{CompositeIndex, ErasedIndex, IndexDump};
use std::any::Any;
use std::fmt;
use tracing::{debug, info};

/// Registry of composite indexes keyed by value type and key-type sequence
///
/// # Example
///
/// ```
/// use metaindex_core::{KeySequence, KeyType};
/// use metaindex_engine::CompositeIndex;
/// use metaindex_registry::IndexRegistry;
///
/// let by_name = CompositeIndex::<u32>::new("by name", vec![KeyType::of::<String>()])?;
/// let by_rank = CompositeIndex::<u32>::new("by rank", vec![KeyType::of::<i64>()])?;
///
/// let mut registry = IndexRegistry::builder("scores")
///     .index(by_name)
///     .index(by_rank)
///     .build()?;
///
/// registry.put::<u32>(&[KeyType::of::<i64>()], 7, &KeySequence::of(&1i64))?;
/// assert_eq!(registry.query_all::<u32>(&[KeyType::of::<i64>()])?, vec![&7]);
/// assert!(registry.lookup::<u32>(&[KeyType::of::<bool>()]).is_err());
/// # Ok::<(), metaindex_core::IndexError>(())
/// ```
pub struct IndexRegistry {
    title: String,
    max_depth: usize,
    metamap: CompositeIndex<Box<dyn ErasedIndex>>,
    config: RegistryConfig,
}

/// Collects indexes for [`IndexRegistry::build_with_config`]
pub struct IndexRegistryBuilder {
    title: String,
    indexes: Vec<Box<dyn ErasedIndex>>,
    config: RegistryConfig,
}

impl IndexRegistryBuilder {
    /// Add a typed index
    pub fn index<V: Clone + fmt::Debug + 'static>(mut self, index: CompositeIndex<V>) -> Self {
        self.indexes.push(Box::new(index));
        self
    }

    /// Add an already erased index
    pub fn erased(mut self, index: Box<dyn ErasedIndex>) -> Self {
        self.indexes.push(index);
        self
    }

    /// Use `config` instead of the default configuration
    pub fn config(mut self, config: RegistryConfig) -> Self {
        self.config = config;
        self
    }

    /// Build the registry
    pub fn build(self) -> Result<IndexRegistry> {
        IndexRegistry::build_with_config(self.title, self.indexes, self.config)
    }
}

impl IndexRegistry {
    /// Start collecting indexes for a registry titled `title`
    pub fn builder(title: impl Into<String>) -> IndexRegistryBuilder {
        IndexRegistryBuilder {
            title: title.into(),
            indexes: Vec::new(),
            config: RegistryConfig::default(),
        }
    }

    /// Build a registry with the default configuration
    ///
    /// # Errors
    ///
    /// See [`build_with_config`](Self::build_with_config).
    pub fn build(title: impl Into<String>, indexes: Vec<Box<dyn ErasedIndex>>) -> Result<Self> {
        Self::build_with_config(title, indexes, RegistryConfig::default())
    }

    /// Build a registry over `indexes`
    ///
    /// # Errors
    ///
    /// - `EmptyInput` if `indexes` is empty
    /// - `LimitExceeded` if an index is deeper than `config.limits.max_key_depth`
    /// - `BuildFailure` if two indexes share value type and key types
    pub fn build_with_config(
        title: impl Into<String>,
        indexes: Vec<Box<dyn ErasedIndex>>,
        config: RegistryConfig,
    ) -> Result<Self> {
        let title: String = title.into();
        let deepest = indexes
            .iter()
            .map(|index| index.key_types().len())
            .max()
            .ok_or_else(|| {
                IndexError::empty_input(format!("registry '{}' has no indexes", title))
            })?;
        config.limits.validate_key_depth(deepest)?;

        let max_depth = deepest + 1;
        let metamap_limits = Limits {
            max_key_depth: max_depth,
            ..config.limits.clone()
        };
        let mut metamap = CompositeIndex::with_limits(
            format!("{} metamap", title),
            vec![KeyType::of::<TypeKey>(); max_depth],
            metamap_limits,
        )?;

        let count = indexes.len();
        for index in indexes {
            let signature = signature(index.value_type(), index.key_types(), max_depth);
            let index_title = index.title().to_string();
            if !metamap.put(index, &signature)? {
                return Err(IndexError::BuildFailure {
                    registry: title,
                    index: index_title,
                });
            }
            debug!(
                target: "metaindex::registry",
                registry = %title,
                index = %index_title,
                %signature,
                "Registered index"
            );
        }

        let registry = Self {
            title,
            max_depth,
            metamap,
            config,
        };

        info!(
            target: "metaindex::registry",
            registry = %registry.title,
            indexes = count,
            max_depth,
            autofill_capable = registry.all_indexes_autofill_capable(),
            "Index registry built"
        );
        if registry.config.dump_after_build {
            for dump in registry.dump() {
                debug!(target: "metaindex::registry", registry = %registry.title, "{}", dump);
            }
        }
        Ok(registry)
    }

    /// Registry title
    pub fn title(&self) -> &str {
        &self.title
    }

    /// Number of metamap positions (longest key-type sequence + 1)
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Configuration the registry was built with
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Number of registered indexes
    pub fn len(&self) -> usize {
        self.metamap.size()
    }

    /// Whether no index is registered (never true for a built registry)
    pub fn is_empty(&self) -> bool {
        self.metamap.is_empty()
    }

    /// Whether an index for `V` with exactly `key_types` is registered
    pub fn contains<V: 'static>(&self, key_types: &[KeyType]) -> bool {
        self.lookup::<V>(key_types).is_ok()
    }

    /// The index storing `V` under exactly `key_types`
    ///
    /// # Errors
    ///
    /// `NotFound` naming `V` and the requested key types.
    pub fn lookup<V: 'static>(&self, key_types: &[KeyType]) -> Result<&CompositeIndex<V>> {
        let found = match self.signature_for::<V>(key_types) {
            Some(signature) => self.metamap.get_first(&signature)?,
            None => None,
        };
        found
            .and_then(|index| (**index).downcast_ref::<V>())
            .ok_or_else(|| not_found::<V>(key_types))
    }

    /// Mutable access to the index storing `V` under exactly `key_types`
    pub fn lookup_mut<V: 'static>(
        &mut self,
        key_types: &[KeyType],
    ) -> Result<&mut CompositeIndex<V>> {
        let found = match self.signature_for::<V>(key_types) {
            Some(signature) => self.metamap.get_mut(&signature)?.into_iter().next(),
            None => None,
        };
        found
            .and_then(|index| (**index).downcast_mut::<V>())
            .ok_or_else(|| not_found::<V>(key_types))
    }

    /// Prefix query on the index for `V` and `key_types`
    pub fn query<V: 'static>(
        &self,
        key_types: &[KeyType],
        keys: &KeySequence,
    ) -> Result<Vec<&V>> {
        self.lookup::<V>(key_types)?.get(keys)
    }

    /// Every value of the index for `V` and `key_types`
    pub fn query_all<V: 'static>(&self, key_types: &[KeyType]) -> Result<Vec<&V>> {
        Ok(self.lookup::<V>(key_types)?.select_all())
    }

    /// Query by a concrete first key; `trailing` names the remaining key types
    ///
    /// The index used is the one keyed by `[K, trailing...]`, and every
    /// trailing position is a wildcard.
    pub fn query_by_key<V: 'static, K: IndexKey>(
        &self,
        first: &K,
        trailing: &[KeyType],
    ) -> Result<Vec<&V>> {
        let mut key_types = Vec::with_capacity(trailing.len() + 1);
        key_types.push(KeyType::of::<K>());
        key_types.extend_from_slice(trailing);
        self.lookup::<V>(&key_types)?.get(&KeySequence::of(first))
    }

    /// Put into the index for `V` and `key_types`
    pub fn put<V: 'static>(
        &mut self,
        key_types: &[KeyType],
        value: V,
        keys: &KeySequence,
    ) -> Result<bool> {
        self.lookup_mut::<V>(key_types)?.put(value, keys)
    }

    /// Every index storing values of `value_type`, in key-type order
    pub fn indexes_for(&self, value_type: TypeTag) -> Vec<&dyn ErasedIndex> {
        let prefix = KeySequence::of(&TypeKey::from_tag(value_type));
        match self.metamap.get(&prefix) {
            Ok(found) => found.into_iter().map(|index| &**index).collect(),
            Err(_) => Vec::new(),
        }
    }

    /// Autofill `value` into every autofill-capable index for `V`
    ///
    /// Indexes for `V` without full extraction-rule coverage are skipped.
    /// Every capable index is checked before the first one is written, so an
    /// error leaves all of them unchanged. Returns `Ok(false)` if any of the
    /// autofills reported a rejected put.
    ///
    /// # Errors
    ///
    /// The first error of [`check_autofill`](Self::check_autofill).
    pub fn autofill<V: 'static>(&mut self, value: &V, self_key: Option<&Key>) -> Result<bool> {
        self.check_autofill(value, self_key)?;

        let prefix = KeySequence::of(&TypeKey::of::<V>());
        let candidates = self.metamap.get_mut(&prefix)?;

        let mut all_inserted = true;
        let mut filled = 0usize;
        for index in candidates {
            if !index.is_autofill_capable() {
                debug!(
                    target: "metaindex::registry",
                    index = %index.title(),
                    "Skipping index without full extraction rules"
                );
                continue;
            }
            filled += 1;
            if !index.autofill_any(value as &dyn Any, self_key)? {
                all_inserted = false;
            }
        }

        if filled == 0 {
            debug!(
                target: "metaindex::registry",
                registry = %self.title,
                value_type = %TypeTag::of::<V>(),
                "No autofill-capable index for value type"
            );
        }
        Ok(all_inserted)
    }

    /// Check `value` against every autofill-capable index for `V`
    ///
    /// # Errors
    ///
    /// - `InvalidKey` if `self_key` does not match an index's self-key type
    /// - `LimitExceeded` if an index's fan-out exceeds its limit
    pub fn check_autofill<V: 'static>(&self, value: &V, self_key: Option<&Key>) -> Result<()> {
        let prefix = KeySequence::of(&TypeKey::of::<V>());
        for index in self.metamap.get(&prefix)? {
            if index.is_autofill_capable() {
                index.check_autofill_any(value as &dyn Any, self_key)?;
            }
        }
        Ok(())
    }

    /// Whether at least one index for `value_type` can be autofilled
    pub fn has_autofill_index(&self, value_type: TypeTag) -> bool {
        self.indexes_for(value_type)
            .iter()
            .any(|index| index.is_autofill_capable())
    }

    /// Whether every registered index is autofill capable
    pub fn all_indexes_autofill_capable(&self) -> bool {
        self.metamap
            .select_all()
            .iter()
            .all(|index| index.is_autofill_capable())
    }

    /// Registered indexes in signature order
    pub fn indexes(&self) -> impl Iterator<Item = &dyn ErasedIndex> {
        self.metamap.select_all().into_iter().map(|index| &**index)
    }

    /// Dump of every registered index, in signature order
    pub fn dump(&self) -> Vec<IndexDump> {
        self.indexes().map(|index| index.dump()).collect()
    }

    fn signature_for<V: 'static>(&self, key_types: &[KeyType]) -> Option<KeySequence> {
        if key_types.is_empty() || key_types.len() >= self.max_depth {
            return None;
        }
        Some(signature(TypeTag::of::<V>(), key_types, self.max_depth))
    }
}

/// `[value type, key types..., NoKey...]` of length `depth`
fn signature(value_type: TypeTag, key_types: &[KeyType], depth: usize) -> KeySequence {
    let mut keys = KeySequence::of(&TypeKey::from_tag(value_type));
    for key_type in key_types {
        keys = keys.with(&TypeKey::from_tag(key_type.tag()));
    }
    while keys.len() < depth {
        keys = keys.with(&TypeKey::of::<NoKey>());
    }
    keys
}

fn not_found<V: 'static>(key_types: &[KeyType]) -> IndexError {
    let rendered: Vec<String> = key_types.iter().map(|kt| kt.tag().to_string()).collect();
    IndexError::NotFound {
        value_type: TypeTag::of::<V>().to_string(),
        key_types: format!("[{}]", rendered.join(", ")),
    }
}

impl fmt::Display for IndexRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(
            f,
            "registry '{}' ({} indexes, depth {})",
            self.title,
            self.len(),
            self.max_depth
        )?;
        for dump in self.dump() {
            write!(f, "{}", dump)?;
        }
        Ok(())
    }
}

impl fmt::Debug for IndexRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IndexRegistry")
            .field("title", &self.title)
            .field("max_depth", &self.max_depth)
            .field("indexes", &self.metamap.select_all())
            .finish()
    }
}

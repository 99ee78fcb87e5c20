//! Keys for composite indexes
//!
//! A [`Key`] is one component of a composite index address: a [`KeyType`]
//! (which type produced it, and in which direction it sorts) plus a
//! comparable [`KeyItem`].
//!
//! Anything that can act as a key implements [`IndexKey`]:
//! - scalar keys: `String`, `&'static str`, integers, `bool`
//! - type-identity keys: [`TypeKey`], wrapping a [`TypeTag`]
//! - self-indexing keys: domain values that are indexed on their own and
//!   also address entries of other indexes ([`SelfIndexing`])
//!
//! ## Contract
//!
//! - A stored key never has a null item. An `IndexKey` with no item yields
//!   `None` from [`IndexKey::to_key`] and becomes a null slot in a
//!   [`KeySequence`](crate::KeySequence).
//! - All keys of one key type share one [`SortOrder`].
//! - Keys order by key type first, then by item in the key type's direction.

use crate::types::{SortOrder, TypeTag};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use thiserror::Error;

/// Comparable payload of a key
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum KeyItem {
    /// Boolean item
    Bool(bool),
    /// Signed integer item
    Int(i64),
    /// Unsigned integer item
    UInt(u64),
    /// String item
    Str(String),
    /// Type identity item
    Type(TypeTag),
    /// Lexicographically compared tuple of items
    Tuple(Vec<KeyItem>),
}

impl fmt::Display for KeyItem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeyItem::Bool(b) => write!(f, "{}", b),
            KeyItem::Int(i) => write!(f, "{}", i),
            KeyItem::UInt(u) => write!(f, "{}", u),
            KeyItem::Str(s) => f.write_str(s),
            KeyItem::Type(tag) => write!(f, "{}", tag),
            KeyItem::Tuple(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{}", item)?;
                }
                f.write_str(")")
            }
        }
    }
}

impl From<&str> for KeyItem {
    fn from(s: &str) -> Self {
        KeyItem::Str(s.to_string())
    }
}

impl From<String> for KeyItem {
    fn from(s: String) -> Self {
        KeyItem::Str(s)
    }
}

impl From<i64> for KeyItem {
    fn from(i: i64) -> Self {
        KeyItem::Int(i)
    }
}

impl From<u64> for KeyItem {
    fn from(u: u64) -> Self {
        KeyItem::UInt(u)
    }
}

impl From<bool> for KeyItem {
    fn from(b: bool) -> Self {
        KeyItem::Bool(b)
    }
}

/// Type and direction of a key
///
/// Only obtainable through [`KeyType::of`], so two key types with the same
/// tag always carry the same direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct KeyType {
    tag: TypeTag,
    order: SortOrder,
}

impl KeyType {
    /// Key type of `K`
    pub fn of<K: IndexKey>() -> Self {
        Self {
            tag: TypeTag::of::<K>(),
            order: K::ORDER,
        }
    }

    /// Type tag of the key type
    pub fn tag(&self) -> TypeTag {
        self.tag
    }

    /// Sort direction of the key type
    pub fn order(&self) -> SortOrder {
        self.order
    }

    /// Whether this key type was created from `K`
    pub fn is<K: IndexKey>(&self) -> bool {
        self.tag.is::<K>()
    }
}

impl Ord for KeyType {
    fn cmp(&self, other: &Self) -> Ordering {
        self.tag.cmp(&other.tag)
    }
}

impl PartialOrd for KeyType {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for KeyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tag)?;
        if self.order.is_descending() {
            f.write_str(" desc")?;
        }
        Ok(())
    }
}

/// One component of a composite index address
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Key {
    key_type: KeyType,
    item: KeyItem,
}

impl Key {
    /// Create a key from its type and item
    pub fn new(key_type: KeyType, item: KeyItem) -> Self {
        Self { key_type, item }
    }

    /// Type-identity key for `T`
    pub fn type_key<T: ?Sized + 'static>() -> Self {
        Self::new(KeyType::of::<TypeKey>(), KeyItem::Type(TypeTag::of::<T>()))
    }

    /// Key type of this key
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Comparable item of this key
    pub fn item(&self) -> &KeyItem {
        &self.item
    }

    /// Whether this key was produced by `K`
    pub fn is<K: IndexKey>(&self) -> bool {
        self.key_type.is::<K>()
    }
}

// Ord implementation for BTreeMap key ordering
// Orders by: key type → item (in the key type's direction)
impl Ord for Key {
    fn cmp(&self, other: &Self) -> Ordering {
        self.key_type
            .cmp(&other.key_type)
            .then_with(|| self.key_type.order.apply(self.item.cmp(&other.item)))
    }
}

impl PartialOrd for Key {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Key {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.key_type.tag, self.item)
    }
}

/// Capability contract of every key type
///
/// Implementors expose a single comparable item. Returning `None` marks the
/// key as null; null keys are never stored.
///
/// # Examples
///
/// ```
/// use metaindex_core::{IndexKey, KeyItem, SortOrder};
///
/// struct YearKey(i64);
///
/// impl IndexKey for YearKey {
///     const ORDER: SortOrder = SortOrder::Descending;
///
///     fn key_item(&self) -> Option<KeyItem> {
///         Some(KeyItem::Int(self.0))
///     }
/// }
///
/// let key = YearKey(1990).to_key().unwrap();
/// assert!(key.is::<YearKey>());
/// ```
pub trait IndexKey: 'static {
    /// Sort direction shared by all keys of this type
    const ORDER: SortOrder = SortOrder::Ascending;

    /// Comparable item, or `None` for a null key
    fn key_item(&self) -> Option<KeyItem>;

    /// Key type of `Self`
    fn key_type() -> KeyType
    where
        Self: Sized,
    {
        KeyType::of::<Self>()
    }

    /// Convert into a [`Key`], or `None` for a null key
    fn to_key(&self) -> Option<Key>
    where
        Self: Sized,
    {
        self.key_item()
            .map(|item| Key::new(KeyType::of::<Self>(), item))
    }
}

/// Marker for values that are indexed on their own and also serve as keys
///
/// A self-indexing value's own key (from [`IndexKey::to_key`]) is the self
/// key handed to autofill when the value is inserted into its own indexes.
pub trait SelfIndexing: IndexKey + Clone + fmt::Debug {}

impl IndexKey for String {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Str(self.clone()))
    }
}

impl IndexKey for &'static str {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Str((*self).to_string()))
    }
}

impl IndexKey for i64 {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Int(*self))
    }
}

impl IndexKey for i32 {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Int(i64::from(*self)))
    }
}

impl IndexKey for u32 {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::UInt(u64::from(*self)))
    }
}

impl IndexKey for u64 {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::UInt(*self))
    }
}

impl IndexKey for bool {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Bool(*self))
    }
}

/// Type-identity key
///
/// Wraps a [`TypeTag`] so that types can address entries of an index. The
/// registry keys its index of indexes with these.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TypeKey(TypeTag);

impl TypeKey {
    /// Type-identity key for `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self(TypeTag::of::<T>())
    }

    /// Wrap an existing tag
    pub fn from_tag(tag: TypeTag) -> Self {
        Self(tag)
    }

    /// Wrapped tag
    pub fn tag(&self) -> TypeTag {
        self.0
    }
}

impl IndexKey for TypeKey {
    fn key_item(&self) -> Option<KeyItem> {
        Some(KeyItem::Type(self.0))
    }
}

impl fmt::Display for TypeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Placeholder type marking an unused trailing position
///
/// Type-identity sequences shorter than a registry's depth are padded with
/// `TypeKey::of::<NoKey>()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct NoKey;

/// Key validation errors
///
/// Wrapped by `IndexError::InvalidKey` and `IndexError::InvalidQuery`.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum KeyError {
    /// Key type does not match the key type required at its position
    #[error("key at position {position} has type {found}, expected {expected}")]
    TypeMismatch {
        /// Zero-based position in the key-type sequence
        position: usize,
        /// Required key type
        expected: String,
        /// Key type supplied
        found: String,
    },

    /// Key sequence length does not match the index depth
    #[error("key sequence has {actual} keys, expected {expected}")]
    LengthMismatch {
        /// Index depth
        expected: usize,
        /// Supplied length
        actual: usize,
    },

    /// Query sequence is longer than the index depth
    #[error("key sequence has {actual} keys, index depth is {max}")]
    TooLong {
        /// Supplied length
        actual: usize,
        /// Index depth
        max: usize,
    },
}

impl KeyError {
    /// Short machine-readable reason
    pub fn reason_code(&self) -> &'static str {
        match self {
            KeyError::TypeMismatch { .. } => "type_mismatch",
            KeyError::LengthMismatch { .. } => "length_mismatch",
            KeyError::TooLong { .. } => "too_long",
        }
    }
}

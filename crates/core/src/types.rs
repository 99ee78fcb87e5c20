//! Type identity for metaindex
//!
//! This module defines the foundational identity types:
//! - TypeTag: Stable, ordered identifier of a Rust type
//! - SortOrder: Direction applied when comparing keys of one key type
//!
//! A `TypeTag` is what the registry uses to tell value types and key types
//! apart. It is built from `std::any::TypeId` (identity) and
//! `std::any::type_name` (ordering and display), so tags are cheap to copy,
//! hashable, and sort deterministically by name.

use serde::{Serialize, Serializer};
use std::any::{type_name, TypeId};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Stable identifier of a Rust type
///
/// Two tags are equal iff they were created from the same type.
/// Ordering is by fully qualified type name, then by `TypeId`, which makes
/// iteration over type-keyed maps deterministic across runs of one binary.
#[derive(Clone, Copy)]
pub struct TypeTag {
    id: TypeId,
    name: &'static str,
}

impl TypeTag {
    /// Tag for the type `T`
    pub fn of<T: ?Sized + 'static>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    /// Whether this tag was created from `T`
    pub fn is<T: ?Sized + 'static>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }

    /// Underlying `TypeId`
    pub fn type_id(&self) -> TypeId {
        self.id
    }

    /// Fully qualified type name, e.g. `alloc::string::String`
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Type name without the module path of its leading path, e.g. `String`
    ///
    /// Reference, pointer, tuple and slice syntax in front of the leading path
    /// is kept, and everything after it is kept as reported by the compiler:
    /// `&my::Book` renders as `&Book`, `alloc::vec::Vec<my::Tag>` as
    /// `Vec<my::Tag>` and `(a::X, b::Y)` as `(X, b::Y)`.
    pub fn short_name(&self) -> Cow<'static, str> {
        const PREFIXES: [&str; 7] = ["&mut ", "&", "*const ", "*mut ", "dyn ", "(", "["];

        let name = self.name;
        let mut start = 0;
        while let Some(prefix) = PREFIXES.iter().find(|p| name[start..].starts_with(*p)) {
            start += prefix.len();
        }
        let head_end = name[start..]
            .find(|c: char| matches!(c, '<' | ',' | ';' | ')' | ']' | ' '))
            .map_or(name.len(), |i| start + i);
        match name[start..head_end].rfind("::") {
            Some(i) => Cow::Owned(format!("{}{}", &name[..start], &name[start + i + 2..])),
            None => Cow::Borrowed(name),
        }
    }
}

impl PartialEq for TypeTag {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for TypeTag {}

impl Hash for TypeTag {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

// Ord implementation for BTreeMap key ordering
// Orders by: name → TypeId
impl Ord for TypeTag {
    fn cmp(&self, other: &Self) -> Ordering {
        self.name.cmp(other.name).then(self.id.cmp(&other.id))
    }
}

impl PartialOrd for TypeTag {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Debug for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TypeTag({})", self.name)
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.short_name())
    }
}

impl Serialize for TypeTag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.short_name())
    }
}

/// Comparison direction of a key type
///
/// Every key of a given key type shares the same direction. A descending key
/// type makes `select_all` and prefix queries visit its level from the
/// largest item to the smallest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Smallest item first
    #[default]
    Ascending,
    /// Largest item first
    Descending,
}

impl SortOrder {
    /// Apply this direction to an ascending comparison result
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortOrder::Ascending => ordering,
            SortOrder::Descending => ordering.reverse(),
        }
    }

    /// Whether this is `Descending`
    pub const fn is_descending(self) -> bool {
        matches!(self, SortOrder::Descending)
    }
}

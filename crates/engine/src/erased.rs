//! Object-safe view of a composite index
//!
//! Registries hold indexes of many value types side by side. `ErasedIndex`
//! exposes what a registry needs without the value type parameter; the typed
//! index is recovered with [`downcast_ref`](trait.ErasedIndex.html#method.downcast_ref).

use crate::dump::IndexDump;
use crate::index::CompositeIndex;
use metaindex_core::{IndexError, Key, KeyType, Result, TypeTag};
use std::any::Any;
use std::fmt;

/// Composite index with its value type erased
pub trait ErasedIndex: Any {
    /// Diagnostic title
    fn title(&self) -> &str;

    /// Type of the stored values
    fn value_type(&self) -> TypeTag;

    /// Key-type sequence
    fn key_types(&self) -> &[KeyType];

    /// Number of stored values
    fn size(&self) -> usize;

    /// Whether every key type is covered by an extraction rule
    fn is_autofill_capable(&self) -> bool;

    /// Diagnostic snapshot
    fn dump(&self) -> IndexDump;

    /// Autofill with a value of the index's value type behind `&dyn Any`
    ///
    /// # Errors
    ///
    /// `ValueTypeMismatch` if `value` is not of the value type, plus every
    /// error of `CompositeIndex::autofill`.
    fn autofill_any(&mut self, value: &dyn Any, self_key: Option<&Key>) -> Result<bool>;

    /// Run the checks of [`autofill_any`](Self::autofill_any) without writing
    ///
    /// # Errors
    ///
    /// The errors `autofill_any` would return for the same arguments.
    fn check_autofill_any(&self, value: &dyn Any, self_key: Option<&Key>) -> Result<()>;

    /// Upcast for downcasting to the typed index
    fn as_any(&self) -> &dyn Any;

    /// Mutable upcast for downcasting to the typed index
    fn as_any_mut(&mut self) -> &mut dyn Any;
}

impl<V: Clone + fmt::Debug + 'static> ErasedIndex for CompositeIndex<V> {
    fn title(&self) -> &str {
        CompositeIndex::title(self)
    }

    fn value_type(&self) -> TypeTag {
        CompositeIndex::value_type(self)
    }

    fn key_types(&self) -> &[KeyType] {
        CompositeIndex::key_types(self)
    }

    fn size(&self) -> usize {
        CompositeIndex::size(self)
    }

    fn is_autofill_capable(&self) -> bool {
        CompositeIndex::is_autofill_capable(self)
    }

    fn dump(&self) -> IndexDump {
        CompositeIndex::dump(self)
    }

    fn autofill_any(&mut self, value: &dyn Any, self_key: Option<&Key>) -> Result<bool> {
        let value = downcast_value::<V>(self, value)?;
        self.autofill(value, self_key)
    }

    fn check_autofill_any(&self, value: &dyn Any, self_key: Option<&Key>) -> Result<()> {
        let value = downcast_value::<V>(self, value)?;
        self.check_autofill(value, self_key)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }
}

fn downcast_value<'a, V: 'static>(
    index: &CompositeIndex<V>,
    value: &'a dyn Any,
) -> Result<&'a V> {
    value.downcast_ref::<V>().ok_or_else(|| IndexError::ValueTypeMismatch {
        index: index.title().to_string(),
        expected: index.value_type().to_string(),
        found: "a different type".to_string(),
    })
}

impl dyn ErasedIndex {
    /// Typed view, if the value type is `V`
    pub fn downcast_ref<V: 'static>(&self) -> Option<&CompositeIndex<V>> {
        self.as_any().downcast_ref::<CompositeIndex<V>>()
    }

    /// Mutable typed view, if the value type is `V`
    pub fn downcast_mut<V: 'static>(&mut self) -> Option<&mut CompositeIndex<V>> {
        self.as_any_mut().downcast_mut::<CompositeIndex<V>>()
    }
}

impl fmt::Debug for dyn ErasedIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ErasedIndex")
            .field("title", &self.title())
            .field("value_type", &self.value_type())
            .field("key_types", &self.key_types())
            .field("size", &self.size())
            .finish()
    }
}

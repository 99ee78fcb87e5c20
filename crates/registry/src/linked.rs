//! Linked indexes for self-indexing keys
//!
//! A self-indexing key is a value that is indexed on its own and also serves
//! as a key in other indexes: an author is stored in author indexes and keys
//! book indexes. `LinkedIndexManager` keeps two registries, a primary one for
//! the managed value type and a linked one for the self-indexing types, plus
//! a directory of links. Each link names an accessor on the managed value
//! that returns one or many self-indexing objects.
//!
//! ```text
//! autofill(book)
//!   primary  ── book  → [AuthorKey, YearKey], [TagKey]
//!   link "author"  → author → linked [AuthorKey], [CountryKey]
//!   link "coauthors" → each coauthor → linked [AuthorKey], ...
//! ```
//!
//! A link only takes part in autofill while the linked registry holds at
//! least one autofill-capable index for its type. Cascading stops after one
//! level: linked objects are autofilled, their own links are not followed.

use crate::registry::IndexRegistry;
use metaindex_core::{IndexKey, Key, KeySequence, KeyType, Result, SelfIndexing};
use metaindex_engine::{Arity, CompositeIndex};
use std::collections::BTreeMap;
use std::fmt;
use std::rc::Rc;
use tracing::{debug, info};

/// Directory key of a link: registration number plus accessor name
///
/// The number keeps links distinct when several accessors return the same
/// self-indexing type, or one accessor name is registered twice. Links are
/// ordered by registration number, so the directory iterates in
/// registration order.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LinkId {
    sequence: usize,
    accessor: &'static str,
}

impl LinkId {
    /// Accessor name
    pub fn accessor(&self) -> &'static str {
        self.accessor
    }

    /// Registration number, unique within one manager
    pub fn sequence(&self) -> usize {
        self.sequence
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}#{}", self.accessor, self.sequence)
    }
}

type Feed<V> = Box<dyn Fn(&V, &mut IndexRegistry) -> Result<bool>>;
type Check<V> = Box<dyn Fn(&V, &IndexRegistry) -> Result<()>>;

/// One accessor from the managed value to self-indexing objects
pub struct Link<V> {
    key_type: KeyType,
    arity: Arity,
    feed: Feed<V>,
    check: Check<V>,
}

impl<V> Link<V> {
    /// Key type (and value type) of the linked objects
    pub fn key_type(&self) -> KeyType {
        self.key_type
    }

    /// Whether the accessor yields one object or many
    pub fn arity(&self) -> Arity {
        self.arity
    }
}

impl<V> fmt::Debug for Link<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Link")
            .field("key_type", &self.key_type)
            .field("arity", &self.arity)
            .finish()
    }
}

/// Primary registry for `V` plus a linked registry for self-indexing types
pub struct LinkedIndexManager<V> {
    primary: IndexRegistry,
    linked: IndexRegistry,
    links: BTreeMap<LinkId, Link<V>>,
    next_sequence: usize,
}

impl<V: 'static> LinkedIndexManager<V> {
    /// Manage `primary` (indexes of `V`) and `linked` (self-indexing types)
    pub fn new(primary: IndexRegistry, linked: IndexRegistry) -> Self {
        Self {
            primary,
            linked,
            links: BTreeMap::new(),
            next_sequence: 0,
        }
    }

    /// Register an accessor returning at most one self-indexing object
    pub fn link_one<A, F>(self, accessor: &'static str, extract: F) -> Self
    where
        A: SelfIndexing,
        F: Fn(&V) -> Option<A> + 'static,
    {
        let extract = Rc::new(extract);
        let for_check = Rc::clone(&extract);
        let feed = move |value: &V, linked: &mut IndexRegistry| -> Result<bool> {
            match (*extract)(value) {
                Some(object) => feed_object(&object, linked),
                None => Ok(true),
            }
        };
        let check = move |value: &V, linked: &IndexRegistry| -> Result<()> {
            match (*for_check)(value) {
                Some(object) => check_object(&object, linked),
                None => Ok(()),
            }
        };
        self.register::<A>(accessor, Arity::One, Box::new(feed), Box::new(check))
    }

    /// Register an accessor returning any number of self-indexing objects
    pub fn link_many<A, I, F>(self, accessor: &'static str, extract: F) -> Self
    where
        A: SelfIndexing,
        I: IntoIterator<Item = A>,
        F: Fn(&V) -> I + 'static,
    {
        let extract = Rc::new(extract);
        let for_check = Rc::clone(&extract);
        let feed = move |value: &V, linked: &mut IndexRegistry| -> Result<bool> {
            let mut all_inserted = true;
            for object in (*extract)(value) {
                if !feed_object(&object, linked)? {
                    all_inserted = false;
                }
            }
            Ok(all_inserted)
        };
        let check = move |value: &V, linked: &IndexRegistry| -> Result<()> {
            for object in (*for_check)(value) {
                check_object(&object, linked)?;
            }
            Ok(())
        };
        self.register::<A>(accessor, Arity::Many, Box::new(feed), Box::new(check))
    }

    fn register<A: SelfIndexing>(
        mut self,
        accessor: &'static str,
        arity: Arity,
        feed: Feed<V>,
        check: Check<V>,
    ) -> Self {
        let id = LinkId {
            sequence: self.next_sequence,
            accessor,
        };
        self.next_sequence += 1;

        let key_type = KeyType::of::<A>();
        let active = self.linked.has_autofill_index(key_type.tag());
        info!(
            target: "metaindex::linked",
            link = %id,
            key_type = %key_type,
            active,
            "Registered link"
        );
        self.links.insert(
            id,
            Link {
                key_type,
                arity,
                feed,
                check,
            },
        );
        self
    }

    /// Autofill `value` into the primary registry and cascade into links
    ///
    /// Every active link extracts its objects from `value` and autofills each
    /// into the linked registry with the object's own key as self key. The
    /// primary registry and every active link are checked before anything is
    /// written, so an error leaves both registries unchanged. Returns
    /// `Ok(false)` if any autofill along the way reported a rejected put.
    ///
    /// # Errors
    ///
    /// Propagates the first error of any autofill check.
    pub fn autofill(&mut self, value: &V, self_key: Option<&Key>) -> Result<bool> {
        self.primary.check_autofill(value, self_key)?;
        for (_, link) in self.active() {
            (link.check)(value, &self.linked)?;
        }

        let mut all_inserted = self.primary.autofill(value, self_key)?;

        let Self { linked, links, .. } = self;
        for (id, link) in links.iter() {
            if !linked.has_autofill_index(link.key_type.tag()) {
                continue;
            }
            if !(link.feed)(value, &mut *linked)? {
                debug!(
                    target: "metaindex::linked",
                    link = %id,
                    "Linked autofill partially rejected"
                );
                all_inserted = false;
            }
        }
        Ok(all_inserted)
    }

    /// Every link in registration order
    pub fn links(&self) -> impl Iterator<Item = (&LinkId, &Link<V>)> {
        self.links.iter()
    }

    /// Links that currently take part in autofill, in registration order
    pub fn active_links(&self) -> Vec<&LinkId> {
        self.active().map(|(id, _)| id).collect()
    }

    fn active(&self) -> impl Iterator<Item = (&LinkId, &Link<V>)> {
        self.links
            .iter()
            .filter(|(_, link)| self.linked.has_autofill_index(link.key_type.tag()))
    }

    /// Registry of `V` indexes
    pub fn primary(&self) -> &IndexRegistry {
        &self.primary
    }

    /// Mutable registry of `V` indexes
    pub fn primary_mut(&mut self) -> &mut IndexRegistry {
        &mut self.primary
    }

    /// Registry of self-indexing types
    pub fn linked(&self) -> &IndexRegistry {
        &self.linked
    }

    /// Mutable registry of self-indexing types
    pub fn linked_mut(&mut self) -> &mut IndexRegistry {
        &mut self.linked
    }

    /// Index for `T` and `key_types`, searched in the primary registry first
    ///
    /// # Errors
    ///
    /// `NotFound` if neither registry holds a matching index.
    pub fn lookup<T: 'static>(&self, key_types: &[KeyType]) -> Result<&CompositeIndex<T>> {
        match self.primary.lookup::<T>(key_types) {
            Err(e) if e.is_not_found() => self.linked.lookup::<T>(key_types),
            found => found,
        }
    }

    /// Prefix query on the index for `T` and `key_types` in either registry
    pub fn query<T: 'static>(&self, key_types: &[KeyType], keys: &KeySequence) -> Result<Vec<&T>> {
        self.lookup::<T>(key_types)?.get(keys)
    }

    /// Every value of the index for `T` and `key_types` in either registry
    pub fn query_all<T: 'static>(&self, key_types: &[KeyType]) -> Result<Vec<&T>> {
        Ok(self.lookup::<T>(key_types)?.select_all())
    }

    /// Query by a concrete first key in either registry
    pub fn query_by_key<T: 'static, K: IndexKey>(
        &self,
        first: &K,
        trailing: &[KeyType],
    ) -> Result<Vec<&T>> {
        match self.primary.query_by_key::<T, K>(first, trailing) {
            Err(e) if e.is_not_found() => self.linked.query_by_key::<T, K>(first, trailing),
            found => found,
        }
    }
}

fn feed_object<A: SelfIndexing>(object: &A, linked: &mut IndexRegistry) -> Result<bool> {
    let self_key = object.to_key();
    linked.autofill(object, self_key.as_ref())
}

fn check_object<A: SelfIndexing>(object: &A, linked: &IndexRegistry) -> Result<()> {
    let self_key = object.to_key();
    linked.check_autofill(object, self_key.as_ref())
}

impl<V> fmt::Debug for LinkedIndexManager<V> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LinkedIndexManager")
            .field("primary", &self.primary)
            .field("linked", &self.linked)
            .field("links", &self.links)
            .finish()
    }
}

//! Type-layout caching.
//!
//! Computing a layout measures every title and pin label, so results are
//! memoized per element type in a [`TypeLayoutCache`]. Entries are checked
//! against the live type on every hit: if the pin counts or the title have
//! drifted, the entry is evicted and recomputed.
//!
//! Each open document has its own cache. [`DocumentCaches`] keeps the active
//! document's cache at hand and stashes the others until their documents are
//! activated again or closed.

use std::{collections::HashMap, mem, rc::Rc};

use log::{debug, info};

use circuitry_core::{
    identifier::Id,
    semantic::{Element, ElementKind},
};

use crate::layout::{LayoutContext, LayoutError, LayoutInfo, compute_layout};

/// Cache key of an element's layout.
///
/// Leaves share the layout of their type. A group's layout depends on its
/// own sub-elements, so groups are keyed by element id; element ids must
/// therefore be unique across the whole document, nested groups included
/// (see [`Circuit::find_duplicate_id`]).
///
/// [`Circuit::find_duplicate_id`]: circuitry_core::semantic::Circuit::find_duplicate_id
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayoutKey {
    /// A registered element type
    Type(Id),
    /// A group element
    Group(Id),
}

impl LayoutKey {
    pub fn for_element(element: &Element) -> Self {
        match element.kind() {
            ElementKind::Leaf(type_id) => Self::Type(*type_id),
            ElementKind::Group(_) => Self::Group(element.id()),
        }
    }
}

/// How a lookup was served.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LookupOutcome {
    /// Valid cached entry
    Hit,
    /// No entry; computed and stored
    Miss,
    /// Entry no longer matched the live type; evicted and recomputed
    Stale,
}

/// Lookup counters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CacheStats {
    /// Lookups served from the cache
    pub hits: u64,
    /// Layouts computed, including recomputations of stale entries
    pub computations: u64,
    /// Entries evicted because they no longer matched their type
    pub stale_evictions: u64,
}

/// Theme and settings state a set of layouts was computed with.
///
/// The theme part is the theme's identity stamp and the settings part a
/// counter owned by the engine. They are compared as a pair, never summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Revision {
    pub(crate) theme: u64,
    pub(crate) settings: u64,
}

/// Layouts of one document, keyed by [`LayoutKey`].
#[derive(Debug, Default)]
pub struct TypeLayoutCache {
    entries: HashMap<LayoutKey, Rc<LayoutInfo>>,
    stats: CacheStats,
    /// Revision of the theme and settings the entries were computed with
    revision: Revision,
}

impl TypeLayoutCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn stats(&self) -> CacheStats {
        self.stats
    }

    pub fn contains(&self, key: LayoutKey) -> bool {
        self.entries.contains_key(&key)
    }

    /// Returns the cached entry for `key` without validating it.
    pub fn peek(&self, key: LayoutKey) -> Option<&Rc<LayoutInfo>> {
        self.entries.get(&key)
    }

    /// Returns the layout of `element`, computing it on a miss.
    ///
    /// A hit is validated against the element's live type; a mismatch evicts
    /// the entry and reports [`LookupOutcome::Stale`].
    ///
    /// # Errors
    ///
    /// Returns [`LayoutError`] if the element's type is unknown or the
    /// computation fails. The cache is left without an entry for the key.
    pub fn lookup(
        &mut self,
        element: &Element,
        ctx: &LayoutContext<'_>,
    ) -> Result<(Rc<LayoutInfo>, LookupOutcome), LayoutError> {
        let key = LayoutKey::for_element(element);
        let ty = ctx.resolve_type(element)?;

        let mut outcome = LookupOutcome::Miss;
        if let Some(info) = self.entries.get(&key) {
            if info.matches(ty) {
                self.stats.hits += 1;
                return Ok((Rc::clone(info), LookupOutcome::Hit));
            }

            debug!(
                key:?,
                cached_inputs = info.num_inputs(),
                cached_outputs = info.num_outputs(),
                cached_title = info.title();
                "Evicting stale layout"
            );
            self.entries.remove(&key);
            self.stats.stale_evictions += 1;
            outcome = LookupOutcome::Stale;
        }

        let info = Rc::new(compute_layout(element, ctx)?);
        self.stats.computations += 1;
        self.entries.insert(key, Rc::clone(&info));
        debug!(key:?, outcome:?; "Cached layout");

        Ok((info, outcome))
    }

    /// Removes the entry for `key`, returning whether there was one.
    pub fn invalidate(&mut self, key: LayoutKey) -> bool {
        self.entries.remove(&key).is_some()
    }

    /// Removes all entries.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub(crate) fn revision(&self) -> Revision {
        self.revision
    }

    /// Drops all entries if they were computed for a different revision.
    ///
    /// Returns `true` if entries were dropped.
    pub(crate) fn sync_revision(&mut self, revision: Revision) -> bool {
        if self.revision == revision {
            return false;
        }
        self.revision = revision;
        let had_entries = !self.entries.is_empty();
        self.entries.clear();
        had_entries
    }
}

/// Per-document layout caches.
///
/// # Examples
///
/// ```
/// # use circuitry::layout::DocumentCaches;
/// # use circuitry_core::identifier::Id;
/// let mut caches = DocumentCaches::new();
/// caches.activate(Id::new("a.toml"));
/// assert_eq!(caches.active(), Some(Id::new("a.toml")));
///
/// caches.activate(Id::new("b.toml"));
/// assert_eq!(caches.stashed_len(), 1);
///
/// caches.close(Id::new("a.toml"));
/// assert_eq!(caches.stashed_len(), 0);
/// ```
#[derive(Debug, Default)]
pub struct DocumentCaches {
    current: TypeLayoutCache,
    stash: HashMap<Id, TypeLayoutCache>,
    active: Option<Id>,
}

impl DocumentCaches {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the cache of the active document.
    pub fn current(&self) -> &TypeLayoutCache {
        &self.current
    }

    pub fn current_mut(&mut self) -> &mut TypeLayoutCache {
        &mut self.current
    }

    pub fn active(&self) -> Option<Id> {
        self.active
    }

    /// Returns the number of caches held for inactive documents.
    pub fn stashed_len(&self) -> usize {
        self.stash.len()
    }

    /// Makes `document` the active document.
    ///
    /// The outgoing document's cache is stashed. The incoming document gets
    /// its stashed cache back, or an empty one if it has none.
    pub fn activate(&mut self, document: Id) {
        if self.active == Some(document) {
            return;
        }
        self.stash_current();

        self.current = self.stash.remove(&document).unwrap_or_else(|| {
            debug!(document:%; "No cache for document, starting empty");
            TypeLayoutCache::new()
        });
        self.active = Some(document);
        info!(document:%, entries = self.current.len(); "Activated document");
    }

    /// Stashes the active document's cache and leaves no document active.
    pub fn deactivate(&mut self) {
        self.stash_current();
        self.current = TypeLayoutCache::new();
        self.active = None;
    }

    /// Drops the cache of a closed document.
    ///
    /// Closing the active document also resets the current cache, so nothing
    /// computed for it is stashed later.
    pub fn close(&mut self, document: Id) {
        self.stash.remove(&document);
        if self.active == Some(document) {
            self.active = None;
            self.current = TypeLayoutCache::new();
        }
        debug!(document:%; "Dropped document cache");
    }

    fn stash_current(&mut self) {
        let current = mem::take(&mut self.current);
        match self.active {
            Some(previous) => {
                self.stash.insert(previous, current);
            }
            None => drop(current),
        }
    }
}

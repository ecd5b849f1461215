use std::rc::Rc;

use ahash::AHashSet;
use egui::Id;

use crate::drag_target::DragTargetCallback;
use crate::drop_target::DropTargetCallback;

/// Anything that can live in a [`Registry`].
pub(crate) trait Keyed {
    fn key(&self) -> Id;
}

impl Keyed for dyn DragTargetCallback {
    fn key(&self) -> Id {
        self.id()
    }
}

impl Keyed for dyn DropTargetCallback {
    fn key(&self) -> Id {
        self.id()
    }
}

/// Insertion-ordered callbacks keyed by [`Id`].
///
/// Later entries are considered on top of earlier ones, so hit-tests walk the registry backwards.
/// Within a frame the order follows the order of registration, so a zone that registers before
/// laying out its children stays below them.
pub(crate) struct Registry<C: ?Sized + Keyed> {
    entries: Vec<Rc<C>>,
    seen_this_frame: AHashSet<Id>,

    /// `entries[..seen_prefix]` are the entries registered this frame, in registration order.
    seen_prefix: usize,
}

impl<C: ?Sized + Keyed> Default for Registry<C> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
            seen_this_frame: AHashSet::default(),
            seen_prefix: 0,
        }
    }
}

impl<C: ?Sized + Keyed> Registry<C> {
    /// Add `entry` unless its id is already present. Either way it counts as seen this frame.
    ///
    /// The first registration of a frame moves an existing entry behind everything registered
    /// before it this frame; the existing `Rc` is kept. Returns `true` if the entry is new.
    pub(crate) fn register(&mut self, entry: Rc<C>) -> bool {
        let id = entry.key();
        let existing = self.entries.iter().position(|entry| entry.key() == id);
        if existing.is_some() && self.seen_this_frame.contains(&id) {
            return false;
        }
        self.seen_this_frame.insert(id);

        // Unseen entries all live after `seen_prefix`, so removing one keeps the prefix intact.
        let (entry, is_new) = match existing {
            Some(index) => (self.entries.remove(index), false),
            None => (entry, true),
        };
        self.entries.insert(self.seen_prefix, entry);
        self.seen_prefix += 1;
        is_new
    }

    pub(crate) fn unregister(&mut self, id: Id) -> Option<Rc<C>> {
        self.seen_this_frame.remove(&id);
        let index = self.entries.iter().position(|entry| entry.key() == id)?;
        if index < self.seen_prefix {
            self.seen_prefix -= 1;
        }
        Some(self.entries.remove(index))
    }

    pub(crate) fn contains(&self, id: Id) -> bool {
        self.entries.iter().any(|entry| entry.key() == id)
    }

    pub(crate) fn get(&self, id: Id) -> Option<&Rc<C>> {
        self.entries.iter().find(|entry| entry.key() == id)
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }

    pub(crate) fn iter(&self) -> std::slice::Iter<'_, Rc<C>> {
        self.entries.iter()
    }

    /// Last-registered first.
    pub(crate) fn iter_topmost_first(&self) -> impl Iterator<Item = &Rc<C>> {
        self.entries.iter().rev()
    }

    /// Clone of the current entries, so callbacks can't invalidate the iteration.
    pub(crate) fn snapshot(&self) -> Vec<Rc<C>> {
        self.entries.clone()
    }

    pub(crate) fn begin_frame(&mut self) {
        self.seen_this_frame.clear();
        self.seen_prefix = 0;
    }

    /// Remove every entry that was not registered since [`Self::begin_frame`].
    pub(crate) fn end_frame(&mut self) -> Vec<Rc<C>> {
        let seen = &self.seen_this_frame;
        let (kept, stale): (Vec<_>, Vec<_>) = self
            .entries
            .drain(..)
            .partition(|entry| seen.contains(&entry.key()));
        self.entries = kept;
        self.seen_prefix = self.entries.len();
        stale
    }

    pub(crate) fn clear(&mut self) -> Vec<Rc<C>> {
        self.seen_this_frame.clear();
        self.seen_prefix = 0;
        std::mem::take(&mut self.entries)
    }
}

impl<C: ?Sized + Keyed> std::fmt::Debug for Registry<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list()
            .entries(self.entries.iter().map(|entry| entry.key()))
            .finish()
    }
}

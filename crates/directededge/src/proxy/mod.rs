//! Lazily filled, change-tracking containers for item fields.
//!
//! A [`ContainerProxy`] stands in for one field of an item. It may or may
//! not hold the value last fetched from the server, and it separately
//! records the additions and removals made since, so that a save can send
//! only the difference.
//!
//! # Invariants
//!
//! - The add queue and the removal queue never share a key.
//! - Both queues are keyed: queuing the same key twice keeps one entry
//!   (the latest, for the add queue).
//! - Reads never fetch. An unloaded proxy reads as the net effect of its
//!   queues; a loaded one reads as the loaded value with every mutation
//!   already merged in.

mod link;

pub use link::LinkProxy;

use std::fmt;

use tracing::trace;

use crate::model::{Link, LinkKey, Property};

/// A value that can live in a [`ContainerProxy`].
///
/// Entries are matched by key: for plain lists the key is the value itself,
/// for properties it is the name and for links the target plus link type.
pub trait Entry: Clone + fmt::Debug {
    type Key: Clone + Eq + fmt::Debug;

    fn key(&self) -> Self::Key;

    fn has_key(&self, key: &Self::Key) -> bool {
        self.key() == *key
    }

    /// Builds the entry that identifies `key` in a removal document.
    fn from_key(key: Self::Key) -> Self;
}

impl Entry for String {
    type Key = String;

    fn key(&self) -> String {
        self.clone()
    }

    fn has_key(&self, key: &String) -> bool {
        self == key
    }

    fn from_key(key: String) -> Self {
        key
    }
}

impl Entry for Property {
    type Key = String;

    fn key(&self) -> String {
        self.name.clone()
    }

    fn has_key(&self, key: &String) -> bool {
        self.name == *key
    }

    fn from_key(key: String) -> Self {
        Property::new(key, "")
    }
}

impl Entry for Link {
    type Key = LinkKey;

    fn key(&self) -> LinkKey {
        Link::key(self)
    }

    fn has_key(&self, key: &LinkKey) -> bool {
        self.target == key.target && self.options.link_type == key.link_type
    }

    fn from_key(key: LinkKey) -> Self {
        let mut link = Link::new(key.target);
        link.options.link_type = key.link_type;
        link
    }
}

/// Inserts `entry`, overwriting an entry with the same key in place.
fn upsert<E: Entry>(entries: &mut Vec<E>, entry: E) {
    let key = entry.key();
    match entries.iter_mut().find(|e| e.has_key(&key)) {
        Some(slot) => *slot = entry,
        None => entries.push(entry),
    }
}

/// Removes the entry with `key`. Returns true if one was present.
fn remove_key<E: Entry>(entries: &mut Vec<E>, key: &E::Key) -> bool {
    let before = entries.len();
    entries.retain(|e| !e.has_key(key));
    entries.len() != before
}

/// Deferred, diffable collection backing one item field.
#[derive(Debug, Clone)]
pub struct ContainerProxy<E: Entry> {
    loaded: Option<Vec<E>>,
    add_queue: Vec<E>,
    remove_queue: Vec<E>,
}

impl<E: Entry> Default for ContainerProxy<E> {
    fn default() -> Self {
        Self {
            loaded: None,
            add_queue: Vec::new(),
            remove_queue: Vec::new(),
        }
    }
}

impl<E: Entry> ContainerProxy<E> {
    /// Creates an unloaded proxy with empty queues.
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an addition. An entry with the same key is overwritten, and a
    /// pending removal of that key is dropped.
    pub fn add(&mut self, entry: impl Into<E>) {
        let entry = entry.into();
        let key = entry.key();
        trace!(?key, "queue add");

        if let Some(loaded) = self.loaded.as_mut() {
            upsert(loaded, entry.clone());
        }
        remove_key(&mut self.remove_queue, &key);
        upsert(&mut self.add_queue, entry);
    }

    /// Records a removal. If an addition of the same key is still pending
    /// the two cancel out and nothing is queued.
    pub fn remove(&mut self, key: impl Into<E::Key>) {
        let key = key.into();

        if let Some(loaded) = self.loaded.as_mut() {
            remove_key(loaded, &key);
        }
        if remove_key(&mut self.add_queue, &key) {
            trace!(?key, "removal cancels pending add");
            return;
        }
        trace!(?key, "queue removal");
        if !self.remove_queue.iter().any(|e| e.has_key(&key)) {
            self.remove_queue.push(E::from_key(key));
        }
    }

    /// Replaces the loaded value wholesale.
    ///
    /// Pending queues are left alone and replayed over the new value, so a
    /// read after a lazy fill still shows local changes.
    pub fn set(&mut self, raw: Vec<E>) {
        let mut loaded = raw;
        for entry in &self.add_queue {
            upsert(&mut loaded, entry.clone());
        }
        for entry in &self.remove_queue {
            remove_key(&mut loaded, &entry.key());
        }
        self.loaded = Some(loaded);
    }

    /// Returns true once a value has been loaded, even an empty one.
    pub fn is_cached(&self) -> bool {
        self.loaded.is_some()
    }

    /// The loaded value, if any.
    pub fn cached(&self) -> Option<&[E]> {
        self.loaded.as_deref()
    }

    /// Drops the loaded value and both queues. The next read through the
    /// owning item fetches again.
    pub fn clear(&mut self) {
        self.loaded = None;
        self.clear_queues();
    }

    /// Drops both queues, keeping the loaded value.
    pub fn clear_queues(&mut self) {
        self.add_queue.clear();
        self.remove_queue.clear();
    }

    pub fn add_queue(&self) -> &[E] {
        &self.add_queue
    }

    pub fn remove_queue(&self) -> &[E] {
        &self.remove_queue
    }

    /// Returns true if either queue holds anything.
    pub fn has_pending(&self) -> bool {
        !self.add_queue.is_empty() || !self.remove_queue.is_empty()
    }

    fn view(&self) -> &[E] {
        // Queues are disjoint, so without a base the net view is the adds.
        self.loaded.as_deref().unwrap_or(&self.add_queue)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, E> {
        self.view().iter()
    }

    pub fn len(&self) -> usize {
        self.view().len()
    }

    pub fn is_empty(&self) -> bool {
        self.view().is_empty()
    }

    pub fn contains(&self, key: impl Into<E::Key>) -> bool {
        self.get(key).is_some()
    }

    pub fn get(&self, key: impl Into<E::Key>) -> Option<&E> {
        let key = key.into();
        self.view().iter().find(|e| e.has_key(&key))
    }

    pub fn to_vec(&self) -> Vec<E> {
        self.view().to_vec()
    }
}

impl<'a, E: Entry> IntoIterator for &'a ContainerProxy<E> {
    type Item = &'a E;
    type IntoIter = std::slice::Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

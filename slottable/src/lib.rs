//! ## Slot Table
//!
//! A `SlotTable` stores values under ids that it mints itself from a
//! counter.  An id names exactly one entry for that entry's whole
//! lifetime: removing the entry retires the id rather than recycling
//! it, so a stale id can never silently refer to some newer value.
//! The counter only moves forwards; `clear` is the one operation that
//! rewinds it.
//!
//! ```
//! use slottable::SlotTable;
//!
//! let mut table = SlotTable::new();
//! let first = table.insert("first");
//! assert_eq!(table.remove(first), Some("first"));
//!
//! let second = table.insert("second");
//! assert_ne!(first, second);
//! assert_eq!(table.get(first), None);
//! ```

use rustc_hash::FxHashMap;
use std::fmt;

/// Names one entry of a `SlotTable`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SlotId(u64);

impl SlotId {
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for SlotId {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> Result<(), fmt::Error> {
        write!(fmt, "slot #{}", self.0)
    }
}

#[derive(Clone, Debug)]
pub struct SlotTable<T> {
    entries: FxHashMap<SlotId, T>,
    next: u64,
}

impl<T> Default for SlotTable<T> {
    fn default() -> Self {
        Self {
            entries: FxHashMap::default(),
            next: 0,
        }
    }
}

impl<T> SlotTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a table with room for `capacity` live entries before
    /// it needs to reallocate.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: FxHashMap::with_capacity_and_hasher(capacity, Default::default()),
            next: 0,
        }
    }

    /// Store `value` under a freshly minted id and return that id.
    pub fn insert(&mut self, value: T) -> SlotId {
        let id = SlotId(self.next);
        self.next = self
            .next
            .checked_add(1)
            .expect("SlotTable exhausted its id space");
        self.entries.insert(id, value);
        id
    }

    pub fn get(&self, id: SlotId) -> Option<&T> {
        self.entries.get(&id)
    }

    pub fn get_mut(&mut self, id: SlotId) -> Option<&mut T> {
        self.entries.get_mut(&id)
    }

    pub fn contains(&self, id: SlotId) -> bool {
        self.entries.contains_key(&id)
    }

    /// Remove the entry for `id`.  The id is retired; subsequent
    /// inserts will never mint it again (short of a `clear`).
    pub fn remove(&mut self, id: SlotId) -> Option<T> {
        self.entries.remove(&id)
    }

    /// The id that the next call to `insert` will mint.
    pub fn next_id(&self) -> SlotId {
        SlotId(self.next)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn reserve(&mut self, additional: usize) {
        self.entries.reserve(additional);
    }

    /// Visit the live entries.  The order is unspecified; callers
    /// that need a stable order should sort by id.
    pub fn iter(&self) -> impl Iterator<Item = (SlotId, &T)> {
        self.entries.iter().map(|(&id, value)| (id, value))
    }

    /// Drop every entry and rewind the id counter, leaving the table
    /// indistinguishable from a new one.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.next = 0;
    }
}

//! ## Alias Map
//!
//! An `AliasMap` lets any number of keys, called aliases, resolve to one
//! shared value.  Aliases can be removed one at a time, in which case
//! the value lives on for as long as some alias still refers to it, or
//! the value can be removed together with every one of its aliases.
//!
//! ```
//! use aliasmap::AliasMap;
//!
//! let mut colors = AliasMap::new();
//! colors.set("red", 0xff0000);
//! colors.add_alias("red", "crimson");
//! colors.add_alias("red", "scarlet");
//!
//! assert_eq!(colors.get("scarlet"), Some(&0xff0000));
//! assert_eq!(colors.number_of_aliases_for("red", false), 2);
//!
//! // The value survives while any alias remains
//! assert_eq!(colors.remove_alias("red"), Some(0xff0000));
//! assert_eq!(colors.get("crimson"), Some(&0xff0000));
//!
//! // ...and removing the value removes every alias
//! assert_eq!(colors.remove_value("crimson"), Some(0xff0000));
//! assert!(!colors.has("scarlet"));
//! assert!(colors.is_empty());
//! ```
//!
//! Internally the values live in a `SlotTable`, keyed by ids that are
//! never reused, and a hash map resolves each alias to the id of its
//! group.  Aliases never hold references to one another or to the
//! shared value.

use log::{debug, trace};
use slottable::SlotTable;
use std::borrow::Borrow;
use std::collections::hash_map::RandomState;
use std::collections::HashMap;
use std::fmt;
use std::hash::{BuildHasher, Hash};

mod error;
mod validate;

pub use error::{Error, Result};
pub use slottable::SlotId;

/// A value together with the aliases that resolve to it, in the order
/// in which they were attached.
#[derive(Clone)]
struct Group<A, V> {
    value: V,
    aliases: Vec<A>,
}

/// What became of a group after one of its aliases was detached.
enum Detached<V> {
    /// Other aliases remain; the group lives on in this slot.
    Shrunk(SlotId),
    /// That was the last alias; this is the value the group held.
    Dropped(V),
}

/// A map in which many aliases resolve to a single shared value.
///
/// `A` is the alias type and must provide `Eq` and `Hash` that agree
/// with each other, just as for the keys of a `HashMap`.  Operations
/// that compare two values (`set` and `add_alias`) additionally need
/// `V: PartialEq`, and that equality is the one they report.
#[derive(Clone)]
pub struct AliasMap<A, V, S = RandomState> {
    resolution: HashMap<A, SlotId, S>,
    groups: SlotTable<Group<A, V>>,
}

impl<A, V> AliasMap<A, V, RandomState> {
    pub fn new() -> Self {
        Self::with_hasher(RandomState::new())
    }

    /// Create a map with room for `aliases` aliases before the
    /// resolution table needs to reallocate.
    pub fn with_capacity(aliases: usize) -> Self {
        Self::with_capacity_and_hasher(aliases, RandomState::new())
    }
}

impl<A, V, S: Default> Default for AliasMap<A, V, S> {
    fn default() -> Self {
        Self::with_hasher(S::default())
    }
}

impl<A, V, S> AliasMap<A, V, S> {
    /// Create a map that hashes aliases using `hasher`.
    pub fn with_hasher(hasher: S) -> Self {
        Self {
            resolution: HashMap::with_hasher(hasher),
            groups: SlotTable::new(),
        }
    }

    pub fn with_capacity_and_hasher(aliases: usize, hasher: S) -> Self {
        Self {
            resolution: HashMap::with_capacity_and_hasher(aliases, hasher),
            groups: SlotTable::new(),
        }
    }

    pub fn hasher(&self) -> &S {
        self.resolution.hasher()
    }

    /// Returns the number of values stored in the map.  This is not
    /// the number of aliases; see `alias_count` for that.
    pub fn size(&self) -> usize {
        self.groups.len()
    }

    /// Same as `size`.
    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Returns the number of aliases registered across all values.
    pub fn alias_count(&self) -> usize {
        self.resolution.len()
    }

    /// Remove every value and alias.  Slot ids start over from the
    /// beginning, so the map is indistinguishable from a new one.
    pub fn clear(&mut self) {
        debug!(
            "clearing {} groups and {} aliases",
            self.groups.len(),
            self.resolution.len()
        );
        self.resolution.clear();
        self.groups.clear();
    }
}

impl<A, V, S> AliasMap<A, V, S>
where
    A: Eq + Hash,
    S: BuildHasher,
{
    fn slot_of<Q>(&self, alias: &Q) -> Option<SlotId>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.resolution.get(alias).copied()
    }

    fn group_of<Q>(&self, alias: &Q) -> Option<&Group<A, V>>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.groups.get(self.slot_of(alias)?)
    }

    /// Returns the value that `alias` resolves to.
    pub fn get<Q>(&self, alias: &Q) -> Option<&V>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.group_of(alias).map(|group| &group.value)
    }

    /// Returns a mutable reference to the value that `alias` resolves
    /// to.  Edits made through it are seen via every alias of the value.
    pub fn get_mut<Q>(&mut self, alias: &Q) -> Option<&mut V>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(alias)?;
        self.groups.get_mut(slot).map(|group| &mut group.value)
    }

    pub fn has<Q>(&self, alias: &Q) -> bool
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.resolution.contains_key(alias)
    }

    fn insert_group(&mut self, alias: A, value: V) -> SlotId
    where
        A: Clone,
    {
        let slot = self.groups.insert(Group {
            value,
            aliases: vec![alias.clone()],
        });
        self.resolution.insert(alias, slot);
        trace!("created group in {}", slot);
        slot
    }

    /// Ensure that `alias` resolves to `value`.
    ///
    /// An unknown alias becomes the first alias of a new value.  If
    /// `alias` is already known nothing is changed, and the return
    /// value reports whether the existing value equals `value`.
    /// Returns true if and only if `get(alias)` now yields something
    /// equal to `value`.
    pub fn set(&mut self, alias: A, value: V) -> bool
    where
        A: Clone,
        V: PartialEq,
    {
        match self.get(&alias) {
            Some(existing) => *existing == value,
            None => {
                self.insert_group(alias, value);
                true
            }
        }
    }

    /// Make `alias` resolve to `value`, even if that means detaching
    /// it from the value it currently resolves to.  Detaching follows
    /// the rules of `remove_alias`: the old value is discarded only if
    /// `alias` was its last alias.  `alias` is always the sole alias
    /// of the new value.  Always returns true.
    pub fn set_force(&mut self, alias: A, value: V) -> bool
    where
        A: Clone,
    {
        self.detach(&alias);
        self.insert_group(alias, value);
        true
    }

    /// Attach `new` as an additional alias for the value that
    /// `existing` resolves to.
    ///
    /// Returns false without change if `existing` is unknown.  If
    /// `new` is already known it is left where it is, and the result
    /// reports whether both aliases resolve to equal values.
    pub fn add_alias<Q>(&mut self, existing: &Q, new: A) -> bool
    where
        A: Borrow<Q> + Clone,
        Q: Hash + Eq + ?Sized,
        V: PartialEq,
    {
        let slot = match self.slot_of(existing) {
            Some(slot) => slot,
            None => return false,
        };

        if let Some(other) = self.slot_of::<A>(&new) {
            return match (self.groups.get(other), self.groups.get(slot)) {
                (Some(a), Some(b)) => a.value == b.value,
                _ => false,
            };
        }

        match self.groups.get_mut(slot) {
            Some(group) => {
                group.aliases.push(new.clone());
                trace!(
                    "attached alias to {}; {} now resolve to it",
                    slot,
                    group.aliases.len()
                );
                self.resolution.insert(new, slot);
                true
            }
            None => false,
        }
    }

    /// Accepts the same arguments and has the same effect as
    /// `add_alias`.  In particular, an already known `new` alias is
    /// never moved over to the value of `existing`.
    pub fn add_alias_force<Q>(&mut self, existing: &Q, new: A) -> bool
    where
        A: Borrow<Q> + Clone,
        Q: Hash + Eq + ?Sized,
        V: PartialEq,
    {
        self.add_alias(existing, new)
    }

    /// Replace the value that `alias` resolves to, returning the value
    /// that was displaced.  Every alias of the value sees the change.
    pub fn modify<Q>(&mut self, alias: &Q, value: V) -> Option<V>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.get_mut(alias)
            .map(|existing| std::mem::replace(existing, value))
    }

    fn detach<Q>(&mut self, alias: &Q) -> Option<Detached<V>>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.resolution.remove(alias)?;
        let group = self.groups.get_mut(slot)?;
        if let Some(index) = group.aliases.iter().position(|a| a.borrow() == alias) {
            group.aliases.remove(index);
        }

        if group.aliases.is_empty() {
            debug!("last alias detached; dropping group in {}", slot);
            self.groups
                .remove(slot)
                .map(|group| Detached::Dropped(group.value))
        } else {
            trace!(
                "detached alias from {}; {} remain",
                slot,
                group.aliases.len()
            );
            Some(Detached::Shrunk(slot))
        }
    }

    /// Remove a single alias, returning the value it resolved to.
    ///
    /// Removing the last alias of a value removes the value too, and it
    /// is handed back by move.  Otherwise the value stays in the map for
    /// its remaining aliases and a clone of it is returned.
    pub fn remove_alias<Q>(&mut self, alias: &Q) -> Option<V>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
        V: Clone,
    {
        match self.detach(alias)? {
            Detached::Dropped(value) => Some(value),
            Detached::Shrunk(slot) => self.groups.get(slot).map(|group| group.value.clone()),
        }
    }

    /// Remove the value that `alias` resolves to along with all of its
    /// aliases, returning the value.
    pub fn remove_value<Q>(&mut self, alias: &Q) -> Option<V>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        let slot = self.slot_of(alias)?;
        let group = self.groups.remove(slot)?;
        for alias in &group.aliases {
            self.resolution.remove::<A>(alias);
        }
        debug!(
            "dropped group in {} with {} aliases",
            slot,
            group.aliases.len()
        );
        Some(group.value)
    }

    /// Returns every alias of the value that `alias` resolves to, in
    /// the order they were attached, without copying them.
    pub fn aliases_of<Q>(&self, alias: &Q) -> Option<&[A]>
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        self.group_of(alias).map(|group| group.aliases.as_slice())
    }

    /// Returns the aliases of the value that `alias` resolves to, in
    /// the order they were attached.  When `include_provided` is false
    /// `alias` itself is left out, which costs a scan of the group.
    pub fn list_aliases<Q>(&self, alias: &Q, include_provided: bool) -> Option<Vec<A>>
    where
        A: Borrow<Q> + Clone,
        Q: Hash + Eq + ?Sized,
    {
        let aliases = self.aliases_of(alias)?;
        if include_provided {
            Some(aliases.to_vec())
        } else {
            Some(
                aliases
                    .iter()
                    .filter(|a| (*a).borrow() != alias)
                    .cloned()
                    .collect(),
            )
        }
    }

    /// Returns how many aliases the value that `alias` resolves to has,
    /// not counting `alias` itself unless `include_provided` is set.
    /// Unknown aliases yield zero.
    pub fn number_of_aliases_for<Q>(&self, alias: &Q, include_provided: bool) -> usize
    where
        A: Borrow<Q>,
        Q: Hash + Eq + ?Sized,
    {
        match self.aliases_of(alias) {
            None => 0,
            Some(aliases) if include_provided => aliases.len(),
            Some(aliases) => aliases.len().saturating_sub(1),
        }
    }

    /// Reserve room for at least `additional` more aliases.
    pub fn reserve(&mut self, additional: usize) {
        self.resolution.reserve(additional);
    }
}

impl<A: fmt::Debug, V: fmt::Debug, S> fmt::Debug for AliasMap<A, V, S> {
    fn fmt(&self, fmt: &mut fmt::Formatter) -> fmt::Result {
        let mut groups: Vec<(SlotId, &Group<A, V>)> = self.groups.iter().collect();
        groups.sort_by_key(|(slot, _)| *slot);
        fmt.debug_map()
            .entries(
                groups
                    .into_iter()
                    .map(|(_, group)| (&group.aliases, &group.value)),
            )
            .finish()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use pretty_assertions::assert_eq;

    fn map() -> AliasMap<&'static str, &'static str> {
        let mut map = AliasMap::new();
        map.set("p1", "X");
        map.add_alias("p1", "s1");
        map.add_alias("p1", "s2");
        map
    }

    #[test]
    fn get_unknown() {
        let map = map();
        assert_eq!(map.get("nope"), None);
        assert!(!map.has("nope"));
    }

    #[test]
    fn set_new_alias() {
        let mut map = AliasMap::new();
        assert!(map.set("a", 1));
        assert_eq!(map.get("a"), Some(&1));
        assert_eq!(map.size(), 1);
        assert_eq!(map.alias_count(), 1);
    }

    #[test]
    fn set_is_idempotent() {
        let mut map = AliasMap::new();
        assert!(map.set("a", 1));
        assert!(map.set("a", 1));
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn set_conflict_leaves_value() {
        let mut map = AliasMap::new();
        map.set("a", 1);
        assert!(!map.set("a", 2));
        assert_eq!(map.get("a"), Some(&1));
    }

    #[test]
    fn set_force_detaches_from_shared_group() {
        let mut map = map();
        assert!(map.set_force("s1", "Y"));
        assert_eq!(map.get("s1"), Some(&"Y"));
        assert_eq!(map.get("p1"), Some(&"X"));
        assert_eq!(map.aliases_of("p1"), Some(&["p1", "s2"][..]));
        assert_eq!(map.aliases_of("s1"), Some(&["s1"][..]));
        assert_eq!(map.size(), 2);
    }

    #[test]
    fn set_force_replaces_sole_alias_group() {
        let mut map = AliasMap::new();
        map.set("a", 1);
        assert!(map.set_force("a", 2));
        assert_eq!(map.get("a"), Some(&2));
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn add_alias_to_unknown() {
        let mut map: AliasMap<&str, i32> = AliasMap::new();
        assert!(!map.add_alias("a", "b"));
        assert!(!map.has("b"));
    }

    #[test]
    fn add_alias_already_known() {
        let mut map = AliasMap::new();
        map.set("a", 1);
        map.set("b", 1);
        map.set("c", 2);

        // Equal values: reported as satisfied, but the groups stay apart
        assert!(map.add_alias("a", "b"));
        assert_eq!(map.number_of_aliases_for("a", true), 1);
        assert_eq!(map.size(), 3);

        assert!(!map.add_alias("a", "c"));
        assert_eq!(map.get("c"), Some(&2));

        // Already in the same group
        map.add_alias("a", "d");
        assert!(map.add_alias("d", "a"));
        assert_eq!(map.aliases_of("a"), Some(&["a", "d"][..]));
    }

    #[test]
    fn add_alias_force_does_not_move_known_alias() {
        let mut map = AliasMap::new();
        map.set("a", 1);
        map.set("b", 2);
        assert!(!map.add_alias_force("a", "b"));
        assert_eq!(map.get("b"), Some(&2));
        assert_eq!(map.number_of_aliases_for("a", true), 1);

        assert!(map.add_alias_force("a", "c"));
        assert_eq!(map.get("c"), Some(&1));
    }

    #[test]
    fn modify_is_seen_by_all_aliases() {
        let mut map = map();
        assert_eq!(map.modify("s2", "Z"), Some("X"));
        assert_eq!(map.get("p1"), Some(&"Z"));
        assert_eq!(map.get("s1"), Some(&"Z"));
        assert_eq!(map.modify("nope", "Q"), None);
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn get_mut_edits_shared_value() {
        let mut map = AliasMap::new();
        map.set("a".to_owned(), vec![1]);
        map.add_alias("a", "b".to_owned());
        if let Some(value) = map.get_mut("b") {
            value.push(2);
        }
        assert_eq!(map.get("a"), Some(&vec![1, 2]));
    }

    #[test]
    fn remove_alias_keeps_group() {
        let mut map = map();
        assert_eq!(map.remove_alias("s1"), Some("X"));
        assert!(!map.has("s1"));
        assert_eq!(map.aliases_of("p1"), Some(&["p1", "s2"][..]));
        assert_eq!(map.size(), 1);
    }

    #[test]
    fn remove_last_alias_drops_group() {
        let mut map = AliasMap::new();
        map.set("a", 1);
        map.set("b", 2);
        assert_eq!(map.remove_alias("a"), Some(1));
        assert!(!map.has("a"));
        assert_eq!(map.size(), 1);
        assert_eq!(map.remove_alias("a"), None);
    }

    #[test]
    fn remove_value_drops_every_alias() {
        let mut map = map();
        map.set("other", "Y");
        assert_eq!(map.remove_value("s2"), Some("X"));
        for alias in &["p1", "s1", "s2"] {
            assert!(!map.has(alias));
        }
        assert_eq!(map.size(), 1);
        assert_eq!(map.alias_count(), 1);
        assert_eq!(map.remove_value("p1"), None);
    }

    #[test]
    fn list_aliases() {
        let map = map();
        assert_eq!(map.list_aliases("s1", true), Some(vec!["p1", "s1", "s2"]));
        assert_eq!(map.list_aliases("s1", false), Some(vec!["p1", "s2"]));
        assert_eq!(map.list_aliases("nope", true), None);
    }

    #[test]
    fn list_aliases_does_not_mutate_group() {
        let map = map();
        map.list_aliases("p1", false);
        assert_eq!(map.list_aliases("p1", true), Some(vec!["p1", "s1", "s2"]));
        assert_eq!(map.number_of_aliases_for("p1", true), 3);
    }

    #[test]
    fn number_of_aliases_for() {
        let map = map();
        assert_eq!(map.number_of_aliases_for("s1", true), 3);
        assert_eq!(map.number_of_aliases_for("s1", false), 2);
        assert_eq!(map.number_of_aliases_for("nope", true), 0);
        assert_eq!(map.number_of_aliases_for("nope", false), 0);
    }

    #[test]
    fn clear_resets() {
        let mut map = map();
        map.clear();
        assert_eq!(map.size(), 0);
        assert!(map.is_empty());
        for alias in &["p1", "s1", "s2"] {
            assert!(!map.has(alias));
        }
        assert_eq!(map.groups.next_id().as_u64(), 0);

        assert!(map.set("p1", "Y"));
        assert_eq!(map.get("p1"), Some(&"Y"));
        assert_eq!(map.number_of_aliases_for("p1", true), 1);
    }

    #[test]
    fn reused_alias_gets_fresh_slot() {
        let mut map = AliasMap::new();
        map.set("a", 1);
        let first = map.slot_of("a");
        map.remove_value("a");
        map.set("a", 1);
        assert!(map.slot_of("a") != first);
    }

    #[test]
    fn owned_keys_with_borrowed_lookups() {
        let mut map: AliasMap<String, u32> = AliasMap::with_capacity(4);
        map.set("one".to_owned(), 1);
        map.add_alias("one", "uno".to_owned());
        assert_eq!(map.get("uno"), Some(&1));
        assert_eq!(map.list_aliases("uno", false), Some(vec!["one".to_owned()]));
    }

    #[test]
    fn debug_lists_groups_in_creation_order() {
        let mut map = AliasMap::new();
        map.set("b", 2);
        map.set("a", 1);
        map.add_alias("b", "bb");
        assert_eq!(format!("{:?}", map), r#"{["b", "bb"]: 2, ["a"]: 1}"#);
    }

    #[test]
    fn default_with_custom_hasher() {
        use std::collections::hash_map::DefaultHasher;
        use std::hash::BuildHasherDefault;

        let mut map: AliasMap<u8, u8, BuildHasherDefault<DefaultHasher>> = AliasMap::default();
        map.set(1, 10);
        map.add_alias(&1, 2);
        assert_eq!(map.get(&2), Some(&10));
    }
}

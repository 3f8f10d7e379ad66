// Copyright 2025 the Chartloom Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

extern crate alloc;

use alloc::string::String;

use hashbrown::HashMap;

/// Stable identity of a mark across scene ticks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Creates an id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Groups marks by owner (typically one layer per chart component).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

/// Interns `(scope, key)` pairs into [`MarkId`]s.
///
/// The arena is owned by a single chart instance. The same scope and key always map to the
/// same id for the lifetime of the arena, so marks keep their identity when the data they are
/// derived from is re-ordered, filtered, or refreshed.
#[derive(Debug, Default)]
pub struct IdArena {
    scopes: HashMap<&'static str, HashMap<String, MarkId>>,
    next: u64,
}

impl IdArena {
    /// Creates an empty arena.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the id for `key` within `scope`, allocating one on first use.
    pub fn id(&mut self, scope: &'static str, key: &str) -> MarkId {
        let entries = self.scopes.entry(scope).or_default();
        if let Some(id) = entries.get(key) {
            return *id;
        }
        self.next += 1;
        let id = MarkId(self.next);
        entries.insert(String::from(key), id);
        id
    }

    /// Returns the id for a two-part key (for example a group and a point key).
    pub fn id2(&mut self, scope: &'static str, a: &str, b: &str) -> MarkId {
        let mut key = String::with_capacity(a.len() + b.len() + 1);
        key.push_str(a);
        // Unit separator; cannot collide with ordinary labels.
        key.push('\u{1f}');
        key.push_str(b);
        self.id(scope, &key)
    }

    /// Looks up an existing id without allocating.
    pub fn get(&self, scope: &'static str, key: &str) -> Option<MarkId> {
        self.scopes.get(scope)?.get(key).copied()
    }

    /// Number of ids handed out so far.
    pub fn len(&self) -> usize {
        self.scopes.values().map(HashMap::len).sum()
    }

    /// Returns `true` if no ids were handed out.
    pub fn is_empty(&self) -> bool {
        self.next == 0
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn same_key_same_id() {
        let mut ids = IdArena::new();
        let a = ids.id("line", "A");
        let b = ids.id("line", "B");
        assert_ne!(a, b, "distinct keys get distinct ids");
        assert_eq!(ids.id("line", "A"), a, "ids are stable per key");
        assert_ne!(ids.id("dot", "A"), a, "scopes are independent");
        assert_eq!(ids.len(), 3, "three ids allocated");
    }

    #[test]
    fn composite_keys_do_not_collide() {
        let mut ids = IdArena::new();
        let a = ids.id2("dot", "ab", "c");
        let b = ids.id2("dot", "a", "bc");
        assert_ne!(a, b, "separator keeps parts apart");
        assert_eq!(ids.get("dot", "ab\u{1f}c"), Some(a), "lookup matches id2");
    }
}

//! # Identifier Registry
//!
//! Maps arbitrary external identifiers (names, numbers, numeric strings) to
//! dense sequential numeric identifiers, scoped per entity kind. The engine
//! addresses everything by small positive integers; the registry owns the
//! translation and guarantees it is stable within one encode call.
//!
//! A registry is request-scoped mutable state: one instance per encode call,
//! never shared. Sharing an instance across concurrent encodes races the
//! counters and corrupts id assignment.

use crate::types::RsHashMap;
use rustc_hash::FxHashSet;

/// Entity-kind namespaces for id assignment
///
/// Ids are unique and dense within one kind; ids of distinct kinds may
/// coincide in value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum IdKind {
    Room,
    Offering,
    Config,
    Subpart,
    Instructor,
    Meeting,
    Constraint,
    Student,
}

/// Id assignment policy, fixed at construction
///
/// A registry applies exactly one policy for its whole lifetime; mixing
/// policies across components fed by the same ids risks collisions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IdPolicy {
    /// Every new key gets the next unused integer, starting at 1
    #[default]
    Sequential,
    /// Keys that are positive numeric strings keep their value; everything
    /// else falls back to sequential assignment
    ///
    /// A passthrough value bumps the sequential counter past itself, and a
    /// numeric key whose value is already taken is assigned sequentially, so
    /// the two paths cannot hand out the same id.
    PassthroughNumeric,
}

/// Per-kind mapping from external keys to dense numeric ids
#[derive(Debug, Default)]
pub struct IdRegistry {
    policy: IdPolicy,
    maps: RsHashMap<IdKind, RsHashMap<String, u32>>,
    taken: RsHashMap<IdKind, FxHashSet<u32>>,
    next: RsHashMap<IdKind, u32>,
}

impl IdRegistry {
    /// Creates an empty registry with the given policy
    #[must_use]
    pub fn new(policy: IdPolicy) -> IdRegistry {
        IdRegistry {
            policy,
            ..IdRegistry::default()
        }
    }

    /// Returns the id for `key` in the `kind` namespace, assigning one on
    /// first sight
    ///
    /// Repeat calls with the same `(kind, key)` always return the same id.
    pub fn get_or_create(&mut self, kind: IdKind, key: &str) -> u32 {
        if let Some(&id) = self.maps.get(&kind).and_then(|m| m.get(key)) {
            return id;
        }
        let id = match self.policy {
            IdPolicy::Sequential => self.next_free(kind),
            IdPolicy::PassthroughNumeric => match key.parse::<u32>() {
                Ok(n) if n > 0 && !self.is_taken(kind, n) => {
                    let next = self.next.entry(kind).or_insert(1);
                    if n >= *next {
                        *next = n + 1;
                    }
                    n
                }
                _ => self.next_free(kind),
            },
        };
        self.taken.entry(kind).or_default().insert(id);
        self.maps.entry(kind).or_default().insert(key.to_string(), id);
        id
    }

    /// Assigns the next id in the `kind` namespace without recording a key
    ///
    /// Used for entities that have no external identity of their own, such as
    /// generated constraints.
    pub fn fresh(&mut self, kind: IdKind) -> u32 {
        let id = self.next_free(kind);
        self.taken.entry(kind).or_default().insert(id);
        id
    }

    /// Looks up an already-assigned id without creating one
    #[must_use]
    pub fn lookup(&self, kind: IdKind, key: &str) -> Option<u32> {
        self.maps.get(&kind).and_then(|m| m.get(key)).copied()
    }

    /// Number of ids assigned in the `kind` namespace
    #[must_use]
    pub fn len(&self, kind: IdKind) -> usize {
        self.taken.get(&kind).map_or(0, FxHashSet::len)
    }

    /// Whether the `kind` namespace has no assigned ids
    #[must_use]
    pub fn is_empty(&self, kind: IdKind) -> bool {
        self.len(kind) == 0
    }

    fn next_free(&mut self, kind: IdKind) -> u32 {
        let next = self.next.entry(kind).or_insert(1);
        let id = *next;
        *next += 1;
        id
    }

    fn is_taken(&self, kind: IdKind, id: u32) -> bool {
        self.taken.get(&kind).is_some_and(|s| s.contains(&id))
    }
}

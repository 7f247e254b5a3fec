// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Hash-consing for ropes.

use std::hash::Hash;

use rustc_hash::FxHashMap;
use smallvec::SmallVec;

use super::Rope;

/// Hands back one shared rope for every run of equal content it has seen.
///
/// Lookups go by the rope's cached content hash, so interning a rope that
/// was hashed before costs one table probe plus an equality check against
/// any colliding entries.
pub struct Interner<T> {
    table: FxHashMap<u32, SmallVec<[Rope<T>; 1]>>,
    len: usize,
    hits: usize,
}

impl<T> Default for Interner<T> {
    fn default() -> Self {
        return Interner {
            table: FxHashMap::default(),
            len: 0,
            hits: 0,
        };
    }
}

impl<T: Clone + PartialEq + Hash> Interner<T> {
    pub fn new() -> Interner<T> {
        return Interner::default();
    }

    /// The interned rope equal to `rope`, adding `rope` if there is none.
    pub fn intern(&mut self, rope: Rope<T>) -> Rope<T> {
        let bucket = self.table.entry(rope.hash_code()).or_default();
        if let Some(found) = bucket.iter().find(|candidate| **candidate == rope) {
            self.hits += 1;
            return found.clone();
        }
        bucket.push(rope.clone());
        self.len += 1;
        return rope;
    }

    /// Number of distinct ropes held.
    pub fn len(&self) -> usize {
        return self.len;
    }

    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// Number of `intern` calls answered with an existing rope.
    pub fn hits(&self) -> usize {
        return self.hits;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_content_shares_one_rope() {
        let mut interner = Interner::new();
        let first = interner.intern(Rope::from_slice(&[1, 2, 3]));
        let built = Rope::from_slice(&[1]).append(&Rope::from_slice(&[2, 3]));
        let second = interner.intern(built);
        assert!(Rope::ptr_eq(&first, &second));
        assert_eq!(interner.len(), 1);
        assert_eq!(interner.hits(), 1);
    }

    #[test]
    fn different_content_is_kept_apart() {
        let mut interner = Interner::new();
        let a = interner.intern(Rope::from_slice(&[1, 2]));
        let b = interner.intern(Rope::from_slice(&[2, 1]));
        assert!(!Rope::ptr_eq(&a, &b));
        assert_eq!(interner.len(), 2);
        assert_eq!(interner.hits(), 0);
        assert!(!interner.is_empty());
    }
}

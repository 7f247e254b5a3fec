// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Immutable sequences with cheap concatenation and slicing.
//!
//! A `Rope<T>` is a balanced tree of segments: flat leaves of up to
//! `CHUNK_SIZE` elements, runs of one repeated value, and ranges of a
//! generator function. Every operation returns a new rope and leaves the
//! receiver alone; unchanged subtrees are shared between the two.
//!
//! # Example
//!
//! ```
//! use strand::rope::Rope;
//!
//! let rope = Rope::from_slice(&[1, 2, 3]);
//! let rope = rope.insert_slice(1, &[9, 9]).unwrap();
//! assert_eq!(rope.to_vec(), vec![1, 9, 9, 2, 3]);
//! assert_eq!(rope.index_of(&9), Some(1));
//! ```
//!
//! Ropes handed out by this module are always sealed. Equal content hashes
//! equally regardless of how the rope was built:
//!
//! ```
//! use strand::rope::Rope;
//!
//! let flat = Rope::from_slice(&[1, 2, 3]);
//! let built = Rope::from_slice(&[1])
//!     .append(&Rope::from_slice(&[2]))
//!     .append(&Rope::from_slice(&[3]));
//! assert_eq!(flat, built);
//! assert_eq!(flat.hash_code(), built.hash_code());
//! ```

mod chunk;

pub(crate) mod balance;
pub mod cursor;
pub mod intern;
pub(crate) mod node;

use std::borrow::Cow;
use std::fmt;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;

use crate::error::RopeError;

use self::cursor::Cursor;
use self::cursor::Iter;
use self::node::Node;

pub use self::balance::SLACK;

/// Maximum number of elements in one leaf.
pub const CHUNK_SIZE: usize = 16;

/// Checks `start..start + count` against `len` and returns the end.
pub(crate) fn check_range(start: usize, count: usize, len: usize) -> Result<usize, RopeError> {
    match start.checked_add(count) {
        Some(end) if end <= len => return Ok(end),
        _ => return Err(RopeError::InvalidRange { start, count, len }),
    }
}

pub(crate) fn check_index(index: usize, len: usize) -> Result<(), RopeError> {
    if index >= len {
        return Err(RopeError::IndexOutOfRange { index, len });
    }
    return Ok(());
}

/// Checks an insertion point, which may equal `len`.
pub(crate) fn check_position(index: usize, len: usize) -> Result<(), RopeError> {
    if index > len {
        return Err(RopeError::IndexOutOfRange { index, len });
    }
    return Ok(());
}

/// An immutable sequence.
pub struct Rope<T> {
    root: Arc<Node<T>>,
}

impl<T> Clone for Rope<T> {
    fn clone(&self) -> Self {
        return Rope {
            root: self.root.clone(),
        };
    }
}

impl<T> Rope<T> {
    /// Seal `root` and wrap it.
    pub(crate) fn from_root(root: Arc<Node<T>>) -> Rope<T> {
        root.seal();
        return Rope { root };
    }

    pub(crate) fn root(&self) -> &Arc<Node<T>> {
        return &self.root;
    }

    pub fn new() -> Rope<T> {
        return Rope { root: Node::empty() };
    }

    pub fn len(&self) -> usize {
        return self.root.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    /// Height of the underlying tree. Zero for a single segment.
    pub fn height(&self) -> usize {
        return self.root.height() as usize;
    }

    pub fn is_sealed(&self) -> bool {
        return self.root.is_sealed();
    }

    /// True when both ropes share the same root node.
    pub fn ptr_eq(a: &Rope<T>, b: &Rope<T>) -> bool {
        return Arc::ptr_eq(&a.root, &b.root);
    }

    /// Seal this rope. Ropes are sealed on construction, so this returns a
    /// handle to the same root.
    pub fn seal(&self) -> Rope<T> {
        return Rope::from_root(self.root.clone());
    }

    /// `count` copies of `value`, stored once.
    pub fn repeat(count: usize, value: T) -> Rope<T> {
        return Rope::from_root(Node::run(count, value));
    }
}

impl<T: Clone + PartialEq> Rope<T> {
    pub fn from_slice(items: &[T]) -> Rope<T> {
        return Rope::from_root(balance::build(items));
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> Result<Cow<'_, T>, RopeError> {
        check_index(index, self.len())?;
        return Ok(self.root.item(index));
    }

    /// A rope with `other` inserted before `index`.
    pub fn insert(&self, index: usize, other: &Rope<T>) -> Result<Rope<T>, RopeError> {
        check_position(index, self.len())?;
        let front = balance::slice(&self.root, 0, index);
        let back = balance::slice(&self.root, index, self.len());
        let root = balance::join(balance::join(front, other.root.clone()), back);
        return Ok(Rope::from_root(root));
    }

    pub fn insert_slice(&self, index: usize, items: &[T]) -> Result<Rope<T>, RopeError> {
        return self.insert(index, &Rope::from_slice(items));
    }

    /// A rope without the `count` elements starting at `start`.
    pub fn remove(&self, start: usize, count: usize) -> Result<Rope<T>, RopeError> {
        let end = check_range(start, count, self.len())?;
        let front = balance::slice(&self.root, 0, start);
        let back = balance::slice(&self.root, end, self.len());
        return Ok(Rope::from_root(balance::join(front, back)));
    }

    /// The `count` elements starting at `start`.
    pub fn copy(&self, start: usize, count: usize) -> Result<Rope<T>, RopeError> {
        let end = check_range(start, count, self.len())?;
        return Ok(Rope::from_root(balance::slice(&self.root, start, end)));
    }

    pub fn append(&self, other: &Rope<T>) -> Rope<T> {
        return Rope::from_root(balance::join(self.root.clone(), other.root.clone()));
    }

    /// A rope with `item` added at the end. Repeated pushes fill the tail
    /// leaf in place while nothing else has extended it.
    pub fn push(&self, item: T) -> Rope<T> {
        return Rope::from_root(balance::join(self.root.clone(), Node::leaf(&[item])));
    }

    /// A rope with the element at `index` replaced.
    pub fn set(&self, index: usize, item: T) -> Result<Rope<T>, RopeError> {
        check_index(index, self.len())?;
        return self.set_range(index, &[item]);
    }

    /// A rope with `items` written over the elements starting at `start`.
    pub fn set_range(&self, start: usize, items: &[T]) -> Result<Rope<T>, RopeError> {
        let end = check_range(start, items.len(), self.len())?;
        let front = balance::slice(&self.root, 0, start);
        let back = balance::slice(&self.root, end, self.len());
        let root = balance::join(balance::join(front, balance::build(items)), back);
        return Ok(Rope::from_root(root));
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        return self.iter().position(|x| x == *item);
    }

    pub fn last_index_of(&self, item: &T) -> Option<usize> {
        return self.iter().rposition(|x| x == *item);
    }

    pub fn contains(&self, item: &T) -> bool {
        return self.index_of(item).is_some();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        return Iter::new(&self.root);
    }

    /// A cursor starting at `index`, clamped to the length.
    pub fn cursor(&self, index: usize) -> Cursor<'_, T> {
        return Cursor::new(&self.root, index);
    }

    pub fn to_vec(&self) -> Vec<T> {
        return self.iter().collect();
    }
}

impl<T: Clone + PartialEq + Send + Sync + 'static> Rope<T> {
    /// The rope `generator(start), ..., generator(start + count - 1)`,
    /// evaluated on access.
    pub fn function<F>(start: usize, count: usize, generator: F) -> Rope<T>
    where
        F: Fn(usize) -> T + Send + Sync + 'static,
    {
        return Rope::from_root(Node::function(start, count, Arc::new(generator)));
    }

    /// A lazy view applying `f` to every element. The result holds on to
    /// this rope and calls `f` on each access.
    pub fn map<U, F>(&self, f: F) -> Rope<U>
    where
        U: Clone + PartialEq + Send + Sync + 'static,
        F: Fn(&T) -> U + Send + Sync + 'static,
    {
        let source = self.clone();
        return Rope::function(0, self.len(), move |index| f(&source.root.item(index)));
    }
}

impl<T: Hash> Rope<T> {
    /// Content hash, cached on the tree after the first call.
    pub fn hash_code(&self) -> u32 {
        return self.root.hash_code();
    }
}

impl<T> Default for Rope<T> {
    fn default() -> Self {
        return Rope::new();
    }
}

impl<T: Clone + PartialEq> PartialEq for Rope<T> {
    fn eq(&self, other: &Rope<T>) -> bool {
        if Rope::ptr_eq(self, other) {
            return true;
        }
        return self.len() == other.len() && self.iter().eq(other.iter());
    }
}

impl<T: Clone + Eq> Eq for Rope<T> {}

impl<T: Hash> Hash for Rope<T> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len());
        state.write_u32(self.hash_code());
    }
}

impl<T: Clone + PartialEq + fmt::Debug> fmt::Debug for Rope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        return f.debug_list().entries(self.iter()).finish();
    }
}

/// Writes the elements back to back, so a `Rope<char>` prints as text.
impl<T: Clone + PartialEq + fmt::Display> fmt::Display for Rope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for item in self.iter() {
            write!(f, "{}", item)?;
        }
        return Ok(());
    }
}

impl<T: Clone + PartialEq> From<&[T]> for Rope<T> {
    fn from(items: &[T]) -> Self {
        return Rope::from_slice(items);
    }
}

impl<T: Clone + PartialEq> From<Vec<T>> for Rope<T> {
    fn from(items: Vec<T>) -> Self {
        return Rope::from_slice(&items);
    }
}

impl<T: Clone + PartialEq> FromIterator<T> for Rope<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let items: Vec<T> = iter.into_iter().collect();
        return Rope::from_slice(&items);
    }
}

impl<'a, T: Clone + PartialEq> IntoIterator for &'a Rope<T> {
    type Item = T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Iter<'a, T> {
        return self.iter();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rope(items: &[u32]) -> Rope<u32> {
        return Rope::from_slice(items);
    }

    #[test]
    fn insert_remove_copy() {
        let base = rope(&[0, 1, 2, 3, 4]);
        let grown = base.insert(2, &rope(&[7, 8])).unwrap();
        assert_eq!(grown.to_vec(), vec![0, 1, 7, 8, 2, 3, 4]);
        assert_eq!(base.to_vec(), vec![0, 1, 2, 3, 4]);

        let shrunk = grown.remove(1, 3).unwrap();
        assert_eq!(shrunk.to_vec(), vec![0, 2, 3, 4]);
        assert_eq!(grown.copy(2, 2).unwrap().to_vec(), vec![7, 8]);
    }

    #[test]
    fn out_of_range_is_rejected() {
        let base = rope(&[1, 2, 3]);
        assert_eq!(base.get(3).unwrap_err(), RopeError::IndexOutOfRange { index: 3, len: 3 });
        assert_eq!(
            base.insert(4, &Rope::new()).unwrap_err(),
            RopeError::IndexOutOfRange { index: 4, len: 3 }
        );
        assert_eq!(
            base.remove(2, 2).unwrap_err(),
            RopeError::InvalidRange { start: 2, count: 2, len: 3 }
        );
        assert_eq!(
            base.copy(usize::MAX, 2).unwrap_err(),
            RopeError::InvalidRange { start: usize::MAX, count: 2, len: 3 }
        );
        assert!(base.insert(3, &rope(&[4])).is_ok());
    }

    #[test]
    fn equal_content_hashes_equal() {
        let flat = rope(&[1, 2, 3]);
        let built = rope(&[1]).append(&rope(&[2])).append(&rope(&[3]));
        assert_eq!(flat, built);
        assert_eq!(flat.hash_code(), built.hash_code());

        let runs = Rope::repeat(2, 5u32).append(&Rope::repeat(1, 5));
        assert_eq!(runs.hash_code(), rope(&[5, 5, 5]).hash_code());
    }

    #[test]
    fn seal_is_idempotent() {
        let rope = rope(&[1, 2, 3]).append(&rope(&[4; 20]));
        assert!(rope.is_sealed());
        let hash = rope.hash_code();
        let height = rope.height();
        let again = rope.seal();
        assert!(Rope::ptr_eq(&rope, &again));
        assert_eq!(again.hash_code(), hash);
        assert_eq!(again.height(), height);
    }

    #[test]
    fn repeat_and_function() {
        let run = Rope::repeat(4, 'x');
        assert_eq!(run.to_string(), "xxxx");
        let squares = Rope::function(1, 4, |i| i * i);
        assert_eq!(squares.to_vec(), vec![1, 4, 9, 16]);
        assert_eq!(*squares.get(2).unwrap(), 9);
    }

    #[test]
    fn map_is_lazy_view() {
        let base = rope(&[1, 2, 3]);
        let doubled = base.map(|x| x * 2);
        assert_eq!(doubled.to_vec(), vec![2, 4, 6]);
        assert_eq!(doubled.len(), 3);
    }

    #[test]
    fn set_keeps_length() {
        let base = rope(&[1, 2, 3, 4]);
        let changed = base.set(1, 9).unwrap().set_range(2, &[7, 7]).unwrap();
        assert_eq!(changed.to_vec(), vec![1, 9, 7, 7]);
        assert!(base.set_range(3, &[0, 0]).is_err());
    }

    #[test]
    fn push_fills_tail_leaf() {
        let mut rope = Rope::new();
        for i in 0..100u32 {
            rope = rope.push(i);
        }
        assert_eq!(rope.to_vec(), (0..100).collect::<Vec<_>>());
        // Pushing onto an older version must not disturb the newer one.
        let older = rope.copy(0, 50).unwrap();
        let forked = older.push(999);
        assert_eq!(forked.get(50).unwrap().into_owned(), 999);
        assert_eq!(*rope.get(50).unwrap(), 50);
    }

    #[test]
    fn search_both_ends() {
        let rope = rope(&[3, 1, 4, 1, 5]);
        assert_eq!(rope.index_of(&1), Some(1));
        assert_eq!(rope.last_index_of(&1), Some(3));
        assert!(!rope.contains(&9));
    }

    #[test]
    fn display_and_debug() {
        let text: Rope<char> = "hello".chars().collect();
        assert_eq!(text.to_string(), "hello");
        assert_eq!(format!("{:?}", rope(&[1, 2])), "[1, 2]");
    }
}

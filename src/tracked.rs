// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Ropes that record their own edits.
//!
//! A `TrackedRope` pairs a rope with the edit log that produced it. Every
//! operation returns a new `TrackedRope` whose edit extends the old one, so
//! positions captured against any earlier version can be rebased onto it.
//!
//! ```
//! use strand::adjust::Direction;
//! use strand::history::position::Position;
//! use strand::tracked::TrackedRope;
//!
//! let text = TrackedRope::from_slice(&['a', 'b', 'c', 'd', 'e']);
//! let mark = Position::new(&text, 3, Direction::Positive);
//! let text = text.remove(1, 2).unwrap();
//! assert_eq!(mark.get_index(&text), Some(1));
//! ```

use std::borrow::Cow;

use crate::error::RopeError;
use crate::history::edit::Edit;
use crate::history::edit::Editable;
use crate::rope::Rope;

/// A rope plus the edit log leading to it.
#[derive(Clone)]
pub struct TrackedRope<T> {
    rope: Rope<T>,
    edit: Edit,
    base_len: usize,
}

impl<T: Clone + PartialEq> TrackedRope<T> {
    /// Start tracking `rope` with a fresh log.
    pub fn new(rope: Rope<T>) -> TrackedRope<T> {
        return TrackedRope {
            base_len: rope.len(),
            rope,
            edit: Edit::new(),
        };
    }

    pub fn from_slice(items: &[T]) -> TrackedRope<T> {
        return TrackedRope::new(Rope::from_slice(items));
    }

    /// Continue the log of `edit` with `rope`, whose length must match.
    pub(crate) fn with_edit(rope: Rope<T>, edit: Edit, base_len: usize) -> TrackedRope<T> {
        let tracked = TrackedRope { rope, edit, base_len };
        tracked.check_len();
        return tracked;
    }

    pub fn rope(&self) -> &Rope<T> {
        return &self.rope;
    }

    pub fn into_rope(self) -> Rope<T> {
        return self.rope;
    }

    pub fn len(&self) -> usize {
        return self.rope.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.rope.is_empty();
    }

    /// Length of the rope the log was started from.
    pub fn base_len(&self) -> usize {
        return self.base_len;
    }

    pub fn get(&self, index: usize) -> Result<Cow<'_, T>, RopeError> {
        return self.rope.get(index);
    }

    pub fn insert(&self, index: usize, other: &Rope<T>) -> Result<TrackedRope<T>, RopeError> {
        let rope = self.rope.insert(index, other)?;
        return Ok(self.next(rope, self.edit.insert(index, other.len())));
    }

    pub fn insert_slice(&self, index: usize, items: &[T]) -> Result<TrackedRope<T>, RopeError> {
        return self.insert(index, &Rope::from_slice(items));
    }

    pub fn push(&self, item: T) -> TrackedRope<T> {
        let index = self.len();
        return self.next(self.rope.push(item), self.edit.insert(index, 1));
    }

    pub fn append(&self, other: &Rope<T>) -> TrackedRope<T> {
        let index = self.len();
        return self.next(self.rope.append(other), self.edit.insert(index, other.len()));
    }

    pub fn remove(&self, start: usize, count: usize) -> Result<TrackedRope<T>, RopeError> {
        let rope = self.rope.remove(start, count)?;
        return Ok(self.next(rope, self.edit.delete(start, count)));
    }

    /// Overwrite in place; recorded as a property change.
    pub fn set(&self, index: usize, item: T) -> Result<TrackedRope<T>, RopeError> {
        let rope = self.rope.set(index, item)?;
        return Ok(self.next(rope, self.edit.change_property(index, 1)));
    }

    pub fn set_range(&self, start: usize, items: &[T]) -> Result<TrackedRope<T>, RopeError> {
        let rope = self.rope.set_range(start, items)?;
        return Ok(self.next(rope, self.edit.change_property(start, items.len())));
    }

    /// An untracked copy of `count` elements from `start`.
    pub fn copy(&self, start: usize, count: usize) -> Result<Rope<T>, RopeError> {
        return self.rope.copy(start, count);
    }

    fn next(&self, rope: Rope<T>, edit: Edit) -> TrackedRope<T> {
        return TrackedRope::with_edit(rope, edit, self.base_len);
    }

    fn check_len(&self) {
        debug_assert_eq!(
            self.edit.net_delta().ok().map(|delta| self.base_len as isize + delta),
            Some(self.rope.len() as isize),
            "edit log disagrees with rope length"
        );
    }
}

impl<T> Editable for TrackedRope<T> {
    fn edits(&self) -> &Edit {
        return &self.edit;
    }
}

impl<T: Clone + PartialEq + std::fmt::Debug> std::fmt::Debug for TrackedRope<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return f
            .debug_struct("TrackedRope")
            .field("rope", &self.rope)
            .field("base_len", &self.base_len)
            .finish();
    }
}

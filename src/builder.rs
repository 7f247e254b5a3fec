// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! A growable list over a rope.
//!
//! `RopeBuilder` owns an unsealed rope and edits it in place, reusing nodes
//! nobody else holds. Snapshots (`to_rope`, `cut`, `copy`) seal what they
//! hand out; later edits copy around the sealed parts instead of touching
//! them. Every edit is also recorded in an edit log, so positions can be
//! rebased against the builder.
//!
//! Indexed reads remember the last segment they landed in, making runs of
//! nearby reads O(1) each. Any edit drops that memory.

use std::cell::RefCell;
use std::sync::Arc;

use crate::error::RopeError;
use crate::history::edit::Edit;
use crate::history::edit::Editable;
use crate::rope::Rope;
use crate::rope::balance;
use crate::rope::check_index;
use crate::rope::check_position;
use crate::rope::check_range;
use crate::rope::cursor::Iter;
use crate::rope::node::Node;
use crate::tracked::TrackedRope;

/// The last segment an indexed read landed in.
struct SegmentCache<T> {
    /// Absolute index of the segment's first element.
    start: usize,
    segment: Arc<Node<T>>,
}

pub struct RopeBuilder<T> {
    root: Arc<Node<T>>,
    edit: Edit,
    base_len: usize,
    cache: RefCell<Option<SegmentCache<T>>>,
    frozen: bool,
}

impl<T: Clone + PartialEq> Default for RopeBuilder<T> {
    fn default() -> Self {
        return RopeBuilder::new();
    }
}

impl<T: Clone + PartialEq> RopeBuilder<T> {
    pub fn new() -> RopeBuilder<T> {
        return RopeBuilder::from_rope(Rope::new());
    }

    /// Start editing `rope`. The rope itself is never modified.
    pub fn from_rope(rope: Rope<T>) -> RopeBuilder<T> {
        return RopeBuilder {
            base_len: rope.len(),
            root: rope.root().clone(),
            edit: Edit::new(),
            cache: RefCell::new(None),
            frozen: false,
        };
    }

    pub fn len(&self) -> usize {
        return self.root.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.len() == 0;
    }

    pub fn is_frozen(&self) -> bool {
        return self.frozen;
    }

    /// Reject every further edit.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// A frozen builder over a snapshot of the current contents, sharing
    /// this builder's edit log.
    pub fn read_only(&self) -> RopeBuilder<T> {
        self.root.seal();
        return RopeBuilder {
            root: self.root.clone(),
            edit: self.edit.clone(),
            base_len: self.base_len,
            cache: RefCell::new(None),
            frozen: true,
        };
    }

    /// The element at `index`.
    pub fn get(&self, index: usize) -> Result<T, RopeError> {
        check_index(index, self.len())?;
        let mut cache = self.cache.borrow_mut();
        if let Some(hit) = cache.as_ref() {
            if index >= hit.start && index - hit.start < hit.segment.len() {
                return Ok(hit.segment.segment_item(index - hit.start).into_owned());
            }
        }
        let (segment, start) = Node::locate_arc(&self.root, index);
        let item = segment.segment_item(index - start).into_owned();
        *cache = Some(SegmentCache {
            start,
            segment: segment.clone(),
        });
        return Ok(item);
    }

    pub fn push(&mut self, item: T) -> Result<(), RopeError> {
        self.check_writable()?;
        self.invalidate();
        let index = self.len();
        let root = self.take_root();
        self.root = balance::join(root, Node::leaf(&[item]));
        self.edit = self.edit.insert(index, 1);
        return Ok(());
    }

    pub fn insert(&mut self, index: usize, item: T) -> Result<(), RopeError> {
        return self.insert_slice(index, &[item]);
    }

    pub fn insert_slice(&mut self, index: usize, items: &[T]) -> Result<(), RopeError> {
        self.check_writable()?;
        check_position(index, self.len())?;
        self.splice(index, index, balance::build(items));
        return Ok(());
    }

    pub fn insert_rope(&mut self, index: usize, rope: &Rope<T>) -> Result<(), RopeError> {
        self.check_writable()?;
        check_position(index, self.len())?;
        self.splice(index, index, rope.root().clone());
        return Ok(());
    }

    /// Append every item from `items` as one edit.
    pub fn extend_from<I: IntoIterator<Item = T>>(&mut self, items: I) -> Result<(), RopeError> {
        self.check_writable()?;
        let items: Vec<T> = items.into_iter().collect();
        let index = self.len();
        return self.insert_slice(index, &items);
    }

    pub fn remove_at(&mut self, index: usize) -> Result<(), RopeError> {
        self.check_writable()?;
        check_index(index, self.len())?;
        self.splice(index, index + 1, Node::empty());
        return Ok(());
    }

    pub fn remove_range(&mut self, start: usize, count: usize) -> Result<(), RopeError> {
        self.check_writable()?;
        let end = check_range(start, count, self.len())?;
        self.splice(start, end, Node::empty());
        return Ok(());
    }

    pub fn set(&mut self, index: usize, item: T) -> Result<(), RopeError> {
        self.check_writable()?;
        check_index(index, self.len())?;
        return self.set_range(index, &[item]);
    }

    /// Overwrite the elements starting at `start`. Recorded as a property
    /// change, so positions do not move.
    pub fn set_range(&mut self, start: usize, items: &[T]) -> Result<(), RopeError> {
        self.check_writable()?;
        let end = check_range(start, items.len(), self.len())?;
        self.invalidate();
        let root = self.take_root();
        let front = balance::slice(&root, 0, start);
        let back = balance::slice(&root, end, root.len());
        drop(root);
        self.root = balance::join(balance::join(front, balance::build(items)), back);
        self.edit = self.edit.change_property(start, items.len());
        return Ok(());
    }

    /// Remove `count` elements from `start` and return them.
    pub fn cut(&mut self, start: usize, count: usize) -> Result<Rope<T>, RopeError> {
        self.check_writable()?;
        let end = check_range(start, count, self.len())?;
        let taken = Rope::from_root(balance::slice(&self.root, start, end));
        self.splice(start, end, Node::empty());
        return Ok(taken);
    }

    /// A snapshot of `count` elements from `start`.
    pub fn copy(&self, start: usize, count: usize) -> Result<Rope<T>, RopeError> {
        let end = check_range(start, count, self.len())?;
        return Ok(Rope::from_root(balance::slice(&self.root, start, end)));
    }

    pub fn clear(&mut self) -> Result<(), RopeError> {
        self.check_writable()?;
        let len = self.len();
        self.splice(0, len, Node::empty());
        return Ok(());
    }

    pub fn index_of(&self, item: &T) -> Option<usize> {
        return self.iter().position(|x| x == *item);
    }

    pub fn contains(&self, item: &T) -> bool {
        return self.index_of(item).is_some();
    }

    pub fn iter(&self) -> Iter<'_, T> {
        return Iter::new(&self.root);
    }

    /// Seal the current contents and return them. Further edits leave the
    /// returned rope alone.
    pub fn to_rope(&self) -> Rope<T> {
        return Rope::from_root(self.root.clone());
    }

    /// The current contents together with this builder's edit log.
    pub fn to_tracked(&self) -> TrackedRope<T> {
        return TrackedRope::with_edit(self.to_rope(), self.edit.clone(), self.base_len);
    }

    /// Replace `start..end` with `middle` and record the edit.
    fn splice(&mut self, start: usize, end: usize, middle: Arc<Node<T>>) {
        self.invalidate();
        let inserted = middle.len();
        let root = self.take_root();
        let front = balance::slice(&root, 0, start);
        let back = balance::slice(&root, end, root.len());
        drop(root);
        self.root = balance::join(balance::join(front, middle), back);
        if end > start {
            self.edit = self.edit.delete(start, end - start);
        }
        self.edit = self.edit.insert(start, inserted);
    }

    fn take_root(&mut self) -> Arc<Node<T>> {
        return std::mem::replace(&mut self.root, Node::empty());
    }

    fn invalidate(&mut self) {
        *self.cache.get_mut() = None;
    }

    fn check_writable(&self) -> Result<(), RopeError> {
        if self.frozen {
            return Err(RopeError::ReadOnly);
        }
        return Ok(());
    }
}

impl<T> Editable for RopeBuilder<T> {
    fn edits(&self) -> &Edit {
        return &self.edit;
    }
}

impl<T: Clone + PartialEq> From<Rope<T>> for RopeBuilder<T> {
    fn from(rope: Rope<T>) -> Self {
        return RopeBuilder::from_rope(rope);
    }
}

impl<T: Clone + PartialEq> From<&RopeBuilder<T>> for Rope<T> {
    fn from(builder: &RopeBuilder<T>) -> Self {
        return builder.to_rope();
    }
}

impl<T: Clone + PartialEq> From<RopeBuilder<T>> for Rope<T> {
    fn from(builder: RopeBuilder<T>) -> Self {
        return builder.to_rope();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adjust::Direction;
    use crate::history::position::Position;

    fn builder(items: &[u32]) -> RopeBuilder<u32> {
        return RopeBuilder::from_rope(Rope::from_slice(items));
    }

    #[test]
    fn list_operations() {
        let mut list = RopeBuilder::new();
        for i in 0..10u32 {
            list.push(i).unwrap();
        }
        list.insert(0, 100).unwrap();
        list.remove_at(5).unwrap();
        list.remove_range(0, 2).unwrap();
        assert_eq!(list.iter().collect::<Vec<_>>(), vec![1, 2, 3, 5, 6, 7, 8, 9]);
        assert_eq!(list.get(3), Ok(5));
        assert!(list.contains(&9));
        assert_eq!(list.index_of(&4), None);
        list.clear().unwrap();
        assert!(list.is_empty());
    }

    #[test]
    fn snapshots_are_unaffected_by_later_edits() {
        let mut list = builder(&(0..40).collect::<Vec<_>>());
        let before = list.to_rope();
        list.set(3, 99).unwrap();
        list.push(40).unwrap();
        let cut = list.cut(10, 5).unwrap();
        assert_eq!(before.to_vec(), (0..40).collect::<Vec<_>>());
        assert_eq!(cut.to_vec(), vec![10, 11, 12, 13, 14]);
        assert_eq!(list.len(), 36);
        assert_eq!(list.get(3), Ok(99));
    }

    #[test]
    fn cached_reads_see_edits() {
        let mut list = builder(&[1, 2, 3, 4]);
        assert_eq!(list.get(1), Ok(2));
        list.set(1, 7).unwrap();
        assert_eq!(list.get(1), Ok(7));
        assert_eq!(list.get(2), Ok(3));
    }

    #[test]
    fn out_of_range_does_not_mutate() {
        let mut list = builder(&[1, 2, 3]);
        assert_eq!(list.remove_range(2, 5), Err(RopeError::InvalidRange { start: 2, count: 5, len: 3 }));
        assert_eq!(list.insert(4, 0), Err(RopeError::IndexOutOfRange { index: 4, len: 3 }));
        assert_eq!(list.get(3), Err(RopeError::IndexOutOfRange { index: 3, len: 3 }));
        assert_eq!(list.len(), 3);
        assert_eq!(list.edits().net_delta(), Ok(0));
    }

    #[test]
    fn frozen_builder_rejects_edits() {
        let mut list = builder(&[1, 2]);
        let view = list.read_only();
        list.push(3).unwrap();
        let mut view = view;
        assert_eq!(view.push(4), Err(RopeError::ReadOnly));
        assert_eq!(view.clear(), Err(RopeError::ReadOnly));
        assert_eq!(view.len(), 2);
        assert_eq!(view.copy(0, 2).unwrap().to_vec(), vec![1, 2]);
        list.freeze();
        assert_eq!(list.set(0, 0), Err(RopeError::ReadOnly));
    }

    #[test]
    fn positions_track_builder_edits() {
        let mut list = builder(&[10, 20, 30, 40]);
        let mut mark = Position::new(&list, 2, Direction::Positive);
        list.remove_at(0).unwrap();
        list.insert_slice(0, &[1, 2, 3]).unwrap();
        assert_eq!(mark.synchronize(&list), Ok(4));
        assert_eq!(list.get(4), Ok(30));
    }

    #[test]
    fn tracked_snapshot_keeps_the_log() {
        let mut list = builder(&[1, 2, 3]);
        list.push(4).unwrap();
        let tracked = list.to_tracked();
        assert_eq!(tracked.base_len(), 3);
        assert!(Edit::ptr_eq(tracked.edits(), list.edits()));
    }

    #[test]
    fn extend_appends() {
        let mut list = builder(&[1]);
        list.extend_from(vec![2, 3]).unwrap();
        assert_eq!(Rope::from(&list).to_vec(), vec![1, 2, 3]);
        assert_eq!(list.edits().net_delta(), Ok(2));
    }

    #[test]
    fn frozen_builder_refuses_extend() {
        let mut list = builder(&[1, 2]);
        list.freeze();
        assert_eq!(list.extend_from(vec![3]), Err(RopeError::ReadOnly));
        assert_eq!(list.len(), 2);
        assert_eq!(list.edits().net_delta(), Ok(0));
    }

    #[test]
    fn push_drops_cached_segment() {
        let mut list = builder(&[1, 2, 3]);
        assert_eq!(list.get(2), Ok(3));
        assert!(list.cache.borrow().is_some());
        list.push(4).unwrap();
        assert!(list.cache.borrow().is_none());
        assert_eq!(list.get(3), Ok(4));
        assert_eq!(list.get(2), Ok(3));
    }
}

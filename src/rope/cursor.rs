// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Enumerators that remember the last segment they visited.
//!
//! Stepping within a segment is O(1); crossing into the next one costs one
//! descent from the root.

use std::borrow::Cow;
use std::iter::FusedIterator;

use super::node::Node;

type Segment<'a, T> = (&'a Node<T>, usize);

/// Finds segments, reusing the last one found when it still covers the index.
#[derive(Clone)]
struct SegmentCache<'a, T> {
    root: &'a Node<T>,
    last: Option<Segment<'a, T>>,
}

impl<'a, T> SegmentCache<'a, T> {
    fn new(root: &'a Node<T>) -> Self {
        return SegmentCache { root, last: None };
    }

    fn find(&mut self, index: usize) -> Segment<'a, T> {
        if let Some((segment, start)) = self.last {
            if index >= start && index - start < segment.len() {
                return (segment, start);
            }
        }
        let found = self.root.locate(index);
        self.last = Some(found);
        return found;
    }
}

/// A seekable position in a rope.
#[derive(Clone)]
pub struct Cursor<'a, T> {
    cache: SegmentCache<'a, T>,
    index: usize,
}

impl<'a, T: Clone> Cursor<'a, T> {
    pub(crate) fn new(root: &'a Node<T>, index: usize) -> Self {
        return Cursor {
            cache: SegmentCache::new(root),
            index: index.min(root.len()),
        };
    }

    /// The current index. Equal to the rope length when past the end.
    pub fn index(&self) -> usize {
        return self.index;
    }

    /// Move to `index`, clamped to the rope length.
    pub fn seek(&mut self, index: usize) {
        self.index = index.min(self.cache.root.len());
    }

    /// The element under the cursor, or `None` past the end.
    pub fn get(&mut self) -> Option<Cow<'a, T>> {
        if self.index >= self.cache.root.len() {
            return None;
        }
        let (segment, start) = self.cache.find(self.index);
        return Some(segment.segment_item(self.index - start));
    }

    /// Step forward. Returns false once the cursor is past the end.
    pub fn move_next(&mut self) -> bool {
        let len = self.cache.root.len();
        if self.index < len {
            self.index += 1;
        }
        return self.index < len;
    }

    /// Step back. Returns false, without moving, at the start.
    pub fn move_prev(&mut self) -> bool {
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        return true;
    }
}

/// Owned elements of a rope, front to back.
#[derive(Clone)]
pub struct Iter<'a, T> {
    front: SegmentCache<'a, T>,
    back: SegmentCache<'a, T>,
    start: usize,
    end: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(root: &'a Node<T>) -> Self {
        return Iter {
            front: SegmentCache::new(root),
            back: SegmentCache::new(root),
            start: 0,
            end: root.len(),
        };
    }
}

impl<T: Clone> Iterator for Iter<'_, T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        let (segment, start) = self.front.find(self.start);
        let item = segment.segment_item(self.start - start).into_owned();
        self.start += 1;
        return Some(item);
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.end - self.start;
        return (left, Some(left));
    }

    fn nth(&mut self, n: usize) -> Option<T> {
        self.start = self.start.saturating_add(n).min(self.end);
        return self.next();
    }
}

impl<T: Clone> DoubleEndedIterator for Iter<'_, T> {
    fn next_back(&mut self) -> Option<T> {
        if self.start == self.end {
            return None;
        }
        self.end -= 1;
        let (segment, start) = self.back.find(self.end);
        return Some(segment.segment_item(self.end - start).into_owned());
    }
}

impl<T: Clone> ExactSizeIterator for Iter<'_, T> {}

impl<T: Clone> FusedIterator for Iter<'_, T> {}

#[cfg(test)]
mod tests {
    use super::super::balance::build;
    use super::*;

    #[test]
    fn cursor_walks_both_ways() {
        let items: Vec<u32> = (0..40).collect();
        let root = build(&items);
        let mut cursor = Cursor::new(&*root, 15);
        assert_eq!(cursor.get().as_deref(), Some(&15));
        assert!(cursor.move_next());
        assert_eq!(cursor.get().as_deref(), Some(&16));
        assert!(cursor.move_prev());
        assert!(cursor.move_prev());
        assert_eq!(cursor.get().as_deref(), Some(&14));
        cursor.seek(39);
        assert!(!cursor.move_next());
        assert_eq!(cursor.get(), None);
        assert_eq!(cursor.index(), 40);
        cursor.seek(0);
        assert!(!cursor.move_prev());
    }

    #[test]
    fn iter_meets_in_the_middle() {
        let items: Vec<u32> = (0..50).collect();
        let root = build(&items);
        let mut iter = Iter::new(&*root);
        assert_eq!(iter.len(), 50);
        assert_eq!(iter.next(), Some(0));
        assert_eq!(iter.next_back(), Some(49));
        let rest: Vec<u32> = iter.collect();
        assert_eq!(rest, (1..49).collect::<Vec<_>>());
    }

    #[test]
    fn iter_nth_skips() {
        let items: Vec<u32> = (0..50).collect();
        let root = build(&items);
        let mut iter = Iter::new(&*root);
        assert_eq!(iter.nth(33), Some(33));
        assert_eq!(iter.nth(100), None);
        assert_eq!(iter.next(), None);
    }
}

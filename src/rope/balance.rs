// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Tree surgery: joining, slicing and bulk building.
//!
//! Joins keep heights within `SLACK` of each other, compared on even-rounded
//! ranks so that a one-level wobble never triggers a rotation. When one side
//! is much taller, the join walks down its inner spine, joins there, and
//! rotates on the way back up.
//!
//! Everything produced here is unsealed. Callers seal what they publish.

use std::sync::Arc;

use super::CHUNK_SIZE;
use super::node::Concat;
use super::node::Leaf;
use super::node::Node;

/// Height difference (after rounding to even) tolerated before a rotation.
pub const SLACK: u8 = 2;

#[inline]
fn rank(height: u8) -> u8 {
    return height & !1;
}

fn is_segment<T>(node: &Node<T>) -> bool {
    return !matches!(node, Node::Concat(_));
}

/// Take a concat apart. An unsealed node that nobody else holds is consumed;
/// otherwise the children are shared.
fn split_concat<T>(node: Arc<Node<T>>) -> (Arc<Node<T>>, Arc<Node<T>>) {
    if !node.is_sealed() {
        match Arc::try_unwrap(node) {
            Ok(Node::Concat(Concat { left, right, .. })) => return (left, right),
            Ok(_) => unreachable!("split_concat on a segment"),
            Err(shared) => return children(&shared),
        }
    }
    return children(&node);
}

fn children<T>(node: &Node<T>) -> (Arc<Node<T>>, Arc<Node<T>>) {
    match node {
        Node::Concat(concat) => return (concat.left.clone(), concat.right.clone()),
        _ => unreachable!("split_concat on a segment"),
    }
}

/// Join two ropes, rebalancing as needed.
pub(crate) fn join<T: Clone + PartialEq>(left: Arc<Node<T>>, right: Arc<Node<T>>) -> Arc<Node<T>> {
    if left.len() == 0 {
        return right;
    }
    if right.len() == 0 {
        return left;
    }

    let (hl, hr) = (left.height(), right.height());
    if is_segment(&*left) && is_segment(&*right) {
        return fuse(&*left, &*right).unwrap_or_else(|| Node::concat(left, right));
    }

    // Descend toward the seam when the other side is a lone segment too, so
    // adjacent leaves get the chance to fuse.
    if rank(hl) > rank(hr) + SLACK || (is_segment(&*right) && hl > 0) {
        let (ll, lr) = split_concat(left);
        return rebalance(ll, join(lr, right));
    }
    if rank(hr) > rank(hl) + SLACK || (is_segment(&*left) && hr > 0) {
        let (rl, rr) = split_concat(right);
        return rebalance(join(left, rl), rr);
    }
    return Node::concat(left, right);
}

/// Build a concat over two balanced subtrees whose heights may have drifted
/// apart by one join. Does a single or double rotation if they did.
fn rebalance<T>(left: Arc<Node<T>>, right: Arc<Node<T>>) -> Arc<Node<T>> {
    let (hl, hr) = (left.height(), right.height());

    if rank(hr) > rank(hl) + SLACK {
        let (rl, rr) = split_concat(right);
        if rl.height() > rr.height() {
            let (rll, rlr) = split_concat(rl);
            return Node::concat(rebalance(left, rll), rebalance(rlr, rr));
        }
        return Node::concat(rebalance(left, rl), rr);
    }

    if rank(hl) > rank(hr) + SLACK {
        let (ll, lr) = split_concat(left);
        if lr.height() > ll.height() {
            let (lrl, lrr) = split_concat(lr);
            return Node::concat(rebalance(ll, lrl), rebalance(lrr, right));
        }
        return Node::concat(ll, rebalance(lr, right));
    }

    return Node::concat(left, right);
}

/// Merge two adjacent segments into one, when they are compatible.
fn fuse<T: Clone + PartialEq>(left: &Node<T>, right: &Node<T>) -> Option<Arc<Node<T>>> {
    match (left, right) {
        (Node::Leaf(a), Node::Leaf(b)) => {
            if a.len + b.len > CHUNK_SIZE {
                return None;
            }
            if a.chunk.try_extend(a.len, b.items()) {
                return Some(Arc::new(Node::Leaf(a.grown(b.len))));
            }
            let items: Vec<T> = a.items().iter().chain(b.items()).cloned().collect();
            return Some(Node::leaf(&items));
        }
        (
            Node::Run { count: a, value: x },
            Node::Run { count: b, value: y },
        ) if x == y => {
            return Some(Node::run(a + b, x.clone()));
        }
        (Node::Function(a), Node::Function(b))
            if Arc::ptr_eq(&a.generator, &b.generator) && a.start + a.count == b.start =>
        {
            return Some(Node::function(a.start, a.count + b.count, a.generator.clone()));
        }
        _ => return None,
    }
}

/// The elements in `start..end`, sharing whatever subtrees fall wholly
/// inside the range.
pub(crate) fn slice<T: Clone + PartialEq>(node: &Arc<Node<T>>, start: usize, end: usize) -> Arc<Node<T>> {
    debug_assert!(start <= end && end <= node.len());
    if start == end {
        return Node::empty();
    }
    if start == 0 && end == node.len() {
        return node.clone();
    }

    match &**node {
        Node::Empty => return Node::empty(),
        Node::Leaf(leaf) if start == 0 => {
            return Arc::new(Node::Leaf(Leaf {
                chunk: leaf.chunk.clone(),
                len: end,
            }));
        }
        Node::Leaf(leaf) => return Node::leaf(&leaf.items()[start..end]),
        Node::Run { value, .. } => return Node::run(end - start, value.clone()),
        Node::Function(function) => {
            return Node::function(function.start + start, end - start, function.generator.clone());
        }
        Node::Concat(concat) => {
            let split = concat.left.len();
            if end <= split {
                return slice(&concat.left, start, end);
            }
            if start >= split {
                return slice(&concat.right, start - split, end - split);
            }
            return join(
                slice(&concat.left, start, split),
                slice(&concat.right, 0, end - split),
            );
        }
    }
}

/// A perfectly balanced tree of full leaves over `items`.
pub(crate) fn build<T: Clone>(items: &[T]) -> Arc<Node<T>> {
    let mut level: Vec<Arc<Node<T>>> = items.chunks(CHUNK_SIZE).map(Node::leaf).collect();
    if level.is_empty() {
        return Node::empty();
    }
    while level.len() > 1 {
        let mut next = Vec::with_capacity(level.len().div_ceil(2));
        let mut nodes = level.into_iter();
        while let Some(left) = nodes.next() {
            match nodes.next() {
                Some(right) => next.push(Node::concat(left, right)),
                None => next.push(left),
            }
        }
        level = next;
    }
    return level.pop().unwrap_or_else(Node::empty);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn collect(node: &Node<u32>) -> Vec<u32> {
        return (0..node.len()).map(|i| *node.item(i)).collect();
    }

    #[test]
    fn adjacent_small_leaves_fuse() {
        let joined = join(Node::leaf(&[1, 2]), Node::leaf(&[3]));
        assert!(matches!(&*joined, Node::Leaf(_)));
        assert_eq!(collect(&joined), vec![1, 2, 3]);
    }

    #[test]
    fn equal_runs_fuse() {
        let joined = join(Node::run(3, 7u32), Node::run(2, 7u32));
        assert!(matches!(&*joined, Node::Run { count: 5, .. }));
        let apart = join(Node::run(3, 7u32), Node::run(2, 8u32));
        assert!(matches!(&*apart, Node::Concat(_)));
    }

    #[test]
    fn contiguous_functions_fuse() {
        let generator: super::super::node::Generator<u32> = Arc::new(|i: usize| i as u32);
        let joined = join(
            Node::function(0, 4, generator.clone()),
            Node::function(4, 4, generator),
        );
        assert!(matches!(&*joined, Node::Function(_)));
        assert_eq!(collect(&joined), (0..8).collect::<Vec<_>>());
    }

    #[test]
    fn appending_one_at_a_time_stays_balanced() {
        let mut root = Node::empty();
        for i in 0..2000u32 {
            root = join(root, Node::leaf(&[i]));
        }
        assert_eq!(collect(&root), (0..2000).collect::<Vec<_>>());
        assert!(root.height() < 20, "height {}", root.height());
    }

    #[test]
    fn prepending_one_at_a_time_stays_balanced() {
        let mut root = Node::empty();
        for i in (0..2000u32).rev() {
            root = join(Node::run(1, i), root);
        }
        assert_eq!(collect(&root), (0..2000).collect::<Vec<_>>());
        assert!(root.height() < 24, "height {}", root.height());
    }

    #[test]
    fn slice_shares_leaf_prefix() {
        let leaf = Node::leaf(&[1, 2, 3, 4]);
        let front = slice(&leaf, 0, 2);
        match (&*leaf, &*front) {
            (Node::Leaf(a), Node::Leaf(b)) => assert!(Arc::ptr_eq(&a.chunk, &b.chunk)),
            _ => panic!("expected leaves"),
        }
        assert_eq!(collect(&slice(&leaf, 1, 3)), vec![2, 3]);
    }

    #[test]
    fn slice_across_concat() {
        let items: Vec<u32> = (0..100).collect();
        let root = build(&items);
        assert_eq!(collect(&slice(&root, 10, 90)), items[10..90].to_vec());
        assert_eq!(slice(&root, 5, 5).len(), 0);
    }

    #[test]
    fn build_is_balanced() {
        let items: Vec<u32> = (0..1000).collect();
        let root = build(&items);
        assert_eq!(root.len(), 1000);
        assert_eq!(root.height(), 6);
    }

    #[test]
    fn sealed_nodes_survive_joins() {
        let items: Vec<u32> = (0..64).collect();
        let shared = build(&items);
        shared.seal();
        let joined = join(shared.clone(), Node::leaf(&[99]));
        assert_eq!(collect(&shared), items);
        assert_eq!(joined.len(), 65);
    }
}

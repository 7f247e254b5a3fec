// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Rope nodes.
//!
//! # Flags
//!
//! Concat and function nodes carry one atomic flags word:
//!
//! ```text
//! bit  0      sealed
//! bit  1      hash cached
//! bits 8..16  height
//! bits 32..64 hash
//! ```
//!
//! A sealed node and everything under it is immutable and may be shared by
//! any number of parents. Unsealed nodes belong to whoever built them; the
//! balancing code may take them apart instead of copying.
//!
//! # Hashing
//!
//! The hash is a polynomial over the element hashes, `sum h(x_i) * B^(n-1-i)`
//! in wrapping 32-bit arithmetic. It depends only on the elements, so equal
//! content hashes equal however it is chunked, and a concat combines its
//! children's cached hashes as `hash(left) * B^len(right) + hash(right)`.

use std::borrow::Cow;
use std::hash::Hash;
use std::hash::Hasher;
use std::sync::Arc;
use std::sync::atomic::AtomicU64;
use std::sync::atomic::Ordering;

use rustc_hash::FxHasher;

use super::chunk::Chunk;

/// Produces the element at an absolute index.
pub(crate) type Generator<T> = Arc<dyn Fn(usize) -> T + Send + Sync>;

const SEALED: u64 = 1 << 0;
const HASHED: u64 = 1 << 1;
const HEIGHT_SHIFT: u32 = 8;
const HASH_SHIFT: u32 = 32;

/// Hash polynomial base.
const BASE: u32 = 0x0100_0193;

pub(crate) struct Flags(AtomicU64);

impl Flags {
    fn new(height: u8) -> Flags {
        return Flags(AtomicU64::new((height as u64) << HEIGHT_SHIFT));
    }

    #[inline]
    fn load(&self) -> u64 {
        return self.0.load(Ordering::Acquire);
    }

    #[inline]
    fn height(&self) -> u8 {
        return (self.load() >> HEIGHT_SHIFT) as u8;
    }

    #[inline]
    fn is_sealed(&self) -> bool {
        return self.load() & SEALED != 0;
    }

    fn seal(&self) {
        self.0.fetch_or(SEALED, Ordering::AcqRel);
    }

    fn hash(&self) -> Option<u32> {
        let word = self.load();
        if word & HASHED == 0 {
            return None;
        }
        return Some((word >> HASH_SHIFT) as u32);
    }

    fn cache_hash(&self, hash: u32) {
        self.0
            .fetch_or(HASHED | ((hash as u64) << HASH_SHIFT), Ordering::AcqRel);
    }
}

/// A view onto the first `len` slots of a chunk.
pub(crate) struct Leaf<T> {
    pub(crate) chunk: Arc<Chunk<T>>,
    pub(crate) len: usize,
}

impl<T> Leaf<T> {
    pub(crate) fn items(&self) -> &[T] {
        return self.chunk.prefix(self.len);
    }

    /// The same chunk, seen `extra` slots further.
    pub(crate) fn grown(&self, extra: usize) -> Leaf<T> {
        return Leaf {
            chunk: self.chunk.clone(),
            len: self.len + extra,
        };
    }
}

pub(crate) struct Concat<T> {
    pub(crate) left: Arc<Node<T>>,
    pub(crate) right: Arc<Node<T>>,
    pub(crate) count: usize,
    flags: Flags,
}

pub(crate) struct Function<T> {
    pub(crate) start: usize,
    pub(crate) count: usize,
    pub(crate) generator: Generator<T>,
    flags: Flags,
}

pub(crate) enum Node<T> {
    Empty,
    Leaf(Leaf<T>),
    Run { count: usize, value: T },
    Function(Function<T>),
    Concat(Concat<T>),
}

impl<T> Node<T> {
    pub(crate) fn empty() -> Arc<Node<T>> {
        return Arc::new(Node::Empty);
    }

    pub(crate) fn leaf(items: &[T]) -> Arc<Node<T>>
    where
        T: Clone,
    {
        if items.is_empty() {
            return Node::empty();
        }
        return Arc::new(Node::Leaf(Leaf {
            chunk: Chunk::filled(items.iter().cloned()),
            len: items.len(),
        }));
    }

    pub(crate) fn run(count: usize, value: T) -> Arc<Node<T>> {
        if count == 0 {
            return Node::empty();
        }
        return Arc::new(Node::Run { count, value });
    }

    pub(crate) fn function(start: usize, count: usize, generator: Generator<T>) -> Arc<Node<T>> {
        if count == 0 {
            return Node::empty();
        }
        return Arc::new(Node::Function(Function {
            start,
            count,
            generator,
            flags: Flags::new(0),
        }));
    }

    /// Join two nodes with no balancing. The result is unsealed.
    pub(crate) fn concat(left: Arc<Node<T>>, right: Arc<Node<T>>) -> Arc<Node<T>> {
        let height = left.height().max(right.height()) + 1;
        return Arc::new(Node::Concat(Concat {
            count: left.len() + right.len(),
            left,
            right,
            flags: Flags::new(height),
        }));
    }

    #[inline]
    pub(crate) fn len(&self) -> usize {
        return match self {
            Node::Empty => 0,
            Node::Leaf(leaf) => leaf.len,
            Node::Run { count, .. } => *count,
            Node::Function(function) => function.count,
            Node::Concat(concat) => concat.count,
        };
    }

    #[inline]
    pub(crate) fn height(&self) -> u8 {
        return match self {
            Node::Concat(concat) => concat.flags.height(),
            _ => 0,
        };
    }

    /// Everything but an unsealed concat is immutable already.
    #[inline]
    pub(crate) fn is_sealed(&self) -> bool {
        return match self {
            Node::Concat(concat) => concat.flags.is_sealed(),
            _ => true,
        };
    }

    /// Freeze this node and everything under it. Stops at subtrees that are
    /// already sealed.
    pub(crate) fn seal(&self) {
        if let Node::Concat(concat) = self {
            if concat.flags.is_sealed() {
                return;
            }
            concat.left.seal();
            concat.right.seal();
            concat.flags.seal();
        }
    }

    /// The element at `index`, which must be in range.
    pub(crate) fn item(&self, index: usize) -> Cow<'_, T>
    where
        T: Clone,
    {
        let (segment, start) = self.locate(index);
        return segment.segment_item(index - start);
    }

    /// The non-concat node holding `index`, with its starting offset.
    pub(crate) fn locate(&self, index: usize) -> (&Node<T>, usize) {
        let mut node = self;
        let mut start = 0;
        while let Node::Concat(concat) = node {
            let split = concat.left.len();
            if index - start < split {
                node = &concat.left;
            } else {
                start += split;
                node = &concat.right;
            }
        }
        return (node, start);
    }

    /// As `locate`, returning the shared handle.
    pub(crate) fn locate_arc(this: &Arc<Node<T>>, index: usize) -> (&Arc<Node<T>>, usize) {
        let mut node = this;
        let mut start = 0;
        while let Node::Concat(concat) = &**node {
            let split = concat.left.len();
            if index - start < split {
                node = &concat.left;
            } else {
                start += split;
                node = &concat.right;
            }
        }
        return (node, start);
    }

    /// The element at `offset` within a non-concat node.
    pub(crate) fn segment_item(&self, offset: usize) -> Cow<'_, T>
    where
        T: Clone,
    {
        return match self {
            Node::Leaf(leaf) => Cow::Borrowed(&leaf.items()[offset]),
            Node::Run { value, .. } => Cow::Borrowed(value),
            Node::Function(function) => Cow::Owned((function.generator)(function.start + offset)),
            Node::Empty | Node::Concat(_) => panic!("segment_item on a node without items"),
        };
    }

    /// The content hash, cached on concat and function nodes.
    pub(crate) fn hash_code(&self) -> u32
    where
        T: Hash,
    {
        return match self {
            Node::Empty => 0,
            Node::Leaf(leaf) => leaf
                .items()
                .iter()
                .fold(0u32, |acc, item| acc.wrapping_mul(BASE).wrapping_add(element_hash(item))),
            Node::Run { count, value } => repeat_hash(element_hash(value), *count),
            Node::Function(function) => {
                if let Some(hash) = function.flags.hash() {
                    return hash;
                }
                let end = function.start + function.count;
                let hash = (function.start..end).fold(0u32, |acc, index| {
                    acc.wrapping_mul(BASE)
                        .wrapping_add(element_hash(&(function.generator)(index)))
                });
                function.flags.cache_hash(hash);
                hash
            }
            Node::Concat(concat) => {
                if let Some(hash) = concat.flags.hash() {
                    return hash;
                }
                let hash = concat
                    .left
                    .hash_code()
                    .wrapping_mul(power(BASE, concat.right.len()))
                    .wrapping_add(concat.right.hash_code());
                // Unsealed nodes may still be taken apart, so only cache
                // once they are frozen.
                if concat.flags.is_sealed() {
                    concat.flags.cache_hash(hash);
                }
                hash
            }
        };
    }
}

fn element_hash<T: Hash>(item: &T) -> u32 {
    let mut hasher = FxHasher::default();
    item.hash(&mut hasher);
    let wide = hasher.finish();
    return (wide ^ (wide >> 32)) as u32;
}

/// `base^exp` in wrapping arithmetic.
fn power(mut base: u32, mut exp: usize) -> u32 {
    let mut result = 1u32;
    while exp > 0 {
        if exp & 1 == 1 {
            result = result.wrapping_mul(base);
        }
        base = base.wrapping_mul(base);
        exp >>= 1;
    }
    return result;
}

/// Hash of `count` copies of an element hashing to `hash`:
/// `hash * (1 + B + ... + B^(count-1))`.
fn repeat_hash(hash: u32, count: usize) -> u32 {
    // Build the geometric sum from the top bit of `count` down.
    let mut sum = 0u32;
    let mut pow = 1u32;
    let mut done = 0usize;
    for bit in (0..usize::BITS).rev() {
        // Double: S(2m) = S(m) * (1 + B^m).
        sum = sum.wrapping_mul(pow.wrapping_add(1));
        pow = pow.wrapping_mul(pow);
        done <<= 1;
        if (count >> bit) & 1 == 1 {
            // Step: S(m + 1) = S(m) * B + 1.
            sum = sum.wrapping_mul(BASE).wrapping_add(1);
            pow = pow.wrapping_mul(BASE);
            done += 1;
        }
    }
    debug_assert_eq!(done, count);
    return hash.wrapping_mul(sum);
}

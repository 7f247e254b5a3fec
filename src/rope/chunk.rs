// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Leaf storage.
//!
//! A `Chunk` is a fixed block of `CHUNK_SIZE` slots that fills from the
//! front and is never rewritten. Leaves are views `(chunk, len)` onto a
//! prefix of a chunk, so several leaves can share one chunk.
//!
//! The `used` counter marks how many slots have been claimed. A leaf whose
//! `len` equals `used` is the tail of its chunk and may grow in place: it
//! claims the next slots with one compare-and-swap and writes them. Any
//! other leaf (a shorter prefix, or one that lost the race) falls back to
//! copying into a fresh chunk.

use std::cell::UnsafeCell;
use std::mem::MaybeUninit;
use std::sync::Arc;
use std::sync::atomic::AtomicUsize;
use std::sync::atomic::Ordering;

use smallvec::SmallVec;

use super::CHUNK_SIZE;

pub(crate) struct Chunk<T> {
    slots: Box<[UnsafeCell<MaybeUninit<T>>]>,
    used: AtomicUsize,
}

// Slots below `used` are written once before any reader can see them and
// never again; slots above are only touched by the writer that claimed them.
unsafe impl<T: Send> Send for Chunk<T> {}
unsafe impl<T: Send + Sync> Sync for Chunk<T> {}

impl<T> Chunk<T> {
    fn empty() -> Chunk<T> {
        let slots = (0..CHUNK_SIZE)
            .map(|_| UnsafeCell::new(MaybeUninit::uninit()))
            .collect();
        return Chunk {
            slots,
            used: AtomicUsize::new(0),
        };
    }

    /// A chunk holding `items`, which must fit.
    pub(crate) fn filled<I: IntoIterator<Item = T>>(items: I) -> Arc<Chunk<T>> {
        let chunk = Chunk::empty();
        for item in items {
            let used = chunk.used.load(Ordering::Relaxed);
            assert!(used < CHUNK_SIZE, "chunk overflow");
            // Unshared: publish each slot only after writing it, so a
            // panicking iterator leaves `used` accurate for drop.
            unsafe {
                (*chunk.slots[used].get()).write(item);
            }
            chunk.used.store(used + 1, Ordering::Relaxed);
        }
        return Arc::new(chunk);
    }

    #[inline]
    pub(crate) fn used(&self) -> usize {
        return self.used.load(Ordering::Acquire);
    }

    /// The first `len` items. `len` must not exceed what this chunk has
    /// handed out to the caller's leaf.
    #[inline]
    pub(crate) fn prefix(&self, len: usize) -> &[T] {
        debug_assert!(len <= self.used());
        unsafe { std::slice::from_raw_parts(self.slots.as_ptr() as *const T, len) }
    }

    /// Append `items` after a leaf of length `len`, if that leaf is the tail
    /// of this chunk and there is room. Returns false if not.
    pub(crate) fn try_extend(&self, len: usize, items: &[T]) -> bool
    where
        T: Clone,
    {
        let end = len + items.len();
        if end > CHUNK_SIZE || self.used() != len {
            return false;
        }

        // Clone before claiming, so a panicking clone cannot leave claimed
        // slots uninitialized.
        let staged: SmallVec<[T; CHUNK_SIZE]> = items.iter().cloned().collect();
        if self
            .used
            .compare_exchange(len, end, Ordering::AcqRel, Ordering::Acquire)
            .is_err()
        {
            tracing::debug!(len, "chunk append lost its slot, copying");
            return false;
        }

        for (offset, item) in staged.into_iter().enumerate() {
            unsafe {
                (*self.slots[len + offset].get()).write(item);
            }
        }
        return true;
    }
}

impl<T> Drop for Chunk<T> {
    fn drop(&mut self) {
        let used = *self.used.get_mut();
        for slot in &mut self.slots[..used] {
            unsafe {
                slot.get_mut().assume_init_drop();
            }
        }
    }
}

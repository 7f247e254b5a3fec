// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Dense order labels.
//!
//! A `StampRing` hands out `Stamp`s that are totally ordered and can always
//! be allocated between two existing ones. Each stamp carries a 32-bit label
//! and the ring keeps labels increasing from the origin, which always has
//! label 0. Comparing two stamps is comparing their labels.
//!
//! A new stamp takes the midpoint of the gap after its predecessor. When that
//! gap is too small, the ring relabels a window around the predecessor:
//! starting with the one gap, it widens the window one stamp at a time
//! (forward until it meets the origin, then backward) until the window spans
//! more than `j * j` labels for `j` gaps, then spreads the stamps inside
//! evenly. This is the classic order-maintenance scheme; each insertion
//! costs O(log n) amortized.
//!
//! Stamps live in an arena of slots linked into a ring. Deleted slots are
//! reused; every reuse bumps the slot's generation, so handles to a deleted
//! stamp are detected as stale instead of aliasing the new one.

use std::cmp::Ordering;

use crate::error::StampError;

/// Width of a label.
pub const LABEL_BITS: u32 = 32;

/// Size of the label space.
const SPACE: u64 = 1 << LABEL_BITS;

/// Most stamps the ring holds, origin included. Keeps `j * j` below
/// `SPACE` for any window, so relabeling always finds room.
const MAX_STAMPS: usize = (1 << (LABEL_BITS / 2)) - 1;

type SlotIdx = u32;

/// The origin always lives in slot 0.
const ORIGIN: SlotIdx = 0;

#[derive(Clone, Debug)]
struct Slot {
    label: u32,
    prev: SlotIdx,
    next: SlotIdx,
    generation: u32,
    live: bool,
}

/// A handle to one stamp in a `StampRing`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stamp {
    slot: SlotIdx,
    generation: u32,
}

/// An ordered ring of stamps.
#[derive(Clone, Debug)]
pub struct StampRing {
    slots: Vec<Slot>,
    free: Vec<SlotIdx>,
    len: usize,
    resizes: usize,
}

impl Default for StampRing {
    fn default() -> Self {
        return Self::new();
    }
}

impl StampRing {
    /// A ring holding only the origin.
    pub fn new() -> StampRing {
        return StampRing {
            slots: vec![Slot {
                label: 0,
                prev: ORIGIN,
                next: ORIGIN,
                generation: 0,
                live: true,
            }],
            free: Vec::new(),
            len: 1,
            resizes: 0,
        };
    }

    /// The origin, which orders before every other stamp.
    pub fn zero(&self) -> Stamp {
        return Stamp {
            slot: ORIGIN,
            generation: 0,
        };
    }

    /// Number of live stamps, origin included.
    pub fn len(&self) -> usize {
        return self.len;
    }

    /// Always false: the origin cannot be deleted.
    pub fn is_empty(&self) -> bool {
        return self.len == 0;
    }

    /// How many times a window has been relabeled.
    pub fn resize_count(&self) -> usize {
        return self.resizes;
    }

    pub fn contains(&self, stamp: Stamp) -> bool {
        return self.resolve(stamp).is_ok();
    }

    /// The stamp's current label. Labels change when the ring relabels, but
    /// never out of order.
    pub fn label(&self, stamp: Stamp) -> Result<u32, StampError> {
        let slot = self.resolve(stamp)?;
        return Ok(self.slots[slot as usize].label);
    }

    /// A new stamp ordered right after `stamp`.
    pub fn new_after(&mut self, stamp: Stamp) -> Result<Stamp, StampError> {
        let slot = self.resolve(stamp)?;
        if self.len >= MAX_STAMPS {
            return Err(StampError::Exhausted);
        }

        if self.room_after(slot) < 2 {
            self.relabel(slot);
        }
        let room = self.room_after(slot);
        debug_assert!(room >= 2);
        let label = self.slots[slot as usize].label as u64 + room / 2;

        let next = self.slots[slot as usize].next;
        let fresh = self.alloc(label as u32, slot, next);
        self.slots[slot as usize].next = fresh;
        self.slots[next as usize].prev = fresh;
        self.len += 1;
        return Ok(Stamp {
            slot: fresh,
            generation: self.slots[fresh as usize].generation,
        });
    }

    /// A new stamp ordered right before `stamp`.
    pub fn new_before(&mut self, stamp: Stamp) -> Result<Stamp, StampError> {
        let slot = self.resolve(stamp)?;
        if slot == ORIGIN {
            return Err(StampError::BeforeOrigin);
        }
        let prev = self.slots[slot as usize].prev;
        return self.new_after(self.handle(prev));
    }

    /// Remove `stamp` from the order.
    pub fn delete(&mut self, stamp: Stamp) -> Result<(), StampError> {
        let slot = self.resolve(stamp)?;
        if slot == ORIGIN {
            return Err(StampError::DeleteOrigin);
        }
        let Slot { prev, next, .. } = self.slots[slot as usize];
        self.slots[prev as usize].next = next;
        self.slots[next as usize].prev = prev;

        let dead = &mut self.slots[slot as usize];
        dead.live = false;
        dead.generation = dead.generation.wrapping_add(1);
        self.free.push(slot);
        self.len -= 1;
        return Ok(());
    }

    /// Order two stamps of this ring.
    pub fn compare(&self, a: Stamp, b: Stamp) -> Result<Ordering, StampError> {
        let a = self.resolve(a)?;
        let b = self.resolve(b)?;
        return Ok(self.slots[a as usize].label.cmp(&self.slots[b as usize].label));
    }

    /// Labels between `from` and `to`, counting forward around the ring.
    pub fn gap(&self, from: Stamp, to: Stamp) -> Result<u32, StampError> {
        let from = self.label(from)?;
        let to = self.label(to)?;
        return Ok(to.wrapping_sub(from));
    }

    /// The stamp after `stamp`, or `None` for the last one.
    pub fn successor(&self, stamp: Stamp) -> Result<Option<Stamp>, StampError> {
        let slot = self.resolve(stamp)?;
        let next = self.slots[slot as usize].next;
        if next == ORIGIN {
            return Ok(None);
        }
        return Ok(Some(self.handle(next)));
    }

    /// Every live stamp, origin first.
    pub fn iter(&self) -> impl Iterator<Item = Stamp> + '_ {
        let mut slot = Some(ORIGIN);
        return std::iter::from_fn(move || {
            let current = slot?;
            let next = self.slots[current as usize].next;
            slot = (next != ORIGIN).then_some(next);
            return Some(self.handle(current));
        });
    }

    fn handle(&self, slot: SlotIdx) -> Stamp {
        return Stamp {
            slot,
            generation: self.slots[slot as usize].generation,
        };
    }

    fn resolve(&self, stamp: Stamp) -> Result<SlotIdx, StampError> {
        match self.slots.get(stamp.slot as usize) {
            Some(slot) if slot.live && slot.generation == stamp.generation => return Ok(stamp.slot),
            _ => return Err(StampError::Stale),
        }
    }

    fn alloc(&mut self, label: u32, prev: SlotIdx, next: SlotIdx) -> SlotIdx {
        if let Some(slot) = self.free.pop() {
            let reused = &mut self.slots[slot as usize];
            reused.label = label;
            reused.prev = prev;
            reused.next = next;
            reused.live = true;
            return slot;
        }
        self.slots.push(Slot {
            label,
            prev,
            next,
            generation: 0,
            live: true,
        });
        return (self.slots.len() - 1) as SlotIdx;
    }

    /// Labels from `lo` up to `hi`, where reaching the origin again means
    /// the top of the space.
    fn distance(&self, lo: SlotIdx, hi: SlotIdx) -> u64 {
        let from = self.slots[lo as usize].label as u64;
        if hi == ORIGIN {
            return SPACE - from;
        }
        return self.slots[hi as usize].label as u64 - from;
    }

    fn room_after(&self, slot: SlotIdx) -> u64 {
        return self.distance(slot, self.slots[slot as usize].next);
    }

    /// Spread out the stamps around `slot` so the gap after it has room.
    fn relabel(&mut self, slot: SlotIdx) {
        let mut lo = slot;
        let mut hi = self.slots[slot as usize].next;
        let mut gaps: u64 = 1;
        while self.distance(lo, hi) <= gaps * gaps {
            if hi != ORIGIN {
                hi = self.slots[hi as usize].next;
            } else if lo != ORIGIN {
                lo = self.slots[lo as usize].prev;
            } else {
                break;
            }
            gaps += 1;
        }

        let span = self.distance(lo, hi);
        let base = self.slots[lo as usize].label as u64;
        let mut current = self.slots[lo as usize].next;
        let mut step = 1;
        while current != hi {
            self.slots[current as usize].label = (base + span * step / gaps) as u32;
            current = self.slots[current as usize].next;
            step += 1;
        }

        self.resizes += 1;
        tracing::debug!(start = base, window = gaps, span, "relabeled stamp window");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_in_order(ring: &StampRing) {
        let stamps: Vec<Stamp> = ring.iter().collect();
        assert_eq!(stamps.len(), ring.len());
        for pair in stamps.windows(2) {
            assert_eq!(ring.compare(pair[0], pair[1]), Ok(Ordering::Less));
        }
    }

    #[test]
    fn new_after_lands_between() {
        let mut ring = StampRing::new();
        let zero = ring.zero();
        let b = ring.new_after(zero).unwrap();
        let a = ring.new_after(zero).unwrap();
        assert_eq!(ring.compare(zero, a), Ok(Ordering::Less));
        assert_eq!(ring.compare(a, b), Ok(Ordering::Less));
        assert_eq!(ring.successor(a), Ok(Some(b)));
        assert_eq!(ring.successor(b), Ok(None));
    }

    #[test]
    fn crowding_one_gap_forces_relabel() {
        let mut ring = StampRing::new();
        let zero = ring.zero();
        let last = ring.new_after(zero).unwrap();
        let mut inserted = Vec::new();
        for _ in 0..100 {
            inserted.push(ring.new_after(zero).unwrap());
        }
        assert!(ring.resize_count() > 0);
        assert_in_order(&ring);
        // Each insert went right after the origin, so later ones come first.
        for pair in inserted.windows(2) {
            assert_eq!(ring.compare(pair[1], pair[0]), Ok(Ordering::Less));
        }
        assert_eq!(ring.compare(inserted[0], last), Ok(Ordering::Less));
    }

    #[test]
    fn appending_at_the_end() {
        let mut ring = StampRing::new();
        let mut last = ring.zero();
        for _ in 0..1000 {
            last = ring.new_after(last).unwrap();
        }
        assert_eq!(ring.len(), 1001);
        assert_in_order(&ring);
        assert_eq!(ring.label(ring.zero()), Ok(0));
    }

    #[test]
    fn new_before() {
        let mut ring = StampRing::new();
        let b = ring.new_after(ring.zero()).unwrap();
        let a = ring.new_before(b).unwrap();
        assert_eq!(ring.compare(a, b), Ok(Ordering::Less));
        assert_eq!(ring.new_before(ring.zero()), Err(StampError::BeforeOrigin));
    }

    #[test]
    fn deleted_stamps_go_stale() {
        let mut ring = StampRing::new();
        let a = ring.new_after(ring.zero()).unwrap();
        ring.delete(a).unwrap();
        assert_eq!(ring.delete(a), Err(StampError::Stale));
        assert_eq!(ring.len(), 1);

        // The slot is reused, but the old handle stays stale.
        let b = ring.new_after(ring.zero()).unwrap();
        assert_ne!(a, b);
        assert!(!ring.contains(a));
        assert!(ring.contains(b));
        assert_eq!(ring.compare(a, b), Err(StampError::Stale));
        assert_eq!(ring.delete(ring.zero()), Err(StampError::DeleteOrigin));
    }

    #[test]
    fn gap_wraps_around_origin() {
        let mut ring = StampRing::new();
        let zero = ring.zero();
        let a = ring.new_after(zero).unwrap();
        let half = ring.label(a).unwrap();
        assert_eq!(half, 1 << 31);
        assert_eq!(ring.gap(zero, a), Ok(half));
        assert_eq!(ring.gap(a, zero), Ok(half));
    }
}

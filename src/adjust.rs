// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Index adjustments.
//!
//! An `Adjustment` describes one edit region: where it starts, how many
//! slots it inserted (positive count) or deleted (negative count), and two
//! flags. It knows how to move an index that was valid before the edit to
//! the index that is valid after it.
//!
//! # Spans
//!
//! An index is paired with a `deletions` count, and the two describe the
//! span `[index, index + deletions)`. A plain point has zero deletions.
//! Both ends of the span move across every edit, and afterwards
//! `deletions` is the distance between them, so a span partly deleted
//! keeps what remains and a point inside a deletion collapses to its start.
//!
//! # Flags
//!
//! - `property_only`: the region changed in place; nothing moves.
//! - `revision`: the edit restores or retracts earlier content. Inverting an
//!   adjustment toggles it, so the inverse of a plain deletion is a revision
//!   insertion and the inverse of a plain insertion is a revision deletion.
//!
//! A revision insertion at the start of a span is absorbed into it. At a
//! point it turns the tie-break around: a `Positive` point stays in front of
//! the inserted content and a `Negative` point ends up behind it. Undoing a
//! deletion therefore puts back a `Positive` point that sat at the deletion's
//! start and a `Negative` point that sat at its end.
//!
//! A deletion that reaches into a span is lossy: `adjust` followed by
//! `invert().adjust` restores `(index, deletions)` only when neither end of
//! the span lies in the closed range `[start, end]` of the deletion.

/// Which side of an edit boundary a position sticks to.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum Direction {
    /// Sticks to the content after it: an insertion at the position pushes
    /// it past the inserted content.
    #[default]
    Positive,
    /// Sticks to the content before it: an insertion at the position leaves
    /// it in front of the inserted content.
    Negative,
    /// No preference. Moves like `Positive`.
    Neutral,
}

/// The displacement effect of one edit region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Adjustment {
    start: usize,
    count: isize,
    property_only: bool,
    revision: bool,
}

impl Adjustment {
    /// An insertion of `len` slots at `start`.
    pub fn insert(start: usize, len: usize) -> Adjustment {
        return Adjustment {
            start,
            count: len as isize,
            property_only: false,
            revision: false,
        };
    }

    /// A deletion of `len` slots starting at `start`.
    pub fn delete(start: usize, len: usize) -> Adjustment {
        return Adjustment {
            start,
            count: -(len as isize),
            property_only: false,
            revision: false,
        };
    }

    /// An in-place change of `len` slots starting at `start`.
    pub fn property(start: usize, len: usize) -> Adjustment {
        return Adjustment {
            start,
            count: -(len as isize),
            property_only: true,
            revision: false,
        };
    }

    /// The same adjustment with the revision flag set to `revision`.
    pub fn with_revision(self, revision: bool) -> Adjustment {
        return Adjustment { revision, ..self };
    }

    #[inline]
    pub fn start(&self) -> usize {
        return self.start;
    }

    /// Signed length: positive for insertions, negative for deletions and
    /// property changes.
    #[inline]
    pub fn count(&self) -> isize {
        return self.count;
    }

    #[inline]
    pub fn is_property_only(&self) -> bool {
        return self.property_only;
    }

    #[inline]
    pub fn is_revision(&self) -> bool {
        return self.revision;
    }

    /// True when the adjustment moves nothing and changes nothing.
    #[inline]
    pub fn is_empty(&self) -> bool {
        return self.count == 0;
    }

    #[inline]
    pub fn deleted(&self) -> usize {
        return self.count.min(0).unsigned_abs();
    }

    #[inline]
    pub fn inserted(&self) -> usize {
        return self.count.max(0) as usize;
    }

    /// One past the last slot of the region as it was before the edit.
    #[inline]
    pub fn end(&self) -> usize {
        return self.start + self.deleted();
    }

    /// How much the sequence length changed.
    #[inline]
    pub fn length_delta(&self) -> isize {
        if self.property_only {
            return 0;
        }
        return self.count;
    }

    /// The adjustment that undoes this one.
    pub fn invert(&self) -> Adjustment {
        let count = if self.property_only { self.count } else { -self.count };
        return Adjustment {
            start: self.start,
            count,
            property_only: self.property_only,
            revision: !self.revision,
        };
    }

    /// Move `index` across this edit, updating `deletions` in place.
    pub fn adjust(&self, index: usize, deletions: &mut usize) -> usize {
        return self.adjust_directed(index, deletions, Direction::Positive);
    }

    /// Move `index` across this edit as a position sticking to `direction`.
    ///
    /// Negative positions are reflected (the sequence read right to left),
    /// moved with the positive rule, and reflected back. Reflection swaps the
    /// ends of a span, so a `Negative` span absorbs a revision insertion at
    /// its end rather than its start.
    pub fn adjust_directed(&self, index: usize, deletions: &mut usize, direction: Direction) -> usize {
        if self.property_only || self.count == 0 {
            return index;
        }

        let (index, kept) = match direction {
            Direction::Positive | Direction::Neutral => {
                self.shift(self.start as isize, index as isize, *deletions)
            }
            Direction::Negative => {
                let (mirrored, kept) = self.shift(self.mirrored_start(), negate(index, *deletions), *deletions);
                (unnegate(mirrored, kept, self.count), kept)
            }
        };

        debug_assert!(index >= 0, "adjusted index went negative");
        *deletions = kept;
        return index.max(0) as usize;
    }

    /// Where this region starts when the sequence is read right to left,
    /// measured from a length of zero.
    fn mirrored_start(&self) -> isize {
        return -((self.start + self.deleted()) as isize);
    }

    /// The positive rule on signed coordinates, applied to the span
    /// `[index, index + deletions)`.
    fn shift(&self, start: isize, index: isize, deletions: usize) -> (isize, usize) {
        let end = index + deletions as isize;

        if self.count > 0 {
            let inserted = self.count;
            let first = if index < start || (index == start && self.revision) {
                index
            } else {
                index + inserted
            };
            let last = if deletions == 0 {
                first
            } else if end <= start {
                end
            } else {
                end + inserted
            };
            return (first, (last - first) as usize);
        }

        let deleted = -self.count;
        let clamp = |at: isize| {
            if at <= start {
                at
            } else if at <= start + deleted {
                start
            } else {
                at - deleted
            }
        };
        let first = clamp(index);
        let last = clamp(end);
        return (first, (last - first) as usize);
    }
}

/// The left end of the reflected span `[index, index + deletions)`.
#[inline]
fn negate(index: usize, deletions: usize) -> isize {
    return -((index + deletions) as isize);
}

/// Reflect back; `delta` is the length after the edit relative to the zero
/// length the reflection was measured from.
#[inline]
fn unnegate(mirrored: isize, deletions: usize, delta: isize) -> isize {
    return delta - mirrored - deletions as isize;
}

// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Error types.
//!
//! Every failure here is local and synchronous: the caller either gets a new
//! value or one of these, never a half-applied edit.

/// Errors raised by rope and builder operations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RopeError {
    /// An index fell outside `0..len`.
    #[error("index {index} out of range for length {len}")]
    IndexOutOfRange { index: usize, len: usize },
    /// A range did not fit inside the sequence.
    #[error("range of {count} starting at {start} does not fit length {len}")]
    InvalidRange { start: usize, count: usize, len: usize },
    /// A mutating call on a frozen view.
    #[error("operation not supported on a read-only view")]
    ReadOnly,
}

/// Errors raised while materializing a change log.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HistoryError {
    /// A sync was started on a chain that is already being synced.
    #[error("change log is already being synchronized")]
    Reentrant,
}

/// Errors raised by position rebasing.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PositionError {
    /// The position and the target share no edit history.
    #[error("position and target edit share no common history")]
    Disconnected,
    /// The position was frozen.
    #[error("position is read-only")]
    ReadOnly,
    /// The log could not be synchronized.
    #[error(transparent)]
    History(#[from] HistoryError),
}

/// Errors raised by the version stamp ring.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StampError {
    /// The stamp was deleted, or belongs to a slot since reused.
    #[error("stamp is stale")]
    Stale,
    /// The origin anchors the ring and cannot be removed.
    #[error("the origin stamp cannot be deleted")]
    DeleteOrigin,
    /// Nothing orders before the origin.
    #[error("no stamp can be placed before the origin")]
    BeforeOrigin,
    /// Every label in the ring is taken.
    #[error("label space exhausted")]
    Exhausted,
}

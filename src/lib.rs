// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Strand - persistent sequences with a replayable edit history.
//!
//! # Quick Start
//!
//! ```
//! use strand::adjust::Direction;
//! use strand::builder::RopeBuilder;
//! use strand::history::position::Position;
//! use strand::rope::Rope;
//!
//! // Edit a list in place
//! let mut list = RopeBuilder::from_rope(Rope::from_slice(&['a', 'b', 'c']));
//! let mark = Position::new(&list, 2, Direction::Positive);
//!
//! list.insert_slice(0, &['x', 'y']).unwrap();
//! list.remove_at(2).unwrap();
//!
//! // Snapshots are immutable ropes
//! let snapshot = list.to_rope();
//! assert_eq!(snapshot.to_string(), "xybc");
//!
//! // Positions captured earlier follow the edits
//! assert_eq!(mark.get_index(&list), Some(3));
//! ```
//!
//! # Modules
//!
//! - `rope`: immutable balanced ropes, enumerators and an interner
//! - `builder`: a mutable list facade over a rope
//! - `tracked`: ropes paired with their edit log
//! - `history`: change logs, edits and rebasable positions
//! - `adjust`: the index arithmetic behind rebasing
//! - `stamp`: dense order labels

pub mod adjust;
pub mod builder;
pub mod error;
pub mod history;
pub mod rope;
pub mod stamp;
pub mod tracked;

pub use adjust::Adjustment;
pub use adjust::Direction;
pub use builder::RopeBuilder;
pub use error::HistoryError;
pub use error::PositionError;
pub use error::RopeError;
pub use error::StampError;
pub use history::Change;
pub use history::Persistent;
pub use history::edit::Edit;
pub use history::edit::Editable;
pub use history::position::Position;
pub use rope::Rope;
pub use stamp::Stamp;
pub use stamp::StampRing;
pub use tracked::TrackedRope;

// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Edit logs.
//!
//! An `Edit` is one version of a sequence's edit history. Each edit links a
//! `Diff` (one `Adjustment`) in front of the edit it was made from. The value
//! carried by the log is the net length change since the log was started,
//! which keeps `Diff::apply` honest: replaying a diff moves the total by the
//! diff's length delta, and the returned inverse moves it back.

use crate::adjust::Adjustment;
use crate::adjust::Direction;
use crate::error::HistoryError;

use super::Change;
use super::Persistent;

/// One recorded edit region.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Diff {
    pub adjustment: Adjustment,
}

impl Change<isize> for Diff {
    fn apply(self, net: &mut isize) -> Diff {
        *net += self.adjustment.length_delta();
        return Diff {
            adjustment: self.adjustment.invert(),
        };
    }
}

/// Anything that owns an edit log. Positions rebase against this.
pub trait Editable {
    /// The newest edit.
    fn edits(&self) -> &Edit;
}

/// A version of an edit log.
#[derive(Clone, Debug)]
pub struct Edit {
    history: Persistent<isize, Diff>,
}

impl Default for Edit {
    fn default() -> Self {
        return Self::new();
    }
}

impl Edit {
    /// Start a new, empty log.
    pub fn new() -> Edit {
        return Edit {
            history: Persistent::new(0),
        };
    }

    /// Record an insertion of `count` slots at `start`.
    pub fn insert(&self, start: usize, count: usize) -> Edit {
        return self.adjust(Adjustment::insert(start, count));
    }

    /// Record a deletion of `count` slots at `start`.
    pub fn delete(&self, start: usize, count: usize) -> Edit {
        return self.adjust(Adjustment::delete(start, count));
    }

    /// Record an in-place change of `count` slots at `start`.
    pub fn change_property(&self, start: usize, count: usize) -> Edit {
        return self.adjust(Adjustment::property(start, count));
    }

    /// Record `adjustment`. An empty adjustment records nothing.
    pub fn adjust(&self, adjustment: Adjustment) -> Edit {
        if adjustment.is_empty() {
            return self.clone();
        }
        return Edit {
            history: self.history.derive(Diff { adjustment }),
        };
    }

    /// Net change in length since the log was started.
    pub fn net_delta(&self) -> Result<isize, HistoryError> {
        return Ok(*self.history.data()?);
    }

    pub fn is_synced(&self) -> bool {
        return self.history.is_synced();
    }

    /// True when both name the same version.
    pub fn ptr_eq(a: &Edit, b: &Edit) -> bool {
        return Persistent::ptr_eq(&a.history, &b.history);
    }

    /// The adjustments stored between this edit and the log's current root,
    /// nearest first.
    pub fn all_changes(&self) -> Vec<Adjustment> {
        return self
            .history
            .all_changes()
            .into_iter()
            .map(|diff| diff.adjustment)
            .collect();
    }

    /// The adjustments that carry an index from `from` to `to`, in the order
    /// they must be applied. `None` when the two share no history.
    pub fn get_changes(from: &Edit, to: &Edit) -> Result<Option<Vec<Adjustment>>, HistoryError> {
        let path = Persistent::get_changes(&from.history, &to.history)?;
        return Ok(path.map(|diffs| {
            diffs
                .into_iter()
                .map(|diff| diff.adjustment.invert())
                .collect()
        }));
    }

    pub fn is_connected(a: &Edit, b: &Edit) -> Result<bool, HistoryError> {
        return Persistent::is_connected(&a.history, &b.history);
    }

    /// Move `index` (with its `deletions`) from `from` to `to`.
    pub fn adjust_index(
        from: &Edit,
        to: &Edit,
        index: usize,
        deletions: &mut usize,
        direction: Direction,
    ) -> Result<Option<usize>, HistoryError> {
        let Some(changes) = Edit::get_changes(from, to)? else {
            return Ok(None);
        };
        let mut index = index;
        for adjustment in &changes {
            index = adjustment.adjust_directed(index, deletions, direction);
        }
        tracing::trace!(steps = changes.len(), index, "adjusted index");
        return Ok(Some(index));
    }
}

impl Editable for Edit {
    fn edits(&self) -> &Edit {
        return self;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_adjustment_records_nothing() {
        let root = Edit::new();
        let same = root.insert(3, 0);
        assert!(Edit::ptr_eq(&root, &same));
    }

    #[test]
    fn net_delta_tracks_length() {
        let root = Edit::new();
        let edit = root.insert(0, 5).delete(1, 2).change_property(0, 1).insert(3, 1);
        assert_eq!(edit.net_delta(), Ok(4));
        assert_eq!(root.net_delta(), Ok(0));
        assert_eq!(edit.net_delta(), Ok(4));
    }

    #[test]
    fn changes_come_out_in_application_order() {
        let root = Edit::new();
        let head = root.insert(0, 5).delete(1, 2);
        let changes = Edit::get_changes(&root, &head).unwrap().unwrap();
        assert_eq!(changes, vec![Adjustment::insert(0, 5), Adjustment::delete(1, 2)]);
    }

    #[test]
    fn changes_survive_a_sync_of_the_older_edit() {
        let root = Edit::new();
        let mid = root.insert(0, 5);
        let head = mid.delete(1, 2);
        assert_eq!(head.net_delta(), Ok(3));
        assert_eq!(root.net_delta(), Ok(0));
        assert!(!head.is_synced());
        let changes = Edit::get_changes(&mid, &head).unwrap().unwrap();
        assert_eq!(changes, vec![Adjustment::delete(1, 2)]);
    }

    #[test]
    fn walking_backward_inverts() {
        let root = Edit::new();
        let head = root.insert(2, 3);
        let changes = Edit::get_changes(&head, &root).unwrap().unwrap();
        assert_eq!(changes, vec![Adjustment::insert(2, 3).invert()]);
    }

    #[test]
    fn adjust_index_across_log() {
        let root = Edit::new();
        let head = root.delete(1, 2);
        let mut deletions = 0;
        let index = Edit::adjust_index(&root, &head, 3, &mut deletions, Direction::Positive);
        assert_eq!(index, Ok(Some(1)));
    }

    #[test]
    fn separate_logs_do_not_connect() {
        let a = Edit::new().insert(0, 1);
        let b = Edit::new().insert(0, 1);
        assert_eq!(Edit::is_connected(&a, &b), Ok(false));
        let mut deletions = 0;
        assert_eq!(Edit::adjust_index(&a, &b, 0, &mut deletions, Direction::Positive), Ok(None));
    }

    #[test]
    fn all_changes_lists_unsynced_chain() {
        let head = Edit::new().insert(0, 2).delete(0, 1);
        assert_eq!(
            head.all_changes(),
            vec![Adjustment::delete(0, 1), Adjustment::insert(0, 2)]
        );
    }
}

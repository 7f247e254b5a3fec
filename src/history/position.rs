// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Positions that survive edits.
//!
//! A `Position` is an index captured against one edit of a log. It goes
//! stale as soon as the owner records another edit; `get_index` reports
//! where it would land now, and `synchronize` moves it there.

use std::cmp::Ordering;

use crate::adjust::Direction;
use crate::error::PositionError;

use super::edit::Edit;
use super::edit::Editable;

/// An index bound to a version of an edit log.
#[derive(Clone, Debug)]
pub struct Position {
    edit: Edit,
    index: usize,
    deletions: usize,
    direction: Direction,
    frozen: bool,
}

impl Position {
    /// Capture `index` against the owner's current edit.
    pub fn new<E: Editable + ?Sized>(owner: &E, index: usize, direction: Direction) -> Position {
        return Position::at(owner.edits(), index, direction);
    }

    /// Capture `index` against `edit`.
    pub fn at(edit: &Edit, index: usize, direction: Direction) -> Position {
        return Position {
            edit: edit.clone(),
            index,
            deletions: 0,
            direction,
            frozen: false,
        };
    }

    /// The same position carrying `deletions` deleted slots.
    pub fn with_deletions(self, deletions: usize) -> Position {
        return Position { deletions, ..self };
    }

    /// The index as of `edit()`.
    pub fn index(&self) -> usize {
        return self.index;
    }

    /// Deleted slots between the index and where the position logically is.
    pub fn deletions(&self) -> usize {
        return self.deletions;
    }

    pub fn direction(&self) -> Direction {
        return self.direction;
    }

    /// The edit this position is valid against.
    pub fn edit(&self) -> &Edit {
        return &self.edit;
    }

    pub fn is_frozen(&self) -> bool {
        return self.frozen;
    }

    /// Stop this position from being moved or synchronized.
    pub fn freeze(&mut self) {
        self.frozen = true;
    }

    /// A frozen copy.
    pub fn read_only_copy(&self) -> Position {
        let mut copy = self.clone();
        copy.frozen = true;
        return copy;
    }

    /// Move to `index` at the same edit, clearing deletions.
    pub fn set_index(&mut self, index: usize) -> Result<(), PositionError> {
        if self.frozen {
            return Err(PositionError::ReadOnly);
        }
        self.index = index;
        self.deletions = 0;
        return Ok(());
    }

    pub fn set_direction(&mut self, direction: Direction) -> Result<(), PositionError> {
        if self.frozen {
            return Err(PositionError::ReadOnly);
        }
        self.direction = direction;
        return Ok(());
    }

    /// Where this position lands at the owner's current edit, as
    /// `(index, deletions)`. Leaves the position untouched.
    pub fn rebased<E: Editable + ?Sized>(&self, owner: &E) -> Result<(usize, usize), PositionError> {
        let mut deletions = self.deletions;
        let index = Edit::adjust_index(&self.edit, owner.edits(), self.index, &mut deletions, self.direction)?
            .ok_or(PositionError::Disconnected)?;
        return Ok((index, deletions));
    }

    /// The index this position would have at the owner's current edit, or
    /// `None` when the histories are not connected.
    ///
    /// An edit log never lends out its value, so a rebase between edits is
    /// never refused as reentrant and `None` always means disconnected. Use
    /// `rebased` to get the error itself.
    pub fn get_index<E: Editable + ?Sized>(&self, owner: &E) -> Option<usize> {
        match self.rebased(owner) {
            Ok((index, _)) => return Some(index),
            Err(PositionError::Disconnected) => return None,
            Err(error) => {
                debug_assert!(false, "edit log refused a rebase: {error}");
                return None;
            }
        }
    }

    /// Move this position to the owner's current edit and return the new
    /// index. On failure the position is unchanged.
    pub fn synchronize<E: Editable + ?Sized>(&mut self, owner: &E) -> Result<usize, PositionError> {
        if self.frozen {
            return Err(PositionError::ReadOnly);
        }
        let (index, deletions) = self.rebased(owner)?;
        self.edit = owner.edits().clone();
        self.index = index;
        self.deletions = deletions;
        return Ok(index);
    }
}

/// Positions compare equal when they sit at the same place of the same edit.
impl PartialEq for Position {
    fn eq(&self, other: &Position) -> bool {
        return Edit::ptr_eq(&self.edit, &other.edit)
            && self.index == other.index
            && self.deletions == other.deletions;
    }
}

/// Only positions at the same edit are ordered.
impl PartialOrd for Position {
    fn partial_cmp(&self, other: &Position) -> Option<Ordering> {
        if !Edit::ptr_eq(&self.edit, &other.edit) {
            return None;
        }
        return Some((self.index, self.deletions).cmp(&(other.index, other.deletions)));
    }
}

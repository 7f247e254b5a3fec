// created = "2026-10-17"
// modified = "2026-10-17"
// driver = "Isaac Clayton"

//! Persistent values backed by a change log.
//!
//! A `Persistent<T, C>` is a handle onto a tree of reversible changes whose
//! root holds the one materialized value. Every other node records a change
//! and a link to its base; the node's value is the base's value with the
//! change applied. Deriving a new handle is O(1): it links a change in front
//! of an existing node.
//!
//! Reading a handle syncs it: the links from the handle down to the root are
//! reversed in place, the changes are replayed forward over the value, and
//! each replayed change is replaced by its inverse. The handle becomes the
//! new root and the old root now reaches the value through the inverted
//! chain. Reads of a synced handle are O(1) until something is derived from
//! it and read in turn.
//!
//! # Reentrancy
//!
//! While a sync runs, the value is checked out of the tree. A second sync
//! that reaches the same tree in that window (for example from inside a
//! `Change::apply`) fails with `HistoryError::Reentrant` before touching any
//! link. A change that panics mid-replay leaves the tree checked out, and
//! every later sync on it reports `Reentrant`.

pub mod edit;
pub mod position;

use std::cell::Ref;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use crate::error::HistoryError;

/// A reversible change over values of type `T`.
pub trait Change<T>: Sized {
    /// Apply this change to `value`, returning the change that undoes it.
    fn apply(self, value: &mut T) -> Self;
}

enum Link<T, C> {
    /// The materialized value; this node is the root of its tree.
    Data(T),
    /// This node's value is `change` applied to the value of `base`.
    Change { change: C, base: Rc<Node<T, C>> },
    /// The value is checked out by a sync in progress.
    Syncing,
}

struct Node<T, C> {
    link: RefCell<Link<T, C>>,
}

impl<T, C> Node<T, C> {
    fn new(link: Link<T, C>) -> Rc<Node<T, C>> {
        return Rc::new(Node {
            link: RefCell::new(link),
        });
    }
}

impl<T, C> Drop for Node<T, C> {
    // Long logs would otherwise drop recursively, one frame per link.
    fn drop(&mut self) {
        let mut base = take_base(self.link.get_mut());
        while let Some(node) = base {
            base = match Rc::try_unwrap(node) {
                Ok(mut node) => take_base(node.link.get_mut()),
                Err(_) => None,
            };
        }
    }
}

fn take_base<T, C>(link: &mut Link<T, C>) -> Option<Rc<Node<T, C>>> {
    if !matches!(link, Link::Change { .. }) {
        return None;
    }
    return match std::mem::replace(link, Link::Syncing) {
        Link::Change { base, .. } => Some(base),
        _ => None,
    };
}

/// A handle onto one version of a value in a change log.
pub struct Persistent<T, C> {
    node: Rc<Node<T, C>>,
}

impl<T, C> Clone for Persistent<T, C> {
    fn clone(&self) -> Self {
        return Persistent {
            node: self.node.clone(),
        };
    }
}

impl<T, C: Change<T>> Persistent<T, C> {
    /// A new log whose only version holds `value`.
    pub fn new(value: T) -> Persistent<T, C> {
        return Persistent {
            node: Node::new(Link::Data(value)),
        };
    }

    /// A new version: this one with `change` applied.
    pub fn derive(&self, change: C) -> Persistent<T, C> {
        return Persistent {
            node: Node::new(Link::Change {
                change,
                base: self.node.clone(),
            }),
        };
    }

    /// True when this handle holds the materialized value.
    pub fn is_synced(&self) -> bool {
        return matches!(
            self.node.link.try_borrow().as_deref(),
            Ok(Link::Data(_))
        );
    }

    /// True when both handles name the same version.
    pub fn ptr_eq(a: &Persistent<T, C>, b: &Persistent<T, C>) -> bool {
        return Rc::ptr_eq(&a.node, &b.node);
    }

    /// The value at this version, syncing first if needed.
    pub fn data(&self) -> Result<Ref<'_, T>, HistoryError> {
        self.sync()?;
        let link = self.node.link.try_borrow().map_err(|_| HistoryError::Reentrant)?;
        return Ref::filter_map(link, |link| match link {
            Link::Data(value) => Some(value),
            _ => None,
        })
        .map_err(|_| HistoryError::Reentrant);
    }

    /// Make this handle the root of its tree.
    pub fn sync(&self) -> Result<(), HistoryError> {
        let steps = self.depth()?;
        if steps == 0 {
            return Ok(());
        }

        // Reverse the links from here down to the root. Each node on the way
        // takes over the change of the node above it, still uninverted.
        let mut node = self.node.clone();
        let mut link = node.link.replace(Link::Syncing);
        let mut value = loop {
            match link {
                Link::Change { change, base } => {
                    link = base.link.replace(Link::Change { change, base: node });
                    node = base;
                }
                Link::Data(value) => break value,
                Link::Syncing => {
                    debug_assert!(false, "checked-out chain passed validation");
                    return Err(HistoryError::Reentrant);
                }
            }
        };

        // Replay forward, leaving the inverse of each change behind.
        loop {
            let next = {
                let mut slot = node.link.borrow_mut();
                match std::mem::replace(&mut *slot, Link::Syncing) {
                    Link::Change { change, base } => {
                        let inverse = change.apply(&mut value);
                        *slot = Link::Change {
                            change: inverse,
                            base: base.clone(),
                        };
                        base
                    }
                    _ => {
                        *slot = Link::Data(value);
                        break;
                    }
                }
            };
            node = next;
        }

        tracing::trace!(steps, "synced change log");
        return Ok(());
    }

    /// Number of links between this handle and the root, checking that no
    /// node on the way is borrowed or checked out.
    fn depth(&self) -> Result<usize, HistoryError> {
        let mut node = self.node.clone();
        let mut steps = 0;
        loop {
            let base = {
                let link = node.link.try_borrow_mut().map_err(|_| HistoryError::Reentrant)?;
                match &*link {
                    Link::Data(_) => return Ok(steps),
                    Link::Syncing => return Err(HistoryError::Reentrant),
                    Link::Change { base, .. } => base.clone(),
                }
            };
            node = base;
            steps += 1;
        }
    }

    /// Walk from `from` toward its root, stopping at `to`. Syncs `to` first
    /// so that every version connected to it lies on a path ending there.
    ///
    /// Returns the changes recorded on the way, in walk order, or `None`
    /// when the walk reaches a root other than `to`. Each change rebuilds the
    /// node it was recorded on from the next node along the path, so its
    /// inverse is the step the walk takes.
    pub fn get_changes(
        from: &Persistent<T, C>,
        to: &Persistent<T, C>,
    ) -> Result<Option<Vec<C>>, HistoryError>
    where
        C: Clone,
    {
        to.sync()?;
        let mut changes = Vec::new();
        let mut node = from.node.clone();
        while !Rc::ptr_eq(&node, &to.node) {
            let base = {
                let link = node.link.try_borrow().map_err(|_| HistoryError::Reentrant)?;
                match &*link {
                    Link::Change { change, base } => {
                        changes.push(change.clone());
                        base.clone()
                    }
                    Link::Data(_) => return Ok(None),
                    Link::Syncing => return Err(HistoryError::Reentrant),
                }
            };
            node = base;
        }
        return Ok(Some(changes));
    }

    /// True when the two versions share a history.
    pub fn is_connected(a: &Persistent<T, C>, b: &Persistent<T, C>) -> Result<bool, HistoryError>
    where
        C: Clone,
    {
        return Ok(Persistent::get_changes(a, b)?.is_some());
    }

    /// The changes stored from this handle down to its current root, nearest
    /// first. Does not sync.
    pub fn all_changes(&self) -> Vec<C>
    where
        C: Clone,
    {
        let mut changes = Vec::new();
        let mut node = self.node.clone();
        loop {
            let base = match node.link.try_borrow().as_deref() {
                Ok(Link::Change { change, base }) => {
                    changes.push(change.clone());
                    base.clone()
                }
                _ => break,
            };
            node = base;
        }
        return changes;
    }
}

impl<T, C> fmt::Debug for Persistent<T, C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.node.link.try_borrow().as_deref() {
            Ok(Link::Data(_)) => "synced",
            Ok(Link::Change { .. }) => "pending",
            Ok(Link::Syncing) | Err(_) => "syncing",
        };
        return write!(f, "Persistent({})", state);
    }
}

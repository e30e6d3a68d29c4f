//! RAII guards for the active-path flags
//!
//! Depth-first traversals mark the nodes on the current path and the path
//! restrictions crossed so far as *active*. The flags must be cleared on
//! every exit of the function that set them, including early returns and
//! `?` propagation.
//!
//! # Solution
//!
//! [`ActiveNode`] and [`ActiveRestrictions`] set the flags when created and
//! clear them when dropped. Both dereference to the [`Topology`] they
//! borrow, so a traversal continues through the guard:
//!
//! ```ignore
//! let mut topo = self.activate(node);
//! let mut topo = topo.activate_restrictions(restricts);
//! topo.visit_neighbours(node)?; // flags cleared even on error
//! ```
//!
//! Guards nest: the inner guard borrows the outer one and is dropped first.

use std::ops::{Deref, DerefMut};

use super::types::{Node, RestrictId};
use super::Topology;

/// Marks a node as being on the current traversal path
pub(crate) struct ActiveNode<'a> {
    topo: &'a mut Topology,
    node: Node,
}

impl Deref for ActiveNode<'_> {
    type Target = Topology;

    fn deref(&self) -> &Topology {
        self.topo
    }
}

impl DerefMut for ActiveNode<'_> {
    fn deref_mut(&mut self) -> &mut Topology {
        self.topo
    }
}

impl Drop for ActiveNode<'_> {
    fn drop(&mut self) {
        self.topo.node_mut(self.node).active = false;
    }
}

/// Marks path restrictions as crossed on the current traversal path
pub(crate) struct ActiveRestrictions<'a> {
    topo: &'a mut Topology,
    restricts: Vec<RestrictId>,
}

impl Deref for ActiveRestrictions<'_> {
    type Target = Topology;

    fn deref(&self) -> &Topology {
        self.topo
    }
}

impl DerefMut for ActiveRestrictions<'_> {
    fn deref_mut(&mut self) -> &mut Topology {
        self.topo
    }
}

impl Drop for ActiveRestrictions<'_> {
    fn drop(&mut self) {
        for &id in &self.restricts {
            self.topo.restrict_mut(id).active = false;
        }
    }
}

impl Topology {
    /// Set the active flag of `node` until the guard is dropped
    pub(crate) fn activate(&mut self, node: Node) -> ActiveNode<'_> {
        self.node_mut(node).active = true;
        ActiveNode { topo: self, node }
    }

    /// Set the active flag of all `restricts` until the guard is dropped
    pub(crate) fn activate_restrictions(
        &mut self,
        restricts: Vec<RestrictId>,
    ) -> ActiveRestrictions<'_> {
        for &id in &restricts {
            self.restrict_mut(id).active = true;
        }
        ActiveRestrictions {
            topo: self,
            restricts,
        }
    }
}

//! Marking the path between two stores
//!
//! Both ends walk towards the root of their partition, always advancing the
//! end farther from the root, until they meet. Crossing a loop cluster is
//! done in a single step by marking all routes through it.

use tracing::{debug, trace};

use super::BlockingStats;
use crate::error::TopologyError;
use crate::topology::{IntfId, LoopId, Node, PathStore, Topology};

impl Topology {
    /// Mark the path from `from` to `to`.
    ///
    /// Returns `Ok(false)` if no valid path exists. Results are memoized in
    /// both directions: a marked path is never computed again, and a
    /// failed query is remembered together with the restrictions that
    /// blocked it, see [`Topology::blocking_restrictions`].
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::NotPrepared` before
    /// [`Topology::prepare_traversal`] has succeeded, or a structural error
    /// if the derived data turns out to be inconsistent.
    pub fn mark_path(
        &mut self,
        from: impl Into<PathStore>,
        to: impl Into<PathStore>,
    ) -> Result<bool, TopologyError> {
        let (from, to) = (from.into(), to.into());
        if !self.prepared {
            return Err(TopologyError::NotPrepared);
        }
        if self.is_marked(from, to) {
            return Ok(true);
        }
        if self.no_path.contains_key(&(from, to)) {
            return Ok(false);
        }

        let mut blocking = BlockingStats::default();
        if self.path_mark(from, to, &mut blocking)? {
            trace!(
                "Marked path {} -> {}",
                self.store_name(from),
                self.store_name(to)
            );
            return Ok(true);
        }
        debug!(
            "No valid path {} -> {}",
            self.store_name(from),
            self.store_name(to)
        );
        self.no_path.insert((from, to), blocking);
        Ok(false)
    }

    /// True if a path from `from` to `to` has been marked.
    #[must_use]
    pub fn is_marked(&self, from: PathStore, to: PathStore) -> bool {
        if self.memo(from).path1.contains_key(&to) {
            return true;
        }
        match from {
            PathStore::Intf(i) => self.intf(i).loop_entry_zone.contains_key(&to),
            _ => false,
        }
    }

    /// Restrictions that blocked a failed query, with the number of
    /// attempts each of them blocked.
    ///
    /// `None` unless marking the path from `from` to `to` has failed.
    #[must_use]
    pub fn blocking_restrictions(&self, from: PathStore, to: PathStore) -> Option<&BlockingStats> {
        self.no_path.get(&(from, to))
    }

    fn cluster_exit(&self, lp: LoopId) -> Result<Node, TopologyError> {
        self.lp(lp)
            .cluster_exit
            .ok_or_else(|| TopologyError::LoopNotReduced {
                exit: self.node_name(self.lp(lp).exit).to_string(),
            })
    }

    /// Interface behind `intf` on the way to the root.
    fn towards_root(&self, intf: IntfId, to_store: PathStore) -> Result<Node, TopologyError> {
        self.intf(intf)
            .to_zone1
            .ok_or_else(|| TopologyError::incomplete(self.intf_name(intf), self.store_name(to_store)))
    }

    /// Link the next interface at the current position of the source side.
    fn set_next(
        &mut self,
        from_in: Option<IntfId>,
        from_store: PathStore,
        to_store: PathStore,
        next: Option<IntfId>,
    ) {
        match from_in {
            Some(intf) => self.memo_mut(PathStore::Intf(intf)).path.insert(to_store, next),
            None => self.memo_mut(from_store).path1.insert(to_store, next),
        };
    }

    pub(crate) fn path_mark(
        &mut self,
        from_store: PathStore,
        to_store: PathStore,
        blocking: &mut BlockingStats,
    ) -> Result<bool, TopologyError> {
        let mut from = self.store_node(from_store);
        let mut to = self.store_node(to_store);
        let mut from_in: Option<IntfId> = None;
        let mut to_out: Option<IntfId> = None;

        loop {
            // Paths meet outside of a loop or at the edge of a loop.
            if from == to {
                self.set_next(from_in, from_store, to_store, to_out);
                return Ok(true);
            }

            let from_loop = self.node(from).loop_;
            let to_loop = self.node(to).loop_;
            if let (Some(fl), Some(tl)) = (from_loop, to_loop) {
                if self.cluster_exit(fl)? == self.cluster_exit(tl)? {
                    if self.connect_cluster_path(
                        from, to, from_in, to_out, from_store, to_store, blocking,
                    )? {
                        return Ok(true);
                    }
                    break;
                }
            }

            if self.node(from).distance >= self.node(to).distance {
                // Sub-path has been marked by an earlier query.
                if let Some(intf) = from_in {
                    if self.memo(PathStore::Intf(intf)).path.contains_key(&to_store) {
                        return Ok(true);
                    }
                }

                let from_out = match self.node(from).to_zone1 {
                    Some(out) => out,
                    None => {
                        // Border of the partition.
                        let Some(fl) = from_loop else { break };
                        let exit = self.cluster_exit(fl)?;
                        let Some(out) = self.node(exit).to_zone1 else {
                            break;
                        };
                        if !self.connect_cluster_path(
                            from, exit, from_in, Some(out), from_store, to_store, blocking,
                        )? {
                            break;
                        }
                        out
                    }
                };
                self.set_next(from_in, from_store, to_store, Some(from_out));
                from = self.towards_root(from_out, to_store)?;
                from_in = Some(from_out);
            } else {
                let to_in = match self.node(to).to_zone1 {
                    Some(intf) => intf,
                    None => {
                        let Some(tl) = to_loop else { break };
                        let entry = self.cluster_exit(tl)?;
                        let Some(intf) = self.node(entry).to_zone1 else {
                            break;
                        };
                        if !self.connect_cluster_path(
                            entry, to, Some(intf), to_out, from_store, to_store, blocking,
                        )? {
                            break;
                        }
                        intf
                    }
                };
                self.memo_mut(PathStore::Intf(to_in))
                    .path
                    .insert(to_store, to_out);
                to = self.towards_root(to_in, to_store)?;
                to_out = Some(to_in);
            }
        }

        self.remove_path(from_store, to_store);
        Ok(false)
    }

    /// Remove a partially marked path.
    fn remove_path(&mut self, from_store: PathStore, to_store: PathStore) {
        let mut next = self.memo_mut(from_store).path1.remove(&to_store).flatten();
        while let Some(intf) = next {
            next = self
                .memo_mut(PathStore::Intf(intf))
                .path
                .remove(&to_store)
                .flatten();
        }
    }
}

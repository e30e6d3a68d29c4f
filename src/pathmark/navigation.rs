//! Navigation between loops of a cluster
//!
//! A route through a cluster of touching loops must not wander into loops
//! that lie off the way between its endpoints. The navigation of a pair
//! `(from, to)` lists, for each loop on the way, the loops that may be
//! entered from it.

use std::collections::HashMap;
use std::sync::Arc;

use crate::error::TopologyError;
use crate::topology::{LoopId, Navigation, Node, Topology};

impl Topology {
    /// Loop of a node that is known to be part of a cluster
    pub(crate) fn loop_in_cluster(&self, node: Node) -> Result<LoopId, TopologyError> {
        self.node(node)
            .loop_
            .ok_or_else(|| TopologyError::NotInLoop {
                node: self.node_name(node).to_string(),
            })
    }

    /// Compute, or take from cache, the navigation from `from` to `to`.
    ///
    /// Both nodes must be members of the same loop cluster. The result is
    /// cached at `from`.
    pub(crate) fn cluster_navigation(
        &mut self,
        from: Node,
        to: Node,
    ) -> Result<Arc<Navigation>, TopologyError> {
        if let Some(navi) = self.node(from).navi.get(&to) {
            return Ok(Arc::clone(navi));
        }

        let mut navi: Navigation = HashMap::new();
        let mut add = |l1: LoopId, l2: LoopId| {
            navi.entry(l1).or_default().insert(l2);
        };

        let (mut cur_from, mut cur_to) = (from, to);
        let mut from_loop = self.loop_in_cluster(cur_from)?;
        let mut to_loop = self.loop_in_cluster(cur_to)?;
        loop {
            if from_loop == to_loop {
                if cur_from == cur_to {
                    break;
                }
                add(from_loop, from_loop);

                // Inside the loop of the exit only `from_loop` may be entered.
                let exit_loop = self.loop_in_cluster(self.lp(from_loop).exit)?;
                add(exit_loop, from_loop);
                break;
            } else if self.lp(from_loop).distance >= self.lp(to_loop).distance {
                add(from_loop, from_loop);
                cur_from = self.lp(from_loop).exit;
                from_loop = self.loop_in_cluster(cur_from)?;
            } else {
                add(to_loop, to_loop);
                cur_to = self.lp(to_loop).exit;
                let entry_loop = self.loop_in_cluster(cur_to)?;
                add(entry_loop, to_loop);
                to_loop = entry_loop;
            }
        }

        let navi = Arc::new(navi);
        self.node_mut(from).navi.insert(to, Arc::clone(&navi));
        Ok(navi)
    }
}

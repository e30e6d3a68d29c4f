//! Loop reduction
//!
//! Nested loop markers found during discovery are resolved to their
//! outermost loop, and all loops of a cluster of touching loops share one
//! cluster exit. Afterwards every loop member has the distance of its
//! cluster exit.

use tracing::debug;

use crate::topology::{LoopId, Node, Topology};

impl Topology {
    pub(crate) fn process_loops(&mut self) {
        let nodes: Vec<Node> = self
            .zone_ids()
            .map(Node::Zone)
            .chain(self.router_ids().map(Node::Router))
            .collect();

        for &node in &nodes {
            if let Some(lp) = self.node(node).loop_ {
                let outer = self.find_outer_loop(lp);
                self.node_mut(node).loop_ = Some(outer);
            }
        }

        let mut clusters = 0;
        for &node in &nodes {
            let Some(lp) = self.node(node).loop_ else {
                continue;
            };
            let exit = self.set_loop_cluster_exit(lp);
            if exit == node {
                clusters += 1;
            }
            self.node_mut(node).distance = self.node(exit).distance;
        }

        for index in 0..self.interfaces.len() {
            if let Some(lp) = self.interfaces[index].loop_ {
                self.interfaces[index].loop_ = Some(self.find_outer_loop(lp));
            }
        }
        debug!("Reduced loops to {} clusters", clusters);
    }

    /// Follow redirects to the outermost loop.
    fn find_outer_loop(&self, mut lp: LoopId) -> LoopId {
        while let Some(next) = self.lp(lp).redirect {
            lp = next;
        }
        lp
    }

    /// Find and cache the node through which the cluster of `lp` is left.
    ///
    /// All loops passed on the way to the cluster exit get it cached too.
    fn set_loop_cluster_exit(&mut self, lp: LoopId) -> Node {
        let mut chain = Vec::new();
        let mut current = lp;
        let cluster_exit = loop {
            if let Some(exit) = self.lp(current).cluster_exit {
                break exit;
            }
            chain.push(current);
            let exit = self.lp(current).exit;
            match self.node(exit).loop_.map(|l| self.find_outer_loop(l)) {
                Some(outer) if outer != current => current = outer,
                _ => break exit,
            }
        };
        for id in chain {
            self.lp_mut(id).cluster_exit = Some(cluster_exit);
        }
        cluster_exit
    }
}

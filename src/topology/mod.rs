//! Topology graph model
//!
//! The path engine works on a graph of [`Node`]s: zones and routers joined
//! by interfaces. All objects live in arenas owned by [`Topology`] and are
//! addressed by typed indices, so loops, nodes and interfaces can reference
//! each other freely for the whole lifetime of a compilation run.
//!
//! # Building
//!
//! ```
//! use netpath::topology::TopologyBuilder;
//!
//! let mut builder = TopologyBuilder::new();
//! let z1 = builder.add_zone("any:[network:n1]").unwrap();
//! let z2 = builder.add_zone("any:[network:n2]").unwrap();
//! let r1 = builder.add_router("router:r1").unwrap();
//! builder.add_interface("interface:r1.n1", r1, z1).unwrap();
//! builder.add_interface("interface:r1.n2", r1, z2).unwrap();
//! let topology = builder.build();
//! assert_eq!(topology.zone_count(), 2);
//! ```
//!
//! # Memoization
//!
//! Every zone, router and interface carries a [`PathMemo`] holding the
//! lazily computed path data for each destination it has been queried
//! with. The tables only grow; nothing is evicted during a run.

mod builder;
mod guard;
mod types;

use std::collections::HashMap;

pub use builder::TopologyBuilder;
pub use types::{
    IntfId, LoopId, LoopPath, Navigation, Node, PathStore, RestrictId, RouterId, ZoneId,
};
pub(crate) use types::{Interface, Loop, NodeData, PathMemo, PathRestriction, Router, Zone};

use crate::pathmark::BlockingStats;

/// The path graph together with all derived traversal data.
#[derive(Debug, Default)]
pub struct Topology {
    pub(crate) zones: Vec<Zone>,
    pub(crate) routers: Vec<Router>,
    pub(crate) interfaces: Vec<Interface>,
    pub(crate) loops: Vec<Loop>,
    pub(crate) restrictions: Vec<PathRestriction>,

    pub(crate) zone_names: HashMap<String, ZoneId>,
    pub(crate) router_names: HashMap<String, RouterId>,
    pub(crate) intf_names: HashMap<String, IntfId>,

    /// Partition tag, keyed by the root zone of a partition
    pub(crate) partition_names: HashMap<ZoneId, String>,
    /// Queries known to have no valid path
    pub(crate) no_path: HashMap<(PathStore, PathStore), BlockingStats>,
    pub(crate) prepared: bool,
}

impl Topology {
    // ========================================================================
    // Arena access
    // ========================================================================

    pub(crate) fn zone(&self, id: ZoneId) -> &Zone {
        &self.zones[id.0]
    }

    pub(crate) fn router(&self, id: RouterId) -> &Router {
        &self.routers[id.0]
    }

    pub(crate) fn intf(&self, id: IntfId) -> &Interface {
        &self.interfaces[id.0]
    }

    pub(crate) fn intf_mut(&mut self, id: IntfId) -> &mut Interface {
        &mut self.interfaces[id.0]
    }

    pub(crate) fn lp(&self, id: LoopId) -> &Loop {
        &self.loops[id.0]
    }

    pub(crate) fn lp_mut(&mut self, id: LoopId) -> &mut Loop {
        &mut self.loops[id.0]
    }

    pub(crate) fn restrict(&self, id: RestrictId) -> &PathRestriction {
        &self.restrictions[id.0]
    }

    pub(crate) fn restrict_mut(&mut self, id: RestrictId) -> &mut PathRestriction {
        &mut self.restrictions[id.0]
    }

    pub(crate) fn node(&self, node: Node) -> &NodeData {
        match node {
            Node::Zone(z) => &self.zones[z.0].node,
            Node::Router(r) => &self.routers[r.0].node,
        }
    }

    pub(crate) fn node_mut(&mut self, node: Node) -> &mut NodeData {
        match node {
            Node::Zone(z) => &mut self.zones[z.0].node,
            Node::Router(r) => &mut self.routers[r.0].node,
        }
    }

    pub(crate) fn memo(&self, store: PathStore) -> &PathMemo {
        match store {
            PathStore::Zone(z) => &self.zones[z.0].node.memo,
            PathStore::Router(r) => &self.routers[r.0].node.memo,
            PathStore::Intf(i) => &self.interfaces[i.0].memo,
        }
    }

    pub(crate) fn memo_mut(&mut self, store: PathStore) -> &mut PathMemo {
        match store {
            PathStore::Zone(z) => &mut self.zones[z.0].node.memo,
            PathStore::Router(r) => &mut self.routers[r.0].node.memo,
            PathStore::Intf(i) => &mut self.interfaces[i.0].memo,
        }
    }

    /// Node where paths of a store begin: an interface belongs to its router.
    pub(crate) fn store_node(&self, store: PathStore) -> Node {
        match store {
            PathStore::Zone(z) => Node::Zone(z),
            PathStore::Router(r) => Node::Router(r),
            PathStore::Intf(i) => Node::Router(self.intf(i).router),
        }
    }

    /// Node on the other side of `intf` when coming from `from`.
    pub(crate) fn next_node(&self, from: Node, intf: IntfId) -> Node {
        let intf = self.intf(intf);
        match from {
            Node::Zone(_) => Node::Router(intf.router),
            Node::Router(_) => Node::Zone(intf.zone),
        }
    }

    // ========================================================================
    // Names
    // ========================================================================

    /// Name of a node
    #[must_use]
    pub fn node_name(&self, node: Node) -> &str {
        match node {
            Node::Zone(z) => &self.zone(z).name,
            Node::Router(r) => &self.router(r).name,
        }
    }

    /// Name of a path store
    #[must_use]
    pub fn store_name(&self, store: PathStore) -> &str {
        match store {
            PathStore::Zone(z) => &self.zone(z).name,
            PathStore::Router(r) => &self.router(r).name,
            PathStore::Intf(i) => &self.intf(i).name,
        }
    }

    /// Name of an interface
    #[must_use]
    pub fn intf_name(&self, intf: IntfId) -> &str {
        &self.intf(intf).name
    }

    /// Name of a path restriction
    #[must_use]
    pub fn restriction_name(&self, id: RestrictId) -> &str {
        &self.restrict(id).name
    }

    /// Look up a zone by name
    #[must_use]
    pub fn find_zone(&self, name: &str) -> Option<ZoneId> {
        self.zone_names.get(name).copied()
    }

    /// Look up a router by name
    #[must_use]
    pub fn find_router(&self, name: &str) -> Option<RouterId> {
        self.router_names.get(name).copied()
    }

    /// Look up an interface by name
    #[must_use]
    pub fn find_interface(&self, name: &str) -> Option<IntfId> {
        self.intf_names.get(name).copied()
    }

    // ========================================================================
    // Inspection
    // ========================================================================

    /// Number of zones
    #[must_use]
    pub fn zone_count(&self) -> usize {
        self.zones.len()
    }

    /// Number of routers
    #[must_use]
    pub fn router_count(&self) -> usize {
        self.routers.len()
    }

    /// Number of interfaces
    #[must_use]
    pub fn interface_count(&self) -> usize {
        self.interfaces.len()
    }

    /// All zone ids in insertion order
    pub fn zone_ids(&self) -> impl Iterator<Item = ZoneId> + '_ {
        (0..self.zones.len()).map(ZoneId)
    }

    /// All router ids in insertion order
    pub fn router_ids(&self) -> impl Iterator<Item = RouterId> + '_ {
        (0..self.routers.len()).map(RouterId)
    }

    /// Incident interfaces of a node, in insertion order
    #[must_use]
    pub fn interfaces_of(&self, node: Node) -> &[IntfId] {
        &self.node(node).interfaces
    }

    /// Router owning an interface
    #[must_use]
    pub fn intf_router(&self, intf: IntfId) -> RouterId {
        self.intf(intf).router
    }

    /// Zone an interface is attached to
    #[must_use]
    pub fn intf_zone(&self, intf: IntfId) -> ZoneId {
        self.intf(intf).zone
    }

    /// True once `prepare_traversal` has succeeded
    #[must_use]
    pub const fn is_prepared(&self) -> bool {
        self.prepared
    }

    /// Loop cluster a node belongs to
    #[must_use]
    pub fn loop_of(&self, node: Node) -> Option<LoopId> {
        self.node(node).loop_
    }

    /// Loop an interface belongs to, if it is a loop-internal edge
    #[must_use]
    pub fn intf_loop(&self, intf: IntfId) -> Option<LoopId> {
        self.intf(intf).loop_
    }

    /// Node through which the loop cluster of `node` reaches the root
    #[must_use]
    pub fn cluster_exit_of(&self, node: Node) -> Option<Node> {
        self.node(node)
            .loop_
            .and_then(|l| self.lp(l).cluster_exit)
    }

    /// Distance of a node from the root of its partition
    #[must_use]
    pub fn distance(&self, node: Node) -> u32 {
        self.node(node).distance
    }

    /// Interface leading one step towards the root of the partition
    #[must_use]
    pub fn to_root(&self, node: Node) -> Option<IntfId> {
        self.node(node).to_zone1
    }

    /// Root zone of the partition a node belongs to
    #[must_use]
    pub fn partition_of(&self, node: Node) -> Option<ZoneId> {
        self.node(node).zone1
    }

    /// Name of the partition: its tag if one was given, else the name of
    /// its root zone.
    #[must_use]
    pub fn partition_name(&self, node: Node) -> Option<&str> {
        let root = self.partition_of(node)?;
        Some(
            self.partition_names
                .get(&root)
                .map_or(self.zone(root).name.as_str(), String::as_str),
        )
    }

    /// Current members of a path restriction
    #[must_use]
    pub fn restriction_elements(&self, id: RestrictId) -> &[IntfId] {
        &self.restrict(id).elements
    }

    /// Restrictions still attached to an interface
    #[must_use]
    pub fn restrictions_of(&self, intf: IntfId) -> &[RestrictId] {
        &self.intf(intf).path_restrict
    }

    /// True if the restriction was removed as subset of other restrictions
    #[must_use]
    pub fn is_restriction_redundant(&self, id: RestrictId) -> bool {
        self.restrict(id).deleted.is_some()
    }

    /// Restricted interface without own loop at a zone inside a loop
    #[must_use]
    pub fn is_loop_zone_border(&self, intf: IntfId) -> bool {
        self.intf(intf).loop_zone_border
    }

    /// Path store to use for an interface endpoint.
    ///
    /// A secondary interface is replaced by its main interface. An
    /// interface with a path restriction is a store of its own, any other
    /// interface is represented by its router.
    #[must_use]
    pub fn path_node_of_interface(&self, intf: IntfId) -> PathStore {
        let intf = self.intf(intf).main_intf.unwrap_or(intf);
        if self.intf(intf).path_restrict.is_empty() {
            PathStore::Router(self.intf(intf).router)
        } else {
            PathStore::Intf(intf)
        }
    }
}

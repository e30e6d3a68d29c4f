//! Arena types of the topology graph
//!
//! Zones, routers, interfaces, loops and path restrictions live in flat
//! vectors owned by [`Topology`](super::Topology) and reference each other
//! through the typed indices defined here.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

macro_rules! arena_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
        pub struct $name(pub(crate) usize);

        impl $name {
            /// Position of the object in its arena
            #[must_use]
            pub const fn index(self) -> usize {
                self.0
            }
        }
    };
}

arena_id!(
    /// Index of a zone
    ZoneId
);
arena_id!(
    /// Index of a router
    RouterId
);
arena_id!(
    /// Index of an interface
    IntfId
);
arena_id!(
    /// Index of a loop marker
    LoopId
);
arena_id!(
    /// Index of a path restriction
    RestrictId
);

/// A node of the path graph.
///
/// Zones and routers alternate along every path; interfaces are the edges
/// between them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Node {
    Zone(ZoneId),
    Router(RouterId),
}

impl Node {
    /// True for router nodes
    #[must_use]
    pub const fn is_router(self) -> bool {
        matches!(self, Self::Router(_))
    }
}

/// An object that owns memoized path data.
///
/// Besides nodes this includes interfaces, since a path may start or end
/// at an interface carrying a path restriction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum PathStore {
    Zone(ZoneId),
    Router(RouterId),
    Intf(IntfId),
}

impl From<Node> for PathStore {
    fn from(node: Node) -> Self {
        match node {
            Node::Zone(z) => Self::Zone(z),
            Node::Router(r) => Self::Router(r),
        }
    }
}

impl From<ZoneId> for PathStore {
    fn from(zone: ZoneId) -> Self {
        Self::Zone(zone)
    }
}

impl From<RouterId> for PathStore {
    fn from(router: RouterId) -> Self {
        Self::Router(router)
    }
}

impl From<IntfId> for PathStore {
    fn from(intf: IntfId) -> Self {
        Self::Intf(intf)
    }
}

/// Loops that may be entered while being inside a given loop.
pub type Navigation = HashMap<LoopId, HashSet<LoopId>>;

/// Route through a loop cluster, stored where the route begins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LoopPath {
    /// Interfaces by which the start object is left
    pub enter: Vec<IntfId>,
    /// Interfaces by which the end object is entered
    pub leave: Vec<IntfId>,
    /// (in, out) pairs of routers inside the loop
    pub router_tuples: Vec<(IntfId, IntfId)>,
    /// (in, out) pairs of zones inside the loop
    pub zone_tuples: Vec<(IntfId, IntfId)>,
}

impl LoopPath {
    /// The same route in opposite direction
    #[must_use]
    pub fn reversed(&self) -> Self {
        let flip = |tuples: &[(IntfId, IntfId)]| -> Vec<(IntfId, IntfId)> {
            tuples.iter().map(|&(i, o)| (o, i)).collect()
        };
        Self {
            enter: self.leave.clone(),
            leave: self.enter.clone(),
            router_tuples: flip(&self.router_tuples),
            zone_tuples: flip(&self.zone_tuples),
        }
    }
}

/// Memoized path data, keyed by destination store.
///
/// A present key with a `None` value marks the end of a path: the
/// destination has been reached.
#[derive(Debug, Clone, Default)]
pub struct PathMemo {
    /// Next interface when entered at this object (interfaces only)
    pub(crate) path: HashMap<PathStore, Option<IntfId>>,
    /// Next interface when the path starts at this object
    pub(crate) path1: HashMap<PathStore, Option<IntfId>>,
    /// Store where the route through a loop cluster begins
    pub(crate) loop_entry: HashMap<PathStore, PathStore>,
    /// Store where the route through a loop cluster ends
    pub(crate) loop_exit: HashMap<PathStore, PathStore>,
    /// Routes through a loop cluster starting at this object
    pub(crate) loop_path: HashMap<PathStore, LoopPath>,
}

/// Data common to zones and routers.
#[derive(Debug, Clone, Default)]
pub struct NodeData {
    pub(crate) interfaces: Vec<IntfId>,
    pub(crate) active: bool,
    pub(crate) distance: u32,
    pub(crate) loop_: Option<LoopId>,
    /// Interface one step closer to the root zone of the partition
    pub(crate) to_zone1: Option<IntfId>,
    /// Root zone of the partition, set once the node has been reached
    pub(crate) zone1: Option<ZoneId>,
    pub(crate) navi: HashMap<Node, Arc<Navigation>>,
    pub(crate) memo: PathMemo,
}

#[derive(Debug, Clone)]
pub struct Zone {
    pub(crate) name: String,
    pub(crate) partition: Option<String>,
    pub(crate) ipv6: bool,
    pub(crate) node: NodeData,
}

#[derive(Debug, Clone)]
pub struct Router {
    pub(crate) name: String,
    /// Original router of a split crypto router
    pub(crate) orig_router: Option<RouterId>,
    pub(crate) node: NodeData,
}

#[derive(Debug, Clone)]
pub struct Interface {
    pub(crate) name: String,
    pub(crate) router: RouterId,
    pub(crate) zone: ZoneId,
    pub(crate) loop_: Option<LoopId>,
    /// Node one step closer to the root zone
    pub(crate) to_zone1: Option<Node>,
    pub(crate) path_restrict: Vec<RestrictId>,
    pub(crate) loop_zone_border: bool,
    /// Set for secondary interfaces
    pub(crate) main_intf: Option<IntfId>,
    /// Members of a group of redundancy interfaces, including this one
    pub(crate) redundancy_intfs: Vec<IntfId>,
    pub(crate) tunnel: bool,
    pub(crate) memo: PathMemo,
    /// Zone where a loop path begins, if the path starts at this
    /// interface at the border of a zone in a loop
    pub(crate) loop_entry_zone: HashMap<PathStore, PathStore>,
}

/// A cycle, or after reduction a cluster of touching cycles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Loop {
    pub(crate) exit: Node,
    pub(crate) distance: u32,
    pub(crate) cluster_exit: Option<Node>,
    pub(crate) redirect: Option<LoopId>,
}

#[derive(Debug, Clone)]
pub struct PathRestriction {
    pub(crate) name: String,
    pub(crate) elements: Vec<IntfId>,
    pub(crate) active: bool,
    /// Set when found redundant; lists the supersets
    pub(crate) deleted: Option<Vec<RestrictId>>,
}

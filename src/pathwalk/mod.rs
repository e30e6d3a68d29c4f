//! Path walking
//!
//! Replays a marked path and calls a visitor for each router, or each
//! zone, on it. The visitor gets the interface by which the object is
//! entered and the one by which it is left; `None` marks the source or
//! destination itself.
//!
//! # Example
//!
//! ```
//! use netpath::config::EngineConfig;
//! use netpath::diag::Diagnostics;
//! use netpath::pathwalk::CallAt;
//! use netpath::topology::TopologyBuilder;
//!
//! let mut builder = TopologyBuilder::new();
//! let z1 = builder.add_zone("z1").unwrap();
//! let z2 = builder.add_zone("z2").unwrap();
//! let r1 = builder.add_router("r1").unwrap();
//! let a = builder.add_interface("r1.z1", r1, z1).unwrap();
//! let b = builder.add_interface("r1.z2", r1, z2).unwrap();
//! let mut topology = builder.build();
//! topology
//!     .prepare_traversal(&EngineConfig::default(), &mut Diagnostics::buffered())
//!     .unwrap();
//!
//! let mut hops = Vec::new();
//! topology
//!     .single_path_walk(z1.into(), z2.into(), CallAt::Router, |i, o| hops.push((i, o)))
//!     .unwrap();
//! assert_eq!(hops, vec![(Some(a), Some(b))]);
//! ```

mod auto_intf;
mod report;
mod walk;

use crate::topology::{PathStore, Topology};

/// Kind of object the visitor is called at
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CallAt {
    #[default]
    Router,
    Zone,
}

/// A query with source and destination path stores
pub trait PathRule {
    /// Store the path starts at
    fn src_path(&self) -> PathStore;

    /// Store the path ends at
    fn dst_path(&self) -> PathStore;

    /// Context shown when no valid path exists
    fn describe(&self, topology: &Topology) -> String {
        format!(
            "for rule from {} to {}",
            topology.store_name(self.src_path()),
            topology.store_name(self.dst_path())
        )
    }
}

/// Plain source and destination pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PathQuery {
    pub src: PathStore,
    pub dst: PathStore,
}

impl PathRule for PathQuery {
    fn src_path(&self) -> PathStore {
        self.src
    }

    fn dst_path(&self) -> PathStore {
        self.dst
    }
}

//! netpath: Topology path engine for network policy compilation
//!
//! This crate finds and memoizes paths through a network topology of zones
//! and routers, so that every filtering rule can be distributed to the
//! devices between its source and its destination.
//!
//! # Features
//!
//! - **Loop Discovery**: Distances, partitions and cycles in one depth-first pass
//! - **Loop Clusters**: Touching cycles are reduced to clusters with one exit
//! - **Path Restrictions**: Routes crossing a restriction twice are rejected
//! - **Memoization**: Each source/destination pair is marked at most once
//! - **Background Passes**: Read-only analysis passes run side by side
//!
//! # Architecture
//!
//! ```text
//! TopologyConfig → TopologyBuilder → Topology
//!                                       ↓
//!                               prepare_traversal
//!                                       ↓
//!                         mark_path → path_walk → visitor
//! ```
//!
//! # Quick Start
//!
//! ```no_run
//! use netpath::config::{load_config, load_topology};
//! use netpath::diag::Diagnostics;
//! use netpath::pathwalk::CallAt;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = load_config("/etc/netpath/config.json")?;
//! let mut topology = load_topology("/etc/netpath/topology.json")?;
//!
//! let mut diag = Diagnostics::new();
//! topology.prepare_traversal(&config.engine, &mut diag)?;
//!
//! let src = topology.find_zone("any:[network:n1]").unwrap();
//! let dst = topology.find_zone("any:[network:n2]").unwrap();
//! topology.single_path_walk(src.into(), dst.into(), CallAt::Router, |i, o| {
//!     println!("{i:?} -> {o:?}");
//! })?;
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`config`]: Configuration types and loading
//! - [`diag`]: Diagnostics sink and background passes
//! - [`error`]: Error types
//! - [`pathmark`]: Marking paths between two stores
//! - [`pathwalk`]: Walking marked paths
//! - [`setpath`]: Preparation of the graph
//! - [`topology`]: Graph model and builder

#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod config;
pub mod diag;
pub mod error;
pub mod pathmark;
pub mod pathwalk;
pub mod setpath;
pub mod topology;

// Re-export commonly used types at the crate root
pub use config::{Config, EngineConfig, LogConfig, TopologyConfig};
pub use diag::{run_split, Diagnostic, Diagnostics, Severity};
pub use error::{ConfigError, NetpathError, NoPathReason, PathError, Result, TopologyError};
pub use pathmark::BlockingStats;
pub use pathwalk::{CallAt, PathQuery, PathRule};
pub use topology::{
    IntfId, LoopId, LoopPath, Node, PathStore, RestrictId, RouterId, Topology, TopologyBuilder,
    ZoneId,
};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

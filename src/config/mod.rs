//! Configuration module for netpath
//!
//! This module provides configuration types, the JSON topology description
//! and loading utilities.
//!
//! # Example
//!
//! ```no_run
//! use netpath::config::{load_config, load_topology};
//!
//! let config = load_config("/etc/netpath/config.json").unwrap();
//! println!("Concurrency: {}", config.engine.concurrency);
//!
//! let topology = load_topology("topology.json").unwrap();
//! println!("{} zones", topology.zone_count());
//! ```

mod loader;
mod topology;
mod types;

pub use loader::{
    create_default_config, load_config, load_config_str, load_config_with_env, load_topology,
    load_topology_str,
};
pub use topology::{
    InterfaceConfig, PathRestrictionConfig, RouterConfig, TopologyConfig, ZoneConfig,
};
pub use types::{Config, EngineConfig, LogConfig};

//! JSON description of a topology
//!
//! A flat list of zones, routers, interfaces and path restrictions that
//! references objects by name. Used by the command line tool and by test
//! fixtures.
//!
//! ```json
//! {
//!   "zones": [ { "name": "z1" }, { "name": "z2", "partition": "lab" } ],
//!   "routers": [ { "name": "r1" } ],
//!   "interfaces": [
//!     { "name": "r1.z1", "router": "r1", "zone": "z1" },
//!     { "name": "r1.z2", "router": "r1", "zone": "z2" }
//!   ],
//!   "pathrestrictions": [
//!     { "name": "p1", "interfaces": ["r1.z1", "r1.z2"] }
//!   ]
//! }
//! ```

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, TopologyError};
use crate::topology::{IntfId, RouterId, Topology, TopologyBuilder, ZoneId};

/// Topology description
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TopologyConfig {
    #[serde(default)]
    pub zones: Vec<ZoneConfig>,

    #[serde(default)]
    pub routers: Vec<RouterConfig>,

    #[serde(default)]
    pub interfaces: Vec<InterfaceConfig>,

    #[serde(default)]
    pub pathrestrictions: Vec<PathRestrictionConfig>,
}

/// A zone
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ZoneConfig {
    pub name: String,

    /// Tag of an intentionally separate partition
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partition: Option<String>,

    #[serde(default)]
    pub ipv6: bool,
}

/// A router
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouterConfig {
    pub name: String,

    /// For parts of a split crypto router: name of the original router
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub orig_router: Option<String>,
}

/// An interface connecting a router to a zone
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InterfaceConfig {
    pub name: String,
    pub router: String,
    pub zone: String,

    /// Main interface, if this is a secondary interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub main: Option<String>,

    /// Name of the redundancy group this virtual interface belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub redundancy_group: Option<String>,

    #[serde(default)]
    pub tunnel: bool,
}

/// A path restriction
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PathRestrictionConfig {
    pub name: String,
    pub interfaces: Vec<String>,
}

impl TopologyConfig {
    /// Build the topology graph.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ValidationError` for unknown or duplicate names.
    pub fn build(&self) -> Result<Topology, ConfigError> {
        let mut builder = TopologyBuilder::new();

        let mut zones: BTreeMap<&str, ZoneId> = BTreeMap::new();
        for zone in &self.zones {
            let id = builder.add_zone(&zone.name).map_err(invalid)?;
            if let Some(tag) = &zone.partition {
                builder.set_partition(id, tag).map_err(invalid)?;
            }
            if zone.ipv6 {
                builder.set_ipv6(id).map_err(invalid)?;
            }
            zones.insert(&zone.name, id);
        }

        let mut routers: BTreeMap<&str, RouterId> = BTreeMap::new();
        for router in &self.routers {
            let id = builder.add_router(&router.name).map_err(invalid)?;
            routers.insert(&router.name, id);
        }
        for router in &self.routers {
            if let Some(orig) = &router.orig_router {
                let orig = lookup(&routers, orig, "router")?;
                builder
                    .set_orig_router(routers[router.name.as_str()], orig)
                    .map_err(invalid)?;
            }
        }

        let mut intfs: BTreeMap<&str, IntfId> = BTreeMap::new();
        let mut groups: BTreeMap<&str, Vec<IntfId>> = BTreeMap::new();
        for intf in &self.interfaces {
            let router = lookup(&routers, &intf.router, "router")?;
            let zone = lookup(&zones, &intf.zone, "zone")?;
            let id = builder
                .add_interface(&intf.name, router, zone)
                .map_err(invalid)?;
            if intf.tunnel {
                builder.set_tunnel(id).map_err(invalid)?;
            }
            if let Some(group) = &intf.redundancy_group {
                groups.entry(group).or_default().push(id);
            }
            intfs.insert(&intf.name, id);
        }
        for intf in &self.interfaces {
            if let Some(main) = &intf.main {
                let main = lookup(&intfs, main, "interface")?;
                builder
                    .set_secondary(intfs[intf.name.as_str()], main)
                    .map_err(invalid)?;
            }
        }
        for members in groups.values() {
            builder.add_redundancy_group(members).map_err(invalid)?;
        }

        for restrict in &self.pathrestrictions {
            let members = restrict
                .interfaces
                .iter()
                .map(|name| lookup(&intfs, name, "interface"))
                .collect::<Result<Vec<_>, _>>()?;
            builder
                .add_pathrestriction(&restrict.name, &members)
                .map_err(invalid)?;
        }

        Ok(builder.build())
    }
}

fn lookup<T: Copy>(
    map: &BTreeMap<&str, T>,
    name: &str,
    kind: &str,
) -> Result<T, ConfigError> {
    map.get(name)
        .copied()
        .ok_or_else(|| ConfigError::ValidationError(format!("Unknown {kind} '{name}'")))
}

fn invalid(err: TopologyError) -> ConfigError {
    ConfigError::ValidationError(err.to_string())
}

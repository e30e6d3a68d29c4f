//! Incremental construction of a [`Topology`]

use tracing::debug;

use super::types::{
    Interface, IntfId, NodeData, PathMemo, PathRestriction, RestrictId, Router, RouterId, Zone,
    ZoneId,
};
use super::Topology;
use crate::error::TopologyError;

/// Builder for a [`Topology`].
///
/// Zones, routers and interfaces are kept in insertion order. The order of
/// interfaces at each node decides which of several equivalent routes is
/// found first, so building the same graph twice yields the same paths.
#[derive(Debug, Default)]
pub struct TopologyBuilder {
    topo: Topology,
}

impl TopologyBuilder {
    /// Create an empty builder
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a zone
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DuplicateName` if a zone of this name exists.
    pub fn add_zone(&mut self, name: impl Into<String>) -> Result<ZoneId, TopologyError> {
        let name = name.into();
        if self.topo.zone_names.contains_key(&name) {
            return Err(TopologyError::duplicate("zone", name));
        }
        let id = ZoneId(self.topo.zones.len());
        self.topo.zone_names.insert(name.clone(), id);
        self.topo.zones.push(Zone {
            name,
            partition: None,
            ipv6: false,
            node: NodeData::default(),
        });
        Ok(id)
    }

    /// Add a router
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::DuplicateName` if a router of this name exists.
    pub fn add_router(&mut self, name: impl Into<String>) -> Result<RouterId, TopologyError> {
        let name = name.into();
        if self.topo.router_names.contains_key(&name) {
            return Err(TopologyError::duplicate("router", name));
        }
        let id = RouterId(self.topo.routers.len());
        self.topo.router_names.insert(name.clone(), id);
        self.topo.routers.push(Router {
            name,
            orig_router: None,
            node: NodeData::default(),
        });
        Ok(id)
    }

    /// Add an interface of `router` attached to `zone`
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate name or an unknown router or zone.
    pub fn add_interface(
        &mut self,
        name: impl Into<String>,
        router: RouterId,
        zone: ZoneId,
    ) -> Result<IntfId, TopologyError> {
        let name = name.into();
        self.check_router(router)?;
        self.check_zone(zone)?;
        if self.topo.intf_names.contains_key(&name) {
            return Err(TopologyError::duplicate("interface", name));
        }
        let id = IntfId(self.topo.interfaces.len());
        self.topo.intf_names.insert(name.clone(), id);
        self.topo.interfaces.push(Interface {
            name,
            router,
            zone,
            loop_: None,
            to_zone1: None,
            path_restrict: Vec::new(),
            loop_zone_border: false,
            main_intf: None,
            redundancy_intfs: Vec::new(),
            tunnel: false,
            memo: PathMemo::default(),
            loop_entry_zone: Default::default(),
        });
        self.topo.routers[router.0].node.interfaces.push(id);
        self.topo.zones[zone.0].node.interfaces.push(id);
        Ok(id)
    }

    /// Tag a zone as member of an intentionally separate partition
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ForeignIndex` for an unknown zone.
    pub fn set_partition(
        &mut self,
        zone: ZoneId,
        tag: impl Into<String>,
    ) -> Result<(), TopologyError> {
        self.check_zone(zone)?;
        self.topo.zones[zone.0].partition = Some(tag.into());
        Ok(())
    }

    /// Mark a zone as part of the IPv6 topology
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ForeignIndex` for an unknown zone.
    pub fn set_ipv6(&mut self, zone: ZoneId) -> Result<(), TopologyError> {
        self.check_zone(zone)?;
        self.topo.zones[zone.0].ipv6 = true;
        Ok(())
    }

    /// Declare `intf` a secondary interface of `main`.
    ///
    /// Secondary interfaces are no edges of the path graph; paths to them
    /// are computed for their main interface.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ForeignIndex` for unknown interfaces.
    pub fn set_secondary(&mut self, intf: IntfId, main: IntfId) -> Result<(), TopologyError> {
        self.check_intf(intf)?;
        self.check_intf(main)?;
        self.topo.interfaces[intf.0].main_intf = Some(main);
        Ok(())
    }

    /// Declare a group of redundancy (virtual) interfaces
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ForeignIndex` for unknown interfaces.
    pub fn add_redundancy_group(&mut self, intfs: &[IntfId]) -> Result<(), TopologyError> {
        for &intf in intfs {
            self.check_intf(intf)?;
        }
        for &intf in intfs {
            self.topo.interfaces[intf.0].redundancy_intfs = intfs.to_vec();
        }
        Ok(())
    }

    /// Mark an interface as tunnel interface
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ForeignIndex` for an unknown interface.
    pub fn set_tunnel(&mut self, intf: IntfId) -> Result<(), TopologyError> {
        self.check_intf(intf)?;
        self.topo.interfaces[intf.0].tunnel = true;
        Ok(())
    }

    /// Mark `part` as one part of the split crypto router `orig`
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::ForeignIndex` for unknown routers.
    pub fn set_orig_router(&mut self, part: RouterId, orig: RouterId) -> Result<(), TopologyError> {
        self.check_router(part)?;
        self.check_router(orig)?;
        self.topo.routers[part.0].orig_router = Some(orig);
        Ok(())
    }

    /// Add a path restriction over the given interfaces
    ///
    /// # Errors
    ///
    /// Returns an error for a duplicate name or unknown interfaces.
    pub fn add_pathrestriction(
        &mut self,
        name: impl Into<String>,
        elements: &[IntfId],
    ) -> Result<RestrictId, TopologyError> {
        let name = name.into();
        if self.topo.restrictions.iter().any(|r| r.name == name) {
            return Err(TopologyError::duplicate("pathrestriction", name));
        }
        for &intf in elements {
            self.check_intf(intf)?;
        }
        let id = RestrictId(self.topo.restrictions.len());
        let mut members = Vec::with_capacity(elements.len());
        for &intf in elements {
            if members.contains(&intf) {
                continue;
            }
            members.push(intf);
            self.topo.interfaces[intf.0].path_restrict.push(id);
        }
        self.topo.restrictions.push(PathRestriction {
            name,
            elements: members,
            active: false,
            deleted: None,
        });
        Ok(id)
    }

    /// Finish construction
    #[must_use]
    pub fn build(self) -> Topology {
        debug!(
            "Topology built: {} zones, {} routers, {} interfaces, {} pathrestrictions",
            self.topo.zones.len(),
            self.topo.routers.len(),
            self.topo.interfaces.len(),
            self.topo.restrictions.len()
        );
        self.topo
    }

    fn check_zone(&self, zone: ZoneId) -> Result<(), TopologyError> {
        if zone.0 < self.topo.zones.len() {
            Ok(())
        } else {
            Err(TopologyError::ForeignIndex {
                kind: "zone",
                index: zone.0,
            })
        }
    }

    fn check_router(&self, router: RouterId) -> Result<(), TopologyError> {
        if router.0 < self.topo.routers.len() {
            Ok(())
        } else {
            Err(TopologyError::ForeignIndex {
                kind: "router",
                index: router.0,
            })
        }
    }

    fn check_intf(&self, intf: IntfId) -> Result<(), TopologyError> {
        if intf.0 < self.topo.interfaces.len() {
            Ok(())
        } else {
            Err(TopologyError::ForeignIndex {
                kind: "interface",
                index: intf.0,
            })
        }
    }
}

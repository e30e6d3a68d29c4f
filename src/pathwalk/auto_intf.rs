//! Interfaces of a router facing a destination

use crate::error::{PathError, TopologyError};
use crate::topology::{IntfId, PathStore, RouterId, Topology};

impl Topology {
    /// Interfaces of `router` by which paths towards `dst` leave it.
    ///
    /// Paths are checked from the router and separately from each of its
    /// restricted interfaces, since a restriction may forbid some ways out
    /// of the router. Tunnel interfaces are never part of the result.
    ///
    /// # Errors
    ///
    /// Returns `PathError::NoValidPath` if no interface leads to `dst`.
    pub fn path_router_interfaces(
        &mut self,
        router: RouterId,
        dst: PathStore,
    ) -> Result<Vec<IntfId>, PathError> {
        let src = PathStore::Router(router);
        let mut from_list = vec![src];
        from_list.extend(
            self.router(router)
                .node
                .interfaces
                .iter()
                .filter(|&&i| {
                    let intf = self.intf(i);
                    intf.main_intf.is_none() && !intf.path_restrict.is_empty()
                })
                .map(|&i| PathStore::Intf(i)),
        );

        let mut result = Vec::new();
        for from in from_list {
            if !self.mark_path(from, dst)? {
                continue;
            }
            if let PathStore::Intf(x) = from {
                if self.intf(x).loop_entry_zone.contains_key(&dst) {
                    result.push(x);
                    continue;
                }
            }
            if let Some(&entry) = self.memo(from).loop_entry.get(&dst) {
                let exit = self.loop_exit(entry, dst)?;
                let enter = &self
                    .memo(entry)
                    .loop_path
                    .get(&exit)
                    .ok_or_else(|| {
                        TopologyError::incomplete(self.store_name(entry), self.store_name(exit))
                    })?
                    .enter;
                match from {
                    PathStore::Router(_) => result.extend(enter.iter().copied()),
                    // Ok if some path inside the loop avoids the router.
                    PathStore::Intf(x) => {
                        if self.intf(x).loop_.is_some() && enter.contains(&x) {
                            result.push(x);
                        }
                    }
                    PathStore::Zone(_) => {}
                }
            } else if from == src {
                if let Some(next) = self.memo(from).path1.get(&dst).copied().flatten() {
                    result.push(next);
                }
            }
        }

        if result.is_empty() {
            let context = format!(
                "while resolving {} (destination is {}).",
                self.router(router).name,
                self.store_name(dst)
            );
            return Err(self.no_path_error(src, dst, context));
        }

        let mut seen = Vec::with_capacity(result.len());
        result.retain(|intf| {
            if seen.contains(intf) {
                false
            } else {
                seen.push(*intf);
                true
            }
        });
        result.retain(|&intf| !self.intf(intf).tunnel);
        Ok(result)
    }
}

//! Preparation of fast path traversal
//!
//! [`Topology::prepare_traversal`] runs once per compilation run, after
//! the graph has been built and before the first path query:
//!
//! 1. Loop discovery: distances, interfaces towards the root, loop markers
//!    and partition checks.
//! 2. Loop reduction: outer loops and cluster exits.
//! 3. Consistency checks of path restrictions and redundancy interfaces.
//! 4. Removal of redundant path restrictions.
//!
//! Structural problems abort with a [`TopologyError`]; configuration
//! inconsistencies are reported to the [`Diagnostics`] sink and processing
//! continues.

mod discovery;
mod reduction;
mod restrict;

use tracing::{debug, info};

use crate::config::EngineConfig;
use crate::diag::Diagnostics;
use crate::error::TopologyError;
use crate::topology::Topology;

impl Topology {
    /// Prepare the graph for path queries.
    ///
    /// Calling it again on a prepared topology does nothing.
    ///
    /// # Errors
    ///
    /// Returns `TopologyError::EmptyTopology` if there is no zone at all.
    pub fn prepare_traversal(
        &mut self,
        config: &EngineConfig,
        diag: &mut Diagnostics,
    ) -> Result<(), TopologyError> {
        if self.prepared {
            debug!("Path traversal already prepared");
            return Ok(());
        }
        info!("Preparing fast path traversal");

        self.find_dists_and_loops(diag)?;
        self.process_loops();
        self.check_pathrestrictions(config, diag);
        self.check_virtual_interfaces(diag);
        self.remove_redundant_pathrestrictions(config, diag);
        self.prepared = true;

        debug!(
            "Prepared {} zones, {} routers, {} loop markers",
            self.zones.len(),
            self.routers.len(),
            self.loops.len()
        );
        Ok(())
    }
}

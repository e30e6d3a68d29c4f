//! Foreground/background split of independent analysis passes
//!
//! Once all paths are marked, several read-only passes over the topology
//! can run side by side. [`run_split`] runs one pass in the current thread
//! and one on a scoped worker thread. The worker writes to a private,
//! buffered [`Diagnostics`] and hands it back through a one-shot channel
//! when done; its messages are merged after the foreground pass returns.
//!
//! Both passes only get `&Topology`. Marking paths needs `&mut Topology`
//! and therefore has to happen before the split.

use std::panic::{self, AssertUnwindSafe};
use std::thread;

use tokio::sync::oneshot;
use tracing::debug;

use super::Diagnostics;
use crate::config::EngineConfig;
use crate::topology::Topology;

/// Run `foreground` and `background` over the same topology.
///
/// With `concurrency <= 1` both run inline, background first. Otherwise
/// `background` runs on its own thread. Messages of the background pass
/// always appear after those the foreground pass recorded.
///
/// A panic of the threaded background pass is caught: the messages it
/// recorded so far are merged, followed by the error "Background job
/// aborted". Run inline, a panic propagates to the caller.
///
/// Must not be called from within an async runtime, the completion signal
/// is awaited blocking.
pub fn run_split<T, F, B>(
    topology: &Topology,
    config: &EngineConfig,
    diag: &mut Diagnostics,
    foreground: F,
    background: B,
) -> T
where
    F: FnOnce(&Topology, &mut Diagnostics) -> T,
    B: FnOnce(&Topology, &mut Diagnostics) + Send,
{
    if config.concurrency <= 1 {
        background(topology, diag);
        return foreground(topology, diag);
    }

    thread::scope(|scope| {
        let (done_tx, done_rx) = oneshot::channel();
        scope.spawn(move || {
            let mut buffer = Diagnostics::buffered();
            let outcome =
                panic::catch_unwind(AssertUnwindSafe(|| background(topology, &mut buffer)));
            let _ = done_tx.send((buffer, outcome.is_ok()));
        });

        let result = foreground(topology, diag);

        match done_rx.blocking_recv() {
            Ok((buffer, completed)) => {
                debug!(
                    "Background job finished with {} messages",
                    buffer.messages().len()
                );
                diag.merge(buffer);
                if !completed {
                    diag.error("Background job aborted");
                }
            }
            Err(_) => diag.error("Background job aborted"),
        }
        result
    })
}

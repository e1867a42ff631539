//! Scheduled delivery-status reconciliation
//!
//! A fixed-interval task that drives the idempotent reconcile operation.
//! Overlap with a manually triggered pass is safe because the operation
//! reads current status and writes final status, with nothing accumulated;
//! no mutual exclusion is needed. Teardown is dropping or aborting the
//! handle; a pass that outlives the session costs at most one final write.

use crate::codes::AccessCodeManager;
use ratify_gateway::DeliveryProbe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::{debug, warn};

/// Spawn the background reconciliation loop
///
/// The first pass runs immediately, then one per `interval`. Missed ticks
/// are skipped rather than bursted.
#[must_use]
pub fn spawn_reconciler(
    manager: AccessCodeManager,
    probe: Arc<dyn DeliveryProbe>,
    interval: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            match manager.reconcile_delivery_statuses(probe.as_ref()).await {
                Ok(report) => {
                    if report.checked > 0 {
                        debug!(?report, "scheduled reconciliation pass");
                    }
                }
                Err(e) => warn!(error = %e, "scheduled reconciliation pass failed"),
            }
        }
    })
}

//! Delivery-status probing
//!
//! The upstream gateway exposes no status API a browser-era client could
//! read, so probing is modelled as a trait with a simulated implementation:
//! the first time an id is probed a clock starts, and once the configured
//! delay elapses the verdict flips from [`DeliveryVerdict::Sent`] to
//! [`DeliveryVerdict::Delivered`]. Deterministic on purpose; verdicts never
//! depend on randomness.

use crate::error::GatewayError;
use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::time::{Duration, Instant};

/// Verdict from one status probe
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryVerdict {
    /// Message handed to the carrier, delivery not yet confirmed
    Sent,
    /// Carrier confirmed delivery
    Delivered,
    /// Carrier reported a permanent failure
    Failed,
}

/// Queries the delivery status of a previously dispatched message
#[async_trait]
pub trait DeliveryProbe: Send + Sync {
    /// Probe the status of `provider_message_id`
    ///
    /// # Errors
    /// Probe errors are transient; callers retry on the next cycle and must
    /// never interpret them as a `Failed` verdict.
    async fn check(&self, provider_message_id: &str) -> Result<DeliveryVerdict, GatewayError>;
}

/// Probe that confirms delivery a fixed delay after the first sighting
#[derive(Debug)]
pub struct SimulatedProbe {
    delivery_delay: Duration,
    first_seen: Mutex<HashMap<String, Instant>>,
}

impl SimulatedProbe {
    /// Probe that reports `Delivered` once `delivery_delay` has elapsed
    #[must_use]
    pub fn new(delivery_delay: Duration) -> Self {
        Self {
            delivery_delay,
            first_seen: Mutex::new(HashMap::new()),
        }
    }

    /// Probe that confirms delivery on the first check
    #[must_use]
    pub fn immediate() -> Self {
        Self::new(Duration::ZERO)
    }
}

#[async_trait]
impl DeliveryProbe for SimulatedProbe {
    async fn check(&self, provider_message_id: &str) -> Result<DeliveryVerdict, GatewayError> {
        let mut seen = self.first_seen.lock();
        let first = *seen
            .entry(provider_message_id.to_string())
            .or_insert_with(Instant::now);
        if first.elapsed() >= self.delivery_delay {
            Ok(DeliveryVerdict::Delivered)
        } else {
            Ok(DeliveryVerdict::Sent)
        }
    }
}

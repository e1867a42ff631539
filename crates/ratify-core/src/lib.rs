//! Ratify Core - access-code lifecycle and delivery-status reconciliation
//!
//! The heart of the review-invite product:
//! - Issues single-use access codes and enforces their state machine
//! - Records dispatch outcomes from the fire-and-forget SMS transport
//! - Reconciles in-flight delivery statuses against the status probe
//! - Gates and commits review submissions (one code, one review, ever)
//! - Aggregates stored reviews into per-field averages
//!
//! # Example
//!
//! ```rust,ignore
//! use ratify_core::prelude::*;
//! use ratify_gateway::{HeroGateway, GatewayConfig, SimulatedProbe};
//! use ratify_store::MemoryStore;
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let store: Arc<dyn ratify_store::KeyValueStore> = Arc::new(MemoryStore::new());
//! let manager = AccessCodeManager::new(Arc::clone(&store));
//! let gateway = Arc::new(HeroGateway::new(&GatewayConfig::default())?);
//! let invites = InviteService::new(manager.clone(), gateway, CoreConfig::default());
//!
//! let outcome = invites.send_invite("0211234567").await?;
//! println!("review link: {}", outcome.review_link);
//! # Ok(())
//! # }
//! ```

#![warn(unreachable_pub)]

// Core modules
pub mod admin;
pub mod codes;
pub mod config;
pub mod error;
pub mod intake;
pub mod invite;
pub mod metrics;
pub mod reconciler;
pub mod types;

// Re-exports for convenience
pub use admin::reset_all;
pub use codes::{
    AccessCodeManager, CodeValidation, DispatchOutcome, ReconcileReport, CODES_KEY,
};
pub use config::CoreConfig;
pub use error::CoreError;
pub use intake::{ReviewIntake, REVIEWS_KEY};
pub use invite::{InviteOutcome, InviteService};
pub use metrics::MetricsAggregator;
pub use reconciler::spawn_reconciler;
pub use types::{
    AccessCode, AggregatedMetrics, DeliveryAverages, DeliveryRating, DeliveryStatus,
    ProductAverages, ProductRating, Review, ReviewId, ReviewStatus,
};

/// Prelude module for common imports
pub mod prelude {
    //! Common imports for working with Ratify Core
    pub use crate::{
        AccessCode, AccessCodeManager, AggregatedMetrics, CodeValidation, CoreConfig, CoreError,
        DeliveryRating, DeliveryStatus, InviteService, MetricsAggregator, ProductRating, Review,
        ReviewIntake, ReviewStatus,
    };
}

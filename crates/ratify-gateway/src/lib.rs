//! Ratify Gateway - outbound SMS transport and delivery-status probing
//!
//! The upstream SMS endpoint is fire-and-forget: it accepts a form POST and
//! returns nothing a client can safely interpret. The adapter therefore
//! reports only "request accepted by the network layer" and fabricates a
//! provisional provider message id for later correlation. Acceptance is
//! never delivery; resolving the difference is the job of the
//! [`DeliveryProbe`] and the core's reconciliation pass.

#![warn(unreachable_pub)]

pub mod config;
pub mod error;
pub mod phone;
pub mod poller;
pub mod sms;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use phone::normalize_nz_number;
pub use poller::{DeliveryProbe, DeliveryVerdict, SimulatedProbe};
pub use sms::{DispatchReceipt, HeroGateway, SmsTransport};

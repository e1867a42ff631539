//! Reqwest-backed SMS transport adapter
//!
//! The adapter owns transport details only: form serialization, timeout and
//! HTTP error mapping. The upstream endpoint does not return a readable
//! acknowledgement, so a successful dispatch yields a fabricated provisional
//! provider message id and means nothing more than "the request left the
//! building".

use crate::config::GatewayConfig;
use crate::error::GatewayError;
use async_trait::async_trait;
use rand::distr::{Alphanumeric, SampleString};
use reqwest::Client;
use tracing::{debug, info};
use url::Url;

/// Acceptance record for one dispatched message
///
/// Holding a receipt means the network layer accepted the request; it says
/// nothing about delivery.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReceipt {
    /// Provisional correlation id for later status probing
    pub provider_message_id: String,
}

/// Outbound SMS transport
#[async_trait]
pub trait SmsTransport: Send + Sync {
    /// Hand one message to the transport layer
    ///
    /// `destination` must already be in international format.
    ///
    /// # Errors
    /// - `GatewayError::NotConfigured` when credentials are missing
    /// - `GatewayError::Transport` on network failure
    /// - `GatewayError::Rejected` when the endpoint answers non-2xx
    async fn dispatch(&self, destination: &str, body: &str)
        -> Result<DispatchReceipt, GatewayError>;
}

/// Adapter for the Hero fire-and-forget SMS endpoint
#[derive(Debug)]
pub struct HeroGateway {
    client: Client,
    endpoint: Url,
    username: String,
    password: String,
}

impl HeroGateway {
    /// Build an adapter from config
    ///
    /// # Errors
    /// Fails when the endpoint URL is invalid or the HTTP client cannot be
    /// constructed.
    pub fn new(config: &GatewayConfig) -> Result<Self, GatewayError> {
        let endpoint = Url::parse(&config.endpoint)?;
        let client = Client::builder().timeout(config.timeout()).build()?;
        Ok(Self {
            client,
            endpoint,
            username: config.username.clone(),
            password: config.password.clone(),
        })
    }
}

#[async_trait]
impl SmsTransport for HeroGateway {
    async fn dispatch(
        &self,
        destination: &str,
        body: &str,
    ) -> Result<DispatchReceipt, GatewayError> {
        // Fail before any I/O; an unconfigured gateway must never emit a request.
        if self.username.is_empty() || self.password.is_empty() {
            return Err(GatewayError::NotConfigured);
        }

        debug!(destination, "dispatching sms");
        let response = self
            .client
            .post(self.endpoint.clone())
            .form(&[
                ("username", self.username.as_str()),
                ("password", self.password.as_str()),
                ("destination", destination),
                ("message", body),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            return Err(GatewayError::Rejected {
                status: status.as_u16(),
            });
        }

        // The response body is not machine-readable; fabricate a provisional
        // id so the delivery probe has something to correlate against.
        let receipt = DispatchReceipt {
            provider_message_id: provisional_message_id(),
        };
        info!(
            destination,
            provider_message_id = %receipt.provider_message_id,
            "sms request accepted by transport"
        );
        Ok(receipt)
    }
}

/// Fabricate a provisional provider message id
#[must_use]
pub fn provisional_message_id() -> String {
    let token = Alphanumeric
        .sample_string(&mut rand::rng(), 10)
        .to_uppercase();
    format!("HERO-{token}")
}

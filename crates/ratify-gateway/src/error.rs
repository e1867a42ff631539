//! Error types for the gateway crate

/// Errors from the transport adapter and the delivery probe
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Credentials are missing; nothing was sent
    #[error("sms gateway credentials are not configured")]
    NotConfigured,

    /// The endpoint URL in config could not be parsed
    #[error("invalid gateway endpoint: {0}")]
    InvalidEndpoint(#[from] url::ParseError),

    /// The HTTP layer failed before or during the request
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The endpoint answered with a non-success status
    #[error("gateway rejected the request with status {status}")]
    Rejected {
        /// HTTP status returned by the endpoint
        status: u16,
    },

    /// The probe was asked about an id it has no record of
    #[error("unknown provider message id: {0}")]
    UnknownMessageId(String),
}

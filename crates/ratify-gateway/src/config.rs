//! Gateway configuration

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_ENDPOINT: &str = "https://hero.co.nz/sms.php";
const DEFAULT_TIMEOUT_SECS: u64 = 15;

/// Endpoint, credentials and timeout for the outbound SMS gateway
///
/// Credentials default to empty; a gateway built from an unconfigured
/// config fails every dispatch with [`GatewayError::NotConfigured`]
/// before any I/O happens.
///
/// [`GatewayError::NotConfigured`]: crate::GatewayError::NotConfigured
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct GatewayConfig {
    /// SMS endpoint URL
    pub endpoint: String,
    /// Account username
    pub username: String,
    /// Account password
    pub password: String,
    /// HTTP request timeout in seconds
    pub timeout_secs: u64,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            username: String::new(),
            password: String::new(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl GatewayConfig {
    /// Config with explicit credentials against the default endpoint
    #[must_use]
    pub fn with_credentials(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
            ..Self::default()
        }
    }

    /// Whether both credential fields are present
    #[inline]
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.username.is_empty() && !self.password.is_empty()
    }

    /// Request timeout as a `Duration`
    #[inline]
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config_is_unconfigured() {
        let config = GatewayConfig::default();
        assert!(!config.is_configured());
        assert_eq!(config.endpoint, DEFAULT_ENDPOINT);
    }

    #[test]
    fn credentials_configure_the_gateway() {
        let config = GatewayConfig::with_credentials("ops@example.nz", "secret");
        assert!(config.is_configured());
    }

    #[test]
    fn partial_credentials_do_not_count() {
        let config = GatewayConfig::with_credentials("ops@example.nz", "");
        assert!(!config.is_configured());
    }
}

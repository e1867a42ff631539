//! Core configuration

use serde::Deserialize;
use std::time::Duration;

const DEFAULT_BASE_URL: &str = "https://reviews.ratify.invalid/";
const DEFAULT_RECONCILE_INTERVAL_SECS: u64 = 20;

/// Tunables for the invite and reconciliation side of the core
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CoreConfig {
    /// Base URL the review link is built on
    pub review_base_url: String,
    /// Seconds between scheduled reconciliation passes
    pub reconcile_interval_secs: u64,
}

impl Default for CoreConfig {
    fn default() -> Self {
        Self {
            review_base_url: DEFAULT_BASE_URL.to_string(),
            reconcile_interval_secs: DEFAULT_RECONCILE_INTERVAL_SECS,
        }
    }
}

impl CoreConfig {
    /// Reconciliation cadence as a `Duration`
    #[inline]
    #[must_use]
    pub fn reconcile_interval(&self) -> Duration {
        Duration::from_secs(self.reconcile_interval_secs)
    }

    /// Review link for a code: `{base}#/review/{CODE}`
    #[must_use]
    pub fn review_link(&self, code: &str) -> String {
        let base = self.review_base_url.trim_end_matches('/');
        format!("{base}/#/review/{code}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_interval_is_twenty_seconds() {
        assert_eq!(
            CoreConfig::default().reconcile_interval(),
            Duration::from_secs(20)
        );
    }

    #[test]
    fn review_link_has_the_hash_route() {
        let config = CoreConfig {
            review_base_url: "https://feedback.example.nz".to_string(),
            ..CoreConfig::default()
        };
        assert_eq!(
            config.review_link("AB12CD"),
            "https://feedback.example.nz/#/review/AB12CD"
        );
    }

    #[test]
    fn trailing_slash_does_not_double_up() {
        let config = CoreConfig {
            review_base_url: "https://feedback.example.nz/".to_string(),
            ..CoreConfig::default()
        };
        assert_eq!(
            config.review_link("AB12CD"),
            "https://feedback.example.nz/#/review/AB12CD"
        );
    }
}

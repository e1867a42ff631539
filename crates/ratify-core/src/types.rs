//! Core types for the invite lifecycle
//!
//! Defines the persisted records and their state machines:
//! - Access codes and their review/delivery statuses
//! - Reviews and their rating groups
//! - Aggregated metrics
//!
//! Records serialize with camelCase field names, matching the layout the
//! persisted collections have always had; optional fields are omitted when
//! absent so older records deserialize unchanged.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique review identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ReviewId(pub Uuid);

impl ReviewId {
    /// Generate a new review ID
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ReviewId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Whether an access code has been consumed by a review submission
///
/// Monotonic: `Pending` -> `Completed`, never reversed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReviewStatus {
    /// Code issued, no review submitted yet
    Pending,
    /// Code consumed by a completed submission
    Completed,
}

/// Where an invite SMS sits in the delivery pipeline
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DeliveryStatus {
    /// Created, not yet handed to the transport
    Queued,
    /// Transport accepted the request; delivery unconfirmed
    Sent,
    /// Carrier confirmed delivery (terminal)
    Delivered,
    /// Dispatch rejected or delivery failed (terminal)
    Failed,
}

impl DeliveryStatus {
    /// Whether this status is terminal (frozen for reconciliation)
    #[inline]
    #[must_use]
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Failed)
    }

    /// Legal forward transitions from this status
    #[must_use]
    pub fn allowed_transitions(self) -> &'static [DeliveryStatus] {
        use DeliveryStatus::{Delivered, Failed, Queued, Sent};
        match self {
            Queued => &[Sent, Failed],
            Sent => &[Delivered, Failed],
            Delivered | Failed => &[],
        }
    }

    /// Whether moving to `next` is a legal transition
    #[must_use]
    pub fn can_transition_to(self, next: DeliveryStatus) -> bool {
        self.allowed_transitions().contains(&next)
    }
}

/// A single-use invite token and its lifecycle state
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessCode {
    /// The token itself; uppercase, unique, doubles as primary key
    pub code: String,
    /// Destination as the admin entered it (never normalized at rest)
    pub phone_number: String,
    /// Redemption state
    #[serde(rename = "status")]
    pub review_status: ReviewStatus,
    /// Delivery pipeline state
    pub delivery_status: DeliveryStatus,
    /// Correlation id from the transport; absent means never dispatched
    #[serde(skip_serializing_if = "Option::is_none")]
    pub provider_message_id: Option<String>,
    /// Creation time
    pub created_at: DateTime<Utc>,
    /// Time of the last successful status probe
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_checked_at: Option<DateTime<Utc>>,
}

impl AccessCode {
    /// Whether the code can still accept a review submission
    #[inline]
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.review_status == ReviewStatus::Pending
    }
}

/// Product sub-scores, each bounded 1-5 once validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRating {
    /// Product quality
    pub quality: u8,
    /// Perceived effects
    pub effects: u8,
    /// Taste
    pub taste: u8,
    /// Weight accuracy
    pub weight: u8,
}

impl ProductRating {
    /// Sub-scores in a fixed order, for validation and aggregation
    #[must_use]
    pub fn scores(&self) -> [u8; 4] {
        [self.quality, self.effects, self.taste, self.weight]
    }
}

/// Delivery sub-scores, each bounded 1-5 once validated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryRating {
    /// Delivery speed
    pub speed: u8,
    /// Communication quality
    pub communication: u8,
    /// Overall delivery experience
    pub overall: u8,
}

impl DeliveryRating {
    /// Sub-scores in a fixed order, for validation and aggregation
    #[must_use]
    pub fn scores(&self) -> [u8; 3] {
        [self.speed, self.communication, self.overall]
    }
}

/// One completed review submission; immutable once written
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    /// Unique id, generated at submission time
    pub id: ReviewId,
    /// The access code that redeemed this review
    pub code: String,
    /// Submission time
    pub timestamp: DateTime<Utc>,
    /// Product sub-scores
    pub product_rating: ProductRating,
    /// Delivery sub-scores
    pub delivery_rating: DeliveryRating,
    /// Optional free-text comment
    #[serde(skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Per-field product averages, one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct ProductAverages {
    /// Mean quality score
    pub quality: f64,
    /// Mean effects score
    pub effects: f64,
    /// Mean taste score
    pub taste: f64,
    /// Mean weight score
    pub weight: f64,
}

/// Per-field delivery averages, one decimal place
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
pub struct DeliveryAverages {
    /// Mean speed score
    pub speed: f64,
    /// Mean communication score
    pub communication: f64,
    /// Mean overall score
    pub overall: f64,
}

/// Running averages over all stored reviews
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct AggregatedMetrics {
    /// Number of reviews aggregated
    pub total_reviews: usize,
    /// Product averages
    pub average_product: ProductAverages,
    /// Delivery averages
    pub average_delivery: DeliveryAverages,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terminal_statuses_allow_no_transitions() {
        assert!(DeliveryStatus::Delivered.allowed_transitions().is_empty());
        assert!(DeliveryStatus::Failed.allowed_transitions().is_empty());
        assert!(DeliveryStatus::Delivered.is_terminal());
        assert!(DeliveryStatus::Failed.is_terminal());
    }

    #[test]
    fn queued_can_reach_sent_or_failed_only() {
        assert!(DeliveryStatus::Queued.can_transition_to(DeliveryStatus::Sent));
        assert!(DeliveryStatus::Queued.can_transition_to(DeliveryStatus::Failed));
        assert!(!DeliveryStatus::Queued.can_transition_to(DeliveryStatus::Delivered));
    }

    #[test]
    fn sent_can_resolve_either_way() {
        assert!(DeliveryStatus::Sent.can_transition_to(DeliveryStatus::Delivered));
        assert!(DeliveryStatus::Sent.can_transition_to(DeliveryStatus::Failed));
        assert!(!DeliveryStatus::Sent.can_transition_to(DeliveryStatus::Queued));
    }

    #[test]
    fn access_code_serializes_with_legacy_field_names() {
        let code = AccessCode {
            code: "AB12CD".to_string(),
            phone_number: "0211234567".to_string(),
            review_status: ReviewStatus::Pending,
            delivery_status: DeliveryStatus::Queued,
            provider_message_id: None,
            created_at: Utc::now(),
            last_checked_at: None,
        };
        let json = serde_json::to_value(&code).unwrap();
        assert_eq!(json["status"], "PENDING");
        assert_eq!(json["deliveryStatus"], "QUEUED");
        assert_eq!(json["phoneNumber"], "0211234567");
        assert!(json.get("providerMessageId").is_none());
    }

    #[test]
    fn review_roundtrips_through_json() {
        let review = Review {
            id: ReviewId::new(),
            code: "AB12CD".to_string(),
            timestamp: Utc::now(),
            product_rating: ProductRating {
                quality: 5,
                effects: 4,
                taste: 5,
                weight: 4,
            },
            delivery_rating: DeliveryRating {
                speed: 5,
                communication: 5,
                overall: 5,
            },
            comment: Some("Great service".to_string()),
        };
        let json = serde_json::to_string(&review).unwrap();
        let back: Review = serde_json::from_str(&json).unwrap();
        assert_eq!(back, review);
    }
}

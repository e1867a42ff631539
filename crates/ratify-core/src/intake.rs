//! Review Intake
//!
//! Gates submission on code validity and commits it as one logical
//! transaction. The UI validates too, but redemption is irreversible, so
//! everything is re-verified here rather than trusted.
//!
//! Write ordering: the review row is persisted first, the redemption
//! second. A crash in between leaves "review exists, code still pending",
//! which a later sweep can repair; the reverse ("code consumed, review
//! lost") cannot be.

use crate::codes::{canonical, AccessCodeManager};
use crate::error::CoreError;
use crate::types::{DeliveryRating, ProductRating, Review, ReviewId};
use chrono::Utc;
use ratify_store::{Collection, KeyValueStore};
use std::sync::Arc;
use tracing::info;

/// Collection key for reviews (legacy persisted layout)
pub const REVIEWS_KEY: &str = "pharma_reviews";

const PRODUCT_FIELDS: [&str; 4] = ["quality", "effects", "taste", "weight"];
const DELIVERY_FIELDS: [&str; 3] = ["speed", "communication", "overall"];

/// Accepts validated review submissions and consumes their codes
#[derive(Debug, Clone)]
pub struct ReviewIntake {
    manager: AccessCodeManager,
    reviews: Collection<Review>,
}

impl ReviewIntake {
    /// Create an intake over the given backend and code manager
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>, manager: AccessCodeManager) -> Self {
        Self {
            manager,
            reviews: Collection::new(store, REVIEWS_KEY),
        }
    }

    /// Submit a review against an open access code
    ///
    /// Preconditions, re-checked at this boundary:
    /// - the token resolves to an existing code (`CodeNotFound`)
    /// - the code has not been consumed (`CodeAlreadyRedeemed`)
    /// - every sub-score is within 1-5 (`IncompleteSubmission`)
    ///
    /// Rejections mutate nothing. On success the review is persisted and
    /// the code is marked redeemed, in that order.
    ///
    /// # Errors
    /// One of the rejections above, or a store failure.
    pub fn submit(
        &self,
        code: &str,
        product_rating: ProductRating,
        delivery_rating: DeliveryRating,
        comment: Option<&str>,
    ) -> Result<Review, CoreError> {
        let token = canonical(code);

        let validation = self.manager.validate_code(&token)?;
        if !validation.valid {
            return Err(CoreError::CodeNotFound);
        }
        if validation.used {
            return Err(CoreError::CodeAlreadyRedeemed);
        }
        validate_scores(&product_rating.scores(), &PRODUCT_FIELDS)?;
        validate_scores(&delivery_rating.scores(), &DELIVERY_FIELDS)?;

        let review = Review {
            id: ReviewId::new(),
            code: token.clone(),
            timestamp: Utc::now(),
            product_rating,
            delivery_rating,
            comment: comment
                .map(str::trim)
                .filter(|c| !c.is_empty())
                .map(String::from),
        };

        // Review first, redemption second; see the module docs for why.
        let mut reviews = self.reviews.load()?;
        reviews.push(review.clone());
        self.reviews.save(&reviews)?;
        self.manager.mark_redeemed(&token)?;

        info!(code = %token, review_id = %review.id, "review submitted, code redeemed");
        Ok(review)
    }

    /// All stored reviews, in submission order
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn list_reviews(&self) -> Result<Vec<Review>, CoreError> {
        Ok(self.reviews.load()?)
    }
}

fn validate_scores(scores: &[u8], fields: &[&'static str]) -> Result<(), CoreError> {
    for (score, field) in scores.iter().zip(fields.iter().copied()) {
        if !(1..=5).contains(score) {
            return Err(CoreError::IncompleteSubmission { field });
        }
    }
    Ok(())
}

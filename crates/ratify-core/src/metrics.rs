//! Metrics Aggregator
//!
//! Computes arithmetic-mean sub-scores across all stored reviews, rounded
//! to one decimal place. Zero reviews yields a zero-filled structure, never
//! a division by zero.

use crate::error::CoreError;
use crate::intake::REVIEWS_KEY;
use crate::types::{AggregatedMetrics, DeliveryAverages, ProductAverages, Review};
use ratify_store::{Collection, KeyValueStore};
use std::sync::Arc;

/// Computes running averages over the stored reviews
#[derive(Debug, Clone)]
pub struct MetricsAggregator {
    reviews: Collection<Review>,
}

impl MetricsAggregator {
    /// Create an aggregator over the given backend
    #[must_use]
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            reviews: Collection::new(store, REVIEWS_KEY),
        }
    }

    /// Recompute the aggregate over all stored reviews
    ///
    /// # Errors
    /// Propagates store failures.
    pub fn compute_metrics(&self) -> Result<AggregatedMetrics, CoreError> {
        let reviews = self.reviews.load()?;
        Ok(aggregate(&reviews))
    }
}

/// Aggregate a slice of reviews into per-field means
#[must_use]
pub fn aggregate(reviews: &[Review]) -> AggregatedMetrics {
    let total = reviews.len();
    if total == 0 {
        return AggregatedMetrics::default();
    }

    let mut product = [0u64; 4];
    let mut delivery = [0u64; 3];
    for review in reviews {
        for (sum, score) in product.iter_mut().zip(review.product_rating.scores()) {
            *sum += u64::from(score);
        }
        for (sum, score) in delivery.iter_mut().zip(review.delivery_rating.scores()) {
            *sum += u64::from(score);
        }
    }

    AggregatedMetrics {
        total_reviews: total,
        average_product: ProductAverages {
            quality: mean(product[0], total),
            effects: mean(product[1], total),
            taste: mean(product[2], total),
            weight: mean(product[3], total),
        },
        average_delivery: DeliveryAverages {
            speed: mean(delivery[0], total),
            communication: mean(delivery[1], total),
            overall: mean(delivery[2], total),
        },
    }
}

/// Mean of `sum` over `count`, rounded half-up to one decimal
///
/// `f64::round` is half-away-from-zero, which equals half-up for the
/// non-negative sums seen here.
fn mean(sum: u64, count: usize) -> f64 {
    (sum as f64 * 10.0 / count as f64).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{DeliveryRating, ProductRating, ReviewId};
    use chrono::Utc;
    use ratify_store::MemoryStore;

    fn review(quality: u8, speed: u8) -> Review {
        Review {
            id: ReviewId::new(),
            code: "AB12CD".to_string(),
            timestamp: Utc::now(),
            product_rating: ProductRating {
                quality,
                effects: 4,
                taste: 5,
                weight: 4,
            },
            delivery_rating: DeliveryRating {
                speed,
                communication: 5,
                overall: 5,
            },
            comment: None,
        }
    }

    #[test]
    fn zero_reviews_yields_zero_filled_metrics() {
        let metrics = aggregate(&[]);
        assert_eq!(metrics.total_reviews, 0);
        assert_eq!(metrics.average_product, ProductAverages::default());
        assert_eq!(metrics.average_delivery, DeliveryAverages::default());
    }

    #[test]
    fn means_are_rounded_to_one_decimal() {
        // quality 5, 4, 4 -> 13/3 = 4.333... -> 4.3
        let metrics = aggregate(&[review(5, 5), review(4, 5), review(4, 5)]);
        assert_eq!(metrics.total_reviews, 3);
        assert_eq!(metrics.average_product.quality, 4.3);
        assert_eq!(metrics.average_delivery.speed, 5.0);
    }

    #[test]
    fn halves_round_up() {
        // quality 5, 4, 4, 4 -> 17/4 = 4.25 -> 4.3, not 4.2
        let metrics = aggregate(&[review(5, 4), review(4, 3), review(4, 4), review(4, 4)]);
        assert_eq!(metrics.average_product.quality, 4.3);
    }

    #[test]
    fn aggregator_reads_the_stored_collection() {
        let store: Arc<dyn KeyValueStore> = Arc::new(MemoryStore::new());
        let reviews: Collection<Review> = Collection::new(Arc::clone(&store), REVIEWS_KEY);
        reviews.save(&[review(5, 5), review(3, 1)]).unwrap();

        let aggregator = MetricsAggregator::new(store);
        let metrics = aggregator.compute_metrics().unwrap();
        assert_eq!(metrics.total_reviews, 2);
        assert_eq!(metrics.average_product.quality, 4.0);
        assert_eq!(metrics.average_delivery.speed, 3.0);
    }
}

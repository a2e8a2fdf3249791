//! Product review types.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shopfront_core::ReviewId;

/// A customer review.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: ReviewId,
    /// Star rating, 1 to 5.
    pub rating: u8,
    pub comment: String,
    /// Display name; "Customer" when the reviewer left none.
    pub user_name: String,
    pub created_at: Option<DateTime<Utc>>,
    /// The reviewed product, included by the featured and admin listings.
    pub product: Option<ReviewedProduct>,
}

/// Product summary attached to a review.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReviewedProduct {
    pub name: String,
    pub image: Option<String>,
}

/// A review to submit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NewReview {
    pub rating: u8,
    pub comment: String,
    pub user_name: String,
}

/// Aggregate of a product's reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub count: usize,
    /// Mean rating; the fallback value when there are no reviews.
    pub average: f64,
    /// Share of reviews per star count, 5 stars first, as whole percentages.
    pub distribution: [(u8, u32); 5],
}

impl ReviewSummary {
    /// Summarize `reviews`. `fallback_average` is used when the list is
    /// empty, typically the product's stored rating.
    #[must_use]
    pub fn from_reviews(reviews: &[Review], fallback_average: f64) -> Self {
        let mut distribution = [(5, 0), (4, 0), (3, 0), (2, 0), (1, 0)];

        if reviews.is_empty() {
            return Self {
                count: 0,
                average: fallback_average,
                distribution,
            };
        }

        let total: u32 = reviews.iter().map(|r| u32::from(r.rating)).sum();
        let count = u32::try_from(reviews.len()).unwrap_or(u32::MAX);

        for (stars, percentage) in &mut distribution {
            let matching = reviews.iter().filter(|r| r.rating == *stars).count();
            let matching = u32::try_from(matching).unwrap_or(u32::MAX);
            // Round half up, in integers.
            *percentage = (matching * 200 + count) / (count * 2);
        }

        Self {
            count: reviews.len(),
            average: f64::from(total) / f64::from(count),
            distribution,
        }
    }
}

//! Review conversions.

use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;
use shopfront_core::ReviewId;

use super::ImageRefs;
use super::loose::{Amount, Text, Timestamp};
use crate::types::{Review, ReviewedProduct};

/// Review as the server sends it.
#[derive(Debug, Deserialize)]
pub struct WireReview {
    id: ReviewId,
    #[serde(default)]
    rating: Amount,
    #[serde(default)]
    comment: Text,
    #[serde(default)]
    user_name: Text,
    #[serde(default)]
    name: Text,
    #[serde(default, rename = "createdAt")]
    created_at_camel: Timestamp,
    #[serde(default)]
    created_at: Timestamp,
    #[serde(default, rename = "Product")]
    product: Option<WireReviewedProduct>,
}

#[derive(Debug, Deserialize)]
struct WireReviewedProduct {
    #[serde(default)]
    name: Text,
    #[serde(flatten)]
    image: ImageRefs,
}

pub fn convert_review(review: WireReview) -> Review {
    // Ratings are whole stars; anything outside 0..=5 is clamped.
    let rating = review
        .rating
        .0
        .and_then(|r| r.floor().to_i64())
        .map_or(0, |r| r.clamp(0, 5));

    Review {
        id: review.id,
        rating: u8::try_from(rating).unwrap_or(0),
        comment: review.comment.0.unwrap_or_default(),
        user_name: review
            .user_name
            .or(review.name)
            .0
            .unwrap_or_else(|| "Customer".to_string()),
        created_at: review.created_at_camel.or(review.created_at).0,
        product: review.product.map(|p| ReviewedProduct {
            name: p.name.0.unwrap_or_default(),
            image: p.image.first(),
        }),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::{Value, json};

    use super::*;

    fn convert(value: Value) -> Review {
        convert_review(serde_json::from_value(value).unwrap())
    }

    #[test]
    fn test_review_with_product() {
        let review = convert(json!({
            "id": 3,
            "rating": "4.0",
            "comment": "Lovely texture",
            "user_name": "Meera",
            "createdAt": "2024-02-10T08:00:00Z",
            "Product": {"name": "Aloe Gel", "image_path": "aloe.png"}
        }));
        assert_eq!(review.rating, 4);
        assert_eq!(review.user_name, "Meera");
        assert!(review.created_at.is_some());
        let product = review.product.unwrap();
        assert_eq!(product.name, "Aloe Gel");
        assert_eq!(product.image.as_deref(), Some("aloe.png"));
    }

    #[test]
    fn test_review_defaults() {
        let review = convert(json!({"id": "r1", "rating": 7}));
        assert_eq!(review.rating, 5);
        assert_eq!(review.user_name, "Customer");
        assert_eq!(review.comment, "");
        assert!(review.product.is_none());
    }
}

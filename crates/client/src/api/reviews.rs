//! Product reviews.

use shopfront_core::{ProductId, ReviewId};
use tracing::instrument;

use super::segment;
use crate::client::ApiClient;
use crate::conversions::{WireReview, convert_review};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{ApiMessage, NewReview, Review};

impl ApiClient {
    /// Reviews of one product, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn product_reviews(&self, product_id: &ProductId) -> Result<Vec<Review>, ApiError> {
        let path = format!("/api/products/{}/reviews", segment(product_id.as_str()));
        self.fetch_list(ApiRequest::get(path), "review", convert_review)
            .await
    }

    /// Post a review of a product.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, review), fields(product_id = %product_id, rating = review.rating))]
    pub async fn add_review(
        &self,
        product_id: &ProductId,
        review: &NewReview,
    ) -> Result<Review, ApiError> {
        let path = format!("/api/products/{}/reviews", segment(product_id.as_str()));
        let request = ApiRequest::post(path).json(review)?;
        self.fetch_one::<WireReview, _>(request, convert_review).await
    }

    /// Reviews highlighted on the home page, at most `limit` when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn featured_reviews(&self, limit: Option<u32>) -> Result<Vec<Review>, ApiError> {
        let path = match limit {
            Some(limit) if limit > 0 => format!("/api/reviews/featured?limit={limit}"),
            _ => "/api/reviews/featured".to_string(),
        };
        self.fetch_list(ApiRequest::get(path), "review", convert_review)
            .await
    }

    /// Every review across products (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_reviews(&self) -> Result<Vec<Review>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/reviews"), "review", convert_review)
            .await
    }

    /// Remove a review (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete_review(&self, id: &ReviewId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/reviews/{}", segment(id.as_str())))
            .await
    }
}

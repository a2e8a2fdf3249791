//! Categories, banners and skin concerns.

use serde_json::Value;
use shopfront_core::{BannerId, CategoryId, ConcernId};
use tracing::instrument;

use super::segment;
use crate::client::ApiClient;
use crate::conversions::{
    WireBanner, WireCategory, WireConcern, convert_banner, convert_category, convert_concern,
    list_items,
};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{ApiMessage, Banner, BannerInput, Category, CategoryInput, Concern, ConcernInput};

impl ApiClient {
    // =========================================================================
    // Categories
    // =========================================================================

    /// Active categories, in display order.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/categories"), "category", convert_category)
            .await
    }

    /// Every category including inactive ones (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_categories(&self) -> Result<Vec<Category>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/categories/all"), "category", convert_category)
            .await
    }

    /// Distinct category names used by products.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn categories_from_products(&self) -> Result<Vec<String>, ApiError> {
        let value = self
            .request_json(ApiRequest::get("/api/categories/from-products"))
            .await?;
        Ok(list_items(value)?
            .into_iter()
            .filter_map(|item| match item {
                Value::String(name) if !name.trim().is_empty() => Some(name),
                _ => None,
            })
            .collect())
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_category(&self, input: &CategoryInput) -> Result<Category, ApiError> {
        let request = ApiRequest::post("/api/categories").json(input)?;
        self.fetch_one::<WireCategory, _>(request, convert_category)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(category_id = %id))]
    pub async fn update_category(
        &self,
        id: &CategoryId,
        input: &CategoryInput,
    ) -> Result<Category, ApiError> {
        let request =
            ApiRequest::put(format!("/api/categories/{}", segment(id.as_str()))).json(input)?;
        self.fetch_one::<WireCategory, _>(request, convert_category)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(category_id = %id))]
    pub async fn delete_category(&self, id: &CategoryId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/categories/{}", segment(id.as_str())))
            .await
    }

    // =========================================================================
    // Banners
    // =========================================================================

    /// Banners shown on the home page.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn active_banners(&self) -> Result<Vec<Banner>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/banners"), "banner", convert_banner)
            .await
    }

    /// Every banner including inactive ones (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_banners(&self) -> Result<Vec<Banner>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/banners/all"), "banner", convert_banner)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_banner(&self, input: &BannerInput) -> Result<Banner, ApiError> {
        let request = ApiRequest::post("/api/banners").json(input)?;
        self.fetch_one::<WireBanner, _>(request, convert_banner).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(banner_id = %id))]
    pub async fn update_banner(
        &self,
        id: &BannerId,
        input: &BannerInput,
    ) -> Result<Banner, ApiError> {
        let request = ApiRequest::put(format!("/api/banners/{}", segment(id.as_str()))).json(input)?;
        self.fetch_one::<WireBanner, _>(request, convert_banner).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(banner_id = %id))]
    pub async fn delete_banner(&self, id: &BannerId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/banners/{}", segment(id.as_str())))
            .await
    }

    // =========================================================================
    // Concerns
    // =========================================================================

    /// Skin concerns used to browse the catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn active_concerns(&self) -> Result<Vec<Concern>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/concerns"), "concern", convert_concern)
            .await
    }

    /// Every concern including inactive ones (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_concerns(&self) -> Result<Vec<Concern>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/concerns/all"), "concern", convert_concern)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_concern(&self, input: &ConcernInput) -> Result<Concern, ApiError> {
        let request = ApiRequest::post("/api/concerns").json(input)?;
        self.fetch_one::<WireConcern, _>(request, convert_concern)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(concern_id = %id))]
    pub async fn update_concern(
        &self,
        id: &ConcernId,
        input: &ConcernInput,
    ) -> Result<Concern, ApiError> {
        let request =
            ApiRequest::put(format!("/api/concerns/{}", segment(id.as_str()))).json(input)?;
        self.fetch_one::<WireConcern, _>(request, convert_concern)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(concern_id = %id))]
    pub async fn delete_concern(&self, id: &ConcernId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/concerns/{}", segment(id.as_str())))
            .await
    }
}

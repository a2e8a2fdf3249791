//! Product catalog and image uploads.

use shopfront_core::ProductId;
use tracing::instrument;

use super::{segment, with_query};
use crate::client::ApiClient;
use crate::conversions::{WireProduct, convert_product};
use crate::error::ApiError;
use crate::request::{ApiRequest, UploadPart};
use crate::types::{ApiMessage, Product, ProductInput, ProductQuery, UploadedFile};

impl ApiClient {
    /// List products matching `query`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn products(&self, query: &ProductQuery) -> Result<Vec<Product>, ApiError> {
        let pairs = query.pairs();
        let path = with_query("/api/products", pairs.iter().map(|(k, v)| (*k, v.as_str())));
        self.fetch_list(ApiRequest::get(path), "product", convert_product)
            .await
    }

    /// Get a single product.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if the product does not exist.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn product(&self, id: &ProductId) -> Result<Product, ApiError> {
        let path = format!("/api/products/{}", segment(id.as_str()));
        self.fetch_one::<WireProduct, _>(ApiRequest::get(path), convert_product)
            .await
    }

    /// Create a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn create_product(&self, input: &ProductInput) -> Result<Product, ApiError> {
        let request = ApiRequest::post("/api/products").json(input)?;
        self.fetch_one::<WireProduct, _>(request, convert_product).await
    }

    /// Update a product (admin). Only the fields set in `input` change.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        id: &ProductId,
        input: &ProductInput,
    ) -> Result<Product, ApiError> {
        let request = ApiRequest::put(format!("/api/products/{}", segment(id.as_str()))).json(input)?;
        self.fetch_one::<WireProduct, _>(request, convert_product).await
    }

    /// Delete a product (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn delete_product(&self, id: &ProductId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/products/{}", segment(id.as_str())))
            .await
    }

    /// Upload an image and return where the server stored it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` for an unparseable `mime`, or an
    /// error if the upload fails.
    #[instrument(skip(self, data), fields(size = data.len()))]
    pub async fn upload_image(
        &self,
        file_name: &str,
        mime: Option<&str>,
        data: Vec<u8>,
    ) -> Result<UploadedFile, ApiError> {
        let part = UploadPart::file("image", file_name, mime, data);
        self.upload("/api/upload", vec![part]).await
    }
}

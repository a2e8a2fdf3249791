//! Wishlist, contact form, site settings and static pages.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use shopfront_core::{ContactMessageId, ProductId};
use tracing::instrument;

use super::segment;
use crate::client::ApiClient;
use crate::conversions::{
    WireContactMessage, WirePage, convert_contact_message, convert_page, convert_wishlist_item,
    list_items,
};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{
    ApiMessage, ContactForm, ContactMessage, PageContent, PageUpdate, SocialLinks, WishlistItem,
};

const SOCIAL_LINKS_PATH: &str = "/api/settings/social_links";

#[derive(Serialize)]
struct AddToWishlist<'a> {
    product_id: &'a ProductId,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct WishlistCheck {
    #[serde(default)]
    in_wishlist: bool,
}

#[derive(Serialize, Deserialize)]
struct SocialLinksSetting {
    #[serde(default)]
    value: Option<SocialLinks>,
}

impl ApiClient {
    // =========================================================================
    // Wishlist
    // =========================================================================

    /// The signed-in customer's wishlist.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn wishlist(&self) -> Result<Vec<WishlistItem>, ApiError> {
        let value = self.request_json(ApiRequest::get("/api/wishlist")).await?;
        let items = list_items(value)?;
        let total = items.len();
        let converted: Vec<_> = items.into_iter().filter_map(convert_wishlist_item).collect();
        if converted.len() < total {
            tracing::warn!(total, kept = converted.len(), "Dropped wishlist entries without a product");
        }
        Ok(converted)
    }

    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the response names no product, or an
    /// error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn add_to_wishlist(&self, product_id: &ProductId) -> Result<WishlistItem, ApiError> {
        let request = ApiRequest::post("/api/wishlist").json(&AddToWishlist { product_id })?;
        let value = self.request_json(request).await?;
        convert_wishlist_item(value)
            .ok_or_else(|| ApiError::Decode("wishlist entry without a product".to_string()))
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn is_in_wishlist(&self, product_id: &ProductId) -> Result<bool, ApiError> {
        let path = format!("/api/wishlist/check/{}", segment(product_id.as_str()));
        let check: WishlistCheck = self.get(&path).await?;
        Ok(check.in_wishlist)
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn remove_from_wishlist(&self, product_id: &ProductId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/wishlist/{}", segment(product_id.as_str())))
            .await
    }

    // =========================================================================
    // Contact
    // =========================================================================

    /// Send the contact form. Works without signing in.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, form))]
    pub async fn submit_contact(&self, form: &ContactForm) -> Result<ApiMessage, ApiError> {
        self.post("/api/contact", form).await
    }

    /// Every contact message (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn contact_messages(&self) -> Result<Vec<ContactMessage>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/contact"), "contact message", convert_contact_message)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(message_id = %id))]
    pub async fn mark_contact_read(&self, id: &ContactMessageId) -> Result<ContactMessage, ApiError> {
        let path = format!("/api/contact/{}/read", segment(id.as_str()));
        let request = ApiRequest::put(path).json(&Map::new())?;
        self.fetch_one::<WireContactMessage, _>(request, convert_contact_message)
            .await
    }

    // =========================================================================
    // Settings
    // =========================================================================

    /// Footer social links. Unset links are `None`.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn social_links(&self) -> Result<SocialLinks, ApiError> {
        let setting: SocialLinksSetting = self.get(SOCIAL_LINKS_PATH).await?;
        Ok(setting.value.unwrap_or_default())
    }

    /// Replace the footer social links (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, links))]
    pub async fn update_social_links(&self, links: &SocialLinks) -> Result<SocialLinks, ApiError> {
        let body = SocialLinksSetting {
            value: Some(links.clone()),
        };
        let setting: SocialLinksSetting = self.put(SOCIAL_LINKS_PATH, &body).await?;
        Ok(setting.value.unwrap_or_else(|| links.clone()))
    }

    /// Every site setting, keyed by name.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Decode` if the response is not a JSON object, or
    /// an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn settings(&self) -> Result<Map<String, Value>, ApiError> {
        match self.request_json(ApiRequest::get("/api/settings")).await? {
            Value::Object(map) => Ok(map),
            Value::Null => Ok(Map::new()),
            _ => Err(ApiError::Decode("settings response is not an object".to_string())),
        }
    }

    // =========================================================================
    // Pages
    // =========================================================================

    /// A static page by slug, such as `about` or `privacy-policy`.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` with 404 if no such page exists.
    #[instrument(skip(self))]
    pub async fn page(&self, slug: &str) -> Result<PageContent, ApiError> {
        let path = format!("/api/pages/{}", segment(slug));
        self.fetch_one::<WirePage, _>(ApiRequest::get(path), convert_page)
            .await
    }

    /// Every static page (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn pages(&self) -> Result<Vec<PageContent>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/pages"), "page", convert_page)
            .await
    }

    /// Replace a page's title and content (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, content), fields(content_len = content.len()))]
    pub async fn update_page(
        &self,
        slug: &str,
        title: &str,
        content: &str,
    ) -> Result<PageContent, ApiError> {
        let path = format!("/api/pages/{}", segment(slug));
        let request = ApiRequest::put(path).json(&PageUpdate { title, content })?;
        self.fetch_one::<WirePage, _>(request, convert_page).await
    }
}

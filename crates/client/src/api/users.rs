//! Profile, saved addresses and the admin user list.

use shopfront_core::AddressId;
use tracing::instrument;

use super::segment;
use crate::client::ApiClient;
use crate::conversions::{
    WireAddress, WireUserProfile, convert_address, convert_admin_user, convert_user_profile,
};
use crate::error::ApiError;
use crate::request::ApiRequest;
use crate::types::{Address, AddressInput, AdminUser, ApiMessage, ProfileUpdate, UserProfile};

impl ApiClient {
    /// Profile of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn profile(&self) -> Result<UserProfile, ApiError> {
        self.fetch_one::<WireUserProfile, _>(ApiRequest::get("/api/users/profile"), convert_user_profile)
            .await
    }

    /// Change profile fields or the password.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the current password is wrong, or an
    /// error if the API request fails.
    #[instrument(skip(self, update))]
    pub async fn update_profile(&self, update: &ProfileUpdate) -> Result<UserProfile, ApiError> {
        let request = ApiRequest::put("/api/users/profile").json(update)?;
        self.fetch_one::<WireUserProfile, _>(request, convert_user_profile)
            .await
    }

    /// Saved addresses of the signed-in user.
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn addresses(&self) -> Result<Vec<Address>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/users/address"), "address", convert_address)
            .await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input))]
    pub async fn save_address(&self, input: &AddressInput) -> Result<Address, ApiError> {
        let request = ApiRequest::post("/api/users/address").json(input)?;
        self.fetch_one::<WireAddress, _>(request, convert_address).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self, input), fields(address_id = %id))]
    pub async fn update_address(
        &self,
        id: &AddressId,
        input: &AddressInput,
    ) -> Result<Address, ApiError> {
        let path = format!("/api/users/address/{}", segment(id.as_str()));
        let request = ApiRequest::put(path).json(input)?;
        self.fetch_one::<WireAddress, _>(request, convert_address).await
    }

    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self), fields(address_id = %id))]
    pub async fn delete_address(&self, id: &AddressId) -> Result<ApiMessage, ApiError> {
        self.delete(&format!("/api/users/address/{}", segment(id.as_str())))
            .await
    }

    /// Every registered user (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the API request fails.
    #[instrument(skip(self))]
    pub async fn all_users(&self) -> Result<Vec<AdminUser>, ApiError> {
        self.fetch_list(ApiRequest::get("/api/users"), "user", convert_admin_user)
            .await
    }
}

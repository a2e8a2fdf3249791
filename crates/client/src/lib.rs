//! Shopfront Client - Authenticated REST client for the Shopfront API.
//!
//! Wraps every storefront and admin endpoint behind typed methods on
//! [`ApiClient`]. The client attaches the stored bearer token to each
//! request and, when the server answers 401, renews the session once and
//! replays the request. Concurrent 401s share a single renewal.
//!
//! ```no_run
//! # async fn demo() -> Result<(), shopfront_client::ApiError> {
//! use secrecy::SecretString;
//! use shopfront_client::{ApiClient, ProductQuery};
//!
//! let client = ApiClient::from_env()?;
//! client.login("asha@example.in", &SecretString::from("hunter22")).await?;
//!
//! let featured = client
//!     .products(&ProductQuery { featured: true, ..ProductQuery::default() })
//!     .await?;
//! println!("{} featured products", featured.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`client`] - Request pipeline and session renewal
//! - [`auth`] - Credential pair and where it is stored
//! - [`types`] - Canonical resource types
//! - [`config`] - Environment-driven configuration

#![cfg_attr(not(test), forbid(unsafe_code))]

mod api;
pub mod auth;
pub mod client;
pub mod config;
mod conversions;
pub mod error;
pub mod request;
pub mod single_flight;
pub mod types;

pub use auth::{
    AuthUser, CredentialStore, Credentials, FileCredentialStore, MemoryCredentialStore, StoreError,
};
pub use client::{ApiClient, ApiClientBuilder};
pub use config::{ClientConfig, ConfigError, MAX_REFRESH_RETRIES};
pub use error::ApiError;
pub use request::{ApiRequest, Attempt, RequestBody, UploadPart};
pub use single_flight::SingleFlight;
pub use types::*;

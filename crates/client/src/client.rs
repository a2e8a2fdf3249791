//! Authenticated HTTP client for the Shopfront REST API.

use std::sync::Arc;

use reqwest::StatusCode;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderName, HeaderValue};
use reqwest::multipart::{Form, Part};
use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::instrument;

use crate::auth::refresh::exchange_refresh_token;
use crate::auth::{CredentialStore, MemoryCredentialStore};
use crate::config::{ClientConfig, MAX_REFRESH_RETRIES, normalize_base_url};
use crate::error::ApiError;
use crate::request::{ApiRequest, Attempt, RequestBody, UploadPart};
use crate::single_flight::SingleFlight;

/// Client for the Shopfront REST API.
///
/// Cheap to clone; clones share the HTTP connection pool, the cookie jar,
/// the credential store and the refresh coordinator.
///
/// # Session renewal
///
/// Every request carries the stored access token. When the server answers
/// 401 the client exchanges the refresh token for a new pair and sends the
/// request once more. Concurrent 401s share a single exchange: one caller
/// talks to the server and the rest wait for its outcome.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ApiClientInner>,
}

struct ApiClientInner {
    http: reqwest::Client,
    config: ClientConfig,
    store: Arc<dyn CredentialStore>,
    refresh: SingleFlight<bool>,
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("base_url", &self.inner.config.base_url)
            .field("authenticated", &self.is_authenticated())
            .field("refresh", &self.inner.refresh)
            .finish_non_exhaustive()
    }
}

/// Builder for [`ApiClient`].
#[derive(Default)]
pub struct ApiClientBuilder {
    config: ClientConfig,
    base_url: Option<String>,
    store: Option<Arc<dyn CredentialStore>>,
}

impl ApiClientBuilder {
    /// Start from an explicit configuration.
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Override the base URL.
    #[must_use]
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Use `store` for credentials instead of a fresh in-memory store.
    #[must_use]
    pub fn credential_store(mut self, store: Arc<dyn CredentialStore>) -> Self {
        self.store = Some(store);
        self
    }

    /// Override the number of refresh re-attempts after transport failures.
    /// Capped at [`MAX_REFRESH_RETRIES`] when the client is built.
    #[must_use]
    pub const fn refresh_retries(mut self, retries: u32) -> Self {
        self.config.refresh_retries = retries;
        self
    }

    /// Override the per-request deadline.
    #[must_use]
    pub const fn request_timeout(mut self, timeout: std::time::Duration) -> Self {
        self.config.request_timeout = timeout;
        self
    }

    /// Build the client.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` for an invalid base URL and
    /// `ApiError::Transport` if the HTTP client cannot be constructed.
    pub fn build(self) -> Result<ApiClient, ApiError> {
        let mut config = self.config;
        if let Some(base_url) = self.base_url {
            config.base_url = base_url;
        }
        config.base_url = normalize_base_url(&config.base_url)?;
        if config.refresh_retries > MAX_REFRESH_RETRIES {
            tracing::warn!(
                requested = config.refresh_retries,
                max = MAX_REFRESH_RETRIES,
                "Capping refresh retries"
            );
            config.refresh_retries = MAX_REFRESH_RETRIES;
        }

        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .connect_timeout(config.connect_timeout)
            .user_agent(config.user_agent.clone())
            .cookie_store(true)
            .build()?;

        let store = self
            .store
            .unwrap_or_else(|| Arc::new(MemoryCredentialStore::new()));

        tracing::debug!(base_url = %config.base_url, "Built API client");

        Ok(ApiClient {
            inner: Arc::new(ApiClientInner {
                http,
                config,
                store,
                refresh: SingleFlight::new(false),
            }),
        })
    }
}

/// A fully read response.
struct RawResponse {
    status: StatusCode,
    body: Vec<u8>,
}

/// Where the request pipeline is.
enum Step {
    Send(Attempt),
    Refresh(RawResponse),
    Finish(RawResponse),
}

impl ApiClient {
    /// Start building a client.
    #[must_use]
    pub fn builder() -> ApiClientBuilder {
        ApiClientBuilder::default()
    }

    /// Build a client from `SHOPFRONT_*` environment variables with an
    /// in-memory credential store.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Config` if the environment is invalid.
    pub fn from_env() -> Result<Self, ApiError> {
        Self::builder().config(ClientConfig::from_env()?).build()
    }

    /// Base URL every path is resolved against.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.inner.config.base_url
    }

    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    /// The credential store this client reads and writes.
    #[must_use]
    pub fn store(&self) -> &Arc<dyn CredentialStore> {
        &self.inner.store
    }

    /// Whether an access token is currently stored.
    #[must_use]
    pub fn is_authenticated(&self) -> bool {
        self.inner.store.token().is_some()
    }

    /// Resolve an image reference returned by the API.
    ///
    /// Absolute URLs and data URIs pass through; bare file names live under
    /// `/uploads/` on the API host.
    #[must_use]
    pub fn image_url(&self, raw: &str) -> String {
        let raw = raw.trim();
        if raw.is_empty()
            || raw.starts_with("http://")
            || raw.starts_with("https://")
            || raw.starts_with("data:")
        {
            return raw.to_string();
        }
        if raw.starts_with('/') {
            return self.inner.config.url_for(raw);
        }
        format!("{}/uploads/{raw}", self.base_url())
    }

    // =========================================================================
    // Request pipeline
    // =========================================================================

    /// Send `request` and decode the JSON response into `T`.
    ///
    /// An empty success body decodes as JSON `null`, so `T = ()` or
    /// `Option<_>` accept it.
    ///
    /// # Errors
    ///
    /// - `ApiError::Transport` if no response was received
    /// - `ApiError::Status` for a non-success final response, carrying the
    ///   server's `message` or `error` field
    /// - `ApiError::Decode` if the success body does not match `T`
    #[instrument(skip(self, request), fields(method = %request.method, path = %request.path))]
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T, ApiError> {
        let response = self.execute(&request).await?;

        if !response.status.is_success() {
            let err = ApiError::from_response(response.status, &response.body);
            tracing::debug!(status = %response.status, error = %err, "Request failed");
            return Err(err);
        }

        if response.body.iter().all(u8::is_ascii_whitespace) {
            return Ok(serde_json::from_value(serde_json::Value::Null)?);
        }
        Ok(serde_json::from_slice(&response.body)?)
    }

    /// Send `request` and return the raw JSON value.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn request_json(&self, request: ApiRequest) -> Result<serde_json::Value, ApiError> {
        self.request(request).await
    }

    /// `GET path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::get(path)).await
    }

    /// `POST path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn post<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::post(path).json(body)?).await
    }

    /// `PUT path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn put<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::put(path).json(body)?).await
    }

    /// `PATCH path` with a JSON body.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T, ApiError>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.request(ApiRequest::patch(path).json(body)?).await
    }

    /// `DELETE path`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn delete<T: DeserializeOwned>(&self, path: &str) -> Result<T, ApiError> {
        self.request(ApiRequest::delete(path)).await
    }

    /// `POST path` as `multipart/form-data`.
    ///
    /// # Errors
    ///
    /// See [`ApiClient::request`].
    pub async fn upload<T: DeserializeOwned>(
        &self,
        path: &str,
        parts: Vec<UploadPart>,
    ) -> Result<T, ApiError> {
        self.request(ApiRequest::post(path).multipart(parts)).await
    }

    /// Drive one request through send, optional refresh, and retry.
    async fn execute(&self, request: &ApiRequest) -> Result<RawResponse, ApiError> {
        let mut step = Step::Send(Attempt::Initial);
        loop {
            step = match step {
                Step::Send(attempt) => {
                    let response = self.send(request, attempt).await?;
                    let may_retry = response.status == StatusCode::UNAUTHORIZED
                        && request.refresh_on_unauthorized
                        && attempt.next_after_unauthorized().is_some();
                    if may_retry {
                        Step::Refresh(response)
                    } else {
                        Step::Finish(response)
                    }
                }
                Step::Refresh(unauthorized) => {
                    if self.refresh().await {
                        Step::Send(Attempt::Retry)
                    } else {
                        Step::Finish(unauthorized)
                    }
                }
                Step::Finish(response) => return Ok(response),
            };
        }
    }

    /// Send a single attempt and read the whole body.
    async fn send(&self, request: &ApiRequest, attempt: Attempt) -> Result<RawResponse, ApiError> {
        // Read per attempt: a retry must pick up the token the refresh just stored.
        let token = self.inner.store.token();
        let headers = build_headers(token.as_ref(), request)?;

        let mut builder = self
            .inner
            .http
            .request(request.method.clone(), self.inner.config.url_for(&request.path))
            .headers(headers);

        builder = match &request.body {
            RequestBody::Empty => builder,
            RequestBody::Json(value) => builder.body(serde_json::to_vec(value)?),
            RequestBody::Multipart(parts) => builder.multipart(build_form(parts)?),
        };

        tracing::debug!(attempt = attempt.as_str(), authorized = token.is_some(), "Sending request");

        let response = builder.send().await?;
        let status = response.status();
        let body = response.bytes().await?.to_vec();

        tracing::debug!(attempt = attempt.as_str(), status = %status, "Received response");
        Ok(RawResponse { status, body })
    }

    // =========================================================================
    // Session renewal
    // =========================================================================

    /// Renew the session using the stored refresh token.
    ///
    /// Returns `true` when a new pair was stored. On any failure, including
    /// a missing refresh token, the stored credentials are cleared and
    /// `false` is returned. Concurrent callers share one exchange and all
    /// observe its outcome.
    pub async fn refresh(&self) -> bool {
        self.inner.refresh.run(|| self.refresh_session()).await
    }

    async fn refresh_session(&self) -> bool {
        let store = &self.inner.store;

        let Some(refresh_token) = store.refresh_token() else {
            tracing::info!("No refresh token stored, ending session");
            store.clear_auth();
            return false;
        };

        match exchange_refresh_token(&self.inner.http, &self.inner.config, &refresh_token).await {
            Ok(auth) => {
                let next_refresh = auth
                    .refresh_token
                    .map(SecretString::from)
                    .or(Some(refresh_token));
                tracing::info!(user_id = %auth.user.id, "Session refreshed");
                store.save_auth(SecretString::from(auth.token), auth.user, next_refresh);
                true
            }
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh failed, ending session");
                store.clear_auth();
                false
            }
        }
    }
}

/// Assemble request headers.
///
/// Bearer token first, then caller headers (which may replace it), then the
/// JSON content type for structured bodies. Multipart bodies get their
/// content type with boundary from the transport, so none is set here.
fn build_headers(
    token: Option<&SecretString>,
    request: &ApiRequest,
) -> Result<HeaderMap, ApiError> {
    let mut headers = HeaderMap::new();

    if let Some(token) = token {
        let mut value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
            .map_err(|_| ApiError::InvalidRequest("access token is not a valid header value".to_string()))?;
        value.set_sensitive(true);
        headers.insert(AUTHORIZATION, value);
    }

    for (name, value) in &request.headers {
        let name = HeaderName::from_bytes(name.as_bytes())
            .map_err(|e| ApiError::InvalidRequest(format!("header name {name:?}: {e}")))?;
        let value = HeaderValue::from_str(value)
            .map_err(|e| ApiError::InvalidRequest(format!("header {name}: {e}")))?;
        headers.insert(name, value);
    }

    match request.body {
        RequestBody::Json(_) => {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        }
        RequestBody::Multipart(_) => {
            headers.remove(CONTENT_TYPE);
        }
        RequestBody::Empty => {}
    }

    Ok(headers)
}

fn build_form(parts: &[UploadPart]) -> Result<Form, ApiError> {
    let mut form = Form::new();
    for part in parts {
        form = match part {
            UploadPart::Text { field, value } => form.text(field.clone(), value.clone()),
            UploadPart::File {
                field,
                file_name,
                mime,
                data,
            } => {
                let mut file = Part::bytes(data.clone()).file_name(file_name.clone());
                if let Some(mime) = mime {
                    file = file
                        .mime_str(mime)
                        .map_err(|e| ApiError::InvalidRequest(format!("mime type {mime}: {e}")))?;
                }
                form.part(field.clone(), file)
            }
        };
    }
    Ok(form)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn client() -> ApiClient {
        ApiClient::builder()
            .base_url("https://api.example.in/")
            .build()
            .unwrap()
    }

    #[test]
    fn test_builder_normalizes_base_url() {
        assert_eq!(client().base_url(), "https://api.example.in");
    }

    #[test]
    fn test_builder_rejects_bad_base_url() {
        let result = ApiClient::builder().base_url("localhost:5000").build();
        assert!(matches!(result, Err(ApiError::Config(_))));
    }

    #[test]
    fn test_builder_caps_refresh_retries() {
        let client = ApiClient::builder()
            .base_url("https://api.example.in")
            .refresh_retries(50)
            .build()
            .unwrap();
        assert_eq!(client.config().refresh_retries, MAX_REFRESH_RETRIES);

        let client = ApiClient::builder()
            .config(ClientConfig {
                refresh_retries: u32::MAX,
                ..ClientConfig::default()
            })
            .build()
            .unwrap();
        assert_eq!(client.config().refresh_retries, MAX_REFRESH_RETRIES);
    }

    #[test]
    fn test_image_url() {
        let client = client();
        assert_eq!(
            client.image_url("shirt.png"),
            "https://api.example.in/uploads/shirt.png"
        );
        assert_eq!(
            client.image_url("/uploads/shirt.png"),
            "https://api.example.in/uploads/shirt.png"
        );
        assert_eq!(
            client.image_url("https://cdn.example.in/a.png"),
            "https://cdn.example.in/a.png"
        );
        assert_eq!(client.image_url(""), "");
    }

    #[test]
    fn test_headers_bearer_then_overrides() {
        let token = SecretString::from("T1");

        let plain = build_headers(Some(&token), &ApiRequest::get("/x")).unwrap();
        assert_eq!(plain.get(AUTHORIZATION).unwrap(), "Bearer T1");
        assert!(plain.get(AUTHORIZATION).unwrap().is_sensitive());
        assert!(plain.get(CONTENT_TYPE).is_none());

        let overridden = build_headers(
            Some(&token),
            &ApiRequest::get("/x").header("Authorization", "Bearer other"),
        )
        .unwrap();
        assert_eq!(overridden.get(AUTHORIZATION).unwrap(), "Bearer other");
    }

    #[test]
    fn test_headers_without_token() {
        let headers = build_headers(None, &ApiRequest::get("/x")).unwrap();
        assert!(headers.get(AUTHORIZATION).is_none());
    }

    #[test]
    fn test_headers_content_type_by_body() {
        let json = ApiRequest::post("/x")
            .header("Content-Type", "text/plain")
            .json(&serde_json::json!({}))
            .unwrap();
        let headers = build_headers(None, &json).unwrap();
        assert_eq!(headers.get(CONTENT_TYPE).unwrap(), "application/json");

        let upload = ApiRequest::post("/x")
            .header("Content-Type", "application/json")
            .multipart(vec![UploadPart::text("a", "b")]);
        let headers = build_headers(None, &upload).unwrap();
        assert!(headers.get(CONTENT_TYPE).is_none());
    }

    #[test]
    fn test_invalid_header_is_rejected() {
        let result = build_headers(None, &ApiRequest::get("/x").header("bad header", "v"));
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[test]
    fn test_form_rejects_bad_mime() {
        let result = build_form(&[UploadPart::file("image", "a.png", Some("not a mime"), vec![])]);
        assert!(matches!(result, Err(ApiError::InvalidRequest(_))));
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_clears_session() {
        let client = client();
        client.store().save_auth(
            SecretString::from("T1"),
            crate::auth::AuthUser {
                id: shopfront_core::UserId::new("u1"),
                name: "Asha".to_string(),
                email: "asha@example.in".to_string(),
                role: shopfront_core::UserRole::Customer,
                avatar: None,
            },
            None,
        );
        assert!(client.is_authenticated());

        assert!(!client.refresh().await);
        assert!(!client.is_authenticated());
        assert!(client.store().user().is_none());
    }
}

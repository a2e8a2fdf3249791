//! End-to-end tests for the Shopfront client.
//!
//! Every test starts a `wiremock` server standing in for the REST API and
//! points a fresh [`ApiClient`] at it, so the suite needs no running
//! backend.
//!
//! ```bash
//! cargo test -p shopfront-integration-tests
//! ```
//!
//! # Test Files
//!
//! - `session_refresh` - Token injection, refresh, single flight and retry bound
//! - `scenarios` - Login through refresh failure, as a user would hit them
//! - `resources` - Resource methods and response normalization

use std::sync::Arc;
use std::time::Duration;

use secrecy::SecretString;
use serde_json::{Value, json};
use shopfront_client::{
    ApiClient, AuthUser, ClientConfig, CredentialStore, Credentials, MemoryCredentialStore,
};
use shopfront_core::{UserId, UserRole};
use wiremock::matchers::{body_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Path of the refresh endpoint.
pub const REFRESH_PATH: &str = "/api/auth/refresh";

/// The customer every test signs in as.
#[must_use]
pub fn test_user() -> AuthUser {
    AuthUser {
        id: UserId::new("7"),
        name: "Asha Rao".to_string(),
        email: "asha@example.in".to_string(),
        role: UserRole::Customer,
        avatar: None,
    }
}

/// Body of a login, register or refresh response.
#[must_use]
pub fn auth_body(token: &str, refresh_token: Option<&str>) -> Value {
    let mut body = json!({
        "token": token,
        "user": {"id": 7, "name": "Asha Rao", "email": "asha@example.in", "role": "customer"}
    });
    if let Some(refresh_token) = refresh_token {
        body["refreshToken"] = json!(refresh_token);
    }
    body
}

/// Client configuration for tests: short deadlines and backoff.
#[must_use]
pub fn test_config(server: &MockServer) -> ClientConfig {
    ClientConfig {
        base_url: server.uri(),
        request_timeout: Duration::from_secs(5),
        connect_timeout: Duration::from_secs(1),
        refresh_backoff: Duration::from_millis(10),
        ..ClientConfig::default()
    }
}

/// A client with no stored session.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn anonymous_client(server: &MockServer) -> ApiClient {
    client_with_store(test_config(server), Arc::new(MemoryCredentialStore::new()))
}

/// A client already holding `token` and, optionally, `refresh_token`.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn signed_in_client(server: &MockServer, token: &str, refresh_token: Option<&str>) -> ApiClient {
    signed_in_client_with_config(test_config(server), token, refresh_token)
}

/// As [`signed_in_client`], with explicit configuration.
///
/// # Panics
///
/// Panics if the client cannot be built.
#[must_use]
pub fn signed_in_client_with_config(
    config: ClientConfig,
    token: &str,
    refresh_token: Option<&str>,
) -> ApiClient {
    let store = MemoryCredentialStore::with_credentials(Credentials {
        access_token: SecretString::from(token),
        refresh_token: refresh_token.map(SecretString::from),
        user: test_user(),
    });
    client_with_store(config, Arc::new(store))
}

#[allow(clippy::expect_used)]
fn client_with_store(config: ClientConfig, store: Arc<dyn CredentialStore>) -> ApiClient {
    ApiClient::builder()
        .config(config)
        .credential_store(store)
        .build()
        .expect("client should build")
}

/// Expect exactly one refresh exchanging `refresh_token`, answered with a
/// new pair after `delay`.
pub async fn mount_refresh_success(
    server: &MockServer,
    refresh_token: &str,
    new_token: &str,
    new_refresh_token: Option<&str>,
    delay: Duration,
) {
    Mock::given(method("POST"))
        .and(path(REFRESH_PATH))
        .and(body_json(json!({"refreshToken": refresh_token})))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(auth_body(new_token, new_refresh_token))
                .set_delay(delay),
        )
        .expect(1)
        .named("refresh")
        .mount(server)
        .await;
}

/// Requests the server saw on `path_prefix`, in arrival order.
pub async fn requests_to(server: &MockServer, path_prefix: &str) -> Vec<wiremock::Request> {
    server
        .received_requests()
        .await
        .unwrap_or_default()
        .into_iter()
        .filter(|req| req.url.path().starts_with(path_prefix))
        .collect()
}

/// The `Authorization` header of a recorded request.
#[must_use]
pub fn authorization(request: &wiremock::Request) -> Option<String> {
    request
        .headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
}

//! Sign-in, registration and sign-out.

use secrecy::{ExposeSecret, SecretString};
use serde::Serialize;
use tracing::instrument;

use crate::auth::{AuthResponse, AuthUser};
use crate::client::ApiClient;
use crate::error::ApiError;
use crate::request::ApiRequest;

#[derive(Serialize)]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Serialize)]
struct RegisterRequest<'a> {
    name: &'a str,
    email: &'a str,
    password: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    phone: Option<&'a str>,
}

impl ApiClient {
    /// Sign in and store the issued credential pair.
    ///
    /// A 401 here means the password was wrong; it is returned as is and
    /// never triggers a session refresh.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the server rejects the credentials.
    #[instrument(skip(self, password))]
    pub async fn login(&self, email: &str, password: &SecretString) -> Result<AuthUser, ApiError> {
        let body = LoginRequest {
            email: email.trim(),
            password: password.expose_secret(),
        };
        let request = ApiRequest::post("/api/auth/login").json(&body)?.without_refresh();
        let auth: AuthResponse = self.request(request).await?;
        Ok(self.start_session(auth))
    }

    /// Create an account and sign in as it.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::Status` if the server rejects the registration,
    /// for example because the email is already taken.
    #[instrument(skip(self, password))]
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &SecretString,
        phone: Option<&str>,
    ) -> Result<AuthUser, ApiError> {
        let body = RegisterRequest {
            name: name.trim(),
            email: email.trim(),
            password: password.expose_secret(),
            phone: phone.map(str::trim).filter(|p| !p.is_empty()),
        };
        let request = ApiRequest::post("/api/auth/register").json(&body)?.without_refresh();
        let auth: AuthResponse = self.request(request).await?;
        Ok(self.start_session(auth))
    }

    /// Forget the stored credential pair. The server keeps no session state.
    #[instrument(skip(self))]
    pub fn logout(&self) {
        self.store().clear_auth();
        tracing::info!("Signed out");
    }

    /// The signed-in user, as stored at the last login or refresh.
    #[must_use]
    pub fn current_user(&self) -> Option<AuthUser> {
        self.store().user()
    }

    fn start_session(&self, auth: AuthResponse) -> AuthUser {
        let AuthResponse {
            token,
            refresh_token,
            user,
        } = auth;
        tracing::info!(user_id = %user.id, role = %user.role, "Signed in");
        self.store().save_auth(
            SecretString::from(token),
            user.clone(),
            refresh_token.map(SecretString::from),
        );
        user
    }
}

//! Session credentials and where they live.
//!
//! A session is one credential pair: a short-lived access token, an
//! optional refresh token, and the profile of the user they belong to.
//! The [`CredentialStore`] is the only authority on the current pair; the
//! client reads it on every request and never keeps its own copy.

pub(crate) mod refresh;
mod store;

pub use store::{FileCredentialStore, MemoryCredentialStore, StoreError};

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serialize};
use shopfront_core::{UserId, UserRole};

/// The user a credential pair belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: UserId,
    pub name: String,
    pub email: String,
    #[serde(default, deserialize_with = "lenient_role")]
    pub role: UserRole,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl AuthUser {
    /// Whether this user may call admin-only endpoints.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// The active credential pair.
#[derive(Debug, Clone)]
pub struct Credentials {
    /// Bearer token attached to every request.
    pub access_token: SecretString,
    /// Token exchanged for a new pair when the access token is rejected.
    pub refresh_token: Option<SecretString>,
    /// Profile returned alongside the tokens.
    pub user: AuthUser,
}

/// Persistent home of the current credential pair.
///
/// Implementations must be cheap to read: the client calls [`token`] once
/// per outgoing request. Writes come only from login, registration,
/// refresh, and logout.
///
/// [`token`]: CredentialStore::token
pub trait CredentialStore: Send + Sync {
    /// Current access token, if signed in.
    fn token(&self) -> Option<SecretString>;

    /// Current refresh token, if the server issued one.
    fn refresh_token(&self) -> Option<SecretString>;

    /// Profile of the signed-in user.
    fn user(&self) -> Option<AuthUser>;

    /// Replace the stored pair.
    fn save_auth(&self, token: SecretString, user: AuthUser, refresh_token: Option<SecretString>);

    /// Forget the stored pair entirely.
    fn clear_auth(&self);

    /// Snapshot of the whole pair.
    fn credentials(&self) -> Option<Credentials> {
        Some(Credentials {
            access_token: self.token()?,
            refresh_token: self.refresh_token(),
            user: self.user()?,
        })
    }
}

/// Body of `/api/auth/login`, `/api/auth/register` and `/api/auth/refresh` responses.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AuthResponse {
    pub token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    pub user: AuthUser,
}

fn lenient_role<'de, D>(deserializer: D) -> Result<UserRole, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw
        .and_then(|role| role.parse().ok())
        .unwrap_or_default())
}

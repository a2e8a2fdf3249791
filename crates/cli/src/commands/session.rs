//! Sign-in, registration and session inspection.

use std::io::Write;

use secrecy::SecretString;
use shopfront_client::{ApiClient, AuthUser};
use shopfront_core::Email;

use super::{CliError, require_session};

fn describe(user: &AuthUser) -> String {
    format!("{} <{}> ({})", user.name, user.email, user.role)
}

/// Sign in and save the session.
///
/// # Errors
///
/// Returns `CliError::Api` if the credentials are rejected.
pub async fn login(
    client: &ApiClient,
    email: &Email,
    password: &SecretString,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let user = client.login(email.as_str(), password).await?;
    writeln!(out, "Signed in as {}", describe(&user))?;
    Ok(())
}

/// Create an account and save the session.
///
/// # Errors
///
/// Returns `CliError::Api` if the server rejects the registration.
pub async fn register(
    client: &ApiClient,
    name: &str,
    email: &Email,
    password: &SecretString,
    phone: Option<&str>,
    out: &mut impl Write,
) -> Result<(), CliError> {
    let user = client.register(name, email.as_str(), password, phone).await?;
    writeln!(out, "Registered and signed in as {}", describe(&user))?;
    Ok(())
}

/// Forget the saved session.
///
/// # Errors
///
/// Returns `CliError::Output` if stdout is closed.
pub fn logout(client: &ApiClient, out: &mut impl Write) -> Result<(), CliError> {
    if client.is_authenticated() {
        client.logout();
        writeln!(out, "Signed out")?;
    } else {
        writeln!(out, "Not signed in")?;
    }
    Ok(())
}

/// Show the signed-in user's live profile.
///
/// # Errors
///
/// Returns `CliError::NotSignedIn` without a session, or `CliError::Api`
/// if the session has expired and cannot be renewed.
pub async fn whoami(client: &ApiClient, out: &mut impl Write) -> Result<(), CliError> {
    require_session(client)?;
    let profile = client.profile().await?;
    writeln!(out, "{} <{}>", profile.name, profile.email)?;
    writeln!(out, "Role:  {}", profile.role)?;
    if let Some(phone) = &profile.phone {
        writeln!(out, "Phone: {phone}")?;
    }
    writeln!(out, "ID:    {}", profile.id)?;
    Ok(())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn offline_client() -> ApiClient {
        ApiClient::builder()
            .base_url("http://127.0.0.1:9")
            .build()
            .unwrap()
    }

    #[test]
    fn test_logout_without_session() {
        let mut out = Vec::new();
        logout(&offline_client(), &mut out).unwrap();
        assert_eq!(String::from_utf8(out).unwrap(), "Not signed in\n");
    }

    #[tokio::test]
    async fn test_whoami_requires_session() {
        let mut out = Vec::new();
        let err = whoami(&offline_client(), &mut out).await.unwrap_err();
        assert!(matches!(err, CliError::NotSignedIn));
        assert!(out.is_empty());
    }
}

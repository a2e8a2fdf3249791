//! Refresh-token exchange.
//!
//! The exchange is sent directly on the HTTP client, never through the
//! authenticated request path, so it carries no bearer token and cannot
//! recurse into another refresh.

use std::time::Duration;

use rand::Rng;
use secrecy::{ExposeSecret, SecretString};
use tracing::instrument;

use super::AuthResponse;
use crate::config::ClientConfig;
use crate::error::ApiError;

/// Refresh endpoint, relative to the base URL.
pub(crate) const REFRESH_PATH: &str = "/api/auth/refresh";

/// Exchange a refresh token for a new credential pair.
///
/// Transport failures (connect errors and timeouts) are re-attempted up to
/// `config.refresh_retries` times with exponential backoff and jitter. Any
/// HTTP response is final: the server has seen the token and answered.
///
/// # Errors
///
/// Returns the last transport error, a `Status` error for a non-success
/// response, or `Decode` if the success body is not an auth response.
#[instrument(skip(http, config, refresh_token))]
pub(crate) async fn exchange_refresh_token(
    http: &reqwest::Client,
    config: &ClientConfig,
    refresh_token: &SecretString,
) -> Result<AuthResponse, ApiError> {
    let mut attempt = 0_u32;
    loop {
        match post_refresh(http, config, refresh_token).await {
            Err(ApiError::Transport(e))
                if attempt < config.refresh_retries && (e.is_connect() || e.is_timeout()) =>
            {
                let delay = backoff_delay(config.refresh_backoff, attempt);
                tracing::warn!(
                    error = %e,
                    attempt = attempt + 1,
                    delay_ms = u64::try_from(delay.as_millis()).unwrap_or(u64::MAX),
                    "Token refresh transport failure, retrying"
                );
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
            result => return result,
        }
    }
}

async fn post_refresh(
    http: &reqwest::Client,
    config: &ClientConfig,
    refresh_token: &SecretString,
) -> Result<AuthResponse, ApiError> {
    let response = http
        .post(config.url_for(REFRESH_PATH))
        .json(&serde_json::json!({
            "refreshToken": refresh_token.expose_secret()
        }))
        .send()
        .await?;

    let status = response.status();
    let body = response.bytes().await?;

    if !status.is_success() {
        return Err(ApiError::from_response(status, &body));
    }

    Ok(serde_json::from_slice(&body)?)
}

/// `base * 2^attempt` plus up to half of that again in random jitter.
fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    let exponential = base.saturating_mul(2_u32.saturating_pow(attempt));
    let max_jitter_ms = u64::try_from(exponential.as_millis() / 2).unwrap_or(u64::MAX);
    let jitter = if max_jitter_ms == 0 {
        0
    } else {
        rand::rng().random_range(0..=max_jitter_ms)
    };
    exponential.saturating_add(Duration::from_millis(jitter))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_backoff_grows_exponentially_with_bounded_jitter() {
        let base = Duration::from_millis(100);
        for attempt in 0..4 {
            let floor = base * 2_u32.pow(attempt);
            let delay = backoff_delay(base, attempt);
            assert!(delay >= floor, "attempt {attempt}: {delay:?} < {floor:?}");
            assert!(delay <= floor + floor / 2, "attempt {attempt}: {delay:?} too large");
        }
    }

    #[test]
    fn test_zero_backoff_has_no_jitter() {
        assert_eq!(backoff_delay(Duration::ZERO, 3), Duration::ZERO);
    }
}

//! Typed operations over the REST endpoints, one module per resource.
//!
//! Each module adds an `impl ApiClient` block. Responses are decoded into
//! the loose wire shapes from `conversions` and returned as canonical types.

mod auth;
mod catalog;
mod content;
mod dashboard;
mod orders;
mod products;
mod reviews;
mod users;

use serde::de::DeserializeOwned;

use crate::client::ApiClient;
use crate::conversions::convert_list;
use crate::error::ApiError;
use crate::request::ApiRequest;

impl ApiClient {
    /// Send `request` and convert a single-object response.
    async fn fetch_one<W, T>(
        &self,
        request: ApiRequest,
        convert: impl FnOnce(W) -> T,
    ) -> Result<T, ApiError>
    where
        W: DeserializeOwned,
    {
        let value = self.request_json(request).await?;
        let wire = serde_json::from_value::<W>(value)?;
        Ok(convert(wire))
    }

    /// Send `request` and convert every usable element of a list response.
    async fn fetch_list<W, T>(
        &self,
        request: ApiRequest,
        what: &'static str,
        convert: impl Fn(W) -> T,
    ) -> Result<Vec<T>, ApiError>
    where
        W: DeserializeOwned,
    {
        let value = self.request_json(request).await?;
        convert_list(value, what, convert)
    }
}

/// Percent-encode one path segment.
fn segment(raw: &str) -> String {
    url::form_urlencoded::byte_serialize(raw.as_bytes())
        .collect::<String>()
        .replace('+', "%20")
}

/// `path?k=v&...`, or just `path` when there are no pairs.
fn with_query<'a>(path: &str, pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut query = url::form_urlencoded::Serializer::new(String::new());
    let mut any = false;
    for (key, value) in pairs {
        query.append_pair(key, value);
        any = true;
    }
    if any {
        format!("{path}?{}", query.finish())
    } else {
        path.to_string()
    }
}

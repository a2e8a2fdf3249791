//! Request descriptors.

use reqwest::Method;
use serde::Serialize;

use crate::error::ApiError;

/// Body of an outgoing request.
///
/// Both payload kinds are kept in a rebuildable form so the same request can
/// be sent a second time after a token refresh.
#[derive(Debug, Clone, Default)]
pub enum RequestBody {
    /// No body.
    #[default]
    Empty,
    /// Structured value sent as `application/json`.
    Json(serde_json::Value),
    /// `multipart/form-data`; the transport supplies the boundary header.
    Multipart(Vec<UploadPart>),
}

/// One field of a multipart upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadPart {
    /// A plain text field.
    Text { field: String, value: String },
    /// A file field.
    File {
        field: String,
        file_name: String,
        mime: Option<String>,
        data: Vec<u8>,
    },
}

impl UploadPart {
    /// Text field helper.
    #[must_use]
    pub fn text(field: impl Into<String>, value: impl Into<String>) -> Self {
        Self::Text {
            field: field.into(),
            value: value.into(),
        }
    }

    /// File field helper.
    #[must_use]
    pub fn file(
        field: impl Into<String>,
        file_name: impl Into<String>,
        mime: Option<&str>,
        data: Vec<u8>,
    ) -> Self {
        Self::File {
            field: field.into(),
            file_name: file_name.into(),
            mime: mime.map(str::to_owned),
            data,
        }
    }
}

/// Which send of a request is being made.
///
/// A request starts as `Initial`. A 401 on the initial send may lead to one
/// token refresh and a `Retry`; a 401 on the retry is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Attempt {
    Initial,
    Retry,
}

impl Attempt {
    /// The attempt to make after an authorization failure, if any remains.
    #[must_use]
    pub const fn next_after_unauthorized(self) -> Option<Self> {
        match self {
            Self::Initial => Some(Self::Retry),
            Self::Retry => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Initial => "initial",
            Self::Retry => "retry",
        }
    }
}

/// A request against the API, relative to the configured base URL.
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) body: RequestBody,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) refresh_on_unauthorized: bool,
}

impl ApiRequest {
    /// Create a bodiless request.
    #[must_use]
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            body: RequestBody::Empty,
            headers: Vec::new(),
            refresh_on_unauthorized: true,
        }
    }

    #[must_use]
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    #[must_use]
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    #[must_use]
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    #[must_use]
    pub fn patch(path: impl Into<String>) -> Self {
        Self::new(Method::PATCH, path)
    }

    #[must_use]
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns `ApiError::InvalidRequest` if `body` cannot be serialized.
    pub fn json<B: Serialize + ?Sized>(mut self, body: &B) -> Result<Self, ApiError> {
        let value = serde_json::to_value(body)
            .map_err(|e| ApiError::InvalidRequest(format!("cannot encode body: {e}")))?;
        self.body = RequestBody::Json(value);
        Ok(self)
    }

    /// Attach a multipart body.
    #[must_use]
    pub fn multipart(mut self, parts: Vec<UploadPart>) -> Self {
        self.body = RequestBody::Multipart(parts);
        self
    }

    /// Add a header. Extra headers override the default `Authorization` header.
    #[must_use]
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Treat a 401 as final instead of refreshing the session.
    ///
    /// Used for the credential exchanges themselves, where a 401 means the
    /// submitted password was wrong rather than that the session expired.
    #[must_use]
    pub const fn without_refresh(mut self) -> Self {
        self.refresh_on_unauthorized = false;
        self
    }

    #[must_use]
    pub const fn method(&self) -> &Method {
        &self.method
    }

    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    #[must_use]
    pub const fn body(&self) -> &RequestBody {
        &self.body
    }
}

//! Transport-neutral request and response records.

use std::fmt;

use bytes::Bytes;
use dockhand_common::{DockhandError, DockhandResult};
use serde::Serialize;
use serde::de::DeserializeOwned;
use url::form_urlencoded;

/// HTTP methods used by the Engine API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    /// GET
    Get,
    /// POST
    Post,
    /// DELETE
    Delete,
}

impl Method {
    /// The method name as sent on the wire.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Post => "POST",
            Self::Delete => "DELETE",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Percent-encode `segment` so it stays a single path segment.
///
/// `/` is escaped. Empty, `.` and `..` are rejected since URL parsing
/// collapses them into a different path even when escaped.
///
/// # Errors
///
/// Returns [`DockhandError::Config`] for segments that cannot be addressed.
pub fn path_segment(segment: &str) -> DockhandResult<String> {
    if matches!(segment, "" | "." | "..") {
        return Err(DockhandError::Config {
            message: format!("invalid path segment '{segment}'"),
        });
    }
    Ok(form_urlencoded::byte_serialize(segment.as_bytes())
        .collect::<String>()
        .replace('+', "%20"))
}

/// A single Engine API call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiRequest {
    /// HTTP method.
    pub method: Method,
    /// Unversioned path, e.g. `/networks/abc`.
    pub path: String,
    /// Query parameters, unencoded.
    pub query: Vec<(String, String)>,
    /// Pre-encoded JSON body.
    pub body: Option<Vec<u8>>,
}

impl ApiRequest {
    /// Create a request with no query and no body.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            query: Vec::new(),
            body: None,
        }
    }

    /// GET `path`.
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::Get, path)
    }

    /// POST `path`.
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::Post, path)
    }

    /// DELETE `path`.
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::Delete, path)
    }

    /// Append a query parameter.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.push((key.into(), value.into()));
        self
    }

    /// Attach a JSON body.
    ///
    /// # Errors
    ///
    /// Returns an error if `body` cannot be serialized.
    pub fn json<T: Serialize + ?Sized>(mut self, body: &T) -> DockhandResult<Self> {
        self.body = Some(serde_json::to_vec(body)?);
        Ok(self)
    }

    /// Value of the first query parameter named `key`.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Path with the query appended verbatim (not percent-encoded).
    ///
    /// For logs and diagnostics; transports encode the query themselves.
    #[must_use]
    pub fn path_and_query(&self) -> String {
        if self.query.is_empty() {
            return self.path.clone();
        }
        let query: Vec<String> = self.query.iter().map(|(k, v)| format!("{k}={v}")).collect();
        format!("{}?{}", self.path, query.join("&"))
    }
}

impl fmt::Display for ApiRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.method, self.path_and_query())
    }
}

/// A successful (2xx) response whose body has been read in full.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiResponse {
    /// HTTP status code.
    pub status: u16,
    /// Response body.
    pub body: Bytes,
}

impl ApiResponse {
    /// Create a response.
    pub fn new(status: u16, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    /// Decode the body as JSON.
    ///
    /// # Errors
    ///
    /// Returns [`DockhandError::Serialization`](dockhand_common::DockhandError::Serialization)
    /// if the body is not valid JSON for `T`.
    pub fn json<T: DeserializeOwned>(&self) -> DockhandResult<T> {
        Ok(serde_json::from_slice(&self.body)?)
    }
}

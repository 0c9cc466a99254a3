//! HTTP transport trait and request/response types.
//!
//! The transport performs exactly one round trip per call and knows nothing
//! about credentials or the API surface. A failure *status* is a successful
//! transport call (`Ok` with the status and body preserved); `Err` is
//! reserved for transport failures where no server reply exists.

use serde_json::Value;

use crate::error::Result;

/// HTTP method subset used by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
    Put,
    Delete,
}

impl Method {
    pub fn as_str(&self) -> &'static str {
        match self {
            Method::Get => "GET",
            Method::Post => "POST",
            Method::Put => "PUT",
            Method::Delete => "DELETE",
        }
    }
}

/// An outbound API request.
///
/// `path` is relative to the transport's base URL (e.g. `/services/42`).
#[derive(Debug, Clone)]
pub struct ApiRequest {
    pub method: Method,
    pub path: String,
    pub body: Option<Value>,
    pub bearer: Option<String>,
}

impl ApiRequest {
    /// Creates a GET request.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    /// Creates a POST request with a JSON body.
    pub fn post(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: Some(body),
            bearer: None,
        }
    }

    /// Creates a PUT request with a JSON body.
    pub fn put(path: impl Into<String>, body: Value) -> Self {
        Self {
            method: Method::Put,
            path: path.into(),
            body: Some(body),
            bearer: None,
        }
    }

    /// Creates a DELETE request.
    pub fn delete(path: impl Into<String>) -> Self {
        Self {
            method: Method::Delete,
            path: path.into(),
            body: None,
            bearer: None,
        }
    }

    /// Attaches a bearer credential.
    pub fn with_bearer(mut self, token: impl Into<String>) -> Self {
        self.bearer = Some(token.into());
        self
    }
}

/// An inbound API response.
#[derive(Debug, Clone)]
pub struct ApiResponse {
    pub status: u16,
    /// Parsed JSON body, if the reply carried one.
    pub body: Option<Value>,
}

impl ApiResponse {
    /// Whether the status is in the 2xx range.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// An abstract HTTP transport.
///
/// Implementations own connection handling and timeouts; callers own
/// credentials and status classification.
#[async_trait::async_trait]
pub trait HttpTransport: Send + Sync {
    /// Performs one request/response round trip.
    ///
    /// # Returns
    ///
    /// - `Ok(ApiResponse)`: The server replied (any status)
    /// - `Err(_)`: Transport failure, no server reply
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse>;
}

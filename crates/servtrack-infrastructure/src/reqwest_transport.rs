//! reqwest-backed HTTP transport.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;

use servtrack_core::error::{Result, ServtrackError};
use servtrack_core::transport::{ApiRequest, ApiResponse, HttpTransport, Method};

const DEFAULT_TIMEOUT_SECS: u64 = 10;

/// HTTP transport built on `reqwest::Client`.
///
/// Joins request paths onto a base URL, submits JSON bodies, and maps
/// transport-level failures (connect, timeout) to `Network` errors. Any
/// reply from the server, whatever its status, comes back as `Ok`.
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    base_url: String,
}

impl ReqwestTransport {
    /// Creates a transport for the given base URL (e.g.
    /// `http://localhost:3000/api`) with the default request timeout.
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, Duration::from_secs(DEFAULT_TIMEOUT_SECS))
    }

    /// Creates a transport with an explicit request timeout.
    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| ServtrackError::internal(format!("failed to build HTTP client: {err}")))?;
        let mut base_url = base_url.into();
        while base_url.ends_with('/') {
            base_url.pop();
        }
        Ok(Self { client, base_url })
    }

    fn url_for(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait::async_trait]
impl HttpTransport for ReqwestTransport {
    async fn execute(&self, request: ApiRequest) -> Result<ApiResponse> {
        let url = self.url_for(&request.path);
        tracing::debug!("{} {}", request.method.as_str(), url);

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
            Method::Put => self.client.put(&url),
            Method::Delete => self.client.delete(&url),
        };
        if let Some(token) = &request.bearer {
            builder = builder.bearer_auth(token);
        }
        if let Some(body) = &request.body {
            builder = builder.json(body);
        }

        let response = builder.send().await.map_err(|err| {
            ServtrackError::network(format!(
                "{} {} failed: {err}",
                request.method.as_str(),
                request.path
            ))
        })?;

        let status = response.status().as_u16();
        // Bodies are JSON when present; anything unparseable is treated as
        // absent rather than failing the round trip.
        let body = response.json::<Value>().await.ok();

        Ok(ApiResponse { status, body })
    }
}

//! API gateway: the single path every outbound request takes.
//!
//! The gateway pairs a pre-send hook (attach the stored bearer credential)
//! with a post-receive hook (a 401 reply deletes the stored credential and
//! publishes a revocation event). Status classification and error-payload
//! message extraction live here so the stores only ever see typed results.

use serde::de::DeserializeOwned;
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::watch;
use uuid::Uuid;

use servtrack_core::credential::CredentialStore;
use servtrack_core::error::{Result, ServtrackError};
use servtrack_core::transport::{ApiRequest, ApiResponse, HttpTransport};

/// Gateway over an [`HttpTransport`] that owns credential freshness at the
/// transport level.
///
/// Session identity is *not* cleared here; the gateway publishes a
/// revocation generation over a watch channel and `SessionStore::reconcile`
/// absorbs it. That keeps the transport layer and the user-facing identity
/// view decoupled without a silent staleness window.
pub struct ApiGateway {
    transport: Arc<dyn HttpTransport>,
    credentials: Arc<dyn CredentialStore>,
    revocations: watch::Sender<u64>,
}

impl ApiGateway {
    /// Creates a gateway over the given transport and credential store.
    pub fn new(transport: Arc<dyn HttpTransport>, credentials: Arc<dyn CredentialStore>) -> Self {
        let (revocations, _rx) = watch::channel(0);
        Self {
            transport,
            credentials,
            revocations,
        }
    }

    /// Subscribes to credential revocations.
    ///
    /// The observed value is a generation counter bumped once per 401 reply.
    pub fn revocations(&self) -> watch::Receiver<u64> {
        self.revocations.subscribe()
    }

    /// Performs a request and decodes the JSON reply into `T`.
    pub async fn request<T: DeserializeOwned>(&self, request: ApiRequest) -> Result<T> {
        let response = self.send(request).await?;
        let body = response
            .body
            .ok_or_else(|| ServtrackError::internal("expected a JSON body, got none"))?;
        let value = serde_json::from_value(body)
            .map_err(|err| ServtrackError::internal(format!("unexpected response shape: {err}")))?;
        Ok(value)
    }

    /// Performs a request whose successful reply carries no body (204).
    pub async fn request_empty(&self, request: ApiRequest) -> Result<()> {
        self.send(request).await?;
        Ok(())
    }

    async fn send(&self, mut request: ApiRequest) -> Result<ApiResponse> {
        // Pre-send hook: attach the stored credential unless the caller
        // pinned one explicitly (session restore validates a specific token).
        if request.bearer.is_none() {
            if let Some(token) = self.credentials.get().await? {
                request.bearer = Some(token);
            }
        }

        let request_id = Uuid::new_v4();
        tracing::debug!(
            %request_id,
            "{} {}",
            request.method.as_str(),
            request.path
        );

        let response = self.transport.execute(request).await?;

        // Post-receive hook: an unauthorized reply invalidates the stored
        // credential and notifies subscribers.
        if response.status == 401 {
            if let Err(err) = self.credentials.delete().await {
                tracing::warn!("failed to delete revoked credential: {err}");
            }
            self.revocations.send_modify(|generation| *generation += 1);
            tracing::info!(%request_id, "credential revoked by server (401)");
        }

        if response.is_success() {
            tracing::debug!(%request_id, status = response.status, "request succeeded");
            Ok(response)
        } else {
            let err = classify_failure(&response);
            tracing::debug!(%request_id, status = response.status, "request failed: {err}");
            Err(err)
        }
    }
}

/// Derives a typed error from a failure reply, extracting the server's
/// `message` field when the payload carries one.
fn classify_failure(response: &ApiResponse) -> ServtrackError {
    let message = response
        .body
        .as_ref()
        .and_then(|body| body.get("message"))
        .and_then(Value::as_str)
        .map(str::to_string);
    ServtrackError::Server {
        status: response.status,
        message,
    }
}

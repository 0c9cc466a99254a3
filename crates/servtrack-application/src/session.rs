//! Session store: current-user identity and credential lifecycle.

use serde::Deserialize;
use serde_json::json;
use std::sync::{Arc, Mutex};
use tokio::sync::watch;

use servtrack_core::credential::CredentialStore;
use servtrack_core::error::{Result, ServtrackError};
use servtrack_core::state::StateCell;
use servtrack_core::transport::ApiRequest;
use servtrack_core::user::{Role, User};

use crate::gateway::ApiGateway;

/// Observable session state.
///
/// `user` is present iff a valid credential was most recently confirmed by
/// the server (login, register, or session restore).
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    pub user: Option<User>,
    pub token: Option<String>,
    pub is_loading: bool,
    pub last_error: Option<String>,
}

impl SessionState {
    /// Whether a server-confirmed identity is present.
    pub fn is_authenticated(&self) -> bool {
        self.user.is_some()
    }
}

#[derive(Deserialize)]
struct AuthResponse {
    token: String,
    user: User,
}

#[derive(Deserialize)]
struct MeResponse {
    user: User,
}

/// Store owning the authenticated-user view of the client.
///
/// Operations are asynchronous request/response calls; overlapping
/// session-mutating calls are not serialized here (single-flight is the
/// caller's responsibility).
pub struct SessionStore {
    state: StateCell<SessionState>,
    gateway: Arc<ApiGateway>,
    credentials: Arc<dyn CredentialStore>,
    revocations: Mutex<watch::Receiver<u64>>,
}

impl SessionStore {
    /// Creates a store over the given gateway and credential store.
    ///
    /// The credential store must be the same instance the gateway uses,
    /// otherwise the two layers desynchronize.
    pub fn new(gateway: Arc<ApiGateway>, credentials: Arc<dyn CredentialStore>) -> Self {
        let revocations = Mutex::new(gateway.revocations());
        Self {
            state: StateCell::default(),
            gateway,
            credentials,
            revocations,
        }
    }

    /// Returns a snapshot of the session state.
    pub fn state(&self) -> SessionState {
        self.state.get()
    }

    /// Subscribes to session state changes.
    pub fn subscribe(&self) -> watch::Receiver<SessionState> {
        self.state.subscribe()
    }

    /// The currently confirmed user, if any.
    pub fn current_user(&self) -> Option<User> {
        self.state.get().user
    }

    /// Authenticates with email and password.
    ///
    /// On success the returned credential is persisted and the resolved
    /// user published; on failure `last_error` is published and the error
    /// re-raised for the caller.
    pub async fn login(&self, email: &str, password: &str) -> Result<User> {
        self.begin(true);
        let request = ApiRequest::post(
            "/auth/login",
            json!({ "email": email, "password": password }),
        );
        match self.authenticate(request).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "login succeeded");
                Ok(user)
            }
            Err(err) => {
                self.fail("Login failed", &err);
                Err(err)
            }
        }
    }

    /// Registers a new account and signs it in.
    ///
    /// The role string is validated client-side; an invalid role fails
    /// before any network call is made.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User> {
        self.begin(true);
        match self.try_register(name, email, password, role).await {
            Ok(user) => {
                tracing::info!(user_id = %user.id, "registration succeeded");
                Ok(user)
            }
            Err(err) => {
                self.fail("Registration failed", &err);
                Err(err)
            }
        }
    }

    async fn try_register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: &str,
    ) -> Result<User> {
        if name.trim().is_empty() || email.trim().is_empty() || password.is_empty() {
            return Err(ServtrackError::validation(
                "name, email and password are required",
            ));
        }
        let role: Role = role.parse()?;
        let request = ApiRequest::post(
            "/auth/register",
            json!({
                "name": name,
                "email": email,
                "password": password,
                "role": role,
            }),
        );
        self.authenticate(request).await
    }

    async fn authenticate(&self, request: ApiRequest) -> Result<User> {
        let response: AuthResponse = self.gateway.request(request).await?;
        // The credential is persisted before the state is published so a
        // subscriber reacting to the new identity always finds the token.
        self.credentials.set(&response.token).await?;
        let user = response.user.clone();
        self.state.update(|s| {
            s.user = Some(response.user);
            s.token = Some(response.token);
            s.is_loading = false;
        });
        Ok(user)
    }

    /// Signs out: deletes the stored credential, then resets the session.
    ///
    /// If credential deletion fails the in-memory state is left unchanged,
    /// so the observable session never claims a sign-out that did not
    /// actually happen.
    pub async fn logout(&self) -> Result<()> {
        self.begin(false);
        match self.credentials.delete().await {
            Ok(()) => {
                self.state.set(SessionState::default());
                tracing::info!("logout succeeded");
                Ok(())
            }
            Err(err) => {
                self.fail("Logout failed", &err);
                Err(err)
            }
        }
    }

    /// Restores a persisted session at process start.
    ///
    /// Fail-closed policy: a credential that cannot be verified against the
    /// server — for any reason, including a network failure — is deleted
    /// and the session left empty. Returns the restored user, if any.
    pub async fn restore_session(&self) -> Result<Option<User>> {
        self.begin(false);

        let token = match self.credentials.get().await {
            Ok(token) => token,
            Err(err) => {
                tracing::warn!("credential read failed, treating as signed out: {err}");
                None
            }
        };
        let Some(token) = token else {
            self.state.set(SessionState::default());
            return Ok(None);
        };

        let request = ApiRequest::get("/auth/me").with_bearer(token.clone());
        match self.gateway.request::<MeResponse>(request).await {
            Ok(me) => {
                let user = me.user.clone();
                self.state.update(|s| {
                    s.user = Some(me.user);
                    s.token = Some(token);
                    s.is_loading = false;
                });
                tracing::info!(user_id = %user.id, "session restored");
                Ok(Some(user))
            }
            Err(err) => {
                tracing::info!("persisted credential failed verification: {err}");
                if let Err(del) = self.credentials.delete().await {
                    tracing::warn!("failed to delete stale credential: {del}");
                }
                self.state.set(SessionState::default());
                Ok(None)
            }
        }
    }

    /// Clears `last_error` without other side effects.
    pub fn clear_error(&self) {
        self.state.update(|s| s.last_error = None);
    }

    /// Absorbs credential revocations published by the gateway.
    ///
    /// When any request came back 401 since the last call, the in-memory
    /// identity is dropped to match the already-deleted credential. Returns
    /// `true` if an identity was torn down.
    pub fn reconcile(&self) -> bool {
        let mut rx = self
            .revocations
            .lock()
            .expect("revocation receiver lock poisoned");
        if !rx.has_changed().unwrap_or(false) {
            return false;
        }
        rx.borrow_and_update();
        drop(rx);

        let had_user = self.state.get().user.is_some();
        if had_user {
            self.state.update(|s| {
                s.user = None;
                s.token = None;
            });
            tracing::info!("credential revoked by server, session cleared");
        }
        had_user
    }

    fn begin(&self, clear_error: bool) {
        self.state.update(|s| {
            s.is_loading = true;
            if clear_error {
                s.last_error = None;
            }
        });
    }

    fn fail(&self, fallback: &str, err: &ServtrackError) {
        let message = err.user_message(fallback);
        self.state.update(|s| {
            s.is_loading = false;
            s.last_error = Some(message);
        });
    }
}

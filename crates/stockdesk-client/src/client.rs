//! # API Client
//!
//! Routes every request through the session: public endpoints go out as-is,
//! private ones carry the access token, and a rejected token is refreshed
//! once and the request replayed.
//!
//! ## Refresh Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Token Refresh Interceptor                          │
//! │                                                                         │
//! │  request A (token t1) ──► 401                                          │
//! │      │                                                                  │
//! │      ├─ no refresh cookie ─────────────► force logout, return 401      │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  lock refresh gate ◄──────────────── request B (t1) ──► 401, waits      │
//! │      │                                                                  │
//! │      │  stored token still t1?                                          │
//! │      │     yes → POST /auth/refresh { refreshToken }                    │
//! │      │            ok   → store t2, unlock, replay A with t2            │
//! │      │            fail → force logout, unlock, return refresh error    │
//! │      │                                                                  │
//! │  B acquires gate: stored token is t2 ≠ t1 → replay B with t2           │
//! │                   (no second refresh call)                              │
//! │                                                                         │
//! │  A replayed request that fails again is returned as-is.                │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Forced logout clears both cookies, remembers the current location as the
//! post-login redirect and notifies the registered [`LogoutHook`].

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::{Arc, RwLock};
use stockdesk_core::{AuthData, RefreshRequest};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::session::{Session, SessionStore};
use crate::transport::{HttpRequest, HttpResponse, ReqwestTransport, Transport};

/// Path prefixes that never carry a token and never trigger a refresh.
pub const PUBLIC_PATH_PREFIXES: [&str; 8] = [
    "/auth/login",
    "/auth/refresh",
    "/auth/forgot-password",
    "/auth/reset-password",
    "/customers/register",
    "/customers/verify-email",
    "/customers/resend-verification",
    "/users/initialize",
];

const REFRESH_PATH: &str = "/auth/refresh";
const DEFAULT_LOCATION: &str = "/dashboard";

pub fn is_public_path(path: &str) -> bool {
    let path = path.split(['?', '#']).next().unwrap_or(path);
    PUBLIC_PATH_PREFIXES
        .iter()
        .any(|prefix| path.starts_with(prefix))
}

// =============================================================================
// Logout Hook
// =============================================================================

/// Told when the session is ended because it could not be renewed.
pub trait LogoutHook: Send + Sync {
    /// `redirect_after_login` is where the operator was when it happened.
    fn on_logout(&self, redirect_after_login: &str);
}

impl<F> LogoutHook for F
where
    F: Fn(&str) + Send + Sync,
{
    fn on_logout(&self, redirect_after_login: &str) {
        self(redirect_after_login)
    }
}

// =============================================================================
// Client
// =============================================================================

/// Handle to the backend. Cheap to clone; clones share the session and the
/// refresh gate.
#[derive(Clone)]
pub struct ApiClient {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    transport: Arc<dyn Transport>,
    session: Session,
    /// Held while a refresh is in flight.
    refresh_gate: Mutex<()>,
    logout_hook: RwLock<Option<Arc<dyn LogoutHook>>>,
    location: RwLock<String>,
}

impl ApiClient {
    /// Client over HTTP using `config` and the given cookie store.
    pub fn new(config: &ClientConfig, store: Arc<dyn SessionStore>) -> ClientResult<Self> {
        config.validate()?;
        let transport = ReqwestTransport::new(config)?;
        info!(url = %transport.base_url(), "API client ready");
        Ok(Self::with_transport(
            Arc::new(transport),
            Session::new(store, config),
        ))
    }

    pub fn with_transport(transport: Arc<dyn Transport>, session: Session) -> Self {
        ApiClient {
            inner: Arc::new(ClientInner {
                transport,
                session,
                refresh_gate: Mutex::new(()),
                logout_hook: RwLock::new(None),
                location: RwLock::new(DEFAULT_LOCATION.to_string()),
            }),
        }
    }

    pub fn session(&self) -> &Session {
        &self.inner.session
    }

    pub fn set_logout_hook(&self, hook: impl LogoutHook + 'static) {
        let mut slot = self
            .inner
            .logout_hook
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = Some(Arc::new(hook));
    }

    /// Records where the operator currently is (path plus query).
    pub fn set_location(&self, location: impl Into<String>) {
        let mut slot = self
            .inner
            .location
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *slot = location.into();
    }

    pub fn location(&self) -> String {
        self.inner
            .location
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    // =========================================================================
    // Request Pipeline
    // =========================================================================

    /// Sends `request`, refreshing the session once on an auth failure.
    pub async fn execute(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        if is_public_path(&request.path) {
            return self.send(request).await;
        }

        let token = self.inner.session.access_token()?;
        match self.send(request.clone().with_bearer(token.clone())).await {
            Err(err) if err.is_auth_failure() => self.recover(request, token, err).await,
            result => result,
        }
    }

    async fn send(&self, request: HttpRequest) -> ClientResult<HttpResponse> {
        debug!(
            method = %request.method,
            path = %request.path,
            authenticated = request.bearer.is_some(),
            "API request"
        );
        let response = self.inner.transport.execute(&request).await?;
        response.error_for_status()
    }

    /// Handles an auth failure on a first attempt.
    async fn recover(
        &self,
        request: HttpRequest,
        failed_token: Option<String>,
        err: ClientError,
    ) -> ClientResult<HttpResponse> {
        if !self.inner.session.has_refresh_token()? {
            self.force_logout("no refresh token");
            return Err(err);
        }

        let gate = self.inner.refresh_gate.lock().await;

        // Someone refreshed while we waited.
        let current = self.inner.session.access_token()?;
        if current.is_some() && current != failed_token {
            drop(gate);
            debug!(path = %request.path, "Replaying with rotated token");
            return self.send(request.with_bearer(current)).await;
        }

        // A concurrent refresh failed and already logged out.
        let Some(refresh_token) = self.inner.session.refresh_token()? else {
            return Err(err);
        };

        match self.refresh_with(refresh_token).await {
            Ok(access_token) => {
                drop(gate);
                debug!(path = %request.path, "Replaying after refresh");
                self.send(request.with_bearer(Some(access_token))).await
            }
            Err(refresh_err) => {
                warn!(error = %refresh_err, "Token refresh failed");
                self.force_logout("refresh failed");
                Err(refresh_err)
            }
        }
    }

    /// POSTs the refresh token and stores the new pair.
    async fn refresh_with(&self, refresh_token: String) -> ClientResult<String> {
        let request = HttpRequest::post(REFRESH_PATH).with_json(&RefreshRequest { refresh_token })?;
        let auth: AuthData = self.send(request).await?.data()?;
        self.inner.session.store_tokens(&auth)?;
        info!("Session refreshed");
        Ok(auth.access_token)
    }

    /// Refreshes the session now, outside of any failed request.
    pub(crate) async fn refresh_session(&self) -> ClientResult<String> {
        let _gate = self.inner.refresh_gate.lock().await;
        let refresh_token = self.inner.session.refresh_token()?.ok_or_else(|| ClientError::Api {
            status: 401,
            message: Some("Unauthorized".into()),
        })?;
        self.refresh_with(refresh_token).await
    }

    fn force_logout(&self, reason: &str) {
        if let Err(e) = self.inner.session.clear_tokens() {
            warn!(error = %e, "Failed to clear session cookies");
        }

        let location = self.location();
        if let Err(e) = self.inner.session.set_redirect_after_login(location.clone()) {
            warn!(error = %e, "Failed to remember redirect location");
        }
        warn!(reason, redirect_after_login = %location, "Session ended, logging out");

        let hook = self
            .inner
            .logout_hook
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone();
        if let Some(hook) = hook {
            hook.on_logout(&location);
        }
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    pub async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(HttpRequest::get(path)).await?.data()
    }

    pub async fn get_with<T, Q>(&self, path: &str, query: &Q) -> ClientResult<T>
    where
        T: DeserializeOwned,
        Q: Serialize + ?Sized,
    {
        self.execute(HttpRequest::get(path).with_query(query)?)
            .await?
            .data()
    }

    /// Raw body of a GET, for non-JSON downloads.
    pub async fn get_text(&self, path: &str) -> ClientResult<String> {
        Ok(self.execute(HttpRequest::get(path)).await?.text())
    }

    pub async fn post<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpRequest::post(path).with_json(body)?)
            .await?
            .data()
    }

    pub async fn patch<T, B>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        T: DeserializeOwned,
        B: Serialize + ?Sized,
    {
        self.execute(HttpRequest::patch(path).with_json(body)?)
            .await?
            .data()
    }

    /// PATCH without a body (state transitions).
    pub async fn patch_empty<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        self.execute(HttpRequest::patch(path)).await?.data()
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.execute(HttpRequest::delete(path)).await?;
        Ok(())
    }
}

impl std::fmt::Debug for ApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApiClient")
            .field("session", &self.inner.session)
            .field("location", &self.location())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_paths() {
        assert!(is_public_path("/auth/login"));
        assert!(is_public_path("/auth/refresh"));
        assert!(is_public_path("/customers/verify-email?token=abc"));
        assert!(is_public_path("/users/initialize"));

        assert!(!is_public_path("/auth/profile"));
        assert!(!is_public_path("/customers"));
        assert!(!is_public_path("/customers/c-1"));
        assert!(!is_public_path("/products"));
    }

    #[test]
    fn test_closure_logout_hook() {
        let seen = std::sync::Mutex::new(Vec::new());
        let hook = |path: &str| seen.lock().unwrap().push(path.to_string());
        hook.on_logout("/dashboard/pos");
        assert_eq!(*seen.lock().unwrap(), vec!["/dashboard/pos".to_string()]);
    }
}

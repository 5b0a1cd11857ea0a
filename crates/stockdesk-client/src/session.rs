//! # Session Cookies
//!
//! The session is two cookies plus the path to return to after signing in.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Session Cookie Jar                             │
//! │                                                                         │
//! │  accessToken    expires now + access TTL (default 15 min)              │
//! │  refreshToken   expires at server-sent refreshTokenExpires             │
//! │                 both: Path=/  SameSite=Lax  Secure (production)        │
//! │                                                                         │
//! │  redirect_after_login   set on forced logout, taken after login        │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────────────────┐  │
//! │  │ MemorySessionStore   │        │ FileSessionStore                 │  │
//! │  │ (tests, one process) │        │ <data dir>/session.json          │  │
//! │  └──────────────────────┘        │ rewritten via temp file + rename │  │
//! │                                  └──────────────────────────────────┘  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! An expired cookie reads exactly like a missing one.

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use stockdesk_core::AuthData;
use tracing::{debug, warn};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

pub const ACCESS_TOKEN_COOKIE: &str = "accessToken";
pub const REFRESH_TOKEN_COOKIE: &str = "refreshToken";

const HTTP_DATE: &str = "%a, %d %b %Y %H:%M:%S GMT";

// =============================================================================
// Cookie
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Cookie {
    pub name: String,
    pub value: String,
    pub expires: DateTime<Utc>,
    #[serde(default)]
    pub secure: bool,
}

impl Cookie {
    pub fn new(
        name: impl Into<String>,
        value: impl Into<String>,
        expires: DateTime<Utc>,
        secure: bool,
    ) -> Self {
        Cookie {
            name: name.into(),
            value: value.into(),
            expires,
            secure,
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires
    }

    /// `Set-Cookie` header value.
    pub fn to_set_cookie(&self) -> String {
        let mut header = format!(
            "{}={}; Path=/; Expires={}; SameSite=Lax",
            self.name,
            self.value,
            self.expires.format(HTTP_DATE)
        );
        if self.secure {
            header.push_str("; Secure");
        }
        header
    }

    /// `Set-Cookie` header value that deletes the cookie named `name`.
    pub fn removal(name: &str, secure: bool) -> String {
        let mut header = format!(
            "{}=; Path=/; Expires=Thu, 01 Jan 1970 00:00:00 GMT; Max-Age=0; SameSite=Lax",
            name
        );
        if secure {
            header.push_str("; Secure");
        }
        header
    }
}

// =============================================================================
// Session State
// =============================================================================

/// Everything a [`SessionStore`] persists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionState {
    #[serde(default)]
    pub access_token: Option<Cookie>,
    #[serde(default)]
    pub refresh_token: Option<Cookie>,
    #[serde(default)]
    pub redirect_after_login: Option<String>,
}

impl SessionState {
    pub fn access_token_at(&self, now: DateTime<Utc>) -> Option<&str> {
        live_value(self.access_token.as_ref(), now)
    }

    pub fn refresh_token_at(&self, now: DateTime<Utc>) -> Option<&str> {
        live_value(self.refresh_token.as_ref(), now)
    }
}

fn live_value(cookie: Option<&Cookie>, now: DateTime<Utc>) -> Option<&str> {
    cookie
        .filter(|c| !c.is_expired_at(now) && !c.value.is_empty())
        .map(|c| c.value.as_str())
}

// =============================================================================
// Stores
// =============================================================================

/// Where the cookie jar lives between requests.
pub trait SessionStore: Send + Sync {
    fn load(&self) -> ClientResult<SessionState>;
    fn save(&self, state: &SessionState) -> ClientResult<()>;
}

/// In-process jar.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    state: Mutex<SessionState>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_state(state: SessionState) -> Self {
        MemorySessionStore {
            state: Mutex::new(state),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn load(&self) -> ClientResult<SessionState> {
        self.state
            .lock()
            .map(|guard| guard.clone())
            .map_err(|e| ClientError::SessionStore(e.to_string()))
    }

    fn save(&self, state: &SessionState) -> ClientResult<()> {
        let mut guard = self
            .state
            .lock()
            .map_err(|e| ClientError::SessionStore(e.to_string()))?;
        *guard = state.clone();
        Ok(())
    }
}

/// Jar persisted as JSON so consecutive CLI invocations share a session.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        FileSessionStore { path: path.into() }
    }

    /// `<data dir>/session.json`.
    pub fn default_location() -> ClientResult<Self> {
        directories::ProjectDirs::from("io", "stockdesk", "stockdesk")
            .map(|dirs| Self::new(dirs.data_dir().join("session.json")))
            .ok_or_else(|| ClientError::SessionStore("No data directory available".into()))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionStore for FileSessionStore {
    fn load(&self) -> ClientResult<SessionState> {
        let contents = match std::fs::read_to_string(&self.path) {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(SessionState::default())
            }
            Err(e) => return Err(ClientError::SessionStore(e.to_string())),
        };

        match serde_json::from_str(&contents) {
            Ok(state) => Ok(state),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Discarding unreadable session file");
                Ok(SessionState::default())
            }
        }
    }

    fn save(&self, state: &SessionState) -> ClientResult<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::SessionStore(e.to_string()))?;
        }

        let contents = serde_json::to_string_pretty(state)
            .map_err(|e| ClientError::SerializationFailed(e.to_string()))?;
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, contents).map_err(|e| ClientError::SessionStore(e.to_string()))?;
        std::fs::rename(&tmp, &self.path).map_err(|e| ClientError::SessionStore(e.to_string()))?;

        debug!(path = ?self.path, "Session saved");
        Ok(())
    }
}

// =============================================================================
// Session
// =============================================================================

/// Cookie jar operations on top of a [`SessionStore`].
pub struct Session {
    store: Arc<dyn SessionStore>,
    access_ttl: Duration,
    secure: bool,
    /// Serialises load-modify-save cycles.
    write_lock: Mutex<()>,
}

impl Session {
    pub fn new(store: Arc<dyn SessionStore>, config: &ClientConfig) -> Self {
        Self::with_settings(store, config.access_token_ttl(), config.secure_cookies())
    }

    pub fn with_settings(store: Arc<dyn SessionStore>, access_ttl: Duration, secure: bool) -> Self {
        Session {
            store,
            access_ttl,
            secure,
            write_lock: Mutex::new(()),
        }
    }

    pub fn state(&self) -> ClientResult<SessionState> {
        self.store.load()
    }

    /// Current access token, if set and unexpired.
    pub fn access_token(&self) -> ClientResult<Option<String>> {
        let state = self.store.load()?;
        Ok(state.access_token_at(Utc::now()).map(str::to_string))
    }

    /// Current refresh token, if set and unexpired.
    pub fn refresh_token(&self) -> ClientResult<Option<String>> {
        let state = self.store.load()?;
        Ok(state.refresh_token_at(Utc::now()).map(str::to_string))
    }

    pub fn has_refresh_token(&self) -> ClientResult<bool> {
        Ok(self.refresh_token()?.is_some())
    }

    /// Stores a login or refresh result.
    pub fn store_tokens(&self, auth: &AuthData) -> ClientResult<()> {
        let access_expires = Utc::now()
            .checked_add_signed(self.access_ttl)
            .ok_or_else(|| {
                ClientError::SessionStore(format!(
                    "access token lifetime {}s is out of range",
                    self.access_ttl.num_seconds()
                ))
            })?;
        let secure = self.secure;
        self.update(|state| {
            state.access_token = Some(Cookie::new(
                ACCESS_TOKEN_COOKIE,
                auth.access_token.clone(),
                access_expires,
                secure,
            ));
            state.refresh_token = Some(Cookie::new(
                REFRESH_TOKEN_COOKIE,
                auth.refresh_token.clone(),
                auth.refresh_token_expires,
                secure,
            ));
        })
    }

    /// Drops both token cookies. The redirect path is kept.
    pub fn clear_tokens(&self) -> ClientResult<()> {
        self.update(|state| {
            state.access_token = None;
            state.refresh_token = None;
        })
    }

    pub fn set_redirect_after_login(&self, path: impl Into<String>) -> ClientResult<()> {
        let path = path.into();
        self.update(|state| state.redirect_after_login = Some(path))
    }

    /// Returns and forgets the post-login redirect.
    pub fn take_redirect_after_login(&self) -> ClientResult<Option<String>> {
        let mut taken = None;
        self.update(|state| taken = state.redirect_after_login.take())?;
        Ok(taken)
    }

    /// `Set-Cookie` values describing the jar: live cookies are set,
    /// missing or expired ones are deleted.
    pub fn set_cookie_headers(&self) -> ClientResult<Vec<String>> {
        let state = self.store.load()?;
        let now = Utc::now();
        let render = |cookie: Option<&Cookie>, name: &str| match cookie {
            Some(c) if !c.is_expired_at(now) => c.to_set_cookie(),
            _ => Cookie::removal(name, self.secure),
        };
        Ok(vec![
            render(state.access_token.as_ref(), ACCESS_TOKEN_COOKIE),
            render(state.refresh_token.as_ref(), REFRESH_TOKEN_COOKIE),
        ])
    }

    fn update<F>(&self, apply: F) -> ClientResult<()>
    where
        F: FnOnce(&mut SessionState),
    {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|e| ClientError::SessionStore(e.to_string()))?;
        let mut state = self.store.load()?;
        apply(&mut state);
        self.store.save(&state)
    }
}

impl std::fmt::Debug for Session {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Session")
            .field("access_ttl", &self.access_ttl)
            .field("secure", &self.secure)
            .finish_non_exhaustive()
    }
}

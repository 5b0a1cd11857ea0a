//! # stockdesk-client: REST Client for StockDesk
//!
//! Typed access to the inventory / point-of-sale backend, with the session
//! cookie jar and the token-refresh interceptor every private request goes
//! through.
//!
//! ## Request Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                          Request Pipeline                               │
//! │                                                                         │
//! │  client.products().list(&query)                                        │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  ┌──────────────┐   public path?  ┌─────────────────────────────────┐  │
//! │  │  ApiClient   │ ──── yes ─────► │ send as-is (login, refresh, …)  │  │
//! │  │  execute()   │                 └─────────────────────────────────┘  │
//! │  └──────┬───────┘                                                       │
//! │         │ no: attach Bearer <accessToken>                               │
//! │         ▼                                                               │
//! │  ┌──────────────┐   auth failure  ┌─────────────────────────────────┐  │
//! │  │  Transport   │ ──────────────► │ refresh gate (tokio Mutex)      │  │
//! │  │  (reqwest)   │                 │  • token already rotated? replay│  │
//! │  └──────┬───────┘                 │  • else POST /auth/refresh,     │  │
//! │         │ ok                      │    store pair, replay once      │  │
//! │         ▼                         │  • no refresh token / refresh   │  │
//! │  Envelope { message, data }       │    failed → force logout        │  │
//! │         │                         └─────────────────────────────────┘  │
//! │         ▼                                                               │
//! │  T  or  Page<T>                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Module Organization
//! - [`api`] - Resource APIs (products, orders, inventory, ...)
//! - [`client`] - `ApiClient` and the refresh interceptor
//! - [`config`] - Base URL, timeout, cookie settings (TOML + env)
//! - [`envelope`] - Response envelope and list normalisation
//! - [`error`] - Client error types
//! - [`session`] - Session cookies and their stores
//! - [`transport`] - HTTP seam (`Transport` trait, reqwest implementation)
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use stockdesk_client::{ApiClient, ClientConfig, FileSessionStore};
//! use stockdesk_core::ProductQuery;
//!
//! let config = ClientConfig::load(None)?;
//! let store = Arc::new(FileSessionStore::default_location()?);
//! let client = ApiClient::new(&config, store)?;
//!
//! client.login(&login).await?;
//! let page = client.products().list(&ProductQuery::default()).await?;
//! println!("{} products", page.total);
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod api;
pub mod client;
pub mod config;
pub mod envelope;
pub mod error;
pub mod session;
pub mod transport;

// =============================================================================
// Re-exports
// =============================================================================

pub use client::{is_public_path, ApiClient, LogoutHook, PUBLIC_PATH_PREFIXES};
pub use config::{ClientConfig, Environment};
pub use envelope::Page;
pub use error::{ClientError, ClientResult};
pub use session::{
    Cookie, FileSessionStore, MemorySessionStore, Session, SessionState, SessionStore,
};
pub use transport::{
    HttpMethod, HttpRequest, HttpResponse, MultipartFile, ReqwestTransport, RequestBody,
    Transport,
};

//! # stockdesk-core: Pure Logic for StockDesk
//!
//! Everything the StockDesk operator surface computes on its own side of the
//! wire. Inventory arithmetic, order lifecycle and permission enforcement
//! belong to the backend; what remains here is presentation logic that must
//! still be right: cart totals, which navigation entries a user sees, and
//! the validation that runs before a form is submitted.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        StockDesk Architecture                           │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │                 stockdesk-cli (operator commands)               │   │
//! │  │    login ──► products ──► inventory ──► pos ──► checkout        │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ stockdesk-core (THIS CRATE) ★                     │   │
//! │  │                                                                 │   │
//! │  │   ┌───────────┐  ┌───────────┐  ┌───────────┐  ┌───────────┐  │   │
//! │  │   │   types   │  │   money   │  │   cart    │  │navigation │  │   │
//! │  │   │  Product  │  │   Money   │  │  PosCart  │  │ NavEntry  │  │   │
//! │  │   │  Order    │  │  TaxRate  │  │  CartLine │  │ PageGuard │  │   │
//! │  │   └───────────┘  └───────────┘  └───────────┘  └───────────┘  │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO NETWORK • PURE FUNCTIONS                          │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! │                                │                                        │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             stockdesk-client (REST + session refresh)           │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`types`] - Backend DTOs (Product, Order, Inventory, Profile, ...)
//! - [`money`] - Money and tax-rate types with exact decimal parsing
//! - [`cart`] - Point-of-sale cart with derived totals
//! - [`navigation`] - Sidebar entries filtered by permission codes
//! - [`routing`] - Route guard for protected dashboard paths
//! - [`inventory`] - Stock status thresholds and adjustment previews
//! - [`orders`] - Actions available for an order in a given state
//! - [`date_range`] - Analytics date range presets
//! - [`validation`] - Form validation rules
//! - [`error`] - Domain error types
//!
//! ## Example Usage
//!
//! ```rust
//! use stockdesk_core::cart::{NewCartLine, PosCart};
//! use stockdesk_core::money::{Money, TaxRate};
//!
//! let mut cart = PosCart::new();
//! cart.add_item(NewCartLine::product("p-1", "Widget", "W-1", Money::from_major(100), 2)).unwrap();
//! cart.set_tax(TaxRate::from_bps(1000)); // 10%
//!
//! assert_eq!(cart.subtotal(), Money::from_major(200));
//! assert_eq!(cart.total(), Money::from_major(220));
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod cart;
pub mod date_range;
pub mod error;
pub mod inventory;
pub mod money;
pub mod navigation;
pub mod orders;
pub mod routing;
pub mod types;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use cart::{CartLine, CartSummary, NewCartLine, PosCart};
pub use error::{CoreError, CoreResult, FieldErrors, ValidationError};
pub use money::{Money, TaxRate};
pub use navigation::{NavEntry, NavSection, PermissionSet};
pub use types::*;

// =============================================================================
// Crate-Level Constants
// =============================================================================

/// Maximum distinct lines allowed in a single POS cart.
///
/// ## Business Reason
/// Prevents runaway carts and keeps order payloads a reasonable size.
pub const MAX_CART_ITEMS: usize = 100;

/// Maximum quantity of a single line in the cart.
///
/// ## Business Reason
/// Catches typing 1000 instead of 10 before it reaches the backend.
pub const MAX_ITEM_QUANTITY: i64 = 999;

/// Message shown when the backend gives nothing better to say.
pub const GENERIC_ERROR_MESSAGE: &str = "Oops!! something went wrong";

//! # Domain Types
//!
//! Typed views of the backend's entities and the request bodies sent back.
//!
//! ## Type Map
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  Catalog              Stock                 Sales                       │
//! │  ───────────────      ───────────────       ───────────────             │
//! │  Product              Inventory             Order                       │
//! │   └─ Variant          InventoryTransaction   └─ OrderItem               │
//! │  Category, Brand      AdjustType            OrderStatus                 │
//! │  Manufacturer, Unit                         PaymentMethod               │
//! │                                             Customer / CustomerType     │
//! │                                                                         │
//! │  Identity             Analytics                                         │
//! │  ───────────────      ───────────────                                   │
//! │  User / Role          DashboardStats                                    │
//! │  Profile (+perms)     RevenueChart                                      │
//! │  AuthData                                                               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Conventions
//! - Field names are camelCase on the wire (`#[serde(rename_all = "camelCase")]`)
//! - Amounts are [`Money`], rates are [`TaxRate`] (see `money` module)
//! - Responses are read leniently: anything the backend may omit is
//!   `Option` or `#[serde(default)]`
//! - Request bodies skip `None` fields so PATCH stays partial

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::money::{Money, TaxRate};

// =============================================================================
// Shared Fragments
// =============================================================================

/// `{ id, name }` reference embedded in other entities.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NamedRef {
    pub id: String,
    pub name: String,
}

/// Stock figures embedded in a product or variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockLevel {
    #[serde(default)]
    pub quantity: i64,
    pub minimum_stock: Option<i64>,
}

// =============================================================================
// Identity
// =============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Role {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub code: String,
    pub description: Option<String>,
    #[serde(default)]
    pub is_system: bool,
    pub created_at: Option<DateTime<Utc>>,
}

/// A staff account.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub avatar: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub last_login: Option<DateTime<Utc>>,
    pub role_id: Option<String>,
    pub role: Option<Role>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Payload of `POST /auth/login` and `POST /auth/refresh`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthData {
    /// Present on login; refresh responses may omit it.
    pub user: Option<User>,
    pub access_token: String,
    pub refresh_token: String,
    pub refresh_token_expires: DateTime<Utc>,
}

/// `GET /auth/profile`: the signed-in user plus their permission codes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Profile {
    #[serde(flatten)]
    pub user: User,
    #[serde(default)]
    pub permissions: Vec<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefreshRequest {
    pub refresh_token: String,
}

// =============================================================================
// Catalog
// =============================================================================

/// A product as returned by `/products`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique identifier (UUID v4).
    pub id: String,

    /// Stock Keeping Unit - business identifier.
    pub sku: String,

    /// Display name shown to cashier and on receipt.
    pub name: String,

    pub description: Option<String>,
    pub barcode: Option<String>,
    pub category_id: Option<String>,
    pub brand_id: Option<String>,
    pub manufacturer_id: Option<String>,
    pub unit: Option<String>,

    pub cost_price: Option<Money>,
    pub selling_price: Money,

    #[serde(default = "default_true")]
    pub track_inventory: bool,

    /// Whether product is active (soft delete).
    #[serde(default = "default_true")]
    pub is_active: bool,

    pub image_url: Option<String>,
    pub notes: Option<String>,

    pub category: Option<NamedRef>,
    pub brand: Option<NamedRef>,
    pub manufacturer: Option<NamedRef>,

    #[serde(default)]
    pub variants: Vec<Variant>,

    /// Aggregate stock when the product itself is tracked.
    pub inventory: Option<StockLevel>,

    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    /// Whether the product sells through variants rather than directly.
    pub fn has_variants(&self) -> bool {
        !self.variants.is_empty()
    }
}

/// A sellable variation of a product (size, colour, ...).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Variant {
    pub id: String,
    pub product_id: Option<String>,
    pub name: String,
    pub sku: String,
    pub barcode: Option<String>,
    pub cost_price: Option<Money>,
    pub selling_price: Money,
    pub image_url: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub inventory: Option<StockLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    pub parent_id: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Brand {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manufacturer {
    pub id: String,
    pub name: String,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Unit {
    pub id: String,
    pub name: String,
    pub abbreviation: Option<String>,
    pub description: Option<String>,
    #[serde(default = "default_true")]
    pub is_active: bool,
}

/// Body for `POST /products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateProduct {
    pub sku: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
    pub selling_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub track_inventory: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body for `PATCH /products/{id}`. Every field optional.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProduct {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manufacturer_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body for `POST /products/{id}/variants`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariant {
    pub name: String,
    pub sku: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
    pub selling_price: Money,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub initial_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
}

/// Body for `PATCH /products/{id}/variants/{variantId}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateVariant {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cost_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<Money>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Body shared by category, brand, manufacturer and unit create/update.
///
/// `abbreviation` is only meaningful for units; `parent_id` only for
/// categories.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogEntryInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub abbreviation: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

// =============================================================================
// Inventory
// =============================================================================

/// A stock record for one product or variant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Inventory {
    pub id: String,
    pub product_id: Option<String>,
    pub variant_id: Option<String>,
    #[serde(default)]
    pub quantity: i64,
    pub minimum_stock: Option<i64>,
    pub product: Option<NamedRef>,
    pub variant: Option<NamedRef>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Inventory {
    /// Product name, with the variant name appended when there is one.
    pub fn display_name(&self) -> String {
        let product = self
            .product
            .as_ref()
            .map(|p| p.name.as_str())
            .unwrap_or("Unknown product");
        match &self.variant {
            Some(variant) => format!("{} ({})", product, variant.name),
            None => product.to_string(),
        }
    }
}

/// How an adjustment moves stock.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AdjustType {
    /// Stock in.
    Add,
    /// Stock out.
    Remove,
    /// Absolute stock level.
    Set,
}

impl FromStr for AdjustType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ADD" => Ok(AdjustType::Add),
            "REMOVE" => Ok(AdjustType::Remove),
            "SET" => Ok(AdjustType::Set),
            _ => Err(ValidationError::NotAllowed {
                field: "type".to_string(),
                allowed: vec!["ADD".into(), "REMOVE".into(), "SET".into()],
            }),
        }
    }
}

impl fmt::Display for AdjustType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            AdjustType::Add => "ADD",
            AdjustType::Remove => "REMOVE",
            AdjustType::Set => "SET",
        })
    }
}

/// A movement in the stock ledger.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryTransaction {
    pub id: String,
    /// `ADD`, `REMOVE`, `SET` or a backend-specific type such as `SALE`.
    #[serde(rename = "type")]
    pub kind: String,
    pub quantity: i64,
    pub new_quantity: Option<i64>,
    pub reason: Option<String>,
    pub reference_type: Option<String>,
    pub reference_id: Option<String>,
    pub creator: Option<NamedRef>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /inventory/{id}/adjust`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdjustInventory {
    pub quantity: i64,
    #[serde(rename = "type")]
    pub kind: AdjustType,
    pub reason: String,
}

/// Body for `PATCH /inventory/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInventory {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_stock: Option<i64>,
}

// =============================================================================
// Customers
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CustomerType {
    WalkIn,
    Regular,
    Wholesale,
}

impl FromStr for CustomerType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "walk-in" => Ok(CustomerType::WalkIn),
            "regular" => Ok(CustomerType::Regular),
            "wholesale" => Ok(CustomerType::Wholesale),
            _ => Err(ValidationError::NotAllowed {
                field: "customerType".to_string(),
                allowed: vec!["walk-in".into(), "regular".into(), "wholesale".into()],
            }),
        }
    }
}

impl fmt::Display for CustomerType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            CustomerType::WalkIn => "walk-in",
            CustomerType::Regular => "regular",
            CustomerType::Wholesale => "wholesale",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Customer {
    pub id: String,
    pub customer_number: Option<String>,
    pub name: String,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub customer_type: Option<CustomerType>,
    #[serde(default = "default_true")]
    pub is_active: bool,
    pub notes: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

/// Body for `POST /customers` and `PATCH /customers/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerInput {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

// =============================================================================
// Orders
// =============================================================================

/// Order lifecycle as reported by the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Processing,
    Completed,
    Cancelled,
    /// A status this client does not know about yet.
    #[serde(other)]
    Unknown,
}

impl OrderStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Processing => "processing",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Unknown => "unknown",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "confirmed" => Ok(OrderStatus::Confirmed),
            "processing" => Ok(OrderStatus::Processing),
            "completed" => Ok(OrderStatus::Completed),
            "cancelled" => Ok(OrderStatus::Cancelled),
            _ => Err(ValidationError::NotAllowed {
                field: "status".to_string(),
                allowed: ["pending", "confirmed", "processing", "completed", "cancelled"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How an order was (or will be) paid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentMethod {
    Cash,
    BankTransfer,
    Online,
    Credit,
}

impl PaymentMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentMethod::Cash => "cash",
            PaymentMethod::BankTransfer => "bank_transfer",
            PaymentMethod::Online => "online",
            PaymentMethod::Credit => "credit",
        }
    }
}

impl FromStr for PaymentMethod {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "cash" => Ok(PaymentMethod::Cash),
            "bank_transfer" => Ok(PaymentMethod::BankTransfer),
            "online" => Ok(PaymentMethod::Online),
            "credit" => Ok(PaymentMethod::Credit),
            _ => Err(ValidationError::NotAllowed {
                field: "paymentMethod".to_string(),
                allowed: ["cash", "bank_transfer", "online", "credit"]
                    .iter()
                    .map(|s| s.to_string())
                    .collect(),
            }),
        }
    }
}

impl fmt::Display for PaymentMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItem {
    pub id: Option<String>,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
    pub total: Option<Money>,
    pub product: Option<NamedRef>,
    pub variant: Option<NamedRef>,
}

impl OrderItem {
    /// Line total, computed when the backend leaves it out.
    pub fn line_total(&self) -> Money {
        self.total.unwrap_or(self.unit_price * self.quantity)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: String,
    pub order_number: String,
    pub order_type: Option<String>,
    pub status: OrderStatus,
    #[serde(default)]
    pub is_paid: bool,
    pub payment_method: Option<PaymentMethod>,
    pub customer_id: Option<String>,
    pub customer: Option<NamedRef>,
    #[serde(default)]
    pub items: Vec<OrderItem>,
    /// Tax amount charged.
    pub tax: Option<Money>,
    pub discount: Option<Money>,
    pub total_amount: Money,
    pub receipt_number: Option<String>,
    pub notes: Option<String>,
    pub created_by: Option<String>,
    pub creator: Option<NamedRef>,
    pub created_at: Option<DateTime<Utc>>,
}

impl Order {
    /// Pre-tax, pre-discount amount: `total − tax + discount`.
    pub fn subtotal(&self) -> Money {
        self.total_amount - self.tax.unwrap_or_default() + self.discount.unwrap_or_default()
    }
}

/// One line of a `CreateOrder` body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrderItem {
    pub product_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    pub quantity: i64,
    pub unit_price: Money,
}

/// Body for `POST /orders`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
    pub order_type: String,
    pub items: Vec<CreateOrderItem>,
    pub discount: Money,
    /// Tax rate as a percentage.
    pub tax: TaxRate,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

/// Body for `PATCH /orders/{id}`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrder {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_method: Option<PaymentMethod>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_id: Option<String>,
}

/// Body for `PATCH /orders/{id}/mark-paid`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MarkOrderPaid {
    pub payment_method: PaymentMethod,
}

// =============================================================================
// Analytics
// =============================================================================

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DashboardStats {
    pub total_products: i64,
    pub low_stock_products: i64,
    pub total_orders: i64,
    pub pending_orders: i64,
    pub total_revenue: Money,
}

/// One bar of the revenue chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenuePoint {
    pub period: String,
    #[serde(default)]
    pub revenue: Money,
    #[serde(default)]
    pub order_count: i64,
}

/// `GET /analytics/revenue-chart` payload.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueChart {
    #[serde(default)]
    pub data: Vec<RevenuePoint>,
}

impl RevenueChart {
    pub fn total_revenue(&self) -> Money {
        self.data.iter().map(|point| point.revenue).sum()
    }

    pub fn total_orders(&self) -> i64 {
        self.data.iter().map(|point| point.order_count).sum()
    }
}

// =============================================================================
// List Query Parameters
// =============================================================================

/// Query for `GET /products`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_active: Option<bool>,
}

/// Query for `GET /orders`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

/// Query for `GET /customers`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomerQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_type: Option<CustomerType>,
}

/// Query for the inventory list, low-stock list and transaction ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Query for catalog lists (categories, brands, manufacturers, units).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub include_inactive: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

/// Query for `GET /analytics/revenue-chart`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueQuery {
    pub start_date: String,
    pub end_date: String,
}

fn default_true() -> bool {
    true
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_reads_decimal_prices() {
        let product: Product = serde_json::from_value(json!({
            "id": "p-1",
            "sku": "COKE-330",
            "name": "Coke 330ml",
            "sellingPrice": "1.50",
            "costPrice": 0.9,
            "category": { "id": "c-1", "name": "Drinks" },
            "somethingNew": true
        }))
        .unwrap();

        assert_eq!(product.selling_price.cents(), 150);
        assert_eq!(product.cost_price.unwrap().cents(), 90);
        assert!(product.is_active);
        assert!(product.track_inventory);
        assert!(!product.has_variants());
        assert_eq!(product.category.unwrap().name, "Drinks");
    }

    #[test]
    fn test_profile_flattens_user() {
        let profile: Profile = serde_json::from_value(json!({
            "id": "u-1",
            "name": "Amina",
            "email": "amina@example.com",
            "role": { "id": "r-1", "name": "Cashier", "code": "cashier" },
            "permissions": ["orders:create", "customers:create"]
        }))
        .unwrap();

        assert_eq!(profile.user.name, "Amina");
        assert_eq!(profile.permissions.len(), 2);
        assert_eq!(profile.user.role.unwrap().code, "cashier");
    }

    #[test]
    fn test_order_status_and_subtotal() {
        let order: Order = serde_json::from_value(json!({
            "id": "o-1",
            "orderNumber": "ORD-0001",
            "status": "confirmed",
            "isPaid": false,
            "paymentMethod": "bank_transfer",
            "tax": 23,
            "discount": 20,
            "totalAmount": 253
        }))
        .unwrap();

        assert_eq!(order.status, OrderStatus::Confirmed);
        assert_eq!(order.payment_method, Some(PaymentMethod::BankTransfer));
        assert_eq!(order.subtotal(), Money::from_major(250));

        let odd: Order = serde_json::from_value(json!({
            "id": "o-2",
            "orderNumber": "ORD-0002",
            "status": "on_hold",
            "totalAmount": 0
        }))
        .unwrap();
        assert_eq!(odd.status, OrderStatus::Unknown);
    }

    #[test]
    fn test_create_order_wire_shape() {
        let body = CreateOrder {
            customer_id: None,
            order_type: "pos".to_string(),
            items: vec![CreateOrderItem {
                product_id: "p-1".to_string(),
                variant_id: None,
                quantity: 2,
                unit_price: Money::from_major(100),
            }],
            discount: Money::from_major(20),
            tax: TaxRate::from_bps(1000),
            payment_method: Some(PaymentMethod::Cash),
            notes: None,
        };

        assert_eq!(
            serde_json::to_value(&body).unwrap(),
            json!({
                "orderType": "pos",
                "items": [{ "productId": "p-1", "quantity": 2, "unitPrice": 100 }],
                "discount": 20,
                "tax": 10,
                "paymentMethod": "cash"
            })
        );
    }

    #[test]
    fn test_enum_parsing() {
        assert_eq!("walk-in".parse::<CustomerType>().unwrap(), CustomerType::WalkIn);
        assert_eq!("remove".parse::<AdjustType>().unwrap(), AdjustType::Remove);
        assert!("cheque".parse::<PaymentMethod>().is_err());
        assert_eq!(
            serde_json::to_value(AdjustType::Set).unwrap(),
            json!("SET")
        );
        assert_eq!(
            serde_json::to_value(CustomerType::WalkIn).unwrap(),
            json!("walk-in")
        );
    }

    #[test]
    fn test_inventory_display_name() {
        let inventory: Inventory = serde_json::from_value(json!({
            "id": "i-1",
            "quantity": 4,
            "minimumStock": 10,
            "product": { "id": "p-1", "name": "T-Shirt" },
            "variant": { "id": "v-1", "name": "Large" }
        }))
        .unwrap();

        assert_eq!(inventory.display_name(), "T-Shirt (Large)");
    }

    #[test]
    fn test_update_bodies_skip_unset_fields() {
        let patch = UpdateProduct {
            name: Some("New name".to_string()),
            ..Default::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "name": "New name" }));
    }

    #[test]
    fn test_revenue_chart_totals() {
        let chart: RevenueChart = serde_json::from_value(json!({
            "data": [
                { "period": "2026-01", "revenue": "1200.50", "orderCount": 14 },
                { "period": "2026-02", "revenue": 99.5, "orderCount": 3 }
            ]
        }))
        .unwrap();

        assert_eq!(chart.total_revenue(), Money::from_cents(130_000));
        assert_eq!(chart.total_orders(), 17);
    }
}

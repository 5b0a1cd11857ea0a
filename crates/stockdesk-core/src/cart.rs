//! # POS Cart
//!
//! The point-of-sale terminal's working order, before it becomes a
//! `CreateOrder` request.
//!
//! ## Cart Operations Flow
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Cart Operations                                      │
//! │                                                                         │
//! │  Operator Action          Method                  State Change          │
//! │  ───────────────          ──────                  ────────────          │
//! │                                                                         │
//! │  Pick product ───────────► add_item() ──────────► merge or push line    │
//! │                                                                         │
//! │  Change quantity ────────► update_quantity() ───► set qty / remove ≤ 0  │
//! │                                                                         │
//! │  Minus button ───────────► decrement() ─────────► qty-1, remove at 0    │
//! │                                                                         │
//! │  Remove ─────────────────► remove_item() ───────► drop line             │
//! │                                                                         │
//! │  After checkout ─────────► clear() ─────────────► reset everything      │
//! │                                                                         │
//! │  Charge ─────────────────► checkout_request() ──► CreateOrder payload   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Totals
//! ```text
//! subtotal   = Σ quantity × unit_price
//! tax_amount = (subtotal − discount) × rate      (half-up to the cent)
//! total      = subtotal − discount + tax_amount
//! ```
//! Totals are always derived, never stored, so they cannot drift from the
//! lines.

use serde::{Deserialize, Serialize};

use crate::error::{CoreError, CoreResult, ValidationError};
use crate::money::{Money, TaxRate};
use crate::types::{CreateOrder, CreateOrderItem, NamedRef, PaymentMethod, Product, Variant};
use crate::validation::validate_discount;
use crate::{MAX_CART_ITEMS, MAX_ITEM_QUANTITY};

/// Order type sent for every order created from the terminal.
pub const POS_ORDER_TYPE: &str = "pos";

// =============================================================================
// Cart Line
// =============================================================================

/// What the operator picked, before it is merged into the cart.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewCartLine {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub name: String,
    pub sku: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl NewCartLine {
    /// A line for a product sold without variants.
    pub fn product(
        product_id: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        NewCartLine {
            product_id: product_id.into(),
            variant_id: None,
            name: name.into(),
            sku: sku.into(),
            unit_price,
            quantity,
        }
    }

    /// A line for one variant of a product.
    pub fn variant(
        product_id: impl Into<String>,
        variant_id: impl Into<String>,
        name: impl Into<String>,
        sku: impl Into<String>,
        unit_price: Money,
        quantity: i64,
    ) -> Self {
        NewCartLine {
            variant_id: Some(variant_id.into()),
            ..NewCartLine::product(product_id, name, sku, unit_price, quantity)
        }
    }

    /// Freezes name, SKU and selling price from a fetched product.
    pub fn from_product(product: &Product, quantity: i64) -> Self {
        NewCartLine::product(
            &product.id,
            &product.name,
            &product.sku,
            product.selling_price,
            quantity,
        )
    }

    /// Freezes a variant; the line name reads `Product - Variant`.
    pub fn from_variant(product: &Product, variant: &Variant, quantity: i64) -> Self {
        NewCartLine::variant(
            &product.id,
            &variant.id,
            format!("{} - {}", product.name, variant.name),
            &variant.sku,
            variant.selling_price,
            quantity,
        )
    }

    /// Cart key: `productId`, or `productId-variantId`.
    pub fn key(&self) -> String {
        line_key(&self.product_id, self.variant_id.as_deref())
    }
}

fn line_key(product_id: &str, variant_id: Option<&str>) -> String {
    match variant_id {
        Some(variant_id) => format!("{}-{}", product_id, variant_id),
        None => product_id.to_string(),
    }
}

/// A line in the cart.
///
/// ## Price Freezing
/// `unit_price` is captured when the line is added; later catalog changes
/// do not reprice the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartLine {
    /// `productId` or `productId-variantId`.
    pub id: String,
    pub product_id: String,
    pub variant_id: Option<String>,
    pub name: String,
    pub sku: String,
    pub unit_price: Money,
    pub quantity: i64,
}

impl CartLine {
    /// Unit price × quantity.
    pub fn line_total(&self) -> Money {
        self.unit_price * self.quantity
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The point-of-sale cart.
///
/// ## Invariants
/// - Lines are unique by key (adding the same product+variant sums quantity)
/// - Every line has quantity ≥ 1 (dropping to 0 removes the line)
/// - At most [`MAX_CART_ITEMS`] lines and [`MAX_ITEM_QUANTITY`] units per line
/// - Discount is never negative
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PosCart {
    items: Vec<CartLine>,
    customer: Option<NamedRef>,
    discount: Money,
    tax: TaxRate,
    notes: String,
    payment_method: Option<PaymentMethod>,
}

impl PosCart {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a line, or increases the quantity of the matching line.
    pub fn add_item(&mut self, line: NewCartLine) -> CoreResult<()> {
        if line.quantity <= 0 {
            return Err(ValidationError::MustBePositive {
                field: "quantity".to_string(),
            }
            .into());
        }

        let key = line.key();
        if let Some(existing) = self.items.iter_mut().find(|i| i.id == key) {
            let new_qty = existing.quantity + line.quantity;
            if new_qty > MAX_ITEM_QUANTITY {
                return Err(CoreError::QuantityTooLarge {
                    requested: new_qty,
                    max: MAX_ITEM_QUANTITY,
                });
            }
            existing.quantity = new_qty;
            return Ok(());
        }

        if self.items.len() >= MAX_CART_ITEMS {
            return Err(CoreError::CartTooLarge {
                max: MAX_CART_ITEMS,
            });
        }
        if line.quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: line.quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        self.items.push(CartLine {
            id: key,
            product_id: line.product_id,
            variant_id: line.variant_id,
            name: line.name,
            sku: line.sku,
            unit_price: line.unit_price,
            quantity: line.quantity,
        });
        Ok(())
    }

    /// Sets a line's quantity. Zero or less removes the line.
    pub fn update_quantity(&mut self, id: &str, quantity: i64) -> CoreResult<()> {
        if quantity <= 0 {
            return self.remove_item(id);
        }
        if quantity > MAX_ITEM_QUANTITY {
            return Err(CoreError::QuantityTooLarge {
                requested: quantity,
                max: MAX_ITEM_QUANTITY,
            });
        }

        let line = self.line_mut(id)?;
        line.quantity = quantity;
        Ok(())
    }

    /// One more unit of a line.
    pub fn increment(&mut self, id: &str) -> CoreResult<()> {
        let quantity = self.line_mut(id)?.quantity + 1;
        self.update_quantity(id, quantity)
    }

    /// One less unit of a line; the last unit removes it.
    pub fn decrement(&mut self, id: &str) -> CoreResult<()> {
        let quantity = self.line_mut(id)?.quantity - 1;
        self.update_quantity(id, quantity)
    }

    pub fn remove_item(&mut self, id: &str) -> CoreResult<()> {
        let before = self.items.len();
        self.items.retain(|i| i.id != id);
        if self.items.len() == before {
            Err(CoreError::LineNotFound(id.to_string()))
        } else {
            Ok(())
        }
    }

    /// Resets lines, customer, discount, tax, notes and payment method.
    pub fn clear(&mut self) {
        *self = PosCart::default();
    }

    fn line_mut(&mut self, id: &str) -> CoreResult<&mut CartLine> {
        self.items
            .iter_mut()
            .find(|i| i.id == id)
            .ok_or_else(|| CoreError::LineNotFound(id.to_string()))
    }

    // =========================================================================
    // Setters
    // =========================================================================

    pub fn set_customer(&mut self, customer: Option<NamedRef>) {
        self.customer = customer;
    }

    /// Sets the order-level discount. Must not be negative.
    pub fn set_discount(&mut self, discount: Money) -> CoreResult<()> {
        validate_discount(discount)?;
        self.discount = discount;
        Ok(())
    }

    pub fn set_tax(&mut self, rate: TaxRate) {
        self.tax = rate;
    }

    pub fn set_notes(&mut self, notes: impl Into<String>) {
        self.notes = notes.into();
    }

    pub fn set_payment_method(&mut self, method: Option<PaymentMethod>) {
        self.payment_method = method;
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn items(&self) -> &[CartLine] {
        &self.items
    }

    pub fn customer(&self) -> Option<&NamedRef> {
        self.customer.as_ref()
    }

    pub fn discount(&self) -> Money {
        self.discount
    }

    pub fn tax_rate(&self) -> TaxRate {
        self.tax
    }

    pub fn notes(&self) -> &str {
        &self.notes
    }

    pub fn payment_method(&self) -> Option<PaymentMethod> {
        self.payment_method
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Number of distinct lines.
    pub fn item_count(&self) -> usize {
        self.items.len()
    }

    /// Units across all lines.
    pub fn total_quantity(&self) -> i64 {
        self.items.iter().map(|i| i.quantity).sum()
    }

    // =========================================================================
    // Derived Totals
    // =========================================================================

    pub fn subtotal(&self) -> Money {
        self.items.iter().map(CartLine::line_total).sum()
    }

    /// Tax on the discounted subtotal.
    pub fn tax_amount(&self) -> Money {
        (self.subtotal() - self.discount).calculate_tax(self.tax)
    }

    pub fn total(&self) -> Money {
        self.subtotal() - self.discount + self.tax_amount()
    }

    pub fn summary(&self) -> CartSummary {
        CartSummary::from(self)
    }

    /// Builds the order body for `POST /orders`.
    ///
    /// ## Errors
    /// - [`CoreError::EmptyCart`] when there are no lines
    /// - [`CoreError::InvalidDiscount`] when the discount exceeds the subtotal
    pub fn checkout_request(&self) -> CoreResult<CreateOrder> {
        if self.items.is_empty() {
            return Err(CoreError::EmptyCart);
        }
        let subtotal = self.subtotal();
        if self.discount > subtotal {
            return Err(CoreError::InvalidDiscount {
                reason: format!("discount {} exceeds subtotal {}", self.discount, subtotal),
            });
        }

        let notes = self.notes.trim();
        Ok(CreateOrder {
            customer_id: self.customer.as_ref().map(|c| c.id.clone()),
            order_type: POS_ORDER_TYPE.to_string(),
            items: self
                .items
                .iter()
                .map(|line| CreateOrderItem {
                    product_id: line.product_id.clone(),
                    variant_id: line.variant_id.clone(),
                    quantity: line.quantity,
                    unit_price: line.unit_price,
                })
                .collect(),
            discount: self.discount,
            tax: self.tax,
            payment_method: self.payment_method,
            notes: (!notes.is_empty()).then(|| notes.to_string()),
        })
    }
}

// =============================================================================
// Summary
// =============================================================================

/// Cart figures for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CartSummary {
    pub item_count: usize,
    pub total_quantity: i64,
    pub subtotal: Money,
    pub discount: Money,
    pub tax_rate: TaxRate,
    pub tax_amount: Money,
    pub total: Money,
}

impl From<&PosCart> for CartSummary {
    fn from(cart: &PosCart) -> Self {
        CartSummary {
            item_count: cart.item_count(),
            total_quantity: cart.total_quantity(),
            subtotal: cart.subtotal(),
            discount: cart.discount(),
            tax_rate: cart.tax_rate(),
            tax_amount: cart.tax_amount(),
            total: cart.total(),
        }
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    fn widget(id: &str, major: i64, qty: i64) -> NewCartLine {
        NewCartLine::product(id, format!("Product {}", id), format!("SKU-{}", id), Money::from_major(major), qty)
    }

    #[test]
    fn test_worked_example_totals() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 100, 2)).unwrap();
        cart.add_item(widget("B", 50, 1)).unwrap();
        cart.set_discount(Money::from_major(20)).unwrap();
        cart.set_tax(TaxRate::from_bps(1000));

        assert_eq!(cart.subtotal(), Money::from_major(250));
        assert_eq!(cart.tax_amount(), Money::from_major(23));
        assert_eq!(cart.total(), Money::from_major(253));
    }

    #[test]
    fn test_total_equals_subtotal_without_discount_or_tax() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 13, 3)).unwrap();
        assert_eq!(cart.total(), cart.subtotal());
        assert!(cart.tax_amount().is_zero());
    }

    #[test]
    fn test_same_variant_merges_into_one_line() {
        let mut cart = PosCart::new();
        let line = NewCartLine::variant("p-1", "v-1", "Shirt - L", "SH-L", Money::from_major(10), 2);
        cart.add_item(line.clone()).unwrap();
        cart.add_item(NewCartLine { quantity: 3, ..line }).unwrap();

        assert_eq!(cart.item_count(), 1);
        assert_eq!(cart.items()[0].id, "p-1-v-1");
        assert_eq!(cart.items()[0].quantity, 5);

        // Same product, other variant: separate line
        cart.add_item(NewCartLine::variant("p-1", "v-2", "Shirt - M", "SH-M", Money::from_major(10), 1))
            .unwrap();
        assert_eq!(cart.item_count(), 2);
    }

    #[test]
    fn test_decrement_last_unit_removes_line() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 5, 2)).unwrap();

        cart.decrement("A").unwrap();
        assert_eq!(cart.items()[0].quantity, 1);

        cart.decrement("A").unwrap();
        assert!(cart.is_empty());
        assert!(matches!(cart.decrement("A"), Err(CoreError::LineNotFound(_))));
    }

    #[test]
    fn test_update_quantity_zero_or_negative_removes() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 5, 2)).unwrap();
        cart.add_item(widget("B", 5, 2)).unwrap();

        cart.update_quantity("A", 0).unwrap();
        cart.update_quantity("B", -4).unwrap();
        assert!(cart.is_empty());
    }

    #[test]
    fn test_quantity_and_line_limits() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 1, MAX_ITEM_QUANTITY)).unwrap();
        assert!(matches!(
            cart.add_item(widget("A", 1, 1)),
            Err(CoreError::QuantityTooLarge { .. })
        ));
        assert!(cart.update_quantity("A", MAX_ITEM_QUANTITY + 1).is_err());
        assert!(matches!(
            cart.add_item(widget("Z", 1, 0)),
            Err(CoreError::Validation(_))
        ));

        let mut full = PosCart::new();
        for i in 0..MAX_CART_ITEMS {
            full.add_item(widget(&i.to_string(), 1, 1)).unwrap();
        }
        assert!(matches!(
            full.add_item(widget("extra", 1, 1)),
            Err(CoreError::CartTooLarge { .. })
        ));
    }

    #[test]
    fn test_clear_resets_everything() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 5, 2)).unwrap();
        cart.set_customer(Some(NamedRef {
            id: "c-1".to_string(),
            name: "Walk-in".to_string(),
        }));
        cart.set_discount(Money::from_major(1)).unwrap();
        cart.set_tax(TaxRate::from_bps(500));
        cart.set_notes("gift wrap");
        cart.set_payment_method(Some(PaymentMethod::Cash));

        cart.clear();
        assert_eq!(cart, PosCart::new());
    }

    #[test]
    fn test_full_cart_at_price_ceiling() {
        let mut cart = PosCart::new();
        for i in 0..MAX_CART_ITEMS {
            cart.add_item(NewCartLine::product(
                format!("p-{}", i),
                "Bulk",
                format!("B-{}", i),
                Money::from_cents(crate::money::MAX_AMOUNT_CENTS),
                MAX_ITEM_QUANTITY,
            ))
            .unwrap();
        }
        let expected = crate::money::MAX_AMOUNT_CENTS * MAX_ITEM_QUANTITY * MAX_CART_ITEMS as i64;
        assert_eq!(cart.subtotal().cents(), expected);
        cart.set_tax(TaxRate::from_bps(10000));
        assert_eq!(cart.total().cents(), expected * 2);
    }

    #[test]
    fn test_negative_discount_rejected() {
        let mut cart = PosCart::new();
        assert!(matches!(
            cart.set_discount(Money::from_cents(-1)),
            Err(CoreError::Validation(ValidationError::Negative { .. }))
        ));
        assert!(cart.discount().is_zero());
    }

    #[test]
    fn test_checkout_request() {
        let mut cart = PosCart::new();
        assert!(matches!(cart.checkout_request(), Err(CoreError::EmptyCart)));

        cart.add_item(widget("A", 100, 2)).unwrap();
        cart.add_item(NewCartLine::variant("B", "v", "B - v", "B-V", Money::from_major(50), 1))
            .unwrap();
        cart.set_tax(TaxRate::from_bps(1000));
        cart.set_payment_method(Some(PaymentMethod::Online));
        cart.set_notes("  ");

        let order = cart.checkout_request().unwrap();
        assert_eq!(order.order_type, "pos");
        assert_eq!(order.items.len(), 2);
        assert_eq!(order.items[1].variant_id.as_deref(), Some("v"));
        assert_eq!(order.tax, TaxRate::from_bps(1000));
        assert_eq!(order.payment_method, Some(PaymentMethod::Online));
        assert_eq!(order.notes, None);
        assert_eq!(order.customer_id, None);

        cart.set_discount(Money::from_major(251)).unwrap();
        assert!(matches!(
            cart.checkout_request(),
            Err(CoreError::InvalidDiscount { .. })
        ));
    }

    #[test]
    fn test_cart_survives_json_round_trip() {
        let mut cart = PosCart::new();
        cart.add_item(widget("A", 3, 4)).unwrap();
        cart.set_tax(TaxRate::from_bps(825));

        let text = serde_json::to_string(&cart).unwrap();
        let restored: PosCart = serde_json::from_str(&text).unwrap();
        assert_eq!(restored, cart);
        assert_eq!(restored.summary().total, cart.total());
    }
}

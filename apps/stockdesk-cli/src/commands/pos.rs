//! # POS Terminal
//!
//! The cart is kept in `cart.json` between invocations; only `search`,
//! `add`, `customer` and `checkout` talk to the backend.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  pos search cola          find products                                │
//! │  pos add p-1 --qty 2      freeze name/SKU/price into a cart line       │
//! │  pos qty p-1 5            set / inc / dec / remove lines               │
//! │  pos discount 20          order discount (amount)                      │
//! │  pos tax 10               tax percent on (subtotal - discount)         │
//! │  pos customer c-1         attach a customer                            │
//! │  pos payment cash         payment method                               │
//! │  pos checkout ──────────► POST /orders { orderType: "pos", ... }       │
//! │                           then the cart is cleared                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use anyhow::{bail, Context as _};
use clap::Subcommand;
use stockdesk_core::{
    Money, NamedRef, NewCartLine, PaymentMethod, PosCart, Product, ProductQuery, TaxRate,
};
use tracing::info;

use super::{money_arg, percent_arg, Context};
use crate::cart_store::CartStore;
use crate::output::{render_fields, render_table};

const POS_PAGE: &str = "/dashboard/pos";

#[derive(Subcommand)]
pub enum PosCommand {
    /// Show the cart and its totals
    Show,

    /// Find active products to sell
    Search { query: String },

    /// Add a product (or one of its variants) to the cart
    Add {
        product: String,
        /// Variant id, required for products sold in variants
        #[arg(long)]
        variant: Option<String>,
        #[arg(long, default_value_t = 1)]
        qty: i64,
    },

    /// Set a line's quantity; 0 removes it
    Qty { line: String, quantity: i64 },

    /// One more unit of a line
    Inc { line: String },

    /// One less unit of a line
    Dec { line: String },

    /// Remove a line
    Remove { line: String },

    /// Order discount as an amount
    Discount {
        #[arg(value_parser = money_arg)]
        amount: Money,
    },

    /// Tax percent applied after the discount
    Tax {
        #[arg(value_parser = percent_arg)]
        percent: TaxRate,
    },

    /// Attach a customer, or detach with no id
    Customer { id: Option<String> },

    /// cash, bank_transfer, online or credit; omit to unset
    Payment { method: Option<PaymentMethod> },

    /// Order notes
    Notes { text: String },

    /// Empty the cart
    Clear,

    /// Create the order and empty the cart
    Checkout,
}

pub async fn run(ctx: &Context, command: PosCommand) -> anyhow::Result<()> {
    ctx.open_page(POS_PAGE).await?;
    let store = CartStore::default_location()?;
    let mut cart = store.load()?;

    match command {
        PosCommand::Show => return show(ctx, &cart),

        PosCommand::Search { query } => {
            let query = ProductQuery {
                search: Some(query),
                is_active: Some(true),
                ..ProductQuery::default()
            };
            let page = ctx.client.products().list(&query).await?;
            return ctx.out.page(
                &page,
                &["ID", "SKU", "Name", "Price", "Variants"],
                |product: &Product| {
                    vec![
                        product.id.clone(),
                        product.sku.clone(),
                        product.name.clone(),
                        product.selling_price.to_string(),
                        product.variants.len().to_string(),
                    ]
                },
            );
        }

        PosCommand::Add {
            product,
            variant,
            qty,
        } => {
            let product = ctx.client.products().get(&product).await?;
            let line = pick_line(&product, variant.as_deref(), qty)?;
            info!(line = %line.key(), qty, "Adding to cart");
            cart.add_item(line)?;
        }

        PosCommand::Qty { line, quantity } => cart.update_quantity(&line, quantity)?,
        PosCommand::Inc { line } => cart.increment(&line)?,
        PosCommand::Dec { line } => cart.decrement(&line)?,
        PosCommand::Remove { line } => cart.remove_item(&line)?,
        PosCommand::Discount { amount } => cart.set_discount(amount)?,
        PosCommand::Tax { percent } => cart.set_tax(percent),

        PosCommand::Customer { id } => {
            let customer = match id {
                Some(id) => {
                    let customer = ctx.client.customers().get(&id).await?;
                    Some(NamedRef {
                        id: customer.id,
                        name: customer.name,
                    })
                }
                None => None,
            };
            cart.set_customer(customer);
        }

        PosCommand::Payment { method } => cart.set_payment_method(method),
        PosCommand::Notes { text } => cart.set_notes(text),
        PosCommand::Clear => cart.clear(),

        PosCommand::Checkout => {
            let request = cart.checkout_request()?;
            let order = ctx
                .client
                .orders()
                .create(&request)
                .await
                .context("Checkout failed; the cart was kept")?;
            info!(order = %order.order_number, "Checkout complete");

            cart.clear();
            store.save(&cart)?;
            return ctx.out.done(
                &order,
                &format!(
                    "Order {} created. Total {} ({})",
                    order.order_number, order.total_amount, order.status
                ),
            );
        }
    }

    store.save(&cart)?;
    show(ctx, &cart)
}

/// The line to add for `product`, honouring its variants.
fn pick_line(product: &Product, variant_id: Option<&str>, qty: i64) -> anyhow::Result<NewCartLine> {
    if !product.is_active {
        bail!("{} is inactive and cannot be sold", product.name);
    }
    match variant_id {
        Some(variant_id) => {
            let variant = product
                .variants
                .iter()
                .find(|v| v.id == variant_id)
                .with_context(|| format!("{} has no variant {}", product.name, variant_id))?;
            if !variant.is_active {
                bail!("Variant {} is inactive and cannot be sold", variant.name);
            }
            Ok(NewCartLine::from_variant(product, variant, qty))
        }
        None if product.has_variants() => {
            let choices: Vec<String> = product
                .variants
                .iter()
                .filter(|v| v.is_active)
                .map(|v| format!("{} ({})", v.id, v.name))
                .collect();
            bail!(
                "{} is sold in variants; pick one with --variant: {}",
                product.name,
                choices.join(", ")
            )
        }
        None => Ok(NewCartLine::from_product(product, qty)),
    }
}

fn show(ctx: &Context, cart: &PosCart) -> anyhow::Result<()> {
    if ctx.out.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "cart": cart,
                "summary": cart.summary(),
            }))?
        );
        return Ok(());
    }
    println!("{}", render_cart(cart));
    Ok(())
}

fn render_cart(cart: &PosCart) -> String {
    if cart.is_empty() {
        return "Cart is empty".to_string();
    }
    let lines = render_table(
        &["Line", "Item", "SKU", "Qty", "Unit price", "Total"],
        cart.items()
            .iter()
            .map(|line| {
                vec![
                    line.id.clone(),
                    line.name.clone(),
                    line.sku.clone(),
                    line.quantity.to_string(),
                    line.unit_price.to_string(),
                    line.line_total().to_string(),
                ]
            })
            .collect(),
    );

    let summary = cart.summary();
    let mut fields = vec![
        ("Items", format!("{} ({} units)", summary.item_count, summary.total_quantity)),
        ("Subtotal", summary.subtotal.to_string()),
        ("Discount", summary.discount.to_string()),
        ("Tax", format!("{} ({})", summary.tax_amount, summary.tax_rate)),
        ("Total", summary.total.to_string()),
    ];
    if let Some(customer) = cart.customer() {
        fields.push(("Customer", customer.name.clone()));
    }
    if let Some(method) = cart.payment_method() {
        fields.push(("Payment", method.to_string()));
    }
    if !cart.notes().is_empty() {
        fields.push(("Notes", cart.notes().to_string()));
    }
    format!("{}\n{}", lines, render_fields(fields))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(variants: serde_json::Value) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "sku": "TEE",
            "name": "T-Shirt",
            "sellingPrice": 15,
            "variants": variants
        }))
        .unwrap()
    }

    #[test]
    fn test_plain_product_line() {
        let line = pick_line(&product(serde_json::json!([])), None, 2).unwrap();
        assert_eq!(line.key(), "p-1");
        assert_eq!(line.unit_price, Money::from_major(15));
    }

    #[test]
    fn test_variant_required_when_product_has_variants() {
        let product = product(serde_json::json!([
            { "id": "v-1", "name": "Large", "sku": "TEE-L", "sellingPrice": 17 }
        ]));
        let err = pick_line(&product, None, 1).unwrap_err();
        assert!(err.to_string().contains("v-1 (Large)"));

        let line = pick_line(&product, Some("v-1"), 1).unwrap();
        assert_eq!(line.key(), "p-1-v-1");
        assert_eq!(line.name, "T-Shirt - Large");
        assert_eq!(line.unit_price, Money::from_major(17));

        assert!(pick_line(&product, Some("v-9"), 1).is_err());
    }

    #[test]
    fn test_render_cart_totals() {
        let mut cart = PosCart::new();
        cart.add_item(NewCartLine::product("p-1", "Widget", "W-1", Money::from_major(100), 2))
            .unwrap();
        cart.set_discount(Money::from_major(20)).unwrap();
        cart.set_tax(TaxRate::from_bps(1000));

        let rendered = render_cart(&cart);
        assert!(rendered.contains("Widget"));
        assert!(rendered.contains("200.00"));
        assert!(rendered.contains("198.00"));
        assert_eq!(render_cart(&PosCart::new()), "Cart is empty");
    }
}

//! Orders and their lifecycle transitions.

use anyhow::bail;
use clap::Subcommand;
use stockdesk_core::orders::OrderAction;
use stockdesk_core::{Order, OrderItem, OrderQuery, OrderStatus, PaymentMethod, UpdateOrder};

use super::Context;
use crate::output::{date, or_dash, render_table, yes_no};

const ORDERS_PAGE: &str = "/dashboard/orders";

#[derive(Subcommand)]
pub enum OrdersCommand {
    /// List orders
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Match order number or customer
        #[arg(long)]
        search: Option<String>,
        /// pending, confirmed, processing, completed or cancelled
        #[arg(long)]
        status: Option<OrderStatus>,
    },

    /// Show an order, its lines and the actions it allows
    Show { id: String },

    /// Record payment
    MarkPaid {
        id: String,
        /// cash, bank_transfer, online or credit
        #[arg(long, default_value = "cash")]
        method: PaymentMethod,
    },

    /// Confirm a pending order
    Confirm { id: String },

    /// Complete a confirmed order
    Complete { id: String },

    /// Cancel an open order
    Cancel { id: String },

    /// Change notes, payment method or customer
    Update {
        id: String,
        #[arg(long)]
        notes: Option<String>,
        #[arg(long)]
        method: Option<PaymentMethod>,
        #[arg(long)]
        customer: Option<String>,
    },
}

pub async fn run(ctx: &Context, command: OrdersCommand) -> anyhow::Result<()> {
    ctx.open_page(ORDERS_PAGE).await?;
    let api = ctx.client.orders();

    match command {
        OrdersCommand::List {
            page,
            limit,
            search,
            status,
        } => {
            let query = OrderQuery {
                page,
                limit,
                search,
                status,
            };
            let orders = api.list(&query).await?;
            ctx.out.page(
                &orders,
                &["ID", "Number", "Customer", "Status", "Paid", "Total", "Created"],
                order_row,
            )
        }

        OrdersCommand::Show { id } => {
            let order = api.get(&id).await?;
            ctx.out.record(&order, order_fields(&order))?;
            if !ctx.out.is_json() {
                println!("{}", render_lines(&order.items));
            }
            Ok(())
        }

        OrdersCommand::MarkPaid { id, method } => {
            ensure_allowed(&api.get(&id).await?, OrderAction::MarkPaid)?;
            let order = api.mark_paid(&id, method).await?;
            ctx.out.done(
                &order,
                &format!("Order {} marked paid ({})", order.order_number, method),
            )
        }

        OrdersCommand::Confirm { id } => {
            ensure_allowed(&api.get(&id).await?, OrderAction::Confirm)?;
            let order = api.confirm(&id).await?;
            ctx.out.done(&order, &transition_message(&order))
        }

        OrdersCommand::Complete { id } => {
            ensure_allowed(&api.get(&id).await?, OrderAction::Complete)?;
            let order = api.complete(&id).await?;
            ctx.out.done(&order, &transition_message(&order))
        }

        OrdersCommand::Cancel { id } => {
            ensure_allowed(&api.get(&id).await?, OrderAction::Cancel)?;
            let order = api.cancel(&id).await?;
            ctx.out.done(&order, &transition_message(&order))
        }

        OrdersCommand::Update {
            id,
            notes,
            method,
            customer,
        } => {
            let changes = UpdateOrder {
                notes,
                payment_method: method,
                customer_id: customer,
            };
            let order = api.update(&id, &changes).await?;
            ctx.out.done(&order, &format!("Updated order {}", order.order_number))
        }
    }
}

/// Refuses actions the order's current state does not offer.
fn ensure_allowed(order: &Order, action: OrderAction) -> anyhow::Result<()> {
    if order.allows(action.clone()) {
        return Ok(());
    }
    let available: Vec<String> = order
        .available_actions()
        .iter()
        .map(ToString::to_string)
        .collect();
    bail!(
        "Order {} is {}{}; cannot {}. Available: {}",
        order.order_number,
        order.status,
        if order.is_paid { " and paid" } else { "" },
        action,
        if available.is_empty() {
            "none".to_string()
        } else {
            available.join(", ")
        }
    )
}

fn transition_message(order: &Order) -> String {
    format!("Order {} is now {}", order.order_number, order.status)
}

fn order_row(order: &Order) -> Vec<String> {
    vec![
        order.id.clone(),
        order.order_number.clone(),
        or_dash(order.customer.as_ref().map(|c| c.name.as_str())),
        order.status.to_string(),
        yes_no(order.is_paid),
        order.total_amount.to_string(),
        date(order.created_at.as_ref()),
    ]
}

fn order_fields(order: &Order) -> Vec<(&'static str, String)> {
    let actions: Vec<String> = order
        .available_actions()
        .iter()
        .map(ToString::to_string)
        .collect();
    vec![
        ("Number", order.order_number.clone()),
        ("Type", or_dash(order.order_type.as_deref())),
        ("Status", order.status.to_string()),
        ("Paid", yes_no(order.is_paid)),
        ("Payment method", or_dash(order.payment_method)),
        ("Customer", or_dash(order.customer.as_ref().map(|c| c.name.as_str()))),
        ("Subtotal", order.subtotal().to_string()),
        ("Discount", or_dash(order.discount)),
        ("Tax", or_dash(order.tax)),
        ("Total", order.total_amount.to_string()),
        ("Receipt", or_dash(order.receipt_number.as_deref())),
        ("Notes", or_dash(order.notes.as_deref())),
        ("Created by", or_dash(order.creator.as_ref().map(|c| c.name.as_str()))),
        ("Created", date(order.created_at.as_ref())),
        ("Actions", if actions.is_empty() { "-".to_string() } else { actions.join(", ") }),
    ]
}

fn render_lines(items: &[OrderItem]) -> String {
    let rows = items
        .iter()
        .map(|item| {
            let name = match (&item.product, &item.variant) {
                (Some(product), Some(variant)) => format!("{} - {}", product.name, variant.name),
                (Some(product), None) => product.name.clone(),
                _ => item.product_id.clone(),
            };
            vec![
                name,
                item.quantity.to_string(),
                item.unit_price.to_string(),
                item.line_total().to_string(),
            ]
        })
        .collect();
    render_table(&["Item", "Qty", "Unit price", "Total"], rows)
}

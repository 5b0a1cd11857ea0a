//! Stock levels, adjustments and the movement ledger.

use clap::Subcommand;
use stockdesk_core::inventory::{adjustment_request, low_stock_urgency, preview_adjustment, stock_status};
use stockdesk_core::validation::validate_stock_level;
use stockdesk_core::{AdjustType, Inventory, InventoryTransaction, PageQuery, UpdateInventory};

use super::Context;
use crate::output::{date, or_dash};

const INVENTORY_PAGE: &str = "/dashboard/inventory";

const HEADERS: [&str; 5] = ["ID", "Item", "Quantity", "Minimum", "Status"];

#[derive(Subcommand)]
pub enum InventoryCommand {
    /// List stock records
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        #[arg(long)]
        search: Option<String>,
    },

    /// Records at or below their minimum, with urgency
    LowStock {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },

    /// Show one stock record
    Show { id: String },

    /// Stock records of a product
    Product { product_id: String },

    /// Stock record of a variant
    Variant { variant_id: String },

    /// Add, remove or set stock
    Adjust {
        id: String,
        /// ADD, REMOVE or SET
        #[arg(long = "type")]
        kind: AdjustType,
        #[arg(long)]
        quantity: i64,
        /// Why the stock changed (at least 3 characters)
        #[arg(long)]
        reason: String,
    },

    /// Set the minimum stock level
    Minimum { id: String, value: i64 },

    /// Movements of a stock record
    History {
        id: String,
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

pub async fn run(ctx: &Context, command: InventoryCommand) -> anyhow::Result<()> {
    ctx.open_page(INVENTORY_PAGE).await?;
    let api = ctx.client.inventory();

    match command {
        InventoryCommand::List {
            page,
            limit,
            search,
        } => {
            let query = PageQuery {
                page,
                limit,
                search,
            };
            let records = api.list(&query).await?;
            ctx.out.page(&records, &HEADERS, inventory_row)
        }

        InventoryCommand::LowStock { page, limit } => {
            let query = PageQuery {
                page,
                limit,
                search: None,
            };
            let records = api.low_stock(&query).await?;
            ctx.out.page(
                &records,
                &["ID", "Item", "Quantity", "Minimum", "Urgency"],
                |record: &Inventory| {
                    vec![
                        record.id.clone(),
                        record.display_name(),
                        record.quantity.to_string(),
                        or_dash(record.minimum_stock),
                        or_dash(low_stock_urgency(record.quantity, record.minimum_stock)),
                    ]
                },
            )
        }

        InventoryCommand::Show { id } => {
            let record = api.get(&id).await?;
            ctx.out.record(&record, inventory_fields(&record))
        }

        InventoryCommand::Product { product_id } => {
            let records = api.for_product(&product_id).await?;
            ctx.out.list(&records, &HEADERS, inventory_row)
        }

        InventoryCommand::Variant { variant_id } => {
            let record = api.for_variant(&variant_id).await?;
            ctx.out.record(&record, inventory_fields(&record))
        }

        InventoryCommand::Adjust {
            id,
            kind,
            quantity,
            reason,
        } => {
            let request = adjustment_request(kind, quantity, &reason)?;
            let current = api.get(&id).await?;
            let expected = preview_adjustment(current.quantity, kind, quantity);
            ctx.out.message(&format!(
                "{}: {} {} -> {}",
                current.display_name(),
                kind,
                current.quantity,
                expected
            ));

            let updated = api.adjust(&id, &request).await?;
            ctx.out.done(
                &updated,
                &format!("Stock of {} is now {}", updated.display_name(), updated.quantity),
            )
        }

        InventoryCommand::Minimum { id, value } => {
            validate_stock_level("minimumStock", value)?;
            let changes = UpdateInventory {
                minimum_stock: Some(value),
            };
            let updated = api.update(&id, &changes).await?;
            ctx.out.done(
                &updated,
                &format!("Minimum stock of {} set to {}", updated.display_name(), value),
            )
        }

        InventoryCommand::History { id, page, limit } => {
            let query = PageQuery {
                page,
                limit,
                search: None,
            };
            let movements = api.transactions(&id, &query).await?;
            ctx.out.page(
                &movements,
                &["When", "Type", "Quantity", "New level", "Reason", "By"],
                transaction_row,
            )
        }
    }
}

fn inventory_row(record: &Inventory) -> Vec<String> {
    vec![
        record.id.clone(),
        record.display_name(),
        record.quantity.to_string(),
        or_dash(record.minimum_stock),
        stock_status(record.quantity, record.minimum_stock).to_string(),
    ]
}

fn inventory_fields(record: &Inventory) -> Vec<(&'static str, String)> {
    vec![
        ("ID", record.id.clone()),
        ("Item", record.display_name()),
        ("Quantity", record.quantity.to_string()),
        ("Minimum stock", or_dash(record.minimum_stock)),
        ("Status", stock_status(record.quantity, record.minimum_stock).to_string()),
        (
            "Urgency",
            or_dash(low_stock_urgency(record.quantity, record.minimum_stock)),
        ),
        ("Updated", date(record.updated_at.as_ref())),
    ]
}

fn transaction_row(movement: &InventoryTransaction) -> Vec<String> {
    vec![
        date(movement.created_at.as_ref()),
        movement.kind.clone(),
        movement.quantity.to_string(),
        or_dash(movement.new_quantity),
        or_dash(movement.reason.as_deref()),
        or_dash(movement.creator.as_ref().map(|c| c.name.as_str())),
    ]
}

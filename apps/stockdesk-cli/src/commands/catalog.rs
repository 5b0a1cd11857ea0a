//! Products, variants and the four taxonomy lists.

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use clap::Subcommand;
use serde::de::DeserializeOwned;
use serde::Serialize;
use stockdesk_client::api::{CatalogApi, ImportReport};
use stockdesk_client::MultipartFile;
use stockdesk_core::inventory::stock_status;
use stockdesk_core::validation::{
    validate_name, validate_price, validate_product_name, validate_sku, validate_stock_level,
};
use stockdesk_core::{
    validation, Brand, CatalogEntryInput, CatalogQuery, Category, CreateProduct, CreateVariant,
    FieldErrors, Manufacturer, Money, Product, ProductQuery, StockLevel, Unit, UpdateProduct,
    UpdateVariant, Variant,
};

use super::{money_arg, Context};
use crate::output::{date, or_dash, yes_no};

const PRODUCTS_PAGE: &str = "/dashboard/products";

// =============================================================================
// Products
// =============================================================================

#[derive(Subcommand)]
pub enum ProductsCommand {
    /// List products
    List {
        #[arg(long)]
        page: Option<u32>,
        #[arg(long)]
        limit: Option<u32>,
        /// Match name, SKU or barcode
        #[arg(long)]
        search: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        /// Only active (true) or inactive (false) products
        #[arg(long)]
        active: Option<bool>,
    },

    /// Show one product with its variants
    Show { id: String },

    /// Create a product
    Create {
        #[arg(long)]
        sku: String,
        #[arg(long)]
        name: String,
        /// Selling price
        #[arg(long, value_parser = money_arg)]
        price: Money,
        /// Cost price
        #[arg(long, value_parser = money_arg)]
        cost: Option<Money>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        manufacturer: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        barcode: Option<String>,
        #[arg(long)]
        initial_stock: Option<i64>,
        #[arg(long)]
        minimum_stock: Option<i64>,
        /// Do not track stock for this product
        #[arg(long)]
        no_track: bool,
        #[arg(long)]
        notes: Option<String>,
    },

    /// Change fields of a product
    Update {
        id: String,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long)]
        name: Option<String>,
        #[arg(long, value_parser = money_arg)]
        price: Option<Money>,
        #[arg(long, value_parser = money_arg)]
        cost: Option<Money>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        category: Option<String>,
        #[arg(long)]
        brand: Option<String>,
        #[arg(long)]
        manufacturer: Option<String>,
        #[arg(long)]
        unit: Option<String>,
        #[arg(long)]
        barcode: Option<String>,
        #[arg(long)]
        minimum_stock: Option<i64>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a product
    Delete { id: String },

    /// Bulk-create products from a CSV file
    Import { file: PathBuf },

    /// Print (or save) the CSV header the importer expects
    Template {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn products(ctx: &Context, command: ProductsCommand) -> anyhow::Result<()> {
    ctx.open_page(PRODUCTS_PAGE).await?;
    let api = ctx.client.products();

    match command {
        ProductsCommand::List {
            page,
            limit,
            search,
            category,
            brand,
            active,
        } => {
            let search = search
                .map(|s| validation::validate_search_query(&s))
                .transpose()?
                .filter(|s| !s.is_empty());
            let query = ProductQuery {
                page,
                limit,
                search,
                category_id: category,
                brand_id: brand,
                is_active: active,
            };
            let page = api.list(&query).await?;
            ctx.out.page(
                &page,
                &["ID", "SKU", "Name", "Price", "Stock", "Status", "Active"],
                product_row,
            )
        }

        ProductsCommand::Show { id } => {
            let product = api.get(&id).await?;
            ctx.out.record(&product, product_fields(&product))?;
            if !ctx.out.is_json() && !product.variants.is_empty() {
                ctx.out.list(
                    &product.variants,
                    &["ID", "SKU", "Variant", "Price", "Stock", "Active"],
                    variant_row,
                )?;
            }
            Ok(())
        }

        ProductsCommand::Create {
            sku,
            name,
            price,
            cost,
            description,
            category,
            brand,
            manufacturer,
            unit,
            barcode,
            initial_stock,
            minimum_stock,
            no_track,
            notes,
        } => {
            let product = CreateProduct {
                sku: sku.trim().to_string(),
                name: name.trim().to_string(),
                description,
                category_id: category,
                brand_id: brand,
                manufacturer_id: manufacturer,
                unit,
                cost_price: cost,
                selling_price: price,
                track_inventory: no_track.then_some(false),
                initial_stock,
                minimum_stock,
                barcode,
                notes,
                ..CreateProduct::default()
            };
            validation::validate_create_product(&product)?;
            let created = api.create(&product).await?;
            ctx.out.done(
                &created,
                &format!("Created product {} ({})", created.name, created.id),
            )
        }

        ProductsCommand::Update {
            id,
            sku,
            name,
            price,
            cost,
            description,
            category,
            brand,
            manufacturer,
            unit,
            barcode,
            minimum_stock,
            active,
        } => {
            let mut errors = FieldErrors::new();
            if let Some(sku) = &sku {
                errors.check(validate_sku(sku));
            }
            if let Some(name) = &name {
                errors.check(validate_product_name(name));
            }
            if let Some(price) = price {
                errors.check(validate_price("sellingPrice", price));
            }
            if let Some(cost) = cost {
                errors.check(validate_price("costPrice", cost));
            }
            if let Some(minimum) = minimum_stock {
                errors.check(validate_stock_level("minimumStock", minimum));
            }
            errors.into_result()?;

            let changes = UpdateProduct {
                sku,
                name,
                description,
                category_id: category,
                brand_id: brand,
                manufacturer_id: manufacturer,
                unit,
                cost_price: cost,
                selling_price: price,
                minimum_stock,
                barcode,
                is_active: active,
            };
            let updated = api.update(&id, &changes).await?;
            ctx.out.done(&updated, &format!("Updated product {}", updated.name))
        }

        ProductsCommand::Delete { id } => {
            api.delete(&id).await?;
            ctx.out.done(&serde_json::json!({ "deleted": id }), "Product deleted")
        }

        ProductsCommand::Import { file } => {
            let report = api.upload_csv(read_csv(&file)?).await?;
            print_import(ctx, &report)
        }

        ProductsCommand::Template { output } => {
            let template = api.csv_template().await?;
            write_template(ctx, &template, output.as_deref())
        }
    }
}

fn product_row(product: &Product) -> Vec<String> {
    vec![
        product.id.clone(),
        product.sku.clone(),
        product.name.clone(),
        product.selling_price.to_string(),
        stock_cell(product.track_inventory, product.inventory.as_ref()),
        status_cell(product.track_inventory, product.inventory.as_ref()),
        yes_no(product.is_active),
    ]
}

fn product_fields(product: &Product) -> Vec<(&'static str, String)> {
    let name_of = |r: &Option<stockdesk_core::NamedRef>| or_dash(r.as_ref().map(|r| r.name.clone()));
    vec![
        ("ID", product.id.clone()),
        ("SKU", product.sku.clone()),
        ("Name", product.name.clone()),
        ("Description", or_dash(product.description.as_deref())),
        ("Barcode", or_dash(product.barcode.as_deref())),
        ("Category", name_of(&product.category)),
        ("Brand", name_of(&product.brand)),
        ("Manufacturer", name_of(&product.manufacturer)),
        ("Unit", or_dash(product.unit.as_deref())),
        ("Cost price", or_dash(product.cost_price)),
        ("Selling price", product.selling_price.to_string()),
        ("Stock", stock_cell(product.track_inventory, product.inventory.as_ref())),
        (
            "Minimum stock",
            or_dash(product.inventory.and_then(|i| i.minimum_stock)),
        ),
        ("Stock status", status_cell(product.track_inventory, product.inventory.as_ref())),
        ("Active", yes_no(product.is_active)),
        ("Variants", product.variants.len().to_string()),
        ("Created", date(product.created_at.as_ref())),
    ]
}

fn stock_cell(tracked: bool, level: Option<&StockLevel>) -> String {
    if !tracked {
        return "untracked".to_string();
    }
    or_dash(level.map(|l| l.quantity))
}

fn status_cell(tracked: bool, level: Option<&StockLevel>) -> String {
    match level {
        Some(level) if tracked => stock_status(level.quantity, level.minimum_stock).to_string(),
        _ => "-".to_string(),
    }
}

// =============================================================================
// Variants
// =============================================================================

#[derive(Subcommand)]
pub enum VariantsCommand {
    /// List the variants of a product
    List { product: String },

    /// Show one variant
    Show { product: String, id: String },

    /// Add a variant to a product
    Create {
        product: String,
        #[arg(long)]
        name: String,
        #[arg(long)]
        sku: String,
        #[arg(long, value_parser = money_arg)]
        price: Money,
        #[arg(long, value_parser = money_arg)]
        cost: Option<Money>,
        #[arg(long)]
        barcode: Option<String>,
        #[arg(long)]
        initial_stock: Option<i64>,
        #[arg(long)]
        minimum_stock: Option<i64>,
    },

    /// Change fields of a variant
    Update {
        product: String,
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        sku: Option<String>,
        #[arg(long, value_parser = money_arg)]
        price: Option<Money>,
        #[arg(long, value_parser = money_arg)]
        cost: Option<Money>,
        #[arg(long)]
        barcode: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete a variant
    Delete { product: String, id: String },

    /// Variants at or below their minimum stock
    LowStock,

    /// Bulk-create variants from a CSV file
    Import { file: PathBuf },

    /// Print (or save) the variant CSV header
    Template {
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

pub async fn variants(ctx: &Context, command: VariantsCommand) -> anyhow::Result<()> {
    ctx.open_page(PRODUCTS_PAGE).await?;
    let api = ctx.client.variants();
    let headers = ["ID", "SKU", "Variant", "Price", "Stock", "Active"];

    match command {
        VariantsCommand::List { product } => {
            let variants = api.list(&product).await?;
            ctx.out.list(&variants, &headers, variant_row)
        }

        VariantsCommand::Show { product, id } => {
            let variant = api.get(&product, &id).await?;
            ctx.out.record(
                &variant,
                vec![
                    ("ID", variant.id.clone()),
                    ("SKU", variant.sku.clone()),
                    ("Name", variant.name.clone()),
                    ("Barcode", or_dash(variant.barcode.as_deref())),
                    ("Cost price", or_dash(variant.cost_price)),
                    ("Selling price", variant.selling_price.to_string()),
                    ("Stock", stock_cell(true, variant.inventory.as_ref())),
                    ("Stock status", status_cell(true, variant.inventory.as_ref())),
                    ("Active", yes_no(variant.is_active)),
                ],
            )
        }

        VariantsCommand::Create {
            product,
            name,
            sku,
            price,
            cost,
            barcode,
            initial_stock,
            minimum_stock,
        } => {
            let variant = CreateVariant {
                name: name.trim().to_string(),
                sku: sku.trim().to_string(),
                barcode,
                cost_price: cost,
                selling_price: price,
                initial_stock,
                minimum_stock,
                ..CreateVariant::default()
            };
            validation::validate_create_variant(&variant)?;
            let created = api.create(&product, &variant).await?;
            ctx.out.done(
                &created,
                &format!("Created variant {} ({})", created.name, created.id),
            )
        }

        VariantsCommand::Update {
            product,
            id,
            name,
            sku,
            price,
            cost,
            barcode,
            active,
        } => {
            let mut errors = FieldErrors::new();
            if let Some(name) = &name {
                errors.check(validate_name("name", name));
            }
            if let Some(sku) = &sku {
                errors.check(validate_sku(sku));
            }
            if let Some(price) = price {
                errors.check(validate_price("sellingPrice", price));
            }
            errors.into_result()?;

            let changes = UpdateVariant {
                name,
                sku,
                barcode,
                cost_price: cost,
                selling_price: price,
                is_active: active,
            };
            let updated = api.update(&product, &id, &changes).await?;
            ctx.out.done(&updated, &format!("Updated variant {}", updated.name))
        }

        VariantsCommand::Delete { product, id } => {
            api.delete(&product, &id).await?;
            ctx.out.done(&serde_json::json!({ "deleted": id }), "Variant deleted")
        }

        VariantsCommand::LowStock => {
            let variants = api.low_stock().await?;
            ctx.out.list(&variants, &headers, variant_row)
        }

        VariantsCommand::Import { file } => {
            let report = api.upload_csv(read_csv(&file)?).await?;
            print_import(ctx, &report)
        }

        VariantsCommand::Template { output } => {
            let template = api.csv_template().await?;
            write_template(ctx, &template, output.as_deref())
        }
    }
}

fn variant_row(variant: &Variant) -> Vec<String> {
    vec![
        variant.id.clone(),
        variant.sku.clone(),
        variant.name.clone(),
        variant.selling_price.to_string(),
        stock_cell(true, variant.inventory.as_ref()),
        yes_no(variant.is_active),
    ]
}

// =============================================================================
// CSV Import
// =============================================================================

fn read_csv(path: &Path) -> anyhow::Result<MultipartFile> {
    let bytes =
        std::fs::read(path).with_context(|| format!("Failed to read {}", path.display()))?;
    let file_name = path
        .file_name()
        .map_or_else(|| "upload.csv".to_string(), |n| n.to_string_lossy().into_owned());
    Ok(MultipartFile::csv(file_name, bytes))
}

fn print_import(ctx: &Context, report: &ImportReport) -> anyhow::Result<()> {
    if ctx.out.is_json() {
        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "message": report.message,
                "details": report.details,
            }))?
        );
        return Ok(());
    }
    println!("{}", report.message.as_deref().unwrap_or("Import finished"));
    if !report.details.is_null() {
        println!("{}", serde_json::to_string_pretty(&report.details)?);
    }
    Ok(())
}

fn write_template(ctx: &Context, template: &str, output: Option<&Path>) -> anyhow::Result<()> {
    match output {
        Some(path) => {
            std::fs::write(path, template)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            ctx.out.message(&format!("Template saved to {}", path.display()));
        }
        None => print!("{}", template),
    }
    Ok(())
}

// =============================================================================
// Taxonomies
// =============================================================================

/// Table layout of a taxonomy entity.
pub trait CatalogRow: Serialize + DeserializeOwned {
    const HEADERS: &'static [&'static str];

    fn row(&self) -> Vec<String>;
}

impl CatalogRow for Category {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description", "Parent", "Active"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(self.description.as_deref()),
            or_dash(self.parent_id.as_deref()),
            yes_no(self.is_active),
        ]
    }
}

impl CatalogRow for Brand {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description", "Active"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(self.description.as_deref()),
            yes_no(self.is_active),
        ]
    }
}

impl CatalogRow for Manufacturer {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Description", "Active"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(self.description.as_deref()),
            yes_no(self.is_active),
        ]
    }
}

impl CatalogRow for Unit {
    const HEADERS: &'static [&'static str] = &["ID", "Name", "Abbreviation", "Description", "Active"];

    fn row(&self) -> Vec<String> {
        vec![
            self.id.clone(),
            self.name.clone(),
            or_dash(self.abbreviation.as_deref()),
            or_dash(self.description.as_deref()),
            yes_no(self.is_active),
        ]
    }
}

#[derive(Subcommand)]
pub enum CatalogCommand {
    /// List entries
    List {
        #[arg(long)]
        search: Option<String>,
        /// Include deactivated entries
        #[arg(long)]
        include_inactive: bool,
    },

    /// Show one entry
    Show { id: String },

    /// Create an entry
    Create {
        #[arg(long)]
        name: String,
        #[arg(long)]
        description: Option<String>,
        /// Parent category id (categories only)
        #[arg(long)]
        parent: Option<String>,
        /// Short form (units only)
        #[arg(long)]
        abbreviation: Option<String>,
    },

    /// Change an entry
    Update {
        id: String,
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        description: Option<String>,
        #[arg(long)]
        parent: Option<String>,
        #[arg(long)]
        abbreviation: Option<String>,
        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete an entry
    Delete { id: String },
}

pub async fn taxonomy<T: CatalogRow>(
    ctx: &Context,
    api: &CatalogApi<'_, T>,
    page: &str,
    command: CatalogCommand,
) -> anyhow::Result<()> {
    ctx.open_page(page).await?;

    match command {
        CatalogCommand::List {
            search,
            include_inactive,
        } => {
            let query = CatalogQuery {
                include_inactive: include_inactive.then_some(true),
                search: search.filter(|s| !s.trim().is_empty()),
            };
            let entries = api.list(&query).await?;
            ctx.out.page(&entries, T::HEADERS, T::row)
        }

        CatalogCommand::Show { id } => {
            let entry = api.get(&id).await?;
            let fields = T::HEADERS.iter().copied().zip(entry.row()).collect();
            ctx.out.record(&entry, fields)
        }

        CatalogCommand::Create {
            name,
            description,
            parent,
            abbreviation,
        } => {
            validate_name("name", &name)?;
            let input = CatalogEntryInput {
                name: Some(name.trim().to_string()),
                description,
                parent_id: parent,
                abbreviation,
                is_active: None,
            };
            let created = api.create(&input).await?;
            ctx.out.done(&created, &format!("Created {} entry", api.resource()))
        }

        CatalogCommand::Update {
            id,
            name,
            description,
            parent,
            abbreviation,
            active,
        } => {
            if let Some(name) = &name {
                validate_name("name", name)?;
            }
            let input = CatalogEntryInput {
                name: name.map(|n| n.trim().to_string()),
                description,
                parent_id: parent,
                abbreviation,
                is_active: active,
            };
            let updated = api.update(&id, &input).await?;
            ctx.out.done(&updated, &format!("Updated {} entry {}", api.resource(), id))
        }

        CatalogCommand::Delete { id } => {
            api.delete(&id).await?;
            ctx.out.done(
                &serde_json::json!({ "deleted": id }),
                &format!("Deleted {} entry", api.resource()),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(track: bool, quantity: i64, minimum: Option<i64>) -> Product {
        serde_json::from_value(serde_json::json!({
            "id": "p-1",
            "sku": "W-1",
            "name": "Widget",
            "sellingPrice": 100,
            "trackInventory": track,
            "inventory": { "quantity": quantity, "minimumStock": minimum }
        }))
        .unwrap()
    }

    #[test]
    fn test_product_row_shows_stock_status() {
        let row = product_row(&product(true, 2, Some(5)));
        assert_eq!(row[3], "100.00");
        assert_eq!(row[4], "2");
        assert_eq!(row[5], "low");
    }

    #[test]
    fn test_untracked_product_has_no_status() {
        let row = product_row(&product(false, 0, None));
        assert_eq!(row[4], "untracked");
        assert_eq!(row[5], "-");
    }

    #[test]
    fn test_unit_row_matches_headers() {
        let unit: Unit = serde_json::from_value(serde_json::json!({
            "id": "u-1", "name": "Kilogram", "abbreviation": "kg"
        }))
        .unwrap();
        assert_eq!(unit.row().len(), Unit::HEADERS.len());
        assert_eq!(unit.row()[2], "kg");
    }
}

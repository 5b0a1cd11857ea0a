//! # Operator Commands
//!
//! One subcommand per dashboard page. Before a page command talks to the
//! backend it passes the same two checks the dashboard applies when a page
//! is opened:
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Opening a Page                                  │
//! │                                                                         │
//! │  stockdesk orders list                                                  │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  routing::guard("/dashboard/orders", has refresh token?)                │
//! │        │ no token ──► remember path, "sign in first"                    │
//! │        ▼                                                                │
//! │  GET /auth/profile ──► permissions                                      │
//! │        │                                                                │
//! │        ▼                                                                │
//! │  navigation::can_access(permissions, path)                              │
//! │        │ denied ──► "no access"                                         │
//! │        ▼                                                                │
//! │  command body (list, show, adjust, checkout, ...)                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

pub mod auth;
pub mod catalog;
pub mod config;
pub mod customers;
pub mod dashboard;
pub mod inventory;
pub mod orders;
pub mod pos;

use anyhow::bail;
use clap::Subcommand;
use stockdesk_client::ApiClient;
use stockdesk_core::navigation;
use stockdesk_core::{Money, TaxRate};
use stockdesk_core::routing::{self, RouteDecision};
use stockdesk_core::validation::validate_tax_rate;
use tracing::debug;

use crate::output::Output;

#[derive(Subcommand)]
pub enum Command {
    /// Sign in and store the session
    Login(auth::LoginArgs),

    /// Drop the stored session
    Logout,

    /// Show the signed-in user and their permissions
    Whoami,

    /// Show the navigation sections available to you
    Nav {
        /// Mark the entry for this path as active
        #[arg(long, default_value = navigation::DASHBOARD_HOME)]
        path: String,
    },

    /// Renew the access token now
    Refresh,

    /// Dashboard statistics and revenue
    #[command(subcommand)]
    Dashboard(dashboard::DashboardCommand),

    /// Products and CSV import
    #[command(subcommand)]
    Products(catalog::ProductsCommand),

    /// Product variants
    #[command(subcommand)]
    Variants(catalog::VariantsCommand),

    /// Product categories
    #[command(subcommand)]
    Categories(catalog::CatalogCommand),

    /// Brands
    #[command(subcommand)]
    Brands(catalog::CatalogCommand),

    /// Manufacturers
    #[command(subcommand)]
    Manufacturers(catalog::CatalogCommand),

    /// Units of measure
    #[command(subcommand)]
    Units(catalog::CatalogCommand),

    /// Stock levels, adjustments and history
    #[command(subcommand)]
    Inventory(inventory::InventoryCommand),

    /// Orders and their lifecycle
    #[command(subcommand)]
    Orders(orders::OrdersCommand),

    /// Customers
    #[command(subcommand)]
    Customers(customers::CustomersCommand),

    /// Point-of-sale cart and checkout
    #[command(subcommand)]
    Pos(pos::PosCommand),

    /// Local configuration
    #[command(subcommand)]
    Config(config::ConfigCommand),
}

pub struct Context {
    pub client: ApiClient,
    pub out: Output,
}

impl Context {
    pub fn new(client: ApiClient, out: Output) -> Self {
        Context { client, out }
    }

    /// Applies the route guard and the permission check for `pathname`.
    pub async fn open_page(&self, pathname: &str) -> anyhow::Result<()> {
        self.client.set_location(pathname);

        let session = self.client.session();
        match routing::guard(pathname, session.has_refresh_token()?) {
            RouteDecision::Allow => {}
            RouteDecision::Redirect {
                redirect_after_login: Some(path),
                ..
            } => {
                session.set_redirect_after_login(path)?;
                bail!("Not signed in. Run `stockdesk login` first.");
            }
            RouteDecision::Redirect { to, .. } => debug!(%to, "Route guard redirect ignored"),
        }

        let permissions = self.client.auth().permissions().await?;
        if !navigation::can_access(&permissions, pathname) {
            bail!("You do not have access to {}", pathname);
        }
        Ok(())
    }
}

/// Runs a command that needs the backend.
pub async fn dispatch(ctx: &Context, command: Command) -> anyhow::Result<()> {
    match command {
        Command::Login(args) => auth::login(ctx, args).await,
        Command::Logout => auth::logout(ctx),
        Command::Whoami => auth::whoami(ctx).await,
        Command::Nav { path } => auth::nav(ctx, &path).await,
        Command::Refresh => auth::refresh(ctx).await,
        Command::Dashboard(cmd) => dashboard::run(ctx, cmd).await,
        Command::Products(cmd) => catalog::products(ctx, cmd).await,
        Command::Variants(cmd) => catalog::variants(ctx, cmd).await,
        Command::Categories(cmd) => {
            catalog::taxonomy(ctx, &ctx.client.categories(), "/dashboard/categories", cmd).await
        }
        Command::Brands(cmd) => {
            catalog::taxonomy(ctx, &ctx.client.brands(), "/dashboard/brands", cmd).await
        }
        Command::Manufacturers(cmd) => {
            catalog::taxonomy(ctx, &ctx.client.manufacturers(), "/dashboard/manufacturers", cmd)
                .await
        }
        Command::Units(cmd) => {
            catalog::taxonomy(ctx, &ctx.client.units(), "/dashboard/units", cmd).await
        }
        Command::Inventory(cmd) => inventory::run(ctx, cmd).await,
        Command::Orders(cmd) => orders::run(ctx, cmd).await,
        Command::Customers(cmd) => customers::run(ctx, cmd).await,
        Command::Pos(cmd) => pos::run(ctx, cmd).await,
        Command::Config(_) => bail!("config commands run without a client"),
    }
}

// =============================================================================
// Argument Parsers
// =============================================================================

/// `12.50` style amounts.
pub(crate) fn money_arg(text: &str) -> Result<Money, String> {
    Money::parse(text).map_err(|e| e.to_string())
}

/// Percent, `8.25` for 8.25%.
pub(crate) fn percent_arg(text: &str) -> Result<TaxRate, String> {
    let rate = TaxRate::parse_percent(text).map_err(|e| e.to_string())?;
    validate_tax_rate(rate).map_err(|e| e.to_string())?;
    Ok(rate)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_money_arg() {
        assert_eq!(money_arg("12.50"), Ok(Money::from_cents(1250)));
        assert!(money_arg("twelve").is_err());
    }

    #[test]
    fn test_percent_arg() {
        assert_eq!(percent_arg("10"), Ok(TaxRate::from_bps(1000)));
        assert!(percent_arg("-1").is_err());
        assert!(percent_arg("100.5").is_err());
    }
}

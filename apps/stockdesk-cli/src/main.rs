//! # StockDesk CLI
//!
//! Operator command line for the StockDesk inventory backend.
//!
//! ## Startup
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        stockdesk <command>                              │
//! │                                                                         │
//! │  .env ──► ClientConfig::load (config.toml + STOCKDESK_* overrides)      │
//! │                │                                                        │
//! │                ▼                                                        │
//! │  FileSessionStore (session.json) ──► ApiClient ──► logout hook          │
//! │                                          │                              │
//! │                                          ▼                              │
//! │                              commands::dispatch (page guard, command)   │
//! │                                                                         │
//! │  Errors print the backend's message (or a generic one) and exit 1.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod cart_store;
mod commands;
mod output;

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use stockdesk_client::{ApiClient, ClientConfig, ClientError, FileSessionStore};
use tracing::debug;
use tracing_subscriber::EnvFilter;

use crate::commands::{Command, Context};
use crate::output::{Output, OutputFormat};

/// StockDesk operator command line
#[derive(Parser)]
#[command(name = "stockdesk")]
#[command(version, about = "Inventory and point-of-sale administration for StockDesk")]
struct Cli {
    /// Config file (defaults to the platform config directory)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Output format
    #[arg(short, long, global = true, value_enum, default_value_t = OutputFormat::Table)]
    format: OutputFormat,

    /// Verbose logging to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(cli).await {
        eprintln!("Error: {}", describe(&e));
        std::process::exit(1);
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_env("STOCKDESK_LOG")
            .or_else(|_| EnvFilter::try_from_default_env())
            .unwrap_or_else(|_| EnvFilter::new("warn"))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let out = Output::new(cli.format);

    let command = match cli.command {
        Command::Config(command) => return commands::config::run(cli.config, command, &out),
        other => other,
    };

    let config = ClientConfig::load(cli.config)?;
    let store = FileSessionStore::default_location()?;
    debug!(api = %config.api.url, session = ?store.path(), "Starting");

    let client = ApiClient::new(&config, Arc::new(store))?;
    client.set_logout_hook(|location: &str| {
        eprintln!(
            "Session expired while on {}. Sign in again with `stockdesk login`.",
            location
        );
    });

    let ctx = Context::new(client, out);
    commands::dispatch(&ctx, command).await
}

/// Operator-facing text for a failed command.
///
/// Backend and network failures show the backend's message or the generic
/// one; everything else shows its own description.
fn describe(error: &anyhow::Error) -> String {
    let client_error = error
        .chain()
        .find_map(|cause| cause.downcast_ref::<ClientError>());

    match client_error {
        Some(e)
            if !e.is_config_error()
                && !matches!(e, ClientError::SessionStore(_) | ClientError::InvalidId(_)) =>
        {
            debug!(error = %e, "Request failed");
            let message = e.user_message();
            let outer = error.to_string();
            if outer == e.to_string() {
                message
            } else {
                format!("{}: {}", outer, message)
            }
        }
        _ => format!("{:#}", error),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;
    use stockdesk_core::GENERIC_ERROR_MESSAGE;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parses_nested_commands() {
        let cli = Cli::try_parse_from([
            "stockdesk", "--format", "json", "inventory", "adjust", "inv-1", "--type", "remove",
            "--quantity", "3", "--reason", "damaged",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(matches!(cli.command, Command::Inventory(_)));
    }

    #[test]
    fn test_describe_api_error_uses_backend_message() {
        let err = anyhow::Error::new(ClientError::Api {
            status: 400,
            message: Some("SKU already exists".into()),
        });
        assert_eq!(describe(&err), "SKU already exists");
    }

    #[test]
    fn test_describe_keeps_context() {
        let err = anyhow::Error::new(ClientError::Api {
            status: 500,
            message: Some("Internal server error".into()),
        })
        .context("Checkout failed; the cart was kept");
        assert_eq!(
            describe(&err),
            format!("Checkout failed; the cart was kept: {}", GENERIC_ERROR_MESSAGE)
        );
    }

    #[test]
    fn test_describe_invalid_id() {
        let err = anyhow::Error::new(ClientError::InvalidId("..".into()));
        assert_eq!(describe(&err), "Invalid id: '..'");
    }

    #[test]
    fn test_describe_other_errors() {
        let err = anyhow::anyhow!("Not signed in. Run `stockdesk login` first.");
        assert_eq!(describe(&err), "Not signed in. Run `stockdesk login` first.");
    }
}

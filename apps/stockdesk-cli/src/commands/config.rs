//! Local configuration file.

use std::path::PathBuf;

use anyhow::bail;
use clap::Subcommand;
use stockdesk_client::{ClientConfig, Environment};

use crate::output::Output;

#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Write a config file with defaults
    Init {
        /// Backend base URL, e.g. https://api.example.com/api/v1
        #[arg(long)]
        url: Option<String>,
        /// Request timeout in seconds
        #[arg(long)]
        timeout: Option<u64>,
        /// Mark cookies secure
        #[arg(long)]
        production: bool,
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Show the effective configuration (file plus environment)
    Show,
}

pub fn run(path: Option<PathBuf>, command: ConfigCommand, out: &Output) -> anyhow::Result<()> {
    match command {
        ConfigCommand::Init {
            url,
            timeout,
            production,
            force,
        } => {
            let target = path.clone().or_else(ClientConfig::default_config_path);
            if let Some(existing) = target.as_ref().filter(|p| p.exists()) {
                if !force {
                    bail!("{} already exists; use --force to overwrite", existing.display());
                }
            }

            let mut config = match url {
                Some(url) => ClientConfig::with_url(url),
                None => ClientConfig::default(),
            };
            if let Some(secs) = timeout {
                config.api.timeout_secs = secs;
            }
            if production {
                config.session.environment = Environment::Production;
            }
            config.validate()?;

            let saved = config.save(target)?;
            out.done(&config, &format!("Config written to {}", saved.display()))
        }

        ConfigCommand::Show => {
            let config = ClientConfig::load(path)?;
            out.record(
                &config,
                vec![
                    ("API URL", config.api.url.clone()),
                    ("Timeout (s)", config.api.timeout_secs.to_string()),
                    (
                        "Access token TTL (s)",
                        config.session.access_token_ttl_secs.to_string(),
                    ),
                    ("Secure cookies", config.secure_cookies().to_string()),
                ],
            )
        }
    }
}

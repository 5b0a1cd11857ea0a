//! # Client Configuration
//!
//! Where the backend lives and how long to wait for it.
//!
//! ## Configuration Sources
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Configuration Priority                               │
//! │                                                                         │
//! │  1. Environment Variables (highest priority)                           │
//! │     STOCKDESK_API_URL=https://api.shop.example/api/v1                  │
//! │     (NEXT_PUBLIC_API_URL is accepted as a fallback name)               │
//! │     STOCKDESK_TIMEOUT_SECS=30                                          │
//! │     STOCKDESK_ACCESS_TTL_SECS=900                                      │
//! │     STOCKDESK_ENV=production                                           │
//! │                                                                         │
//! │  2. TOML Config File                                                   │
//! │     ~/.config/stockdesk/config.toml (Linux)                            │
//! │     ~/Library/Application Support/io.stockdesk.stockdesk/ (macOS)      │
//! │                                                                         │
//! │  3. Default Values (lowest priority)                                   │
//! │     http://localhost:3000/api/v1, 30 s, 15 min, development            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Configuration File Format
//! ```toml
//! # config.toml
//! [api]
//! url = "https://api.shop.example/api/v1"
//! timeout_secs = 30
//!
//! [session]
//! access_token_ttl_secs = 900
//! environment = "production"   # development | production
//! ```

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ClientError, ClientResult};

pub const DEFAULT_API_URL: &str = "http://localhost:3000/api/v1";

// =============================================================================
// Environment
// =============================================================================

/// Deployment environment. Production marks session cookies `Secure`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Environment {
    #[default]
    Development,
    Production,
}

impl Environment {
    pub fn is_production(&self) -> bool {
        matches!(self, Environment::Production)
    }
}

impl std::fmt::Display for Environment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Environment::Development => write!(f, "development"),
            Environment::Production => write!(f, "production"),
        }
    }
}

impl std::str::FromStr for Environment {
    type Err = ClientError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "development" | "dev" => Ok(Environment::Development),
            "production" | "prod" => Ok(Environment::Production),
            other => Err(ClientError::InvalidConfig(format!(
                "Unknown environment: '{}'. Valid options: development, production",
                other
            ))),
        }
    }
}

// =============================================================================
// Settings Sections
// =============================================================================

/// Backend connection settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiSettings {
    /// Base URL every endpoint path is appended to.
    #[serde(default = "default_api_url")]
    pub url: String,

    /// Per-request deadline (seconds).
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout() -> u64 {
    30
}

impl Default for ApiSettings {
    fn default() -> Self {
        ApiSettings {
            url: default_api_url(),
            timeout_secs: default_timeout(),
        }
    }
}

/// Session cookie settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSettings {
    /// Lifetime given to the access-token cookie (seconds).
    ///
    /// The backend does not report access-token expiry, so this is fixed.
    #[serde(default = "default_access_ttl")]
    pub access_token_ttl_secs: u64,

    #[serde(default)]
    pub environment: Environment,
}

fn default_access_ttl() -> u64 {
    15 * 60
}

/// Longest accepted access-token lifetime (30 days).
pub const MAX_ACCESS_TTL_SECS: u64 = 30 * 24 * 60 * 60;

impl Default for SessionSettings {
    fn default() -> Self {
        SessionSettings {
            access_token_ttl_secs: default_access_ttl(),
            environment: Environment::default(),
        }
    }
}

// =============================================================================
// Client Config
// =============================================================================

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ClientConfig {
    #[serde(default)]
    pub api: ApiSettings,

    #[serde(default)]
    pub session: SessionSettings,
}

impl ClientConfig {
    /// Config pointing at `url`, everything else default.
    pub fn with_url(url: impl Into<String>) -> Self {
        ClientConfig {
            api: ApiSettings {
                url: url.into(),
                ..ApiSettings::default()
            },
            ..ClientConfig::default()
        }
    }

    /// Loads configuration: file (if present), then environment, then validates.
    pub fn load(config_path: Option<PathBuf>) -> ClientResult<Self> {
        let mut config = Self::default();

        if let Some(path) = config_path.or_else(Self::default_config_path) {
            if path.exists() {
                info!(?path, "Loading client config from file");
                config = Self::from_file(&path)?;
            } else {
                debug!(?path, "Config file not found, using defaults");
            }
        }

        config.apply_overrides(|key| std::env::var(key).ok());
        config.validate()?;

        Ok(config)
    }

    pub fn from_file(path: &Path) -> ClientResult<Self> {
        let contents = std::fs::read_to_string(path)?;
        Ok(toml::from_str(&contents)?)
    }

    /// Saves configuration to file.
    pub fn save(&self, config_path: Option<PathBuf>) -> ClientResult<PathBuf> {
        let path = config_path
            .or_else(Self::default_config_path)
            .ok_or_else(|| ClientError::ConfigSaveFailed("No config path available".into()))?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;
        }

        let contents = toml::to_string_pretty(self)?;
        std::fs::write(&path, contents).map_err(|e| ClientError::ConfigSaveFailed(e.to_string()))?;

        info!(?path, "Client config saved");
        Ok(path)
    }

    /// Validates the configuration.
    pub fn validate(&self) -> ClientResult<()> {
        self.base_url()?;

        if self.api.timeout_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "timeout_secs must be greater than 0".into(),
            ));
        }
        if self.session.access_token_ttl_secs == 0 {
            return Err(ClientError::InvalidConfig(
                "access_token_ttl_secs must be greater than 0".into(),
            ));
        }
        if self.session.access_token_ttl_secs > MAX_ACCESS_TTL_SECS {
            return Err(ClientError::InvalidConfig(format!(
                "access_token_ttl_secs must be at most {}",
                MAX_ACCESS_TTL_SECS
            )));
        }

        Ok(())
    }

    /// Applies overrides from a variable lookup (the process environment
    /// in production, a map in tests).
    pub fn apply_overrides<F>(&mut self, lookup: F)
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(url) = lookup("STOCKDESK_API_URL").or_else(|| lookup("NEXT_PUBLIC_API_URL")) {
            debug!(url = %url, "Overriding API URL from environment");
            self.api.url = url;
        }

        if let Some(timeout) = lookup("STOCKDESK_TIMEOUT_SECS") {
            match timeout.parse::<u64>() {
                Ok(secs) => self.api.timeout_secs = secs,
                Err(_) => warn!(value = %timeout, "Ignoring invalid STOCKDESK_TIMEOUT_SECS"),
            }
        }

        if let Some(ttl) = lookup("STOCKDESK_ACCESS_TTL_SECS") {
            match ttl.parse::<u64>() {
                Ok(secs) => self.session.access_token_ttl_secs = secs,
                Err(_) => warn!(value = %ttl, "Ignoring invalid STOCKDESK_ACCESS_TTL_SECS"),
            }
        }

        if let Some(env) = lookup("STOCKDESK_ENV") {
            match env.parse() {
                Ok(parsed) => self.session.environment = parsed,
                Err(_) => warn!(value = %env, "Unknown environment in STOCKDESK_ENV"),
            }
        }
    }

    /// Returns the default config file path.
    pub fn default_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("io", "stockdesk", "stockdesk")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    // =========================================================================
    // Convenience Methods
    // =========================================================================

    /// Parsed base URL. Must be absolute http(s).
    ///
    /// A trailing slash is added so relative joins keep the path prefix
    /// (`/api/v1` + `products` → `/api/v1/products`).
    pub fn base_url(&self) -> ClientResult<Url> {
        let mut raw = self.api.url.trim().to_string();
        if !raw.ends_with('/') {
            raw.push('/');
        }
        let url = Url::parse(&raw)?;
        match url.scheme() {
            "http" | "https" => Ok(url),
            other => Err(ClientError::InvalidUrl(format!(
                "API URL must start with http:// or https://, got scheme '{}'",
                other
            ))),
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.api.timeout_secs)
    }

    /// Access-token lifetime, capped at [`MAX_ACCESS_TTL_SECS`].
    pub fn access_token_ttl(&self) -> chrono::Duration {
        let secs = self.session.access_token_ttl_secs.min(MAX_ACCESS_TTL_SECS);
        chrono::Duration::try_seconds(secs as i64).unwrap_or_else(chrono::Duration::zero)
    }

    pub fn secure_cookies(&self) -> bool {
        self.session.environment.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_default_config() {
        let config = ClientConfig::default();
        assert_eq!(config.api.url, DEFAULT_API_URL);
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.access_token_ttl_secs, 900);
        assert!(!config.secure_cookies());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validation() {
        let mut config = ClientConfig::with_url("ftp://files.example");
        assert!(config.validate().is_err());

        config.api.url = "not a url".to_string();
        assert!(config.validate().is_err());

        config.api.url = "https://api.shop.example/api/v1".to_string();
        assert!(config.validate().is_ok());

        config.api.timeout_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_access_ttl_bounds() {
        let mut config = ClientConfig::with_url("https://api.shop.example/api/v1");
        config.apply_overrides(|key| {
            (key == "STOCKDESK_ACCESS_TTL_SECS").then(|| "100000000000000".to_string())
        });
        assert_eq!(config.session.access_token_ttl_secs, 100_000_000_000_000);
        assert!(matches!(
            config.validate(),
            Err(ClientError::InvalidConfig(_))
        ));
        assert_eq!(
            config.access_token_ttl(),
            chrono::Duration::seconds(MAX_ACCESS_TTL_SECS as i64)
        );

        config.session.access_token_ttl_secs = MAX_ACCESS_TTL_SECS;
        assert!(config.validate().is_ok());

        config.session.access_token_ttl_secs = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_base_url_keeps_path_prefix() {
        let config = ClientConfig::with_url("https://api.shop.example/api/v1");
        let base = config.base_url().unwrap();
        assert_eq!(
            base.join("products").unwrap().as_str(),
            "https://api.shop.example/api/v1/products"
        );
    }

    #[test]
    fn test_overrides() {
        let vars: HashMap<&str, &str> = [
            ("NEXT_PUBLIC_API_URL", "https://fallback.example/api"),
            ("STOCKDESK_TIMEOUT_SECS", "10"),
            ("STOCKDESK_ACCESS_TTL_SECS", "not-a-number"),
            ("STOCKDESK_ENV", "production"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));

        assert_eq!(config.api.url, "https://fallback.example/api");
        assert_eq!(config.api.timeout_secs, 10);
        assert_eq!(config.session.access_token_ttl_secs, 900);
        assert!(config.secure_cookies());
    }

    #[test]
    fn test_primary_url_variable_wins() {
        let vars: HashMap<&str, &str> = [
            ("STOCKDESK_API_URL", "https://primary.example"),
            ("NEXT_PUBLIC_API_URL", "https://fallback.example"),
        ]
        .into_iter()
        .collect();

        let mut config = ClientConfig::default();
        config.apply_overrides(|key| vars.get(key).map(|v| v.to_string()));
        assert_eq!(config.api.url, "https://primary.example");
    }

    #[test]
    fn test_toml_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");

        let mut config = ClientConfig::with_url("https://api.shop.example/api/v1");
        config.session.environment = Environment::Production;
        config.save(Some(path.clone())).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.contains("[api]"));
        assert!(text.contains("[session]"));

        let loaded = ClientConfig::from_file(&path).unwrap();
        assert_eq!(loaded.api.url, "https://api.shop.example/api/v1");
        assert!(loaded.secure_cookies());
    }

    #[test]
    fn test_partial_file_uses_defaults() {
        let config: ClientConfig = toml::from_str("[api]\nurl = \"https://x.example\"\n").unwrap();
        assert_eq!(config.api.timeout_secs, 30);
        assert_eq!(config.session.access_token_ttl_secs, 900);
    }
}

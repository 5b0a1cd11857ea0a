//! # Cart Persistence
//!
//! The POS cart outlives a single command: `pos add` in one invocation,
//! `pos checkout` in another. It lives as JSON next to the session file.
//!
//! ```text
//! pos add ──► load ──► PosCart::add_item ──► save
//! pos checkout ──► load ──► checkout_request ──► POST /orders ──► clear
//! ```

use std::path::{Path, PathBuf};

use anyhow::Context as _;
use stockdesk_core::PosCart;
use tracing::{debug, warn};

pub struct CartStore {
    path: PathBuf,
}

impl CartStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        CartStore { path: path.into() }
    }

    /// `<data dir>/cart.json`.
    pub fn default_location() -> anyhow::Result<Self> {
        directories::ProjectDirs::from("io", "stockdesk", "stockdesk")
            .map(|dirs| Self::new(dirs.data_dir().join("cart.json")))
            .context("No data directory available for the cart")
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// The saved cart, or an empty one. An unreadable file starts over.
    pub fn load(&self) -> anyhow::Result<PosCart> {
        if !self.path.exists() {
            return Ok(PosCart::new());
        }
        let contents = std::fs::read_to_string(&self.path)
            .with_context(|| format!("Failed to read {}", self.path.display()))?;
        match serde_json::from_str(&contents) {
            Ok(cart) => Ok(cart),
            Err(e) => {
                warn!(path = ?self.path, error = %e, "Discarding unreadable cart file");
                Ok(PosCart::new())
            }
        }
    }

    pub fn save(&self, cart: &PosCart) -> anyhow::Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, serde_json::to_vec_pretty(cart)?)?;
        std::fs::rename(&tmp, &self.path)
            .with_context(|| format!("Failed to write {}", self.path.display()))?;
        debug!(path = ?self.path, lines = cart.item_count(), "Cart saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stockdesk_core::{Money, NewCartLine, TaxRate};
    use tempfile::TempDir;

    #[test]
    fn test_missing_file_is_empty_cart() {
        let dir = TempDir::new().unwrap();
        let store = CartStore::new(dir.path().join("cart.json"));
        assert!(store.load().unwrap().is_empty());
    }

    #[test]
    fn test_cart_survives_reload() {
        let dir = TempDir::new().unwrap();
        let store = CartStore::new(dir.path().join("nested").join("cart.json"));

        let mut cart = PosCart::new();
        cart.add_item(NewCartLine::product("p-1", "Widget", "W-1", Money::from_major(100), 2))
            .unwrap();
        cart.set_tax(TaxRate::from_bps(1000));
        store.save(&cart).unwrap();

        let loaded = store.load().unwrap();
        assert_eq!(loaded, cart);
        assert_eq!(loaded.total(), Money::from_major(220));
    }

    #[test]
    fn test_corrupt_file_starts_over() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("cart.json");
        std::fs::write(&path, "{not json").unwrap();
        assert!(CartStore::new(path).load().unwrap().is_empty());
    }
}

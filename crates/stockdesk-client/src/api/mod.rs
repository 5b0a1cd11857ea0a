//! # Resource APIs
//!
//! One borrowed handle per backend resource, obtained from the client:
//!
//! ```rust,ignore
//! let page = client.products().list(&ProductQuery::default()).await?;
//! let order = client.orders().confirm(&page.items[0].id).await?;
//! ```
//!
//! Handles only shape paths and bodies; authentication, refresh and error
//! mapping all happen in [`ApiClient::execute`].

pub mod analytics;
pub mod auth;
pub mod catalog;
pub mod customers;
pub mod inventory;
pub mod orders;
pub mod products;
pub mod variants;

pub use analytics::AnalyticsApi;
pub use auth::AuthApi;
pub use catalog::CatalogApi;
pub use customers::CustomersApi;
pub use inventory::InventoryApi;
pub use orders::OrdersApi;
pub use products::{ImportReport, ProductsApi};
pub use variants::VariantsApi;

use stockdesk_core::{Brand, Category, Manufacturer, Unit};
use url::Url;

use crate::client::ApiClient;
use crate::error::{ClientError, ClientResult};

/// Percent-encodes `id` as exactly one path segment.
///
/// `/`, `?`, `#` and `%` are escaped; empty ids and the dot segments are
/// rejected since no encoding keeps them from being resolved.
pub(crate) fn segment(id: &str) -> ClientResult<String> {
    if id.is_empty() || id == "." || id == ".." {
        return Err(ClientError::InvalidId(id.to_string()));
    }

    let mut url = Url::parse("http://localhost/")?;
    url.path_segments_mut()
        .map_err(|_| ClientError::InvalidId(id.to_string()))?
        .push(id);
    Ok(url.path().trim_start_matches('/').to_string())
}

impl ApiClient {
    pub fn auth(&self) -> AuthApi<'_> {
        AuthApi::new(self)
    }

    pub fn products(&self) -> ProductsApi<'_> {
        ProductsApi::new(self)
    }

    pub fn variants(&self) -> VariantsApi<'_> {
        VariantsApi::new(self)
    }

    pub fn categories(&self) -> CatalogApi<'_, Category> {
        CatalogApi::new(self, "categories")
    }

    pub fn brands(&self) -> CatalogApi<'_, Brand> {
        CatalogApi::new(self, "brands")
    }

    pub fn manufacturers(&self) -> CatalogApi<'_, Manufacturer> {
        CatalogApi::new(self, "manufacturers")
    }

    pub fn units(&self) -> CatalogApi<'_, Unit> {
        CatalogApi::new(self, "units")
    }

    pub fn inventory(&self) -> InventoryApi<'_> {
        InventoryApi::new(self)
    }

    pub fn orders(&self) -> OrdersApi<'_> {
        OrdersApi::new(self)
    }

    pub fn customers(&self) -> CustomersApi<'_> {
        CustomersApi::new(self)
    }

    pub fn analytics(&self) -> AnalyticsApi<'_> {
        AnalyticsApi::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_segment_encoding() {
        assert_eq!(segment("o-1").unwrap(), "o-1");
        assert_eq!(segment("a/b").unwrap(), "a%2Fb");
        assert_eq!(segment("x?y=1#z").unwrap(), "x%3Fy=1%23z");
        assert_eq!(segment("50%").unwrap(), "50%25");
        assert_eq!(segment("two words").unwrap(), "two%20words");
        assert_eq!(segment("../admin").unwrap(), "..%2Fadmin");

        for bad in ["", ".", ".."] {
            assert!(matches!(segment(bad), Err(ClientError::InvalidId(_))));
        }
    }
}

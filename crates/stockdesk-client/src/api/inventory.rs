//! `/inventory`: stock records, adjustments and the movement ledger.

use stockdesk_core::{AdjustInventory, Inventory, InventoryTransaction, PageQuery, UpdateInventory};

use super::segment;
use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::ClientResult;

pub struct InventoryApi<'a> {
    client: &'a ApiClient,
}

impl<'a> InventoryApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        InventoryApi { client }
    }

    pub async fn list(&self, query: &PageQuery) -> ClientResult<Page<Inventory>> {
        self.client.get_with("/inventory", query).await
    }

    pub async fn low_stock(&self, query: &PageQuery) -> ClientResult<Page<Inventory>> {
        self.client.get_with("/inventory/low-stock", query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Inventory> {
        self.client.get(&format!("/inventory/{}", segment(id)?)).await
    }

    /// Records for a product (one per variant when it has variants).
    pub async fn for_product(&self, product_id: &str) -> ClientResult<Vec<Inventory>> {
        let records: Option<Vec<Inventory>> = self
            .client
            .get(&format!("/inventory/product/{}", segment(product_id)?))
            .await?;
        Ok(records.unwrap_or_default())
    }

    pub async fn for_variant(&self, variant_id: &str) -> ClientResult<Inventory> {
        self.client
            .get(&format!("/inventory/variant/{}", segment(variant_id)?))
            .await
    }

    /// Changes settings such as the minimum stock level.
    pub async fn update(&self, id: &str, changes: &UpdateInventory) -> ClientResult<Inventory> {
        self.client
            .patch(&format!("/inventory/{}", segment(id)?), changes)
            .await
    }

    /// `POST /inventory/{id}/adjust`. The backend applies the arithmetic.
    pub async fn adjust(&self, id: &str, adjustment: &AdjustInventory) -> ClientResult<Inventory> {
        self.client
            .post(&format!("/inventory/{}/adjust", segment(id)?), adjustment)
            .await
    }

    pub async fn transactions(
        &self,
        id: &str,
        query: &PageQuery,
    ) -> ClientResult<Page<InventoryTransaction>> {
        self.client
            .get_with(&format!("/inventory/{}/transactions", segment(id)?), query)
            .await
    }
}

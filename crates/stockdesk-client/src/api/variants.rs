//! Product variants: nested under `/products/{id}/variants`, plus the
//! cross-product low-stock list and the variant CSV import.

use stockdesk_core::{CreateVariant, UpdateVariant, Variant};

use super::products::{import, ImportReport};
use super::segment;
use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::transport::MultipartFile;

pub struct VariantsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> VariantsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        VariantsApi { client }
    }

    /// Every variant of a product. A `null` payload reads as none.
    pub async fn list(&self, product_id: &str) -> ClientResult<Vec<Variant>> {
        let variants: Option<Vec<Variant>> = self
            .client
            .get(&format!("/products/{}/variants", segment(product_id)?))
            .await?;
        Ok(variants.unwrap_or_default())
    }

    pub async fn get(&self, product_id: &str, variant_id: &str) -> ClientResult<Variant> {
        self.client
            .get(&variant_path(product_id, variant_id)?)
            .await
    }

    pub async fn create(&self, product_id: &str, variant: &CreateVariant) -> ClientResult<Variant> {
        self.client
            .post(&format!("/products/{}/variants", segment(product_id)?), variant)
            .await
    }

    pub async fn update(
        &self,
        product_id: &str,
        variant_id: &str,
        changes: &UpdateVariant,
    ) -> ClientResult<Variant> {
        self.client
            .patch(&variant_path(product_id, variant_id)?, changes)
            .await
    }

    pub async fn delete(&self, product_id: &str, variant_id: &str) -> ClientResult<()> {
        self.client
            .delete(&variant_path(product_id, variant_id)?)
            .await
    }

    /// `GET /variants/low-stock`.
    pub async fn low_stock(&self) -> ClientResult<Vec<Variant>> {
        let variants: Option<Vec<Variant>> = self.client.get("/variants/low-stock").await?;
        Ok(variants.unwrap_or_default())
    }

    pub async fn upload_csv(&self, file: MultipartFile) -> ClientResult<ImportReport> {
        import(self.client, "/products/upload/variants/csv", file).await
    }

    pub async fn csv_template(&self) -> ClientResult<String> {
        self.client
            .get_text("/products/upload/variants/csv/template")
            .await
    }
}

fn variant_path(product_id: &str, variant_id: &str) -> ClientResult<String> {
    Ok(format!(
        "/products/{}/variants/{}",
        segment(product_id)?,
        segment(variant_id)?
    ))
}

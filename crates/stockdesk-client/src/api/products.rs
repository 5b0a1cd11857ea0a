//! `/products` and the CSV bulk import.

use serde_json::Value;
use stockdesk_core::{CreateProduct, Product, ProductQuery, UpdateProduct};

use super::segment;
use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::ClientResult;
use crate::transport::{HttpRequest, MultipartFile};

/// What the backend said about a bulk import.
#[derive(Debug, Clone, PartialEq)]
pub struct ImportReport {
    pub message: Option<String>,
    /// Backend-specific summary (counts, per-row errors).
    pub details: Value,
}

pub struct ProductsApi<'a> {
    client: &'a ApiClient,
}

impl<'a> ProductsApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        ProductsApi { client }
    }

    pub async fn list(&self, query: &ProductQuery) -> ClientResult<Page<Product>> {
        self.client.get_with("/products", query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Product> {
        self.client.get(&format!("/products/{}", segment(id)?)).await
    }

    pub async fn create(&self, product: &CreateProduct) -> ClientResult<Product> {
        self.client.post("/products", product).await
    }

    pub async fn update(&self, id: &str, changes: &UpdateProduct) -> ClientResult<Product> {
        self.client.patch(&format!("/products/{}", segment(id)?), changes).await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/products/{}", segment(id)?)).await
    }

    /// `POST /products/upload/csv` with the file in the `file` field.
    pub async fn upload_csv(&self, file: MultipartFile) -> ClientResult<ImportReport> {
        import(self.client, "/products/upload/csv", file).await
    }

    /// The CSV header row the importer expects.
    pub async fn csv_template(&self) -> ClientResult<String> {
        self.client.get_text("/products/upload/csv/template").await
    }
}

pub(crate) async fn import(
    client: &ApiClient,
    path: &str,
    file: MultipartFile,
) -> ClientResult<ImportReport> {
    let response = client
        .execute(HttpRequest::post(path).with_file(file))
        .await?;
    Ok(ImportReport {
        message: response.message(),
        details: response.data().unwrap_or(Value::Null),
    })
}

//! `/customers`.

use stockdesk_core::{Customer, CustomerInput, CustomerQuery};

use super::segment;
use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::ClientResult;

pub struct CustomersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> CustomersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        CustomersApi { client }
    }

    pub async fn list(&self, query: &CustomerQuery) -> ClientResult<Page<Customer>> {
        self.client.get_with("/customers", query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Customer> {
        self.client.get(&format!("/customers/{}", segment(id)?)).await
    }

    pub async fn create(&self, customer: &CustomerInput) -> ClientResult<Customer> {
        self.client.post("/customers", customer).await
    }

    pub async fn update(&self, id: &str, changes: &CustomerInput) -> ClientResult<Customer> {
        self.client
            .patch(&format!("/customers/{}", segment(id)?), changes)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client.delete(&format!("/customers/{}", segment(id)?)).await
    }
}

//! Categories, brands, manufacturers and units.
//!
//! All four share one shape (`/{resource}`, `/{resource}/{id}`) and one
//! request body, so a single handle serves them, typed by the entity.

use serde::de::DeserializeOwned;
use std::marker::PhantomData;
use stockdesk_core::{CatalogEntryInput, CatalogQuery};

use super::segment;
use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::ClientResult;

pub struct CatalogApi<'a, T> {
    client: &'a ApiClient,
    resource: &'static str,
    _entity: PhantomData<T>,
}

impl<'a, T: DeserializeOwned> CatalogApi<'a, T> {
    pub(crate) fn new(client: &'a ApiClient, resource: &'static str) -> Self {
        CatalogApi {
            client,
            resource,
            _entity: PhantomData,
        }
    }

    pub fn resource(&self) -> &'static str {
        self.resource
    }

    /// Lists entries; bare arrays and `{ items }` both come back as a page.
    pub async fn list(&self, query: &CatalogQuery) -> ClientResult<Page<T>> {
        self.client
            .get_with(&format!("/{}", self.resource), query)
            .await
    }

    pub async fn get(&self, id: &str) -> ClientResult<T> {
        self.client
            .get(&format!("/{}/{}", self.resource, segment(id)?))
            .await
    }

    pub async fn create(&self, entry: &CatalogEntryInput) -> ClientResult<T> {
        self.client
            .post(&format!("/{}", self.resource), entry)
            .await
    }

    pub async fn update(&self, id: &str, changes: &CatalogEntryInput) -> ClientResult<T> {
        self.client
            .patch(&format!("/{}/{}", self.resource, segment(id)?), changes)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.client
            .delete(&format!("/{}/{}", self.resource, segment(id)?))
            .await
    }
}

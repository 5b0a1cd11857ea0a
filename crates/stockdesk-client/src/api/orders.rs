//! `/orders` and the lifecycle transitions.

use stockdesk_core::orders::OrderAction;
use stockdesk_core::{CreateOrder, MarkOrderPaid, Order, OrderQuery, PaymentMethod, UpdateOrder};

use super::segment;
use crate::client::ApiClient;
use crate::envelope::Page;
use crate::error::ClientResult;

pub struct OrdersApi<'a> {
    client: &'a ApiClient,
}

impl<'a> OrdersApi<'a> {
    pub(crate) fn new(client: &'a ApiClient) -> Self {
        OrdersApi { client }
    }

    pub async fn list(&self, query: &OrderQuery) -> ClientResult<Page<Order>> {
        self.client.get_with("/orders", query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Order> {
        self.client.get(&format!("/orders/{}", segment(id)?)).await
    }

    /// `POST /orders`; POS checkout sends [`PosCart::checkout_request`](stockdesk_core::PosCart::checkout_request).
    pub async fn create(&self, order: &CreateOrder) -> ClientResult<Order> {
        self.client.post("/orders", order).await
    }

    pub async fn update(&self, id: &str, changes: &UpdateOrder) -> ClientResult<Order> {
        self.client.patch(&format!("/orders/{}", segment(id)?), changes).await
    }

    pub async fn mark_paid(&self, id: &str, payment_method: PaymentMethod) -> ClientResult<Order> {
        self.client
            .patch(
                &format!(
                    "/orders/{}/{}",
                    segment(id)?,
                    OrderAction::MarkPaid.path_segment()
                ),
                &MarkOrderPaid { payment_method },
            )
            .await
    }

    pub async fn confirm(&self, id: &str) -> ClientResult<Order> {
        self.transition(id, OrderAction::Confirm).await
    }

    pub async fn complete(&self, id: &str) -> ClientResult<Order> {
        self.transition(id, OrderAction::Complete).await
    }

    pub async fn cancel(&self, id: &str) -> ClientResult<Order> {
        self.transition(id, OrderAction::Cancel).await
    }

    async fn transition(&self, id: &str, action: OrderAction) -> ClientResult<Order> {
        self.client
            .patch_empty(&format!("/orders/{}/{}", segment(id)?, action.path_segment()))
            .await
    }
}

//! # Order Actions
//!
//! Which lifecycle buttons an order offers. The backend validates every
//! transition; this only avoids offering ones it would reject.
//!
//! ```text
//! unpaid                       → MarkPaid
//! pending                      → Confirm
//! confirmed                    → Complete
//! not completed / cancelled    → Cancel
//! ```

use serde::Serialize;
use std::fmt;

use crate::types::{Order, OrderStatus};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum OrderAction {
    MarkPaid,
    Confirm,
    Complete,
    Cancel,
}

impl OrderAction {
    /// Path segment under `/orders/{id}/`.
    pub fn path_segment(&self) -> &'static str {
        match self {
            OrderAction::MarkPaid => "mark-paid",
            OrderAction::Confirm => "confirm",
            OrderAction::Complete => "complete",
            OrderAction::Cancel => "cancel",
        }
    }
}

impl fmt::Display for OrderAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path_segment())
    }
}

pub fn available_actions(status: OrderStatus, is_paid: bool) -> Vec<OrderAction> {
    let mut actions = Vec::new();
    if !is_paid {
        actions.push(OrderAction::MarkPaid);
    }
    match status {
        OrderStatus::Pending => actions.push(OrderAction::Confirm),
        OrderStatus::Confirmed => actions.push(OrderAction::Complete),
        _ => {}
    }
    if !matches!(status, OrderStatus::Completed | OrderStatus::Cancelled) {
        actions.push(OrderAction::Cancel);
    }
    actions
}

impl Order {
    pub fn available_actions(&self) -> Vec<OrderAction> {
        available_actions(self.status, self.is_paid)
    }

    pub fn allows(&self, action: OrderAction) -> bool {
        self.available_actions().contains(&action)
    }
}

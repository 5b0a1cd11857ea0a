//! # Inventory Helpers
//!
//! Display-side stock rules. The backend owns the actual arithmetic; these
//! only classify numbers it already returned and preview an adjustment
//! before it is sent.
//!
//! ## Stock Status
//! ```text
//! minimum unset          → Normal
//! quantity == 0          → Out
//! quantity ≤ minimum     → Low
//! quantity ≥ 3 × minimum → High
//! otherwise              → Normal
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{FieldErrors, ValidationError};
use crate::types::{AdjustInventory, AdjustType};

/// Minimum characters in an adjustment reason.
pub const MIN_REASON_LEN: usize = 3;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StockStatus {
    Out,
    Low,
    Normal,
    High,
}

impl fmt::Display for StockStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StockStatus::Out => "out",
            StockStatus::Low => "low",
            StockStatus::Normal => "normal",
            StockStatus::High => "high",
        })
    }
}

pub fn stock_status(quantity: i64, minimum: Option<i64>) -> StockStatus {
    let Some(minimum) = minimum else {
        return StockStatus::Normal;
    };
    if quantity == 0 {
        StockStatus::Out
    } else if quantity <= minimum {
        StockStatus::Low
    } else if quantity >= minimum * 3 {
        StockStatus::High
    } else {
        StockStatus::Normal
    }
}

/// Severity shown on low-stock alerts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LowStockUrgency {
    OutOfStock,
    Critical,
    Low,
}

impl fmt::Display for LowStockUrgency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            LowStockUrgency::OutOfStock => "Out of Stock",
            LowStockUrgency::Critical => "Critical",
            LowStockUrgency::Low => "Low",
        })
    }
}

/// `None` when no minimum is configured.
pub fn low_stock_urgency(quantity: i64, minimum: Option<i64>) -> Option<LowStockUrgency> {
    let minimum = minimum?;
    Some(if quantity == 0 {
        LowStockUrgency::OutOfStock
    } else if quantity * 2 <= minimum {
        LowStockUrgency::Critical
    } else {
        LowStockUrgency::Low
    })
}

/// Stock level after an adjustment, as the form previews it.
pub fn preview_adjustment(current: i64, kind: AdjustType, quantity: i64) -> i64 {
    match kind {
        AdjustType::Add => current + quantity,
        AdjustType::Remove => current - quantity,
        AdjustType::Set => quantity,
    }
}

/// Validates the adjustment form and builds the request body.
pub fn adjustment_request(
    kind: AdjustType,
    quantity: i64,
    reason: &str,
) -> Result<AdjustInventory, FieldErrors> {
    let mut errors = FieldErrors::new();

    if kind == AdjustType::Set && quantity < 0 {
        errors.check::<()>(Err(ValidationError::Negative {
            field: "quantity".to_string(),
        }));
    }
    if matches!(kind, AdjustType::Add | AdjustType::Remove) && quantity <= 0 {
        errors.check::<()>(Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        }));
    }

    let reason = reason.trim();
    if reason.chars().count() < MIN_REASON_LEN {
        errors.add(
            "reason",
            format!(
                "Please provide a reason (minimum {} characters)",
                MIN_REASON_LEN
            ),
        );
    }

    errors.into_result()?;
    Ok(AdjustInventory {
        quantity,
        kind,
        reason: reason.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(stock_status(0, None), StockStatus::Normal);
        assert_eq!(stock_status(0, Some(10)), StockStatus::Out);
        assert_eq!(stock_status(10, Some(10)), StockStatus::Low);
        assert_eq!(stock_status(11, Some(10)), StockStatus::Normal);
        assert_eq!(stock_status(29, Some(10)), StockStatus::Normal);
        assert_eq!(stock_status(30, Some(10)), StockStatus::High);
    }

    #[test]
    fn test_low_stock_urgency() {
        assert_eq!(low_stock_urgency(3, None), None);
        assert_eq!(low_stock_urgency(0, Some(10)), Some(LowStockUrgency::OutOfStock));
        assert_eq!(low_stock_urgency(5, Some(10)), Some(LowStockUrgency::Critical));
        assert_eq!(low_stock_urgency(6, Some(10)), Some(LowStockUrgency::Low));
        assert_eq!(LowStockUrgency::OutOfStock.to_string(), "Out of Stock");
    }

    #[test]
    fn test_preview_adjustment() {
        assert_eq!(preview_adjustment(10, AdjustType::Add, 5), 15);
        assert_eq!(preview_adjustment(10, AdjustType::Remove, 4), 6);
        assert_eq!(preview_adjustment(10, AdjustType::Set, 42), 42);
    }

    #[test]
    fn test_adjustment_request_validation() {
        let body = adjustment_request(AdjustType::Add, 5, "  restock ").unwrap();
        assert_eq!(body.reason, "restock");
        assert_eq!(body.kind, AdjustType::Add);

        let errors = adjustment_request(AdjustType::Remove, 0, "ok").unwrap_err();
        assert!(errors.get("quantity").is_some());
        assert!(errors.get("reason").is_some());

        assert!(adjustment_request(AdjustType::Set, 0, "stock count").is_ok());
    }
}

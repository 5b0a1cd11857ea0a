//! # Error Types
//!
//! Domain-specific error types for stockdesk-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  stockdesk-core errors (this file)                                     │
//! │  ├── CoreError        - Cart and checkout rule violations              │
//! │  ├── ValidationError  - A single input validation failure              │
//! │  └── FieldErrors      - Per-field messages for a whole form            │
//! │                                                                         │
//! │  stockdesk-client errors (separate crate)                              │
//! │  └── ClientError      - Config, transport, API and session failures    │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → CLI prints per-field messages   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. Include context in error messages (line id, limit, etc.)
//! 3. Errors are enum variants, never String
//! 4. Each error variant maps to a user-facing message

use std::collections::BTreeMap;
use std::fmt;

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Cart and checkout errors.
///
/// The backend owns stock and order rules; these are only the guardrails
/// the POS terminal enforces before a payload leaves the machine.
#[derive(Debug, Error)]
pub enum CoreError {
    /// No cart line with that id.
    #[error("Cart line not found: {0}")]
    LineNotFound(String),

    /// Cart has exceeded maximum allowed lines.
    #[error("Cart cannot have more than {max} items")]
    CartTooLarge { max: usize },

    /// Line quantity exceeds maximum allowed.
    #[error("Quantity {requested} exceeds maximum allowed ({max})")]
    QuantityTooLarge { requested: i64, max: i64 },

    /// Checkout attempted with nothing in the cart.
    #[error("Cart is empty")]
    EmptyCart,

    /// Discount is negative or larger than the subtotal.
    ///
    /// ## User Workflow
    /// ```text
    /// subtotal 250.00, discount 300.00
    ///      │
    ///      ▼
    /// checkout_request()
    ///      │
    ///      ▼
    /// InvalidDiscount { reason: "discount 300.00 exceeds subtotal 250.00" }
    /// ```
    #[error("Invalid discount: {reason}")]
    InvalidDiscount { reason: String },

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
///
/// These errors occur when user input doesn't meet requirements.
/// Used for early validation before a request is sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too short.
    #[error("{field} must be at least {min} characters")]
    TooShort { field: String, min: usize },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Value must not be negative.
    #[error("{field} cannot be negative")]
    Negative { field: String },

    /// Invalid format (e.g., invalid UUID, invalid email).
    #[error("{field} has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    /// Value is not in allowed set.
    #[error("{field} must be one of: {allowed:?}")]
    NotAllowed { field: String, allowed: Vec<String> },
}

impl ValidationError {
    /// Name of the field this error is about.
    pub fn field(&self) -> &str {
        match self {
            ValidationError::Required { field }
            | ValidationError::TooShort { field, .. }
            | ValidationError::TooLong { field, .. }
            | ValidationError::OutOfRange { field, .. }
            | ValidationError::MustBePositive { field }
            | ValidationError::Negative { field }
            | ValidationError::InvalidFormat { field, .. }
            | ValidationError::NotAllowed { field, .. } => field,
        }
    }
}

// =============================================================================
// Field Errors
// =============================================================================

/// Every validation failure for a form, grouped by field.
///
/// Fields iterate in name order so output is stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, Vec<String>>,
}

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a message against a field.
    pub fn add(&mut self, field: impl Into<String>, message: impl Into<String>) {
        self.errors.entry(field.into()).or_default().push(message.into());
    }

    /// Records a validation result, keeping the error under its field.
    pub fn check<T>(&mut self, result: Result<T, ValidationError>) -> Option<T> {
        match result {
            Ok(value) => Some(value),
            Err(err) => {
                self.add(err.field().to_string(), err.to_string());
                None
            }
        }
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Messages recorded for one field.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.errors.get(field).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_slice()))
    }

    /// `Ok(())` when nothing was recorded, otherwise `Err(self)`.
    pub fn into_result(self) -> Result<(), FieldErrors> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(self)
        }
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, messages) in &self.errors {
            for message in messages {
                if !first {
                    writeln!(f)?;
                }
                write!(f, "{}: {}", field, message)?;
                first = false;
            }
        }
        Ok(())
    }
}

impl std::error::Error for FieldErrors {}

// =============================================================================
// Result Type Aliases
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

/// Convenience type alias for single-field validation.
pub type ValidationResult<T> = Result<T, ValidationError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::QuantityTooLarge {
            requested: 1000,
            max: 999,
        };
        assert_eq!(err.to_string(), "Quantity 1000 exceeds maximum allowed (999)");
        assert_eq!(CoreError::EmptyCart.to_string(), "Cart is empty");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "sku".to_string(),
        };
        assert_eq!(err.to_string(), "sku is required");
        assert_eq!(err.field(), "sku");

        let err = ValidationError::TooShort {
            field: "reason".to_string(),
            min: 3,
        };
        assert_eq!(err.to_string(), "reason must be at least 3 characters");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::Required {
            field: "sku".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }

    #[test]
    fn test_field_errors_grouping() {
        let mut errors = FieldErrors::new();
        assert!(errors.check::<()>(Ok(())).is_some());
        errors.check::<()>(Err(ValidationError::Required {
            field: "name".to_string(),
        }));
        errors.add("name", "name is taken");
        errors.add("email", "email has invalid format: missing @");

        assert_eq!(errors.len(), 2);
        assert_eq!(errors.get("name").unwrap().len(), 2);
        assert_eq!(
            errors.to_string(),
            "email: email has invalid format: missing @\nname: name is required\nname: name is taken"
        );
        assert!(errors.into_result().is_err());
        assert!(FieldErrors::new().into_result().is_ok());
    }
}

//! # Validation Module
//!
//! Form validation run before a request leaves the client.
//!
//! ## Validation Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                      Validation Layers                                  │
//! │                                                                         │
//! │  Layer 1: THIS MODULE (client side)                                    │
//! │  ├── Required fields, lengths, formats                                 │
//! │  └── Per-field messages (FieldErrors) for inline display               │
//! │           │                                                             │
//! │           ▼                                                             │
//! │  Layer 2: Backend                                                      │
//! │  ├── Uniqueness (SKU, email)                                           │
//! │  ├── Stock and order rules                                             │
//! │  └── Permission checks                                                 │
//! │                                                                         │
//! │  Layer 1 only saves a round trip; Layer 2 is authoritative.            │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use stockdesk_core::validation::{validate_sku, validate_quantity};
//!
//! validate_sku("COKE-330").unwrap();
//! validate_quantity(5).unwrap();
//! ```

use crate::error::{FieldErrors, ValidationError, ValidationResult};
use crate::money::{Money, TaxRate};
use crate::types::{CreateProduct, CreateVariant, CustomerInput, CustomerType, LoginRequest};
use crate::MAX_ITEM_QUANTITY;

/// Minimum password length accepted by the login form.
pub const MIN_PASSWORD_LEN: usize = 6;

// =============================================================================
// String Validators
// =============================================================================

/// Validates a SKU (Stock Keeping Unit).
///
/// ## Rules
/// - Must not be empty
/// - At most 50 characters
/// - Only alphanumeric characters, hyphens, underscores
///
/// ## Example
/// ```rust
/// use stockdesk_core::validation::validate_sku;
///
/// assert!(validate_sku("COKE-330").is_ok());
/// assert!(validate_sku("").is_err());
/// assert!(validate_sku("A".repeat(100).as_str()).is_err());
/// ```
pub fn validate_sku(sku: &str) -> ValidationResult<()> {
    let sku = sku.trim();

    if sku.is_empty() {
        return Err(ValidationError::Required {
            field: "sku".to_string(),
        });
    }

    if sku.len() > 50 {
        return Err(ValidationError::TooLong {
            field: "sku".to_string(),
            max: 50,
        });
    }

    if !sku
        .chars()
        .all(|c| c.is_alphanumeric() || c == '-' || c == '_')
    {
        return Err(ValidationError::InvalidFormat {
            field: "sku".to_string(),
            reason: "must contain only letters, numbers, hyphens, and underscores".to_string(),
        });
    }

    Ok(())
}

/// Validates a required display name (product, variant, customer, ...).
///
/// ## Rules
/// - Must not be empty
/// - At most 200 characters
pub fn validate_name(field: &str, name: &str) -> ValidationResult<()> {
    let name = name.trim();

    if name.is_empty() {
        return Err(ValidationError::Required {
            field: field.to_string(),
        });
    }

    if name.chars().count() > 200 {
        return Err(ValidationError::TooLong {
            field: field.to_string(),
            max: 200,
        });
    }

    Ok(())
}

/// Validates a product name.
///
/// ```rust
/// use stockdesk_core::validation::validate_product_name;
///
/// assert!(validate_product_name("Coca-Cola 330ml").is_ok());
/// assert!(validate_product_name("").is_err());
/// ```
pub fn validate_product_name(name: &str) -> ValidationResult<()> {
    validate_name("name", name)
}

/// Validates a search query.
///
/// Empty is fine (no filter). Returns the trimmed query.
pub fn validate_search_query(query: &str) -> ValidationResult<String> {
    let query = query.trim();

    if query.len() > 100 {
        return Err(ValidationError::TooLong {
            field: "search".to_string(),
            max: 100,
        });
    }

    Ok(query.to_string())
}

/// Validates an email address.
///
/// Deliberately loose: one `@`, something before it, a dotted domain after
/// it, no whitespace. The backend decides whether the mailbox exists.
pub fn validate_email(email: &str) -> ValidationResult<()> {
    let email = email.trim();
    let invalid = |reason: &str| ValidationError::InvalidFormat {
        field: "email".to_string(),
        reason: reason.to_string(),
    };

    if email.is_empty() {
        return Err(ValidationError::Required {
            field: "email".to_string(),
        });
    }
    if email.chars().any(char::is_whitespace) {
        return Err(invalid("must not contain spaces"));
    }

    let (local, domain) = email.split_once('@').ok_or_else(|| invalid("missing @"))?;
    if local.is_empty() || domain.contains('@') {
        return Err(invalid("invalid address"));
    }
    if !domain.contains('.') || domain.starts_with('.') || domain.ends_with('.') {
        return Err(invalid("invalid domain"));
    }

    Ok(())
}

pub fn validate_password(password: &str) -> ValidationResult<()> {
    if password.is_empty() {
        return Err(ValidationError::Required {
            field: "password".to_string(),
        });
    }
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(ValidationError::TooShort {
            field: "password".to_string(),
            min: MIN_PASSWORD_LEN,
        });
    }
    Ok(())
}

// =============================================================================
// Numeric Validators
// =============================================================================

/// Validates a quantity value.
///
/// ## Rules
/// - Must be positive (> 0)
/// - Must not exceed MAX_ITEM_QUANTITY (999)
///
/// ## User Workflow
/// ```text
/// ┌─────────────────────────────────────────────────────────────────────────┐
/// │  POS: Add Item                                                          │
/// │                                                                         │
/// │  Operator enters quantity: 5                                           │
/// │       │                                                                 │
/// │       ▼                                                                 │
/// │  validate_quantity(5) ← THIS FUNCTION                                  │
/// │       │                                                                 │
/// │       ├── qty <= 0? → Error: "quantity must be positive"               │
/// │       │                                                                 │
/// │       ├── qty > 999? → Error: "quantity must be between 1 and 999"     │
/// │       │                                                                 │
/// │       └── OK → PosCart::add_item                                       │
/// │                                                                         │
/// └─────────────────────────────────────────────────────────────────────────┘
/// ```
pub fn validate_quantity(qty: i64) -> ValidationResult<()> {
    if qty <= 0 {
        return Err(ValidationError::MustBePositive {
            field: "quantity".to_string(),
        });
    }

    if qty > MAX_ITEM_QUANTITY {
        return Err(ValidationError::OutOfRange {
            field: "quantity".to_string(),
            min: 1,
            max: MAX_ITEM_QUANTITY,
        });
    }

    Ok(())
}

/// Validates a stock count (initial or minimum stock). Zero is allowed.
pub fn validate_stock_level(field: &str, value: i64) -> ValidationResult<()> {
    if value < 0 {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }
    Ok(())
}

/// Validates a price.
///
/// Zero is allowed (free items).
///
/// ```rust
/// use stockdesk_core::money::Money;
/// use stockdesk_core::validation::validate_price;
///
/// assert!(validate_price("sellingPrice", Money::from_cents(1099)).is_ok());
/// assert!(validate_price("sellingPrice", Money::zero()).is_ok());
/// assert!(validate_price("sellingPrice", Money::from_cents(-100)).is_err());
/// ```
pub fn validate_price(field: &str, price: Money) -> ValidationResult<()> {
    if price.is_negative() {
        return Err(ValidationError::Negative {
            field: field.to_string(),
        });
    }

    Ok(())
}

/// Validates an order discount. Zero is allowed.
pub fn validate_discount(discount: Money) -> ValidationResult<()> {
    validate_price("discount", discount)
}

/// Validates a tax rate.
///
/// ## Rules
/// - Between 0% and 100% (0 to 10000 bps)
pub fn validate_tax_rate(rate: TaxRate) -> ValidationResult<()> {
    if rate.bps() > 10000 {
        return Err(ValidationError::OutOfRange {
            field: "tax".to_string(),
            min: 0,
            max: 100,
        });
    }

    Ok(())
}

// =============================================================================
// Form Validators
// =============================================================================

/// Login form: valid email and a password of at least six characters.
pub fn login_request(email: &str, password: &str) -> Result<LoginRequest, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check(validate_email(email));
    errors.check(validate_password(password));
    errors.into_result()?;

    Ok(LoginRequest {
        email: email.trim().to_string(),
        password: password.to_string(),
    })
}

/// Customer form. Name is required; an empty email is treated as absent.
pub fn customer_input(
    name: &str,
    email: Option<&str>,
    phone: Option<&str>,
    customer_type: Option<CustomerType>,
    notes: Option<&str>,
) -> Result<CustomerInput, FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check(validate_name("name", name));

    let email = non_blank(email);
    if let Some(email) = &email {
        errors.check(validate_email(email));
    }
    errors.into_result()?;

    Ok(CustomerInput {
        name: Some(name.trim().to_string()),
        email,
        phone: non_blank(phone),
        customer_type,
        notes: non_blank(notes),
    })
}

/// Product create form.
pub fn validate_create_product(product: &CreateProduct) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check(validate_sku(&product.sku));
    errors.check(validate_product_name(&product.name));
    errors.check(validate_price("sellingPrice", product.selling_price));
    if let Some(cost) = product.cost_price {
        errors.check(validate_price("costPrice", cost));
    }
    if let Some(initial) = product.initial_stock {
        errors.check(validate_stock_level("initialStock", initial));
    }
    if let Some(minimum) = product.minimum_stock {
        errors.check(validate_stock_level("minimumStock", minimum));
    }
    errors.into_result()
}

/// Variant create form.
pub fn validate_create_variant(variant: &CreateVariant) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::new();
    errors.check(validate_name("name", &variant.name));
    errors.check(validate_sku(&variant.sku));
    errors.check(validate_price("sellingPrice", variant.selling_price));
    if let Some(cost) = variant.cost_price {
        errors.check(validate_price("costPrice", cost));
    }
    if let Some(initial) = variant.initial_stock {
        errors.check(validate_stock_level("initialStock", initial));
    }
    if let Some(minimum) = variant.minimum_stock {
        errors.check(validate_stock_level("minimumStock", minimum));
    }
    errors.into_result()
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_sku() {
        assert!(validate_sku("COKE-330").is_ok());
        assert!(validate_sku("ABC123").is_ok());
        assert!(validate_sku("product_1").is_ok());

        assert!(validate_sku("").is_err());
        assert!(validate_sku("   ").is_err());
        assert!(validate_sku("has space").is_err());
        assert!(validate_sku(&"A".repeat(100)).is_err());
    }

    #[test]
    fn test_validate_product_name() {
        assert!(validate_product_name("Coca-Cola 330ml").is_ok());
        assert!(validate_product_name("").is_err());
        assert!(validate_product_name(&"A".repeat(300)).is_err());
    }

    #[test]
    fn test_validate_quantity() {
        assert!(validate_quantity(1).is_ok());
        assert!(validate_quantity(999).is_ok());

        assert!(validate_quantity(0).is_err());
        assert!(validate_quantity(-1).is_err());
        assert!(validate_quantity(1000).is_err());
    }

    #[test]
    fn test_validate_email() {
        assert!(validate_email("staff@shop.example").is_ok());
        assert!(validate_email("  staff@shop.example ").is_ok());

        assert!(matches!(validate_email(""), Err(ValidationError::Required { .. })));
        assert!(validate_email("staff.shop.example").is_err());
        assert!(validate_email("@shop.example").is_err());
        assert!(validate_email("staff@localhost").is_err());
        assert!(validate_email("st aff@shop.example").is_err());
        assert!(validate_email("a@b@c.example").is_err());
    }

    #[test]
    fn test_login_request() {
        let login = login_request(" amina@shop.example ", "secret1").unwrap();
        assert_eq!(login.email, "amina@shop.example");

        let errors = login_request("nope", "123").unwrap_err();
        assert_eq!(errors.len(), 2);
        assert_eq!(
            errors.get("password").unwrap()[0],
            "password must be at least 6 characters"
        );
    }

    #[test]
    fn test_customer_input() {
        let input = customer_input("  Jo Bloggs ", Some(""), Some(" 0300 "), None, None).unwrap();
        assert_eq!(input.name.as_deref(), Some("Jo Bloggs"));
        assert_eq!(input.email, None);
        assert_eq!(input.phone.as_deref(), Some("0300"));

        let errors = customer_input("", Some("bad"), None, Some(CustomerType::Regular), None)
            .unwrap_err();
        assert!(errors.get("name").is_some());
        assert!(errors.get("email").is_some());
    }

    #[test]
    fn test_validate_create_product() {
        let mut product = CreateProduct {
            sku: "TEA-1".to_string(),
            name: "Green tea".to_string(),
            selling_price: Money::from_cents(250),
            ..Default::default()
        };
        assert!(validate_create_product(&product).is_ok());

        product.minimum_stock = Some(-1);
        product.cost_price = Some(Money::from_cents(-5));
        let errors = validate_create_product(&product).unwrap_err();
        assert!(errors.get("minimumStock").is_some());
        assert!(errors.get("costPrice").is_some());
    }

    #[test]
    fn test_validate_tax_rate() {
        assert!(validate_tax_rate(TaxRate::zero()).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(825)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(10000)).is_ok());
        assert!(validate_tax_rate(TaxRate::from_bps(10001)).is_err());
        assert!(validate_discount(Money::from_cents(-1)).is_err());
    }
}

//! # Money Module
//!
//! Provides `Money` and `TaxRate`, the two numeric types every price, total
//! and tax figure flows through.
//!
//! ## Why Integer Money?
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  THE FLOATING POINT PROBLEM                                             │
//! │                                                                         │
//! │  The backend sends prices as JSON numbers:  { "unitPrice": 10.99 }      │
//! │  Summing them as floats drifts:                                         │
//! │    0.1 + 0.2 = 0.30000000000000004  ❌                                  │
//! │                                                                         │
//! │  OUR SOLUTION: parse the decimal TEXT, never do float math              │
//! │    "10.99"  ──►  1099 cents  (exact)                                    │
//! │    10.99    ──►  "10.99" (shortest repr) ──► 1099 cents                 │
//! │                                                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Wire Format
//! | Type      | In memory           | On the wire                    |
//! |-----------|---------------------|--------------------------------|
//! | `Money`   | i64 cents           | number in major units, `12.5`  |
//! | `TaxRate` | u32 basis points    | percent number, `8.25`         |
//!
//! Both also accept decimal strings (`"12.50"`), which is how some
//! databases serialise numeric columns.
//!
//! Amounts beyond [`MAX_AMOUNT_CENTS`] are rejected when parsed or
//! deserialized, and `Money` arithmetic saturates rather than overflowing.
//!
//! ## Usage
//! ```rust
//! use stockdesk_core::money::Money;
//!
//! let price = Money::parse("10.99").unwrap();
//! assert_eq!(price.cents(), 1099);
//!
//! let line = price * 3;
//! assert_eq!(line.to_string(), "32.97");
//! ```

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::iter::Sum;
use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::error::ValidationError;

/// Largest accepted amount magnitude: 100 billion in major units.
///
/// 100 lines of 999 units at this price still fit in an `i64`.
pub const MAX_AMOUNT_CENTS: i64 = 10_000_000_000_000;

fn amount_in_range(cents: i64) -> bool {
    (-MAX_AMOUNT_CENTS..=MAX_AMOUNT_CENTS).contains(&cents)
}

// =============================================================================
// Decimal Parsing
// =============================================================================

/// Parses decimal text into hundredths (two implied fraction digits).
///
/// Digits past the second decimal place round half away from zero.
/// Returns `None` for anything that is not a plain decimal literal.
fn parse_hundredths(text: &str) -> Option<i64> {
    let text = text.trim();
    let (negative, digits) = match text.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, text.strip_prefix('+').unwrap_or(text)),
    };

    let (whole, fraction) = digits.split_once('.').unwrap_or((digits, ""));
    if whole.is_empty() && fraction.is_empty() {
        return None;
    }
    if !whole.bytes().all(|b| b.is_ascii_digit()) || !fraction.bytes().all(|b| b.is_ascii_digit())
    {
        return None;
    }

    let whole_value: i64 = if whole.is_empty() { 0 } else { whole.parse().ok()? };

    let mut fraction_digits = fraction.bytes().map(|b| i64::from(b - b'0'));
    let tenths = fraction_digits.next().unwrap_or(0);
    let hundredths = fraction_digits.next().unwrap_or(0);
    let round_up = fraction_digits.next().is_some_and(|d| d >= 5);

    let mut value = whole_value
        .checked_mul(100)?
        .checked_add(tenths * 10 + hundredths)?;
    if round_up {
        value = value.checked_add(1)?;
    }

    Some(if negative { -value } else { value })
}

/// Visitor shared by `Money` and `TaxRate`: numbers or numeric strings,
/// always yielding hundredths.
struct HundredthsVisitor;

impl<'de> Visitor<'de> for HundredthsVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or numeric string")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<i64, E> {
        v.checked_mul(100)
            .ok_or_else(|| E::custom(format!("amount {} out of range", v)))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<i64, E> {
        i64::try_from(v)
            .ok()
            .and_then(|v| v.checked_mul(100))
            .ok_or_else(|| E::custom(format!("amount {} out of range", v)))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<i64, E> {
        // Display for f64 is the shortest round-trip text and never uses an
        // exponent, so 10.99 becomes "10.99" rather than 10.9899999...
        let text = v.to_string();
        parse_hundredths(&text).ok_or_else(|| E::custom(format!("invalid amount {}", text)))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<i64, E> {
        parse_hundredths(v).ok_or_else(|| E::custom(format!("invalid amount '{}'", v)))
    }
}

/// Writes hundredths as the most compact JSON number.
fn serialize_hundredths<S: Serializer>(value: i64, serializer: S) -> Result<S::Ok, S::Error> {
    if value % 100 == 0 {
        serializer.serialize_i64(value / 100)
    } else {
        serializer.serialize_f64(value as f64 / 100.0)
    }
}

// =============================================================================
// Money Type
// =============================================================================

/// A monetary value in the smallest currency unit (cents).
///
/// ## Design Decisions
/// - **i64 (signed)**: discounts and refunds can go negative
/// - **Single field tuple struct**: zero-cost abstraction over i64
/// - **Custom serde**: the backend speaks major units, we store cents
///
/// ## Where Money is Used
/// ```text
/// Product.selling_price ──► CartLine.unit_price ──► CartLine.line_total
///                                                        │
/// PosCart.subtotal ─► − discount ─► tax ─► PosCart.total ─► CreateOrder
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Money(i64);

impl Money {
    /// Creates a Money value from cents.
    ///
    /// ```rust
    /// use stockdesk_core::money::Money;
    ///
    /// assert_eq!(Money::from_cents(1099).cents(), 1099);
    /// ```
    #[inline]
    pub const fn from_cents(cents: i64) -> Self {
        Money(cents)
    }

    /// Creates a Money value from whole major units.
    #[inline]
    pub const fn from_major(major: i64) -> Self {
        Money(major.saturating_mul(100))
    }

    /// Parses decimal text such as `"12.5"`, `"-3"` or `"0.125"`.
    ///
    /// Extra fraction digits round half away from zero.
    ///
    /// ```rust
    /// use stockdesk_core::money::Money;
    ///
    /// assert_eq!(Money::parse("12.5").unwrap().cents(), 1250);
    /// assert_eq!(Money::parse("0.125").unwrap().cents(), 13);
    /// assert!(Money::parse("twelve").is_err());
    /// assert!(Money::parse("900000000000000").is_err());
    /// ```
    pub fn parse(text: &str) -> Result<Self, ValidationError> {
        let cents = parse_hundredths(text).ok_or_else(|| ValidationError::InvalidFormat {
            field: "amount".to_string(),
            reason: format!("'{}' is not a decimal number", text.trim()),
        })?;
        if !amount_in_range(cents) {
            return Err(ValidationError::OutOfRange {
                field: "amount".to_string(),
                min: -MAX_AMOUNT_CENTS / 100,
                max: MAX_AMOUNT_CENTS / 100,
            });
        }
        Ok(Money(cents))
    }

    /// Returns the value in cents.
    #[inline]
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Returns the whole major-unit portion (truncated toward zero).
    #[inline]
    pub const fn major(&self) -> i64 {
        self.0 / 100
    }

    /// Returns the minor-unit portion (always 0-99).
    #[inline]
    pub const fn cents_part(&self) -> i64 {
        (self.0 % 100).abs()
    }

    /// Returns zero.
    #[inline]
    pub const fn zero() -> Self {
        Money(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn is_negative(&self) -> bool {
        self.0 < 0
    }

    /// Returns the absolute value.
    #[inline]
    pub const fn abs(&self) -> Self {
        Money(self.0.abs())
    }

    /// Applies a percentage rate, rounding half away from zero to the cent.
    ///
    /// ## Implementation
    /// Integer math in i128: `(amount × bps ± 5000) / 10000`.
    ///
    /// ```rust
    /// use stockdesk_core::money::{Money, TaxRate};
    ///
    /// let base = Money::from_major(230);
    /// assert_eq!(base.calculate_tax(TaxRate::from_bps(1000)), Money::from_major(23));
    ///
    /// // 10.00 at 8.25% = 0.825 → 0.83
    /// assert_eq!(Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825)).cents(), 83);
    /// ```
    pub fn calculate_tax(&self, rate: TaxRate) -> Money {
        let raw = self.0 as i128 * rate.bps() as i128;
        let rounded = if raw >= 0 {
            (raw + 5000) / 10000
        } else {
            (raw - 5000) / 10000
        };
        let clamped = rounded.clamp(i128::from(i64::MIN), i128::from(i64::MAX));
        Money(clamped as i64)
    }
}

// =============================================================================
// Trait Implementations
// =============================================================================

/// Plain decimal with two fraction digits, no currency symbol.
/// Currency presentation is left to whoever renders the figure.
impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        write!(f, "{}{}.{:02}", sign, self.major().abs(), self.cents_part())
    }
}

impl Serialize for Money {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_hundredths(self.0, serializer)
    }
}

impl<'de> Deserialize<'de> for Money {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let cents = deserializer.deserialize_any(HundredthsVisitor)?;
        if !amount_in_range(cents) {
            return Err(de::Error::custom(format!(
                "amount {} out of range",
                Money(cents)
            )));
        }
        Ok(Money(cents))
    }
}

impl Add for Money {
    type Output = Self;

    #[inline]
    fn add(self, other: Self) -> Self {
        Money(self.0.saturating_add(other.0))
    }
}

impl AddAssign for Money {
    #[inline]
    fn add_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_add(other.0);
    }
}

impl Sub for Money {
    type Output = Self;

    #[inline]
    fn sub(self, other: Self) -> Self {
        Money(self.0.saturating_sub(other.0))
    }
}

impl SubAssign for Money {
    #[inline]
    fn sub_assign(&mut self, other: Self) {
        self.0 = self.0.saturating_sub(other.0);
    }
}

impl Neg for Money {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Money(self.0.saturating_neg())
    }
}

impl Mul<i64> for Money {
    type Output = Self;

    #[inline]
    fn mul(self, qty: i64) -> Self {
        Money(self.0.saturating_mul(qty))
    }
}

impl Sum for Money {
    fn sum<I: Iterator<Item = Money>>(iter: I) -> Self {
        iter.fold(Money::zero(), |acc, m| acc + m)
    }
}

// =============================================================================
// Tax Rate
// =============================================================================

/// Tax rate in basis points (bps).
///
/// ## Why Basis Points?
/// 1 basis point = 0.01%, so 825 bps = 8.25%. Operators type percentages
/// like `8.25`; storing hundredths of a percent keeps that exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct TaxRate(u32);

impl TaxRate {
    #[inline]
    pub const fn from_bps(bps: u32) -> Self {
        TaxRate(bps)
    }

    /// Parses a percentage such as `"10"` or `"8.25"`.
    ///
    /// ```rust
    /// use stockdesk_core::money::TaxRate;
    ///
    /// assert_eq!(TaxRate::parse_percent("8.25").unwrap().bps(), 825);
    /// assert!(TaxRate::parse_percent("-1").is_err());
    /// ```
    pub fn parse_percent(text: &str) -> Result<Self, ValidationError> {
        let hundredths = parse_hundredths(text).ok_or_else(|| ValidationError::InvalidFormat {
            field: "tax".to_string(),
            reason: format!("'{}' is not a percentage", text.trim()),
        })?;
        u32::try_from(hundredths)
            .map(TaxRate)
            .map_err(|_| ValidationError::OutOfRange {
                field: "tax".to_string(),
                min: 0,
                max: i64::from(u32::MAX),
            })
    }

    #[inline]
    pub const fn bps(&self) -> u32 {
        self.0
    }

    /// Rate as a percentage (for display only).
    #[inline]
    pub fn percentage(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    #[inline]
    pub const fn zero() -> Self {
        TaxRate(0)
    }

    #[inline]
    pub const fn is_zero(&self) -> bool {
        self.0 == 0
    }
}

impl fmt::Display for TaxRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0 % 100 == 0 {
            write!(f, "{}%", self.0 / 100)
        } else {
            write!(f, "{}.{:02}%", self.0 / 100, self.0 % 100)
        }
    }
}

impl Serialize for TaxRate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serialize_hundredths(i64::from(self.0), serializer)
    }
}

impl<'de> Deserialize<'de> for TaxRate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let hundredths = deserializer.deserialize_any(HundredthsVisitor)?;
        u32::try_from(hundredths)
            .map(TaxRate)
            .map_err(|_| de::Error::custom(format!("tax rate {} out of range", hundredths)))
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_decimal_text() {
        assert_eq!(Money::parse("10.99").unwrap().cents(), 1099);
        assert_eq!(Money::parse("10.9").unwrap().cents(), 1090);
        assert_eq!(Money::parse("10").unwrap().cents(), 1000);
        assert_eq!(Money::parse(".5").unwrap().cents(), 50);
        assert_eq!(Money::parse("-5.50").unwrap().cents(), -550);
        assert_eq!(Money::parse(" 7.005 ").unwrap().cents(), 701);
        assert_eq!(Money::parse("7.004").unwrap().cents(), 700);

        assert!(Money::parse("").is_err());
        assert!(Money::parse(".").is_err());
        assert!(Money::parse("1e3").is_err());
        assert!(Money::parse("1,000").is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(Money::from_cents(1099).to_string(), "10.99");
        assert_eq!(Money::from_cents(500).to_string(), "5.00");
        assert_eq!(Money::from_cents(-550).to_string(), "-5.50");
        assert_eq!(Money::zero().to_string(), "0.00");
    }

    #[test]
    fn test_deserialize_numbers_and_strings() {
        let m: Money = serde_json::from_str("10.99").unwrap();
        assert_eq!(m.cents(), 1099);

        let m: Money = serde_json::from_str("250").unwrap();
        assert_eq!(m.cents(), 25000);

        let m: Money = serde_json::from_str("\"12.50\"").unwrap();
        assert_eq!(m.cents(), 1250);

        let m: Money = serde_json::from_str("0.1").unwrap();
        assert_eq!(m.cents(), 10);

        assert!(serde_json::from_str::<Money>("\"abc\"").is_err());
        assert!(serde_json::from_str::<Money>("true").is_err());
    }

    #[test]
    fn test_amount_bound() {
        assert!(serde_json::from_str::<Money>("\"90000000000000000\"").is_err());
        assert!(serde_json::from_str::<Money>("90000000000000000").is_err());
        assert!(matches!(
            Money::parse("-200000000000"),
            Err(ValidationError::OutOfRange { .. })
        ));

        let max: Money = serde_json::from_str("100000000000").unwrap();
        assert_eq!(max.cents(), MAX_AMOUNT_CENTS);
    }

    #[test]
    fn test_arithmetic_saturates() {
        let big = Money::from_cents(i64::MAX - 1);
        assert_eq!((big + Money::from_cents(5)).cents(), i64::MAX);
        assert_eq!((big * 2).cents(), i64::MAX);
        assert_eq!((-big - Money::from_cents(10)).cents(), i64::MIN);

        let mut total = big;
        total += Money::from_cents(5);
        assert_eq!(total.cents(), i64::MAX);
        assert_eq!(
            big.calculate_tax(TaxRate::from_bps(u32::MAX)).cents(),
            i64::MAX
        );
    }

    #[test]
    fn test_serialize_major_units() {
        assert_eq!(serde_json::to_string(&Money::from_cents(25000)).unwrap(), "250");
        assert_eq!(serde_json::to_string(&Money::from_cents(1099)).unwrap(), "10.99");
        assert_eq!(serde_json::to_string(&Money::from_cents(-50)).unwrap(), "-0.5");
    }

    #[test]
    fn test_arithmetic_and_sum() {
        let a = Money::from_cents(1000);
        let b = Money::from_cents(500);

        assert_eq!((a + b).cents(), 1500);
        assert_eq!((a - b).cents(), 500);
        assert_eq!((a * 3).cents(), 3000);
        assert_eq!((-a).cents(), -1000);

        let total: Money = vec![a, b, b].into_iter().sum();
        assert_eq!(total.cents(), 2000);
    }

    #[test]
    fn test_tax_rounding() {
        // 10.00 at 8.25% = 0.825 → 0.83
        assert_eq!(Money::from_cents(1000).calculate_tax(TaxRate::from_bps(825)).cents(), 83);
        // Symmetric for negative bases
        assert_eq!(Money::from_cents(-1000).calculate_tax(TaxRate::from_bps(825)).cents(), -83);
        assert_eq!(Money::from_cents(1234).calculate_tax(TaxRate::zero()).cents(), 0);
    }

    #[test]
    fn test_tax_rate_wire_format() {
        let rate: TaxRate = serde_json::from_str("8.25").unwrap();
        assert_eq!(rate.bps(), 825);
        let rate: TaxRate = serde_json::from_str("10").unwrap();
        assert_eq!(rate.bps(), 1000);
        assert!(serde_json::from_str::<TaxRate>("-2").is_err());

        assert_eq!(serde_json::to_string(&TaxRate::from_bps(1000)).unwrap(), "10");
        assert_eq!(serde_json::to_string(&TaxRate::from_bps(825)).unwrap(), "8.25");
    }

    #[test]
    fn test_tax_rate_display() {
        assert_eq!(TaxRate::from_bps(1000).to_string(), "10%");
        assert_eq!(TaxRate::from_bps(825).to_string(), "8.25%");
        assert_eq!(TaxRate::from_bps(5).to_string(), "0.05%");
    }
}

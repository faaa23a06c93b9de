//! Numeric value types
//!
//! Domain primitives for prices, shoe sizes and stock quantities.
//! Values are validated at construction time, so a `Price` or `Quantity`
//! that reaches the store is always within range.

use rust_decimal::Decimal;
use std::fmt;

use super::error::DomainError;

/// Maximum allowed unit price
const MAX_PRICE: i64 = 1_000_000_000;

/// Maximum decimal places for money (cents)
const MONEY_SCALE: u32 = 2;

/// Maximum decimal places for sizes (half and quarter sizes)
const SIZE_SCALE: u32 = 2;

/// Largest shoe size accepted across EU/US/UK scales
const MAX_SIZE: i64 = 60;

/// Maximum product rating
const MAX_RATING: i64 = 5;

/// Maximum decimal places for ratings
const RATING_SCALE: u32 = 2;

/// Largest purchase total a NUMERIC(14, 2) column holds, in cents
const MAX_TOTAL_CENTS: i64 = 99_999_999_999_999;

/// Price represents a validated, non-negative monetary value.
///
/// # Invariants
/// - Value is zero or positive
/// - At most 2 decimal places
/// - At most 1 billion
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Price(Decimal);

impl Price {
    pub fn new(field: &'static str, value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::Negative {
                field,
                value: value.to_string(),
            });
        }

        let value = value.normalize();
        if value.scale() > MONEY_SCALE {
            return Err(DomainError::TooManyDecimals {
                field,
                max: MONEY_SCALE,
                got: value.scale(),
            });
        }

        if value > Decimal::from(MAX_PRICE) {
            return Err(DomainError::OutOfRange {
                field,
                value: value.to_string(),
            });
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }

    /// Multiply by a quantity, e.g. for purchase totals
    pub fn times(&self, quantity: Quantity) -> Decimal {
        self.0 * Decimal::from(quantity.value())
    }
}

impl fmt::Display for Price {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.2}", self.0)
    }
}

/// Size of a stock line (shoe size), zero or positive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Size(Decimal);

impl Size {
    pub fn new(value: Decimal) -> Result<Self, DomainError> {
        if value.is_sign_negative() && !value.is_zero() {
            return Err(DomainError::Negative {
                field: "size",
                value: value.to_string(),
            });
        }

        let value = value.normalize();
        if value.scale() > SIZE_SCALE {
            return Err(DomainError::TooManyDecimals {
                field: "size",
                max: SIZE_SCALE,
                got: value.scale(),
            });
        }

        if value > Decimal::from(MAX_SIZE) {
            return Err(DomainError::OutOfRange {
                field: "size",
                value: value.to_string(),
            });
        }

        Ok(Self(value))
    }

    pub fn value(&self) -> Decimal {
        self.0
    }
}

/// Count of units, never negative.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Quantity(i32);

impl Quantity {
    /// Zero or more units (stock on hand)
    pub fn new(field: &'static str, value: i32) -> Result<Self, DomainError> {
        if value < 0 {
            return Err(DomainError::Negative {
                field,
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    /// At least one unit (sales, purchases)
    pub fn positive(field: &'static str, value: i32) -> Result<Self, DomainError> {
        if value <= 0 {
            return Err(DomainError::NotPositive {
                field,
                value: value.to_string(),
            });
        }
        Ok(Self(value))
    }

    pub fn value(&self) -> i32 {
        self.0
    }
}

/// Validate a 0-5 product rating with at most two decimals
pub fn validate_rating(value: Decimal) -> Result<Decimal, DomainError> {
    if value < Decimal::ZERO || value > Decimal::from(MAX_RATING) {
        return Err(DomainError::OutOfRange {
            field: "rating",
            value: value.to_string(),
        });
    }

    let value = value.normalize();
    if value.scale() > RATING_SCALE {
        return Err(DomainError::TooManyDecimals {
            field: "rating",
            max: RATING_SCALE,
            got: value.scale(),
        });
    }
    Ok(value)
}

/// Reject computed totals the ledger columns cannot store
pub fn validate_total(field: &'static str, value: Decimal) -> Result<Decimal, DomainError> {
    if value > Decimal::new(MAX_TOTAL_CENTS, MONEY_SCALE) {
        return Err(DomainError::OutOfRange {
            field,
            value: value.to_string(),
        });
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_price_accepts_zero_and_cents() {
        assert_eq!(Price::new("price", dec!(0)).unwrap().value(), dec!(0));
        assert_eq!(Price::new("price", dec!(129.99)).unwrap().value(), dec!(129.99));
    }

    #[test]
    fn test_price_negative_rejected() {
        let result = Price::new("price", dec!(-1));
        assert!(matches!(result, Err(DomainError::Negative { field: "price", .. })));
    }

    #[test]
    fn test_price_sub_cent_rejected() {
        let result = Price::new("price", dec!(10.005));
        assert!(matches!(
            result,
            Err(DomainError::TooManyDecimals { max: 2, got: 3, .. })
        ));
    }

    #[test]
    fn test_price_trailing_zeros_are_not_extra_decimals() {
        // 10.500 normalizes to 10.5
        let price = Price::new("price", dec!(10.500)).unwrap();
        assert_eq!(price.value(), dec!(10.5));
    }

    #[test]
    fn test_price_overflow() {
        let result = Price::new("price", dec!(1000000000.01));
        assert!(matches!(result, Err(DomainError::OutOfRange { .. })));
    }

    #[test]
    fn test_price_times_quantity() {
        let price = Price::new("unitCost", dec!(45.50)).unwrap();
        let qty = Quantity::positive("quantity", 3).unwrap();
        assert_eq!(price.times(qty), dec!(136.50));
    }

    #[test]
    fn test_size_half_sizes() {
        assert_eq!(Size::new(dec!(10.5)).unwrap().value(), dec!(10.5));
        assert!(Size::new(dec!(-9)).is_err());
        assert!(Size::new(dec!(61)).is_err());
    }

    #[test]
    fn test_quantity_bounds() {
        assert!(Quantity::new("quantity", 0).is_ok());
        assert!(Quantity::new("quantity", -1).is_err());
        assert!(Quantity::positive("quantity", 0).is_err());
        assert_eq!(Quantity::positive("quantity", 2).unwrap().value(), 2);
    }

    #[test]
    fn test_rating_range() {
        assert!(validate_rating(dec!(4.5)).is_ok());
        assert!(validate_rating(dec!(5.1)).is_err());
        assert!(validate_rating(dec!(-0.1)).is_err());
    }

    #[test]
    fn test_rating_limited_to_two_decimals() {
        assert_eq!(validate_rating(dec!(4.50)).unwrap(), dec!(4.5));
        assert!(matches!(
            validate_rating(dec!(4.555)),
            Err(DomainError::TooManyDecimals { field: "rating", max: 2, got: 3 })
        ));
    }

    #[test]
    fn test_total_fits_ledger_column() {
        assert!(validate_total("totalCost", dec!(999999999999.99)).is_ok());
        assert!(matches!(
            validate_total("totalCost", dec!(1000000000000)),
            Err(DomainError::OutOfRange { field: "totalCost", .. })
        ));
    }
}

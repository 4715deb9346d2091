//! Field-level validation applied before any write reaches the store.
//!
//! The schema's `CHECK` constraints repeat the numeric rules at the storage
//! layer; these checks reject bad values first with a field-precise error.

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;

use crate::error::StoreError;

static EMAIL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("email pattern is valid")
});

/// Largest value a `decimal(10,2)` money column admits, exclusive.
static MONEY_LIMIT: Lazy<Decimal> = Lazy::new(|| Decimal::from(100_000_000_i64));

pub(crate) fn require_text(
    field: &'static str,
    value: &str,
    max_len: usize,
) -> Result<(), StoreError> {
    if value.trim().is_empty() {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "must not be empty".to_string(),
        });
    }
    text_length(field, value, max_len)
}

pub(crate) fn optional_text(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<(), StoreError> {
    match value {
        Some(text) => text_length(field, text, max_len),
        None => Ok(()),
    }
}

fn text_length(field: &'static str, value: &str, max_len: usize) -> Result<(), StoreError> {
    if value.chars().count() > max_len {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: format!("must be at most {max_len} characters"),
        });
    }
    Ok(())
}

/// Monetary amount: non-negative, at most 2 fractional digits, below 10^8.
pub(crate) fn money(field: &'static str, value: Decimal) -> Result<(), StoreError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "must not be negative".to_string(),
        });
    }
    if value.scale() > 2 && value.normalize().scale() > 2 {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "must have at most 2 fractional digits".to_string(),
        });
    }
    if value >= *MONEY_LIMIT {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "exceeds the largest storable amount".to_string(),
        });
    }
    Ok(())
}

/// Weight in kilograms: at most 3 fractional digits, magnitude below 10^5.
pub(crate) fn weight(field: &'static str, value: Decimal) -> Result<(), StoreError> {
    if value.scale() > 3 && value.normalize().scale() > 3 {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "must have at most 3 fractional digits".to_string(),
        });
    }
    if value.abs() >= Decimal::from(100_000_i64) {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "exceeds the largest storable weight".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn email(field: &'static str, value: &str) -> Result<(), StoreError> {
    if !EMAIL_RE.is_match(value) {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "is not a valid e-mail address".to_string(),
        });
    }
    Ok(())
}

pub(crate) fn optional_email(
    field: &'static str,
    value: Option<&str>,
) -> Result<(), StoreError> {
    match value {
        Some(address) => email(field, address),
        None => Ok(()),
    }
}

/// Review rating: integer in `[1, 5]`.
pub(crate) fn rating(field: &'static str, value: u8) -> Result<(), StoreError> {
    if !(1..=5).contains(&value) {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "must be between 1 and 5".to_string(),
        });
    }
    Ok(())
}

/// Order line quantity: at least 1.
pub(crate) fn quantity(field: &'static str, value: u32) -> Result<(), StoreError> {
    if value == 0 {
        return Err(StoreError::Validation {
            field: field.to_string(),
            message: "must be at least 1".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn rejects_negative_money() {
        assert!(money("price", Decimal::from_str("-0.01").unwrap()).is_err());
        assert!(money("price", Decimal::ZERO).is_ok());
        assert!(money("price", Decimal::from_str("19.99").unwrap()).is_ok());
    }

    #[test]
    fn rejects_sub_cent_money() {
        assert!(money("price", Decimal::from_str("1.999").unwrap()).is_err());
        // Trailing zeros beyond the scale are not an error.
        assert!(money("price", Decimal::from_str("1.990").unwrap()).is_ok());
    }

    #[test]
    fn rejects_oversized_money() {
        assert!(money("price", Decimal::from(100_000_000_i64)).is_err());
        assert!(money("price", Decimal::from_str("99999999.99").unwrap()).is_ok());
    }

    #[test]
    fn validates_email_shape() {
        assert!(email("email", "ada@example.com").is_ok());
        assert!(email("email", "not-an-address").is_err());
        assert!(email("email", "a b@example.com").is_err());
        assert!(optional_email("email", None).is_ok());
    }

    #[test]
    fn validates_rating_bounds() {
        assert!(rating("rating", 0).is_err());
        assert!(rating("rating", 1).is_ok());
        assert!(rating("rating", 5).is_ok());
        assert!(rating("rating", 6).is_err());
    }

    #[test]
    fn validates_quantity() {
        assert!(quantity("quantity", 0).is_err());
        assert!(quantity("quantity", 1).is_ok());
    }

    #[test]
    fn validates_required_text() {
        assert!(require_text("name", "Books", 100).is_ok());
        assert!(require_text("name", "  ", 100).is_err());
        assert!(require_text("name", &"x".repeat(101), 100).is_err());
    }
}

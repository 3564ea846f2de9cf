//! Payload validation shared by services.
//!
//! Each check returns the cleaned value or a `ValidationError` naming the field.

use std::{fmt::Display, sync::LazyLock};

use regex::Regex;
use rust_decimal::Decimal;

use crate::server::{
    error::{validation::ValidationError, Error},
    util::location,
};

pub const MIN_PASSWORD_LENGTH: usize = 8;
pub const MIN_BID_PRICE: i64 = 1;
pub const MAX_BID_PRICE: i64 = 1_000_000;
pub const MIN_DELIVERY_DAYS: i32 = 1;
pub const MAX_DELIVERY_DAYS: i32 = 365;
pub const MIN_RATING: i32 = 1;
pub const MAX_RATING: i32 = 5;
pub const MIN_COMMENT_LENGTH: usize = 10;
pub const MAX_COMMENT_LENGTH: usize = 500;
pub const MAX_MESSAGE_LENGTH: usize = 500;
pub const MAX_NAME_LENGTH: usize = 100;
pub const MAX_TEXT_LENGTH: usize = 200;
pub const MAX_NOTES_LENGTH: usize = 1000;

/// `+9665XXXXXXXX` or `05XXXXXXXX`, ASCII digits only
static SAUDI_MOBILE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(\+9665[0-9]{8}|05[0-9]{8})$").expect("Saudi mobile pattern must compile")
});

/// Minimum shipment weight, 0.1 kg.
pub fn min_weight() -> Decimal {
    Decimal::new(1, 1)
}

pub fn max_weight() -> Decimal {
    Decimal::from(100_000)
}

/// Trimmed non-empty text no longer than `max_len` characters.
pub fn required(field: &'static str, value: &str, max_len: usize) -> Result<String, Error> {
    let value = value.trim();

    if value.is_empty() {
        return Err(ValidationError::field(field, format!("{} is required", field)).into());
    }
    if value.chars().count() > max_len {
        return Err(ValidationError::field(
            field,
            format!("{} must be at most {} characters", field, max_len),
        )
        .into());
    }

    Ok(value.to_string())
}

/// Trimmed optional text, blank values become `None`.
pub fn optional(
    field: &'static str,
    value: Option<&str>,
    max_len: usize,
) -> Result<Option<String>, Error> {
    match value.map(str::trim).filter(|v| !v.is_empty()) {
        Some(v) => required(field, v, max_len).map(Some),
        None => Ok(None),
    }
}

/// Lowercased email with a local part and a dotted domain.
pub fn email(field: &'static str, value: &str) -> Result<String, Error> {
    let value = value.trim().to_ascii_lowercase();

    let valid = match value.split_once('@') {
        Some((local, domain)) => {
            !local.is_empty()
                && !domain.contains('@')
                && domain.contains('.')
                && !domain.starts_with('.')
                && !domain.ends_with('.')
                && !value.contains(char::is_whitespace)
        }
        None => false,
    };

    if !valid {
        return Err(ValidationError::field(field, "Please enter a valid email address").into());
    }

    Ok(value)
}

/// Saudi mobile number, either `+9665XXXXXXXX` or `05XXXXXXXX`.
pub fn phone(field: &'static str, value: &str) -> Result<String, Error> {
    let value = value.trim();

    if !SAUDI_MOBILE.is_match(value) {
        return Err(ValidationError::field(
            field,
            "Phone number must be a Saudi mobile number (05XXXXXXXX or +9665XXXXXXXX)",
        )
        .into());
    }

    Ok(value.to_string())
}

pub fn password(field: &'static str, value: &str) -> Result<(), Error> {
    if value.chars().count() < MIN_PASSWORD_LENGTH {
        return Err(ValidationError::field(
            field,
            format!("Password must be at least {} characters", MIN_PASSWORD_LENGTH),
        )
        .into());
    }

    Ok(())
}

/// Known region key with a city listed under it.
pub fn region_and_city(
    region_field: &'static str,
    city_field: &'static str,
    region: &str,
    city: &str,
) -> Result<(String, String), Error> {
    let region = region.trim();
    let city = city.trim();

    if !location::is_known_region(region) {
        return Err(ValidationError::field(region_field, "Please select a valid region").into());
    }
    if !location::is_city_in_region(region, city) {
        return Err(ValidationError::field(
            city_field,
            "Please select a city within the chosen region",
        )
        .into());
    }

    Ok((region.to_string(), city.to_string()))
}

/// Inclusive range check.
pub fn in_range<T>(field: &'static str, value: T, min: T, max: T) -> Result<T, Error>
where
    T: PartialOrd + Display,
{
    if value < min || value > max {
        return Err(ValidationError::field(
            field,
            format!("{} must be between {} and {}", field, min, max),
        )
        .into());
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;

    #[test]
    fn accepts_both_saudi_phone_formats() {
        assert!(phone("phone_number", "0512345678").is_ok());
        assert!(phone("phone_number", "+966512345678").is_ok());
    }

    #[test]
    fn rejects_malformed_phone_numbers() {
        assert!(phone("phone_number", "0412345678").is_err());
        assert!(phone("phone_number", "051234567").is_err());
        assert!(phone("phone_number", "+96651234567a").is_err());
        assert!(phone("phone_number", "+9665123456789").is_err());
        assert!(phone("phone_number", "٠٥١٢٣٤٥٦٧٨").is_err());
    }

    #[test]
    fn email_is_normalised() {
        assert_eq!(
            email("email", "  Ops@Acme.SA ").unwrap(),
            "ops@acme.sa".to_string()
        );
        assert!(email("email", "ops@acme").is_err());
        assert!(email("email", "ops.acme.sa").is_err());
    }

    #[test]
    fn optional_blank_is_none() {
        assert_eq!(optional("notes", Some("   "), 10).unwrap(), None);
        assert!(optional("notes", Some("far too long"), 5).is_err());
    }

    #[test]
    fn weight_bounds_are_inclusive() {
        assert!(in_range("weight_kg", min_weight(), min_weight(), max_weight()).is_ok());
        assert!(in_range("weight_kg", Decimal::new(5, 2), min_weight(), max_weight()).is_err());
    }

    #[test]
    fn city_must_belong_to_region() {
        assert!(region_and_city("region", "city", "eastern", "dammam").is_ok());
        assert!(region_and_city("region", "city", "eastern", "jeddah").is_err());
        assert!(region_and_city("region", "city", "nowhere", "dammam").is_err());
    }
}

//! Venue form validation.

use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::{MSG_INVALID_EMAIL, MSG_REQUIRED, too_long};
use crate::types::Email;
use crate::validator::{
    FieldErrors, Validator, is_positive, is_valid_email, is_valid_url, max_chars, min_chars,
    not_blank,
};

/// Raw venue form fields as submitted.
///
/// Numbers stay as strings so a failed submission can be echoed back exactly.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct VenueInput {
    pub venue_name: String,
    pub description: String,
    pub location: String,
    pub email: String,
    pub price_per_hour: String,
    pub max_capacity: String,
    pub image_link: String,
}

/// A venue that passed validation, ready to persist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VenueDraft {
    pub name: String,
    pub description: String,
    pub location: String,
    pub email: Email,
    pub price_per_hour: Decimal,
    pub max_capacity: i32,
    pub image_link: String,
}

/// Prices are stored as `NUMERIC(10, 2)`.
const PRICE_SCALE: u32 = 2;
const PRICE_LIMIT: i64 = 100_000_000;

/// Parse a numeric form value, treating anything unparseable as zero.
///
/// Zero then fails the positivity checks, so a garbled number is reported as
/// a field error rather than a malformed request.
#[must_use]
pub fn parse_or_zero<T: FromStr + Default>(raw: &str) -> T {
    raw.trim().parse().unwrap_or_default()
}

/// Validate a venue form.
///
/// # Errors
///
/// Returns the field errors when any check fails.
pub fn validate_venue(input: &VenueInput) -> Result<VenueDraft, FieldErrors> {
    let price: Decimal = parse_or_zero(&input.price_per_hour);
    let capacity: i32 = parse_or_zero(&input.max_capacity);

    let mut v = Validator::new();

    v.check(not_blank(&input.venue_name), "venue_name", MSG_REQUIRED);
    v.check(max_chars(&input.venue_name, 50), "venue_name", &too_long(50));

    v.check(not_blank(&input.description), "description", MSG_REQUIRED);
    v.check(max_chars(&input.description, 500), "description", &too_long(500));

    v.check(not_blank(&input.location), "location", MSG_REQUIRED);
    v.check(max_chars(&input.location, 100), "location", &too_long(100));

    v.check(not_blank(&input.email), "email", MSG_REQUIRED);
    v.check(is_valid_email(&input.email), "email", MSG_INVALID_EMAIL);
    v.check(max_chars(&input.email, 100), "email", &too_long(100));

    v.check(is_positive(price), "price_per_hour", "must be greater than 0");
    v.check(
        price.normalize().scale() <= PRICE_SCALE,
        "price_per_hour",
        "must have at most 2 decimal places",
    );
    v.check(
        price < Decimal::from(PRICE_LIMIT),
        "price_per_hour",
        "must be less than 100000000",
    );
    v.check(is_positive(capacity), "max_capacity", "must be greater than 0");

    v.check(not_blank(&input.image_link), "image_link", MSG_REQUIRED);
    v.check(
        min_chars(&input.image_link, 10),
        "image_link",
        "must be at least 10 characters",
    );
    v.check(is_valid_url(&input.image_link), "image_link", "must be a valid URL");

    v.finish()?;

    let email = Email::parse(&input.email)
        .map_err(|_| FieldErrors::single("email", MSG_INVALID_EMAIL))?;

    Ok(VenueDraft {
        name: input.venue_name.clone(),
        description: input.description.clone(),
        location: input.location.clone(),
        email,
        price_per_hour: price,
        max_capacity: capacity,
        image_link: input.image_link.clone(),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn hall_a() -> VenueInput {
        VenueInput {
            venue_name: "Hall A".to_owned(),
            description: "A large hall with a stage.".to_owned(),
            location: "Belize City".to_owned(),
            email: "halla@example.com".to_owned(),
            price_per_hour: "50.0".to_owned(),
            max_capacity: "100".to_owned(),
            image_link: "https://x.com/a.png".to_owned(),
        }
    }

    #[test]
    fn test_hall_a_is_valid() {
        let draft = validate_venue(&hall_a()).unwrap();
        assert_eq!(draft.name, "Hall A");
        assert_eq!(draft.price_per_hour, Decimal::new(50, 0));
        assert_eq!(draft.max_capacity, 100);
        assert_eq!(draft.email.as_str(), "halla@example.com");
    }

    #[test]
    fn test_zero_price_fails_on_price_only() {
        let input = VenueInput {
            price_per_hour: "0".to_owned(),
            ..hall_a()
        };
        let errors = validate_venue(&input).unwrap_err();
        assert_eq!(errors.get("price_per_hour"), Some("must be greater than 0"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_price_must_fit_the_column() {
        let input = VenueInput {
            price_per_hour: "0.001".to_owned(),
            ..hall_a()
        };
        let errors = validate_venue(&input).unwrap_err();
        assert_eq!(
            errors.get("price_per_hour"),
            Some("must have at most 2 decimal places")
        );
        assert_eq!(errors.len(), 1);

        let input = VenueInput {
            price_per_hour: "123456789012.5".to_owned(),
            ..hall_a()
        };
        let errors = validate_venue(&input).unwrap_err();
        assert_eq!(errors.get("price_per_hour"), Some("must be less than 100000000"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_price_at_column_limits_is_valid() {
        for price in ["99999999.99", "12.50", "7.000"] {
            let input = VenueInput {
                price_per_hour: price.to_owned(),
                ..hall_a()
            };
            assert!(validate_venue(&input).is_ok(), "{price} should be accepted");
        }
    }

    #[test]
    fn test_unparseable_numbers_count_as_zero() {
        let input = VenueInput {
            price_per_hour: "fifty".to_owned(),
            max_capacity: String::new(),
            ..hall_a()
        };
        let errors = validate_venue(&input).unwrap_err();
        assert_eq!(errors.get("price_per_hour"), Some("must be greater than 0"));
        assert_eq!(errors.get("max_capacity"), Some("must be greater than 0"));
    }

    #[test]
    fn test_blank_name_reports_required_first() {
        let input = VenueInput {
            venue_name: "   ".to_owned(),
            ..hall_a()
        };
        let errors = validate_venue(&input).unwrap_err();
        assert_eq!(errors.get("venue_name"), Some("must be provided"));
    }

    #[test]
    fn test_name_too_long() {
        let input = VenueInput {
            venue_name: "x".repeat(51),
            ..hall_a()
        };
        let errors = validate_venue(&input).unwrap_err();
        assert_eq!(
            errors.get("venue_name"),
            Some("must not be more than 50 characters long")
        );
    }

    #[test]
    fn test_email_checks_in_order() {
        let blank = VenueInput {
            email: String::new(),
            ..hall_a()
        };
        assert_eq!(
            validate_venue(&blank).unwrap_err().get("email"),
            Some("must be provided")
        );

        let malformed = VenueInput {
            email: "not-an-email".to_owned(),
            ..hall_a()
        };
        assert_eq!(
            validate_venue(&malformed).unwrap_err().get("email"),
            Some("invalid email address")
        );
    }

    #[test]
    fn test_image_link_checks_in_order() {
        let short = VenueInput {
            image_link: "http://a".to_owned(),
            ..hall_a()
        };
        assert_eq!(
            validate_venue(&short).unwrap_err().get("image_link"),
            Some("must be at least 10 characters")
        );

        let not_url = VenueInput {
            image_link: "just some words".to_owned(),
            ..hall_a()
        };
        assert_eq!(
            validate_venue(&not_url).unwrap_err().get("image_link"),
            Some("must be a valid URL")
        );
    }

    #[test]
    fn test_parse_or_zero() {
        assert_eq!(parse_or_zero::<i32>(" 12 "), 12);
        assert_eq!(parse_or_zero::<i32>("1.5"), 0);
        assert_eq!(parse_or_zero::<Decimal>("12.75"), Decimal::new(1275, 2));
    }
}

//! Field-error accumulation for form validation.
//!
//! A [`Validator`] lives for one validation pass. Rules call
//! [`Validator::check`] in a fixed order; the first failing check for a field
//! decides the message shown next to that field, later failures for the same
//! field are dropped. The predicates below are the building blocks the rules
//! in [`crate::rules`] are written with.

use std::collections::HashMap;
use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;
use url::Url;

/// HTML5 e-mail input pattern.
static EMAIL_RX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("Invalid regex")
});

/// Messages keyed by form field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(HashMap<String, String>);

impl FieldErrors {
    /// An empty error set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An error set holding one message.
    #[must_use]
    pub fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::new();
        errors.insert_if_absent(field, message);
        errors
    }

    /// Record `message` for `field` unless the field already has one.
    ///
    /// Returns `true` if the message was stored.
    pub fn insert_if_absent(&mut self, field: &str, message: impl Into<String>) -> bool {
        if self.0.contains_key(field) {
            return false;
        }
        self.0.insert(field.to_owned(), message.into());
        true
    }

    /// The message recorded for `field`, if any.
    #[must_use]
    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    /// Whether `field` has a message.
    #[must_use]
    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Fold `other` in, keeping existing messages where both have a field.
    pub fn merge(&mut self, other: Self) {
        for (field, message) in other.0 {
            self.0.entry(field).or_insert(message);
        }
    }

    /// Iterate over `(field, message)` pairs in no particular order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl std::fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut pairs: Vec<_> = self.iter().collect();
        pairs.sort_unstable();
        for (i, (field, message)) in pairs.into_iter().enumerate() {
            if i > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

/// Accumulates field errors during a single validation pass.
#[derive(Debug, Default)]
pub struct Validator {
    errors: FieldErrors,
}

impl Validator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` under `field` when `ok` is false.
    pub fn check(&mut self, ok: bool, field: &str, message: &str) {
        if !ok {
            self.errors.insert_if_absent(field, message);
        }
    }

    /// Record `message` under `field` unconditionally (first error still wins).
    pub fn add_error(&mut self, field: &str, message: impl Into<String>) {
        self.errors.insert_if_absent(field, message);
    }

    /// True iff no errors have been recorded.
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub const fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    /// Finish the pass.
    ///
    /// # Errors
    ///
    /// Returns the accumulated errors if any check failed.
    pub fn finish(self) -> Result<(), FieldErrors> {
        if self.errors.is_empty() {
            Ok(())
        } else {
            Err(self.errors)
        }
    }
}

// =============================================================================
// Predicates
// =============================================================================

/// `value` contains something other than whitespace.
#[must_use]
pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// `value` has at least `min` characters.
#[must_use]
pub fn min_chars(value: &str, min: usize) -> bool {
    value.chars().count() >= min
}

/// `value` has at most `max` characters.
#[must_use]
pub fn max_chars(value: &str, max: usize) -> bool {
    value.chars().count() <= max
}

/// `value` is shaped like an e-mail address.
#[must_use]
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RX.is_match(value)
}

/// `value` is an absolute `http`/`https` URL with a host.
#[must_use]
pub fn is_valid_url(value: &str) -> bool {
    Url::parse(value).is_ok_and(|url| {
        matches!(url.scheme(), "http" | "https") && url.host_str().is_some_and(|h| !h.is_empty())
    })
}

/// `value` is strictly greater than zero.
#[must_use]
pub fn is_positive<T: PartialOrd + Default>(value: T) -> bool {
    value > T::default()
}

/// `instant` is strictly later than `now`.
#[must_use]
pub fn is_after(instant: DateTime<Utc>, now: DateTime<Utc>) -> bool {
    instant > now
}

/// `value` is one of `choices`.
#[must_use]
pub fn is_permitted_value<T: PartialEq>(value: &T, choices: &[T]) -> bool {
    choices.contains(value)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal::Decimal;

    #[test]
    fn test_first_error_per_field_wins() {
        let mut v = Validator::new();
        v.check(false, "name", "must be provided");
        v.check(false, "name", "must not be more than 50 characters long");
        v.add_error("name", "ignored");

        assert!(!v.is_valid());
        assert_eq!(v.errors().get("name"), Some("must be provided"));
        assert_eq!(v.errors().len(), 1);
    }

    #[test]
    fn test_passing_checks_record_nothing() {
        let mut v = Validator::new();
        v.check(true, "name", "must be provided");
        assert!(v.is_valid());
        assert!(v.finish().is_ok());
    }

    #[test]
    fn test_finish_returns_all_fields() {
        let mut v = Validator::new();
        v.check(false, "a", "one");
        v.check(true, "b", "two");
        v.add_error("c", "three");

        let errors = v.finish().unwrap_err();
        assert!(errors.contains("a"));
        assert!(!errors.contains("b"));
        assert_eq!(errors.get("c"), Some("three"));
        assert_eq!(errors.to_string(), "a: one; c: three");
    }

    #[test]
    fn test_merge_keeps_existing_messages() {
        let mut errors = FieldErrors::single("start_date", "must be provided");
        let mut other = FieldErrors::single("start_date", "must be a future date");
        other.insert_if_absent("status", "a cancelled reservation cannot be reinstated");
        errors.merge(other);
        assert_eq!(errors.get("start_date"), Some("must be provided"));
        assert!(errors.contains("status"));
    }

    #[test]
    fn test_not_blank() {
        assert!(not_blank("Hall A"));
        assert!(!not_blank(""));
        assert!(!not_blank(" \t\n"));
    }

    #[test]
    fn test_char_lengths_count_scalars_not_bytes() {
        // five characters, ten bytes
        let word = "ñáéíó";
        assert!(max_chars(word, 5));
        assert!(!max_chars(word, 4));
        assert!(min_chars(word, 5));
        assert!(!min_chars(word, 6));
    }

    #[test]
    fn test_is_valid_email() {
        assert!(is_valid_email("a@b.com"));
        assert!(is_valid_email("first.last+tag@sub.example.co"));
        assert!(!is_valid_email("a@b..com"));
        assert!(!is_valid_email("a b@c.com"));
        assert!(!is_valid_email("missing-at.com"));
    }

    #[test]
    fn test_is_valid_url() {
        assert!(is_valid_url("https://x.com/a.png"));
        assert!(is_valid_url("http://example.org"));
        assert!(!is_valid_url("ftp://example.org/file"));
        assert!(!is_valid_url("/relative/path.png"));
        assert!(!is_valid_url("not a url"));
        assert!(!is_valid_url("mailto:someone@example.com"));
    }

    #[test]
    fn test_is_positive() {
        assert!(is_positive(1));
        assert!(!is_positive(0));
        assert!(!is_positive(-3));
        assert!(is_positive(Decimal::new(1, 2)));
        assert!(!is_positive(Decimal::ZERO));
    }

    #[test]
    fn test_is_after_is_strict() {
        let now = Utc.with_ymd_and_hms(2030, 1, 1, 12, 0, 0).unwrap();
        assert!(is_after(now + chrono::Duration::seconds(1), now));
        assert!(!is_after(now, now));
    }

    #[test]
    fn test_is_permitted_value() {
        assert!(is_permitted_value(&"1", &["1", "2"]));
        assert!(!is_permitted_value(&"3", &["1", "2"]));
    }
}

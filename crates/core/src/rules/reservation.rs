//! Reservation form validation.
//!
//! Dates and times arrive as separate form fields. The start and end times are
//! wall-clock `HH:MM` values on the start date and are interpreted as UTC, so a
//! time is only meaningful when the date itself parses.

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use serde::{Deserialize, Serialize};

use super::MSG_REQUIRED;
use crate::validator::{FieldErrors, Validator, is_after};

const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// Raw reservation form fields as submitted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReservationInput {
    pub start_date: String,
    pub start_time: String,
    pub end_time: String,
}

/// A validated booking window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ReservationSlot {
    pub start_date: NaiveDate,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
}

impl ReservationInput {
    /// Pre-fill the form from an existing slot.
    #[must_use]
    pub fn from_slot(slot: &ReservationSlot) -> Self {
        Self {
            start_date: slot.start_date.format(DATE_FORMAT).to_string(),
            start_time: slot.start_time.format(TIME_FORMAT).to_string(),
            end_time: slot.end_time.format(TIME_FORMAT).to_string(),
        }
    }
}

fn parse_date(raw: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(raw.trim(), DATE_FORMAT).ok()
}

fn parse_time_on(date: Option<NaiveDate>, raw: &str) -> Option<DateTime<Utc>> {
    let date = date?;
    let time = NaiveTime::parse_from_str(raw.trim(), TIME_FORMAT).ok()?;
    Some(date.and_time(time).and_utc())
}

/// Validate a reservation form against the current instant.
///
/// # Errors
///
/// Returns the field errors when any check fails.
pub fn validate_reservation(
    input: &ReservationInput,
    now: DateTime<Utc>,
) -> Result<ReservationSlot, FieldErrors> {
    let date = parse_date(&input.start_date);
    let start = parse_time_on(date, &input.start_time);
    let end = parse_time_on(date, &input.end_time);

    let mut v = Validator::new();

    v.check(date.is_some(), "start_date", MSG_REQUIRED);
    v.check(
        date.is_some_and(|d| is_after(d.and_time(NaiveTime::MIN).and_utc(), now)),
        "start_date",
        "must be a future date",
    );

    v.check(start.is_some(), "start_time", MSG_REQUIRED);
    v.check(
        start.is_some_and(|s| is_after(s, now)),
        "start_time",
        "must be a future time",
    );

    v.check(end.is_some(), "end_time", MSG_REQUIRED);
    v.check(
        end.is_some_and(|e| start.is_none_or(|s| e > s)),
        "end_time",
        "must be after the start time",
    );

    v.finish()?;

    match (date, start, end) {
        (Some(start_date), Some(start_time), Some(end_time)) => Ok(ReservationSlot {
            start_date,
            start_time,
            end_time,
        }),
        _ => Err(FieldErrors::single("start_date", MSG_REQUIRED)),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2030, 6, 15, 14, 30, 0).unwrap()
    }

    fn input(date: &str, start: &str, end: &str) -> ReservationInput {
        ReservationInput {
            start_date: date.to_owned(),
            start_time: start.to_owned(),
            end_time: end.to_owned(),
        }
    }

    #[test]
    fn test_tomorrow_ten_to_eleven_is_valid() {
        let slot = validate_reservation(&input("2030-06-16", "10:00", "11:00"), now()).unwrap();
        assert_eq!(slot.start_date, NaiveDate::from_ymd_opt(2030, 6, 16).unwrap());
        assert_eq!(slot.end_time - slot.start_time, Duration::hours(1));
    }

    #[test]
    fn test_end_before_start_fails_on_end_time() {
        let errors = validate_reservation(&input("2030-06-16", "10:00", "09:00"), now()).unwrap_err();
        assert_eq!(errors.get("end_time"), Some("must be after the start time"));
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_end_equal_to_start_is_rejected() {
        let errors = validate_reservation(&input("2030-06-16", "10:00", "10:00"), now()).unwrap_err();
        assert_eq!(errors.get("end_time"), Some("must be after the start time"));
    }

    #[test]
    fn test_same_day_is_not_a_future_date() {
        let errors = validate_reservation(&input("2030-06-15", "18:00", "19:00"), now()).unwrap_err();
        assert_eq!(errors.get("start_date"), Some("must be a future date"));
        assert!(!errors.contains("start_time"));
    }

    #[test]
    fn test_past_date_fails_date_and_time() {
        let errors = validate_reservation(&input("2030-06-01", "10:00", "11:00"), now()).unwrap_err();
        assert_eq!(errors.get("start_date"), Some("must be a future date"));
        assert_eq!(errors.get("start_time"), Some("must be a future time"));
    }

    #[test]
    fn test_missing_fields_are_required() {
        let errors = validate_reservation(&input("", "", ""), now()).unwrap_err();
        assert_eq!(errors.get("start_date"), Some("must be provided"));
        assert_eq!(errors.get("start_time"), Some("must be provided"));
        assert_eq!(errors.get("end_time"), Some("must be provided"));
    }

    #[test]
    fn test_unparseable_time_counts_as_missing() {
        let errors =
            validate_reservation(&input("2030-06-16", "ten o'clock", "11:00"), now()).unwrap_err();
        assert_eq!(errors.get("start_time"), Some("must be provided"));
        assert!(!errors.contains("end_time"));
    }

    #[test]
    fn test_from_slot_prefills_form() {
        let slot = validate_reservation(&input("2030-06-16", "10:00", "11:30"), now()).unwrap();
        assert_eq!(
            ReservationInput::from_slot(&slot),
            input("2030-06-16", "10:00", "11:30")
        );
    }
}

//! Field rules used by the `validator` derives and the business rules the
//! service enforces with configuration (minimum age, search range).

use chrono::{Local, Months, NaiveDate};
use validator::ValidationError;

use crate::error::{UserError, UserResult};

/// Current calendar date in the server's local time zone.
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Rejects empty and whitespace-only strings.
pub fn validate_not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::new("not_blank"));
    }
    Ok(())
}

/// Rejects today and any later date.
pub fn validate_past_date(date: &NaiveDate) -> Result<(), ValidationError> {
    if *date >= today() {
        return Err(ValidationError::new("past"));
    }
    Ok(())
}

/// Latest birth date that is at least `min_age` full years before `today`.
///
/// `None` when the subtraction leaves the representable calendar.
pub fn latest_allowed_birth_date(min_age: u32, today: NaiveDate) -> Option<NaiveDate> {
    min_age
        .checked_mul(12)
        .and_then(|months| today.checked_sub_months(Months::new(months)))
}

/// Fails with [`UserError::UnderAge`] unless the user has turned `min_age`
/// on or before `today`.
pub fn check_min_age(birth_date: NaiveDate, min_age: u32, today: NaiveDate) -> UserResult<()> {
    match latest_allowed_birth_date(min_age, today) {
        Some(latest) if birth_date <= latest => Ok(()),
        _ => Err(UserError::UnderAge { min_age }),
    }
}

/// Fails with [`UserError::InvalidDateRange`] when `from` is after `to`.
pub fn check_date_range(from: NaiveDate, to: NaiveDate) -> UserResult<()> {
    if from > to {
        return Err(UserError::InvalidDateRange { from, to });
    }
    Ok(())
}

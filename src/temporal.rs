//! Calendar arithmetic behind the date operators.
//!
//! Month and year shifts clamp to the last day of the target month, and
//! differences count whole units, as moment.js does for the generated scripts.

use chrono::{Datelike, Days, Months, NaiveDate};

use crate::TemporalUnit;

/// Move `date` by `amount` units. Negative amounts move backwards.
/// Returns `None` when the result leaves chrono's supported range.
#[must_use]
pub fn shift(date: NaiveDate, amount: i64, unit: TemporalUnit) -> Option<NaiveDate> {
    let magnitude = amount.unsigned_abs();
    match unit {
        TemporalUnit::Days => shift_days(date, amount.is_negative(), magnitude),
        TemporalUnit::Weeks => shift_days(date, amount.is_negative(), magnitude.checked_mul(7)?),
        TemporalUnit::Months => shift_months(date, amount.is_negative(), magnitude),
        TemporalUnit::Years => shift_months(date, amount.is_negative(), magnitude.checked_mul(12)?),
    }
}

fn shift_days(date: NaiveDate, backwards: bool, days: u64) -> Option<NaiveDate> {
    if backwards {
        date.checked_sub_days(Days::new(days))
    } else {
        date.checked_add_days(Days::new(days))
    }
}

fn shift_months(date: NaiveDate, backwards: bool, months: u64) -> Option<NaiveDate> {
    let months = Months::new(u32::try_from(months).ok()?);
    if backwards {
        date.checked_sub_months(months)
    } else {
        date.checked_add_months(months)
    }
}

#[must_use]
pub fn first_day_of_month(date: NaiveDate) -> NaiveDate {
    date.with_day(1).unwrap_or(date)
}

#[must_use]
pub fn first_day_of_next_month(date: NaiveDate) -> Option<NaiveDate> {
    first_day_of_month(date).checked_add_months(Months::new(1))
}

#[must_use]
pub fn last_day_of_month(date: NaiveDate) -> Option<NaiveDate> {
    first_day_of_next_month(date)?.pred_opt()
}

#[must_use]
pub fn first_day_of_year(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), 1, 1)
}

#[must_use]
pub fn first_day_of_next_year(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year().checked_add(1)?, 1, 1)
}

#[must_use]
pub fn last_day_of_year(date: NaiveDate) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(date.year(), 12, 31)
}

/// Whole months between two dates, regardless of their order.
#[must_use]
pub fn months_between(a: NaiveDate, b: NaiveDate) -> i64 {
    let (earlier, later) = if a <= b { (a, b) } else { (b, a) };
    let mut months = i64::from(later.year() - earlier.year()) * 12
        + i64::from(later.month()) - i64::from(earlier.month());
    if later.day() < earlier.day() {
        months -= 1;
    }
    months
}

/// Whole years between two dates, regardless of their order.
#[must_use]
pub fn years_between(a: NaiveDate, b: NaiveDate) -> i64 {
    months_between(a, b) / 12
}

/// Days between two dates, regardless of their order.
#[must_use]
pub fn days_between(a: NaiveDate, b: NaiveDate) -> i64 {
    (b - a).num_days().abs()
}

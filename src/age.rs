//! age.rs
//!
//! Elapsed-age breakdown for the live display:
//!     "X years, Y months, Z days" plus totals and the current time-of-day.
//!
//! Unlike a calendar-aware year/month/day diff, this breakdown works from a
//! single elapsed duration and fixed average lengths:
//!   • a year is 365.25 days
//!   • a month is 30.44 days
//!
//! Those averages drift against the real calendar (leap years, 28–31 day
//! months). The output is expected to drift with them, so do not swap in
//! borrowing arithmetic here.

use chrono::{Datelike, NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use serde::Serialize;

pub(crate) const MS_PER_SECOND: i64 = 1000;
pub(crate) const MS_PER_DAY: i64 = 24 * 60 * 60 * MS_PER_SECOND;

/// 365.25 days, in milliseconds.
const MS_PER_AVG_YEAR: i64 = MS_PER_DAY * 36525 / 100;

/// 30.44 days, in milliseconds.
const MS_PER_AVG_MONTH: i64 = MS_PER_DAY * 3044 / 100;

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum AgeError {
    #[error("Date of birth cannot be in the future.")]
    FutureDate,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct AgeBreakdown {
    pub years: i64,
    /// Always in `0..=11`.
    pub months: i64,
    pub days: i64,
    pub total_months: i64,
    pub total_days: i64,
    /// Wall-clock time of day when the breakdown was taken.
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

/// Birth dates have no time component; they start at local midnight.
pub fn birth_instant(birth_date: NaiveDate) -> NaiveDateTime {
    birth_date.and_time(NaiveTime::MIN)
}

/// Computes the age of someone born on `birth_date` as seen at `now`.
pub fn compute_age(birth_date: NaiveDate, now: NaiveDateTime) -> Result<AgeBreakdown, AgeError> {
    let born = birth_instant(birth_date);
    if born > now {
        return Err(AgeError::FutureDate);
    }

    let elapsed_ms = (now - born).num_milliseconds();

    let years = elapsed_ms / MS_PER_AVG_YEAR;

    // Month delta ignores day-of-month, so it can run one ahead near the end
    // of the birth month and go negative inside the first year.
    let total_months = (now.month() as i64 - birth_date.month() as i64) + years * 12;
    let months = total_months.rem_euclid(12);

    let total_days = elapsed_ms / MS_PER_DAY;
    let days = (elapsed_ms % MS_PER_AVG_MONTH) / MS_PER_DAY;

    Ok(AgeBreakdown {
        years,
        months,
        days,
        total_months,
        total_days,
        hours: now.hour(),
        minutes: now.minute(),
        seconds: now.second(),
    })
}

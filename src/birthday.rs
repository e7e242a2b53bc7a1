//! Countdown to the next birthday.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::Serialize;

use crate::age::{MS_PER_DAY, MS_PER_SECOND, birth_instant};

const MS_PER_HOUR: i64 = 60 * 60 * MS_PER_SECOND;
const MS_PER_MINUTE: i64 = 60 * MS_PER_SECOND;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BirthdayCountdown {
    pub days: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
}

/// Anniversary of `birth_date` in `year`.
///
/// Feb 29 birthdays fall on March 1 in non-leap years.
pub fn anniversary(birth_date: NaiveDate, year: i32) -> Option<NaiveDate> {
    if birth_date.month() == 2 && birth_date.day() == 29 && !is_leap_year(year) {
        return NaiveDate::from_ymd_opt(year, 3, 1);
    }
    NaiveDate::from_ymd_opt(year, birth_date.month(), birth_date.day())
}

/// Time left from `now` until the next anniversary of `birth_date`.
///
/// An anniversary that starts exactly at `now` has already begun, so the
/// countdown targets the following year's.
pub fn next_birthday(birth_date: NaiveDate, now: NaiveDateTime) -> BirthdayCountdown {
    let next = [now.year(), now.year() + 1]
        .into_iter()
        .filter_map(|year| anniversary(birth_date, year))
        .map(birth_instant)
        .find(|candidate| *candidate > now);

    let remaining_ms = next
        .map(|candidate| (candidate - now).num_milliseconds())
        .unwrap_or(0)
        .max(0);

    BirthdayCountdown {
        days: remaining_ms / MS_PER_DAY,
        hours: (remaining_ms % MS_PER_DAY) / MS_PER_HOUR,
        minutes: (remaining_ms % MS_PER_HOUR) / MS_PER_MINUTE,
        seconds: (remaining_ms % MS_PER_MINUTE) / MS_PER_SECOND,
    }
}

/// True when `today` is an anniversary of `birth_date`, including the birth day itself.
pub fn is_birthday(birth_date: NaiveDate, today: NaiveDate) -> bool {
    anniversary(birth_date, today.year()) == Some(today)
}

/// Leap-year rule (Gregorian):
///   - divisible by 4 → leap year
///   - except divisible by 100 → not leap year
///   - except divisible by 400 → leap year
fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn at(y: i32, m: u32, d: u32, h: u32, min: u32, s: u32) -> NaiveDateTime {
        date(y, m, d).and_hms_opt(h, min, s).unwrap()
    }

    fn countdown(days: i64, hours: i64, minutes: i64, seconds: i64) -> BirthdayCountdown {
        BirthdayCountdown {
            days,
            hours,
            minutes,
            seconds,
        }
    }

    #[test]
    fn one_second_before_birthday() {
        let left = next_birthday(date(1990, 3, 10), at(2024, 3, 9, 23, 59, 59));
        assert_eq!(left, countdown(0, 0, 0, 1));
    }

    #[test]
    fn birthday_starting_now_rolls_to_next_year() {
        let left = next_birthday(date(2000, 6, 15), at(2024, 6, 15, 0, 0, 0));
        assert_eq!(left, countdown(365, 0, 0, 0));
    }

    #[test]
    fn later_on_the_birthday_counts_to_next_year() {
        let left = next_birthday(date(2000, 6, 15), at(2024, 6, 15, 10, 30, 15));
        assert_eq!(left, countdown(364, 13, 29, 45));
    }

    #[test]
    fn birthday_later_this_year() {
        let left = next_birthday(date(1985, 12, 25), at(2024, 12, 1, 18, 0, 0));
        assert_eq!(left, countdown(23, 6, 0, 0));
    }

    #[test]
    fn passed_birthday_crosses_new_year() {
        let left = next_birthday(date(1985, 1, 2), at(2024, 12, 31, 0, 0, 0));
        assert_eq!(left, countdown(2, 0, 0, 0));
    }

    #[test]
    fn leap_day_birthday_lands_on_march_first() {
        assert_eq!(anniversary(date(2000, 2, 29), 2023), Some(date(2023, 3, 1)));
        assert_eq!(anniversary(date(2000, 2, 29), 2024), Some(date(2024, 2, 29)));
        assert_eq!(anniversary(date(2000, 2, 29), 2100), Some(date(2100, 3, 1)));

        let left = next_birthday(date(2000, 2, 29), at(2023, 2, 28, 0, 0, 0));
        assert_eq!(left, countdown(1, 0, 0, 0));

        let left = next_birthday(date(2000, 2, 29), at(2023, 3, 1, 12, 0, 0));
        // Next one is 2024-02-29.
        assert_eq!(left, countdown(364, 12, 0, 0));
    }

    #[test]
    fn countdown_is_never_negative() {
        let birth = date(1990, 7, 4);
        let mut now = at(2023, 1, 1, 0, 0, 0);
        let end = at(2025, 1, 1, 0, 0, 0);
        while now < end {
            let left = next_birthday(birth, now);
            assert!(left.days >= 0 && left.days <= 366, "{now}: {left:?}");
            assert!((0..24).contains(&left.hours));
            assert!((0..60).contains(&left.minutes));
            assert!((0..60).contains(&left.seconds));
            assert_ne!(left, countdown(0, 0, 0, 0), "{now}");
            now += chrono::Duration::minutes(997);
        }
    }

    #[test]
    fn same_inputs_same_countdown() {
        let birth = date(1971, 10, 9);
        let now = at(2024, 5, 5, 5, 5, 5);
        assert_eq!(next_birthday(birth, now), next_birthday(birth, now));
    }

    #[test]
    fn birthday_banner_matches_month_and_day() {
        assert!(is_birthday(date(1990, 3, 10), date(2024, 3, 10)));
        assert!(is_birthday(date(1990, 3, 10), date(1990, 3, 10)));
        assert!(!is_birthday(date(1990, 3, 10), date(2024, 3, 11)));
        assert!(is_birthday(date(2000, 2, 29), date(2023, 3, 1)));
        assert!(!is_birthday(date(2000, 2, 29), date(2024, 3, 1)));
    }

    #[test]
    fn leap_years() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
    }
}

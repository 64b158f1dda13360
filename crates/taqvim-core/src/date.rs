use std::fmt;
use std::str::FromStr;

use chrono::{Datelike, NaiveDate, Utc};
use chrono_tz::Tz;
use serde::{Serialize, Serializer};

use crate::error::{CalendarError, CalendarResult};

/// A single proleptic-Gregorian calendar day.
///
/// `month` is zero-based (`0` is January). Two dates compare equal when
/// year, month and day-of-month all match; no time-of-day is carried.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CalendarDate {
    year: i32,
    month: u32,
    day: u32,
}

impl CalendarDate {
    pub fn new(year: i32, month: u32, day: u32) -> CalendarResult<Self> {
        let total = days_in_month(year, month)?;
        if day == 0 || day > total {
            return Err(CalendarError::invalid_argument(format!(
                "day {day} out of range 1..={total} for {year:04}-{:02}",
                month + 1
            )));
        }
        Ok(Self { year, month, day })
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn day(&self) -> u32 {
        self.day
    }

    /// Day of week with Sunday as `0` through Saturday as `6`.
    pub fn native_weekday(&self) -> u32 {
        // 1970-01-01 was a Thursday.
        (days_from_civil(self.year, self.month + 1, self.day) + 4).rem_euclid(7) as u32
    }

    pub fn parse(raw: &str) -> CalendarResult<Self> {
        let trimmed = raw.trim();
        NaiveDate::parse_from_str(trimmed, "%Y-%m-%d")
            .map(Self::from)
            .map_err(|err| {
                CalendarError::invalid_argument(format!("invalid date '{trimmed}': {err}"))
            })
    }
}

impl From<NaiveDate> for CalendarDate {
    fn from(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month0(),
            day: date.day(),
        }
    }
}

impl FromStr for CalendarDate {
    type Err = CalendarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for CalendarDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl fmt::Display for CalendarDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}-{:02}", self.year, self.month + 1, self.day)
    }
}

pub fn today_in(timezone: Tz) -> CalendarDate {
    Utc::now().with_timezone(&timezone).date_naive().into()
}

pub fn is_leap_year(year: i32) -> bool {
    (year % 4 == 0 && year % 100 != 0) || year % 400 == 0
}

pub fn days_in_month(year: i32, month: u32) -> CalendarResult<u32> {
    match month {
        0 | 2 | 4 | 6 | 7 | 9 | 11 => Ok(31),
        3 | 5 | 8 | 10 => Ok(30),
        1 if is_leap_year(year) => Ok(29),
        1 => Ok(28),
        other => Err(CalendarError::invalid_argument(format!(
            "month index {other} out of range 0..=11"
        ))),
    }
}

// Days since 1970-01-01, valid for every i32 year. `month` is one-based.
fn days_from_civil(year: i32, month: u32, day: u32) -> i64 {
    let y = i64::from(year) - i64::from(month <= 2);
    let era = y.div_euclid(400);
    let yoe = y - era * 400;
    let mp = i64::from((month + 9) % 12);
    let doy = (153 * mp + 2) / 5 + i64::from(day) - 1;
    let doe = yoe * 365 + yoe / 4 - yoe / 100 + doy;
    era * 146_097 + doe - 719_468
}

#[cfg(test)]
mod tests {
    use chrono::Weekday;

    use super::*;

    #[test]
    fn rejects_out_of_range_month_and_day() {
        assert!(matches!(
            CalendarDate::new(2024, 12, 1),
            Err(CalendarError::InvalidArgument(_))
        ));
        assert!(CalendarDate::new(2023, 1, 29).is_err());
        assert!(CalendarDate::new(2024, 1, 29).is_ok());
        assert!(CalendarDate::new(2024, 0, 0).is_err());
    }

    #[test]
    fn leap_years_follow_gregorian_rules() {
        assert!(is_leap_year(2000));
        assert!(is_leap_year(2024));
        assert!(!is_leap_year(1900));
        assert!(!is_leap_year(2023));
        assert_eq!(days_in_month(1900, 1).expect("valid month"), 28);
        assert_eq!(days_in_month(2000, 1).expect("valid month"), 29);
    }

    #[test]
    fn native_weekday_matches_chrono() {
        let mut day = NaiveDate::from_ymd_opt(1999, 12, 20).expect("valid date");
        let end = NaiveDate::from_ymd_opt(2001, 3, 10).expect("valid date");
        while day <= end {
            let ours = CalendarDate::from(day).native_weekday();
            assert_eq!(ours, day.weekday().num_days_from_sunday(), "{day}");
            day = day.succ_opt().expect("next day");
        }
    }

    #[test]
    fn native_weekday_handles_negative_years() {
        let day = NaiveDate::from_ymd_opt(-44, 3, 15).expect("valid date");
        assert_eq!(
            CalendarDate::from(day).native_weekday(),
            day.weekday().num_days_from_sunday()
        );
    }

    #[test]
    fn known_reference_weekdays() {
        let jan1 = CalendarDate::new(2024, 0, 1).expect("valid date");
        assert_eq!(jan1.native_weekday(), Weekday::Mon.num_days_from_sunday());
        let epoch = CalendarDate::new(1970, 0, 1).expect("valid date");
        assert_eq!(epoch.native_weekday(), 4);
    }

    #[test]
    fn parses_and_displays_iso_dates() {
        let date: CalendarDate = "2024-02-29".parse().expect("parse date");
        assert_eq!((date.year(), date.month(), date.day()), (2024, 1, 29));
        assert_eq!(date.to_string(), "2024-02-29");
        assert!(CalendarDate::parse("2023-02-29").is_err());
        assert!(CalendarDate::parse("tomorrow").is_err());
    }

    #[test]
    fn equality_is_calendar_day_equality() {
        let a = CalendarDate::new(2024, 0, 15).expect("valid date");
        let b = CalendarDate::from(NaiveDate::from_ymd_opt(2024, 1, 15).expect("valid date"));
        let c = CalendarDate::new(2024, 0, 16).expect("valid date");
        assert_eq!(a, b);
        assert_ne!(a, c);
        assert!(a < c);
    }
}

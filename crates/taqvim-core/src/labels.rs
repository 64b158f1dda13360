use std::str::FromStr;

use anyhow::anyhow;
use serde::Deserialize;

use crate::month::{DAYS_PER_WEEK, WeekStart};

/// Offset between the Gregorian year and the year shown in the header.
/// The header year is a display approximation, not a Jalali conversion.
pub const DISPLAY_YEAR_OFFSET: i32 = 621;

const FA_MONTHS: [&str; 12] = [
    "فروردین",
    "اردیبهشت",
    "خرداد",
    "تیر",
    "مرداد",
    "شهریور",
    "مهر",
    "آبان",
    "آذر",
    "دی",
    "بهمن",
    "اسفند",
];

const EN_MONTHS: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

// Sunday-first, matching `CalendarDate::native_weekday`.
const FA_WEEKDAYS: [&str; DAYS_PER_WEEK] = [
    "یکشنبه",
    "دوشنبه",
    "سه‌شنبه",
    "چهارشنبه",
    "پنجشنبه",
    "جمعه",
    "شنبه",
];

const EN_WEEKDAYS: [&str; DAYS_PER_WEEK] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Locale {
    #[default]
    Fa,
    En,
}

impl FromStr for Locale {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "fa" | "farsi" | "persian" => Ok(Self::Fa),
            "en" | "english" => Ok(Self::En),
            other => Err(anyhow!("unsupported locale: {other}")),
        }
    }
}

impl Locale {
    pub fn month_name(self, month: u32) -> &'static str {
        let names = match self {
            Self::Fa => &FA_MONTHS,
            Self::En => &EN_MONTHS,
        };
        names.get(month as usize).copied().unwrap_or("?")
    }

    pub fn year_label(self, year: i32) -> String {
        match self {
            Self::Fa => display_year(year).to_string(),
            Self::En => year.to_string(),
        }
    }

    pub fn weekday_labels(self, week_start: WeekStart) -> Vec<&'static str> {
        let names = match self {
            Self::Fa => &FA_WEEKDAYS,
            Self::En => &EN_WEEKDAYS,
        };
        let first = week_start.weekday().num_days_from_sunday() as usize;
        (0..DAYS_PER_WEEK)
            .map(|column| names[(first + column) % DAYS_PER_WEEK])
            .collect()
    }
}

pub fn display_year(year: i32) -> i32 {
    year.saturating_sub(DISPLAY_YEAR_OFFSET)
}

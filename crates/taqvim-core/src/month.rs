use std::fmt;

use chrono::Weekday;
use tracing::trace;

use crate::date::{CalendarDate, days_in_month};
use crate::error::{CalendarError, CalendarResult};

pub const DAYS_PER_WEEK: usize = 7;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> CalendarResult<Self> {
        if month > 11 {
            return Err(CalendarError::invalid_argument(format!(
                "month index {month} out of range 0..=11"
            )));
        }
        Ok(Self { year, month })
    }

    pub fn of(date: CalendarDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(self) -> CalendarResult<Self> {
        if self.month < 11 {
            return Ok(Self {
                year: self.year,
                month: self.month + 1,
            });
        }
        let year = self.year.checked_add(1).ok_or_else(|| {
            CalendarError::invalid_argument(format!("no month after {self}"))
        })?;
        Ok(Self { year, month: 0 })
    }

    pub fn prev(self) -> CalendarResult<Self> {
        if self.month > 0 {
            return Ok(Self {
                year: self.year,
                month: self.month - 1,
            });
        }
        let year = self.year.checked_sub(1).ok_or_else(|| {
            CalendarError::invalid_argument(format!("no month before {self}"))
        })?;
        Ok(Self { year, month: 11 })
    }

    pub fn contains(&self, date: CalendarDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month + 1)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WeekStart(Weekday);

impl WeekStart {
    pub const SATURDAY: WeekStart = WeekStart(Weekday::Sat);

    pub fn new(weekday: Weekday) -> Self {
        Self(weekday)
    }

    pub fn weekday(&self) -> Weekday {
        self.0
    }

    /// Rotation added to the Sunday-based weekday index so that this
    /// weekday lands in column 0. Saturday yields 1.
    pub fn offset(&self) -> u32 {
        (7 - self.0.num_days_from_sunday()) % 7
    }

    pub fn parse(raw: &str) -> CalendarResult<Self> {
        raw.trim()
            .parse::<Weekday>()
            .map(Self)
            .map_err(|_| CalendarError::invalid_argument(format!("unknown weekday '{raw}'")))
    }
}

impl Default for WeekStart {
    fn default() -> Self {
        Self::SATURDAY
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cell {
    Blank,
    Day(CalendarDate),
}

impl Cell {
    pub fn date(&self) -> Option<CalendarDate> {
        match self {
            Cell::Blank => None,
            Cell::Day(date) => Some(*date),
        }
    }
}

/// Lays out one month: leading blanks so day 1 sits under its weekday
/// column, then every day of the month. There is no trailing padding.
pub fn build_month_view(
    year: i32,
    month: u32,
    week_start_offset: u32,
) -> CalendarResult<Vec<Cell>> {
    if week_start_offset > 6 {
        return Err(CalendarError::invalid_argument(format!(
            "week start offset {week_start_offset} out of range 0..=6"
        )));
    }

    let total_days = days_in_month(year, month)?;
    let first = CalendarDate::new(year, month, 1)?;
    let start_offset = (first.native_weekday() + week_start_offset) % 7;
    trace!(year, month, start_offset, total_days, "building month view");

    let mut cells = Vec::with_capacity(start_offset as usize + total_days as usize);
    cells.extend((0..start_offset).map(|_| Cell::Blank));
    for day in 1..=total_days {
        cells.push(Cell::Day(CalendarDate::new(year, month, day)?));
    }

    Ok(cells)
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonthView {
    year_month: YearMonth,
    cells: Vec<Cell>,
}

impl MonthView {
    pub fn build(year_month: YearMonth, week_start: WeekStart) -> CalendarResult<Self> {
        let cells = build_month_view(year_month.year, year_month.month, week_start.offset())?;
        Ok(Self { year_month, cells })
    }

    pub fn year_month(&self) -> YearMonth {
        self.year_month
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub fn leading_blanks(&self) -> usize {
        self.cells
            .iter()
            .take_while(|cell| matches!(cell, Cell::Blank))
            .count()
    }

    pub fn day_cells(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.cells.iter().filter_map(Cell::date)
    }

    pub fn weeks(&self) -> impl Iterator<Item = &[Cell]> {
        self.cells.chunks(DAYS_PER_WEEK)
    }
}

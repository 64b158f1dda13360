use std::io::{self, IsTerminal, Write};

use unicode_width::UnicodeWidthStr;

use crate::config::Config;
use crate::date::CalendarDate;
use crate::event::{Event, EventDraft, EventIndex};
use crate::labels::Locale;
use crate::month::{Cell, MonthView, WeekStart};
use crate::state::{AppState, is_today};

const MIN_COLUMN_WIDTH: usize = 4;
const EVENT_MARKER: &str = "*";

#[derive(Debug, Clone)]
pub struct Renderer {
    locale: Locale,
    week_start: WeekStart,
    color: bool,
}

impl Renderer {
    pub fn new(cfg: &Config) -> anyhow::Result<Self> {
        Ok(Self {
            locale: cfg.locale,
            week_start: cfg.week_start()?,
            color: cfg.color && io::stdout().is_terminal(),
        })
    }

    pub fn plain(locale: Locale, week_start: WeekStart) -> Self {
        Self {
            locale,
            week_start,
            color: false,
        }
    }

    pub fn week_start(&self) -> WeekStart {
        self.week_start
    }

    /// Header, weekday row, the day grid and the month's event list.
    #[tracing::instrument(skip(self, out, state))]
    pub fn render_month<W: Write>(
        &self,
        out: &mut W,
        state: &AppState,
        today: CalendarDate,
    ) -> anyhow::Result<()> {
        let view = state.month_view(self.week_start)?;
        let index = EventIndex::new(state.events());
        let focus = view.year_month();

        writeln!(
            out,
            "{} {}",
            self.paint(self.locale.month_name(focus.month()), "1;36"),
            self.locale.year_label(focus.year())
        )?;

        let headers = self.locale.weekday_labels(self.week_start);
        let width = headers
            .iter()
            .map(|label| UnicodeWidthStr::width(*label))
            .max()
            .unwrap_or(0)
            .max(MIN_COLUMN_WIDTH);

        let header_cells: Vec<String> = headers.iter().map(|label| label.to_string()).collect();
        write_row(out, &header_cells, width)?;

        for week in view.weeks() {
            let row: Vec<String> = week
                .iter()
                .map(|cell| self.format_cell(cell, &index, today))
                .collect();
            write_row(out, &row, width)?;
        }

        self.write_event_list(out, &view, &index)?;
        Ok(())
    }

    pub fn render_day<W: Write>(
        &self,
        out: &mut W,
        day: CalendarDate,
        events: &[&Event],
    ) -> anyhow::Result<()> {
        if events.is_empty() {
            writeln!(out, "{day}: no events")?;
            return Ok(());
        }
        writeln!(out, "{day}:")?;
        for event in events {
            write_event_line(out, event)?;
        }
        Ok(())
    }

    pub fn render_form<W: Write>(&self, out: &mut W, draft: &EventDraft) -> anyhow::Result<()> {
        writeln!(out, "new event on {}", draft.date)?;
        writeln!(out, "  title:       {}", draft.title)?;
        writeln!(out, "  description: {}", draft.description)?;
        if let Some(error) = &draft.error {
            writeln!(out, "  {}", self.paint(error, "31"))?;
        }
        Ok(())
    }

    fn format_cell(&self, cell: &Cell, index: &EventIndex<'_>, today: CalendarDate) -> String {
        let Cell::Day(date) = cell else {
            return String::new();
        };

        let marker = if index.count_on_day(*date) > 0 {
            EVENT_MARKER
        } else {
            ""
        };
        let number = date.day().to_string();

        if !is_today(*date, today) {
            return format!("{number}{marker}");
        }
        if self.color {
            format!("{}{marker}", self.paint(&number, "7;36"))
        } else {
            format!("[{number}]{marker}")
        }
    }

    fn write_event_list<W: Write>(
        &self,
        out: &mut W,
        view: &MonthView,
        index: &EventIndex<'_>,
    ) -> anyhow::Result<()> {
        let focus = view.year_month();
        let mut days = index.days().filter(|day| focus.contains(*day)).peekable();
        if days.peek().is_none() {
            return Ok(());
        }

        writeln!(out)?;
        for day in days {
            writeln!(out, "{}", self.paint(&day.to_string(), "33"))?;
            for event in index.on_day(day) {
                write_event_line(out, event)?;
            }
        }
        Ok(())
    }

    fn paint(&self, text: &str, code: &str) -> String {
        if !self.color {
            return text.to_string();
        }
        format!("\x1b[{code}m{text}\x1b[0m")
    }
}

fn write_event_line<W: Write>(out: &mut W, event: &Event) -> io::Result<()> {
    if event.description.trim().is_empty() {
        writeln!(out, "  - {}", event.title)
    } else {
        writeln!(out, "  - {}: {}", event.title, event.description)
    }
}

fn write_row<W: Write>(out: &mut W, cells: &[String], width: usize) -> io::Result<()> {
    let line = cells
        .iter()
        .map(|cell| {
            let visible = UnicodeWidthStr::width(strip_ansi(cell).as_str());
            format!("{}{}", " ".repeat(width.saturating_sub(visible)), cell)
        })
        .collect::<Vec<_>>()
        .join(" ");
    writeln!(out, "{}", line.trim_end())
}

fn strip_ansi(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut escaped = false;

    for ch in s.chars() {
        if escaped {
            if ch == 'm' {
                escaped = false;
            }
            continue;
        }

        if ch == '\x1b' {
            escaped = true;
            continue;
        }

        out.push(ch);
    }

    out
}

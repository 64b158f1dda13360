use std::io::{BufRead, Write};

use anyhow::{Context, anyhow};
use chrono_tz::Tz;
use tracing::{debug, info, instrument, warn};

use crate::date::{CalendarDate, today_in};
use crate::event::EventDraft;
use crate::month::YearMonth;
use crate::render::Renderer;
use crate::state::AppState;
use crate::suggestion::SuggestionSource;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

pub fn known_command_names() -> Vec<&'static str> {
    vec![
        "show", "next", "prev", "today", "open", "title", "desc", "suggest", "save", "close",
        "add", "events", "export", "help", "quit",
    ]
}

pub fn expand_command_abbrev<'a>(token: &'a str, known: &[&'a str]) -> Option<&'a str> {
    if known.contains(&token) {
        return Some(token);
    }

    let mut matches = known.iter().copied().filter(|name| name.starts_with(token));
    let first = matches.next()?;
    if matches.next().is_some() {
        None
    } else {
        Some(first)
    }
}

pub struct Session<'a> {
    state: AppState,
    renderer: Renderer,
    timezone: Tz,
    suggestions: Option<&'a dyn SuggestionSource>,
}

impl<'a> Session<'a> {
    pub fn new(state: AppState, renderer: Renderer, timezone: Tz) -> Self {
        Self {
            state,
            renderer,
            timezone,
            suggestions: None,
        }
    }

    pub fn with_suggestions(mut self, source: &'a dyn SuggestionSource) -> Self {
        self.suggestions = Some(source);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn today(&self) -> CalendarDate {
        today_in(self.timezone)
    }

    /// Reads commands until `quit` or end of input. A failing command is
    /// reported on `out` and the loop carries on.
    #[instrument(skip_all)]
    pub fn run<R: BufRead, W: Write>(&mut self, input: R, out: &mut W) -> anyhow::Result<()> {
        for line in input.lines() {
            let line = line.context("failed to read command")?;
            let today = self.today();
            match self.execute_at(&line, today, out) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(err) => {
                    warn!(command = %line.trim(), error = %err, "command failed");
                    writeln!(out, "error: {err:#}")?;
                }
            }
            out.flush()?;
        }
        info!(events = self.state.events().len(), "session finished");
        Ok(())
    }

    pub fn execute_at<W: Write>(
        &mut self,
        line: &str,
        today: CalendarDate,
        out: &mut W,
    ) -> anyhow::Result<Flow> {
        let line = line.trim();
        if line.is_empty() || line.starts_with('#') {
            return Ok(Flow::Continue);
        }

        let (token, rest) = match line.split_once(char::is_whitespace) {
            Some((token, rest)) => (token, rest.trim()),
            None => (line, ""),
        };
        let known = known_command_names();
        let command = expand_command_abbrev(token, &known)
            .ok_or_else(|| anyhow!("unknown or ambiguous command: {token}"))?;
        debug!(command, args = rest, "dispatching command");

        match command {
            "show" => self.renderer.render_month(out, &self.state, today)?,
            "next" => {
                self.state.navigate_next()?;
                self.renderer.render_month(out, &self.state, today)?;
            }
            "prev" => {
                self.state.navigate_prev()?;
                self.renderer.render_month(out, &self.state, today)?;
            }
            "today" => {
                self.state.navigate_today(today);
                self.renderer.render_month(out, &self.state, today)?;
            }
            "open" => {
                let day = resolve_day(rest, self.state.focus(), today)?;
                self.state.open_modal(day);
                self.print_form(out)?;
            }
            "title" => {
                self.form_mut()?.title = rest.to_string();
                self.print_form(out)?;
            }
            "desc" => {
                self.form_mut()?.description = rest.to_string();
                self.print_form(out)?;
            }
            "suggest" => {
                let source = self
                    .suggestions
                    .ok_or_else(|| anyhow!("no suggestion source configured"))?;
                self.form_mut()?.request_suggestion(source);
                self.print_form(out)?;
            }
            "save" => {
                let event = self.state.save_modal()?;
                writeln!(out, "Created event {} on {}.", event.id, event.date)?;
            }
            "close" => self.state.close_modal(),
            "add" => {
                let (day_arg, text) = rest
                    .split_once(char::is_whitespace)
                    .ok_or_else(|| anyhow!("usage: add DATE|DAY TITLE [| DESCRIPTION]"))?;
                let day = resolve_day(day_arg, self.state.focus(), today)?;
                let (title, description) = match text.split_once('|') {
                    Some((title, description)) => (title.trim(), description.trim()),
                    None => (text.trim(), ""),
                };
                let event = self
                    .state
                    .add_event(&EventDraft::with_text(day, title, description))?;
                writeln!(out, "Created event {} on {}.", event.id, event.date)?;
            }
            "events" => {
                let day = if rest.is_empty() {
                    today
                } else {
                    resolve_day(rest, self.state.focus(), today)?
                };
                let events = self.state.events_on_day(day);
                self.renderer.render_day(out, day, &events)?;
            }
            "export" => {
                let json = serde_json::to_string_pretty(self.state.events())
                    .context("failed to serialize events")?;
                writeln!(out, "{json}")?;
            }
            "help" => write_help(out)?,
            "quit" => return Ok(Flow::Quit),
            other => return Err(anyhow!("unhandled command: {other}")),
        }

        Ok(Flow::Continue)
    }

    fn form_mut(&mut self) -> anyhow::Result<&mut EventDraft> {
        self.state
            .modal_mut()
            .ok_or_else(|| anyhow!("no event form is open; use `open DATE` first"))
    }

    fn print_form<W: Write>(&self, out: &mut W) -> anyhow::Result<()> {
        if let Some(draft) = self.state.modal() {
            self.renderer.render_form(out, draft)?;
        }
        Ok(())
    }
}

fn resolve_day(arg: &str, focus: YearMonth, today: CalendarDate) -> anyhow::Result<CalendarDate> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(anyhow!("expected a date or a day of the month"));
    }
    if arg.eq_ignore_ascii_case("today") {
        return Ok(today);
    }
    if let Ok(day) = arg.parse::<u32>() {
        return Ok(CalendarDate::new(focus.year(), focus.month(), day)?);
    }
    Ok(CalendarDate::parse(arg)?)
}

fn write_help<W: Write>(out: &mut W) -> anyhow::Result<()> {
    writeln!(
        out,
        "commands (unique prefixes accepted):
  show                         render the focused month
  next | prev | today          move the focused month
  open DATE|DAY                open the add-event form
  title TEXT | desc TEXT       edit the open form
  suggest                      fill the open form from the suggestion source
  save | close                 save or discard the open form
  add DATE|DAY TITLE [| DESC]  add an event directly
  events [DATE|DAY]            list events on a day (default today)
  export                       print every event as JSON
  quit"
    )?;
    Ok(())
}

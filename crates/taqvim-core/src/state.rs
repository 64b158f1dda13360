use tracing::{debug, info};

use crate::date::CalendarDate;
use crate::error::{CalendarError, CalendarResult};
use crate::event::{Event, EventDraft, events_on_day};
use crate::month::{MonthView, WeekStart, YearMonth};

#[derive(Debug, Clone)]
pub struct AppState {
    focus: YearMonth,
    events: Vec<Event>,
    modal: Option<EventDraft>,
}

impl AppState {
    pub fn new(focus: YearMonth) -> Self {
        Self {
            focus,
            events: Vec::new(),
            modal: None,
        }
    }

    pub fn focus(&self) -> YearMonth {
        self.focus
    }

    pub fn events(&self) -> &[Event] {
        &self.events
    }

    pub fn modal(&self) -> Option<&EventDraft> {
        self.modal.as_ref()
    }

    pub fn modal_mut(&mut self) -> Option<&mut EventDraft> {
        self.modal.as_mut()
    }

    pub fn navigate_prev(&mut self) -> CalendarResult<()> {
        self.focus = self.focus.prev()?;
        debug!(focus = %self.focus, "navigated to previous month");
        Ok(())
    }

    pub fn navigate_next(&mut self) -> CalendarResult<()> {
        self.focus = self.focus.next()?;
        debug!(focus = %self.focus, "navigated to next month");
        Ok(())
    }

    pub fn navigate_today(&mut self, today: CalendarDate) {
        self.focus = YearMonth::of(today);
        debug!(focus = %self.focus, "navigated to today");
    }

    pub fn open_modal(&mut self, date: CalendarDate) {
        debug!(%date, "opening event form");
        self.modal = Some(EventDraft::new(date));
    }

    pub fn close_modal(&mut self) {
        if self.modal.take().is_some() {
            debug!("closed event form");
        }
    }

    /// Saves the open form as a new event and closes it. A blank title
    /// leaves the form open and untouched.
    pub fn save_modal(&mut self) -> CalendarResult<&Event> {
        let draft = self
            .modal
            .as_ref()
            .ok_or_else(|| CalendarError::invalid_argument("no event form is open"))?;
        let event = Event::from_draft(draft)?;
        self.modal = None;
        Ok(self.push(event))
    }

    pub fn add_event(&mut self, draft: &EventDraft) -> CalendarResult<&Event> {
        let event = Event::from_draft(draft)?;
        Ok(self.push(event))
    }

    pub fn month_view(&self, week_start: WeekStart) -> CalendarResult<MonthView> {
        MonthView::build(self.focus, week_start)
    }

    pub fn events_on_day(&self, day: CalendarDate) -> Vec<&Event> {
        events_on_day(&self.events, day)
    }

    pub fn events_in_focus(&self) -> impl Iterator<Item = &Event> {
        self.events
            .iter()
            .filter(move |event| self.focus.contains(event.date))
    }

    fn push(&mut self, event: Event) -> &Event {
        info!(id = %event.id, date = %event.date, title = %event.title, "event added");
        self.events.push(event);
        let last = self.events.len() - 1;
        &self.events[last]
    }
}

pub fn is_today(day: CalendarDate, today: CalendarDate) -> bool {
    day == today
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(year: i32, month: u32, day: u32) -> CalendarDate {
        CalendarDate::new(year, month, day).expect("valid date")
    }

    fn state() -> AppState {
        AppState::new(YearMonth::new(2024, 0).expect("valid month"))
    }

    #[test]
    fn navigation_rolls_over_year_boundaries() {
        let mut app = state();
        app.navigate_prev().expect("navigate");
        assert_eq!(app.focus(), YearMonth::new(2023, 11).expect("valid month"));
        app.navigate_next().expect("navigate");
        app.navigate_next().expect("navigate");
        assert_eq!(app.focus(), YearMonth::new(2024, 1).expect("valid month"));
        app.navigate_today(date(2026, 9, 18));
        assert_eq!(app.focus(), YearMonth::new(2026, 9).expect("valid month"));
    }

    #[test]
    fn failed_navigation_keeps_focus() {
        let edge = YearMonth::new(i32::MAX, 11).expect("valid month");
        let mut app = AppState::new(edge);
        assert!(app.navigate_next().is_err());
        assert_eq!(app.focus(), edge);
        app.navigate_prev().expect("navigate");
        assert_eq!(app.focus().month(), 10);
    }

    #[test]
    fn save_modal_appends_and_closes() {
        let mut app = state();
        app.open_modal(date(2024, 0, 15));
        {
            let form = app.modal_mut().expect("form open");
            form.title = "Yalda".to_string();
            form.description = "longest night".to_string();
        }

        let saved = app.save_modal().expect("save form").clone();
        assert_eq!(saved.date, date(2024, 0, 15));
        assert!(app.modal().is_none());
        assert_eq!(app.events(), &[saved]);
    }

    #[test]
    fn blank_title_keeps_form_open() {
        let mut app = state();
        app.open_modal(date(2024, 0, 15));
        assert!(app.save_modal().is_err());
        assert!(app.modal().is_some());
        assert!(app.events().is_empty());
    }

    #[test]
    fn save_without_open_form_is_rejected() {
        let mut app = state();
        assert!(matches!(
            app.save_modal(),
            Err(CalendarError::InvalidArgument(_))
        ));
    }

    #[test]
    fn close_modal_discards_draft() {
        let mut app = state();
        app.open_modal(date(2024, 0, 3));
        app.close_modal();
        assert!(app.modal().is_none());
        app.close_modal();
        assert!(app.events().is_empty());
    }

    #[test]
    fn events_are_queried_by_calendar_day() {
        let mut app = state();
        for (title, on) in [
            ("first", date(2024, 0, 15)),
            ("second", date(2024, 0, 15)),
            ("other month", date(2024, 1, 15)),
        ] {
            app.add_event(&EventDraft::with_text(on, title, ""))
                .expect("add event");
        }

        let titles: Vec<_> = app
            .events_on_day(date(2024, 0, 15))
            .iter()
            .map(|e| e.title.as_str())
            .collect();
        assert_eq!(titles, vec!["first", "second"]);
        assert_eq!(app.events_in_focus().count(), 2);
    }

    #[test]
    fn today_marking() {
        let today = date(2024, 0, 15);
        assert!(is_today(date(2024, 0, 15), today));
        assert!(!is_today(date(2024, 0, 16), today));
        assert!(!is_today(date(2023, 0, 15), today));
    }
}

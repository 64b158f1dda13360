use std::collections::BTreeMap;

use serde::Serialize;
use uuid::Uuid;

use crate::date::CalendarDate;
use crate::error::{CalendarError, CalendarResult};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Event {
    pub id: String,
    pub date: CalendarDate,
    pub title: String,
    pub description: String,
}

impl Event {
    pub fn from_draft(draft: &EventDraft) -> CalendarResult<Self> {
        draft.validate()?;
        Ok(Self {
            id: Uuid::new_v4().to_string(),
            date: draft.date,
            title: draft.title.clone(),
            description: draft.description.clone(),
        })
    }
}

pub fn events_on_day(events: &[Event], day: CalendarDate) -> Vec<&Event> {
    events.iter().filter(|event| event.date == day).collect()
}

#[derive(Debug)]
pub struct EventIndex<'a> {
    events: &'a [Event],
    by_day: BTreeMap<CalendarDate, Vec<usize>>,
}

impl<'a> EventIndex<'a> {
    pub fn new(events: &'a [Event]) -> Self {
        let mut by_day: BTreeMap<CalendarDate, Vec<usize>> = BTreeMap::new();
        for (idx, event) in events.iter().enumerate() {
            by_day.entry(event.date).or_default().push(idx);
        }
        Self { events, by_day }
    }

    pub fn on_day(&self, day: CalendarDate) -> Vec<&'a Event> {
        let events = self.events;
        self.by_day
            .get(&day)
            .map(|indices| indices.iter().map(|&idx| &events[idx]).collect())
            .unwrap_or_default()
    }

    pub fn count_on_day(&self, day: CalendarDate) -> usize {
        self.by_day.get(&day).map_or(0, Vec::len)
    }

    pub fn days(&self) -> impl Iterator<Item = CalendarDate> + '_ {
        self.by_day.keys().copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EventDraft {
    pub date: CalendarDate,
    pub title: String,
    pub description: String,
    pub error: Option<String>,
}

impl EventDraft {
    pub fn new(date: CalendarDate) -> Self {
        Self {
            date,
            title: String::new(),
            description: String::new(),
            error: None,
        }
    }

    pub fn with_text(date: CalendarDate, title: &str, description: &str) -> Self {
        Self {
            title: title.to_string(),
            description: description.to_string(),
            ..Self::new(date)
        }
    }

    pub fn validate(&self) -> CalendarResult<()> {
        if self.title.trim().is_empty() {
            return Err(CalendarError::invalid_argument("event title must not be empty"));
        }
        Ok(())
    }
}

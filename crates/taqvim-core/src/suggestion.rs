//! Seam for the title/description suggestion service.
//!
//! No network-backed source ships with this crate; the session only needs
//! the contract so a draft can be filled from whatever source is plugged in.

use tracing::{debug, warn};

use crate::date::CalendarDate;
use crate::event::EventDraft;

pub const SUGGESTION_ERROR_MESSAGE: &str =
    "خطا در ارتباط با هوش مصنوعی. لطفاً دوباره تلاش کنید.";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    pub title: String,
    pub description: String,
}

pub trait SuggestionSource {
    fn suggest(&self, date: CalendarDate) -> anyhow::Result<Suggestion>;
}

impl EventDraft {
    pub fn request_suggestion(&mut self, source: &dyn SuggestionSource) {
        self.error = None;
        let result = source.suggest(self.date);
        self.apply_suggestion(result);
    }

    /// A suggestion is applied only when both fields are non-blank. Anything
    /// else leaves the typed text untouched and records a user-facing message.
    pub fn apply_suggestion(&mut self, result: anyhow::Result<Suggestion>) {
        match result {
            Ok(suggestion)
                if !suggestion.title.trim().is_empty()
                    && !suggestion.description.trim().is_empty() =>
            {
                debug!(date = %self.date, "applying suggestion");
                self.title = suggestion.title;
                self.description = suggestion.description;
                self.error = None;
            }
            Ok(_) => {
                warn!(date = %self.date, "suggestion came back incomplete");
                self.error = Some(SUGGESTION_ERROR_MESSAGE.to_string());
            }
            Err(err) => {
                warn!(date = %self.date, error = %err, "suggestion request failed");
                self.error = Some(SUGGESTION_ERROR_MESSAGE.to_string());
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use anyhow::anyhow;

    use super::*;

    struct Fixed(Suggestion);

    impl SuggestionSource for Fixed {
        fn suggest(&self, _date: CalendarDate) -> anyhow::Result<Suggestion> {
            Ok(self.0.clone())
        }
    }

    struct Failing {
        calls: Cell<usize>,
    }

    impl SuggestionSource for Failing {
        fn suggest(&self, _date: CalendarDate) -> anyhow::Result<Suggestion> {
            self.calls.set(self.calls.get() + 1);
            Err(anyhow!("upstream unavailable"))
        }
    }

    fn draft() -> EventDraft {
        let date = CalendarDate::new(2024, 2, 20).expect("valid date");
        EventDraft::with_text(date, "typed title", "typed description")
    }

    #[test]
    fn success_overwrites_fields() {
        let mut form = draft();
        form.request_suggestion(&Fixed(Suggestion {
            title: "جشن".to_string(),
            description: "یک دورهمی کوچک".to_string(),
        }));

        assert_eq!(form.title, "جشن");
        assert_eq!(form.description, "یک دورهمی کوچک");
        assert!(form.error.is_none());
    }

    #[test]
    fn failure_keeps_fields_and_sets_message() {
        let mut form = draft();
        let source = Failing { calls: Cell::new(0) };
        form.request_suggestion(&source);

        assert_eq!(source.calls.get(), 1);
        assert_eq!(form.title, "typed title");
        assert_eq!(form.description, "typed description");
        assert_eq!(form.error.as_deref(), Some(SUGGESTION_ERROR_MESSAGE));
    }

    #[test]
    fn blank_suggestion_counts_as_failure() {
        let mut form = draft();
        form.apply_suggestion(Ok(Suggestion {
            title: " ".to_string(),
            description: "ignored".to_string(),
        }));
        assert_eq!(form.title, "typed title");
        assert!(form.error.is_some());

        let mut form = draft();
        form.apply_suggestion(Ok(Suggestion {
            title: "T".to_string(),
            description: String::new(),
        }));
        assert_eq!(form.title, "typed title");
        assert_eq!(form.description, "typed description");
        assert_eq!(form.error.as_deref(), Some(SUGGESTION_ERROR_MESSAGE));
    }

    #[test]
    fn later_success_clears_previous_error() {
        let mut form = draft();
        form.apply_suggestion(Err(anyhow!("boom")));
        assert!(form.error.is_some());
        form.apply_suggestion(Ok(Suggestion {
            title: "t".to_string(),
            description: "d".to_string(),
        }));
        assert!(form.error.is_none());
    }
}

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),
}

impl CalendarError {
    pub fn invalid_argument<S: Into<String>>(msg: S) -> Self {
        Self::InvalidArgument(msg.into())
    }
}

pub type CalendarResult<T> = Result<T, CalendarError>;

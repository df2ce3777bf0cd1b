use thiserror::Error;

/// Error taxonomy shared by the stores and the dialogue engine.
///
/// The first three kinds are recovered inside a dialogue turn; `Storage`
/// is surfaced to the transport.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CalendarError {
    /// Malformed input.
    #[error("Invalid input: {0}")]
    Validation(String),
    /// The actor may not perform the action.
    #[error("Permission denied: {0}")]
    Permission(String),
    /// The event does not exist or is hidden from the actor.
    #[error("Not found: {0}")]
    NotFound(String),
    /// The store failed or timed out.
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Discriminant of [`CalendarError`], carried on responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// See [`CalendarError::Validation`].
    Validation,
    /// See [`CalendarError::Permission`].
    Permission,
    /// See [`CalendarError::NotFound`].
    NotFound,
    /// See [`CalendarError::Storage`].
    Storage,
}

/// Result alias used throughout the domain core.
pub type CalendarResult<T> = Result<T, CalendarError>;

impl CalendarError {
    /// Discriminant of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            CalendarError::Validation(_) => ErrorKind::Validation,
            CalendarError::Permission(_) => ErrorKind::Permission,
            CalendarError::NotFound(_) => ErrorKind::NotFound,
            CalendarError::Storage(_) => ErrorKind::Storage,
        }
    }

    /// Whether the dialogue can recover from this error without the transport.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, CalendarError::Storage(_))
    }

    /// Text shown to the actor when the error ends their dialogue step.
    pub fn user_message(&self) -> String {
        match self {
            CalendarError::Validation(detail) => format!("Invalid input: {detail}"),
            CalendarError::Permission(detail) => format!("Not allowed: {detail}"),
            CalendarError::NotFound(_) => "This event is no longer available.".to_string(),
            CalendarError::Storage(_) => "Operation failed, please try again later.".to_string(),
        }
    }
}

impl From<sqlx::Error> for CalendarError {
    fn from(err: sqlx::Error) -> Self {
        CalendarError::Storage(err.to_string())
    }
}

use thiserror::Error;

/// Shown to the user for every failed exchange with the optimizer.
pub const GENERIC_FAILURE_MESSAGE: &str =
    "Unable to connect to optimization service. Please try again later.";

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ValidationError {
    #[error("home size {0} is outside 500..=10000 sq ft")]
    HomeSize(u32),
    #[error("target temperature {0} is outside 60..=85 F")]
    Temperature(f64),
    #[error("invalid time of day '{0}', expected HH:MM")]
    TimeOfDay(String),
    #[error("expected {expected} {what} entries, got {actual}")]
    Length {
        what: &'static str,
        expected: usize,
        actual: usize,
    },
}

#[derive(Error, Debug)]
pub enum ClientError {
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("optimizer answered HTTP {0}")]
    Status(reqwest::StatusCode),
    #[error("undecodable optimizer response: {0}")]
    Decode(#[from] serde_json::Error),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("HourlyTemperature has {rows} rows, need at least {required}")]
    ShortPayload { rows: usize, required: usize },
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum SessionError {
    #[error("an optimization is already in progress")]
    Busy,
    #[error("no previous request to retry")]
    NothingToRetry,
    #[error(transparent)]
    Validation(#[from] ValidationError),
}

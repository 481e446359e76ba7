use chrono::NaiveDate;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    #[error("month must be between 1 and 12, got {0}")]
    InvalidMonth(u32),
    #[error("date {year}-{month:02} is out of range")]
    OutOfRange { year: i32, month: u32 },
    #[error("range end {end} is before start {start}")]
    InvalidRange { start: NaiveDate, end: NaiveDate },
    #[error("unknown {kind} `{value}`")]
    UnknownVariant { kind: &'static str, value: String },
}

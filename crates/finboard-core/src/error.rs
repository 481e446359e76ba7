use finboard_domain::{DomainError, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("invalid recurrence rule: {0}")]
    InvalidRule(ValidationErrors),
    #[error("trend window must cover at least one month")]
    EmptyTrendWindow,
    #[error(transparent)]
    Domain(#[from] DomainError),
}

use std::fmt;

use thiserror::Error;

use finboard_config::ConfigError;
use finboard_core::CoreError;
use finboard_domain::ValidationErrors;
use finboard_store::StoreError;

use crate::state::Resource;

/// Failure surfaced by a [`FinanceStore`](crate::state::FinanceStore) operation. None of
/// them leave the state half-applied.
#[derive(Debug, Error)]
pub enum AppError {
    /// Rejected before reaching the data store.
    #[error("invalid input: {0}")]
    Validation(ValidationErrors),
    #[error(transparent)]
    Store(StoreError),
    #[error(transparent)]
    Import(#[from] TransferError),
    #[error("initial load failed: {}", StartupFailures(.0))]
    Startup(Vec<(Resource, StoreError)>),
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Core(#[from] CoreError),
}

impl AppError {
    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation(_))
    }

    /// Field errors when the failure is a validation error.
    pub fn field_errors(&self) -> Option<&ValidationErrors> {
        match self {
            AppError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<StoreError> for AppError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Validation(errors) => AppError::Validation(errors),
            other => AppError::Store(other),
        }
    }
}

struct StartupFailures<'a>(&'a [(Resource, StoreError)]);

impl fmt::Display for StartupFailures<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (resource, err)) in self.0.iter().enumerate() {
            if index > 0 {
                f.write_str("; ")?;
            }
            write!(f, "{resource}: {err}")?;
        }
        Ok(())
    }
}

/// Errors raised while writing or reading export documents.
#[derive(Debug, Error)]
pub enum TransferError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid file: {0}")]
    Malformed(#[from] serde_json::Error),
    #[error("invalid file: missing `{0}`")]
    MissingField(&'static str),
}

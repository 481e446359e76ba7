use finboard_config::ConfigError;
use finboard_domain::ValidationErrors;
use thiserror::Error;
use uuid::Uuid;

pub type StoreResult<T> = Result<T, StoreError>;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("data store answered {status}: {message}")]
    Status { status: u16, message: String },

    #[error("could not decode {entity}: {message}")]
    Decode { entity: &'static str, message: String },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    #[error("data store returned no {0} row")]
    EmptyResponse(&'static str),

    #[error(transparent)]
    Validation(#[from] ValidationErrors),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

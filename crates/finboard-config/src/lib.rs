//! finboard-config
//!
//! Runtime configuration (data store endpoint, credentials, owner, view windows) and the
//! user preferences carried by settings backups. Owns disk persistence and environment
//! overrides.

pub mod error;
pub mod manager;
pub mod model;

pub use error::ConfigError;
pub use manager::{ConfigManager, HOME_ENV, STORE_KEY_ENV, STORE_URL_ENV};
pub use model::{Config, NotificationSettings, Preferences, StoreConfig, Theme};

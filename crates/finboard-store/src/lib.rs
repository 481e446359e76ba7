//! finboard-store
//!
//! Data store gateway: the async [`DataStore`] contract plus two implementations,
//! an in-process [`MemoryStore`] and the [`RestStore`] HTTP client for a PostgREST-style
//! backend.

pub mod error;
pub mod gateway;
pub mod memory;
pub mod query;
pub mod rest;
pub mod rows;

pub use error::{StoreError, StoreResult};
pub use gateway::{CategorySpend, DashboardSummary, DataStore};
pub use memory::MemoryStore;
pub use rest::RestStore;

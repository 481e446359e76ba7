//! finboard-core
//!
//! Recurrence expansion and the aggregation engine behind dashboards and reports.
//! Depends on finboard-domain. Pure functions over loaded data: no network, no storage.

pub mod balance_service;
pub mod budget_service;
pub mod error;
pub mod forecast_service;
pub mod recurrence_service;
pub mod schedule_service;
pub mod summary_service;
pub mod time;
pub mod trend_service;

pub use balance_service::*;
pub use budget_service::*;
pub use error::CoreError;
pub use forecast_service::*;
pub use recurrence_service::*;
pub use schedule_service::*;
pub use summary_service::*;
pub use time::{Clock, FixedClock, SystemClock};
pub use trend_service::*;

#![doc(test(attr(deny(warnings))))]

//! finboard keeps the working state of a personal-finance dashboard: accounts,
//! categories, transactions, tags and budgets loaded from a remote data store, the
//! filters applied to them, and the reports derived from both.
//!
//! The member crates carry the layers underneath: `finboard-domain` (model),
//! `finboard-core` (recurrence and aggregation), `finboard-config` and
//! `finboard-store` (the data store gateway).

pub mod errors;
pub mod state;
pub mod transfer;
pub mod utils;

pub use errors::{AppError, TransferError};
pub use state::{Action, AppState, FinanceStore, Notice, NoticeLevel, Resource};

use std::sync::Once;

static INIT_TRACING: Once = Once::new();

/// Initializes global tracing and emits a startup info log.
pub fn init() {
    INIT_TRACING.call_once(|| {
        utils::init_tracing();
        tracing::info!("finboard tracing initialized");
    });
}

//! finboard-domain
//!
//! Pure domain models (Account, Category, Transaction, Tag, Budget, FilterSet).
//! No I/O, no network, no storage. Only data types, enums and field validation.

pub mod account;
pub mod budget;
pub mod category;
pub mod common;
pub mod error;
pub mod filter;
pub mod recurrence;
pub mod tag;
pub mod transaction;
pub mod validation;

pub use account::*;
pub use budget::*;
pub use category::*;
pub use common::*;
pub use error::DomainError;
pub use filter::*;
pub use recurrence::*;
pub use tag::*;
pub use transaction::*;
pub use validation::ValidationErrors;

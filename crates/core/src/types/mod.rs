//! Core value types for LocaLazy.
//!
//! Type-safe wrappers for ids, prices, emails and the status enums that
//! drive orders and user accounts.

pub mod email;
pub mod id;
pub mod price;
pub mod status;

pub use email::{Email, EmailError};
pub use id::*;
pub use price::Price;
pub use status::*;

//! LocaLazy Core - domain types and state logic.
//!
//! Used by the `storefront` crate, which keeps per-visitor state in the
//! session and the order book and store inventory in process memory.
//!
//! # Architecture
//!
//! The core crate contains only types and pure state transitions - no I/O,
//! no HTTP, no clocks or randomness it does not receive from the caller.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, prices, emails and statuses
//! - [`catalog`] - Shops and the items they sell
//! - [`cart`] - The single-shop cart
//! - [`order`] - Orders and the shared order book
//! - [`user`] - User kinds, profiles and form validation
//! - [`visitor`] - Per-session state
//! - [`inventory`] - The store dashboard's product table
//! - [`location`] - Known delivery locations

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod inventory;
pub mod location;
pub mod order;
pub mod types;
pub mod user;
pub mod visitor;

pub use types::*;

//! Bella Core - Shared domain types.
//!
//! This crate provides the types used across the Bella storefront components:
//! - `storefront` - Cart store, persistence and checkout handoff
//! - `cli` - Terminal front end for the cart
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, quantities, emails, and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Bella storefront library.
//!
//! Shopping cart and its durable persistence, the checkout handoff to the
//! seller, and the seller's order management.
//!
//! # Modules
//!
//! - [`cart`] - Cart state, the store, and its observer pipeline
//! - [`storage`] - Durable key-value slots the cart persists to
//! - [`catalog`] - Adding catalog products to the cart
//! - [`checkout`] - Order placement and WhatsApp handoff
//! - [`orders`] - Seller order listing and status changes
//! - [`backend`] - Backend traits and REST client
//! - [`config`] - Environment configuration
//! - [`error`] - Unified error type with Sentry reporting
//! - [`state`] - Shopper session

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod backend;
pub mod cart;
pub mod catalog;
pub mod checkout;
pub mod config;
pub mod error;
pub mod orders;
pub mod state;
pub mod storage;

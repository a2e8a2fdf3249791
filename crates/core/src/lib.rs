//! Shopfront Core - Shared domain types.
//!
//! This crate provides the primitives used by every Shopfront component:
//! - `client` - Authenticated REST client for the storefront and admin API
//! - `cli` - Command-line front end built on the client
//!
//! # Architecture
//!
//! The core crate contains only types and traits - no I/O and no HTTP
//! clients. The client crate maps loosely-shaped wire data onto these types
//! at its boundary.
//!
//! # Modules
//!
//! - [`types`] - Typed IDs, prices, emails, and order/user statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;

//! Basket Core - Shared domain types.
//!
//! This crate provides the types shared by every Basket component:
//! - `web` - The shopping-list web application
//! - `cli` - Command-line tools for migrations and account management
//!
//! # Architecture
//!
//! The core crate contains only types and pure functions - no I/O, no database
//! access, no HTTP. This keeps it lightweight and easy to test.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for IDs, emails, money, quantities and list status
//! - [`category`] - Keyword-based grocery category classification
//! - [`snapshot`] - JSON snapshot format for exporting and importing list history

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod category;
pub mod snapshot;
pub mod types;

pub use types::*;

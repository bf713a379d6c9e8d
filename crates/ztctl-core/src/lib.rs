//! # ztctl-core
//!
//! Core types and utilities for the `ztctl` ZeroTier Central client.
//!
//! This crate provides error handling, configuration loading, HTTP client
//! settings and the output primitives shared by the API and CLI crates.
//!
//! ## Modules
//!
//! - [`error`] - Error types and conversions
//! - [`config`] - Configuration file loading and validation
//! - [`client`] - HTTP client settings and base URL normalization
//! - [`format`] - TOML/YAML/JSON encoding for display
//! - [`table`] - Border-free text tables
//! - [`util`] - Small generic helpers

#![deny(missing_docs)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod client;
pub mod config;
pub mod error;
pub mod format;
pub mod table;
pub mod util;

// Re-export commonly used types
pub use error::{Error, Result};
pub use format::dumps;
pub use table::{render_table, Cell};

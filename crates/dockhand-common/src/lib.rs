//! # dockhand-common
//!
//! Shared types for the dockhand Docker Engine client.
//!
//! This crate provides common functionality used across all dockhand crates:
//! - The error enumeration returned by every API call
//! - Client configuration (daemon address, API version, timeouts)

#![warn(missing_docs)]

pub mod config;
pub mod error;

pub use config::ClientConfig;
pub use error::{DockhandError, DockhandResult};

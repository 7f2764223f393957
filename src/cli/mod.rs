//! CLI module - Command-line interface for the application.
//!
//! Provides commands for:
//! - `summary` - Dispatch board and workshop overview
//! - `mileage` - Monthly mileage goal progress
//! - `overdue` - Overdue service orders
//! - `check-login` - Credential check with audit trail

pub mod args;

pub use args::{Cli, Commands};

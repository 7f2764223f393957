//! Commands module - CLI command implementations.
//!
//! Each command is implemented in its own module for separation of concerns.

pub mod check_login;
pub mod mileage;
pub mod overdue;
pub mod summary;

use serde::Serialize;

use crate::errors::AppResult;

/// Pretty-print a command result as JSON on stdout.
pub(crate) fn print_json<T: Serialize + ?Sized>(value: &T) -> AppResult<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

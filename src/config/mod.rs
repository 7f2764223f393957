//! Application configuration module
//!
//! Handles environment variables and business constants.

mod constants;
mod settings;

pub use constants::*;
pub use settings::Config;

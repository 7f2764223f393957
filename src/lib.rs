//! Fleet Office - role-based fleet back office
//!
//! Personnel, vehicles, trips, maintenance, workshop service orders,
//! personnel requests, alerts and an audit log, shared between
//! administrators, drivers, workshop technicians and dispatchers.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and rules
//! - **services**: Application use cases, permission checks, audit
//! - **infra**: Entity store, Unit of Work, clock, alert markers, seed data
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Dispatch board over the bundled demo data
//! cargo run -- summary
//!
//! # Mileage goal progress for one driver
//! cargo run -- mileage --driver user1
//!
//! # Check a credential pair and show the audit trail it produced
//! FLEET_PASSWORD=password cargo run -- check-login admin
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;

// Re-export commonly used types at crate root
pub use config::Config;
pub use domain::{Password, User, UserRole};
pub use errors::{AppError, AppResult};
pub use services::{ServiceContainer, Services, Session};

//! Application services layer - Use cases and business logic.
//!
//! Services orchestrate domain logic and infrastructure to fulfill
//! application use cases. They depend on abstractions (traits) for
//! dependency inversion.
//!
//! Mutations check the session's permission first, then run as a single
//! Unit of Work transaction that also writes the audit entry.

mod alert_service;
mod audit_service;
mod auth_service;
pub mod container;
mod fleet_service;
mod request_service;
mod session;
mod trip_service;
mod user_service;
mod workshop_service;

// Service Container
pub use container::{ServiceContainer, Services};

// Service traits and implementations
pub use alert_service::{AlertManager, AlertService};
pub use audit_service::{AuditLog, AuditService};
pub use auth_service::{AuthService, Authenticator};
pub use fleet_service::{DispatchSummary, FleetManager, FleetService};
pub use request_service::{RequestManager, RequestService};
pub use session::Session;
pub use trip_service::{DriverStats, TripManager, TripService};
pub use user_service::{UserManager, UserService};
pub use workshop_service::{WorkshopManager, WorkshopService};

#[cfg(any(test, feature = "test-utils"))]
pub use container::MockServiceContainer;

//! Domain layer - Core business entities and rules
//!
//! Entities, value objects and the pure rules that govern them
//! (state machines, visibility, mileage accounting). Nothing here knows
//! about the store, the clock or the alert marker backend.

pub mod alert;
pub mod audit;
pub mod mileage;
pub mod password;
pub mod request;
pub mod service_order;
pub mod trip;
pub mod user;
pub mod vehicle;

pub use alert::{Alert, AlertTarget, NewAlert};
pub use audit::LogEntry;
pub use mileage::{CycleWindow, MileageProgress};
pub use password::Password;
pub use request::{NewRequest, Recipient, Request, RequestStatus, RequestType};
pub use service_order::{overdue_orders, ServiceOrder, ServiceOrderStatus};
pub use trip::{NewTrip, Trip, TripStatus, WarehouseLocation};
pub use user::{NewUser, Permission, User, UserRole};
pub use vehicle::{
    last_maintenance_date, MaintenanceRecord, NewMaintenanceRecord, NewVehicle, Vehicle,
    VehicleStatus,
};

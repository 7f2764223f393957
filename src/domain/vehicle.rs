//! Vehicles and their maintenance history.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

/// Availability of a vehicle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VehicleStatus {
    EnRoute,
    Available,
    InRepair,
}

impl VehicleStatus {
    /// Label shown on the dashboards.
    pub fn label(&self) -> &'static str {
        match self {
            VehicleStatus::EnRoute => "در مسیر",
            VehicleStatus::Available => "در دسترس",
            VehicleStatus::InRepair => "در دست تعمیر",
        }
    }
}

impl std::fmt::Display for VehicleStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Vehicle domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: Uuid,
    pub code: String,
    pub vehicle_type: String,
    pub plate_number: String,
    /// Driver currently holding the vehicle
    pub driver_id: Option<Uuid>,
    pub status: VehicleStatus,
}

impl Vehicle {
    /// Short human reference used in audit messages, e.g. `Volvo FH500 (TR-102)`.
    pub fn describe(&self) -> String {
        format!("{} ({})", self.vehicle_type, self.code)
    }

    pub fn is_available(&self) -> bool {
        matches!(self.status, VehicleStatus::Available)
    }
}

/// Vehicle creation data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewVehicle {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub code: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub vehicle_type: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub plate_number: String,
}

/// A completed maintenance job. Immutable once recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaintenanceRecord {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub date: NaiveDate,
    pub service_type: String,
    /// Cost in rials
    pub cost: u64,
}

/// Maintenance record creation data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewMaintenanceRecord {
    pub vehicle_id: Uuid,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub service_type: String,
    pub cost: u64,
    pub date: NaiveDate,
}

/// Most recent maintenance date for a vehicle.
pub fn last_maintenance_date<'a>(
    records: impl IntoIterator<Item = &'a MaintenanceRecord>,
    vehicle_id: Uuid,
) -> Option<NaiveDate> {
    records
        .into_iter()
        .filter(|r| r.vehicle_id == vehicle_id)
        .map(|r| r.date)
        .max()
}

//! Trips: cargo runs performed by a driver with their assigned vehicle.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Trip lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TripStatus {
    Planned,
    InProgress,
    Completed,
}

impl TripStatus {
    pub fn label(&self) -> &'static str {
        match self {
            TripStatus::Planned => "برنامه ریزی شده",
            TripStatus::InProgress => "در حال انجام",
            TripStatus::Completed => "تکمیل شده",
        }
    }
}

impl std::fmt::Display for TripStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Warehouses where trucks queue for unloading.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WarehouseLocation {
    CentralWarehouse,
    Panda,
    DairyCity,
}

impl WarehouseLocation {
    pub fn label(&self) -> &'static str {
        match self {
            WarehouseLocation::CentralWarehouse => "انبار مرکزی",
            WarehouseLocation::Panda => "پاندا",
            WarehouseLocation::DairyCity => "شهر لبنیات",
        }
    }
}

impl std::fmt::Display for WarehouseLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Trip domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Trip {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub driver_id: Uuid,
    pub origin: String,
    pub destination: String,
    pub cargo_type: String,
    /// Round-trip distance in kilometres
    pub distance_km: u32,
    pub start_date: NaiveDate,
    pub end_date: Option<NaiveDate>,
    pub status: TripStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_arrival: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub warehouse_location: Option<WarehouseLocation>,
}

impl Trip {
    /// Planned and in-progress trips are active; completed ones are history.
    pub fn is_active(&self) -> bool {
        !matches!(self.status, TripStatus::Completed)
    }

    /// Planned trips have not driven a kilometre yet.
    pub fn counts_toward_mileage(&self) -> bool {
        matches!(self.status, TripStatus::InProgress | TripStatus::Completed)
    }

    pub fn start(&mut self) -> AppResult<()> {
        if self.status != TripStatus::Planned {
            return Err(AppError::transition(self.status, TripStatus::InProgress));
        }
        self.status = TripStatus::InProgress;
        Ok(())
    }

    pub fn complete(&mut self, end_date: NaiveDate) -> AppResult<()> {
        if self.status != TripStatus::InProgress {
            return Err(AppError::transition(self.status, TripStatus::Completed));
        }
        if end_date < self.start_date {
            return Err(AppError::validation("Trip cannot end before it starts"));
        }
        self.status = TripStatus::Completed;
        self.end_date = Some(end_date);
        Ok(())
    }

    /// Record arrival at a warehouse queue. Only active trips accept it.
    pub fn check_in(&mut self, arrival: DateTime<Utc>, location: WarehouseLocation) -> AppResult<()> {
        if !self.is_active() {
            return Err(AppError::validation(
                "Warehouse check-in is only possible for active trips",
            ));
        }
        self.warehouse_arrival = Some(arrival);
        self.warehouse_location = Some(location);
        Ok(())
    }
}

/// Trip creation data. The vehicle is the driver's current assignment.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewTrip {
    pub driver_id: Uuid,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub origin: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub destination: String,
    pub cargo_type: String,
    #[validate(range(min = 1, message = "must be a positive distance"))]
    pub distance_km: u32,
    pub start_date: NaiveDate,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planned() -> Trip {
        Trip {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            driver_id: Uuid::new_v4(),
            origin: "Tehran".to_string(),
            destination: "Bandar Abbas".to_string(),
            cargo_type: "steel".to_string(),
            distance_km: 2_400,
            start_date: "2024-07-15".parse().unwrap(),
            end_date: None,
            status: TripStatus::Planned,
            warehouse_arrival: None,
            warehouse_location: None,
        }
    }

    #[test]
    fn test_lifecycle() {
        let mut trip = planned();
        assert!(!trip.counts_toward_mileage());

        trip.start().unwrap();
        assert!(trip.counts_toward_mileage());

        trip.complete("2024-07-18".parse().unwrap()).unwrap();
        assert_eq!(trip.status, TripStatus::Completed);
        assert!(!trip.is_active());
    }

    #[test]
    fn test_cannot_complete_planned_trip() {
        let mut trip = planned();
        let err = trip.complete("2024-07-18".parse().unwrap()).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
    }

    #[test]
    fn test_end_before_start_rejected() {
        let mut trip = planned();
        trip.start().unwrap();
        assert!(trip.complete("2024-07-01".parse().unwrap()).is_err());
        assert_eq!(trip.status, TripStatus::InProgress);
    }

    #[test]
    fn test_check_in_rejected_on_completed_trip() {
        let mut trip = planned();
        trip.start().unwrap();
        trip.complete("2024-07-18".parse().unwrap()).unwrap();

        let result = trip.check_in(Utc::now(), WarehouseLocation::Panda);
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(trip.warehouse_location.is_none());
    }
}

//! Fleet service - Vehicles, maintenance history and the dispatch board.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::Session;
use crate::domain::{
    last_maintenance_date, MaintenanceRecord, NewMaintenanceRecord, NewVehicle, Permission, Trip,
    TripStatus, Vehicle, VehicleStatus,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Dispatch board: who is waiting, who has cargo, who is on the road.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchSummary {
    /// Available vehicles with a driver, waiting for cargo
    pub in_queue: Vec<Vehicle>,
    /// Planned trips
    pub assigned: Vec<Trip>,
    /// Trips in progress
    pub en_route: Vec<Trip>,
}

/// Fleet service trait for dependency injection.
#[async_trait]
pub trait FleetService: Send + Sync {
    async fn add_vehicle(&self, session: &Session, new_vehicle: NewVehicle) -> AppResult<Vehicle>;

    async fn add_maintenance_record(
        &self,
        session: &Session,
        record: NewMaintenanceRecord,
    ) -> AppResult<MaintenanceRecord>;

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Vehicle>;

    /// Newest first
    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>>;

    async fn last_maintenance_date(&self, vehicle_id: Uuid) -> AppResult<Option<NaiveDate>>;

    /// Newest date first
    async fn maintenance_history(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>>;

    async fn dispatch_summary(&self) -> AppResult<DispatchSummary>;
}

/// Concrete implementation of FleetService using Unit of Work.
pub struct FleetManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> FleetManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> FleetService for FleetManager<U> {
    async fn add_vehicle(&self, session: &Session, new_vehicle: NewVehicle) -> AppResult<Vehicle> {
        session.require(Permission::ManageFleet)?;
        new_vehicle.validate()?;

        let actor = session.username().to_string();
        let vehicle = self
            .uow
            .transaction(move |ctx| {
                if ctx
                    .state
                    .vehicles
                    .any(|v| v.plate_number == new_vehicle.plate_number)
                {
                    return Err(AppError::conflict("Plate number"));
                }
                if ctx.state.vehicles.any(|v| v.code == new_vehicle.code) {
                    return Err(AppError::conflict("Vehicle code"));
                }

                let vehicle = Vehicle {
                    id: ctx.next_id(),
                    code: new_vehicle.code,
                    vehicle_type: new_vehicle.vehicle_type,
                    plate_number: new_vehicle.plate_number,
                    driver_id: None,
                    status: VehicleStatus::Available,
                };
                ctx.state.vehicles.prepend(vehicle.clone());
                ctx.record(
                    actor,
                    format!(
                        "خودروی جدید \"{}\" با پلاک \"{}\" را اضافه کرد.",
                        vehicle.describe(),
                        vehicle.plate_number
                    ),
                );
                Ok(vehicle)
            })
            .await?;

        tracing::info!(code = %vehicle.code, "Vehicle added");
        Ok(vehicle)
    }

    async fn add_maintenance_record(
        &self,
        session: &Session,
        record: NewMaintenanceRecord,
    ) -> AppResult<MaintenanceRecord> {
        session.require(Permission::ManageFleet)?;
        record.validate()?;

        let actor = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let described = ctx.state.vehicles.require(record.vehicle_id)?.describe();
                let entry = MaintenanceRecord {
                    id: ctx.next_id(),
                    vehicle_id: record.vehicle_id,
                    date: record.date,
                    service_type: record.service_type,
                    cost: record.cost,
                };
                ctx.state.maintenance.push(entry.clone());
                ctx.state.maintenance.sort_by(|a, b| b.date.cmp(&a.date));
                ctx.record(
                    actor,
                    format!("رکورد سرویس جدیدی برای خودروی \"{}\" ثبت کرد.", described),
                );
                Ok(entry)
            })
            .await
    }

    async fn get_vehicle(&self, id: Uuid) -> AppResult<Vehicle> {
        self.uow
            .read(|state| state.vehicles.require(id).cloned())
            .await
    }

    async fn list_vehicles(&self) -> AppResult<Vec<Vehicle>> {
        self.uow.read(|state| Ok(state.vehicles.to_vec())).await
    }

    async fn last_maintenance_date(&self, vehicle_id: Uuid) -> AppResult<Option<NaiveDate>> {
        self.uow
            .read(|state| {
                state.vehicles.require(vehicle_id)?;
                Ok(last_maintenance_date(&state.maintenance, vehicle_id))
            })
            .await
    }

    async fn maintenance_history(&self, vehicle_id: Uuid) -> AppResult<Vec<MaintenanceRecord>> {
        self.uow
            .read(|state| {
                state.vehicles.require(vehicle_id)?;
                Ok(state
                    .maintenance
                    .iter()
                    .filter(|r| r.vehicle_id == vehicle_id)
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn dispatch_summary(&self) -> AppResult<DispatchSummary> {
        self.uow
            .read(|state| {
                let trips_in = |status: TripStatus| -> Vec<Trip> {
                    state
                        .trips
                        .iter()
                        .filter(|t| t.status == status)
                        .cloned()
                        .collect()
                };

                Ok(DispatchSummary {
                    in_queue: state
                        .vehicles
                        .iter()
                        .filter(|v| v.is_available() && v.driver_id.is_some())
                        .cloned()
                        .collect(),
                    assigned: trips_in(TripStatus::Planned),
                    en_route: trips_in(TripStatus::InProgress),
                })
            })
            .await
    }
}

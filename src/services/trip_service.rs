//! Trip service - Dispatching cargo runs and tracking driver mileage.

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use serde::Serialize;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::Session;
use crate::config::Config;
use crate::domain::{
    CycleWindow, MileageProgress, NewTrip, Permission, Trip, TripStatus, UserRole, VehicleStatus,
    WarehouseLocation,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// One row of the driver performance report.
#[derive(Debug, Clone, Serialize)]
pub struct DriverStats {
    pub driver_id: Uuid,
    pub username: String,
    pub vehicle_code: Option<String>,
    /// Kilometres in the current cycle
    pub monthly_km: u64,
    /// Kilometres across every trip on record, planned ones included
    pub total_km: u64,
    pub total_trips: usize,
    pub progress_percent: f64,
}

/// Trip service trait for dependency injection.
#[async_trait]
pub trait TripService: Send + Sync {
    /// Plan a trip on the driver's assigned vehicle
    async fn add_trip(&self, session: &Session, new_trip: NewTrip) -> AppResult<Trip>;

    /// Record arrival at a warehouse queue
    async fn update_trip_warehouse_check_in(
        &self,
        session: &Session,
        trip_id: Uuid,
        arrival: DateTime<Utc>,
        location: WarehouseLocation,
    ) -> AppResult<Trip>;

    async fn start_trip(&self, session: &Session, trip_id: Uuid) -> AppResult<Trip>;

    async fn complete_trip(
        &self,
        session: &Session,
        trip_id: Uuid,
        end_date: NaiveDate,
    ) -> AppResult<Trip>;

    async fn list_trips(&self) -> AppResult<Vec<Trip>>;

    async fn trips_for_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>>;

    /// Progress toward the monthly goal in the cycle containing today
    async fn monthly_mileage(&self, driver_id: Uuid) -> AppResult<MileageProgress>;

    async fn driver_stats(&self) -> AppResult<Vec<DriverStats>>;
}

/// Concrete implementation of TripService using Unit of Work.
pub struct TripManager<U: UnitOfWork> {
    uow: Arc<U>,
    mileage_goal_km: u32,
}

impl<U: UnitOfWork> TripManager<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            mileage_goal_km: config.mileage_goal_km,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> TripService for TripManager<U> {
    async fn add_trip(&self, session: &Session, new_trip: NewTrip) -> AppResult<Trip> {
        session.require(Permission::DispatchTrips)?;
        new_trip.validate()?;

        let actor = session.username().to_string();
        let trip = self
            .uow
            .transaction(move |ctx| {
                let driver = ctx.state.users.require(new_trip.driver_id)?;
                if driver.role != UserRole::Driver {
                    return Err(AppError::validation(format!(
                        "{} is not a driver",
                        driver.username
                    )));
                }
                let driver_name = driver.username.clone();
                let vehicle_id = ctx
                    .state
                    .vehicle_held_by(new_trip.driver_id)
                    .map(|v| v.id)
                    .ok_or_else(|| AppError::validation("Driver has no assigned vehicle"))?;

                let trip = Trip {
                    id: ctx.next_id(),
                    vehicle_id,
                    driver_id: new_trip.driver_id,
                    origin: new_trip.origin,
                    destination: new_trip.destination,
                    cargo_type: new_trip.cargo_type,
                    distance_km: new_trip.distance_km,
                    start_date: new_trip.start_date,
                    end_date: None,
                    status: TripStatus::Planned,
                    warehouse_arrival: None,
                    warehouse_location: None,
                };
                ctx.state.trips.push(trip.clone());
                ctx.record(
                    actor,
                    format!(
                        "سفر \"{}\" به \"{}\" را برای کاربر \"{}\" ثبت کرد.",
                        trip.origin, trip.destination, driver_name
                    ),
                );
                Ok(trip)
            })
            .await?;

        tracing::info!(trip_id = %trip.id, driver_id = %trip.driver_id, "Trip planned");
        Ok(trip)
    }

    async fn update_trip_warehouse_check_in(
        &self,
        session: &Session,
        trip_id: Uuid,
        arrival: DateTime<Utc>,
        location: WarehouseLocation,
    ) -> AppResult<Trip> {
        session.require(Permission::DispatchTrips)?;

        let actor = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let trip = ctx.state.trips.require_mut(trip_id)?;
                trip.check_in(arrival, location)?;
                let trip = trip.clone();
                ctx.record(
                    actor,
                    format!(
                        "ورود سفر \"{}\" به \"{}\" را به انبار \"{}\" ثبت کرد.",
                        trip.origin, trip.destination, location
                    ),
                );
                Ok(trip)
            })
            .await
    }

    async fn start_trip(&self, session: &Session, trip_id: Uuid) -> AppResult<Trip> {
        session.require(Permission::DispatchTrips)?;

        let actor = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let (vehicle_id, driver_id) = {
                    let trip = ctx.state.trips.require(trip_id)?;
                    (trip.vehicle_id, trip.driver_id)
                };
                if ctx.state.vehicles.require(vehicle_id)?.status == VehicleStatus::InRepair {
                    return Err(AppError::validation("Vehicle is in the workshop"));
                }
                // One trip on the road per vehicle and per driver.
                if ctx.state.trips.any(|t| {
                    t.id != trip_id
                        && t.status == TripStatus::InProgress
                        && (t.vehicle_id == vehicle_id || t.driver_id == driver_id)
                }) {
                    return Err(AppError::validation("Vehicle or driver is already on a trip"));
                }

                let trip = ctx.state.trips.require_mut(trip_id)?;
                trip.start()?;
                let trip = trip.clone();

                let vehicle = ctx.state.vehicles.require_mut(vehicle_id)?;
                vehicle.status = VehicleStatus::EnRoute;
                let described = vehicle.describe();

                ctx.record(
                    actor,
                    format!("سفر خودروی \"{}\" به \"{}\" را آغاز کرد.", described, trip.destination),
                );
                Ok(trip)
            })
            .await
    }

    async fn complete_trip(
        &self,
        session: &Session,
        trip_id: Uuid,
        end_date: NaiveDate,
    ) -> AppResult<Trip> {
        session.require(Permission::DispatchTrips)?;

        let actor = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let trip = ctx.state.trips.require_mut(trip_id)?;
                trip.complete(end_date)?;
                let trip = trip.clone();

                let still_on_road = ctx.state.trips.any(|t| {
                    t.vehicle_id == trip.vehicle_id && t.status == TripStatus::InProgress
                });
                let vehicle = ctx.state.vehicles.require_mut(trip.vehicle_id)?;
                if vehicle.status == VehicleStatus::EnRoute && !still_on_road {
                    vehicle.status = VehicleStatus::Available;
                }
                let described = vehicle.describe();

                ctx.record(
                    actor,
                    format!("سفر خودروی \"{}\" به \"{}\" را تکمیل کرد.", described, trip.destination),
                );
                Ok(trip)
            })
            .await
    }

    async fn list_trips(&self) -> AppResult<Vec<Trip>> {
        self.uow.read(|state| Ok(state.trips.to_vec())).await
    }

    async fn trips_for_driver(&self, driver_id: Uuid) -> AppResult<Vec<Trip>> {
        self.uow
            .read(|state| {
                state.users.require(driver_id)?;
                Ok(state
                    .trips
                    .iter()
                    .filter(|t| t.driver_id == driver_id)
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn monthly_mileage(&self, driver_id: Uuid) -> AppResult<MileageProgress> {
        let window = CycleWindow::containing(self.uow.now().date_naive());
        let goal = self.mileage_goal_km;

        self.uow
            .read(|state| {
                state.users.require(driver_id)?;
                Ok(MileageProgress::compute(&state.trips, driver_id, window, goal))
            })
            .await
    }

    async fn driver_stats(&self) -> AppResult<Vec<DriverStats>> {
        let window = CycleWindow::containing(self.uow.now().date_naive());
        let goal = self.mileage_goal_km;

        self.uow
            .read(|state| {
                let stats = state
                    .users
                    .iter()
                    .filter(|u| u.role == UserRole::Driver)
                    .map(|driver| {
                        let progress = MileageProgress::compute(&state.trips, driver.id, window, goal);
                        let (total_trips, total_km) = state
                            .trips
                            .iter()
                            .filter(|t| t.driver_id == driver.id)
                            .fold((0usize, 0u64), |(count, km), t| {
                                (count + 1, km + u64::from(t.distance_km))
                            });

                        DriverStats {
                            driver_id: driver.id,
                            username: driver.username.clone(),
                            vehicle_code: state.vehicle_held_by(driver.id).map(|v| v.code.clone()),
                            monthly_km: progress.total_km,
                            total_km,
                            total_trips,
                            progress_percent: progress.progress_percent,
                        }
                    })
                    .collect();
                Ok(stats)
            })
            .await
    }
}

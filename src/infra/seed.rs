//! Seed data loading.
//!
//! Seed files refer to users by username and to vehicles by code; ids are
//! minted on load and plain-text passwords are hashed before they reach
//! the store.

use std::collections::HashMap;
use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use uuid::Uuid;

use super::clock::IdGenerator;
use super::store::FleetState;
use crate::config::Config;
use crate::domain::{
    MaintenanceRecord, Password, Recipient, Request, RequestStatus, RequestType, ServiceOrder,
    ServiceOrderStatus, Trip, TripStatus, User, UserRole, Vehicle, VehicleStatus,
};
use crate::errors::{AppError, AppResult, OptionExt};

const BUNDLED_SEED: &str = include_str!("../../seed/demo.json");

#[derive(Debug, Deserialize)]
struct SeedUser {
    username: String,
    password: String,
    role: UserRole,
    personnel_code: String,
    phone: String,
    registration_date: DateTime<Utc>,
    last_login: Option<DateTime<Utc>>,
}

#[derive(Debug, Deserialize)]
struct SeedVehicle {
    code: String,
    vehicle_type: String,
    plate_number: String,
    driver: Option<String>,
    status: VehicleStatus,
}

#[derive(Debug, Deserialize)]
struct SeedTrip {
    vehicle: String,
    driver: String,
    origin: String,
    destination: String,
    cargo_type: String,
    distance_km: u32,
    start_date: NaiveDate,
    end_date: Option<NaiveDate>,
    status: TripStatus,
}

#[derive(Debug, Deserialize)]
struct SeedMaintenance {
    vehicle: String,
    date: NaiveDate,
    service_type: String,
    cost: u64,
}

#[derive(Debug, Deserialize)]
struct SeedServiceOrder {
    vehicle: String,
    admission_date: DateTime<Utc>,
    issue_description: String,
    status: ServiceOrderStatus,
    notes: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SeedRequest {
    username: String,
    title: String,
    description: String,
    request_type: RequestType,
    recipient: Recipient,
    status: RequestStatus,
}

/// Initial back-office records.
#[derive(Debug, Deserialize)]
pub struct SeedData {
    users: Vec<SeedUser>,
    #[serde(default)]
    vehicles: Vec<SeedVehicle>,
    #[serde(default)]
    trips: Vec<SeedTrip>,
    #[serde(default)]
    maintenance: Vec<SeedMaintenance>,
    #[serde(default)]
    service_orders: Vec<SeedServiceOrder>,
    #[serde(default)]
    requests: Vec<SeedRequest>,
}

impl SeedData {
    /// The demo data shipped with the crate.
    pub fn bundled() -> AppResult<Self> {
        Ok(serde_json::from_str(BUNDLED_SEED)?)
    }

    pub fn from_path(path: &Path) -> AppResult<Self> {
        let raw = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// `FLEET_SEED_PATH` when configured, the bundled demo data otherwise.
    pub fn load(config: &Config) -> AppResult<Self> {
        match &config.seed_path {
            Some(path) => {
                tracing::info!(path = %path.display(), "Loading seed file");
                Self::from_path(path)
            }
            None => Self::bundled(),
        }
    }

    /// Resolve references, hash passwords and build a consistent state.
    pub fn into_state(self, ids: &dyn IdGenerator) -> AppResult<FleetState> {
        let mut state = FleetState::default();

        let mut user_ids: HashMap<String, Uuid> = HashMap::new();
        for seed in self.users {
            if user_ids.contains_key(&seed.username)
                || state.users.any(|u| u.personnel_code == seed.personnel_code)
            {
                return Err(AppError::validation(format!(
                    "Duplicate seed user '{}'",
                    seed.username
                )));
            }
            let user = User {
                id: ids.next_id(),
                password_hash: Password::new(&seed.password)?.into_string(),
                username: seed.username,
                role: seed.role,
                personnel_code: seed.personnel_code,
                phone: seed.phone,
                registration_date: seed.registration_date,
                last_login: seed.last_login,
            };
            user_ids.insert(user.username.clone(), user.id);
            state.users.push(user);
        }
        let user = |name: &str| {
            user_ids
                .get(name)
                .copied()
                .ok_or_not_found(format!("Seed user '{}'", name).as_str())
        };

        let mut vehicle_ids: HashMap<String, Uuid> = HashMap::new();
        for seed in self.vehicles {
            let driver_id = seed.driver.as_deref().map(&user).transpose()?;
            let vehicle = Vehicle {
                id: ids.next_id(),
                code: seed.code,
                vehicle_type: seed.vehicle_type,
                plate_number: seed.plate_number,
                driver_id,
                status: seed.status,
            };
            vehicle_ids.insert(vehicle.code.clone(), vehicle.id);
            state.vehicles.push(vehicle);
        }
        let vehicle = |code: &str| {
            vehicle_ids
                .get(code)
                .copied()
                .ok_or_not_found(format!("Seed vehicle '{}'", code).as_str())
        };

        for seed in self.trips {
            state.trips.push(Trip {
                id: ids.next_id(),
                vehicle_id: vehicle(&seed.vehicle)?,
                driver_id: user(&seed.driver)?,
                origin: seed.origin,
                destination: seed.destination,
                cargo_type: seed.cargo_type,
                distance_km: seed.distance_km,
                start_date: seed.start_date,
                end_date: seed.end_date,
                status: seed.status,
                warehouse_arrival: None,
                warehouse_location: None,
            });
        }

        for seed in self.maintenance {
            state.maintenance.push(MaintenanceRecord {
                id: ids.next_id(),
                vehicle_id: vehicle(&seed.vehicle)?,
                date: seed.date,
                service_type: seed.service_type,
                cost: seed.cost,
            });
        }
        state.maintenance.sort_by(|a, b| b.date.cmp(&a.date));

        for seed in self.service_orders {
            state.service_orders.push(ServiceOrder {
                id: ids.next_id(),
                vehicle_id: vehicle(&seed.vehicle)?,
                admission_date: seed.admission_date,
                issue_description: seed.issue_description,
                status: seed.status,
                notes: seed.notes,
            });
        }

        for seed in self.requests {
            user(&seed.username)?;
            state.requests.push(Request {
                id: ids.next_id(),
                username: seed.username,
                title: seed.title,
                description: seed.description,
                request_type: seed.request_type,
                recipient: seed.recipient,
                status: seed.status,
            });
        }

        let issues = state.integrity_issues();
        if !issues.is_empty() {
            return Err(AppError::validation(format!(
                "Inconsistent seed data: {}",
                issues.join("; ")
            )));
        }

        tracing::info!(
            users = state.users.len(),
            vehicles = state.vehicles.len(),
            trips = state.trips.len(),
            "Seed data loaded"
        );
        Ok(state)
    }
}

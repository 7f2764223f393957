//! In-memory entity store.
//!
//! `FleetState` owns one [`Table`] per entity. It is only ever mutated
//! through a [`TransactionContext`](super::TransactionContext).

use std::collections::{HashMap, HashSet};

use uuid::Uuid;

use crate::domain::{
    Alert, LogEntry, MaintenanceRecord, Request, ServiceOrder, Trip, User, Vehicle, VehicleStatus,
};
use crate::errors::{AppResult, OptionExt};

/// A row with a stable identifier.
pub trait Record: Clone + Send + Sync {
    /// Entity name used in `NotFound` errors
    const ENTITY: &'static str;

    fn id(&self) -> Uuid;
}

macro_rules! impl_record {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Record for $ty {
                const ENTITY: &'static str = $name;

                fn id(&self) -> Uuid {
                    self.id
                }
            }
        )*
    };
}

impl_record! {
    User => "User",
    Vehicle => "Vehicle",
    Trip => "Trip",
    MaintenanceRecord => "Maintenance record",
    ServiceOrder => "Service order",
    Request => "Request",
    Alert => "Alert",
    LogEntry => "Log entry",
}

/// Ordered collection of records. Order is whatever the owning operation
/// maintains (insertion, newest first, or sorted).
#[derive(Debug, Clone)]
pub struct Table<T> {
    rows: Vec<T>,
}

impl<T> Default for Table<T> {
    fn default() -> Self {
        Self { rows: Vec::new() }
    }
}

impl<T: Record> Table<T> {
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.rows.iter()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn first(&self) -> Option<&T> {
        self.rows.first()
    }

    pub fn get(&self, id: Uuid) -> Option<&T> {
        self.rows.iter().find(|r| r.id() == id)
    }

    pub fn get_mut(&mut self, id: Uuid) -> Option<&mut T> {
        self.rows.iter_mut().find(|r| r.id() == id)
    }

    /// Like [`get`](Self::get) but unknown ids are a `NotFound` error.
    pub fn require(&self, id: Uuid) -> AppResult<&T> {
        self.get(id).ok_or_not_found(T::ENTITY)
    }

    pub fn require_mut(&mut self, id: Uuid) -> AppResult<&mut T> {
        self.get_mut(id).ok_or_not_found(T::ENTITY)
    }

    pub fn find(&self, predicate: impl Fn(&T) -> bool) -> Option<&T> {
        self.rows.iter().find(|r| predicate(*r))
    }

    pub fn find_mut(&mut self, predicate: impl Fn(&T) -> bool) -> Option<&mut T> {
        self.rows.iter_mut().find(|r| predicate(&**r))
    }

    pub fn any(&self, predicate: impl Fn(&T) -> bool) -> bool {
        self.rows.iter().any(predicate)
    }

    pub fn push(&mut self, row: T) {
        self.rows.push(row);
    }

    /// Insert at the front (newest-first tables).
    pub fn prepend(&mut self, row: T) {
        self.rows.insert(0, row);
    }

    /// Stable sort.
    pub fn sort_by<F>(&mut self, compare: F)
    where
        F: FnMut(&T, &T) -> std::cmp::Ordering,
    {
        self.rows.sort_by(compare);
    }

    pub fn to_vec(&self) -> Vec<T> {
        self.rows.clone()
    }
}

impl<'a, T: Record> IntoIterator for &'a Table<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.rows.iter()
    }
}

impl<T: Record> FromIterator<T> for Table<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            rows: iter.into_iter().collect(),
        }
    }
}

/// The whole back office.
#[derive(Debug, Clone, Default)]
pub struct FleetState {
    pub users: Table<User>,
    pub vehicles: Table<Vehicle>,
    pub trips: Table<Trip>,
    /// Newest date first
    pub maintenance: Table<MaintenanceRecord>,
    pub service_orders: Table<ServiceOrder>,
    /// Newest first
    pub requests: Table<Request>,
    /// Newest first
    pub alerts: Table<Alert>,
    /// Newest first
    pub logs: Table<LogEntry>,
    /// Service orders already escalated as overdue
    pub reported_overdue: HashSet<Uuid>,
}

impl FleetState {
    pub fn user_by_username(&self, username: &str) -> Option<&User> {
        self.users.find(|u| u.username == username)
    }

    /// The vehicle currently held by `user_id`, if any.
    pub fn vehicle_held_by(&self, user_id: Uuid) -> Option<&Vehicle> {
        self.vehicles.find(|v| v.driver_id == Some(user_id))
    }

    /// The open (not delivered) service order for a vehicle.
    pub fn open_order_for(&self, vehicle_id: Uuid) -> Option<&ServiceOrder> {
        self.service_orders
            .find(|o| o.vehicle_id == vehicle_id && o.is_open())
    }

    /// Describe every broken structural invariant. Empty when consistent.
    pub fn integrity_issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        let mut holders: HashMap<Uuid, &Vehicle> = HashMap::new();

        for vehicle in &self.vehicles {
            if let Some(driver_id) = vehicle.driver_id {
                if self.users.get(driver_id).is_none() {
                    issues.push(format!(
                        "vehicle {} references unknown driver {}",
                        vehicle.code, driver_id
                    ));
                }
                if let Some(other) = holders.insert(driver_id, vehicle) {
                    issues.push(format!(
                        "driver {} holds both {} and {}",
                        driver_id, other.code, vehicle.code
                    ));
                }
            }

            let in_repair = vehicle.status == VehicleStatus::InRepair;
            let has_open_order = self.open_order_for(vehicle.id).is_some();
            if in_repair != has_open_order {
                issues.push(format!(
                    "vehicle {} is {} but {} open service order",
                    vehicle.code,
                    vehicle.status,
                    if has_open_order { "has an" } else { "has no" }
                ));
            }
        }

        for order in &self.service_orders {
            if self.vehicles.get(order.vehicle_id).is_none() {
                issues.push(format!("service order {} references unknown vehicle", order.id));
            }
        }

        issues
    }
}

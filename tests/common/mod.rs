//! Shared fixtures for integration tests.
//!
//! Every harness runs on the bundled demo data with a pinned clock
//! (2024-07-20 09:00 UTC) and sequential ids.

#![allow(dead_code)]

use std::sync::Arc;

use chrono::{DateTime, TimeZone, Utc};
use uuid::Uuid;

use fleet_office::config::Config;
use fleet_office::infra::{
    FixedClock, FleetState, InMemorySeenMarkers, Persistence, SeedData, SeenMarkerStore,
    SequentialIdGenerator, UnitOfWork,
};
use fleet_office::services::{ServiceContainer, Services, Session};

pub const SEED_PASSWORD: &str = "password";

pub fn at(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 9, 0, 0).unwrap()
}

pub struct Harness {
    pub services: Services,
    pub uow: Arc<Persistence>,
    pub clock: Arc<FixedClock>,
}

impl Harness {
    pub fn new() -> Self {
        Self::with_markers(Arc::new(InMemorySeenMarkers::new()))
    }

    pub fn with_markers(markers: Arc<dyn SeenMarkerStore>) -> Self {
        let ids = Arc::new(SequentialIdGenerator::new());
        let state = SeedData::bundled()
            .unwrap()
            .into_state(ids.as_ref())
            .unwrap();
        Self::with_state(state, ids, markers)
    }

    /// A store with nothing but the given state.
    pub fn with_state(
        state: FleetState,
        ids: Arc<SequentialIdGenerator>,
        markers: Arc<dyn SeenMarkerStore>,
    ) -> Self {
        let clock = Arc::new(FixedClock::new(at(2024, 7, 20)));
        let uow = Arc::new(Persistence::new(state, clock.clone(), ids));
        let services = Services::from_persistence(uow.clone(), markers, &Config::default());
        Self {
            services,
            uow,
            clock,
        }
    }

    pub async fn login(&self, username: &str) -> Session {
        self.services
            .auth()
            .login(username, SEED_PASSWORD)
            .await
            .unwrap()
    }

    pub async fn admin(&self) -> Session {
        self.login("admin").await
    }

    pub async fn snapshot(&self) -> FleetState {
        self.uow.snapshot().await
    }

    pub async fn user_id(&self, username: &str) -> Uuid {
        self.uow
            .read(|s| Ok(s.user_by_username(username).map(|u| u.id)))
            .await
            .unwrap()
            .unwrap()
    }

    pub async fn vehicle_id(&self, code: &str) -> Uuid {
        self.uow
            .read(|s| Ok(s.vehicles.find(|v| v.code == code).map(|v| v.id)))
            .await
            .unwrap()
            .unwrap()
    }
}

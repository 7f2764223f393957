//! Service Container - Centralized service access.
//!
//! All services share one Unit of Work, so every mutation from every
//! service is serialized through the same store lock.

use std::sync::Arc;

use super::{
    AlertManager, AlertService, AuditLog, AuditService, AuthService, Authenticator, FleetManager,
    FleetService, RequestManager, RequestService, TripManager, TripService, UserManager,
    UserService, WorkshopManager, WorkshopService,
};
use crate::config::Config;
use crate::errors::AppResult;
use crate::infra::{
    Clock, FleetState, IdGenerator, InMemorySeenMarkers, Persistence, RedisSeenMarkers, SeedData,
    SeenMarkerStore, SystemClock, UuidGenerator,
};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Service container trait for dependency injection.
///
/// Provides centralized access to all application services.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
pub trait ServiceContainer: Send + Sync {
    fn auth(&self) -> Arc<dyn AuthService>;

    fn users(&self) -> Arc<dyn UserService>;

    fn fleet(&self) -> Arc<dyn FleetService>;

    fn trips(&self) -> Arc<dyn TripService>;

    fn workshop(&self) -> Arc<dyn WorkshopService>;

    fn requests(&self) -> Arc<dyn RequestService>;

    fn alerts(&self) -> Arc<dyn AlertService>;

    fn audit(&self) -> Arc<dyn AuditService>;
}

/// Concrete implementation of ServiceContainer
#[derive(Clone)]
pub struct Services {
    auth_service: Arc<dyn AuthService>,
    user_service: Arc<dyn UserService>,
    fleet_service: Arc<dyn FleetService>,
    trip_service: Arc<dyn TripService>,
    workshop_service: Arc<dyn WorkshopService>,
    request_service: Arc<dyn RequestService>,
    alert_service: Arc<dyn AlertService>,
    audit_service: Arc<dyn AuditService>,
}

impl Services {
    /// Wire every service over one shared store.
    pub fn from_persistence(
        uow: Arc<Persistence>,
        markers: Arc<dyn SeenMarkerStore>,
        config: &Config,
    ) -> Self {
        Self {
            auth_service: Arc::new(Authenticator::new(uow.clone())),
            user_service: Arc::new(UserManager::new(uow.clone())),
            fleet_service: Arc::new(FleetManager::new(uow.clone())),
            trip_service: Arc::new(TripManager::new(uow.clone(), config)),
            workshop_service: Arc::new(WorkshopManager::new(uow.clone(), config)),
            request_service: Arc::new(RequestManager::new(uow.clone())),
            alert_service: Arc::new(AlertManager::new(uow.clone(), markers)),
            audit_service: Arc::new(AuditLog::new(uow)),
        }
    }

    /// Build a store from `state` with explicit clock and id sources.
    pub fn with_state(
        state: FleetState,
        clock: Arc<dyn Clock>,
        ids: Arc<dyn IdGenerator>,
        markers: Arc<dyn SeenMarkerStore>,
        config: &Config,
    ) -> Self {
        let uow = Arc::new(Persistence::new(state, clock, ids));
        Self::from_persistence(uow, markers, config)
    }

    /// Seeded store, real clock, and Redis markers when configured.
    pub async fn bootstrap(config: &Config) -> AppResult<Self> {
        let ids: Arc<dyn IdGenerator> = Arc::new(UuidGenerator);
        let state = SeedData::load(config)?.into_state(ids.as_ref())?;

        let markers: Arc<dyn SeenMarkerStore> = match config.redis_url() {
            Some(url) => Arc::new(RedisSeenMarkers::connect(url).await?),
            None => {
                tracing::debug!("REDIS_URL not set, keeping alert markers in memory");
                Arc::new(InMemorySeenMarkers::new())
            }
        };

        Ok(Self::with_state(state, Arc::new(SystemClock), ids, markers, config))
    }
}

impl ServiceContainer for Services {
    fn auth(&self) -> Arc<dyn AuthService> {
        self.auth_service.clone()
    }

    fn users(&self) -> Arc<dyn UserService> {
        self.user_service.clone()
    }

    fn fleet(&self) -> Arc<dyn FleetService> {
        self.fleet_service.clone()
    }

    fn trips(&self) -> Arc<dyn TripService> {
        self.trip_service.clone()
    }

    fn workshop(&self) -> Arc<dyn WorkshopService> {
        self.workshop_service.clone()
    }

    fn requests(&self) -> Arc<dyn RequestService> {
        self.request_service.clone()
    }

    fn alerts(&self) -> Arc<dyn AlertService> {
        self.alert_service.clone()
    }

    fn audit(&self) -> Arc<dyn AuditService> {
        self.audit_service.clone()
    }
}

//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - The in-memory entity store and its Unit of Work
//! - Clock and identifier sources
//! - Alert markers (in-memory or Redis)
//! - Seed data loading

pub mod clock;
pub mod seed;
pub mod seen_markers;
pub mod store;
pub mod unit_of_work;

pub use clock::{Clock, FixedClock, IdGenerator, SequentialIdGenerator, SystemClock, UuidGenerator};
pub use seed::SeedData;
pub use seen_markers::{InMemorySeenMarkers, RedisSeenMarkers, SeenMarkerStore};
pub use store::{FleetState, Record, Table};
pub use unit_of_work::{Persistence, TransactionContext, UnitOfWork};

#[cfg(any(test, feature = "test-utils"))]
pub use clock::{MockClock, MockIdGenerator};
#[cfg(any(test, feature = "test-utils"))]
pub use seen_markers::MockSeenMarkerStore;

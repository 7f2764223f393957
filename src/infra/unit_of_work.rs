//! Unit of Work over the in-memory fleet store.
//!
//! Every mutation runs as one transaction: the write lock is held for the
//! whole closure, the closure works on a staged copy of the state, and the
//! copy replaces the live state only when the closure returns `Ok` and the
//! structural invariants still hold. Any error discards the copy.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::clock::{Clock, IdGenerator, SystemClock, UuidGenerator};
use super::store::FleetState;
use crate::domain::LogEntry;
use crate::errors::{AppError, AppResult};

/// Unit of Work trait for dependency injection.
///
/// Note: This trait is not mockable directly due to generic methods.
/// For testing, build a [`Persistence`] over a hand-made [`FleetState`].
#[async_trait]
pub trait UnitOfWork: Send + Sync {
    /// Current time according to the injected clock.
    fn now(&self) -> DateTime<Utc>;

    /// Run a read-only projection against a consistent snapshot.
    async fn read<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&FleetState) -> AppResult<T> + Send,
        T: Send;

    /// Execute a closure within a transaction.
    ///
    /// Committed on `Ok`, discarded on `Err`.
    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut TransactionContext<'_>) -> AppResult<T> + Send,
        T: Send;
}

/// Transaction context handed to mutation closures.
///
/// Exposes the staged state plus the transaction's timestamp and id source.
pub struct TransactionContext<'a> {
    pub state: &'a mut FleetState,
    now: DateTime<Utc>,
    ids: &'a dyn IdGenerator,
}

impl<'a> TransactionContext<'a> {
    fn new(state: &'a mut FleetState, now: DateTime<Utc>, ids: &'a dyn IdGenerator) -> Self {
        Self { state, now, ids }
    }

    /// Timestamp shared by everything written in this transaction
    pub fn now(&self) -> DateTime<Utc> {
        self.now
    }

    pub fn today(&self) -> NaiveDate {
        self.now.date_naive()
    }

    pub fn next_id(&self) -> Uuid {
        self.ids.next_id()
    }

    /// Append an audit entry (newest first).
    pub fn record(&mut self, username: impl Into<String>, action: impl Into<String>) {
        let entry = LogEntry {
            id: self.ids.next_id(),
            timestamp: self.now,
            username: username.into(),
            action: action.into(),
        };
        tracing::debug!(username = %entry.username, action = %entry.action, "Audit");
        self.state.logs.prepend(entry);
    }
}

/// Concrete implementation of UnitOfWork
pub struct Persistence {
    state: RwLock<FleetState>,
    clock: Arc<dyn Clock>,
    ids: Arc<dyn IdGenerator>,
}

impl Persistence {
    pub fn new(state: FleetState, clock: Arc<dyn Clock>, ids: Arc<dyn IdGenerator>) -> Self {
        Self {
            state: RwLock::new(state),
            clock,
            ids,
        }
    }

    /// Real clock and random ids.
    pub fn with_system_clock(state: FleetState) -> Self {
        Self::new(state, Arc::new(SystemClock), Arc::new(UuidGenerator))
    }

    /// Copy of the current committed state.
    pub async fn snapshot(&self) -> FleetState {
        self.state.read().await.clone()
    }
}

#[async_trait]
impl UnitOfWork for Persistence {
    fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    async fn read<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&FleetState) -> AppResult<T> + Send,
        T: Send,
    {
        let guard = self.state.read().await;
        f(&*guard)
    }

    async fn transaction<F, T>(&self, f: F) -> AppResult<T>
    where
        F: FnOnce(&mut TransactionContext<'_>) -> AppResult<T> + Send,
        T: Send,
    {
        let mut guard = self.state.write().await;
        let mut staged = guard.clone();

        let result = {
            let mut ctx = TransactionContext::new(&mut staged, self.clock.now(), self.ids.as_ref());
            f(&mut ctx)
        };

        match result {
            Ok(value) => {
                let issues = staged.integrity_issues();
                if !issues.is_empty() {
                    tracing::error!(?issues, "Transaction would break fleet invariants, rolled back");
                    return Err(AppError::internal(issues.join("; ")));
                }
                *guard = staged;
                Ok(value)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Transaction rolled back");
                Err(e)
            }
        }
    }
}

//! Audit service - Read access to the audit trail.
//!
//! Entries are only ever written by mutations, inside their transaction.

use async_trait::async_trait;
use std::sync::Arc;

use crate::domain::LogEntry;
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

#[async_trait]
pub trait AuditService: Send + Sync {
    /// Newest first
    async fn logs(&self) -> AppResult<Vec<LogEntry>>;

    async fn logs_for(&self, username: &str) -> AppResult<Vec<LogEntry>>;
}

pub struct AuditLog<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> AuditLog<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuditService for AuditLog<U> {
    async fn logs(&self) -> AppResult<Vec<LogEntry>> {
        self.uow.read(|state| Ok(state.logs.to_vec())).await
    }

    async fn logs_for(&self, username: &str) -> AppResult<Vec<LogEntry>> {
        self.uow
            .read(|state| {
                Ok(state
                    .logs
                    .iter()
                    .filter(|e| e.username == username)
                    .cloned()
                    .collect())
            })
            .await
    }
}

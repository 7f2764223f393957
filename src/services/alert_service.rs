//! Alert service - Broadcasts and per-viewer unread tracking.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::Session;
use crate::domain::{Alert, NewAlert, Permission, User};
use crate::errors::AppResult;
use crate::infra::{FleetState, SeenMarkerStore, TransactionContext, UnitOfWork};

/// Alert service trait for dependency injection.
#[async_trait]
pub trait AlertService: Send + Sync {
    async fn add_alert(&self, session: &Session, new_alert: NewAlert) -> AppResult<Alert>;

    /// Alerts addressed to the viewer, newest first
    async fn visible_alerts(&self, viewer: &User) -> AppResult<Vec<Alert>>;

    /// Whether the newest visible alert differs from the viewer's marker
    async fn has_unread(&self, viewer: &User) -> AppResult<bool>;

    /// Move the viewer's marker to their newest visible alert
    async fn mark_read(&self, viewer: &User) -> AppResult<()>;
}

/// Prepend an alert and audit it. Shared with the overdue report.
pub(crate) fn broadcast(
    ctx: &mut TransactionContext<'_>,
    sender: &str,
    new_alert: NewAlert,
) -> Alert {
    let alert = Alert {
        id: ctx.next_id(),
        title: new_alert.title,
        message: new_alert.message,
        target: new_alert.target,
        created_at: ctx.now(),
        sender: sender.to_string(),
    };
    ctx.state.alerts.prepend(alert.clone());
    ctx.record(
        sender,
        format!(
            "هشدار جدیدی با عنوان \"{}\" برای \"{}\" ارسال کرد.",
            alert.title, alert.target
        ),
    );
    alert
}

fn newest_visible(state: &FleetState, viewer: &User) -> Option<Uuid> {
    state
        .alerts
        .find(|a| a.is_visible_to(viewer))
        .map(|a| a.id)
}

/// Concrete implementation of AlertService.
pub struct AlertManager<U: UnitOfWork> {
    uow: Arc<U>,
    markers: Arc<dyn SeenMarkerStore>,
}

impl<U: UnitOfWork> AlertManager<U> {
    pub fn new(uow: Arc<U>, markers: Arc<dyn SeenMarkerStore>) -> Self {
        Self { uow, markers }
    }
}

#[async_trait]
impl<U: UnitOfWork> AlertService for AlertManager<U> {
    async fn add_alert(&self, session: &Session, new_alert: NewAlert) -> AppResult<Alert> {
        session.require(Permission::BroadcastAlerts)?;
        new_alert.validate()?;

        let sender = session.username().to_string();
        let alert = self
            .uow
            .transaction(move |ctx| Ok(broadcast(ctx, &sender, new_alert)))
            .await?;

        tracing::info!(alert_id = %alert.id, target = ?alert.target, "Alert sent");
        Ok(alert)
    }

    async fn visible_alerts(&self, viewer: &User) -> AppResult<Vec<Alert>> {
        self.uow
            .read(|state| {
                Ok(state
                    .alerts
                    .iter()
                    .filter(|a| a.is_visible_to(viewer))
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn has_unread(&self, viewer: &User) -> AppResult<bool> {
        let newest = self
            .uow
            .read(|state| Ok(newest_visible(state, viewer)))
            .await?;

        match newest {
            None => Ok(false),
            Some(id) => Ok(self.markers.last_seen(&viewer.username).await? != Some(id)),
        }
    }

    async fn mark_read(&self, viewer: &User) -> AppResult<()> {
        let newest = self
            .uow
            .read(|state| Ok(newest_visible(state, viewer)))
            .await?;

        if let Some(id) = newest {
            self.markers.mark_seen(&viewer.username, id).await?;
            tracing::debug!(username = %viewer.username, alert_id = %id, "Alerts marked read");
        }
        Ok(())
    }
}

//! Workshop service - Service orders, repair status and overdue escalation.
//!
//! Opening an order puts the vehicle in repair; delivering it frees the
//! vehicle. A vehicle has at most one open order at a time.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use super::alert_service::broadcast;
use super::Session;
use crate::config::Config;
use crate::domain::{
    overdue_orders, Alert, AlertTarget, NewAlert, Permission, ServiceOrder, ServiceOrderStatus,
    VehicleStatus,
};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Workshop service trait for dependency injection.
#[async_trait]
pub trait WorkshopService: Send + Sync {
    /// Admit a vehicle for repair
    async fn add_service_order(
        &self,
        session: &Session,
        vehicle_id: Uuid,
        issue_description: &str,
    ) -> AppResult<ServiceOrder>;

    /// Move an order forward; non-empty `notes` replace the current notes
    async fn update_service_order(
        &self,
        session: &Session,
        order_id: Uuid,
        status: ServiceOrderStatus,
        notes: Option<String>,
    ) -> AppResult<ServiceOrder>;

    async fn list_orders(&self) -> AppResult<Vec<ServiceOrder>>;

    /// Orders not yet delivered, newest admission first
    async fn active_orders(&self) -> AppResult<Vec<ServiceOrder>>;

    async fn active_order_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<ServiceOrder>>;

    /// Open orders past the overdue threshold that nobody has reported yet
    async fn overdue_orders(&self) -> AppResult<Vec<ServiceOrder>>;

    /// Escalate an overdue order to all admins
    async fn report_overdue(
        &self,
        session: &Session,
        order_id: Uuid,
        explanation: &str,
    ) -> AppResult<Alert>;
}

/// Concrete implementation of WorkshopService using Unit of Work.
pub struct WorkshopManager<U: UnitOfWork> {
    uow: Arc<U>,
    overdue_days: i64,
}

impl<U: UnitOfWork> WorkshopManager<U> {
    pub fn new(uow: Arc<U>, config: &Config) -> Self {
        Self {
            uow,
            overdue_days: config.overdue_days,
        }
    }
}

#[async_trait]
impl<U: UnitOfWork> WorkshopService for WorkshopManager<U> {
    async fn add_service_order(
        &self,
        session: &Session,
        vehicle_id: Uuid,
        issue_description: &str,
    ) -> AppResult<ServiceOrder> {
        session.require(Permission::ManageServiceOrders)?;
        if issue_description.trim().is_empty() {
            return Err(AppError::validation("issue_description must not be empty"));
        }

        let actor = session.username().to_string();
        let issue_description = issue_description.to_string();
        let order = self
            .uow
            .transaction(move |ctx| {
                ctx.state.vehicles.require(vehicle_id)?;
                if ctx.state.open_order_for(vehicle_id).is_some() {
                    return Err(AppError::conflict("Open service order"));
                }

                let order = ServiceOrder {
                    id: ctx.next_id(),
                    vehicle_id,
                    admission_date: ctx.now(),
                    issue_description,
                    status: ServiceOrderStatus::Admitted,
                    notes: None,
                };
                ctx.state.service_orders.prepend(order.clone());

                let vehicle = ctx.state.vehicles.require_mut(vehicle_id)?;
                vehicle.status = VehicleStatus::InRepair;
                let action = format!("خودروی \"{}\" را برای تعمیر پذیرش کرد.", vehicle.describe());
                ctx.record(actor, action);
                Ok(order)
            })
            .await?;

        tracing::info!(order_id = %order.id, vehicle_id = %vehicle_id, "Vehicle admitted to workshop");
        Ok(order)
    }

    async fn update_service_order(
        &self,
        session: &Session,
        order_id: Uuid,
        status: ServiceOrderStatus,
        notes: Option<String>,
    ) -> AppResult<ServiceOrder> {
        session.require(Permission::ManageServiceOrders)?;

        let actor = session.username().to_string();
        let order = self
            .uow
            .transaction(move |ctx| {
                let order = ctx.state.service_orders.require_mut(order_id)?;
                order.transition_to(status, notes)?;
                let order = order.clone();

                let vehicle = ctx.state.vehicles.require_mut(order.vehicle_id)?;
                let action = if status.is_terminal() {
                    vehicle.status = VehicleStatus::Available;
                    format!("تعمیرات خودروی \"{}\" را تکمیل و تحویل داد.", vehicle.describe())
                } else {
                    format!(
                        "وضعیت تعمیر خودروی \"{}\" را به \"{}\" تغییر داد.",
                        vehicle.describe(),
                        status
                    )
                };
                ctx.record(actor, action);
                Ok(order)
            })
            .await?;

        tracing::info!(order_id = %order_id, status = ?order.status, "Service order updated");
        Ok(order)
    }

    async fn list_orders(&self) -> AppResult<Vec<ServiceOrder>> {
        self.uow.read(|state| Ok(state.service_orders.to_vec())).await
    }

    async fn active_orders(&self) -> AppResult<Vec<ServiceOrder>> {
        self.uow
            .read(|state| {
                let mut orders: Vec<ServiceOrder> = state
                    .service_orders
                    .iter()
                    .filter(|o| o.is_open())
                    .cloned()
                    .collect();
                orders.sort_by(|a, b| b.admission_date.cmp(&a.admission_date));
                Ok(orders)
            })
            .await
    }

    async fn active_order_for_vehicle(&self, vehicle_id: Uuid) -> AppResult<Option<ServiceOrder>> {
        self.uow
            .read(|state| {
                state.vehicles.require(vehicle_id)?;
                Ok(state.open_order_for(vehicle_id).cloned())
            })
            .await
    }

    async fn overdue_orders(&self) -> AppResult<Vec<ServiceOrder>> {
        let now = self.uow.now();
        let days = self.overdue_days;

        self.uow
            .read(|state| {
                Ok(overdue_orders(&state.service_orders, now, days, &state.reported_overdue)
                    .into_iter()
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn report_overdue(
        &self,
        session: &Session,
        order_id: Uuid,
        explanation: &str,
    ) -> AppResult<Alert> {
        session.require(Permission::ReportOverdue)?;

        let sender = session.username().to_string();
        let explanation = explanation.trim().to_string();
        let days = self.overdue_days;

        let alert = self
            .uow
            .transaction(move |ctx| {
                let order = ctx.state.service_orders.require(order_id)?;
                if ctx.state.reported_overdue.contains(&order_id) {
                    return Err(AppError::conflict("Overdue report"));
                }
                if !order.is_overdue(ctx.now(), days) {
                    return Err(AppError::validation("Service order is not overdue"));
                }

                let vehicle = ctx.state.vehicles.require(order.vehicle_id)?;
                let title = format!("هشدار تاخیر در تحویل خودرو: {}", vehicle.describe());
                let message = format!(
                    "خودروی \"{}\" با کد \"{}\" که در تاریخ {} پذیرش شده، با تاخیر مواجه است.\n\nتوضیحات تعمیرکار:\n{}",
                    vehicle.vehicle_type,
                    vehicle.code,
                    order.admission_date.format("%Y-%m-%d"),
                    explanation
                );

                let alert = broadcast(
                    ctx,
                    &sender,
                    NewAlert {
                        title,
                        message,
                        target: AlertTarget::AllAdmins,
                    },
                );
                ctx.state.reported_overdue.insert(order_id);
                Ok(alert)
            })
            .await?;

        tracing::info!(order_id = %order_id, "Overdue service order reported");
        Ok(alert)
    }
}

//! Workshop service orders and their repair lifecycle.
//!
//! Status moves forward through a fixed sequence ending in `Delivered`.
//! Staying on the current status (to update notes) and jumping ahead are
//! both accepted; going backwards or touching a delivered order is not.

use std::collections::HashSet;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::errors::{AppError, AppResult};

/// Repair lifecycle, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ServiceOrderStatus {
    Admitted,
    UnderReview,
    AwaitingParts,
    Repairing,
    ReadyForPickup,
    Delivered,
}

impl ServiceOrderStatus {
    pub const ALL: [ServiceOrderStatus; 6] = [
        ServiceOrderStatus::Admitted,
        ServiceOrderStatus::UnderReview,
        ServiceOrderStatus::AwaitingParts,
        ServiceOrderStatus::Repairing,
        ServiceOrderStatus::ReadyForPickup,
        ServiceOrderStatus::Delivered,
    ];

    pub fn is_terminal(&self) -> bool {
        matches!(self, ServiceOrderStatus::Delivered)
    }

    pub fn label(&self) -> &'static str {
        match self {
            ServiceOrderStatus::Admitted => "پذیرش شده",
            ServiceOrderStatus::UnderReview => "در حال بررسی",
            ServiceOrderStatus::AwaitingParts => "منتظر قطعه",
            ServiceOrderStatus::Repairing => "در حال تعمیر",
            ServiceOrderStatus::ReadyForPickup => "آماده تحویل",
            ServiceOrderStatus::Delivered => "تحویل داده شده",
        }
    }
}

impl std::fmt::Display for ServiceOrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Service order domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServiceOrder {
    pub id: Uuid,
    pub vehicle_id: Uuid,
    pub admission_date: DateTime<Utc>,
    pub issue_description: String,
    pub status: ServiceOrderStatus,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ServiceOrder {
    /// Open orders keep their vehicle in the workshop.
    pub fn is_open(&self) -> bool {
        !self.status.is_terminal()
    }

    /// Move to `status`. Non-empty `notes` replace the current notes.
    pub fn transition_to(&mut self, status: ServiceOrderStatus, notes: Option<String>) -> AppResult<()> {
        if self.status.is_terminal() || status < self.status {
            return Err(AppError::transition(self.status, status));
        }
        self.status = status;
        if let Some(notes) = notes.filter(|n| !n.trim().is_empty()) {
            self.notes = Some(notes);
        }
        Ok(())
    }

    pub fn is_overdue(&self, now: DateTime<Utc>, overdue_days: i64) -> bool {
        // An unrepresentable threshold is never reached.
        let Some(threshold) = Duration::try_days(overdue_days) else {
            return false;
        };
        self.is_open() && now.signed_duration_since(self.admission_date) > threshold
    }
}

/// Open orders older than `overdue_days` that nobody has reported yet.
pub fn overdue_orders<'a>(
    orders: impl IntoIterator<Item = &'a ServiceOrder>,
    now: DateTime<Utc>,
    overdue_days: i64,
    reported: &HashSet<Uuid>,
) -> Vec<&'a ServiceOrder> {
    orders
        .into_iter()
        .filter(|o| o.is_overdue(now, overdue_days) && !reported.contains(&o.id))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order(status: ServiceOrderStatus, admitted_days_ago: i64) -> ServiceOrder {
        ServiceOrder {
            id: Uuid::new_v4(),
            vehicle_id: Uuid::new_v4(),
            admission_date: Utc::now() - Duration::days(admitted_days_ago),
            issue_description: "engine noise".to_string(),
            status,
            notes: None,
        }
    }

    #[test]
    fn test_statuses_are_ordered() {
        let mut sorted = ServiceOrderStatus::ALL;
        sorted.sort();
        assert_eq!(sorted, ServiceOrderStatus::ALL);
        assert!(ServiceOrderStatus::Delivered.is_terminal());
    }

    #[test]
    fn test_forward_and_same_status_allowed() {
        let mut o = order(ServiceOrderStatus::Admitted, 0);
        o.transition_to(ServiceOrderStatus::AwaitingParts, Some("waiting on injectors".into()))
            .unwrap();
        o.transition_to(ServiceOrderStatus::AwaitingParts, None).unwrap();
        assert_eq!(o.notes.as_deref(), Some("waiting on injectors"));
    }

    #[test]
    fn test_empty_notes_keep_previous_notes() {
        let mut o = order(ServiceOrderStatus::Admitted, 0);
        o.transition_to(ServiceOrderStatus::UnderReview, Some("cylinders worn".into()))
            .unwrap();
        o.transition_to(ServiceOrderStatus::Repairing, Some(String::new()))
            .unwrap();
        assert_eq!(o.notes.as_deref(), Some("cylinders worn"));
    }

    #[test]
    fn test_backwards_rejected() {
        let mut o = order(ServiceOrderStatus::Repairing, 0);
        let err = o.transition_to(ServiceOrderStatus::UnderReview, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidTransition { .. }));
        assert_eq!(o.status, ServiceOrderStatus::Repairing);
    }

    #[test]
    fn test_delivered_is_final() {
        let mut o = order(ServiceOrderStatus::Delivered, 0);
        assert!(o.transition_to(ServiceOrderStatus::Delivered, None).is_err());
    }

    #[test]
    fn test_overdue_query() {
        let stale = order(ServiceOrderStatus::Repairing, 31);
        let fresh = order(ServiceOrderStatus::Repairing, 29);
        let delivered = order(ServiceOrderStatus::Delivered, 60);
        let reported_stale = order(ServiceOrderStatus::AwaitingParts, 45);
        let reported: HashSet<Uuid> = [reported_stale.id].into_iter().collect();

        let orders = vec![stale.clone(), fresh, delivered, reported_stale];
        let overdue = overdue_orders(&orders, Utc::now(), 30, &reported);

        assert_eq!(overdue.len(), 1);
        assert_eq!(overdue[0].id, stale.id);
    }

    #[test]
    fn test_huge_threshold_never_overdue() {
        let o = order(ServiceOrderStatus::Repairing, 400);
        assert!(!o.is_overdue(Utc::now(), i64::MAX));
    }

    #[test]
    fn test_exactly_thirty_days_is_not_overdue() {
        let now = Utc::now();
        let mut o = order(ServiceOrderStatus::Admitted, 0);
        o.admission_date = now - Duration::days(30);
        assert!(!o.is_overdue(now, 30));
    }
}

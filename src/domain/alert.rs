//! Broadcast alerts and role-based visibility.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::user::{User, UserRole};

/// Audience of an alert.
///
/// Usernames exist only for the `SpecificUsers` audience.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "usernames", rename_all = "snake_case")]
pub enum AlertTarget {
    AllUsers,
    AllAdmins,
    SpecificUsers(Vec<String>),
}

impl AlertTarget {
    pub fn label(&self) -> &'static str {
        match self {
            AlertTarget::AllUsers => "همه کاربران",
            AlertTarget::AllAdmins => "همه مدیران",
            AlertTarget::SpecificUsers(_) => "کاربران خاص",
        }
    }
}

impl std::fmt::Display for AlertTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Alert domain entity. Immutable once created.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alert {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    pub target: AlertTarget,
    pub created_at: DateTime<Utc>,
    pub sender: String,
}

impl Alert {
    /// Whether `viewer` should see this alert.
    pub fn is_visible_to(&self, viewer: &User) -> bool {
        match viewer.role {
            UserRole::Admin => matches!(self.target, AlertTarget::AllAdmins),
            UserRole::Driver => match &self.target {
                AlertTarget::AllUsers => true,
                AlertTarget::SpecificUsers(usernames) => usernames.contains(&viewer.username),
                AlertTarget::AllAdmins => false,
            },
            UserRole::Workshop | UserRole::SystemAdmin => false,
        }
    }
}

/// Alert creation data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewAlert {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub message: String,
    pub target: AlertTarget,
}

//! Personnel entity, roles and the permission table.

use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::config::{is_valid_role, ROLE_ADMIN, ROLE_DRIVER, ROLE_SYSTEM_ADMIN, ROLE_WORKSHOP};
use crate::errors::AppError;

/// User roles enumeration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum UserRole {
    #[serde(rename = "ADMIN")]
    Admin,
    /// Drivers are called plain "users" throughout the back office.
    #[serde(rename = "USER")]
    Driver,
    #[serde(rename = "WORKSHOP")]
    Workshop,
    /// Dispatch desk: assigns cargo and tracks trips.
    #[serde(rename = "SYSTEM_ADMIN")]
    SystemAdmin,
}

/// Actions guarded by role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Permission {
    ManageUsers,
    ManageFleet,
    ManageServiceOrders,
    ReportOverdue,
    DispatchTrips,
    SubmitRequests,
    ReviewRequests,
    BroadcastAlerts,
}

impl UserRole {
    /// Check if this role has admin privileges
    pub fn is_admin(&self) -> bool {
        matches!(self, UserRole::Admin)
    }

    /// Whether a holder of this role may perform `permission`.
    pub fn permits(&self, permission: Permission) -> bool {
        use Permission::*;

        match self {
            UserRole::Admin => matches!(
                permission,
                ManageUsers
                    | ManageFleet
                    | ManageServiceOrders
                    | ReviewRequests
                    | BroadcastAlerts
            ),
            UserRole::Driver => matches!(permission, SubmitRequests),
            UserRole::Workshop => matches!(permission, ManageServiceOrders | ReportOverdue),
            UserRole::SystemAdmin => matches!(permission, DispatchTrips),
        }
    }

    /// Roles an administrator may create through `add_user`.
    pub fn is_assignable(&self) -> bool {
        match self {
            UserRole::Driver | UserRole::Workshop => true,
            UserRole::Admin | UserRole::SystemAdmin => false,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            UserRole::Admin => ROLE_ADMIN,
            UserRole::Driver => ROLE_DRIVER,
            UserRole::Workshop => ROLE_WORKSHOP,
            UserRole::SystemAdmin => ROLE_SYSTEM_ADMIN,
        }
    }
}

impl FromStr for UserRole {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if !is_valid_role(s) {
            return Err(AppError::validation(format!("Unknown role '{}'", s)));
        }
        Ok(match s {
            ROLE_ADMIN => UserRole::Admin,
            ROLE_WORKSHOP => UserRole::Workshop,
            ROLE_SYSTEM_ADMIN => UserRole::SystemAdmin,
            _ => UserRole::Driver,
        })
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// User domain entity
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub role: UserRole,
    pub personnel_code: String,
    pub phone: String,
    pub registration_date: DateTime<Utc>,
    pub last_login: Option<DateTime<Utc>>,
}

impl User {
    /// Check if user has admin role
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_driver(&self) -> bool {
        matches!(self.role, UserRole::Driver)
    }
}

/// User creation data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewUser {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub username: String,
    /// Plain text, at most 8 characters; hashed before storage
    pub password: String,
    pub role: UserRole,
    #[validate(length(min = 1, message = "must not be empty"))]
    pub personnel_code: String,
    pub phone: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("USER".parse::<UserRole>().unwrap(), UserRole::Driver);
        assert_eq!("SYSTEM_ADMIN".parse::<UserRole>().unwrap(), UserRole::SystemAdmin);
        assert!("driver".parse::<UserRole>().is_err());
    }

    #[test]
    fn test_role_serializes_to_wire_names() {
        assert_eq!(serde_json::to_string(&UserRole::Driver).unwrap(), "\"USER\"");
        assert_eq!(UserRole::Workshop.to_string(), "WORKSHOP");
    }

    #[test]
    fn test_permission_table() {
        assert!(UserRole::Admin.permits(Permission::ManageUsers));
        assert!(!UserRole::Admin.permits(Permission::DispatchTrips));
        assert!(UserRole::Driver.permits(Permission::SubmitRequests));
        assert!(!UserRole::Driver.permits(Permission::ReviewRequests));
        assert!(UserRole::Workshop.permits(Permission::ReportOverdue));
        assert!(UserRole::SystemAdmin.permits(Permission::DispatchTrips));
        assert!(!UserRole::SystemAdmin.permits(Permission::ManageUsers));
    }

    #[test]
    fn test_only_driver_and_workshop_are_assignable() {
        assert!(UserRole::Driver.is_assignable());
        assert!(UserRole::Workshop.is_assignable());
        assert!(!UserRole::Admin.is_assignable());
        assert!(!UserRole::SystemAdmin.is_assignable());
    }

    #[test]
    fn test_password_hash_never_serialized() {
        let user = User {
            id: Uuid::nil(),
            username: "driver1".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::Driver,
            personnel_code: "P001".to_string(),
            phone: "0911".to_string(),
            registration_date: Utc::now(),
            last_login: None,
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("argon2"));
    }
}

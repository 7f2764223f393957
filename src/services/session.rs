//! Authenticated session handle.

use uuid::Uuid;

use crate::domain::{Permission, User, UserRole};
use crate::errors::{AppError, AppResult};

/// The signed-in user. Obtained only from [`AuthService::login`](super::AuthService::login).
#[derive(Debug, Clone)]
pub struct Session {
    user: User,
}

impl Session {
    pub(crate) fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn user_id(&self) -> Uuid {
        self.user.id
    }

    pub fn username(&self) -> &str {
        &self.user.username
    }

    pub fn role(&self) -> UserRole {
        self.user.role
    }

    /// Fail with `Forbidden` unless the session's role grants `permission`.
    pub fn require(&self, permission: Permission) -> AppResult<()> {
        if self.user.role.permits(permission) {
            Ok(())
        } else {
            tracing::warn!(
                username = %self.user.username,
                role = %self.user.role,
                ?permission,
                "Permission denied"
            );
            Err(AppError::Forbidden)
        }
    }

    /// Own profile, or anyone's with `ManageUsers`.
    pub fn can_edit_profile(&self, user_id: Uuid) -> bool {
        self.user.id == user_id || self.user.role.permits(Permission::ManageUsers)
    }

    /// Replace the cached user after the profile was edited.
    pub(crate) fn refresh(&mut self, user: User) {
        self.user = user;
    }
}

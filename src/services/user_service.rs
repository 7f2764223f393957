//! User service - Personnel management and vehicle assignment.
//!
//! Every mutation runs in one transaction and leaves an audit entry.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::Session;
use crate::domain::{NewUser, Password, Permission, User, UserRole, Vehicle};
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// User service trait for dependency injection.
#[async_trait]
pub trait UserService: Send + Sync {
    /// Create a driver or workshop account
    async fn add_user(&self, session: &Session, new_user: NewUser) -> AppResult<User>;

    /// Re-issue a user's password
    async fn change_password(
        &self,
        session: &Session,
        user_id: Uuid,
        new_password: &str,
    ) -> AppResult<()>;

    /// Change username and optionally password. Refreshes `session` when
    /// it is the edited user.
    async fn update_profile(
        &self,
        session: &mut Session,
        user_id: Uuid,
        new_username: &str,
        new_password: Option<&str>,
    ) -> AppResult<User>;

    /// Give `vehicle_id` to the user, or take their vehicle away with `None`
    async fn assign_vehicle(
        &self,
        session: &Session,
        user_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<()>;

    async fn get_user(&self, id: Uuid) -> AppResult<User>;

    async fn list_users(&self) -> AppResult<Vec<User>>;

    /// Users with the driver role
    async fn list_drivers(&self) -> AppResult<Vec<User>>;

    /// The vehicle currently held by the user
    async fn assigned_vehicle(&self, user_id: Uuid) -> AppResult<Option<Vehicle>>;
}

/// Concrete implementation of UserService using Unit of Work.
pub struct UserManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> UserManager<U> {
    /// Create new user service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> UserService for UserManager<U> {
    async fn add_user(&self, session: &Session, new_user: NewUser) -> AppResult<User> {
        session.require(Permission::ManageUsers)?;
        new_user.validate()?;

        // Uniqueness is checked before the password policy and before hashing.
        let NewUser {
            username,
            password,
            role,
            personnel_code,
            phone,
        } = new_user;

        let (taken_username, taken_code) = self
            .uow
            .read(|state| {
                Ok((
                    state.user_by_username(&username).is_some(),
                    state.users.any(|u| u.personnel_code == personnel_code),
                ))
            })
            .await?;
        if taken_username {
            return Err(AppError::conflict("Username"));
        }
        if taken_code {
            return Err(AppError::conflict("Personnel code"));
        }
        if !role.is_assignable() {
            return Err(AppError::validation(format!(
                "Role {} cannot be created here",
                role
            )));
        }
        let password_hash = Password::new(&password)?.into_string();

        let actor = session.username().to_string();
        let user = self
            .uow
            .transaction(move |ctx| {
                // Re-checked under the write lock.
                if ctx.state.user_by_username(&username).is_some() {
                    return Err(AppError::conflict("Username"));
                }
                if ctx.state.users.any(|u| u.personnel_code == personnel_code) {
                    return Err(AppError::conflict("Personnel code"));
                }

                let user = User {
                    id: ctx.next_id(),
                    username,
                    password_hash,
                    role,
                    personnel_code,
                    phone,
                    registration_date: ctx.now(),
                    last_login: None,
                };
                ctx.state.users.push(user.clone());
                ctx.record(
                    actor,
                    format!(
                        "کاربر جدید \"{}\" با کد پرسنلی \"{}\" را اضافه کرد.",
                        user.username, user.personnel_code
                    ),
                );
                Ok(user)
            })
            .await?;

        tracing::info!(username = %user.username, role = %user.role, "User created");
        Ok(user)
    }

    async fn change_password(
        &self,
        session: &Session,
        user_id: Uuid,
        new_password: &str,
    ) -> AppResult<()> {
        session.require(Permission::ManageUsers)?;
        let password_hash = Password::new(new_password)?.into_string();

        let actor = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let user = ctx.state.users.require_mut(user_id)?;
                user.password_hash = password_hash;
                let action = format!("رمز عبور کاربر \"{}\" را تغییر داد.", user.username);
                ctx.record(actor, action);
                Ok(())
            })
            .await
    }

    async fn update_profile(
        &self,
        session: &mut Session,
        user_id: Uuid,
        new_username: &str,
        new_password: Option<&str>,
    ) -> AppResult<User> {
        if !session.can_edit_profile(user_id) {
            return Err(AppError::Forbidden);
        }
        if new_username.trim().is_empty() {
            return Err(AppError::validation("username must not be empty"));
        }

        self.uow
            .read(|state| {
                state.users.require(user_id)?;
                if state
                    .users
                    .any(|u| u.id != user_id && u.username == new_username)
                {
                    return Err(AppError::conflict("Username"));
                }
                Ok(())
            })
            .await?;

        // An empty password means "keep the current one".
        let new_username = new_username.to_string();
        let password_hash = new_password
            .filter(|p| !p.is_empty())
            .map(Password::new)
            .transpose()?
            .map(Password::into_string);

        let user = self
            .uow
            .transaction(move |ctx| {
                // Re-checked under the write lock.
                if ctx
                    .state
                    .users
                    .any(|u| u.id != user_id && u.username == new_username)
                {
                    return Err(AppError::conflict("Username"));
                }
                let current = ctx.state.users.require(user_id)?;
                let renamed = current.username != new_username;

                let mut changes = Vec::new();
                if renamed {
                    changes.push(format!(
                        "نام کاربری خود را از \"{}\" به \"{}\" تغییر داد.",
                        current.username, new_username
                    ));
                }
                if password_hash.is_some() {
                    changes.push("رمز عبور خود را تغییر داد.".to_string());
                }

                let user = ctx.state.users.require_mut(user_id)?;
                user.username = new_username;
                if let Some(hash) = password_hash {
                    user.password_hash = hash;
                }
                let user = user.clone();

                if !changes.is_empty() {
                    ctx.record(user.username.clone(), changes.join(" و "));
                }
                Ok(user)
            })
            .await?;

        if session.user_id() == user_id {
            session.refresh(user.clone());
        }
        tracing::info!(user_id = %user_id, username = %user.username, "Profile updated");
        Ok(user)
    }

    async fn assign_vehicle(
        &self,
        session: &Session,
        user_id: Uuid,
        vehicle_id: Option<Uuid>,
    ) -> AppResult<()> {
        session.require(Permission::ManageUsers)?;

        let actor = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let username = ctx.state.users.require(user_id)?.username.clone();
                if let Some(vehicle_id) = vehicle_id {
                    ctx.state.vehicles.require(vehicle_id)?;
                }

                if let Some(held) = ctx.state.vehicles.find_mut(|v| v.driver_id == Some(user_id)) {
                    held.driver_id = None;
                }

                let action = match vehicle_id {
                    Some(vehicle_id) => {
                        let vehicle = ctx.state.vehicles.require_mut(vehicle_id)?;
                        vehicle.driver_id = Some(user_id);
                        format!(
                            "خودروی \"{}\" را به کاربر \"{}\" تخصیص داد.",
                            vehicle.describe(),
                            username
                        )
                    }
                    None => format!("تخصیص خودرو را از کاربر \"{}\" حذف کرد.", username),
                };
                ctx.record(actor, action);
                Ok(())
            })
            .await?;

        tracing::info!(user_id = %user_id, vehicle_id = ?vehicle_id, "Vehicle assignment changed");
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> AppResult<User> {
        self.uow
            .read(|state| state.users.require(id).cloned())
            .await
    }

    async fn list_users(&self) -> AppResult<Vec<User>> {
        self.uow.read(|state| Ok(state.users.to_vec())).await
    }

    async fn list_drivers(&self) -> AppResult<Vec<User>> {
        self.uow
            .read(|state| {
                Ok(state
                    .users
                    .iter()
                    .filter(|u| u.role == UserRole::Driver)
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn assigned_vehicle(&self, user_id: Uuid) -> AppResult<Option<Vehicle>> {
        self.uow
            .read(|state| {
                state.users.require(user_id)?;
                Ok(state.vehicle_held_by(user_id).cloned())
            })
            .await
    }
}

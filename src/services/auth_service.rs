//! Authentication service - Credential checks and session lifecycle.
//!
//! Failed attempts are audited with the specific reason, but callers only
//! ever see the generic `InvalidCredentials`.

use async_trait::async_trait;
use std::sync::Arc;

use super::Session;
use crate::domain::Password;
use crate::errors::{AppError, AppResult};
use crate::infra::UnitOfWork;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Verify credentials and open a session
    async fn login(&self, username: &str, password: &str) -> AppResult<Session>;

    /// Audit the end of a session
    async fn logout(&self, session: &Session) -> AppResult<()>;
}

/// Why a login attempt was refused. Only ever written to the audit log.
#[derive(Debug, Clone, Copy)]
enum LoginFailure {
    UnknownUsername,
    WrongPassword,
}

impl LoginFailure {
    fn audit_message(&self) -> &'static str {
        match self {
            LoginFailure::UnknownUsername => "تلاش برای ورود ناموفق (نام کاربری یافت نشد)",
            LoginFailure::WrongPassword => "تلاش برای ورود ناموفق (رمز عبور اشتباه)",
        }
    }
}

/// Concrete implementation of AuthService using Unit of Work.
pub struct Authenticator<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> Authenticator<U> {
    /// Create new auth service instance with Unit of Work
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> AuthService for Authenticator<U> {
    async fn login(&self, username: &str, password: &str) -> AppResult<Session> {
        let candidate = self
            .uow
            .read(|state| Ok(state.user_by_username(username).cloned()))
            .await?;

        // Hash verification runs outside the store lock.
        let outcome = match candidate {
            None => Err(LoginFailure::UnknownUsername),
            Some(user) if !Password::from_hash(user.password_hash.clone()).verify(password) => {
                Err(LoginFailure::WrongPassword)
            }
            Some(user) => Ok(user.id),
        };

        match outcome {
            Ok(user_id) => {
                let session = self
                    .uow
                    .transaction(move |ctx| {
                        let now = ctx.now();
                        let user = ctx.state.users.require_mut(user_id)?;
                        user.last_login = Some(now);
                        let user = user.clone();
                        ctx.record(user.username.clone(), "ورود موفق به سیستم");
                        Ok(Session::new(user))
                    })
                    .await?;

                tracing::info!(username = %username, "Login succeeded");
                Ok(session)
            }
            Err(failure) => {
                self.uow
                    .transaction(|ctx| {
                        ctx.record(username, failure.audit_message());
                        Ok(())
                    })
                    .await?;

                tracing::warn!(username = %username, reason = ?failure, "Login failed");
                Err(AppError::InvalidCredentials)
            }
        }
    }

    async fn logout(&self, session: &Session) -> AppResult<()> {
        let username = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                ctx.record(username, "خروج از سیستم");
                Ok(())
            })
            .await?;

        tracing::info!(username = %session.username(), "Logged out");
        Ok(())
    }
}

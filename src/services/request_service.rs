//! Request service - Personnel requests and their review steps.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

use super::Session;
use crate::domain::{NewRequest, Permission, Request, RequestStatus};
use crate::errors::AppResult;
use crate::infra::UnitOfWork;

/// Request service trait for dependency injection.
#[async_trait]
pub trait RequestService: Send + Sync {
    /// Submit a new request as the session user
    async fn add_request(&self, session: &Session, new_request: NewRequest) -> AppResult<Request>;

    /// PENDING -> COMPLETED
    async fn process_request(&self, session: &Session, request_id: Uuid) -> AppResult<Request>;

    /// COMPLETED -> APPROVED
    async fn approve_request(&self, session: &Session, request_id: Uuid) -> AppResult<Request>;

    /// APPROVED -> FINALIZED
    async fn finalize_request(&self, session: &Session, request_id: Uuid) -> AppResult<Request>;

    /// Newest first
    async fn list_requests(&self) -> AppResult<Vec<Request>>;

    async fn requests_for_user(&self, username: &str) -> AppResult<Vec<Request>>;

    /// Requests still waiting for review
    async fn pending_count(&self) -> AppResult<usize>;
}

/// Concrete implementation of RequestService using Unit of Work.
pub struct RequestManager<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> RequestManager<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }

    /// Advance one review step and audit it with `verb`.
    async fn advance(
        &self,
        session: &Session,
        request_id: Uuid,
        target: RequestStatus,
        verb: &'static str,
    ) -> AppResult<Request> {
        session.require(Permission::ReviewRequests)?;

        let actor = session.username().to_string();
        let request = self
            .uow
            .transaction(move |ctx| {
                let request = ctx.state.requests.require_mut(request_id)?;
                request.advance_to(target)?;
                let request = request.clone();
                ctx.record(
                    actor,
                    format!(
                        "درخواست \"{}\" کاربر \"{}\" را {}.",
                        request.title, request.username, verb
                    ),
                );
                Ok(request)
            })
            .await?;

        tracing::info!(request_id = %request_id, status = %request.status, "Request advanced");
        Ok(request)
    }
}

#[async_trait]
impl<U: UnitOfWork> RequestService for RequestManager<U> {
    async fn add_request(&self, session: &Session, new_request: NewRequest) -> AppResult<Request> {
        session.require(Permission::SubmitRequests)?;
        new_request.validate()?;

        let username = session.username().to_string();
        self.uow
            .transaction(move |ctx| {
                let request = Request {
                    id: ctx.next_id(),
                    username: username.clone(),
                    title: new_request.title,
                    description: new_request.description,
                    request_type: new_request.request_type,
                    recipient: new_request.recipient,
                    status: RequestStatus::Pending,
                };
                ctx.state.requests.prepend(request.clone());
                ctx.record(
                    username,
                    format!("درخواست جدیدی با عنوان \"{}\" ثبت کرد.", request.title),
                );
                Ok(request)
            })
            .await
    }

    async fn process_request(&self, session: &Session, request_id: Uuid) -> AppResult<Request> {
        self.advance(session, request_id, RequestStatus::Completed, "تکمیل کرد")
            .await
    }

    async fn approve_request(&self, session: &Session, request_id: Uuid) -> AppResult<Request> {
        self.advance(session, request_id, RequestStatus::Approved, "تایید نهایی کرد")
            .await
    }

    async fn finalize_request(&self, session: &Session, request_id: Uuid) -> AppResult<Request> {
        self.advance(session, request_id, RequestStatus::Finalized, "نهایی کرد")
            .await
    }

    async fn list_requests(&self) -> AppResult<Vec<Request>> {
        self.uow.read(|state| Ok(state.requests.to_vec())).await
    }

    async fn requests_for_user(&self, username: &str) -> AppResult<Vec<Request>> {
        self.uow
            .read(|state| {
                Ok(state
                    .requests
                    .iter()
                    .filter(|r| r.username == username)
                    .cloned()
                    .collect())
            })
            .await
    }

    async fn pending_count(&self) -> AppResult<usize> {
        self.uow
            .read(|state| {
                Ok(state
                    .requests
                    .iter()
                    .filter(|r| r.status == RequestStatus::Pending)
                    .count())
            })
            .await
    }
}

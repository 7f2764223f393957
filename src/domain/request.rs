//! Personnel requests (leave, fuel card, promotion) and their review lifecycle.

use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::errors::{AppError, AppResult};

/// Request review status. Strictly linear: each step has one operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum RequestStatus {
    Pending,
    Completed,
    Approved,
    Finalized,
}

impl RequestStatus {
    /// The only status this one may move to.
    pub fn next(&self) -> Option<RequestStatus> {
        match self {
            RequestStatus::Pending => Some(RequestStatus::Completed),
            RequestStatus::Completed => Some(RequestStatus::Approved),
            RequestStatus::Approved => Some(RequestStatus::Finalized),
            RequestStatus::Finalized => None,
        }
    }

    pub fn is_terminal(&self) -> bool {
        self.next().is_none()
    }
}

impl std::fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RequestStatus::Pending => "PENDING",
            RequestStatus::Completed => "COMPLETED",
            RequestStatus::Approved => "APPROVED",
            RequestStatus::Finalized => "FINALIZED",
        };
        f.write_str(name)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RequestType {
    Leave,
    FuelCard,
    Promotion,
}

impl RequestType {
    pub fn label(&self) -> &'static str {
        match self {
            RequestType::Leave => "مرخصی",
            RequestType::FuelCard => "کارت سوخت",
            RequestType::Promotion => "ترفیع",
        }
    }
}

/// Who a request is addressed to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Recipient {
    Management,
    ManagerOne,
    ManagerTwo,
}

impl Recipient {
    pub fn label(&self) -> &'static str {
        match self {
            Recipient::Management => "مدیریت",
            Recipient::ManagerOne => "مدیر 1",
            Recipient::ManagerTwo => "مدیر 2",
        }
    }
}

/// Request domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    pub id: Uuid,
    /// Submitter
    pub username: String,
    pub title: String,
    pub description: String,
    pub request_type: RequestType,
    pub recipient: Recipient,
    pub status: RequestStatus,
}

impl Request {
    /// Advance to `target`, which must be the immediate successor of the
    /// current status.
    pub fn advance_to(&mut self, target: RequestStatus) -> AppResult<()> {
        if self.status.next() != Some(target) {
            return Err(AppError::transition(self.status, target));
        }
        self.status = target;
        Ok(())
    }
}

/// Request submission data
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NewRequest {
    #[validate(length(min = 1, message = "must not be empty"))]
    pub title: String,
    pub description: String,
    pub request_type: RequestType,
    pub recipient: Recipient,
}

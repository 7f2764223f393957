//! Check-login command - Runs one login attempt and shows what was audited.

use serde::Serialize;

use super::print_json;
use crate::cli::args::CheckLoginArgs;
use crate::config::Config;
use crate::domain::{LogEntry, User};
use crate::errors::{AppError, AppResult};
use crate::services::{ServiceContainer, Services};

#[derive(Serialize)]
struct LoginReport {
    accepted: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    user: Option<User>,
    audit: Vec<LogEntry>,
}

/// Execute the check-login command
pub async fn execute(args: CheckLoginArgs, config: Config) -> AppResult<()> {
    let services = Services::bootstrap(&config).await?;

    let user = match services.auth().login(&args.username, &args.password).await {
        Ok(session) => Some(session.user().clone()),
        Err(AppError::InvalidCredentials) => None,
        Err(e) => return Err(e),
    };

    let report = LoginReport {
        accepted: user.is_some(),
        user,
        audit: services.audit().logs_for(&args.username).await?,
    };

    print_json(&report)
}

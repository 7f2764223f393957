//! Overdue command - Lists service orders waiting too long in the workshop.

use super::print_json;
use crate::config::Config;
use crate::errors::AppResult;
use crate::services::{ServiceContainer, Services};

/// Execute the overdue command
pub async fn execute(config: Config) -> AppResult<()> {
    let services = Services::bootstrap(&config).await?;

    let overdue = services.workshop().overdue_orders().await?;
    tracing::info!(
        count = overdue.len(),
        threshold_days = config.overdue_days,
        "Overdue service orders"
    );

    print_json(&overdue)
}

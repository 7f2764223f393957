//! Summary command - Dispatch board and workshop overview.

use serde::Serialize;

use super::print_json;
use crate::config::Config;
use crate::domain::ServiceOrder;
use crate::errors::AppResult;
use crate::services::{DispatchSummary, ServiceContainer, Services};

#[derive(Serialize)]
struct Summary {
    dispatch: DispatchSummary,
    active_service_orders: Vec<ServiceOrder>,
    pending_requests: usize,
}

/// Execute the summary command
pub async fn execute(config: Config) -> AppResult<()> {
    let services = Services::bootstrap(&config).await?;

    let summary = Summary {
        dispatch: services.fleet().dispatch_summary().await?,
        active_service_orders: services.workshop().active_orders().await?,
        pending_requests: services.requests().pending_count().await?,
    };

    print_json(&summary)
}

//! Mileage command - Monthly goal progress for one driver or all of them.

use super::print_json;
use crate::cli::args::MileageArgs;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::services::{ServiceContainer, Services};

/// Execute the mileage command
pub async fn execute(args: MileageArgs, config: Config) -> AppResult<()> {
    let services = Services::bootstrap(&config).await?;

    match args.driver {
        Some(username) => {
            let driver = services
                .users()
                .list_drivers()
                .await?
                .into_iter()
                .find(|u| u.username == username)
                .ok_or_else(|| AppError::not_found(format!("Driver '{}'", username)))?;

            let progress = services.trips().monthly_mileage(driver.id).await?;
            if progress.near_goal {
                tracing::info!(
                    username = %driver.username,
                    remaining_km = progress.remaining_km,
                    "Driver is close to the monthly goal"
                );
            }
            print_json(&progress)
        }
        None => print_json(&services.trips().driver_stats().await?),
    }
}

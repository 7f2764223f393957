//! Application settings loaded from environment variables.

use std::env;
use std::path::PathBuf;

use super::constants::{
    DEFAULT_MILEAGE_GOAL_KM, DEFAULT_OVERDUE_DAYS, MAX_OVERDUE_DAYS, SEED_PATH_ENV,
};

/// Application configuration
#[derive(Clone)]
pub struct Config {
    /// Optional JSON seed file; the bundled demo data is used when absent
    pub seed_path: Option<PathBuf>,
    /// Redis URL for per-viewer alert markers; in-memory markers when absent
    redis_url: Option<String>,
    pub mileage_goal_km: u32,
    pub overdue_days: i64,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("seed_path", &self.seed_path)
            .field("redis_url", &self.redis_url.as_ref().map(|_| "[REDACTED]"))
            .field("mileage_goal_km", &self.mileage_goal_km)
            .field("overdue_days", &self.overdue_days)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            seed_path: None,
            redis_url: None,
            mileage_goal_km: DEFAULT_MILEAGE_GOAL_KM,
            overdue_days: DEFAULT_OVERDUE_DAYS,
        }
    }
}

impl Config {
    /// Load configuration from environment variables (and `.env` if present).
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();

        let mileage_goal_km = env::var("FLEET_MILEAGE_GOAL_KM")
            .ok()
            .and_then(|v| v.parse().ok())
            .filter(|goal: &u32| *goal > 0)
            .unwrap_or_else(|| {
                tracing::debug!("FLEET_MILEAGE_GOAL_KM not set, using {}", DEFAULT_MILEAGE_GOAL_KM);
                DEFAULT_MILEAGE_GOAL_KM
            });

        Self {
            seed_path: env::var(SEED_PATH_ENV).ok().map(PathBuf::from),
            redis_url: env::var("REDIS_URL").ok().filter(|url| !url.is_empty()),
            mileage_goal_km,
            overdue_days: parse_overdue_days(env::var("FLEET_OVERDUE_DAYS").ok()),
        }
    }

    /// Redis URL for alert markers, if configured.
    pub fn redis_url(&self) -> Option<&str> {
        self.redis_url.as_deref()
    }

    /// Override the Redis URL (used by the CLI flag).
    pub fn with_redis_url(mut self, url: impl Into<String>) -> Self {
        self.redis_url = Some(url.into());
        self
    }
}

/// Threshold in days, falling back to the default when unset or outside
/// `1..=MAX_OVERDUE_DAYS`.
fn parse_overdue_days(raw: Option<String>) -> i64 {
    let Some(raw) = raw else {
        return DEFAULT_OVERDUE_DAYS;
    };
    match raw.trim().parse::<i64>() {
        Ok(days) if (1..=MAX_OVERDUE_DAYS).contains(&days) => days,
        _ => {
            tracing::warn!(value = %raw, "Ignoring FLEET_OVERDUE_DAYS, using {}", DEFAULT_OVERDUE_DAYS);
            DEFAULT_OVERDUE_DAYS
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overdue_days_in_range() {
        assert_eq!(parse_overdue_days(Some("45".to_string())), 45);
        assert_eq!(parse_overdue_days(None), DEFAULT_OVERDUE_DAYS);
    }

    #[test]
    fn test_overdue_days_out_of_range_falls_back() {
        for raw in ["0", "-3", "9223372036854775807", "soon"] {
            assert_eq!(parse_overdue_days(Some(raw.to_string())), DEFAULT_OVERDUE_DAYS);
        }
    }
}

//! Application-wide constants
//!
//! Centralized location for business rules and magic values.

// =============================================================================
// Personnel & Credentials
// =============================================================================

/// Maximum password length accepted when creating or changing a password
pub const MAX_PASSWORD_LENGTH: usize = 8;

/// Serialized role names
pub const ROLE_ADMIN: &str = "ADMIN";
pub const ROLE_DRIVER: &str = "USER";
pub const ROLE_WORKSHOP: &str = "WORKSHOP";
pub const ROLE_SYSTEM_ADMIN: &str = "SYSTEM_ADMIN";

/// All valid role values
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_DRIVER, ROLE_WORKSHOP, ROLE_SYSTEM_ADMIN];

/// Check if a role value is valid
pub fn is_valid_role(role: &str) -> bool {
    VALID_ROLES.contains(&role)
}

// =============================================================================
// Mileage Goal
// =============================================================================

/// Day of month on which the mileage cycle rolls over
pub const CYCLE_ROLLOVER_DAY: u32 = 25;

/// Monthly distance goal per driver, in kilometres
pub const DEFAULT_MILEAGE_GOAL_KM: u32 = 17_000;

/// Remaining distance at or below which a driver is "near goal"
pub const MILEAGE_ALERT_THRESHOLD_KM: u32 = 3_000;

// =============================================================================
// Workshop
// =============================================================================

/// Days after admission after which an open service order is overdue
pub const DEFAULT_OVERDUE_DAYS: i64 = 30;

/// Largest accepted overdue threshold (ten years)
pub const MAX_OVERDUE_DAYS: i64 = 3_650;

// =============================================================================
// Alert Markers (Redis)
// =============================================================================

/// Cache key prefix for the last alert a viewer has seen
pub const CACHE_PREFIX_ALERT_SEEN: &str = "alerts:last_seen:";

// =============================================================================
// Seed Data
// =============================================================================

/// Environment variable pointing at a JSON seed file
pub const SEED_PATH_ENV: &str = "FLEET_SEED_PATH";

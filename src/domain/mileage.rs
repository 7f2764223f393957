//! Monthly mileage goal accounting.
//!
//! The cycle runs from the 25th of one month to the 25th of the next
//! (start inclusive, end exclusive). Only trips that have actually started
//! count toward it.

use chrono::{Datelike, Duration, Months, NaiveDate};
use serde::Serialize;
use uuid::Uuid;

use super::trip::Trip;
use crate::config::{CYCLE_ROLLOVER_DAY, MILEAGE_ALERT_THRESHOLD_KM};

/// Half-open date range `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct CycleWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl CycleWindow {
    /// The cycle that `today` belongs to.
    pub fn containing(today: NaiveDate) -> Self {
        let offset = i64::from(today.day()) - i64::from(CYCLE_ROLLOVER_DAY);
        // The rollover day of today's month.
        let rollover = today - Duration::days(offset);

        if offset < 0 {
            Self {
                start: rollover - Months::new(1),
                end: rollover,
            }
        } else {
            Self {
                start: rollover,
                end: rollover + Months::new(1),
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date < self.end
    }
}

/// A driver's standing against the monthly goal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MileageProgress {
    pub driver_id: Uuid,
    pub window: CycleWindow,
    pub total_km: u64,
    pub goal_km: u32,
    pub remaining_km: u64,
    /// 0..=100
    pub progress_percent: f64,
    /// Within the alert threshold but not yet there
    pub near_goal: bool,
}

impl MileageProgress {
    pub fn compute<'a>(
        trips: impl IntoIterator<Item = &'a Trip>,
        driver_id: Uuid,
        window: CycleWindow,
        goal_km: u32,
    ) -> Self {
        let total_km: u64 = trips
            .into_iter()
            .filter(|t| t.driver_id == driver_id)
            .filter(|t| t.counts_toward_mileage() && window.contains(t.start_date))
            .map(|t| u64::from(t.distance_km))
            .sum();

        let goal = u64::from(goal_km);
        let remaining_km = goal.saturating_sub(total_km);
        let progress_percent = if goal == 0 {
            100.0
        } else {
            (total_km as f64 / goal as f64 * 100.0).min(100.0)
        };

        Self {
            driver_id,
            window,
            total_km,
            goal_km,
            remaining_km,
            progress_percent,
            near_goal: remaining_km > 0 && remaining_km <= u64::from(MILEAGE_ALERT_THRESHOLD_KM),
        }
    }
}

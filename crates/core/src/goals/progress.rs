//! Progress calculation.
//!
//! There are two ways to obtain the day counts of a goal: counting an already
//! loaded set of days in memory, or asking the store for two aggregates. Both
//! produce a [`DayStats`] and every metric is derived from that one value, so
//! the two paths can only disagree if they were fed different data (for
//! example when a write lands between loading and counting).

use serde::{Deserialize, Serialize};

use super::goals_model::GoalDay;
use crate::errors::Result;
use crate::store::TrackingStore;

/// Raw day counts of one goal.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayStats {
    pub total: u64,
    pub completed: u64,
}

impl DayStats {
    pub fn new(total: u64, completed: u64) -> Self {
        Self { total, completed }
    }

    /// Entity-derived counts from loaded day records.
    pub fn from_days<'a, I>(days: I) -> Self
    where
        I: IntoIterator<Item = &'a GoalDay>,
    {
        days.into_iter().fold(Self::default(), |mut stats, day| {
            stats.total += 1;
            if day.completed {
                stats.completed += 1;
            }
            stats
        })
    }

    /// Aggregate-derived counts, without loading the day records.
    pub fn from_store(store: &mut dyn TrackingStore, goal_id: &str) -> Result<Self> {
        let total = store.count_days(goal_id)?;
        let completed = store.count_completed_days(goal_id)?;
        Ok(Self::new(total, completed))
    }

    pub fn progress(&self) -> GoalProgress {
        GoalProgress::from(*self)
    }
}

/// Progress metrics derived from [`DayStats`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalProgress {
    pub total_days: u64,
    pub completed_days: u64,
    pub remaining_days: u64,
    /// In `[0, 100]`; 0 when there are no days.
    pub progress_percentage: f64,
    /// True when there is at least one day and every day is completed.
    pub completed: bool,
}

impl From<DayStats> for GoalProgress {
    fn from(stats: DayStats) -> Self {
        let progress_percentage = if stats.total == 0 {
            0.0
        } else {
            (stats.completed as f64 / stats.total as f64 * 100.0).min(100.0)
        };
        Self {
            total_days: stats.total,
            completed_days: stats.completed,
            remaining_days: stats.total.saturating_sub(stats.completed),
            progress_percentage,
            completed: stats.total > 0 && stats.completed == stats.total,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, TimeZone, Utc};

    fn day(id: &str, date: u32, completed: bool) -> GoalDay {
        let at = Utc.with_ymd_and_hms(2024, 1, date, 8, 0, 0).unwrap();
        GoalDay {
            id: id.to_string(),
            goal_id: "goal-1".to_string(),
            day_date: NaiveDate::from_ymd_opt(2024, 1, date).unwrap(),
            completed,
            completed_at: completed.then_some(at),
            created_at: at,
        }
    }

    #[test]
    fn test_empty_stats_have_zero_progress() {
        let progress = DayStats::default().progress();
        assert_eq!(progress.total_days, 0);
        assert_eq!(progress.remaining_days, 0);
        assert_eq!(progress.progress_percentage, 0.0);
        assert!(!progress.completed);
    }

    #[test]
    fn test_one_of_three_completed() {
        let days = vec![day("a", 1, false), day("b", 2, true), day("c", 3, false)];
        let progress = DayStats::from_days(&days).progress();
        assert_eq!(progress.total_days, 3);
        assert_eq!(progress.completed_days, 1);
        assert_eq!(progress.remaining_days, 2);
        assert!((progress.progress_percentage - 33.333_333).abs() < 1e-4);
        assert!(!progress.completed);
    }

    #[test]
    fn test_single_completed_day_is_complete() {
        let days = vec![day("a", 1, true)];
        let progress = DayStats::from_days(&days).progress();
        assert!(progress.completed);
        assert_eq!(progress.remaining_days, 0);
        assert_eq!(progress.progress_percentage, 100.0);
    }

    #[test]
    fn test_counts_and_loaded_days_agree() {
        let days = vec![day("a", 1, true), day("b", 2, true), day("c", 3, false)];
        assert_eq!(DayStats::from_days(&days), DayStats::new(3, 2));
        assert_eq!(
            DayStats::from_days(&days).progress(),
            DayStats::new(3, 2).progress()
        );
    }
}

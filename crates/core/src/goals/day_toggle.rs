//! Day toggle state machine.
//!
//! Only the current day can be toggled. Before the flip, every earlier day of
//! the goal that has no record yet gets one (not completed), so a goal never
//! has gaps between its start date and the last toggled day.

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, warn};

use super::goals_errors::GoalError;
use super::goals_model::{GoalDay, NewGoalDay};
use crate::errors::Result;
use crate::store::TrackingStore;
use crate::utils::time_utils::days_before;

/// What a successful toggle did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    /// Completion state of the target day after the flip.
    pub completed: bool,
    /// Number of missing earlier days that were created.
    pub backfilled: usize,
}

/// Flips the completion state of `date` for a goal.
///
/// `today` and `now` are read once by the caller. Rejections happen before
/// anything is written.
pub fn toggle_day(
    store: &mut dyn TrackingStore,
    goal_id: &str,
    date: NaiveDate,
    today: NaiveDate,
    now: DateTime<Utc>,
) -> Result<ToggleOutcome> {
    let goal = store
        .find_goal(goal_id)?
        .ok_or_else(|| GoalError::GoalNotFound(goal_id.to_string()))?;

    if date != today {
        warn!("Rejected toggle of {} for goal {}: not today", date, goal_id);
        return Err(GoalError::InvalidToggleDate {
            date,
            reason: "You can only mark today's progress".to_string(),
        }
        .into());
    }
    if !goal.contains(date) {
        warn!(
            "Rejected toggle of {} for goal {}: outside {}..={}",
            date, goal_id, goal.start_date, goal.end_date
        );
        return Err(GoalError::InvalidToggleDate {
            date,
            reason: format!(
                "Date is outside the goal period {} to {}",
                goal.start_date, goal.end_date
            ),
        }
        .into());
    }

    let backfilled = backfill_missed_days(store, goal_id, goal.start_date, date, now)?;

    let mut day = find_or_create_day(store, goal_id, date, now)?;
    let completed = day.toggle(now);
    store.update_day(&day)?;

    debug!(
        "Toggled {} for goal {} to {} ({} days backfilled)",
        date, goal_id, completed, backfilled
    );
    Ok(ToggleOutcome {
        completed,
        backfilled,
    })
}

/// Creates a not completed record for every date in `[start, until)` that
/// has none. Existing records are left as they are.
fn backfill_missed_days(
    store: &mut dyn TrackingStore,
    goal_id: &str,
    start: NaiveDate,
    until: NaiveDate,
    now: DateTime<Utc>,
) -> Result<usize> {
    let mut created = 0;
    for date in days_before(start, until) {
        if store.find_day(goal_id, date)?.is_none() {
            store.insert_day(NewGoalDay::new(goal_id, date, now))?;
            created += 1;
        }
    }
    Ok(created)
}

fn find_or_create_day(
    store: &mut dyn TrackingStore,
    goal_id: &str,
    date: NaiveDate,
    now: DateTime<Utc>,
) -> Result<GoalDay> {
    match store.find_day(goal_id, date)? {
        Some(day) => Ok(day),
        None => store.insert_day(NewGoalDay::new(goal_id, date, now)),
    }
}

//! Materializes the day records of a goal.

use chrono::{DateTime, Utc};
use log::debug;

use super::goals_model::{Goal, NewGoalDay};
use crate::errors::Result;
use crate::store::TrackingStore;
use crate::utils::time_utils::days_in_range;

/// One not-completed day per calendar date of the goal's inclusive range.
pub fn new_days_for(goal: &Goal, created_at: DateTime<Utc>) -> Vec<NewGoalDay> {
    days_in_range(goal.start_date, goal.end_date)
        .map(|date| NewGoalDay::new(goal.id.clone(), date, created_at))
        .collect()
}

/// Creates and persists a day record for every date from `goal.start_date`
/// to `goal.end_date` inclusive. Returns the number of records created.
///
/// The goal must not have any days yet; existing days make the store reject
/// the insert as a duplicate.
pub fn generate_days(
    store: &mut dyn TrackingStore,
    goal: &Goal,
    created_at: DateTime<Utc>,
) -> Result<usize> {
    let new_days = new_days_for(goal, created_at);
    let created = store.insert_days(new_days)?;
    debug!(
        "Generated {} days for goal {} ({} to {})",
        created, goal.id, goal.start_date, goal.end_date
    );
    Ok(created)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::NewGoal;
    use crate::store::MemoryState;
    use crate::users::NewUser;
    use chrono::{NaiveDate, TimeZone};

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn store_with_goal(start: NaiveDate, end: NaiveDate) -> (MemoryState, Goal) {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();
        let mut store = MemoryState::default();
        let user = store
            .insert_user(
                NewUser {
                    username: "walker".to_string(),
                    email: "walker@example.com".to_string(),
                },
                now,
            )
            .unwrap();
        let goal = store
            .insert_goal(
                &user.id,
                NewGoal {
                    title: "Walk".to_string(),
                    description: None,
                    start_date: start,
                    end_date: end,
                },
                now,
            )
            .unwrap();
        (store, goal)
    }

    #[test]
    fn test_generates_one_incomplete_day_per_date() {
        let (mut store, goal) = store_with_goal(date(2024, 1, 1), date(2024, 1, 3));
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 9, 0, 0).unwrap();

        let created = generate_days(&mut store, &goal, now).unwrap();

        assert_eq!(created, 3);
        let days = store.list_days(&goal.id).unwrap();
        let dates: Vec<_> = days.iter().map(|d| d.day_date).collect();
        assert_eq!(dates, vec![date(2024, 1, 1), date(2024, 1, 2), date(2024, 1, 3)]);
        assert!(days.iter().all(|d| !d.completed && d.completed_at.is_none()));
    }

    #[test]
    fn test_generation_over_existing_days_is_rejected() {
        let (mut store, goal) = store_with_goal(date(2024, 3, 1), date(2024, 3, 2));
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        generate_days(&mut store, &goal, now).unwrap();

        assert!(generate_days(&mut store, &goal, now).is_err());
    }

    #[test]
    fn test_new_days_cover_month_boundary() {
        let (_, goal) = store_with_goal(date(2024, 1, 30), date(2024, 2, 2));
        let now = Utc.with_ymd_and_hms(2024, 1, 30, 9, 0, 0).unwrap();
        let days = new_days_for(&goal, now);
        assert_eq!(days.len() as u64, goal.total_days());
        assert_eq!(days.last().map(|d| d.day_date), Some(date(2024, 2, 2)));
    }
}

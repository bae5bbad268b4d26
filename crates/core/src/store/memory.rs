//! In-memory store.
//!
//! Jobs run against a private copy of the state, which replaces the shared
//! state only when a write job succeeds. That gives the same all-or-nothing
//! behaviour as the SQLite writer without a database.

use std::sync::{Mutex, MutexGuard};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use uuid::Uuid;

use super::store_traits::{Erased, StoreJob, TrackingStore, TrackingStoreExecutor};
use crate::errors::{DatabaseError, Error, Result};
use crate::goals::{Goal, GoalDay, NewGoal, NewGoalDay};
use crate::users::{NewUser, User};

#[derive(Debug, Clone, Default)]
pub struct MemoryState {
    users: Vec<User>,
    goals: Vec<Goal>,
    days: Vec<GoalDay>,
}

impl MemoryState {
    pub fn users(&self) -> &[User] {
        &self.users
    }

    pub fn goals(&self) -> &[Goal] {
        &self.goals
    }

    pub fn days(&self) -> &[GoalDay] {
        &self.days
    }
}

impl TrackingStore for MemoryState {
    fn find_user(&mut self, user_id: &str) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.id == user_id).cloned())
    }

    fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    fn insert_user(&mut self, new_user: NewUser, created_at: DateTime<Utc>) -> Result<User> {
        let user = User {
            id: Uuid::new_v4().to_string(),
            username: new_user.username,
            email: new_user.email,
            created_at,
        };
        self.users.push(user.clone());
        Ok(user)
    }

    fn find_goal(&mut self, goal_id: &str) -> Result<Option<Goal>> {
        Ok(self.goals.iter().find(|g| g.id == goal_id).cloned())
    }

    fn insert_goal(
        &mut self,
        user_id: &str,
        new_goal: NewGoal,
        created_at: DateTime<Utc>,
    ) -> Result<Goal> {
        if !self.users.iter().any(|u| u.id == user_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!("user {}", user_id)).into());
        }
        let goal = Goal {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: new_goal.title,
            description: new_goal.description,
            start_date: new_goal.start_date,
            end_date: new_goal.end_date,
            created_at,
        };
        self.goals.push(goal.clone());
        Ok(goal)
    }

    fn update_goal(&mut self, goal: &Goal) -> Result<()> {
        let existing = self
            .goals
            .iter_mut()
            .find(|g| g.id == goal.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("goal {}", goal.id)))?;
        existing.title = goal.title.clone();
        existing.description = goal.description.clone();
        existing.start_date = goal.start_date;
        existing.end_date = goal.end_date;
        Ok(())
    }

    fn delete_goal(&mut self, goal_id: &str) -> Result<usize> {
        if self.days.iter().any(|d| d.goal_id == goal_id) {
            return Err(DatabaseError::ForeignKeyViolation(format!(
                "goal {} still has days",
                goal_id
            ))
            .into());
        }
        let before = self.goals.len();
        self.goals.retain(|g| g.id != goal_id);
        Ok(before - self.goals.len())
    }

    fn list_goals(&mut self, owner_id: Option<&str>) -> Result<Vec<Goal>> {
        let mut goals: Vec<Goal> = self
            .goals
            .iter()
            .filter(|g| owner_id.map_or(true, |owner| g.user_id == owner))
            .cloned()
            .collect();
        goals.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(goals)
    }

    fn find_day(&mut self, goal_id: &str, date: NaiveDate) -> Result<Option<GoalDay>> {
        Ok(self
            .days
            .iter()
            .find(|d| d.goal_id == goal_id && d.day_date == date)
            .cloned())
    }

    fn insert_day(&mut self, new_day: NewGoalDay) -> Result<GoalDay> {
        if !self.goals.iter().any(|g| g.id == new_day.goal_id) {
            return Err(
                DatabaseError::ForeignKeyViolation(format!("goal {}", new_day.goal_id)).into(),
            );
        }
        if self
            .days
            .iter()
            .any(|d| d.goal_id == new_day.goal_id && d.day_date == new_day.day_date)
        {
            return Err(DatabaseError::UniqueViolation(format!(
                "goal_days.goal_id, goal_days.day_date ({}, {})",
                new_day.goal_id, new_day.day_date
            ))
            .into());
        }
        let day = GoalDay {
            id: Uuid::new_v4().to_string(),
            goal_id: new_day.goal_id,
            day_date: new_day.day_date,
            completed: false,
            completed_at: None,
            created_at: new_day.created_at,
        };
        self.days.push(day.clone());
        Ok(day)
    }

    fn insert_days(&mut self, new_days: Vec<NewGoalDay>) -> Result<usize> {
        let count = new_days.len();
        for new_day in new_days {
            self.insert_day(new_day)?;
        }
        Ok(count)
    }

    fn update_day(&mut self, day: &GoalDay) -> Result<()> {
        let existing = self
            .days
            .iter_mut()
            .find(|d| d.id == day.id)
            .ok_or_else(|| DatabaseError::NotFound(format!("goal day {}", day.id)))?;
        existing.completed = day.completed;
        existing.completed_at = day.completed_at;
        Ok(())
    }

    fn list_days(&mut self, goal_id: &str) -> Result<Vec<GoalDay>> {
        let mut days: Vec<GoalDay> = self
            .days
            .iter()
            .filter(|d| d.goal_id == goal_id)
            .cloned()
            .collect();
        days.sort_by_key(|d| d.day_date);
        Ok(days)
    }

    fn count_days(&mut self, goal_id: &str) -> Result<u64> {
        Ok(self.days.iter().filter(|d| d.goal_id == goal_id).count() as u64)
    }

    fn count_completed_days(&mut self, goal_id: &str) -> Result<u64> {
        Ok(self
            .days
            .iter()
            .filter(|d| d.goal_id == goal_id && d.completed)
            .count() as u64)
    }

    fn delete_days(&mut self, goal_id: &str) -> Result<usize> {
        let before = self.days.len();
        self.days.retain(|d| d.goal_id != goal_id);
        Ok(before - self.days.len())
    }
}

/// [`TrackingStoreExecutor`] over a [`MemoryState`] behind a mutex.
#[derive(Debug, Default)]
pub struct InMemoryStoreExecutor {
    state: Mutex<MemoryState>,
}

impl InMemoryStoreExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of the committed state.
    pub fn snapshot(&self) -> Result<MemoryState> {
        Ok(self.lock()?.clone())
    }

    fn lock(&self) -> Result<MutexGuard<'_, MemoryState>> {
        self.state
            .lock()
            .map_err(|e| Error::Database(DatabaseError::Internal(e.to_string())))
    }
}

#[async_trait]
impl TrackingStoreExecutor for InMemoryStoreExecutor {
    fn read(&self, job: StoreJob) -> Result<Erased> {
        let mut working = self.lock()?.clone();
        job(&mut working)
    }

    async fn write(&self, job: StoreJob) -> Result<Erased> {
        let mut guard = self.lock()?;
        let mut working = guard.clone();
        let value = job(&mut working)?;
        *guard = working;
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::goals::GoalError;
    use chrono::TimeZone;

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap()
    }

    fn date(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 1, d).unwrap()
    }

    fn seeded() -> (InMemoryStoreExecutor, Goal) {
        let mut state = MemoryState::default();
        let user = state
            .insert_user(
                NewUser {
                    username: "seed".to_string(),
                    email: "seed@example.com".to_string(),
                },
                now(),
            )
            .unwrap();
        let goal = state
            .insert_goal(
                &user.id,
                NewGoal {
                    title: "Seed".to_string(),
                    description: None,
                    start_date: date(1),
                    end_date: date(3),
                },
                now(),
            )
            .unwrap();
        (
            InMemoryStoreExecutor {
                state: Mutex::new(state),
            },
            goal,
        )
    }

    #[tokio::test]
    async fn test_failed_write_keeps_nothing_and_returns_job_error() {
        let (executor, goal) = seeded();
        let executor: &dyn TrackingStoreExecutor = &executor;
        let goal_id = goal.id.clone();

        let err = executor
            .write_with(move |store| -> Result<()> {
                store.insert_day(NewGoalDay::new(goal_id.clone(), date(1), now()))?;
                Err(GoalError::GoalNotFound(goal_id).into())
            })
            .await
            .unwrap_err();

        assert!(matches!(err, Error::Goal(GoalError::GoalNotFound(_))));
        let count = executor
            .read_with(move |store| store.count_days(&goal.id))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[tokio::test]
    async fn test_successful_write_commits() {
        let (executor, goal) = seeded();
        let goal_id = goal.id.clone();
        let dyn_executor: &dyn TrackingStoreExecutor = &executor;

        let inserted = dyn_executor
            .write_with(move |store| {
                store.insert_days(vec![
                    NewGoalDay::new(goal_id.clone(), date(1), now()),
                    NewGoalDay::new(goal_id, date(2), now()),
                ])
            })
            .await
            .unwrap();

        assert_eq!(inserted, 2);
        assert_eq!(executor.snapshot().unwrap().days().len(), 2);
    }

    #[test]
    fn test_duplicate_day_and_dangling_goal_are_rejected() {
        let (executor, goal) = seeded();
        let mut state = executor.snapshot().unwrap();
        state
            .insert_day(NewGoalDay::new(goal.id.clone(), date(1), now()))
            .unwrap();

        let duplicate = state.insert_day(NewGoalDay::new(goal.id.clone(), date(1), now()));
        assert!(matches!(
            duplicate,
            Err(Error::Database(DatabaseError::UniqueViolation(_)))
        ));

        let dangling = state.insert_day(NewGoalDay::new("missing", date(1), now()));
        assert!(matches!(
            dangling,
            Err(Error::Database(DatabaseError::ForeignKeyViolation(_)))
        ));

        assert!(matches!(
            state.delete_goal(&goal.id),
            Err(Error::Database(DatabaseError::ForeignKeyViolation(_)))
        ));
    }

    #[test]
    fn test_goals_listed_newest_first() {
        let (executor, first) = seeded();
        let mut state = executor.snapshot().unwrap();
        let second = state
            .insert_goal(
                &first.user_id,
                NewGoal {
                    title: "Later".to_string(),
                    description: None,
                    start_date: date(2),
                    end_date: date(4),
                },
                now() + chrono::Duration::hours(1),
            )
            .unwrap();

        let ids: Vec<_> = state
            .list_goals(Some(&first.user_id))
            .unwrap()
            .into_iter()
            .map(|g| g.id)
            .collect();
        assert_eq!(ids, vec![second.id, first.id]);
        assert!(state.list_goals(Some("nobody")).unwrap().is_empty());
    }
}

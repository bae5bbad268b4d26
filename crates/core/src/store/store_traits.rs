//! Store traits used by the tracking engine.
//!
//! These traits define the contract for persistence without any
//! database-specific types, allowing for different storage implementations.
//! Every service operation runs as a single job against a [`TrackingStore`],
//! and the [`TrackingStoreExecutor`] decides how that job is made atomic.

use std::any::Any;

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};

use crate::errors::{Error, Result};
use crate::goals::{Goal, GoalDay, NewGoal, NewGoalDay};
use crate::users::{NewUser, User};

/// A transaction-scoped view of the durable store.
///
/// Implementations are handed out by a [`TrackingStoreExecutor`] for the
/// duration of one job; everything done through one `&mut dyn TrackingStore`
/// commits or rolls back together.
pub trait TrackingStore {
    fn find_user(&mut self, user_id: &str) -> Result<Option<User>>;

    fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>>;

    /// Persists a user; the store assigns the id.
    fn insert_user(&mut self, new_user: NewUser, created_at: DateTime<Utc>) -> Result<User>;

    fn find_goal(&mut self, goal_id: &str) -> Result<Option<Goal>>;

    /// Persists a goal for `user_id`; the store assigns the id.
    fn insert_goal(
        &mut self,
        user_id: &str,
        new_goal: NewGoal,
        created_at: DateTime<Utc>,
    ) -> Result<Goal>;

    /// Overwrites title, description and date range of an existing goal.
    fn update_goal(&mut self, goal: &Goal) -> Result<()>;

    /// Removes the goal row. Its days must already be gone.
    fn delete_goal(&mut self, goal_id: &str) -> Result<usize>;

    /// Goals ordered by creation time, newest first, optionally for one owner.
    fn list_goals(&mut self, owner_id: Option<&str>) -> Result<Vec<Goal>>;

    fn find_day(&mut self, goal_id: &str, date: NaiveDate) -> Result<Option<GoalDay>>;

    /// Persists a single, not completed day. Fails on a duplicate (goal, date).
    fn insert_day(&mut self, new_day: NewGoalDay) -> Result<GoalDay>;

    /// Bulk variant of [`TrackingStore::insert_day`]. Returns the number inserted.
    fn insert_days(&mut self, new_days: Vec<NewGoalDay>) -> Result<usize>;

    /// Persists the completion flag and timestamp of an existing day.
    fn update_day(&mut self, day: &GoalDay) -> Result<()>;

    /// Days of a goal ordered by date ascending.
    fn list_days(&mut self, goal_id: &str) -> Result<Vec<GoalDay>>;

    fn count_days(&mut self, goal_id: &str) -> Result<u64>;

    fn count_completed_days(&mut self, goal_id: &str) -> Result<u64>;

    /// Removes every day of a goal and returns how many were removed.
    fn delete_days(&mut self, goal_id: &str) -> Result<usize>;
}

/// Type-erased result of a store job.
pub type Erased = Box<dyn Any + Send>;

/// A unit of work run against a [`TrackingStore`].
pub type StoreJob = Box<dyn FnOnce(&mut dyn TrackingStore) -> Result<Erased> + Send>;

/// Runs store jobs atomically.
#[async_trait]
pub trait TrackingStoreExecutor: Send + Sync {
    /// Runs a read-only job on a consistent snapshot.
    fn read(&self, job: StoreJob) -> Result<Erased>;

    /// Runs a job inside a single write transaction. If the job fails nothing
    /// it did is kept, and the job's own error is returned.
    async fn write(&self, job: StoreJob) -> Result<Erased>;
}

impl<'a> dyn TrackingStoreExecutor + 'a {
    /// Typed wrapper around [`TrackingStoreExecutor::read`].
    pub fn read_with<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn TrackingStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let erased = self.read(erase(job))?;
        downcast(erased)
    }

    /// Typed wrapper around [`TrackingStoreExecutor::write`].
    pub async fn write_with<T, F>(&self, job: F) -> Result<T>
    where
        F: FnOnce(&mut dyn TrackingStore) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let erased = self.write(erase(job)).await?;
        downcast(erased)
    }
}

fn erase<T, F>(job: F) -> StoreJob
where
    F: FnOnce(&mut dyn TrackingStore) -> Result<T> + Send + 'static,
    T: Send + 'static,
{
    Box::new(move |store| job(store).map(|value| Box::new(value) as Erased))
}

fn downcast<T: 'static>(erased: Erased) -> Result<T> {
    erased
        .downcast::<T>()
        .map(|boxed| *boxed)
        .map_err(|_| Error::Unexpected("Store job returned an unexpected type".to_string()))
}

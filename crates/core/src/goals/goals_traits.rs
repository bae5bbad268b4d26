use async_trait::async_trait;
use chrono::NaiveDate;

use super::goals_model::{GoalDay, GoalDto, GoalFilter, GoalUpdate, NewGoal};
use super::progress::GoalProgress;
use crate::errors::Result;

/// Trait for goal service operations.
///
/// Every writing operation runs as one store transaction; reads run on a
/// consistent snapshot.
#[async_trait]
pub trait GoalServiceTrait: Send + Sync {
    /// Creates a goal for `user_id` together with one day record per date.
    async fn create_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<GoalDto>;

    /// Replaces the goal's fields and regenerates its days for the new range.
    /// All previous completion state is discarded.
    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<GoalDto>;

    /// Deletes the goal and all of its days.
    async fn delete_goal(&self, goal_id: &str) -> Result<()>;

    /// Toggles the completion of `date`, which must be today. Returns the new
    /// completion state.
    async fn toggle_day(&self, goal_id: &str, date: NaiveDate) -> Result<bool>;

    fn get_goal(&self, goal_id: &str) -> Result<GoalDto>;

    /// Day records of the goal ordered by date.
    fn get_goal_days(&self, goal_id: &str) -> Result<Vec<GoalDay>>;

    fn get_goal_progress(&self, goal_id: &str) -> Result<GoalProgress>;

    /// Goals newest first, optionally restricted to one owner.
    fn list_goals(&self, owner_id: Option<&str>, filter: GoalFilter) -> Result<Vec<GoalDto>>;
}

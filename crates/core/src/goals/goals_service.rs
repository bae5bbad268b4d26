use std::sync::Arc;

use async_trait::async_trait;
use chrono::NaiveDate;
use log::{debug, info};

use super::day_generator::generate_days;
use super::day_toggle;
use super::goals_errors::GoalError;
use super::goals_model::{Goal, GoalDay, GoalDto, GoalFilter, GoalUpdate, NewGoal};
use super::goals_traits::GoalServiceTrait;
use super::progress::{DayStats, GoalProgress};
use crate::errors::Result;
use crate::store::{TrackingStore, TrackingStoreExecutor};
use crate::utils::{Clock, ClockSnapshot};

/// Service orchestrating the goal lifecycle on top of a store executor.
pub struct GoalService {
    executor: Arc<dyn TrackingStoreExecutor>,
    clock: Arc<dyn Clock>,
}

impl GoalService {
    pub fn new(executor: Arc<dyn TrackingStoreExecutor>, clock: Arc<dyn Clock>) -> Self {
        Self { executor, clock }
    }
}

fn require_goal(store: &mut dyn TrackingStore, goal_id: &str) -> Result<Goal> {
    store
        .find_goal(goal_id)?
        .ok_or_else(|| GoalError::GoalNotFound(goal_id.to_string()).into())
}

/// Projection with progress counted from the loaded day records.
fn entity_dto(store: &mut dyn TrackingStore, goal: &Goal) -> Result<GoalDto> {
    let days = store.list_days(&goal.id)?;
    Ok(GoalDto::new(goal, DayStats::from_days(&days).progress()))
}

#[async_trait]
impl GoalServiceTrait for GoalService {
    async fn create_goal(&self, user_id: &str, new_goal: NewGoal) -> Result<GoalDto> {
        let now = self.clock.now();
        let user_id = user_id.to_string();
        debug!("Creating goal '{}' for user {}", new_goal.title, user_id);

        let dto = self
            .executor
            .write_with(move |store| {
                if store.find_user(&user_id)?.is_none() {
                    return Err(GoalError::OwnerNotFound(user_id).into());
                }
                let goal = store.insert_goal(&user_id, new_goal, now)?;
                generate_days(store, &goal, now)?;
                entity_dto(store, &goal)
            })
            .await?;

        info!("Created goal {} with {} days", dto.id, dto.total_days);
        Ok(dto)
    }

    async fn update_goal(&self, goal_id: &str, update: GoalUpdate) -> Result<GoalDto> {
        let now = self.clock.now();
        let goal_id = goal_id.to_string();
        debug!("Updating goal {}", goal_id);

        self.executor
            .write_with(move |store| {
                let mut goal = require_goal(store, &goal_id)?;
                goal.apply(update);
                store.update_goal(&goal)?;

                let removed = store.delete_days(&goal.id)?;
                let created = generate_days(store, &goal, now)?;
                info!(
                    "Regenerated days of goal {}: {} removed, {} created",
                    goal.id, removed, created
                );
                entity_dto(store, &goal)
            })
            .await
    }

    async fn delete_goal(&self, goal_id: &str) -> Result<()> {
        let goal_id = goal_id.to_string();
        debug!("Deleting goal {}", goal_id);

        self.executor
            .write_with(move |store| {
                let goal = require_goal(store, &goal_id)?;
                let removed_days = store.delete_days(&goal.id)?;
                store.delete_goal(&goal.id)?;
                info!("Deleted goal {} and {} days", goal.id, removed_days);
                Ok(())
            })
            .await
    }

    async fn toggle_day(&self, goal_id: &str, date: NaiveDate) -> Result<bool> {
        let ClockSnapshot { today, now } = self.clock.snapshot();
        let goal_id = goal_id.to_string();

        let outcome = self
            .executor
            .write_with(move |store| day_toggle::toggle_day(store, &goal_id, date, today, now))
            .await?;
        Ok(outcome.completed)
    }

    fn get_goal(&self, goal_id: &str) -> Result<GoalDto> {
        let goal_id = goal_id.to_string();
        self.executor.read_with(move |store| {
            let goal = require_goal(store, &goal_id)?;
            entity_dto(store, &goal)
        })
    }

    fn get_goal_days(&self, goal_id: &str) -> Result<Vec<GoalDay>> {
        let goal_id = goal_id.to_string();
        self.executor.read_with(move |store| {
            let goal = require_goal(store, &goal_id)?;
            store.list_days(&goal.id)
        })
    }

    fn get_goal_progress(&self, goal_id: &str) -> Result<GoalProgress> {
        let goal_id = goal_id.to_string();
        self.executor.read_with(move |store| {
            let goal = require_goal(store, &goal_id)?;
            Ok(DayStats::from_store(store, &goal.id)?.progress())
        })
    }

    fn list_goals(&self, owner_id: Option<&str>, filter: GoalFilter) -> Result<Vec<GoalDto>> {
        let owner_id = owner_id.map(str::to_string);
        self.executor.read_with(move |store| {
            let goals = store.list_goals(owner_id.as_deref())?;
            let mut dtos = Vec::with_capacity(goals.len());
            for goal in &goals {
                let progress = DayStats::from_store(store, &goal.id)?.progress();
                if filter.matches(&progress) {
                    dtos.push(GoalDto::new(goal, progress));
                }
            }
            Ok(dtos)
        })
    }
}

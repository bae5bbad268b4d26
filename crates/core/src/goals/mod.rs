//! Goals module - domain models, day tracking, progress and the goal service.

pub mod day_generator;
pub mod day_toggle;
mod goals_errors;
mod goals_model;
mod goals_service;
mod goals_traits;
mod progress;


pub use day_toggle::ToggleOutcome;
pub use goals_errors::GoalError;
pub use goals_model::{
    Goal, GoalDay, GoalDayDto, GoalDto, GoalFilter, GoalUpdate, NewGoal, NewGoalDay,
    DESCRIPTION_MAX_CHARS, MAX_GOAL_SPAN_DAYS, TITLE_MAX_CHARS, TITLE_MIN_CHARS,
};
pub use goals_service::GoalService;
pub use goals_traits::GoalServiceTrait;
pub use progress::{DayStats, GoalProgress};

//! Goals domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::progress::GoalProgress;
use crate::errors::{Error, Result};
use crate::utils::time_utils::inclusive_day_count;

/// Longest allowed distance between start and end date, in days.
pub const MAX_GOAL_SPAN_DAYS: i64 = 365;
pub const TITLE_MIN_CHARS: usize = 3;
pub const TITLE_MAX_CHARS: usize = 100;
pub const DESCRIPTION_MAX_CHARS: usize = 500;

/// Domain model representing a goal tracked over an inclusive date range.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Goal {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl Goal {
    /// `(end - start) + 1`, the number of days the goal spans.
    pub fn total_days(&self) -> u64 {
        inclusive_day_count(self.start_date, self.end_date)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Overwrites the editable fields from an update payload.
    pub fn apply(&mut self, update: GoalUpdate) {
        self.title = update.title;
        self.description = update.description;
        self.start_date = update.start_date;
        self.end_date = update.end_date;
    }
}

/// Input model for creating a new goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl NewGoal {
    /// Boundary rules for a new goal. On top of the shared field rules the
    /// start date may not lie before `today`.
    pub fn validate(&self, today: NaiveDate) -> Result<()> {
        validate_fields(
            &self.title,
            self.description.as_deref(),
            self.start_date,
            self.end_date,
        )?;
        if self.start_date < today {
            return Err(Error::invalid_input("Start date cannot be in the past"));
        }
        Ok(())
    }
}

/// Input model for updating an existing goal.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalUpdate {
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
}

impl GoalUpdate {
    pub fn validate(&self) -> Result<()> {
        validate_fields(
            &self.title,
            self.description.as_deref(),
            self.start_date,
            self.end_date,
        )
    }
}

fn validate_fields(
    title: &str,
    description: Option<&str>,
    start_date: NaiveDate,
    end_date: NaiveDate,
) -> Result<()> {
    let title_len = title.trim().chars().count();
    if title_len == 0 {
        return Err(Error::invalid_input("Title is required"));
    }
    if !(TITLE_MIN_CHARS..=TITLE_MAX_CHARS).contains(&title_len) {
        return Err(Error::invalid_input(format!(
            "Title must be between {} and {} characters",
            TITLE_MIN_CHARS, TITLE_MAX_CHARS
        )));
    }
    if description.map_or(0, |d| d.chars().count()) > DESCRIPTION_MAX_CHARS {
        return Err(Error::invalid_input(format!(
            "Description cannot exceed {} characters",
            DESCRIPTION_MAX_CHARS
        )));
    }
    if end_date <= start_date {
        return Err(Error::invalid_input("End date must be after start date"));
    }
    if (end_date - start_date).num_days() > MAX_GOAL_SPAN_DAYS {
        return Err(Error::invalid_input(format!(
            "Goal duration cannot exceed {} days",
            MAX_GOAL_SPAN_DAYS
        )));
    }
    Ok(())
}

/// One tracked calendar day of a goal.
///
/// `completed_at` is set exactly when `completed` is true; use
/// [`GoalDay::set_completed`] to change either.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalDay {
    pub id: String,
    pub goal_id: String,
    pub day_date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl GoalDay {
    pub fn set_completed(&mut self, completed: bool, at: DateTime<Utc>) {
        self.completed = completed;
        self.completed_at = completed.then_some(at);
    }

    /// Flips the completion flag and returns the new value.
    pub fn toggle(&mut self, at: DateTime<Utc>) -> bool {
        self.set_completed(!self.completed, at);
        self.completed
    }
}

// Day records are identified by id alone.
impl PartialEq for GoalDay {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for GoalDay {}

/// Input model for a day record. New days always start as not completed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewGoalDay {
    pub goal_id: String,
    pub day_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

impl NewGoalDay {
    pub fn new(goal_id: impl Into<String>, day_date: NaiveDate, created_at: DateTime<Utc>) -> Self {
        Self {
            goal_id: goal_id.into(),
            day_date,
            created_at,
        }
    }
}

/// Which goals a listing returns, decided from computed progress.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GoalFilter {
    #[default]
    All,
    /// Fewer completed days than total days.
    Working,
    /// At least one day, all of them completed.
    Completed,
}

impl GoalFilter {
    pub fn matches(&self, progress: &GoalProgress) -> bool {
        match self {
            GoalFilter::All => true,
            GoalFilter::Working => progress.completed_days < progress.total_days,
            GoalFilter::Completed => progress.completed,
        }
    }
}

/// Flat goal projection handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDto {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub created_at: DateTime<Utc>,
    pub total_days: u64,
    pub completed_days: u64,
    pub remaining_days: u64,
    pub progress_percentage: f64,
    pub completed: bool,
}

impl GoalDto {
    pub fn new(goal: &Goal, progress: GoalProgress) -> Self {
        Self {
            id: goal.id.clone(),
            title: goal.title.clone(),
            description: goal.description.clone(),
            start_date: goal.start_date,
            end_date: goal.end_date,
            created_at: goal.created_at,
            total_days: progress.total_days,
            completed_days: progress.completed_days,
            remaining_days: progress.remaining_days,
            progress_percentage: progress.progress_percentage,
            completed: progress.completed,
        }
    }
}

/// Flat day projection handed to the presentation layer.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GoalDayDto {
    pub date: NaiveDate,
    pub completed: bool,
    pub completed_at: Option<DateTime<Utc>>,
}

impl From<&GoalDay> for GoalDayDto {
    fn from(day: &GoalDay) -> Self {
        Self {
            date: day.day_date,
            completed: day.completed,
            completed_at: day.completed_at,
        }
    }
}

impl From<GoalDay> for GoalDayDto {
    fn from(day: GoalDay) -> Self {
        GoalDayDto::from(&day)
    }
}

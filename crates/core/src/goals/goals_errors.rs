use chrono::NaiveDate;
use thiserror::Error;

/// Business-rule violations raised by goal operations.
///
/// None of these are transient; callers translate them into a response and
/// never retry.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GoalError {
    #[error("Goal not found with id: {0}")]
    GoalNotFound(String),

    #[error("User not found with id: {0}")]
    OwnerNotFound(String),

    #[error("Cannot toggle {date}: {reason}")]
    InvalidToggleDate { date: NaiveDate, reason: String },
}

//! Database models for goals and their day records.

use diesel::prelude::*;
use goaltrack_core::goals::{Goal, GoalDay, NewGoalDay};
use goaltrack_core::utils::time_utils::{from_naive_utc, to_naive_utc};

/// Database model for goals
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::goals)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDB {
    pub id: String,
    pub user_id: String,
    pub title: String,
    pub description: Option<String>,
    pub start_date: chrono::NaiveDate,
    pub end_date: chrono::NaiveDate,
    pub created_at: chrono::NaiveDateTime,
}

/// Database model for one tracked day of a goal
#[derive(
    Queryable, Identifiable, Insertable, Selectable, Associations, PartialEq, Debug, Clone,
)]
#[diesel(belongs_to(GoalDB, foreign_key = goal_id))]
#[diesel(table_name = crate::schema::goal_days)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct GoalDayDB {
    pub id: String,
    pub goal_id: String,
    pub day_date: chrono::NaiveDate,
    pub completed: bool,
    pub completed_at: Option<chrono::NaiveDateTime>,
    pub created_at: chrono::NaiveDateTime,
}

impl GoalDayDB {
    /// A fresh, not completed row with a generated id.
    pub fn from_new(new_day: NewGoalDay) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            goal_id: new_day.goal_id,
            day_date: new_day.day_date,
            completed: false,
            completed_at: None,
            created_at: to_naive_utc(new_day.created_at),
        }
    }
}

// Conversion to domain models
impl From<GoalDB> for Goal {
    fn from(db: GoalDB) -> Self {
        Self {
            id: db.id,
            user_id: db.user_id,
            title: db.title,
            description: db.description,
            start_date: db.start_date,
            end_date: db.end_date,
            created_at: from_naive_utc(db.created_at),
        }
    }
}

impl From<GoalDayDB> for GoalDay {
    fn from(db: GoalDayDB) -> Self {
        Self {
            id: db.id,
            goal_id: db.goal_id,
            day_date: db.day_date,
            completed: db.completed,
            completed_at: db.completed_at.map(from_naive_utc),
            created_at: from_naive_utc(db.created_at),
        }
    }
}

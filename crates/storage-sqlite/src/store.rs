//! Diesel implementation of the core [`TrackingStore`].

use chrono::{DateTime, NaiveDate, Utc};
use diesel::prelude::*;
use diesel::SqliteConnection;
use uuid::Uuid;

use goaltrack_core::errors::{DatabaseError, Error, Result};
use goaltrack_core::goals::{Goal, GoalDay, NewGoal, NewGoalDay};
use goaltrack_core::store::TrackingStore;
use goaltrack_core::users::{NewUser, User};
use goaltrack_core::utils::time_utils::to_naive_utc;

use crate::errors::IntoCore;
use crate::goals::{GoalDB, GoalDayDB};
use crate::schema::{goal_days, goals, users};
use crate::users::UserDB;
use crate::utils::chunk_rows_for_sqlite;

/// Columns bound per row by a `goal_days` insert.
const GOAL_DAY_COLUMNS: usize = 6;

/// A [`TrackingStore`] over a connection that is already inside a
/// transaction.
pub struct SqliteTrackingStore<'a> {
    conn: &'a mut SqliteConnection,
}

impl<'a> SqliteTrackingStore<'a> {
    pub fn new(conn: &'a mut SqliteConnection) -> Self {
        Self { conn }
    }
}

fn not_found(what: String) -> Error {
    Error::Database(DatabaseError::NotFound(what))
}

impl TrackingStore for SqliteTrackingStore<'_> {
    fn find_user(&mut self, user_id: &str) -> Result<Option<User>> {
        let user = users::table
            .find(user_id)
            .select(UserDB::as_select())
            .first(self.conn)
            .optional()
            .into_core()?;
        Ok(user.map(User::from))
    }

    fn find_user_by_username(&mut self, username: &str) -> Result<Option<User>> {
        let user = users::table
            .filter(users::username.eq(username))
            .select(UserDB::as_select())
            .first(self.conn)
            .optional()
            .into_core()?;
        Ok(user.map(User::from))
    }

    fn insert_user(&mut self, new_user: NewUser, created_at: DateTime<Utc>) -> Result<User> {
        let row = UserDB {
            id: Uuid::new_v4().to_string(),
            username: new_user.username,
            email: new_user.email,
            created_at: to_naive_utc(created_at),
        };
        diesel::insert_into(users::table)
            .values(&row)
            .execute(self.conn)
            .into_core()?;
        Ok(row.into())
    }

    fn find_goal(&mut self, goal_id: &str) -> Result<Option<Goal>> {
        let goal = goals::table
            .find(goal_id)
            .select(GoalDB::as_select())
            .first(self.conn)
            .optional()
            .into_core()?;
        Ok(goal.map(Goal::from))
    }

    fn insert_goal(
        &mut self,
        user_id: &str,
        new_goal: NewGoal,
        created_at: DateTime<Utc>,
    ) -> Result<Goal> {
        let row = GoalDB {
            id: Uuid::new_v4().to_string(),
            user_id: user_id.to_string(),
            title: new_goal.title,
            description: new_goal.description,
            start_date: new_goal.start_date,
            end_date: new_goal.end_date,
            created_at: to_naive_utc(created_at),
        };
        diesel::insert_into(goals::table)
            .values(&row)
            .execute(self.conn)
            .into_core()?;
        Ok(row.into())
    }

    fn update_goal(&mut self, goal: &Goal) -> Result<()> {
        // Explicit columns so a cleared description is written as NULL.
        let updated = diesel::update(goals::table.find(&goal.id))
            .set((
                goals::title.eq(&goal.title),
                goals::description.eq(goal.description.as_deref()),
                goals::start_date.eq(goal.start_date),
                goals::end_date.eq(goal.end_date),
            ))
            .execute(self.conn)
            .into_core()?;
        if updated == 0 {
            return Err(not_found(format!("goal {}", goal.id)));
        }
        Ok(())
    }

    fn delete_goal(&mut self, goal_id: &str) -> Result<usize> {
        diesel::delete(goals::table.find(goal_id))
            .execute(self.conn)
            .into_core()
    }

    fn list_goals(&mut self, owner_id: Option<&str>) -> Result<Vec<Goal>> {
        let mut query = goals::table.into_boxed();
        if let Some(owner) = owner_id {
            query = query.filter(goals::user_id.eq(owner));
        }
        let rows = query
            .order((goals::created_at.desc(), goals::id.asc()))
            .select(GoalDB::as_select())
            .load(self.conn)
            .into_core()?;
        Ok(rows.into_iter().map(Goal::from).collect())
    }

    fn find_day(&mut self, goal_id: &str, date: NaiveDate) -> Result<Option<GoalDay>> {
        let day = goal_days::table
            .filter(goal_days::goal_id.eq(goal_id))
            .filter(goal_days::day_date.eq(date))
            .select(GoalDayDB::as_select())
            .first(self.conn)
            .optional()
            .into_core()?;
        Ok(day.map(GoalDay::from))
    }

    fn insert_day(&mut self, new_day: NewGoalDay) -> Result<GoalDay> {
        let row = GoalDayDB::from_new(new_day);
        diesel::insert_into(goal_days::table)
            .values(&row)
            .execute(self.conn)
            .into_core()?;
        Ok(row.into())
    }

    fn insert_days(&mut self, new_days: Vec<NewGoalDay>) -> Result<usize> {
        let rows: Vec<GoalDayDB> = new_days.into_iter().map(GoalDayDB::from_new).collect();
        let mut inserted = 0;
        for chunk in chunk_rows_for_sqlite(&rows, GOAL_DAY_COLUMNS) {
            inserted += diesel::insert_into(goal_days::table)
                .values(chunk)
                .execute(self.conn)
                .into_core()?;
        }
        Ok(inserted)
    }

    fn update_day(&mut self, day: &GoalDay) -> Result<()> {
        let updated = diesel::update(goal_days::table.find(&day.id))
            .set((
                goal_days::completed.eq(day.completed),
                goal_days::completed_at.eq(day.completed_at.map(to_naive_utc)),
            ))
            .execute(self.conn)
            .into_core()?;
        if updated == 0 {
            return Err(not_found(format!("goal day {}", day.id)));
        }
        Ok(())
    }

    fn list_days(&mut self, goal_id: &str) -> Result<Vec<GoalDay>> {
        let rows = goal_days::table
            .filter(goal_days::goal_id.eq(goal_id))
            .order(goal_days::day_date.asc())
            .select(GoalDayDB::as_select())
            .load(self.conn)
            .into_core()?;
        Ok(rows.into_iter().map(GoalDay::from).collect())
    }

    fn count_days(&mut self, goal_id: &str) -> Result<u64> {
        let count: i64 = goal_days::table
            .filter(goal_days::goal_id.eq(goal_id))
            .count()
            .get_result(self.conn)
            .into_core()?;
        Ok(count as u64)
    }

    fn count_completed_days(&mut self, goal_id: &str) -> Result<u64> {
        let count: i64 = goal_days::table
            .filter(goal_days::goal_id.eq(goal_id))
            .filter(goal_days::completed.eq(true))
            .count()
            .get_result(self.conn)
            .into_core()?;
        Ok(count as u64)
    }

    fn delete_days(&mut self, goal_id: &str) -> Result<usize> {
        diesel::delete(goal_days::table.filter(goal_days::goal_id.eq(goal_id)))
            .execute(self.conn)
            .into_core()
    }
}

//! Database models for users.

use diesel::prelude::*;
use goaltrack_core::users::User;
use goaltrack_core::utils::time_utils::from_naive_utc;

/// Database model for users
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::users)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct UserDB {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: chrono::NaiveDateTime,
}

impl From<UserDB> for User {
    fn from(db: UserDB) -> Self {
        Self {
            id: db.id,
            username: db.username,
            email: db.email,
            created_at: from_naive_utc(db.created_at),
        }
    }
}

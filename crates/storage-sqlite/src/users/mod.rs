//! SQLite storage models for users.

mod model;

pub use model::UserDB;

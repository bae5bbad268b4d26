//! SQLite storage models for goals.

mod model;

pub use model::{GoalDB, GoalDayDB};

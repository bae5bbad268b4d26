//! User domain models.
//!
//! Users only exist so that goals have an owner to point at. Authentication is
//! handled outside the core, which receives an already resolved user id.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{Error, Result};

/// Domain model representing a goal owner.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub username: String,
    pub email: String,
    pub created_at: DateTime<Utc>,
}

/// Input model for registering a new user.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

impl NewUser {
    pub fn validate(&self) -> Result<()> {
        let username = self.username.trim();
        if username.chars().count() < 3 || username.chars().count() > 50 {
            return Err(Error::invalid_input(
                "Username must be between 3 and 50 characters",
            ));
        }
        let email = self.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(Error::invalid_input("Email must be a valid address"));
        }
        Ok(())
    }
}

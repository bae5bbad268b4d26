use async_trait::async_trait;

use super::users_model::{NewUser, User};
use crate::errors::Result;

/// Trait for user service operations.
#[async_trait]
pub trait UserServiceTrait: Send + Sync {
    /// Registers a new user. Usernames are unique.
    async fn register_user(&self, new_user: NewUser) -> Result<User>;

    /// Retrieves a user by id.
    fn get_user(&self, user_id: &str) -> Result<User>;
}

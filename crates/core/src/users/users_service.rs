use std::sync::Arc;

use async_trait::async_trait;
use log::debug;

use super::users_model::{NewUser, User};
use super::users_traits::UserServiceTrait;
use crate::errors::{DatabaseError, Error, Result};
use crate::store::TrackingStoreExecutor;
use crate::utils::Clock;

/// Service for registering and resolving goal owners.
pub struct UserService {
    executor: Arc<dyn TrackingStoreExecutor>,
    clock: Arc<dyn Clock>,
}

impl UserService {
    pub fn new(executor: Arc<dyn TrackingStoreExecutor>, clock: Arc<dyn Clock>) -> Self {
        Self { executor, clock }
    }
}

#[async_trait]
impl UserServiceTrait for UserService {
    async fn register_user(&self, new_user: NewUser) -> Result<User> {
        let now = self.clock.now();
        let new_user = NewUser {
            username: new_user.username.trim().to_string(),
            email: new_user.email.trim().to_string(),
        };
        debug!("Registering user {}", new_user.username);

        self.executor
            .write_with(move |store| {
                if store.find_user_by_username(&new_user.username)?.is_some() {
                    return Err(Error::ConstraintViolation(format!(
                        "Username '{}' already exists",
                        new_user.username
                    )));
                }
                store.insert_user(new_user, now)
            })
            .await
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        let user_id = user_id.to_string();
        self.executor.read_with(move |store| {
            store.find_user(&user_id)?.ok_or_else(|| {
                Error::Database(DatabaseError::NotFound(format!("User {}", user_id)))
            })
        })
    }
}

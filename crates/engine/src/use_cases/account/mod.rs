//! Account use cases: registering users and looking them up.

mod error;

pub use error::AccountError;

use std::sync::Arc;

use trpgsheet_domain::{Email, User, UserId, UserName};

use crate::infrastructure::ports::UserRepo;

pub struct AccountUseCases {
    users: Arc<dyn UserRepo>,
}

impl AccountUseCases {
    pub fn new(users: Arc<dyn UserRepo>) -> Self {
        Self { users }
    }

    /// Register a user with an unused email and an initial XP pool.
    pub async fn create_user(
        &self,
        name: &str,
        email: &str,
        starting_xp: u32,
    ) -> Result<User, AccountError> {
        let name = UserName::new(name)?;
        let email = Email::new(email)?;

        if self.users.get_by_email(&email).await?.is_some() {
            return Err(AccountError::EmailTaken(email.to_string()));
        }

        let user = User::new(name, email).with_xp(starting_xp);
        // A concurrent registration can still win the unique index.
        let user = self.users.insert(&user).await.map_err(|e| {
            if e.is_constraint_violation() {
                AccountError::EmailTaken(user.email().to_string())
            } else {
                AccountError::Repo(e)
            }
        })?;

        tracing::info!(user_id = %user.id(), xp = user.xp(), "Created user");
        Ok(user)
    }

    pub async fn get_user(&self, user_id: UserId) -> Result<User, AccountError> {
        self.users
            .get(user_id)
            .await?
            .ok_or(AccountError::UserNotFound(user_id))
    }
}

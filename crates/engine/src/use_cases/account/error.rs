//! Account operation errors.

use crate::infrastructure::ports::RepoError;
use trpgsheet_domain::{DomainError, UserId};

#[derive(Debug, thiserror::Error)]
pub enum AccountError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Email {0} is already registered")]
    EmailTaken(String),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

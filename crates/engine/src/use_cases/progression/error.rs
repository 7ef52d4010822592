//! Progression operation errors.

use uuid::Uuid;

use crate::infrastructure::ports::RepoError;
use trpgsheet_domain::{RuleError, UserId};

#[derive(Debug, thiserror::Error)]
pub enum ProgressionError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    /// Unknown, expired, already confirmed, or owned by another user.
    #[error("Level-up plan not found or expired: {0}")]
    PlanNotFound(Uuid),

    #[error("{0}")]
    Rule(#[from] RuleError),

    /// The store refused the write; nothing was applied.
    #[error("Could not save changes: {0}")]
    CommitFailed(#[source] RepoError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

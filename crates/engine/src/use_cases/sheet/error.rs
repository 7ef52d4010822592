//! Sheet operation errors.

use crate::infrastructure::ports::RepoError;
use trpgsheet_domain::{DomainError, StatisticId, UserId};

#[derive(Debug, thiserror::Error)]
pub enum SheetError {
    #[error("User not found: {0}")]
    UserNotFound(UserId),

    #[error("Statistic not found: {0}")]
    StatisticNotFound(StatisticId),

    #[error("User {0} already has statistics")]
    AlreadyInitialized(UserId),

    #[error("{0}")]
    Domain(#[from] DomainError),

    #[error("Repository error: {0}")]
    Repo(#[from] RepoError),
}

//! Repository port traits for sheet storage.

use std::collections::HashSet;

use async_trait::async_trait;
use trpgsheet_domain::{
    Email, SheetChanges, Skill, SkillId, SkillPatch, Statistic, StatisticId, StatisticPatch, User,
    UserId,
};

use super::error::RepoError;

// =============================================================================
// Database Ports (one per table)
// =============================================================================

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepo: Send + Sync {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError>;
    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepoError>;
    /// Fails with `ConstraintViolation` when the email is already registered.
    async fn insert(&self, user: &User) -> Result<User, RepoError>;
    async fn set_xp(&self, id: UserId, xp: u32) -> Result<User, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StatisticRepo: Send + Sync {
    async fn get(&self, id: StatisticId) -> Result<Option<Statistic>, RepoError>;
    /// Statistics in creation order.
    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Statistic>, RepoError>;
    async fn insert(&self, statistic: &Statistic) -> Result<(), RepoError>;
    async fn update(&self, id: StatisticId, patch: &StatisticPatch)
        -> Result<Statistic, RepoError>;
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SkillRepo: Send + Sync {
    async fn get(&self, id: SkillId) -> Result<Option<Skill>, RepoError>;
    /// Skills of any of `statistic_ids`, in creation order.
    async fn list_for_statistics(
        &self,
        statistic_ids: &HashSet<StatisticId>,
    ) -> Result<Vec<Skill>, RepoError>;
    async fn insert(&self, skill: &Skill) -> Result<(), RepoError>;
    /// `total` is recomputed from the resulting `base + level + bonus`.
    async fn update(&self, id: SkillId, patch: &SkillPatch) -> Result<Skill, RepoError>;
}

// =============================================================================
// Unit of work
// =============================================================================

/// Multi-row writes that must land together.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SheetCommitRepo: Send + Sync {
    /// Apply every patch in `changes` and the new XP balance, or nothing.
    ///
    /// A patch that names a missing row fails the whole commit.
    async fn commit(&self, user_id: UserId, changes: &SheetChanges) -> Result<(), RepoError>;

    /// Insert statistics with their skills, or nothing.
    async fn seed(&self, entries: &[(Statistic, Vec<Skill>)]) -> Result<(), RepoError>;
}

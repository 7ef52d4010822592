//! Sheet assembly from the three tables.

use std::collections::HashSet;
use std::sync::Arc;

use trpgsheet_domain::{CharacterSheet, Statistic, User, UserId};

use crate::infrastructure::ports::{RepoError, SkillRepo, StatisticRepo, UserRepo};

/// Reads a user's sheet: the user, their statistics, then the skills of
/// those statistics.
#[derive(Clone)]
pub struct SheetLoader {
    users: Arc<dyn UserRepo>,
    statistics: Arc<dyn StatisticRepo>,
    skills: Arc<dyn SkillRepo>,
}

impl SheetLoader {
    pub fn new(
        users: Arc<dyn UserRepo>,
        statistics: Arc<dyn StatisticRepo>,
        skills: Arc<dyn SkillRepo>,
    ) -> Self {
        Self {
            users,
            statistics,
            skills,
        }
    }

    pub async fn user(&self, user_id: UserId) -> Result<Option<User>, RepoError> {
        self.users.get(user_id).await
    }

    /// `None` when the user does not exist.
    pub async fn load(&self, user_id: UserId) -> Result<Option<CharacterSheet>, RepoError> {
        let Some(user) = self.users.get(user_id).await? else {
            return Ok(None);
        };
        let statistics = self.statistics.list_for_user(user_id).await?;
        let ids: HashSet<_> = statistics.iter().map(Statistic::id).collect();
        let skills = self.skills.list_for_statistics(&ids).await?;
        Ok(Some(CharacterSheet::assemble(user, statistics, skills)))
    }
}

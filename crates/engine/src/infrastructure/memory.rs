//! In-memory sheet storage.
//!
//! All three tables sit behind a single `RwLock`, so a commit that checks
//! every referenced row before writing is atomic with respect to every other
//! reader and writer.

use std::collections::HashSet;

use async_trait::async_trait;
use tokio::sync::RwLock;
use trpgsheet_domain::{
    Email, SheetChanges, Skill, SkillId, SkillPatch, Statistic, StatisticId, StatisticPatch, User,
    UserId,
};

use crate::infrastructure::ports::{
    RepoError, SheetCommitRepo, SkillRepo, StatisticRepo, UserRepo,
};

#[derive(Default)]
struct Tables {
    users: Vec<User>,
    statistics: Vec<Statistic>,
    skills: Vec<Skill>,
}

impl Tables {
    fn user_mut(&mut self, id: UserId) -> Result<&mut User, RepoError> {
        self.users
            .iter_mut()
            .find(|user| user.id() == id)
            .ok_or_else(|| RepoError::not_found("User", id))
    }

    fn statistic_mut(&mut self, id: StatisticId) -> Result<&mut Statistic, RepoError> {
        self.statistics
            .iter_mut()
            .find(|statistic| statistic.id() == id)
            .ok_or_else(|| RepoError::not_found("Statistic", id))
    }

    fn skill_mut(&mut self, id: SkillId) -> Result<&mut Skill, RepoError> {
        self.skills
            .iter_mut()
            .find(|skill| skill.id() == id)
            .ok_or_else(|| RepoError::not_found("Skill", id))
    }

    fn has_user(&self, id: UserId) -> bool {
        self.users.iter().any(|user| user.id() == id)
    }

    fn has_statistic(&self, id: StatisticId) -> bool {
        self.statistics.iter().any(|statistic| statistic.id() == id)
    }

    fn has_skill(&self, id: SkillId) -> bool {
        self.skills.iter().any(|skill| skill.id() == id)
    }

    fn set_xp(&mut self, id: UserId, xp: u32) -> Result<User, RepoError> {
        let user = self.user_mut(id)?;
        *user = user.clone().with_xp(xp);
        Ok(user.clone())
    }
}

/// Process-local store used by tests and `STORAGE=memory`.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepo for InMemoryStore {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.users.iter().find(|user| user.id() == id).cloned())
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .users
            .iter()
            .find(|user| user.email() == email)
            .cloned())
    }

    async fn insert(&self, user: &User) -> Result<User, RepoError> {
        let mut tables = self.tables.write().await;
        if tables.users.iter().any(|u| u.email() == user.email()) {
            return Err(RepoError::constraint(format!(
                "email {} is already registered",
                user.email()
            )));
        }
        tables.users.push(user.clone());
        Ok(user.clone())
    }

    async fn set_xp(&self, id: UserId, xp: u32) -> Result<User, RepoError> {
        self.tables.write().await.set_xp(id, xp)
    }
}

#[async_trait]
impl StatisticRepo for InMemoryStore {
    async fn get(&self, id: StatisticId) -> Result<Option<Statistic>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.statistics.iter().find(|s| s.id() == id).cloned())
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Statistic>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .statistics
            .iter()
            .filter(|s| s.user_id() == user_id)
            .cloned()
            .collect())
    }

    async fn insert(&self, statistic: &Statistic) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.has_user(statistic.user_id()) {
            return Err(RepoError::constraint(format!(
                "statistic {} references missing user {}",
                statistic.id(),
                statistic.user_id()
            )));
        }
        tables.statistics.push(statistic.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: StatisticId,
        patch: &StatisticPatch,
    ) -> Result<Statistic, RepoError> {
        let mut tables = self.tables.write().await;
        let statistic = tables.statistic_mut(id)?;
        statistic.apply_patch(patch);
        Ok(statistic.clone())
    }
}

#[async_trait]
impl SkillRepo for InMemoryStore {
    async fn get(&self, id: SkillId) -> Result<Option<Skill>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables.skills.iter().find(|s| s.id() == id).cloned())
    }

    async fn list_for_statistics(
        &self,
        statistic_ids: &HashSet<StatisticId>,
    ) -> Result<Vec<Skill>, RepoError> {
        let tables = self.tables.read().await;
        Ok(tables
            .skills
            .iter()
            .filter(|s| statistic_ids.contains(&s.statistic_id()))
            .cloned()
            .collect())
    }

    async fn insert(&self, skill: &Skill) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if !tables.has_statistic(skill.statistic_id()) {
            return Err(RepoError::constraint(format!(
                "skill {} references missing statistic {}",
                skill.id(),
                skill.statistic_id()
            )));
        }
        tables.skills.push(skill.clone());
        Ok(())
    }

    async fn update(&self, id: SkillId, patch: &SkillPatch) -> Result<Skill, RepoError> {
        let mut tables = self.tables.write().await;
        let skill = tables.skill_mut(id)?;
        skill.apply_patch(patch);
        Ok(skill.clone())
    }
}

#[async_trait]
impl SheetCommitRepo for InMemoryStore {
    async fn commit(&self, user_id: UserId, changes: &SheetChanges) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;

        // Check everything first; nothing below can fail once this passes.
        if !tables.has_user(user_id) {
            return Err(RepoError::not_found("User", user_id));
        }
        if let Some(update) = changes
            .statistics
            .iter()
            .find(|update| !tables.has_statistic(update.id))
        {
            return Err(RepoError::not_found("Statistic", update.id));
        }
        if let Some(update) = changes
            .skills
            .iter()
            .find(|update| !tables.has_skill(update.id))
        {
            return Err(RepoError::not_found("Skill", update.id));
        }

        for update in &changes.statistics {
            tables.statistic_mut(update.id)?.apply_patch(&update.patch);
        }
        for update in &changes.skills {
            tables.skill_mut(update.id)?.apply_patch(&update.patch);
        }
        if let Some(xp) = changes.user_xp {
            tables.set_xp(user_id, xp)?;
        }
        Ok(())
    }

    async fn seed(&self, entries: &[(Statistic, Vec<Skill>)]) -> Result<(), RepoError> {
        let mut tables = self.tables.write().await;
        if let Some((statistic, _)) = entries
            .iter()
            .find(|(statistic, _)| !tables.has_user(statistic.user_id()))
        {
            return Err(RepoError::constraint(format!(
                "statistic {} references missing user {}",
                statistic.id(),
                statistic.user_id()
            )));
        }
        if let Some(skill) = entries
            .iter()
            .flat_map(|(statistic, skills)| skills.iter().map(move |skill| (statistic, skill)))
            .find(|(statistic, skill)| skill.statistic_id() != statistic.id())
            .map(|(_, skill)| skill)
        {
            return Err(RepoError::constraint(format!(
                "skill {} is not under statistic {}",
                skill.id(),
                skill.statistic_id()
            )));
        }

        for (statistic, skills) in entries {
            tables.statistics.push(statistic.clone());
            tables.skills.extend(skills.iter().cloned());
        }
        Ok(())
    }
}

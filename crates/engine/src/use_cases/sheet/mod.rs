//! Sheet use cases.
//!
//! Reading a sheet, seeding the default one, and adding statistics and
//! skills to it.

mod error;

pub use error::SheetError;

use std::sync::Arc;

use trpgsheet_domain::{
    default_sheet, CharacterSheet, Description, ShortName, Skill, SkillName, Statistic,
    StatisticId, StatisticName, UserId, DEFAULT_COST_PER_LEVEL,
};

use super::loader::SheetLoader;
use crate::infrastructure::ports::{SheetCommitRepo, SkillRepo, StatisticRepo};
use crate::stores::UserLocks;

/// Fields of a statistic to create.
#[derive(Debug, Clone)]
pub struct NewStatistic {
    pub name: String,
    pub short_name: String,
    pub description: String,
}

/// Fields of a skill to create. `cost_per_level` defaults to 1.
#[derive(Debug, Clone)]
pub struct NewSkill {
    pub name: String,
    pub cost_per_level: Option<u32>,
}

/// Container for sheet use cases.
pub struct SheetUseCases {
    loader: SheetLoader,
    statistics: Arc<dyn StatisticRepo>,
    skills: Arc<dyn SkillRepo>,
    commits: Arc<dyn SheetCommitRepo>,
    locks: Arc<UserLocks>,
}

impl SheetUseCases {
    pub fn new(
        loader: SheetLoader,
        statistics: Arc<dyn StatisticRepo>,
        skills: Arc<dyn SkillRepo>,
        commits: Arc<dyn SheetCommitRepo>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            loader,
            statistics,
            skills,
            commits,
            locks,
        }
    }

    /// The user's statistics, each with its skills.
    pub async fn get_sheet(&self, user_id: UserId) -> Result<CharacterSheet, SheetError> {
        self.loader
            .load(user_id)
            .await?
            .ok_or(SheetError::UserNotFound(user_id))
    }

    /// Give a user with no statistics the default sheet.
    pub async fn initialize_defaults(
        &self,
        user_id: UserId,
    ) -> Result<CharacterSheet, SheetError> {
        let _guard = self.locks.lock(user_id).await;

        let sheet = self.get_sheet(user_id).await?;
        if !sheet.statistics().is_empty() {
            return Err(SheetError::AlreadyInitialized(user_id));
        }

        let entries = default_sheet(user_id)?;
        self.commits.seed(&entries).await?;
        tracing::info!(
            user_id = %user_id,
            statistics = entries.len(),
            "Seeded default sheet"
        );

        self.get_sheet(user_id).await
    }

    pub async fn create_statistic(
        &self,
        user_id: UserId,
        input: NewStatistic,
    ) -> Result<Statistic, SheetError> {
        let statistic = Statistic::new(
            user_id,
            StatisticName::new(input.name)?,
            ShortName::new(input.short_name)?,
            Description::new(input.description)?,
        );

        let _guard = self.locks.lock(user_id).await;
        if self.loader.user(user_id).await?.is_none() {
            return Err(SheetError::UserNotFound(user_id));
        }
        self.statistics.insert(&statistic).await?;

        tracing::info!(
            user_id = %user_id,
            statistic_id = %statistic.id(),
            slug = %statistic.slug(),
            "Created statistic"
        );
        Ok(statistic)
    }

    /// Add a level-0 skill under one of the user's statistics.
    pub async fn create_skill(
        &self,
        user_id: UserId,
        statistic_id: StatisticId,
        input: NewSkill,
    ) -> Result<Skill, SheetError> {
        let name = SkillName::new(input.name)?;
        let cost_per_level = input.cost_per_level.unwrap_or(DEFAULT_COST_PER_LEVEL);

        let _guard = self.locks.lock(user_id).await;
        let statistic = self
            .statistics
            .get(statistic_id)
            .await?
            .filter(|statistic| statistic.user_id() == user_id)
            .ok_or(SheetError::StatisticNotFound(statistic_id))?;

        let skill = Skill::new(statistic.id(), name, cost_per_level)?;
        self.skills.insert(&skill).await?;

        tracing::info!(
            user_id = %user_id,
            statistic_id = %statistic_id,
            skill_id = %skill.id(),
            cost_per_level,
            "Created skill"
        );
        Ok(skill)
    }
}

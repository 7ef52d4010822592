//! Transactional multi-row writes.

use async_trait::async_trait;
use sqlx::SqlitePool;
use trpgsheet_domain::{SheetChanges, Skill, Statistic, UserId};

use super::{skill_repo, statistic_repo, user_repo};
use crate::infrastructure::ports::{RepoError, SheetCommitRepo};

pub struct SqliteSheetCommit {
    pool: SqlitePool,
}

impl SqliteSheetCommit {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SheetCommitRepo for SqliteSheetCommit {
    async fn commit(&self, user_id: UserId, changes: &SheetChanges) -> Result<(), RepoError> {
        // Dropping `tx` on any early return rolls everything back.
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("sheet.commit", e))?;

        for update in &changes.statistics {
            statistic_repo::update(&mut tx, update.id, &update.patch).await?;
        }
        for update in &changes.skills {
            skill_repo::update(&mut tx, update.id, &update.patch).await?;
        }
        if let Some(xp) = changes.user_xp {
            user_repo::set_xp(&mut tx, user_id, xp).await?;
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("sheet.commit", e))
    }

    async fn seed(&self, entries: &[(Statistic, Vec<Skill>)]) -> Result<(), RepoError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| RepoError::database("sheet.seed", e))?;

        for (statistic, skills) in entries {
            statistic_repo::insert(&mut tx, statistic).await?;
            for skill in skills {
                skill_repo::insert(&mut tx, skill).await?;
            }
        }

        tx.commit()
            .await
            .map_err(|e| RepoError::database("sheet.seed", e))
    }
}

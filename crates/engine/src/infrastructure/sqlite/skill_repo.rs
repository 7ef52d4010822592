//! SQLite skill repository.

use std::collections::HashSet;

use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use trpgsheet_domain::{Skill, SkillId, SkillPatch, StatisticId};

use super::rows::{skill_from_row, to_db_int, write_error, SKILL_COLUMNS};
use crate::infrastructure::ports::{RepoError, SkillRepo};

pub struct SqliteSkillRepo {
    pool: SqlitePool,
}

impl SqliteSkillRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) async fn insert(conn: &mut SqliteConnection, skill: &Skill) -> Result<(), RepoError> {
    let total = i64::try_from(skill.total())
        .map_err(|_| RepoError::serialization(format!("skill {} total is too large", skill.id())))?;
    sqlx::query(
        r#"
        INSERT INTO skills (id, statistic_id, name, cost_per_level, level, base, bonus, total, slug)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(skill.id().to_string())
    .bind(skill.statistic_id().to_string())
    .bind(skill.name().as_str())
    .bind(to_db_int(skill.cost_per_level()))
    .bind(to_db_int(skill.level()))
    .bind(to_db_int(skill.base()))
    .bind(to_db_int(skill.bonus()))
    .bind(total)
    .bind(skill.slug().as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error("skills.insert", e))?;
    Ok(())
}

/// Patch a skill and recompute `total` from the patched columns.
///
/// SQLite evaluates every right-hand side against the old row, so the
/// `COALESCE`s in `total` see the same values the other assignments write.
pub(super) async fn update(
    conn: &mut SqliteConnection,
    id: SkillId,
    patch: &SkillPatch,
) -> Result<Skill, RepoError> {
    let row = sqlx::query(&format!(
        r#"
        UPDATE skills SET
            level = COALESCE(?1, level),
            base = COALESCE(?2, base),
            bonus = COALESCE(?3, bonus),
            total = COALESCE(?2, base) + COALESCE(?1, level) + COALESCE(?3, bonus)
        WHERE id = ?4
        RETURNING {SKILL_COLUMNS}
        "#
    ))
    .bind(patch.level.map(to_db_int))
    .bind(patch.base.map(to_db_int))
    .bind(patch.bonus.map(to_db_int))
    .bind(id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| write_error("skills.update", e))?
    .ok_or_else(|| RepoError::not_found("Skill", id))?;
    skill_from_row(&row)
}

#[async_trait]
impl SkillRepo for SqliteSkillRepo {
    async fn get(&self, id: SkillId) -> Result<Option<Skill>, RepoError> {
        let row = sqlx::query(&format!("SELECT {SKILL_COLUMNS} FROM skills WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("skills.get", e))?;
        row.as_ref().map(skill_from_row).transpose()
    }

    async fn list_for_statistics(
        &self,
        statistic_ids: &HashSet<StatisticId>,
    ) -> Result<Vec<Skill>, RepoError> {
        if statistic_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {SKILL_COLUMNS} FROM skills WHERE statistic_id IN ("
        ));
        let mut ids = query.separated(", ");
        for id in statistic_ids {
            ids.push_bind(id.to_string());
        }
        ids.push_unseparated(") ORDER BY rowid");

        let rows = query
            .build()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| RepoError::database("skills.list_for_statistics", e))?;
        rows.iter().map(skill_from_row).collect()
    }

    async fn insert(&self, skill: &Skill) -> Result<(), RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("skills.insert", e))?;
        insert(&mut conn, skill).await
    }

    async fn update(&self, id: SkillId, patch: &SkillPatch) -> Result<Skill, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("skills.update", e))?;
        update(&mut conn, id, patch).await
    }
}

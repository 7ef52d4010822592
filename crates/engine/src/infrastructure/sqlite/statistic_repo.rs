//! SQLite statistic repository.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use trpgsheet_domain::{Statistic, StatisticId, StatisticPatch, UserId};

use super::rows::{statistic_from_row, to_db_int, write_error, STATISTIC_COLUMNS};
use crate::infrastructure::ports::{RepoError, StatisticRepo};

pub struct SqliteStatisticRepo {
    pool: SqlitePool,
}

impl SqliteStatisticRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) async fn insert(
    conn: &mut SqliteConnection,
    statistic: &Statistic,
) -> Result<(), RepoError> {
    sqlx::query(
        r#"
        INSERT INTO statistics (id, user_id, name, short_name, description, level, slug)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(statistic.id().to_string())
    .bind(statistic.user_id().to_string())
    .bind(statistic.name().as_str())
    .bind(statistic.short_name().as_str())
    .bind(statistic.description().as_str())
    .bind(to_db_int(statistic.level()))
    .bind(statistic.slug().as_str())
    .execute(&mut *conn)
    .await
    .map_err(|e| write_error("statistics.insert", e))?;
    Ok(())
}

pub(super) async fn update(
    conn: &mut SqliteConnection,
    id: StatisticId,
    patch: &StatisticPatch,
) -> Result<Statistic, RepoError> {
    let row = sqlx::query(&format!(
        "UPDATE statistics SET level = COALESCE(?, level) WHERE id = ? RETURNING {STATISTIC_COLUMNS}"
    ))
    .bind(patch.level.map(to_db_int))
    .bind(id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| write_error("statistics.update", e))?
    .ok_or_else(|| RepoError::not_found("Statistic", id))?;
    statistic_from_row(&row)
}

#[async_trait]
impl StatisticRepo for SqliteStatisticRepo {
    async fn get(&self, id: StatisticId) -> Result<Option<Statistic>, RepoError> {
        let row = sqlx::query(&format!(
            "SELECT {STATISTIC_COLUMNS} FROM statistics WHERE id = ?"
        ))
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepoError::database("statistics.get", e))?;
        row.as_ref().map(statistic_from_row).transpose()
    }

    async fn list_for_user(&self, user_id: UserId) -> Result<Vec<Statistic>, RepoError> {
        let rows = sqlx::query(&format!(
            "SELECT {STATISTIC_COLUMNS} FROM statistics WHERE user_id = ? ORDER BY rowid"
        ))
        .bind(user_id.to_string())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepoError::database("statistics.list_for_user", e))?;
        rows.iter().map(statistic_from_row).collect()
    }

    async fn insert(&self, statistic: &Statistic) -> Result<(), RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("statistics.insert", e))?;
        insert(&mut conn, statistic).await
    }

    async fn update(
        &self,
        id: StatisticId,
        patch: &StatisticPatch,
    ) -> Result<Statistic, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("statistics.update", e))?;
        update(&mut conn, id, patch).await
    }
}

#[cfg(test)]
mod tests {
    use super::super::SqliteRepositories;
    use super::*;
    use crate::infrastructure::ports::UserRepo;
    use trpgsheet_domain::{Description, Email, ShortName, StatisticName, User, UserName};

    async fn repos_with_user() -> (SqliteRepositories, User) {
        let repos = SqliteRepositories::in_memory().await.unwrap();
        let user = User::new(
            UserName::new("Triss").unwrap(),
            Email::new("triss@maribor.net").unwrap(),
        );
        repos.users.insert(&user).await.unwrap();
        (repos, user)
    }

    fn statistic(user_id: UserId, name: &str, short: &str) -> Statistic {
        Statistic::new(
            user_id,
            StatisticName::new(name).unwrap(),
            ShortName::new(short).unwrap(),
            Description::new("For casting.").unwrap(),
        )
    }

    #[tokio::test]
    async fn lists_in_creation_order() {
        let (repos, user) = repos_with_user().await;
        let will = statistic(user.id(), "Will", "WILL");
        let craft = statistic(user.id(), "Craft", "CRA");
        repos.statistics.insert(&will).await.unwrap();
        repos.statistics.insert(&craft).await.unwrap();

        let listed = repos.statistics.list_for_user(user.id()).await.unwrap();
        assert_eq!(listed, vec![will, craft]);
    }

    #[tokio::test]
    async fn insert_for_missing_user_violates_foreign_key() {
        let (repos, _) = repos_with_user().await;
        let orphan = statistic(UserId::new(), "Luck", "LUCK");
        let err = repos.statistics.insert(&orphan).await.unwrap_err();
        assert!(err.is_constraint_violation(), "got {err:?}");
    }

    #[tokio::test]
    async fn empty_patch_keeps_level() {
        let (repos, user) = repos_with_user().await;
        let will = statistic(user.id(), "Will", "WILL");
        repos.statistics.insert(&will).await.unwrap();

        let raised = repos
            .statistics
            .update(will.id(), &StatisticPatch { level: Some(4) })
            .await
            .unwrap();
        assert_eq!(raised.level(), 4);

        let untouched = repos
            .statistics
            .update(will.id(), &StatisticPatch::default())
            .await
            .unwrap();
        assert_eq!(untouched.level(), 4);
    }
}

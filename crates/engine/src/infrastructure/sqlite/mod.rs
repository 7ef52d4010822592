//! SQLite sheet storage.
//!
//! One pool shared by four repos. Single-row operations run on a pooled
//! connection; [`SqliteSheetCommit`] runs multi-row writes in one transaction
//! using the same statement helpers.

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;

use crate::infrastructure::ports::RepoError;

mod rows;
mod sheet_commit;
mod skill_repo;
mod statistic_repo;
mod user_repo;

pub use sheet_commit::SqliteSheetCommit;
pub use skill_repo::SqliteSkillRepo;
pub use statistic_repo::SqliteStatisticRepo;
pub use user_repo::SqliteUserRepo;

const SCHEMA: &[&str] = &[
    r#"
    CREATE TABLE IF NOT EXISTS users (
        id TEXT PRIMARY KEY NOT NULL,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        xp INTEGER NOT NULL DEFAULT 0 CHECK (xp >= 0)
    )
    "#,
    r#"
    CREATE TABLE IF NOT EXISTS statistics (
        id TEXT PRIMARY KEY NOT NULL,
        user_id TEXT NOT NULL REFERENCES users(id),
        name TEXT NOT NULL,
        short_name TEXT NOT NULL,
        description TEXT NOT NULL DEFAULT '',
        level INTEGER NOT NULL DEFAULT 0 CHECK (level >= 0),
        slug TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS statistics_user_id ON statistics(user_id)",
    r#"
    CREATE TABLE IF NOT EXISTS skills (
        id TEXT PRIMARY KEY NOT NULL,
        statistic_id TEXT NOT NULL REFERENCES statistics(id),
        name TEXT NOT NULL,
        cost_per_level INTEGER NOT NULL DEFAULT 1 CHECK (cost_per_level >= 1),
        level INTEGER NOT NULL DEFAULT 0 CHECK (level >= 0),
        base INTEGER NOT NULL DEFAULT 0 CHECK (base >= 0),
        bonus INTEGER NOT NULL DEFAULT 0 CHECK (bonus >= 0),
        total INTEGER NOT NULL DEFAULT 0,
        slug TEXT NOT NULL
    )
    "#,
    "CREATE INDEX IF NOT EXISTS skills_statistic_id ON skills(statistic_id)",
];

/// Create the sheet tables if they are missing.
pub async fn ensure_schema(pool: &SqlitePool) -> Result<(), RepoError> {
    for statement in SCHEMA {
        sqlx::query(statement)
            .execute(pool)
            .await
            .map_err(|e| RepoError::database("schema", e))?;
    }
    Ok(())
}

/// Create all SQLite repositories from one pool.
pub struct SqliteRepositories {
    pub users: Arc<SqliteUserRepo>,
    pub statistics: Arc<SqliteStatisticRepo>,
    pub skills: Arc<SqliteSkillRepo>,
    pub commits: Arc<SqliteSheetCommit>,
}

impl SqliteRepositories {
    /// Open (or create) the database file at `db_path`.
    pub async fn open(db_path: &str) -> Result<Self, RepoError> {
        let pool = SqlitePool::connect(&format!("sqlite:{}?mode=rwc", db_path))
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::from_pool(pool).await
    }

    /// A private in-memory database.
    ///
    /// Every connection to `sqlite::memory:` is a separate database, so the
    /// pool is pinned to one connection that never expires.
    pub async fn in_memory() -> Result<Self, RepoError> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .map_err(|e| RepoError::database("connect", e))?;
        Self::from_pool(pool).await
    }

    async fn from_pool(pool: SqlitePool) -> Result<Self, RepoError> {
        ensure_schema(&pool).await?;
        Ok(Self {
            users: Arc::new(SqliteUserRepo::new(pool.clone())),
            statistics: Arc::new(SqliteStatisticRepo::new(pool.clone())),
            skills: Arc::new(SqliteSkillRepo::new(pool.clone())),
            commits: Arc::new(SqliteSheetCommit::new(pool)),
        })
    }
}

//! SQLite user repository.

use async_trait::async_trait;
use sqlx::{SqliteConnection, SqlitePool};
use trpgsheet_domain::{Email, User, UserId};

use super::rows::{to_db_int, user_from_row, write_error, USER_COLUMNS};
use crate::infrastructure::ports::{RepoError, UserRepo};

pub struct SqliteUserRepo {
    pool: SqlitePool,
}

impl SqliteUserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

pub(super) async fn set_xp(
    conn: &mut SqliteConnection,
    id: UserId,
    xp: u32,
) -> Result<User, RepoError> {
    let row = sqlx::query(&format!(
        "UPDATE users SET xp = ? WHERE id = ? RETURNING {USER_COLUMNS}"
    ))
    .bind(to_db_int(xp))
    .bind(id.to_string())
    .fetch_optional(&mut *conn)
    .await
    .map_err(|e| write_error("users.set_xp", e))?
    .ok_or_else(|| RepoError::not_found("User", id))?;
    user_from_row(&row)
}

#[async_trait]
impl UserRepo for SqliteUserRepo {
    async fn get(&self, id: UserId) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?"))
            .bind(id.to_string())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.get", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn get_by_email(&self, email: &Email) -> Result<Option<User>, RepoError> {
        let row = sqlx::query(&format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?"))
            .bind(email.as_str())
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| RepoError::database("users.get_by_email", e))?;
        row.as_ref().map(user_from_row).transpose()
    }

    async fn insert(&self, user: &User) -> Result<User, RepoError> {
        sqlx::query("INSERT INTO users (id, name, email, xp) VALUES (?, ?, ?, ?)")
            .bind(user.id().to_string())
            .bind(user.name().as_str())
            .bind(user.email().as_str())
            .bind(to_db_int(user.xp()))
            .execute(&self.pool)
            .await
            .map_err(|e| write_error("users.insert", e))?;
        Ok(user.clone())
    }

    async fn set_xp(&self, id: UserId, xp: u32) -> Result<User, RepoError> {
        let mut conn = self
            .pool
            .acquire()
            .await
            .map_err(|e| RepoError::database("users.set_xp", e))?;
        set_xp(&mut conn, id, xp).await
    }
}

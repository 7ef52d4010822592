//! Column conversions shared by the SQLite repos.

use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use trpgsheet_domain::{
    Description, DomainError, Email, ShortName, Skill, SkillId, SkillName, Statistic, StatisticId,
    StatisticName, User, UserId, UserName,
};
use uuid::Uuid;

use crate::infrastructure::ports::RepoError;

pub(super) const USER_COLUMNS: &str = "id, name, email, xp";
pub(super) const STATISTIC_COLUMNS: &str = "id, user_id, name, short_name, description, level";
pub(super) const SKILL_COLUMNS: &str =
    "id, statistic_id, name, cost_per_level, level, base, bonus";

/// Map a write failure, keeping constraint violations distinguishable.
pub(super) fn write_error(operation: &'static str, e: sqlx::Error) -> RepoError {
    match &e {
        sqlx::Error::Database(db)
            if db.is_unique_violation()
                || db.is_foreign_key_violation()
                || db.is_check_violation() =>
        {
            RepoError::constraint(format!("{operation}: {}", db.message()))
        }
        _ => RepoError::database(operation, e),
    }
}

pub(super) fn to_db_int(value: u32) -> i64 {
    i64::from(value)
}

fn text(row: &SqliteRow, column: &'static str) -> Result<String, RepoError> {
    row.try_get(column)
        .map_err(|e| RepoError::serialization(format!("column {column}: {e}")))
}

fn uuid(row: &SqliteRow, column: &'static str) -> Result<Uuid, RepoError> {
    let raw = text(row, column)?;
    Uuid::parse_str(&raw).map_err(|e| RepoError::serialization(format!("column {column}: {e}")))
}

fn count(row: &SqliteRow, column: &'static str) -> Result<u32, RepoError> {
    let raw: i64 = row
        .try_get(column)
        .map_err(|e| RepoError::serialization(format!("column {column}: {e}")))?;
    u32::try_from(raw)
        .map_err(|_| RepoError::serialization(format!("column {column}: {raw} is out of range")))
}

fn invalid(e: DomainError) -> RepoError {
    RepoError::serialization(format!("stored row is invalid: {e}"))
}

pub(super) fn user_from_row(row: &SqliteRow) -> Result<User, RepoError> {
    Ok(User::restore(
        UserId::from_uuid(uuid(row, "id")?),
        UserName::new(text(row, "name")?).map_err(invalid)?,
        Email::new(text(row, "email")?).map_err(invalid)?,
        count(row, "xp")?,
    ))
}

pub(super) fn statistic_from_row(row: &SqliteRow) -> Result<Statistic, RepoError> {
    Ok(Statistic::restore(
        StatisticId::from_uuid(uuid(row, "id")?),
        UserId::from_uuid(uuid(row, "user_id")?),
        StatisticName::new(text(row, "name")?).map_err(invalid)?,
        ShortName::new(text(row, "short_name")?).map_err(invalid)?,
        Description::new(text(row, "description")?).map_err(invalid)?,
        count(row, "level")?,
    ))
}

pub(super) fn skill_from_row(row: &SqliteRow) -> Result<Skill, RepoError> {
    Skill::restore(
        SkillId::from_uuid(uuid(row, "id")?),
        StatisticId::from_uuid(uuid(row, "statistic_id")?),
        SkillName::new(text(row, "name")?).map_err(invalid)?,
        count(row, "cost_per_level")?,
        count(row, "level")?,
        count(row, "base")?,
        count(row, "bonus")?,
    )
    .map_err(invalid)
}

//! HTTP routes.

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{delete, get, post},
    Json, Router,
};
use serde::Deserialize;
use std::sync::Arc;
use trpgsheet_domain::{
    CharacterSheet, FieldEdit, LevelUpTarget, RuleError, Skill, Statistic, StatisticId, User,
    UserId,
};
use uuid::Uuid;

use crate::app::App;
use crate::stores::PendingLevelUp;
use crate::use_cases::{
    AccountError, LevelUpOutcome, NewSkill, NewStatistic, ProgressionError, ResetResult,
    SheetError,
};

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(health))
        .route("/api/health", get(health))
        .route("/api/users", post(create_user))
        .route("/api/users/{user_id}", get(get_user))
        .route("/api/users/{user_id}/xp", post(grant_xp))
        .route("/api/users/{user_id}/sheet", get(get_sheet))
        .route(
            "/api/users/{user_id}/sheet/defaults",
            post(initialize_defaults),
        )
        .route("/api/users/{user_id}/statistics", post(create_statistic))
        .route(
            "/api/users/{user_id}/statistics/{statistic_id}/skills",
            post(create_skill),
        )
        .route("/api/users/{user_id}/level-ups", post(plan_level_up))
        .route(
            "/api/users/{user_id}/level-ups/{plan_id}/confirm",
            post(confirm_level_up),
        )
        .route(
            "/api/users/{user_id}/level-ups/{plan_id}",
            delete(cancel_level_up),
        )
        .route("/api/users/{user_id}/edits", post(apply_field_edit))
        .route("/api/users/{user_id}/skills/reset", post(reset_all_skills))
}

async fn health() -> &'static str {
    "OK"
}

// =============================================================================
// Users
// =============================================================================

#[derive(Debug, Deserialize)]
struct CreateUserRequest {
    name: String,
    email: String,
    #[serde(default)]
    xp: u32,
}

async fn create_user(
    State(app): State<Arc<App>>,
    Json(body): Json<CreateUserRequest>,
) -> Result<(StatusCode, Json<User>), ApiError> {
    let user = app
        .use_cases
        .account
        .create_user(&body.name, &body.email, body.xp)
        .await?;
    Ok((StatusCode::CREATED, Json(user)))
}

async fn get_user(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<User>, ApiError> {
    let user = app
        .use_cases
        .account
        .get_user(UserId::from_uuid(user_id))
        .await?;
    Ok(Json(user))
}

#[derive(Debug, Deserialize)]
struct GrantXpRequest {
    amount: u32,
}

async fn grant_xp(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<GrantXpRequest>,
) -> Result<Json<User>, ApiError> {
    let user = app
        .use_cases
        .progression
        .grant_xp(UserId::from_uuid(user_id), body.amount)
        .await?;
    Ok(Json(user))
}

// =============================================================================
// Sheet
// =============================================================================

async fn get_sheet(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<CharacterSheet>, ApiError> {
    let sheet = app
        .use_cases
        .sheet
        .get_sheet(UserId::from_uuid(user_id))
        .await?;
    Ok(Json(sheet))
}

async fn initialize_defaults(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<(StatusCode, Json<CharacterSheet>), ApiError> {
    let sheet = app
        .use_cases
        .sheet
        .initialize_defaults(UserId::from_uuid(user_id))
        .await?;
    Ok((StatusCode::CREATED, Json(sheet)))
}

#[derive(Debug, Deserialize)]
struct CreateStatisticRequest {
    name: String,
    short_name: String,
    #[serde(default)]
    description: String,
}

async fn create_statistic(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(body): Json<CreateStatisticRequest>,
) -> Result<(StatusCode, Json<Statistic>), ApiError> {
    let statistic = app
        .use_cases
        .sheet
        .create_statistic(
            UserId::from_uuid(user_id),
            NewStatistic {
                name: body.name,
                short_name: body.short_name,
                description: body.description,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(statistic)))
}

#[derive(Debug, Deserialize)]
struct CreateSkillRequest {
    name: String,
    #[serde(default)]
    cost_per_level: Option<u32>,
}

async fn create_skill(
    State(app): State<Arc<App>>,
    Path((user_id, statistic_id)): Path<(Uuid, Uuid)>,
    Json(body): Json<CreateSkillRequest>,
) -> Result<(StatusCode, Json<Skill>), ApiError> {
    let skill = app
        .use_cases
        .sheet
        .create_skill(
            UserId::from_uuid(user_id),
            StatisticId::from_uuid(statistic_id),
            NewSkill {
                name: body.name,
                cost_per_level: body.cost_per_level,
            },
        )
        .await?;
    Ok((StatusCode::CREATED, Json(skill)))
}

// =============================================================================
// Progression
// =============================================================================

async fn plan_level_up(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(target): Json<LevelUpTarget>,
) -> Result<Json<PendingLevelUp>, ApiError> {
    let pending = app
        .use_cases
        .progression
        .plan_level_up(UserId::from_uuid(user_id), target)
        .await?;
    Ok(Json(pending))
}

async fn confirm_level_up(
    State(app): State<Arc<App>>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<LevelUpOutcome>, ApiError> {
    let outcome = app
        .use_cases
        .progression
        .confirm_level_up(UserId::from_uuid(user_id), plan_id)
        .await?;
    Ok(Json(outcome))
}

async fn cancel_level_up(
    State(app): State<Arc<App>>,
    Path((user_id, plan_id)): Path<(Uuid, Uuid)>,
) -> Result<StatusCode, ApiError> {
    app.use_cases
        .progression
        .cancel_level_up(UserId::from_uuid(user_id), plan_id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

async fn apply_field_edit(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
    Json(edit): Json<FieldEdit>,
) -> Result<Json<CharacterSheet>, ApiError> {
    let sheet = app
        .use_cases
        .progression
        .apply_field_edit(UserId::from_uuid(user_id), edit)
        .await?;
    Ok(Json(sheet))
}

async fn reset_all_skills(
    State(app): State<Arc<App>>,
    Path(user_id): Path<Uuid>,
) -> Result<Json<ResetResult>, ApiError> {
    let result = app
        .use_cases
        .progression
        .reset_all_skills(UserId::from_uuid(user_id))
        .await?;
    Ok(Json(result))
}

// =============================================================================
// Errors
// =============================================================================

/// Plain-text error responses.
#[derive(Debug)]
pub enum ApiError {
    NotFound(String),
    BadRequest(String),
    /// Well-formed but refused by validation or the progression rules.
    Unprocessable(String),
    /// Clashes with current state: duplicate, stale, already done.
    Conflict(String),
    /// The store failed while writing; nothing was applied.
    CommitFailed(String),
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg).into_response(),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg).into_response(),
            ApiError::Unprocessable(msg) => {
                (StatusCode::UNPROCESSABLE_ENTITY, msg).into_response()
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg).into_response(),
            ApiError::CommitFailed(detail) => {
                tracing::error!(error = %detail, "Commit failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Could not save changes; nothing was applied",
                )
                    .into_response()
            }
            ApiError::Internal(detail) => {
                tracing::error!(error = %detail, "Request failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "Internal error").into_response()
            }
        }
    }
}

impl From<crate::infrastructure::ports::RepoError> for ApiError {
    fn from(e: crate::infrastructure::ports::RepoError) -> Self {
        ApiError::Internal(e.to_string())
    }
}

impl From<AccountError> for ApiError {
    fn from(e: AccountError) -> Self {
        match e {
            AccountError::UserNotFound(_) => ApiError::NotFound(e.to_string()),
            AccountError::EmailTaken(_) => ApiError::Conflict(e.to_string()),
            AccountError::Domain(_) => ApiError::Unprocessable(e.to_string()),
            AccountError::Repo(e) => e.into(),
        }
    }
}

impl From<SheetError> for ApiError {
    fn from(e: SheetError) -> Self {
        match e {
            SheetError::UserNotFound(_) | SheetError::StatisticNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            SheetError::AlreadyInitialized(_) => ApiError::Conflict(e.to_string()),
            SheetError::Domain(_) => ApiError::Unprocessable(e.to_string()),
            SheetError::Repo(e) => e.into(),
        }
    }
}

impl From<ProgressionError> for ApiError {
    fn from(e: ProgressionError) -> Self {
        match e {
            ProgressionError::UserNotFound(_) | ProgressionError::PlanNotFound(_) => {
                ApiError::NotFound(e.to_string())
            }
            ProgressionError::Rule(ref rule) => match rule {
                RuleError::UnknownStatistic(_) | RuleError::UnknownSkill(_) => {
                    ApiError::NotFound(e.to_string())
                }
                RuleError::StalePlan(_) => ApiError::Conflict(e.to_string()),
                RuleError::Rejected(_) => ApiError::Unprocessable(e.to_string()),
                RuleError::XpOverflow(_) => ApiError::BadRequest(e.to_string()),
            },
            ProgressionError::CommitFailed(e) => ApiError::CommitFailed(e.to_string()),
            ProgressionError::Repo(e) => e.into(),
        }
    }
}

//! Progression rule errors.

use thiserror::Error;

use super::level_up::LevelUpRejection;
use crate::ids::{SkillId, StatisticId};

/// Why a progression operation could not be applied to a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    /// Cap or affordability check failed.
    #[error(transparent)]
    Rejected(#[from] LevelUpRejection),

    /// The sheet moved on since the plan was computed.
    #[error("Level-up plan is out of date: {0}")]
    StalePlan(String),

    #[error("Statistic {0} is not on this sheet")]
    UnknownStatistic(StatisticId),

    #[error("Skill {0} is not on this sheet")]
    UnknownSkill(SkillId),

    #[error("XP balance would overflow: {0}")]
    XpOverflow(String),
}

//! Level-up planning.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::rules::{skill_level_up_cost, statistic_level_up_cost, STATISTIC_MAX_LEVEL};
use crate::entities::{Skill, Statistic};
use crate::ids::{SkillId, StatisticId};

/// An entity that can be levelled with XP.
#[derive(Debug, Clone, Copy)]
pub enum Progressable<'a> {
    Statistic(&'a Statistic),
    Skill(&'a Skill),
}

impl Progressable<'_> {
    pub fn level(&self) -> u32 {
        match self {
            Self::Statistic(statistic) => statistic.level(),
            Self::Skill(skill) => skill.level(),
        }
    }

    pub fn target(&self) -> LevelUpTarget {
        match self {
            Self::Statistic(statistic) => LevelUpTarget::Statistic(statistic.id()),
            Self::Skill(skill) => LevelUpTarget::Skill(skill.id()),
        }
    }
}

/// Which entity a level-up applies to.
///
/// Serialized as `{"kind": "statistic", "id": "<uuid>"}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "id", rename_all = "snake_case")]
pub enum LevelUpTarget {
    Statistic(StatisticId),
    Skill(SkillId),
}

/// A priced, validated level-up that has not been applied yet.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUpPlan {
    pub target: LevelUpTarget,
    pub current_level: u32,
    pub new_level: u32,
    pub cost: u64,
    pub available_xp: u32,
    pub final_xp: u32,
}

/// A level-up that the rules do not allow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "reason", rename_all = "snake_case")]
pub enum LevelUpRejection {
    #[error("cap exceeded: already at level {level}, the maximum is {max}")]
    CapExceeded { level: u32, max: u32 },

    #[error("insufficient XP: the next level costs {cost} XP but only {available} XP is available")]
    InsufficientXp { cost: u64, available: u32 },
}

/// Price a level-up for `entity` against `available_xp`.
///
/// Statistics cost `level * 10` and stop at level 10; the cap is checked
/// before affordability. Skills cost `level * cost_per_level` and have no cap.
pub fn plan_level_up(
    entity: Progressable<'_>,
    available_xp: u32,
) -> Result<LevelUpPlan, LevelUpRejection> {
    let current_level = entity.level();
    let cost = match entity {
        Progressable::Statistic(statistic) => {
            if statistic.level() >= STATISTIC_MAX_LEVEL {
                return Err(LevelUpRejection::CapExceeded {
                    level: statistic.level(),
                    max: STATISTIC_MAX_LEVEL,
                });
            }
            statistic_level_up_cost(statistic.level())
        }
        Progressable::Skill(skill) => skill_level_up_cost(skill.level(), skill.cost_per_level()),
    };

    if u64::from(available_xp) < cost {
        return Err(LevelUpRejection::InsufficientXp {
            cost,
            available: available_xp,
        });
    }

    let new_level = current_level
        .checked_add(1)
        .ok_or(LevelUpRejection::CapExceeded {
            level: current_level,
            max: u32::MAX,
        })?;
    // cost <= available_xp, so the difference fits in u32
    let final_xp = available_xp - cost as u32;

    Ok(LevelUpPlan {
        target: entity.target(),
        current_level,
        new_level,
        cost,
        available_xp,
        final_xp,
    })
}

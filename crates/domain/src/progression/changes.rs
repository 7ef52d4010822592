//! Change sets produced by progression operations.

use serde::{Deserialize, Serialize};

use crate::entities::{Skill, Statistic};
use crate::ids::{SkillId, StatisticId};

/// Partial update of a statistic row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticPatch {
    pub level: Option<u32>,
}

impl StatisticPatch {
    /// Fields that differ between two snapshots of the same statistic.
    pub fn between(before: &Statistic, after: &Statistic) -> Option<Self> {
        (before.level() != after.level()).then(|| Self {
            level: Some(after.level()),
        })
    }
}

/// Partial update of a skill row.
///
/// There is no `total` field: stores recompute it from the resulting
/// `base + level + bonus`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillPatch {
    pub level: Option<u32>,
    pub base: Option<u32>,
    pub bonus: Option<u32>,
}

impl SkillPatch {
    /// Fields that differ between two snapshots of the same skill.
    pub fn between(before: &Skill, after: &Skill) -> Option<Self> {
        let patch = Self {
            level: (before.level() != after.level()).then_some(after.level()),
            base: (before.base() != after.base()).then_some(after.base()),
            bonus: (before.bonus() != after.bonus()).then_some(after.bonus()),
        };
        (!patch.is_empty()).then_some(patch)
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_none() && self.base.is_none() && self.bonus.is_none()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatisticUpdate {
    pub id: StatisticId,
    pub patch: StatisticPatch,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkillUpdate {
    pub id: SkillId,
    pub patch: SkillPatch,
}

/// The computed diff of one confirmed operation.
///
/// A store must apply every entry, or none of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SheetChanges {
    /// New XP balance, when it changed.
    pub user_xp: Option<u32>,
    pub statistics: Vec<StatisticUpdate>,
    pub skills: Vec<SkillUpdate>,
}

impl SheetChanges {
    pub fn is_empty(&self) -> bool {
        self.user_xp.is_none() && self.statistics.is_empty() && self.skills.is_empty()
    }

    pub(crate) fn record_statistic(&mut self, before: &Statistic, after: &Statistic) {
        if let Some(patch) = StatisticPatch::between(before, after) {
            self.statistics.push(StatisticUpdate {
                id: after.id(),
                patch,
            });
        }
    }

    pub(crate) fn record_skill(&mut self, before: &Skill, after: &Skill) {
        if let Some(patch) = SkillPatch::between(before, after) {
            self.skills.push(SkillUpdate {
                id: after.id(),
                patch,
            });
        }
    }
}

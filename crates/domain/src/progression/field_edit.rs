//! Direct field edits (edit mode): no XP cost, no cap.

use serde::{Deserialize, Serialize};

use crate::ids::{SkillId, StatisticId};

/// Which skill field an edit overwrites.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SkillField {
    Level,
    Base,
    Bonus,
}

/// An override of a single numeric field.
///
/// Statistics only expose `level`; editing it cascades `base` to every child
/// skill, exactly like a confirmed level-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum FieldEdit {
    Statistic {
        id: StatisticId,
        level: u32,
    },
    Skill {
        id: SkillId,
        field: SkillField,
        value: u32,
    },
}

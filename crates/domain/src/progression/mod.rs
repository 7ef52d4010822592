//! Progression engine - XP costs, caps, and the diffs they produce.
//!
//! Everything here is pure: functions take entity snapshots and return plans,
//! rejections, or [`SheetChanges`]. Persisting a change set is the caller's job
//! and must be all-or-nothing.

mod changes;
mod error;
mod field_edit;
mod level_up;
mod reset;
mod rules;

pub use changes::{SheetChanges, SkillPatch, SkillUpdate, StatisticPatch, StatisticUpdate};
pub use error::RuleError;
pub use field_edit::{FieldEdit, SkillField};
pub use level_up::{plan_level_up, LevelUpPlan, LevelUpRejection, LevelUpTarget, Progressable};
pub use reset::{reset_refund, ResetOutcome};
pub use rules::{
    skill_level_up_cost, skill_refund, statistic_level_up_cost, STATISTIC_COST_PER_LEVEL,
    STATISTIC_MAX_LEVEL,
};

//! TRPG Sheet domain: sheet entities, value objects, and the progression
//! rules that price and apply level-ups.

pub mod aggregates;
pub mod defaults;
pub mod entities;
pub mod error;
pub mod ids;
pub mod progression;
pub mod value_objects;

pub use aggregates::{CharacterSheet, StatisticEntry};
pub use defaults::default_sheet;
pub use entities::{Skill, Statistic, User, DEFAULT_COST_PER_LEVEL};
pub use error::DomainError;
pub use ids::{SkillId, StatisticId, UserId};
pub use progression::{
    plan_level_up, reset_refund, FieldEdit, LevelUpPlan, LevelUpRejection, LevelUpTarget,
    Progressable, ResetOutcome, RuleError, SheetChanges, SkillField, SkillPatch, SkillUpdate,
    StatisticPatch, StatisticUpdate, STATISTIC_MAX_LEVEL,
};
pub use value_objects::{
    Description, Email, ShortName, SkillName, Slug, StatisticName, UserName,
};

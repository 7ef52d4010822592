//! Skill entity - a leaf progression unit under a statistic.

use serde::Serialize;

use crate::error::DomainError;
use crate::ids::{SkillId, StatisticId};
use crate::progression::SkillPatch;
use crate::value_objects::{SkillName, Slug};

/// Cost multiplier used when none is given.
pub const DEFAULT_COST_PER_LEVEL: u32 = 1;

/// A skill owned by one statistic.
///
/// # Invariants
///
/// - `total == base + level + bonus` after every mutation; every setter
///   recomputes it and restored skills derive it from their inputs
/// - `cost_per_level >= 1`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Skill {
    id: SkillId,
    statistic_id: StatisticId,
    name: SkillName,
    cost_per_level: u32,
    level: u32,
    base: u32,
    bonus: u32,
    total: u64,
    slug: Slug,
}

impl Skill {
    /// Create a level-0 skill. `base` starts at 0; use [`Skill::with_base`]
    /// to seed it from the parent statistic.
    pub fn new(
        statistic_id: StatisticId,
        name: SkillName,
        cost_per_level: u32,
    ) -> Result<Self, DomainError> {
        Self::restore(SkillId::new(), statistic_id, name, cost_per_level, 0, 0, 0)
    }

    /// Rebuild a skill from persisted fields. `total` and the slug are derived.
    pub fn restore(
        id: SkillId,
        statistic_id: StatisticId,
        name: SkillName,
        cost_per_level: u32,
        level: u32,
        base: u32,
        bonus: u32,
    ) -> Result<Self, DomainError> {
        if cost_per_level == 0 {
            return Err(DomainError::constraint(
                "Skill cost per level must be at least 1",
            ));
        }
        let slug = Slug::from_name(name.as_str());
        let mut skill = Self {
            id,
            statistic_id,
            name,
            cost_per_level,
            level,
            base,
            bonus,
            total: 0,
            slug,
        };
        skill.recompute_total();
        Ok(skill)
    }

    pub fn with_base(mut self, base: u32) -> Self {
        self.set_base(base);
        self
    }

    #[inline]
    pub fn id(&self) -> SkillId {
        self.id
    }

    #[inline]
    pub fn statistic_id(&self) -> StatisticId {
        self.statistic_id
    }

    #[inline]
    pub fn name(&self) -> &SkillName {
        &self.name
    }

    #[inline]
    pub fn cost_per_level(&self) -> u32 {
        self.cost_per_level
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn base(&self) -> u32 {
        self.base
    }

    #[inline]
    pub fn bonus(&self) -> u32 {
        self.bonus
    }

    /// `base + level + bonus`.
    #[inline]
    pub fn total(&self) -> u64 {
        self.total
    }

    #[inline]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Apply a stored partial update and recompute `total`.
    pub fn apply_patch(&mut self, patch: &SkillPatch) {
        if let Some(level) = patch.level {
            self.level = level;
        }
        if let Some(base) = patch.base {
            self.base = base;
        }
        if let Some(bonus) = patch.bonus {
            self.bonus = bonus;
        }
        self.recompute_total();
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
        self.recompute_total();
    }

    pub(crate) fn set_base(&mut self, base: u32) {
        self.base = base;
        self.recompute_total();
    }

    pub(crate) fn set_bonus(&mut self, bonus: u32) {
        self.bonus = bonus;
        self.recompute_total();
    }

    fn recompute_total(&mut self) {
        self.total = u64::from(self.base) + u64::from(self.level) + u64::from(self.bonus);
    }
}

//! Statistic entity - a top-level attribute such as Intelligence.

use serde::Serialize;

use crate::ids::{StatisticId, UserId};
use crate::progression::StatisticPatch;
use crate::value_objects::{Description, ShortName, Slug, StatisticName};

/// A statistic owned by one user.
///
/// Its `level` is the `base` of every child skill; the sheet aggregate keeps
/// the two in step.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Statistic {
    id: StatisticId,
    user_id: UserId,
    name: StatisticName,
    short_name: ShortName,
    description: Description,
    level: u32,
    slug: Slug,
}

impl Statistic {
    /// Create a level-0 statistic with a fresh id and a slug derived from `name`.
    pub fn new(
        user_id: UserId,
        name: StatisticName,
        short_name: ShortName,
        description: Description,
    ) -> Self {
        Self::restore(StatisticId::new(), user_id, name, short_name, description, 0)
    }

    /// Rebuild a statistic from persisted fields. The slug is re-derived.
    pub fn restore(
        id: StatisticId,
        user_id: UserId,
        name: StatisticName,
        short_name: ShortName,
        description: Description,
        level: u32,
    ) -> Self {
        let slug = Slug::from_name(name.as_str());
        Self {
            id,
            user_id,
            name,
            short_name,
            description,
            level,
            slug,
        }
    }

    #[inline]
    pub fn id(&self) -> StatisticId {
        self.id
    }

    #[inline]
    pub fn user_id(&self) -> UserId {
        self.user_id
    }

    #[inline]
    pub fn name(&self) -> &StatisticName {
        &self.name
    }

    #[inline]
    pub fn short_name(&self) -> &ShortName {
        &self.short_name
    }

    #[inline]
    pub fn description(&self) -> &Description {
        &self.description
    }

    #[inline]
    pub fn level(&self) -> u32 {
        self.level
    }

    #[inline]
    pub fn slug(&self) -> &Slug {
        &self.slug
    }

    /// Apply a stored partial update.
    pub fn apply_patch(&mut self, patch: &StatisticPatch) {
        if let Some(level) = patch.level {
            self.level = level;
        }
    }

    pub(crate) fn set_level(&mut self, level: u32) {
        self.level = level;
    }
}

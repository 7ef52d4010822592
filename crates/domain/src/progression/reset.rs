//! Skill reset refunds.

use serde::Serialize;

use super::changes::SheetChanges;
use super::error::RuleError;
use super::rules::skill_refund;
use crate::entities::Skill;

/// Result of resetting every skill on a sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResetOutcome {
    /// XP returned to the pool.
    pub refund: u64,
    /// Writes that apply the reset.
    #[serde(skip)]
    pub changes: SheetChanges,
}

/// XP returned by resetting `skills` to level 0.
///
/// `Σ (L * (L + 1) / 2) * C` over skills with level `L > 0` and cost per
/// level `C`.
pub fn reset_refund<'a>(skills: impl IntoIterator<Item = &'a Skill>) -> Result<u64, RuleError> {
    skills
        .into_iter()
        .filter(|skill| skill.level() > 0)
        .try_fold(0u64, |acc, skill| {
            skill_refund(skill.level(), skill.cost_per_level())
                .and_then(|refund| acc.checked_add(refund))
                .ok_or_else(|| {
                    RuleError::XpOverflow(format!("refund for skill {} is too large", skill.id()))
                })
        })
}

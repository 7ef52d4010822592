//! CharacterSheet aggregate - one user's statistics and skills.
//!
//! # Rustic DDD Design
//!
//! - **Private fields**: entries are only reachable through accessors
//! - **Mutations return diffs**: each operation yields a [`SheetChanges`]
//!   describing exactly what to persist
//! - **Tagged dispatch**: statistics and skills are told apart by
//!   [`Progressable`] / [`LevelUpTarget`], never by shape

use serde::Serialize;

use crate::entities::{Skill, Statistic, User};
use crate::ids::{SkillId, StatisticId};
use crate::progression::{
    plan_level_up, reset_refund, FieldEdit, LevelUpPlan, LevelUpTarget, Progressable,
    ResetOutcome, RuleError, SheetChanges, SkillField,
};

/// A statistic together with its child skills.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StatisticEntry {
    #[serde(flatten)]
    statistic: Statistic,
    skills: Vec<Skill>,
}

impl StatisticEntry {
    pub fn statistic(&self) -> &Statistic {
        &self.statistic
    }

    pub fn skills(&self) -> &[Skill] {
        &self.skills
    }

    /// Set the statistic level and cascade it as `base` to every child skill.
    fn cascade_level(&mut self, level: u32, changes: &mut SheetChanges) {
        let before = self.statistic.clone();
        self.statistic.set_level(level);
        changes.record_statistic(&before, &self.statistic);

        for skill in &mut self.skills {
            let before = skill.clone();
            skill.set_base(level);
            changes.record_skill(&before, skill);
        }
    }
}

/// One user's complete sheet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CharacterSheet {
    user: User,
    statistics: Vec<StatisticEntry>,
}

impl CharacterSheet {
    /// Group loaded rows into a sheet.
    ///
    /// Statistics that belong to another user and skills whose statistic is
    /// not in `statistics` are dropped. Input order is kept.
    pub fn assemble(user: User, statistics: Vec<Statistic>, skills: Vec<Skill>) -> Self {
        let mut entries: Vec<StatisticEntry> = statistics
            .into_iter()
            .filter(|statistic| statistic.user_id() == user.id())
            .map(|statistic| StatisticEntry {
                statistic,
                skills: Vec::new(),
            })
            .collect();

        for skill in skills {
            if let Some(entry) = entries
                .iter_mut()
                .find(|entry| entry.statistic.id() == skill.statistic_id())
            {
                entry.skills.push(skill);
            }
        }

        Self {
            user,
            statistics: entries,
        }
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn user(&self) -> &User {
        &self.user
    }

    pub fn statistics(&self) -> &[StatisticEntry] {
        &self.statistics
    }

    pub fn statistic(&self, id: StatisticId) -> Option<&StatisticEntry> {
        self.statistics.iter().find(|entry| entry.statistic.id() == id)
    }

    pub fn skill(&self, id: SkillId) -> Option<&Skill> {
        self.skills().find(|skill| skill.id() == id)
    }

    /// Every skill on the sheet, statistic by statistic.
    pub fn skills(&self) -> impl Iterator<Item = &Skill> {
        self.statistics.iter().flat_map(|entry| entry.skills.iter())
    }

    fn statistic_mut(&mut self, id: StatisticId) -> Result<&mut StatisticEntry, RuleError> {
        self.statistics
            .iter_mut()
            .find(|entry| entry.statistic.id() == id)
            .ok_or(RuleError::UnknownStatistic(id))
    }

    fn skill_mut(&mut self, id: SkillId) -> Result<&mut Skill, RuleError> {
        self.statistics
            .iter_mut()
            .flat_map(|entry| entry.skills.iter_mut())
            .find(|skill| skill.id() == id)
            .ok_or(RuleError::UnknownSkill(id))
    }

    fn resolve(&self, target: LevelUpTarget) -> Result<Progressable<'_>, RuleError> {
        match target {
            LevelUpTarget::Statistic(id) => self
                .statistic(id)
                .map(|entry| Progressable::Statistic(&entry.statistic))
                .ok_or(RuleError::UnknownStatistic(id)),
            LevelUpTarget::Skill(id) => self
                .skill(id)
                .map(Progressable::Skill)
                .ok_or(RuleError::UnknownSkill(id)),
        }
    }

    // =========================================================================
    // Level-up (plan, then commit)
    // =========================================================================

    /// Price a level-up against the user's current XP. Nothing changes.
    pub fn plan_level_up(&self, target: LevelUpTarget) -> Result<LevelUpPlan, RuleError> {
        let entity = self.resolve(target)?;
        Ok(plan_level_up(entity, self.user.xp())?)
    }

    /// Apply a previously computed plan.
    ///
    /// The plan is re-derived from the current sheet first; if the entity's
    /// level or the XP balance moved since it was made, the commit is refused
    /// with [`RuleError::StalePlan`] and the sheet is left untouched.
    pub fn commit_level_up(&mut self, plan: &LevelUpPlan) -> Result<SheetChanges, RuleError> {
        let fresh = self.plan_level_up(plan.target)?;
        if fresh != *plan {
            return Err(RuleError::StalePlan(format!(
                "planned level {} with {} XP, sheet now has level {} with {} XP",
                plan.current_level, plan.available_xp, fresh.current_level, fresh.available_xp
            )));
        }

        let mut changes = SheetChanges::default();
        match plan.target {
            LevelUpTarget::Statistic(id) => {
                self.statistic_mut(id)?
                    .cascade_level(plan.new_level, &mut changes);
            }
            LevelUpTarget::Skill(id) => {
                let skill = self.skill_mut(id)?;
                let before = skill.clone();
                skill.set_level(plan.new_level);
                changes.record_skill(&before, skill);
            }
        }

        self.user.set_xp(plan.final_xp);
        changes.user_xp = Some(plan.final_xp);
        Ok(changes)
    }

    // =========================================================================
    // Edit mode
    // =========================================================================

    /// Overwrite one field without cost or cap checks.
    pub fn apply_field_edit(&mut self, edit: FieldEdit) -> Result<SheetChanges, RuleError> {
        let mut changes = SheetChanges::default();
        match edit {
            FieldEdit::Statistic { id, level } => {
                self.statistic_mut(id)?.cascade_level(level, &mut changes);
            }
            FieldEdit::Skill { id, field, value } => {
                let skill = self.skill_mut(id)?;
                let before = skill.clone();
                match field {
                    SkillField::Level => skill.set_level(value),
                    SkillField::Base => skill.set_base(value),
                    SkillField::Bonus => skill.set_bonus(value),
                }
                changes.record_skill(&before, skill);
            }
        }
        Ok(changes)
    }

    // =========================================================================
    // Reset and XP
    // =========================================================================

    /// Drop every skill to level 0 and refund the XP spent on them.
    ///
    /// Statistics keep their levels.
    pub fn reset_all_skills(&mut self) -> Result<ResetOutcome, RuleError> {
        let refund = reset_refund(self.skills())?;
        let new_xp = u64::from(self.user.xp())
            .checked_add(refund)
            .and_then(|xp| u32::try_from(xp).ok())
            .ok_or_else(|| {
                RuleError::XpOverflow(format!(
                    "refund of {refund} XP on top of {} XP",
                    self.user.xp()
                ))
            })?;

        let mut changes = SheetChanges::default();
        for skill in self
            .statistics
            .iter_mut()
            .flat_map(|entry| entry.skills.iter_mut())
            .filter(|skill| skill.level() > 0)
        {
            let before = skill.clone();
            skill.set_level(0);
            changes.record_skill(&before, skill);
        }

        if refund > 0 {
            self.user.set_xp(new_xp);
            changes.user_xp = Some(new_xp);
        }
        Ok(ResetOutcome { refund, changes })
    }

    /// Add XP to the user's pool.
    pub fn grant_xp(&mut self, amount: u32) -> Result<SheetChanges, RuleError> {
        let new_xp = self.user.xp().checked_add(amount).ok_or_else(|| {
            RuleError::XpOverflow(format!("granting {amount} XP on top of {}", self.user.xp()))
        })?;
        self.user.set_xp(new_xp);
        Ok(SheetChanges {
            user_xp: Some(new_xp),
            ..SheetChanges::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::UserId;
    use crate::progression::{LevelUpRejection, SkillPatch, StatisticPatch};
    use crate::value_objects::{Description, Email, ShortName, SkillName, StatisticName, UserName};

    fn user_with_xp(xp: u32) -> User {
        User::new(
            UserName::new("Ciri").unwrap(),
            Email::new("ciri@zireael.org").unwrap(),
        )
        .with_xp(xp)
    }

    fn statistic(user_id: UserId, name: &str, level: u32) -> Statistic {
        Statistic::restore(
            StatisticId::new(),
            user_id,
            StatisticName::new(name).unwrap(),
            ShortName::new(&name[..3]).unwrap(),
            Description::empty(),
            level,
        )
    }

    fn skill(statistic: &Statistic, name: &str, level: u32, cost_per_level: u32) -> Skill {
        Skill::restore(
            SkillId::new(),
            statistic.id(),
            SkillName::new(name).unwrap(),
            cost_per_level,
            level,
            statistic.level(),
            0,
        )
        .unwrap()
    }

    fn assert_totals_consistent(sheet: &CharacterSheet) {
        for skill in sheet.skills() {
            assert_eq!(
                skill.total(),
                u64::from(skill.base()) + u64::from(skill.level()) + u64::from(skill.bonus())
            );
        }
    }

    /// INT at level 3 with two skills, REF at level 0 with one, 100 XP.
    fn sample_sheet() -> CharacterSheet {
        let user = user_with_xp(100);
        let int = statistic(user.id(), "Intelligence", 3);
        let reflexes = statistic(user.id(), "Reflexes", 0);
        let skills = vec![
            skill(&int, "Tactics", 3, 1),
            skill(&int, "Language", 2, 2),
            skill(&reflexes, "Brawling", 0, 1),
        ];
        CharacterSheet::assemble(user, vec![int, reflexes], skills)
    }

    #[test]
    fn assemble_groups_skills_and_drops_orphans() {
        let user = user_with_xp(0);
        let own = statistic(user.id(), "Body", 0);
        let foreign = statistic(UserId::new(), "Luck", 0);
        let orphan_parent = statistic(user.id(), "Speed", 0);
        let skills = vec![
            skill(&own, "Physique", 0, 1),
            skill(&foreign, "Gambling", 0, 1),
            skill(&orphan_parent, "Running", 0, 1),
        ];
        let sheet = CharacterSheet::assemble(user, vec![own.clone(), foreign], skills);

        assert_eq!(sheet.statistics().len(), 1);
        assert_eq!(sheet.statistics()[0].statistic().id(), own.id());
        assert_eq!(sheet.skills().count(), 1);
    }

    #[test]
    fn statistic_level_up_cascades_base_to_children() {
        let mut sheet = sample_sheet();
        let int_id = sheet.statistics()[0].statistic().id();

        let plan = sheet.plan_level_up(LevelUpTarget::Statistic(int_id)).unwrap();
        assert_eq!((plan.cost, plan.new_level, plan.final_xp), (30, 4, 70));

        let changes = sheet.commit_level_up(&plan).unwrap();

        let entry = sheet.statistic(int_id).unwrap();
        assert_eq!(entry.statistic().level(), 4);
        assert!(entry.skills().iter().all(|s| s.base() == 4));
        assert_eq!(sheet.user().xp(), 70);
        assert_totals_consistent(&sheet);

        assert_eq!(changes.user_xp, Some(70));
        assert_eq!(
            changes.statistics[0].patch,
            StatisticPatch { level: Some(4) }
        );
        assert_eq!(changes.skills.len(), 2);
        assert!(changes.skills.iter().all(|u| u.patch.base == Some(4)));
    }

    #[test]
    fn skill_level_up_only_touches_that_skill() {
        let mut sheet = sample_sheet();
        let language = sheet.statistics()[0].skills()[1].id();

        let plan = sheet.plan_level_up(LevelUpTarget::Skill(language)).unwrap();
        assert_eq!(plan.cost, 4);
        let changes = sheet.commit_level_up(&plan).unwrap();

        let skill = sheet.skill(language).unwrap();
        assert_eq!((skill.level(), skill.total()), (3, 6));
        assert_eq!(sheet.user().xp(), 96);
        assert!(changes.statistics.is_empty());
        assert_eq!(
            changes.skills,
            vec![crate::progression::SkillUpdate {
                id: language,
                patch: SkillPatch {
                    level: Some(3),
                    base: None,
                    bonus: None
                }
            }]
        );
    }

    #[test]
    fn rejection_leaves_sheet_untouched() {
        let user = user_with_xp(5);
        let int = statistic(user.id(), "Intelligence", 3);
        let int_id = int.id();
        let sheet = CharacterSheet::assemble(user, vec![int], Vec::new());

        let err = sheet.plan_level_up(LevelUpTarget::Statistic(int_id)).unwrap_err();

        assert_eq!(
            err,
            RuleError::Rejected(LevelUpRejection::InsufficientXp {
                cost: 30,
                available: 5
            })
        );
        assert_eq!(sheet.user().xp(), 5);
        assert_eq!(sheet.statistic(int_id).unwrap().statistic().level(), 3);
    }

    #[test]
    fn stale_plan_is_refused() {
        let mut sheet = sample_sheet();
        let tactics = sheet.statistics()[0].skills()[0].id();
        let plan = sheet.plan_level_up(LevelUpTarget::Skill(tactics)).unwrap();

        sheet.commit_level_up(&plan).unwrap();
        let replay = sheet.commit_level_up(&plan);

        assert!(matches!(replay, Err(RuleError::StalePlan(_))));
        assert_eq!(sheet.skill(tactics).unwrap().level(), 4);
    }

    #[test]
    fn xp_change_makes_plan_stale() {
        let mut sheet = sample_sheet();
        let tactics = sheet.statistics()[0].skills()[0].id();
        let plan = sheet.plan_level_up(LevelUpTarget::Skill(tactics)).unwrap();
        sheet.grant_xp(5).unwrap();
        assert!(matches!(
            sheet.commit_level_up(&plan),
            Err(RuleError::StalePlan(_))
        ));
    }

    #[test]
    fn unknown_targets_are_reported() {
        let sheet = sample_sheet();
        let missing = SkillId::new();
        assert_eq!(
            sheet.plan_level_up(LevelUpTarget::Skill(missing)),
            Err(RuleError::UnknownSkill(missing))
        );
    }

    #[test]
    fn statistic_edit_cascades_without_cost_or_cap() {
        let mut sheet = sample_sheet();
        let int_id = sheet.statistics()[0].statistic().id();

        let changes = sheet
            .apply_field_edit(FieldEdit::Statistic {
                id: int_id,
                level: 12,
            })
            .unwrap();

        let entry = sheet.statistic(int_id).unwrap();
        assert_eq!(entry.statistic().level(), 12);
        assert!(entry.skills().iter().all(|s| s.base() == 12));
        assert_eq!(sheet.user().xp(), 100);
        assert_eq!(changes.user_xp, None);
        assert_eq!(changes.skills.len(), 2);
        assert_totals_consistent(&sheet);
    }

    #[test]
    fn skill_field_edits_recompute_total() {
        let mut sheet = sample_sheet();
        let brawling = sheet.statistics()[1].skills()[0].id();

        let edits = [
            (SkillField::Bonus, 2),
            (SkillField::Base, 5),
            (SkillField::Level, 1),
        ];
        for (field, value) in edits {
            sheet
                .apply_field_edit(FieldEdit::Skill {
                    id: brawling,
                    field,
                    value,
                })
                .unwrap();
        }

        let skill = sheet.skill(brawling).unwrap();
        assert_eq!(
            (skill.base(), skill.level(), skill.bonus(), skill.total()),
            (5, 1, 2, 8)
        );
    }

    #[test]
    fn edit_with_same_value_produces_no_skill_writes() {
        let mut sheet = sample_sheet();
        let tactics = sheet.statistics()[0].skills()[0].id();
        let changes = sheet
            .apply_field_edit(FieldEdit::Skill {
                id: tactics,
                field: SkillField::Level,
                value: 3,
            })
            .unwrap();
        assert!(changes.is_empty());
    }

    #[test]
    fn reset_refunds_and_zeroes_skills() {
        let mut sheet = sample_sheet();
        let int_level_before = sheet.statistics()[0].statistic().level();

        let outcome = sheet.reset_all_skills().unwrap();

        // Tactics: 3*4/2*1 = 6, Language: 2*3/2*2 = 6
        assert_eq!(outcome.refund, 12);
        assert_eq!(sheet.user().xp(), 112);
        assert!(sheet.skills().all(|s| s.level() == 0));
        assert_eq!(sheet.statistics()[0].statistic().level(), int_level_before);
        assert_eq!(outcome.changes.skills.len(), 2);
        assert_eq!(outcome.changes.user_xp, Some(112));
        assert_totals_consistent(&sheet);
    }

    #[test]
    fn reset_refund_overflowing_xp_is_refused() {
        let user = user_with_xp(u32::MAX);
        let body = statistic(user.id(), "Body", 0);
        let skills = vec![skill(&body, "Endurance", 1, 1)];
        let mut sheet = CharacterSheet::assemble(user, vec![body], skills);

        assert!(matches!(sheet.reset_all_skills(), Err(RuleError::XpOverflow(_))));
        assert_eq!(sheet.skills().next().unwrap().level(), 1);
    }

    #[test]
    fn grant_xp_is_checked() {
        let mut sheet = sample_sheet();
        assert_eq!(sheet.grant_xp(25).unwrap().user_xp, Some(125));
        assert!(sheet.grant_xp(u32::MAX).is_err());
        assert_eq!(sheet.user().xp(), 125);
    }

    #[test]
    fn serializes_statistics_with_nested_skills() {
        let sheet = sample_sheet();
        let json = serde_json::to_value(&sheet).unwrap();
        let first = &json["statistics"][0];
        assert_eq!(first["name"], "Intelligence");
        assert_eq!(first["level"], 3);
        assert_eq!(first["skills"][0]["name"], "Tactics");
        assert_eq!(first["skills"][0]["total"], 6);
        assert_eq!(json["user"]["xp"], 100);
    }
}

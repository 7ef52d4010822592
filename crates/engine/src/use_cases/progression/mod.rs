//! Progression use cases.
//!
//! Level-ups are two-phase: `plan_level_up` prices the change and parks the
//! plan in [`PendingLevelUpStore`]; `confirm_level_up` re-checks it against
//! the current sheet and commits. Every write goes through
//! [`SheetCommitRepo::commit`], so an entity change and its XP change land
//! together or not at all.

mod error;

pub use error::ProgressionError;

use std::sync::Arc;

use serde::Serialize;
use trpgsheet_domain::{
    CharacterSheet, FieldEdit, LevelUpPlan, LevelUpTarget, SheetChanges, User, UserId,
};
use uuid::Uuid;

use super::loader::SheetLoader;
use crate::infrastructure::ports::SheetCommitRepo;
use crate::stores::{PendingLevelUp, PendingLevelUpStore, UserLocks};

/// A confirmed level-up and the sheet after it.
#[derive(Debug, Clone, Serialize)]
pub struct LevelUpOutcome {
    pub plan: LevelUpPlan,
    pub sheet: CharacterSheet,
}

/// XP returned by a skill reset and the resulting balance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ResetResult {
    pub refund: u64,
    pub xp: u32,
}

/// Container for progression use cases.
pub struct ProgressionUseCases {
    loader: SheetLoader,
    commits: Arc<dyn SheetCommitRepo>,
    pending: Arc<PendingLevelUpStore>,
    locks: Arc<UserLocks>,
}

impl ProgressionUseCases {
    pub fn new(
        loader: SheetLoader,
        commits: Arc<dyn SheetCommitRepo>,
        pending: Arc<PendingLevelUpStore>,
        locks: Arc<UserLocks>,
    ) -> Self {
        Self {
            loader,
            commits,
            pending,
            locks,
        }
    }

    async fn load(&self, user_id: UserId) -> Result<CharacterSheet, ProgressionError> {
        self.loader
            .load(user_id)
            .await?
            .ok_or(ProgressionError::UserNotFound(user_id))
    }

    async fn commit(
        &self,
        user_id: UserId,
        changes: &SheetChanges,
    ) -> Result<(), ProgressionError> {
        if changes.is_empty() {
            return Ok(());
        }
        self.commits.commit(user_id, changes).await.map_err(|e| {
            tracing::warn!(user_id = %user_id, error = %e, "Sheet commit failed");
            ProgressionError::CommitFailed(e)
        })
    }

    /// Price a level-up and hold it for confirmation.
    ///
    /// A cap or XP rejection comes back as [`ProgressionError::Rule`] and
    /// nothing is stored.
    pub async fn plan_level_up(
        &self,
        user_id: UserId,
        target: LevelUpTarget,
    ) -> Result<PendingLevelUp, ProgressionError> {
        let sheet = self.load(user_id).await?;
        let plan = sheet.plan_level_up(target).map_err(|e| {
            tracing::info!(user_id = %user_id, ?target, reason = %e, "Level-up rejected");
            e
        })?;

        let pending = self.pending.insert(user_id, plan).await;
        tracing::debug!(
            user_id = %user_id,
            plan_id = %pending.plan_id,
            cost = plan.cost,
            new_level = plan.new_level,
            "Planned level-up"
        );
        Ok(pending)
    }

    /// Apply a pending plan if the sheet still matches it.
    ///
    /// A plan the rules no longer allow (stale, rejected, or for an entity
    /// that is gone) is discarded; the caller must plan again. On a store
    /// failure the plan is kept so the confirm can be retried.
    pub async fn confirm_level_up(
        &self,
        user_id: UserId,
        plan_id: Uuid,
    ) -> Result<LevelUpOutcome, ProgressionError> {
        let _guard = self.locks.lock(user_id).await;

        let pending = self
            .pending
            .take(user_id, plan_id)
            .await
            .ok_or(ProgressionError::PlanNotFound(plan_id))?;

        let sheet = match self.apply_plan(user_id, &pending.plan).await {
            Ok(sheet) => sheet,
            Err(ProgressionError::Rule(e)) => {
                tracing::warn!(
                    user_id = %user_id,
                    plan_id = %plan_id,
                    reason = %e,
                    "Level-up not applied"
                );
                return Err(e.into());
            }
            Err(e) => {
                self.pending.restore(pending).await;
                return Err(e);
            }
        };

        tracing::info!(
            user_id = %user_id,
            plan_id = %plan_id,
            target = ?pending.plan.target,
            new_level = pending.plan.new_level,
            xp = pending.plan.final_xp,
            "Level-up committed"
        );
        Ok(LevelUpOutcome {
            plan: pending.plan,
            sheet,
        })
    }

    async fn apply_plan(
        &self,
        user_id: UserId,
        plan: &LevelUpPlan,
    ) -> Result<CharacterSheet, ProgressionError> {
        let mut sheet = self.load(user_id).await?;
        let changes = sheet.commit_level_up(plan)?;
        self.commit(user_id, &changes).await?;
        Ok(sheet)
    }

    pub async fn cancel_level_up(
        &self,
        user_id: UserId,
        plan_id: Uuid,
    ) -> Result<(), ProgressionError> {
        if self.pending.take(user_id, plan_id).await.is_none() {
            return Err(ProgressionError::PlanNotFound(plan_id));
        }
        tracing::debug!(user_id = %user_id, plan_id = %plan_id, "Level-up cancelled");
        Ok(())
    }

    /// Overwrite one field directly. No XP is spent and no cap applies.
    pub async fn apply_field_edit(
        &self,
        user_id: UserId,
        edit: FieldEdit,
    ) -> Result<CharacterSheet, ProgressionError> {
        let _guard = self.locks.lock(user_id).await;

        let mut sheet = self.load(user_id).await?;
        let changes = sheet.apply_field_edit(edit)?;
        self.commit(user_id, &changes).await?;

        tracing::info!(user_id = %user_id, ?edit, "Field edited");
        Ok(sheet)
    }

    /// Return every skill to level 0 and refund XP for the levels dropped.
    pub async fn reset_all_skills(&self, user_id: UserId) -> Result<ResetResult, ProgressionError> {
        let _guard = self.locks.lock(user_id).await;

        let mut sheet = self.load(user_id).await?;
        let outcome = sheet.reset_all_skills()?;
        self.commit(user_id, &outcome.changes).await?;

        let xp = sheet.user().xp();
        tracing::info!(user_id = %user_id, refund = outcome.refund, xp, "Skills reset");
        Ok(ResetResult {
            refund: outcome.refund,
            xp,
        })
    }

    /// Add `amount` XP to the user's pool.
    pub async fn grant_xp(&self, user_id: UserId, amount: u32) -> Result<User, ProgressionError> {
        let _guard = self.locks.lock(user_id).await;

        let mut sheet = self.load(user_id).await?;
        let changes = sheet.grant_xp(amount)?;
        self.commit(user_id, &changes).await?;

        tracing::info!(user_id = %user_id, amount, xp = sheet.user().xp(), "XP granted");
        Ok(sheet.user().clone())
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use trpgsheet_domain::{
        Description, Email, FieldEdit, LevelUpPlan, LevelUpRejection, LevelUpTarget, RuleError,
        ShortName, Skill, SkillField, SkillId, SkillName, Statistic, StatisticId, StatisticName,
        User, UserName,
    };

    use super::{ProgressionError, ProgressionUseCases};
    use crate::infrastructure::ports::{
        MockSheetCommitRepo, MockSkillRepo, MockStatisticRepo, MockUserRepo, RepoError,
    };
    use crate::stores::{PendingLevelUpStore, UserLocks};
    use crate::use_cases::loader::SheetLoader;

    struct Fixture {
        user: User,
        intelligence: Statistic,
        tactics: Skill,
    }

    /// `xp` XP, INT at level 3, Tactics (2 per level) at level 2 with base 3.
    fn fixture(xp: u32) -> Fixture {
        let user = User::new(
            UserName::new("Regis").unwrap(),
            Email::new("regis@toussaint.fr").unwrap(),
        )
        .with_xp(xp);
        let intelligence = Statistic::restore(
            StatisticId::new(),
            user.id(),
            StatisticName::new("Intelligence").unwrap(),
            ShortName::new("INT").unwrap(),
            Description::empty(),
            3,
        );
        let tactics = Skill::restore(
            SkillId::new(),
            intelligence.id(),
            SkillName::new("Tactics").unwrap(),
            2,
            2,
            3,
            0,
        )
        .unwrap();
        Fixture {
            user,
            intelligence,
            tactics,
        }
    }

    fn loader(fixture: &Fixture) -> SheetLoader {
        let user = fixture.user.clone();
        let statistic = fixture.intelligence.clone();
        let skill = fixture.tactics.clone();

        let mut users = MockUserRepo::new();
        users.expect_get().returning(move |_| Ok(Some(user.clone())));
        let mut statistics = MockStatisticRepo::new();
        statistics
            .expect_list_for_user()
            .returning(move |_| Ok(vec![statistic.clone()]));
        let mut skills = MockSkillRepo::new();
        skills
            .expect_list_for_statistics()
            .returning(move |_| Ok(vec![skill.clone()]));

        SheetLoader::new(Arc::new(users), Arc::new(statistics), Arc::new(skills))
    }

    fn use_case(
        fixture: &Fixture,
        commits: MockSheetCommitRepo,
        pending: Arc<PendingLevelUpStore>,
    ) -> ProgressionUseCases {
        ProgressionUseCases::new(
            loader(fixture),
            Arc::new(commits),
            pending,
            Arc::new(UserLocks::new()),
        )
    }

    #[tokio::test]
    async fn when_plan_is_confirmed_then_entity_and_xp_are_committed_together() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let statistic_id = fixture.intelligence.id();
        let skill_id = fixture.tactics.id();

        let mut commits = MockSheetCommitRepo::new();
        commits
            .expect_commit()
            .withf(move |id, changes| {
                *id == user_id
                    && changes.user_xp == Some(70)
                    && changes.statistics.len() == 1
                    && changes.statistics[0].id == statistic_id
                    && changes.statistics[0].patch.level == Some(4)
                    && changes.skills.len() == 1
                    && changes.skills[0].id == skill_id
                    && changes.skills[0].patch.base == Some(4)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(&fixture, commits, Arc::new(PendingLevelUpStore::default()));
        let pending = use_case
            .plan_level_up(user_id, LevelUpTarget::Statistic(statistic_id))
            .await
            .unwrap();
        assert_eq!(pending.plan.cost, 30);
        assert_eq!(pending.plan.final_xp, 70);

        let outcome = use_case
            .confirm_level_up(user_id, pending.plan_id)
            .await
            .unwrap();

        assert_eq!(outcome.sheet.user().xp(), 70);
        let tactics = outcome.sheet.skill(skill_id).unwrap();
        assert_eq!(tactics.base(), 4);
        assert_eq!(tactics.total(), 6);
    }

    #[tokio::test]
    async fn when_xp_is_insufficient_then_nothing_is_stored() {
        let fixture = fixture(3);
        let user_id = fixture.user.id();
        let mut commits = MockSheetCommitRepo::new();
        commits.expect_commit().never();
        let pending = Arc::new(PendingLevelUpStore::default());

        let use_case = use_case(&fixture, commits, pending.clone());
        let err = use_case
            .plan_level_up(user_id, LevelUpTarget::Skill(fixture.tactics.id()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            ProgressionError::Rule(RuleError::Rejected(LevelUpRejection::InsufficientXp {
                cost: 4,
                available: 3
            }))
        ));
        assert_eq!(pending.len().await, 0);
    }

    #[tokio::test]
    async fn when_commit_fails_then_plan_survives_for_retry() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let mut commits = MockSheetCommitRepo::new();
        commits
            .expect_commit()
            .times(1)
            .returning(|_, _| Err(RepoError::database("sheet.commit", "database is locked")));
        let pending = Arc::new(PendingLevelUpStore::default());

        let use_case = use_case(&fixture, commits, pending.clone());
        let planned = use_case
            .plan_level_up(user_id, LevelUpTarget::Skill(fixture.tactics.id()))
            .await
            .unwrap();

        let err = use_case
            .confirm_level_up(user_id, planned.plan_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressionError::CommitFailed(_)));
        assert_eq!(pending.get(planned.plan_id).await, Some(planned));
    }

    #[tokio::test]
    async fn when_sheet_moved_on_then_plan_is_stale() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let mut commits = MockSheetCommitRepo::new();
        commits.expect_commit().never();
        let pending = Arc::new(PendingLevelUpStore::default());

        // Planned against 200 XP; the sheet only has 100 now.
        let plan = LevelUpPlan {
            target: LevelUpTarget::Skill(fixture.tactics.id()),
            current_level: 2,
            new_level: 3,
            cost: 4,
            available_xp: 200,
            final_xp: 196,
        };
        let parked = pending.insert(user_id, plan).await;

        let use_case = use_case(&fixture, commits, pending.clone());
        let err = use_case
            .confirm_level_up(user_id, parked.plan_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressionError::Rule(RuleError::StalePlan(_))));
        assert_eq!(pending.len().await, 0);
    }

    #[tokio::test]
    async fn when_sheet_cannot_be_read_then_plan_survives_for_retry() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let pending = Arc::new(PendingLevelUpStore::default());
        let parked = pending
            .insert(
                user_id,
                LevelUpPlan {
                    target: LevelUpTarget::Skill(fixture.tactics.id()),
                    current_level: 2,
                    new_level: 3,
                    cost: 4,
                    available_xp: 100,
                    final_xp: 96,
                },
            )
            .await;

        let mut users = MockUserRepo::new();
        users
            .expect_get()
            .times(1)
            .returning(|_| Err(RepoError::database("users.get", "disk I/O error")));
        let mut commits = MockSheetCommitRepo::new();
        commits.expect_commit().never();
        let use_case = ProgressionUseCases::new(
            SheetLoader::new(
                Arc::new(users),
                Arc::new(MockStatisticRepo::new()),
                Arc::new(MockSkillRepo::new()),
            ),
            Arc::new(commits),
            pending.clone(),
            Arc::new(UserLocks::new()),
        );

        let err = use_case
            .confirm_level_up(user_id, parked.plan_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressionError::Repo(_)));
        assert_eq!(pending.get(parked.plan_id).await, Some(parked));
    }

    #[tokio::test]
    async fn when_plan_is_cancelled_then_it_cannot_be_confirmed() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let mut commits = MockSheetCommitRepo::new();
        commits.expect_commit().never();

        let use_case = use_case(&fixture, commits, Arc::new(PendingLevelUpStore::default()));
        let planned = use_case
            .plan_level_up(user_id, LevelUpTarget::Skill(fixture.tactics.id()))
            .await
            .unwrap();

        use_case.cancel_level_up(user_id, planned.plan_id).await.unwrap();
        let err = use_case
            .confirm_level_up(user_id, planned.plan_id)
            .await
            .unwrap_err();

        assert!(matches!(err, ProgressionError::PlanNotFound(id) if id == planned.plan_id));
    }

    #[tokio::test]
    async fn when_skills_are_reset_then_refund_is_committed() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let skill_id = fixture.tactics.id();
        let mut commits = MockSheetCommitRepo::new();
        commits
            .expect_commit()
            .withf(move |_, changes| {
                changes.user_xp == Some(106)
                    && changes.skills.len() == 1
                    && changes.skills[0].id == skill_id
                    && changes.skills[0].patch.level == Some(0)
            })
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(&fixture, commits, Arc::new(PendingLevelUpStore::default()));
        let result = use_case.reset_all_skills(user_id).await.unwrap();

        // Tactics: level 2, 2 per level -> (1 + 2) * 2.
        assert_eq!(result.refund, 6);
        assert_eq!(result.xp, 106);
    }

    #[tokio::test]
    async fn when_field_is_edited_then_no_xp_changes() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let skill_id = fixture.tactics.id();
        let mut commits = MockSheetCommitRepo::new();
        commits
            .expect_commit()
            .withf(|_, changes| changes.user_xp.is_none() && changes.skills.len() == 1)
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(&fixture, commits, Arc::new(PendingLevelUpStore::default()));
        let sheet = use_case
            .apply_field_edit(
                user_id,
                FieldEdit::Skill {
                    id: skill_id,
                    field: SkillField::Bonus,
                    value: 5,
                },
            )
            .await
            .unwrap();

        assert_eq!(sheet.user().xp(), 100);
        assert_eq!(sheet.skill(skill_id).unwrap().total(), 10);
    }

    #[tokio::test]
    async fn when_xp_is_granted_then_balance_grows() {
        let fixture = fixture(100);
        let user_id = fixture.user.id();
        let mut commits = MockSheetCommitRepo::new();
        commits
            .expect_commit()
            .withf(|_, changes| changes.user_xp == Some(125) && changes.skills.is_empty())
            .times(1)
            .returning(|_, _| Ok(()));

        let use_case = use_case(&fixture, commits, Arc::new(PendingLevelUpStore::default()));
        let user = use_case.grant_xp(user_id, 25).await.unwrap();

        assert_eq!(user.xp(), 125);
    }
}

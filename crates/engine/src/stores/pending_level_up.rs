//! Planned level-ups awaiting confirmation.
//!
//! Plans expire after a TTL (10 minutes unless configured) so a preview
//! that is never confirmed or cancelled is eventually forgotten.

use std::time::Duration;

use serde::Serialize;
use trpgsheet_domain::{LevelUpPlan, UserId};
use uuid::Uuid;

use crate::infrastructure::cache::TtlCache;

pub const DEFAULT_PLAN_TTL: Duration = Duration::from_secs(10 * 60);

/// A level-up preview the user may confirm or cancel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PendingLevelUp {
    pub plan_id: Uuid,
    pub user_id: UserId,
    pub plan: LevelUpPlan,
}

pub struct PendingLevelUpStore {
    inner: TtlCache<Uuid, PendingLevelUp>,
}

impl PendingLevelUpStore {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: TtlCache::new(ttl),
        }
    }

    /// Store `plan` under a fresh plan id.
    pub async fn insert(&self, user_id: UserId, plan: LevelUpPlan) -> PendingLevelUp {
        let pending = PendingLevelUp {
            plan_id: Uuid::new_v4(),
            user_id,
            plan,
        };
        self.inner.insert(pending.plan_id, pending).await;
        pending
    }

    /// Put a taken plan back under its original id.
    pub async fn restore(&self, pending: PendingLevelUp) {
        self.inner.insert(pending.plan_id, pending).await;
    }

    #[cfg(test)]
    pub async fn get(&self, plan_id: Uuid) -> Option<PendingLevelUp> {
        self.inner.get(&plan_id).await
    }

    /// Remove and return `user_id`'s plan. Another user's plan is left alone.
    pub async fn take(&self, user_id: UserId, plan_id: Uuid) -> Option<PendingLevelUp> {
        self.inner
            .take_if(&plan_id, |pending| pending.user_id == user_id)
            .await
    }

    pub async fn cleanup_expired(&self) -> usize {
        self.inner.cleanup_expired().await
    }

    #[cfg(test)]
    pub async fn len(&self) -> usize {
        self.inner.len().await
    }
}

impl Default for PendingLevelUpStore {
    fn default() -> Self {
        Self::new(DEFAULT_PLAN_TTL)
    }
}

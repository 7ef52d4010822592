//! Per-user write serialization.

use std::sync::Arc;

use dashmap::DashMap;
use tokio::sync::{Mutex, OwnedMutexGuard};
use trpgsheet_domain::UserId;

/// One async mutex per user.
///
/// Mutating use cases hold the guard from loading the sheet until the commit
/// returns, so two writes for the same user never interleave. Different users
/// never contend.
#[derive(Default)]
pub struct UserLocks {
    locks: DashMap<UserId, Arc<Mutex<()>>>,
}

impl UserLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn lock(&self, user_id: UserId) -> OwnedMutexGuard<()> {
        // Clone the Arc out so the map shard is unlocked before awaiting.
        let mutex = self.locks.entry(user_id).or_default().clone();
        mutex.lock_owned().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn same_user_waits_for_the_holder() {
        let locks = Arc::new(UserLocks::new());
        let user_id = UserId::new();
        let guard = locks.lock(user_id).await;

        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move {
                let _guard = locks.lock(user_id).await;
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!waiter.is_finished());

        drop(guard);
        waiter.await.unwrap();
    }

    #[tokio::test]
    async fn different_users_do_not_contend() {
        let locks = UserLocks::new();
        let _first = locks.lock(UserId::new()).await;
        let second =
            tokio::time::timeout(Duration::from_millis(50), locks.lock(UserId::new())).await;
        assert!(second.is_ok());
    }
}

//! Application state and composition.

use std::sync::Arc;
use std::time::Duration;

use crate::infrastructure::memory::InMemoryStore;
use crate::infrastructure::ports::{SheetCommitRepo, SkillRepo, StatisticRepo, UserRepo};
use crate::infrastructure::sqlite::SqliteRepositories;
use crate::stores::{PendingLevelUpStore, UserLocks};
use crate::use_cases;

/// Main application state.
///
/// Holds the repositories, runtime stores and use cases.
/// Passed to HTTP handlers via Axum state.
pub struct App {
    pub repositories: Repositories,
    pub stores: Stores,
    pub use_cases: UseCases,
}

/// Port traits for the configured storage backend.
#[derive(Clone)]
pub struct Repositories {
    pub users: Arc<dyn UserRepo>,
    pub statistics: Arc<dyn StatisticRepo>,
    pub skills: Arc<dyn SkillRepo>,
    pub commits: Arc<dyn SheetCommitRepo>,
}

impl Repositories {
    pub fn sqlite(repos: SqliteRepositories) -> Self {
        Self {
            users: repos.users,
            statistics: repos.statistics,
            skills: repos.skills,
            commits: repos.commits,
        }
    }

    pub fn in_memory(store: Arc<InMemoryStore>) -> Self {
        Self {
            users: store.clone(),
            statistics: store.clone(),
            skills: store.clone(),
            commits: store,
        }
    }
}

/// Runtime state shared across requests.
pub struct Stores {
    pub pending_level_ups: Arc<PendingLevelUpStore>,
    pub user_locks: Arc<UserLocks>,
}

/// Container for all use cases.
pub struct UseCases {
    pub account: use_cases::AccountUseCases,
    pub sheet: use_cases::SheetUseCases,
    pub progression: use_cases::ProgressionUseCases,
}

impl App {
    /// Create a new App with all dependencies wired up.
    pub fn new(repositories: Repositories, plan_ttl: Duration) -> Self {
        let stores = Stores {
            pending_level_ups: Arc::new(PendingLevelUpStore::new(plan_ttl)),
            user_locks: Arc::new(UserLocks::new()),
        };

        let loader = use_cases::SheetLoader::new(
            repositories.users.clone(),
            repositories.statistics.clone(),
            repositories.skills.clone(),
        );

        let use_cases = UseCases {
            account: use_cases::AccountUseCases::new(repositories.users.clone()),
            sheet: use_cases::SheetUseCases::new(
                loader.clone(),
                repositories.statistics.clone(),
                repositories.skills.clone(),
                repositories.commits.clone(),
                stores.user_locks.clone(),
            ),
            progression: use_cases::ProgressionUseCases::new(
                loader,
                repositories.commits.clone(),
                stores.pending_level_ups.clone(),
                stores.user_locks.clone(),
            ),
        };

        Self {
            repositories,
            stores,
            use_cases,
        }
    }
}

//! Domain entities - Core sheet objects with identity
//!
//! Relationship: `User 1..* Statistic 1..* Skill`.

mod skill;
mod statistic;
mod user;

pub use skill::{Skill, DEFAULT_COST_PER_LEVEL};
pub use statistic::Statistic;
pub use user::User;

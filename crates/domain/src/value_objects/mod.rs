//! Value objects - validated, immutable building blocks for entities.

mod email;
mod names;
mod slug;

pub use email::Email;
pub use names::{Description, ShortName, SkillName, StatisticName, UserName};
pub use slug::Slug;

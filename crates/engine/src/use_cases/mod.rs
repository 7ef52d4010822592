//! Use cases - user-facing operations over the character sheet.
//!
//! Each container holds port traits (`Arc<dyn ...Repo>`) and the shared
//! runtime stores it needs; none of them knows which store backs the ports.

pub mod account;
pub mod loader;
pub mod progression;
pub mod sheet;

pub use account::{AccountError, AccountUseCases};
pub use loader::SheetLoader;
pub use progression::{LevelUpOutcome, ProgressionError, ProgressionUseCases, ResetResult};
pub use sheet::{NewSkill, NewStatistic, SheetError, SheetUseCases};

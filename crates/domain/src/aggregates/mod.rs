//! Aggregate roots - domain objects that own their related data
//!
//! The only aggregate is the per-user [`CharacterSheet`]: a user, their
//! statistics, and each statistic's skills. Every progression operation runs
//! against it and returns the [`SheetChanges`](crate::progression::SheetChanges)
//! a store must persist.

pub mod character_sheet;

pub use character_sheet::{CharacterSheet, StatisticEntry};

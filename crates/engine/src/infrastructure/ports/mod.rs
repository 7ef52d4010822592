//! Port traits for infrastructure boundaries.
//!
//! Storage is the only boundary: the SQLite and in-memory stores implement
//! these traits and use cases depend on nothing else.

mod error;
mod repos;

pub use error::RepoError;
pub use repos::*;

//! TRPG Sheet Engine library.
//!
//! Server-side code for the character-sheet progression service.
//!
//! ## Structure
//!
//! - `infrastructure/` - port traits and the SQLite / in-memory stores
//! - `stores/` - runtime state (pending level-ups, per-user locks)
//! - `use_cases/` - user-facing operations over the domain
//! - `api/` - HTTP entry points
//! - `app` - application composition
//! - `config` - environment configuration

pub mod api;
pub mod app;
pub mod config;
pub mod infrastructure;
pub mod stores;
pub mod use_cases;

/// Router-level tests against a fully wired App.
#[cfg(test)]
mod e2e_tests;

pub use app::App;

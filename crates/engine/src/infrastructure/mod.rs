//! Infrastructure layer - ports and the stores that implement them.

pub mod cache;
pub mod memory;
pub mod ports;
pub mod sqlite;

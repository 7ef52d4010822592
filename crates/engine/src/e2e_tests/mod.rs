//! Router-level tests.
//!
//! Each test builds a complete [`App`](crate::App) over a fresh store and
//! drives it through `tower::ServiceExt::oneshot` against the production
//! router.

mod e2e_helpers;

pub use e2e_helpers::*;

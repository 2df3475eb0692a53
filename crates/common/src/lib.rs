//! Shared runtime helpers for the site store workspace.
//!
//! - `utils::logging`: tracing subscriber setup used by binaries.
//! - `env`: startup sanity checks for the local data directory.

pub mod env;
pub mod utils;

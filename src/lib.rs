//! economy-sync — per-world economy balance reconciliation.
//!
//! Library crate exposing all modules for use by integration tests
//! and the demo binary.

pub mod config;
pub mod types;
pub mod economy;
pub mod swap;

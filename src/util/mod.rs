//! Shared utilities

pub mod join_log;
pub mod rate_limit;
pub mod time;

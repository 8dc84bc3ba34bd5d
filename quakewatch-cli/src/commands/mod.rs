//! CLI command implementations.

pub mod common;
pub mod config;
pub mod nearest;
pub mod watch;

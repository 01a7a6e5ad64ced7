//! Deterministic self-play harness for the strategy crate.

pub mod config;
pub mod logging;
pub mod runner;

//! Headless driver for the melody combat session.
//!
//! Loads a content directory, builds a [`runtime::Session`] and runs a
//! scripted arena fight, streaming every event as one JSON object per line.
//! The `melody-sim` binary is a thin wrapper over [`run_with_config`].
pub mod config;
pub mod scenario;

pub use config::SimConfig;
pub use scenario::{RunSummary, Scenario, build_session, run_with_config};

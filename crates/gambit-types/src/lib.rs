//! Shared domain types for the Gambit project.

pub mod config;
pub mod game;
pub mod metrics;
pub mod time_control;

mod errors;

pub use errors::{GambitError, Result};

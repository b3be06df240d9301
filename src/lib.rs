//! InsightPulse library.
//!
//! This module exports public APIs for testing and extension.

pub mod analyze;
pub mod charts;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod prompt;
pub mod providers;
pub mod report;
pub mod session;
pub mod stats;

//! Deterministic demo metrics and cached locale-aware number formatting for
//! analytics dashboards.

pub mod builders;
pub mod cli;
pub mod config;
pub mod error;
pub mod format;
pub mod report;
pub mod source;
pub mod stats;
pub mod synth;
pub mod views;

//! Campus electricity dashboard: loads per-building meter CSV exports,
//! aggregates consumption by day and week, and writes summary reports,
//! tabular exports and an SVG dashboard.

pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod processors;
pub mod readers;
pub mod utils;
pub mod writers;

pub use config::DashboardConfig;
pub use error::{ProcessingError, Result, SourceError};

//! Core engine for a single-user, local-only personal finance tracker.
//!
//! This crate holds everything below the presentation layer: the SQLite-backed
//! store ([`db::Database`]), input validation ([`validate`]), the aggregation
//! queries that feed dashboards and charts ([`report`]), and the budget
//! evaluator ([`budget`]). The store is constructed once and passed by
//! reference to the read-only modules; all monetary values are exact decimals.

pub mod budget;
pub mod db;
pub mod models;
pub mod period;
pub mod report;
pub mod validate;

use anyhow::{Context, Result};
use std::path::PathBuf;

pub use db::Database;
pub use validate::ValidationError;

/// Default per-user location for the tracker database, creating the data
/// directory if needed.
pub fn default_db_path() -> Result<PathBuf> {
    let proj_dirs = directories::ProjectDirs::from("com", "fintrack", "FinTrack")
        .ok_or_else(|| anyhow::anyhow!("Could not determine data directory"))?;
    let data_dir = proj_dirs.data_dir();
    std::fs::create_dir_all(data_dir)
        .with_context(|| format!("Failed to create data directory: {}", data_dir.display()))?;
    Ok(data_dir.join("fintrack.db"))
}

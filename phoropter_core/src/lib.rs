#![forbid(unsafe_code)]

//! Refraction-state model for a phoropter simulator.
//!
//! This crate provides:
//! - Domain types (eyes, parameters, PD layouts, occlusion, selection)
//! - The bounds table and step rules
//! - The session model and its append-only log
//! - Chart catalog lookup
//! - CSV export and configuration

pub mod types;
pub mod error;
pub mod bounds;
pub mod format;
pub mod catalog;
pub mod config;
pub mod logging;
pub mod log;
pub mod model;
pub mod export;

// Re-export commonly used types
pub use error::{Error, Result};
pub use types::*;
pub use catalog::{lookup_chart, ChartInfo};
pub use config::{Config, Delimiter, ExportConfig, ModelConfig};
pub use format::format_value;
pub use log::{snapshot_log_entry, LogEntry};
pub use model::RefractionStateModel;
pub use export::{export_to_dir, to_csv_string, ExportStatus};

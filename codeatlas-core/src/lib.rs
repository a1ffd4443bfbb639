//! CodeAtlas Core - codebase analysis and spatial layout
//!
//! This crate turns a directory tree into a deterministic 2D map:
//! - [`analyzer`] streams per-file metadata and syntactic dependency edges
//! - [`zones`] assigns every file to one of eight architectural zones
//! - [`layout`] packs each zone's files along an outward square spiral,
//!   sizing zones from their population so they never overlap
//!
//! Rendering, persistence and UI state belong to the host. The core only
//! reads manual positions through the [`overrides::OverrideLookup`] contract.

#![warn(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
)]
#![allow(
    clippy::module_name_repetitions,  // Often necessary for clarity
    clippy::cast_precision_loss,      // Grid indices stay far below 2^52
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_possible_wrap,
)]

pub mod analyzer;
pub mod instrumentation;
pub mod layout;
pub mod models;
pub mod overrides;
pub mod zones;

pub use analyzer::{Analysis, AnalysisSummary, Analyzer, ScanConfig};
pub use instrumentation::{Instrumentation, NoopInstrumentation, TracingInstrumentation};
pub use layout::{Layout, LayoutConfig, LayoutEngine};
pub use models::{CodeFile, DependencyEdge, EdgeKind, Position, Zone, ZoneSummary};
pub use overrides::{NoOverrides, OverrideLookup};
pub use zones::ZoneClassifier;

use serde::{Deserialize, Serialize};
use std::path::Path;

/// Result type used throughout CodeAtlas core
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for CodeAtlas core operations
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Analysis error
    #[error("Analysis error: {0}")]
    Analysis(String),

    /// Utility error
    #[error("Utility error: {0}")]
    Util(#[from] codeatlas_utils::UtilError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Top-level configuration for a scan + layout run
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct AtlasConfig {
    /// Directory walk and extraction settings
    pub scan: ScanConfig,
    /// Zone sizing and spacing settings
    pub layout: LayoutConfig,
}

impl AtlasConfig {
    /// Load a config file (TOML, JSON or YAML) layered over the defaults
    pub fn load(path: &Path) -> Result<Self> {
        let config: Self = codeatlas_utils::config::load_layered(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Reject configurations that would produce degenerate scans or layouts
    pub fn validate(&self) -> Result<()> {
        self.scan.validate()?;
        self.layout.validate()
    }
}

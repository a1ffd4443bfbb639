//! CodeAtlas Utilities - shared plumbing for the analysis crates
//!
//! This crate provides the pieces every CodeAtlas crate leans on:
//! configuration loading, logging initialisation, path normalisation,
//! and the default directory exclusion list used by the scanner.

#![warn(clippy::all, clippy::pedantic, clippy::nursery)]

pub mod config;
pub mod logging;

pub use config::load_layered;
pub use logging::{init_logging, LogLevel, LoggerConfig};

use std::path::{Path, PathBuf};

/// Result type used throughout CodeAtlas utilities
pub type Result<T> = std::result::Result<T, UtilError>;

/// Error types for utility operations
#[derive(Debug, thiserror::Error)]
pub enum UtilError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Directory names that are pruned from every scan.
///
/// Matching is on the exact directory name, never on a substring of the path.
pub fn default_excluded_dirs() -> Vec<String> {
    [
        // Version control
        ".git", ".svn", ".hg",
        // Dependency caches
        "node_modules", "bower_components", "vendor", ".venv", "venv",
        "__pycache__", ".pytest_cache", ".mypy_cache", ".tox",
        // Build output
        "dist", "build", "out", "target", ".next", ".nuxt", "coverage",
        ".cache", ".turbo", ".gradle",
        // Editors
        ".vscode", ".idea",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

/// Normalize a path lexically (`a/./b/../c` becomes `a/c`)
pub fn normalize_path(path: &Path) -> PathBuf {
    path_clean::clean(path)
}

/// Render a root-relative path with `/` separators regardless of platform
pub fn to_slash_path(path: &Path) -> String {
    path.components()
        .filter_map(|component| match component {
            std::path::Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_exclusions_cover_common_caches() {
        let excluded = default_excluded_dirs();
        for name in [".git", "node_modules", "target", "dist", ".idea"] {
            assert!(excluded.iter().any(|e| e == name), "missing {name}");
        }
        assert!(!excluded.iter().any(|e| e == "src"));
    }

    #[test]
    fn test_normalize_path() {
        assert_eq!(normalize_path(Path::new("a/./b/../c")), PathBuf::from("a/c"));
    }

    #[test]
    fn test_to_slash_path() {
        let path: PathBuf = ["src", "services", "user.ts"].iter().collect();
        assert_eq!(to_slash_path(&path), "src/services/user.ts");
        assert_eq!(to_slash_path(Path::new("./lib/x.rs")), "lib/x.rs");
    }
}

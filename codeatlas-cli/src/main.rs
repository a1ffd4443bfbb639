//! CodeAtlas command-line entry point
//!
//! Scans a codebase into a positioned map, classifies paths into zones and
//! edits the manual override document used by layout.

mod overrides;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use codeatlas_core::{
    AnalysisSummary, Analyzer, AtlasConfig, CodeFile, DependencyEdge, Instrumentation,
    LayoutEngine, NoOverrides, OverrideLookup, Position, TracingInstrumentation, ZoneClassifier,
    ZoneSummary,
};
use codeatlas_core::analyzer::fs::LocalFileSystem;
use codeatlas_utils::logging::{init_logging, LogLevel, LoggerConfig};
use overrides::{DebouncedSaver, OverrideStore, DEFAULT_DEBOUNCE_MS};
use serde::Serialize;
use std::collections::BTreeMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

/// Files between progress log lines during a scan
const PROGRESS_EVERY: usize = 500;

#[derive(Parser)]
#[command(name = "codeatlas")]
#[command(about = "CodeAtlas - lay out a codebase as a zoned map")]
#[command(version)]
struct Cli {
    /// Log level (overridden by RUST_LOG)
    #[arg(long, global = true, default_value = "warn", env = "CODEATLAS_LOG")]
    log_level: LogLevel,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Analyze a directory and compute file positions
    Scan {
        /// Root directory to scan
        path: PathBuf,

        /// Configuration file (TOML, JSON or YAML)
        #[arg(short = 'c', long)]
        config: Option<PathBuf>,

        /// Override document with pinned positions
        #[arg(long)]
        overrides: Option<PathBuf>,

        /// Write the report here instead of stdout
        #[arg(short = 'o', long)]
        output: Option<PathBuf>,

        /// Pretty-print the JSON report
        #[arg(long)]
        pretty: bool,

        /// Keep the sampled leading lines of each file in the report
        #[arg(long)]
        include_content: bool,
    },

    /// Print the zone of each root-relative path
    Classify {
        /// Root-relative paths
        #[arg(required = true)]
        paths: Vec<String>,
    },

    /// Pin a file at a manual position
    #[command(allow_negative_numbers = true)]
    Pin {
        /// Override document to edit
        overrides: PathBuf,
        /// File id as reported by `scan`
        file_id: String,
        x: f64,
        z: f64,
    },

    /// Remove a pinned position
    Unpin {
        /// Override document to edit
        overrides: PathBuf,
        /// File id as reported by `scan`
        file_id: String,
    },
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ScanReport {
    root: String,
    generated_at: DateTime<Utc>,
    summary: AnalysisSummary,
    files: Vec<CodeFile>,
    edges: Vec<DependencyEdge>,
    positions: BTreeMap<String, Position>,
    zones: Vec<ZoneSummary>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(LoggerConfig {
        level: cli.log_level,
        ..LoggerConfig::default()
    })
    .context("Failed to initialize logging")?;

    match cli.command {
        Commands::Scan {
            path,
            config,
            overrides,
            output,
            pretty,
            include_content,
        } => {
            scan(
                &path,
                config.as_deref(),
                overrides,
                output.as_deref(),
                pretty,
                include_content,
            )
            .await
        }
        Commands::Classify { paths } => classify(&paths),
        Commands::Pin {
            overrides,
            file_id,
            x,
            z,
        } => pin(overrides, file_id, Position::new(x, z)).await,
        Commands::Unpin { overrides, file_id } => unpin(overrides, &file_id),
    }
}

async fn scan(
    root: &Path,
    config_path: Option<&Path>,
    overrides_path: Option<PathBuf>,
    output: Option<&Path>,
    pretty: bool,
    include_content: bool,
) -> Result<()> {
    let config = match config_path {
        Some(path) => AtlasConfig::load(path)
            .with_context(|| format!("Failed to load config {}", path.display()))?,
        None => AtlasConfig::default(),
    };

    let overrides: Arc<dyn OverrideLookup> = match overrides_path {
        Some(path) => {
            let store = OverrideStore::load(path).context("Failed to load overrides")?;
            if !store.is_empty() {
                info!("Loaded {} pinned positions", store.len());
            }
            Arc::new(store)
        }
        None => Arc::new(NoOverrides),
    };

    let instrumentation: Arc<dyn Instrumentation> = Arc::new(TracingInstrumentation);
    let analyzer = Analyzer::new(
        Arc::new(LocalFileSystem),
        config.scan.clone(),
        Arc::clone(&instrumentation),
    )?;
    let engine = LayoutEngine::new(config.layout.clone(), overrides, instrumentation)?;

    let mut files = Vec::new();
    let mut edges = Vec::new();
    let summary = analyzer
        .analyze_with(
            root,
            |file| {
                let mut file = file.clone();
                if !include_content {
                    file.content.clear();
                }
                files.push(file);
                if files.len() % PROGRESS_EVERY == 0 {
                    info!("Analyzed {} files", files.len());
                }
            },
            |resolved| edges = resolved,
        )
        .await
        .with_context(|| format!("Failed to scan {}", root.display()))?;

    info!(
        "Scan complete: {} files, {} skipped, {} edges",
        summary.files_analyzed, summary.files_skipped, summary.edges
    );

    let (positions, zones) = engine.compute_positions(&files).into_parts();
    let report = ScanReport {
        root: root.display().to_string(),
        generated_at: Utc::now(),
        summary,
        files,
        edges,
        positions,
        zones,
    };

    let json = if pretty {
        serde_json::to_string_pretty(&report)?
    } else {
        serde_json::to_string(&report)?
    };

    match output {
        Some(path) => {
            std::fs::write(path, json + "\n")
                .with_context(|| format!("Failed to write report {}", path.display()))?;
            info!("Report written to {}", path.display());
        }
        None => {
            let mut stdout = std::io::stdout().lock();
            writeln!(stdout, "{json}")?;
        }
    }
    Ok(())
}

fn classify(paths: &[String]) -> Result<()> {
    let classifier = ZoneClassifier::new();
    let mut stdout = std::io::stdout().lock();
    for path in paths {
        writeln!(stdout, "{}\t{}", path, classifier.zone_for_path(path))?;
    }
    Ok(())
}

async fn pin(overrides: PathBuf, file_id: String, position: Position) -> Result<()> {
    let store = OverrideStore::load(overrides).context("Failed to load overrides")?;
    let saver = DebouncedSaver::spawn(store, DEFAULT_DEBOUNCE_MS);
    saver.set(file_id.clone(), position)?;
    let store = saver.shutdown().await.context("Failed to save overrides")?;

    if let Some(saved) = store.get(&file_id) {
        println!("{}\t{}\t{}", file_id, saved.x, saved.z);
    }
    Ok(())
}

fn unpin(overrides: PathBuf, file_id: &str) -> Result<()> {
    let mut store = OverrideStore::load(overrides).context("Failed to load overrides")?;
    if store.remove(file_id).is_none() {
        eprintln!("{file_id} was not pinned");
        return Ok(());
    }
    store.save().context("Failed to save overrides")?;
    Ok(())
}

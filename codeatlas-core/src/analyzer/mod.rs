//! Directory scanner and per-file analysis
//!
//! The [`Analyzer`] walks a tree through a caller-supplied [`FileSystem`],
//! streams each [`CodeFile`] as soon as it is built, and reports the resolved
//! dependency edges once the whole tree is known. The walk runs on the
//! caller's task and yields back to the scheduler every few files; files are
//! never read concurrently.

pub mod fs;
pub mod imports;
pub mod language;
pub mod metrics;
pub mod resolver;

pub use fs::{EntryKind, FileStat, FileSystem, LocalFileSystem};
pub use imports::extract_dependencies;
pub use language::{ImportSyntax, Language};
pub use metrics::complexity;
pub use resolver::resolve_dependencies;

use crate::instrumentation::{self, Instrumentation, Timer};
use crate::models::{CodeFile, DependencyEdge};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Directory walk and extraction settings
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ScanConfig {
    /// Lines kept in [`CodeFile::content`]
    pub sample_lines: usize,
    /// Leading lines searched for dependency declarations
    pub dependency_scan_lines: usize,
    /// Files processed between voluntary yields to the scheduler
    pub yield_every: usize,
    /// Directory names pruned from the walk
    pub excluded_dirs: Vec<String>,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            sample_lines: 100,
            dependency_scan_lines: 50,
            yield_every: 8,
            excluded_dirs: codeatlas_utils::default_excluded_dirs(),
        }
    }
}

impl ScanConfig {
    pub fn validate(&self) -> Result<()> {
        if self.yield_every == 0 {
            return Err(Error::Config("scan.yield_every must be at least 1".to_string()));
        }
        Ok(())
    }
}

/// Counters reported at the end of a scan
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisSummary {
    pub files_analyzed: usize,
    pub files_skipped: usize,
    pub directories_pruned: usize,
    pub directories_skipped: usize,
    pub edges: usize,
}

/// Everything a collected (non-streaming) scan produces
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analysis {
    pub files: Vec<CodeFile>,
    pub edges: Vec<DependencyEdge>,
    pub summary: AnalysisSummary,
}

pub struct Analyzer {
    fs: Arc<dyn FileSystem>,
    config: ScanConfig,
    excluded: HashSet<String>,
    instrumentation: Arc<dyn Instrumentation>,
}

impl Analyzer {
    pub fn new(
        fs: Arc<dyn FileSystem>,
        config: ScanConfig,
        instrumentation: Arc<dyn Instrumentation>,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self::assemble(fs, config, instrumentation))
    }

    /// Analyzer over the local disk with default settings and no instrumentation
    pub fn local() -> Self {
        Self::assemble(
            Arc::new(LocalFileSystem),
            ScanConfig::default(),
            instrumentation::noop(),
        )
    }

    fn assemble(
        fs: Arc<dyn FileSystem>,
        config: ScanConfig,
        instrumentation: Arc<dyn Instrumentation>,
    ) -> Self {
        let excluded = config.excluded_dirs.iter().cloned().collect();
        Self {
            fs,
            config,
            excluded,
            instrumentation,
        }
    }

    pub fn config(&self) -> &ScanConfig {
        &self.config
    }

    /// Scan `root`, streaming each file to `on_file` and the resolved edges
    /// to `on_dependencies` once every file is known.
    ///
    /// Unreadable entries are logged and skipped. Only an unusable root is an
    /// error, in which case neither callback runs.
    pub async fn analyze_with<F, D>(
        &self,
        root: &Path,
        on_file: F,
        on_dependencies: D,
    ) -> Result<AnalysisSummary>
    where
        F: FnMut(&CodeFile),
        D: FnOnce(Vec<DependencyEdge>),
    {
        let (files, mut summary) = self.walk(root, on_file).await?;
        let edges = self.resolve(&files);
        summary.edges = edges.len();
        on_dependencies(edges);
        Ok(summary)
    }

    /// Scan `root` and collect the results
    pub async fn analyze(&self, root: &Path) -> Result<Analysis> {
        let (files, mut summary) = self.walk(root, |_| {}).await?;
        let edges = self.resolve(&files);
        summary.edges = edges.len();
        Ok(Analysis {
            files,
            edges,
            summary,
        })
    }

    /// Build the record for a single file under `root`
    pub async fn analyze_file(&self, root: &Path, path: &Path) -> Result<CodeFile> {
        let stat = self.fs.stat(path).await?;
        if stat.kind != EntryKind::File {
            return Err(Error::Analysis(format!("{} is not a regular file", path.display())));
        }
        self.build_file(root, path, &stat).await
    }

    async fn walk<F>(&self, root: &Path, mut on_file: F) -> Result<(Vec<CodeFile>, AnalysisSummary)>
    where
        F: FnMut(&CodeFile),
    {
        let timer = Timer::start(self.instrumentation.as_ref(), "analyzer.scan");
        let root = codeatlas_utils::normalize_path(root);

        let root_stat = self.fs.stat(&root).await.map_err(|e| {
            Error::Config(format!("Cannot access scan root {}: {}", root.display(), e))
        })?;
        if root_stat.kind != EntryKind::Directory {
            return Err(Error::Config(format!(
                "Scan root is not a directory: {}",
                root.display()
            )));
        }
        let root_entries = self.sorted_children(&root).await.map_err(|e| {
            Error::Config(format!("Cannot read scan root {}: {}", root.display(), e))
        })?;

        tracing::info!("Scanning {}", root.display());

        let mut summary = AnalysisSummary::default();
        let mut files = Vec::new();
        let mut seen_ids = HashSet::new();
        let mut visited = 0usize;
        let mut stack = vec![root_entries.into_iter()];

        loop {
            let next = match stack.last_mut() {
                Some(entries) => entries.next(),
                None => break,
            };
            let Some(path) = next else {
                stack.pop();
                continue;
            };

            let stat = match self.fs.stat(&path).await {
                Ok(stat) => stat,
                Err(e) => {
                    tracing::warn!("Skipping {}: {}", path.display(), e);
                    summary.files_skipped += 1;
                    continue;
                }
            };

            match stat.kind {
                EntryKind::Directory => {
                    if self.is_excluded(&path) {
                        tracing::debug!("Pruned {}", path.display());
                        summary.directories_pruned += 1;
                        continue;
                    }
                    match self.sorted_children(&path).await {
                        Ok(children) => stack.push(children.into_iter()),
                        Err(e) => {
                            tracing::warn!("Skipping directory {}: {}", path.display(), e);
                            summary.directories_skipped += 1;
                        }
                    }
                }
                EntryKind::File => {
                    match self.build_file(&root, &path, &stat).await {
                        Ok(file) => {
                            if !seen_ids.insert(file.id.clone()) {
                                tracing::warn!(
                                    "File id {} is shared by more than one path (latest: {})",
                                    file.id,
                                    file.relative_path
                                );
                            }
                            on_file(&file);
                            files.push(file);
                            summary.files_analyzed += 1;
                        }
                        Err(e) => {
                            tracing::warn!("Skipping {}: {}", path.display(), e);
                            summary.files_skipped += 1;
                        }
                    }

                    visited += 1;
                    if visited % self.config.yield_every == 0 {
                        tokio::task::yield_now().await;
                    }
                }
                EntryKind::Other => {
                    tracing::trace!("Ignoring non-regular entry {}", path.display());
                }
            }
        }

        tracing::info!(
            "Scanned {} files ({} skipped, {} directories pruned)",
            summary.files_analyzed,
            summary.files_skipped,
            summary.directories_pruned
        );
        timer.finish(files.len());
        Ok((files, summary))
    }

    fn resolve(&self, files: &[CodeFile]) -> Vec<DependencyEdge> {
        let timer = Timer::start(self.instrumentation.as_ref(), "analyzer.resolve");
        let edges = resolve_dependencies(files);
        tracing::debug!("Resolved {} dependency edges", edges.len());
        timer.finish(edges.len());
        edges
    }

    async fn sorted_children(&self, dir: &Path) -> std::io::Result<Vec<PathBuf>> {
        let mut children = self.fs.read_dir(dir).await?;
        children.sort();
        Ok(children)
    }

    fn is_excluded(&self, dir: &Path) -> bool {
        dir.file_name()
            .and_then(|name| name.to_str())
            .is_some_and(|name| self.excluded.contains(name))
    }

    async fn build_file(&self, root: &Path, path: &Path, stat: &FileStat) -> Result<CodeFile> {
        let bytes = self.fs.read_file(path).await?;
        let content = String::from_utf8(bytes)
            .map_err(|_| Error::Analysis(format!("{} is not valid UTF-8", path.display())))?;

        let relative = path.strip_prefix(root).unwrap_or(path);
        let relative_path = codeatlas_utils::to_slash_path(relative);
        let file_name = relative_path.rsplit('/').next().unwrap_or(&relative_path);
        let language = Language::from_file_name(file_name);

        let lines: Vec<&str> = content.lines().collect();
        let sample_end = lines.len().min(self.config.sample_lines);
        let scan_end = lines.len().min(self.config.dependency_scan_lines);

        let (dependencies, complexity) = match language.import_syntax() {
            Some(syntax) => (
                extract_dependencies(syntax, &lines[..scan_end]),
                Some(complexity(&content)),
            ),
            None => (Vec::new(), None),
        };

        Ok(CodeFile {
            id: CodeFile::id_for(&relative_path),
            file_path: path.to_string_lossy().to_string(),
            language: language.tag().to_string(),
            size: stat.size,
            lines: lines.len(),
            dependencies,
            complexity,
            last_modified: stat.modified,
            content: lines[..sample_end].join("\n"),
            relative_path,
        })
    }
}

//! File-backed store for manually pinned positions.
//!
//! The on-disk document is `{"version": 1, "overrides": {fileId: {"x", "z"}}}`
//! with keys in sorted order and coordinates rounded to three decimals.

use codeatlas_core::overrides::round_coordinate;
use codeatlas_core::{OverrideLookup, Position};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Document version written by this store
pub const OVERRIDE_VERSION: u32 = 1;

/// Default quiet period before a debounced save hits the disk
pub const DEFAULT_DEBOUNCE_MS: u64 = 500;

#[derive(Debug, thiserror::Error)]
pub enum OverrideError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Malformed override document {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Unsupported override document version {found} in {path} (expected 1)")]
    UnsupportedVersion { path: PathBuf, found: u32 },

    #[error("Debounced saver stopped unexpectedly: {0}")]
    Saver(String),
}

#[derive(Debug, Serialize, Deserialize)]
struct OverrideDocument {
    version: u32,
    #[serde(default)]
    overrides: BTreeMap<String, Position>,
}

/// Pinned positions keyed by file id, bound to a JSON file
#[derive(Debug, Clone)]
pub struct OverrideStore {
    path: PathBuf,
    overrides: BTreeMap<String, Position>,
}

impl OverrideStore {
    /// Open the document at `path`. A missing file yields an empty store.
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, OverrideError> {
        let path = path.into();
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No override document at {}, starting empty", path.display());
                return Ok(Self {
                    path,
                    overrides: BTreeMap::new(),
                });
            }
            Err(source) => return Err(OverrideError::Io { path, source }),
        };

        let document: OverrideDocument = match serde_json::from_str(&content) {
            Ok(document) => document,
            Err(source) => return Err(OverrideError::Json { path, source }),
        };
        if document.version != OVERRIDE_VERSION {
            return Err(OverrideError::UnsupportedVersion {
                path,
                found: document.version,
            });
        }

        Ok(Self {
            path,
            overrides: document.overrides,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn len(&self) -> usize {
        self.overrides.len()
    }

    pub fn is_empty(&self) -> bool {
        self.overrides.is_empty()
    }

    pub fn get(&self, file_id: &str) -> Option<Position> {
        self.overrides.get(file_id).copied()
    }

    /// Pin `file_id` at `position`, rounded to three decimals
    pub fn set(&mut self, file_id: impl Into<String>, position: Position) {
        let rounded = Position::new(round_coordinate(position.x), round_coordinate(position.z));
        self.overrides.insert(file_id.into(), rounded);
    }

    /// Unpin `file_id`, returning its previous position
    pub fn remove(&mut self, file_id: &str) -> Option<Position> {
        self.overrides.remove(file_id)
    }

    /// Write the document, replacing the previous file atomically
    pub fn save(&self) -> Result<(), OverrideError> {
        let document = OverrideDocument {
            version: OVERRIDE_VERSION,
            overrides: self
                .overrides
                .iter()
                .map(|(id, pos)| {
                    (
                        id.clone(),
                        Position::new(round_coordinate(pos.x), round_coordinate(pos.z)),
                    )
                })
                .collect(),
        };
        let json = serde_json::to_string_pretty(&document).map_err(|source| OverrideError::Json {
            path: self.path.clone(),
            source,
        })?;

        let io_err = |source| OverrideError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(io_err)?;
        }
        let staging = self.path.with_extension("json.tmp");
        std::fs::write(&staging, json + "\n").map_err(io_err)?;
        std::fs::rename(&staging, &self.path).map_err(io_err)?;

        debug!("Saved {} overrides to {}", self.overrides.len(), self.path.display());
        Ok(())
    }
}

impl OverrideLookup for OverrideStore {
    fn get_override(&self, file_id: &str) -> Option<Position> {
        self.get(file_id)
    }
}

#[derive(Debug)]
enum Update {
    Set(String, Position),
    Remove(String),
}

/// Background writer that coalesces bursts of edits into one save.
///
/// Each update restarts the quiet period; the store is written once no
/// update has arrived for the configured delay, and again on shutdown if
/// anything is still pending.
pub struct DebouncedSaver {
    updates: mpsc::UnboundedSender<Update>,
    worker: JoinHandle<Result<OverrideStore, OverrideError>>,
}

impl DebouncedSaver {
    /// Take ownership of `store` and start the writer task
    pub fn spawn(store: OverrideStore, debounce_ms: u64) -> Self {
        let (updates, receiver) = mpsc::unbounded_channel();
        let delay = Duration::from_millis(debounce_ms);
        let worker = tokio::spawn(run_saver(store, receiver, delay));
        Self { updates, worker }
    }

    pub fn set(&self, file_id: impl Into<String>, position: Position) -> Result<(), OverrideError> {
        self.send(Update::Set(file_id.into(), position))
    }

    pub fn remove(&self, file_id: impl Into<String>) -> Result<(), OverrideError> {
        self.send(Update::Remove(file_id.into()))
    }

    fn send(&self, update: Update) -> Result<(), OverrideError> {
        self.updates
            .send(update)
            .map_err(|e| OverrideError::Saver(format!("update channel closed: {e}")))
    }

    /// Flush pending edits and hand the store back
    pub async fn shutdown(self) -> Result<OverrideStore, OverrideError> {
        drop(self.updates);
        self.worker
            .await
            .map_err(|e| OverrideError::Saver(e.to_string()))?
    }
}

async fn run_saver(
    mut store: OverrideStore,
    mut receiver: mpsc::UnboundedReceiver<Update>,
    delay: Duration,
) -> Result<OverrideStore, OverrideError> {
    let mut pending = 0usize;

    loop {
        let update = if pending == 0 {
            receiver.recv().await
        } else {
            tokio::select! {
                update = receiver.recv() => update,
                () = tokio::time::sleep(delay) => {
                    store.save()?;
                    info!("Saved {} override edits to {}", pending, store.path().display());
                    pending = 0;
                    continue;
                }
            }
        };

        match update {
            Some(Update::Set(id, position)) => store.set(id, position),
            Some(Update::Remove(id)) => {
                store.remove(&id);
            }
            None => break,
        }
        pending += 1;
    }

    if pending > 0 {
        store.save()?;
        info!("Saved {} override edits to {}", pending, store.path().display());
    }
    Ok(store)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = OverrideStore::load(dir.path().join("overrides.json")).unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn test_save_rounds_and_sorts() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.json");

        let mut store = OverrideStore::load(&path).unwrap();
        store.set("src_z_ts", Position::new(1.23456, -7.0));
        store.set("src_a_ts", Position::new(0.0004, 2.5));
        store.save().unwrap();

        let raw = std::fs::read_to_string(&path).unwrap();
        let a = raw.find("src_a_ts").unwrap();
        let z = raw.find("src_z_ts").unwrap();
        assert!(a < z);
        assert!(raw.contains("1.235"));
        assert!(!raw.contains("1.23456"));

        let reloaded = OverrideStore::load(&path).unwrap();
        assert_eq!(reloaded.get("src_z_ts"), Some(Position::new(1.235, -7.0)));
        assert_eq!(reloaded.get("src_a_ts"), Some(Position::new(0.0, 2.5)));
        assert_eq!(reloaded.get_override("src_a_ts"), reloaded.get("src_a_ts"));
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().unwrap();
        let mut store = OverrideStore::load(dir.path().join("o.json")).unwrap();
        store.set("a", Position::new(1.0, 1.0));
        assert_eq!(store.remove("a"), Some(Position::new(1.0, 1.0)));
        assert_eq!(store.remove("a"), None);
        assert!(store.is_empty());
    }

    #[test]
    fn test_rejects_unknown_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, r#"{"version": 2, "overrides": {}}"#).unwrap();

        assert!(matches!(
            OverrideStore::load(&path),
            Err(OverrideError::UnsupportedVersion { found: 2, .. })
        ));
    }

    #[test]
    fn test_rejects_malformed_document() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        std::fs::write(&path, "{ not json").unwrap();

        assert!(matches!(OverrideStore::load(&path), Err(OverrideError::Json { .. })));
    }

    #[tokio::test]
    async fn test_debounced_saver_coalesces_burst() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        let store = OverrideStore::load(&path).unwrap();

        let saver = DebouncedSaver::spawn(store, 50);
        saver.set("a", Position::new(1.0, 2.0)).unwrap();
        saver.set("b", Position::new(3.0, 4.0)).unwrap();
        saver.remove("a").unwrap();
        assert!(!path.exists());

        tokio::time::sleep(Duration::from_millis(400)).await;
        let on_disk = OverrideStore::load(&path).unwrap();
        assert_eq!(on_disk.len(), 1);
        assert_eq!(on_disk.get("b"), Some(Position::new(3.0, 4.0)));

        let store = saver.shutdown().await.unwrap();
        assert_eq!(store.len(), 1);
    }

    #[tokio::test]
    async fn test_shutdown_flushes_pending_edits() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("overrides.json");
        let store = OverrideStore::load(&path).unwrap();

        let saver = DebouncedSaver::spawn(store, 60_000);
        saver.set("src_main_rs", Position::new(-1.5, 0.25)).unwrap();
        saver.shutdown().await.unwrap();

        let on_disk = OverrideStore::load(&path).unwrap();
        assert_eq!(on_disk.get("src_main_rs"), Some(Position::new(-1.5, 0.25)));
    }
}

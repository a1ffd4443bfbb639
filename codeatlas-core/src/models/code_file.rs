use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One analyzed file from a scan pass.
///
/// Built once by the analyzer and never mutated afterwards. `id` is the
/// identity used by edges, positions and overrides.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CodeFile {
    /// Sanitized root-relative path, see [`CodeFile::id_for`]
    pub id: String,
    /// Absolute path as seen by the filesystem capability
    pub file_path: String,
    /// Root-relative path with `/` separators
    pub relative_path: String,
    /// Language tag from the extension registry
    pub language: String,
    /// Size in bytes
    pub size: u64,
    /// Number of lines in the file
    pub lines: usize,
    /// Raw, unresolved dependency targets in first-seen order
    pub dependencies: Vec<String>,
    /// Heuristic complexity score, `None` for non-structural languages
    pub complexity: Option<u32>,
    pub last_modified: Option<DateTime<Utc>>,
    /// Leading lines of the file
    pub content: String,
}

impl CodeFile {
    /// Derive a file id from a root-relative path.
    ///
    /// Every character outside `[A-Za-z0-9]` becomes `_`. Distinct paths can
    /// collide (`a-b.ts` and `a_b.ts`); the analyzer warns when that happens.
    pub fn id_for(relative_path: &str) -> String {
        relative_path
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
            .collect()
    }

    /// File name without directories
    pub fn file_name(&self) -> &str {
        self.relative_path
            .rsplit('/')
            .next()
            .unwrap_or(&self.relative_path)
    }

    /// File name without its last extension (`user.service.ts` -> `user.service`)
    pub fn file_stem(&self) -> &str {
        let name = self.file_name();
        match name.rfind('.') {
            Some(0) | None => name,
            Some(idx) => &name[..idx],
        }
    }
}

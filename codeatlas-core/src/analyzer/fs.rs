//! Filesystem capability handed to the analyzer by its caller

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use std::io;
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Directory,
    /// Symlinks, sockets, devices; never followed or read
    Other,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileStat {
    pub kind: EntryKind,
    pub size: u64,
    pub modified: Option<DateTime<Utc>>,
}

/// The operations the directory walk needs
#[async_trait]
pub trait FileSystem: Send + Sync {
    /// Paths of the direct children of `dir`, in any order
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>>;

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>>;

    /// Metadata without following symlinks
    async fn stat(&self, path: &Path) -> io::Result<FileStat>;
}

/// [`FileSystem`] backed by the local disk through `tokio::fs`
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

#[async_trait]
impl FileSystem for LocalFileSystem {
    async fn read_dir(&self, dir: &Path) -> io::Result<Vec<PathBuf>> {
        let mut entries = tokio::fs::read_dir(dir).await?;
        let mut paths = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            paths.push(entry.path());
        }
        Ok(paths)
    }

    async fn read_file(&self, path: &Path) -> io::Result<Vec<u8>> {
        tokio::fs::read(path).await
    }

    async fn stat(&self, path: &Path) -> io::Result<FileStat> {
        let meta = tokio::fs::symlink_metadata(path).await?;
        let kind = if meta.file_type().is_symlink() {
            EntryKind::Other
        } else if meta.is_dir() {
            EntryKind::Directory
        } else if meta.is_file() {
            EntryKind::File
        } else {
            EntryKind::Other
        };
        let modified = meta.modified().ok().map(DateTime::<Utc>::from);
        Ok(FileStat {
            kind,
            size: meta.len(),
            modified,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_local_stat_and_read() -> io::Result<()> {
        let dir = tempdir()?;
        let file = dir.path().join("a.txt");
        std::fs::write(&file, "hello")?;
        std::fs::create_dir(dir.path().join("sub"))?;

        let fs = LocalFileSystem;
        let stat = fs.stat(&file).await?;
        assert_eq!(stat.kind, EntryKind::File);
        assert_eq!(stat.size, 5);
        assert!(stat.modified.is_some());

        assert_eq!(fs.stat(&dir.path().join("sub")).await?.kind, EntryKind::Directory);
        assert_eq!(fs.read_file(&file).await?, b"hello");

        let mut children = fs.read_dir(dir.path()).await?;
        children.sort();
        assert_eq!(children, vec![file, dir.path().join("sub")]);
        Ok(())
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinks_are_other() -> io::Result<()> {
        let dir = tempdir()?;
        std::fs::create_dir(dir.path().join("real"))?;
        std::os::unix::fs::symlink(dir.path().join("real"), dir.path().join("link"))?;

        let stat = LocalFileSystem.stat(&dir.path().join("link")).await?;
        assert_eq!(stat.kind, EntryKind::Other);
        Ok(())
    }
}

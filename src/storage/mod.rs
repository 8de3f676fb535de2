//! Clip storage
//!
//! A clip store is a single directory holding one audio file per clip. There
//! is no manifest: the clip list is rebuilt by enumerating the directory.

mod fs;

pub use fs::FsClipStore;

use anyhow::Result;
use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};

/// A file found in the clip directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredBlob {
    pub location: PathBuf,
    pub file_name: String,
    /// Modification time reported by storage
    pub modified: DateTime<Utc>,
}

/// Backend trait for clip storage operations.
#[async_trait::async_trait]
pub trait ClipStore: Send + Sync {
    /// Directory that holds the clips
    fn root(&self) -> &Path;

    /// Create the clip directory if it is missing
    async fn ensure_root(&self) -> Result<()>;

    /// Enumerate clips with the given extension (without the dot)
    async fn list(&self, extension: &str) -> Result<Vec<StoredBlob>>;

    /// Existence probe
    async fn exists(&self, location: &Path) -> Result<bool>;

    /// Move a blob; the target must not exist
    async fn relocate(&self, from: &Path, to: &Path) -> Result<()>;

    /// Delete a blob
    async fn remove(&self, location: &Path) -> Result<()>;

    /// Location of `file_name` inside the clip directory
    fn location_for(&self, file_name: &str) -> PathBuf {
        self.root().join(file_name)
    }
}

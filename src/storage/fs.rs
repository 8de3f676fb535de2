use anyhow::{bail, Context, Result};
use chrono::{DateTime, Utc};
use futures::future::join_all;
use std::io;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, warn};

use super::{ClipStore, StoredBlob};

/// Clip store backed by a local directory
#[derive(Debug, Clone)]
pub struct FsClipStore {
    root: PathBuf,
}

impl FsClipStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    async fn describe(location: PathBuf) -> Result<StoredBlob> {
        let metadata = fs::metadata(&location)
            .await
            .with_context(|| format!("Failed to stat {}", location.display()))?;

        let modified: DateTime<Utc> = metadata
            .modified()
            .context("Modification time unavailable")?
            .into();

        let file_name = location
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        Ok(StoredBlob {
            location,
            file_name,
            modified,
        })
    }
}

#[async_trait::async_trait]
impl ClipStore for FsClipStore {
    fn root(&self) -> &Path {
        &self.root
    }

    async fn ensure_root(&self) -> Result<()> {
        if fs::try_exists(&self.root).await.unwrap_or(false) {
            return Ok(());
        }

        info!("Creating clip directory: {}", self.root.display());
        fs::create_dir_all(&self.root)
            .await
            .with_context(|| format!("Failed to create clip directory {}", self.root.display()))
    }

    async fn list(&self, extension: &str) -> Result<Vec<StoredBlob>> {
        let mut entries = fs::read_dir(&self.root)
            .await
            .with_context(|| format!("Failed to read clip directory {}", self.root.display()))?;

        let mut locations = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();
            let matches = path
                .extension()
                .and_then(|e| e.to_str())
                .is_some_and(|e| e.eq_ignore_ascii_case(extension));
            if matches && entry.file_type().await?.is_file() {
                locations.push(path);
            }
        }

        let blobs = join_all(locations.into_iter().map(Self::describe))
            .await
            .into_iter()
            .collect::<Result<Vec<_>>>()?;

        debug!("Found {} clips in {}", blobs.len(), self.root.display());

        Ok(blobs)
    }

    async fn exists(&self, location: &Path) -> Result<bool> {
        fs::try_exists(location)
            .await
            .with_context(|| format!("Failed to probe {}", location.display()))
    }

    async fn relocate(&self, from: &Path, to: &Path) -> Result<()> {
        if self.exists(to).await? {
            bail!("Refusing to overwrite {}", to.display());
        }

        match fs::rename(from, to).await {
            Ok(()) => {}
            // Staging area may live on another filesystem
            Err(e) if e.kind() == io::ErrorKind::CrossesDevices => {
                debug!(
                    "{} and {} are on different filesystems, copying",
                    from.display(),
                    to.display()
                );
                copy_across(from, to).await?;
            }
            Err(e) => {
                return Err(e).with_context(|| {
                    format!("Failed to move {} to {}", from.display(), to.display())
                })
            }
        }

        debug!("Moved {} -> {}", from.display(), to.display());
        Ok(())
    }

    async fn remove(&self, location: &Path) -> Result<()> {
        fs::remove_file(location)
            .await
            .with_context(|| format!("Failed to delete {}", location.display()))
    }
}

/// Copy then remove the source; the copy is rolled back if the source stays
async fn copy_across(from: &Path, to: &Path) -> Result<()> {
    fs::copy(from, to)
        .await
        .with_context(|| format!("Failed to copy {} to {}", from.display(), to.display()))?;

    if let Err(e) = fs::remove_file(from).await {
        if let Err(cleanup) = fs::remove_file(to).await {
            warn!("Failed to roll back copy {}: {}", to.display(), cleanup);
        }
        return Err(e).with_context(|| format!("Failed to remove {}", from.display()));
    }

    Ok(())
}

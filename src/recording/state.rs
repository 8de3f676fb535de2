use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::time::Instant;
use uuid::Uuid;

/// Process-local clip identifier, stable across renames
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ClipId(Uuid);

impl ClipId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ClipId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ClipId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// One saved audio recording and its metadata
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Clip {
    pub id: ClipId,
    /// Where the audio file lives
    pub location: PathBuf,
    /// File name including extension, e.g. `recording_1718000000000.mp3`
    pub name: String,
    pub created_at: DateTime<Utc>,
    /// Recorded length in whole seconds (0 when unknown)
    pub duration_secs: u64,
}

impl Clip {
    pub fn new(location: PathBuf, created_at: DateTime<Utc>, duration_secs: u64) -> Self {
        let name = file_name_of(&location);
        Self {
            id: ClipId::new(),
            location,
            name,
            created_at,
            duration_secs,
        }
    }

    /// Name without the extension, used to seed the rename field
    pub fn title(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }

    /// Duration as `mm:ss`
    pub fn formatted_duration(&self) -> String {
        format_elapsed(self.duration_secs)
    }
}

pub(crate) fn file_name_of(location: &Path) -> String {
    location
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Format seconds as zero-padded `mm:ss`; minutes are not wrapped at 60
pub fn format_elapsed(seconds: u64) -> String {
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

/// Recording state for the session manager.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordingState {
    /// Not currently recording.
    #[default]
    Idle,
    /// Capture device is running.
    Recording {
        /// When recording started.
        started_at: Instant,
        /// Unique session ID for log correlation.
        session_id: Uuid,
    },
}

impl RecordingState {
    pub fn is_recording(&self) -> bool {
        matches!(self, Self::Recording { .. })
    }
}

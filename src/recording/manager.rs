use chrono::{DateTime, Utc};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::time::Instant;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

use super::editor::ClipEditor;
use super::state::{file_name_of, Clip, ClipId, RecordingState};
use super::timer::ElapsedTimer;
use crate::audio::{AudioFile, CaptureDevice, PermissionStatus, QualityProfile};
use crate::config::RecorderConfig;
use crate::error::{RecorderError, Result};
use crate::storage::ClipStore;

/// Owns the recording lifecycle, the elapsed counter and the clip list
pub struct RecordingSessionManager {
    store: Arc<dyn ClipStore>,
    capture: Box<dyn CaptureDevice>,
    profile: QualityProfile,
    probe_durations: bool,
    state: RecordingState,
    timer: Option<ElapsedTimer>,
    clips: Vec<Clip>,
    editor: ClipEditor,
}

impl RecordingSessionManager {
    pub fn new(
        store: Arc<dyn ClipStore>,
        capture: Box<dyn CaptureDevice>,
        profile: QualityProfile,
    ) -> Self {
        Self {
            store,
            capture,
            profile,
            probe_durations: false,
            state: RecordingState::Idle,
            timer: None,
            clips: Vec::new(),
            editor: ClipEditor::new(),
        }
    }

    /// Build a manager from the `[recorder]` configuration section
    pub fn from_config(
        config: &RecorderConfig,
        store: Arc<dyn ClipStore>,
        capture: Box<dyn CaptureDevice>,
    ) -> Result<Self> {
        let profile = QualityProfile::by_name(&config.quality_profile)?;
        Ok(Self::new(store, capture, profile).with_duration_probe(config.probe_durations))
    }

    /// Read durations of reloaded clips from their headers instead of
    /// reporting 0
    pub fn with_duration_probe(mut self, enabled: bool) -> Self {
        self.probe_durations = enabled;
        self
    }

    pub fn state(&self) -> RecordingState {
        self.state
    }

    pub fn is_recording(&self) -> bool {
        self.state.is_recording()
    }

    /// Seconds recorded so far in the current session, 0 when idle
    pub fn elapsed_secs(&self) -> u64 {
        self.timer.as_ref().map(ElapsedTimer::elapsed_secs).unwrap_or(0)
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn clip(&self, index: usize) -> Option<&Clip> {
        self.clips.get(index)
    }

    pub fn editor(&self) -> &ClipEditor {
        &self.editor
    }

    pub fn profile(&self) -> &QualityProfile {
        &self.profile
    }

    fn index_of(&self, id: ClipId) -> Option<usize> {
        self.clips.iter().position(|clip| clip.id == id)
    }

    /// Case-insensitive name filter; yields the real list index with each clip
    pub fn search(&self, query: &str) -> Vec<(usize, &Clip)> {
        let needle = query.to_lowercase();
        self.clips
            .iter()
            .enumerate()
            .filter(|(_, clip)| clip.name.to_lowercase().contains(&needle))
            .collect()
    }

    /// Rebuild the clip list from storage
    ///
    /// Creates the clip directory when missing. On failure the current list
    /// is left as it was.
    pub async fn load_clips(&mut self) -> Result<usize> {
        self.store.ensure_root().await.map_err(|e| {
            error!("Failed to prepare clip directory: {:#}", e);
            RecorderError::storage(e)
        })?;

        let blobs = self.store.list(&self.profile.extension).await.map_err(|e| {
            error!("Failed to load recordings: {:#}", e);
            RecorderError::storage(e)
        })?;

        let mut clips = Vec::with_capacity(blobs.len());
        for blob in blobs {
            let duration_secs = if self.probe_durations {
                probe_duration(&blob.location).await
            } else {
                0
            };
            clips.push(Clip::new(blob.location, blob.modified, duration_secs));
        }

        clips.sort_by(|a, b| {
            a.created_at
                .cmp(&b.created_at)
                .then_with(|| a.name.cmp(&b.name))
        });

        info!(
            "Loaded {} recordings from {}",
            clips.len(),
            self.store.root().display()
        );

        self.clips = clips;
        self.editor = ClipEditor::new();

        Ok(self.clips.len())
    }

    /// Ask for the microphone, open the capture device and start counting
    ///
    /// Calling this while already recording only logs a warning.
    pub async fn start_recording(&mut self) -> Result<()> {
        if self.state.is_recording() {
            warn!("Recording already started");
            return Ok(());
        }

        info!("Requesting microphone permission...");
        let status = self.capture.request_permission().await.map_err(|e| {
            error!("Permission request failed: {:#}", e);
            RecorderError::PermissionDenied
        })?;

        if status != PermissionStatus::Granted {
            warn!("Microphone permission not granted: {:?}", status);
            return Err(RecorderError::PermissionDenied);
        }

        self.store.ensure_root().await.map_err(|e| {
            error!("Failed to prepare clip directory: {:#}", e);
            RecorderError::storage(e)
        })?;

        if let Err(e) = self.capture.open(&self.profile).await {
            error!("Failed to open {}: {:#}", self.capture.name(), e);
            return Err(RecorderError::capture(e));
        }

        if let Err(e) = self.capture.start().await {
            error!("Failed to start recording: {:#}", e);
            return Err(RecorderError::capture(e));
        }

        let session_id = Uuid::new_v4();
        self.state = RecordingState::Recording {
            started_at: Instant::now(),
            session_id,
        };
        self.timer = Some(ElapsedTimer::start());

        info!(
            "Recording started: {} ({}, profile {})",
            session_id,
            self.capture.name(),
            self.profile.name
        );

        Ok(())
    }

    /// Finish the capture and append the new clip
    ///
    /// Returns `Ok(None)` when idle. A failure returns to idle without
    /// touching the clip list; the temporary file may be left behind.
    pub async fn stop_recording(&mut self) -> Result<Option<Clip>> {
        let (session_id, started_at) = match self.state {
            RecordingState::Idle => return Ok(None),
            RecordingState::Recording {
                session_id,
                started_at,
            } => (session_id, started_at),
        };

        info!(
            "Stopping recording: {} after {:.1}s",
            session_id,
            started_at.elapsed().as_secs_f64()
        );

        let duration_secs = self.timer.take().map(|mut t| t.cancel()).unwrap_or(0);
        self.state = RecordingState::Idle;

        let temp = self.capture.stop().await.map_err(|e| {
            error!("Failed to stop recording {}: {:#}", session_id, e);
            RecorderError::capture(e)
        })?;

        let created_at = Utc::now();
        let target = self.auto_location(created_at).await?;

        self.store.relocate(&temp, &target).await.map_err(|e| {
            error!("Failed to save recording {}: {:#}", session_id, e);
            RecorderError::storage(e)
        })?;

        let clip = Clip::new(target, created_at, duration_secs);
        info!(
            "Recording saved: {} ({}s)",
            clip.location.display(),
            clip.duration_secs
        );
        self.clips.push(clip.clone());

        Ok(Some(clip))
    }

    /// Stop the capture in progress and throw the audio away
    ///
    /// Used when the recorder screen goes away mid-recording.
    pub async fn abort_recording(&mut self) -> Result<()> {
        let (session_id, started_at) = match self.state {
            RecordingState::Idle => return Ok(()),
            RecordingState::Recording {
                session_id,
                started_at,
            } => (session_id, started_at),
        };

        if let Some(mut timer) = self.timer.take() {
            timer.cancel();
        }
        self.state = RecordingState::Idle;

        let temp = self.capture.stop().await.map_err(|e| {
            error!("Failed to stop recording {}: {:#}", session_id, e);
            RecorderError::capture(e)
        })?;

        if let Err(e) = self.store.remove(&temp).await {
            warn!("Leaving discarded capture at {}: {:#}", temp.display(), e);
        }

        info!(
            "Recording discarded: {} ({:.1}s)",
            session_id,
            started_at.elapsed().as_secs_f64()
        );
        Ok(())
    }

    /// `recording_<unix-ms>.<ext>`, bumped forward until no file has the name
    async fn auto_location(&self, created_at: DateTime<Utc>) -> Result<PathBuf> {
        let mut millis = created_at.timestamp_millis();
        loop {
            let location = self
                .store
                .location_for(&format!("recording_{}.{}", millis, self.profile.extension));
            let taken = self.store.exists(&location).await.map_err(|e| {
                error!("Failed to probe {}: {:#}", location.display(), e);
                RecorderError::storage(e)
            })?;
            if !taken {
                return Ok(location);
            }
            millis += 1;
        }
    }

    /// `NotFound` when a listed clip's file is gone from storage
    async fn ensure_blob(&self, location: &Path) -> Result<()> {
        let present = self.store.exists(location).await.map_err(|e| {
            error!("Failed to probe {}: {:#}", location.display(), e);
            RecorderError::storage(e)
        })?;

        if !present {
            warn!("Recording file missing: {}", location.display());
            return Err(RecorderError::NotFound {
                target: location.display().to_string(),
            });
        }
        Ok(())
    }

    /// First step of deleting a clip: remember it until confirmed
    pub fn propose_delete(&mut self, index: usize) -> Result<&Clip> {
        let clip = self.clips.get(index).ok_or_else(|| RecorderError::NotFound {
            target: format!("clip #{}", index),
        })?;
        self.editor.propose_delete(clip.id);
        debug!("Delete proposed: {}", clip.name);
        Ok(clip)
    }

    pub fn cancel_delete(&mut self) {
        self.editor.take_pending_delete();
    }

    /// Delete the proposed clip's file, then its list entry
    ///
    /// Returns `Ok(None)` when nothing was proposed. If the file cannot be
    /// removed the list entry is kept.
    pub async fn confirm_delete(&mut self) -> Result<Option<Clip>> {
        let Some(id) = self.editor.take_pending_delete() else {
            return Ok(None);
        };

        let index = self.index_of(id).ok_or_else(|| RecorderError::NotFound {
            target: id.to_string(),
        })?;

        let location = self.clips[index].location.clone();
        self.ensure_blob(&location).await?;

        if let Err(e) = self.store.remove(&location).await {
            error!("Error deleting recording {}: {:#}", location.display(), e);
            return Err(RecorderError::storage(e));
        }

        let removed = self.clips.remove(index);
        self.editor.forget(removed.id);
        info!("Recording deleted: {}", removed.name);

        Ok(Some(removed))
    }

    /// Open the rename field for a clip, seeded with its current title
    pub fn begin_rename(&mut self, index: usize) -> Result<()> {
        let clip = self.clips.get(index).ok_or_else(|| RecorderError::NotFound {
            target: format!("clip #{}", index),
        })?;
        self.editor.begin_rename(clip);
        Ok(())
    }

    pub fn set_rename_candidate(&mut self, candidate: impl Into<String>) {
        self.editor.set_candidate(candidate);
    }

    pub fn cancel_rename(&mut self) {
        self.editor.cancel_rename();
    }

    /// Apply the open rename; a failure leaves the field open
    pub async fn commit_rename(&mut self) -> Result<Option<Clip>> {
        let Some(edit) = self.editor.rename().cloned() else {
            return Ok(None);
        };

        let index = self.index_of(edit.clip_id).ok_or_else(|| RecorderError::NotFound {
            target: edit.clip_id.to_string(),
        })?;

        self.rename_clip(index, &edit.candidate).await.map(Some)
    }

    /// Move a clip's file to `<candidate>.<ext>` and update it in place
    ///
    /// Surrounding whitespace is dropped from the candidate.
    pub async fn rename_clip(&mut self, index: usize, candidate: &str) -> Result<Clip> {
        let candidate = candidate.trim();
        validate_name(candidate)?;

        let clip = self.clips.get(index).ok_or_else(|| RecorderError::NotFound {
            target: format!("clip #{}", index),
        })?;

        let extension = clip
            .location
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or(self.profile.extension.as_str());
        let target = self
            .store
            .location_for(&format!("{}.{}", candidate, extension));

        self.ensure_blob(&clip.location).await?;

        let taken = self.store.exists(&target).await.map_err(|e| {
            error!("Failed to probe {}: {:#}", target.display(), e);
            RecorderError::storage(e)
        })?;
        if taken {
            warn!("Rename rejected, {} already exists", target.display());
            return Err(RecorderError::NameConflict {
                name: candidate.to_string(),
            });
        }

        if let Err(e) = self.store.relocate(&clip.location, &target).await {
            error!("Error renaming file {}: {:#}", clip.location.display(), e);
            return Err(RecorderError::storage(e));
        }

        let clip = &mut self.clips[index];
        info!("Recording renamed: {} -> {}", clip.name, file_name_of(&target));
        clip.name = file_name_of(&target);
        clip.location = target;

        let renamed = clip.clone();
        if self.editor.is_renaming(renamed.id) {
            self.editor.cancel_rename();
        }

        Ok(renamed)
    }
}

fn validate_name(candidate: &str) -> Result<()> {
    let invalid = candidate.trim().is_empty()
        || candidate == "."
        || candidate == ".."
        || candidate.contains(['/', '\\']);

    if invalid {
        return Err(RecorderError::InvalidName {
            name: candidate.to_string(),
        });
    }
    Ok(())
}

async fn probe_duration(location: &Path) -> u64 {
    let path = location.to_path_buf();
    match tokio::task::spawn_blocking(move || AudioFile::probe(&path)).await {
        Ok(Ok(audio)) => audio.whole_seconds(),
        Ok(Err(e)) => {
            debug!("Duration unavailable for {}: {:#}", location.display(), e);
            0
        }
        Err(e) => {
            warn!("Duration probe panicked for {}: {}", location.display(), e);
            0
        }
    }
}

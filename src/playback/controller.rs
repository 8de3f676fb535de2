use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::{debug, error, info, warn};

use super::speed::PlaybackSpeed;
use crate::audio::{PlaybackDevice, PlayerHandle};
use crate::error::{RecorderError, Result};
use crate::recording::{Clip, ClipId};

/// Per-clip playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlaybackState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// State of the single player slot, shared with completion callbacks
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaybackStatus {
    pub clip_id: ClipId,
    /// Bumped for every handle so late callbacks from old handles are ignored
    pub generation: u64,
    pub state: PlaybackState,
}

struct ActiveHandle {
    clip_id: ClipId,
    location: PathBuf,
    handle: Box<dyn PlayerHandle>,
}

/// Owns at most one player handle
///
/// Every clip other than the one in the slot is `Stopped`. Loading a clip
/// releases the previous handle first.
pub struct PlaybackController {
    device: Arc<dyn PlaybackDevice>,
    speed: PlaybackSpeed,
    active: Option<ActiveHandle>,
    status: Arc<watch::Sender<Option<PlaybackStatus>>>,
    next_generation: u64,
}

impl PlaybackController {
    pub fn new(device: Arc<dyn PlaybackDevice>) -> Self {
        let (status, _) = watch::channel(None);
        Self {
            device,
            speed: PlaybackSpeed::default(),
            active: None,
            status: Arc::new(status),
            next_generation: 0,
        }
    }

    pub fn with_speed(mut self, speed: PlaybackSpeed) -> Self {
        self.speed = speed;
        self
    }

    pub fn speed(&self) -> PlaybackSpeed {
        self.speed
    }

    /// Watch slot changes, including natural completion
    pub fn subscribe(&self) -> watch::Receiver<Option<PlaybackStatus>> {
        self.status.subscribe()
    }

    pub fn status(&self) -> Option<PlaybackStatus> {
        *self.status.borrow()
    }

    pub fn state(&self, clip_id: ClipId) -> PlaybackState {
        match self.status() {
            Some(status) if status.clip_id == clip_id => status.state,
            _ => PlaybackState::Stopped,
        }
    }

    /// Clip whose handle is loaded, if any
    pub fn active_clip(&self) -> Option<ClipId> {
        self.active.as_ref().map(|active| active.clip_id)
    }

    fn set_state(&self, state: PlaybackState) {
        self.status.send_modify(|status| {
            if let Some(status) = status {
                status.state = state;
            }
        });
    }

    /// Play `clip`, resuming it if paused and stopping any other clip first
    pub async fn play(&mut self, clip: &Clip) -> Result<()> {
        if let Some(status) = self.status().filter(|s| s.clip_id == clip.id) {
            match status.state {
                PlaybackState::Playing => {
                    debug!("{} already playing", clip.name);
                    return Ok(());
                }
                PlaybackState::Paused => return self.resume(clip).await,
                PlaybackState::Stopped => {}
            }
        }

        self.release_active().await;

        let mut handle = self
            .device
            .create_player(&clip.location, self.speed.rate())
            .await
            .map_err(|e| {
                error!("Error loading {}: {:#}", clip.location.display(), e);
                RecorderError::PlaybackFailed {
                    path: clip.location.clone(),
                    reason: e.to_string(),
                }
            })?;

        let generation = self.next_generation;
        self.next_generation += 1;

        let status_tx = Arc::clone(&self.status);
        handle.on_complete(Box::new(move || {
            status_tx.send_if_modified(|status| match status {
                Some(s) if s.generation == generation && s.state == PlaybackState::Playing => {
                    s.state = PlaybackState::Stopped;
                    true
                }
                _ => false,
            });
        }));

        // Marked before starting so an immediate completion is not lost
        self.status.send_replace(Some(PlaybackStatus {
            clip_id: clip.id,
            generation,
            state: PlaybackState::Playing,
        }));

        if let Err(e) = handle.play().await {
            error!("Error playing {}: {:#}", clip.location.display(), e);
            self.status.send_replace(None);
            if let Err(e) = handle.stop().await {
                warn!("Failed to unload player: {:#}", e);
            }
            return Err(RecorderError::PlaybackFailed {
                path: clip.location.clone(),
                reason: e.to_string(),
            });
        }

        info!("Playing {} at {}", clip.name, self.speed);

        self.active = Some(ActiveHandle {
            clip_id: clip.id,
            location: clip.location.clone(),
            handle,
        });

        Ok(())
    }

    async fn resume(&mut self, clip: &Clip) -> Result<()> {
        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        active.handle.play().await.map_err(|e| {
            error!("Error resuming {}: {:#}", active.location.display(), e);
            RecorderError::PlaybackFailed {
                path: active.location.clone(),
                reason: e.to_string(),
            }
        })?;

        self.set_state(PlaybackState::Playing);
        debug!("Resumed {}", clip.name);
        Ok(())
    }

    /// Pause `clip_id`; does nothing unless it is playing
    pub async fn pause(&mut self, clip_id: ClipId) -> Result<()> {
        if self.state(clip_id) != PlaybackState::Playing {
            return Ok(());
        }

        let Some(active) = self.active.as_mut() else {
            return Ok(());
        };

        active.handle.pause().await.map_err(|e| {
            error!("Error pausing {}: {:#}", active.location.display(), e);
            RecorderError::PlaybackFailed {
                path: active.location.clone(),
                reason: e.to_string(),
            }
        })?;

        self.set_state(PlaybackState::Paused);
        debug!("Paused {}", clip_id);
        Ok(())
    }

    /// Change the speed of the loaded handle in place and of later plays
    ///
    /// If the handle rejects the rate the previous speed is kept.
    pub async fn set_speed(&mut self, speed: PlaybackSpeed) -> Result<()> {
        if let Some(active) = self.active.as_mut() {
            active.handle.set_rate(speed.rate()).await.map_err(|e| {
                error!("Error changing playback speed: {:#}", e);
                RecorderError::PlaybackFailed {
                    path: active.location.clone(),
                    reason: e.to_string(),
                }
            })?;
        }

        info!("Playback speed {} -> {}", self.speed, speed);
        self.speed = speed;
        Ok(())
    }

    /// Unload `clip_id` if it owns the slot (e.g. before deleting it)
    pub async fn release(&mut self, clip_id: ClipId) {
        if self.active_clip() == Some(clip_id) {
            self.release_active().await;
        }
    }

    /// Unload whatever is loaded
    pub async fn shutdown(&mut self) {
        self.release_active().await;
    }

    async fn release_active(&mut self) {
        if let Some(mut active) = self.active.take() {
            if let Err(e) = active.handle.stop().await {
                warn!("Failed to unload {}: {:#}", active.location.display(), e);
            }
            debug!("Released player for {}", active.location.display());
        }
        self.status.send_replace(None);
    }
}

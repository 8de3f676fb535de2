use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::RecorderError;

/// Audio sample data (16-bit PCM, interleaved)
#[derive(Debug, Clone)]
pub struct AudioFrame {
    /// Raw audio samples (i16 PCM, interleaved)
    pub samples: Vec<i16>,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels
    pub channels: u16,
    /// Timestamp in milliseconds since capture started
    pub timestamp_ms: u64,
}

/// Named bundle of encoder settings handed to the capture device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityProfile {
    /// Profile name as used in configuration
    pub name: String,
    /// File extension of produced clips, without the dot
    pub extension: String,
    /// Sample rate in Hz
    pub sample_rate: u32,
    /// Number of channels (1 = mono, 2 = stereo)
    pub channels: u16,
    /// Target bit rate in bits per second (ignored by PCM encoders)
    pub bit_rate: u32,
}

impl QualityProfile {
    /// 48kHz stereo at 320kbps, the default for phone recordings
    pub fn high() -> Self {
        Self {
            name: "high".to_string(),
            extension: "mp3".to_string(),
            sample_rate: 48000,
            channels: 2,
            bit_rate: 320_000,
        }
    }

    /// 16kHz mono 16-bit PCM
    pub fn voice() -> Self {
        Self {
            name: "voice".to_string(),
            extension: "wav".to_string(),
            sample_rate: 16000,
            channels: 1,
            bit_rate: 256_000,
        }
    }

    /// Look up a built-in profile by name
    pub fn by_name(name: &str) -> Result<Self, RecorderError> {
        match name {
            "high" => Ok(Self::high()),
            "voice" => Ok(Self::voice()),
            other => Err(RecorderError::InvalidProfile(other.to_string())),
        }
    }
}

impl Default for QualityProfile {
    fn default() -> Self {
        Self::high()
    }
}

/// Outcome of a microphone permission request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
    Undetermined,
}

/// Audio capture device trait
///
/// Platform implementations wrap the OS recorder; `WavCaptureDevice` records
/// PCM frames pushed through a channel.
#[async_trait::async_trait]
pub trait CaptureDevice: Send + Sync {
    /// Ask for microphone access (may prompt the user)
    async fn request_permission(&mut self) -> Result<PermissionStatus>;

    /// Prepare the device for the given encoding
    async fn open(&mut self, profile: &QualityProfile) -> Result<()>;

    /// Start capturing
    async fn start(&mut self) -> Result<()>;

    /// Stop capturing and finalize the produced file
    ///
    /// Returns the location of the temporary blob
    async fn stop(&mut self) -> Result<PathBuf>;

    /// Check if the device is currently capturing
    fn is_capturing(&self) -> bool;

    /// Get device name for logging
    fn name(&self) -> &str;
}

/// Invoked once when playback reaches the end of the clip
pub type CompletionCallback = Box<dyn FnOnce() + Send + 'static>;

/// An open playback stream, exclusively owned by the playback controller
#[async_trait::async_trait]
pub trait PlayerHandle: Send + Sync {
    /// Start or resume playback
    async fn play(&mut self) -> Result<()>;

    /// Suspend playback, keeping position
    async fn pause(&mut self) -> Result<()>;

    /// Change the rate without restarting
    async fn set_rate(&mut self, rate: f32) -> Result<()>;

    /// Stop and unload; the handle is unusable afterwards
    async fn stop(&mut self) -> Result<()>;

    /// Register the natural-completion callback
    ///
    /// Must not fire on pause or stop.
    fn on_complete(&mut self, callback: CompletionCallback);
}

/// Playback device trait
#[async_trait::async_trait]
pub trait PlaybackDevice: Send + Sync {
    /// Load a clip and return a paused player at the given rate
    async fn create_player(&self, location: &Path, rate: f32) -> Result<Box<dyn PlayerHandle>>;

    /// Get device name for logging
    fn name(&self) -> &str;
}

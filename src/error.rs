use std::path::PathBuf;

use thiserror::Error;

use crate::session::AuthErrorKind;

/// Failures surfaced to the user as a one-shot notification.
///
/// Collaborators (storage, capture, playback, auth) report `anyhow` errors;
/// the managers map them into this taxonomy after logging the cause.
#[derive(Error, Debug)]
pub enum RecorderError {
    /// Microphone permission was not granted
    #[error("Permission to access microphone is required")]
    PermissionDenied,

    /// Capture device could not be acquired or finalized
    #[error("Capture device unavailable: {reason}")]
    CaptureUnavailable { reason: String },

    /// Clip directory could not be read or written
    #[error("Storage unavailable: {reason}")]
    StorageUnavailable { reason: String },

    /// Rename target already exists
    #[error("A recording named {name:?} already exists")]
    NameConflict { name: String },

    /// Rename candidate is empty or not a plain file name
    #[error("Invalid recording name {name:?}")]
    InvalidName { name: String },

    /// Delete/rename target is missing
    #[error("Recording not found: {target}")]
    NotFound { target: String },

    /// Auth provider or local credential check rejected the request
    #[error("{}", .0.message())]
    AuthFailure(AuthErrorKind),

    /// Player could not be created or driven
    #[error("Playback failed for {path:?}: {reason}")]
    PlaybackFailed { path: PathBuf, reason: String },

    /// Playback speed outside the supported set
    #[error("Unsupported playback speed {0}x")]
    InvalidSpeed(f32),

    /// Quality profile name not recognised
    #[error("Unknown quality profile {0:?}")]
    InvalidProfile(String),
}

impl RecorderError {
    pub(crate) fn capture(err: impl std::fmt::Display) -> Self {
        Self::CaptureUnavailable {
            reason: err.to_string(),
        }
    }

    pub(crate) fn storage(err: impl std::fmt::Display) -> Self {
        Self::StorageUnavailable {
            reason: err.to_string(),
        }
    }

    /// Short text for the notification shown to the user
    pub fn user_message(&self) -> String {
        match self {
            Self::PermissionDenied => {
                "Permission to access microphone is required!".to_string()
            }
            Self::CaptureUnavailable { .. } => "Failed to start recording".to_string(),
            Self::StorageUnavailable { .. } => "Failed to access saved recordings".to_string(),
            Self::NameConflict { .. } => "A recording with this name already exists".to_string(),
            Self::InvalidName { .. } => "Please enter a valid name".to_string(),
            Self::NotFound { .. } => "Recording no longer exists".to_string(),
            Self::AuthFailure(kind) => kind.message().to_string(),
            Self::PlaybackFailed { .. } => "Failed to play recording".to_string(),
            Self::InvalidSpeed(_) => "Unsupported playback speed".to_string(),
            Self::InvalidProfile(_) => "Unknown recording quality".to_string(),
        }
    }
}

/// Result type alias using [`RecorderError`].
pub type Result<T> = std::result::Result<T, RecorderError>;

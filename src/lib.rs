pub mod audio;
pub mod config;
pub mod error;
pub mod playback;
pub mod recording;
pub mod session;
pub mod storage;

pub use audio::{
    AudioFile, AudioFrame, CaptureDevice, PermissionStatus, PlaybackDevice, PlayerHandle,
    QualityProfile, WavCaptureDevice,
};
pub use config::Config;
pub use error::{RecorderError, Result};
pub use playback::{PlaybackController, PlaybackSpeed, PlaybackState};
pub use recording::{Clip, ClipId, RecordingSessionManager, RecordingState};
pub use session::{AuthErrorKind, AuthProvider, Credentials, ProfileDraft, SessionStore};
pub use storage::{ClipStore, FsClipStore};

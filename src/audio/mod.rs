pub mod backend;
pub mod file;
pub mod wav;

pub use backend::{
    AudioFrame, CaptureDevice, CompletionCallback, PermissionStatus, PlaybackDevice, PlayerHandle,
    QualityProfile,
};
pub use file::AudioFile;
pub use wav::WavCaptureDevice;

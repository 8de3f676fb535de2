//! Recording session management
//!
//! This module provides the `RecordingSessionManager` that manages:
//! - Microphone permission and the capture device lifecycle
//! - The one-second elapsed counter while recording
//! - The clip list rebuilt from the clip directory
//! - Rename and two-step delete of clips

mod editor;
mod manager;
mod state;
mod timer;

pub use editor::{ClipEditor, RenameEdit};
pub use manager::RecordingSessionManager;
pub use state::{format_elapsed, Clip, ClipId, RecordingState};
pub use timer::ElapsedTimer;

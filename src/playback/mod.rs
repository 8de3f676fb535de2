//! Clip playback
//!
//! A single player slot shared by all clips, plus the speed setting that
//! applies to the loaded handle and to later plays.

mod controller;
mod speed;

pub use controller::{PlaybackController, PlaybackState, PlaybackStatus};
pub use speed::PlaybackSpeed;

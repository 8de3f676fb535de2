use anyhow::Result;
use serde::Deserialize;
use std::path::PathBuf;

use crate::playback::PlaybackSpeed;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub recorder: RecorderConfig,
    pub playback: PlaybackConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RecorderConfig {
    /// Directory holding one audio file per clip
    pub recordings_path: PathBuf,
    /// Where capture devices write before the file is moved into place
    pub staging_path: PathBuf,
    /// Built-in quality profile name (`high` or `voice`)
    pub quality_profile: String,
    /// Read durations of reloaded clips from their headers
    pub probe_durations: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PlaybackConfig {
    /// One of 0.5, 1.0, 1.5, 2.0
    pub default_speed: f32,
}

impl PlaybackConfig {
    pub fn speed(&self) -> crate::error::Result<PlaybackSpeed> {
        PlaybackSpeed::try_from(self.default_speed)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            recorder: RecorderConfig {
                recordings_path: PathBuf::from("recordings"),
                staging_path: std::env::temp_dir().join("qk-recorder"),
                quality_profile: "high".to_string(),
                probe_durations: false,
            },
            playback: PlaybackConfig { default_speed: 1.0 },
        }
    }
}

impl Config {
    /// Load `path` (any format the `config` crate detects) over the
    /// built-in defaults, then apply `QK_RECORDER__SECTION__KEY` overrides
    pub fn load(path: &str) -> Result<Self> {
        Self::builder()?
            .add_source(config::File::with_name(path))
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    /// Defaults plus environment overrides, no file
    pub fn from_env() -> Result<Self> {
        Self::builder()?
            .add_source(Self::environment())
            .build()?
            .try_deserialize()
            .map_err(Into::into)
    }

    fn environment() -> config::Environment {
        config::Environment::with_prefix("QK_RECORDER").separator("__")
    }

    fn builder() -> Result<config::ConfigBuilder<config::builder::DefaultState>> {
        let defaults = Self::default();
        let builder = config::Config::builder()
            .set_default(
                "recorder.recordings_path",
                defaults.recorder.recordings_path.display().to_string(),
            )?
            .set_default(
                "recorder.staging_path",
                defaults.recorder.staging_path.display().to_string(),
            )?
            .set_default("recorder.quality_profile", defaults.recorder.quality_profile)?
            .set_default("recorder.probe_durations", defaults.recorder.probe_durations)?
            .set_default("playback.default_speed", defaults.playback.default_speed as f64)?;

        Ok(builder)
    }
}

use anyhow::{Context, Result};
use std::fs::File;
use std::path::Path;
use symphonia::core::formats::FormatOptions;
use symphonia::core::io::MediaSourceStream;
use symphonia::core::meta::MetadataOptions;
use symphonia::core::probe::Hint;
use tracing::debug;

/// Header information of a stored clip
#[derive(Debug, Clone)]
pub struct AudioFile {
    pub path: String,
    pub duration_seconds: f64,
    pub sample_rate: u32,
    pub channels: u16,
}

impl AudioFile {
    /// Read container headers without decoding any audio
    ///
    /// Blocking; call from `spawn_blocking` inside async code.
    pub fn probe(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        let file = File::open(path)
            .with_context(|| format!("Failed to open audio file: {}", path.display()))?;
        let mss = MediaSourceStream::new(Box::new(file), Default::default());

        let mut hint = Hint::new();
        if let Some(ext) = path.extension().and_then(|e| e.to_str()) {
            hint.with_extension(ext);
        }

        let probed = symphonia::default::get_probe()
            .format(&hint, mss, &FormatOptions::default(), &MetadataOptions::default())
            .context("Unsupported audio container")?;

        let track = probed
            .format
            .default_track()
            .context("Audio file has no playable track")?;
        let params = &track.codec_params;

        let sample_rate = params.sample_rate.context("Sample rate missing from header")?;
        let n_frames = params.n_frames.context("Frame count missing from header")?;
        let channels = params.channels.map(|c| c.count() as u16).unwrap_or(1);

        let duration_seconds = match params.time_base {
            Some(time_base) => {
                let time = time_base.calc_time(n_frames);
                time.seconds as f64 + time.frac
            }
            None => n_frames as f64 / sample_rate as f64,
        };

        debug!(
            "Probed {}: {:.1}s, {}Hz, {} channels",
            path.display(),
            duration_seconds,
            sample_rate,
            channels
        );

        Ok(Self {
            path: path.display().to_string(),
            duration_seconds,
            sample_rate,
            channels,
        })
    }

    /// Duration rounded down to whole seconds, as shown in the clip list
    pub fn whole_seconds(&self) -> u64 {
        self.duration_seconds.max(0.0).floor() as u64
    }
}

use anyhow::{bail, Context, Result};
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::backend::{AudioFrame, CaptureDevice, PermissionStatus, QualityProfile};

type WavFileWriter = hound::WavWriter<BufWriter<File>>;

/// Capture device that encodes pushed PCM frames into a WAV file
///
/// Frames are fed through [`WavCaptureDevice::frame_sender`] while capturing.
/// Each capture is written to `<staging_dir>/capture-<uuid>.wav`.
pub struct WavCaptureDevice {
    staging_dir: PathBuf,
    permission: PermissionStatus,
    profile: Option<QualityProfile>,
    frame_tx: Option<mpsc::Sender<AudioFrame>>,
    stop_tx: Option<oneshot::Sender<()>>,
    writer_task: Option<JoinHandle<Result<PathBuf>>>,
}

impl WavCaptureDevice {
    pub fn new(staging_dir: impl Into<PathBuf>) -> Self {
        Self {
            staging_dir: staging_dir.into(),
            permission: PermissionStatus::Granted,
            profile: None,
            frame_tx: None,
            stop_tx: None,
            writer_task: None,
        }
    }

    /// Answer permission requests with `status` instead of granting
    pub fn with_permission(mut self, status: PermissionStatus) -> Self {
        self.permission = status;
        self
    }

    /// Sender for the frames of the capture in progress
    pub fn frame_sender(&self) -> Option<mpsc::Sender<AudioFrame>> {
        self.frame_tx.clone()
    }

    /// Whether `open` accepts this profile
    pub fn supports(profile: &QualityProfile) -> bool {
        profile.extension.eq_ignore_ascii_case("wav")
    }
}

fn write_frame(writer: &mut WavFileWriter, spec: &hound::WavSpec, frame: &AudioFrame) -> Result<usize> {
    if frame.sample_rate != spec.sample_rate || frame.channels != spec.channels {
        warn!(
            "Dropping frame at {}ms: {}Hz/{}ch does not match {}Hz/{}ch",
            frame.timestamp_ms, frame.sample_rate, frame.channels, spec.sample_rate, spec.channels
        );
        return Ok(0);
    }

    for &sample in &frame.samples {
        writer
            .write_sample(sample)
            .context("Failed to write sample to WAV")?;
    }

    Ok(frame.samples.len())
}

#[async_trait::async_trait]
impl CaptureDevice for WavCaptureDevice {
    async fn request_permission(&mut self) -> Result<PermissionStatus> {
        Ok(self.permission)
    }

    async fn open(&mut self, profile: &QualityProfile) -> Result<()> {
        if self.is_capturing() {
            bail!("Capture already in progress");
        }

        if !Self::supports(profile) {
            bail!(
                "{} only encodes wav, profile {} requests {}",
                self.name(),
                profile.name,
                profile.extension
            );
        }

        tokio::fs::create_dir_all(&self.staging_dir)
            .await
            .with_context(|| format!("Failed to create staging directory {:?}", self.staging_dir))?;

        self.profile = Some(profile.clone());
        Ok(())
    }

    async fn start(&mut self) -> Result<()> {
        if self.is_capturing() {
            bail!("Capture already in progress");
        }

        let profile = self.profile.as_ref().context("Device not opened")?;

        let spec = hound::WavSpec {
            channels: profile.channels,
            sample_rate: profile.sample_rate,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };

        let file_path = self
            .staging_dir
            .join(format!("capture-{}.wav", uuid::Uuid::new_v4()));

        let mut writer = hound::WavWriter::create(&file_path, spec)
            .with_context(|| format!("Failed to create WAV file: {:?}", file_path))?;

        let (frame_tx, mut frame_rx) = mpsc::channel::<AudioFrame>(100);
        let (stop_tx, mut stop_rx) = oneshot::channel::<()>();

        info!("Capture started: {}", file_path.display());

        let task = tokio::spawn(async move {
            let mut sample_count = 0usize;

            loop {
                tokio::select! {
                    biased;
                    frame = frame_rx.recv() => match frame {
                        Some(frame) => sample_count += write_frame(&mut writer, &spec, &frame)?,
                        None => break,
                    },
                    _ = &mut stop_rx => break,
                }
            }

            // Frames queued before the stop signal still belong to the clip
            while let Ok(frame) = frame_rx.try_recv() {
                sample_count += write_frame(&mut writer, &spec, &frame)?;
            }

            writer.finalize().context("Failed to finalize WAV file")?;

            debug!("Capture finalized: {} samples", sample_count);

            Ok(file_path)
        });

        self.frame_tx = Some(frame_tx);
        self.stop_tx = Some(stop_tx);
        self.writer_task = Some(task);

        Ok(())
    }

    async fn stop(&mut self) -> Result<PathBuf> {
        let task = match self.writer_task.take() {
            Some(task) => task,
            None => bail!("Capture not active"),
        };

        self.frame_tx = None;
        if let Some(stop_tx) = self.stop_tx.take() {
            // Writer may already have exited on a write error
            let _ = stop_tx.send(());
        }

        let file_path = task.await.context("Capture writer task panicked")??;

        info!("Capture stopped: {}", file_path.display());

        Ok(file_path)
    }

    fn is_capturing(&self) -> bool {
        self.writer_task.is_some()
    }

    fn name(&self) -> &str {
        "wav-capture"
    }
}

use anyhow::Result;
use clap::Parser;
use qk_recorder::{Config, FsClipStore, RecordingSessionManager, WavCaptureDevice};
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// List the clips in the configured recordings directory
#[derive(Parser, Debug)]
#[command(name = "qk-recorder", version)]
struct Args {
    /// Config file (toml, yaml or json); defaults and QK_RECORDER__* env vars otherwise
    #[arg(short, long)]
    config: Option<String>,

    /// Read clip durations from file headers
    #[arg(long)]
    probe_durations: bool,

    /// Print the clip list as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();

    let mut cfg = match &args.config {
        Some(path) => Config::load(path)?,
        None => Config::from_env()?,
    };
    if args.probe_durations {
        cfg.recorder.probe_durations = true;
    }

    info!("QK Voice Recorder v{}", env!("CARGO_PKG_VERSION"));
    info!("Recordings: {}", cfg.recorder.recordings_path.display());
    info!("Quality profile: {}", cfg.recorder.quality_profile);

    let store = Arc::new(FsClipStore::new(&cfg.recorder.recordings_path));
    let capture = Box::new(WavCaptureDevice::new(&cfg.recorder.staging_path));
    let mut manager = RecordingSessionManager::from_config(&cfg.recorder, store, capture)?;

    if !WavCaptureDevice::supports(manager.profile()) {
        warn!(
            "Quality profile {} writes .{} files; the built-in capture device only records wav (set recorder.quality_profile = \"voice\")",
            manager.profile().name,
            manager.profile().extension
        );
    }

    let count = manager.load_clips().await?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(manager.clips())?);
        return Ok(());
    }

    info!("{} recordings", count);
    for clip in manager.clips() {
        info!(
            "{}  {}  {}",
            clip.created_at.format("%Y-%m-%d %H:%M:%S"),
            clip.formatted_duration(),
            clip.name
        );
    }

    Ok(())
}

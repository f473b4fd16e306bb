use anyhow::{Context, Result};
use clap::Parser;
use color_tracker::report::FrameRenderer;
use color_tracker::{ColorTracker, LogReporter, TrackerConfig};
use env_logger::Env;
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::{mpsc, watch};

mod sink;
mod source;

use sink::PngSink;

const DEFAULT_FPS: f64 = 30.0;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Track colored blobs across a sequence of image files"
)]
struct Args {
    /// An image file, or a directory whose images are processed in name order.
    input: PathBuf,

    /// Write annotated frames as PNGs into this directory.
    #[arg(long, short)]
    output: Option<PathBuf>,

    /// TOML configuration file.
    #[arg(long, env = "COLOR_TRACKER_CONFIG")]
    config: Option<PathBuf>,

    /// Override the minimum blob radius, in pixels.
    #[arg(long)]
    min_radius: Option<f64>,

    /// Deliver frames at this rate, dropping any the tracker cannot keep up with.
    /// 0 replays the files without pacing and processes every frame.
    #[arg(long, default_value_t = DEFAULT_FPS)]
    fps: f64,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // --- 1. Configuration & Tracker ---
    let mut config =
        TrackerConfig::load(args.config.as_deref()).context("loading tracker configuration")?;
    if let Some(min_radius) = args.min_radius {
        config.min_radius = min_radius;
    }
    let tracker = ColorTracker::new(config).context("invalid tracker configuration")?;
    let color_name = tracker.config().color_name.clone();

    // --- 2. Sink ---
    let mut sink = match &args.output {
        Some(dir) => {
            let prefix = format!("{}_tracker", color_name.to_lowercase().replace(' ', "_"));
            Some(
                PngSink::new(dir, prefix)
                    .with_context(|| format!("creating output directory {}", dir.display()))?,
            )
        }
        None => None,
    };

    // --- 3. Source ---
    let paths = source::list_images(&args.input)?;
    if paths.is_empty() {
        log::warn!("no images found under {}", args.input.display());
        return Ok(());
    }
    log::info!("tracking {} across {} frames", color_name, paths.len());

    let pacing = Some(args.fps)
        .filter(|fps| fps.is_finite() && *fps > 0.0)
        .map(|fps| Duration::from_secs_f64(1.0 / fps))
        .filter(|period| !period.is_zero());
    let (tx, mut rx) = mpsc::channel(1);
    let (stop_tx, stop_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                log::info!("interrupt received, finishing current frame");
                let _ = stop_tx.send(true);
            }
            Err(err) => log::warn!("cannot listen for ctrl-c, running to completion: {}", err),
        }
    });
    let source_task = tokio::spawn(source::run(paths, tx, pacing, stop_rx));

    // --- 4. Main Processing Loop ---
    let mut reporter = LogReporter::new(color_name);
    let mut processed = 0usize;
    let mut detected = 0usize;
    while let Some(item) = rx.recv().await {
        let mut annotated = sink.as_ref().map(|_| item.frame.clone());
        match tracker.track(&item.frame, &mut reporter, annotated.as_mut()) {
            Ok(detections) => {
                processed += 1;
                detected += detections.len();
            }
            Err(err) => {
                log::warn!("frame {} ({}) skipped: {}", item.index, item.name, err);
                continue;
            }
        }
        if let (Some(sink), Some(frame)) = (sink.as_mut(), annotated.as_ref()) {
            if let Err(err) = sink.render(frame) {
                log::warn!("could not write frame {} ({}): {}", item.index, item.name, err);
            }
        }
    }

    let stats = source_task.await.context("image source task failed")?;
    log::info!(
        "processed {} of {} delivered frames ({} dropped, {} unreadable), {} detections",
        processed,
        stats.sent,
        stats.dropped,
        stats.failed,
        detected
    );
    if let Some(sink) = &sink {
        log::info!("wrote {} annotated frames", sink.written());
    }
    Ok(())
}

// THEORY:
// The image source stands in for a camera driver. It walks a list of image
// files, decodes each one off the async runtime, and hands the resulting frames
// to the consumer through a bounded channel.
//
// Two delivery modes:
// - Unpaced (no frame rate): every frame is delivered; the source waits for the
//   consumer.
// - Paced (`fps` given): frames arrive on a fixed clock like a live camera. The
//   channel holds one frame; if the consumer is still busy when the next frame
//   is due, that frame is dropped rather than queued.
//
// A shutdown signal stops the source between frames. The consumer finishes
// whatever frame it already received.

use anyhow::{Context, Result};
use color_tracker::Frame;
use color_tracker::bridge::frame_from_image;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "bmp", "ppm"];

/// A decoded frame plus where it came from.
#[derive(Debug)]
pub struct SourceFrame {
    pub index: usize,
    pub name: String,
    pub frame: Frame,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SourceStats {
    pub sent: usize,
    pub dropped: usize,
    pub failed: usize,
}

/// Lists the image files under `input` in name order. A single file is returned as-is.
pub fn list_images(input: &Path) -> Result<Vec<PathBuf>> {
    if input.is_file() {
        return Ok(vec![input.to_path_buf()]);
    }
    let mut paths = Vec::new();
    let entries = std::fs::read_dir(input)
        .with_context(|| format!("reading input directory {}", input.display()))?;
    for entry in entries {
        let path = entry?.path();
        let is_image = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
            .unwrap_or(false);
        if path.is_file() && is_image {
            paths.push(path);
        }
    }
    paths.sort();
    Ok(paths)
}

async fn decode(path: PathBuf) -> Result<Frame> {
    let display = path.display().to_string();
    let image = tokio::task::spawn_blocking(move || image::open(&path))
        .await
        .context("decoder task panicked")?
        .with_context(|| format!("decoding {}", display))?;
    Ok(frame_from_image(image))
}

/// Resolves once a stop is requested. A dropped sender never requests one.
async fn stop_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow_and_update() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}

/// Feeds `paths` into `tx` until the list ends, the receiver goes away, or `shutdown` fires.
pub async fn run(
    paths: Vec<PathBuf>,
    tx: mpsc::Sender<SourceFrame>,
    pacing: Option<Duration>,
    mut shutdown: watch::Receiver<bool>,
) -> SourceStats {
    let mut stats = SourceStats::default();
    let mut ticker = pacing.map(tokio::time::interval);

    for (index, path) in paths.into_iter().enumerate() {
        if *shutdown.borrow() {
            break;
        }
        if let Some(ticker) = ticker.as_mut() {
            tokio::select! {
                _ = ticker.tick() => {}
                _ = stop_requested(&mut shutdown) => break,
            }
        }

        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        let frame = match decode(path).await {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("skipping {}: {:#}", name, err);
                stats.failed += 1;
                continue;
            }
        };
        let item = SourceFrame { index, name, frame };

        if pacing.is_some() {
            match tx.try_send(item) {
                Ok(()) => stats.sent += 1,
                Err(mpsc::error::TrySendError::Full(item)) => {
                    log::debug!("consumer busy, dropping frame {} ({})", item.index, item.name);
                    stats.dropped += 1;
                }
                Err(mpsc::error::TrySendError::Closed(_)) => break,
            }
        } else {
            tokio::select! {
                sent = tx.send(item) => {
                    if sent.is_err() {
                        break;
                    }
                    stats.sent += 1;
                }
                _ = stop_requested(&mut shutdown) => break,
            }
        }
    }
    stats
}

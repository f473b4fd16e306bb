// THEORY:
// The engine itself never logs a detection or shows a frame. Those side effects
// belong to collaborators the caller plugs in:
//
// - A `DetectionReporter` receives every detection of a frame, in order.
//   `LogReporter` is the stock implementation and writes one human-readable line
//   per detection through the `log` facade.
// - A `FrameRenderer` is the display sink. It receives the annotated copy of a
//   frame once all detections are drawn.
//
// Keeping them behind traits means the pipeline stays a pure function of
// (frame, configuration) and can be tested with no logger or window at all.

use crate::core_modules::blob::Detection;
use crate::core_modules::frame::Frame;

/// Receives the detections of each processed frame.
pub trait DetectionReporter {
    fn report(&mut self, detection: &Detection);
}

/// Display sink for annotated frames.
pub trait FrameRenderer {
    type Error;

    fn render(&mut self, frame: &Frame) -> Result<(), Self::Error>;
}

/// One log line per detection, e.g. `Red at (120, 85)`.
pub fn format_detection(color_name: &str, detection: &Detection) -> String {
    let (x, y) = detection.pixel_center();
    format!("{} at ({}, {})", color_name, x, y)
}

/// Writes each detection at `info` level, prefixed with the tracked color's name.
#[derive(Debug, Clone)]
pub struct LogReporter {
    color_name: String,
}

impl LogReporter {
    pub fn new(color_name: impl Into<String>) -> Self {
        Self {
            color_name: color_name.into(),
        }
    }
}

impl DetectionReporter for LogReporter {
    fn report(&mut self, detection: &Detection) {
        log::info!("{}", format_detection(&self.color_name, detection));
    }
}

/// Collects detections in memory.
#[derive(Debug, Clone, Default)]
pub struct CollectingReporter {
    pub detections: Vec<Detection>,
}

impl DetectionReporter for CollectingReporter {
    fn report(&mut self, detection: &Detection) {
        self.detections.push(*detection);
    }
}

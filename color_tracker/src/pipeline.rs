// THEORY:
// The `pipeline` module is the top-level API for the whole engine. It composes
// the five stages into a single call and is the only type most consumers need.
//
//   Frame -> convert_frame -> build_mask -> denoise -> extract_blobs -> filter_blobs
//
// The tracker holds nothing but its validated configuration. Every working
// buffer lives for one call, so a `ColorTracker` can be shared between threads
// and two calls on the same frame always agree. Side effects (logging a
// detection, drawing on a frame) only happen in `track`, through collaborators
// the caller passes in.

use crate::config::TrackerConfig;
use crate::core_modules::blob_extractor::blob_extractor;
use crate::core_modules::blob_filter::{annotate, filter_blobs};
use crate::core_modules::color_range::build_mask;
use crate::core_modules::hsv_pixel::hsv_pixel::convert_frame;
use crate::core_modules::morphology::denoise;
use crate::error::Result;
use crate::report::DetectionReporter;

// Re-export key data structures for the public API.
pub use crate::core_modules::blob::{Blob, Circle, Contour, Detection, Point};
pub use crate::core_modules::frame::{Frame, HsvFrame, Mask};

/// Everything the engine learned about one frame.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameAnalysis {
    /// The denoised binary mask the blobs were extracted from.
    pub mask: Mask,
    /// Every blob found, before the radius filter, in raster order.
    pub blobs: Vec<Blob>,
    /// Blobs that passed the radius filter, in the same order.
    pub detections: Vec<Detection>,
}

/// The main, top-level struct for the color tracking engine.
#[derive(Debug, Clone)]
pub struct ColorTracker {
    config: TrackerConfig,
}

impl ColorTracker {
    /// Builds a tracker, refusing configurations that fail validation.
    pub fn new(config: TrackerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &TrackerConfig {
        &self.config
    }

    /// Runs every stage on `frame` and returns the intermediate results too.
    pub fn process(&self, frame: &Frame) -> Result<FrameAnalysis> {
        // Stage 1: Color-space conversion
        let hsv = convert_frame(frame)?;

        // Stage 2: Range mask
        let raw_mask = build_mask(&hsv, &self.config.ranges)?;

        // Stage 3: Morphological opening
        let mask = denoise(&raw_mask, &self.config.morphology);
        log::debug!(
            "mask: {} foreground pixels, {} after denoising",
            raw_mask.foreground_count(),
            mask.foreground_count()
        );

        // Stage 4: Contours and enclosing circles
        let blobs = blob_extractor::extract_blobs(&mask);

        // Stage 5: Radius filter
        let detections = filter_blobs(&blobs, self.config.min_radius);
        log::debug!(
            "{} blobs, {} above radius {}",
            blobs.len(),
            detections.len(),
            self.config.min_radius
        );

        Ok(FrameAnalysis {
            mask,
            blobs,
            detections,
        })
    }

    /// Detections only, in raster order of each region's first pixel.
    pub fn detect(&self, frame: &Frame) -> Result<Vec<Detection>> {
        Ok(self.process(frame)?.detections)
    }

    /// Detects, reports each detection, and draws them onto `annotated` when given.
    ///
    /// `annotated` is usually a copy of `frame`. It is left untouched if detection fails.
    pub fn track(
        &self,
        frame: &Frame,
        reporter: &mut dyn DetectionReporter,
        annotated: Option<&mut Frame>,
    ) -> Result<Vec<Detection>> {
        let detections = self.detect(frame)?;
        for detection in &detections {
            reporter.report(detection);
        }
        if let Some(target) = annotated {
            annotate(target, &detections, &self.config.annotation)?;
        }
        Ok(detections)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TrackerError;
    use crate::report::CollectingReporter;

    fn frame_with_red_square(size: u32, x0: u32, y0: u32, side: u32) -> Frame {
        let mut frame = Frame::filled(size, size, [20, 20, 20]);
        for y in y0..y0 + side {
            for x in x0..x0 + side {
                frame.put_pixel(x, y, [220, 10, 10]);
            }
        }
        frame
    }

    #[test]
    fn invalid_config_is_rejected_at_construction() {
        let config = TrackerConfig {
            ranges: Vec::new(),
            ..TrackerConfig::default()
        };
        let err = ColorTracker::new(config).unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfiguration(_)));
    }

    #[test]
    fn square_is_detected_once() {
        let tracker = ColorTracker::new(TrackerConfig::default()).unwrap();
        let frame = frame_with_red_square(100, 30, 30, 40);
        let analysis = tracker.process(&frame).unwrap();
        assert_eq!(analysis.blobs.len(), 1);
        assert_eq!(analysis.detections.len(), 1);
        let (x, y) = analysis.detections[0].center;
        assert!((x - 49.5).abs() <= 1.0, "x = {}", x);
        assert!((y - 49.5).abs() <= 1.0, "y = {}", y);
    }

    #[test]
    fn track_reports_and_annotates() {
        let tracker = ColorTracker::new(TrackerConfig::default()).unwrap();
        let frame = frame_with_red_square(100, 30, 30, 40);
        let mut reporter = CollectingReporter::default();
        let mut annotated = frame.clone();
        let detections = tracker
            .track(&frame, &mut reporter, Some(&mut annotated))
            .unwrap();
        assert_eq!(reporter.detections, detections);
        assert_ne!(annotated, frame);
    }

    #[test]
    fn malformed_frame_leaves_annotation_target_alone() {
        let tracker = ColorTracker::new(TrackerConfig::default()).unwrap();
        let frame = Frame {
            width: 10,
            height: 10,
            data: vec![0; 10],
        };
        let mut target = Frame::filled(10, 10, [1, 2, 3]);
        let mut reporter = CollectingReporter::default();
        assert!(tracker.track(&frame, &mut reporter, Some(&mut target)).is_err());
        assert_eq!(target, Frame::filled(10, 10, [1, 2, 3]));
        assert!(reporter.detections.is_empty());
    }

    #[test]
    fn tracker_is_shareable_between_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ColorTracker>();
    }
}

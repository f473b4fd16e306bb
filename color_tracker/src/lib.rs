// THEORY:
// This file is the main entry point for the `color_tracker` library crate.
// It defines the public API exposed to frame sources such as the
// `tracker_runner` binary.
//
// The primary export is `ColorTracker` and its associated data structures
// (`TrackerConfig`, `FrameAnalysis`, `Detection`), the high-level interface
// for the whole engine. The per-stage functions in `core_modules` stay public
// so each stage can be driven and tested on its own, but a consumer never has
// to compose them by hand.

pub mod bridge;
pub mod config;
pub mod core_modules;
pub mod error;
pub mod pipeline;
pub mod report;

pub use config::TrackerConfig;
pub use error::{Result, TrackerError};
pub use pipeline::{ColorTracker, Detection, Frame, FrameAnalysis};
pub use report::{DetectionReporter, FrameRenderer, LogReporter};

// THEORY:
// Every failure the engine can report is one of two kinds. A frame can be
// malformed, in which case that single invocation is abandoned and the next
// frame proceeds untouched. Or the configuration can be invalid, which is
// caught once, before the first frame is ever processed. The remaining
// variants only exist to carry config-file loading failures upward.
//
// Degenerate contours are deliberately absent here: they are skipped by the
// extractor and never surface as errors.

use thiserror::Error;

/// Errors produced by the color tracking engine.
#[derive(Debug, Error)]
pub enum TrackerError {
    /// The pixel buffer does not match the declared dimensions.
    #[error("malformed frame: {0}")]
    MalformedFrame(String),

    /// Color ranges, morphology or threshold settings are unusable.
    #[error("invalid configuration: {0}")]
    InvalidConfiguration(String),

    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config file: {0}")]
    ConfigParse(#[from] toml::de::Error),
}

pub type Result<T> = std::result::Result<T, TrackerError>;

// THEORY:
// `TrackerConfig` is the full set of tunables for the engine. Every field has a
// documented default, so a tracker can be built with no configuration at all
// and still look for red blobs with the stock settings.
//
// Loading follows three layers, each overriding the last:
// 1.  Built-in defaults.
// 2.  An optional TOML file. Every key in it is optional; missing keys keep the
//     default.
// 3.  Environment variables for the two settings most often tuned in the field
//     (`COLOR_TRACKER_MIN_RADIUS`, `COLOR_TRACKER_COLOR_NAME`).
//
// Validation runs once, after all layers are applied and before any frame is
// processed. A tracker is never built from an invalid configuration.

use crate::core_modules::blob_filter::{AnnotationStyle, DEFAULT_MIN_RADIUS};
use crate::core_modules::color_range::{ColorRange, validate_ranges};
use crate::core_modules::morphology::{EdgePolicy, MorphologyConfig};
use crate::error::{Result, TrackerError};
use serde::Deserialize;
use std::path::Path;

pub const DEFAULT_COLOR_NAME: &str = "Red";
pub const CONFIG_PATH_ENV: &str = "COLOR_TRACKER_CONFIG";
pub const MIN_RADIUS_ENV: &str = "COLOR_TRACKER_MIN_RADIUS";
pub const COLOR_NAME_ENV: &str = "COLOR_TRACKER_COLOR_NAME";

/// Configuration for the `ColorTracker`, allowing for tunable behavior.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackerConfig {
    /// Human-readable name of the tracked color, used as the log prefix.
    pub color_name: String,
    /// HSV boxes whose union defines the target color.
    pub ranges: Vec<ColorRange>,
    pub morphology: MorphologyConfig,
    /// Blobs with a radius at or below this value are discarded.
    pub min_radius: f64,
    pub annotation: AnnotationStyle,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            color_name: DEFAULT_COLOR_NAME.to_string(),
            ranges: ColorRange::default_red(),
            morphology: MorphologyConfig::default(),
            min_radius: DEFAULT_MIN_RADIUS,
            annotation: AnnotationStyle::default(),
        }
    }
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct TrackerConfigFile {
    color_name: Option<String>,
    ranges: Option<Vec<ColorRange>>,
    min_radius: Option<f64>,
    morphology: Option<MorphologyConfigFile>,
    annotation: Option<AnnotationConfigFile>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct MorphologyConfigFile {
    kernel_size: Option<u32>,
    erode_iterations: Option<u32>,
    dilate_iterations: Option<u32>,
    edge_policy: Option<EdgePolicy>,
}

#[derive(Debug, Deserialize, Default)]
#[serde(deny_unknown_fields)]
struct AnnotationConfigFile {
    circle_color: Option<[u8; 3]>,
    circle_thickness: Option<u32>,
    label_color: Option<[u8; 3]>,
    label_offset: Option<i32>,
    label_scale: Option<u32>,
}

impl TrackerConfig {
    /// Loads defaults, then `path` (or `COLOR_TRACKER_CONFIG` when `path` is `None`),
    /// then environment overrides, and validates the result.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let env_path = std::env::var(CONFIG_PATH_ENV).ok();
        let path = path.or(env_path.as_deref().map(Path::new));
        let mut cfg = match path {
            Some(path) => Self::from_toml_file(path)?,
            None => Self::default(),
        };
        cfg.apply_overrides(|key| std::env::var(key).ok())?;
        cfg.validate()?;
        Ok(cfg)
    }

    pub fn from_toml_file(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_toml_str(&raw)
    }

    /// Parses a TOML document; absent keys keep their defaults. Does not validate.
    pub fn from_toml_str(raw: &str) -> Result<Self> {
        let file: TrackerConfigFile = toml::from_str(raw)?;
        Ok(Self::from_file(file))
    }

    fn from_file(file: TrackerConfigFile) -> Self {
        let defaults = Self::default();
        let morphology = file.morphology.unwrap_or_default();
        let annotation = file.annotation.unwrap_or_default();
        Self {
            color_name: file.color_name.unwrap_or(defaults.color_name),
            ranges: file.ranges.unwrap_or(defaults.ranges),
            min_radius: file.min_radius.unwrap_or(defaults.min_radius),
            morphology: MorphologyConfig {
                kernel_size: morphology
                    .kernel_size
                    .unwrap_or(defaults.morphology.kernel_size),
                erode_iterations: morphology
                    .erode_iterations
                    .unwrap_or(defaults.morphology.erode_iterations),
                dilate_iterations: morphology
                    .dilate_iterations
                    .unwrap_or(defaults.morphology.dilate_iterations),
                edge_policy: morphology
                    .edge_policy
                    .unwrap_or(defaults.morphology.edge_policy),
            },
            annotation: AnnotationStyle {
                circle_color: annotation
                    .circle_color
                    .unwrap_or(defaults.annotation.circle_color),
                circle_thickness: annotation
                    .circle_thickness
                    .unwrap_or(defaults.annotation.circle_thickness),
                label_color: annotation
                    .label_color
                    .unwrap_or(defaults.annotation.label_color),
                label_offset: annotation
                    .label_offset
                    .unwrap_or(defaults.annotation.label_offset),
                label_scale: annotation
                    .label_scale
                    .unwrap_or(defaults.annotation.label_scale),
            },
        }
    }

    /// Applies overrides looked up by environment variable name.
    pub fn apply_overrides<F>(&mut self, lookup: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(name) = lookup(COLOR_NAME_ENV) {
            if !name.trim().is_empty() {
                self.color_name = name.trim().to_string();
            }
        }
        if let Some(radius) = lookup(MIN_RADIUS_ENV) {
            self.min_radius = radius.trim().parse().map_err(|_| {
                TrackerError::InvalidConfiguration(format!(
                    "{} must be a number, got {:?}",
                    MIN_RADIUS_ENV, radius
                ))
            })?;
        }
        Ok(())
    }

    /// Rejects configurations that could never produce a meaningful detection.
    pub fn validate(&self) -> Result<()> {
        validate_ranges(&self.ranges)?;
        self.morphology.validate()?;
        if !self.min_radius.is_finite() || self.min_radius < 0.0 {
            return Err(TrackerError::InvalidConfiguration(format!(
                "min_radius must be a finite, non-negative number, got {}",
                self.min_radius
            )));
        }
        if self.color_name.trim().is_empty() {
            return Err(TrackerError::InvalidConfiguration(
                "color_name must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    #[test]
    fn defaults_are_valid_red_tracker() {
        let cfg = TrackerConfig::default();
        cfg.validate().expect("defaults must validate");
        assert_eq!(cfg.color_name, "Red");
        assert_eq!(cfg.ranges.len(), 2);
        assert_eq!(cfg.morphology.erode_iterations, 2);
        assert_eq!(cfg.morphology.dilate_iterations, 2);
        assert_eq!(cfg.morphology.kernel_size, 3);
        assert_eq!(cfg.min_radius, 10.0);
    }

    #[test]
    fn empty_document_keeps_defaults() {
        let cfg = TrackerConfig::from_toml_str("").unwrap();
        assert_eq!(cfg, TrackerConfig::default());
    }

    #[test]
    fn partial_document_overrides_only_given_keys() {
        let cfg = TrackerConfig::from_toml_str(
            r#"
            color_name = "Blue"
            min_radius = 4.5

            [[ranges]]
            lower = [100, 150, 50]
            upper = [130, 255, 255]

            [morphology]
            erode_iterations = 1
            edge_policy = "ignore"
            "#,
        )
        .unwrap();
        assert_eq!(cfg.color_name, "Blue");
        assert_eq!(cfg.min_radius, 4.5);
        assert_eq!(cfg.ranges, vec![ColorRange::new([100, 150, 50], [130, 255, 255])]);
        assert_eq!(cfg.morphology.erode_iterations, 1);
        assert_eq!(cfg.morphology.dilate_iterations, 2);
        assert_eq!(cfg.morphology.edge_policy, EdgePolicy::Ignore);
        cfg.validate().unwrap();
    }

    #[test]
    fn unknown_key_is_a_parse_error() {
        let err = TrackerConfig::from_toml_str("min_radus = 3.0").unwrap_err();
        assert!(matches!(err, TrackerError::ConfigParse(_)));
    }

    #[test]
    fn empty_ranges_fail_validation() {
        let cfg = TrackerConfig::from_toml_str("ranges = []").unwrap();
        assert!(matches!(
            cfg.validate(),
            Err(TrackerError::InvalidConfiguration(_))
        ));
    }

    #[test]
    fn negative_radius_fails_validation() {
        let cfg = TrackerConfig {
            min_radius: -1.0,
            ..TrackerConfig::default()
        };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn overrides_apply_from_lookup() {
        let env: HashMap<&str, &str> =
            HashMap::from([(MIN_RADIUS_ENV, "25"), (COLOR_NAME_ENV, " Green ")]);
        let mut cfg = TrackerConfig::default();
        cfg.apply_overrides(|key| env.get(key).map(|v| v.to_string()))
            .unwrap();
        assert_eq!(cfg.min_radius, 25.0);
        assert_eq!(cfg.color_name, "Green");
    }

    #[test]
    fn malformed_radius_override_is_rejected() {
        let mut cfg = TrackerConfig::default();
        let err = cfg
            .apply_overrides(|key| (key == MIN_RADIUS_ENV).then(|| "ten".to_string()))
            .unwrap_err();
        assert!(matches!(err, TrackerError::InvalidConfiguration(_)));
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "min_radius = 12.0").unwrap();
        let cfg = TrackerConfig::from_toml_file(file.path()).unwrap();
        assert_eq!(cfg.min_radius, 12.0);
    }

    #[test]
    fn missing_file_is_io_error() {
        let err = TrackerConfig::from_toml_file(Path::new("/nonexistent/tracker.toml")).unwrap_err();
        assert!(matches!(err, TrackerError::Io(_)));
    }
}

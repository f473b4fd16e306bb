// THEORY:
// The `color_range` module is the Range Mask Builder. It turns an `HsvFrame`
// into a binary `Mask` by asking, pixel by pixel, "does this color belong to
// the target?" A target is described by one or more inclusive HSV boxes.
//
// Hue is circular but stored on a linear [0, 180) axis, so a color that
// straddles the wrap point (red lives near both 0 and 180) cannot be expressed
// as a single box. Instead the caller supplies two boxes, one on each side, and
// the builder takes their union. Because each pixel is judged independently
// and OR is commutative, the order in which ranges are listed never matters.

use crate::core_modules::frame::{FOREGROUND, HsvFrame, Mask};
use crate::core_modules::hsv_pixel::hsv_pixel::HsvPixel;
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};

/// An inclusive box in HSV space, bounds given as `[hue, saturation, value]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColorRange {
    pub lower: [u8; 3],
    pub upper: [u8; 3],
}

impl ColorRange {
    pub const fn new(lower: [u8; 3], upper: [u8; 3]) -> Self {
        Self { lower, upper }
    }

    /// Lower half of red, just above hue 0.
    pub const RED_LOW: ColorRange = ColorRange::new([0, 120, 70], [10, 255, 255]);
    /// Upper half of red, just below the wrap at 180.
    pub const RED_HIGH: ColorRange = ColorRange::new([170, 120, 70], [180, 255, 255]);

    /// The default target: red, split across the hue wraparound.
    pub fn default_red() -> Vec<ColorRange> {
        vec![Self::RED_LOW, Self::RED_HIGH]
    }

    pub fn contains(&self, pixel: HsvPixel) -> bool {
        let channels = [pixel.hue, pixel.saturation, pixel.value];
        channels
            .iter()
            .zip(self.lower.iter().zip(self.upper.iter()))
            .all(|(&c, (&lo, &hi))| lo <= c && c <= hi)
    }

    /// An inverted box (lower above upper on any channel) selects nothing and is rejected.
    pub fn validate(&self) -> Result<()> {
        for (channel, name) in ["hue", "saturation", "value"].iter().enumerate() {
            if self.lower[channel] > self.upper[channel] {
                return Err(TrackerError::InvalidConfiguration(format!(
                    "color range {:?}..={:?} has inverted {} bounds",
                    self.lower, self.upper, name
                )));
            }
        }
        Ok(())
    }
}

/// Checks that a range set is non-empty and that every box is well-formed.
pub fn validate_ranges(ranges: &[ColorRange]) -> Result<()> {
    if ranges.is_empty() {
        return Err(TrackerError::InvalidConfiguration(
            "at least one color range is required".to_string(),
        ));
    }
    ranges.iter().try_for_each(ColorRange::validate)
}

/// Marks every pixel that falls inside any of `ranges` as foreground.
pub fn build_mask(hsv: &HsvFrame, ranges: &[ColorRange]) -> Result<Mask> {
    validate_ranges(ranges)?;

    let mut mask = Mask::new(hsv.width, hsv.height);
    for (pixel, target) in hsv.pixels().zip(mask.as_raw_mut().iter_mut())
    {
        let pixel = HsvPixel::from(pixel);
        if ranges.iter().any(|range| range.contains(pixel)) {
            *target = FOREGROUND;
        }
    }
    Ok(mask)
}

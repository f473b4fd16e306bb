// THEORY:
// The `morphology` module is the Morphological Denoiser. A raw color mask is
// speckled: sensor noise and small reflections produce isolated foreground
// pixels that would otherwise become tiny contours. Erosion followed by
// dilation (an "opening") removes anything thinner than the structuring
// element while giving larger regions back roughly their original shape.
//
// The structuring element is a square of odd side `kernel_size`. A square is
// separable, so each pass is computed as a horizontal sweep followed by a
// vertical sweep instead of visiting the full k*k neighborhood per pixel.
//
// Edge policy:
// - `Background` treats every neighbor outside the frame as background. Erosion
//   therefore eats into regions that touch the frame border, and each erosion
//   pass clears a band of `kernel_size / 2` pixels along every edge.
// - `Ignore` clips the neighborhood to the frame, so a region touching the border
//   keeps its border pixels through erosion.
// Dilation is identical under both policies: an out-of-bounds background
// neighbor can never turn a pixel on.

use crate::core_modules::frame::{BACKGROUND, FOREGROUND, Mask};
use crate::error::{Result, TrackerError};
use serde::{Deserialize, Serialize};

pub const DEFAULT_KERNEL_SIZE: u32 = 3;
pub const DEFAULT_ERODE_ITERATIONS: u32 = 2;
pub const DEFAULT_DILATE_ITERATIONS: u32 = 2;

/// How erosion and dilation treat neighbors that fall outside the frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EdgePolicy {
    /// Out-of-bounds neighbors are background.
    #[default]
    Background,
    /// Out-of-bounds neighbors are not considered.
    Ignore,
}

/// Settings for the opening applied to every mask.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphologyConfig {
    /// Side length of the square structuring element. Must be odd.
    pub kernel_size: u32,
    pub erode_iterations: u32,
    pub dilate_iterations: u32,
    pub edge_policy: EdgePolicy,
}

impl Default for MorphologyConfig {
    fn default() -> Self {
        Self {
            kernel_size: DEFAULT_KERNEL_SIZE,
            erode_iterations: DEFAULT_ERODE_ITERATIONS,
            dilate_iterations: DEFAULT_DILATE_ITERATIONS,
            edge_policy: EdgePolicy::Background,
        }
    }
}

impl MorphologyConfig {
    pub fn validate(&self) -> Result<()> {
        if self.kernel_size == 0 || self.kernel_size % 2 == 0 {
            return Err(TrackerError::InvalidConfiguration(format!(
                "structuring element size must be a positive odd number, got {}",
                self.kernel_size
            )));
        }
        Ok(())
    }
}

#[derive(Clone, Copy)]
enum Operation {
    Erode,
    Dilate,
}

/// Erodes `mask` `iterations` times: a foreground pixel survives only if its whole
/// neighborhood is foreground.
pub fn erode(mask: &Mask, kernel_size: u32, iterations: u32, policy: EdgePolicy) -> Mask {
    repeat(mask, kernel_size, iterations, policy, Operation::Erode)
}

/// Dilates `mask` `iterations` times: a pixel becomes foreground if any neighbor is.
pub fn dilate(mask: &Mask, kernel_size: u32, iterations: u32, policy: EdgePolicy) -> Mask {
    repeat(mask, kernel_size, iterations, policy, Operation::Dilate)
}

/// Opening: all erosions first, then all dilations.
pub fn denoise(mask: &Mask, config: &MorphologyConfig) -> Mask {
    let eroded = erode(
        mask,
        config.kernel_size,
        config.erode_iterations,
        config.edge_policy,
    );
    dilate(
        &eroded,
        config.kernel_size,
        config.dilate_iterations,
        config.edge_policy,
    )
}

fn repeat(
    mask: &Mask,
    kernel_size: u32,
    iterations: u32,
    policy: EdgePolicy,
    operation: Operation,
) -> Mask {
    let mut current = mask.clone();
    let radius = (kernel_size / 2) as usize;
    if radius == 0 {
        return current;
    }
    let width = mask.width() as usize;
    let height = mask.height() as usize;
    let mut scratch = vec![BACKGROUND; width * height];

    for _ in 0..iterations {
        let data = current.as_raw_mut();
        // Horizontal sweep into scratch, vertical sweep back into the mask.
        for y in 0..height {
            for x in 0..width {
                scratch[y * width + x] =
                    sweep(data, x, width, radius, policy, operation, |i| y * width + i);
            }
        }
        for y in 0..height {
            for x in 0..width {
                data[y * width + x] =
                    sweep(&scratch, y, height, radius, policy, operation, |i| i * width + x);
            }
        }
    }
    current
}

/// Reduces the 1D window of `radius` around `center` along one axis of length `len`.
fn sweep(
    data: &[u8],
    center: usize,
    len: usize,
    radius: usize,
    policy: EdgePolicy,
    operation: Operation,
    index: impl Fn(usize) -> usize,
) -> u8 {
    let clipped = center < radius || center + radius >= len;
    let start = center.saturating_sub(radius);
    let end = (center + radius).min(len - 1);

    match operation {
        Operation::Erode => {
            if clipped && policy == EdgePolicy::Background {
                return BACKGROUND;
            }
            if (start..=end).all(|i| data[index(i)] == FOREGROUND) {
                FOREGROUND
            } else {
                BACKGROUND
            }
        }
        Operation::Dilate => {
            if (start..=end).any(|i| data[index(i)] == FOREGROUND) {
                FOREGROUND
            } else {
                BACKGROUND
            }
        }
    }
}

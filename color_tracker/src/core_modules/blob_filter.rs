// THEORY:
// The `blob_filter` module is the last stage of the engine. It decides which of
// the extracted blobs are worth reporting and, on request, draws them.
//
// 1.  **Size Filter**: Small circles are almost always residue the denoiser could
//     not remove: reflections, a few stray pixels that survived the opening. A
//     blob is kept only if its radius is strictly greater than the threshold. The
//     surviving detections keep the extractor's order.
// 2.  **Annotation**: For each detection, an outline of the fitted circle and an
//     "(x, y)" label with the truncated integer center are drawn onto a frame the
//     caller owns. The label sits to the right of the center. Drawing never
//     reaches outside the frame.

use crate::core_modules::blob::{Blob, Detection};
use crate::core_modules::frame::Frame;
use crate::core_modules::label_font;
use crate::error::Result;
use image::Rgb;
use imageproc::drawing::draw_hollow_circle_mut;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MIN_RADIUS: f64 = 10.0;

/// Colors and sizes used when drawing detections.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnnotationStyle {
    pub circle_color: [u8; 3],
    pub circle_thickness: u32,
    pub label_color: [u8; 3],
    /// Horizontal distance from the center to the label, in pixels.
    pub label_offset: i32,
    pub label_scale: u32,
}

impl Default for AnnotationStyle {
    fn default() -> Self {
        Self {
            circle_color: [0, 255, 0],
            circle_thickness: 2,
            label_color: [255, 255, 255],
            label_offset: 10,
            label_scale: 2,
        }
    }
}

/// Keeps blobs whose radius is strictly greater than `min_radius`, preserving order.
pub fn filter_blobs(blobs: &[Blob], min_radius: f64) -> Vec<Detection> {
    blobs
        .iter()
        .filter(|blob| blob.radius() > min_radius)
        .map(Detection::from)
        .collect()
}

/// The text drawn next to a detection, e.g. `(120, 85)`.
pub fn label_for(detection: &Detection) -> String {
    let (x, y) = detection.pixel_center();
    format!("({}, {})", x, y)
}

/// Draws a circle outline and a coordinate label for each detection onto `frame`.
pub fn annotate(frame: &mut Frame, detections: &[Detection], style: &AnnotationStyle) -> Result<()> {
    frame.validate()?;
    let mut image = std::mem::take(frame).into_rgb_image()?;

    let circle_color = Rgb(style.circle_color);
    let label_color = Rgb(style.label_color);
    for detection in detections {
        let (x, y) = detection.pixel_center();
        let radius = detection.radius as i32;
        let thickness = style.circle_thickness.max(1) as i32;
        for ring in 0..thickness {
            let r = radius + ring - thickness / 2;
            if r >= 0 {
                draw_hollow_circle_mut(&mut image, (x, y), r, circle_color);
            }
        }

        // Vertically centre the label on the detection's row.
        let label_y = y - label_font::text_height(style.label_scale) / 2;
        label_font::draw_text(
            &mut image,
            x + style.label_offset,
            label_y,
            &label_for(detection),
            label_color,
            style.label_scale,
        );
    }

    *frame = Frame::from_rgb_image(image);
    Ok(())
}

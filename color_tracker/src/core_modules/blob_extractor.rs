// THEORY:
// The `BlobExtractor` is the engine of the Contour & Shape stage. It turns a
// cleaned binary mask into a list of `Blob`s, one per connected region of
// foreground pixels, each carrying its outline and its minimum enclosing circle.
//
// Key architectural principles & algorithm steps:
// 1.  **Border Following**: The mask is scanned in raster order and every region's
//     boundary is traced with 8-connectivity (Suzuki-Abe border following). The
//     tracer reports both outer borders and hole borders, along with the border
//     that encloses each one. The tracer treats the image edge as foreground
//     context, so a region touching the border would come back as a hole. The
//     mask is therefore traced inside a one-pixel background frame and the
//     points are shifted back afterwards.
// 2.  **External Only**: Only outer borders with no enclosing border are kept. A
//     ring-shaped region yields one contour, not two, and a region sitting inside
//     another region's hole is considered part of that outer object.
// 3.  **Degenerate Skip**: Outlines with fewer than three points or no enclosed
//     area (single pixels, one-pixel-wide lines) cannot describe a blob. They are
//     dropped silently; this is not an error condition.
// 4.  **Circle Fitting**: Each surviving outline is passed to
//     `min_enclosing_circle`.
// 5.  **Stateless Utility**: `extract_blobs` depends only on the mask it is given.
//     Output order follows the raster position of each region's first pixel.

use crate::core_modules::blob::{Blob, Contour, Point};
use crate::core_modules::enclosing_circle::min_enclosing_circle;
use crate::core_modules::frame::Mask;
use image::GrayImage;

pub mod blob_extractor {
    use super::*;
    use imageproc::contours::{BorderType, find_contours};

    /// Minimum number of outline points for a region to count as a blob.
    const MIN_CONTOUR_POINTS: usize = 3;

    /// Traces the outermost boundary of every 8-connected foreground region.
    pub fn find_external_contours(mask: &Mask) -> Vec<Contour> {
        find_contours::<i32>(&padded(mask))
            .into_iter()
            .filter(|c| matches!(c.border_type, BorderType::Outer) && c.parent.is_none())
            .map(|c| {
                Contour::new(
                    c.points
                        .iter()
                        .map(|p| Point::new(p.x - BORDER as i32, p.y - BORDER as i32))
                        .collect(),
                )
            })
            .collect()
    }

    const BORDER: u32 = 1;

    /// Copy of the mask surrounded by a background frame.
    fn padded(mask: &Mask) -> GrayImage {
        let mut image = GrayImage::new(mask.width() + 2 * BORDER, mask.height() + 2 * BORDER);
        image::imageops::replace(&mut image, mask.as_image(), BORDER as i64, BORDER as i64);
        image
    }

    /// Finds every connected region in the mask and fits its enclosing circle.
    pub fn extract_blobs(mask: &Mask) -> Vec<Blob> {
        let contours = find_external_contours(mask);
        let traced = contours.len();

        let blobs: Vec<Blob> = contours
            .into_iter()
            .filter(|contour| !is_degenerate(contour))
            .map(|contour| {
                let circle = min_enclosing_circle(&contour.points);
                Blob { contour, circle }
            })
            .collect();

        log::debug!(
            "traced {} external contours, {} degenerate skipped",
            traced,
            traced - blobs.len()
        );
        blobs
    }

    fn is_degenerate(contour: &Contour) -> bool {
        contour.len() < MIN_CONTOUR_POINTS || contour.area() == 0.0
    }
}

// THEORY:
// The `frame` module holds the three raster containers that flow between the
// stages of the engine: the caller's RGB `Frame`, the converted `HsvFrame`,
// and the binary `Mask`. Like the pixel containers they replace, they are
// "dumb": they know their dimensions and how to index themselves, nothing more.
//
// Key architectural principles:
// 1.  **Caller Ownership**: A `Frame` belongs to whoever produced it. Stages only
//     borrow it. The one exception is annotation, which draws onto a copy the
//     caller hands over explicitly.
// 2.  **Dimension Invariant**: Every `HsvFrame` and `Mask` derived from a frame
//     has exactly that frame's width and height. Constructors enforce it.
// 3.  **Interop**: The mask is backed by an `image::GrayImage` so contour tracing
//     and debugging dumps can use the wider image ecosystem without copies.

use crate::error::{Result, TrackerError};
use image::{GrayImage, Luma, RgbImage};

pub const CHANNELS: usize = 3;

pub const FOREGROUND: u8 = 255;
pub const BACKGROUND: u8 = 0;

/// An interleaved RGB image, 3 bytes per pixel, row-major.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl Frame {
    /// Builds a frame, rejecting buffers that do not hold `width * height` RGB pixels.
    pub fn new(width: u32, height: u32, data: Vec<u8>) -> Result<Self> {
        let frame = Self { width, height, data };
        frame.validate()?;
        Ok(frame)
    }

    /// A frame of the given size where every pixel has the same color.
    pub fn filled(width: u32, height: u32, rgb: [u8; 3]) -> Self {
        let pixel_count = width as usize * height as usize;
        let mut data = Vec::with_capacity(pixel_count * CHANNELS);
        for _ in 0..pixel_count {
            data.extend_from_slice(&rgb);
        }
        Self { width, height, data }
    }

    /// Checks that the buffer length agrees with the declared dimensions.
    pub fn validate(&self) -> Result<()> {
        if self.width == 0 || self.height == 0 {
            return Err(TrackerError::MalformedFrame(format!(
                "frame has an empty dimension ({}x{})",
                self.width, self.height
            )));
        }
        let expected = self.width as usize * self.height as usize * CHANNELS;
        if self.data.len() != expected {
            return Err(TrackerError::MalformedFrame(format!(
                "expected {} bytes for a {}x{} RGB frame, got {}",
                expected,
                self.width,
                self.height,
                self.data.len()
            )));
        }
        Ok(())
    }

    pub fn pixel(&self, x: u32, y: u32) -> [u8; 3] {
        let index = (y as usize * self.width as usize + x as usize) * CHANNELS;
        [self.data[index], self.data[index + 1], self.data[index + 2]]
    }

    pub fn put_pixel(&mut self, x: u32, y: u32, rgb: [u8; 3]) {
        let index = (y as usize * self.width as usize + x as usize) * CHANNELS;
        self.data[index..index + CHANNELS].copy_from_slice(&rgb);
    }

    /// Moves the buffer into an `RgbImage` for drawing or encoding.
    pub fn into_rgb_image(self) -> Result<RgbImage> {
        let (width, height) = (self.width, self.height);
        RgbImage::from_raw(width, height, self.data).ok_or_else(|| {
            TrackerError::MalformedFrame(format!("buffer too small for {}x{}", width, height))
        })
    }

    pub fn from_rgb_image(image: RgbImage) -> Self {
        let (width, height) = image.dimensions();
        Self {
            width,
            height,
            data: image.into_raw(),
        }
    }
}

/// HSV counterpart of a `Frame`: hue in [0,180), saturation and value in [0,255].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HsvFrame {
    pub width: u32,
    pub height: u32,
    pub data: Vec<u8>,
}

impl HsvFrame {
    pub(crate) fn with_dimensions_of(frame: &Frame) -> Self {
        Self {
            width: frame.width,
            height: frame.height,
            data: vec![0; frame.data.len()],
        }
    }

    pub fn pixels(&self) -> impl Iterator<Item = &[u8]> {
        self.data.chunks_exact(CHANNELS)
    }
}

/// Single-channel binary image; every pixel is `FOREGROUND` or `BACKGROUND`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mask {
    image: GrayImage,
}

impl Mask {
    /// An all-background mask.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: GrayImage::new(width, height),
        }
    }

    /// Wraps a grayscale buffer, binarising it: any non-zero byte becomes foreground.
    pub fn from_gray_image(mut image: GrayImage) -> Self {
        for pixel in image.pixels_mut() {
            if pixel[0] != BACKGROUND {
                pixel[0] = FOREGROUND;
            }
        }
        Self { image }
    }

    pub fn width(&self) -> u32 {
        self.image.width()
    }

    pub fn height(&self) -> u32 {
        self.image.height()
    }

    pub fn is_foreground(&self, x: u32, y: u32) -> bool {
        self.image.get_pixel(x, y)[0] == FOREGROUND
    }

    pub fn set(&mut self, x: u32, y: u32, foreground: bool) {
        let value = if foreground { FOREGROUND } else { BACKGROUND };
        self.image.put_pixel(x, y, Luma([value]));
    }

    /// Number of foreground pixels, i.e. the mask's area.
    pub fn foreground_count(&self) -> usize {
        self.image.as_raw().iter().filter(|&&v| v == FOREGROUND).count()
    }

    pub fn is_empty(&self) -> bool {
        self.image.as_raw().iter().all(|&v| v == BACKGROUND)
    }

    pub fn as_image(&self) -> &GrayImage {
        &self.image
    }

    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub(crate) fn as_raw_mut(&mut self) -> &mut [u8] {
        &mut self.image
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_short_buffer() {
        let err = Frame::new(4, 4, vec![0; 47]).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedFrame(_)));
    }

    #[test]
    fn rejects_zero_dimension() {
        let err = Frame::new(0, 4, Vec::new()).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedFrame(_)));
    }

    #[test]
    fn filled_frame_is_valid() {
        let frame = Frame::filled(7, 3, [1, 2, 3]);
        frame.validate().expect("filled frame should validate");
        assert_eq!(frame.pixel(6, 2), [1, 2, 3]);
    }

    #[test]
    fn mask_from_gray_binarises() {
        let mut gray = GrayImage::new(2, 1);
        gray.put_pixel(0, 0, Luma([17]));
        let mask = Mask::from_gray_image(gray);
        assert!(mask.is_foreground(0, 0));
        assert!(!mask.is_foreground(1, 0));
        assert_eq!(mask.foreground_count(), 1);
    }
}

// THEORY:
// The `bridge` module is the image codec boundary. Transports deliver pixels in
// whatever layout their sender chose: BGR from most camera drivers, RGBA from
// compositors, single-channel from monochrome sensors, often with padded rows.
// The engine only ever sees tightly packed RGB, so everything is normalised
// here, once, on the way in, and converted back on the way out for display.
//
// Encodings follow the common `rgb8` / `bgr8` / `rgba8` / `bgra8` / `mono8`
// naming. `step` is the row stride in bytes and may exceed the packed width.

use crate::core_modules::frame::{CHANNELS, Frame};
use crate::error::{Result, TrackerError};
use image::DynamicImage;
use std::fmt;
use std::str::FromStr;

/// Pixel layout of a transport buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    Rgb8,
    Bgr8,
    Rgba8,
    Bgra8,
    Mono8,
}

impl Encoding {
    pub fn bytes_per_pixel(self) -> usize {
        match self {
            Encoding::Rgb8 | Encoding::Bgr8 => 3,
            Encoding::Rgba8 | Encoding::Bgra8 => 4,
            Encoding::Mono8 => 1,
        }
    }

    fn to_rgb(self, px: &[u8]) -> [u8; 3] {
        match self {
            Encoding::Rgb8 | Encoding::Rgba8 => [px[0], px[1], px[2]],
            Encoding::Bgr8 | Encoding::Bgra8 => [px[2], px[1], px[0]],
            Encoding::Mono8 => [px[0], px[0], px[0]],
        }
    }

    fn write_from_rgb(self, rgb: &[u8], out: &mut Vec<u8>) {
        match self {
            Encoding::Rgb8 => out.extend_from_slice(&rgb[..3]),
            Encoding::Bgr8 => out.extend_from_slice(&[rgb[2], rgb[1], rgb[0]]),
            Encoding::Rgba8 => out.extend_from_slice(&[rgb[0], rgb[1], rgb[2], 255]),
            Encoding::Bgra8 => out.extend_from_slice(&[rgb[2], rgb[1], rgb[0], 255]),
            Encoding::Mono8 => {
                // Rec. 601 luma.
                let luma = 0.299 * rgb[0] as f64 + 0.587 * rgb[1] as f64 + 0.114 * rgb[2] as f64;
                out.push(luma.round() as u8);
            }
        }
    }
}

impl FromStr for Encoding {
    type Err = TrackerError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rgb8" => Ok(Encoding::Rgb8),
            "bgr8" => Ok(Encoding::Bgr8),
            "rgba8" => Ok(Encoding::Rgba8),
            "bgra8" => Ok(Encoding::Bgra8),
            "mono8" => Ok(Encoding::Mono8),
            other => Err(TrackerError::InvalidConfiguration(format!(
                "unsupported image encoding {:?}",
                other
            ))),
        }
    }
}

impl fmt::Display for Encoding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Encoding::Rgb8 => "rgb8",
            Encoding::Bgr8 => "bgr8",
            Encoding::Rgba8 => "rgba8",
            Encoding::Bgra8 => "bgra8",
            Encoding::Mono8 => "mono8",
        };
        f.write_str(name)
    }
}

/// A transport-side image: encoded pixels plus the layout needed to read them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawImage {
    pub encoding: Encoding,
    pub width: u32,
    pub height: u32,
    /// Row stride in bytes.
    pub step: usize,
    pub data: Vec<u8>,
}

/// Unpacks a transport buffer into a packed RGB `Frame`.
pub fn frame_from_raw(
    encoding: Encoding,
    width: u32,
    height: u32,
    step: usize,
    data: &[u8],
) -> Result<Frame> {
    let overflow = || {
        TrackerError::MalformedFrame(format!(
            "{} image {}x{} with stride {} does not fit in memory",
            encoding, width, height, step
        ))
    };
    let row_bytes = (width as usize)
        .checked_mul(encoding.bytes_per_pixel())
        .ok_or_else(overflow)?;
    if step < row_bytes {
        return Err(TrackerError::MalformedFrame(format!(
            "row stride {} is shorter than {} bytes for {} pixels of {}",
            step, row_bytes, width, encoding
        )));
    }
    let needed = match (height as usize).checked_sub(1) {
        None => 0,
        Some(last_row) => step
            .checked_mul(last_row)
            .and_then(|start| start.checked_add(row_bytes))
            .ok_or_else(overflow)?,
    };
    if data.len() < needed {
        return Err(TrackerError::MalformedFrame(format!(
            "{} image {}x{} with stride {} needs {} bytes, got {}",
            encoding,
            width,
            height,
            step,
            needed,
            data.len()
        )));
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * CHANNELS);
    for row in 0..height as usize {
        let start = row * step;
        for px in data[start..start + row_bytes].chunks_exact(encoding.bytes_per_pixel()) {
            rgb.extend_from_slice(&encoding.to_rgb(px));
        }
    }
    Frame::new(width, height, rgb)
}

/// Packs a frame into `encoding` with no row padding.
pub fn frame_to_raw(frame: &Frame, encoding: Encoding) -> Result<RawImage> {
    frame.validate()?;
    let mut data =
        Vec::with_capacity(frame.width as usize * frame.height as usize * encoding.bytes_per_pixel());
    for px in frame.data.chunks_exact(CHANNELS) {
        encoding.write_from_rgb(px, &mut data);
    }
    Ok(RawImage {
        encoding,
        width: frame.width,
        height: frame.height,
        step: frame.width as usize * encoding.bytes_per_pixel(),
        data,
    })
}

/// Converts any decoded image into an RGB frame, dropping alpha.
pub fn frame_from_image(image: DynamicImage) -> Frame {
    Frame::from_rgb_image(image.into_rgb8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bgr_is_swapped_to_rgb() {
        let frame = frame_from_raw(Encoding::Bgr8, 2, 1, 6, &[0, 0, 255, 255, 0, 0]).unwrap();
        assert_eq!(frame.pixel(0, 0), [255, 0, 0]);
        assert_eq!(frame.pixel(1, 0), [0, 0, 255]);
    }

    #[test]
    fn padded_rows_are_skipped() {
        // 1x2 rgba8 with 2 bytes of padding per row.
        let data = [1, 2, 3, 4, 99, 99, 5, 6, 7, 8, 99, 99];
        let frame = frame_from_raw(Encoding::Rgba8, 1, 2, 6, &data).unwrap();
        assert_eq!(frame.data, vec![1, 2, 3, 5, 6, 7]);
    }

    #[test]
    fn mono_expands_to_gray() {
        let frame = frame_from_raw(Encoding::Mono8, 2, 1, 2, &[10, 200]).unwrap();
        assert_eq!(frame.pixel(1, 0), [200, 200, 200]);
    }

    #[test]
    fn short_buffer_is_malformed() {
        let err = frame_from_raw(Encoding::Rgb8, 4, 4, 12, &[0; 40]).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedFrame(_)));
    }

    #[test]
    fn short_stride_is_malformed() {
        let err = frame_from_raw(Encoding::Rgb8, 4, 1, 10, &[0; 12]).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedFrame(_)));
    }

    #[test]
    fn huge_stride_is_malformed() {
        let err = frame_from_raw(Encoding::Rgb8, 1, 3, usize::MAX / 2, &[0; 9]).unwrap_err();
        assert!(matches!(err, TrackerError::MalformedFrame(_)));
    }

    #[test]
    fn bgr_round_trip_preserves_pixels() {
        let frame = Frame::new(2, 1, vec![10, 20, 30, 40, 50, 60]).unwrap();
        let raw = frame_to_raw(&frame, Encoding::Bgr8).unwrap();
        assert_eq!(raw.data, vec![30, 20, 10, 60, 50, 40]);
        let back = frame_from_raw(raw.encoding, raw.width, raw.height, raw.step, &raw.data).unwrap();
        assert_eq!(back, frame);
    }

    #[test]
    fn encoding_names() {
        assert_eq!("BGR8".parse::<Encoding>().unwrap(), Encoding::Bgr8);
        assert_eq!(Encoding::Mono8.to_string(), "mono8");
        assert!("yuv422".parse::<Encoding>().is_err());
    }
}

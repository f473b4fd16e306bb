// THEORY (Color-Space Converter):
// The `hsv_pixel` module is the first stage of the engine. It maps one RGB pixel
// to its HSV representation, and a whole `Frame` to an `HsvFrame`, with no
// knowledge of neighbors. Hue isolates "which color" from "how bright", which is
// what makes a fixed range usable under changing light.
//
// Encoding (8-bit HSV):
// - Value:      max(R, G, B)
// - Saturation: 255 * chroma / value, rounded (0 for black)
// - Hue:        the usual 0..360 degree angle halved and rounded, so it fits a
//               byte and spans [0, 180). Achromatic pixels get hue 0.
//
// Key principles:
// 1) Single-pixel scope: the conversion of a pixel never reads another pixel.
// 2) Total over well-formed input: the only failure is a malformed frame buffer.

pub mod hsv_pixel {
    use crate::core_modules::frame::{CHANNELS, Frame, HsvFrame};
    use crate::error::Result;

    pub type Hue = u8;
    pub type Saturation = u8;
    pub type Value = u8;

    /// Upper (exclusive) bound of the 8-bit hue axis.
    pub const HUE_RANGE: u8 = 180;

    /// A "dumb" data container for one pixel in 8-bit HSV space.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct HsvPixel {
        /// Hue, [0, 180).
        pub hue: Hue,
        /// Saturation, [0, 255].
        pub saturation: Saturation,
        /// Value, [0, 255].
        pub value: Value,
    }

    impl HsvPixel {
        pub fn new(hue: Hue, saturation: Saturation, value: Value) -> Self {
            Self {
                hue,
                saturation,
                value,
            }
        }

        /// Converts one RGB pixel.
        pub fn from_rgb(red: u8, green: u8, blue: u8) -> Self {
            let maximum_channel = red.max(green.max(blue));
            let minimum_channel = red.min(green.min(blue));
            let chroma = (maximum_channel - minimum_channel) as f32;

            let saturation = if maximum_channel == 0 {
                0
            } else {
                (255.0 * chroma / maximum_channel as f32).round() as u8
            };

            if chroma <= 0.0 {
                return Self::new(0, saturation, maximum_channel);
            }

            let (red, green, blue) = (red as f32, green as f32, blue as f32);
            let (base_difference, sector_offset) = if maximum_channel as f32 == red {
                (green - blue, 0.0)
            } else if maximum_channel as f32 == green {
                (blue - red, 120.0)
            } else {
                (red - green, 240.0)
            };

            let mut hue_degrees = 60.0 * base_difference / chroma + sector_offset;
            if hue_degrees < 0.0 {
                hue_degrees += 360.0;
            }

            // Halving can round 359.x up to 180, which is the same angle as 0.
            let mut hue = (hue_degrees / 2.0).round();
            if hue >= HUE_RANGE as f32 {
                hue -= HUE_RANGE as f32;
            }

            Self::new(hue as u8, saturation, maximum_channel)
        }

        pub fn to_bytes(self) -> [u8; 3] {
            [self.hue, self.saturation, self.value]
        }
    }

    impl From<&[u8]> for HsvPixel {
        /// Interprets a 3-byte slice as an `[h, s, v]` triple.
        fn from(bytes: &[u8]) -> Self {
            if bytes.len() != CHANNELS {
                panic!("Cannot convert {} bytes into an HSV pixel.", bytes.len());
            }
            HsvPixel::new(bytes[0], bytes[1], bytes[2])
        }
    }

    /// Converts a whole RGB frame into an HSV frame of identical dimensions.
    pub fn convert_frame(frame: &Frame) -> Result<HsvFrame> {
        frame.validate()?;
        let mut hsv = HsvFrame::with_dimensions_of(frame);
        for (source, target) in frame
            .data
            .chunks_exact(CHANNELS)
            .zip(hsv.data.chunks_exact_mut(CHANNELS))
        {
            let pixel = HsvPixel::from_rgb(source[0], source[1], source[2]);
            target.copy_from_slice(&pixel.to_bytes());
        }
        Ok(hsv)
    }
}

#[cfg(test)]
mod tests {
    use super::hsv_pixel::*;
    use crate::core_modules::frame::Frame;
    use crate::error::TrackerError;

    #[test]
    fn primary_colors() {
        assert_eq!(HsvPixel::from_rgb(255, 0, 0), HsvPixel::new(0, 255, 255));
        assert_eq!(HsvPixel::from_rgb(0, 255, 0), HsvPixel::new(60, 255, 255));
        assert_eq!(HsvPixel::from_rgb(0, 0, 255), HsvPixel::new(120, 255, 255));
    }

    #[test]
    fn grays_have_no_hue_or_saturation() {
        assert_eq!(HsvPixel::from_rgb(0, 0, 0), HsvPixel::new(0, 0, 0));
        assert_eq!(HsvPixel::from_rgb(128, 128, 128), HsvPixel::new(0, 0, 128));
        assert_eq!(HsvPixel::from_rgb(255, 255, 255), HsvPixel::new(0, 0, 255));
    }

    #[test]
    fn reddish_magenta_wraps_to_top_of_hue_axis() {
        // Hue of (255, 0, 40) is about 350.6 degrees.
        let pixel = HsvPixel::from_rgb(255, 0, 40);
        assert_eq!(pixel.hue, 175);
        assert!(pixel.hue < HUE_RANGE);
    }

    #[test]
    fn nearly_red_never_reaches_180() {
        let pixel = HsvPixel::from_rgb(255, 0, 1);
        assert_eq!(pixel.hue, 0);
    }

    #[test]
    fn half_saturation() {
        let pixel = HsvPixel::from_rgb(200, 100, 100);
        assert_eq!(pixel.value, 200);
        assert_eq!(pixel.saturation, 128);
        assert_eq!(pixel.hue, 0);
    }

    #[test]
    fn converted_frame_keeps_dimensions() {
        let frame = Frame::filled(5, 4, [0, 0, 255]);
        let hsv = convert_frame(&frame).expect("valid frame");
        assert_eq!((hsv.width, hsv.height), (5, 4));
        assert_eq!(hsv.data.len(), frame.data.len());
        assert!(hsv.pixels().all(|p| HsvPixel::from(p) == HsvPixel::new(120, 255, 255)));
    }

    #[test]
    fn malformed_frame_is_rejected() {
        let frame = Frame {
            width: 3,
            height: 3,
            data: vec![0; 10],
        };
        assert!(matches!(
            convert_frame(&frame),
            Err(TrackerError::MalformedFrame(_))
        ));
    }
}

// A tiny 3x5 bitmap font for coordinate labels. Only the characters a label
// like "(120, 85)" needs are defined; anything else renders as a solid block.

use image::{Rgb, RgbImage};

const GLYPH_WIDTH: i32 = 3;
const GLYPH_HEIGHT: i32 = 5;

/// Each row is 3 bits wide, most significant bit on the left.
fn glyph(c: char) -> [u8; 5] {
    match c {
        '0' => [0x7, 0x5, 0x5, 0x5, 0x7],
        '1' => [0x2, 0x6, 0x2, 0x2, 0x7],
        '2' => [0x7, 0x1, 0x7, 0x4, 0x7],
        '3' => [0x7, 0x1, 0x7, 0x1, 0x7],
        '4' => [0x5, 0x5, 0x7, 0x1, 0x1],
        '5' => [0x7, 0x4, 0x7, 0x1, 0x7],
        '6' => [0x7, 0x4, 0x7, 0x5, 0x7],
        '7' => [0x7, 0x1, 0x2, 0x4, 0x4],
        '8' => [0x7, 0x5, 0x7, 0x5, 0x7],
        '9' => [0x7, 0x5, 0x7, 0x1, 0x7],
        ' ' => [0x0, 0x0, 0x0, 0x0, 0x0],
        ',' => [0x0, 0x0, 0x0, 0x2, 0x4],
        '-' => [0x0, 0x0, 0x7, 0x0, 0x0],
        '(' => [0x2, 0x4, 0x4, 0x4, 0x2],
        ')' => [0x2, 0x1, 0x1, 0x1, 0x2],
        _ => [0x7, 0x7, 0x7, 0x7, 0x7],
    }
}

/// Horizontal advance of one character at `scale`, including one column of spacing.
pub fn advance(scale: u32) -> i32 {
    (GLYPH_WIDTH + 1) * scale as i32
}

/// Draws `text` with its top-left corner at (x, y). Pixels outside the image are skipped.
pub fn draw_text(image: &mut RgbImage, x: i32, y: i32, text: &str, color: Rgb<u8>, scale: u32) {
    let mut cursor = x;
    for c in text.chars() {
        draw_char(image, cursor, y, c, color, scale as i32);
        cursor += advance(scale);
    }
}

fn draw_char(image: &mut RgbImage, x: i32, y: i32, c: char, color: Rgb<u8>, scale: i32) {
    let (width, height) = (image.width() as i32, image.height() as i32);
    for (row, bits) in glyph(c).iter().enumerate() {
        for col in 0..GLYPH_WIDTH {
            if (bits >> (GLYPH_WIDTH - 1 - col)) & 1 == 0 {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let px = x + col * scale + dx;
                    let py = y + row as i32 * scale + dy;
                    if px >= 0 && px < width && py >= 0 && py < height {
                        image.put_pixel(px as u32, py as u32, color);
                    }
                }
            }
        }
    }
}

pub fn text_height(scale: u32) -> i32 {
    GLYPH_HEIGHT * scale as i32
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn draws_digit_one() {
        let mut image = RgbImage::new(10, 10);
        draw_text(&mut image, 0, 0, "1", Rgb([255, 255, 255]), 1);
        // Top row of '1' is the middle column only.
        assert_eq!(image.get_pixel(1, 0), &Rgb([255, 255, 255]));
        assert_eq!(image.get_pixel(0, 0), &Rgb([0, 0, 0]));
        // Bottom row is solid.
        assert_eq!(image.get_pixel(0, 4), &Rgb([255, 255, 255]));
    }

    #[test]
    fn clips_outside_image() {
        let mut image = RgbImage::new(4, 4);
        draw_text(&mut image, -2, 2, "(88, 88)", Rgb([1, 2, 3]), 2);
        // Middle column of '(' lands on the left edge; the rest falls outside.
        assert_eq!(image.get_pixel(0, 2), &Rgb([1, 2, 3]));
    }
}

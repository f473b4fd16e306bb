// THEORY:
// The `blob` module defines the per-frame shape data produced by the extractor
// and consumed by the filter. A `Contour` is the traced outline of one connected
// region; a `Blob` pairs that outline with the smallest circle enclosing it; a
// `Detection` is what is left once a blob has passed the size filter.
//
// All three are stateless snapshots. They are rebuilt from scratch every frame
// and carry no identity: the third blob of one frame has no relationship to the
// third blob of the next.

/// An integer pixel coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Point {
    pub x: i32,
    pub y: i32,
}

impl Point {
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }
}

/// Closed, ordered outline of one connected foreground region.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Contour {
    pub points: Vec<Point>,
}

impl Contour {
    pub fn new(points: Vec<Point>) -> Self {
        Self { points }
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Area enclosed by the outline (shoelace formula over pixel centers).
    pub fn area(&self) -> f64 {
        let n = self.points.len();
        if n < 3 {
            return 0.0;
        }
        let twice_area: i64 = (0..n)
            .map(|i| {
                let a = self.points[i];
                let b = self.points[(i + 1) % n];
                a.x as i64 * b.y as i64 - b.x as i64 * a.y as i64
            })
            .sum();
        (twice_area as f64 / 2.0).abs()
    }
}

/// A circle in continuous image coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Circle {
    pub const fn new(center: (f64, f64), radius: f64) -> Self {
        Self { center, radius }
    }

    pub fn contains(&self, x: f64, y: f64, tolerance: f64) -> bool {
        let dx = x - self.center.0;
        let dy = y - self.center.1;
        (dx * dx + dy * dy).sqrt() <= self.radius + tolerance
    }
}

/// One connected region in a single frame, with its fitted enclosing circle.
#[derive(Debug, Clone, PartialEq)]
pub struct Blob {
    /// The traced outer boundary of the region.
    pub contour: Contour,
    /// The minimum enclosing circle of `contour`.
    pub circle: Circle,
}

impl Blob {
    pub fn center(&self) -> (f64, f64) {
        self.circle.center
    }

    pub fn radius(&self) -> f64 {
        self.circle.radius
    }
}

/// A blob that passed the radius threshold. This is what callers receive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub center: (f64, f64),
    pub radius: f64,
}

impl Detection {
    /// Center with each coordinate truncated toward zero, as used for labels and logs.
    pub fn pixel_center(&self) -> (i32, i32) {
        (self.center.0 as i32, self.center.1 as i32)
    }
}

impl From<&Blob> for Detection {
    fn from(blob: &Blob) -> Self {
        Self {
            center: blob.circle.center,
            radius: blob.circle.radius,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn square_outline_area() {
        let contour = Contour::new(vec![
            Point::new(0, 0),
            Point::new(4, 0),
            Point::new(4, 4),
            Point::new(0, 4),
        ]);
        assert_eq!(contour.area(), 16.0);
    }

    #[test]
    fn back_and_forth_line_has_zero_area() {
        let contour = Contour::new(vec![Point::new(0, 0), Point::new(3, 0), Point::new(0, 0)]);
        assert_eq!(contour.area(), 0.0);
    }

    #[test]
    fn pixel_center_truncates() {
        let detection = Detection {
            center: (12.9, 7.2),
            radius: 11.0,
        };
        assert_eq!(detection.pixel_center(), (12, 7));
    }
}

// THEORY:
// Minimum enclosing circle. Given the outline of a blob, find the smallest circle
// that contains every outline point. A bounding-box average would be cheaper but
// overestimates the radius of anything that is not axis-aligned, which is exactly
// the quantity the size filter thresholds on.
//
// Algorithm:
// 1.  Only points on the convex hull can touch the minimal circle, so the outline
//     is first reduced to its hull. For a pixel outline this shrinks hundreds of
//     points to a few dozen.
// 2.  The incremental form of Welzl's algorithm then grows a circle point by point.
//     Whenever a point falls outside, the circle is rebuilt with that point on its
//     boundary, from two points (diameter) or three points (circumcircle).
// 3.  The result is checked against the full outline. If the hull reduction ever
//     lost a point, the incremental pass is rerun over all points.
//
// The output is exact up to floating point tolerance and fully deterministic:
// identical outlines always produce bit-identical circles.

use crate::core_modules::blob::{Circle, Point};
use imageproc::geometry::convex_hull;
use imageproc::point::Point as HullPoint;

const EPSILON: f64 = 1e-7;

/// The smallest circle containing all `points`. Empty input yields a zero circle at the origin.
pub fn min_enclosing_circle(points: &[Point]) -> Circle {
    if points.is_empty() {
        return Circle::new((0.0, 0.0), 0.0);
    }

    let all: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();
    if points.len() <= 3 {
        return incremental_circle(&all);
    }

    let hull_input: Vec<HullPoint<i32>> = points.iter().map(|p| HullPoint::new(p.x, p.y)).collect();
    let hull: Vec<(f64, f64)> = convex_hull(&hull_input[..])
        .iter()
        .map(|p| (p.x as f64, p.y as f64))
        .collect();

    if !hull.is_empty() {
        let circle = incremental_circle(&hull);
        if all.iter().all(|&(x, y)| circle.contains(x, y, tolerance(&circle))) {
            return circle;
        }
    }
    incremental_circle(&all)
}

fn tolerance(circle: &Circle) -> f64 {
    EPSILON * circle.radius.max(1.0)
}

fn incremental_circle(points: &[(f64, f64)]) -> Circle {
    let mut circle = Circle::new(points[0], 0.0);
    for i in 1..points.len() {
        let (xi, yi) = points[i];
        if circle.contains(xi, yi, tolerance(&circle)) {
            continue;
        }
        circle = Circle::new(points[i], 0.0);
        for j in 0..i {
            let (xj, yj) = points[j];
            if circle.contains(xj, yj, tolerance(&circle)) {
                continue;
            }
            circle = circle_from_two(points[i], points[j]);
            for k in 0..j {
                let (xk, yk) = points[k];
                if circle.contains(xk, yk, tolerance(&circle)) {
                    continue;
                }
                circle = circle_from_three(points[i], points[j], points[k]);
            }
        }
    }
    circle
}

fn circle_from_two(a: (f64, f64), b: (f64, f64)) -> Circle {
    let center = ((a.0 + b.0) / 2.0, (a.1 + b.1) / 2.0);
    let radius = distance(a, b) / 2.0;
    Circle::new(center, radius)
}

fn circle_from_three(a: (f64, f64), b: (f64, f64), c: (f64, f64)) -> Circle {
    let bx = b.0 - a.0;
    let by = b.1 - a.1;
    let cx = c.0 - a.0;
    let cy = c.1 - a.1;
    let d = 2.0 * (bx * cy - by * cx);

    if d.abs() <= EPSILON {
        // Collinear: the widest pair spans the other point.
        let candidates = [circle_from_two(a, b), circle_from_two(a, c), circle_from_two(b, c)];
        return candidates
            .into_iter()
            .fold(Circle::new(a, 0.0), |best, candidate| {
                if candidate.radius > best.radius { candidate } else { best }
            });
    }

    let b_sq = bx * bx + by * by;
    let c_sq = cx * cx + cy * cy;
    let ux = (cy * b_sq - by * c_sq) / d;
    let uy = (bx * c_sq - cx * b_sq) / d;
    Circle::new((a.0 + ux, a.1 + uy), (ux * ux + uy * uy).sqrt())
}

fn distance(a: (f64, f64), b: (f64, f64)) -> f64 {
    let dx = a.0 - b.0;
    let dy = a.1 - b.1;
    (dx * dx + dy * dy).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol
    }

    #[test]
    fn empty_and_single_point() {
        assert_eq!(min_enclosing_circle(&[]).radius, 0.0);
        let single = min_enclosing_circle(&[Point::new(3, 4)]);
        assert_eq!(single.center, (3.0, 4.0));
        assert_eq!(single.radius, 0.0);
    }

    #[test]
    fn square_corners() {
        let circle = min_enclosing_circle(&[
            Point::new(0, 0),
            Point::new(10, 0),
            Point::new(10, 10),
            Point::new(0, 10),
            Point::new(5, 5),
        ]);
        assert!(approx(circle.center.0, 5.0, 1e-9));
        assert!(approx(circle.center.1, 5.0, 1e-9));
        assert!(approx(circle.radius, 50f64.sqrt(), 1e-9));
    }

    #[test]
    fn obtuse_triangle_uses_longest_side_as_diameter() {
        let circle = min_enclosing_circle(&[Point::new(0, 0), Point::new(10, 0), Point::new(5, 1)]);
        assert!(approx(circle.center.0, 5.0, 1e-9));
        assert!(approx(circle.center.1, 0.0, 1e-9));
        assert!(approx(circle.radius, 5.0, 1e-9));
    }

    #[test]
    fn acute_triangle_uses_circumcircle() {
        // Right angle at the origin would be a diameter case; use an acute one instead.
        let circle = min_enclosing_circle(&[Point::new(0, 0), Point::new(8, 0), Point::new(4, 6)]);
        // Circumcenter lies on x = 4; solve 16 + y^2 = (6 - y)^2.
        let expected_y = 20.0 / 12.0;
        assert!(approx(circle.center.0, 4.0, 1e-9));
        assert!(approx(circle.center.1, expected_y, 1e-9));
        assert!(approx(circle.radius, 6.0 - expected_y, 1e-9));
    }

    #[test]
    fn collinear_points() {
        let points: Vec<Point> = (0..=10).map(|x| Point::new(x, 2)).collect();
        let circle = min_enclosing_circle(&points);
        assert!(approx(circle.center.0, 5.0, 1e-9));
        assert!(approx(circle.center.1, 2.0, 1e-9));
        assert!(approx(circle.radius, 5.0, 1e-9));
    }

    /// Smallest circle through any pair or triple of `points` that contains them all.
    fn exhaustive_circle(points: &[(f64, f64)]) -> Circle {
        let encloses = |c: &Circle| points.iter().all(|&(x, y)| c.contains(x, y, 1e-9));
        let mut best: Option<Circle> = None;
        let mut consider = |c: Circle| {
            if encloses(&c) && best.map_or(true, |b| c.radius < b.radius) {
                best = Some(c);
            }
        };
        for i in 0..points.len() {
            for j in i + 1..points.len() {
                consider(circle_from_two(points[i], points[j]));
                for k in j + 1..points.len() {
                    consider(circle_from_three(points[i], points[j], points[k]));
                }
            }
        }
        best.expect("at least two points")
    }

    #[test]
    fn sampled_ring_matches_exhaustive_search() {
        let (cx, cy, r) = (100.0f64, 80.0f64, 50.0f64);
        // Every 7.5 degrees; rounding pushes some samples just past the ideal radius.
        let points: Vec<Point> = (0..48)
            .map(|step| {
                let t = (step as f64 * 7.5).to_radians();
                Point::new((cx + r * t.cos()).round() as i32, (cy + r * t.sin()).round() as i32)
            })
            .collect();
        let as_f64: Vec<(f64, f64)> = points.iter().map(|p| (p.x as f64, p.y as f64)).collect();

        let circle = min_enclosing_circle(&points);
        let truth = exhaustive_circle(&as_f64);
        assert!(
            (circle.radius - truth.radius).abs() / truth.radius <= 0.01,
            "radius {} vs {}",
            circle.radius,
            truth.radius
        );
        assert!(circle.radius <= r + std::f64::consts::FRAC_1_SQRT_2);
        assert!(approx(circle.center.0, cx, 1.0));
        assert!(approx(circle.center.1, cy, 1.0));
        for p in &points {
            assert!(circle.contains(p.x as f64, p.y as f64, 1e-6));
        }
    }

    #[test]
    fn deterministic() {
        let points: Vec<Point> = (0..50).map(|i| Point::new((i * 37) % 23, (i * 11) % 17)).collect();
        assert_eq!(min_enclosing_circle(&points), min_enclosing_circle(&points));
    }
}

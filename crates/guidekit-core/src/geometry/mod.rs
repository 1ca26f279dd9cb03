//! Geometry kernel for guide and snap-point computation.
//!
//! Pure, stateless routines shared by the guide store and the command
//! layer: point rotation, segment projection, equal/fixed-distance
//! sampling over segments and arcs, and line–arc / circle–circle
//! intersection.
//!
//! Degenerate inputs (zero-length segments, zero radii, coincident
//! circles) produce empty results, never panics; callers run inside
//! pointer-drag interactions and must not be interrupted.
//!
//! Angles are degrees at the API boundary and radians internally.

mod intersect;
mod sampling;

pub use intersect::{circle_circle_intersections, line_arc_intersections};
pub use sampling::{arc_distance_points, arc_segment_points, distance_points, segment_points};

use serde::{Deserialize, Serialize};

use crate::constants::{ANGLE_TOLERANCE_DEG, MIN_DISTANCE};

/// A 2D point in drawing coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Euclidean distance to another point.
    pub fn distance_to(&self, other: &Point) -> f64 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }

    /// Midpoint between this point and another.
    pub fn midpoint(&self, other: &Point) -> Point {
        Point::new((self.x + other.x) / 2.0, (self.y + other.y) / 2.0)
    }
}

/// Rotates `point` about `pivot` by `angle_deg` degrees (CCW positive).
pub fn rotate_point(point: Point, pivot: Point, angle_deg: f64) -> Point {
    let angle_rad = angle_deg.to_radians();
    let cos_a = angle_rad.cos();
    let sin_a = angle_rad.sin();

    let dx = point.x - pivot.x;
    let dy = point.y - pivot.y;
    Point::new(
        dx * cos_a - dy * sin_a + pivot.x,
        dx * sin_a + dy * cos_a + pivot.y,
    )
}

/// Projects `point` onto the segment `a`..`b`, clamping to the endpoints.
///
/// A degenerate segment projects onto `a`.
pub fn project_point_on_segment(point: Point, a: Point, b: Point) -> Point {
    let vx = b.x - a.x;
    let vy = b.y - a.y;
    let len_sq = vx * vx + vy * vy;
    if len_sq < MIN_DISTANCE * MIN_DISTANCE {
        return a;
    }

    let t = (((point.x - a.x) * vx + (point.y - a.y) * vy) / len_sq).clamp(0.0, 1.0);
    Point::new(a.x + t * vx, a.y + t * vy)
}

/// Distance from `point` to the segment `a`..`b`.
pub fn point_to_segment_distance(point: Point, a: Point, b: Point) -> f64 {
    point.distance_to(&project_point_on_segment(point, a, b))
}

/// Normalizes an angle in degrees into `[0, 360)`.
pub fn normalize_angle_deg(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can return 360.0 for tiny negative inputs after rounding.
    if a >= 360.0 {
        a - 360.0
    } else {
        a
    }
}

/// The CCW sweep from `start_deg` to `end_deg`, normalized into `(0, 360]`.
///
/// Equal angles describe a full sweep, not an empty one.
pub fn arc_sweep_deg(start_deg: f64, end_deg: f64) -> f64 {
    let sweep = normalize_angle_deg(end_deg - start_deg);
    if sweep <= ANGLE_TOLERANCE_DEG {
        360.0
    } else {
        sweep
    }
}

/// Tests whether `angle_deg` lies on the CCW sweep from `start_deg` to
/// `end_deg`, with a small boundary tolerance so hits exactly on an arc
/// endpoint are accepted.
pub fn angle_in_arc_range(angle_deg: f64, start_deg: f64, end_deg: f64) -> bool {
    let sweep = arc_sweep_deg(start_deg, end_deg);
    let rel = normalize_angle_deg(angle_deg - start_deg);
    rel <= sweep + ANGLE_TOLERANCE_DEG || rel >= 360.0 - ANGLE_TOLERANCE_DEG
}

/// The position angle of `point` around `center`, in degrees `[0, 360)`.
pub fn angle_of_point_deg(point: Point, center: Point) -> f64 {
    normalize_angle_deg((point.y - center.y).atan2(point.x - center.x).to_degrees())
}

/// The point at `angle_deg` on the circle of `radius` around `center`.
pub fn point_at_angle(center: Point, radius: f64, angle_deg: f64) -> Point {
    let rad = angle_deg.to_radians();
    Point::new(center.x + radius * rad.cos(), center.y + radius * rad.sin())
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_rotate_point_quarter_turn() {
        let p = rotate_point(Point::new(1.0, 0.0), Point::new(0.0, 0.0), 90.0);
        assert!((p.x - 0.0).abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_rotate_point_about_offset_pivot() {
        let p = rotate_point(Point::new(2.0, 1.0), Point::new(1.0, 1.0), 180.0);
        assert!((p.x - 0.0).abs() < EPS);
        assert!((p.y - 1.0).abs() < EPS);
    }

    #[test]
    fn test_project_clamps_to_endpoints() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        let before = project_point_on_segment(Point::new(-5.0, 3.0), a, b);
        assert_eq!(before, a);
        let after = project_point_on_segment(Point::new(15.0, -2.0), a, b);
        assert_eq!(after, b);
        let mid = project_point_on_segment(Point::new(4.0, 7.0), a, b);
        assert!((mid.x - 4.0).abs() < EPS);
        assert!((mid.y - 0.0).abs() < EPS);
    }

    #[test]
    fn test_point_to_segment_distance() {
        let a = Point::new(0.0, 0.0);
        let b = Point::new(10.0, 0.0);
        assert!((point_to_segment_distance(Point::new(5.0, 3.0), a, b) - 3.0).abs() < EPS);
        assert!((point_to_segment_distance(Point::new(-4.0, 3.0), a, b) - 5.0).abs() < EPS);
    }

    #[test]
    fn test_degenerate_segment_projects_to_start() {
        let a = Point::new(2.0, 2.0);
        let p = project_point_on_segment(Point::new(5.0, 5.0), a, a);
        assert_eq!(p, a);
    }

    #[test]
    fn test_normalize_angle() {
        assert!((normalize_angle_deg(370.0) - 10.0).abs() < EPS);
        assert!((normalize_angle_deg(-90.0) - 270.0).abs() < EPS);
        assert!((normalize_angle_deg(360.0) - 0.0).abs() < EPS);
    }

    #[test]
    fn test_angle_in_arc_range_with_wrap() {
        // Arc from 350 deg to 10 deg crosses zero.
        assert!(angle_in_arc_range(355.0, 350.0, 10.0));
        assert!(angle_in_arc_range(5.0, 350.0, 10.0));
        assert!(!angle_in_arc_range(180.0, 350.0, 10.0));
        // Boundary hits.
        assert!(angle_in_arc_range(350.0, 350.0, 10.0));
        assert!(angle_in_arc_range(10.0, 350.0, 10.0));
    }

    #[test]
    fn test_equal_angles_are_full_sweep() {
        assert!((arc_sweep_deg(45.0, 45.0) - 360.0).abs() < EPS);
        assert!(angle_in_arc_range(180.0, 45.0, 45.0));
    }
}

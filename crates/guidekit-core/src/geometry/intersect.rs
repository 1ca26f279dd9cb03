//! Line–arc and circle–circle intersection.

use crate::constants::MIN_DISTANCE;

use super::{angle_in_arc_range, angle_of_point_deg, Point};

/// Parameter tolerance when clamping quadratic roots to the segment.
const T_EPSILON: f64 = 1e-9;

/// Intersects the segment `seg_start`..`seg_end` with an arc (or full
/// circle) of `radius` about `center`.
///
/// The segment is parametrized as `P(t) = start + t * (end - start)` and
/// substituted into the circle equation; roots of the resulting quadratic
/// with `t` in `[0, 1]` (epsilon tolerance) are kept. For a partial arc
/// the hit must also lie on the CCW sweep from `start_deg` to `end_deg`.
///
/// Degenerate segments or radii produce no intersections.
pub fn line_arc_intersections(
    seg_start: Point,
    seg_end: Point,
    center: Point,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    full_circle: bool,
) -> Vec<Point> {
    if radius < MIN_DISTANCE {
        return Vec::new();
    }

    let dx = seg_end.x - seg_start.x;
    let dy = seg_end.y - seg_start.y;
    let fx = seg_start.x - center.x;
    let fy = seg_start.y - center.y;

    let a = dx * dx + dy * dy;
    if a < MIN_DISTANCE * MIN_DISTANCE {
        return Vec::new();
    }
    let b = 2.0 * (fx * dx + fy * dy);
    let c = fx * fx + fy * fy - radius * radius;

    let discriminant = b * b - 4.0 * a * c;
    if discriminant < 0.0 {
        return Vec::new();
    }

    let sqrt_d = discriminant.sqrt();
    let mut roots = vec![(-b - sqrt_d) / (2.0 * a)];
    if sqrt_d > T_EPSILON {
        roots.push((-b + sqrt_d) / (2.0 * a));
    }

    let mut points = Vec::new();
    for t in roots {
        if !(-T_EPSILON..=1.0 + T_EPSILON).contains(&t) {
            continue;
        }
        let hit = Point::new(seg_start.x + t * dx, seg_start.y + t * dy);
        if full_circle || angle_in_arc_range(angle_of_point_deg(hit, center), start_deg, end_deg) {
            points.push(hit);
        }
    }
    points
}

/// Intersects two arcs (or full circles).
///
/// Uses the standard construction `a = (r1^2 - r2^2 + d^2) / 2d`,
/// `h = sqrt(r1^2 - a^2)`. Coincident centers, circles too far apart, and
/// one circle inside the other all yield no intersections; tangency
/// (`h` near zero) yields a single point. Each candidate is kept only if
/// it lies within both arcs' angular ranges (a full circle accepts any
/// angle).
#[allow(clippy::too_many_arguments)]
pub fn circle_circle_intersections(
    center1: Point,
    radius1: f64,
    start1_deg: f64,
    end1_deg: f64,
    full1: bool,
    center2: Point,
    radius2: f64,
    start2_deg: f64,
    end2_deg: f64,
    full2: bool,
) -> Vec<Point> {
    if radius1 < MIN_DISTANCE || radius2 < MIN_DISTANCE {
        return Vec::new();
    }

    let d = center1.distance_to(&center2);
    if d < MIN_DISTANCE {
        // Coincident centers: either identical (infinite hits) or
        // concentric (none). Both come back empty.
        return Vec::new();
    }
    if d > radius1 + radius2 + MIN_DISTANCE {
        return Vec::new();
    }
    if d < (radius1 - radius2).abs() - MIN_DISTANCE {
        return Vec::new();
    }

    let a = (radius1 * radius1 - radius2 * radius2 + d * d) / (2.0 * d);
    let h_sq = radius1 * radius1 - a * a;
    // Clamp small negatives from tangency arithmetic.
    let h = h_sq.max(0.0).sqrt();

    let ux = (center2.x - center1.x) / d;
    let uy = (center2.y - center1.y) / d;
    let base = Point::new(center1.x + a * ux, center1.y + a * uy);

    let mut candidates = vec![Point::new(base.x + h * -uy, base.y + h * ux)];
    if h > MIN_DISTANCE {
        candidates.push(Point::new(base.x - h * -uy, base.y - h * ux));
    }

    candidates
        .into_iter()
        .filter(|p| {
            (full1 || angle_in_arc_range(angle_of_point_deg(*p, center1), start1_deg, end1_deg))
                && (full2
                    || angle_in_arc_range(angle_of_point_deg(*p, center2), start2_deg, end2_deg))
        })
        .collect()
}

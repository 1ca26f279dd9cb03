//! Equal-count and fixed-distance sampling along segments and arcs.

use crate::constants::{ANGLE_TOLERANCE_DEG, MAX_SNAP_POINTS, MIN_DISTANCE};

use super::{arc_sweep_deg, point_at_angle, Point};

/// Returns `n + 1` equally spaced points from `start` to `end` inclusive,
/// at parameters `t = i / n`.
///
/// `n == 0` yields no points.
pub fn segment_points(start: Point, end: Point, n: usize) -> Vec<Point> {
    if n == 0 {
        return Vec::new();
    }

    (0..=n)
        .map(|i| {
            let t = i as f64 / n as f64;
            Point::new(
                start.x + (end.x - start.x) * t,
                start.y + (end.y - start.y) * t,
            )
        })
        .collect()
}

/// Walks from `start` toward `end` in fixed steps of `dist`, always
/// including both endpoints.
///
/// Collapses to the single start point when the segment is shorter than
/// the geometric epsilon or `dist` is not positive. The walk is capped
/// at the point-store capacity; a step far smaller than the segment
/// yields the truncated prefix plus the exact end point, so the caller
/// stays bounded through a pointer drag even on pathological input.
pub fn distance_points(start: Point, end: Point, dist: f64) -> Vec<Point> {
    let length = start.distance_to(&end);
    if length < MIN_DISTANCE || dist <= 0.0 {
        return vec![start];
    }

    let dir_x = (end.x - start.x) / length;
    let dir_y = (end.y - start.y) / length;

    let mut points = Vec::new();
    let mut travelled = 0.0;
    while travelled < length - MIN_DISTANCE && points.len() < MAX_SNAP_POINTS - 1 {
        points.push(Point::new(
            start.x + dir_x * travelled,
            start.y + dir_y * travelled,
        ));
        travelled += dist;
    }
    points.push(end);
    points
}

/// Samples an arc (or full circle) into equally spaced points.
///
/// A full circle yields exactly `count` points with no duplicate closing
/// point; an arc yields `count + 1` points spanning the CCW sweep from
/// `start_deg` to `end_deg`. Zero radius or zero count yields nothing.
pub fn arc_segment_points(
    center: Point,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    count: usize,
    full_circle: bool,
) -> Vec<Point> {
    if radius < MIN_DISTANCE || count == 0 {
        return Vec::new();
    }

    if full_circle {
        let step = 360.0 / count as f64;
        (0..count)
            .map(|i| point_at_angle(center, radius, start_deg + i as f64 * step))
            .collect()
    } else {
        let sweep = arc_sweep_deg(start_deg, end_deg);
        let step = sweep / count as f64;
        (0..=count)
            .map(|i| point_at_angle(center, radius, start_deg + i as f64 * step))
            .collect()
    }
}

/// Samples an arc (or full circle) at a fixed chordal distance.
///
/// The angular step is `dist / radius`. A circle wraps from the start
/// angle until the accumulated angle exceeds one revolution; an arc stops
/// at its sweep and always appends the exact end point. Like
/// [`distance_points`], the walk is capped at the point-store capacity.
pub fn arc_distance_points(
    center: Point,
    radius: f64,
    start_deg: f64,
    end_deg: f64,
    dist: f64,
    full_circle: bool,
) -> Vec<Point> {
    if radius < MIN_DISTANCE || dist <= 0.0 {
        return Vec::new();
    }

    let step_deg = (dist / radius).to_degrees();
    let mut points = Vec::new();

    if full_circle {
        let mut angle = 0.0;
        while angle < 360.0 - ANGLE_TOLERANCE_DEG && points.len() < MAX_SNAP_POINTS {
            points.push(point_at_angle(center, radius, start_deg + angle));
            angle += step_deg;
        }
    } else {
        let sweep = arc_sweep_deg(start_deg, end_deg);
        let mut angle = 0.0;
        while angle < sweep - ANGLE_TOLERANCE_DEG && points.len() < MAX_SNAP_POINTS - 1 {
            points.push(point_at_angle(center, radius, start_deg + angle));
            angle += step_deg;
        }
        points.push(point_at_angle(center, radius, start_deg + sweep));
    }

    points
}

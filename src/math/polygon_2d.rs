use super::distance_2d::point_to_segment_dist;
use super::{cross_2d, Point2, TOLERANCE};

/// Location of a point relative to a closed ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointLocation {
    Inside,
    Outside,
    OnBoundary,
}

/// Computes the signed area of a polygon (shoelace formula).
///
/// Positive for counter-clockwise, negative for clockwise. Works for both
/// open vertex lists and closed ones that repeat the first vertex.
/// Coordinates are taken relative to the first vertex, so rings far from the
/// origin keep their precision.
#[must_use]
pub fn signed_area_2d(points: &[Point2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let origin = points[0];
    let mut sum = 0.0;
    for i in 1..n - 1 {
        sum += cross_2d(&(points[i] - origin), &(points[i + 1] - origin));
    }
    sum * 0.5
}

/// Rotates an open vertex cycle so it starts at the leftmost vertex (smallest
/// x), breaking ties by smallest y. Ensures deterministic comparisons.
#[must_use]
pub fn rotate_to_canonical_start(points: &[Point2]) -> Vec<Point2> {
    if points.len() < 2 {
        return points.to_vec();
    }
    let mut best = 0;
    for (i, pt) in points.iter().enumerate().skip(1) {
        let b = &points[best];
        if pt.x < b.x - TOLERANCE || ((pt.x - b.x).abs() < TOLERANCE && pt.y < b.y) {
            best = i;
        }
    }
    if best == 0 {
        return points.to_vec();
    }
    let mut rotated = Vec::with_capacity(points.len());
    rotated.extend_from_slice(&points[best..]);
    rotated.extend_from_slice(&points[..best]);
    rotated
}

/// Winding number of `point` with respect to the closed vertex list `ring`
/// (first vertex repeated at the end).
///
/// Non-zero => inside, zero => outside.
#[must_use]
pub fn winding_number_2d(point: &Point2, ring: &[Point2]) -> i32 {
    let mut winding = 0i32;
    for w in ring.windows(2) {
        let (a, b) = (&w[0], &w[1]);
        let side = cross_2d(&(b - a), &(point - a));
        if a.y <= point.y {
            if b.y > point.y && side > 0.0 {
                winding += 1;
            }
        } else if b.y <= point.y && side < 0.0 {
            winding -= 1;
        }
    }
    winding
}

/// Classifies `point` against the closed vertex list `ring`.
///
/// Points within `TOLERANCE` of an edge are on the boundary.
#[must_use]
pub fn locate_point_2d(point: &Point2, ring: &[Point2]) -> PointLocation {
    let on_boundary = ring
        .windows(2)
        .any(|w| point_to_segment_dist(point, &w[0], &w[1]) <= TOLERANCE);
    if on_boundary {
        PointLocation::OnBoundary
    } else if winding_number_2d(point, ring) != 0 {
        PointLocation::Inside
    } else {
        PointLocation::Outside
    }
}

/// Removes vertices that lie on the straight line through their neighbours
/// from an open vertex cycle, along with repeated vertices.
#[must_use]
pub fn remove_collinear(points: &[Point2]) -> Vec<Point2> {
    let mut pts: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if pts.last().is_none_or(|last| (p - last).norm() > TOLERANCE) {
            pts.push(*p);
        }
    }
    while pts.len() > 1 && (pts[0] - pts[pts.len() - 1]).norm() <= TOLERANCE {
        pts.pop();
    }

    // Repeat until stable: dropping one vertex can make its neighbour collinear.
    let mut changed = true;
    while changed && pts.len() > 3 {
        changed = false;
        let n = pts.len();
        for i in 0..n {
            let prev = pts[(i + n - 1) % n];
            let next = pts[(i + 1) % n];
            let here = pts[i];
            if point_to_segment_dist(&here, &prev, &next) <= TOLERANCE {
                pts.remove(i);
                changed = true;
                break;
            }
        }
    }
    pts
}

use crate::error::GeometryError;
use crate::math::intersect_2d::SegmentContact;
use crate::math::polygon_2d::{
    locate_point_2d, remove_collinear, rotate_to_canonical_start, signed_area_2d, PointLocation,
};
use crate::math::{Point2, TOLERANCE};

use super::Segment;

/// Distance within which a point is considered to lie on a ring edge when
/// relocating it after the ring has been rebuilt.
const SNAP_DISTANCE: f64 = TOLERANCE * 10.0;

/// Traversal direction of a ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Orientation {
    CounterClockwise,
    Clockwise,
}

impl Orientation {
    #[must_use]
    pub fn reversed(self) -> Self {
        match self {
            Self::CounterClockwise => Self::Clockwise,
            Self::Clockwise => Self::CounterClockwise,
        }
    }
}

/// A location on a ring's boundary: edge index plus parameter on that edge.
///
/// Normalized positions keep `t` in `[0, 1)`; a point at the end of an edge
/// is reported at the start of the following one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RingPosition {
    pub segment: usize,
    pub t: f64,
}

impl RingPosition {
    /// Position along the ring's own parametrization (`segment + t`).
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn param(&self) -> f64 {
        self.segment as f64 + self.t
    }
}

/// How a tested ring lies relative to a reference ring.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RingRelation {
    /// Inside the reference ring, possibly touching its boundary.
    Inside,
    /// Outside the reference ring, possibly touching its boundary.
    Outside,
    /// Partly inside and partly outside.
    Crossing,
    /// Every point of the tested ring lies on the reference boundary.
    Coincident,
}

/// A closed, simple ring of at least three distinct vertices.
///
/// The first point is repeated at the end. Construction rejects open,
/// zero-area and self-intersecting input, so every `Ring` value is valid.
#[derive(Debug, Clone, PartialEq)]
pub struct Ring {
    points: Vec<Point2>,
}

impl Ring {
    /// Creates a ring from a closed point sequence.
    ///
    /// Consecutive duplicate points are collapsed first.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for fewer than 4 points,
    /// `GeometryError::NotClosed` if first and last point differ,
    /// `GeometryError::Degenerate` for a zero-area ring and
    /// `GeometryError::SelfIntersecting` for a non-simple one.
    pub fn new(points: Vec<Point2>) -> Result<Self, GeometryError> {
        let mut points = dedup_consecutive(points);
        if points.len() < 4 {
            return Err(GeometryError::TooFewPoints {
                found: points.len(),
                required: 4,
            });
        }
        let first = points[0];
        let last = points.len() - 1;
        if (points[last] - first).norm() > TOLERANCE {
            return Err(GeometryError::NotClosed);
        }
        points[last] = first;

        let ring = Self { points };
        if ring.signed_area().abs() <= TOLERANCE {
            return Err(GeometryError::Degenerate("ring has zero area".into()));
        }
        if let Some(p) = ring.self_intersection() {
            return Err(GeometryError::SelfIntersecting { x: p.x, y: p.y });
        }
        Ok(ring)
    }

    /// Creates a ring from an open point sequence, closing it if needed.
    ///
    /// # Errors
    ///
    /// Same as [`Ring::new`].
    pub fn from_open(points: &[Point2]) -> Result<Self, GeometryError> {
        let mut pts = dedup_consecutive(points.to_vec());
        if let (Some(first), Some(last)) = (pts.first().copied(), pts.last()) {
            if pts.len() > 1 && (last - first).norm() > TOLERANCE {
                pts.push(first);
            }
        }
        Self::new(pts)
    }

    /// All points, the first one repeated at the end.
    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    /// Distinct vertices, without the closing repetition.
    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.points[..self.points.len() - 1]
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    /// Edge `i`, from vertex `i` to vertex `i + 1`.
    #[must_use]
    pub fn segment(&self, i: usize) -> Segment {
        Segment::new(self.points[i], self.points[i + 1])
    }

    pub fn segments(&self) -> impl Iterator<Item = Segment> + '_ {
        self.points.windows(2).map(|w| Segment::new(w[0], w[1]))
    }

    #[must_use]
    pub fn signed_area(&self) -> f64 {
        signed_area_2d(&self.points)
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.signed_area().abs()
    }

    #[must_use]
    pub fn orientation(&self) -> Orientation {
        if self.signed_area() > 0.0 {
            Orientation::CounterClockwise
        } else {
            Orientation::Clockwise
        }
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        let mut points = self.points.clone();
        points.reverse();
        Self { points }
    }

    /// Returns this ring traversed in the requested direction.
    #[must_use]
    pub fn oriented(self, orientation: Orientation) -> Self {
        if self.orientation() == orientation {
            self
        } else {
            self.reversed()
        }
    }

    #[must_use]
    pub fn locate_point(&self, p: &Point2) -> PointLocation {
        locate_point_2d(p, &self.points)
    }

    /// `true` if `p` lies strictly inside the ring.
    #[must_use]
    pub fn contains_point(&self, p: &Point2) -> bool {
        self.locate_point(p) == PointLocation::Inside
    }

    /// `true` if `other` lies inside this ring (touching allowed).
    #[must_use]
    pub fn contains_ring(&self, other: &Ring) -> bool {
        self.relate(other) == RingRelation::Inside
    }

    /// Classifies `other` against this ring.
    ///
    /// Every edge of `other` is split at its contacts with this ring and the
    /// midpoint of each piece is located, so touching at vertices or along
    /// shared edges never counts as crossing.
    #[must_use]
    pub fn relate(&self, other: &Ring) -> RingRelation {
        let mut inside = false;
        let mut outside = false;
        for seg in other.segments() {
            let mut params = vec![0.0, 1.0];
            for edge in self.segments() {
                match seg.contact(&edge) {
                    Some(SegmentContact::Point { t, .. }) => params.push(t),
                    Some(SegmentContact::Overlap { t0, t1 }) => params.extend([t0, t1]),
                    None => {}
                }
            }
            params.sort_by(f64::total_cmp);

            let min_dt = TOLERANCE / seg.length();
            for w in params.windows(2) {
                if w[1] - w[0] <= min_dt {
                    continue;
                }
                match self.locate_point(&seg.point_at(0.5 * (w[0] + w[1]))) {
                    PointLocation::Inside => inside = true,
                    PointLocation::Outside => outside = true,
                    PointLocation::OnBoundary => {}
                }
            }
            if inside && outside {
                return RingRelation::Crossing;
            }
        }
        match (inside, outside) {
            (true, _) => RingRelation::Inside,
            (false, true) => RingRelation::Outside,
            (false, false) => RingRelation::Coincident,
        }
    }

    /// Returns a point where two non-adjacent edges touch, or where adjacent
    /// edges fold back over each other.
    #[must_use]
    pub fn self_intersection(&self) -> Option<Point2> {
        let n = self.segment_count();
        for i in 0..n {
            let si = self.segment(i);
            for j in (i + 1)..n {
                let adjacent = j == i + 1 || (i == 0 && j == n - 1);
                match si.contact(&self.segment(j)) {
                    Some(SegmentContact::Overlap { t0, t1 }) => {
                        return Some(si.point_at(0.5 * (t0 + t1)));
                    }
                    // Adjacent edges that are not collinear meet only at
                    // their shared vertex.
                    Some(SegmentContact::Point { point, .. }) if !adjacent => return Some(point),
                    _ => {}
                }
            }
        }
        None
    }

    #[must_use]
    pub fn is_simple(&self) -> bool {
        self.self_intersection().is_none()
    }

    /// Point at a boundary position.
    #[must_use]
    pub fn point_at(&self, pos: RingPosition) -> Point2 {
        self.segment(pos.segment).point_at(pos.t)
    }

    /// Builds a normalized position from an edge index and parameter.
    #[must_use]
    pub fn position(&self, segment: usize, t: f64) -> RingPosition {
        let len = self.segment(segment).length();
        if t >= 1.0 - TOLERANCE / len {
            RingPosition {
                segment: (segment + 1) % self.segment_count(),
                t: 0.0,
            }
        } else {
            RingPosition {
                segment,
                t: t.max(0.0),
            }
        }
    }

    /// Finds the boundary position of `p`, if it lies on this ring.
    #[must_use]
    pub fn locate_on_boundary(&self, p: &Point2) -> Option<RingPosition> {
        let (segment, dist) = self
            .segments()
            .enumerate()
            .map(|(i, s)| (i, s.distance_to(p)))
            .min_by(|a, b| a.1.total_cmp(&b.1))?;
        if dist > SNAP_DISTANCE {
            return None;
        }
        Some(self.position(segment, self.segment(segment).project(p)))
    }

    /// Vertices with repeated and collinear points removed, rotated to a
    /// canonical start. Traversal direction is preserved.
    #[must_use]
    pub fn normalized_vertices(&self) -> Vec<Point2> {
        rotate_to_canonical_start(&remove_collinear(self.vertices()))
    }

    /// `true` if both rings trace the same boundary in the same direction,
    /// regardless of start vertex and of redundant collinear vertices.
    #[must_use]
    pub fn equivalent(&self, other: &Ring) -> bool {
        let a = self.normalized_vertices();
        let b = other.normalized_vertices();
        a.len() == b.len() && a.iter().zip(&b).all(|(p, q)| (p - q).norm() <= SNAP_DISTANCE)
    }
}

/// Drops points within `TOLERANCE` of their predecessor.
pub(crate) fn dedup_consecutive(points: Vec<Point2>) -> Vec<Point2> {
    let mut out: Vec<Point2> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_none_or(|last| (p - last).norm() > TOLERANCE) {
            out.push(p);
        }
    }
    out
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::from_open(&[p(x0, y0), p(x1, y0), p(x1, y1), p(x0, y1)]).unwrap()
    }

    #[test]
    fn closed_square_is_valid() {
        let ring = square(0.0, 0.0, 10.0, 10.0);
        assert_eq!(ring.points().len(), 5);
        assert_eq!(ring.segment_count(), 4);
        assert_relative_eq!(ring.signed_area(), 100.0);
        assert_eq!(ring.orientation(), Orientation::CounterClockwise);
        assert!(ring.is_simple());
    }

    #[test]
    fn too_few_points_rejected() {
        let err = Ring::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(0.0, 0.0)]).unwrap_err();
        assert_eq!(
            err,
            GeometryError::TooFewPoints {
                found: 3,
                required: 4
            }
        );
    }

    #[test]
    fn open_ring_rejected() {
        let err = Ring::new(vec![p(0.0, 0.0), p(1.0, 0.0), p(1.0, 1.0), p(0.0, 1.0)]).unwrap_err();
        assert_eq!(err, GeometryError::NotClosed);
    }

    #[test]
    fn collinear_ring_is_degenerate() {
        let err = Ring::from_open(&[p(0.0, 0.0), p(1.0, 0.0), p(2.0, 0.0)]).unwrap_err();
        assert!(matches!(err, GeometryError::Degenerate(_)));
    }

    #[test]
    fn bow_tie_is_self_intersecting() {
        let err = Ring::from_open(&[p(0.0, 0.0), p(4.0, 4.0), p(4.0, 0.0), p(0.0, 2.0)]).unwrap_err();
        let GeometryError::SelfIntersecting { x, y } = err else {
            panic!("expected self-intersection, got {err:?}");
        };
        assert_relative_eq!(x, 4.0 / 3.0, epsilon = 1e-12);
        assert_relative_eq!(y, 4.0 / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn backtracking_spike_is_self_intersecting() {
        let err = Ring::from_open(&[
            p(0.0, 0.0),
            p(4.0, 0.0),
            p(4.0, 4.0),
            p(4.0, 6.0),
            p(4.0, 2.0),
            p(0.0, 4.0),
        ])
        .unwrap_err();
        assert!(matches!(err, GeometryError::SelfIntersecting { .. }));
    }

    #[test]
    fn duplicate_vertices_collapse() {
        let ring = Ring::from_open(&[
            p(0.0, 0.0),
            p(0.0, 0.0),
            p(1.0, 0.0),
            p(1.0, 1.0),
            p(1.0, 1.0),
        ])
        .unwrap();
        assert_eq!(ring.vertices().len(), 3);
    }

    #[test]
    fn orientation_helpers() {
        let ring = square(0.0, 0.0, 1.0, 1.0);
        let cw = ring.clone().oriented(Orientation::Clockwise);
        assert_eq!(cw.orientation(), Orientation::Clockwise);
        assert_relative_eq!(cw.signed_area(), -1.0);
        assert_eq!(cw.oriented(Orientation::CounterClockwise), ring);
        assert_eq!(Orientation::Clockwise.reversed(), Orientation::CounterClockwise);
    }

    #[test]
    fn relations() {
        let outer = square(0.0, 0.0, 10.0, 10.0);
        assert_eq!(outer.relate(&square(2.0, 2.0, 4.0, 4.0)), RingRelation::Inside);
        assert_eq!(outer.relate(&square(12.0, 2.0, 14.0, 4.0)), RingRelation::Outside);
        assert_eq!(outer.relate(&square(8.0, 2.0, 14.0, 4.0)), RingRelation::Crossing);
        assert_eq!(outer.relate(&outer.reversed()), RingRelation::Coincident);
        // Sharing an edge from inside or outside is not crossing.
        assert_eq!(outer.relate(&square(0.0, 0.0, 4.0, 4.0)), RingRelation::Inside);
        assert_eq!(outer.relate(&square(10.0, 0.0, 14.0, 4.0)), RingRelation::Outside);
        assert!(outer.contains_ring(&square(1.0, 1.0, 2.0, 2.0)));
    }

    #[test]
    fn chord_across_a_notch_is_crossing() {
        // U shape; the tested ring's top edge bridges the gap between the arms.
        let u = Ring::from_open(&[
            p(0.0, 0.0),
            p(6.0, 0.0),
            p(6.0, 6.0),
            p(4.0, 6.0),
            p(4.0, 2.0),
            p(2.0, 2.0),
            p(2.0, 6.0),
            p(0.0, 6.0),
        ])
        .unwrap();
        let bridge = square(1.0, 1.0, 5.0, 6.0);
        assert_eq!(u.relate(&bridge), RingRelation::Crossing);
    }

    #[test]
    fn boundary_positions() {
        let ring = square(0.0, 0.0, 10.0, 10.0);
        let pos = ring.locate_on_boundary(&p(10.0, 4.0)).unwrap();
        assert_eq!(pos.segment, 1);
        assert_relative_eq!(pos.t, 0.4);
        assert_relative_eq!(ring.point_at(pos), p(10.0, 4.0));

        // The end of an edge is the start of the next one.
        let corner = ring.locate_on_boundary(&p(10.0, 10.0)).unwrap();
        assert_eq!(corner.segment, 2);
        assert_relative_eq!(corner.t, 0.0);
        assert_relative_eq!(corner.param(), 2.0);

        assert!(ring.locate_on_boundary(&p(5.0, 5.0)).is_none());
    }

    #[test]
    fn equivalence_ignores_start_and_collinear_vertices() {
        let a = square(0.0, 0.0, 10.0, 10.0);
        let b = Ring::from_open(&[
            p(10.0, 5.0),
            p(10.0, 10.0),
            p(0.0, 10.0),
            p(0.0, 0.0),
            p(10.0, 0.0),
        ])
        .unwrap();
        assert!(a.equivalent(&b));
        assert!(!a.equivalent(&b.reversed()));
        assert!(!a.equivalent(&square(0.0, 0.0, 10.0, 11.0)));
    }
}

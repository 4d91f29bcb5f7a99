use crate::math::distance_2d::{point_to_segment_dist, project_to_segment};
use crate::math::intersect_2d::{segment_contact_2d, SegmentContact};
use crate::math::{Point2, Vector2};

/// A straight segment between two points.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Segment {
    pub start: Point2,
    pub end: Point2,
}

impl Segment {
    /// Creates a new segment.
    #[must_use]
    pub fn new(start: Point2, end: Point2) -> Self {
        Self { start, end }
    }

    /// Direction vector `end - start` (not normalized).
    #[must_use]
    pub fn vector(&self) -> Vector2 {
        self.end - self.start
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.vector().norm()
    }

    /// Point at parameter `t` (`0` = start, `1` = end).
    #[must_use]
    pub fn point_at(&self, t: f64) -> Point2 {
        self.start + self.vector() * t
    }

    #[must_use]
    pub fn midpoint(&self) -> Point2 {
        self.point_at(0.5)
    }

    /// Parameter of the point on this segment closest to `p`.
    #[must_use]
    pub fn project(&self, p: &Point2) -> f64 {
        project_to_segment(p, &self.start, &self.end)
    }

    #[must_use]
    pub fn distance_to(&self, p: &Point2) -> f64 {
        point_to_segment_dist(p, &self.start, &self.end)
    }

    /// Contact with `other`; parameters of the result refer to `self` first.
    #[must_use]
    pub fn contact(&self, other: &Segment) -> Option<SegmentContact> {
        segment_contact_2d(&self.start, &self.end, &other.start, &other.end)
    }

    #[must_use]
    pub fn reversed(&self) -> Self {
        Self::new(self.end, self.start)
    }
}

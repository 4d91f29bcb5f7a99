use crate::error::GeometryError;
use crate::math::{Point2, TOLERANCE};

use super::ring::dedup_consecutive;
use super::{Ring, Segment};

/// A location on an open line: segment index plus parameter on that segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePosition {
    pub segment: usize,
    pub t: f64,
}

/// The open polyline drawn by the user, with cumulative segment lengths.
#[derive(Debug, Clone, PartialEq)]
pub struct ReshapeLine {
    points: Vec<Point2>,
    cumulative: Vec<f64>,
}

impl ReshapeLine {
    /// Creates a line from its vertices, collapsing consecutive duplicates.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` if fewer than 2 distinct
    /// vertices remain.
    pub fn new(points: &[Point2]) -> Result<Self, GeometryError> {
        let points = dedup_consecutive(points.to_vec());
        if points.len() < 2 {
            return Err(GeometryError::TooFewPoints {
                found: points.len(),
                required: 2,
            });
        }
        let mut cumulative = Vec::with_capacity(points.len());
        let mut total = 0.0;
        cumulative.push(total);
        for w in points.windows(2) {
            total += (w[1] - w[0]).norm();
            cumulative.push(total);
        }
        Ok(Self { points, cumulative })
    }

    #[must_use]
    pub fn points(&self) -> &[Point2] {
        &self.points
    }

    #[must_use]
    pub fn segment_count(&self) -> usize {
        self.points.len() - 1
    }

    #[must_use]
    pub fn segment(&self, i: usize) -> Segment {
        Segment::new(self.points[i], self.points[i + 1])
    }

    /// Distance along the line from its first point to vertex `i`.
    #[must_use]
    pub fn distance_to_vertex(&self, i: usize) -> f64 {
        self.cumulative[i]
    }

    #[must_use]
    pub fn length(&self) -> f64 {
        self.cumulative[self.cumulative.len() - 1]
    }

    /// `true` if the last point returns to the first.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        (self.points[self.points.len() - 1] - self.points[0]).norm() <= TOLERANCE
    }

    /// Point and normalized position at `distance` along the line.
    ///
    /// A point at the end of a segment is reported at the start of the next
    /// one, except for the final point of the line.
    #[must_use]
    pub fn point_at_distance(&self, distance: f64) -> (Point2, LinePosition) {
        let last_segment = self.segment_count() - 1;
        let d = distance.clamp(0.0, self.length());
        let segment = self
            .cumulative
            .partition_point(|&c| c < d)
            .saturating_sub(1)
            .min(last_segment);

        let seg = self.segment(segment);
        let len = seg.length();
        let t = ((d - self.cumulative[segment]) / len).clamp(0.0, 1.0);
        let position = if segment < last_segment && t >= 1.0 - TOLERANCE / len {
            LinePosition {
                segment: segment + 1,
                t: 0.0,
            }
        } else {
            LinePosition { segment, t }
        };
        (seg.point_at(t), position)
    }

    /// The part of the line between two positions, `from` not after `to`,
    /// starting exactly at `from_point` and ending at `to_point`.
    #[must_use]
    pub fn sub_line(
        &self,
        from: LinePosition,
        from_point: Point2,
        to: LinePosition,
        to_point: Point2,
    ) -> Vec<Point2> {
        let mut points = Vec::with_capacity(to.segment.saturating_sub(from.segment) + 2);
        points.push(from_point);
        if to.segment > from.segment {
            points.extend_from_slice(&self.points[from.segment + 1..=to.segment]);
        }
        points.push(to_point);
        dedup_consecutive(points)
    }

    /// Closes the line back to its first point and builds a ring.
    ///
    /// # Errors
    ///
    /// Same as [`Ring::new`].
    pub fn to_ring(&self) -> Result<Ring, GeometryError> {
        Ring::from_open(&self.points)
    }
}

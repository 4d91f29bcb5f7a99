use crate::config::ReshapeOptions;
use crate::error::GeometryError;
use crate::geometry::{Geometry, MultiPolygon, Polygon, Ring, RingRelation};
use crate::math::Point2;

/// Closes a drawn line into a ring and appends it as a new part.
pub struct MakePart {
    points: Vec<Point2>,
    options: ReshapeOptions,
}

impl MakePart {
    /// Creates a new `MakePart` operation with default options.
    #[must_use]
    pub fn new(points: Vec<Point2>) -> Self {
        Self {
            points,
            options: ReshapeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReshapeOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the operation, returning `existing` plus the new part.
    ///
    /// The new ring may touch existing parts or sit inside one of their
    /// holes, but must not overlap their material.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` if the closed line is not a valid ring, and
    /// `GeometryError::Overlapping` if it overlaps an existing part.
    pub fn execute(&self, existing: &Geometry) -> Result<MultiPolygon, GeometryError> {
        let ring = Ring::from_open(&self.points)?.oriented(self.options.outer_orientation);
        for (i, part) in existing.parts().iter().enumerate() {
            match part.exterior.relate(&ring) {
                RingRelation::Outside => {
                    if ring.relate(&part.exterior) != RingRelation::Outside {
                        return Err(GeometryError::Overlapping(format!(
                            "drawn ring encloses part {i}"
                        )));
                    }
                }
                RingRelation::Inside => {
                    if part.hole_containing(&ring).is_none() {
                        return Err(GeometryError::Overlapping(format!(
                            "drawn ring lies in the material of part {i}"
                        )));
                    }
                }
                RingRelation::Crossing | RingRelation::Coincident => {
                    return Err(GeometryError::Overlapping(format!(
                        "drawn ring crosses part {i}"
                    )));
                }
            }
        }

        let mut result = existing.to_multi_polygon();
        result.parts.push(Polygon::from_exterior(ring));
        Ok(result)
    }
}

/// Appends the ring closed from `drawn` to `existing` as a new part, see
/// [`MakePart`].
///
/// # Errors
///
/// Same as [`MakePart::execute`].
pub fn compute_new_part(
    drawn: &[Point2],
    existing: &Geometry,
    options: &ReshapeOptions,
) -> Result<MultiPolygon, GeometryError> {
    MakePart::new(drawn.to_vec())
        .with_options(*options)
        .execute(existing)
}

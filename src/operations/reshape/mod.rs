//! Reshaping polygon boundaries with a user-drawn line.
//!
//! The line's intersections with the target's rings are paired along the
//! line and each pair replaces the ring arc between its two points. A line
//! that meets no boundary is closed and becomes a hole or a new part.

mod intersections;
mod placement;
mod resolve;
mod splice;
mod topology;

pub use intersections::{find_intersections, IntersectionKind, IntersectionPoint, IntersectionSet};
pub use splice::{Candidate, RingSplice, SpliceCandidates, SplicePolicy, SpliceResult};

use tracing::{debug, info};

use crate::config::ReshapeOptions;
use crate::error::{GeometryError, ReshapeError, Result};
use crate::geometry::{Geometry, ReshapeLine};
use crate::math::Point2;
use crate::operations::query::IsValid;

use self::topology::WorkingTopology;

/// Why a reshape left the geometry unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoOpReason {
    /// The closed line lies inside an existing hole and encloses nothing.
    InsideHole,
    /// The line runs along a ring's boundary only.
    RetracesBoundary,
}

/// What a reshape did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReshapeOutcome {
    NoOp(NoOpReason),
    /// Ring arcs were replaced by parts of the line.
    ArcsReplaced { splices: usize, rings_removed: usize },
    /// The closed line became a hole of the part at index `part`.
    HoleAdded { part: usize, rings_removed: usize },
    /// The closed line became a new part.
    PartAdded { rings_removed: usize },
}

/// A reshaped geometry and what happened to it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reshaped {
    pub geometry: Geometry,
    pub outcome: ReshapeOutcome,
}

impl Reshaped {
    #[must_use]
    pub fn is_no_op(&self) -> bool {
        matches!(self.outcome, ReshapeOutcome::NoOp(_))
    }
}

/// Reshapes a polygon or multipolygon with a drawn line.
pub struct Reshape {
    line: Vec<Point2>,
    options: ReshapeOptions,
}

impl Reshape {
    /// Creates a new `Reshape` operation with default options.
    #[must_use]
    pub fn new(line: Vec<Point2>) -> Self {
        Self {
            line,
            options: ReshapeOptions::default(),
        }
    }

    #[must_use]
    pub fn with_options(mut self, options: ReshapeOptions) -> Self {
        self.options = options;
        self
    }

    /// Executes the operation, returning the reshaped geometry.
    ///
    /// The input is never modified; on error nothing has changed.
    ///
    /// # Errors
    ///
    /// Returns a `GeometryError` for a line with fewer than 2 distinct
    /// points or an invalid input geometry, and a `ReshapeError` if the line
    /// cannot be applied or the result would be invalid.
    pub fn execute(&self, geometry: &Geometry) -> Result<Reshaped> {
        let line = ReshapeLine::new(&self.line)?;
        let parts = geometry.parts();
        if parts.is_empty() {
            return Err(GeometryError::InvalidInput("geometry has no parts".into()).into());
        }
        if let Some(issue) = IsValid::new(parts).first_issue() {
            return Err(GeometryError::InvalidInput(issue).into());
        }

        let mut topology = WorkingTopology::from_parts(parts);
        let hits = find_intersections(&line, topology.rings());
        if hits.boundary_ring().is_some() {
            debug!("line retraces a boundary");
            return Ok(unchanged(geometry, NoOpReason::RetracesBoundary));
        }

        debug!(intersections = hits.len(), "reshaping");
        let outcome = if hits.is_empty() {
            placement::place_closed_line(&mut topology, &line, &self.options)?
        } else {
            resolve::splice_pairs(&mut topology, &line, &hits, &self.options)?
        };
        if let ReshapeOutcome::NoOp(reason) = outcome {
            return Ok(unchanged(geometry, reason));
        }

        let parts = topology.to_parts();
        if let Some(issue) = IsValid::new(&parts).first_issue() {
            return Err(ReshapeError::InvalidResultGeometry(issue).into());
        }
        info!(?outcome, parts = parts.len(), "reshape applied");
        Ok(Reshaped {
            geometry: geometry.with_parts(parts),
            outcome,
        })
    }
}

fn unchanged(geometry: &Geometry, reason: NoOpReason) -> Reshaped {
    Reshaped {
        geometry: geometry.clone(),
        outcome: ReshapeOutcome::NoOp(reason),
    }
}

/// Reshapes `geometry` with `line`, see [`Reshape`].
///
/// # Errors
///
/// Same as [`Reshape::execute`].
pub fn compute_reshape(
    geometry: &Geometry,
    line: &[Point2],
    options: &ReshapeOptions,
) -> Result<Reshaped> {
    Reshape::new(line.to_vec()).with_options(*options).execute(geometry)
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::StreamshapeError;
    use crate::geometry::{MultiPolygon, Orientation, Polygon, Ring};
    use approx::assert_relative_eq;

    fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }

    fn p(x: f64, y: f64) -> Point2 {
        Point2::new(x, y)
    }

    fn pts(coords: &[(f64, f64)]) -> Vec<Point2> {
        coords.iter().map(|&(x, y)| p(x, y)).collect()
    }

    fn ring(coords: &[(f64, f64)]) -> Ring {
        Ring::from_open(&pts(coords)).unwrap()
    }

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        ring(&[(x0, y0), (x1, y0), (x1, y1), (x0, y1)])
    }

    fn unit_square() -> Geometry {
        Polygon::from_exterior(square(0.0, 0.0, 10.0, 10.0)).into()
    }

    fn square_with_hole() -> Geometry {
        Polygon::new(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(4.0, 4.0, 6.0, 6.0).reversed()],
        )
        .into()
    }

    fn reshape(geometry: &Geometry, line: &[(f64, f64)]) -> Result<Reshaped> {
        reshape_with(geometry, line, SplicePolicy::default())
    }

    fn reshape_with(
        geometry: &Geometry,
        line: &[(f64, f64)],
        splice_policy: SplicePolicy,
    ) -> Result<Reshaped> {
        init_tracing();
        let options = ReshapeOptions {
            splice_policy,
            ..ReshapeOptions::default()
        };
        compute_reshape(geometry, &pts(line), &options)
    }

    fn assert_ambiguous(result: Result<Reshaped>, x: f64, y: f64) {
        let err = result.unwrap_err();
        let StreamshapeError::Reshape(ReshapeError::AmbiguousSplice { at, .. }) = err else {
            panic!("expected ambiguous splice, got {err:?}");
        };
        assert_relative_eq!(at.0, x, epsilon = 1e-6);
        assert_relative_eq!(at.1, y, epsilon = 1e-6);
    }

    #[test]
    fn straight_cut_is_ambiguous() {
        assert_ambiguous(reshape(&unit_square(), &[(5.0, -1.0), (5.0, 11.0)]), 5.0, 0.0);
        assert_ambiguous(reshape(&unit_square(), &[(5.0, 11.0), (5.0, -1.0)]), 5.0, 10.0);
        assert_ambiguous(
            reshape_with(&unit_square(), &[(5.0, -1.0), (5.0, 11.0)], SplicePolicy::LargerArea),
            5.0,
            0.0,
        );
    }

    #[test]
    fn straight_cut_far_from_origin_is_ambiguous() {
        let (x0, y0) = (512_345.678, 4_123_456.789);
        let geometry: Geometry =
            Polygon::from_exterior(square(x0, y0, x0 + 10.0, y0 + 10.0)).into();
        let line = [(x0 + 5.0, y0 - 1.0), (x0 + 5.0, y0 + 11.0)];
        for policy in [SplicePolicy::RejectAmbiguous, SplicePolicy::LargerArea] {
            let err = reshape_with(&geometry, &line, policy).unwrap_err();
            assert!(
                matches!(err, StreamshapeError::Reshape(ReshapeError::AmbiguousSplice { .. })),
                "{policy:?}: {err:?}"
            );
        }
    }

    #[test]
    fn straight_cut_can_follow_the_drawing_direction() {
        let policy = SplicePolicy::FollowDrawDirection;
        let up = reshape_with(&unit_square(), &[(5.0, -1.0), (5.0, 11.0)], policy).unwrap();
        assert_eq!(
            up.outcome,
            ReshapeOutcome::ArcsReplaced {
                splices: 1,
                rings_removed: 0
            }
        );
        let Geometry::Polygon(poly) = &up.geometry else {
            panic!("expected a polygon");
        };
        assert!(poly.exterior.equivalent(&square(0.0, 0.0, 5.0, 10.0)));
        assert_relative_eq!(up.geometry.area(), 50.0, epsilon = 1e-9);

        let down = reshape_with(&unit_square(), &[(5.0, 11.0), (5.0, -1.0)], policy).unwrap();
        let poly = &down.geometry.parts()[0];
        assert!(poly.exterior.equivalent(&square(5.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn deep_notch_is_ambiguous_by_default() {
        // Outlines a block larger than what remains around it.
        let line = [(1.0, -1.0), (1.0, 9.0), (9.0, 9.0), (9.0, -1.0)];
        assert_ambiguous(reshape(&unit_square(), &line), 1.0, 0.0);

        let by_area = reshape_with(&unit_square(), &line, SplicePolicy::LargerArea).unwrap();
        let block = &by_area.geometry.parts()[0].exterior;
        assert!(block.equivalent(&square(1.0, 0.0, 9.0, 9.0)));
        assert_relative_eq!(by_area.geometry.area(), 72.0, epsilon = 1e-9);

        let by_direction =
            reshape_with(&unit_square(), &line, SplicePolicy::FollowDrawDirection).unwrap();
        assert_relative_eq!(by_direction.geometry.area(), 28.0, epsilon = 1e-9);
    }

    #[test]
    fn extension_grows_the_exterior() {
        let line = [(10.0, 2.0), (14.0, 2.0), (14.0, 8.0), (10.0, 8.0)];
        let result = reshape(&unit_square(), &line).unwrap();
        assert_relative_eq!(result.geometry.area(), 124.0);
        assert_eq!(
            result.geometry.parts()[0].exterior.orientation(),
            Orientation::CounterClockwise
        );

        // Drawn the other way round: same shape.
        let reversed: Vec<_> = line.iter().rev().copied().collect();
        let again = reshape(&unit_square(), &reversed).unwrap();
        assert!(again.geometry.equivalent(&result.geometry));
    }

    #[test]
    fn closed_line_inside_becomes_a_hole() {
        let line = [(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)];
        let result = reshape(&unit_square(), &line).unwrap();
        assert_eq!(
            result.outcome,
            ReshapeOutcome::HoleAdded {
                part: 0,
                rings_removed: 0
            }
        );
        let poly = &result.geometry.parts()[0];
        assert_eq!(poly.interiors.len(), 1);
        assert_eq!(poly.interiors[0].orientation(), Orientation::Clockwise);
        assert_relative_eq!(result.geometry.area(), 84.0);
    }

    #[test]
    fn open_line_inside_is_closed_implicitly() {
        let result = reshape(&unit_square(), &[(3.0, 3.0), (7.0, 3.0), (7.0, 7.0)]).unwrap();
        assert!(matches!(result.outcome, ReshapeOutcome::HoleAdded { .. }));
        assert_relative_eq!(result.geometry.area(), 92.0);
    }

    #[test]
    fn discarded_arc_takes_the_hole_with_it() {
        let line = [(2.0, -1.0), (2.0, 8.0), (8.0, 8.0), (8.0, -1.0)];
        let result = reshape_with(&square_with_hole(), &line, SplicePolicy::LargerArea).unwrap();
        assert_eq!(
            result.outcome,
            ReshapeOutcome::ArcsReplaced {
                splices: 1,
                rings_removed: 1
            }
        );
        let poly = &result.geometry.parts()[0];
        assert!(poly.interiors.is_empty());
        let notch = ring(&[
            (8.0, 0.0),
            (10.0, 0.0),
            (10.0, 10.0),
            (0.0, 10.0),
            (0.0, 0.0),
            (2.0, 0.0),
            (2.0, 8.0),
            (8.0, 8.0),
        ]);
        assert!(poly.exterior.equivalent(&notch));
    }

    #[test]
    fn closed_line_outside_adds_a_part() {
        let line = [(20.0, 0.0), (25.0, 0.0), (25.0, 5.0), (20.0, 5.0)];
        let result = reshape(&unit_square(), &line).unwrap();
        assert_eq!(result.outcome, ReshapeOutcome::PartAdded { rings_removed: 0 });
        let Geometry::MultiPolygon(mp) = &result.geometry else {
            panic!("expected a multipolygon");
        };
        assert_eq!(mp.len(), 2);
        assert!(mp.parts[0].equivalent(&unit_square().parts()[0]));
        assert_eq!(
            mp.parts[1].exterior.orientation(),
            Orientation::CounterClockwise
        );
    }

    #[test]
    fn outer_orientation_follows_the_options() {
        init_tracing();
        let options = ReshapeOptions {
            outer_orientation: Orientation::Clockwise,
            ..ReshapeOptions::default()
        };
        let line = pts(&[(20.0, 0.0), (25.0, 0.0), (25.0, 5.0)]);
        let result = compute_reshape(&unit_square(), &line, &options).unwrap();
        assert_eq!(
            result.geometry.parts()[1].exterior.orientation(),
            Orientation::Clockwise
        );
    }

    #[test]
    fn touching_at_a_vertex_is_not_a_splice() {
        // Meets the corner, then closes into a triangle outside the square.
        let line = [(12.0, 8.0), (10.0, 10.0), (12.0, 12.0)];
        let result = reshape(&unit_square(), &line).unwrap();
        assert_eq!(result.outcome, ReshapeOutcome::PartAdded { rings_removed: 0 });
        assert!(result.geometry.parts()[0].equivalent(&unit_square().parts()[0]));
    }

    #[test]
    fn retracing_the_boundary_changes_nothing() {
        let geometry = unit_square();
        let result = reshape(&geometry, &[(2.0, 0.0), (10.0, 0.0), (10.0, 6.0)]).unwrap();
        assert_eq!(result.outcome, ReshapeOutcome::NoOp(NoOpReason::RetracesBoundary));
        assert!(result.is_no_op());
        assert_eq!(result.geometry, geometry);
    }

    #[test]
    fn reshaping_along_the_result_is_idempotent() {
        let geometry = unit_square();
        let line = [(10.0, 2.0), (14.0, 2.0), (14.0, 8.0), (10.0, 8.0)];
        let first = reshape(&geometry, &line).unwrap();
        // The new boundary arc, drawn again, touches the result only.
        let second = reshape(&first.geometry, &line).unwrap();
        assert!(second.is_no_op());
        assert!(second.geometry.equivalent(&first.geometry));
    }

    #[test]
    fn reshaping_back_along_the_old_boundary_restores_the_input() {
        let geometry = unit_square();
        let grown = reshape(&geometry, &[(10.0, 2.0), (14.0, 2.0), (14.0, 8.0), (10.0, 8.0)]).unwrap();
        let restored = reshape(&grown.geometry, &[(10.0, 1.0), (10.0, 9.0)]).unwrap();
        assert!(restored.geometry.equivalent(&geometry));
    }

    #[test]
    fn several_pairs_apply_in_line_order() {
        // Cuts two notches into the top edge with one line.
        let line = [
            (2.0, 11.0),
            (2.0, 8.0),
            (3.0, 8.0),
            (3.0, 11.0),
            (6.0, 11.0),
            (6.0, 8.0),
            (7.0, 8.0),
            (7.0, 11.0),
        ];
        assert_ambiguous(reshape(&unit_square(), &line), 2.0, 10.0);
        let result = reshape_with(&unit_square(), &line, SplicePolicy::LargerArea).unwrap();
        assert!(matches!(
            result.outcome,
            ReshapeOutcome::ArcsReplaced { splices: 2, .. }
        ));
        assert_relative_eq!(result.geometry.area(), 100.0 - 2.0 - 2.0, epsilon = 1e-9);
    }

    #[test]
    fn hole_can_be_reshaped() {
        // Pushes the hole's right side out to x = 8.
        let line = [(6.0, 4.5), (8.0, 4.5), (8.0, 5.5), (6.0, 5.5)];
        let result = reshape(&square_with_hole(), &line).unwrap();
        let poly = &result.geometry.parts()[0];
        assert_eq!(poly.interiors.len(), 1);
        assert_relative_eq!(poly.interiors[0].area(), 6.0);
        assert_eq!(poly.interiors[0].orientation(), Orientation::Clockwise);
    }

    #[test]
    fn hole_collapsing_to_a_spike_is_removed() {
        // Starts on the hole's right edge, runs out into the material and
        // comes back along itself: the only closed replacement has no area.
        let line = [(6.0, 5.0), (6.0, 7.0), (6.0, 5.5)];
        let result = reshape(&square_with_hole(), &line).unwrap();
        assert_eq!(
            result.outcome,
            ReshapeOutcome::ArcsReplaced {
                splices: 1,
                rings_removed: 1
            }
        );
        let poly = &result.geometry.parts()[0];
        assert!(poly.interiors.is_empty());
        assert!(poly.exterior.equivalent(&square(0.0, 0.0, 10.0, 10.0)));
    }

    #[test]
    fn circumvented_hole_is_replaced() {
        let line = [(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0), (3.0, 3.0)];
        let result = reshape(&square_with_hole(), &line).unwrap();
        assert_eq!(
            result.outcome,
            ReshapeOutcome::HoleAdded {
                part: 0,
                rings_removed: 1
            }
        );
        let poly = &result.geometry.parts()[0];
        assert_eq!(poly.interiors.len(), 1);
        assert_relative_eq!(poly.interiors[0].area(), 16.0);
    }

    #[test]
    fn closed_line_in_a_hole_is_a_no_op() {
        let donut: Geometry = Polygon::new(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(2.0, 2.0, 8.0, 8.0).reversed()],
        )
        .into();
        let line = [(4.0, 4.0), (6.0, 4.0), (6.0, 6.0), (4.0, 6.0)];
        let result = reshape(&donut, &line).unwrap();
        assert_eq!(result.outcome, ReshapeOutcome::NoOp(NoOpReason::InsideHole));
        assert_eq!(result.geometry, donut);
    }

    #[test]
    fn ring_around_an_island_replaces_it() {
        let donut = Polygon::new(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(2.0, 2.0, 8.0, 8.0).reversed()],
        );
        let island = Polygon::from_exterior(square(4.0, 4.0, 5.0, 5.0));
        let geometry: Geometry = MultiPolygon::new(vec![donut, island]).into();
        let line = [(3.0, 3.0), (7.0, 3.0), (7.0, 7.0), (3.0, 7.0)];
        let result = reshape(&geometry, &line).unwrap();
        assert_eq!(result.outcome, ReshapeOutcome::PartAdded { rings_removed: 1 });
        let parts = result.geometry.parts();
        assert_eq!(parts.len(), 2);
        assert_relative_eq!(parts[1].area(), 16.0);
    }

    #[test]
    fn ring_around_a_part_replaces_it() {
        let geometry: Geometry = MultiPolygon::new(vec![
            Polygon::from_exterior(square(0.0, 0.0, 10.0, 10.0)),
            Polygon::from_exterior(square(20.0, 0.0, 22.0, 2.0)),
        ])
        .into();
        let line = [(19.0, -1.0), (23.0, -1.0), (23.0, 3.0), (19.0, 3.0)];
        let result = reshape(&geometry, &line).unwrap();
        assert_eq!(result.outcome, ReshapeOutcome::PartAdded { rings_removed: 1 });
        assert_relative_eq!(result.geometry.area(), 116.0);
    }

    #[test]
    fn single_crossing_is_malformed() {
        let err = reshape(&unit_square(), &[(5.0, 5.0), (5.0, 15.0)]).unwrap_err();
        let StreamshapeError::Reshape(ReshapeError::MalformedReshape { at, .. }) = err else {
            panic!("expected malformed reshape, got {err:?}");
        };
        assert_relative_eq!(at.0, 5.0);
        assert_relative_eq!(at.1, 10.0);
    }

    #[test]
    fn leaving_through_a_hole_is_malformed() {
        let err = reshape(&square_with_hole(), &[(-1.0, 5.0), (5.0, 5.0)]).unwrap_err();
        assert!(matches!(
            err,
            StreamshapeError::Reshape(ReshapeError::MalformedReshape { .. })
        ));
    }

    #[test]
    fn closing_across_the_boundary_is_malformed() {
        // An L outside the square whose closing segment cuts through it.
        let line = [(-2.0, 12.0), (-2.0, -2.0), (12.0, -2.0)];
        let err = reshape(&unit_square(), &line).unwrap_err();
        assert!(matches!(
            err,
            StreamshapeError::Reshape(ReshapeError::MalformedReshape { .. })
        ));
    }

    #[test]
    fn too_short_line_is_rejected() {
        let err = reshape(&unit_square(), &[(1.0, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            StreamshapeError::Geometry(GeometryError::TooFewPoints { found: 1, required: 2 })
        ));
    }

    #[test]
    fn invalid_input_is_rejected_before_reshaping() {
        let overlapping: Geometry = MultiPolygon::new(vec![
            Polygon::from_exterior(square(0.0, 0.0, 10.0, 10.0)),
            Polygon::from_exterior(square(5.0, 5.0, 15.0, 15.0)),
        ])
        .into();
        let err = reshape(&overlapping, &[(20.0, 0.0), (21.0, 0.0), (21.0, 1.0)]).unwrap_err();
        assert!(matches!(
            err,
            StreamshapeError::Geometry(GeometryError::InvalidInput(_))
        ));
    }

    #[test]
    fn line_running_into_another_part_is_malformed() {
        let geometry: Geometry = MultiPolygon::new(vec![
            Polygon::from_exterior(square(0.0, 0.0, 10.0, 10.0)),
            Polygon::from_exterior(square(12.0, 0.0, 20.0, 10.0)),
        ])
        .into();
        // Extends the first part over half of the second one.
        let line = [(10.0, 2.0), (16.0, 2.0), (16.0, 8.0), (10.0, 8.0)];
        let err = reshape(&geometry, &line).unwrap_err();
        let StreamshapeError::Reshape(ReshapeError::MalformedReshape { at, .. }) = err else {
            panic!("expected malformed reshape, got {err:?}");
        };
        assert_relative_eq!(at.0, 12.0, epsilon = 1e-9);
        assert_relative_eq!(at.1, 2.0, epsilon = 1e-9);
    }
}

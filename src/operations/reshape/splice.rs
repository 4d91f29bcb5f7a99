use std::fmt;

use tracing::debug;

use crate::error::{GeometryError, ReshapeError};
use crate::geometry::{Orientation, Ring, RingKind, RingPosition};
use crate::math::Point2;

/// Relative area difference below which two replacement rings count as
/// equally large.
const AREA_TIE_RATIO: f64 = 1e-6;

/// How to choose when both replacement rings of a splice are valid.
///
/// Both rings are valid whenever the line cuts across a ring's interior, so
/// the geometry alone cannot tell which side the user meant to keep.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum SplicePolicy {
    /// Fail with `ReshapeError::AmbiguousSplice`.
    #[default]
    RejectAmbiguous,
    /// Keep the ring with the larger area. Areas equal within a relative
    /// tolerance fail with `ReshapeError::AmbiguousSplice`.
    LargerArea,
    /// Keep the ring that traverses the reshape line in drawing direction.
    FollowDrawDirection,
}

/// One replacement ring built by a splice.
#[derive(Debug, Clone, PartialEq)]
pub enum Candidate {
    Valid(Ring),
    /// Collapsed to fewer than three vertices or to zero area.
    Degenerate(GeometryError),
    /// Self-intersecting, or traversed against the original ring.
    Invalid(String),
}

impl Candidate {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        matches!(self, Self::Valid(_))
    }

    fn build(points: Vec<Point2>, orientation: Orientation) -> Self {
        match Ring::new(points) {
            Ok(ring) if ring.orientation() == orientation => Self::Valid(ring),
            Ok(_) => Self::Invalid("orientation flipped".into()),
            Err(e @ (GeometryError::TooFewPoints { .. } | GeometryError::Degenerate(_))) => {
                Self::Degenerate(e)
            }
            Err(e) => Self::Invalid(e.to_string()),
        }
    }
}

impl fmt::Display for Candidate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Valid(_) => write!(f, "valid"),
            Self::Degenerate(e) => write!(f, "degenerate: {e}"),
            Self::Invalid(why) => write!(f, "invalid: {why}"),
        }
    }
}

/// Both replacement rings of a splice.
#[derive(Debug, Clone, PartialEq)]
pub struct SpliceCandidates {
    /// Ring arc from exit to entry, then the line from entry to exit.
    pub forward: Candidate,
    /// Ring arc from entry to exit, then the line from exit back to entry.
    pub reversed: Candidate,
}

/// Result of replacing one ring arc.
#[derive(Debug, Clone, PartialEq)]
pub enum SpliceResult {
    Replaced(Ring),
    /// A hole shrank to nothing and should be removed.
    Collapsed,
}

/// Replaces the arc of a ring between two boundary positions with a line.
pub struct RingSplice<'a> {
    ring: &'a Ring,
    entry: RingPosition,
    exit: RingPosition,
    sub_line: &'a [Point2],
}

impl<'a> RingSplice<'a> {
    /// Creates a new `RingSplice`.
    ///
    /// `sub_line` runs from the point at `entry` to the point at `exit`.
    #[must_use]
    pub fn new(
        ring: &'a Ring,
        entry: RingPosition,
        exit: RingPosition,
        sub_line: &'a [Point2],
    ) -> Self {
        Self {
            ring,
            entry,
            exit,
            sub_line,
        }
    }

    /// Builds both replacement rings without choosing between them.
    #[must_use]
    pub fn candidates(&self) -> SpliceCandidates {
        let orientation = self.ring.orientation();

        let mut forward = forward_arc(self.ring, self.exit, self.entry);
        forward.extend(self.sub_line.iter().skip(1).copied());

        let mut reversed = forward_arc(self.ring, self.entry, self.exit);
        reversed.extend(self.sub_line.iter().rev().skip(1).copied());

        SpliceCandidates {
            forward: Candidate::build(forward, orientation),
            reversed: Candidate::build(reversed, orientation),
        }
    }

    /// Picks the replacement ring for a ring of the given kind.
    ///
    /// # Errors
    ///
    /// Returns `ReshapeError::AmbiguousSplice` if no candidate is valid
    /// (unless a hole collapsed), or if both are and `policy` cannot decide.
    pub fn execute(&self, kind: RingKind, policy: SplicePolicy) -> Result<SpliceResult, ReshapeError> {
        let at = self.ring.point_at(self.entry);
        let at = (at.x, at.y);
        let SpliceCandidates { forward, reversed } = self.candidates();
        match (forward, reversed) {
            (Candidate::Valid(forward), Candidate::Valid(reversed)) => {
                let forward_area = forward.area();
                let reversed_area = reversed.area();
                debug!(?policy, forward_area, reversed_area, "both replacement rings are valid");
                match policy {
                    SplicePolicy::RejectAmbiguous => Err(ReshapeError::AmbiguousSplice {
                        message: "both replacement rings are valid".into(),
                        at,
                    }),
                    SplicePolicy::FollowDrawDirection => Ok(SpliceResult::Replaced(forward)),
                    SplicePolicy::LargerArea => {
                        let larger = forward_area.max(reversed_area);
                        if (forward_area - reversed_area).abs() <= AREA_TIE_RATIO * larger {
                            Err(ReshapeError::AmbiguousSplice {
                                message: format!(
                                    "both replacement rings are valid and have area {larger}"
                                ),
                                at,
                            })
                        } else if reversed_area > forward_area {
                            Ok(SpliceResult::Replaced(reversed))
                        } else {
                            Ok(SpliceResult::Replaced(forward))
                        }
                    }
                }
            }
            (Candidate::Valid(ring), _) | (_, Candidate::Valid(ring)) => {
                Ok(SpliceResult::Replaced(ring))
            }
            (forward, reversed) => {
                let collapsed = matches!(forward, Candidate::Degenerate(_))
                    || matches!(reversed, Candidate::Degenerate(_));
                if kind == RingKind::Hole && collapsed {
                    Ok(SpliceResult::Collapsed)
                } else {
                    Err(ReshapeError::AmbiguousSplice {
                        message: format!(
                            "no valid replacement ring (forward {forward}, reversed {reversed})"
                        ),
                        at,
                    })
                }
            }
        }
    }
}

/// Boundary points from `from` to `to`, following the ring's direction.
///
/// Equal positions walk the whole ring.
fn forward_arc(ring: &Ring, from: RingPosition, to: RingPosition) -> Vec<Point2> {
    let n = ring.segment_count();
    let points = ring.points();
    let mut arc = vec![ring.point_at(from)];
    if from.segment == to.segment && to.t > from.t {
        arc.push(ring.point_at(to));
        return arc;
    }
    let mut seg = from.segment;
    loop {
        arc.push(points[seg + 1]);
        seg = (seg + 1) % n;
        if seg == to.segment {
            break;
        }
    }
    arc.push(ring.point_at(to));
    arc
}

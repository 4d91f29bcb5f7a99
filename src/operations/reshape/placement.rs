use tracing::debug;

use crate::config::ReshapeOptions;
use crate::error::{ReshapeError, Result};
use crate::geometry::{ReshapeLine, Ring, RingRelation};

use super::intersections::find_intersections;
use super::topology::{PartKey, RingKey, WorkingTopology};
use super::{NoOpReason, ReshapeOutcome};

/// Where a closed line that meets no boundary ends up.
enum Placement {
    /// In the material of a part.
    Material(PartKey),
    /// Inside a hole of some part.
    Hole,
    Outside,
}

/// Closes a line that meets no ring boundary and places the resulting ring:
/// as a hole when it lies in a part's material, as a new part otherwise.
///
/// Rings the new ring encloses are removed first.
///
/// # Errors
///
/// Returns a `GeometryError` if the closed line is not a valid ring, and
/// `ReshapeError::MalformedReshape` if closing it crosses a boundary.
pub(crate) fn place_closed_line(
    topology: &mut WorkingTopology,
    line: &ReshapeLine,
    options: &ReshapeOptions,
) -> Result<ReshapeOutcome> {
    let ring = line.to_ring()?;
    let closed = ReshapeLine::new(ring.points())?;
    if let Some(hit) = find_intersections(&closed, topology.rings()).ordered().first() {
        return Err(ReshapeError::MalformedReshape {
            message: "closing the line back to its start crosses a boundary".into(),
            at: (hit.location.x, hit.location.y),
        }
        .into());
    }

    let placement = locate(topology, &ring)?;
    let enclosed: Vec<RingKey> = topology
        .rings()
        .filter(|(_, other)| ring.relate(other) == RingRelation::Inside)
        .map(|(key, _)| key)
        .collect();
    let rings_removed: usize = enclosed
        .into_iter()
        .map(|key| topology.remove_ring(key))
        .sum();
    if rings_removed > 0 {
        debug!(rings_removed, "removed rings enclosed by the new ring");
    }

    match placement {
        Placement::Material(part) => {
            let orientation = topology
                .exterior(part)
                .map_or(options.hole_orientation(), |exterior| {
                    exterior.orientation().reversed()
                });
            topology.add_hole(part, ring.oriented(orientation));
            let part = topology.part_index(part).unwrap_or_default();
            debug!(part, "line closed into a new hole");
            Ok(ReshapeOutcome::HoleAdded {
                part,
                rings_removed,
            })
        }
        Placement::Hole if rings_removed == 0 => Ok(ReshapeOutcome::NoOp(NoOpReason::InsideHole)),
        Placement::Hole | Placement::Outside => {
            topology.add_part(ring.oriented(options.outer_orientation));
            debug!("line closed into a new part");
            Ok(ReshapeOutcome::PartAdded { rings_removed })
        }
    }
}

fn locate(topology: &WorkingTopology, ring: &Ring) -> Result<Placement> {
    let mut in_hole = false;
    for &part in topology.parts() {
        let Some(exterior) = topology.exterior(part) else {
            continue;
        };
        match exterior.relate(ring) {
            RingRelation::Inside => {
                let hole_contains = topology.holes(part).iter().any(|key| {
                    topology.ring(*key).is_some_and(|hole| {
                        matches!(
                            hole.relate(ring),
                            RingRelation::Inside | RingRelation::Coincident
                        )
                    })
                });
                if hole_contains {
                    in_hole = true;
                } else {
                    return Ok(Placement::Material(part));
                }
            }
            RingRelation::Outside => {}
            RingRelation::Crossing | RingRelation::Coincident => {
                let at = ring.points()[0];
                return Err(ReshapeError::MalformedReshape {
                    message: "closed line overlaps an exterior boundary".into(),
                    at: (at.x, at.y),
                }
                .into());
            }
        }
    }
    Ok(if in_hole {
        Placement::Hole
    } else {
        Placement::Outside
    })
}

use tracing::debug;

use crate::config::ReshapeOptions;
use crate::error::{ReshapeError, Result};
use crate::geometry::{ReshapeLine, RingRelation};
use crate::math::Point2;

use super::intersections::{IntersectionPoint, IntersectionSet};
use super::splice::{RingSplice, SpliceResult};
use super::topology::{RingKey, WorkingTopology};
use super::ReshapeOutcome;

fn malformed(message: impl Into<String>, at: &Point2) -> ReshapeError {
    ReshapeError::MalformedReshape {
        message: message.into(),
        at: (at.x, at.y),
    }
}

/// Pairs the intersections along the line and splices each pair into its
/// ring, then drops rings the new boundaries have swallowed.
///
/// # Errors
///
/// Returns `ReshapeError::MalformedReshape` if the intersections do not
/// pair up on single rings, and `ReshapeError::AmbiguousSplice` from the
/// splicer.
pub(crate) fn splice_pairs(
    topology: &mut WorkingTopology,
    line: &ReshapeLine,
    hits: &IntersectionSet<RingKey>,
    options: &ReshapeOptions,
) -> Result<ReshapeOutcome> {
    let ordered = hits.ordered();
    for (key, _) in topology.rings() {
        let on_ring = hits.on_ring(key);
        if on_ring.len() % 2 == 1 {
            return Err(malformed(
                format!(
                    "{} intersections with one ring; a crossing has no matching exit",
                    on_ring.len()
                ),
                &on_ring[0].location,
            )
            .into());
        }
    }

    let mut splices = 0;
    let mut rings_removed = 0;
    for pair in ordered.chunks(2) {
        let [entry, exit] = pair else {
            return Err(malformed("crossing has no matching exit", &pair[0].location).into());
        };
        if entry.ring != exit.ring {
            return Err(malformed(
                "line leaves through a different ring than it entered",
                &exit.location,
            )
            .into());
        }
        rings_removed += splice_one(topology, line, entry, exit, options)?;
        splices += 1;
    }

    rings_removed += prune_swallowed(topology);
    Ok(ReshapeOutcome::ArcsReplaced {
        splices,
        rings_removed,
    })
}

/// Splices one entry/exit pair into the current version of its ring.
fn splice_one(
    topology: &mut WorkingTopology,
    line: &ReshapeLine,
    entry: &IntersectionPoint<RingKey>,
    exit: &IntersectionPoint<RingKey>,
    options: &ReshapeOptions,
) -> Result<usize> {
    let key = entry.ring;
    let (Some(ring), Some(kind)) = (topology.ring(key), topology.kind(key)) else {
        return Err(malformed("ring was removed by an earlier replacement", &entry.location).into());
    };
    let (Some(entry_pos), Some(exit_pos)) = (
        ring.locate_on_boundary(&entry.location),
        ring.locate_on_boundary(&exit.location),
    ) else {
        return Err(malformed(
            "intersection no longer lies on its ring after an earlier replacement",
            &entry.location,
        )
        .into());
    };

    let sub_line = line.sub_line(
        entry.line_position,
        entry.location,
        exit.line_position,
        exit.location,
    );
    let result = RingSplice::new(ring, entry_pos, exit_pos, &sub_line)
        .execute(kind, options.splice_policy)?;
    match result {
        SpliceResult::Replaced(new_ring) => {
            debug!(?kind, vertices = new_ring.vertices().len(), "ring arc replaced");
            topology.replace_ring(key, new_ring);
            Ok(0)
        }
        SpliceResult::Collapsed => {
            debug!("hole collapsed");
            Ok(topology.remove_ring(key))
        }
    }
}

/// Removes rings made redundant by replaced rings:
/// holes left outside their exterior, holes swallowed by a grown hole and
/// parts now covered by another part's material.
///
/// Returns the number of rings removed.
fn prune_swallowed(topology: &mut WorkingTopology) -> usize {
    let mut removed = 0;

    for part in topology.parts().to_vec() {
        let Some(exterior) = topology.exterior(part) else {
            continue;
        };
        let holes = topology.holes(part);

        let mut doomed: Vec<RingKey> = holes
            .iter()
            .copied()
            .filter(|hole| {
                topology
                    .ring(*hole)
                    .is_some_and(|ring| exterior.relate(ring) == RingRelation::Outside)
            })
            .collect();

        for grown in holes.iter().copied().filter(|h| topology.is_modified(*h)) {
            let Some(grown_ring) = topology.ring(grown) else {
                continue;
            };
            doomed.extend(holes.iter().copied().filter(|other| {
                *other != grown
                    && topology
                        .ring(*other)
                        .is_some_and(|ring| grown_ring.relate(ring) == RingRelation::Inside)
            }));
        }

        doomed.sort_unstable();
        doomed.dedup();
        for hole in doomed {
            debug!("dropping hole swallowed by the reshaped boundary");
            removed += topology.remove_ring(hole);
        }
    }

    for part in topology.parts().to_vec() {
        if !topology.is_part_modified(part) {
            continue;
        }
        let Some(polygon) = topology.polygon(part) else {
            continue;
        };
        let covered: Vec<_> = topology
            .parts()
            .iter()
            .copied()
            .filter(|other| {
                *other != part
                    && topology
                        .exterior(*other)
                        .is_some_and(|ring| polygon.covers_ring(ring))
            })
            .collect();
        for other in covered {
            debug!("dropping part covered by the reshaped part");
            removed += topology.remove_part(other);
        }
    }

    removed
}


use crate::geometry::{Polygon, RingRelation};

/// Validates the parts of a polygon or multipolygon.
///
/// Rings must be simple, holes must lie inside their exterior without
/// overlapping each other, and parts must not overlap unless one sits inside
/// a hole of the other. Touching boundaries are allowed.
pub struct IsValid<'a> {
    parts: &'a [Polygon],
}

impl<'a> IsValid<'a> {
    /// Creates a new `IsValid` query.
    #[must_use]
    pub fn new(parts: &'a [Polygon]) -> Self {
        Self { parts }
    }

    /// Executes the validation, returning `true` if the geometry is valid.
    #[must_use]
    pub fn execute(&self) -> bool {
        self.first_issue().is_none()
    }

    /// Describes the first problem found, if any.
    #[must_use]
    pub fn first_issue(&self) -> Option<String> {
        for (i, part) in self.parts.iter().enumerate() {
            if let Some(issue) = part_issue(i, part) {
                return Some(issue);
            }
        }
        for (i, a) in self.parts.iter().enumerate() {
            for (j, b) in self.parts.iter().enumerate().skip(i + 1) {
                if !(clear_of(a, b) && clear_of(b, a)) {
                    return Some(format!("parts {i} and {j} overlap"));
                }
            }
        }
        None
    }
}

fn part_issue(i: usize, part: &Polygon) -> Option<String> {
    if let Some(p) = part.exterior.self_intersection() {
        return Some(format!("exterior of part {i} self-intersects at ({}, {})", p.x, p.y));
    }
    for (j, hole) in part.interiors.iter().enumerate() {
        if let Some(p) = hole.self_intersection() {
            return Some(format!("hole {j} of part {i} self-intersects at ({}, {})", p.x, p.y));
        }
        let relation = part.exterior.relate(hole);
        if relation != RingRelation::Inside {
            return Some(format!(
                "hole {j} of part {i} is not inside its exterior ({relation:?})"
            ));
        }
    }
    for (j, a) in part.interiors.iter().enumerate() {
        for (k, b) in part.interiors.iter().enumerate().skip(j + 1) {
            if a.relate(b) != RingRelation::Outside || b.relate(a) != RingRelation::Outside {
                return Some(format!("holes {j} and {k} of part {i} overlap"));
            }
        }
    }
    None
}

/// `true` if `other`'s exterior stays out of `part`'s material.
fn clear_of(part: &Polygon, other: &Polygon) -> bool {
    match part.exterior.relate(&other.exterior) {
        RingRelation::Outside => true,
        RingRelation::Inside | RingRelation::Coincident => {
            part.hole_containing(&other.exterior).is_some()
        }
        RingRelation::Crossing => false,
    }
}

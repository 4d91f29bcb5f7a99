use crate::geometry::{LinePosition, ReshapeLine, Ring, RingPosition};
use crate::math::intersect_2d::SegmentContact;
use crate::math::polygon_2d::PointLocation;
use crate::math::{Point2, TOLERANCE};

/// How the line meets a ring at an intersection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntersectionKind {
    /// The line passes from one side of the ring to the other.
    Crossing,
    /// The line starts or ends on the ring.
    Terminal,
}

/// A point where the reshape line meets a ring boundary.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct IntersectionPoint<K> {
    pub location: Point2,
    pub ring: K,
    pub ring_position: RingPosition,
    pub line_position: LinePosition,
    /// Distance from the first point of the line, measured along the line.
    pub distance: f64,
    pub kind: IntersectionKind,
}

/// All intersections of a line with a set of rings, ordered along the line.
#[derive(Debug, Clone)]
pub struct IntersectionSet<K> {
    points: Vec<IntersectionPoint<K>>,
    boundary_ring: Option<K>,
}

impl<K: Copy + PartialEq> IntersectionSet<K> {
    /// Intersections in order along the line.
    #[must_use]
    pub fn ordered(&self) -> &[IntersectionPoint<K>] {
        &self.points
    }

    /// Intersections with one ring, in order along that ring.
    #[must_use]
    pub fn on_ring(&self, ring: K) -> Vec<&IntersectionPoint<K>> {
        let mut hits: Vec<_> = self.points.iter().filter(|p| p.ring == ring).collect();
        hits.sort_by(|a, b| a.ring_position.param().total_cmp(&b.ring_position.param()));
        hits
    }

    /// The ring whose boundary carries the whole line, if any.
    #[must_use]
    pub fn boundary_ring(&self) -> Option<K> {
        self.boundary_ring
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.points.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

/// A stretch of the line, as distances from its start, touching a ring.
#[derive(Debug)]
struct Contact {
    start: f64,
    end: f64,
    edges: Vec<usize>,
}

/// Finds where `line` crosses, starts on or ends on each of `rings`.
///
/// Touching a ring without passing through it yields no intersection.
/// A collinear run along a ring edge yields at most one intersection, at the
/// middle of the run.
pub fn find_intersections<'a, K, I>(line: &ReshapeLine, rings: I) -> IntersectionSet<K>
where
    K: Copy + PartialEq + 'a,
    I: IntoIterator<Item = (K, &'a Ring)>,
{
    let total = line.length();
    let mut points = Vec::new();
    let mut boundary_ring = None;

    for (key, ring) in rings {
        let contacts = ring_contacts(line, ring);
        if let [only] = contacts.as_slice() {
            if only.start <= TOLERANCE && only.end >= total - TOLERANCE {
                boundary_ring = Some(key);
                continue;
            }
        }

        for (k, contact) in contacts.iter().enumerate() {
            let terminal = contact.start <= TOLERANCE || contact.end >= total - TOLERANCE;
            let kind = if terminal {
                IntersectionKind::Terminal
            } else {
                let before_start = if k == 0 { 0.0 } else { contacts[k - 1].end };
                let after_end = contacts.get(k + 1).map_or(total, |next| next.start);
                let before = sample_side(line, ring, before_start, contact.start);
                let after = sample_side(line, ring, contact.end, after_end);
                match (before, after) {
                    (PointLocation::Inside, PointLocation::Outside)
                    | (PointLocation::Outside, PointLocation::Inside) => IntersectionKind::Crossing,
                    _ => continue,
                }
            };

            let distance = 0.5 * (contact.start + contact.end);
            let (location, line_position) = line.point_at_distance(distance);
            let Some(ring_position) = nearest_position(ring, &contact.edges, &location) else {
                continue;
            };
            points.push(IntersectionPoint {
                location,
                ring: key,
                ring_position,
                line_position,
                distance,
                kind,
            });
        }
    }

    points.sort_by(|a, b| a.distance.total_cmp(&b.distance));
    IntersectionSet {
        points,
        boundary_ring,
    }
}

/// Collects and merges the contacts of `line` with `ring`.
fn ring_contacts(line: &ReshapeLine, ring: &Ring) -> Vec<Contact> {
    let mut raw = Vec::new();
    for i in 0..line.segment_count() {
        let seg = line.segment(i);
        let len = seg.length();
        let base = line.distance_to_vertex(i);
        for (j, edge) in ring.segments().enumerate() {
            let (t0, t1) = match seg.contact(&edge) {
                Some(SegmentContact::Point { t, .. }) => (t, t),
                Some(SegmentContact::Overlap { t0, t1 }) => (t0, t1),
                None => continue,
            };
            raw.push(Contact {
                start: base + t0 * len,
                end: base + t1 * len,
                edges: vec![j],
            });
        }
    }
    raw.sort_by(|a, b| a.start.total_cmp(&b.start));

    let mut merged: Vec<Contact> = Vec::with_capacity(raw.len());
    for contact in raw {
        if let Some(last) = merged.last_mut() {
            if contact.start <= last.end + TOLERANCE {
                last.end = last.end.max(contact.end);
                last.edges.extend(contact.edges);
                continue;
            }
        }
        merged.push(contact);
    }
    merged
}

/// Locates the middle of the line stretch `[from, to]` against `ring`.
fn sample_side(line: &ReshapeLine, ring: &Ring, from: f64, to: f64) -> PointLocation {
    let (mid, _) = line.point_at_distance(0.5 * (from + to));
    ring.locate_point(&mid)
}

fn nearest_position(ring: &Ring, edges: &[usize], p: &Point2) -> Option<RingPosition> {
    let edge = edges.iter().copied().min_by(|&a, &b| {
        ring.segment(a)
            .distance_to(p)
            .total_cmp(&ring.segment(b).distance_to(p))
    })?;
    Some(ring.position(edge, ring.segment(edge).project(p)))
}

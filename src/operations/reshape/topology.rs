use slotmap::{new_key_type, SlotMap};

use crate::geometry::{Polygon, Ring, RingKind};

new_key_type! {
    /// Identifier of a part in a [`WorkingTopology`].
    pub struct PartKey;
    /// Identifier of a ring in a [`WorkingTopology`].
    pub struct RingKey;
}

#[derive(Debug)]
struct RingEntry {
    ring: Ring,
    kind: RingKind,
    part: PartKey,
    modified: bool,
}

#[derive(Debug)]
struct PartEntry {
    exterior: RingKey,
    holes: Vec<RingKey>,
}

/// Mutable copy of a geometry's parts and rings used while a reshape is
/// resolved.
///
/// Rings keep their keys while they are replaced, so intersections found on
/// the input stay attached to the right ring. Part and hole order are
/// preserved.
#[derive(Debug, Default)]
pub(crate) struct WorkingTopology {
    parts: SlotMap<PartKey, PartEntry>,
    rings: SlotMap<RingKey, RingEntry>,
    order: Vec<PartKey>,
}

impl WorkingTopology {
    pub fn from_parts(parts: &[Polygon]) -> Self {
        let mut topology = Self::default();
        for part in parts {
            let key = topology.add_part(part.exterior.clone());
            for hole in &part.interiors {
                topology.add_hole(key, hole.clone());
            }
        }
        topology
    }

    /// Appends a part with no holes.
    pub fn add_part(&mut self, exterior: Ring) -> PartKey {
        let part = self.parts.insert(PartEntry {
            exterior: RingKey::default(),
            holes: Vec::new(),
        });
        let ring = self.rings.insert(RingEntry {
            ring: exterior,
            kind: RingKind::Outer,
            part,
            modified: false,
        });
        if let Some(entry) = self.parts.get_mut(part) {
            entry.exterior = ring;
        }
        self.order.push(part);
        part
    }

    pub fn add_hole(&mut self, part: PartKey, hole: Ring) -> Option<RingKey> {
        let entry = self.parts.get_mut(part)?;
        let key = self.rings.insert(RingEntry {
            ring: hole,
            kind: RingKind::Hole,
            part,
            modified: false,
        });
        entry.holes.push(key);
        Some(key)
    }

    /// Live rings, part by part, exterior first.
    pub fn rings(&self) -> impl Iterator<Item = (RingKey, &Ring)> + '_ {
        self.order.iter().flat_map(move |part| {
            self.parts
                .get(*part)
                .into_iter()
                .flat_map(|entry| std::iter::once(&entry.exterior).chain(&entry.holes))
                .filter_map(move |key| self.rings.get(*key).map(|r| (*key, &r.ring)))
        })
    }

    pub fn parts(&self) -> &[PartKey] {
        &self.order
    }

    pub fn ring(&self, key: RingKey) -> Option<&Ring> {
        self.rings.get(key).map(|entry| &entry.ring)
    }

    pub fn kind(&self, key: RingKey) -> Option<RingKind> {
        self.rings.get(key).map(|entry| entry.kind)
    }

    pub fn exterior(&self, part: PartKey) -> Option<&Ring> {
        self.parts.get(part).and_then(|entry| self.ring(entry.exterior))
    }

    pub fn exterior_key(&self, part: PartKey) -> Option<RingKey> {
        self.parts.get(part).map(|entry| entry.exterior)
    }

    pub fn holes(&self, part: PartKey) -> &[RingKey] {
        self.parts
            .get(part)
            .map(|entry| entry.holes.as_slice())
            .unwrap_or_default()
    }

    /// Index of `part` in output order.
    pub fn part_index(&self, part: PartKey) -> Option<usize> {
        self.order.iter().position(|p| *p == part)
    }

    /// `true` if `ring` was replaced since the topology was built.
    pub fn is_modified(&self, ring: RingKey) -> bool {
        self.rings.get(ring).is_some_and(|entry| entry.modified)
    }

    /// `true` if any ring of `part` was replaced.
    pub fn is_part_modified(&self, part: PartKey) -> bool {
        self.exterior_key(part)
            .into_iter()
            .chain(self.holes(part).iter().copied())
            .any(|ring| self.is_modified(ring))
    }

    pub fn replace_ring(&mut self, key: RingKey, ring: Ring) {
        if let Some(entry) = self.rings.get_mut(key) {
            entry.ring = ring;
            entry.modified = true;
        }
    }

    /// Removes a ring. Removing an exterior removes its whole part.
    ///
    /// Returns the number of rings removed.
    pub fn remove_ring(&mut self, key: RingKey) -> usize {
        let Some((part, kind)) = self.rings.get(key).map(|entry| (entry.part, entry.kind)) else {
            return 0;
        };
        match kind {
            RingKind::Outer => self.remove_part(part),
            RingKind::Hole => {
                self.rings.remove(key);
                if let Some(part) = self.parts.get_mut(part) {
                    part.holes.retain(|h| *h != key);
                }
                1
            }
        }
    }

    /// Removes a part and all its rings, returning the number of rings removed.
    pub fn remove_part(&mut self, part: PartKey) -> usize {
        let Some(entry) = self.parts.remove(part) else {
            return 0;
        };
        self.order.retain(|p| *p != part);
        std::iter::once(entry.exterior)
            .chain(entry.holes)
            .filter(|key| self.rings.remove(*key).is_some())
            .count()
    }

    pub fn polygon(&self, part: PartKey) -> Option<Polygon> {
        let exterior = self.exterior(part)?.clone();
        let interiors = self
            .holes(part)
            .iter()
            .filter_map(|key| self.ring(*key).cloned())
            .collect();
        Some(Polygon::new(exterior, interiors))
    }

    /// The parts in order, as polygons.
    pub fn to_parts(&self) -> Vec<Polygon> {
        self.order.iter().filter_map(|part| self.polygon(*part)).collect()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::math::Point2;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::from_open(&[
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
        .unwrap()
    }

    fn two_parts() -> Vec<Polygon> {
        vec![
            Polygon::new(
                square(0.0, 0.0, 10.0, 10.0),
                vec![
                    square(2.0, 2.0, 4.0, 4.0).reversed(),
                    square(6.0, 6.0, 8.0, 8.0).reversed(),
                ],
            ),
            Polygon::from_exterior(square(20.0, 0.0, 30.0, 10.0)),
        ]
    }

    #[test]
    fn round_trip_keeps_order() {
        let parts = two_parts();
        let topology = WorkingTopology::from_parts(&parts);
        assert_eq!(topology.to_parts(), parts);
        assert_eq!(topology.rings().count(), 4);
        let kinds: Vec<_> = topology
            .rings()
            .map(|(key, _)| topology.kind(key).unwrap())
            .collect();
        assert_eq!(
            kinds,
            vec![RingKind::Outer, RingKind::Hole, RingKind::Hole, RingKind::Outer]
        );
    }

    #[test]
    fn removing_an_exterior_removes_the_part() {
        let mut topology = WorkingTopology::from_parts(&two_parts());
        let first = topology.parts()[0];
        let exterior = topology.exterior_key(first).unwrap();
        assert_eq!(topology.remove_ring(exterior), 3);
        assert_eq!(topology.parts().len(), 1);
        assert_eq!(topology.rings().count(), 1);
        assert!(topology.ring(exterior).is_none());
    }

    #[test]
    fn hole_removal_and_replacement() {
        let mut topology = WorkingTopology::from_parts(&two_parts());
        let part = topology.parts()[0];
        let holes = topology.holes(part).to_vec();
        assert_eq!(topology.remove_ring(holes[0]), 1);
        assert_eq!(topology.holes(part), &holes[1..]);
        assert!(!topology.is_part_modified(part));

        topology.replace_ring(holes[1], square(6.0, 6.0, 9.0, 9.0).reversed());
        assert!(topology.is_modified(holes[1]));
        assert!(topology.is_part_modified(part));

        let new_part = topology.add_part(square(40.0, 0.0, 41.0, 1.0));
        assert_eq!(topology.part_index(new_part), Some(2));
        assert_eq!(topology.to_parts().len(), 3);
    }
}

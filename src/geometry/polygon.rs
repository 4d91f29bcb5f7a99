use crate::math::polygon_2d::PointLocation;
use crate::math::Point2;

use super::ring::{Ring, RingRelation};

/// Role of a ring inside a polygon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RingKind {
    Outer,
    Hole,
}

/// An exterior ring with zero or more holes.
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon {
    pub exterior: Ring,
    pub interiors: Vec<Ring>,
}

impl Polygon {
    #[must_use]
    pub fn new(exterior: Ring, interiors: Vec<Ring>) -> Self {
        Self {
            exterior,
            interiors,
        }
    }

    /// A polygon without holes.
    #[must_use]
    pub fn from_exterior(exterior: Ring) -> Self {
        Self::new(exterior, Vec::new())
    }

    /// Exterior first, then holes in order.
    pub fn rings(&self) -> impl Iterator<Item = (RingKind, &Ring)> {
        std::iter::once((RingKind::Outer, &self.exterior))
            .chain(self.interiors.iter().map(|h| (RingKind::Hole, h)))
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.exterior.area() - self.interiors.iter().map(Ring::area).sum::<f64>()
    }

    /// Locates `p` against the polygon's filled area.
    #[must_use]
    pub fn locate_point(&self, p: &Point2) -> PointLocation {
        match self.exterior.locate_point(p) {
            PointLocation::Inside => {}
            other => return other,
        }
        for hole in &self.interiors {
            match hole.locate_point(p) {
                PointLocation::Outside => {}
                PointLocation::Inside => return PointLocation::Outside,
                PointLocation::OnBoundary => return PointLocation::OnBoundary,
            }
        }
        PointLocation::Inside
    }

    /// `true` if `ring` lies within the filled area: inside the exterior,
    /// outside every hole and enclosing none of them (touching allowed).
    #[must_use]
    pub fn covers_ring(&self, ring: &Ring) -> bool {
        self.exterior.relate(ring) == RingRelation::Inside
            && self.interiors.iter().all(|h| {
                h.relate(ring) == RingRelation::Outside && ring.relate(h) == RingRelation::Outside
            })
    }

    /// Index of the hole that contains `ring`, if any.
    #[must_use]
    pub fn hole_containing(&self, ring: &Ring) -> Option<usize> {
        self.interiors.iter().position(|h| {
            matches!(
                h.relate(ring),
                RingRelation::Inside | RingRelation::Coincident
            )
        })
    }

    /// Ring-by-ring equivalence, see [`Ring::equivalent`].
    #[must_use]
    pub fn equivalent(&self, other: &Polygon) -> bool {
        self.exterior.equivalent(&other.exterior)
            && self.interiors.len() == other.interiors.len()
            && self
                .interiors
                .iter()
                .zip(&other.interiors)
                .all(|(a, b)| a.equivalent(b))
    }
}

/// An ordered set of non-overlapping polygons.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct MultiPolygon {
    pub parts: Vec<Polygon>,
}

impl MultiPolygon {
    #[must_use]
    pub fn new(parts: Vec<Polygon>) -> Self {
        Self { parts }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.parts.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.parts.iter().map(Polygon::area).sum()
    }

    #[must_use]
    pub fn equivalent(&self, other: &MultiPolygon) -> bool {
        self.parts.len() == other.parts.len()
            && self
                .parts
                .iter()
                .zip(&other.parts)
                .all(|(a, b)| a.equivalent(b))
    }
}

/// A feature geometry handed over by the host.
#[derive(Debug, Clone, PartialEq)]
pub enum Geometry {
    Polygon(Polygon),
    MultiPolygon(MultiPolygon),
}

impl Geometry {
    /// Polygons of this geometry, in order.
    #[must_use]
    pub fn parts(&self) -> &[Polygon] {
        match self {
            Self::Polygon(p) => std::slice::from_ref(p),
            Self::MultiPolygon(mp) => &mp.parts,
        }
    }

    /// Rebuilds a geometry of the same kind as `self` from `parts`.
    ///
    /// A polygon stays a polygon as long as there is exactly one part.
    #[must_use]
    pub fn with_parts(&self, mut parts: Vec<Polygon>) -> Geometry {
        match self {
            Self::Polygon(_) if parts.len() == 1 => match parts.pop() {
                Some(p) => Self::Polygon(p),
                None => Self::MultiPolygon(MultiPolygon::default()),
            },
            _ => Self::MultiPolygon(MultiPolygon::new(parts)),
        }
    }

    #[must_use]
    pub fn to_multi_polygon(&self) -> MultiPolygon {
        MultiPolygon::new(self.parts().to_vec())
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        self.parts().iter().map(Polygon::area).sum()
    }

    /// Part-by-part equivalence, see [`Ring::equivalent`]. The geometry kind
    /// is ignored.
    #[must_use]
    pub fn equivalent(&self, other: &Geometry) -> bool {
        let (a, b) = (self.parts(), other.parts());
        a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.equivalent(y))
    }
}

impl From<Polygon> for Geometry {
    fn from(p: Polygon) -> Self {
        Self::Polygon(p)
    }
}

impl From<MultiPolygon> for Geometry {
    fn from(mp: MultiPolygon) -> Self {
        Self::MultiPolygon(mp)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn square(x0: f64, y0: f64, x1: f64, y1: f64) -> Ring {
        Ring::from_open(&[
            Point2::new(x0, y0),
            Point2::new(x1, y0),
            Point2::new(x1, y1),
            Point2::new(x0, y1),
        ])
        .unwrap()
    }

    fn donut() -> Polygon {
        Polygon::new(
            square(0.0, 0.0, 10.0, 10.0),
            vec![square(4.0, 4.0, 6.0, 6.0).reversed()],
        )
    }

    #[test]
    fn area_subtracts_holes() {
        assert_relative_eq!(donut().area(), 96.0);
    }

    #[test]
    fn point_location_respects_holes() {
        let poly = donut();
        assert_eq!(poly.locate_point(&Point2::new(2.0, 2.0)), PointLocation::Inside);
        assert_eq!(poly.locate_point(&Point2::new(5.0, 5.0)), PointLocation::Outside);
        assert_eq!(poly.locate_point(&Point2::new(4.0, 5.0)), PointLocation::OnBoundary);
        assert_eq!(poly.locate_point(&Point2::new(15.0, 5.0)), PointLocation::Outside);
    }

    #[test]
    fn ring_coverage() {
        let poly = donut();
        assert!(poly.covers_ring(&square(1.0, 1.0, 3.0, 3.0)));
        assert!(!poly.covers_ring(&square(3.0, 3.0, 7.0, 7.0)));
        assert_eq!(poly.hole_containing(&square(4.5, 4.5, 5.5, 5.5)), Some(0));
        assert_eq!(poly.hole_containing(&square(1.0, 1.0, 3.0, 3.0)), None);
    }

    #[test]
    fn rings_lists_exterior_first() {
        let kinds: Vec<RingKind> = donut().rings().map(|(k, _)| k).collect();
        assert_eq!(kinds, vec![RingKind::Outer, RingKind::Hole]);
    }

    #[test]
    fn kind_is_kept_when_rebuilding() {
        let geom = Geometry::from(donut());
        let rebuilt = geom.with_parts(vec![donut()]);
        assert!(matches!(rebuilt, Geometry::Polygon(_)));
        let grown = geom.with_parts(vec![donut(), Polygon::from_exterior(square(20.0, 0.0, 22.0, 2.0))]);
        assert!(matches!(grown, Geometry::MultiPolygon(ref mp) if mp.len() == 2));
        assert!(geom.equivalent(&Geometry::from(MultiPolygon::new(vec![donut()]))));
    }
}

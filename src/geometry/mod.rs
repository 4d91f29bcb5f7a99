pub mod line;
pub mod polygon;
pub mod ring;
pub mod segment;

pub use line::{LinePosition, ReshapeLine};
pub use polygon::{Geometry, MultiPolygon, Polygon, RingKind};
pub use ring::{Orientation, Ring, RingPosition, RingRelation};
pub use segment::Segment;

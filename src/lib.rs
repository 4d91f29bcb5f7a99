pub mod config;
pub mod error;
pub mod geometry;
pub mod math;
pub mod operations;
pub mod stream;

pub use config::{ReshapeOptions, SessionConfig};
pub use error::{GeometryError, ReshapeError, Result, StreamshapeError};
pub use geometry::{Geometry, MultiPolygon, Polygon, Ring};
pub use operations::creation::compute_new_part;
pub use operations::reshape::{compute_reshape, ReshapeOutcome, Reshaped};
pub use stream::{sample_stream, CursorEvent, EditMode, EditSession};

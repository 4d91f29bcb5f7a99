use thiserror::Error;

/// Top-level error type for streamshape.
#[derive(Debug, Error)]
pub enum StreamshapeError {
    #[error(transparent)]
    Geometry(#[from] GeometryError),

    #[error(transparent)]
    Reshape(#[from] ReshapeError),
}

/// Malformed input or candidate geometry.
///
/// Every variant belongs to the degenerate-geometry class: the operation is
/// aborted and the caller's geometry stays the value of record.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum GeometryError {
    #[error("{found} points given, at least {required} required")]
    TooFewPoints { found: usize, required: usize },

    #[error("ring is not closed")]
    NotClosed,

    #[error("degenerate geometry: {0}")]
    Degenerate(String),

    #[error("ring self-intersects near ({x}, {y})")]
    SelfIntersecting { x: f64, y: f64 },

    #[error("invalid input geometry: {0}")]
    InvalidInput(String),

    #[error("overlapping geometry: {0}")]
    Overlapping(String),
}

/// Failures specific to a reshape operation.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ReshapeError {
    /// The intersection topology between line and boundary is inconsistent.
    #[error("malformed reshape near ({}, {}): {message}", at.0, at.1)]
    MalformedReshape { message: String, at: (f64, f64) },

    /// No unique arc to discard could be determined.
    #[error("ambiguous splice near ({}, {}): {message}", at.0, at.1)]
    AmbiguousSplice { message: String, at: (f64, f64) },

    /// The reassembled geometry failed validation.
    #[error("reshape result is invalid: {0}")]
    InvalidResultGeometry(String),
}

/// Convenience type alias for results using [`StreamshapeError`].
pub type Result<T> = std::result::Result<T, StreamshapeError>;

use crate::geometry::Orientation;
use crate::operations::reshape::SplicePolicy;
use crate::stream::EditMode;

/// Default minimum distance, in map units, between streamed vertices.
pub const DEFAULT_STREAM_TOLERANCE: f64 = 3.0;

/// Options controlling reshape and new-part operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ReshapeOptions {
    /// Orientation given to new outer rings. Holes get the opposite one.
    pub outer_orientation: Orientation,
    /// How to choose between two valid replacement rings.
    pub splice_policy: SplicePolicy,
}

impl Default for ReshapeOptions {
    fn default() -> Self {
        Self {
            outer_orientation: Orientation::CounterClockwise,
            splice_policy: SplicePolicy::default(),
        }
    }
}

impl ReshapeOptions {
    /// Orientation of new holes under this convention.
    #[must_use]
    pub fn hole_orientation(&self) -> Orientation {
        self.outer_orientation.reversed()
    }
}

/// Initial state of an [`EditSession`](crate::stream::EditSession).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct SessionConfig {
    /// Minimum cursor travel, in map units, before a streamed vertex is emitted.
    pub tolerance: f64,
    /// Whether vertices stream automatically with cursor motion. When off,
    /// vertices are only placed explicitly.
    pub streaming_enabled: bool,
    pub initial_mode: EditMode,
    pub reshape: ReshapeOptions,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_STREAM_TOLERANCE,
            streaming_enabled: false,
            initial_mode: EditMode::Reshape,
            reshape: ReshapeOptions::default(),
        }
    }
}

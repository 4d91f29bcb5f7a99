use tracing::{info, warn};

use crate::config::{ReshapeOptions, SessionConfig};
use crate::error::{GeometryError, Result};
use crate::geometry::{Geometry, MultiPolygon, ReshapeLine};
use crate::math::Point2;
use crate::operations::creation::MakePart;
use crate::operations::reshape::{find_intersections, Reshape, Reshaped};

use super::sampler::{CursorEvent, StreamSampler};

/// What finishing a gesture does with the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EditMode {
    /// Reshape the target geometry with the line.
    #[default]
    Reshape,
    /// Close the line and add it as a new part.
    Draw,
}

impl EditMode {
    #[must_use]
    pub fn toggled(self) -> Self {
        match self {
            Self::Reshape => Self::Draw,
            Self::Draw => Self::Reshape,
        }
    }
}

/// Result of a finished gesture.
#[derive(Debug, Clone, PartialEq)]
pub enum Completion {
    Reshaped(Reshaped),
    PartAdded(MultiPolygon),
}

/// Result of a cancel request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cancelled {
    /// The active gesture was discarded.
    GestureDiscarded,
    /// No gesture was active; the host may leave the tool.
    NothingToCancel,
}

/// State of an interactive editing tool: mode, streaming flag and the line
/// being drawn.
///
/// The session never holds geometry. The host passes the current target to
/// [`finish`](Self::finish) and swaps in the returned value on success.
#[derive(Debug, Clone)]
pub struct EditSession {
    mode: EditMode,
    sampler: StreamSampler,
    cursor: Option<Point2>,
    options: ReshapeOptions,
}

impl Default for EditSession {
    fn default() -> Self {
        Self::new(SessionConfig::default())
    }
}

impl EditSession {
    #[must_use]
    pub fn new(config: SessionConfig) -> Self {
        Self {
            mode: config.initial_mode,
            sampler: StreamSampler::new(config.tolerance, config.streaming_enabled),
            cursor: None,
            options: config.reshape,
        }
    }

    #[must_use]
    pub fn mode(&self) -> EditMode {
        self.mode
    }

    /// Switches between reshape and draw mode, returning the new mode.
    pub fn toggle_mode(&mut self) -> EditMode {
        self.mode = self.mode.toggled();
        info!(mode = ?self.mode, "edit mode changed");
        self.mode
    }

    #[must_use]
    pub fn streaming_enabled(&self) -> bool {
        self.sampler.streaming_enabled()
    }

    /// Turns streaming on or off, returning the new state.
    pub fn toggle_streaming(&mut self) -> bool {
        let enabled = !self.sampler.streaming_enabled();
        self.sampler.set_streaming_enabled(enabled);
        info!(enabled, "streaming toggled");
        enabled
    }

    /// `true` while a gesture is in progress.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.sampler.is_active()
    }

    /// Vertices of the current line.
    #[must_use]
    pub fn line(&self) -> &[Point2] {
        self.sampler.vertices()
    }

    #[must_use]
    pub fn cursor(&self) -> Option<Point2> {
        self.cursor
    }

    /// A press starts a gesture, or appends a vertex to the active one.
    pub fn press(&mut self, at: Point2) {
        if self.sampler.is_active() {
            self.sampler.feed(CursorEvent::PlaceVertex(at));
        } else {
            self.sampler.begin(at);
        }
    }

    /// Tracks the cursor, returning the vertex streamed from this motion.
    pub fn cursor_moved(&mut self, to: Point2) -> Option<Point2> {
        self.cursor = Some(to);
        self.sampler.feed(CursorEvent::Moved(to))
    }

    /// Places a vertex at the current cursor position.
    pub fn place_vertex(&mut self) -> Option<Point2> {
        let at = self.cursor?;
        self.sampler.feed(CursorEvent::PlaceVertex(at))
    }

    /// Discards the active gesture.
    pub fn cancel(&mut self) -> Cancelled {
        if self.sampler.is_active() {
            self.sampler.reset();
            info!("gesture discarded");
            Cancelled::GestureDiscarded
        } else {
            Cancelled::NothingToCancel
        }
    }

    /// The line closed through the cursor, for rubber-band display.
    #[must_use]
    pub fn preview_ring(&self) -> Option<Vec<Point2>> {
        let line = self.sampler.vertices();
        let first = *line.first()?;
        let mut ring = line.to_vec();
        if let Some(cursor) = self.cursor {
            ring.push(cursor);
        }
        ring.push(first);
        Some(ring)
    }

    /// Where the current line meets the boundary of `target`.
    ///
    /// Empty outside reshape mode and for lines shorter than two vertices.
    #[must_use]
    pub fn preview_intersections(&self, target: &Geometry) -> Vec<Point2> {
        if self.mode != EditMode::Reshape {
            return Vec::new();
        }
        let Ok(line) = ReshapeLine::new(self.sampler.vertices()) else {
            return Vec::new();
        };
        let rings = target.parts().iter().enumerate().flat_map(|(i, part)| {
            part.rings()
                .enumerate()
                .map(move |(j, (_, ring))| ((i, j), ring))
        });
        find_intersections(&line, rings)
            .ordered()
            .iter()
            .map(|hit| hit.location)
            .collect()
    }

    /// Completes the gesture against `target`.
    ///
    /// On success the line is cleared. On failure it is kept so the user can
    /// continue drawing or cancel.
    ///
    /// # Errors
    ///
    /// Returns `GeometryError::TooFewPoints` for a line of fewer than two
    /// vertices, and any error of the reshape or new-part operation.
    pub fn finish(&mut self, target: &Geometry) -> Result<Completion> {
        let line = self.sampler.vertices();
        if line.len() < 2 {
            warn!(vertices = line.len(), "draw a line with at least 2 points");
            return Err(GeometryError::TooFewPoints {
                found: line.len(),
                required: 2,
            }
            .into());
        }

        let result = match self.mode {
            EditMode::Reshape => Reshape::new(line.to_vec())
                .with_options(self.options)
                .execute(target)
                .map(Completion::Reshaped),
            EditMode::Draw => MakePart::new(line.to_vec())
                .with_options(self.options)
                .execute(target)
                .map(Completion::PartAdded)
                .map_err(Into::into),
        };
        match &result {
            Ok(_) => {
                info!(mode = ?self.mode, vertices = line.len(), "gesture finished");
                self.sampler.reset();
            }
            Err(e) => warn!(error = %e, "gesture rejected"),
        }
        result
    }

    /// Appends `at` to the active gesture, then finishes it.
    ///
    /// # Errors
    ///
    /// Same as [`finish`](Self::finish).
    pub fn finish_at(&mut self, at: Point2, target: &Geometry) -> Result<Completion> {
        if self.sampler.is_active() {
            self.sampler.feed(CursorEvent::PlaceVertex(at));
        }
        self.finish(target)
    }
}

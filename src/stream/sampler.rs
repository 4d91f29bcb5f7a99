use crate::math::{Point2, TOLERANCE};

/// Cursor input during a gesture.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CursorEvent {
    /// The cursor moved to a new position.
    Moved(Point2),
    /// The user asked for a vertex at this position.
    PlaceVertex(Point2),
}

/// Decides whether `event` produces a new line vertex.
///
/// Nothing is emitted without a previous vertex, i.e. outside a gesture.
/// Cursor motion emits a vertex only while streaming is enabled and once the
/// cursor is at least `tolerance` away from the last vertex. Explicit
/// placement always emits, unless it repeats the last vertex.
#[must_use]
pub fn sample_stream(
    last_vertex: Option<&Point2>,
    event: CursorEvent,
    tolerance: f64,
    streaming_enabled: bool,
) -> Option<Point2> {
    let last = last_vertex?;
    match event {
        CursorEvent::Moved(p) => {
            (streaming_enabled && (p - last).norm() >= tolerance).then_some(p)
        }
        CursorEvent::PlaceVertex(p) => ((p - last).norm() > TOLERANCE).then_some(p),
    }
}

/// Accumulates the vertices of one gesture.
#[derive(Debug, Clone)]
pub struct StreamSampler {
    tolerance: f64,
    streaming_enabled: bool,
    vertices: Vec<Point2>,
}

impl StreamSampler {
    #[must_use]
    pub fn new(tolerance: f64, streaming_enabled: bool) -> Self {
        Self {
            tolerance,
            streaming_enabled,
            vertices: Vec::new(),
        }
    }

    /// Starts a new gesture at `start`, dropping any previous vertices.
    pub fn begin(&mut self, start: Point2) {
        self.vertices.clear();
        self.vertices.push(start);
    }

    /// Feeds a cursor event, returning the vertex it appended, if any.
    pub fn feed(&mut self, event: CursorEvent) -> Option<Point2> {
        let vertex = sample_stream(
            self.vertices.last(),
            event,
            self.tolerance,
            self.streaming_enabled,
        )?;
        self.vertices.push(vertex);
        Some(vertex)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        !self.vertices.is_empty()
    }

    #[must_use]
    pub fn vertices(&self) -> &[Point2] {
        &self.vertices
    }

    /// Ends the gesture, returning its vertices.
    pub fn take(&mut self) -> Vec<Point2> {
        std::mem::take(&mut self.vertices)
    }

    pub fn reset(&mut self) {
        self.vertices.clear();
    }

    #[must_use]
    pub fn tolerance(&self) -> f64 {
        self.tolerance
    }

    #[must_use]
    pub fn streaming_enabled(&self) -> bool {
        self.streaming_enabled
    }

    pub fn set_streaming_enabled(&mut self, enabled: bool) {
        self.streaming_enabled = enabled;
    }
}

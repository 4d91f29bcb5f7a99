//! Turning cursor input into reshape lines.

mod sampler;
mod session;

pub use sampler::{sample_stream, CursorEvent, StreamSampler};
pub use session::{Cancelled, Completion, EditMode, EditSession};

//! # Rendering
//!
//! The engine never talks to a graphics API directly. Each frame it walks
//! the active scenes and issues drawing calls against a [`Canvas`], which
//! the host implements on top of whatever surface it has.
//!
//! ## Architecture
//!
//! - **Canvas**: drawing surface trait (state stack, primitives, snapshots)
//! - **Draw pass**: deterministic scene walk in z-order
//! - **Snapshot cache**: owns the last captured frame and releases stale ones
//! - **RecordingCanvas**: headless canvas that records every call

mod canvas;
pub(crate) mod draw;
mod recording;
mod snapshot;

pub use canvas::{Canvas, ImageId, Paint, PaintStyle, TextStyle};
pub use recording::{DrawCommand, RecordingCanvas};
pub use snapshot::SnapshotCache;

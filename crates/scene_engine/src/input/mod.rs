//! Pointer input
//!
//! Raw pointer events from the host are converted to game units, hit-tested
//! against the active scenes topmost-first and turned into pointer, tap and
//! drag events for the entities they land on.

pub(crate) mod dispatcher;
mod pointer;

pub use pointer::{PointerButtons, PointerEventKind, PointerState, RawPointerEvent};

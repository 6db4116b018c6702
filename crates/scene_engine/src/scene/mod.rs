//! Scene presentation
//!
//! Scenes are presented through a queue that is drained at the start of a
//! tick. A slide hands the previous frame to a temporary snapshot scene that
//! moves off-canvas while the incoming scene moves in; both are driven by
//! ordinary actions flagged to run during the transition.

mod controller;
mod transition;

pub use controller::SceneController;
pub use transition::{SceneTransition, SlideDirection, Transition};

pub(crate) use controller::Stage;

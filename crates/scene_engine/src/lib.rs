//! # Scene Engine
//!
//! A frame-driven 2D scene-graph engine for interactive, screen-based
//! assessments.
//!
//! ## Features
//!
//! - **Entity Tree**: Scenes, shapes, labels, sprites and composites in one arena
//! - **Actions**: Sequences and groups of timed effects compiled into shared templates
//! - **Layout Constraints**: Sibling and parent anchoring resolved in dependency order
//! - **Scene Transitions**: Queued presentation with snapshot-backed slides
//! - **Pointer Dispatch**: Tap, hover and drag events routed by z-order
//! - **Headless Rendering**: Abstract canvas plus a recording implementation
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use scene_engine::prelude::*;
//!
//! fn main() -> Result<(), EngineError> {
//!     let mut game = Game::new(GameConfig::new(400.0, 800.0))?;
//!     let scene = game.new_scene("welcome");
//!     let button = game.add_child(
//!         scene,
//!         Entity::circle("start", 40.0, Vec4::new(0.2, 0.4, 0.9, 1.0))
//!             .with_position(Point2::new(200.0, 400.0))
//!             .interactive(true),
//!     )?;
//!     game.run(button, &Action::scale_to(1.2, 300.0).with_easing(Easing::QuadraticOut))?;
//!     game.present_scene(scene, Transition::None)?;
//!
//!     let mut canvas = RecordingCanvas::new(Size::new(400.0, 800.0));
//!     for frame in 0..60 {
//!         game.tick(f64::from(frame) * 16.0, &mut canvas)?;
//!     }
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all, clippy::pedantic, clippy::nursery)]
#![allow(clippy::module_name_repetitions, clippy::similar_names, clippy::too_many_arguments)]

// Shared configuration
pub mod config;
pub mod core;

pub mod action;
pub mod entity;
pub mod events;
pub mod foundation;
pub mod input;
pub mod layout;
pub mod render;
pub mod scene;

mod error;
mod game;

#[cfg(test)]
mod tests;

pub use error::EngineError;
pub use game::Game;

/// Common imports for engine users
pub mod prelude {
    pub use crate::{
        Game, EngineError,
        action::{Action, ActionTemplate, Easing},
        core::{Config, GameConfig},
        entity::{Entity, EntityId, ImageSource, NodeKind},
        events::{Deferred, Event, EventType},
        foundation::math::{Color, Point2, Rect, Size, Vec2, Vec4},
        input::{PointerButtons, RawPointerEvent},
        layout::{ConstraintTarget, ConstraintType, Layout},
        render::{Canvas, RecordingCanvas},
        scene::{SlideDirection, Transition},
    };
}

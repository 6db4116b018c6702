//! Declarative action definitions

use std::fmt;
use std::rc::Rc;

use crate::action::Easing;
use crate::foundation::math::Point2;
use crate::game::Game;

/// Closure fired by a callback action
///
/// Callbacks run after the tick's tree update, with full access to the game.
#[derive(Clone)]
pub struct Callback(Rc<dyn Fn(&mut Game)>);

impl Callback {
    /// Wrap a closure
    pub fn new(f: impl Fn(&mut Game) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invoke the closure
    pub fn invoke(&self, game: &mut Game) {
        (self.0)(game);
    }
}

impl fmt::Debug for Callback {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Callback(..)")
    }
}

/// What an action does
#[derive(Debug, Clone)]
pub enum ActionKind {
    /// Do nothing for a while
    Wait {
        /// Milliseconds
        duration: f64,
    },
    /// Move the entity's local position to `point`
    Move {
        /// Target position
        point: Point2,
        /// Milliseconds
        duration: f64,
        /// Progress curve
        easing: Easing,
    },
    /// Change the entity's scale to `scale`
    Scale {
        /// Target scale
        scale: f32,
        /// Milliseconds
        duration: f64,
        /// Progress curve
        easing: Easing,
    },
    /// Change the entity's alpha to `alpha`
    FadeAlpha {
        /// Target alpha
        alpha: f32,
        /// Milliseconds
        duration: f64,
        /// Progress curve
        easing: Easing,
    },
    /// Change the entity's z-rotation to `z_rotation` radians
    Rotate {
        /// Target rotation
        z_rotation: f32,
        /// Milliseconds
        duration: f64,
        /// Progress curve
        easing: Easing,
    },
    /// Fire a closure once
    Callback(Callback),
    /// Run children one after another
    Sequence(Vec<Action>),
    /// Run children at the same time
    Group(Vec<Action>),
}

/// A composable, time-bounded effect
///
/// Definitions are plain values; they carry no run state and can be cloned
/// and run on any number of entities.
#[derive(Debug, Clone)]
pub struct Action {
    /// Effect of this node
    pub kind: ActionKind,
    /// Whether this action advances while its scene is transitioning
    pub run_during_transition: bool,
}

impl Action {
    fn from_kind(kind: ActionKind) -> Self {
        Self {
            kind,
            run_during_transition: false,
        }
    }

    /// Wait for `duration` milliseconds
    pub fn wait(duration: f64) -> Self {
        Self::from_kind(ActionKind::Wait { duration })
    }

    /// Move to `point` over `duration` milliseconds
    pub fn move_to(point: Point2, duration: f64) -> Self {
        Self::from_kind(ActionKind::Move {
            point,
            duration,
            easing: Easing::Linear,
        })
    }

    /// Scale to `scale` over `duration` milliseconds
    pub fn scale_to(scale: f32, duration: f64) -> Self {
        Self::from_kind(ActionKind::Scale {
            scale,
            duration,
            easing: Easing::Linear,
        })
    }

    /// Fade to `alpha` over `duration` milliseconds
    pub fn fade_alpha(alpha: f32, duration: f64) -> Self {
        Self::from_kind(ActionKind::FadeAlpha {
            alpha,
            duration,
            easing: Easing::Linear,
        })
    }

    /// Rotate to `z_rotation` radians over `duration` milliseconds
    pub fn rotate_to(z_rotation: f32, duration: f64) -> Self {
        Self::from_kind(ActionKind::Rotate {
            z_rotation,
            duration,
            easing: Easing::Linear,
        })
    }

    /// Fire `f` once, taking no time
    pub fn callback(f: impl Fn(&mut Game) + 'static) -> Self {
        Self::from_kind(ActionKind::Callback(Callback::new(f)))
    }

    /// Run `actions` one after another
    pub fn sequence(actions: Vec<Self>) -> Self {
        Self::from_kind(ActionKind::Sequence(actions))
    }

    /// Run `actions` at the same time
    pub fn group(actions: Vec<Self>) -> Self {
        Self::from_kind(ActionKind::Group(actions))
    }

    /// Builder pattern: Set the easing of a tweening action
    ///
    /// Has no effect on waits, callbacks and composites.
    pub fn with_easing(mut self, curve: Easing) -> Self {
        match &mut self.kind {
            ActionKind::Move { easing, .. }
            | ActionKind::Scale { easing, .. }
            | ActionKind::FadeAlpha { easing, .. }
            | ActionKind::Rotate { easing, .. } => *easing = curve,
            ActionKind::Wait { .. }
            | ActionKind::Callback(_)
            | ActionKind::Sequence(_)
            | ActionKind::Group(_) => {}
        }
        self
    }

    /// Builder pattern: Let this action (and its children) advance while
    /// the owning scene is transitioning
    pub fn run_during_transition(mut self, enabled: bool) -> Self {
        self.run_during_transition = enabled;
        self
    }
}

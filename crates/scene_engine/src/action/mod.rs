//! Action composition and scheduling
//!
//! Actions are declared as trees of primitives (wait, move, scale, fade,
//! rotate, callback) combined by sequences and groups. Running an action on
//! an entity compiles the tree into an immutable [`ActionTemplate`] with
//! every node's duration and start/end offsets resolved, then attaches a
//! small [`ActionRun`] record holding the per-node run state. The same
//! template can drive any number of entities without sharing state.
//!
//! ```text
//! Action (definition) --compile--> ActionTemplate (Rc, immutable)
//!                                      |
//!                        ActionRun { template, states[node] } per entity
//! ```

mod definition;
mod easing;
mod run;
mod template;

pub use definition::{Action, ActionKind, Callback};
pub use easing::Easing;
pub use run::{ActionRun, NodeRunState};
pub use template::{ActionNode, ActionTemplate, Effect};

pub(crate) use run::{attach_action, attach_template, evaluate_actions, FiredCallback};

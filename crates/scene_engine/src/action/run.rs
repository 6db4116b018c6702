//! Per-entity run records and the tick evaluator

use std::rc::Rc;

use crate::action::{Action, ActionTemplate, Callback, Easing, Effect};
use crate::entity::{Entity, EntityId};
use crate::error::EngineError;
use crate::foundation::logging::{debug, trace};
use crate::foundation::math::{utils, Point2};
use crate::foundation::time::FrameContext;

/// Value a tween started from, captured on its first evaluation
#[derive(Debug, Clone, Copy, PartialEq)]
enum TweenStart {
    Point(Point2),
    Scalar(f32),
}

/// Mutable state of one template node within one run
#[derive(Debug, Clone, Default, PartialEq)]
pub struct NodeRunState {
    /// Whether the run start time has been assigned
    pub started: bool,
    /// Whether the current time lies inside the node's window
    pub running: bool,
    /// Whether the node has finished
    pub completed: bool,
    /// Timestamp (ms) the owning run started at
    pub run_start_time: f64,
    from: Option<TweenStart>,
}

/// A template attached to one entity
///
/// Only the small per-node state vector is owned by the run; the compiled
/// tree is shared, so attaching the same template to many entities is cheap.
#[derive(Debug, Clone)]
pub struct ActionRun {
    template: Rc<ActionTemplate>,
    key: Option<String>,
    states: Vec<NodeRunState>,
}

impl ActionRun {
    /// Fresh run of `template`, optionally under a key
    pub fn new(template: Rc<ActionTemplate>, key: Option<String>) -> Self {
        let states = vec![NodeRunState::default(); template.len()];
        Self {
            template,
            key,
            states,
        }
    }

    /// Key given when the run was attached
    pub fn key(&self) -> Option<&str> {
        self.key.as_deref()
    }

    /// Shared compiled tree
    pub fn template(&self) -> &Rc<ActionTemplate> {
        &self.template
    }

    /// State of every node, indexed like [`ActionTemplate::nodes`]
    pub fn states(&self) -> &[NodeRunState] {
        &self.states
    }

    /// State of the node at `index`
    pub fn node_state(&self, index: usize) -> Option<&NodeRunState> {
        self.states.get(index)
    }

    /// Whether the root node has completed
    pub fn is_completed(&self) -> bool {
        self.states.first().is_some_and(|state| state.completed)
    }

    /// Whether any node of the run is inside its time window
    pub fn is_running(&self) -> bool {
        self.states.iter().any(|state| state.running)
    }

    fn has_pending(&self, during_transition: bool) -> bool {
        self.template
            .nodes()
            .iter()
            .zip(&self.states)
            .any(|(node, state)| node.run_during_transition == during_transition && !state.completed)
    }

    /// Advance every node whose transition flag equals `during_transition`
    fn advance(
        &mut self,
        entity: &mut Entity,
        id: EntityId,
        during_transition: bool,
        now: f64,
        fired: &mut Vec<FiredCallback>,
    ) {
        let template = Rc::clone(&self.template);
        let nodes = template.nodes();

        for (node, state) in nodes.iter().zip(self.states.iter_mut()) {
            if node.run_during_transition != during_transition || node.effect.is_container() {
                continue;
            }
            if !state.started {
                state.started = true;
                state.run_start_time = now;
            }
            let begin = state.run_start_time + node.start_offset;
            if now < begin {
                continue;
            }
            let elapsed = now - begin;
            state.running = elapsed <= node.duration;
            if state.completed {
                continue;
            }

            let finished = elapsed >= node.duration;
            match &node.effect {
                Effect::Wait => state.completed = finished,
                Effect::Callback(callback) => {
                    fired.push(FiredCallback {
                        entity: id,
                        callback: callback.clone(),
                    });
                    state.completed = true;
                }
                Effect::Move { target, easing } => {
                    let from = match state.from {
                        Some(TweenStart::Point(point)) => point,
                        _ => {
                            state.from = Some(TweenStart::Point(entity.position));
                            entity.position
                        }
                    };
                    if finished {
                        entity.position = *target;
                    } else {
                        let t = easing.apply(elapsed / node.duration) as f32;
                        entity.position = from + (*target - from) * t;
                    }
                    state.completed = finished;
                }
                Effect::Scale { target, easing } => {
                    entity.scale = tween_scalar(state, entity.scale, *target, *easing, elapsed, node.duration);
                    state.completed = finished;
                }
                Effect::FadeAlpha { target, easing } => {
                    entity.alpha = tween_scalar(state, entity.alpha, *target, *easing, elapsed, node.duration);
                    state.completed = finished;
                }
                Effect::Rotate { target, easing } => {
                    entity.z_rotation =
                        tween_scalar(state, entity.z_rotation, *target, *easing, elapsed, node.duration);
                    state.completed = finished;
                }
                Effect::Sequence | Effect::Group => {}
            }
        }

        // Containers only mirror their children; walk backwards so nested
        // containers are settled before their parents.
        for index in (0..nodes.len()).rev() {
            let node = &nodes[index];
            if node.run_during_transition != during_transition || !node.effect.is_container() {
                continue;
            }
            if !self.states[index].started {
                self.states[index].started = true;
                self.states[index].run_start_time = now;
            }
            let begin = self.states[index].run_start_time + node.start_offset;
            if now < begin {
                continue;
            }
            let completed = node.children.iter().all(|child| self.states[*child].completed);
            let state = &mut self.states[index];
            state.running = now - begin <= node.duration;
            state.completed = completed;
        }
    }
}

fn tween_scalar(
    state: &mut NodeRunState,
    current: f32,
    target: f32,
    easing: Easing,
    elapsed: f64,
    duration: f64,
) -> f32 {
    let from = match state.from {
        Some(TweenStart::Scalar(value)) => value,
        _ => {
            state.from = Some(TweenStart::Scalar(current));
            current
        }
    };
    if elapsed >= duration {
        target
    } else {
        utils::lerp(from, target, easing.apply(elapsed / duration) as f32)
    }
}

/// Callback that became due during a tick, invoked once the tree walk is over
#[derive(Debug, Clone)]
pub(crate) struct FiredCallback {
    pub entity: EntityId,
    pub callback: Callback,
}

/// Attach a shared template to `entity`
///
/// A run already attached under the same key is replaced.
pub(crate) fn attach_template(entity: &mut Entity, template: Rc<ActionTemplate>, key: Option<String>) {
    if let Some(key) = key.as_deref() {
        entity.remove_action(key);
    }
    debug!("Attaching {} action nodes to '{}'", template.len(), entity.name);
    entity.actions.push(ActionRun::new(template, key));
}

/// Compile `action` and attach it to `entity`
pub(crate) fn attach_action(
    entity: &mut Entity,
    action: &Action,
    key: Option<String>,
) -> Result<Rc<ActionTemplate>, EngineError> {
    let template = Rc::new(ActionTemplate::compile(action)?);
    attach_template(entity, Rc::clone(&template), key);
    Ok(template)
}

/// Advance the runs attached to one entity
///
/// Runs that completed on an earlier tick are dropped first. While any
/// transition-eligible node is incomplete, only those nodes advance; regular
/// nodes wait for that and for the owning scene to stop transitioning.
pub(crate) fn evaluate_actions(
    entity: &mut Entity,
    id: EntityId,
    scene_transitioning: bool,
    ctx: &FrameContext,
    fired: &mut Vec<FiredCallback>,
) {
    entity.actions.retain(|run| !run.is_completed());
    if entity.actions.is_empty() {
        return;
    }

    let mut runs = std::mem::take(&mut entity.actions);
    let transition_pending = runs.iter().any(|run| run.has_pending(true));

    if transition_pending {
        for run in &mut runs {
            run.advance(entity, id, true, ctx.now, fired);
        }
    } else if !scene_transitioning {
        for run in &mut runs {
            run.advance(entity, id, false, ctx.now, fired);
        }
    } else {
        trace!("'{}' holds regular actions while its scene transitions", entity.name);
    }
    for run in runs.iter().filter(|run| run.is_completed()) {
        trace!("Action run {:?} on '{}' completed", run.key(), entity.name);
    }

    // Callbacks cannot reach the entity during the walk, so nothing new was
    // attached in the meantime.
    runs.append(&mut entity.actions);
    entity.actions = runs;
}

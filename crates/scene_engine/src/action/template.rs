//! Compiled, immutable action trees

use crate::action::{Action, ActionKind, Callback, Easing};
use crate::error::EngineError;
use crate::foundation::math::Point2;

/// Effect of one compiled node
#[derive(Debug, Clone)]
pub enum Effect {
    /// Hold for the node's duration
    Wait,
    /// Tween the local position
    Move {
        /// Target position
        target: Point2,
        /// Progress curve
        easing: Easing,
    },
    /// Tween the scale
    Scale {
        /// Target scale
        target: f32,
        /// Progress curve
        easing: Easing,
    },
    /// Tween the alpha
    FadeAlpha {
        /// Target alpha
        target: f32,
        /// Progress curve
        easing: Easing,
    },
    /// Tween the z-rotation
    Rotate {
        /// Target rotation in radians
        target: f32,
        /// Progress curve
        easing: Easing,
    },
    /// Fire once
    Callback(Callback),
    /// Container whose children run back to back
    Sequence,
    /// Container whose children run together
    Group,
}

impl Effect {
    /// Whether this node is a sequence or group
    pub const fn is_container(&self) -> bool {
        matches!(self, Self::Sequence | Self::Group)
    }
}

/// One node of a compiled action tree
#[derive(Debug, Clone)]
pub struct ActionNode {
    /// What the node does
    pub effect: Effect,
    /// Index of the parent node
    pub parent: Option<usize>,
    /// Indices of child nodes in declaration order
    pub children: Vec<usize>,
    /// Milliseconds the node takes
    pub duration: f64,
    /// Milliseconds after the run starts at which the node begins
    pub start_offset: f64,
    /// `start_offset + duration`
    pub end_offset: f64,
    /// Whether the node advances while its scene is transitioning
    pub run_during_transition: bool,
}

/// Compiled action tree
///
/// Nodes are stored in depth-first pre-order with the root at index 0, so
/// every parent precedes its children. Durations and offsets depend only on
/// the tree shape and are fixed at compile time.
#[derive(Debug, Clone)]
pub struct ActionTemplate {
    nodes: Vec<ActionNode>,
}

impl ActionTemplate {
    /// Compile an action definition
    ///
    /// Fails on negative or non-finite durations.
    pub fn compile(action: &Action) -> Result<Self, EngineError> {
        let mut nodes = Vec::new();
        flatten(action, None, &mut nodes)?;
        assign_durations(&mut nodes);
        assign_offsets(&mut nodes);
        Ok(Self { nodes })
    }

    /// All nodes in pre-order
    pub fn nodes(&self) -> &[ActionNode] {
        &self.nodes
    }

    /// Node at `index`
    pub fn node(&self, index: usize) -> Option<&ActionNode> {
        self.nodes.get(index)
    }

    /// Root node
    pub fn root(&self) -> &ActionNode {
        &self.nodes[0]
    }

    /// Total milliseconds the whole tree takes
    pub fn duration(&self) -> f64 {
        self.root().duration
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Always false; a template has at least its root
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }
}

fn checked_duration(duration: f64) -> Result<f64, EngineError> {
    if duration.is_finite() && duration >= 0.0 {
        Ok(duration)
    } else {
        Err(EngineError::InvalidAction(format!(
            "duration must be a non-negative number of milliseconds, got {duration}"
        )))
    }
}

/// Pre-order flatten with parent links; leaf durations are filled in here
fn flatten(action: &Action, parent: Option<usize>, nodes: &mut Vec<ActionNode>) -> Result<usize, EngineError> {
    let leaf: &[Action] = &[];
    let (effect, duration, children) = match &action.kind {
        ActionKind::Wait { duration } => (Effect::Wait, checked_duration(*duration)?, leaf),
        ActionKind::Move { point, duration, easing } => (
            Effect::Move { target: *point, easing: *easing },
            checked_duration(*duration)?,
            leaf,
        ),
        ActionKind::Scale { scale, duration, easing } => (
            Effect::Scale { target: *scale, easing: *easing },
            checked_duration(*duration)?,
            leaf,
        ),
        ActionKind::FadeAlpha { alpha, duration, easing } => (
            Effect::FadeAlpha { target: *alpha, easing: *easing },
            checked_duration(*duration)?,
            leaf,
        ),
        ActionKind::Rotate { z_rotation, duration, easing } => (
            Effect::Rotate { target: *z_rotation, easing: *easing },
            checked_duration(*duration)?,
            leaf,
        ),
        ActionKind::Callback(callback) => (Effect::Callback(callback.clone()), 0.0, leaf),
        ActionKind::Sequence(children) => (Effect::Sequence, 0.0, children.as_slice()),
        ActionKind::Group(children) => (Effect::Group, 0.0, children.as_slice()),
    };

    let index = nodes.len();
    nodes.push(ActionNode {
        effect,
        parent,
        children: Vec::with_capacity(children.len()),
        duration,
        start_offset: 0.0,
        end_offset: 0.0,
        run_during_transition: action.run_during_transition,
    });

    for child in children {
        let child_index = flatten(child, Some(index), nodes)?;
        nodes[index].children.push(child_index);
    }
    Ok(index)
}

/// Group = max of children, Sequence = sum of children
fn assign_durations(nodes: &mut [ActionNode]) {
    // Children always sit after their parent, so a reverse walk sees them first.
    for index in (0..nodes.len()).rev() {
        let duration = match nodes[index].effect {
            Effect::Sequence => nodes[index].children.iter().map(|c| nodes[*c].duration).sum(),
            Effect::Group => nodes[index]
                .children
                .iter()
                .map(|c| nodes[*c].duration)
                .fold(0.0, f64::max),
            _ => continue,
        };
        nodes[index].duration = duration;
    }
}

/// Offsets relative to the run start; transition eligibility flows down
fn assign_offsets(nodes: &mut [ActionNode]) {
    for index in 0..nodes.len() {
        let start = nodes[index].start_offset;
        nodes[index].end_offset = start + nodes[index].duration;

        let sequential = matches!(nodes[index].effect, Effect::Sequence);
        let during_transition = nodes[index].run_during_transition;
        let mut cursor = start;
        for position in 0..nodes[index].children.len() {
            let child = nodes[index].children[position];
            nodes[child].start_offset = cursor;
            nodes[child].run_during_transition |= during_transition;
            if sequential {
                cursor += nodes[child].duration;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_sequence() -> Action {
        Action::sequence(vec![
            Action::wait(500.0),
            Action::move_to(Point2::new(100.0, 0.0), 1000.0),
            Action::callback(|_| {}),
            Action::scale_to(2.0, 250.0),
        ])
    }

    #[test]
    fn test_sequence_duration_is_sum() {
        let template = ActionTemplate::compile(&sample_sequence()).unwrap();
        assert_eq!(template.duration(), 1750.0);
    }

    #[test]
    fn test_group_duration_is_max() {
        let template = ActionTemplate::compile(&Action::group(vec![
            Action::wait(300.0),
            Action::scale_to(0.5, 900.0),
            Action::wait(100.0),
        ]))
        .unwrap();
        assert_eq!(template.duration(), 900.0);
    }

    #[test]
    fn test_sequence_child_offsets_accumulate() {
        let template = ActionTemplate::compile(&sample_sequence()).unwrap();
        let offsets: Vec<(f64, f64)> = template.root().children.iter()
            .map(|c| (template.nodes()[*c].start_offset, template.nodes()[*c].end_offset))
            .collect();

        assert_eq!(
            offsets,
            vec![(0.0, 500.0), (500.0, 1500.0), (1500.0, 1500.0), (1500.0, 1750.0)]
        );
    }

    #[test]
    fn test_nested_group_children_inherit_start() {
        let template = ActionTemplate::compile(&Action::sequence(vec![
            Action::wait(200.0),
            Action::group(vec![Action::wait(50.0), Action::wait(80.0)]),
            Action::wait(10.0),
        ]))
        .unwrap();

        let nodes = template.nodes();
        let group = &nodes[nodes[0].children[1]];
        assert_eq!(group.start_offset, 200.0);
        assert_eq!(group.duration, 80.0);
        for child in &group.children {
            assert_eq!(nodes[*child].start_offset, 200.0);
        }
        assert_eq!(nodes[nodes[0].children[2]].start_offset, 280.0);
        assert_eq!(template.duration(), 290.0);
    }

    #[test]
    fn test_parent_links_and_preorder() {
        let template = ActionTemplate::compile(&sample_sequence()).unwrap();
        assert_eq!(template.root().parent, None);
        for (index, node) in template.nodes().iter().enumerate().skip(1) {
            let parent = node.parent.unwrap();
            assert!(parent < index);
            assert!(template.nodes()[parent].children.contains(&index));
        }
    }

    #[test]
    fn test_transition_flag_propagates_down() {
        let template = ActionTemplate::compile(
            &Action::sequence(vec![Action::wait(1.0), Action::group(vec![Action::wait(1.0)])])
                .run_during_transition(true),
        )
        .unwrap();
        assert!(template.nodes().iter().all(|n| n.run_during_transition));
    }

    #[test]
    fn test_negative_duration_is_rejected() {
        let result = ActionTemplate::compile(&Action::sequence(vec![Action::wait(-1.0)]));
        assert!(matches!(result, Err(EngineError::InvalidAction(_))));

        let result = ActionTemplate::compile(&Action::scale_to(1.0, f64::NAN));
        assert!(matches!(result, Err(EngineError::InvalidAction(_))));
    }

    #[test]
    fn test_empty_composite_takes_no_time() {
        let template = ActionTemplate::compile(&Action::group(Vec::new())).unwrap();
        assert_eq!(template.len(), 1);
        assert_eq!(template.duration(), 0.0);
    }
}

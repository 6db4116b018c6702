//! Constraint resolution and absolute placement

use crate::entity::{Entity, EntityId, EntityTree};
use crate::error::EngineError;
use crate::foundation::logging::{debug, warn};
use crate::foundation::math::{Point2, Rect};
use crate::layout::{Axis, ConstraintTarget, ConstraintType, Layout};

/// Absolute state of the parent an entity is placed in
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ParentFrame {
    /// Anchor point children are offset from
    pub position: Point2,
    pub scale: f32,
    pub alpha: f32,
    pub bounds: Rect,
}

impl ParentFrame {
    pub fn of(entity: &Entity) -> Self {
        Self {
            position: entity.absolute_position,
            scale: entity.absolute_scale,
            alpha: entity.absolute_alpha,
            bounds: entity.bounds(),
        }
    }
}

fn invalid(entity: &Entity, reason: impl Into<String>) -> EngineError {
    EngineError::InvalidConstraint {
        entity: entity.name.clone(),
        reason: reason.into(),
    }
}

/// First-update setup of an entity's layout
///
/// Named targets are looked up once and replaced by handles. Self-targets and
/// two constraints on the same edge are rejected. An axis with zero size and
/// both edges pinned is switched to fill the space between its anchors.
pub(crate) fn initialize(tree: &mut EntityTree, id: EntityId) -> Result<(), EngineError> {
    let entity = tree.entity(id)?;
    if !entity.needs_initialization {
        return Ok(());
    }

    let mut resolved = Vec::with_capacity(entity.layout().constraints().len());
    let mut pinned_edges: Vec<(Axis, bool)> = Vec::new();
    for constraint in entity.layout().constraints() {
        let edge = (constraint.kind.axis(), constraint.kind.focal_min());
        if pinned_edges.contains(&edge) {
            return Err(invalid(entity, format!("{:?} pins an edge that is already pinned", constraint.kind)));
        }
        pinned_edges.push(edge);

        let target = match &constraint.target {
            ConstraintTarget::Named(name) => ConstraintTarget::Entity(tree.find_by_name(name)?),
            other => other.clone(),
        };
        if let ConstraintTarget::Entity(target_id) = target {
            if target_id == id {
                return Err(invalid(entity, format!("{:?} targets the entity itself", constraint.kind)));
            }
            if !tree.contains(target_id) {
                return Err(invalid(entity, format!("{:?} targets a removed entity", constraint.kind)));
            }
        }
        resolved.push(target);
    }

    let match_width = entity.size.width == 0.0 && entity.layout().on_axis(Axis::Horizontal).count() == 2;
    let match_height = entity.size.height == 0.0 && entity.layout().on_axis(Axis::Vertical).count() == 2;
    if !entity.layout().is_empty() {
        for axis in [Axis::Horizontal, Axis::Vertical] {
            if entity.layout().on_axis(axis).next().is_none() {
                warn!("'{}' has no {:?} constraint; using its position on that axis", entity.name, axis);
            }
        }
    }

    let entity = tree.entity_mut(id)?;
    let layout = entity.layout_mut();
    for (constraint, target) in layout.constraints_mut().iter_mut().zip(resolved) {
        constraint.target = target;
    }
    layout.match_width = match_width;
    layout.match_height = match_height;
    entity.needs_initialization = false;
    debug!("Initialized '{}'", entity.name);
    Ok(())
}

fn span(rect: &Rect, axis: Axis) -> (f32, f32) {
    match axis {
        Axis::Horizontal => (rect.x, rect.x + rect.width),
        Axis::Vertical => (rect.y, rect.y + rect.height),
    }
}

/// Edge of the target a constraint is pinned to, in canvas space
fn anchor_edge(
    tree: &EntityTree,
    focal: &Entity,
    parent: &ParentFrame,
    target: &ConstraintTarget,
    kind: ConstraintType,
) -> Result<f32, EngineError> {
    let bounds = match target {
        ConstraintTarget::Parent => parent.bounds,
        ConstraintTarget::Entity(target_id) => tree
            .get(*target_id)
            .ok_or_else(|| invalid(focal, format!("{kind:?} targets a removed entity")))?
            .bounds(),
        ConstraintTarget::Named(name) => {
            return Err(invalid(focal, format!("target '{name}' was never resolved")));
        }
    };
    let (min, max) = span(&bounds, kind.axis());
    Ok(if kind.alter_min() { min } else { max })
}

/// Where the focal edge of a constraint lands, margin included
fn pinned_edge(layout: &Layout, kind: ConstraintType, edge: f32, parent_scale: f32) -> f32 {
    let margin = layout.margin_for(kind) * parent_scale;
    if kind.focal_min() {
        edge + margin
    } else {
        edge - margin
    }
}

/// Placement along one axis: center coordinate and, when filling, the new
/// unscaled extent
fn resolve_axis(
    tree: &EntityTree,
    entity: &Entity,
    parent: &ParentFrame,
    axis: Axis,
    abs_scale: f32,
) -> Result<Option<(f32, Option<f32>)>, EngineError> {
    let layout = entity.layout();
    let extent = match axis {
        Axis::Horizontal => entity.size.width,
        Axis::Vertical => entity.size.height,
    };

    let mut pins = Vec::with_capacity(2);
    for constraint in layout.on_axis(axis) {
        let edge = anchor_edge(tree, entity, parent, &constraint.target, constraint.kind)?;
        pins.push((constraint.kind, pinned_edge(layout, constraint.kind, edge, parent.scale)));
    }

    if layout.matches_axis(axis) && pins.len() == 2 {
        let (low, high) = if pins[0].0.focal_min() {
            (pins[0].1, pins[1].1)
        } else {
            (pins[1].1, pins[0].1)
        };
        let filled = if abs_scale > 0.0 { (high - low).max(0.0) / abs_scale } else { 0.0 };
        return Ok(Some(((low + high) / 2.0, Some(filled))));
    }

    let half = extent * abs_scale / 2.0;
    let candidates: Vec<f32> = pins
        .iter()
        .map(|(kind, pinned)| if kind.focal_min() { pinned + half } else { pinned - half })
        .collect();

    Ok(match candidates.as_slice() {
        [] => None,
        [only] => Some((*only, None)),
        [a, b, ..] => Some((a.min(*b) + layout.bias(axis) * (a - b).abs(), None)),
    })
}

/// Compute absolute position, scale and alpha of a non-scene entity
///
/// Constrained axes are written back into the local position so the entity
/// stays where the layout put it if its constraints are removed.
pub(crate) fn place(tree: &mut EntityTree, id: EntityId, parent: &ParentFrame) -> Result<(), EngineError> {
    let entity = tree.entity(id)?;
    let abs_scale = parent.scale * entity.scale;
    let abs_alpha = parent.alpha * entity.alpha;
    let direct = parent.position + entity.position.coords * parent.scale;

    let (horizontal, vertical) = if entity.layout().is_empty() {
        (None, None)
    } else {
        (
            resolve_axis(tree, entity, parent, Axis::Horizontal, abs_scale)?,
            resolve_axis(tree, entity, parent, Axis::Vertical, abs_scale)?,
        )
    };

    let entity = tree.entity_mut(id)?;
    let mut absolute = direct;
    if let Some((x, filled)) = horizontal {
        absolute.x = x;
        if let Some(width) = filled {
            entity.size.width = width;
        }
    }
    if let Some((y, filled)) = vertical {
        absolute.y = y;
        if let Some(height) = filled {
            entity.size.height = height;
        }
    }
    if (horizontal.is_some() || vertical.is_some()) && parent.scale != 0.0 {
        entity.position = Point2::from((absolute - parent.position) / parent.scale);
    }

    entity.absolute_position = absolute;
    entity.absolute_scale = abs_scale;
    entity.absolute_alpha = abs_alpha;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::{Size, Vec4};
    use approx::assert_relative_eq;

    fn scene_tree() -> (EntityTree, EntityId, ParentFrame) {
        let mut tree = EntityTree::new();
        let scene = tree.insert(Entity::scene("scene", Vec4::zeros()).with_size(Size::new(400.0, 800.0)));
        let frame = ParentFrame::of(tree.get(scene).unwrap());
        (tree, scene, frame)
    }

    fn settle(tree: &mut EntityTree, id: EntityId, frame: &ParentFrame) -> Point2 {
        initialize(tree, id).unwrap();
        place(tree, id, frame).unwrap();
        tree.get(id).unwrap().absolute_position()
    }

    #[test]
    fn test_unconstrained_child_uses_parent_scale() {
        let (mut tree, scene, mut frame) = scene_tree();
        frame.position = Point2::new(10.0, 20.0);
        frame.scale = 2.0;
        let child = tree
            .spawn_child(scene, Entity::composite("c").with_position(Point2::new(5.0, 5.0)))
            .unwrap();

        assert_eq!(settle(&mut tree, child, &frame), Point2::new(20.0, 30.0));
        assert_eq!(tree.get(child).unwrap().absolute_scale(), 2.0);
    }

    #[test]
    fn test_pin_to_parent_corner() {
        let (mut tree, scene, frame) = scene_tree();
        let child = tree
            .spawn_child(
                scene,
                Entity::rectangle("box", Size::new(100.0, 50.0), Vec4::zeros()).with_layout(
                    Layout::new()
                        .top_to_top_of(ConstraintTarget::Parent)
                        .start_to_start_of(ConstraintTarget::Parent)
                        .with_margins(8.0, 0.0, 4.0, 0.0),
                ),
            )
            .unwrap();

        assert_eq!(settle(&mut tree, child, &frame), Point2::new(58.0, 29.0));
        assert_eq!(tree.get(child).unwrap().position, Point2::new(58.0, 29.0));
    }

    #[test]
    fn test_two_pins_use_bias() {
        let (mut tree, scene, frame) = scene_tree();
        let layout = Layout::new()
            .start_to_start_of(ConstraintTarget::Parent)
            .end_to_end_of(ConstraintTarget::Parent)
            .top_to_top_of(ConstraintTarget::Parent)
            .bottom_to_bottom_of(ConstraintTarget::Parent)
            .with_bias(0.5, 0.25);
        let child = tree
            .spawn_child(
                scene,
                Entity::rectangle("box", Size::new(100.0, 100.0), Vec4::zeros()).with_layout(layout),
            )
            .unwrap();

        let position = settle(&mut tree, child, &frame);
        assert_relative_eq!(position.x, 200.0);
        // Candidates 50 and 750; a quarter of the way from the top.
        assert_relative_eq!(position.y, 225.0);
    }

    #[test]
    fn test_sibling_edge_pin() {
        let (mut tree, scene, frame) = scene_tree();
        let header = tree
            .spawn_child(
                scene,
                Entity::rectangle("header", Size::new(400.0, 60.0), Vec4::zeros())
                    .with_position(Point2::new(200.0, 30.0)),
            )
            .unwrap();
        let body = tree
            .spawn_child(
                scene,
                Entity::rectangle("body", Size::new(200.0, 100.0), Vec4::zeros())
                    .with_position(Point2::new(200.0, 0.0))
                    .with_layout(Layout::new().top_to_bottom_of("header")),
            )
            .unwrap();

        settle(&mut tree, header, &frame);
        let position = settle(&mut tree, body, &frame);

        assert_eq!(position, Point2::new(200.0, 110.0));
        let layout = tree.get(body).unwrap().layout();
        assert_eq!(layout.constraints()[0].target, ConstraintTarget::Entity(header));
    }

    #[test]
    fn test_zero_width_fills_between_anchors() {
        let (mut tree, scene, frame) = scene_tree();
        let bar = tree
            .spawn_child(
                scene,
                Entity::rectangle("bar", Size::new(0.0, 10.0), Vec4::zeros()).with_layout(
                    Layout::new()
                        .start_to_start_of(ConstraintTarget::Parent)
                        .end_to_end_of(ConstraintTarget::Parent)
                        .with_margins(20.0, 20.0, 0.0, 0.0),
                ),
            )
            .unwrap();

        let position = settle(&mut tree, bar, &frame);
        assert_relative_eq!(position.x, 200.0);
        assert_relative_eq!(tree.get(bar).unwrap().size.width, 360.0);

        // Stays a filling bar on later frames.
        place(&mut tree, bar, &frame).unwrap();
        assert_relative_eq!(tree.get(bar).unwrap().size.width, 360.0);
    }

    #[test]
    fn test_self_target_is_rejected() {
        let (mut tree, scene, _) = scene_tree();
        let node = tree
            .spawn_child(
                scene,
                Entity::composite("loop").with_layout(Layout::new().top_to_top_of("loop")),
            )
            .unwrap();
        assert!(matches!(
            initialize(&mut tree, node),
            Err(EngineError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_same_edge_twice_is_rejected() {
        let (mut tree, scene, _) = scene_tree();
        let node = tree
            .spawn_child(
                scene,
                Entity::composite("twice").with_layout(
                    Layout::new()
                        .top_to_top_of(ConstraintTarget::Parent)
                        .top_to_bottom_of(ConstraintTarget::Parent),
                ),
            )
            .unwrap();
        assert!(matches!(
            initialize(&mut tree, node),
            Err(EngineError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_unknown_target_name_fails() {
        let (mut tree, scene, _) = scene_tree();
        let node = tree
            .spawn_child(
                scene,
                Entity::composite("lost").with_layout(Layout::new().top_to_top_of("nowhere")),
            )
            .unwrap();
        assert!(matches!(
            initialize(&mut tree, node),
            Err(EngineError::UnknownEntityName(_))
        ));
    }
}

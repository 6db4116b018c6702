//! Per-tick tree walk

use crate::action::{evaluate_actions, FiredCallback};
use crate::entity::{EntityId, EntityTree};
use crate::error::EngineError;
use crate::foundation::time::FrameContext;
use crate::layout::{ordering, resolver};
use crate::layout::resolver::ParentFrame;

/// Update a scene and everything below it
///
/// Each entity is initialized on its first visit, then its actions advance,
/// then its absolute values are derived from its parent. Children follow in
/// constraint order.
pub(crate) fn update_scene(
    tree: &mut EntityTree,
    scene: EntityId,
    ctx: &FrameContext,
    fired: &mut Vec<FiredCallback>,
) -> Result<(), EngineError> {
    let entity = tree.entity_mut(scene)?;
    let transitioning = entity
        .scene_data()
        .map(|data| data.transitioning)
        .ok_or_else(|| EngineError::NotAScene(entity.name.clone()))?;

    entity.needs_initialization = false;
    evaluate_actions(entity, scene, transitioning, ctx, fired);
    entity.absolute_position = entity.position;
    entity.absolute_scale = entity.scale;
    entity.absolute_alpha = entity.alpha;

    update_children(tree, scene, transitioning, ctx, fired)
}

fn update_entity(
    tree: &mut EntityTree,
    id: EntityId,
    parent: &ParentFrame,
    transitioning: bool,
    ctx: &FrameContext,
    fired: &mut Vec<FiredCallback>,
) -> Result<(), EngineError> {
    resolver::initialize(tree, id)?;
    evaluate_actions(tree.entity_mut(id)?, id, transitioning, ctx, fired);
    resolver::place(tree, id, parent)?;
    update_children(tree, id, transitioning, ctx, fired)
}

fn update_children(
    tree: &mut EntityTree,
    id: EntityId,
    transitioning: bool,
    ctx: &FrameContext,
    fired: &mut Vec<FiredCallback>,
) -> Result<(), EngineError> {
    let children = tree.children(id).to_vec();
    if children.is_empty() {
        return Ok(());
    }
    // Named targets must be handles before the dependency graph is built.
    for child in &children {
        resolver::initialize(tree, *child)?;
    }
    let order = ordering::update_order(tree, &children)?;
    let frame = ParentFrame::of(tree.entity(id)?);
    for child in order {
        update_entity(tree, child, &frame, transitioning, ctx, fired)?;
    }
    Ok(())
}

//! Pointer event routing

use crate::entity::{EntityId, EntityTree};
use crate::error::EngineError;
use crate::events::{Event, EventSystem, EventType};
use crate::foundation::logging::trace;
use crate::foundation::math::Point2;
use crate::input::hit_test;
use crate::input::{PointerEventKind, RawPointerEvent};

/// Interactive entities below `roots` in the order they see pointer events
///
/// Hidden subtrees are skipped. Within a parent, children with a higher
/// z-position come first and later-declared children win ties, which is the
/// reverse of draw order. Every entity comes after its descendants.
pub(crate) fn hit_order(tree: &EntityTree, roots: &[EntityId]) -> Vec<EntityId> {
    fn visit(tree: &EntityTree, id: EntityId, out: &mut Vec<EntityId>) {
        let Some(entity) = tree.get(id) else {
            return;
        };
        if entity.hidden {
            return;
        }
        let mut children: Vec<EntityId> = entity.children().iter().rev().copied().collect();
        children.sort_by(|a, b| {
            let za = tree.get(*a).map_or(0.0, |e| e.z_position);
            let zb = tree.get(*b).map_or(0.0, |e| e.z_position);
            zb.total_cmp(&za)
        });
        for child in children {
            visit(tree, child, out);
        }
        if entity.is_user_interaction_enabled {
            out.push(id);
        }
    }

    let mut out = Vec::new();
    for root in roots {
        visit(tree, *root, &mut out);
    }
    out
}

/// Route one raw pointer event through the interactive entities of `roots`
///
/// Returns whether any handler consumed one of the raised events. Once that
/// happens, entities further down the order raise nothing more for this
/// event; releases still clear their press and drag state.
pub(crate) fn dispatch(
    tree: &mut EntityTree,
    events: &mut EventSystem,
    roots: &[EntityId],
    raw: &RawPointerEvent,
    canvas_scale: f32,
    now: f64,
) -> Result<bool, EngineError> {
    let point = raw.point(canvas_scale);
    let mut handled = false;

    for id in hit_order(tree, roots) {
        // Bounds are unrotated, so hits and local points are computed in that frame.
        let unrotated = hit_test::unrotate(tree, id, point);
        let inside = hit_test::point_in_entity(tree.entity(id)?, unrotated);
        let drag_point = tree
            .parent(id)
            .map_or(point, |parent| hit_test::unrotate(tree, parent, point));
        let raised = match raw.kind {
            PointerEventKind::Down => on_down(tree, id, drag_point, inside, handled)?,
            PointerEventKind::Move => on_move(tree, id, drag_point, inside, handled)?,
            PointerEventKind::Up => on_up(tree, id, inside, handled)?,
            PointerEventKind::Leave => on_leave(tree, id, handled)?,
        };
        if raised.is_empty() {
            continue;
        }

        let entity = tree.entity(id)?;
        let bounds = entity.bounds();
        let local = local_point(bounds.x, bounds.y, entity.absolute_scale(), unrotated);
        trace!("{:?} on '{}' raised {:?}", raw.kind, entity.name, raised);
        for event_type in raised {
            let event = Event::new(event_type, id, now).with_pointer(local, raw.buttons);
            handled |= events.emit(&event);
        }
    }
    Ok(handled)
}

fn local_point(left: f32, top: f32, scale: f32, point: Point2) -> Point2 {
    if scale == 0.0 {
        return Point2::origin();
    }
    Point2::new((point.x - left) / scale, (point.y - top) / scale)
}

/// `point` is in the parent's unrotated frame, the one `position` lives in
fn on_down(
    tree: &mut EntityTree,
    id: EntityId,
    point: Point2,
    inside: bool,
    handled: bool,
) -> Result<Vec<EventType>, EngineError> {
    if !inside || handled {
        return Ok(Vec::new());
    }
    let state = &mut tree.entity_mut(id)?.pointer;
    state.pressed = true;
    state.pressed_and_within_hit_area = true;
    state.within_hit_area = true;
    state.dragging = false;
    state.pressed_initial_point = Some(point);
    state.dragging_last_point = None;
    Ok(vec![EventType::PointerDown, EventType::TapDown])
}

fn on_move(
    tree: &mut EntityTree,
    id: EntityId,
    point: Point2,
    inside: bool,
    handled: bool,
) -> Result<Vec<EventType>, EngineError> {
    if handled {
        return Ok(Vec::new());
    }
    let parent_scale = tree
        .parent(id)
        .and_then(|parent| tree.get(parent))
        .map_or(1.0, |parent| parent.absolute_scale());

    let entity = tree.entity_mut(id)?;
    let mut raised = Vec::new();

    if entity.pointer.pressed && entity.draggable {
        let last = entity
            .pointer
            .dragging_last_point
            .or(entity.pointer.pressed_initial_point)
            .unwrap_or(point);
        let delta = point - last;
        if parent_scale != 0.0 {
            entity.position += delta / parent_scale;
        }
        entity.absolute_position += delta;
        entity.pointer.dragging_last_point = Some(point);
        raised.push(if entity.pointer.dragging {
            EventType::Drag
        } else {
            EventType::DragStart
        });
        entity.pointer.dragging = true;
        return Ok(raised);
    }

    let state = &mut entity.pointer;
    if state.pressed {
        if state.pressed_and_within_hit_area && !inside {
            raised.push(EventType::TapLeave);
        }
        state.pressed_and_within_hit_area = inside;
    }
    if inside && !state.within_hit_area {
        raised.push(EventType::PointerEnter);
    } else if !inside && state.within_hit_area {
        raised.push(EventType::PointerLeave);
    }
    state.within_hit_area = inside;
    if inside {
        raised.push(EventType::PointerMove);
    }
    Ok(raised)
}

fn on_up(tree: &mut EntityTree, id: EntityId, inside: bool, handled: bool) -> Result<Vec<EventType>, EngineError> {
    let state = &mut tree.entity_mut(id)?.pointer;
    let raised = if state.dragging {
        vec![EventType::DragEnd]
    } else if state.pressed && inside {
        vec![EventType::TapUp, EventType::TapUpAny, EventType::PointerUp]
    } else if state.pressed {
        vec![EventType::TapUpAny]
    } else if inside {
        vec![EventType::PointerUp]
    } else {
        Vec::new()
    };
    state.release();
    state.within_hit_area = inside;
    Ok(if handled { Vec::new() } else { raised })
}

fn on_leave(tree: &mut EntityTree, id: EntityId, handled: bool) -> Result<Vec<EventType>, EngineError> {
    let state = &mut tree.entity_mut(id)?.pointer;
    let mut raised = Vec::new();
    if state.dragging {
        // No release is guaranteed once the pointer is off the canvas.
        raised.push(EventType::DragEnd);
        state.release();
    } else {
        if state.pressed && state.pressed_and_within_hit_area {
            raised.push(EventType::TapLeave);
            state.pressed_and_within_hit_area = false;
        }
        if state.within_hit_area {
            raised.push(EventType::PointerLeave);
            state.within_hit_area = false;
        }
    }
    Ok(if handled { Vec::new() } else { raised })
}

//! Frame draw pass

use crate::entity::{Entity, EntityId, EntityTree, NodeKind, ShapeKind};
use crate::foundation::math::{Color, Vec2};
use crate::render::{Canvas, Paint, TextStyle};

fn faded(color: Color, alpha: f32) -> Color {
    let mut color = color;
    color.w *= alpha;
    color
}

/// Draw the active scenes in presentation order, then the overlay
///
/// Scenes are drawn in the order they were added; the free-node overlay
/// always ends up on top.
pub(crate) fn draw_frame(
    tree: &EntityTree,
    scenes: &[EntityId],
    overlay: Option<EntityId>,
    canvas: &mut dyn Canvas,
    canvas_scale: f32,
) {
    canvas.save();
    canvas.scale(canvas_scale, canvas_scale);
    for scene in scenes.iter().copied().filter(|id| Some(*id) != overlay) {
        if tree.get(scene).and_then(Entity::scene_data).is_some_and(|data| data.active) {
            draw_entity(tree, scene, canvas);
        }
    }
    if let Some(overlay) = overlay {
        draw_entity(tree, overlay, canvas);
    }
    canvas.restore();
}

/// Draw one entity and its subtree
pub(crate) fn draw_entity(tree: &EntityTree, id: EntityId, canvas: &mut dyn Canvas) {
    let Some(entity) = tree.get(id) else {
        return;
    };
    if entity.hidden {
        return;
    }

    canvas.save();
    if entity.z_rotation != 0.0 {
        let pivot = entity.bounds().center();
        canvas.translate(pivot.x, pivot.y);
        canvas.rotate(entity.z_rotation);
        canvas.translate(-pivot.x, -pivot.y);
    }

    draw_kind(entity, canvas);

    let mut children = entity.children().to_vec();
    // Stable: equal z keeps declaration order.
    children.sort_by(|a, b| {
        let za = tree.get(*a).map_or(0.0, |e| e.z_position);
        let zb = tree.get(*b).map_or(0.0, |e| e.z_position);
        za.total_cmp(&zb)
    });
    for child in children {
        draw_entity(tree, child, canvas);
    }
    canvas.restore();
}

fn draw_kind(entity: &Entity, canvas: &mut dyn Canvas) {
    let alpha = entity.absolute_alpha();
    let bounds = entity.bounds();
    match &entity.kind {
        NodeKind::Scene(scene) => {
            canvas.draw_rect(bounds, &Paint::fill(faded(scene.background_color, alpha)));
        }
        NodeKind::Shape(shape) => {
            let mut paints = Vec::with_capacity(2);
            if let Some(fill) = shape.fill_color {
                paints.push(Paint::fill(faded(fill, alpha)));
            }
            if let Some(stroke) = shape.stroke_color {
                paints.push(Paint::stroke(faded(stroke, alpha), shape.line_width * entity.absolute_scale()));
            }
            for paint in &paints {
                match shape.shape {
                    ShapeKind::Circle { radius } => {
                        canvas.draw_circle(entity.absolute_position(), radius * entity.absolute_scale(), paint);
                    }
                    ShapeKind::Rectangle { corner_radius } if corner_radius > 0.0 => {
                        canvas.draw_rrect(bounds, corner_radius * entity.absolute_scale(), paint);
                    }
                    ShapeKind::Rectangle { .. } => canvas.draw_rect(bounds, paint),
                }
            }
        }
        NodeKind::Label(label) => {
            let style = TextStyle {
                font_size: label.font_size * entity.absolute_scale(),
                color: faded(label.font_color, alpha),
            };
            match label.preferred_max_layout_width {
                Some(width) => {
                    let max_width = width * entity.absolute_scale();
                    let origin = entity.absolute_position() - Vec2::new(max_width / 2.0, bounds.height / 2.0);
                    canvas.draw_paragraph(&label.text, origin, max_width, &style);
                }
                None => canvas.draw_text(&label.text, entity.absolute_position(), &style),
            }
        }
        NodeKind::Sprite(sprite) => canvas.draw_image(&sprite.image, bounds, alpha),
        NodeKind::Composite => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::update::update_scene;
    use crate::foundation::math::{constants, Point2, Rect, Size, Vec4};
    use crate::foundation::time::FrameContext;
    use crate::render::{DrawCommand, RecordingCanvas};

    fn ctx() -> FrameContext {
        FrameContext::new(0.0, 0.0, Size::new(400.0, 800.0), 1.0)
    }

    fn active_scene(tree: &mut EntityTree) -> EntityId {
        let mut scene = Entity::scene("scene", Vec4::new(1.0, 1.0, 1.0, 1.0)).with_size(Size::new(400.0, 800.0));
        if let Some(data) = scene.scene_data_mut() {
            data.active = true;
        }
        tree.insert(scene)
    }

    #[test]
    fn test_children_draw_in_z_order() {
        let mut tree = EntityTree::new();
        let scene = active_scene(&mut tree);
        tree.spawn_child(
            scene,
            Entity::circle("top", 5.0, Vec4::zeros()).with_z_position(1.0).with_position(Point2::new(10.0, 10.0)),
        )
        .unwrap();
        tree.spawn_child(
            scene,
            Entity::rectangle("bottom", Size::new(10.0, 10.0), Vec4::zeros()).with_position(Point2::new(10.0, 10.0)),
        )
        .unwrap();
        update_scene(&mut tree, scene, &ctx(), &mut Vec::new()).unwrap();

        let mut canvas = RecordingCanvas::new(Size::new(800.0, 1600.0));
        draw_frame(&tree, &[scene], None, &mut canvas, 2.0);

        let commands = canvas.commands();
        assert_eq!(commands[0], DrawCommand::Save);
        assert_eq!(commands[1], DrawCommand::Scale(2.0, 2.0));
        let shapes: Vec<&DrawCommand> = commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Rect(..) | DrawCommand::Circle(..)))
            .collect();
        assert!(matches!(shapes[0], DrawCommand::Rect(rect, _) if rect.width == 400.0));
        assert!(matches!(shapes[1], DrawCommand::Rect(rect, _) if *rect == Rect::new(5.0, 5.0, 10.0, 10.0)));
        assert!(matches!(shapes[2], DrawCommand::Circle(..)));
        assert_eq!(canvas.depth(), 0);
    }

    #[test]
    fn test_alpha_and_rotation() {
        let mut tree = EntityTree::new();
        let scene = active_scene(&mut tree);
        let mut faint = Entity::rectangle("faint", Size::new(10.0, 10.0), Vec4::new(0.0, 0.0, 0.0, 1.0))
            .with_position(Point2::new(50.0, 50.0))
            .with_z_rotation(constants::HALF_PI);
        faint.alpha = 0.5;
        tree.spawn_child(scene, faint).unwrap();
        update_scene(&mut tree, scene, &ctx(), &mut Vec::new()).unwrap();

        let mut canvas = RecordingCanvas::new(Size::new(400.0, 800.0));
        draw_entity(&tree, scene, &mut canvas);

        let commands = canvas.commands();
        let rotate_at = commands
            .iter()
            .position(|c| *c == DrawCommand::Rotate(constants::HALF_PI))
            .unwrap();
        assert_eq!(commands[rotate_at - 1], DrawCommand::Translate(50.0, 50.0));
        assert_eq!(commands[rotate_at + 1], DrawCommand::Translate(-50.0, -50.0));
        assert!(matches!(commands[rotate_at + 2], DrawCommand::Rect(_, paint) if paint.color.w == 0.5));
    }

    #[test]
    fn test_inactive_and_hidden_are_skipped() {
        let mut tree = EntityTree::new();
        let inactive = tree.insert(Entity::scene("off", Vec4::zeros()));
        let scene = active_scene(&mut tree);
        let mut ghost = Entity::rectangle("ghost", Size::new(10.0, 10.0), Vec4::zeros());
        ghost.hidden = true;
        tree.spawn_child(scene, ghost).unwrap();
        update_scene(&mut tree, scene, &ctx(), &mut Vec::new()).unwrap();

        let mut canvas = RecordingCanvas::new(Size::new(400.0, 800.0));
        draw_frame(&tree, &[inactive, scene], None, &mut canvas, 1.0);

        let rects = canvas.commands().iter().filter(|c| matches!(c, DrawCommand::Rect(..))).count();
        assert_eq!(rects, 1);
    }

    #[test]
    fn test_stroke_and_fill_both_drawn() {
        let mut tree = EntityTree::new();
        let scene = active_scene(&mut tree);
        let mut ring = Entity::circle("ring", 10.0, Vec4::zeros());
        if let NodeKind::Shape(shape) = &mut ring.kind {
            shape.stroke_color = Some(Vec4::new(1.0, 0.0, 0.0, 1.0));
            shape.line_width = 2.0;
        }
        tree.spawn_child(scene, ring).unwrap();
        update_scene(&mut tree, scene, &ctx(), &mut Vec::new()).unwrap();

        let mut canvas = RecordingCanvas::new(Size::new(400.0, 800.0));
        draw_entity(&tree, scene, &mut canvas);
        let circles = canvas.commands().iter().filter(|c| matches!(c, DrawCommand::Circle(..))).count();
        assert_eq!(circles, 2);
    }
}

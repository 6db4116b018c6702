//! Pointer input routed through a running game

use super::{presented_game, record};
use approx::assert_abs_diff_eq;
use crate::core::GameConfig;
use crate::entity::Entity;
use crate::events::{Event, EventType};
use crate::foundation::math::{constants, Point2, Size, Vec4};
use crate::input::RawPointerEvent;
use crate::scene::Transition;
use crate::Game;

fn handle() -> Entity {
    Entity::rectangle("handle", Size::new(50.0, 50.0), Vec4::new(0.0, 0.0, 1.0, 1.0))
        .with_position(Point2::new(100.0, 100.0))
        .interactive(true)
        .draggable(true)
}

#[test]
fn test_drag_moves_by_total_offset() {
    let (mut game, scene) = presented_game();
    let handle = game.add_child(scene, handle()).unwrap();
    game.update(16.0).unwrap();
    let log = record(
        &mut game,
        &[EventType::DragStart, EventType::Drag, EventType::DragEnd, EventType::TapUp],
    );

    game.handle_pointer_event(&RawPointerEvent::down(100.0, 100.0)).unwrap();
    for step in 1..=3u8 {
        let x = 100.0 + 5.0 * f32::from(step);
        game.handle_pointer_event(&RawPointerEvent::moved(x, 100.0)).unwrap();
    }
    game.handle_pointer_event(&RawPointerEvent::up(115.0, 100.0)).unwrap();

    assert_eq!(game.entity(handle).unwrap().position, Point2::new(115.0, 100.0));
    let types: Vec<EventType> = log.borrow().iter().map(|event| event.event_type).collect();
    assert_eq!(
        types,
        vec![EventType::DragStart, EventType::Drag, EventType::Drag, EventType::DragEnd]
    );

    // The dragged position survives the next layout pass.
    game.update(32.0).unwrap();
    assert_eq!(game.entity(handle).unwrap().absolute_position(), Point2::new(115.0, 100.0));
}

#[test]
fn test_rotated_node_hits_its_visible_area() {
    let (mut game, scene) = presented_game();
    let bar = game
        .add_child(
            scene,
            Entity::rectangle("bar", Size::new(100.0, 20.0), Vec4::zeros())
                .with_position(Point2::new(200.0, 400.0))
                .with_z_rotation(constants::HALF_PI)
                .interactive(true),
        )
        .unwrap();
    game.update(16.0).unwrap();
    game.events_mut()
        .register_entity_handler(EventType::TapDown, bar, |_: &Event| true);

    // Inside the upright bar, outside the unrotated one.
    assert!(game.handle_pointer_event(&RawPointerEvent::down(200.0, 440.0)).unwrap());
    game.handle_pointer_event(&RawPointerEvent::up(200.0, 440.0)).unwrap();

    // Inside the unrotated bar only.
    assert!(!game.handle_pointer_event(&RawPointerEvent::down(245.0, 400.0)).unwrap());
}

#[test]
fn test_rotated_node_reports_points_in_its_own_frame() {
    let (mut game, scene) = presented_game();
    game.add_child(
        scene,
        Entity::rectangle("bar", Size::new(100.0, 20.0), Vec4::zeros())
            .with_position(Point2::new(200.0, 400.0))
            .with_z_rotation(constants::HALF_PI)
            .interactive(true),
    )
    .unwrap();
    game.update(16.0).unwrap();
    let log = record(&mut game, &[EventType::TapDown]);

    // 40 below the center of the upright bar is 40 right of center unrotated.
    game.handle_pointer_event(&RawPointerEvent::down(200.0, 440.0)).unwrap();
    let seen = log.borrow();
    assert_eq!(seen.len(), 1);
    let point = seen[0].point.unwrap();
    assert_abs_diff_eq!(point.x, 90.0, epsilon = 1e-3);
    assert_abs_diff_eq!(point.y, 10.0, epsilon = 1e-3);
}

#[test]
fn test_child_of_rotated_parent_follows_the_pointer() {
    let (mut game, scene) = presented_game();
    let arm = game
        .add_child(
            scene,
            Entity::composite("arm")
                .with_size(Size::new(100.0, 100.0))
                .with_position(Point2::new(200.0, 200.0))
                .with_z_rotation(constants::HALF_PI),
        )
        .unwrap();
    let knob = game
        .add_child(
            arm,
            Entity::rectangle("knob", Size::new(40.0, 40.0), Vec4::zeros())
                .interactive(true)
                .draggable(true),
        )
        .unwrap();
    game.update(16.0).unwrap();

    game.handle_pointer_event(&RawPointerEvent::down(200.0, 200.0)).unwrap();
    game.handle_pointer_event(&RawPointerEvent::moved(240.0, 200.0)).unwrap();
    game.handle_pointer_event(&RawPointerEvent::up(240.0, 200.0)).unwrap();
    game.update(32.0).unwrap();

    // Moving right on screen is moving up inside the quarter-turned arm.
    let position = game.entity(knob).unwrap().position;
    assert_abs_diff_eq!(position.x, 0.0, epsilon = 1e-3);
    assert_abs_diff_eq!(position.y, -40.0, epsilon = 1e-3);

    // The knob is drawn under the release point, so it can be grabbed again there.
    game.events_mut()
        .register_entity_handler(EventType::TapDown, knob, |_: &Event| true);
    assert!(game.handle_pointer_event(&RawPointerEvent::down(240.0, 200.0)).unwrap());
}

#[test]
fn test_edges_count_as_inside() {
    let (mut game, scene) = presented_game();
    let target = game
        .add_child(
            scene,
            Entity::rectangle("target", Size::new(100.0, 20.0), Vec4::zeros())
                .with_position(Point2::new(200.0, 400.0))
                .interactive(true),
        )
        .unwrap();
    game.update(16.0).unwrap();
    game.events_mut()
        .register_entity_handler(EventType::PointerDown, target, |_: &Event| true);

    assert!(game.handle_pointer_event(&RawPointerEvent::down(250.0, 400.0)).unwrap());
    assert!(game.handle_pointer_event(&RawPointerEvent::down(200.0, 390.0)).unwrap());
    assert!(!game.handle_pointer_event(&RawPointerEvent::down(251.0, 400.0)).unwrap());
    assert!(!game.handle_pointer_event(&RawPointerEvent::down(200.0, 411.0)).unwrap());
}

#[test]
fn test_device_pixels_are_scaled_into_game_space() {
    let mut game = Game::new(GameConfig::new(400.0, 800.0).with_canvas_scale(2.0)).unwrap();
    let scene = game.new_scene("main");
    let dot = game
        .add_child(
            scene,
            Entity::circle("dot", 10.0, Vec4::zeros())
                .with_position(Point2::new(200.0, 400.0))
                .interactive(true),
        )
        .unwrap();
    game.present_scene(scene, Transition::None).unwrap();
    game.update(0.0).unwrap();
    let log = record(&mut game, &[EventType::TapDown]);

    game.handle_pointer_event(&RawPointerEvent::down(410.0, 800.0)).unwrap();
    let seen = log.borrow();
    assert_eq!(seen.len(), 1);
    assert_eq!(seen[0].target, dot);
    // Local coordinates are relative to the dot's top-left corner.
    assert_eq!(seen[0].point, Some(Point2::new(15.0, 10.0)));
}

#[test]
fn test_free_nodes_are_hit_before_scenes() {
    let (mut game, scene) = presented_game();
    let under = game
        .add_child(scene, Entity::circle("under", 20.0, Vec4::zeros()).with_position(Point2::new(50.0, 50.0)).interactive(true))
        .unwrap();
    let over = game
        .add_free_node(Entity::circle("over", 20.0, Vec4::zeros()).with_position(Point2::new(50.0, 50.0)).interactive(true))
        .unwrap();
    game.update(16.0).unwrap();
    let log = record(&mut game, &[EventType::TapDown]);

    game.handle_pointer_event(&RawPointerEvent::down(50.0, 50.0)).unwrap();
    let targets: Vec<_> = log.borrow().iter().map(|event| event.target).collect();
    assert_eq!(targets, vec![over, under]);
}

#[test]
fn test_stopped_game_ignores_input() {
    let (mut game, scene) = presented_game();
    game.add_child(scene, handle()).unwrap();
    game.update(16.0).unwrap();
    let log = record(&mut game, &[EventType::TapDown]);

    game.stop();
    assert!(!game.handle_pointer_event(&RawPointerEvent::down(100.0, 100.0)).unwrap());
    assert!(log.borrow().is_empty());
}

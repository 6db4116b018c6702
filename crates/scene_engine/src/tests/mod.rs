//! End-to-end scenarios driving a whole [`Game`](crate::Game) with synthetic
//! timestamps and pointer input against the recording canvas

mod pointer;

use std::cell::RefCell;
use std::rc::Rc;

use crate::core::GameConfig;
use crate::entity::EntityId;
use crate::events::{Event, EventType};
use crate::scene::Transition;
use crate::Game;

/// Game with one scene presented and settled at t = 0
pub(super) fn presented_game() -> (Game, EntityId) {
    let mut game = Game::new(GameConfig::new(400.0, 800.0)).unwrap();
    let scene = game.new_scene("main");
    game.present_scene(scene, Transition::None).unwrap();
    game.update(0.0).unwrap();
    (game, scene)
}

/// Record every event of the given types, in delivery order
pub(super) fn record(game: &mut Game, types: &[EventType]) -> Rc<RefCell<Vec<Event>>> {
    let log = Rc::new(RefCell::new(Vec::new()));
    for event_type in types {
        let log = Rc::clone(&log);
        game.events_mut().register_handler(*event_type, move |event: &Event| {
            log.borrow_mut().push(event.clone());
            false
        });
    }
    log
}

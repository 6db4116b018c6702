//! Event system
//!
//! - Handlers register per event type, optionally for a single target entity
//! - Handler returns bool (true = consumed, stops forwarding)
//! - Pointer events are delivered immediately during dispatch; scene
//!   lifecycle events raised mid-update are queued and delivered after the
//!   tree walk
//! - Handlers only see the event; work that needs the game goes through a
//!   [`Deferred`] queue that the game drains after each dispatch

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::entity::EntityId;
use crate::error::EngineError;
use crate::foundation::math::Point2;
use crate::input::PointerButtons;
use crate::Game;

/// Event type identification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventType {
    /// Scene became the presented scene (before it is visible)
    SceneSetup,
    /// Scene finished appearing
    SceneAppear,
    /// Pointer pressed inside the target
    PointerDown,
    /// Pointer released inside the target
    PointerUp,
    /// Pointer moved inside the target
    PointerMove,
    /// Pointer entered the target
    PointerEnter,
    /// Pointer left the target
    PointerLeave,
    /// Press started on the target
    TapDown,
    /// Press started and ended on the target
    TapUp,
    /// Press that started on the target ended anywhere
    TapUpAny,
    /// Pointer left the target while pressed
    TapLeave,
    /// First movement of a drag
    DragStart,
    /// Later movement of a drag
    Drag,
    /// Drag finished
    DragEnd,
}

impl EventType {
    /// Whether this type comes from the pointer dispatcher
    pub const fn is_pointer(self) -> bool {
        !matches!(self, Self::SceneSetup | Self::SceneAppear)
    }
}

/// Event delivered to handlers
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    /// Type of event
    pub event_type: EventType,
    /// Entity the event is about
    pub target: EntityId,
    /// Frame timestamp in milliseconds
    pub timestamp: f64,
    /// Pointer position in the target's local, unscaled coordinates
    pub point: Option<Point2>,
    /// Buttons held when the event was raised
    pub buttons: PointerButtons,
}

impl Event {
    /// Create an event without pointer data
    pub fn new(event_type: EventType, target: EntityId, timestamp: f64) -> Self {
        Self {
            event_type,
            target,
            timestamp,
            point: None,
            buttons: PointerButtons::empty(),
        }
    }

    /// Add pointer data (builder pattern)
    pub fn with_pointer(mut self, point: Point2, buttons: PointerButtons) -> Self {
        self.point = Some(point);
        self.buttons = buttons;
        self
    }
}

/// Event handler trait
/// Returns true if event was consumed (stops forwarding)
/// Returns false to allow forwarding to other handlers
pub trait EventHandler {
    /// Handle an event, return true if consumed
    fn on_event(&mut self, event: &Event) -> bool;
}

impl<F> EventHandler for F
where
    F: FnMut(&Event) -> bool,
{
    fn on_event(&mut self, event: &Event) -> bool {
        self(event)
    }
}

/// Game-level work requested by a handler
pub type FollowUp = Box<dyn FnOnce(&mut Game) -> Result<(), EngineError>>;

/// Shared queue of follow-ups
///
/// Handlers capture a clone and push closures; the game runs them, in push
/// order, once the events that produced them have been delivered.
#[derive(Clone, Default)]
pub struct Deferred(Rc<RefCell<Vec<FollowUp>>>);

impl std::fmt::Debug for Deferred {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("Deferred").field(&self.len()).finish()
    }
}

impl Deferred {
    /// Queue `follow_up` to run with the game after the current dispatch
    pub fn push(&self, follow_up: impl FnOnce(&mut Game) -> Result<(), EngineError> + 'static) {
        self.0.borrow_mut().push(Box::new(follow_up));
    }

    /// Number of pending follow-ups
    pub fn len(&self) -> usize {
        self.0.borrow().len()
    }

    /// Whether nothing is pending
    pub fn is_empty(&self) -> bool {
        self.0.borrow().is_empty()
    }

    pub(crate) fn take(&self) -> Vec<FollowUp> {
        std::mem::take(&mut *self.0.borrow_mut())
    }
}

/// Handle returned by registration, used to remove the handler again
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

struct Registration {
    id: HandlerId,
    target: Option<EntityId>,
    handler: Box<dyn EventHandler>,
}

/// Event system with registration and queuing
/// Follows chain of responsibility pattern
#[derive(Default)]
pub struct EventSystem {
    queue: Vec<Event>,
    handlers: HashMap<EventType, Vec<Registration>>,
    next_id: u64,
    deferred: Deferred,
}

impl std::fmt::Debug for EventSystem {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventSystem")
            .field("queued", &self.queue.len())
            .field("handlers", &self.handler_count())
            .field("deferred", &self.deferred.len())
            .finish()
    }
}

impl EventSystem {
    /// Create a new empty event system
    pub fn new() -> Self {
        Self::default()
    }

    /// Follow-up queue for handlers that need to act on the game
    ///
    /// ```ignore
    /// let deferred = game.events().deferred();
    /// game.events_mut().register_entity_handler(EventType::TapUp, button, move |_: &Event| {
    ///     deferred.push(move |game| game.present_scene(next, Transition::None));
    ///     true
    /// });
    /// ```
    pub fn deferred(&self) -> Deferred {
        self.deferred.clone()
    }

    /// Register a handler for every event of a type
    pub fn register_handler(&mut self, event_type: EventType, handler: impl EventHandler + 'static) -> HandlerId {
        self.register(event_type, None, Box::new(handler))
    }

    /// Register a handler for events of a type aimed at one entity
    pub fn register_entity_handler(
        &mut self,
        event_type: EventType,
        target: EntityId,
        handler: impl EventHandler + 'static,
    ) -> HandlerId {
        self.register(event_type, Some(target), Box::new(handler))
    }

    fn register(
        &mut self,
        event_type: EventType,
        target: Option<EntityId>,
        handler: Box<dyn EventHandler>,
    ) -> HandlerId {
        let id = HandlerId(self.next_id);
        self.next_id += 1;
        self.handlers
            .entry(event_type)
            .or_default()
            .push(Registration { id, target, handler });
        id
    }

    /// Remove one handler; returns whether it was registered
    pub fn remove_handler(&mut self, id: HandlerId) -> bool {
        let mut removed = false;
        for registrations in self.handlers.values_mut() {
            let before = registrations.len();
            registrations.retain(|r| r.id != id);
            removed |= registrations.len() != before;
        }
        removed
    }

    /// Remove every handler filtered to `target`
    pub fn remove_entity_handlers(&mut self, target: EntityId) {
        for registrations in self.handlers.values_mut() {
            registrations.retain(|r| r.target != Some(target));
        }
    }

    /// Number of registered handlers
    pub fn handler_count(&self) -> usize {
        self.handlers.values().map(Vec::len).sum()
    }

    /// Queue an event for the next [`dispatch`](Self::dispatch)
    pub fn send(&mut self, event: Event) {
        self.queue.push(event);
    }

    /// Deliver every queued event in send order
    pub fn dispatch(&mut self) {
        let queued = std::mem::take(&mut self.queue);
        for event in &queued {
            self.emit(event);
        }
    }

    /// Deliver an event now; returns whether a handler consumed it
    ///
    /// Stops on the first handler that returns true.
    pub fn emit(&mut self, event: &Event) -> bool {
        let Some(registrations) = self.handlers.get_mut(&event.event_type) else {
            return false;
        };
        for registration in registrations.iter_mut() {
            if registration.target.is_some_and(|target| target != event.target) {
                continue;
            }
            if registration.handler.on_event(event) {
                return true;
            }
        }
        false
    }

    /// Drop queued events
    pub fn clear(&mut self) {
        self.queue.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    fn two_ids() -> (EntityId, EntityId) {
        let mut ids = SlotMap::<EntityId, ()>::with_key();
        (ids.insert(()), ids.insert(()))
    }

    #[test]
    fn test_event_consumption() {
        let (target, _) = two_ids();
        let mut system = EventSystem::new();
        let seen = Rc::new(RefCell::new(Vec::new()));

        let first = Rc::clone(&seen);
        system.register_handler(EventType::TapUp, move |_: &Event| {
            first.borrow_mut().push("first");
            true
        });
        let second = Rc::clone(&seen);
        system.register_handler(EventType::TapUp, move |_: &Event| {
            second.borrow_mut().push("second");
            false
        });

        assert!(system.emit(&Event::new(EventType::TapUp, target, 0.0)));
        assert_eq!(*seen.borrow(), vec!["first"]);
    }

    #[test]
    fn test_target_filter() {
        let (a, b) = two_ids();
        let mut system = EventSystem::new();
        let hits = Rc::new(RefCell::new(0));

        let counter = Rc::clone(&hits);
        system.register_entity_handler(EventType::TapDown, a, move |_: &Event| {
            *counter.borrow_mut() += 1;
            false
        });

        system.emit(&Event::new(EventType::TapDown, b, 0.0));
        system.emit(&Event::new(EventType::TapDown, a, 0.0));
        assert_eq!(*hits.borrow(), 1);

        system.remove_entity_handlers(a);
        assert_eq!(system.handler_count(), 0);
    }

    #[test]
    fn test_queued_events_wait_for_dispatch() {
        let (scene, _) = two_ids();
        let mut system = EventSystem::new();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let log = Rc::clone(&seen);
        let id = system.register_handler(EventType::SceneAppear, move |event: &Event| {
            log.borrow_mut().push(event.event_type);
            false
        });

        system.send(Event::new(EventType::SceneAppear, scene, 10.0));
        assert!(seen.borrow().is_empty());
        system.dispatch();
        assert_eq!(*seen.borrow(), vec![EventType::SceneAppear]);

        assert!(system.remove_handler(id));
        assert!(!system.remove_handler(id));
    }

    #[test]
    fn test_handlers_share_one_follow_up_queue() {
        let (target, _) = two_ids();
        let mut system = EventSystem::new();
        let deferred = system.deferred();
        system.register_handler(EventType::TapUp, move |_: &Event| {
            deferred.push(|game: &mut Game| {
                game.stop();
                Ok(())
            });
            true
        });

        assert!(system.deferred().is_empty());
        system.emit(&Event::new(EventType::TapUp, target, 0.0));
        system.emit(&Event::new(EventType::TapUp, target, 0.0));
        assert_eq!(system.deferred().len(), 2);

        assert_eq!(system.deferred().take().len(), 2);
        assert!(system.deferred().is_empty());
    }
}

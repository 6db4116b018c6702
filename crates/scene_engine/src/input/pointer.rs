//! Raw pointer input and per-entity pointer state

use bitflags::bitflags;

use crate::foundation::math::Point2;

bitflags! {
    /// Pointer buttons held during an event
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PointerButtons: u8 {
        /// Primary button or touch contact
        const PRIMARY = 1;
        /// Secondary button
        const SECONDARY = 1 << 1;
        /// Middle button
        const AUXILIARY = 1 << 2;
    }
}

/// Kind of raw pointer event delivered by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PointerEventKind {
    /// Button pressed or touch started
    Down,
    /// Button released or touch ended
    Up,
    /// Pointer moved over the canvas
    Move,
    /// Pointer left the canvas
    Leave,
}

/// Pointer event in device pixels relative to the canvas top-left
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RawPointerEvent {
    /// What happened
    pub kind: PointerEventKind,
    /// Horizontal position in device pixels
    pub x: f32,
    /// Vertical position in device pixels
    pub y: f32,
    /// Buttons held
    pub buttons: PointerButtons,
}

impl RawPointerEvent {
    /// Create a raw event with the primary button held
    pub fn new(kind: PointerEventKind, x: f32, y: f32) -> Self {
        Self {
            kind,
            x,
            y,
            buttons: PointerButtons::PRIMARY,
        }
    }

    /// Press at `(x, y)`
    pub fn down(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Down, x, y)
    }

    /// Release at `(x, y)`
    pub fn up(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Up, x, y).with_buttons(PointerButtons::empty())
    }

    /// Move to `(x, y)`
    pub fn moved(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Move, x, y)
    }

    /// Leave the canvas at `(x, y)`
    pub fn leave(x: f32, y: f32) -> Self {
        Self::new(PointerEventKind::Leave, x, y)
    }

    /// Builder pattern: Set the held buttons
    pub fn with_buttons(mut self, buttons: PointerButtons) -> Self {
        self.buttons = buttons;
        self
    }

    /// Position in game units for a canvas with the given device pixel ratio
    pub fn point(&self, canvas_scale: f32) -> Point2 {
        if canvas_scale > 0.0 {
            Point2::new(self.x / canvas_scale, self.y / canvas_scale)
        } else {
            Point2::new(self.x, self.y)
        }
    }
}

/// Pointer bookkeeping carried by each entity between events
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PointerState {
    /// A press started on this entity and has not ended
    pub pressed: bool,
    /// Pressed and the pointer is still over the entity
    pub pressed_and_within_hit_area: bool,
    /// The pointer is over the entity
    pub within_hit_area: bool,
    /// The entity is being dragged
    pub dragging: bool,
    /// Where the press started, in the parent's unrotated frame
    pub pressed_initial_point: Option<Point2>,
    /// Pointer position at the previous drag step, in the same frame
    pub dragging_last_point: Option<Point2>,
}

impl PointerState {
    /// Forget any press or drag in progress
    pub fn release(&mut self) {
        self.pressed = false;
        self.pressed_and_within_hit_area = false;
        self.dragging = false;
        self.pressed_initial_point = None;
        self.dragging_last_point = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_point_divides_by_canvas_scale() {
        let event = RawPointerEvent::down(200.0, 100.0);
        assert_eq!(event.point(2.0), Point2::new(100.0, 50.0));
        assert_eq!(event.point(0.0), Point2::new(200.0, 100.0));
    }

    #[test]
    fn test_release_clears_press_but_keeps_hover() {
        let mut state = PointerState {
            pressed: true,
            pressed_and_within_hit_area: true,
            within_hit_area: true,
            dragging: true,
            pressed_initial_point: Some(Point2::origin()),
            dragging_last_point: Some(Point2::origin()),
        };
        state.release();
        assert!(!state.pressed && !state.dragging);
        assert!(state.within_hit_area);
        assert_eq!(state.pressed_initial_point, None);
    }
}

//! Scene transitions

use crate::action::Easing;
use crate::entity::EntityId;
use crate::foundation::math::{Point2, Size};

/// Direction the incoming scene travels in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlideDirection {
    /// Incoming scene enters from the right edge and moves left
    Left,
    /// Incoming scene enters from the left edge and moves right
    Right,
    /// Incoming scene enters from the bottom edge and moves up
    Up,
    /// Incoming scene enters from the top edge and moves down
    Down,
}

impl SlideDirection {
    /// Where the incoming scene starts, one canvas away from the origin
    pub fn incoming_start(self, canvas: Size) -> Point2 {
        match self {
            Self::Left => Point2::new(canvas.width, 0.0),
            Self::Right => Point2::new(-canvas.width, 0.0),
            Self::Up => Point2::new(0.0, canvas.height),
            Self::Down => Point2::new(0.0, -canvas.height),
        }
    }

    /// Where the outgoing scene ends up
    pub fn outgoing_end(self, canvas: Size) -> Point2 {
        Point2::origin() - self.incoming_start(canvas).coords
    }
}

/// How a presented scene replaces the current one
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Transition {
    /// Swap at the start of the next tick
    None,
    /// Push the current frame off-canvas while the new scene slides in
    Slide {
        /// Travel direction
        direction: SlideDirection,
        /// Milliseconds
        duration: f64,
        /// Progress curve
        easing: Easing,
    },
}

impl Transition {
    /// Linear slide
    pub const fn slide(direction: SlideDirection, duration: f64) -> Self {
        Self::Slide {
            direction,
            duration,
            easing: Easing::Linear,
        }
    }

    /// Builder pattern: Set the easing of a slide; no effect on `None`
    pub fn with_easing(self, curve: Easing) -> Self {
        match self {
            Self::Slide {
                direction, duration, ..
            } => Self::Slide {
                direction,
                duration,
                easing: curve,
            },
            Self::None => Self::None,
        }
    }
}

/// Queued request to present a scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneTransition {
    /// Scene to present
    pub scene: EntityId,
    /// How to present it
    pub transition: Transition,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slide_offsets_mirror() {
        let canvas = Size::new(400.0, 800.0);
        assert_eq!(SlideDirection::Left.incoming_start(canvas), Point2::new(400.0, 0.0));
        assert_eq!(SlideDirection::Left.outgoing_end(canvas), Point2::new(-400.0, 0.0));
        assert_eq!(SlideDirection::Down.incoming_start(canvas), Point2::new(0.0, -800.0));
        assert_eq!(SlideDirection::Down.outgoing_end(canvas), Point2::new(0.0, 800.0));
    }

    #[test]
    fn test_easing_only_on_slides() {
        let slide = Transition::slide(SlideDirection::Up, 300.0).with_easing(Easing::CubicOut);
        assert!(matches!(slide, Transition::Slide { easing: Easing::CubicOut, .. }));
        assert_eq!(Transition::None.with_easing(Easing::CubicOut), Transition::None);
    }
}

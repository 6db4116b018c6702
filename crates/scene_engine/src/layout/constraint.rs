//! Constraint declarations

use crate::entity::EntityId;

/// Layout axis
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Start/end (x)
    Horizontal,
    /// Top/bottom (y)
    Vertical,
}

/// Which edge of the focal entity is pinned to which edge of the target
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConstraintType {
    /// Focal top to target top
    TopToTopOf,
    /// Focal top to target bottom
    TopToBottomOf,
    /// Focal bottom to target top
    BottomToTopOf,
    /// Focal bottom to target bottom
    BottomToBottomOf,
    /// Focal start to target start
    StartToStartOf,
    /// Focal start to target end
    StartToEndOf,
    /// Focal end to target end
    EndToEndOf,
    /// Focal end to target start
    EndToStartOf,
}

impl ConstraintType {
    /// All constraint types
    pub const ALL: [Self; 8] = [
        Self::TopToTopOf,
        Self::TopToBottomOf,
        Self::BottomToTopOf,
        Self::BottomToBottomOf,
        Self::StartToStartOf,
        Self::StartToEndOf,
        Self::EndToEndOf,
        Self::EndToStartOf,
    ];

    /// Axis the constraint acts on
    pub const fn axis(self) -> Axis {
        match self {
            Self::TopToTopOf | Self::TopToBottomOf | Self::BottomToTopOf | Self::BottomToBottomOf => {
                Axis::Vertical
            }
            Self::StartToStartOf | Self::StartToEndOf | Self::EndToEndOf | Self::EndToStartOf => {
                Axis::Horizontal
            }
        }
    }

    /// Whether the focal entity's minimum edge (top or start) is pinned
    pub const fn focal_min(self) -> bool {
        matches!(
            self,
            Self::TopToTopOf | Self::TopToBottomOf | Self::StartToStartOf | Self::StartToEndOf
        )
    }

    /// Whether the pin sits on the target's minimum edge (top or start)
    pub const fn alter_min(self) -> bool {
        matches!(
            self,
            Self::TopToTopOf | Self::BottomToTopOf | Self::StartToStartOf | Self::EndToStartOf
        )
    }
}

/// What a constraint is pinned to
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConstraintTarget {
    /// A specific entity
    Entity(EntityId),
    /// The entity with this unique name, looked up at first update
    Named(String),
    /// The focal entity's parent
    Parent,
}

impl From<EntityId> for ConstraintTarget {
    fn from(id: EntityId) -> Self {
        Self::Entity(id)
    }
}

impl From<&str> for ConstraintTarget {
    fn from(name: &str) -> Self {
        Self::Named(name.to_string())
    }
}

impl From<String> for ConstraintTarget {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

/// One edge pin
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Constraint {
    /// Edge pairing
    pub kind: ConstraintType,
    /// Entity the pin refers to
    pub target: ConstraintTarget,
}

impl Constraint {
    /// Sibling or other entity this constraint depends on, once resolved
    pub const fn target_entity(&self) -> Option<EntityId> {
        match &self.target {
            ConstraintTarget::Entity(id) => Some(*id),
            ConstraintTarget::Named(_) | ConstraintTarget::Parent => None,
        }
    }
}

/// Declared layout of an entity
///
/// An empty layout means the entity is placed from its local position.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    constraints: Vec<Constraint>,
    /// Gap kept at the start edge
    pub margin_start: f32,
    /// Gap kept at the end edge
    pub margin_end: f32,
    /// Gap kept at the top edge
    pub margin_top: f32,
    /// Gap kept at the bottom edge
    pub margin_bottom: f32,
    /// Where between two horizontal anchors the entity sits (0 = start)
    pub horizontal_bias: f32,
    /// Where between two vertical anchors the entity sits (0 = top)
    pub vertical_bias: f32,
    pub(crate) match_width: bool,
    pub(crate) match_height: bool,
}

impl Default for Layout {
    fn default() -> Self {
        Self {
            constraints: Vec::new(),
            margin_start: 0.0,
            margin_end: 0.0,
            margin_top: 0.0,
            margin_bottom: 0.0,
            horizontal_bias: 0.5,
            vertical_bias: 0.5,
            match_width: false,
            match_height: false,
        }
    }
}

impl Layout {
    /// Empty layout
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: Add a constraint
    pub fn constrain(mut self, kind: ConstraintType, target: impl Into<ConstraintTarget>) -> Self {
        self.constraints.push(Constraint {
            kind,
            target: target.into(),
        });
        self
    }

    /// Builder pattern: Pin top to the target's top
    pub fn top_to_top_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::TopToTopOf, target)
    }

    /// Builder pattern: Pin top to the target's bottom
    pub fn top_to_bottom_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::TopToBottomOf, target)
    }

    /// Builder pattern: Pin bottom to the target's top
    pub fn bottom_to_top_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::BottomToTopOf, target)
    }

    /// Builder pattern: Pin bottom to the target's bottom
    pub fn bottom_to_bottom_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::BottomToBottomOf, target)
    }

    /// Builder pattern: Pin start to the target's start
    pub fn start_to_start_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::StartToStartOf, target)
    }

    /// Builder pattern: Pin start to the target's end
    pub fn start_to_end_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::StartToEndOf, target)
    }

    /// Builder pattern: Pin end to the target's end
    pub fn end_to_end_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::EndToEndOf, target)
    }

    /// Builder pattern: Pin end to the target's start
    pub fn end_to_start_of(self, target: impl Into<ConstraintTarget>) -> Self {
        self.constrain(ConstraintType::EndToStartOf, target)
    }

    /// Builder pattern: Set all four margins
    pub fn with_margins(mut self, start: f32, end: f32, top: f32, bottom: f32) -> Self {
        self.margin_start = start;
        self.margin_end = end;
        self.margin_top = top;
        self.margin_bottom = bottom;
        self
    }

    /// Builder pattern: Set the horizontal and vertical bias, clamped to `[0, 1]`
    pub fn with_bias(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal_bias = horizontal.clamp(0.0, 1.0);
        self.vertical_bias = vertical.clamp(0.0, 1.0);
        self
    }

    /// Declared constraints
    pub fn constraints(&self) -> &[Constraint] {
        &self.constraints
    }

    pub(crate) fn constraints_mut(&mut self) -> &mut [Constraint] {
        &mut self.constraints
    }

    /// Whether no constraints are declared
    pub fn is_empty(&self) -> bool {
        self.constraints.is_empty()
    }

    /// Constraints acting on one axis
    pub fn on_axis(&self, axis: Axis) -> impl Iterator<Item = &Constraint> {
        self.constraints.iter().filter(move |c| c.kind.axis() == axis)
    }

    /// Bias for an axis
    pub const fn bias(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.horizontal_bias,
            Axis::Vertical => self.vertical_bias,
        }
    }

    /// Margin applied next to the pinned edge of a constraint
    pub const fn margin_for(&self, kind: ConstraintType) -> f32 {
        match (kind.axis(), kind.focal_min()) {
            (Axis::Horizontal, true) => self.margin_start,
            (Axis::Horizontal, false) => self.margin_end,
            (Axis::Vertical, true) => self.margin_top,
            (Axis::Vertical, false) => self.margin_bottom,
        }
    }

    /// Whether the entity fills the space between its anchors on `axis`
    pub const fn matches_axis(&self, axis: Axis) -> bool {
        match axis {
            Axis::Horizontal => self.match_width,
            Axis::Vertical => self.match_height,
        }
    }
}

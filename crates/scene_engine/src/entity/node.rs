//! Entity data and drawable kinds
//!
//! Node kinds are a closed sum type. Draw, update and hit-test code matches on
//! [`NodeKind`] exhaustively instead of dispatching through a class chain.

use uuid::Uuid;

use crate::action::ActionRun;
use crate::entity::EntityId;
use crate::foundation::math::{Color, Point2, Rect, Size, Vec4};
use crate::input::PointerState;
use crate::layout::Layout;
use crate::render::ImageId;

/// Scene payload
#[derive(Debug, Clone, PartialEq)]
pub struct SceneData {
    /// Fill color drawn behind all children
    pub background_color: Color,
    /// Whether the scene is updated, drawn and hit-tested
    pub active: bool,
    /// Whether the scene is sliding in or out
    pub transitioning: bool,
}

/// Shape geometry
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ShapeKind {
    /// Rectangle filling the entity size, optionally with rounded corners
    Rectangle {
        /// Corner radius in entity units (0 for sharp corners)
        corner_radius: f32,
    },
    /// Circle centered on the entity position
    Circle {
        /// Radius in entity units
        radius: f32,
    },
}

/// Shape payload
#[derive(Debug, Clone, PartialEq)]
pub struct ShapeData {
    /// Geometry
    pub shape: ShapeKind,
    /// Fill color, if filled
    pub fill_color: Option<Color>,
    /// Stroke color, if stroked
    pub stroke_color: Option<Color>,
    /// Stroke width in entity units
    pub line_width: f32,
}

/// Label payload
#[derive(Debug, Clone, PartialEq)]
pub struct LabelData {
    /// Text to draw
    pub text: String,
    /// Font size in entity units
    pub font_size: f32,
    /// Text color
    pub font_color: Color,
    /// Wrap width; when set the label is drawn as a paragraph
    pub preferred_max_layout_width: Option<f32>,
}

/// Where a sprite's pixels come from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageSource {
    /// Image registered with the host's image manager
    Named(String),
    /// Captured frame owned by the engine
    Snapshot(ImageId),
}

/// Sprite payload
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SpriteData {
    /// Image to draw
    pub image: ImageSource,
}

/// Drawable kind of an entity
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Root of one full-screen stage
    Scene(SceneData),
    /// Rectangle or circle
    Shape(ShapeData),
    /// Text
    Label(LabelData),
    /// Image
    Sprite(SpriteData),
    /// Grouping node that draws nothing itself
    Composite,
}

/// A positioned node in the scene tree
#[derive(Debug)]
pub struct Entity {
    /// Name used for lookups and diagnostics
    pub name: String,
    uuid: Uuid,
    /// Drawable kind and its payload
    pub kind: NodeKind,
    /// Position relative to the parent; scenes use it as their top-left corner
    pub position: Point2,
    /// Scale relative to the parent
    pub scale: f32,
    /// Opacity relative to the parent
    pub alpha: f32,
    /// Rotation about the entity center in radians
    pub z_rotation: f32,
    /// Draw and hit-test order among siblings (higher is on top)
    pub z_position: f32,
    /// Unscaled size
    pub size: Size,
    /// Hidden entities and their subtrees are neither drawn nor hit-tested
    pub hidden: bool,
    /// Whether pointer events are routed to this entity
    pub is_user_interaction_enabled: bool,
    /// Whether pressing and moving the pointer drags this entity
    pub draggable: bool,
    layout: Layout,
    pub(crate) needs_initialization: bool,
    pub(crate) parent: Option<EntityId>,
    pub(crate) children: Vec<EntityId>,
    pub(crate) absolute_position: Point2,
    pub(crate) absolute_scale: f32,
    pub(crate) absolute_alpha: f32,
    pub(crate) pointer: PointerState,
    pub(crate) actions: Vec<ActionRun>,
}

impl Entity {
    /// Create an entity of the given kind
    pub fn new(name: impl Into<String>, kind: NodeKind) -> Self {
        Self {
            name: name.into(),
            uuid: Uuid::new_v4(),
            kind,
            position: Point2::origin(),
            scale: 1.0,
            alpha: 1.0,
            z_rotation: 0.0,
            z_position: 0.0,
            size: Size::default(),
            hidden: false,
            is_user_interaction_enabled: false,
            draggable: false,
            layout: Layout::default(),
            needs_initialization: true,
            parent: None,
            children: Vec::new(),
            absolute_position: Point2::origin(),
            absolute_scale: 1.0,
            absolute_alpha: 1.0,
            pointer: PointerState::default(),
            actions: Vec::new(),
        }
    }

    /// Create an inactive scene
    pub fn scene(name: impl Into<String>, background_color: Color) -> Self {
        Self::new(
            name,
            NodeKind::Scene(SceneData {
                background_color,
                active: false,
                transitioning: false,
            }),
        )
    }

    /// Create a filled rectangle
    pub fn rectangle(name: impl Into<String>, size: Size, fill_color: Color) -> Self {
        Self::new(
            name,
            NodeKind::Shape(ShapeData {
                shape: ShapeKind::Rectangle { corner_radius: 0.0 },
                fill_color: Some(fill_color),
                stroke_color: None,
                line_width: 0.0,
            }),
        )
        .with_size(size)
    }

    /// Create a filled circle
    pub fn circle(name: impl Into<String>, radius: f32, fill_color: Color) -> Self {
        Self::new(
            name,
            NodeKind::Shape(ShapeData {
                shape: ShapeKind::Circle { radius },
                fill_color: Some(fill_color),
                stroke_color: None,
                line_width: 0.0,
            }),
        )
        .with_size(Size::new(radius * 2.0, radius * 2.0))
    }

    /// Create a single-line label
    pub fn label(name: impl Into<String>, text: impl Into<String>, font_size: f32) -> Self {
        Self::new(
            name,
            NodeKind::Label(LabelData {
                text: text.into(),
                font_size,
                font_color: Vec4::new(0.0, 0.0, 0.0, 1.0),
                preferred_max_layout_width: None,
            }),
        )
    }

    /// Create a sprite showing a named image
    pub fn sprite(name: impl Into<String>, image: impl Into<String>, size: Size) -> Self {
        Self::new(
            name,
            NodeKind::Sprite(SpriteData {
                image: ImageSource::Named(image.into()),
            }),
        )
        .with_size(size)
    }

    /// Create a grouping node
    pub fn composite(name: impl Into<String>) -> Self {
        Self::new(name, NodeKind::Composite)
    }

    /// Builder pattern: Set position
    pub fn with_position(mut self, position: Point2) -> Self {
        self.position = position;
        self
    }

    /// Builder pattern: Set size
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// Builder pattern: Set scale
    pub fn with_scale(mut self, scale: f32) -> Self {
        self.scale = scale;
        self
    }

    /// Builder pattern: Set z-rotation in radians
    pub fn with_z_rotation(mut self, radians: f32) -> Self {
        self.z_rotation = radians;
        self
    }

    /// Builder pattern: Set sibling draw order
    pub fn with_z_position(mut self, z: f32) -> Self {
        self.z_position = z;
        self
    }

    /// Builder pattern: Enable pointer interaction
    pub fn interactive(mut self, enabled: bool) -> Self {
        self.is_user_interaction_enabled = enabled;
        self
    }

    /// Builder pattern: Make the entity draggable (implies interaction)
    pub fn draggable(mut self, enabled: bool) -> Self {
        self.draggable = enabled;
        if enabled {
            self.is_user_interaction_enabled = true;
        }
        self
    }

    /// Builder pattern: Set layout constraints
    pub fn with_layout(mut self, layout: Layout) -> Self {
        self.set_layout(layout);
        self
    }

    /// Stable identity that survives handle recycling and serialization
    pub const fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Declared layout
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    /// Replace the layout; named targets are resolved again on the next update
    pub fn set_layout(&mut self, layout: Layout) {
        self.layout = layout;
        self.needs_initialization = true;
    }

    pub(crate) fn layout_mut(&mut self) -> &mut Layout {
        &mut self.layout
    }

    /// Whether the entity has not been through its first update yet
    pub const fn needs_initialization(&self) -> bool {
        self.needs_initialization
    }

    /// Parent handle; `None` for scenes and detached entities
    pub const fn parent(&self) -> Option<EntityId> {
        self.parent
    }

    /// Child handles in declaration order
    pub fn children(&self) -> &[EntityId] {
        &self.children
    }

    /// Position in canvas space computed by the last update
    pub const fn absolute_position(&self) -> Point2 {
        self.absolute_position
    }

    /// Scale in canvas space computed by the last update
    pub const fn absolute_scale(&self) -> f32 {
        self.absolute_scale
    }

    /// Opacity after multiplying all ancestors
    pub const fn absolute_alpha(&self) -> f32 {
        self.absolute_alpha
    }

    /// Size multiplied by the absolute scale
    pub fn scaled_size(&self) -> Size {
        self.size.scaled(self.absolute_scale)
    }

    /// Unrotated bounding box in canvas space
    ///
    /// Scenes anchor at their top-left corner, every other kind at its center.
    pub fn bounds(&self) -> Rect {
        let size = self.scaled_size();
        if self.is_scene() {
            Rect::new(
                self.absolute_position.x,
                self.absolute_position.y,
                size.width,
                size.height,
            )
        } else {
            Rect::from_center(self.absolute_position, size)
        }
    }

    /// Pointer bookkeeping for this entity
    pub const fn pointer_state(&self) -> &PointerState {
        &self.pointer
    }

    /// Whether this entity is a scene
    pub const fn is_scene(&self) -> bool {
        matches!(self.kind, NodeKind::Scene(_))
    }

    /// Scene payload, if this is a scene
    pub const fn scene_data(&self) -> Option<&SceneData> {
        match &self.kind {
            NodeKind::Scene(data) => Some(data),
            _ => None,
        }
    }

    /// Mutable scene payload, if this is a scene
    pub fn scene_data_mut(&mut self) -> Option<&mut SceneData> {
        match &mut self.kind {
            NodeKind::Scene(data) => Some(data),
            _ => None,
        }
    }

    /// Whether any attached action has not completed
    pub fn has_actions(&self) -> bool {
        self.actions.iter().any(|run| !run.is_completed())
    }

    /// Whether an action run with this key is attached and not completed
    pub fn has_action(&self, key: &str) -> bool {
        self.actions
            .iter()
            .any(|run| run.key() == Some(key) && !run.is_completed())
    }

    /// Attached action runs, including ones that completed this tick
    pub fn action_runs(&self) -> &[ActionRun] {
        &self.actions
    }

    /// Detach the action run with this key; returns whether one was found
    pub fn remove_action(&mut self, key: &str) -> bool {
        let before = self.actions.len();
        self.actions.retain(|run| run.key() != Some(key));
        before != self.actions.len()
    }

    /// Detach every action run
    pub fn remove_all_actions(&mut self) {
        self.actions.clear();
    }
}

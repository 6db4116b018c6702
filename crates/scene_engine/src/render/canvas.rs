//! Drawing surface abstraction

use crate::entity::ImageSource;
use crate::foundation::math::{Color, Point2, Rect, Size};

/// Handle of an image owned by a canvas (snapshots)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ImageId(pub u64);

/// How a shape is painted
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PaintStyle {
    /// Fill the interior
    Fill,
    /// Stroke the outline
    Stroke {
        /// Line width in canvas units
        width: f32,
    },
}

/// Color and style of a shape draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Paint {
    /// Color, alpha already multiplied by the entity's absolute alpha
    pub color: Color,
    /// Fill or stroke
    pub style: PaintStyle,
}

impl Paint {
    /// Fill paint
    pub const fn fill(color: Color) -> Self {
        Self {
            color,
            style: PaintStyle::Fill,
        }
    }

    /// Stroke paint
    pub const fn stroke(color: Color, width: f32) -> Self {
        Self {
            color,
            style: PaintStyle::Stroke { width },
        }
    }
}

/// Font settings of a text draw
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    /// Font size in canvas units
    pub font_size: f32,
    /// Text color, alpha already applied
    pub color: Color,
}

/// Drawing surface implemented by the host
///
/// Coordinates are in game units once the engine has applied the canvas
/// scale. Transform calls compose with the current state; `save` and
/// `restore` push and pop that state.
pub trait Canvas {
    /// Surface size in device pixels
    fn size(&self) -> Size;

    /// Push the current transform
    fn save(&mut self);

    /// Pop the last pushed transform
    fn restore(&mut self);

    /// Scale subsequent drawing
    fn scale(&mut self, sx: f32, sy: f32);

    /// Move subsequent drawing
    fn translate(&mut self, dx: f32, dy: f32);

    /// Rotate subsequent drawing about the current origin
    fn rotate(&mut self, radians: f32);

    /// Draw an axis-aligned rectangle
    fn draw_rect(&mut self, rect: Rect, paint: &Paint);

    /// Draw a rectangle with rounded corners
    fn draw_rrect(&mut self, rect: Rect, corner_radius: f32, paint: &Paint);

    /// Draw a circle
    fn draw_circle(&mut self, center: Point2, radius: f32, paint: &Paint);

    /// Draw an image stretched over `rect`
    fn draw_image(&mut self, image: &ImageSource, rect: Rect, alpha: f32);

    /// Draw a single line of text centered on `center`
    fn draw_text(&mut self, text: &str, center: Point2, style: &TextStyle);

    /// Draw wrapped text with its top-left corner at `origin`
    fn draw_paragraph(&mut self, text: &str, origin: Point2, max_width: f32, style: &TextStyle);

    /// Capture what has been drawn so far; `None` if the surface cannot
    fn snapshot(&mut self) -> Option<ImageId>;

    /// Free a captured image
    fn release_image(&mut self, image: ImageId);
}

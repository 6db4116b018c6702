//! Math utilities and types
//!
//! Provides the 2D math types used by the scene tree. Coordinates are in game
//! units with the origin at the top-left of the canvas and Y growing down.

pub use nalgebra::{Rotation2, Vector2, Vector4};
use serde::{Deserialize, Serialize};

/// 2D vector type
pub type Vec2 = Vector2<f32>;

/// 4D vector type
pub type Vec4 = Vector4<f32>;

/// 2D point type
pub type Point2 = nalgebra::Point2<f32>;

/// RGBA color with components in `[0, 1]`
pub type Color = Vec4;

/// Build a color from 8-bit RGB components and an alpha in `[0, 1]`
pub fn rgba(r: u8, g: u8, b: u8, a: f32) -> Color {
    Color::new(
        f32::from(r) / 255.0,
        f32::from(g) / 255.0,
        f32::from(b) / 255.0,
        a,
    )
}

/// Width and height of an entity or the canvas
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Size {
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Size {
    /// Create a new size
    pub const fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Size with both extents multiplied by `factor`
    pub fn scaled(self, factor: f32) -> Self {
        Self::new(self.width * factor, self.height * factor)
    }
}

/// Axis-aligned rectangle given by its top-left corner and size
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    /// Left edge
    pub x: f32,
    /// Top edge
    pub y: f32,
    /// Horizontal extent
    pub width: f32,
    /// Vertical extent
    pub height: f32,
}

impl Rect {
    /// Create a new rectangle
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Rectangle of `size` centered on `center`
    pub fn from_center(center: Point2, size: Size) -> Self {
        Self::new(
            center.x - size.width / 2.0,
            center.y - size.height / 2.0,
            size.width,
            size.height,
        )
    }

    /// Right edge
    pub fn max_x(&self) -> f32 {
        self.x + self.width
    }

    /// Bottom edge
    pub fn max_y(&self) -> f32 {
        self.y + self.height
    }

    /// Center point
    pub fn center(&self) -> Point2 {
        Point2::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Check if this rectangle contains a point; edges count as inside
    pub fn contains(&self, point: Point2) -> bool {
        point.x >= self.x - EDGE_EPSILON
            && point.x <= self.max_x() + EDGE_EPSILON
            && point.y >= self.y - EDGE_EPSILON
            && point.y <= self.max_y() + EDGE_EPSILON
    }
}

/// Tolerance absorbing float error from inverse rotations in hit tests
pub const EDGE_EPSILON: f32 = 1e-3;

/// Math constants
pub mod constants {
    /// Pi constant
    pub const PI: f32 = std::f32::consts::PI;

    /// Pi / 2
    pub const HALF_PI: f32 = PI * 0.5;

    /// Degrees to radians conversion factor
    pub const DEG_TO_RAD: f32 = PI / 180.0;
}

/// Math utility functions
pub mod utils {
    use super::{constants, Point2, Rotation2};

    /// Convert degrees to radians
    pub fn deg_to_rad(degrees: f32) -> f32 {
        degrees * constants::DEG_TO_RAD
    }

    /// Linear interpolation
    pub fn lerp(a: f32, b: f32, t: f32) -> f32 {
        a + (b - a) * t
    }

    /// Rotate `point` by `radians` around `pivot`
    pub fn rotate_about(point: Point2, pivot: Point2, radians: f32) -> Point2 {
        pivot + Rotation2::new(radians) * (point - pivot)
    }
}

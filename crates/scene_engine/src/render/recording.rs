//! Headless canvas that records drawing calls

use std::collections::BTreeSet;

use crate::entity::ImageSource;
use crate::foundation::math::{Point2, Rect, Size};
use crate::render::{Canvas, ImageId, Paint, TextStyle};

/// One recorded canvas call
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// `save`
    Save,
    /// `restore`
    Restore,
    /// `scale`
    Scale(f32, f32),
    /// `translate`
    Translate(f32, f32),
    /// `rotate`
    Rotate(f32),
    /// `draw_rect`
    Rect(Rect, Paint),
    /// `draw_rrect`
    RRect(Rect, f32, Paint),
    /// `draw_circle`
    Circle(Point2, f32, Paint),
    /// `draw_image`
    Image(ImageSource, Rect, f32),
    /// `draw_text`
    Text(String, Point2, TextStyle),
    /// `draw_paragraph`
    Paragraph(String, Point2, f32, TextStyle),
}

/// Canvas without pixels, for tests and headless runs
///
/// Every call is appended to a command list. Snapshots are numbered and kept
/// in a live set until released, so leaks show up as a growing set.
#[derive(Debug, Clone)]
pub struct RecordingCanvas {
    size: Size,
    commands: Vec<DrawCommand>,
    live_images: BTreeSet<ImageId>,
    next_image: u64,
    depth: usize,
    snapshots_enabled: bool,
}

impl RecordingCanvas {
    /// Canvas of the given device pixel size
    pub fn new(size: Size) -> Self {
        Self {
            size,
            commands: Vec::new(),
            live_images: BTreeSet::new(),
            next_image: 1,
            depth: 0,
            snapshots_enabled: true,
        }
    }

    /// Builder pattern: Make `snapshot` return `None`
    pub fn without_snapshots(mut self) -> Self {
        self.snapshots_enabled = false;
        self
    }

    /// Commands recorded since the last [`clear`](Self::clear)
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Forget recorded commands; live images are kept
    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Snapshots captured and not yet released
    pub fn live_images(&self) -> &BTreeSet<ImageId> {
        &self.live_images
    }

    /// Current save depth; zero after a balanced frame
    pub const fn depth(&self) -> usize {
        self.depth
    }

    /// Recorded image draws
    pub fn image_draws(&self) -> impl Iterator<Item = (&ImageSource, &Rect)> {
        self.commands.iter().filter_map(|command| match command {
            DrawCommand::Image(image, rect, _) => Some((image, rect)),
            _ => None,
        })
    }
}

impl Canvas for RecordingCanvas {
    fn size(&self) -> Size {
        self.size
    }

    fn save(&mut self) {
        self.depth += 1;
        self.commands.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.depth = self.depth.saturating_sub(1);
        self.commands.push(DrawCommand::Restore);
    }

    fn scale(&mut self, sx: f32, sy: f32) {
        self.commands.push(DrawCommand::Scale(sx, sy));
    }

    fn translate(&mut self, dx: f32, dy: f32) {
        self.commands.push(DrawCommand::Translate(dx, dy));
    }

    fn rotate(&mut self, radians: f32) {
        self.commands.push(DrawCommand::Rotate(radians));
    }

    fn draw_rect(&mut self, rect: Rect, paint: &Paint) {
        self.commands.push(DrawCommand::Rect(rect, *paint));
    }

    fn draw_rrect(&mut self, rect: Rect, corner_radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::RRect(rect, corner_radius, *paint));
    }

    fn draw_circle(&mut self, center: Point2, radius: f32, paint: &Paint) {
        self.commands.push(DrawCommand::Circle(center, radius, *paint));
    }

    fn draw_image(&mut self, image: &ImageSource, rect: Rect, alpha: f32) {
        self.commands.push(DrawCommand::Image(image.clone(), rect, alpha));
    }

    fn draw_text(&mut self, text: &str, center: Point2, style: &TextStyle) {
        self.commands.push(DrawCommand::Text(text.to_string(), center, *style));
    }

    fn draw_paragraph(&mut self, text: &str, origin: Point2, max_width: f32, style: &TextStyle) {
        self.commands
            .push(DrawCommand::Paragraph(text.to_string(), origin, max_width, *style));
    }

    fn snapshot(&mut self) -> Option<ImageId> {
        if !self.snapshots_enabled {
            return None;
        }
        let id = ImageId(self.next_image);
        self.next_image += 1;
        self.live_images.insert(id);
        Some(id)
    }

    fn release_image(&mut self, image: ImageId) {
        self.live_images.remove(&image);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snapshots_are_tracked_until_released() {
        let mut canvas = RecordingCanvas::new(Size::new(10.0, 10.0));
        let first = canvas.snapshot().unwrap();
        let second = canvas.snapshot().unwrap();
        assert_ne!(first, second);
        assert_eq!(canvas.live_images().len(), 2);

        canvas.release_image(first);
        assert_eq!(canvas.live_images().iter().copied().collect::<Vec<_>>(), vec![second]);
    }

    #[test]
    fn test_disabled_snapshots() {
        let mut canvas = RecordingCanvas::new(Size::new(10.0, 10.0)).without_snapshots();
        assert_eq!(canvas.snapshot(), None);
    }
}

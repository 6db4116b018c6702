//! Ownership of captured frames
//!
//! The last rendered frame is captured every tick so a slide can start on the
//! next tick. Only the newest capture is kept; the previous one is released
//! as soon as it is replaced. A capture taken by a transition is released by
//! the transition once the outgoing scene is gone, at the next draw.

use crate::foundation::logging::debug;
use crate::render::{Canvas, ImageId};

/// Latest captured frame plus images waiting to be freed
#[derive(Debug, Default)]
pub struct SnapshotCache {
    latest: Option<ImageId>,
    pending_release: Vec<ImageId>,
}

impl SnapshotCache {
    /// Empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent capture, if any
    pub const fn latest(&self) -> Option<ImageId> {
        self.latest
    }

    /// Whether a capture is ready to be taken
    pub const fn has_latest(&self) -> bool {
        self.latest.is_some()
    }

    /// Images scheduled for release
    pub fn pending_release(&self) -> &[ImageId] {
        &self.pending_release
    }

    /// Store a new capture, freeing the one it replaces
    pub fn replace_latest(&mut self, canvas: &mut dyn Canvas, image: Option<ImageId>) {
        if let Some(previous) = std::mem::replace(&mut self.latest, image) {
            canvas.release_image(previous);
        }
    }

    /// Hand the latest capture over to a new owner
    pub fn take_latest(&mut self) -> Option<ImageId> {
        self.latest.take()
    }

    /// Free `image` at the next [`flush`](Self::flush)
    pub fn schedule_release(&mut self, image: ImageId) {
        self.pending_release.push(image);
    }

    /// Free every scheduled image
    pub fn flush(&mut self, canvas: &mut dyn Canvas) {
        for image in self.pending_release.drain(..) {
            debug!("Releasing snapshot {image:?}");
            canvas.release_image(image);
        }
    }

    /// Free everything, including the latest capture
    pub fn release_all(&mut self, canvas: &mut dyn Canvas) {
        if let Some(latest) = self.latest.take() {
            self.pending_release.push(latest);
        }
        self.flush(canvas);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::math::Size;
    use crate::render::RecordingCanvas;

    #[test]
    fn test_replacing_releases_previous() {
        let mut canvas = RecordingCanvas::new(Size::new(1.0, 1.0));
        let mut cache = SnapshotCache::new();

        for _ in 0..5 {
            let image = canvas.snapshot();
            cache.replace_latest(&mut canvas, image);
        }
        assert_eq!(canvas.live_images().len(), 1);
    }

    #[test]
    fn test_taken_capture_survives_until_flush() {
        let mut canvas = RecordingCanvas::new(Size::new(1.0, 1.0));
        let mut cache = SnapshotCache::new();
        let image = canvas.snapshot();
        cache.replace_latest(&mut canvas, image);

        let taken = cache.take_latest().unwrap();
        let next = canvas.snapshot();
        cache.replace_latest(&mut canvas, next);
        assert!(canvas.live_images().contains(&taken));

        cache.schedule_release(taken);
        cache.flush(&mut canvas);
        assert!(!canvas.live_images().contains(&taken));

        cache.release_all(&mut canvas);
        assert!(canvas.live_images().is_empty());
    }
}

//! Scene presentation state machine

use std::collections::VecDeque;

use crate::action::{attach_action, Action, Easing};
use crate::entity::{Entity, EntityId, EntityTree, ImageSource, NodeKind, SpriteData};
use crate::error::EngineError;
use crate::events::{Event, EventSystem, EventType};
use crate::foundation::logging::{debug, info};
use crate::foundation::math::{Point2, Size, Vec4};
use crate::game::Game;
use crate::render::{ImageId, SnapshotCache};
use crate::scene::{SceneTransition, SlideDirection, Transition};

/// Parts of the game the controller works on
pub(crate) struct Stage<'a> {
    pub tree: &'a mut EntityTree,
    pub scenes: &'a mut Vec<EntityId>,
    pub snapshots: &'a mut SnapshotCache,
    pub events: &'a mut EventSystem,
    pub canvas_size: Size,
    pub now: f64,
}

impl Stage<'_> {
    fn set_scene_flags(&mut self, scene: EntityId, active: bool, transitioning: bool) -> Result<(), EngineError> {
        let entity = self.tree.entity_mut(scene)?;
        let name = entity.name.clone();
        let data = entity.scene_data_mut().ok_or(EngineError::NotAScene(name))?;
        data.active = active;
        data.transitioning = transitioning;
        Ok(())
    }

    fn send(&mut self, event_type: EventType, scene: EntityId) {
        self.events.send(Event::new(event_type, scene, self.now));
    }

    fn name(&self, id: EntityId) -> String {
        self.tree.get(id).map_or_else(|| format!("{id:?}"), |e| e.name.clone())
    }
}

/// Sequences scene presentation
///
/// Requests are queued and consumed one per tick at the start of the update,
/// never in the middle of a tree walk. A slide waits until a captured frame
/// is available and until any slide in progress has finished, so at most one
/// outgoing snapshot scene exists at a time.
#[derive(Debug, Default)]
pub struct SceneController {
    queue: VecDeque<SceneTransition>,
    current: Option<EntityId>,
    incoming: Option<EntityId>,
    outgoing: Option<EntityId>,
}

impl SceneController {
    /// Controller with nothing presented
    pub fn new() -> Self {
        Self::default()
    }

    /// Scene most recently switched to
    pub const fn current(&self) -> Option<EntityId> {
        self.current
    }

    /// Temporary scene showing the previous frame while a slide runs
    pub const fn outgoing(&self) -> Option<EntityId> {
        self.outgoing
    }

    /// Whether a slide is still running
    pub const fn in_flight(&self) -> bool {
        self.incoming.is_some() || self.outgoing.is_some()
    }

    /// Number of requests not yet started
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Queue a presentation request
    pub fn enqueue(&mut self, request: SceneTransition) {
        self.queue.push_back(request);
    }

    /// Start the next queued request if it can start now
    pub(crate) fn step(&mut self, stage: &mut Stage<'_>) -> Result<(), EngineError> {
        if self.in_flight() {
            return Ok(());
        }
        let Some(request) = self.queue.front().copied() else {
            return Ok(());
        };

        match request.transition {
            Transition::Slide {
                direction,
                duration,
                easing,
            } if self.current.is_some_and(|current| current != request.scene) => {
                if !stage.snapshots.has_latest() {
                    debug!("Slide to '{}' waits for a captured frame", stage.name(request.scene));
                    return Ok(());
                }
                self.queue.pop_front();
                self.begin_slide(stage, request.scene, direction, duration, easing)
            }
            Transition::Slide { .. } | Transition::None => {
                self.queue.pop_front();
                self.swap(stage, request.scene)
            }
        }
    }

    fn swap(&mut self, stage: &mut Stage<'_>, scene: EntityId) -> Result<(), EngineError> {
        if let Some(old) = self.current.filter(|old| *old != scene) {
            if stage.tree.contains(old) {
                stage.set_scene_flags(old, false, false)?;
            }
        }
        stage.set_scene_flags(scene, true, false)?;
        self.current = Some(scene);
        info!("Presenting scene '{}'", stage.name(scene));
        stage.send(EventType::SceneSetup, scene);
        stage.send(EventType::SceneAppear, scene);
        Ok(())
    }

    fn begin_slide(
        &mut self,
        stage: &mut Stage<'_>,
        scene: EntityId,
        direction: SlideDirection,
        duration: f64,
        easing: Easing,
    ) -> Result<(), EngineError> {
        let Some(image) = stage.snapshots.take_latest() else {
            return Ok(());
        };
        let canvas = stage.canvas_size;

        if let Some(old) = self.current {
            if stage.tree.contains(old) {
                stage.set_scene_flags(old, false, false)?;
            }
        }

        let outgoing = stage.tree.insert(
            Entity::scene("outgoing_snapshot", Vec4::zeros()).with_size(canvas),
        );
        stage.tree.spawn_child(
            outgoing,
            Entity::new(
                "outgoing_snapshot_image",
                NodeKind::Sprite(SpriteData {
                    image: ImageSource::Snapshot(image),
                }),
            )
            .with_size(canvas)
            .with_position(Point2::new(canvas.width / 2.0, canvas.height / 2.0)),
        )?;
        stage.scenes.push(outgoing);
        stage.set_scene_flags(outgoing, true, true)?;

        let incoming = stage.tree.entity_mut(scene)?;
        incoming.position = direction.incoming_start(canvas);
        stage.set_scene_flags(scene, true, true)?;

        attach_action(
            stage.tree.entity_mut(scene)?,
            &Action::sequence(vec![
                Action::move_to(Point2::origin(), duration).with_easing(easing),
                Action::callback(move |game: &mut Game| game.finish_incoming(scene)),
            ])
            .run_during_transition(true),
            None,
        )?;
        attach_action(
            stage.tree.entity_mut(outgoing)?,
            &Action::sequence(vec![
                Action::move_to(direction.outgoing_end(canvas), duration).with_easing(easing),
                Action::callback(move |game: &mut Game| game.finish_outgoing(outgoing, image)),
            ])
            .run_during_transition(true),
            None,
        )?;

        self.current = Some(scene);
        self.incoming = Some(scene);
        self.outgoing = Some(outgoing);
        info!("Sliding {:?} to scene '{}'", direction, stage.name(scene));
        stage.send(EventType::SceneSetup, scene);
        Ok(())
    }

    /// Incoming scene reached the origin
    pub(crate) fn finish_incoming(&mut self, stage: &mut Stage<'_>, scene: EntityId) -> Result<(), EngineError> {
        if self.incoming == Some(scene) {
            self.incoming = None;
        }
        if !stage.tree.contains(scene) {
            return Ok(());
        }
        let active = self.current == Some(scene);
        stage.set_scene_flags(scene, active, false)?;
        debug!("Slide in of '{}' finished", stage.name(scene));
        stage.send(EventType::SceneAppear, scene);
        Ok(())
    }

    /// Outgoing snapshot scene left the canvas
    pub(crate) fn finish_outgoing(
        &mut self,
        stage: &mut Stage<'_>,
        outgoing: EntityId,
        image: ImageId,
    ) -> Result<(), EngineError> {
        if self.outgoing == Some(outgoing) {
            self.outgoing = None;
        }
        stage.snapshots.schedule_release(image);
        stage.scenes.retain(|scene| *scene != outgoing);
        if stage.tree.contains(outgoing) {
            stage.set_scene_flags(outgoing, false, false)?;
            stage.tree.remove(outgoing)?;
        }
        debug!("Slide out finished, snapshot {image:?} scheduled for release");
        Ok(())
    }

    /// Forget a removed scene
    pub(crate) fn forget(&mut self, scene: EntityId) {
        self.queue.retain(|request| request.scene != scene);
        if self.current == Some(scene) {
            self.current = None;
        }
        if self.incoming == Some(scene) {
            self.incoming = None;
        }
        if self.outgoing == Some(scene) {
            self.outgoing = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use slotmap::SlotMap;

    #[test]
    fn test_forget_drops_queued_requests() {
        let mut keys = SlotMap::<EntityId, ()>::with_key();
        let (kept, dropped) = (keys.insert(()), keys.insert(()));
        let mut controller = SceneController::new();
        controller.enqueue(SceneTransition {
            scene: dropped,
            transition: Transition::None,
        });
        controller.enqueue(SceneTransition {
            scene: kept,
            transition: Transition::slide(SlideDirection::Up, 100.0),
        });
        controller.current = Some(dropped);

        controller.forget(dropped);
        assert_eq!(controller.pending(), 1);
        assert_eq!(controller.current(), None);
        assert!(!controller.in_flight());
    }
}

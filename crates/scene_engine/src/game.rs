//! Game instance and frame loop

use std::rc::Rc;

use crate::action::{attach_action, attach_template, Action, ActionTemplate, FiredCallback};
use crate::core::GameConfig;
use crate::entity::update::update_scene;
use crate::entity::{Entity, EntityId, EntityTree, ImageSource, NodeKind, SpriteData};
use crate::error::EngineError;
use crate::events::{Event, EventSystem};
use crate::foundation::logging::{debug, error, info, trace};
use crate::foundation::math::Vec4;
use crate::foundation::time::{FrameClock, FrameContext};
use crate::input::{dispatcher, RawPointerEvent};
use crate::render::draw::draw_frame;
use crate::render::{Canvas, ImageId, SnapshotCache};
use crate::scene::{SceneController, SceneTransition, SlideDirection, Stage, Transition};

/// One running game
///
/// Owns the entity tree, the registered scenes and every subsystem that
/// works on them. The host calls [`tick`](Self::tick) from its
/// animation-frame callback and forwards pointer input through
/// [`handle_pointer_event`](Self::handle_pointer_event) between frames.
#[derive(Debug)]
pub struct Game {
    config: GameConfig,
    tree: EntityTree,

    /// Registered scenes in draw order
    scenes: Vec<EntityId>,

    controller: SceneController,
    events: EventSystem,

    /// Overlay scene that is always active
    free_nodes: Option<EntityId>,

    clock: FrameClock,
    snapshots: SnapshotCache,

    /// Whether the game should keep ticking
    running: bool,
}

impl Game {
    /// Create a new game instance
    pub fn new(config: GameConfig) -> Result<Self, EngineError> {
        config.validate()?;
        info!(
            "Initializing game ({}x{} @ {}x scale)",
            config.width,
            config.height,
            config.canvas_scale
        );

        let mut tree = EntityTree::new();
        let free_nodes = config.free_nodes_enabled.then(|| {
            let mut overlay = Entity::scene("free_nodes", Vec4::zeros()).with_size(config.canvas_size());
            if let Some(data) = overlay.scene_data_mut() {
                data.active = true;
            }
            tree.insert(overlay)
        });

        Ok(Self {
            config,
            tree,
            scenes: Vec::new(),
            controller: SceneController::new(),
            events: EventSystem::new(),
            free_nodes,
            clock: FrameClock::new(),
            snapshots: SnapshotCache::new(),
            running: true,
        })
    }

    /// Game configuration
    pub const fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Entity tree
    pub const fn tree(&self) -> &EntityTree {
        &self.tree
    }

    /// Entity behind a handle
    pub fn entity(&self, id: EntityId) -> Result<&Entity, EngineError> {
        self.tree.entity(id)
    }

    /// Mutable entity behind a handle
    pub fn entity_mut(&mut self, id: EntityId) -> Result<&mut Entity, EngineError> {
        self.tree.entity_mut(id)
    }

    /// The only entity called `name`
    pub fn find_entity(&self, name: &str) -> Result<EntityId, EngineError> {
        self.tree.find_by_name(name)
    }

    /// Registered scenes in draw order
    pub fn scenes(&self) -> &[EntityId] {
        &self.scenes
    }

    /// Scene most recently presented
    pub const fn current_scene(&self) -> Option<EntityId> {
        self.controller.current()
    }

    /// Overlay scene, when enabled
    pub const fn free_nodes(&self) -> Option<EntityId> {
        self.free_nodes
    }

    /// Scene presentation state
    pub const fn controller(&self) -> &SceneController {
        &self.controller
    }

    /// Event system
    pub const fn events(&self) -> &EventSystem {
        &self.events
    }

    /// Mutable event system, for registering handlers
    pub fn events_mut(&mut self) -> &mut EventSystem {
        &mut self.events
    }

    /// Frame clock
    pub const fn clock(&self) -> &FrameClock {
        &self.clock
    }

    /// Retained frame captures
    pub const fn snapshots(&self) -> &SnapshotCache {
        &self.snapshots
    }

    /// Whether the game is still ticking
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Register a new scene with the configured background, sized to the canvas
    pub fn new_scene(&mut self, name: impl Into<String>) -> EntityId {
        let scene = Entity::scene(name, self.config.background()).with_size(self.config.canvas_size());
        let id = self.tree.insert(scene);
        self.scenes.push(id);
        id
    }

    /// Register a scene entity
    ///
    /// A scene without a size is given the canvas size.
    pub fn add_scene(&mut self, mut scene: Entity) -> Result<EntityId, EngineError> {
        if !scene.is_scene() {
            return Err(EngineError::NotAScene(scene.name));
        }
        if scene.size.width == 0.0 && scene.size.height == 0.0 {
            scene.size = self.config.canvas_size();
        }
        debug!("Registering scene '{}'", scene.name);
        let id = self.tree.insert(scene);
        self.scenes.push(id);
        Ok(id)
    }

    /// Add `entity` below `parent`
    pub fn add_child(&mut self, parent: EntityId, entity: Entity) -> Result<EntityId, EngineError> {
        self.tree.spawn_child(parent, entity)
    }

    /// Add `entity` to the free-node overlay
    pub fn add_free_node(&mut self, entity: Entity) -> Result<EntityId, EngineError> {
        let overlay = self
            .free_nodes
            .ok_or_else(|| EngineError::InvalidConfig("free nodes are disabled".to_string()))?;
        self.tree.spawn_child(overlay, entity)
    }

    /// Remove an entity and its subtree, with their handlers and pending
    /// presentations
    pub fn remove_entity(&mut self, id: EntityId) -> Result<(), EngineError> {
        if Some(id) == self.free_nodes {
            return Err(EngineError::InvalidHierarchy(
                "the free-node overlay cannot be removed".to_string(),
            ));
        }
        for removed in self.tree.remove(id)? {
            self.events.remove_entity_handlers(removed);
            self.controller.forget(removed);
            self.scenes.retain(|scene| *scene != removed);
        }
        Ok(())
    }

    /// Queue `scene` to be presented at the start of the next update
    pub fn present_scene(&mut self, scene: EntityId, transition: Transition) -> Result<(), EngineError> {
        let entity = self.tree.entity(scene)?;
        if !entity.is_scene() {
            return Err(EngineError::NotAScene(entity.name.clone()));
        }
        if !self.scenes.contains(&scene) {
            return Err(EngineError::SceneNotRegistered(entity.name.clone()));
        }
        debug!("Queued scene '{}' with {:?}", entity.name, transition);
        self.controller.enqueue(SceneTransition { scene, transition });
        Ok(())
    }

    /// Slide with the configured default duration
    pub fn slide_transition(&self, direction: SlideDirection) -> Transition {
        Transition::slide(direction, self.config.default_slide_duration_ms)
    }

    /// Compile `action` and run it on `entity`
    pub fn run(&mut self, entity: EntityId, action: &Action) -> Result<(), EngineError> {
        attach_action(self.tree.entity_mut(entity)?, action, None).map(|_| ())
    }

    /// Like [`run`](Self::run), replacing any run already under `key`
    pub fn run_with_key(
        &mut self,
        entity: EntityId,
        action: &Action,
        key: impl Into<String>,
    ) -> Result<(), EngineError> {
        let key = key.into();
        let target = self.tree.entity_mut(entity)?;
        debug!("Running action '{}' on '{}'", key, target.name);
        attach_action(target, action, Some(key)).map(|_| ())
    }

    /// Run an already compiled template on `entity`
    ///
    /// The template is shared; only per-node run state is allocated.
    pub fn run_template(
        &mut self,
        entity: EntityId,
        template: &Rc<ActionTemplate>,
        key: Option<String>,
    ) -> Result<(), EngineError> {
        attach_template(self.tree.entity_mut(entity)?, Rc::clone(template), key);
        Ok(())
    }

    /// Detach the run under `key`; returns whether one was attached
    pub fn remove_action(&mut self, entity: EntityId, key: &str) -> Result<bool, EngineError> {
        Ok(self.tree.entity_mut(entity)?.remove_action(key))
    }

    /// Advance the game to `now` (milliseconds)
    ///
    /// Starts the next queued presentation, walks every active scene and the
    /// overlay, then invokes callbacks that became due, delivers queued
    /// events and runs the follow-ups their handlers deferred. Does nothing
    /// once the game is stopped.
    pub fn update(&mut self, now: f64) -> Result<(), EngineError> {
        if !self.running {
            return Ok(());
        }
        self.clock.advance(now);
        let ctx = FrameContext::new(
            now,
            self.clock.delta_time(),
            self.config.canvas_size(),
            self.config.canvas_scale,
        );

        let (controller, mut stage) = self.stage();
        controller.step(&mut stage)?;

        let mut fired = Vec::new();
        for scene in self.active_scenes() {
            update_scene(&mut self.tree, scene, &ctx, &mut fired)?;
        }
        if let Some(overlay) = self.free_nodes {
            update_scene(&mut self.tree, overlay, &ctx, &mut fired)?;
        }

        for FiredCallback { entity, callback } in fired {
            if self.tree.contains(entity) {
                trace!("Invoking callback of {entity:?}");
                callback.invoke(self);
            }
        }

        self.events.dispatch();
        self.run_follow_ups()
    }

    /// Draw the frame and retain a capture of it
    ///
    /// Once the game is stopped this only releases retained captures.
    pub fn draw(&mut self, canvas: &mut dyn Canvas) {
        if !self.running {
            self.release_snapshots(canvas);
            return;
        }
        self.snapshots.flush(canvas);
        draw_frame(&self.tree, &self.scenes, self.free_nodes, canvas, self.config.canvas_scale);
        let capture = canvas.snapshot();
        self.snapshots.replace_latest(canvas, capture);
    }

    /// One animation frame: update, then draw
    pub fn tick(&mut self, now: f64, canvas: &mut dyn Canvas) -> Result<(), EngineError> {
        self.update(now)?;
        self.draw(canvas);
        Ok(())
    }

    /// Route a raw pointer event through the overlay and the interactive
    /// scenes; returns whether a handler consumed it
    pub fn handle_pointer_event(&mut self, raw: &RawPointerEvent) -> Result<bool, EngineError> {
        if !self.running {
            return Ok(false);
        }
        let mut roots: Vec<EntityId> = self.free_nodes.into_iter().collect();
        roots.extend(self.scenes.iter().copied().filter(|id| {
            self.tree
                .get(*id)
                .and_then(Entity::scene_data)
                .is_some_and(|data| data.active && !data.transitioning)
        }));
        let handled = dispatcher::dispatch(
            &mut self.tree,
            &mut self.events,
            &roots,
            raw,
            self.config.canvas_scale,
            self.clock.now(),
        )?;
        self.run_follow_ups()?;
        Ok(handled)
    }

    /// Queue an event for delivery at the end of the next update
    pub fn send(&mut self, event: Event) {
        self.events.send(event);
    }

    /// Deliver an event now and run the follow-ups it deferred; returns
    /// whether a handler consumed it
    pub fn emit(&mut self, event: &Event) -> Result<bool, EngineError> {
        let handled = self.events.emit(event);
        self.run_follow_ups()?;
        Ok(handled)
    }

    /// Run deferred follow-ups until none are left
    fn run_follow_ups(&mut self) -> Result<(), EngineError> {
        let deferred = self.events.deferred();
        loop {
            let batch = deferred.take();
            if batch.is_empty() {
                return Ok(());
            }
            debug!("Running {} deferred follow-ups", batch.len());
            for follow_up in batch {
                follow_up(self)?;
            }
        }
    }

    /// Stop the game; the next tick releases captures and does nothing else
    pub fn stop(&mut self) {
        if self.running {
            info!("Stopping game after {} frames", self.clock.frame_count());
        }
        self.running = false;
    }

    pub(crate) fn finish_incoming(&mut self, scene: EntityId) {
        let (controller, mut stage) = self.stage();
        if let Err(err) = controller.finish_incoming(&mut stage, scene) {
            error!("Failed to finish incoming slide: {err}");
        }
    }

    pub(crate) fn finish_outgoing(&mut self, outgoing: EntityId, image: ImageId) {
        let (controller, mut stage) = self.stage();
        if let Err(err) = controller.finish_outgoing(&mut stage, outgoing, image) {
            error!("Failed to finish outgoing slide: {err}");
        }
    }

    fn stage(&mut self) -> (&mut SceneController, Stage<'_>) {
        let stage = Stage {
            tree: &mut self.tree,
            scenes: &mut self.scenes,
            snapshots: &mut self.snapshots,
            events: &mut self.events,
            canvas_size: self.config.canvas_size(),
            now: self.clock.now(),
        };
        (&mut self.controller, stage)
    }

    fn active_scenes(&self) -> Vec<EntityId> {
        self.scenes
            .iter()
            .copied()
            .filter(|id| {
                self.tree
                    .get(*id)
                    .and_then(Entity::scene_data)
                    .is_some_and(|data| data.active)
            })
            .collect()
    }

    /// Free every capture, including one held by a slide still in flight
    fn release_snapshots(&mut self, canvas: &mut dyn Canvas) {
        if let Some(outgoing) = self.controller.outgoing() {
            let held: Vec<ImageId> = self
                .tree
                .descendants(outgoing)
                .into_iter()
                .filter_map(|id| match self.tree.get(id).map(|e| &e.kind) {
                    Some(NodeKind::Sprite(SpriteData {
                        image: ImageSource::Snapshot(image),
                    })) => Some(*image),
                    _ => None,
                })
                .collect();
            for image in held {
                self.snapshots.schedule_release(image);
            }
            if let Err(err) = self.remove_entity(outgoing) {
                error!("Failed to drop outgoing snapshot scene: {err}");
            }
        }
        self.snapshots.release_all(canvas);
    }
}

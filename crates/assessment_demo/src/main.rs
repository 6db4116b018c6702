//! Headless assessment demo
//!
//! Plays a scripted session through three scenes: a welcome screen with a
//! start button, a trial screen with two targets and a closing screen. The
//! flow lives in event handlers: taps defer the next presentation and the
//! closing fade stops the game. Input is synthetic and drawing goes to a
//! recording canvas, so every run is identical.
//!
//! Usage: `assessment_demo [config.toml | config.ron]`

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use scene_engine::foundation::logging;
use scene_engine::prelude::*;

/// Upper bound on simulated frames
const MAX_FRAMES: u32 = 900;

const ACCENT: [f32; 4] = [0.16, 0.45, 0.85, 1.0];

/// What the event handlers observed
#[derive(Debug, Default)]
struct Session {
    started: bool,
    trial_shown_at: Option<f64>,
    answer: Option<String>,
    answered_at: Option<f64>,
}

struct Scenes {
    welcome: EntityId,
    trial: EntityId,
    closing: EntityId,
}

struct TapThroughDemo {
    game: Game,
    canvas: RecordingCanvas,
    scenes: Scenes,
    session: Rc<RefCell<Session>>,
    script: VecDeque<(f64, RawPointerEvent)>,
}

impl TapThroughDemo {
    fn new(config: GameConfig) -> Result<Self, EngineError> {
        log::info!("Creating tap-through demo...");
        let device_size = config.canvas_size().scaled(config.canvas_scale);
        let scale = config.canvas_scale;
        let mut game = Game::new(config)?;

        let scenes = Scenes {
            welcome: game.new_scene("welcome"),
            trial: game.new_scene("trial"),
            closing: game.new_scene("closing"),
        };

        // Taps in game units, converted to device pixels as a browser would report them
        let tap = |at: f64, x: f32, y: f32| {
            [
                (at, RawPointerEvent::down(x * scale, y * scale).with_buttons(PointerButtons::PRIMARY)),
                (at + 80.0, RawPointerEvent::up(x * scale, y * scale)),
            ]
        };
        let script = [tap(300.0, 200.0, 600.0), tap(1500.0, 300.0, 420.0)]
            .into_iter()
            .flatten()
            .collect();

        Ok(Self {
            game,
            canvas: RecordingCanvas::new(device_size),
            scenes,
            session: Rc::new(RefCell::new(Session::default())),
            script,
        })
    }

    fn initialize(&mut self) -> Result<(), EngineError> {
        log::info!("Building scenes...");
        self.build_welcome()?;
        self.build_trial()?;
        self.build_closing()?;

        let trial = self.scenes.trial;
        let session = Rc::clone(&self.session);
        self.game
            .events_mut()
            .register_entity_handler(EventType::SceneAppear, trial, move |event: &Event| {
                session.borrow_mut().trial_shown_at = Some(event.timestamp);
                false
            });

        self.game.present_scene(self.scenes.welcome, Transition::None)
    }

    fn build_welcome(&mut self) -> Result<(), EngineError> {
        let scene = self.scenes.welcome;
        self.game.add_child(
            scene,
            Entity::label("welcome_title", "Ready when you are", 32.0)
                .with_size(Size::new(320.0, 40.0))
                .with_layout(
                    Layout::new()
                        .top_to_top_of(ConstraintTarget::Parent)
                        .start_to_start_of(ConstraintTarget::Parent)
                        .end_to_end_of(ConstraintTarget::Parent)
                        .with_margins(0.0, 0.0, 160.0, 0.0),
                ),
        )?;

        let button = self.game.add_child(
            scene,
            Entity::rectangle("start_button", Size::new(180.0, 56.0), Vec4::from(ACCENT))
                .with_position(Point2::new(200.0, 600.0))
                .interactive(true),
        )?;
        self.game.add_child(button, Entity::label("start_label", "Start", 24.0))?;
        self.game.run_with_key(
            button,
            &Action::sequence(vec![
                Action::scale_to(1.06, 400.0).with_easing(Easing::SinusoidalInOut),
                Action::scale_to(1.0, 400.0).with_easing(Easing::SinusoidalInOut),
            ]),
            "pulse",
        )?;

        let session = Rc::clone(&self.session);
        let deferred = self.game.events().deferred();
        let trial = self.scenes.trial;
        self.game
            .events_mut()
            .register_entity_handler(EventType::TapUp, button, move |_: &Event| {
                let mut session = session.borrow_mut();
                if !session.started {
                    session.started = true;
                    deferred.push(move |game: &mut Game| {
                        let slide = game.slide_transition(SlideDirection::Left);
                        game.present_scene(trial, slide)
                    });
                }
                true
            });
        Ok(())
    }

    fn build_trial(&mut self) -> Result<(), EngineError> {
        let scene = self.scenes.trial;
        self.game.add_child(
            scene,
            Entity::label("trial_prompt", "Tap the circle on the right", 24.0)
                .with_position(Point2::new(200.0, 200.0)),
        )?;

        for (name, x) in [("left_target", 100.0), ("right_target", 300.0)] {
            let target = self.game.add_child(
                scene,
                Entity::circle(name, 60.0, Vec4::from(ACCENT))
                    .with_position(Point2::new(x, 420.0))
                    .interactive(true),
            )?;
            let session = Rc::clone(&self.session);
            let deferred = self.game.events().deferred();
            let closing = self.scenes.closing;
            self.game
                .events_mut()
                .register_entity_handler(EventType::TapUp, target, move |event: &Event| {
                    let mut session = session.borrow_mut();
                    if session.answer.is_none() {
                        session.answer = Some(name.to_string());
                        session.answered_at = Some(event.timestamp);
                        log::debug!("Answered {name} at {} ms", event.timestamp);
                        deferred.push(move |game: &mut Game| {
                            let slide = game.slide_transition(SlideDirection::Up).with_easing(Easing::CubicOut);
                            game.present_scene(closing, slide)
                        });
                    }
                    true
                });
        }

        self.game.add_child(
            scene,
            Entity::label("right_hint", "this one", 16.0)
                .with_size(Size::new(120.0, 20.0))
                .with_layout(
                    Layout::new()
                        .top_to_bottom_of("right_target")
                        .start_to_start_of("right_target")
                        .with_margins(0.0, 0.0, 12.0, 0.0),
                ),
        )?;
        Ok(())
    }

    fn build_closing(&mut self) -> Result<(), EngineError> {
        let label = self.game.add_child(
            self.scenes.closing,
            Entity::label("closing_title", "All done, thank you", 28.0)
                .with_position(Point2::new(200.0, 400.0)),
        )?;
        self.game.entity_mut(label)?.alpha = 0.0;
        // The session ends once the closing message is fully visible.
        self.game.run(
            label,
            &Action::sequence(vec![
                Action::fade_alpha(1.0, 600.0),
                Action::callback(|game| game.stop()),
            ]),
        )
    }

    fn run(&mut self) -> Result<(), EngineError> {
        log::info!("Starting scripted session...");
        let interval = self.game.config().frame_interval_ms();
        let mut commands = 0usize;
        let mut frames = 0u32;

        while frames < MAX_FRAMES && self.game.is_running() {
            let now = f64::from(frames) * interval;
            while self.script.front().is_some_and(|(at, _)| *at <= now) {
                if let Some((_, raw)) = self.script.pop_front() {
                    let consumed = self.game.handle_pointer_event(&raw)?;
                    log::debug!("{:?} at ({}, {}) consumed: {}", raw.kind, raw.x, raw.y, consumed);
                }
            }

            self.game.tick(now, &mut self.canvas)?;
            commands += self.canvas.commands().len();
            self.canvas.clear();
            frames += 1;
        }

        if self.game.is_running() {
            let scene = self
                .game
                .current_scene()
                .and_then(|id| self.game.entity(id).ok())
                .map(|entity| entity.name.clone());
            log::warn!("Session did not finish within {MAX_FRAMES} frames (showing {scene:?})");
            self.game.stop();
        }

        self.game.tick(f64::from(frames) * interval, &mut self.canvas)?;

        let session = self.session.borrow();
        let reaction = session
            .answered_at
            .zip(session.trial_shown_at)
            .map(|(answered, shown)| answered - shown);
        log::info!(
            "Session finished after {} frames ({} draw commands): answer {:?}, reaction {:?} ms",
            frames,
            commands,
            session.answer,
            reaction
        );
        if !self.canvas.live_images().is_empty() {
            log::warn!("{} snapshot images still alive after shutdown", self.canvas.live_images().len());
        }
        Ok(())
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => GameConfig::load_from_file(path)?,
        None => GameConfig::default(),
    };
    logging::init_with_level(&config.log_level);

    let mut demo = TapThroughDemo::new(config)?;
    demo.initialize()?;
    demo.run()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scripted_session_runs_to_completion() {
        let mut demo = TapThroughDemo::new(GameConfig::default()).unwrap();
        demo.initialize().unwrap();
        demo.run().unwrap();

        let session = demo.session.borrow();
        assert!(session.started);
        assert_eq!(session.answer.as_deref(), Some("right_target"));
        assert!(session.answered_at > session.trial_shown_at);
        assert!(!demo.game.is_running());
        assert_eq!(demo.game.current_scene(), Some(demo.scenes.closing));
        assert!(demo.canvas.live_images().is_empty());
    }
}

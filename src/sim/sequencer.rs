//! Scene sequencer
//!
//! Owns the active stage and switches between stages: the outgoing stage's
//! engine objects are cleared and the incoming one is built from scratch.
//! Level completion goes through a one-shot timer so the "level complete"
//! overlay stays up for a moment before the next stage.

use glam::Vec2;

use super::layout::level_def;
use super::level::LevelController;
use super::preload::PreloadStage;
use super::rules::Directions;
use super::stage::StageKey;
use super::timer::{TimerId, Timers};
use crate::config::GameConfig;
use crate::consts::COMPLETION_DELAY_MS;
use crate::engine::{Engine, TextSpec};
use crate::viewport_center;

const WIN_TITLE: &str = "Победа!";
const WIN_PROMPT: &str = "Нажми любую клавишу, чтобы сыграть снова";

/// Input commands for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub left: bool,
    pub right: bool,
    pub up: bool,
    /// A key went down since the previous tick
    pub any_key: bool,
}

impl TickInput {
    pub fn directions(&self) -> Directions {
        Directions {
            left: self.left,
            right: self.right,
            up: self.up,
        }
    }
}

/// Victory screen; any key starts over
pub struct WinStage;

impl WinStage {
    pub fn start(engine: &mut dyn Engine) -> Self {
        let center = viewport_center();
        engine.add_image("bg3", center, -1);
        engine.add_text(TextSpec::new(center - Vec2::new(0.0, 20.0), WIN_TITLE, 42.0).centered());
        engine.add_text(TextSpec::new(center + Vec2::new(0.0, 20.0), WIN_PROMPT, 18.0).centered());
        Self
    }
}

/// The stage currently running
pub enum Stage {
    Preload(PreloadStage),
    Level(LevelController),
    Win(WinStage),
}

/// Drives the stage cycle
pub struct Sequencer {
    current: StageKey,
    stage: Stage,
    registered: Vec<StageKey>,
    gravity: Vec2,
    timers: Timers<StageKey>,
    pending_transition: Option<TimerId>,
    /// Last stage `start` refused, so the warning is logged once
    rejected: Option<StageKey>,
}

impl Sequencer {
    /// Start the first configured stage
    pub fn new(config: &GameConfig, engine: &mut dyn Engine) -> Self {
        let registered = if config.stages.is_empty() {
            StageKey::all()
        } else {
            config.stages.clone()
        };
        let first = registered[0];
        let gravity = Vec2::new(0.0, config.gravity_y);

        engine.clear();
        let stage = build_stage(first, engine, gravity);
        log::info!("Starting at stage {}", first);

        Self {
            current: first,
            stage,
            registered,
            gravity,
            timers: Timers::new(),
            pending_transition: None,
            rejected: None,
        }
    }

    pub fn current(&self) -> StageKey {
        self.current
    }

    pub fn stage(&self) -> &Stage {
        &self.stage
    }

    /// Active level, if a level is running
    pub fn level(&self) -> Option<&LevelController> {
        match &self.stage {
            Stage::Level(controller) => Some(controller),
            _ => None,
        }
    }

    /// Active preload stage, for hosts feeding asset results
    pub fn preload_mut(&mut self) -> Option<&mut PreloadStage> {
        match &mut self.stage {
            Stage::Preload(preload) => Some(preload),
            _ => None,
        }
    }

    pub fn has_pending_transition(&self) -> bool {
        self.pending_transition
            .is_some_and(|id| self.timers.is_pending(id))
    }

    /// Switch to `key`, tearing down the current stage
    ///
    /// Returns false (and keeps the current stage) if `key` is not one of
    /// the configured stages.
    pub fn start(&mut self, engine: &mut dyn Engine, key: StageKey) -> bool {
        if !self.registered.contains(&key) {
            if self.rejected != Some(key) {
                log::warn!("Stage {} is not registered, staying on {}", key, self.current);
                self.rejected = Some(key);
            }
            return false;
        }
        self.rejected = None;
        log::info!("Stage {} -> {}", self.current, key);
        engine.clear();
        self.stage = build_stage(key, engine, self.gravity);
        self.current = key;
        true
    }

    /// Explicit restart: back to Level1 with fresh state
    pub fn restart(&mut self, engine: &mut dyn Engine) {
        self.cancel_pending_transition();
        self.start(engine, StageKey::Level1);
    }

    /// Drop a scheduled level transition; false if none was pending
    pub fn cancel_pending_transition(&mut self) -> bool {
        match self.pending_transition.take() {
            Some(id) => self.timers.cancel(id),
            None => false,
        }
    }

    /// Advance the active stage by one fixed step of `dt` seconds
    pub fn tick(&mut self, engine: &mut dyn Engine, input: &TickInput, dt: f32) {
        let mut input = *input;
        for key in self.timers.advance(dt as f64 * 1000.0) {
            self.pending_transition = None;
            // A press latched before the new stage existed is not meant for it
            if self.start(engine, key) {
                input.any_key = false;
            }
        }

        let mut next = None;
        match &mut self.stage {
            Stage::Preload(preload) => {
                if preload.is_complete() {
                    next = Some(StageKey::Preload.successor());
                }
            }
            Stage::Level(controller) => controller.update(engine, input.directions()),
            Stage::Win(_) => {
                if input.any_key {
                    next = Some(StageKey::Win.successor());
                }
            }
        }

        engine.step(dt);

        let overlaps = engine.drain_overlaps();
        if let Stage::Level(controller) = &mut self.stage {
            for overlap in overlaps {
                if let Some(done) = controller.on_overlap(engine, overlap) {
                    let id = self.timers.schedule(COMPLETION_DELAY_MS, done.next);
                    self.pending_transition = Some(id);
                }
            }
        }

        if let Some(key) = next {
            self.start(engine, key);
        }
    }
}

fn build_stage(key: StageKey, engine: &mut dyn Engine, gravity: Vec2) -> Stage {
    match key {
        StageKey::Preload => Stage::Preload(PreloadStage::start(engine)),
        StageKey::Win => Stage::Win(WinStage::start(engine)),
        level => match level_def(level) {
            Some(def) => Stage::Level(LevelController::start(def, engine, gravity)),
            // Every non-preload, non-win key has a level definition
            None => Stage::Win(WinStage::start(engine)),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::{HEIGHT, SIM_DT, WIDTH};
    use crate::engine::ArcadeWorld;
    use crate::sim::assets::AssetEntry;
    use crate::sim::preload::{AssetLoadError, AssetSource};

    struct AllAssets;

    impl AssetSource for AllAssets {
        fn load(&mut self, _entry: &AssetEntry) -> Result<(), AssetLoadError> {
            Ok(())
        }
    }

    fn world() -> ArcadeWorld {
        ArcadeWorld::new(Vec2::new(WIDTH, HEIGHT), 11)
    }

    #[test]
    fn test_preload_then_level1() {
        let mut world = world();
        let mut seq = Sequencer::new(&GameConfig::default(), &mut world);
        assert_eq!(seq.current(), StageKey::Preload);

        // Nothing reported yet: stay
        seq.tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(seq.current(), StageKey::Preload);

        if let Some(preload) = seq.preload_mut() {
            preload.load_all(&mut world, &mut AllAssets);
        }
        seq.tick(&mut world, &TickInput::default(), SIM_DT);
        assert_eq!(seq.current(), StageKey::Level1);
        assert_eq!(seq.level().map(|l| l.state().coins_remaining), Some(5));
    }

    #[test]
    fn test_unregistered_stage_rejected() {
        let mut world = world();
        let config = GameConfig {
            stages: vec![StageKey::Level1, StageKey::Level2],
            ..GameConfig::default()
        };
        let mut seq = Sequencer::new(&config, &mut world);
        assert_eq!(seq.current(), StageKey::Level1);
        assert!(!seq.start(&mut world, StageKey::Win));
        assert_eq!(seq.current(), StageKey::Level1);
        assert!(seq.start(&mut world, StageKey::Level2));
    }

    #[test]
    fn test_win_waits_for_key() {
        let mut world = world();
        let mut seq = Sequencer::new(&GameConfig::default(), &mut world);
        assert!(seq.start(&mut world, StageKey::Win));

        for _ in 0..10 {
            seq.tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(seq.current(), StageKey::Win);

        // Held arrows without a fresh press do nothing
        let held = TickInput {
            right: true,
            ..Default::default()
        };
        seq.tick(&mut world, &held, SIM_DT);
        assert_eq!(seq.current(), StageKey::Win);

        let press = TickInput {
            any_key: true,
            ..Default::default()
        };
        seq.tick(&mut world, &press, SIM_DT);
        assert_eq!(seq.current(), StageKey::Level1);
        assert_eq!(seq.level().map(|l| l.state().score), Some(0));
    }

    #[test]
    fn test_restart_cancels_pending_transition() {
        let mut world = world();
        let mut seq = Sequencer::new(&GameConfig::default(), &mut world);
        seq.start(&mut world, StageKey::Level3);
        seq.pending_transition = Some(seq.timers.schedule(COMPLETION_DELAY_MS, StageKey::Win));

        seq.restart(&mut world);
        assert_eq!(seq.current(), StageKey::Level1);
        assert!(!seq.has_pending_transition());

        for _ in 0..120 {
            seq.tick(&mut world, &TickInput::default(), SIM_DT);
        }
        assert_eq!(seq.current(), StageKey::Level1);
    }

    #[test]
    fn test_press_in_transition_tick_does_not_skip_win() {
        let mut world = world();
        let mut seq = Sequencer::new(&GameConfig::default(), &mut world);
        seq.start(&mut world, StageKey::Level3);
        seq.pending_transition = Some(seq.timers.schedule(0.0, StageKey::Win));

        let press = TickInput {
            any_key: true,
            ..Default::default()
        };
        seq.tick(&mut world, &press, SIM_DT);
        assert_eq!(seq.current(), StageKey::Win);
        assert!(!seq.has_pending_transition());

        // The next press is for the win screen
        seq.tick(&mut world, &press, SIM_DT);
        assert_eq!(seq.current(), StageKey::Level1);
    }

    #[test]
    fn test_missing_successor_is_rejected_once() {
        let mut world = world();
        let config = GameConfig {
            stages: vec![StageKey::Preload, StageKey::Level2],
            ..GameConfig::default()
        };
        let mut seq = Sequencer::new(&config, &mut world);
        if let Some(preload) = seq.preload_mut() {
            preload.load_all(&mut world, &mut AllAssets);
        }

        for _ in 0..5 {
            seq.tick(&mut world, &TickInput::default(), SIM_DT);
            assert_eq!(seq.current(), StageKey::Preload);
            assert_eq!(seq.rejected, Some(StageKey::Level1));
        }

        // A successful switch forgets the rejection
        assert!(seq.start(&mut world, StageKey::Level2));
        assert_eq!(seq.rejected, None);
    }
}

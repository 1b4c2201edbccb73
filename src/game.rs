//! Game session
//!
//! Couples an engine with the stage sequencer and runs the fixed-timestep
//! loop. The browser host owns one of these and calls `update` every frame.

use crate::config::GameConfig;
use crate::consts::{MAX_SUBSTEPS, SIM_DT};
use crate::engine::Engine;
use crate::platform::Keyboard;
use crate::sim::{AssetEntry, AssetLoadError, AssetSource, Sequencer, StageKey, TickInput};

/// A running game
pub struct Game<E: Engine> {
    pub engine: E,
    pub sequencer: Sequencer,
    pub keyboard: Keyboard,
    accumulator: f32,
    config: GameConfig,
}

impl<E: Engine> Game<E> {
    pub fn new(config: GameConfig, mut engine: E) -> Self {
        let sequencer = Sequencer::new(&config, &mut engine);
        Self {
            engine,
            sequencer,
            keyboard: Keyboard::new(),
            accumulator: 0.0,
            config,
        }
    }

    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    pub fn stage(&self) -> StageKey {
        self.sequencer.current()
    }

    /// Run as many fixed ticks as `dt` seconds of wall time allow
    ///
    /// Returns the number of ticks run.
    pub fn update(&mut self, dt: f32) -> u32 {
        let dt = dt.min(0.1);
        self.accumulator += dt;

        let mut substeps = 0;
        while self.accumulator >= SIM_DT && substeps < MAX_SUBSTEPS {
            // One-shot presses go to the first substep only
            let input = self.keyboard.take();
            self.step(&input);
            self.accumulator -= SIM_DT;
            substeps += 1;
        }
        substeps
    }

    /// Exactly one fixed tick with the given input
    pub fn step(&mut self, input: &TickInput) {
        self.sequencer.tick(&mut self.engine, input, SIM_DT);
    }

    /// Explicit restart from Level1
    pub fn restart(&mut self) {
        self.sequencer.restart(&mut self.engine);
        self.accumulator = 0.0;
        self.keyboard.release_all();
    }

    /// Load every asset from a synchronous source, if the preload stage is up
    pub fn load_assets(&mut self, source: &mut dyn AssetSource) {
        if let Some(preload) = self.sequencer.preload_mut() {
            preload.load_all(&mut self.engine, source);
        }
    }

    /// Report one asynchronously loaded asset
    pub fn record_asset(&mut self, entry: &AssetEntry, result: Result<(), AssetLoadError>) {
        if let Some(preload) = self.sequencer.preload_mut() {
            preload.record(&mut self.engine, entry, result);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::consts::PLAYER_SPAWN;
    use crate::engine::{ArcadeWorld, BodyId};
    use crate::sim::{LoadFailure, MANIFEST};
    use glam::Vec2;

    fn game() -> Game<ArcadeWorld> {
        let config = GameConfig::default();
        let world = ArcadeWorld::new(Vec2::new(config.width, config.height), 5);
        Game::new(config, world)
    }

    #[test]
    fn test_update_runs_fixed_substeps() {
        let mut game = game();
        assert_eq!(game.update(SIM_DT * 3.5), 3);
        // Leftover half tick carries over
        assert_eq!(game.update(SIM_DT * 0.6), 1);
    }

    #[test]
    fn test_long_frames_are_capped() {
        let mut game = game();
        // Clamped to 100ms: about 6 ticks, never more than MAX_SUBSTEPS
        let ran = game.update(5.0);
        assert!((5..=6).contains(&ran));
        assert!(ran <= MAX_SUBSTEPS);
    }

    #[test]
    fn test_press_reaches_only_first_substep() {
        let mut game = game();
        game.sequencer.start(&mut game.engine, StageKey::Win);
        game.keyboard.key_down("Space", false);
        game.update(SIM_DT * 2.5);
        // First substep restarted the game, second saw no press
        assert_eq!(game.stage(), StageKey::Level1);
    }

    /// Every asset reported fine and the first level running
    fn loaded_game() -> Game<ArcadeWorld> {
        let mut game = game();
        for entry in MANIFEST.iter() {
            game.record_asset(entry, Ok(()));
        }
        game.step(&TickInput::default());
        assert_eq!(game.stage(), StageKey::Level1);
        game
    }

    fn player(game: &Game<ArcadeWorld>) -> BodyId {
        game.sequencer
            .level()
            .and_then(|l| l.player())
            .expect("player")
    }

    /// Put the player at `pos` and run one tick
    fn teleport(game: &mut Game<ArcadeWorld>, pos: Vec2) {
        let player = player(game);
        game.engine.set_position(player, pos);
        game.engine.set_velocity(player, Vec2::ZERO);
        game.step(&TickInput::default());
    }

    /// Collect every coin, then touch the flag
    fn clear_level(game: &mut Game<ArcadeWorld>) {
        let level = game.sequencer.level().expect("level");
        let coins: Vec<BodyId> = level.entities().coins.iter().map(|c| c.body).collect();
        let goal = level.entities().goal.expect("goal");

        let total = coins.len() as u32;
        for coin in coins {
            let pos = game.engine.position(coin);
            teleport(game, pos);
        }
        let state = game.sequencer.level().expect("level").state();
        assert_eq!(state.coins_remaining, 0);
        assert_eq!(state.score, total);
        let score_text = format!("Монеты: {}", total);
        assert!(game.engine.texts().iter().any(|t| t.spec.content == score_text));

        let pos = game.engine.position(goal);
        teleport(game, pos);
        assert!(game.sequencer.has_pending_transition());
    }

    #[test]
    fn test_play_through_every_level() {
        let mut game = loaded_game();

        for (level, next) in [
            (StageKey::Level1, StageKey::Level2),
            (StageKey::Level2, StageKey::Level3),
            (StageKey::Level3, StageKey::Win),
        ] {
            assert_eq!(game.stage(), level);
            clear_level(&mut game);

            // The completion message stays up for a moment
            for _ in 0..40 {
                game.step(&TickInput::default());
            }
            assert_eq!(game.stage(), level);

            for _ in 0..20 {
                game.step(&TickInput::default());
            }
            assert_eq!(game.stage(), next);
            if let Some(level) = game.sequencer.level() {
                assert_eq!(level.state().score, 0);
                assert_eq!(level.state().coins_remaining, level.def().layout.coins.len() as u32);
            }
        }

        let press = TickInput {
            any_key: true,
            ..Default::default()
        };
        game.step(&press);
        assert_eq!(game.stage(), StageKey::Level1);
        let state = game.sequencer.level().expect("level").state();
        assert_eq!(state.score, 0);
        assert_eq!(state.coins_remaining, 5);
    }

    #[test]
    fn test_enemy_contact_sends_player_home() {
        let mut game = loaded_game();
        let enemy = game.sequencer.level().expect("level").entities().enemies[0];

        let pos = game.engine.position(enemy);
        teleport(&mut game, pos);

        assert_eq!(game.engine.position(player(&game)), PLAYER_SPAWN);
        assert_eq!(game.engine.velocity(player(&game)), Vec2::ZERO);
        assert_eq!(game.stage(), StageKey::Level1);
    }

    #[test]
    fn test_flag_without_coins_does_nothing() {
        let mut game = loaded_game();
        let goal = game.sequencer.level().expect("level").entities().goal.expect("goal");

        let pos = game.engine.position(goal);
        teleport(&mut game, pos);
        assert!(!game.sequencer.has_pending_transition());

        for _ in 0..120 {
            game.step(&TickInput::default());
        }
        assert_eq!(game.stage(), StageKey::Level1);
    }

    #[test]
    fn test_failed_assets_do_not_block() {
        let mut game = game();
        for entry in MANIFEST.iter() {
            let result = if entry.key == "coin" {
                Err(AssetLoadError {
                    key: entry.key,
                    failure: LoadFailure::NotFound,
                })
            } else {
                Ok(())
            };
            game.record_asset(entry, result);
        }
        assert!(
            game.engine
                .texts()
                .iter()
                .any(|t| t.spec.content == "Ошибка загрузки: coin")
        );

        game.step(&TickInput::default());
        assert_eq!(game.stage(), StageKey::Level1);

        // Coins fall back to the placeholder size
        let coin = game.sequencer.level().expect("level").entities().coins[0].body;
        assert_eq!(game.engine.body(coin).map(|b| b.size), Some(Vec2::new(32.0, 32.0)));
    }

    #[test]
    fn test_restart_mid_level() {
        let mut game = loaded_game();
        let coin = game.sequencer.level().expect("level").entities().coins[0].body;
        let pos = game.engine.position(coin);
        teleport(&mut game, pos);
        assert_eq!(game.sequencer.level().map(|l| l.state().score), Some(1));

        game.restart();
        assert_eq!(game.stage(), StageKey::Level1);
        assert_eq!(game.sequencer.level().map(|l| l.state().score), Some(0));
    }

    #[test]
    fn test_key_mashing_still_shows_win() {
        let mut game = loaded_game();
        game.sequencer.start(&mut game.engine, StageKey::Level3);
        clear_level(&mut game);

        let press = TickInput {
            any_key: true,
            ..Default::default()
        };
        for _ in 0..120 {
            game.step(&press);
            if game.stage() != StageKey::Level3 {
                break;
            }
        }
        assert_eq!(game.stage(), StageKey::Win);

        game.step(&press);
        assert_eq!(game.stage(), StageKey::Level1);
    }
}

//! Level controller
//!
//! Builds a level's bodies from its layout, drives the player every tick and
//! turns overlap events into state changes through the interaction rules.

use glam::Vec2;

use super::assets::PLAYER_ANIMATIONS;
use super::layout::LevelDef;
use super::rules::{self, Directions};
use super::stage::StageKey;
use super::state::{Coin, Facing, LevelEntities, LevelState};
use crate::consts::*;
use crate::engine::{BodyDesc, BodyId, Engine, Group, Overlap, RectSpec, TextId, TextSpec};
use crate::viewport_center;

const HINT: &str = "Собери все монеты и доберись до флага →";
const COMPLETE_MESSAGE: &str = "Уровень пройден!";

/// Raised once when the player reaches the open goal
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LevelComplete {
    pub next: StageKey,
}

/// Owns one running level
pub struct LevelController {
    def: &'static LevelDef,
    state: LevelState,
    entities: LevelEntities,
    score_text: TextId,
}

impl LevelController {
    /// Create every entity of the level in `engine`
    pub fn start(def: &'static LevelDef, engine: &mut dyn Engine, gravity: Vec2) -> Self {
        let layout = def.layout;
        let mut entities = LevelEntities::default();

        engine.add_image(def.background, viewport_center(), -1);
        engine.set_gravity(gravity);

        for platform in layout.platforms {
            let desc = BodyDesc::fixed(Group::Platforms, "platform", platform.pos())
                .with_scale(platform.scale());
            entities.platforms.push(engine.create_body(desc));
        }

        let player = engine.create_body(
            BodyDesc::moving(Group::Player, "player", PLAYER_SPAWN)
                .with_bounce(Vec2::splat(PLAYER_BOUNCE))
                .with_world_bounds(),
        );
        entities.player = Some(player);

        for anim in &PLAYER_ANIMATIONS {
            engine.define_animation(*anim);
        }

        for coin in layout.coins {
            let body = engine.create_body(
                BodyDesc::moving(Group::Coins, "coin", coin.pos()).with_gravity(false),
            );
            entities.coins.push(Coin { body, active: true });
        }

        for enemy in layout.enemies {
            let vx = enemy.vx.unwrap_or(DEFAULT_ENEMY_SPEED);
            let body = engine.create_body(
                BodyDesc::moving(Group::Enemies, "enemy", enemy.pos())
                    .with_velocity(Vec2::new(vx, 0.0))
                    .with_bounce(Vec2::new(1.0, 0.0))
                    .with_world_bounds()
                    .with_body_box(ENEMY_BODY_SIZE, ENEMY_BODY_OFFSET),
            );
            entities.enemies.push(body);
        }

        entities.goal = Some(engine.create_body(BodyDesc::fixed(
            Group::Goal,
            "flag",
            layout.goal.pos(),
        )));

        engine.register_collider(Group::Player, Group::Platforms);
        engine.register_collider(Group::Enemies, Group::Platforms);
        engine.register_collider(Group::Coins, Group::Platforms);

        engine.register_overlap(Group::Player, Group::Coins);
        engine.register_overlap(Group::Player, Group::Enemies);
        engine.register_overlap(Group::Player, Group::Goal);

        let score_text = engine.add_text(
            TextSpec::new(Vec2::new(16.0, 16.0), rules::score_text(0), 22.0).fixed(),
        );
        engine.add_text(TextSpec::new(Vec2::new(16.0, 44.0), HINT, 18.0));

        engine.camera_follow(player, CAMERA_LERP);
        engine.camera_set_bounds(Vec2::ZERO, Vec2::new(WIDTH, HEIGHT));

        log::info!(
            "{} started: {} platforms, {} coins, {} enemies",
            def.key,
            layout.platforms.len(),
            layout.coins.len(),
            layout.enemies.len()
        );

        Self {
            def,
            state: LevelState::new(layout),
            entities,
            score_text,
        }
    }

    pub fn def(&self) -> &'static LevelDef {
        self.def
    }

    pub fn state(&self) -> &LevelState {
        &self.state
    }

    pub fn entities(&self) -> &LevelEntities {
        &self.entities
    }

    pub fn player(&self) -> Option<BodyId> {
        self.entities.player
    }

    /// Apply input to the player for this tick
    pub fn update(&mut self, engine: &mut dyn Engine, input: Directions) {
        let Some(player) = self.entities.player else {
            return;
        };

        let control = rules::player_control(input, engine.is_resting_on_surface(player));
        engine.set_velocity_x(player, control.vx);
        if let Some(vy) = control.vy {
            engine.set_velocity_y(player, vy);
        }
        if let Some(facing) = control.facing {
            self.state.facing = facing;
            engine.set_flip_x(player, facing == Facing::Left);
        }
        engine.play_animation(player, control.anim.key());

        self.sync_player(engine);
    }

    /// Handle one overlap reported by the engine
    pub fn on_overlap(&mut self, engine: &mut dyn Engine, overlap: Overlap) -> Option<LevelComplete> {
        if Some(overlap.a) != self.entities.player {
            return None;
        }
        self.sync_player(engine);

        match overlap.group_b {
            Group::Coins => {
                self.collect_coin(engine, overlap.b);
                None
            }
            Group::Enemies => {
                self.hit_enemy(engine);
                None
            }
            Group::Goal => {
                if rules::try_finish(&mut self.state) {
                    Some(self.complete(engine))
                } else {
                    None
                }
            }
            _ => None,
        }
    }

    fn collect_coin(&mut self, engine: &mut dyn Engine, body: BodyId) {
        let Some(coin) = self.entities.coin_mut(body) else {
            return;
        };
        if rules::collect_coin(&mut self.state, coin) {
            engine.disable_body(body);
            engine.set_text(self.score_text, &rules::score_text(self.state.score));
            log::debug!(
                "{}: coin collected, {} remaining",
                self.def.key,
                self.state.coins_remaining
            );
        }
    }

    fn hit_enemy(&mut self, engine: &mut dyn Engine) {
        let Some(player) = self.entities.player else {
            return;
        };
        engine.camera_shake(HIT_SHAKE_MS, HIT_SHAKE_INTENSITY);
        rules::hit_enemy(&mut self.state);
        engine.set_velocity(player, self.state.player_velocity);
        engine.set_position(player, self.state.player_position);
        log::debug!("{}: enemy hit, player back at spawn", self.def.key);
    }

    fn complete(&mut self, engine: &mut dyn Engine) -> LevelComplete {
        let center = viewport_center();
        engine.add_rect(RectSpec {
            center,
            size: Vec2::new(400.0, 140.0),
            color: [0.0, 0.0, 0.0],
            alpha: 0.6,
            depth: 10,
        });
        engine.add_text(
            TextSpec::new(center, COMPLETE_MESSAGE, 28.0)
                .centered()
                .with_depth(11),
        );
        log::info!("{} complete, next: {}", self.def.key, self.def.next);
        LevelComplete {
            next: self.def.next,
        }
    }

    fn sync_player(&mut self, engine: &dyn Engine) {
        if let Some(player) = self.entities.player {
            self.state.player_position = engine.position(player);
            self.state.player_velocity = engine.velocity(player);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::ArcadeWorld;
    use crate::sim::assets::MANIFEST;
    use crate::sim::layout::level_def;

    fn world() -> ArcadeWorld {
        let mut world = ArcadeWorld::new(Vec2::new(WIDTH, HEIGHT), 1);
        for entry in &MANIFEST {
            world.register_texture(entry.texture());
        }
        world
    }

    fn level(world: &mut ArcadeWorld, key: StageKey) -> LevelController {
        let def = level_def(key).expect("level");
        LevelController::start(def, world, Vec2::new(0.0, GRAVITY_Y))
    }

    fn overlap(controller: &LevelController, group_b: Group, b: BodyId) -> Overlap {
        Overlap {
            group_a: Group::Player,
            a: controller.player().expect("player"),
            group_b,
            b,
        }
    }

    #[test]
    fn test_start_builds_every_entity() {
        let mut world = world();
        let controller = level(&mut world, StageKey::Level2);
        let entities = controller.entities();

        assert_eq!(entities.platforms.len(), 8);
        assert_eq!(entities.coins.len(), 6);
        assert_eq!(entities.enemies.len(), 2);
        assert!(entities.goal.is_some());
        assert_eq!(world.velocity(entities.enemies[1]).x, -90.0);
        assert_eq!(world.text(TextId(0)), Some("Монеты: 0"));
        assert_eq!(controller.state().coins_remaining, 6);
    }

    #[test]
    fn test_enemy_box_is_smaller_than_sprite() {
        let mut world = world();
        let controller = level(&mut world, StageKey::Level1);
        let enemy = world.body(controller.entities().enemies[0]).expect("enemy");
        assert_eq!(enemy.body_size, ENEMY_BODY_SIZE);
        assert_eq!(enemy.size, Vec2::new(32.0, 32.0));
        // Box sits at the bottom of the sprite
        assert_eq!(enemy.aabb().center, enemy.pos + Vec2::new(0.0, 5.0));
    }

    #[test]
    fn test_update_walks_and_faces() {
        let mut world = world();
        let mut controller = level(&mut world, StageKey::Level1);
        let player = controller.player().expect("player");

        controller.update(&mut world, Directions { left: true, ..Default::default() });
        assert_eq!(world.velocity(player).x, -WALK_SPEED);
        assert_eq!(controller.state().facing, Facing::Left);
        assert!(world.body(player).is_some_and(|b| b.flip_x));

        controller.update(&mut world, Directions::default());
        assert_eq!(world.velocity(player).x, 0.0);
        // Facing stays where it was
        assert_eq!(controller.state().facing, Facing::Left);
    }

    #[test]
    fn test_jump_only_from_ground() {
        let mut world = world();
        let mut controller = level(&mut world, StageKey::Level1);
        let player = controller.player().expect("player");
        let up = Directions { up: true, ..Default::default() };

        // Not stepped yet, so nothing is touching the player
        controller.update(&mut world, up);
        assert_eq!(world.velocity(player).y, 0.0);

        for _ in 0..60 {
            world.step(SIM_DT);
        }
        assert!(world.is_resting_on_surface(player));
        controller.update(&mut world, up);
        assert_eq!(world.velocity(player).y, -JUMP_IMPULSE);
    }

    #[test]
    fn test_coin_overlap_updates_score_text() {
        let mut world = world();
        let mut controller = level(&mut world, StageKey::Level1);
        let coin = controller.entities().coins[0].body;

        assert_eq!(controller.on_overlap(&mut world, overlap(&controller, Group::Coins, coin)), None);
        assert_eq!(controller.state().score, 1);
        assert_eq!(controller.state().coins_remaining, 4);
        assert!(!world.is_active(coin));
        assert_eq!(world.text(TextId(0)), Some("Монеты: 1"));

        // Same coin again is ignored
        controller.on_overlap(&mut world, overlap(&controller, Group::Coins, coin));
        assert_eq!(controller.state().score, 1);
        assert_eq!(controller.entities().active_coins(), 4);
    }

    #[test]
    fn test_enemy_overlap_resets_player() {
        let mut world = world();
        let mut controller = level(&mut world, StageKey::Level1);
        let player = controller.player().expect("player");
        let enemy = controller.entities().enemies[0];

        world.set_position(player, Vec2::new(600.0, 380.0));
        world.set_velocity(player, Vec2::new(200.0, -120.0));
        controller.on_overlap(&mut world, overlap(&controller, Group::Enemies, enemy));

        assert_eq!(world.position(player), PLAYER_SPAWN);
        assert_eq!(world.velocity(player), Vec2::ZERO);
        assert_eq!(controller.state().player_position, PLAYER_SPAWN);
        assert!(world.camera().shake_remaining_ms > 0.0);
    }

    #[test]
    fn test_goal_stays_closed_until_coins_are_gone() {
        let mut world = world();
        let mut controller = level(&mut world, StageKey::Level1);
        let goal = controller.entities().goal.expect("goal");

        assert_eq!(controller.on_overlap(&mut world, overlap(&controller, Group::Goal, goal)), None);
        assert!(world.rects().is_empty());

        let coins: Vec<BodyId> = controller.entities().coins.iter().map(|c| c.body).collect();
        for coin in coins {
            controller.on_overlap(&mut world, overlap(&controller, Group::Coins, coin));
        }
        assert_eq!(
            controller.on_overlap(&mut world, overlap(&controller, Group::Goal, goal)),
            Some(LevelComplete { next: StageKey::Level2 })
        );
        assert_eq!(world.rects().len(), 1);
        assert!(world.texts().iter().any(|t| t.spec.content == COMPLETE_MESSAGE));

        // Only once
        assert_eq!(controller.on_overlap(&mut world, overlap(&controller, Group::Goal, goal)), None);
        assert_eq!(world.rects().len(), 1);
    }
}

//! Cartoon Platformer - a three-level browser platformer
//!
//! Core modules:
//! - `sim`: Level layouts, interaction rules, level controller, stage sequencing
//! - `engine`: Engine capability trait and the arcade-physics world behind it
//! - `renderer`: WebGPU rendering pipeline
//! - `platform`: Keyboard mapping for the browser host
//! - `config`: Process entry configuration

pub mod config;
pub mod engine;
pub mod game;
pub mod platform;
pub mod renderer;
pub mod sim;

pub use config::GameConfig;
pub use game::Game;

use glam::Vec2;

/// Game configuration constants
pub mod consts {
    use glam::Vec2;

    /// Viewport dimensions
    pub const WIDTH: f32 = 800.0;
    pub const HEIGHT: f32 = 600.0;

    /// World gravity (pixels/s², positive is down)
    pub const GRAVITY_Y: f32 = 900.0;

    /// Fixed simulation timestep (60 Hz, matches the display rate of the host)
    pub const SIM_DT: f32 = 1.0 / 60.0;
    /// Maximum substeps per frame to prevent spiral of death
    pub const MAX_SUBSTEPS: u32 = 8;

    /// Player horizontal speed while a direction is held
    pub const WALK_SPEED: f32 = 200.0;
    /// Upward velocity applied on jump
    pub const JUMP_IMPULSE: f32 = 380.0;
    /// Where the player appears at level start and after an enemy hit
    pub const PLAYER_SPAWN: Vec2 = Vec2::new(80.0, 450.0);
    pub const PLAYER_BOUNCE: f32 = 0.1;

    /// Enemy speed when a layout entry omits one
    pub const DEFAULT_ENEMY_SPEED: f32 = 60.0;
    /// Enemy collision box, smaller than the sprite
    pub const ENEMY_BODY_SIZE: Vec2 = Vec2::new(26.0, 18.0);
    pub const ENEMY_BODY_OFFSET: Vec2 = Vec2::new(3.0, 12.0);

    /// Delay between goal contact and the next stage
    pub const COMPLETION_DELAY_MS: f64 = 800.0;

    /// Camera shake on enemy contact
    pub const HIT_SHAKE_MS: f32 = 200.0;
    pub const HIT_SHAKE_INTENSITY: f32 = 0.01;
    /// Camera follow smoothing
    pub const CAMERA_LERP: f32 = 0.08;
}

/// Centre of the viewport
#[inline]
pub fn viewport_center() -> Vec2 {
    Vec2::new(consts::WIDTH / 2.0, consts::HEIGHT / 2.0)
}

//! Entity interaction rules
//!
//! Pure functions from a game event to a state change. The level controller
//! applies their results to the engine; nothing here touches it.

use glam::Vec2;

use super::state::{Coin, Facing, LevelState, PlayerAnim};
use crate::consts::{JUMP_IMPULSE, PLAYER_SPAWN, WALK_SPEED};

/// Directional input for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Directions {
    pub left: bool,
    pub right: bool,
    pub up: bool,
}

/// What the player body should do this tick
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlayerControl {
    /// Horizontal velocity, always set
    pub vx: f32,
    /// Vertical velocity, only set when jumping
    pub vy: Option<f32>,
    /// New facing, unchanged when standing still
    pub facing: Option<Facing>,
    pub anim: PlayerAnim,
}

/// Map held directions to player motion
///
/// Horizontal velocity is overwritten every tick with no ramp. Left wins over
/// right when both are held. A jump needs ground underneath; there is no
/// double jump.
pub fn player_control(input: Directions, resting: bool) -> PlayerControl {
    let (vx, facing, anim) = if input.left {
        (-WALK_SPEED, Some(Facing::Left), PlayerAnim::Run)
    } else if input.right {
        (WALK_SPEED, Some(Facing::Right), PlayerAnim::Run)
    } else {
        (0.0, None, PlayerAnim::Idle)
    };

    let vy = (input.up && resting).then_some(-JUMP_IMPULSE);

    PlayerControl {
        vx,
        vy,
        facing,
        anim,
    }
}

/// Player touched a coin
///
/// Returns true when the coin was active and is now collected. An inactive
/// coin is left alone, so repeated contacts count once.
pub fn collect_coin(state: &mut LevelState, coin: &mut Coin) -> bool {
    if !coin.active {
        return false;
    }
    coin.active = false;
    state.coins_remaining = state.coins_remaining.saturating_sub(1);
    state.score += 1;
    true
}

/// Player touched an enemy: back to spawn, standing still
///
/// Score and remaining coins are untouched.
pub fn hit_enemy(state: &mut LevelState) {
    state.player_position = PLAYER_SPAWN;
    state.player_velocity = Vec2::ZERO;
}

/// Player touched the goal
///
/// Returns true only the first time the goal is reached with every coin
/// collected.
pub fn try_finish(state: &mut LevelState) -> bool {
    if state.coins_remaining != 0 || state.completion_triggered {
        return false;
    }
    state.completion_triggered = true;
    true
}

/// Score line shown in the corner
pub fn score_text(score: u32) -> String {
    format!("Монеты: {}", score)
}

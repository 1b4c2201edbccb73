//! Per-level state and entity records
//!
//! A `LevelState` lives exactly as long as its level: created with a zero
//! score when the level starts, dropped when the stage switches.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use super::layout::LevelLayout;
use crate::consts::PLAYER_SPAWN;
use crate::engine::BodyId;

/// Which way the player sprite faces
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Facing {
    Left,
    #[default]
    Right,
}

/// Player animation names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlayerAnim {
    Idle,
    Run,
}

impl PlayerAnim {
    pub fn key(&self) -> &'static str {
        match self {
            PlayerAnim::Idle => "idle",
            PlayerAnim::Run => "run",
        }
    }
}

/// Mutable state of the level being played
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LevelState {
    /// Coins collected this level
    pub score: u32,
    /// Coins still active; the goal only opens at zero
    pub coins_remaining: u32,
    pub player_position: Vec2,
    pub player_velocity: Vec2,
    pub facing: Facing,
    /// Set once the goal was reached with every coin collected
    pub completion_triggered: bool,
}

impl LevelState {
    /// Fresh state for a layout
    pub fn new(layout: &LevelLayout) -> Self {
        Self {
            score: 0,
            coins_remaining: layout.coins.len() as u32,
            player_position: PLAYER_SPAWN,
            player_velocity: Vec2::ZERO,
            facing: Facing::Right,
            completion_triggered: false,
        }
    }
}

/// A coin body and whether it can still be picked up
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Coin {
    pub body: BodyId,
    pub active: bool,
}

/// Bodies making up a running level
#[derive(Debug, Clone, Default)]
pub struct LevelEntities {
    pub player: Option<BodyId>,
    pub platforms: Vec<BodyId>,
    /// In layout order
    pub coins: Vec<Coin>,
    pub enemies: Vec<BodyId>,
    pub goal: Option<BodyId>,
}

impl LevelEntities {
    pub fn coin_mut(&mut self, body: BodyId) -> Option<&mut Coin> {
        self.coins.iter_mut().find(|c| c.body == body)
    }

    pub fn active_coins(&self) -> usize {
        self.coins.iter().filter(|c| c.active).count()
    }
}

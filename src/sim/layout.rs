//! Authored level layouts
//!
//! Plain data: platform tiles, coins, patrolling enemies and the goal flag for
//! each of the three levels. Nothing here is validated; a coin nobody can
//! reach is a level design problem, not a runtime error.

use glam::Vec2;

use super::stage::StageKey;

/// One platform tile; scale defaults to 1 on both axes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlatformSpec {
    pub x: f32,
    pub y: f32,
    pub scale_x: Option<f32>,
    pub scale_y: Option<f32>,
}

impl PlatformSpec {
    pub const fn at(x: f32, y: f32) -> Self {
        Self {
            x,
            y,
            scale_x: None,
            scale_y: None,
        }
    }

    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }

    pub fn scale(&self) -> Vec2 {
        Vec2::new(self.scale_x.unwrap_or(1.0), self.scale_y.unwrap_or(1.0))
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CoinSpec {
    pub x: f32,
    pub y: f32,
}

impl CoinSpec {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Enemy spawn; `vx` of `None` means the default patrol speed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EnemySpec {
    pub x: f32,
    pub y: f32,
    pub vx: Option<f32>,
}

impl EnemySpec {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GoalSpec {
    pub x: f32,
    pub y: f32,
}

impl GoalSpec {
    pub fn pos(&self) -> Vec2 {
        Vec2::new(self.x, self.y)
    }
}

/// Geometry and entity placement of one level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelLayout {
    pub platforms: &'static [PlatformSpec],
    pub coins: &'static [CoinSpec],
    pub enemies: &'static [EnemySpec],
    pub goal: GoalSpec,
}

/// A playable level: its layout plus where it sits in the stage chain
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LevelDef {
    pub key: StageKey,
    pub background: &'static str,
    pub layout: &'static LevelLayout,
    /// Stage started once this level is complete
    pub next: StageKey,
}

const fn coin(x: f32, y: f32) -> CoinSpec {
    CoinSpec { x, y }
}

const fn enemy(x: f32, y: f32, vx: f32) -> EnemySpec {
    EnemySpec { x, y, vx: Some(vx) }
}

const fn p(x: f32, y: f32) -> PlatformSpec {
    PlatformSpec::at(x, y)
}

pub static LEVEL_1: LevelLayout = LevelLayout {
    platforms: &[
        p(400.0, 580.0),
        p(150.0, 480.0),
        p(650.0, 420.0),
        p(300.0, 340.0),
        p(500.0, 280.0),
        p(200.0, 220.0),
        p(700.0, 180.0),
    ],
    coins: &[
        coin(150.0, 440.0),
        coin(650.0, 380.0),
        coin(300.0, 300.0),
        coin(500.0, 240.0),
        coin(200.0, 180.0),
    ],
    enemies: &[enemy(600.0, 380.0, 70.0)],
    goal: GoalSpec { x: 740.0, y: 140.0 },
};

pub static LEVEL_2: LevelLayout = LevelLayout {
    platforms: &[
        p(400.0, 580.0),
        p(250.0, 500.0),
        p(550.0, 500.0),
        p(150.0, 400.0),
        p(400.0, 350.0),
        p(650.0, 300.0),
        p(300.0, 200.0),
        p(550.0, 160.0),
    ],
    coins: &[
        coin(250.0, 460.0),
        coin(550.0, 460.0),
        coin(150.0, 360.0),
        coin(400.0, 310.0),
        coin(650.0, 260.0),
        coin(300.0, 160.0),
    ],
    enemies: &[enemy(240.0, 470.0, 90.0), enemy(560.0, 470.0, -90.0)],
    goal: GoalSpec { x: 560.0, y: 120.0 },
};

pub static LEVEL_3: LevelLayout = LevelLayout {
    platforms: &[
        p(400.0, 580.0),
        p(200.0, 520.0),
        p(600.0, 520.0),
        p(100.0, 420.0),
        p(300.0, 360.0),
        p(500.0, 300.0),
        p(700.0, 240.0),
        p(400.0, 180.0),
        p(620.0, 140.0),
    ],
    coins: &[
        coin(200.0, 480.0),
        coin(600.0, 480.0),
        coin(100.0, 380.0),
        coin(300.0, 320.0),
        coin(500.0, 260.0),
        coin(700.0, 200.0),
        coin(400.0, 140.0),
    ],
    enemies: &[
        enemy(190.0, 490.0, 100.0),
        enemy(610.0, 490.0, -110.0),
        enemy(500.0, 260.0, 120.0),
    ],
    goal: GoalSpec { x: 620.0, y: 100.0 },
};

/// The three levels in play order
pub static LEVELS: [LevelDef; 3] = [
    LevelDef {
        key: StageKey::Level1,
        background: "bg1",
        layout: &LEVEL_1,
        next: StageKey::Level2,
    },
    LevelDef {
        key: StageKey::Level2,
        background: "bg2",
        layout: &LEVEL_2,
        next: StageKey::Level3,
    },
    LevelDef {
        key: StageKey::Level3,
        background: "bg3",
        layout: &LEVEL_3,
        next: StageKey::Win,
    },
];

/// Level definition for a stage key, if that stage is a level
pub fn level_def(key: StageKey) -> Option<&'static LevelDef> {
    LEVELS.iter().find(|def| def.key == key)
}

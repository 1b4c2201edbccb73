//! Stage identifiers
//!
//! The game cycles Preload → Level1 → Level2 → Level3 → Win → Level1 …

use serde::{Deserialize, Serialize};

use super::layout::level_def;

/// Identifies a top-level stage of the game
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StageKey {
    Preload,
    Level1,
    Level2,
    Level3,
    Win,
}

impl StageKey {
    /// Stage that follows this one in the cycle
    pub fn successor(self) -> StageKey {
        match self {
            StageKey::Preload | StageKey::Win => StageKey::Level1,
            level => level_def(level).map(|def| def.next).unwrap_or(StageKey::Win),
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            StageKey::Preload => "Preload",
            StageKey::Level1 => "Level1",
            StageKey::Level2 => "Level2",
            StageKey::Level3 => "Level3",
            StageKey::Win => "Win",
        }
    }

    /// Every stage in registration order
    pub fn all() -> Vec<StageKey> {
        vec![
            StageKey::Preload,
            StageKey::Level1,
            StageKey::Level2,
            StageKey::Level3,
            StageKey::Win,
        ]
    }
}

impl std::fmt::Display for StageKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_successor_cycle() {
        let mut key = StageKey::Preload;
        let mut seen = Vec::new();
        for _ in 0..6 {
            key = key.successor();
            seen.push(key);
        }
        assert_eq!(
            seen,
            vec![
                StageKey::Level1,
                StageKey::Level2,
                StageKey::Level3,
                StageKey::Win,
                StageKey::Level1,
                StageKey::Level2,
            ]
        );
    }
}

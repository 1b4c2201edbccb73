//! Asset manifest
//!
//! Every texture the game uses, where to fetch it from, and its frame size.

use glam::Vec2;

use crate::engine::{AnimationDef, Texture};

/// Single image or a sheet of equally sized frames
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AssetKind {
    Image { width: f32, height: f32 },
    SpriteSheet { frame_width: f32, frame_height: f32, frames: u32 },
}

/// One entry of the manifest
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AssetEntry {
    pub key: &'static str,
    /// Relative to the page (web) or the asset root (native)
    pub path: &'static str,
    pub kind: AssetKind,
}

impl AssetEntry {
    /// Texture to register once the asset is available
    pub fn texture(&self) -> Texture {
        match self.kind {
            AssetKind::Image { width, height } => Texture {
                key: self.key,
                frame_size: Vec2::new(width, height),
                frames: 1,
            },
            AssetKind::SpriteSheet {
                frame_width,
                frame_height,
                frames,
            } => Texture {
                key: self.key,
                frame_size: Vec2::new(frame_width, frame_height),
                frames,
            },
        }
    }
}

const fn image(key: &'static str, path: &'static str, width: f32, height: f32) -> AssetEntry {
    AssetEntry {
        key,
        path,
        kind: AssetKind::Image { width, height },
    }
}

/// Everything the preload stage requests, in request order
pub static MANIFEST: [AssetEntry; 8] = [
    image("platform", "assets/images/platform.png", 200.0, 32.0),
    image("coin", "assets/images/coin.png", 24.0, 24.0),
    image("enemy", "assets/images/enemy.png", 32.0, 32.0),
    image("flag", "assets/images/flag.png", 32.0, 64.0),
    AssetEntry {
        key: "player",
        path: "assets/images/player_sheet.png",
        kind: AssetKind::SpriteSheet {
            frame_width: 32.0,
            frame_height: 48.0,
            frames: 4,
        },
    },
    image("bg1", "assets/images/bg1.png", 800.0, 600.0),
    image("bg2", "assets/images/bg2.png", 800.0, 600.0),
    image("bg3", "assets/images/bg3.png", 800.0, 600.0),
];

/// Player animations
pub static PLAYER_ANIMATIONS: [AnimationDef; 2] = [
    AnimationDef {
        key: "idle",
        texture: "player",
        frames: &[0],
        frame_rate: 6.0,
        repeat: false,
    },
    AnimationDef {
        key: "run",
        texture: "player",
        frames: &[0, 1, 2, 3],
        frame_rate: 8.0,
        repeat: true,
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_player_sheet_frames() {
        let sheet = MANIFEST
            .iter()
            .find(|entry| entry.key == "player")
            .map(AssetEntry::texture);
        assert_eq!(
            sheet,
            Some(Texture {
                key: "player",
                frame_size: Vec2::new(32.0, 48.0),
                frames: 4,
            })
        );
    }

    #[test]
    fn test_manifest_keys_unique() {
        for (i, a) in MANIFEST.iter().enumerate() {
            assert!(MANIFEST[i + 1..].iter().all(|b| b.key != a.key), "duplicate {}", a.key);
        }
    }
}

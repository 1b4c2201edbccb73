//! Engine capability interface
//!
//! Everything the game needs from a 2D physics/rendering engine. Stages talk
//! to this trait only; `ArcadeWorld` is the implementation the browser host
//! and the tests use.

pub mod arcade;
pub mod collision;

pub use arcade::ArcadeWorld;
pub use collision::{Aabb, CollisionResult, aabb_collision, bounce_axis};

use glam::Vec2;
use serde::{Deserialize, Serialize};

/// Handle to a physics body
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct BodyId(pub u32);

/// Handle to an on-screen text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TextId(pub u32);

/// Collision group a body belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Group {
    Player,
    Platforms,
    Coins,
    Enemies,
    Goal,
}

/// Static bodies never move and act as immovable in collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BodyKind {
    Static,
    Dynamic,
}

/// Texture registered by the asset pipeline
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Texture {
    pub key: &'static str,
    /// Size of one frame
    pub frame_size: Vec2,
    pub frames: u32,
}

/// Named sprite animation over frames of one texture
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationDef {
    pub key: &'static str,
    pub texture: &'static str,
    pub frames: &'static [u32],
    pub frame_rate: f32,
    /// Loop forever instead of holding the last frame
    pub repeat: bool,
}

/// Everything needed to create a body
#[derive(Debug, Clone, Copy)]
pub struct BodyDesc {
    pub kind: BodyKind,
    pub group: Group,
    pub texture: &'static str,
    /// Sprite centre
    pub pos: Vec2,
    pub scale: Vec2,
    pub velocity: Vec2,
    pub allow_gravity: bool,
    pub bounce: Vec2,
    pub collide_world_bounds: bool,
    /// Custom collision box (size, offset from the sprite's top-left)
    pub body_box: Option<(Vec2, Vec2)>,
}

impl BodyDesc {
    /// Immovable body, e.g. a platform tile or the goal flag
    pub fn fixed(group: Group, texture: &'static str, pos: Vec2) -> Self {
        Self {
            kind: BodyKind::Static,
            group,
            texture,
            pos,
            scale: Vec2::ONE,
            velocity: Vec2::ZERO,
            allow_gravity: false,
            bounce: Vec2::ZERO,
            collide_world_bounds: false,
            body_box: None,
        }
    }

    /// Moving body affected by gravity
    pub fn moving(group: Group, texture: &'static str, pos: Vec2) -> Self {
        Self {
            kind: BodyKind::Dynamic,
            allow_gravity: true,
            ..Self::fixed(group, texture, pos)
        }
    }

    pub fn with_scale(mut self, scale: Vec2) -> Self {
        self.scale = scale;
        self
    }

    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    pub fn with_bounce(mut self, bounce: Vec2) -> Self {
        self.bounce = bounce;
        self
    }

    pub fn with_gravity(mut self, allow: bool) -> Self {
        self.allow_gravity = allow;
        self
    }

    pub fn with_world_bounds(mut self) -> Self {
        self.collide_world_bounds = true;
        self
    }

    pub fn with_body_box(mut self, size: Vec2, offset: Vec2) -> Self {
        self.body_box = Some((size, offset));
        self
    }
}

/// Text placement and style
#[derive(Debug, Clone, PartialEq)]
pub struct TextSpec {
    pub pos: Vec2,
    pub content: String,
    pub font_size: f32,
    /// CSS color string
    pub color: &'static str,
    /// Anchor at the centre instead of the top-left corner
    pub centered: bool,
    /// Fixed to the screen, ignores camera scroll
    pub fixed: bool,
    pub depth: i32,
}

impl TextSpec {
    pub fn new(pos: Vec2, content: impl Into<String>, font_size: f32) -> Self {
        Self {
            pos,
            content: content.into(),
            font_size,
            color: "#ffffff",
            centered: false,
            fixed: false,
            depth: 0,
        }
    }

    pub fn centered(mut self) -> Self {
        self.centered = true;
        self
    }

    pub fn fixed(mut self) -> Self {
        self.fixed = true;
        self
    }

    pub fn with_color(mut self, color: &'static str) -> Self {
        self.color = color;
        self
    }

    pub fn with_depth(mut self, depth: i32) -> Self {
        self.depth = depth;
        self
    }
}

/// Filled rectangle (overlays)
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectSpec {
    pub center: Vec2,
    pub size: Vec2,
    pub color: [f32; 3],
    pub alpha: f32,
    pub depth: i32,
}

/// Non-blocking contact reported after a step
///
/// `a` is always the body from the first group of the registered pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Overlap {
    pub group_a: Group,
    pub a: BodyId,
    pub group_b: Group,
    pub b: BodyId,
}

/// Capabilities a stage may use
pub trait Engine {
    /// Make a texture available to bodies and images
    fn register_texture(&mut self, texture: Texture);
    fn define_animation(&mut self, anim: AnimationDef);
    fn set_gravity(&mut self, gravity: Vec2);

    fn create_body(&mut self, desc: BodyDesc) -> BodyId;
    /// Remove a body from simulation and hide it
    fn disable_body(&mut self, body: BodyId);
    fn is_active(&self, body: BodyId) -> bool;

    /// Bodies of `a` and `b` block each other
    fn register_collider(&mut self, a: Group, b: Group);
    /// Bodies of `a` and `b` report overlaps without blocking
    fn register_overlap(&mut self, a: Group, b: Group);

    fn position(&self, body: BodyId) -> Vec2;
    fn velocity(&self, body: BodyId) -> Vec2;
    fn set_position(&mut self, body: BodyId, pos: Vec2);
    fn set_velocity(&mut self, body: BodyId, vel: Vec2);
    fn set_velocity_x(&mut self, body: BodyId, vx: f32);
    fn set_velocity_y(&mut self, body: BodyId, vy: f32);
    /// Whether the body's underside touched something in the last step
    fn is_resting_on_surface(&self, body: BodyId) -> bool;

    /// Start an animation; keeps going if it is already playing
    fn play_animation(&mut self, body: BodyId, key: &'static str);
    fn set_flip_x(&mut self, body: BodyId, flip: bool);

    fn add_image(&mut self, texture: &'static str, center: Vec2, depth: i32);
    fn add_text(&mut self, spec: TextSpec) -> TextId;
    fn set_text(&mut self, text: TextId, content: &str);
    fn add_rect(&mut self, spec: RectSpec);

    fn camera_follow(&mut self, body: BodyId, lerp: f32);
    fn camera_set_bounds(&mut self, min: Vec2, max: Vec2);
    fn camera_shake(&mut self, duration_ms: f32, intensity: f32);

    /// Advance physics by `dt` seconds
    fn step(&mut self, dt: f32);
    /// Overlaps detected by the last step(s), oldest first
    fn drain_overlaps(&mut self) -> Vec<Overlap>;

    /// Tear down every body, image, text, relation and camera setting.
    /// Textures and animation definitions survive.
    fn clear(&mut self);
}

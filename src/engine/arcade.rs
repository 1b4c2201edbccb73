//! Arcade physics world
//!
//! A small implementation of `Engine`: box bodies, gravity, world bounds,
//! blocking colliders against static bodies, overlap reporting, sprite
//! animation playback and a follow/shake camera. It also keeps the display
//! list (images, texts, rectangles) the renderer and the DOM HUD read.

use std::collections::HashMap;

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use super::collision::{Aabb, aabb_collision, resolve_velocity};
use super::{
    AnimationDef, BodyDesc, BodyId, BodyKind, Engine, Group, Overlap, RectSpec, TextId, TextSpec,
    Texture,
};

/// Frame size used when a texture never loaded
pub const MISSING_TEXTURE_SIZE: Vec2 = Vec2::new(32.0, 32.0);

/// Animation currently playing on a body
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimPlayback {
    pub key: &'static str,
    /// Index into the animation's frame list
    pub index: usize,
    pub elapsed: f32,
}

/// A simulated body
#[derive(Debug, Clone)]
pub struct Body {
    pub id: BodyId,
    pub kind: BodyKind,
    pub group: Group,
    pub texture: &'static str,
    /// Sprite centre
    pub pos: Vec2,
    /// Displayed sprite size (frame size * scale)
    pub size: Vec2,
    /// Collision box size and offset from the sprite's top-left corner
    pub body_size: Vec2,
    pub body_offset: Vec2,
    pub vel: Vec2,
    pub allow_gravity: bool,
    pub bounce: Vec2,
    pub collide_world_bounds: bool,
    /// Disabled bodies neither collide nor render
    pub active: bool,
    /// Underside touched a platform or the world floor during the last step
    pub touching_down: bool,
    pub flip_x: bool,
    pub anim: Option<AnimPlayback>,
}

impl Body {
    /// Collision box in world space
    pub fn aabb(&self) -> Aabb {
        let top_left = self.pos - self.size / 2.0 + self.body_offset;
        Aabb::new(top_left + self.body_size / 2.0, self.body_size)
    }
}

/// Background or decoration image
#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    pub texture: &'static str,
    pub center: Vec2,
    pub size: Vec2,
    pub depth: i32,
}

/// Text entry of the display list
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub id: TextId,
    pub spec: TextSpec,
}

/// Camera state
#[derive(Debug, Clone)]
pub struct Camera {
    pub scroll: Vec2,
    pub follow: Option<(BodyId, f32)>,
    pub bounds: Option<(Vec2, Vec2)>,
    pub shake_remaining_ms: f32,
    pub shake_intensity: f32,
    pub shake_offset: Vec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            scroll: Vec2::ZERO,
            follow: None,
            bounds: None,
            shake_remaining_ms: 0.0,
            shake_intensity: 0.0,
            shake_offset: Vec2::ZERO,
        }
    }
}

/// The arcade world
pub struct ArcadeWorld {
    viewport: Vec2,
    gravity: Vec2,
    textures: HashMap<&'static str, Texture>,
    animations: HashMap<&'static str, AnimationDef>,
    bodies: Vec<Body>,
    colliders: Vec<(Group, Group)>,
    overlap_pairs: Vec<(Group, Group)>,
    overlaps: Vec<Overlap>,
    images: Vec<Image>,
    texts: Vec<Text>,
    rects: Vec<RectSpec>,
    camera: Camera,
    rng: Pcg32,
    /// Bumped on every `clear`, lets the host drop stale DOM text nodes
    generation: u32,
}

impl ArcadeWorld {
    /// Create an empty world for the given viewport (world bounds match it)
    pub fn new(viewport: Vec2, seed: u64) -> Self {
        Self {
            viewport,
            gravity: Vec2::ZERO,
            textures: HashMap::new(),
            animations: HashMap::new(),
            bodies: Vec::new(),
            colliders: Vec::new(),
            overlap_pairs: Vec::new(),
            overlaps: Vec::new(),
            images: Vec::new(),
            texts: Vec::new(),
            rects: Vec::new(),
            camera: Camera::default(),
            rng: Pcg32::seed_from_u64(seed),
            generation: 0,
        }
    }

    pub fn viewport(&self) -> Vec2 {
        self.viewport
    }

    pub fn bodies(&self) -> &[Body] {
        &self.bodies
    }

    pub fn body(&self, id: BodyId) -> Option<&Body> {
        self.bodies.get(id.0 as usize)
    }

    pub fn images(&self) -> &[Image] {
        &self.images
    }

    pub fn texts(&self) -> &[Text] {
        &self.texts
    }

    pub fn text(&self, id: TextId) -> Option<&str> {
        self.texts
            .iter()
            .find(|t| t.id == id)
            .map(|t| t.spec.content.as_str())
    }

    pub fn rects(&self) -> &[RectSpec] {
        &self.rects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Scroll plus current shake, subtracted from world positions when drawing
    pub fn camera_offset(&self) -> Vec2 {
        self.camera.scroll + self.camera.shake_offset
    }

    pub fn has_texture(&self, key: &str) -> bool {
        self.textures.contains_key(key)
    }

    pub fn generation(&self) -> u32 {
        self.generation
    }

    /// Sheet frame a body currently shows
    pub fn current_frame(&self, id: BodyId) -> u32 {
        self.body(id)
            .and_then(|b| b.anim)
            .and_then(|p| {
                self.animations
                    .get(p.key)
                    .and_then(|def| def.frames.get(p.index).copied())
            })
            .unwrap_or(0)
    }

    fn frame_size(&self, key: &str) -> Vec2 {
        self.textures
            .get(key)
            .map(|t| t.frame_size)
            .unwrap_or(MISSING_TEXTURE_SIZE)
    }

    fn body_mut(&mut self, id: BodyId) -> Option<&mut Body> {
        self.bodies.get_mut(id.0 as usize)
    }

    /// Keep a body inside the world rectangle
    fn clamp_to_bounds(&mut self, i: usize) {
        let viewport = self.viewport;
        let body = &mut self.bodies[i];
        let aabb = body.aabb();
        let (min, max) = (aabb.min(), aabb.max());

        if min.x < 0.0 {
            body.pos.x -= min.x;
            body.vel = resolve_velocity(body.vel, Vec2::X, body.bounce);
        } else if max.x > viewport.x {
            body.pos.x -= max.x - viewport.x;
            body.vel = resolve_velocity(body.vel, Vec2::NEG_X, body.bounce);
        }

        if min.y < 0.0 {
            body.pos.y -= min.y;
            body.vel = resolve_velocity(body.vel, Vec2::Y, body.bounce);
        } else if max.y > viewport.y {
            body.pos.y -= max.y - viewport.y;
            body.vel = resolve_velocity(body.vel, Vec2::NEG_Y, body.bounce);
            body.touching_down = true;
        }
    }

    /// Push dynamic bodies out of the static bodies they hit
    fn resolve_colliders(&mut self, previous: &[Aabb]) {
        for pair_index in 0..self.colliders.len() {
            let (ga, gb) = self.colliders[pair_index];
            for i in 0..self.bodies.len() {
                for j in 0..self.bodies.len() {
                    if i == j {
                        continue;
                    }
                    let (mover, obstacle) = (&self.bodies[i], &self.bodies[j]);
                    let in_pair = (mover.group == ga && obstacle.group == gb)
                        || (mover.group == gb && obstacle.group == ga);
                    if !in_pair
                        || !mover.active
                        || !obstacle.active
                        || mover.kind != BodyKind::Dynamic
                        || obstacle.kind != BodyKind::Static
                    {
                        continue;
                    }

                    let result = aabb_collision(&mover.aabb(), &previous[i], &obstacle.aabb());
                    if !result.hit {
                        continue;
                    }

                    let body = &mut self.bodies[i];
                    body.pos += result.normal * result.penetration;
                    body.vel = resolve_velocity(body.vel, result.normal, body.bounce);
                    if result.normal.y < 0.0 {
                        body.touching_down = true;
                    }
                }
            }
        }
    }

    fn collect_overlaps(&mut self) {
        for &(ga, gb) in &self.overlap_pairs {
            for a in self.bodies.iter().filter(|b| b.active && b.group == ga) {
                for b in self.bodies.iter().filter(|b| b.active && b.group == gb) {
                    if a.id != b.id && a.aabb().intersects(&b.aabb()) {
                        self.overlaps.push(Overlap {
                            group_a: ga,
                            a: a.id,
                            group_b: gb,
                            b: b.id,
                        });
                    }
                }
            }
        }
    }

    fn advance_animations(&mut self, dt: f32) {
        for body in &mut self.bodies {
            let Some(playback) = body.anim.as_mut() else {
                continue;
            };
            let Some(def) = self.animations.get(playback.key) else {
                continue;
            };
            if def.frames.len() < 2 || def.frame_rate <= 0.0 {
                continue;
            }
            playback.elapsed += dt;
            let frame_time = 1.0 / def.frame_rate;
            while playback.elapsed >= frame_time {
                playback.elapsed -= frame_time;
                if playback.index + 1 < def.frames.len() {
                    playback.index += 1;
                } else if def.repeat {
                    playback.index = 0;
                }
            }
        }
    }

    fn update_camera(&mut self, dt: f32) {
        if let Some((id, lerp)) = self.camera.follow {
            if let Some(target) = self.body(id).map(|b| b.pos) {
                let desired = target - self.viewport / 2.0;
                self.camera.scroll += (desired - self.camera.scroll) * lerp;
            }
        }
        if let Some((min, max)) = self.camera.bounds {
            let upper = (max - self.viewport).max(min);
            self.camera.scroll = self.camera.scroll.clamp(min, upper);
        }

        if self.camera.shake_remaining_ms > 0.0 {
            self.camera.shake_remaining_ms = (self.camera.shake_remaining_ms - dt * 1000.0).max(0.0);
            let amplitude = self.viewport * self.camera.shake_intensity;
            self.camera.shake_offset = Vec2::new(
                self.rng.random_range(-1.0f32..=1.0) * amplitude.x,
                self.rng.random_range(-1.0f32..=1.0) * amplitude.y,
            );
        } else {
            self.camera.shake_offset = Vec2::ZERO;
        }
    }
}

impl Engine for ArcadeWorld {
    fn register_texture(&mut self, texture: Texture) {
        self.textures.insert(texture.key, texture);
    }

    fn define_animation(&mut self, anim: AnimationDef) {
        self.animations.insert(anim.key, anim);
    }

    fn set_gravity(&mut self, gravity: Vec2) {
        self.gravity = gravity;
    }

    fn create_body(&mut self, desc: BodyDesc) -> BodyId {
        let id = BodyId(self.bodies.len() as u32);
        let size = self.frame_size(desc.texture) * desc.scale;
        let (body_size, body_offset) = desc.body_box.unwrap_or((size, Vec2::ZERO));
        self.bodies.push(Body {
            id,
            kind: desc.kind,
            group: desc.group,
            texture: desc.texture,
            pos: desc.pos,
            size,
            body_size,
            body_offset,
            vel: if desc.kind == BodyKind::Static { Vec2::ZERO } else { desc.velocity },
            allow_gravity: desc.allow_gravity && desc.kind == BodyKind::Dynamic,
            bounce: desc.bounce,
            collide_world_bounds: desc.collide_world_bounds,
            active: true,
            touching_down: false,
            flip_x: false,
            anim: None,
        });
        id
    }

    fn disable_body(&mut self, body: BodyId) {
        if let Some(b) = self.body_mut(body) {
            b.active = false;
            b.vel = Vec2::ZERO;
        }
    }

    fn is_active(&self, body: BodyId) -> bool {
        self.body(body).is_some_and(|b| b.active)
    }

    fn register_collider(&mut self, a: Group, b: Group) {
        self.colliders.push((a, b));
    }

    fn register_overlap(&mut self, a: Group, b: Group) {
        self.overlap_pairs.push((a, b));
    }

    fn position(&self, body: BodyId) -> Vec2 {
        self.body(body).map(|b| b.pos).unwrap_or(Vec2::ZERO)
    }

    fn velocity(&self, body: BodyId) -> Vec2 {
        self.body(body).map(|b| b.vel).unwrap_or(Vec2::ZERO)
    }

    fn set_position(&mut self, body: BodyId, pos: Vec2) {
        if let Some(b) = self.body_mut(body) {
            b.pos = pos;
        }
    }

    fn set_velocity(&mut self, body: BodyId, vel: Vec2) {
        if let Some(b) = self.body_mut(body) {
            if b.kind == BodyKind::Dynamic {
                b.vel = vel;
            }
        }
    }

    fn set_velocity_x(&mut self, body: BodyId, vx: f32) {
        let vy = self.velocity(body).y;
        self.set_velocity(body, Vec2::new(vx, vy));
    }

    fn set_velocity_y(&mut self, body: BodyId, vy: f32) {
        let vx = self.velocity(body).x;
        self.set_velocity(body, Vec2::new(vx, vy));
    }

    fn is_resting_on_surface(&self, body: BodyId) -> bool {
        self.body(body).is_some_and(|b| b.touching_down)
    }

    fn play_animation(&mut self, body: BodyId, key: &'static str) {
        if let Some(b) = self.body_mut(body) {
            // Restarting the same animation every tick would freeze it on frame 0
            if b.anim.is_some_and(|p| p.key == key) {
                return;
            }
            b.anim = Some(AnimPlayback {
                key,
                index: 0,
                elapsed: 0.0,
            });
        }
    }

    fn set_flip_x(&mut self, body: BodyId, flip: bool) {
        if let Some(b) = self.body_mut(body) {
            b.flip_x = flip;
        }
    }

    fn add_image(&mut self, texture: &'static str, center: Vec2, depth: i32) {
        let size = self.frame_size(texture);
        self.images.push(Image {
            texture,
            center,
            size,
            depth,
        });
    }

    fn add_text(&mut self, spec: TextSpec) -> TextId {
        let id = TextId(self.texts.len() as u32);
        self.texts.push(Text { id, spec });
        id
    }

    fn set_text(&mut self, text: TextId, content: &str) {
        if let Some(t) = self.texts.iter_mut().find(|t| t.id == text) {
            t.spec.content = content.to_string();
        }
    }

    fn add_rect(&mut self, spec: RectSpec) {
        self.rects.push(spec);
    }

    fn camera_follow(&mut self, body: BodyId, lerp: f32) {
        self.camera.follow = Some((body, lerp.clamp(0.0, 1.0)));
    }

    fn camera_set_bounds(&mut self, min: Vec2, max: Vec2) {
        self.camera.bounds = Some((min, max));
    }

    fn camera_shake(&mut self, duration_ms: f32, intensity: f32) {
        self.camera.shake_remaining_ms = duration_ms;
        self.camera.shake_intensity = intensity;
    }

    fn step(&mut self, dt: f32) {
        let previous: Vec<Aabb> = self.bodies.iter().map(Body::aabb).collect();

        for i in 0..self.bodies.len() {
            let gravity = self.gravity;
            let body = &mut self.bodies[i];
            if !body.active || body.kind != BodyKind::Dynamic {
                continue;
            }
            body.touching_down = false;
            if body.allow_gravity {
                body.vel += gravity * dt;
            }
            body.pos += body.vel * dt;
            if body.collide_world_bounds {
                self.clamp_to_bounds(i);
            }
        }

        self.resolve_colliders(&previous);
        self.collect_overlaps();
        self.advance_animations(dt);
        self.update_camera(dt);
    }

    fn drain_overlaps(&mut self) -> Vec<Overlap> {
        std::mem::take(&mut self.overlaps)
    }

    fn clear(&mut self) {
        self.bodies.clear();
        self.colliders.clear();
        self.overlap_pairs.clear();
        self.overlaps.clear();
        self.images.clear();
        self.texts.clear();
        self.rects.clear();
        self.camera = Camera::default();
        self.gravity = Vec2::ZERO;
        self.generation = self.generation.wrapping_add(1);
        log::debug!("World cleared (generation {})", self.generation);
    }
}

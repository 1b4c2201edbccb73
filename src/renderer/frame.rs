//! Display list to vertices
//!
//! Turns the arcade world's images, bodies and overlay rectangles into one
//! triangle list in world pixels; the camera is applied on the GPU. Images go
//! first, then bodies, then rectangles, each group ordered by depth. Texts are
//! not drawn here; the host puts them in the DOM.

use glam::Vec2;

use super::shapes::{circle, quad, triangle};
use super::vertex::{Vertex, colors};
use crate::engine::ArcadeWorld;
use crate::engine::arcade::Body;

/// Build the vertex list for the current world state
pub fn build_frame(world: &ArcadeWorld) -> Vec<Vertex> {
    let mut vertices = Vec::new();

    let mut images: Vec<_> = world.images().iter().collect();
    images.sort_by_key(|img| img.depth);
    for img in images {
        let color = texture_color(world, img.texture);
        vertices.extend(quad(img.center, img.size, color));
    }

    for body in world.bodies().iter().filter(|b| b.active) {
        vertices.extend(body_vertices(world, body));
    }

    let mut rects: Vec<_> = world.rects().iter().collect();
    rects.sort_by_key(|r| r.depth);
    for rect in rects {
        let [r, g, b] = rect.color;
        vertices.extend(quad(rect.center, rect.size, [r, g, b, rect.alpha]));
    }

    vertices
}

fn texture_color(world: &ArcadeWorld, key: &str) -> [f32; 4] {
    if world.has_texture(key) {
        colors::for_texture(key)
    } else {
        colors::MISSING
    }
}

fn body_vertices(world: &ArcadeWorld, body: &Body) -> Vec<Vertex> {
    let center = body.pos;
    let size = body.size;

    if !world.has_texture(body.texture) {
        return quad(center, size, colors::MISSING);
    }

    match body.texture {
        "platform" => {
            let mut v = quad(center, size, colors::PLATFORM);
            let top = Vec2::new(center.x, center.y - size.y / 2.0 + size.y * 0.15);
            v.extend(quad(top, Vec2::new(size.x, size.y * 0.3), colors::PLATFORM_TOP));
            v
        }
        "coin" => circle(center, size.x.min(size.y) / 2.0, colors::COIN, 16),
        "flag" => {
            let pole_x = center.x - size.x / 2.0 + 3.0;
            let top = center.y - size.y / 2.0;
            let mut v = quad(
                Vec2::new(pole_x, center.y),
                Vec2::new(4.0, size.y),
                colors::FLAG_POLE,
            );
            v.extend(triangle(
                Vec2::new(pole_x + 2.0, top),
                Vec2::new(center.x + size.x / 2.0, top + size.y * 0.2),
                Vec2::new(pole_x + 2.0, top + size.y * 0.4),
                colors::FLAG,
            ));
            v
        }
        "player" => {
            // Odd run frames are drawn a little darker so walking reads as motion
            let frame = world.current_frame(body.id);
            let shade = if frame % 2 == 1 { 0.85 } else { 1.0 };
            let mut v = quad(center, size, colors::shade(colors::PLAYER, shade));
            let eye_dx = if body.flip_x { -size.x * 0.25 } else { size.x * 0.25 };
            v.extend(quad(
                center + Vec2::new(eye_dx, -size.y * 0.25),
                Vec2::splat(5.0),
                colors::PLAYER_EYE,
            ));
            v
        }
        key => quad(center, size, colors::for_texture(key)),
    }
}

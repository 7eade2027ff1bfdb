//! Draw primitives for one frame
//!
//! Projection of the world into circles, lines and text. Pixel output is
//! left to whatever [`super::FrameSink`] receives the frame.

use glam::Vec2;

use crate::config::EnvConfig;
use crate::consts::BLAST_DRAW_RADIUS;
use crate::sim::{LidarSpec, World, scan};

/// 8-bit RGB color
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color(pub u8, pub u8, pub u8);

impl Color {
    pub const BACKGROUND: Color = Color(10, 10, 20);
    pub const ASTEROID: Color = Color(150, 150, 150);
    pub const PLAYER: Color = Color(0, 200, 255);
    pub const BLAST: Color = Color(255, 100, 0);
    pub const RAY: Color = Color(100, 100, 100);
    pub const TEXT: Color = Color(255, 255, 255);
}

/// Filled circle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Circle {
    pub center: Vec2,
    pub radius: f32,
    pub color: Color,
}

/// One-pixel line segment
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Line {
    pub from: Vec2,
    pub to: Vec2,
    pub color: Color,
}

/// Text anchored at its top-left corner
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub pos: Vec2,
    pub content: String,
    pub color: Color,
}

/// Everything needed to draw the current world state
#[derive(Debug, Clone, PartialEq)]
pub struct Frame {
    pub width: f32,
    pub height: f32,
    pub clear: Color,
    /// Drawn in order: asteroids, player, blasts
    pub circles: Vec<Circle>,
    /// Lidar rays
    pub lines: Vec<Line>,
    pub texts: Vec<Text>,
    /// Sensor values the rays were built from
    pub lidar: Vec<f32>,
}

impl Frame {
    /// Project the world into a frame. Reads only.
    pub fn project(world: &World, config: &EnvConfig, score: f32) -> Self {
        let spec = LidarSpec {
            rays: config.ray_count,
            max_range: config.max_range,
            step: config.march_step,
        };
        let lidar = scan(world, &spec);
        let origin = world.player.pos;

        let mut circles = Vec::with_capacity(world.obstacles.len() + world.projectiles.len() + 1);
        circles.extend(world.obstacles.iter().map(|o| Circle {
            center: o.pos,
            radius: o.radius,
            color: Color::ASTEROID,
        }));
        circles.push(Circle {
            center: origin,
            radius: world.player.radius,
            color: Color::PLAYER,
        });
        circles.extend(world.projectiles.iter().map(|p| Circle {
            center: p.pos,
            radius: BLAST_DRAW_RADIUS,
            color: Color::BLAST,
        }));

        let lines = lidar
            .iter()
            .enumerate()
            .map(|(i, &value)| Line {
                from: origin,
                to: origin + spec.direction_of(i) * value * spec.max_range,
                color: Color::RAY,
            })
            .collect();

        let texts = vec![Text {
            pos: Vec2::new(10.0, 10.0),
            content: format!("Score: {}", score as i64),
            color: Color::TEXT,
        }];

        Self {
            width: world.width,
            height: world.height,
            clear: Color::BACKGROUND,
            circles,
            lines,
            texts,
            lidar,
        }
    }
}

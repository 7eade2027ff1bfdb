//! Circle overlap tests
//!
//! Obstacles and the player are circles; projectiles and lidar samples are
//! points. All tests are inclusive at the boundary.

use glam::Vec2;

use super::state::Obstacle;

/// Point inside (or on) a circle
#[inline]
pub fn point_in_circle(p: Vec2, center: Vec2, radius: f32) -> bool {
    p.distance(center) <= radius
}

/// Two circles touching or overlapping
#[inline]
pub fn circles_touch(a: Vec2, ra: f32, b: Vec2, rb: f32) -> bool {
    a.distance(b) <= ra + rb
}

/// Index of the first obstacle containing `p`, in iteration order
pub fn first_obstacle_at(p: Vec2, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| point_in_circle(p, o.pos, o.radius))
}

/// Index of the first obstacle touching the circle at `center`
pub fn first_obstacle_touching(center: Vec2, radius: f32, obstacles: &[Obstacle]) -> Option<usize> {
    obstacles
        .iter()
        .position(|o| circles_touch(center, radius, o.pos, o.radius))
}

//! Rotating range-finder
//!
//! Each ray is a fixed-stride ray march from the player. A ray stops at the
//! first sample that leaves the world or lands inside an obstacle.

use glam::Vec2;

use super::collision::first_obstacle_at;
use super::state::World;
use crate::ray_direction;

/// Ray layout for a scan
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LidarSpec {
    pub rays: usize,
    pub max_range: f32,
    pub step: f32,
}

impl LidarSpec {
    /// Angle in degrees of ray `i`
    #[inline]
    pub fn angle_of(&self, i: usize) -> f32 {
        i as f32 * (360.0 / self.rays as f32)
    }

    /// Unit direction of ray `i`
    #[inline]
    pub fn direction_of(&self, i: usize) -> Vec2 {
        ray_direction(self.angle_of(i))
    }

    /// Samples taken along a ray that sees nothing
    #[inline]
    pub fn samples(&self) -> usize {
        (self.max_range / self.step).ceil() as usize
    }
}

/// Raw hit distance along one ray, in world units.
///
/// Sample `k` sits at `k * step`, so the count is fixed up front and does not
/// depend on accumulated float error.
pub fn march(world: &World, origin: Vec2, dir: Vec2, spec: &LidarSpec) -> f32 {
    for k in 0..spec.samples() {
        let r = k as f32 * spec.step;
        let p = origin + dir * r;
        if !world.contains(p) || first_obstacle_at(p, &world.obstacles).is_some() {
            return r;
        }
    }
    spec.max_range
}

/// Full scan from the player, normalized to [0, 1] in increasing angle order
pub fn scan(world: &World, spec: &LidarSpec) -> Vec<f32> {
    let origin = world.player.pos;
    (0..spec.rays)
        .map(|i| march(world, origin, spec.direction_of(i), spec) / spec.max_range)
        .collect()
}

//! World state and entity types
//!
//! Everything that changes during an episode lives in [`World`].

use glam::Vec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;
use serde::{Deserialize, Serialize};

use crate::config::EnvConfig;

/// The player's ship
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Player {
    pub pos: Vec2,
    pub radius: f32,
    /// Projectiles left to fire
    pub charge: u32,
    /// Ticks accumulated toward the next recharge
    pub recharge_timer: u32,
}

impl Player {
    pub fn new(config: &EnvConfig) -> Self {
        let (x, y) = config.spawn_point();
        Self {
            pos: Vec2::new(x, y),
            radius: config.player_radius,
            charge: config.max_charge,
            recharge_timer: 0,
        }
    }
}

/// A descending asteroid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Obstacle {
    pub pos: Vec2,
    pub radius: f32,
    /// Downward travel per tick
    pub speed: f32,
}

impl Obstacle {
    /// Spawn above the top edge at a random column with a random size
    pub fn spawn(rng: &mut Pcg32, config: &EnvConfig) -> Self {
        let x = rng.random_range(0.0..=config.width);
        let y = rng.random_range(-config.height..=0.0);
        let radius = rng.random_range(config.obstacle_min_radius..=config.obstacle_max_radius);
        Self {
            pos: Vec2::new(x, y),
            radius,
            speed: config.obstacle_speed,
        }
    }

    /// True once the whole body is below the bottom edge
    pub fn is_below(&self, height: f32) -> bool {
        self.pos.y - self.radius > height
    }
}

/// A blast travelling up the screen
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    pub pos: Vec2,
}

/// All mutable simulation state for one episode
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct World {
    pub width: f32,
    pub height: f32,
    pub player: Player,
    pub obstacles: Vec<Obstacle>,
    pub projectiles: Vec<Projectile>,
    /// Ticks simulated since reset
    pub tick: u64,
}

impl World {
    /// Build a fresh world, drawing the obstacle population from `rng`
    pub fn new(config: &EnvConfig, rng: &mut Pcg32) -> Self {
        let obstacles = (0..config.obstacle_count)
            .map(|_| Obstacle::spawn(rng, config))
            .collect();
        Self {
            width: config.width,
            height: config.height,
            player: Player::new(config),
            obstacles,
            projectiles: Vec::new(),
            tick: 0,
        }
    }

    /// True if `p` lies inside `[0, width) x [0, height)`
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.x < self.width && p.y >= 0.0 && p.y < self.height
    }
}

/// Seeded RNG for the run
pub fn seeded_rng(seed: u64) -> Pcg32 {
    Pcg32::seed_from_u64(seed)
}

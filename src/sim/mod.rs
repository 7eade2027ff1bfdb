//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - One fixed tick per call
//! - Seeded RNG only
//! - Stable iteration order (obstacles and projectiles are plain vectors)
//! - No rendering or platform dependencies

pub mod collision;
pub mod lidar;
pub mod state;
pub mod tick;

pub use collision::{circles_touch, first_obstacle_at, first_obstacle_touching, point_in_circle};
pub use lidar::{LidarSpec, march, scan};
pub use state::{Obstacle, Player, Projectile, World, seeded_rng};
pub use tick::{Action, TickInput, TickOutcome, tick};

//! Asteroid Env - a survival environment with a rotating range-finder
//!
//! Core modules:
//! - `sim`: Deterministic simulation (movement, hits, collisions, lidar)
//! - `env`: reset/step/render contract with an explicit episode lifecycle
//! - `render`: Pure projection of the world into draw primitives
//! - `config`: Tunable constants, loadable from JSON
//! - `policy`: Action sources and the episode driver loop

pub mod config;
pub mod env;
pub mod policy;
pub mod render;
pub mod sim;

pub use config::{ConfigError, EnvConfig};
pub use env::{EnvError, Environment, Lifecycle, Step, StepInfo};
pub use policy::{EndReason, EpisodeSummary, IdlePolicy, Policy, RandomPolicy, ReflexPolicy, run_episode};
pub use render::{Frame, FrameSink, Presented, SinkError};
pub use sim::{Action, TickInput};

use glam::Vec2;

/// Game configuration constants (defaults for [`EnvConfig`])
pub mod consts {
    /// World dimensions
    pub const WORLD_WIDTH: f32 = 800.0;
    pub const WORLD_HEIGHT: f32 = 600.0;

    /// Forward travel per tick (screen-up)
    pub const PLAYER_SPEED: f32 = 3.0;
    /// Sideways travel per tick while a direction key is held
    pub const SIDE_SPEED: f32 = 4.0;
    pub const PLAYER_RADIUS: f32 = 15.0;
    /// Half-width of the band the player may drift in around the center
    pub const PLAYER_SIDE_RANGE: f32 = 150.0;

    pub const ASTEROID_COUNT: usize = 8;
    pub const ASTEROID_SPEED: f32 = 2.0;
    pub const ASTEROID_MIN_RADIUS: f32 = 15.0;
    pub const ASTEROID_MAX_RADIUS: f32 = 40.0;

    /// Lidar defaults
    pub const LIDAR_RAYS: usize = 24;
    pub const LIDAR_RANGE: f32 = 200.0;
    pub const LIDAR_STEP: f32 = 5.0;

    /// Projectile charges and their recharge interval (one minute of ticks)
    pub const MAX_BLASTS: u32 = 5;
    pub const BLAST_RECHARGE_TICKS: u32 = 60 * FPS;
    pub const BLAST_SPEED: f32 = 7.0;
    pub const BLAST_DRAW_RADIUS: f32 = 4.0;

    /// Per-tick rewards
    pub const SURVIVAL_REWARD: f32 = 0.1;
    pub const COLLISION_PENALTY: f32 = -10.0;

    /// Frame rate the interactive driver is paced at
    pub const FPS: u32 = 60;
}

/// Unit direction for a lidar ray at `degrees`
#[inline]
pub fn ray_direction(degrees: f32) -> Vec2 {
    let rad = degrees.to_radians();
    Vec2::new(rad.cos(), rad.sin())
}

//! Environment configuration
//!
//! Defaults come from [`crate::consts`]; any subset of fields can be
//! overridden from a JSON file.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Failure loading or checking a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid config field `{field}` = {value}: {reason}")]
    Invalid {
        field: &'static str,
        value: String,
        reason: &'static str,
    },
}

/// Most lidar samples a single ray may take
pub const MAX_SAMPLES_PER_RAY: f32 = 100_000.0;

fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::Invalid {
        field,
        value: value.to_string(),
        reason,
    }
}

/// Finite and strictly positive
fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite and positive"))
    }
}

/// Finite and not negative
fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite and not negative"))
    }
}

/// Tunable environment parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EnvConfig {
    // === World ===
    pub width: f32,
    pub height: f32,

    // === Player ===
    pub player_radius: f32,
    /// Forward travel per tick
    pub player_speed: f32,
    /// Sideways travel per tick
    pub side_speed: f32,
    /// Max horizontal offset from the world center
    pub side_range: f32,

    // === Asteroids ===
    pub obstacle_count: usize,
    pub obstacle_speed: f32,
    pub obstacle_min_radius: f32,
    pub obstacle_max_radius: f32,

    // === Projectiles ===
    pub max_charge: u32,
    /// Ticks to restore one charge (0 disables recharging)
    pub recharge_ticks: u32,
    pub projectile_speed: f32,

    // === Lidar ===
    pub ray_count: usize,
    pub max_range: f32,
    pub march_step: f32,

    // === Rewards ===
    pub survival_reward: f32,
    pub collision_penalty: f32,
}

impl Default for EnvConfig {
    fn default() -> Self {
        Self {
            width: WORLD_WIDTH,
            height: WORLD_HEIGHT,

            player_radius: PLAYER_RADIUS,
            player_speed: PLAYER_SPEED,
            side_speed: SIDE_SPEED,
            side_range: PLAYER_SIDE_RANGE,

            obstacle_count: ASTEROID_COUNT,
            obstacle_speed: ASTEROID_SPEED,
            obstacle_min_radius: ASTEROID_MIN_RADIUS,
            obstacle_max_radius: ASTEROID_MAX_RADIUS,

            max_charge: MAX_BLASTS,
            recharge_ticks: BLAST_RECHARGE_TICKS,
            projectile_speed: BLAST_SPEED,

            ray_count: LIDAR_RAYS,
            max_range: LIDAR_RANGE,
            march_step: LIDAR_STEP,

            survival_reward: SURVIVAL_REWARD,
            collision_penalty: COLLISION_PENALTY,
        }
    }
}

impl EnvConfig {
    /// Parse a (possibly partial) JSON config
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Check the values the simulation relies on. Returns the first problem found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("width", self.width)?;
        positive("height", self.height)?;

        positive("player_radius", self.player_radius)?;
        non_negative("player_speed", self.player_speed)?;
        non_negative("side_speed", self.side_speed)?;
        non_negative("side_range", self.side_range)?;

        non_negative("obstacle_speed", self.obstacle_speed)?;
        positive("obstacle_min_radius", self.obstacle_min_radius)?;
        positive("obstacle_max_radius", self.obstacle_max_radius)?;
        if self.obstacle_min_radius > self.obstacle_max_radius {
            return Err(invalid(
                "obstacle_min_radius",
                self.obstacle_min_radius,
                "must not exceed obstacle_max_radius",
            ));
        }
        non_negative("projectile_speed", self.projectile_speed)?;

        if self.ray_count == 0 {
            return Err(invalid("ray_count", self.ray_count, "must be at least 1"));
        }
        positive("max_range", self.max_range)?;
        positive("march_step", self.march_step)?;
        if self.max_range / self.march_step > MAX_SAMPLES_PER_RAY {
            return Err(invalid("march_step", self.march_step, "too small for max_range"));
        }

        if !self.survival_reward.is_finite() {
            return Err(invalid("survival_reward", self.survival_reward, "must be finite"));
        }
        if !self.collision_penalty.is_finite() {
            return Err(invalid("collision_penalty", self.collision_penalty, "must be finite"));
        }
        Ok(())
    }

    /// World center x
    pub fn center_x(&self) -> f32 {
        self.width / 2.0
    }

    /// Player start position
    pub fn spawn_point(&self) -> (f32, f32) {
        (self.center_x(), self.height * 0.75)
    }

    /// Permitted horizontal band for the player
    pub fn x_band(&self) -> (f32, f32) {
        (self.center_x() - self.side_range, self.center_x() + self.side_range)
    }

    /// Permitted vertical band for the player
    pub fn y_band(&self) -> (f32, f32) {
        (self.height * 0.5, self.height * 0.75)
    }
}

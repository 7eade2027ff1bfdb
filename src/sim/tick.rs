//! Fixed timestep simulation tick
//!
//! Advances the world by one frame. Phase order is fixed:
//! player movement, obstacles, shooting, recharge, projectiles, hits, collision.

use rand_pcg::Pcg32;

use super::collision::{first_obstacle_at, first_obstacle_touching};
use super::state::{Obstacle, Projectile, World};
use crate::config::EnvConfig;

/// Discrete action requested by a policy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Action {
    #[default]
    Noop,
    Shoot,
}

impl Action {
    /// Map an integer action code. Unknown codes are treated as no-op.
    pub fn from_index(index: i64) -> Self {
        match index {
            1 => Action::Shoot,
            _ => Action::Noop,
        }
    }

    pub fn index(self) -> i64 {
        match self {
            Action::Noop => 0,
            Action::Shoot => 1,
        }
    }
}

/// Everything the driver hands the simulation for one tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickInput {
    pub action: Action,
    /// Left key held
    pub left: bool,
    /// Right key held
    pub right: bool,
    /// Window close / quit request
    pub quit: bool,
}

impl TickInput {
    pub fn action(action: Action) -> Self {
        Self { action, ..Default::default() }
    }

    pub fn quit() -> Self {
        Self { quit: true, ..Default::default() }
    }
}

/// What happened during a tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TickOutcome {
    /// Player touched an obstacle
    pub collided: bool,
    /// Obstacles destroyed by projectiles
    pub hits: u32,
    /// Obstacles that drifted off the bottom and were respawned
    pub respawned: u32,
    /// A projectile was fired
    pub fired: bool,
}

/// Advance the world by one tick. The quit flag is the caller's concern.
pub fn tick(world: &mut World, input: &TickInput, config: &EnvConfig, rng: &mut Pcg32) -> TickOutcome {
    let mut outcome = TickOutcome::default();

    world.tick += 1;

    move_player(world, input, config);
    outcome.respawned = move_obstacles(world, config, rng);
    if input.action == Action::Shoot {
        outcome.fired = shoot(world);
    }
    recharge(world, config);
    move_projectiles(world, config);
    outcome.hits = resolve_hits(world, config, rng);

    let player = &world.player;
    outcome.collided = first_obstacle_touching(player.pos, player.radius, &world.obstacles).is_some();

    outcome
}

/// Forward step then clamp, sideways step then clamp
fn move_player(world: &mut World, input: &TickInput, config: &EnvConfig) {
    let pos = &mut world.player.pos;

    let (y_min, y_max) = config.y_band();
    pos.y = (pos.y - config.player_speed).clamp(y_min, y_max);

    if input.left {
        pos.x -= config.side_speed;
    }
    if input.right {
        pos.x += config.side_speed;
    }
    let (x_min, x_max) = config.x_band();
    pos.x = pos.x.clamp(x_min, x_max);
}

/// Returns the number of obstacles respawned
fn move_obstacles(world: &mut World, config: &EnvConfig, rng: &mut Pcg32) -> u32 {
    let mut respawned = 0;
    for obstacle in &mut world.obstacles {
        obstacle.pos.y += obstacle.speed;
        if obstacle.is_below(world.height) {
            *obstacle = Obstacle::spawn(rng, config);
            respawned += 1;
        }
    }
    respawned
}

/// Returns true if a projectile was fired
fn shoot(world: &mut World) -> bool {
    let player = &mut world.player;
    if player.charge == 0 {
        return false;
    }
    player.charge -= 1;
    world.projectiles.push(Projectile { pos: player.pos });
    true
}

/// Restore one charge every `recharge_ticks` ticks spent below max
fn recharge(world: &mut World, config: &EnvConfig) {
    let player = &mut world.player;
    if config.recharge_ticks == 0 || player.charge >= config.max_charge {
        player.recharge_timer = 0;
        return;
    }
    player.recharge_timer += 1;
    if player.recharge_timer >= config.recharge_ticks {
        player.charge += 1;
        player.recharge_timer = 0;
        log::debug!("Recharged blast ({}/{})", player.charge, config.max_charge);
    }
}

fn move_projectiles(world: &mut World, config: &EnvConfig) {
    for projectile in &mut world.projectiles {
        projectile.pos.y -= config.projectile_speed;
    }
    world.projectiles.retain(|p| p.pos.y > 0.0);
}

/// Each projectile destroys at most the first obstacle it sits inside.
/// Destroyed obstacles are replaced at the end of the list.
fn resolve_hits(world: &mut World, config: &EnvConfig, rng: &mut Pcg32) -> u32 {
    let mut hits = 0;
    let obstacles = &mut world.obstacles;
    world.projectiles.retain(|projectile| match first_obstacle_at(projectile.pos, obstacles) {
        Some(i) => {
            let destroyed = obstacles.remove(i);
            obstacles.push(Obstacle::spawn(rng, config));
            log::debug!("Blast destroyed asteroid at ({:.1}, {:.1})", destroyed.pos.x, destroyed.pos.y);
            hits += 1;
            false
        }
        None => true,
    });
    hits
}

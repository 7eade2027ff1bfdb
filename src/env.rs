//! Reset/step environment contract
//!
//! [`Environment`] owns the world, the seeded RNG and the episode bookkeeping.
//! An episode starts at [`Environment::reset`] and ends on collision or quit.
//! After that, `step` fails with [`EnvError::EpisodeTerminated`] until the
//! next reset.

use std::time::{Duration, Instant};

use rand_pcg::Pcg32;
use thiserror::Error;

use crate::config::{ConfigError, EnvConfig};
use crate::render::{Frame, FrameSink, Presented};
use crate::sim::{LidarSpec, TickInput, World, scan, seeded_rng, tick};

#[derive(Debug, Error)]
pub enum EnvError {
    #[error(transparent)]
    InvalidConfig(#[from] ConfigError),
    #[error("episode has terminated; call reset before stepping again")]
    EpisodeTerminated,
}

/// Episode lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lifecycle {
    Running,
    Terminated,
}

/// Auxiliary data returned with every regular step
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepInfo {
    /// Running sum of rewards, including this step
    pub score: f32,
    pub alive: bool,
    pub tick: u64,
    /// Blasts left
    pub charge: u32,
}

/// Result of one `step`
#[derive(Debug, Clone, PartialEq)]
pub struct Step {
    pub observation: Vec<f32>,
    pub reward: f32,
    pub done: bool,
    /// `None` when the step was a quit request
    pub info: Option<StepInfo>,
}

/// Asteroid survival environment
#[derive(Debug)]
pub struct Environment {
    config: EnvConfig,
    lidar: LidarSpec,
    rng: Pcg32,
    world: World,
    score: f32,
    lifecycle: Lifecycle,
    started_at: Instant,
}

impl Environment {
    /// Create an environment. The world is populated but callers should
    /// still `reset` before the first step to receive an observation.
    pub fn new(config: EnvConfig, seed: u64) -> Result<Self, EnvError> {
        config.validate()?;
        let lidar = LidarSpec {
            rays: config.ray_count,
            max_range: config.max_range,
            step: config.march_step,
        };
        let mut rng = seeded_rng(seed);
        let world = World::new(&config, &mut rng);
        Ok(Self {
            config,
            lidar,
            rng,
            world,
            score: 0.0,
            lifecycle: Lifecycle::Running,
            started_at: Instant::now(),
        })
    }

    /// Start a new episode, continuing the current RNG stream
    pub fn reset(&mut self) -> Vec<f32> {
        self.world = World::new(&self.config, &mut self.rng);
        self.score = 0.0;
        self.lifecycle = Lifecycle::Running;
        self.started_at = Instant::now();
        log::info!(
            "Episode reset: {} asteroids, {} rays",
            self.world.obstacles.len(),
            self.lidar.rays
        );
        self.observe()
    }

    /// Start a new episode from a fresh seed
    pub fn reset_with_seed(&mut self, seed: u64) -> Vec<f32> {
        log::info!("Reseeding environment with {}", seed);
        self.rng = seeded_rng(seed);
        self.reset()
    }

    /// Advance one tick
    pub fn step(&mut self, input: &TickInput) -> Result<Step, EnvError> {
        if self.lifecycle == Lifecycle::Terminated {
            log::warn!("step called on a terminated episode");
            return Err(EnvError::EpisodeTerminated);
        }

        if input.quit {
            self.lifecycle = Lifecycle::Terminated;
            log::info!("Quit requested at tick {} (score {:.1})", self.world.tick, self.score);
            return Ok(Step {
                observation: self.observe(),
                reward: 0.0,
                done: true,
                info: None,
            });
        }

        let outcome = tick(&mut self.world, input, &self.config, &mut self.rng);

        let reward = if outcome.collided {
            self.config.collision_penalty
        } else {
            self.config.survival_reward
        };
        self.score += reward;

        if outcome.collided {
            self.lifecycle = Lifecycle::Terminated;
            log::info!("Collision at tick {}: final score {:.1}", self.world.tick, self.score);
        }

        Ok(Step {
            observation: self.observe(),
            reward,
            done: outcome.collided,
            info: Some(StepInfo {
                score: self.score,
                alive: !outcome.collided,
                tick: self.world.tick,
                charge: self.world.player.charge,
            }),
        })
    }

    /// Fresh lidar reading for the current world
    pub fn observe(&self) -> Vec<f32> {
        scan(&self.world, &self.lidar)
    }

    /// Project the world and hand it to `sink`. Sink failures are
    /// logged and swallowed.
    pub fn render(&self, sink: &mut dyn FrameSink) -> Presented {
        let frame = self.frame();
        match sink.present(&frame) {
            Ok(()) => Presented::Shown,
            Err(e) => {
                log::warn!("Render error: {}", e);
                Presented::Ignored
            }
        }
    }

    /// Current frame without presenting it
    pub fn frame(&self) -> Frame {
        Frame::project(&self.world, &self.config, self.score)
    }

    /// Release the sink's resources
    pub fn close(&mut self, sink: &mut dyn FrameSink) {
        sink.close();
    }

    pub fn config(&self) -> &EnvConfig {
        &self.config
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    /// Direct world access for scripted scenarios
    pub fn world_mut(&mut self) -> &mut World {
        &mut self.world
    }

    pub fn score(&self) -> f32 {
        self.score
    }

    pub fn lifecycle(&self) -> Lifecycle {
        self.lifecycle
    }

    pub fn is_running(&self) -> bool {
        self.lifecycle == Lifecycle::Running
    }

    /// Wall-clock time since the last reset
    pub fn elapsed(&self) -> Duration {
        self.started_at.elapsed()
    }
}

#[cfg(test)]
mod tests {
    use glam::Vec2;
    use proptest::prelude::*;

    use super::*;
    use crate::render::{NullSink, SinkError};
    use crate::sim::{Action, Obstacle, Projectile};

    fn env() -> Environment {
        let mut env = Environment::new(EnvConfig::default(), 2024).unwrap();
        env.reset();
        env
    }

    /// Keep random spawns far from the player so a scenario is not cut short
    fn clear_sky(env: &mut Environment) {
        for o in &mut env.world_mut().obstacles {
            o.pos = Vec2::new(-1000.0, -1000.0);
            o.speed = 0.0;
        }
    }

    struct FailingSink;

    impl FrameSink for FailingSink {
        fn present(&mut self, _frame: &Frame) -> Result<(), SinkError> {
            Err(SinkError::SurfaceLost)
        }
    }

    #[test]
    fn test_reset_state() {
        let mut env = env();
        let obs = env.reset();
        assert_eq!(obs.len(), 24);
        assert!(obs.iter().all(|v| (0.0..=1.0).contains(v)));
        assert_eq!(env.world().player.pos, Vec2::new(400.0, 450.0));
        assert_eq!(env.world().player.charge, 5);
        assert_eq!(env.world().obstacles.len(), 8);
        assert!(env.world().projectiles.is_empty());
        assert_eq!(env.score(), 0.0);
        assert!(env.is_running());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = EnvConfig { ray_count: 0, ..Default::default() };
        assert!(matches!(
            Environment::new(config, 1),
            Err(EnvError::InvalidConfig(ConfigError::Invalid { field: "ray_count", .. }))
        ));
    }

    #[test]
    fn test_unbounded_config_rejected_before_spawning() {
        let config = EnvConfig::from_json_str(r#"{ "obstacle_max_radius": 1e39 }"#).unwrap();
        assert!(matches!(
            Environment::new(config, 1),
            Err(EnvError::InvalidConfig(ConfigError::Invalid { field: "obstacle_max_radius", .. }))
        ));

        let config = EnvConfig { march_step: 1e-9, obstacle_count: 0, ..Default::default() };
        assert!(matches!(
            Environment::new(config, 1),
            Err(EnvError::InvalidConfig(ConfigError::Invalid { field: "march_step", .. }))
        ));
    }

    #[test]
    fn test_survival_reward() {
        let mut env = env();
        clear_sky(&mut env);
        let step = env.step(&TickInput::default()).unwrap();
        assert_eq!(step.reward, 0.1);
        assert!(!step.done);
        let info = step.info.unwrap();
        assert!(info.alive);
        assert_eq!(info.tick, 1);
        assert!((info.score - 0.1).abs() < 1e-6);
    }

    #[test]
    fn test_collision_terminates() {
        let mut env = env();
        clear_sky(&mut env);
        // Player will be at (400, 447) after movement
        env.world_mut().obstacles[0] = Obstacle { pos: Vec2::new(400.0, 447.0), radius: 15.0, speed: 0.0 };

        let step = env.step(&TickInput::default()).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, -10.0);
        let info = step.info.unwrap();
        assert!(!info.alive);
        assert!((info.score + 10.0).abs() < 1e-6);
        assert_eq!(env.lifecycle(), Lifecycle::Terminated);
    }

    #[test]
    fn test_step_after_termination_fails() {
        let mut env = env();
        env.step(&TickInput::quit()).unwrap();
        let before = env.world().clone();
        assert!(matches!(env.step(&TickInput::default()), Err(EnvError::EpisodeTerminated)));
        assert_eq!(env.world().tick, before.tick);
        assert_eq!(env.world().player, before.player);

        env.reset();
        assert!(env.step(&TickInput::default()).is_ok());
    }

    #[test]
    fn test_quit_short_circuits() {
        let mut env = env();
        let before = env.world().clone();
        let step = env.step(&TickInput { quit: true, action: Action::Shoot, left: true, right: false }).unwrap();
        assert!(step.done);
        assert_eq!(step.reward, 0.0);
        assert!(step.info.is_none());
        assert_eq!(step.observation.len(), 24);
        assert_eq!(env.world().player, before.player);
        assert_eq!(env.world().obstacles, before.obstacles);
        assert_eq!(env.world().tick, 0);
        assert_eq!(env.score(), 0.0);
    }

    #[test]
    fn test_clear_sky_observation() {
        let mut env = env();
        env.world_mut().obstacles.clear();
        env.world_mut().player.pos = Vec2::new(400.0, 300.0);
        assert!(env.observe().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn test_hit_and_replace_keeps_score_survival_only() {
        let mut env = env();
        clear_sky(&mut env);
        // Fire from (400, 447); the blast reaches y = 200 after ~35 ticks
        env.world_mut().obstacles[0] = Obstacle { pos: Vec2::new(400.0, 200.0), radius: 20.0, speed: 0.0 };

        let first = env.step(&TickInput::action(Action::Shoot)).unwrap();
        assert_eq!(env.world().projectiles.len(), 1);
        assert_eq!(first.info.unwrap().charge, 4);

        let mut steps = 1;
        while !env.world().projectiles.is_empty() && steps < 100 {
            let step = env.step(&TickInput::default()).unwrap();
            assert!(!step.done);
            steps += 1;
        }

        let world = env.world();
        assert_eq!(world.obstacles.len(), 8);
        assert!(!world.obstacles.iter().any(|o| o.pos == Vec2::new(400.0, 200.0)));
        assert!((env.score() - 0.1 * steps as f32).abs() < 1e-3);
    }

    #[test]
    fn test_projectile_count_limited_by_charge() {
        let mut env = env();
        clear_sky(&mut env);
        for _ in 0..10 {
            env.step(&TickInput::action(Action::Shoot)).unwrap();
        }
        assert_eq!(env.world().player.charge, 0);
        assert_eq!(env.world().projectiles.len(), 5);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut env = env();
        for _ in 0..20 {
            if env.step(&TickInput::action(Action::Shoot)).unwrap().done {
                break;
            }
        }
        let before = env.world().clone();
        let a = env.frame();
        let b = env.frame();
        assert_eq!(a, b);
        assert_eq!(a.lidar, env.observe());
        assert_eq!(env.world().obstacles, before.obstacles);
        assert_eq!(env.world().projectiles, before.projectiles);
        assert_eq!(env.world().player, before.player);
    }

    #[test]
    fn test_render_swallows_sink_errors() {
        let mut env = env();
        assert_eq!(env.render(&mut FailingSink), Presented::Ignored);
        assert_eq!(env.render(&mut NullSink), Presented::Shown);
        assert!(env.step(&TickInput::default()).is_ok());
    }

    #[test]
    fn test_same_seed_same_episode() {
        let mut a = Environment::new(EnvConfig::default(), 77).unwrap();
        let mut b = Environment::new(EnvConfig::default(), 77).unwrap();
        assert_eq!(a.reset(), b.reset());

        let inputs = [
            TickInput::action(Action::Shoot),
            TickInput { left: true, ..Default::default() },
            TickInput { right: true, action: Action::Shoot, ..Default::default() },
            TickInput::default(),
        ];
        for i in 0..400 {
            let input = &inputs[i % inputs.len()];
            let sa = a.step(input).unwrap();
            let sb = b.step(input).unwrap();
            assert_eq!(sa, sb);
            if sa.done {
                break;
            }
        }
        assert_eq!(a.world().obstacles, b.world().obstacles);
    }

    #[test]
    fn test_reset_with_seed_reproduces() {
        let mut env = env();
        let first = env.reset_with_seed(5);
        let obstacles = env.world().obstacles.clone();
        env.step(&TickInput::default()).unwrap();
        let again = env.reset_with_seed(5);
        assert_eq!(first, again);
        assert_eq!(env.world().obstacles, obstacles);
    }

    #[test]
    fn test_stray_projectile_does_not_touch_score() {
        let mut env = env();
        clear_sky(&mut env);
        env.world_mut().projectiles.push(Projectile { pos: Vec2::new(100.0, 300.0) });
        let step = env.step(&TickInput::default()).unwrap();
        assert_eq!(step.reward, 0.1);
    }

    fn any_input() -> impl Strategy<Value = TickInput> {
        (0i64..3, any::<bool>(), any::<bool>()).prop_map(|(code, left, right)| TickInput {
            action: Action::from_index(code),
            left,
            right,
            quit: false,
        })
    }

    proptest! {
        #[test]
        fn prop_invariants_hold(seed in any::<u64>(), inputs in prop::collection::vec(any_input(), 1..300)) {
            let mut env = Environment::new(EnvConfig::default(), seed).unwrap();
            let obs = env.reset();
            prop_assert_eq!(obs.len(), 24);

            for input in &inputs {
                let step = env.step(input).unwrap();
                let world = env.world();

                prop_assert_eq!(world.obstacles.len(), 8);
                prop_assert!(world.player.charge <= 5);
                prop_assert!((250.0..=550.0).contains(&world.player.pos.x));
                prop_assert!((300.0..=450.0).contains(&world.player.pos.y));
                prop_assert_eq!(step.observation.len(), 24);
                prop_assert!(step.observation.iter().all(|v| (0.0..=1.0).contains(v)));

                if step.done {
                    prop_assert_eq!(step.reward, -10.0);
                    break;
                }
                prop_assert_eq!(step.reward, 0.1);
            }
        }
    }
}

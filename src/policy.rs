//! Action sources and the episode driver loop

use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::env::{EnvError, Environment};
use crate::render::FrameSink;
use crate::sim::{Action, TickInput};

pub trait Policy {
    fn name(&self) -> &str;
    fn act(&mut self, obs: &[f32]) -> TickInput;
}

/// Never steers, never shoots
pub struct IdlePolicy;

impl Policy for IdlePolicy {
    fn name(&self) -> &str {
        "idle"
    }

    fn act(&mut self, _obs: &[f32]) -> TickInput {
        TickInput::default()
    }
}

/// Uniformly random steering, shoots with a fixed probability
pub struct RandomPolicy {
    rng: Pcg32,
    shoot_chance: f64,
}

impl RandomPolicy {
    pub fn new(seed: u64, shoot_chance: f64) -> Self {
        Self {
            rng: Pcg32::seed_from_u64(seed),
            shoot_chance: shoot_chance.clamp(0.0, 1.0),
        }
    }
}

impl Policy for RandomPolicy {
    fn name(&self) -> &str {
        "random"
    }

    fn act(&mut self, _obs: &[f32]) -> TickInput {
        let action = if self.rng.random_bool(self.shoot_chance) {
            Action::Shoot
        } else {
            Action::Noop
        };
        // 0 = straight, 1 = left, 2 = right
        let steer = self.rng.random_range(0..3u8);
        TickInput {
            action,
            left: steer == 1,
            right: steer == 2,
            quit: false,
        }
    }
}

/// Reflex heuristic over the lidar ring.
///
/// Ray 0 points right and angles grow clockwise on screen (y down), so the
/// upper half of the ring is the second half of the observation.
pub struct ReflexPolicy {
    /// Readings below this count as a threat
    pub threshold: f32,
}

impl Default for ReflexPolicy {
    fn default() -> Self {
        Self { threshold: 0.5 }
    }
}

impl Policy for ReflexPolicy {
    fn name(&self) -> &str {
        "reflex"
    }

    fn act(&mut self, obs: &[f32]) -> TickInput {
        let n = obs.len();
        if n < 4 {
            return TickInput::default();
        }

        // Straight up is at 270 degrees
        let up = (3 * n) / 4;
        let action = if obs[up] < self.threshold {
            Action::Shoot
        } else {
            Action::Noop
        };

        // Upper-right quadrant (270..360) vs upper-left (180..270)
        let right_min = obs[up..].iter().copied().fold(1.0f32, f32::min);
        let left_min = obs[n / 2..up].iter().copied().fold(1.0f32, f32::min);

        let (left, right) = if right_min.min(left_min) >= self.threshold {
            (false, false)
        } else if right_min < left_min {
            (true, false)
        } else {
            (false, true)
        };

        TickInput { action, left, right, quit: false }
    }
}

/// Why an episode stopped
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EndReason {
    Collision,
    Quit,
    StepLimit,
}

/// Outcome of a driven episode
#[derive(Debug, Clone, PartialEq)]
pub struct EpisodeSummary {
    pub policy: String,
    pub steps: u64,
    pub score: f32,
    pub reason: EndReason,
}

/// Reset, then step with `policy` until done or `max_steps`, rendering each
/// frame to `sink` if one is given.
pub fn run_episode(
    env: &mut Environment,
    policy: &mut dyn Policy,
    max_steps: u64,
    mut sink: Option<&mut dyn FrameSink>,
) -> Result<EpisodeSummary, EnvError> {
    let mut obs = env.reset();
    let mut steps = 0;
    let mut reason = EndReason::StepLimit;

    while steps < max_steps {
        let input = policy.act(&obs);
        let step = env.step(&input)?;
        steps += 1;

        if let Some(sink) = sink.as_deref_mut() {
            env.render(sink);
        }

        if step.done {
            reason = if step.info.is_none() {
                EndReason::Quit
            } else {
                EndReason::Collision
            };
            break;
        }
        obs = step.observation;
    }

    log::info!(
        "Episode with {} policy ended after {} steps: {:?}, score {:.1}",
        policy.name(),
        steps,
        reason,
        env.score()
    );

    Ok(EpisodeSummary {
        policy: policy.name().to_string(),
        steps,
        score: env.score(),
        reason,
    })
}

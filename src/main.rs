//! Asteroid Env entry point
//!
//! Headless driver: runs a few episodes with the reflex policy and reports
//! the total reward of each.
//!
//! Usage: `asteroid-env [config.json]`

use anyhow::{Context, Result};

use asteroid_env::consts::FPS;
use asteroid_env::render::LogSink;
use asteroid_env::{EnvConfig, Environment, ReflexPolicy, run_episode};

const EPISODES: u64 = 3;
/// Five minutes of play at the interactive frame rate
const MAX_STEPS: u64 = 5 * 60 * FPS as u64;

fn main() -> Result<()> {
    env_logger::init();
    log::info!("Asteroid Env (headless) starting...");

    let config = match std::env::args().nth(1) {
        Some(path) => EnvConfig::load(&path).with_context(|| format!("loading {}", path))?,
        None => EnvConfig::default(),
    };

    let seed = 0x5EED;
    let mut env = Environment::new(config, seed).context("creating environment")?;
    let mut sink = LogSink::new(FPS as u64);
    let mut policy = ReflexPolicy::default();

    for episode in 0..EPISODES {
        let summary = run_episode(&mut env, &mut policy, MAX_STEPS, Some(&mut sink))
            .with_context(|| format!("running episode {}", episode))?;
        println!(
            "Episode {}: {:?} after {} steps. Total reward: {:.1} ({:.2?} wall clock)",
            episode,
            summary.reason,
            summary.steps,
            summary.score,
            env.elapsed()
        );
    }

    env.close(&mut sink);
    Ok(())
}

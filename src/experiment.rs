use rand::SeedableRng;
use rand::rngs::StdRng;
use std::path::Path;

use crate::config::Config;
use crate::domain::clock::SimulationClock;
use crate::domain::ledger::ResourceLedger;
use crate::embedder::get_embedder;
use crate::error::Result;
use crate::generator::{VnrGenerator, generate_substrate};
use crate::stats::RunRecorder;

/// Aggregated outcome of one experiment run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ExperimentSummary {
    pub steps: u64,
    pub arrivals: u64,
    pub accepted: u64,
    pub total_reward: f64,
}

impl ExperimentSummary {
    pub fn acceptance_rate(&self) -> f64 {
        if self.arrivals == 0 { 0.0 } else { self.accepted as f64 / self.arrivals as f64 }
    }
}

/// Builds the simulation from a validated configuration and drives it
/// for `max_steps` ticks, optionally recording one CSV row per tick.
///
/// One experiment seed fans out into independent RNG streams per
/// component, so reproducibility does not depend on call interleaving.
pub fn run(config: &Config, log_path: Option<&Path>) -> Result<ExperimentSummary> {
    config.validate()?;

    let seed = config.experiment.seed;

    let mut substrate_rng = StdRng::seed_from_u64(seed);
    let substrate = generate_substrate(&config.substrate, &mut substrate_rng);
    let ledger = ResourceLedger::new(substrate);

    let embedder = get_embedder(&config.experiment.embedder, seed.wrapping_add(1))?;
    log::info!("Running experiment with embedder '{}' for {} steps (seed {}).", embedder.name(), config.experiment.max_steps, seed);

    let provider = Box::new(VnrGenerator::new(config.vnr.clone(), StdRng::seed_from_u64(seed.wrapping_add(2))));

    let mut clock = SimulationClock::new(ledger, embedder, provider, config.experiment.arrival_rate, StdRng::seed_from_u64(seed.wrapping_add(3)))?;
    clock.start();

    let mut recorder = match log_path {
        Some(path) => Some(RunRecorder::to_file(path)?),
        None => None,
    };

    let mut total_reward = 0.0;

    for _ in 0..config.experiment.max_steps {
        let result = clock.tick();
        total_reward += result.reward;

        if let Some(recorder) = recorder.as_mut() {
            recorder.record(&result)?;
        }
    }

    if let Some(recorder) = recorder.as_mut() {
        recorder.flush()?;
    }

    let summary = ExperimentSummary {
        steps: config.experiment.max_steps,
        arrivals: clock.total_arrivals(),
        accepted: clock.accepted(),
        total_reward,
    };

    log::info!(
        "Experiment finished: {} arrivals, {} accepted (rate {:.2}), total reward {:.1}.",
        summary.arrivals,
        summary.accepted,
        summary.acceptance_rate(),
        summary.total_reward
    );

    Ok(summary)
}

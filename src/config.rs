use serde::Deserialize;
use std::path::Path;

use crate::error::{Error, Result};
use crate::loader::parser::parse_json_file;

/// Parameters for the random substrate network.
#[derive(Debug, Clone, Deserialize)]
pub struct SubstrateConfig {
    pub num_nodes: usize,
    pub edge_prob: f64,

    /// Inclusive `[min, max]` range for node CPU capacities.
    pub cpu_range: [i64; 2],

    /// Inclusive `[min, max]` range for link bandwidth capacities.
    pub bandwidth_range: [i64; 2],
}

/// Parameters for generated virtual network requests.
#[derive(Debug, Clone, Deserialize)]
pub struct VnrConfig {
    pub num_nodes: usize,
    pub edge_prob: f64,
    pub cpu_range: [i64; 2],
    pub bandwidth_range: [i64; 2],

    /// Inclusive `[min, max]` range for how many ticks a request holds
    /// its resources after admission.
    pub duration_range: [i64; 2],
}

#[derive(Debug, Clone, Deserialize)]
pub struct ExperimentConfig {
    /// Embedding strategy name, resolved through `embedder::get_embedder`.
    pub embedder: String,

    /// Rate of the Poisson arrival process (arrivals per tick).
    pub arrival_rate: f64,

    pub max_steps: u64,
    pub seed: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub substrate: SubstrateConfig,
    pub vnr: VnrConfig,
    pub experiment: ExperimentConfig,
}

impl Config {
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = parse_json_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects malformed configurations at startup. Embedder names are
    /// validated separately by the strategy factory.
    pub fn validate(&self) -> Result<()> {
        if self.substrate.num_nodes == 0 {
            return Err(Error::ConfigurationError("substrate.num_nodes must be at least 1".to_string()));
        }

        if self.vnr.num_nodes == 0 {
            return Err(Error::ConfigurationError("vnr.num_nodes must be at least 1".to_string()));
        }

        check_probability("substrate.edge_prob", self.substrate.edge_prob)?;
        check_probability("vnr.edge_prob", self.vnr.edge_prob)?;

        if self.vnr.num_nodes > 1 && self.vnr.edge_prob <= 0.0 {
            return Err(Error::ConfigurationError(
                "vnr.edge_prob must be positive for multi-node requests, otherwise no connected topology can be drawn".to_string(),
            ));
        }

        check_range("substrate.cpu_range", self.substrate.cpu_range)?;
        check_range("substrate.bandwidth_range", self.substrate.bandwidth_range)?;
        check_range("vnr.cpu_range", self.vnr.cpu_range)?;
        check_range("vnr.bandwidth_range", self.vnr.bandwidth_range)?;
        check_range("vnr.duration_range", self.vnr.duration_range)?;

        if self.vnr.duration_range[0] < 1 {
            return Err(Error::ConfigurationError("vnr.duration_range must start at 1 or above".to_string()));
        }

        if !(self.experiment.arrival_rate > 0.0) || !self.experiment.arrival_rate.is_finite() {
            return Err(Error::ConfigurationError(format!(
                "experiment.arrival_rate must be a positive finite rate, got {}",
                self.experiment.arrival_rate
            )));
        }

        Ok(())
    }
}

fn check_range(name: &str, range: [i64; 2]) -> Result<()> {
    if range[0] > range[1] {
        return Err(Error::ConfigurationError(format!("{} is malformed: min {} exceeds max {}", name, range[0], range[1])));
    }

    if range[0] < 0 {
        return Err(Error::ConfigurationError(format!("{} must not contain negative values, got min {}", name, range[0])));
    }

    Ok(())
}

fn check_probability(name: &str, p: f64) -> Result<()> {
    if !(0.0..=1.0).contains(&p) {
        return Err(Error::ConfigurationError(format!("{} must lie in [0, 1], got {}", name, p)));
    }
    Ok(())
}

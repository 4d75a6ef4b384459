use clap::Parser;
use std::path::PathBuf;

use vne_sim::config::Config;
use vne_sim::{experiment, logger};

/// Run a virtual network embedding experiment.
#[derive(Parser, Debug)]
#[command(name = "vne_sim", about = "Online virtual network embedding simulator")]
struct Cli {
    /// Path to the experiment configuration file.
    #[arg(long, default_value = "config/default.json")]
    config: PathBuf,

    /// Optional CSV file receiving one row per tick.
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() {
    logger::init();

    let cli = Cli::parse();

    let config = match Config::from_file(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            log::error!("Failed to load configuration from '{}': {}", cli.config.display(), e);
            std::process::exit(1);
        }
    };

    match experiment::run(&config, cli.output.as_deref()) {
        Ok(summary) => {
            println!("--- Experiment Summary ---");
            println!("Total reward: {}", summary.total_reward);
            println!("Accepted VNRs: {}/{}", summary.accepted, summary.arrivals);
            println!("Acceptance rate: {:.2}", summary.acceptance_rate());
        }
        Err(e) => {
            log::error!("Experiment failed: {}", e);
            std::process::exit(1);
        }
    }
}

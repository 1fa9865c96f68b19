//! Headless trainer: runs generations and keeps the best network on disk.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use roadevo::simulation::params::Settings;
use roadevo::simulation::storage::JsonFileStore;
use roadevo::simulation::world::World;
use tracing::info;

#[derive(Parser, Debug)]
#[command(
    name = "roadevo",
    version,
    about = "Train self-driving cars by mutating the best network of each generation"
)]
struct Cli {
    /// Settings file; defaults are used when omitted.
    #[arg(long)]
    settings: Option<PathBuf>,
    /// File the best network is loaded from and saved to.
    #[arg(long, default_value = "best_brain.json")]
    brain: PathBuf,
    /// Number of generations to run.
    #[arg(long, default_value_t = 10)]
    generations: u64,
    /// Tick budget per generation.
    #[arg(long, default_value_t = 2000)]
    ticks: u64,
    /// Overrides the seed from the settings file.
    #[arg(long)]
    seed: Option<u64>,
}

fn main() -> Result<()> {
    init_tracing();
    let cli = Cli::parse();

    let mut settings = match &cli.settings {
        Some(path) => Settings::load_from_file(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => Settings::default(),
    };
    if let Some(seed) = cli.seed {
        settings.seed = seed;
    }

    let mut store = JsonFileStore::new(&cli.brain);
    let mut world = World::new(settings, &mut store).context("building world")?;

    for _ in 0..cli.generations {
        let summary = world.run(cli.ticks);
        info!(
            generation = summary.generation,
            ticks = summary.ticks,
            survivors = summary.survivors,
            agents = summary.agents,
            best_progress = summary.best_progress,
            "Generation finished"
        );
        world
            .save_leader(&mut store)
            .with_context(|| format!("saving brain to {}", store.path().display()))?;
        world.reset(&mut store).context("starting next generation")?;
    }

    Ok(())
}

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();
}

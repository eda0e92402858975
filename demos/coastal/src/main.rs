//! coastal: run one tsunami evacuation scenario end to end.
//!
//! With a data directory, loads `roads.geojson`, `buildings.geojson` and
//! `evac.geojson` from it (plus an inundation layer if the config selects
//! polygon hazard mode).  Without one, runs a built-in synthetic town.
//!
//! ```text
//! coastal ./data --config sim.toml --population-limit 500 --out output/run1
//! RUST_LOG=ev_sim=debug coastal
//! ```

mod synthetic;

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ev_core::SimConfig;
use ev_hazard::HazardModel;
use ev_io::{load_config, load_hazard, load_scenario};
use ev_output::{CsvWriter, SimOutputObserver};
use ev_sim::SimBuilder;
use ev_spatial::DijkstraRouter;

#[derive(Parser)]
#[command(name = "coastal", about = "Pedestrian tsunami evacuation simulation")]
struct Cli {
    /// Scenario data directory.  Omit to run the synthetic town.
    data_dir: Option<PathBuf>,

    /// TOML config; every field is optional.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Stop after this many steps even if evacuees are still moving.
    #[arg(long, default_value_t = 3_600)]
    max_steps: u64,

    /// Cap on spawned evacuees (0 means no cap).
    #[arg(long)]
    population_limit: Option<usize>,

    /// Agent snapshot interval in ticks (0 disables snapshots).
    #[arg(long, default_value_t = 30)]
    snapshot_every: u64,

    /// Output directory for the CSV files.
    #[arg(long, default_value = "output/coastal")]
    out: PathBuf,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => SimConfig::default(),
    };

    let (inputs, hazard) = match &cli.data_dir {
        Some(dir) => {
            let inputs = load_scenario(dir)
                .with_context(|| format!("loading scenario from {}", dir.display()))?;
            let hazard = load_hazard(&config, dir)?;
            (inputs, hazard)
        }
        None => {
            info!("no data directory given; running the synthetic town");
            if cli.config.is_none() {
                config.hazard = synthetic::hazard();
            }
            let hazard = HazardModel::from_config(&config.hazard)?;
            (synthetic::scenario(), hazard)
        }
    };

    let mut sim = SimBuilder::new(config, DijkstraRouter)
        .roads(inputs.roads)
        .buildings(inputs.buildings)
        .shelters(inputs.shelters)
        .hazard(hazard)
        .population_limit(cli.population_limit)
        .build()?;

    std::fs::create_dir_all(&cli.out)
        .with_context(|| format!("creating {}", cli.out.display()))?;
    let mut obs = SimOutputObserver::new(CsvWriter::new(&cli.out)?, cli.snapshot_every);

    let t0 = Instant::now();
    let steps = sim.run_until_settled(cli.max_steps, &mut obs);
    let elapsed = t0.elapsed();

    if let Some(e) = obs.take_error() {
        eprintln!("output error: {e}");
    }

    let stats = sim.stats();
    println!("Simulated {steps} steps ({}) in {:.3} s", sim.clock, elapsed.as_secs_f64());
    println!(
        "  population {}  safe {}  overtaken {}  stuck {}  still evacuating {}",
        stats.population,
        stats.counts.safe,
        stats.counts.overtaken,
        stats.counts.stuck,
        stats.counts.evacuating,
    );
    println!();
    println!("{:<20} {:>10} {:>10}", "Shelter", "Occupants", "Capacity");
    println!("{}", "-".repeat(42));
    for s in &stats.shelters {
        println!("{:<20} {:>10} {:>10}", s.name, s.occupants, s.capacity);
    }
    println!();
    println!("Output written to {}", cli.out.display());

    Ok(())
}

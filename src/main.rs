mod cli;
mod logging;

use std::collections::HashSet;

use clap::Parser;
use grain_sim::simulation::initial_field_seed;
use grain_sim::{init, run_partitioned, LocalGrid, ReseedMode, SlabDecomposition, UpdateConfig};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;
use tracing::{debug, info};

use crate::cli::Cli;

fn main() {
    if let Err(e) = run() {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let cli = Cli::parse();
    logging::setup_logging(cli.verbose);
    debug!("parsed arguments: {cli:?}");

    if let Some(n) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(n)
            .build_global()
            .map_err(|e| format!("{e}"))?;
    }

    let mut config = UpdateConfig::new(cli.dim, cli.steps, cli.seed);
    config.reseed = ReseedMode::try_from(cli.reseed.as_str())?;
    config.sequential = cli.sequential;

    let (lower, upper) = init::default_domain(cli.dim).map_err(|e| e.to_string())?;
    let mut grid = LocalGrid::new(lower, upper, 0).map_err(|e| e.to_string())?;
    let mut rng = Xoshiro256StarStar::seed_from_u64(initial_field_seed(&config));
    init::random_grains(&mut grid, cli.grains, &mut rng).map_err(|e| e.to_string())?;
    let initial_grains = count_labels(&grid);

    let mut decomp =
        SlabDecomposition::from_global(&grid, cli.workers).map_err(|e| e.to_string())?;
    info!(
        shape = ?decomp.global.shape,
        workers = cli.workers,
        "domain decomposed"
    );

    let pb = ProgressBar::new(cli.steps as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{msg} [{bar:40}] {pos}/{len} [{elapsed_precise} < {eta_precise}, {per_sec}]",
        )
        .map_err(|e| e.to_string())?
        .progress_chars("=> "),
    );
    pb.set_message("steps");

    let counters = run_partitioned(&mut decomp, &config, &|| pb.inc(1)).map_err(|e| e.to_string())?;
    pb.finish_and_clear();

    let final_grains = count_labels(&decomp.gather());
    println!(
        "draws {}  accepted {}  rejected {}  interior {}  gated {}  unchanged {}  retries {}",
        counters.draws,
        counters.accepted,
        counters.rejected,
        counters.interior,
        counters.gated,
        counters.unchanged,
        counters.retries,
    );
    println!("grain labels: {initial_grains} -> {final_grains}");
    Ok(())
}

fn count_labels(grid: &LocalGrid) -> usize {
    grid.spins.iter().collect::<HashSet<_>>().len()
}

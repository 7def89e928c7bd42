use clap::Parser;

/// Parallel Potts-model Monte Carlo grain growth in a temperature gradient.
#[derive(Parser, Debug)]
#[command(version, about)]
pub struct Cli {
    /// Lattice dimensionality (1, 2 or 3).
    #[arg(short, long, default_value_t = 2)]
    pub dim: usize,

    /// Number of Monte Carlo steps.
    #[arg(short, long, default_value_t = 100)]
    pub steps: usize,

    /// Base seed; worker `w` uses `seed + w`.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,

    /// Number of slab workers along axis 0.
    #[arg(short, long, default_value_t = 1)]
    pub workers: usize,

    /// Number of distinct grain labels in the random initial field.
    #[arg(short, long, default_value_t = 20, value_parser = clap::value_parser!(i32).range(1..))]
    pub grains: i32,

    /// Generator reseed cadence: 'per-run' or 'per-step'.
    #[arg(long, default_value = "per-run")]
    pub reseed: String,

    /// Run workers on the calling thread instead of the rayon pool.
    #[arg(long)]
    pub sequential: bool,

    /// Size of the rayon thread pool. Defaults to the number of logical cores.
    #[arg(short = 'j', long, value_name = "NUM")]
    pub threads: Option<usize>,

    /// Increase verbosity level (-v for INFO, -vv for DEBUG, -vvv for TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

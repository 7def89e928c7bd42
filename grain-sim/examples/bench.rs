use std::time::Instant;

use grain_sim::{init, run_partitioned, LocalGrid, SlabDecomposition, UpdateConfig};
use rand::SeedableRng;
use rand_xoshiro::Xoshiro256StarStar;

const L: usize = 96;
const N_GRAINS: i32 = 20;
const N_STEPS: usize = 20;
const N_WORKERS: usize = 8;

fn main() {
    let mut grid = LocalGrid::from_shape(&[L, L, L], 0).unwrap();
    let mut rng = Xoshiro256StarStar::seed_from_u64(42);
    init::random_grains(&mut grid, N_GRAINS, &mut rng).unwrap();
    let mut decomp = SlabDecomposition::from_global(&grid, N_WORKERS).unwrap();

    let config = UpdateConfig::new(3, N_STEPS, 42);

    println!(
        "Lattice: {L}x{L}x{L}  |  Grains: {N_GRAINS}  |  Workers: {N_WORKERS}  |  Steps: {N_STEPS}"
    );
    println!("{}", "-".repeat(70));

    let t0 = Instant::now();
    let counters = run_partitioned(&mut decomp, &config, &|| {}).unwrap();
    let elapsed = t0.elapsed().as_secs_f64();

    let per_step = elapsed / N_STEPS as f64 * 1000.0;
    println!("Total: {:.3} s  |  {:.3} ms/step", elapsed, per_step);
    println!(
        "Accepted {} of {} draws ({} interior, {} gated)",
        counters.accepted, counters.draws, counters.interior, counters.gated
    );
}

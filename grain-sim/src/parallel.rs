use rand_xoshiro::Xoshiro256StarStar;
use rayon::prelude::*;

use crate::grid::Subdomain;
use crate::mcmc::{GrainUpdater, UpdateCounters};

/// Dispatch a per-worker closure over every subdomain, optionally in parallel.
///
/// Each worker gets its own subdomain, updater and RNG, so tasks never share
/// mutable state. Returns the summed counters; the call returns only after all
/// workers are done, which is the barrier before the next exchange.
///
/// When `sequential` is true, workers run on the current thread in order.
pub fn par_over_workers(
    subdomains: &mut [Subdomain],
    updaters: &mut [GrainUpdater],
    rngs: &mut [Xoshiro256StarStar],
    sequential: bool,
    body: impl Fn(&mut Subdomain, &mut GrainUpdater, &mut Xoshiro256StarStar) -> UpdateCounters
        + Send
        + Sync,
) -> UpdateCounters {
    debug_assert_eq!(subdomains.len(), updaters.len());
    debug_assert_eq!(subdomains.len(), rngs.len());

    if sequential {
        let mut total = UpdateCounters::default();
        for ((sub, up), rng) in subdomains.iter_mut().zip(updaters).zip(rngs) {
            total += body(sub, up, rng);
        }
        total
    } else {
        subdomains
            .par_iter_mut()
            .zip(updaters.par_iter_mut())
            .zip(rngs.par_iter_mut())
            .map(|((sub, up), rng)| body(sub, up, rng))
            .reduce(UpdateCounters::default, |mut a, b| {
                a += b;
                a
            })
    }
}

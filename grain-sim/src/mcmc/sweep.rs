use std::ops::AddAssign;

use rand::Rng;

use super::checkerboard::Checkerboard;
use super::kinetics::Kinetics;
use super::neighborhood::{NeighborSpins, Neighborhood};
use crate::config::KineticsParams;
use crate::grid::SpinGrid;

/// Outcome tallies of the draws performed by one or more color passes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UpdateCounters {
    /// Draw slots consumed; equals the partitioner's per-color counts.
    pub draws: u64,
    /// Block draws landing outside the local domain (slot not consumed).
    pub retries: u64,
    /// Slots discarded by the temperature gate.
    pub gated: u64,
    /// Slots whose site was inside a grain.
    pub interior: u64,
    /// Slots whose candidate equalled the current spin.
    pub unchanged: u64,
    pub accepted: u64,
    pub rejected: u64,
}

impl AddAssign for UpdateCounters {
    fn add_assign(&mut self, o: Self) {
        self.draws += o.draws;
        self.retries += o.retries;
        self.gated += o.gated;
        self.interior += o.interior;
        self.unchanged += o.unchanged;
        self.accepted += o.accepted;
        self.rejected += o.rejected;
    }
}

/// Per-worker update state: the checkerboard of the local domain plus reusable
/// neighbor buffers. Built once per run; the local domain never resizes.
#[derive(Debug, Clone)]
pub struct GrainUpdater {
    pub checkerboard: Checkerboard,
    pub kinetics: Kinetics,
    neighborhood: Neighborhood,
    neighbors: NeighborSpins,
    site: Vec<isize>,
}

impl GrainUpdater {
    pub fn new<G: SpinGrid + ?Sized>(grid: &G, params: KineticsParams) -> Self {
        let n_dims = grid.n_dims();
        Self {
            checkerboard: Checkerboard::for_grid(grid),
            kinetics: Kinetics::for_grid(params, grid),
            neighborhood: Neighborhood::new(n_dims),
            neighbors: NeighborSpins::default(),
            site: vec![0; n_dims],
        }
    }

    pub fn n_colors(&self) -> usize {
        self.checkerboard.n_colors()
    }

    /// Perform exactly `sites_per_color[color]` draws of `color`.
    ///
    /// A block whose color member falls outside the local domain is redrawn
    /// without consuming the slot. Gate rejections, interior sites and
    /// rejected flips all consume their slot.
    #[cfg_attr(feature = "profile", inline(never))]
    pub fn sweep_color<G: SpinGrid + ?Sized, R: Rng>(
        &mut self,
        grid: &mut G,
        color: usize,
        rng: &mut R,
    ) -> UpdateCounters {
        let mut counters = UpdateCounters::default();
        let n_blocks = self.checkerboard.n_blocks;

        for _ in 0..self.checkerboard.sites_per_color[color] {
            counters.draws += 1;
            loop {
                let block = rng.gen_range(0..n_blocks);
                if self.checkerboard.site_into(block, color, &mut self.site) {
                    break;
                }
                counters.retries += 1;
            }
            self.attempt(grid, rng, &mut counters);
        }
        counters
    }

    /// Process the site currently held in `self.site`.
    fn attempt<G: SpinGrid + ?Sized, R: Rng>(
        &mut self,
        grid: &mut G,
        rng: &mut R,
        counters: &mut UpdateCounters,
    ) {
        if !self.kinetics.admit(&self.site, rng) {
            counters.gated += 1;
            return;
        }

        let current = grid.read_spin(&self.site);
        self.neighborhood
            .gather(&*grid, &self.site, current, &mut self.neighbors);
        if self.neighbors.is_interior() {
            counters.interior += 1;
            return;
        }

        let candidate = self.neighbors.spins[rng.gen_range(0..self.neighbors.spins.len())];
        if candidate == current {
            counters.unchanged += 1;
            return;
        }

        let d_e = self.neighbors.energy_change(candidate);
        if self.kinetics.accept(d_e, rng) {
            grid.write_spin(&self.site, candidate);
            counters.accepted += 1;
        } else {
            counters.rejected += 1;
        }
    }
}

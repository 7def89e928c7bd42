use crate::geometry::moore;
use crate::grid::{Spin, SpinGrid};

/// Moore neighborhood with non-periodic global boundaries.
#[derive(Debug, Clone)]
pub struct Neighborhood {
    offsets: Vec<Vec<isize>>,
    scratch: Vec<isize>,
}

/// Spins of the in-domain neighbors of one site, gathered once and reused for
/// both the interior test and every energy evaluation of that draw.
#[derive(Debug, Clone, Default)]
pub struct NeighborSpins {
    pub center: Spin,
    pub spins: Vec<Spin>,
    pub n_same: usize,
}

impl Neighborhood {
    pub fn new(n_dims: usize) -> Self {
        Self {
            offsets: moore(n_dims),
            scratch: vec![0; n_dims],
        }
    }

    /// Fill `out` with the spins of every neighbor of `site` inside the global
    /// domain. Out-of-domain neighbors are skipped, never wrapped.
    pub fn gather<G: SpinGrid + ?Sized>(
        &mut self,
        grid: &G,
        site: &[isize],
        center: Spin,
        out: &mut NeighborSpins,
    ) {
        out.center = center;
        out.spins.clear();
        out.n_same = 0;

        'offsets: for off in &self.offsets {
            for (d, (&x, &o)) in site.iter().zip(off).enumerate() {
                let r = x + o;
                if r < grid.global_lower(d) || r >= grid.global_upper(d) {
                    continue 'offsets;
                }
                self.scratch[d] = r;
            }
            let spin = grid.read_spin(&self.scratch);
            if spin == center {
                out.n_same += 1;
            }
            out.spins.push(spin);
        }
    }
}

impl NeighborSpins {
    /// Every in-domain neighbor shares the center spin. Also true for a site
    /// with no in-domain neighbors at all.
    #[inline]
    pub fn is_interior(&self) -> bool {
        self.n_same == self.spins.len()
    }

    /// Potts energy change of relabelling the center from its current spin to
    /// `candidate`: each neighbor adds `0.5 * ([s != candidate] - [s != center])`.
    pub fn energy_change(&self, candidate: Spin) -> f64 {
        self.spins
            .iter()
            .map(|&s| 0.5 * ((s != candidate) as i32 - (s != self.center) as i32) as f64)
            .sum()
    }
}

use super::local::checked_domain;
use super::{BoundaryExchange, LocalGrid, Spin, SpinGrid};
use crate::error::{GrainError, Result};
use crate::geometry::Domain;

/// One worker's slab of the global lattice along axis 0.
///
/// Storage covers the owned slab plus one ghost plane on each side along
/// axis 0, so every Moore neighbor of an owned site is readable locally.
/// Ghost planes that fall outside the global domain are never read.
#[derive(Debug, Clone)]
pub struct Subdomain {
    global: Domain,
    owned: Domain,
    padded: Domain,
    spins: Vec<Spin>,
}

impl Subdomain {
    fn new(global: &Domain, lo: isize, hi: isize, fill: Spin) -> Self {
        let mut owned_lower = global.lower.clone();
        let mut owned_upper = global.upper.clone();
        owned_lower[0] = lo;
        owned_upper[0] = hi;

        let mut padded_lower = owned_lower.clone();
        let mut padded_upper = owned_upper.clone();
        padded_lower[0] -= 1;
        padded_upper[0] += 1;

        let padded = Domain::new(padded_lower, padded_upper);
        let spins = vec![fill; padded.n_sites];
        Self {
            global: global.clone(),
            owned: Domain::new(owned_lower, owned_upper),
            padded,
            spins,
        }
    }

    /// Owned sites.
    pub fn owned(&self) -> &Domain {
        &self.owned
    }

    fn plane_range(&self, x0: isize) -> std::ops::Range<usize> {
        let stride = self.padded.strides[0];
        let start = (x0 - self.padded.lower[0]) as usize * stride;
        start..start + stride
    }

    fn plane(&self, x0: isize) -> &[Spin] {
        &self.spins[self.plane_range(x0)]
    }

    fn plane_mut(&mut self, x0: isize) -> &mut [Spin] {
        let r = self.plane_range(x0);
        &mut self.spins[r]
    }

    fn first(&self) -> isize {
        self.owned.lower[0]
    }

    fn last(&self) -> isize {
        self.owned.upper[0] - 1
    }
}

impl SpinGrid for Subdomain {
    fn n_dims(&self) -> usize {
        self.global.n_dims
    }

    fn site_count(&self) -> usize {
        self.owned.n_sites
    }

    fn coordinate_of(&self, index: usize) -> Vec<isize> {
        self.owned.coordinate_of(index)
    }

    fn local_lower(&self, axis: usize) -> isize {
        self.owned.lower[axis]
    }

    fn local_upper(&self, axis: usize) -> isize {
        self.owned.upper[axis]
    }

    fn global_lower(&self, axis: usize) -> isize {
        self.global.lower[axis]
    }

    fn global_upper(&self, axis: usize) -> isize {
        self.global.upper[axis]
    }

    #[inline]
    fn read_spin(&self, site: &[isize]) -> Spin {
        self.spins[self.padded.index_of(site)]
    }

    #[inline]
    fn write_spin(&mut self, site: &[isize], spin: Spin) {
        debug_assert!(self.owned.contains(site), "write to unowned site {site:?}");
        let i = self.padded.index_of(site);
        self.spins[i] = spin;
    }
}

/// In-process distributed grid: the global box cut into contiguous slabs
/// along axis 0, one [`Subdomain`] per worker. No periodic wrap between the
/// first and last slab.
#[derive(Debug, Clone)]
pub struct SlabDecomposition {
    pub global: Domain,
    pub subdomains: Vec<Subdomain>,
}

impl SlabDecomposition {
    /// Split `[lower, upper)` into `n_workers` slabs whose axis-0 lengths
    /// differ by at most one.
    pub fn new(lower: Vec<isize>, upper: Vec<isize>, n_workers: usize, fill: Spin) -> Result<Self> {
        let global = checked_domain(lower, upper)?;
        let extent = global.shape[0];
        if n_workers == 0 || n_workers > extent {
            return Err(GrainError::InvalidDomain(format!(
                "cannot split axis-0 extent {extent} across {n_workers} workers"
            )));
        }

        let base = extent / n_workers;
        let rem = extent % n_workers;
        let mut subdomains = Vec::with_capacity(n_workers);
        let mut lo = global.lower[0];
        for w in 0..n_workers {
            let len = (base + usize::from(w < rem)) as isize;
            subdomains.push(Subdomain::new(&global, lo, lo + len, fill));
            lo += len;
        }

        Ok(Self { global, subdomains })
    }

    /// Distribute a fully-populated global grid, ghosts included.
    pub fn from_global(grid: &LocalGrid, n_workers: usize) -> Result<Self> {
        let dom = &grid.domain;
        let mut decomp = Self::new(dom.lower.clone(), dom.upper.clone(), n_workers, 0)?;
        let stride = dom.strides[0];
        for sub in decomp.subdomains.iter_mut() {
            let lo = (sub.first() - 1).max(dom.lower[0]);
            let hi = (sub.last() + 1).min(dom.upper[0] - 1);
            for x0 in lo..=hi {
                let start = (x0 - dom.lower[0]) as usize * stride;
                sub.plane_mut(x0)
                    .copy_from_slice(&grid.spins[start..start + stride]);
            }
        }
        Ok(decomp)
    }

    /// Reassemble the owned sites of every worker into one global grid.
    pub fn gather(&self) -> LocalGrid {
        let dom = &self.global;
        let stride = dom.strides[0];
        let mut spins = vec![0; dom.n_sites];
        for sub in &self.subdomains {
            for x0 in sub.first()..=sub.last() {
                let start = (x0 - dom.lower[0]) as usize * stride;
                spins[start..start + stride].copy_from_slice(sub.plane(x0));
            }
        }
        LocalGrid {
            domain: dom.clone(),
            spins,
        }
    }

    /// Refresh every ghost plane regardless of color.
    pub fn exchange_all(&mut self) {
        self.exchange_planes(|_| true);
    }

    fn exchange_planes(&mut self, wanted: impl Fn(isize) -> bool) {
        for k in 1..self.subdomains.len() {
            let (left, right) = self.subdomains.split_at_mut(k);
            let l = &mut left[k - 1];
            let r = &mut right[0];

            let edge = l.last();
            if wanted(edge) {
                r.plane_mut(edge).copy_from_slice(l.plane(edge));
            }
            let edge = r.first();
            if wanted(edge) {
                l.plane_mut(edge).copy_from_slice(r.plane(edge));
            }
        }
    }
}

/// Only planes whose axis-0 parity matches the color's axis-0 offset can
/// have changed during that color, so only those are copied.
impl BoundaryExchange for SlabDecomposition {
    fn exchange_boundaries(&mut self, color: usize) {
        let n_dims = self.global.n_dims;
        let parity = ((color >> (n_dims - 1)) & 1) as isize;
        self.exchange_planes(|x0| x0.rem_euclid(2) == parity);
    }
}

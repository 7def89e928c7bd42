use super::{BoundaryExchange, Spin, SpinGrid};
use crate::error::{GrainError, Result};
use crate::geometry::Domain;

/// Dense single-worker grid: the worker owns the whole global domain.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalGrid {
    pub domain: Domain,
    pub spins: Vec<Spin>,
}

impl LocalGrid {
    /// Grid over `[lower, upper)` with every spin set to `fill`.
    pub fn new(lower: Vec<isize>, upper: Vec<isize>, fill: Spin) -> Result<Self> {
        let domain = checked_domain(lower, upper)?;
        let spins = vec![fill; domain.n_sites];
        Ok(Self { domain, spins })
    }

    /// Grid over `[0, shape)`.
    pub fn from_shape(shape: &[usize], fill: Spin) -> Result<Self> {
        Self::new(
            vec![0; shape.len()],
            shape.iter().map(|&s| s as isize).collect(),
            fill,
        )
    }
}

/// Box `[lower, upper)` with at least one site along every axis.
pub(crate) fn checked_domain(lower: Vec<isize>, upper: Vec<isize>) -> Result<Domain> {
    if lower.len() != upper.len() || lower.is_empty() {
        return Err(GrainError::InvalidDomain(format!(
            "bounds have mismatched or zero length ({} vs {})",
            lower.len(),
            upper.len()
        )));
    }
    if let Some(d) = (0..lower.len()).find(|&d| upper[d] <= lower[d]) {
        return Err(GrainError::InvalidDomain(format!(
            "axis {d}: upper {} <= lower {}",
            upper[d], lower[d]
        )));
    }
    Ok(Domain::new(lower, upper))
}

impl SpinGrid for LocalGrid {
    fn n_dims(&self) -> usize {
        self.domain.n_dims
    }

    fn site_count(&self) -> usize {
        self.domain.n_sites
    }

    fn coordinate_of(&self, index: usize) -> Vec<isize> {
        self.domain.coordinate_of(index)
    }

    fn local_lower(&self, axis: usize) -> isize {
        self.domain.lower[axis]
    }

    fn local_upper(&self, axis: usize) -> isize {
        self.domain.upper[axis]
    }

    fn global_lower(&self, axis: usize) -> isize {
        self.domain.lower[axis]
    }

    fn global_upper(&self, axis: usize) -> isize {
        self.domain.upper[axis]
    }

    #[inline]
    fn read_spin(&self, site: &[isize]) -> Spin {
        self.spins[self.domain.index_of(site)]
    }

    #[inline]
    fn write_spin(&mut self, site: &[isize], spin: Spin) {
        let i = self.domain.index_of(site);
        self.spins[i] = spin;
    }
}

/// No ghosts to refresh on a single worker.
impl BoundaryExchange for LocalGrid {
    fn exchange_boundaries(&mut self, _color: usize) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_read_write_roundtrip() {
        let mut g = LocalGrid::new(vec![-2, 3], vec![2, 6], 0).unwrap();
        assert_eq!(g.site_count(), 12);
        g.write_spin(&[1, 5], 9);
        assert_eq!(g.read_spin(&[1, 5]), 9);
        assert_eq!(g.spins.iter().filter(|&&s| s == 9).count(), 1);
    }

    #[test]
    fn test_local_equals_global_bounds() {
        let g = LocalGrid::from_shape(&[4, 6, 8], 1).unwrap();
        for d in 0..3 {
            assert_eq!(g.local_lower(d), g.global_lower(d));
            assert_eq!(g.local_upper(d), g.global_upper(d));
        }
        assert_eq!(g.coordinate_of(g.site_count() - 1), vec![3, 5, 7]);
    }

    #[test]
    fn test_rejects_empty_axis() {
        assert!(matches!(
            LocalGrid::new(vec![0, 5], vec![4, 5], 0),
            Err(GrainError::InvalidDomain(_))
        ));
        assert!(LocalGrid::new(vec![], vec![], 0).is_err());
    }
}

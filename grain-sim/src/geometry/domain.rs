/// Axis-aligned box of lattice sites `[lower, upper)` with row-major indexing.
///
/// Axis 0 is the slowest-varying axis, so a fixed axis-0 coordinate selects a
/// contiguous run of `strides[0]` sites.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Domain {
    /// Inclusive lower corner.
    pub lower: Vec<isize>,
    /// Exclusive upper corner.
    pub upper: Vec<isize>,
    /// Extent along each axis (`upper - lower`).
    pub shape: Vec<usize>,
    /// Row-major strides: `strides[d] = product of shape[d+1..]`.
    pub strides: Vec<usize>,
    /// Total number of sites.
    pub n_sites: usize,
    pub n_dims: usize,
}

impl Domain {
    /// Build a box from per-axis bounds. Callers guarantee `lower[d] < upper[d]`.
    pub fn new(lower: Vec<isize>, upper: Vec<isize>) -> Self {
        let n_dims = lower.len();
        debug_assert_eq!(upper.len(), n_dims);

        let shape: Vec<usize> = lower
            .iter()
            .zip(&upper)
            .map(|(&lo, &hi)| (hi - lo).max(0) as usize)
            .collect();
        let n_sites: usize = shape.iter().product();

        let mut strides = vec![1usize; n_dims];
        for d in (0..n_dims.saturating_sub(1)).rev() {
            strides[d] = strides[d + 1] * shape[d + 1];
        }

        Self {
            lower,
            upper,
            shape,
            strides,
            n_sites,
            n_dims,
        }
    }

    /// Box `[0, shape)`.
    pub fn from_shape(shape: &[usize]) -> Self {
        Self::new(
            vec![0; shape.len()],
            shape.iter().map(|&s| s as isize).collect(),
        )
    }

    /// Whether `site` lies in `[lower, upper)` on every axis.
    #[inline]
    pub fn contains(&self, site: &[isize]) -> bool {
        site.iter()
            .zip(self.lower.iter().zip(&self.upper))
            .all(|(&x, (&lo, &hi))| x >= lo && x < hi)
    }

    /// Row-major linear index of `site`. The site must be inside the box.
    #[inline]
    pub fn index_of(&self, site: &[isize]) -> usize {
        debug_assert!(self.contains(site), "site {site:?} outside {self:?}");
        site.iter()
            .zip(&self.lower)
            .zip(&self.strides)
            .map(|((&x, &lo), &s)| (x - lo) as usize * s)
            .sum()
    }

    /// Coordinate of linear index `idx`.
    pub fn coordinate_of(&self, idx: usize) -> Vec<isize> {
        (0..self.n_dims)
            .map(|d| self.lower[d] + ((idx / self.strides[d]) % self.shape[d]) as isize)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_2d_indexing() {
        // 3x4 box shifted to start at (1, -2)
        let dom = Domain::new(vec![1, -2], vec![4, 2]);
        assert_eq!(dom.shape, vec![3, 4]);
        assert_eq!(dom.n_sites, 12);
        assert_eq!(dom.strides, vec![4, 1]);

        assert_eq!(dom.index_of(&[1, -2]), 0);
        assert_eq!(dom.index_of(&[1, -1]), 1);
        assert_eq!(dom.index_of(&[2, -2]), 4);
        assert_eq!(dom.coordinate_of(11), vec![3, 1]);
    }

    #[test]
    fn test_3d_strides() {
        let dom = Domain::from_shape(&[2, 3, 4]);
        assert_eq!(dom.n_sites, 24);
        assert_eq!(dom.strides, vec![12, 4, 1]);
        assert_eq!(dom.index_of(&[1, 0, 0]), 12);
        assert_eq!(dom.index_of(&[0, 1, 0]), 4);
        assert_eq!(dom.index_of(&[0, 0, 1]), 1);
    }

    #[test]
    fn test_index_coordinate_inverse() {
        let dom = Domain::new(vec![-3, 5, 0], vec![2, 8, 2]);
        for i in 0..dom.n_sites {
            let x = dom.coordinate_of(i);
            assert!(dom.contains(&x));
            assert_eq!(dom.index_of(&x), i);
        }
    }

    #[test]
    fn test_contains_is_half_open() {
        let dom = Domain::from_shape(&[4, 4]);
        assert!(dom.contains(&[0, 3]));
        assert!(!dom.contains(&[4, 0]));
        assert!(!dom.contains(&[0, -1]));
    }
}

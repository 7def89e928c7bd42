//! Initial spin fields.

use rand::Rng;

use crate::error::{GrainError, Result};
use crate::grid::{Spin, SpinGrid};

/// Standard global domains: `[0,128)` in 1D, `64x64` in 2D, `32x32x32` in 3D.
pub fn default_domain(n_dims: usize) -> Result<(Vec<isize>, Vec<isize>)> {
    let size = match n_dims {
        1 => 128,
        2 => 64,
        3 => 32,
        _ => {
            return Err(GrainError::InvalidDomain(format!(
                "no default domain for {n_dims} dimensions"
            )))
        }
    };
    Ok((vec![0; n_dims], vec![size; n_dims]))
}

/// Assign every owned site a uniform label in `0..n_grains`.
pub fn random_grains<G: SpinGrid + ?Sized, R: Rng>(
    grid: &mut G,
    n_grains: Spin,
    rng: &mut R,
) -> Result<()> {
    if n_grains <= 0 {
        return Err(GrainError::InvalidConfig(format!(
            "n_grains must be >= 1, got {n_grains}"
        )));
    }
    for i in 0..grid.site_count() {
        let x = grid.coordinate_of(i);
        grid.write_spin(&x, rng.gen_range(0..n_grains));
    }
    Ok(())
}

/// Three bands along axis 0: `3` below 32, `2` above 96, `0` in between.
pub fn banded<G: SpinGrid + ?Sized>(grid: &mut G) {
    for i in 0..grid.site_count() {
        let x = grid.coordinate_of(i);
        let spin = if x[0] < 32 {
            3
        } else if x[0] > 96 {
            2
        } else {
            0
        };
        grid.write_spin(&x, spin);
    }
}

/// Two grains split along `axis`: `below` for coordinates `< at`, `above` otherwise.
pub fn split<G: SpinGrid + ?Sized>(grid: &mut G, axis: usize, at: isize, below: Spin, above: Spin) {
    for i in 0..grid.site_count() {
        let x = grid.coordinate_of(i);
        grid.write_spin(&x, if x[axis] < at { below } else { above });
    }
}

use rand::Rng;

use crate::config::KineticsParams;
use crate::grid::SpinGrid;

/// Temperature gradient, Arrhenius site selection and Metropolis flip rule.
#[derive(Debug, Clone)]
pub struct Kinetics {
    params: KineticsParams,
    axis_lower: f64,
    axis_extent: f64,
    /// `exp(-Q / (R T_ref))`, the normalisation of the selection probability.
    ref_rate: f64,
    /// `k_B * flip_temperature`.
    kt: f64,
}

impl Kinetics {
    /// Gradient along `params.gradient_axis` spanning `[lower, upper)`.
    pub fn new(params: KineticsParams, lower: isize, upper: isize) -> Self {
        let ref_rate = (-params.activation_energy / (params.gas_constant * params.t_ref)).exp();
        let kt = params.boltzmann * params.flip_temperature;
        Self {
            axis_lower: lower as f64,
            axis_extent: (upper - lower) as f64,
            ref_rate,
            kt,
            params,
        }
    }

    pub fn for_grid<G: SpinGrid + ?Sized>(params: KineticsParams, grid: &G) -> Self {
        let axis = params.gradient_axis;
        Self::new(params, grid.global_lower(axis), grid.global_upper(axis))
    }

    /// Linear temperature at `site`: `t_low` at the lower global bound, rising
    /// by `delta_t` over the full extent of the gradient axis.
    #[inline]
    pub fn temperature(&self, site: &[isize]) -> f64 {
        let x = site[self.params.gradient_axis] as f64;
        self.params.t_low + self.params.delta_t * (x - self.axis_lower) / self.axis_extent
    }

    /// `exp(-Q/(R T)) / exp(-Q/(R T_ref))`.
    #[inline]
    pub fn selection_probability(&self, temperature: f64) -> f64 {
        (-self.params.activation_energy / (self.params.gas_constant * temperature)).exp()
            / self.ref_rate
    }

    /// Draw once and decide whether the candidate site is processed at all.
    #[inline]
    pub fn admit<R: Rng>(&self, site: &[isize], rng: &mut R) -> bool {
        let p = self.selection_probability(self.temperature(site));
        rng.gen::<f64>() <= p
    }

    /// Metropolis decision at the fixed flip temperature. Never draws for
    /// `d_e <= 0`.
    #[inline]
    pub fn accept<R: Rng>(&self, d_e: f64, rng: &mut R) -> bool {
        if d_e <= 0.0 {
            return true;
        }
        rng.gen::<f64>() < (-d_e / self.kt).exp()
    }

    pub fn params(&self) -> &KineticsParams {
        &self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    fn kinetics() -> Kinetics {
        Kinetics::new(KineticsParams::default(), 0, 64)
    }

    #[test]
    fn test_temperature_endpoints() {
        let k = kinetics();
        assert_eq!(k.temperature(&[0, 17]), 673.0);
        let top = k.temperature(&[63, 0]);
        assert!((top - (723.0 - 50.0 / 64.0)).abs() < 1e-9);
    }

    #[test]
    fn test_temperature_monotone_and_uniform_off_axis() {
        let k = kinetics();
        let mut prev = f64::NEG_INFINITY;
        for x in 0..64 {
            let t = k.temperature(&[x, 0]);
            assert!(t > prev);
            assert_eq!(t, k.temperature(&[x, 40]));
            prev = t;
        }
    }

    #[test]
    fn test_selection_probability() {
        let k = kinetics();
        assert!((k.selection_probability(723.0) - 1.0).abs() < 1e-12);
        let cold = k.selection_probability(673.0);
        assert!(cold > 0.0 && cold < 1.0);
        // exp(-Q/R * (1/673 - 1/723))
        let expected = (-1.0e5_f64 / 8.314 * (1.0 / 673.0 - 1.0 / 723.0)).exp();
        assert!((cold - expected).abs() < 1e-12);
    }

    #[test]
    fn test_accept_downhill_consumes_no_randomness() {
        let k = kinetics();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        let mut reference = rng.clone();
        assert!(k.accept(0.0, &mut rng));
        assert!(k.accept(-2.5, &mut rng));
        assert_eq!(rng.gen::<u64>(), reference.gen::<u64>());
    }

    #[test]
    fn test_accept_uphill_is_frozen_at_flip_temperature() {
        // k_B * 273 is ~4e-21, so any half-bond increase is rejected
        let k = kinetics();
        let mut rng = Xoshiro256StarStar::seed_from_u64(3);
        assert!((0..1000).all(|_| !k.accept(0.5, &mut rng)));
    }

    #[test]
    fn test_admit_always_at_reference_temperature() {
        let params = KineticsParams {
            t_low: 723.0,
            delta_t: 0.0,
            ..KineticsParams::default()
        };
        let k = Kinetics::new(params, 0, 10);
        let mut rng = Xoshiro256StarStar::seed_from_u64(11);
        assert!((0..1000).all(|_| k.admit(&[4], &mut rng)));
    }

    #[test]
    fn test_admit_rate_tracks_probability() {
        let k = kinetics();
        let mut rng = Xoshiro256StarStar::seed_from_u64(5);
        let p = k.selection_probability(673.0);
        let n = 200_000;
        let hits = (0..n).filter(|_| k.admit(&[0, 0], &mut rng)).count();
        assert!(((hits as f64 / n as f64) - p).abs() < 0.01);
    }
}

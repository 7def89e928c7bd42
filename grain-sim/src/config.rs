use validator::{Validate, ValidationError};

/// How often each worker's generator is re-seeded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ReseedMode {
    /// Seed once before the first step.
    #[default]
    PerRun,
    /// Re-seed at the start of every step from `(seed, step, worker)`.
    PerStep,
}

impl TryFrom<&str> for ReseedMode {
    type Error = String;
    fn try_from(s: &str) -> Result<Self, Self::Error> {
        match s {
            "per-run" | "run" => Ok(Self::PerRun),
            "per-step" | "step" => Ok(Self::PerStep),
            _ => Err(format!(
                "unknown reseed mode '{s}', expected 'per-run' or 'per-step'"
            )),
        }
    }
}

fn validate_kinetics(p: &KineticsParams) -> Result<(), ValidationError> {
    if p.t_low <= 0.0 || p.t_low + p.delta_t <= 0.0 {
        return Err(ValidationError::new(
            "temperature field must stay positive across the domain",
        ));
    }
    if p.t_ref <= 0.0 || p.flip_temperature <= 0.0 {
        return Err(ValidationError::new(
            "reference and flip temperatures must be positive",
        ));
    }
    if p.gas_constant <= 0.0 || p.boltzmann <= 0.0 {
        return Err(ValidationError::new("R and k_B must be positive"));
    }
    Ok(())
}

/// Constants of the temperature gradient, site-selection and flip rules.
///
/// Site selection uses the position-dependent `T`; the flip decision uses the
/// fixed `flip_temperature`. The two are never merged.
#[derive(Debug, Clone, PartialEq, Validate)]
#[validate(schema(function = "validate_kinetics"))]
pub struct KineticsParams {
    /// Temperature at the lower global bound of `gradient_axis` (K).
    pub t_low: f64,
    /// Temperature rise across the full extent of `gradient_axis` (K).
    pub delta_t: f64,
    /// Activation energy `Q` (J/mol).
    pub activation_energy: f64,
    /// Gas constant `R` (J/(mol K)).
    pub gas_constant: f64,
    /// Temperature at which the selection probability is 1 (K).
    pub t_ref: f64,
    /// Boltzmann constant used in the flip rule (J/K).
    pub boltzmann: f64,
    /// Fixed temperature of the flip rule (K).
    pub flip_temperature: f64,
    pub gradient_axis: usize,
}

impl Default for KineticsParams {
    fn default() -> Self {
        Self {
            t_low: 673.0,
            delta_t: 50.0,
            activation_energy: 1.0e5,
            gas_constant: 8.314,
            t_ref: 723.0,
            boltzmann: 1.3803288e-23,
            flip_temperature: 273.0,
            gradient_axis: 0,
        }
    }
}

fn validate_update_config(cfg: &UpdateConfig) -> Result<(), ValidationError> {
    if cfg.kinetics.gradient_axis >= cfg.n_dims {
        return Err(ValidationError::new(
            "kinetics gradient_axis must be < n_dims",
        ));
    }
    Ok(())
}

#[derive(Debug, Clone, Validate)]
#[validate(schema(function = "validate_update_config"))]
pub struct UpdateConfig {
    #[validate(range(min = 1, max = 3))]
    pub n_dims: usize,
    /// Number of Monte Carlo steps; zero leaves the field untouched.
    pub steps: usize,
    pub seed: u64,
    pub reseed: ReseedMode,
    #[validate]
    pub kinetics: KineticsParams,
    /// Run partitioned workers on the calling thread instead of the rayon pool.
    pub sequential: bool,
}

impl UpdateConfig {
    pub fn new(n_dims: usize, steps: usize, seed: u64) -> Self {
        Self {
            n_dims,
            steps,
            seed,
            reseed: ReseedMode::PerRun,
            kinetics: KineticsParams::default(),
            sequential: false,
        }
    }
}

//! Optimizer configuration
//!
//! Gantree: L4_Interp → InterpConfig
//!
//! Settings for the depth-incremental optimizer and its BFGS runs.

use qsim_core::{numerics, qaoa, QsimError, QsimResult, Representation};
use qsim_noise::{ChannelSpec, NoiseSchedule};
use serde::{Deserialize, Serialize};
use std::fmt;

/// BFGS settings
/// Gantree: BfgsConfig // BFGS 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BfgsConfig {
    /// Stop when the gradient infinity norm falls below this
    pub gtol: f64,

    /// Iteration cap; `None` means 200 per parameter
    pub max_iter: Option<usize>,

    /// Sufficient-decrease constant
    pub c1: f64,

    /// Curvature constant
    pub c2: f64,

    /// Objective evaluations per line search
    pub max_line_search_evals: usize,
}

impl Default for BfgsConfig {
    fn default() -> Self {
        Self {
            gtol: numerics::BFGS_GTOL,
            max_iter: None,
            c1: numerics::WOLFE_C1,
            c2: numerics::WOLFE_C2,
            max_line_search_evals: numerics::LINE_SEARCH_MAX_EVALS,
        }
    }
}

impl BfgsConfig {
    /// Set gradient tolerance
    pub fn with_gtol(mut self, gtol: f64) -> Self {
        self.gtol = gtol;
        self
    }

    /// Set iteration cap
    pub fn with_max_iter(mut self, max_iter: usize) -> Self {
        self.max_iter = Some(max_iter);
        self
    }

    /// Iteration cap for `n` parameters
    pub fn max_iter_for(&self, n: usize) -> usize {
        self.max_iter.unwrap_or(numerics::BFGS_ITER_PER_PARAM * n)
    }

    /// Validate settings
    pub fn validate(&self) -> QsimResult<()> {
        if self.gtol.is_nan() || self.gtol <= 0.0 {
            return Err(QsimError::config(format!("gtol must be > 0, got {}", self.gtol)));
        }
        if !(0.0 < self.c1 && self.c1 < self.c2 && self.c2 < 1.0) {
            return Err(QsimError::config(format!(
                "line search needs 0 < c1 < c2 < 1, got c1={} c2={}",
                self.c1, self.c2
            )));
        }
        if self.max_line_search_evals == 0 {
            return Err(QsimError::config("max_line_search_evals must be > 0"));
        }
        Ok(())
    }
}

/// Depth-incremental optimizer settings
/// Gantree: InterpConfig // 설정
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InterpConfig {
    /// Deepest circuit to optimize
    /// Gantree: p_max: usize // 최대 깊이
    pub p_max: usize,

    /// Starting point `[γ, β]` at p = 1; skips the randomized trials
    pub param_guess_at_p1: Option<[f64; 2]>,

    /// Minimizer runs at p = 1 without a guess (fixed default + random)
    pub num_p1_trials: usize,

    /// Random seed
    /// Gantree: seed: Option<u64> // 시드
    pub seed: Option<u64>,

    /// Print one progress line per depth
    pub verbose: bool,

    /// Simulate the Z2-reduced register (ket only)
    pub z2_symmetric: bool,

    /// Ket or density matrix
    pub representation: Representation,

    /// Channel after every cost unitary (density matrix only)
    pub noise_after_cost: Option<ChannelSpec>,

    /// Channel after every mixer unitary (density matrix only)
    pub noise_after_mixer: Option<ChannelSpec>,

    /// Minimizer settings
    pub bfgs: BfgsConfig,
}

impl Default for InterpConfig {
    fn default() -> Self {
        Self {
            p_max: qaoa::DEFAULT_P_MAX,
            param_guess_at_p1: None,
            num_p1_trials: qaoa::NUM_P1_TRIALS,
            seed: None,
            verbose: false,
            z2_symmetric: true,
            representation: Representation::Ket,
            noise_after_cost: None,
            noise_after_mixer: None,
            bfgs: BfgsConfig::default(),
        }
    }
}

impl InterpConfig {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Default settings up to depth `p_max`
    pub fn new(p_max: usize) -> Self {
        Self {
            p_max,
            ..Self::default()
        }
    }

    /// Noisy density-matrix settings with depolarizing noise after both
    /// unitaries
    pub fn depolarizing(p_max: usize, p: f64) -> Self {
        Self::new(p_max)
            .with_representation(Representation::DensityMatrix)
            .with_z2_symmetric(false)
            .with_noise(
                Some(ChannelSpec::Depolarizing { p }),
                Some(ChannelSpec::Depolarizing { p }),
            )
    }

    /// Parse from JSON
    pub fn from_json(json: &str) -> QsimResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to JSON
    pub fn to_json(&self) -> QsimResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set maximum depth
    /// Gantree: with_p_max(self,p) -> Self // 깊이 설정
    pub fn with_p_max(mut self, p_max: usize) -> Self {
        self.p_max = p_max;
        self
    }

    /// Set the p = 1 starting point
    pub fn with_param_guess(mut self, gamma: f64, beta: f64) -> Self {
        self.param_guess_at_p1 = Some([gamma, beta]);
        self
    }

    /// Set number of p = 1 trials
    pub fn with_num_p1_trials(mut self, trials: usize) -> Self {
        self.num_p1_trials = trials;
        self
    }

    /// Set seed
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Enable verbose output
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Enable/disable Z2 reduction
    pub fn with_z2_symmetric(mut self, enabled: bool) -> Self {
        self.z2_symmetric = enabled;
        self
    }

    /// Set representation
    pub fn with_representation(mut self, representation: Representation) -> Self {
        self.representation = representation;
        self
    }

    /// Set channels after the cost and mixer unitaries
    pub fn with_noise(
        mut self,
        after_cost: Option<ChannelSpec>,
        after_mixer: Option<ChannelSpec>,
    ) -> Self {
        self.noise_after_cost = after_cost;
        self.noise_after_mixer = after_mixer;
        self
    }

    /// Set BFGS settings
    pub fn with_bfgs(mut self, bfgs: BfgsConfig) -> Self {
        self.bfgs = bfgs;
        self
    }

    // ========================================================================
    // Derived Values
    // ========================================================================

    /// Build the noise schedule
    pub fn noise_schedule(&self) -> QsimResult<NoiseSchedule> {
        NoiseSchedule::from_specs(self.noise_after_cost, self.noise_after_mixer)
    }

    /// Check if any channel is configured
    pub fn is_noisy(&self) -> bool {
        self.noise_after_cost.is_some() || self.noise_after_mixer.is_some()
    }

    // ========================================================================
    // Validation
    // ========================================================================

    /// Validate configuration
    /// Gantree: validate(&self) -> Result // 검증
    pub fn validate(&self) -> QsimResult<()> {
        if self.p_max == 0 {
            return Err(QsimError::config("p_max must be >= 1"));
        }

        if self.param_guess_at_p1.is_none() && self.num_p1_trials == 0 {
            return Err(QsimError::config(
                "num_p1_trials must be >= 1 without a p = 1 guess",
            ));
        }

        if let Some(guess) = self.param_guess_at_p1 {
            if guess.iter().any(|x| !x.is_finite()) {
                return Err(QsimError::InvalidParameters(format!(
                    "p = 1 guess must be finite, got {:?}",
                    guess
                )));
            }
        }

        if self.representation.is_ket() && self.is_noisy() {
            return Err(QsimError::config(
                "noise channels require the density-matrix representation",
            ));
        }

        if self.z2_symmetric && !self.representation.is_ket() {
            return Err(QsimError::config(
                "Z2 reduction is only supported for the ket representation",
            ));
        }

        self.bfgs.validate()
    }
}

impl fmt::Display for InterpConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "InterpConfig(p_max={}, {}, z2={}, trials={}, noisy={})",
            self.p_max,
            self.representation,
            self.z2_symmetric,
            self.num_p1_trials,
            self.is_noisy()
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

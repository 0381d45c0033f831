//! Constants for QSIM
//!
//! Gantree: L0_Foundation → Constants
//!
//! QAOA landscape periods, optimizer defaults and numerical tolerances.

// ============================================================================
// QAOA Constants
// Gantree: qaoa // QAOA 상수
// ============================================================================

pub mod qaoa {
    //! QAOA parameter-space constants
    //! Based on the interpolation heuristic of arXiv:1812.01041

    use std::f64::consts::{FRAC_PI_2, FRAC_PI_8, PI};

    /// Period of the cost angle γ for integer edge weights
    pub const GAMMA_PERIOD: f64 = PI;

    /// Period of the mixer angle β (X^{⊗N} commutes with H_C)
    pub const BETA_PERIOD: f64 = FRAC_PI_2;

    /// Reduced γ period when every node has even degree (unit weights)
    pub const GAMMA_PERIOD_EVEN_DEGREE: f64 = FRAC_PI_2;

    /// Default first guess at p = 1: γ = π/8
    pub const DEFAULT_GAMMA_GUESS: f64 = FRAC_PI_8;

    /// Default first guess at p = 1: β = -π/8
    pub const DEFAULT_BETA_GUESS: f64 = -FRAC_PI_8;

    /// Upper bound for randomized γ guesses at p = 1
    pub const RANDOM_GAMMA_SPAN: f64 = FRAC_PI_2;

    /// Number of minimizer runs at p = 1 without a caller guess
    /// (fixed default + 9 randomized)
    pub const NUM_P1_TRIALS: usize = 10;

    /// Default maximum depth
    pub const DEFAULT_P_MAX: usize = 10;
}

// ============================================================================
// Numerical Constants
// Gantree: numerics // 수치 상수
// ============================================================================

pub mod numerics {
    //! Tolerances used by state validation and the minimizer

    /// Tolerance for norm / trace / hermiticity checks
    pub const STATE_TOLERANCE: f64 = 1e-10;

    /// BFGS gradient-norm tolerance (infinity norm)
    pub const BFGS_GTOL: f64 = 1e-5;

    /// BFGS iterations per parameter
    pub const BFGS_ITER_PER_PARAM: usize = 200;

    /// Armijo constant of the Wolfe line search
    pub const WOLFE_C1: f64 = 1e-4;

    /// Curvature constant of the Wolfe line search
    pub const WOLFE_C2: f64 = 0.9;

    /// Maximum function evaluations per line search
    pub const LINE_SEARCH_MAX_EVALS: usize = 30;
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::PI;

    #[test]
    fn test_periods() {
        assert_eq!(qaoa::GAMMA_PERIOD, PI);
        assert_eq!(qaoa::BETA_PERIOD, PI / 2.0);
        assert_eq!(qaoa::GAMMA_PERIOD_EVEN_DEGREE, qaoa::GAMMA_PERIOD / 2.0);
    }

    #[test]
    fn test_default_guess() {
        assert!(qaoa::DEFAULT_GAMMA_GUESS > 0.0);
        assert_eq!(qaoa::DEFAULT_BETA_GUESS, -qaoa::DEFAULT_GAMMA_GUESS);
        assert_eq!(qaoa::NUM_P1_TRIALS, 10);
    }

    #[test]
    fn test_wolfe_constants() {
        assert!(0.0 < numerics::WOLFE_C1 && numerics::WOLFE_C1 < numerics::WOLFE_C2);
        assert!(numerics::WOLFE_C2 < 1.0);
    }
}

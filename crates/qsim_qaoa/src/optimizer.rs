//! Depth-incremental optimizer
//!
//! Gantree: L4_Interp → InterpOptimizer
//!
//! Optimizes `F_p` for `p = 1..=p_max`. Depth 1 starts from the caller's
//! guess or from the best of several BFGS runs; every later depth starts
//! from the interpolated, gauge-fixed optimum of the previous one.

use crate::config::InterpConfig;
use crate::gauge::{fix_param_gauge, GaugeSymmetry};
use crate::hamiltonian::CostHamiltonian;
use crate::interp::interp_seed;
use crate::minimize::bfgs;
use crate::simulate::{split_params, QaoaSimulator};
use qsim_core::{qaoa, Graph, NodeId, QsimError, QsimResult, QubitId};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::io::{self, Write};
use std::time::Instant;

/// Optimum at one depth
/// Gantree: OptimizationResult // 깊이별 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizationResult {
    /// Circuit depth
    pub p: usize,

    /// Achieved `⟨H_C⟩`
    pub f_val: f64,

    /// Cost angles
    pub gammas: Vec<f64>,

    /// Mixer angles
    pub betas: Vec<f64>,

    /// Lowest cost over all basis states
    pub min_c: f64,

    /// Highest cost over all basis states
    pub max_c: f64,

    /// Objective evaluations spent at this depth
    pub nfev: usize,

    /// Minimizer reached its gradient tolerance
    pub converged: bool,
}

impl OptimizationResult {
    /// `(f_val - max_c) / (min_c - max_c)`, 1 at the ground state
    pub fn approximation_ratio(&self) -> f64 {
        let span = self.min_c - self.max_c;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        (self.f_val - self.max_c) / span
    }

    /// Parameters as `[γ.., β..]`
    pub fn params(&self) -> Vec<f64> {
        self.gammas.iter().chain(&self.betas).copied().collect()
    }
}

impl fmt::Display for OptimizationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "p={}: F={:.6} (min {}, max {}), ratio={:.4}",
            self.p,
            self.f_val,
            self.min_c,
            self.max_c,
            self.approximation_ratio()
        )
    }
}

/// Depth-incremental QAOA optimizer
/// Gantree: InterpOptimizer // 보간 최적화기
#[derive(Debug)]
pub struct InterpOptimizer {
    /// Configuration
    config: InterpConfig,

    /// Cost and gradient engine
    simulator: QaoaSimulator,

    /// Gauge symmetries of the problem
    symmetry: GaugeSymmetry,

    /// Random generator for the depth-1 trials
    rng: ChaCha8Rng,
}

impl InterpOptimizer {
    // ========================================================================
    // Constructor
    // ========================================================================

    /// Create an optimizer for `graph`
    /// Gantree: new(graph,map,config) -> Result<Self> // 생성
    pub fn new(
        graph: &Graph,
        index_map: Option<&HashMap<NodeId, QubitId>>,
        config: InterpConfig,
    ) -> QsimResult<Self> {
        config.validate()?;

        let hamiltonian = if config.z2_symmetric {
            CostHamiltonian::from_graph_z2(graph, index_map)?
        } else {
            CostHamiltonian::from_graph(graph, index_map)?
        };
        let simulator =
            QaoaSimulator::new(hamiltonian, config.representation, config.noise_schedule()?)?;

        let rng = match config.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };

        Ok(Self {
            config,
            simulator,
            symmetry: GaugeSymmetry::from_graph(graph),
            rng,
        })
    }

    /// Configuration
    pub fn config(&self) -> &InterpConfig {
        &self.config
    }

    /// Underlying simulator
    pub fn simulator(&self) -> &QaoaSimulator {
        &self.simulator
    }

    /// Gauge symmetries used between depths
    pub fn symmetry(&self) -> &GaugeSymmetry {
        &self.symmetry
    }

    // ========================================================================
    // Single Depth
    // ========================================================================

    /// One BFGS run at depth `p` from `guess` (`[γ.., β..]`, raw result)
    /// Gantree: optimize_fixed_depth(p,guess) -> OptimizationResult // 단일 깊이
    pub fn optimize_fixed_depth(&self, p: usize, guess: &[f64]) -> QsimResult<OptimizationResult> {
        if p == 0 || guess.len() != 2 * p {
            return Err(QsimError::InvalidParameters(format!(
                "depth {} needs {} parameters, got {}",
                p,
                2 * p,
                guess.len()
            )));
        }

        let minimized = bfgs(
            |x| self.simulator.evaluate_with_gradient(x),
            guess,
            &self.config.bfgs,
        )?;
        log::debug!(
            "p={} BFGS from {:?}: F={:.6}, nfev={}, {}",
            p,
            guess,
            minimized.fun,
            minimized.nfev,
            minimized.status
        );

        let (gammas, betas) = split_params(&minimized.x)?;
        let hamiltonian = self.simulator.hamiltonian();
        Ok(OptimizationResult {
            p,
            f_val: minimized.fun,
            gammas: gammas.to_vec(),
            betas: betas.to_vec(),
            min_c: hamiltonian.min_cost(),
            max_c: hamiltonian.max_cost(),
            nfev: minimized.nfev,
            converged: minimized.converged(),
        })
    }

    /// Depth 1: the caller's guess, or the best of the default and random guesses
    fn optimize_depth_one(&mut self) -> QsimResult<OptimizationResult> {
        if let Some([gamma, beta]) = self.config.param_guess_at_p1 {
            return self.optimize_fixed_depth(1, &[gamma, beta]);
        }

        let mut best: Option<OptimizationResult> = None;
        let mut nfev = 0;
        for trial in 0..self.config.num_p1_trials {
            let guess = if trial == 0 {
                [qaoa::DEFAULT_GAMMA_GUESS, qaoa::DEFAULT_BETA_GUESS]
            } else {
                [
                    self.rng.gen::<f64>() * qaoa::RANDOM_GAMMA_SPAN,
                    qaoa::DEFAULT_BETA_GUESS,
                ]
            };

            let result = self.optimize_fixed_depth(1, &guess)?;
            log::debug!("p=1 trial {}: F={:.6}", trial, result.f_val);
            nfev += result.nfev;

            if best.as_ref().map_or(true, |b| result.f_val < b.f_val) {
                best = Some(result);
            }
        }

        let mut best = best.ok_or_else(|| QsimError::InternalError("no p = 1 trials ran".into()))?;
        best.nfev = nfev;
        Ok(best)
    }

    // ========================================================================
    // Main Loop
    // ========================================================================

    /// Optimize every depth up to `p_max`; progress goes to stdout if verbose
    /// Gantree: run(&mut) -> BTreeMap<p,OptimizationResult> // 전체 실행
    pub fn run(&mut self) -> QsimResult<BTreeMap<usize, OptimizationResult>> {
        let stdout = io::stdout();
        let mut out = stdout.lock();
        self.run_with_output(&mut out)
    }

    /// Optimize every depth up to `p_max`; progress goes to `out` if verbose
    pub fn run_with_output<W: Write>(
        &mut self,
        out: &mut W,
    ) -> QsimResult<BTreeMap<usize, OptimizationResult>> {
        let mut results = BTreeMap::new();
        let mut previous: Option<Vec<f64>> = None;

        for p in 1..=self.config.p_max {
            let start = Instant::now();

            let mut result = match &previous {
                None => self.optimize_depth_one()?,
                Some(prev) => {
                    let seed = interp_seed(prev)?;
                    self.optimize_fixed_depth(p, &seed)?
                }
            };

            let fixed = fix_param_gauge(&result.params(), &self.symmetry)?;
            let (gammas, betas) = split_params(&fixed)?;
            result.gammas = gammas.to_vec();
            result.betas = betas.to_vec();

            let elapsed = start.elapsed().as_secs_f64();
            log::info!(
                "p={} F={:.6} ratio={:.4} nfev={} converged={} ({:.2}s)",
                p,
                result.f_val,
                result.approximation_ratio(),
                result.nfev,
                result.converged,
                elapsed
            );
            if self.config.verbose {
                writeln!(
                    out,
                    "-- p={}, F = {:.3} / {}, nfev={}, time={:.2}s",
                    p, result.f_val, result.min_c, result.nfev, elapsed
                )?;
            }

            previous = Some(fixed);
            results.insert(p, result);
        }

        Ok(results)
    }
}

/// Run the depth-incremental optimizer once
/// Gantree: find_parameters_interp(graph,map,config) -> BTreeMap // 단축 실행
pub fn find_parameters_interp(
    graph: &Graph,
    index_map: Option<&HashMap<NodeId, QubitId>>,
    config: InterpConfig,
) -> QsimResult<BTreeMap<usize, OptimizationResult>> {
    InterpOptimizer::new(graph, index_map, config)?.run()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_graphs::six_node_graph;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_fixed_depth_reaches_stationary_point() {
        let optimizer =
            InterpOptimizer::new(&six_node_graph(), None, InterpConfig::new(1)).unwrap();
        let result = optimizer.optimize_fixed_depth(1, &[0.4, -0.4]).unwrap();

        assert!(result.converged);
        assert!(result.f_val < optimizer.simulator().evaluate(&[0.4, -0.4]).unwrap());
        let (_, grad) = optimizer
            .simulator()
            .evaluate_with_gradient(&result.params())
            .unwrap();
        assert!(grad.iter().all(|g| g.abs() < 1e-3));
    }

    #[test]
    fn test_fixed_depth_rejects_bad_guess() {
        let optimizer =
            InterpOptimizer::new(&six_node_graph(), None, InterpConfig::new(2)).unwrap();
        assert!(optimizer.optimize_fixed_depth(2, &[0.1, 0.2]).is_err());
        assert!(optimizer.optimize_fixed_depth(0, &[]).is_err());
    }

    #[test]
    fn test_monotone_in_depth() {
        let config = InterpConfig::new(3).with_seed(42);
        let mut optimizer = InterpOptimizer::new(&six_node_graph(), None, config).unwrap();
        let results = optimizer.run_with_output(&mut io::sink()).unwrap();

        assert_eq!(results.keys().copied().collect::<Vec<_>>(), vec![1, 2, 3]);
        for p in 2..=3 {
            assert!(results[&p].f_val <= results[&(p - 1)].f_val + 1e-4);
        }
        for (p, result) in &results {
            assert_eq!(result.gammas.len(), *p);
            assert_eq!(result.betas.len(), *p);
            assert_eq!(result.min_c, -5.0);
            assert_eq!(result.max_c, 9.0);
            assert!(result.f_val >= result.min_c - 1e-9);
        }
    }

    #[test]
    fn test_returned_params_reproduce_cost() {
        let config = InterpConfig::new(2).with_seed(1);
        let mut optimizer = InterpOptimizer::new(&six_node_graph(), None, config).unwrap();
        let results = optimizer.run_with_output(&mut io::sink()).unwrap();

        for result in results.values() {
            let params = result.params();
            let refixed = fix_param_gauge(&params, optimizer.symmetry()).unwrap();
            for (x, y) in refixed.iter().zip(&params) {
                assert_abs_diff_eq!(*x, *y, epsilon = 1e-9);
            }
            assert_abs_diff_eq!(
                optimizer.simulator().evaluate(&params).unwrap(),
                result.f_val,
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn test_best_of_trials_not_worse_than_default() {
        let graph = six_node_graph();
        let trials = InterpOptimizer::new(&graph, None, InterpConfig::new(1).with_seed(9))
            .unwrap()
            .run_with_output(&mut io::sink())
            .unwrap();
        let single = InterpOptimizer::new(
            &graph,
            None,
            InterpConfig::new(1).with_num_p1_trials(1),
        )
        .unwrap()
        .run_with_output(&mut io::sink())
        .unwrap();

        assert!(trials[&1].f_val <= single[&1].f_val + 1e-12);
        assert!(trials[&1].nfev >= single[&1].nfev);
    }

    #[test]
    fn test_guess_skips_trials() {
        let config = InterpConfig::new(1).with_param_guess(0.5, -0.3);
        let optimizer = InterpOptimizer::new(&six_node_graph(), None, config).unwrap();
        let direct = optimizer.optimize_fixed_depth(1, &[0.5, -0.3]).unwrap();

        let mut optimizer = optimizer;
        let results = optimizer.run_with_output(&mut io::sink()).unwrap();
        assert_eq!(results[&1].nfev, direct.nfev);
        assert_abs_diff_eq!(results[&1].f_val, direct.f_val, epsilon = 1e-12);
    }

    #[test]
    fn test_verbose_output_format() {
        let config = InterpConfig::new(2)
            .with_param_guess(0.5, -0.3)
            .with_verbose(true);
        let mut optimizer = InterpOptimizer::new(&six_node_graph(), None, config).unwrap();
        let mut buffer = Vec::new();
        let results = optimizer.run_with_output(&mut buffer).unwrap();

        let text = String::from_utf8(buffer).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        let expected = format!(
            "-- p=1, F = {:.3} / -5, nfev={}, time=",
            results[&1].f_val, results[&1].nfev
        );
        assert!(lines[0].starts_with(&expected));
        assert!(lines[1].starts_with("-- p=2, F = "));
        assert!(lines[1].ends_with('s'));
    }

    #[test]
    fn test_quiet_by_default() {
        let config = InterpConfig::new(1).with_param_guess(0.5, -0.3);
        let mut optimizer = InterpOptimizer::new(&six_node_graph(), None, config).unwrap();
        let mut buffer = Vec::new();
        optimizer.run_with_output(&mut buffer).unwrap();
        assert!(buffer.is_empty());
    }

    #[test]
    fn test_density_matrix_matches_ket() {
        let graph = Graph::ring(4);
        let ket = InterpConfig::new(1).with_param_guess(0.5, -0.3);
        let dm = ket
            .clone()
            .with_z2_symmetric(false)
            .with_representation(qsim_core::Representation::DensityMatrix);

        let f_ket = InterpOptimizer::new(&graph, None, ket)
            .unwrap()
            .optimize_fixed_depth(1, &[0.5, -0.3])
            .unwrap()
            .f_val;
        let f_dm = InterpOptimizer::new(&graph, None, dm)
            .unwrap()
            .optimize_fixed_depth(1, &[0.5, -0.3])
            .unwrap()
            .f_val;
        assert_abs_diff_eq!(f_ket, f_dm, epsilon = 1e-8);
    }

    #[test]
    fn test_noisy_run_is_worse_than_noiseless() {
        let graph = Graph::ring(4);
        let clean = InterpOptimizer::new(
            &graph,
            None,
            InterpConfig::new(1).with_param_guess(0.5, -0.3),
        )
        .unwrap()
        .run_with_output(&mut io::sink())
        .unwrap();
        let noisy = InterpOptimizer::new(
            &graph,
            None,
            InterpConfig::depolarizing(1, 0.05).with_param_guess(0.5, -0.3),
        )
        .unwrap()
        .run_with_output(&mut io::sink())
        .unwrap();

        assert!(noisy[&1].f_val > clean[&1].f_val);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let err = InterpOptimizer::new(&six_node_graph(), None, InterpConfig::new(0)).unwrap_err();
        assert!(err.is_configuration_error());

        let optimizer =
            InterpOptimizer::new(&six_node_graph(), None, InterpConfig::new(1)).unwrap();
        assert!(format!("{:?}", optimizer).starts_with("InterpOptimizer"));
    }

    #[test]
    fn test_approximation_ratio() {
        let result = OptimizationResult {
            p: 1,
            f_val: -3.0,
            gammas: vec![0.5],
            betas: vec![-0.3],
            min_c: -5.0,
            max_c: 9.0,
            nfev: 10,
            converged: true,
        };
        assert_abs_diff_eq!(result.approximation_ratio(), 12.0 / 14.0, epsilon = 1e-12);
        assert_eq!(result.params(), vec![0.5, -0.3]);
    }
}

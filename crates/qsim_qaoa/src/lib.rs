//! # QSIM QAOA
//!
//! QAOA cost evaluation with exact gradients, and the depth-incremental
//! parameter optimizer built on top of it.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsim_qaoa // L3-L4: QAOA Engine + Optimizer (완료)
//!     L3_Qaoa // 엔진 (완료)
//!         CostHamiltonian // 대각 해밀토니안 (완료)
//!             from_graph(), from_graph_z2(), with_fields()
//!         QaoaSimulator // 시뮬레이터 (완료)
//!             evaluate(), evaluate_with_gradient(), final_state()
//!         Bfgs // 준뉴턴 최소화 (완료)
//!             bfgs(), LineSearch
//!     L4_Interp // 깊이 증가 최적화 (완료)
//!         InterpConfig // 설정 (완료)
//!         GaugeFix // 게이지 고정 (완료)
//!             GaugeSymmetry, fix_param_gauge()
//!         Interp // 보간 시드 (완료)
//!         InterpOptimizer // 최적화 루프 (완료)
//!             optimize_fixed_depth(), run(), run_with_output()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsim_qaoa::prelude::*;
//!
//! let graph = Graph::ring(4);
//! let h = CostHamiltonian::from_graph(&graph, None).unwrap();
//! let sim = QaoaSimulator::ket(h).unwrap();
//! let (f, grad) = sim.evaluate_with_gradient(&[0.4, -0.3]).unwrap();
//! assert!(f.is_finite());
//! assert_eq!(grad.len(), 2);
//!
//! let config = InterpConfig::new(2).with_seed(7);
//! let results = find_parameters_interp(&graph, None, config).unwrap();
//! assert_eq!(results.len(), 2);
//! assert!(results[&2].approximation_ratio() > 0.5);
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Cost Hamiltonian diagonal (Gantree: L3_Qaoa → CostHamiltonian)
pub mod hamiltonian;

/// Circuit evolution and gradients (Gantree: L3_Qaoa → QaoaSimulator)
pub mod simulate;

/// BFGS minimizer (Gantree: L3_Qaoa → Bfgs)
pub mod minimize;

/// Optimizer settings (Gantree: L4_Interp → InterpConfig)
pub mod config;

/// Parameter gauge fixing (Gantree: L4_Interp → GaugeFix)
pub mod gauge;

/// Depth-to-depth seeding (Gantree: L4_Interp → Interp)
pub mod interp;

/// Depth-incremental loop (Gantree: L4_Interp → InterpOptimizer)
pub mod optimizer;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::{BfgsConfig, InterpConfig};
pub use gauge::{fix_param_gauge, GaugeSymmetry};
pub use hamiltonian::CostHamiltonian;
pub use interp::interp_seed;
pub use minimize::{bfgs, MinimizeResult, MinimizeStatus};
pub use optimizer::{find_parameters_interp, InterpOptimizer, OptimizationResult};
pub use simulate::{split_params, QaoaSimulator};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qsim_qaoa::prelude::*;
    //! ```

    pub use crate::config::{BfgsConfig, InterpConfig};
    pub use crate::gauge::{fix_param_gauge, GaugeSymmetry};
    pub use crate::hamiltonian::CostHamiltonian;
    pub use crate::optimizer::{find_parameters_interp, InterpOptimizer, OptimizationResult};
    pub use crate::simulate::QaoaSimulator;
    pub use qsim_core::prelude::*;
    pub use qsim_noise::prelude::*;
}

// ============================================================================
// Shared Test Fixtures
// ============================================================================


// ============================================================================
// Integration Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::prelude::*;
    use super::test_graphs::six_node_graph;
    use approx::assert_abs_diff_eq;
    use std::collections::HashMap;

    #[test]
    fn test_reference_point_through_config() {
        // JSON config -> optimizer -> simulator
        let json = r#"{
            "p_max": 1,
            "z2_symmetric": false,
            "representation": "DensityMatrix",
            "noise_after_cost": { "kind": "depolarizing", "p": 0.001 },
            "noise_after_mixer": { "kind": "depolarizing", "p": 0.001 }
        }"#;
        let config = InterpConfig::from_json(json).unwrap();
        let optimizer = InterpOptimizer::new(&six_node_graph(), None, config).unwrap();

        let (f, grad) = optimizer
            .simulator()
            .evaluate_with_gradient(&[1.0, 0.5])
            .unwrap();
        assert_abs_diff_eq!(f, 1.8869139555669938, epsilon = 1e-8);
        assert_abs_diff_eq!(grad[0], 14.21096392, epsilon = 1e-5);
        assert_abs_diff_eq!(grad[1], -0.79246937, epsilon = 1e-5);
    }

    #[test]
    fn test_relabelled_graph_gives_same_optimum() {
        let graph = six_node_graph();
        let reversed: HashMap<NodeId, QubitId> = (0..6).map(|n| (n, 5 - n)).collect();
        let config = InterpConfig::new(1).with_param_guess(0.5, -0.3);

        let plain = find_parameters_interp(&graph, None, config.clone()).unwrap();
        let relabelled = find_parameters_interp(&graph, Some(&reversed), config).unwrap();
        assert_abs_diff_eq!(plain[&1].f_val, relabelled[&1].f_val, epsilon = 1e-9);
    }

    #[test]
    fn test_z2_and_full_register_agree() {
        let graph = six_node_graph();
        let base = InterpConfig::new(2).with_param_guess(0.5, -0.3);

        let reduced = find_parameters_interp(&graph, None, base.clone()).unwrap();
        let full = find_parameters_interp(&graph, None, base.with_z2_symmetric(false)).unwrap();
        for p in 1..=2 {
            assert_abs_diff_eq!(reduced[&p].f_val, full[&p].f_val, epsilon = 1e-7);
        }
    }

    #[test]
    fn test_final_state_of_optimum_favors_good_cuts() {
        let graph = Graph::ring(4);
        let config = InterpConfig::new(2).with_seed(3);
        let mut optimizer = InterpOptimizer::new(&graph, None, config).unwrap();
        let results = optimizer.run_with_output(&mut std::io::sink()).unwrap();

        let state = optimizer
            .simulator()
            .final_state(&results[&2].params())
            .unwrap();
        assert!(state.is_valid(1e-10));

        let diagonal = CostHamiltonian::from_graph(&graph, None).unwrap();
        let probs = state.probabilities();
        let f: f64 = probs.iter().zip(diagonal.diagonal()).map(|(p, h)| p * h).sum();
        assert_abs_diff_eq!(f, results[&2].f_val, epsilon = 1e-9);

        // alternating assignments are the ground states of the ring
        assert_abs_diff_eq!(probs[0b0101], probs[0b1010], epsilon = 1e-12);
        assert!(probs[0b0101] > probs[0b0000]);
    }
}

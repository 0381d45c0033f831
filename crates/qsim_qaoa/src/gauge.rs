//! Parameter gauge fixing
//!
//! Gantree: L4_Interp → GaugeFix
//!
//! The QAOA cost is invariant under several maps of the angles:
//! - `β → β + π/2` on any layer, since `X^{⊗N}` commutes with `H_C`
//! - `γ → γ + π` on any layer for integer weights, and `γ → γ + π/2` when
//!   every node has even degree and unit weights
//! - `(γ, β) → (-γ, -β)`, since `H_C` and `H_B` are real (time reversal)
//! - for unit weights with all-odd degrees, `γ_k → γ_k + π/2` together with
//!   `β_j → -β_j` for `j ≥ k`, because `e^{-iπ/2 H_C} ∝ Z^{⊗N}`
//!
//! [`fix_param_gauge`] picks one canonical representative and removes
//! period jumps between consecutive layers so that interpolated seeds are
//! meaningful.

use crate::simulate::split_params;
use qsim_core::{qaoa, DegreeParity, Graph, ParamVec, QsimResult};

/// Symmetries of one problem's cost landscape
/// Gantree: GaugeSymmetry // 게이지 대칭
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeSymmetry {
    /// Period of γ (`None` for non-integer weights)
    pub gamma_period: Option<f64>,

    /// Halve the γ period after time reversal (all-even degrees)
    pub even_degree_halving: bool,

    /// Period of β
    pub beta_period: f64,

    /// Apply the all-odd-degree shift
    pub odd_degree_shift: bool,
}

impl GaugeSymmetry {
    /// Symmetries implied by the graph's weights and degrees
    /// Gantree: from_graph(graph) -> Self // 대칭 판정
    pub fn from_graph(graph: &Graph) -> Self {
        let parity = if graph.is_unit_weight() {
            graph.degree_parity()
        } else {
            DegreeParity::Mixed
        };

        let gamma_period = if graph.is_integer_weight() {
            Some(qaoa::GAMMA_PERIOD)
        } else {
            None
        };

        Self {
            gamma_period,
            even_degree_halving: parity == DegreeParity::Even,
            beta_period: qaoa::BETA_PERIOD,
            odd_degree_shift: parity == DegreeParity::Odd,
        }
    }

    /// Only the β period and time reversal
    pub fn minimal() -> Self {
        Self {
            gamma_period: None,
            even_degree_halving: false,
            beta_period: qaoa::BETA_PERIOD,
            odd_degree_shift: false,
        }
    }
}

/// Wrap consecutive differences into `(-1/2, 1/2)` (in units of a period)
fn smooth(values: &mut [f64]) {
    for i in 1..values.len() {
        let delta = values[i] - values[i - 1];
        if delta >= 0.5 {
            values[i] -= 1.0;
        } else if delta <= -0.5 {
            values[i] += 1.0;
        }
    }
}

/// Canonical representative of `[γ_1..γ_p, β_1..β_p]` under the symmetries
///
/// The result evaluates to the same cost and is a fixed point of this map.
/// Gantree: fix_param_gauge(params,sym) -> ParamVec // 게이지 고정
pub fn fix_param_gauge(params: &[f64], symmetry: &GaugeSymmetry) -> QsimResult<ParamVec> {
    let (gammas, betas) = split_params(params)?;
    let beta_period = symmetry.beta_period;

    // β is negative at the usual optima; work with -β in units of its period
    let mut b: Vec<f64> = betas
        .iter()
        .map(|x| (-x / beta_period).rem_euclid(1.0))
        .collect();

    let g: Vec<f64> = match symmetry.gamma_period {
        Some(gamma_period) => {
            let mut g: Vec<f64> = gammas
                .iter()
                .map(|x| (x / gamma_period).rem_euclid(1.0))
                .collect();

            if (0.25 < g[0] && g[0] < 0.5) || g[0] > 0.75 {
                g.iter_mut().for_each(|x| *x = (-*x).rem_euclid(1.0));
                b.iter_mut().for_each(|x| *x = (-*x).rem_euclid(1.0));
            }

            let mut period = gamma_period;
            if symmetry.even_degree_halving {
                period = qaoa::GAMMA_PERIOD_EVEN_DEGREE;
                g.iter_mut().for_each(|x| *x = (2.0 * *x).rem_euclid(1.0));
            } else if symmetry.odd_degree_shift {
                for i in 0..g.len() {
                    if g[i] > 0.5 {
                        g[i] -= 0.5;
                        b[i..]
                            .iter_mut()
                            .for_each(|x| *x = (1.0 - *x).rem_euclid(1.0));
                    }
                }
            }

            smooth(&mut g);
            g.iter().map(|x| x * period).collect()
        }
        None => {
            if gammas[0] < 0.0 {
                b.iter_mut().for_each(|x| *x = (-*x).rem_euclid(1.0));
                gammas.iter().map(|x| -x).collect()
            } else {
                gammas.to_vec()
            }
        }
    };

    smooth(&mut b);
    Ok(g.into_iter()
        .chain(b.into_iter().map(|x| -x * beta_period))
        .collect())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::hamiltonian::CostHamiltonian;
    use crate::simulate::QaoaSimulator;
    use crate::test_graphs::six_node_graph;
    use approx::assert_abs_diff_eq;
    use rand::{Rng, SeedableRng};
    use rand_chacha::ChaCha8Rng;

    fn assert_vec_close(a: &[f64], b: &[f64], eps: f64) {
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(b) {
            assert_abs_diff_eq!(*x, *y, epsilon = eps);
        }
    }

    fn odd() -> GaugeSymmetry {
        GaugeSymmetry::from_graph(&six_node_graph())
    }

    #[test]
    fn test_symmetry_from_graph() {
        assert!(odd().odd_degree_shift);
        assert!(!odd().even_degree_halving);
        assert_eq!(odd().gamma_period, Some(qaoa::GAMMA_PERIOD));

        let even = GaugeSymmetry::from_graph(&Graph::ring(4));
        assert!(!even.odd_degree_shift);
        assert!(even.even_degree_halving);
        assert_eq!(even.gamma_period, Some(qaoa::GAMMA_PERIOD));

        let weighted = Graph::from_edges(&[(0, 1, 2.0), (1, 2, 2.0), (2, 0, 2.0)]).unwrap();
        let sym = GaugeSymmetry::from_graph(&weighted);
        assert_eq!(sym.gamma_period, Some(qaoa::GAMMA_PERIOD));
        assert!(!sym.odd_degree_shift);
        assert!(!sym.even_degree_halving);

        let real = Graph::from_edges(&[(0, 1, 0.7)]).unwrap();
        assert_eq!(GaugeSymmetry::from_graph(&real), GaugeSymmetry::minimal());
    }

    #[test]
    fn test_reference_values() {
        let fixed = fix_param_gauge(&[1.0, 0.5], &odd()).unwrap();
        assert_vec_close(&fixed, &[0.5707963267948963, -1.0707963267948966], 1e-12);

        let fixed = fix_param_gauge(&[3.0, 4.0, 15.0, 2.0, 5.0, -6.0], &odd()).unwrap();
        assert_vec_close(
            &fixed,
            &[
                0.14159265358979323,
                0.7123889803846896,
                0.7079632679489647,
                -0.4292036732051035,
                0.2876110196153106,
                0.28318530717958645,
            ],
            1e-12,
        );

        let plain = GaugeSymmetry {
            gamma_period: Some(qaoa::GAMMA_PERIOD),
            even_degree_halving: false,
            beta_period: qaoa::BETA_PERIOD,
            odd_degree_shift: false,
        };
        let fixed = fix_param_gauge(&[-1.0, 4.0, 15.0, 5.0, -6.0, 7.0], &plain).unwrap();
        assert_vec_close(
            &fixed,
            &[
                2.141592653589793,
                0.858407346410207,
                -0.7079632679489647,
                -1.283185307179586,
                -1.28761101961531,
                -0.8539816339744821,
            ],
            1e-12,
        );
    }

    #[test]
    fn test_even_degree_reference_values() {
        use std::f64::consts::PI;
        let even = GaugeSymmetry::from_graph(&Graph::ring(4));

        // γ/π = 0.2: no time reversal, β untouched
        let fixed = fix_param_gauge(&[0.2 * PI, -0.3], &even).unwrap();
        assert_vec_close(&fixed, &[0.6283185307179586, -0.3], 1e-12);

        // γ/π = 0.4: time reversal, then γ/π = 0.6 folds onto 0.1π
        let fixed = fix_param_gauge(&[0.4 * PI, -0.3], &even).unwrap();
        assert_vec_close(&fixed, &[0.1 * PI, 0.3 - PI / 2.0], 1e-12);
    }

    #[test]
    fn test_idempotent() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let symmetries = [
            odd(),
            GaugeSymmetry::from_graph(&Graph::ring(4)),
            GaugeSymmetry::minimal(),
        ];
        for sym in symmetries {
            for _ in 0..100 {
                let p = rng.gen_range(1..=4);
                let params: Vec<f64> = (0..2 * p).map(|_| rng.gen_range(-7.0..7.0)).collect();
                let once = fix_param_gauge(&params, &sym).unwrap();
                let twice = fix_param_gauge(&once, &sym).unwrap();
                assert_vec_close(&once, &twice, 1e-9);
            }
        }
    }

    #[test]
    fn test_cost_invariant() {
        let mut rng = ChaCha8Rng::seed_from_u64(5);
        let cases = [
            (six_node_graph(), odd()),
            (Graph::ring(4), GaugeSymmetry::from_graph(&Graph::ring(4))),
        ];
        for (graph, sym) in cases {
            let sim = QaoaSimulator::ket(CostHamiltonian::from_graph(&graph, None).unwrap())
                .unwrap();
            for _ in 0..30 {
                let p = rng.gen_range(1..=3);
                let params: Vec<f64> = (0..2 * p).map(|_| rng.gen_range(-7.0..7.0)).collect();
                let fixed = fix_param_gauge(&params, &sym).unwrap();
                assert_abs_diff_eq!(
                    sim.evaluate(&params).unwrap(),
                    sim.evaluate(&fixed).unwrap(),
                    epsilon = 1e-10
                );
            }
        }
    }

    #[test]
    fn test_time_reversal_without_gamma_period() {
        let fixed = fix_param_gauge(&[-0.3, 0.2, 0.4, 0.1], &GaugeSymmetry::minimal()).unwrap();
        assert_abs_diff_eq!(fixed[0], 0.3, epsilon = 1e-12);
        assert_abs_diff_eq!(fixed[1], -0.2, epsilon = 1e-12);
    }
}

//! Quasi-Newton minimizer
//!
//! Gantree: L3_Qaoa → Bfgs
//!
//! Dense BFGS with a strong-Wolfe line search, driven by an objective that
//! returns the value and the exact gradient together. The inverse Hessian
//! starts at the identity; the first trial step of each line search follows
//! the usual `2 (f_k - f_{k-1}) / ∇f·p` heuristic.

use crate::config::BfgsConfig;
use qsim_core::{QsimError, QsimResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Why the minimizer stopped
/// Gantree: MinimizeStatus // 수렴 상태
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MinimizeStatus {
    /// Gradient infinity norm below `gtol`
    Converged,
    /// Iteration budget exhausted
    MaxIterations,
    /// No step satisfying the Wolfe conditions was found
    LineSearchFailed,
}

impl fmt::Display for MinimizeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            MinimizeStatus::Converged => "converged",
            MinimizeStatus::MaxIterations => "max iterations reached",
            MinimizeStatus::LineSearchFailed => "line search failed",
        };
        write!(f, "{}", s)
    }
}

/// Outcome of one minimization
/// Gantree: MinimizeResult // 최소화 결과
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MinimizeResult {
    /// Best point found
    pub x: Vec<f64>,

    /// Objective at `x`
    pub fun: f64,

    /// Gradient at `x`
    pub jac: Vec<f64>,

    /// Objective evaluations
    pub nfev: usize,

    /// BFGS iterations
    pub nit: usize,

    /// Stop reason
    pub status: MinimizeStatus,
}

impl MinimizeResult {
    /// Check for gradient convergence
    pub fn converged(&self) -> bool {
        self.status == MinimizeStatus::Converged
    }
}

// ============================================================================
// Vector Helpers
// ============================================================================

fn dot(a: &[f64], b: &[f64]) -> f64 {
    a.iter().zip(b).map(|(x, y)| x * y).sum()
}

fn inf_norm(v: &[f64]) -> f64 {
    v.iter().fold(0.0, |m, x| m.max(x.abs()))
}

fn l2_norm(v: &[f64]) -> f64 {
    dot(v, v).sqrt()
}

fn axpy(x: &[f64], alpha: f64, d: &[f64]) -> Vec<f64> {
    x.iter().zip(d).map(|(xi, di)| xi + alpha * di).collect()
}

// ============================================================================
// Line Search
// ============================================================================

/// Point accepted by the line search
struct LinePoint {
    alpha: f64,
    fun: f64,
    grad: Vec<f64>,
}

/// Strong-Wolfe line search along `direction`
struct LineSearch<'a, F> {
    objective: &'a mut F,
    x: &'a [f64],
    direction: &'a [f64],
    phi0: f64,
    derphi0: f64,
    c1: f64,
    c2: f64,
    max_evals: usize,
    nfev: usize,
}

impl<'a, F> LineSearch<'a, F>
where
    F: FnMut(&[f64]) -> QsimResult<(f64, Vec<f64>)>,
{
    fn eval(&mut self, alpha: f64) -> QsimResult<(LinePoint, f64)> {
        let (fun, grad) = (self.objective)(&axpy(self.x, alpha, self.direction))?;
        self.nfev += 1;
        let derphi = dot(&grad, self.direction);
        Ok((LinePoint { alpha, fun, grad }, derphi))
    }

    fn armijo_fails(&self, point: &LinePoint) -> bool {
        !(point.fun <= self.phi0 + self.c1 * point.alpha * self.derphi0)
    }

    fn curvature_holds(&self, derphi: f64) -> bool {
        derphi.abs() <= -self.c2 * self.derphi0
    }

    /// Bracketing phase
    fn search(&mut self, alpha1: f64) -> QsimResult<Option<LinePoint>> {
        let mut prev_alpha = 0.0;
        let mut prev_fun = self.phi0;
        let mut prev_derphi = self.derphi0;
        let mut alpha = alpha1;

        while self.nfev < self.max_evals {
            let (point, derphi) = self.eval(alpha)?;
            if !point.fun.is_finite() {
                // Shrink into the region where the objective is defined
                alpha = 0.5 * (prev_alpha + alpha);
                continue;
            }

            if self.armijo_fails(&point) || (self.nfev > 1 && point.fun >= prev_fun) {
                return self.zoom(prev_alpha, prev_fun, prev_derphi, point.alpha, point.fun);
            }
            if self.curvature_holds(derphi) {
                return Ok(Some(point));
            }
            if derphi >= 0.0 {
                return self.zoom(point.alpha, point.fun, derphi, prev_alpha, prev_fun);
            }

            prev_alpha = point.alpha;
            prev_fun = point.fun;
            prev_derphi = derphi;
            alpha *= 2.0;
        }
        Ok(None)
    }

    /// Shrink the bracket `[lo, hi]` until the strong Wolfe conditions hold
    fn zoom(
        &mut self,
        mut lo: f64,
        mut fun_lo: f64,
        mut derphi_lo: f64,
        mut hi: f64,
        mut fun_hi: f64,
    ) -> QsimResult<Option<LinePoint>> {
        while self.nfev < self.max_evals {
            let width = hi - lo;
            if width.abs() < 1e-14 {
                break;
            }

            // Quadratic through (lo, f_lo, f'_lo) and (hi, f_hi), bisection
            // when the minimizer falls near the bracket ends
            let denom = 2.0 * (fun_hi - fun_lo - derphi_lo * width);
            let mut alpha = lo - derphi_lo * width * width / denom;
            let (a, b) = if lo < hi { (lo, hi) } else { (hi, lo) };
            let margin = 0.1 * width.abs();
            if !alpha.is_finite() || alpha < a + margin || alpha > b - margin {
                alpha = lo + 0.5 * width;
            }

            let (point, derphi) = self.eval(alpha)?;
            if self.armijo_fails(&point) || point.fun >= fun_lo || !point.fun.is_finite() {
                hi = alpha;
                fun_hi = point.fun;
            } else {
                if self.curvature_holds(derphi) {
                    return Ok(Some(point));
                }
                if derphi * (hi - lo) >= 0.0 {
                    hi = lo;
                    fun_hi = fun_lo;
                }
                lo = alpha;
                fun_lo = point.fun;
                derphi_lo = derphi;
            }
        }
        Ok(None)
    }
}

// ============================================================================
// BFGS
// ============================================================================

/// Minimize `objective` from `x0`
///
/// `objective` returns `(f(x), ∇f(x))`. Non-convergence is reported through
/// [`MinimizeResult::status`], not as an error.
/// Gantree: bfgs(objective,x0,config) -> MinimizeResult // 준뉴턴 최소화
pub fn bfgs<F>(mut objective: F, x0: &[f64], config: &BfgsConfig) -> QsimResult<MinimizeResult>
where
    F: FnMut(&[f64]) -> QsimResult<(f64, Vec<f64>)>,
{
    let n = x0.len();
    if n == 0 {
        return Err(QsimError::InvalidParameters("empty starting point".into()));
    }
    let max_iter = config.max_iter_for(n);

    let mut x = x0.to_vec();
    let (mut fun, mut grad) = objective(&x)?;
    let mut nfev = 1;
    if !fun.is_finite() {
        return Err(QsimError::InvalidParameters(format!(
            "objective is not finite at the starting point: {}",
            fun
        )));
    }

    // Row-major inverse Hessian approximation
    let identity = |n: usize| -> Vec<f64> {
        (0..n * n)
            .map(|i| if i / n == i % n { 1.0 } else { 0.0 })
            .collect()
    };
    let mut h_inv = identity(n);
    let mut old_fun = fun + l2_norm(&grad) / 2.0;
    let mut status = MinimizeStatus::MaxIterations;
    let mut nit = 0;

    if inf_norm(&grad) <= config.gtol {
        status = MinimizeStatus::Converged;
    }

    while status != MinimizeStatus::Converged && nit < max_iter {
        let mut direction: Vec<f64> = (0..n)
            .map(|i| -dot(&h_inv[i * n..(i + 1) * n], &grad))
            .collect();
        let mut derphi0 = dot(&grad, &direction);
        if derphi0 >= 0.0 {
            // Lost positive definiteness: restart from steepest descent
            h_inv = identity(n);
            direction = grad.iter().map(|g| -g).collect();
            derphi0 = dot(&grad, &direction);
        }

        let alpha1 = {
            let guess = 1.01 * 2.0 * (fun - old_fun) / derphi0;
            if guess.is_finite() && guess > 0.0 {
                guess.min(1.0)
            } else {
                1.0
            }
        };

        let mut search = LineSearch {
            objective: &mut objective,
            x: &x,
            direction: &direction,
            phi0: fun,
            derphi0,
            c1: config.c1,
            c2: config.c2,
            max_evals: config.max_line_search_evals,
            nfev: 0,
        };
        let accepted = search.search(alpha1)?;
        nfev += search.nfev;

        let Some(point) = accepted else {
            status = MinimizeStatus::LineSearchFailed;
            break;
        };

        let step: Vec<f64> = direction.iter().map(|d| point.alpha * d).collect();
        let x_new = axpy(&x, 1.0, &step);
        let y: Vec<f64> = point.grad.iter().zip(&grad).map(|(a, b)| a - b).collect();

        old_fun = fun;
        x = x_new;
        fun = point.fun;
        grad = point.grad;
        nit += 1;

        if inf_norm(&grad) <= config.gtol {
            status = MinimizeStatus::Converged;
            break;
        }

        let ys = dot(&y, &step);
        let rho = if ys.abs() > f64::EPSILON * l2_norm(&y) * l2_norm(&step) {
            1.0 / ys
        } else {
            1000.0
        };
        update_inverse_hessian(&mut h_inv, &step, &y, rho, n);
    }

    if status != MinimizeStatus::Converged {
        log::warn!(
            "BFGS stopped without converging ({}): |grad|_inf = {:.3e} after {} iterations",
            status,
            inf_norm(&grad),
            nit
        );
    }

    Ok(MinimizeResult {
        x,
        fun,
        jac: grad,
        nfev,
        nit,
        status,
    })
}

/// `H ← (I - ρ s yᵀ) H (I - ρ y sᵀ) + ρ s sᵀ`
fn update_inverse_hessian(h: &mut [f64], s: &[f64], y: &[f64], rho: f64, n: usize) {
    // Hy and yᵀH (H is symmetric, so both are the same vector)
    let hy: Vec<f64> = (0..n).map(|i| dot(&h[i * n..(i + 1) * n], y)).collect();
    let yhy = dot(y, &hy);

    for i in 0..n {
        for j in 0..n {
            h[i * n + j] += -rho * (s[i] * hy[j] + hy[i] * s[j])
                + (rho * rho * yhy + rho) * s[i] * s[j];
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn rosenbrock(x: &[f64]) -> QsimResult<(f64, Vec<f64>)> {
        let (a, b) = (x[0], x[1]);
        let f = (1.0 - a).powi(2) + 100.0 * (b - a * a).powi(2);
        let g = vec![
            -2.0 * (1.0 - a) - 400.0 * a * (b - a * a),
            200.0 * (b - a * a),
        ];
        Ok((f, g))
    }

    #[test]
    fn test_quadratic_converges() {
        // f = (x-3)² + 10 (y+1)²
        let objective = |x: &[f64]| -> QsimResult<(f64, Vec<f64>)> {
            Ok((
                (x[0] - 3.0).powi(2) + 10.0 * (x[1] + 1.0).powi(2),
                vec![2.0 * (x[0] - 3.0), 20.0 * (x[1] + 1.0)],
            ))
        };
        let result = bfgs(objective, &[0.0, 0.0], &BfgsConfig::default()).unwrap();
        assert!(result.converged());
        assert_abs_diff_eq!(result.x[0], 3.0, epsilon = 1e-5);
        assert_abs_diff_eq!(result.x[1], -1.0, epsilon = 1e-5);
        assert!(result.nfev >= result.nit);
    }

    #[test]
    fn test_rosenbrock() {
        let result = bfgs(rosenbrock, &[-1.2, 1.0], &BfgsConfig::default()).unwrap();
        assert!(result.converged(), "status: {}", result.status);
        assert_abs_diff_eq!(result.x[0], 1.0, epsilon = 1e-4);
        assert_abs_diff_eq!(result.x[1], 1.0, epsilon = 1e-4);
        assert!(result.fun < 1e-8);
    }

    #[test]
    fn test_start_at_minimum() {
        let result = bfgs(rosenbrock, &[1.0, 1.0], &BfgsConfig::default()).unwrap();
        assert!(result.converged());
        assert_eq!(result.nit, 0);
        assert_eq!(result.nfev, 1);
    }

    #[test]
    fn test_iteration_budget() {
        let config = BfgsConfig::default().with_max_iter(2);
        let result = bfgs(rosenbrock, &[-1.2, 1.0], &config).unwrap();
        assert_eq!(result.status, MinimizeStatus::MaxIterations);
        assert_eq!(result.nit, 2);
    }

    #[test]
    fn test_objective_error_propagates() {
        let objective = |_: &[f64]| -> QsimResult<(f64, Vec<f64>)> {
            Err(QsimError::InternalError("boom".into()))
        };
        assert!(bfgs(objective, &[0.0], &BfgsConfig::default()).is_err());
    }

    #[test]
    fn test_inverse_hessian_update_satisfies_secant() {
        // H_new y = s
        let n = 2;
        let mut h = vec![1.0, 0.0, 0.0, 1.0];
        let s = [0.3, -0.1];
        let y = [0.5, 0.2];
        let rho = 1.0 / dot(&y, &s);
        update_inverse_hessian(&mut h, &s, &y, rho, n);
        for i in 0..n {
            assert_abs_diff_eq!(dot(&h[i * n..(i + 1) * n], &y), s[i], epsilon = 1e-12);
        }
    }
}

//! Depth-to-depth parameter seeding
//!
//! Gantree: L4_Interp → Interp
//!
//! The optimum at depth `p - 1` is resampled onto `p` evenly spaced layers
//! and used as the starting point at depth `p`.

use crate::simulate::split_params;
use qsim_core::{ParamVec, QsimResult};

/// Piecewise-linear resample of `values` onto `n` evenly spaced points
///
/// Both grids span `[0, 1]`; a single value is repeated.
fn resample(values: &[f64], n: usize) -> Vec<f64> {
    let m = values.len();
    if m == 1 || n == 1 {
        return vec![values[0]; n];
    }

    (0..n)
        .map(|j| {
            let t = j as f64 / (n - 1) as f64 * (m - 1) as f64;
            let i = (t.floor() as usize).min(m - 2);
            let frac = t - i as f64;
            values[i] * (1.0 - frac) + values[i + 1] * frac
        })
        .collect()
}

/// Seed for depth `p` from the optimum `[γ.., β..]` at depth `p - 1`
/// Gantree: interp_seed(prev) -> ParamVec // 보간 시드
pub fn interp_seed(prev: &[f64]) -> QsimResult<ParamVec> {
    let (gammas, betas) = split_params(prev)?;
    let p = gammas.len() + 1;
    let mut seed = resample(gammas, p);
    seed.extend(resample(betas, p));
    Ok(seed)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_duplicates_depth_one() {
        let seed = interp_seed(&[0.4, -0.3]).unwrap();
        assert_eq!(seed, vec![0.4, 0.4, -0.3, -0.3]);
    }

    #[test]
    fn test_linear_resample() {
        let seed = interp_seed(&[0.0, 1.0, 2.0, 2.0]).unwrap();
        assert_eq!(seed.len(), 6);
        assert_abs_diff_eq!(seed[0], 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(seed[1], 0.5, epsilon = 1e-12);
        assert_abs_diff_eq!(seed[2], 1.0, epsilon = 1e-12);
        for x in &seed[3..] {
            assert_abs_diff_eq!(*x, 2.0, epsilon = 1e-12);
        }

        let resampled = resample(&[1.0, 2.0, 4.0], 4);
        let expected = [1.0, 5.0 / 3.0, 8.0 / 3.0, 4.0];
        for (x, y) in resampled.iter().zip(expected) {
            assert_abs_diff_eq!(*x, y, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_endpoints_preserved() {
        let prev = [0.1, 0.3, 0.7, -0.6, -0.4, -0.1];
        let seed = interp_seed(&prev).unwrap();
        assert_eq!(seed.len(), 8);
        assert_abs_diff_eq!(seed[0], 0.1, epsilon = 1e-12);
        assert_abs_diff_eq!(seed[3], 0.7, epsilon = 1e-12);
        assert_abs_diff_eq!(seed[4], -0.6, epsilon = 1e-12);
        assert_abs_diff_eq!(seed[7], -0.1, epsilon = 1e-12);
    }

    #[test]
    fn test_invalid_input() {
        assert!(interp_seed(&[]).is_err());
        assert!(interp_seed(&[0.1, 0.2, 0.3]).is_err());
    }
}

//! Tensor operation kernel
//!
//! Gantree: L1_State → Kernel
//!
//! Applies a k-qubit [`Operator`] to arbitrary (unsorted, non-contiguous)
//! target qubits without building the full `2^N × 2^N` matrix.
//!
//! The flat buffer is treated as a register of bits. A ket has `N` bits. A
//! row-major density matrix has `2N` bits: column qubit `q` is bit `q` and
//! row qubit `q` is bit `q + N`. Left multiplication contracts the operator
//! against the row bits, right multiplication contracts its conjugate against
//! the column bits. Each contraction is a strided gather → matvec → scatter
//! over the `2^(bits-k)` blocks that share the non-target bits.

use crate::operator::Operator;
use crate::state::QuantumState;
use num_complex::Complex64;
use qsim_core::{QsimError, QsimResult, QubitId};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);

// ============================================================================
// Index Helpers
// ============================================================================

/// Check that every target is in range and listed once
pub(crate) fn validate_targets(num_qubits: usize, targets: &[QubitId]) -> QsimResult<()> {
    let mut seen = 0u64;
    for &q in targets {
        if q >= num_qubits {
            return Err(QsimError::QubitOutOfRange {
                qubit: q,
                max: num_qubits.saturating_sub(1),
            });
        }
        if seen & (1 << q) != 0 {
            return Err(QsimError::DuplicateQubit(q));
        }
        seen |= 1 << q;
    }
    Ok(())
}

/// Spread the bits of a local index onto the given register positions
#[inline]
fn deposit(local: usize, positions: &[usize]) -> usize {
    positions
        .iter()
        .enumerate()
        .fold(0, |acc, (j, &pos)| acc | (((local >> j) & 1) << pos))
}

/// Sort the targets and permute the operator legs to match
fn sorted_operator(targets: &[QubitId], op: &Operator) -> QsimResult<(Vec<QubitId>, Operator)> {
    if op.dim() != 1 << targets.len() {
        return Err(QsimError::dimension(
            "operator does not match the number of targets",
            1 << targets.len(),
            op.dim(),
        ));
    }

    let mut order: Vec<usize> = (0..targets.len()).collect();
    order.sort_by_key(|&j| targets[j]);
    let sorted: Vec<QubitId> = order.iter().map(|&j| targets[j]).collect();

    if order.iter().enumerate().all(|(k, &j)| k == j) {
        return Ok((sorted, op.clone()));
    }
    Ok((sorted, op.permute_legs(&order)?))
}

/// Gather → matvec → scatter over every block of the flat register
///
/// `positions` are sorted register bits; operator local bit `j` maps to
/// `positions[j]`. With `conjugate` the entry-wise conjugate is applied.
fn contract(data: &mut [Complex64], positions: &[usize], op: &Operator, conjugate: bool) {
    let k = positions.len();
    let block = 1usize << k;
    let mask = positions.iter().fold(0usize, |m, &p| m | (1 << p));
    let offsets: Vec<usize> = (0..block).map(|l| deposit(l, positions)).collect();

    let mut gathered = vec![ZERO; block];
    let mut out = vec![ZERO; block];

    for base in 0..data.len() {
        if base & mask != 0 {
            continue;
        }
        for (g, &off) in gathered.iter_mut().zip(&offsets) {
            *g = data[base + off];
        }
        if conjugate {
            op.matvec_conj(&gathered, &mut out);
        } else {
            op.matvec(&gathered, &mut out);
        }
        for (&o, &off) in out.iter().zip(&offsets) {
            data[base + off] = o;
        }
    }
}

// ============================================================================
// Kernel Operations
// ============================================================================

impl QuantumState {
    /// `ψ → Oψ` on a ket, `ρ → Oρ` on a density matrix
    /// Gantree: left_multiply(targets,op) // 왼쪽 곱
    pub fn left_multiply(&mut self, targets: &[QubitId], op: &Operator) -> QsimResult<()> {
        validate_targets(self.num_qubits, targets)?;
        let (sorted, op) = sorted_operator(targets, op)?;

        let shift = if self.is_ket() { 0 } else { self.num_qubits };
        let positions: Vec<usize> = sorted.iter().map(|&q| q + shift).collect();
        contract(&mut self.data, &positions, &op, false);
        Ok(())
    }

    /// `ρ → ρO†` on a density matrix
    ///
    /// Fails with a configuration error on a ket.
    /// Gantree: right_multiply(targets,op) // 오른쪽 곱
    pub fn right_multiply(&mut self, targets: &[QubitId], op: &Operator) -> QsimResult<()> {
        if self.is_ket() {
            return Err(QsimError::config(
                "right multiplication is only defined for density matrices",
            ));
        }
        validate_targets(self.num_qubits, targets)?;
        let (sorted, op) = sorted_operator(targets, op)?;

        // (ρO†)[r][c] = Σ_k conj(O[c][k]) ρ[r][k]
        contract(&mut self.data, &sorted, &op, true);
        Ok(())
    }

    /// `ψ → Oψ` on a ket, `ρ → OρO†` on a density matrix
    pub fn multiply(&mut self, targets: &[QubitId], op: &Operator) -> QsimResult<()> {
        self.left_multiply(targets, op)?;
        if !self.is_ket() {
            self.right_multiply(targets, op)?;
        }
        Ok(())
    }

    /// Apply a single-qubit operator (`OρO†` for density matrices)
    pub fn single_qubit_operation(&mut self, qubit: QubitId, op: &Operator) -> QsimResult<()> {
        if op.dim() != 2 {
            return Err(QsimError::dimension("single-qubit operator", 2, op.dim()));
        }
        self.multiply(&[qubit], op)
    }

    /// Apply the same single-qubit operator to every qubit
    pub fn all_qubit_operation(&mut self, op: &Operator) -> QsimResult<()> {
        for q in 0..self.num_qubits {
            self.single_qubit_operation(q, op)?;
        }
        Ok(())
    }

    /// Multiply by a diagonal matrix: `ψ → Dψ` or `ρ → DρD†`
    ///
    /// Used for the cost unitary, which is diagonal in the computational basis.
    pub fn apply_diagonal(&mut self, diag: &[Complex64]) -> QsimResult<()> {
        let dim = self.dim();
        if diag.len() != dim {
            return Err(QsimError::dimension("diagonal operator", dim, diag.len()));
        }

        if self.is_ket() {
            for (a, d) in self.data.iter_mut().zip(diag) {
                *a *= *d;
            }
        } else {
            for (r, row) in self.data.chunks_mut(dim).enumerate() {
                for (entry, d) in row.iter_mut().zip(diag) {
                    *entry *= diag[r] * d.conj();
                }
            }
        }
        Ok(())
    }

    /// Left-multiply by a diagonal matrix only (`Dψ` or `Dρ`)
    pub fn left_diagonal(&mut self, diag: &[Complex64]) -> QsimResult<()> {
        let dim = self.dim();
        if diag.len() != dim {
            return Err(QsimError::dimension("diagonal operator", dim, diag.len()));
        }

        if self.is_ket() {
            for (a, d) in self.data.iter_mut().zip(diag) {
                *a *= *d;
            }
        } else {
            for (row, d) in self.data.chunks_mut(dim).zip(diag) {
                for entry in row.iter_mut() {
                    *entry *= *d;
                }
            }
        }
        Ok(())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use qsim_core::Pauli;
    use rand::Rng;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const TOL: f64 = 1e-12;

    fn random_ket(num_qubits: usize, seed: u64) -> QuantumState {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let data: Vec<Complex64> = (0..1 << num_qubits)
            .map(|_| Complex64::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0)))
            .collect();
        let norm = data.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt();
        QuantumState::from_ket(data.into_iter().map(|a| a / norm).collect()).unwrap()
    }

    fn assert_states_close(a: &QuantumState, b: &QuantumState) {
        assert_eq!(a.data().len(), b.data().len());
        for (x, y) in a.data().iter().zip(b.data()) {
            assert_abs_diff_eq!(x.re, y.re, epsilon = 1e-10);
            assert_abs_diff_eq!(x.im, y.im, epsilon = 1e-10);
        }
    }

    #[test]
    fn test_validate_targets() {
        assert!(validate_targets(3, &[0, 2]).is_ok());
        assert_eq!(
            validate_targets(3, &[3]),
            Err(QsimError::QubitOutOfRange { qubit: 3, max: 2 })
        );
        assert_eq!(validate_targets(3, &[1, 1]), Err(QsimError::DuplicateQubit(1)));
    }

    #[test]
    fn test_x_flips_basis_state() {
        let mut psi = QuantumState::zero_ket(3);
        psi.single_qubit_operation(1, &Operator::pauli(Pauli::X))
            .unwrap();
        assert_abs_diff_eq!(psi.data()[0b010].re, 1.0, epsilon = TOL);
    }

    #[test]
    fn test_unsorted_targets_match_sorted_operator() {
        let psi = random_ket(4, 7);
        let xz = Operator::pauli_string(&[Pauli::X, Pauli::Z]);
        let zx = Operator::pauli_string(&[Pauli::Z, Pauli::X]);

        // X on qubit 3, Z on qubit 1
        let mut a = psi.clone();
        a.left_multiply(&[3, 1], &xz).unwrap();
        let mut b = psi.clone();
        b.left_multiply(&[1, 3], &zx).unwrap();
        assert_states_close(&a, &b);

        let mut c = psi;
        c.left_multiply(&[3], &Operator::pauli(Pauli::X)).unwrap();
        c.left_multiply(&[1], &Operator::pauli(Pauli::Z)).unwrap();
        assert_states_close(&a, &c);
    }

    #[test]
    fn test_dimension_mismatch() {
        let mut psi = QuantumState::zero_ket(3);
        let err = psi
            .left_multiply(&[0, 1], &Operator::pauli(Pauli::X))
            .unwrap_err();
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_right_multiply_rejects_ket() {
        let mut psi = QuantumState::zero_ket(2);
        let err = psi
            .right_multiply(&[0], &Operator::pauli(Pauli::X))
            .unwrap_err();
        assert!(err.is_configuration_error());
    }

    #[test]
    fn test_density_matrix_tracks_ket() {
        let psi = random_ket(3, 11);
        let mut rho = psi.to_density();
        let mut ket = psi;

        let h = Operator::from_real_rows(&[
            vec![1.0 / 2f64.sqrt(), 1.0 / 2f64.sqrt()],
            vec![1.0 / 2f64.sqrt(), -1.0 / 2f64.sqrt()],
        ])
        .unwrap();
        let yz = Operator::pauli_string(&[Pauli::Y, Pauli::Z]);

        for state in [&mut ket, &mut rho] {
            state.single_qubit_operation(0, &h).unwrap();
            state.multiply(&[2, 0], &yz).unwrap();
        }

        assert_states_close(&ket.to_density(), &rho);
        assert!(rho.is_valid(1e-10));
    }

    #[test]
    fn test_apply_diagonal_matches_operator() {
        let psi = random_ket(2, 3);
        let diag: Vec<Complex64> = (0..4)
            .map(|i| Complex64::from_polar(1.0, 0.3 * i as f64))
            .collect();
        let op = Operator::from_diagonal(&diag).unwrap();

        let mut a = psi.to_density();
        a.apply_diagonal(&diag).unwrap();
        let mut b = psi.to_density();
        b.multiply(&[0, 1], &op).unwrap();
        assert_states_close(&a, &b);
    }

    #[test]
    fn test_all_qubit_operation_keeps_norm() {
        let mut psi = random_ket(5, 5);
        let h = Operator::from_real_rows(&[
            vec![1.0 / 2f64.sqrt(), 1.0 / 2f64.sqrt()],
            vec![1.0 / 2f64.sqrt(), -1.0 / 2f64.sqrt()],
        ])
        .unwrap();
        psi.all_qubit_operation(&h).unwrap();
        assert_abs_diff_eq!(psi.norm(), 1.0, epsilon = 1e-10);
    }
}

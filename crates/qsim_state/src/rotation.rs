//! Rotations in closed form
//!
//! Gantree: L1_State → Rotations
//!
//! Every rotation is `e^{-iθA}` with no factor of 1/2. For an involutory
//! generator (`A² = I`) this is `cos θ I - i sin θ A`; for a projector
//! (`P² = P`) it is `I + (e^{-iθ} - 1) P`. No matrix exponential is formed.

use crate::operator::Operator;
use crate::pauli::PauliMask;
use crate::state::QuantumState;
use num_complex::Complex64;
use qsim_core::{Angle, Pauli, QsimError, QsimResult, QubitId};

/// `cos θ I - i sin θ A` for an involutory `A`
pub fn involutory_unitary(generator: &Operator, theta: Angle) -> Operator {
    let identity = Operator::identity(generator.num_qubits());
    let (s, c) = theta.sin_cos();
    let mut data = Vec::with_capacity(generator.as_slice().len());
    for (&i, &a) in identity.as_slice().iter().zip(generator.as_slice()) {
        data.push(i * c - Complex64::new(0.0, s) * a);
    }
    // Same shape as the generator, so construction cannot fail
    Operator::new(generator.dim(), data).unwrap_or(identity)
}

/// `I + (e^{-iθ} - 1) P` for a projector `P`
pub fn idempotent_unitary(projector: &Operator, theta: Angle) -> Operator {
    let identity = Operator::identity(projector.num_qubits());
    let factor = Complex64::from_polar(1.0, -theta) - 1.0;
    let mut data = Vec::with_capacity(projector.as_slice().len());
    for (&i, &p) in identity.as_slice().iter().zip(projector.as_slice()) {
        data.push(i + factor * p);
    }
    Operator::new(projector.dim(), data).unwrap_or(identity)
}

impl QuantumState {
    // ========================================================================
    // Generic Rotations
    // ========================================================================

    /// `e^{-iθA}` on one qubit for a Hermitian involutory `A`
    /// Gantree: single_qubit_rotation(q,A,θ) // 단일 큐비트 회전
    pub fn single_qubit_rotation(
        &mut self,
        qubit: QubitId,
        generator: &Operator,
        theta: Angle,
    ) -> QsimResult<()> {
        if generator.dim() != 2 {
            return Err(QsimError::dimension("rotation generator", 2, generator.dim()));
        }
        self.single_qubit_operation(qubit, &involutory_unitary(generator, theta))
    }

    /// `e^{-iθA}` on every qubit
    pub fn all_qubit_rotation(&mut self, generator: &Operator, theta: Angle) -> QsimResult<()> {
        if generator.dim() != 2 {
            return Err(QsimError::dimension("rotation generator", 2, generator.dim()));
        }
        self.all_qubit_operation(&involutory_unitary(generator, theta))
    }

    /// `e^{-iθP}` on the given targets for a projector `P`
    pub fn idempotent_rotation(
        &mut self,
        targets: &[QubitId],
        projector: &Operator,
        theta: Angle,
    ) -> QsimResult<()> {
        self.multiply(targets, &idempotent_unitary(projector, theta))
    }

    // ========================================================================
    // Pauli Rotations
    // ========================================================================

    /// `e^{-iθP}` for a Pauli string `P`, via the fast path
    /// Gantree: pauli_rotation(targets,paulis,θ) // 파울리 회전
    pub fn pauli_rotation(
        &mut self,
        targets: &[QubitId],
        paulis: &[Pauli],
        theta: Angle,
    ) -> QsimResult<()> {
        let mask = PauliMask::new(self.num_qubits, targets, paulis)?;
        self.pauli_rotation_mask(&mask, theta);
        Ok(())
    }

    /// `e^{-iθ P_q}` on every qubit `q`
    pub fn all_qubit_pauli_rotation(&mut self, pauli: Pauli, theta: Angle) -> QsimResult<()> {
        for q in 0..self.num_qubits {
            self.pauli_rotation(&[q], &[pauli], theta)?;
        }
        Ok(())
    }

    /// `e^{-iθX}` on one qubit
    pub fn rot_x(&mut self, qubit: QubitId, theta: Angle) -> QsimResult<()> {
        self.pauli_rotation(&[qubit], &[Pauli::X], theta)
    }

    /// `e^{-iθY}` on one qubit
    pub fn rot_y(&mut self, qubit: QubitId, theta: Angle) -> QsimResult<()> {
        self.pauli_rotation(&[qubit], &[Pauli::Y], theta)
    }

    /// `e^{-iθZ}` on one qubit
    pub fn rot_z(&mut self, qubit: QubitId, theta: Angle) -> QsimResult<()> {
        self.pauli_rotation(&[qubit], &[Pauli::Z], theta)
    }

    pub(crate) fn pauli_rotation_mask(&mut self, mask: &PauliMask, theta: Angle) {
        let (s, c) = theta.sin_cos();
        let minus_is = Complex64::new(0.0, -s);

        if self.is_ket() {
            let mut flipped = self.clone();
            flipped.left_pauli_mask(mask);
            for (a, p) in self.data.iter_mut().zip(&flipped.data) {
                *a = *a * c + minus_is * p;
            }
            return;
        }

        // c²ρ + ics ρP - ics Pρ + s² PρP
        let mut p_rho = self.clone();
        p_rho.left_pauli_mask(mask);
        let mut rho_p = self.clone();
        rho_p.right_pauli_mask(mask);
        let mut p_rho_p = p_rho.clone();
        p_rho_p.right_pauli_mask(mask);

        let ics = Complex64::new(0.0, c * s);
        for (i, entry) in self.data.iter_mut().enumerate() {
            *entry = *entry * (c * c) + ics * (rho_p.data[i] - p_rho.data[i])
                + p_rho_p.data[i] * (s * s);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

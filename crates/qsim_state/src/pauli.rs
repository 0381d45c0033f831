//! Pauli fast path
//!
//! Gantree: L1_State → PauliPath
//!
//! A Pauli string maps a basis state to a single basis state with a phase,
//! so it is applied by index flips and sign flips instead of a contraction.

use crate::kernel::validate_targets;
use crate::state::QuantumState;
use num_complex::Complex64;
use qsim_core::{Pauli, QsimError, QsimResult, QubitId};

/// Bit masks of a Pauli string on the full register
///
/// `P|z⟩ = i^{n_y} (-1)^{popcount(z & phase_mask)} |z ^ flip_mask⟩`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct PauliMask {
    pub(crate) flip_mask: usize,
    pub(crate) phase_mask: usize,
    pub(crate) num_y: u32,
}

impl PauliMask {
    /// Build masks for `paulis[j]` acting on `targets[j]`
    pub(crate) fn new(num_qubits: usize, targets: &[QubitId], paulis: &[Pauli]) -> QsimResult<Self> {
        if targets.len() != paulis.len() {
            return Err(QsimError::dimension(
                "one Pauli letter per target",
                targets.len(),
                paulis.len(),
            ));
        }
        validate_targets(num_qubits, targets)?;

        let mut mask = Self {
            flip_mask: 0,
            phase_mask: 0,
            num_y: 0,
        };
        for (&q, &p) in targets.iter().zip(paulis) {
            match p {
                Pauli::I => {}
                Pauli::X => mask.flip_mask |= 1 << q,
                Pauli::Y => {
                    mask.flip_mask |= 1 << q;
                    mask.phase_mask |= 1 << q;
                    mask.num_y += 1;
                }
                Pauli::Z => mask.phase_mask |= 1 << q,
            }
        }
        Ok(mask)
    }

    /// Phase picked up by source basis state `z`
    #[inline]
    pub(crate) fn phase(&self, z: usize) -> Complex64 {
        let base = match self.num_y % 4 {
            0 => Complex64::new(1.0, 0.0),
            1 => Complex64::new(0.0, 1.0),
            2 => Complex64::new(-1.0, 0.0),
            _ => Complex64::new(0.0, -1.0),
        };
        if (z & self.phase_mask).count_ones() % 2 == 1 {
            -base
        } else {
            base
        }
    }
}

impl QuantumState {
    /// `ψ → Pψ` or `ρ → Pρ`
    /// Gantree: left_pauli(targets,paulis) // 파울리 왼쪽 곱
    pub fn left_pauli(&mut self, targets: &[QubitId], paulis: &[Pauli]) -> QsimResult<()> {
        let mask = PauliMask::new(self.num_qubits, targets, paulis)?;
        self.left_pauli_mask(&mask);
        Ok(())
    }

    /// `ρ → ρP` on a density matrix; fails on a ket
    pub fn right_pauli(&mut self, targets: &[QubitId], paulis: &[Pauli]) -> QsimResult<()> {
        if self.is_ket() {
            return Err(QsimError::config(
                "right multiplication is only defined for density matrices",
            ));
        }
        let mask = PauliMask::new(self.num_qubits, targets, paulis)?;
        self.right_pauli_mask(&mask);
        Ok(())
    }

    /// `ψ → Pψ` on a ket, `ρ → PρP` on a density matrix
    pub fn apply_pauli(&mut self, targets: &[QubitId], paulis: &[Pauli]) -> QsimResult<()> {
        let mask = PauliMask::new(self.num_qubits, targets, paulis)?;
        self.left_pauli_mask(&mask);
        if !self.is_ket() {
            self.right_pauli_mask(&mask);
        }
        Ok(())
    }

    /// Pauli X on one qubit
    pub fn op_x(&mut self, qubit: QubitId) -> QsimResult<()> {
        self.apply_pauli(&[qubit], &[Pauli::X])
    }

    /// Pauli Y on one qubit
    pub fn op_y(&mut self, qubit: QubitId) -> QsimResult<()> {
        self.apply_pauli(&[qubit], &[Pauli::Y])
    }

    /// Pauli Z on one qubit
    pub fn op_z(&mut self, qubit: QubitId) -> QsimResult<()> {
        self.apply_pauli(&[qubit], &[Pauli::Z])
    }

    pub(crate) fn left_pauli_mask(&mut self, mask: &PauliMask) {
        let dim = self.dim();
        let old = self.data.clone();

        if self.is_ket() {
            for (z, a) in self.data.iter_mut().enumerate() {
                let src = z ^ mask.flip_mask;
                *a = mask.phase(src) * old[src];
            }
        } else {
            for (r, row) in self.data.chunks_mut(dim).enumerate() {
                let src = r ^ mask.flip_mask;
                let phase = mask.phase(src);
                let src_row = &old[src * dim..(src + 1) * dim];
                for (entry, &s) in row.iter_mut().zip(src_row) {
                    *entry = phase * s;
                }
            }
        }
    }

    // (ρP)[r][c] = ρ[r][c ^ flip] · phase(c)
    pub(crate) fn right_pauli_mask(&mut self, mask: &PauliMask) {
        let dim = self.dim();
        let phases: Vec<Complex64> = (0..dim).map(|c| mask.phase(c)).collect();

        for row in self.data.chunks_mut(dim) {
            let old = row.to_vec();
            for (c, entry) in row.iter_mut().enumerate() {
                *entry = old[c ^ mask.flip_mask] * phases[c];
            }
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

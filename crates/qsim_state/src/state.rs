//! Quantum states for QSIM
//!
//! Gantree: L1_State → QuantumState
//!
//! A ket is a flat vector of `2^N` amplitudes; a density matrix is a flat
//! row-major `2^N × 2^N` array. Qubit `i` is bit `i` of a basis index, so the
//! density-matrix entry `(r, c)` lives at `r * 2^N + c`.

use crate::operator::Operator;
use num_complex::Complex64;
use qsim_core::{QsimError, QsimResult, Representation};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);

/// Ket or density matrix over `num_qubits` qubits
/// Gantree: QuantumState // 양자 상태
#[derive(Debug, Clone, PartialEq)]
pub struct QuantumState {
    /// Flat amplitudes or row-major matrix entries
    pub(crate) data: Vec<Complex64>,

    /// Number of qubits
    pub(crate) num_qubits: usize,

    /// Storage kind
    pub(crate) representation: Representation,
}

impl QuantumState {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Ket from amplitudes (length must be a power of two)
    pub fn from_ket(data: Vec<Complex64>) -> QsimResult<Self> {
        let len = data.len();
        if len == 0 || !len.is_power_of_two() {
            return Err(QsimError::dimension(
                "ket length must be a power of two",
                len.next_power_of_two(),
                len,
            ));
        }
        Ok(Self {
            num_qubits: len.trailing_zeros() as usize,
            data,
            representation: Representation::Ket,
        })
    }

    /// Density matrix from row-major entries (length must be 4^N)
    pub fn from_density(data: Vec<Complex64>) -> QsimResult<Self> {
        let len = data.len();
        let num_qubits = (len.trailing_zeros() / 2) as usize;
        if len == 0 || 1usize << (2 * num_qubits) != len {
            return Err(QsimError::dimension(
                "density matrix must have 4^N entries",
                1usize << (2 * num_qubits),
                len,
            ));
        }
        Ok(Self {
            data,
            num_qubits,
            representation: Representation::DensityMatrix,
        })
    }

    /// Computational basis ket |index⟩
    pub fn basis_ket(num_qubits: usize, index: usize) -> QsimResult<Self> {
        let dim = 1usize << num_qubits;
        if index >= dim {
            return Err(QsimError::dimension("basis index", dim - 1, index));
        }
        let mut data = vec![ZERO; dim];
        data[index] = ONE;
        Self::from_ket(data)
    }

    /// |00...0⟩
    pub fn zero_ket(num_qubits: usize) -> Self {
        let mut data = vec![ZERO; 1 << num_qubits];
        data[0] = ONE;
        Self {
            data,
            num_qubits,
            representation: Representation::Ket,
        }
    }

    /// Equal superposition |+⟩^{⊗N}
    pub fn plus_ket(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let amp = Complex64::new(1.0 / (dim as f64).sqrt(), 0.0);
        Self {
            data: vec![amp; dim],
            num_qubits,
            representation: Representation::Ket,
        }
    }

    /// |+⟩⟨+|^{⊗N}
    pub fn plus_density(num_qubits: usize) -> Self {
        let dim = 1usize << num_qubits;
        let entry = Complex64::new(1.0 / dim as f64, 0.0);
        Self {
            data: vec![entry; dim * dim],
            num_qubits,
            representation: Representation::DensityMatrix,
        }
    }

    /// Initial QAOA state in the requested representation
    pub fn plus_state(num_qubits: usize, representation: Representation) -> Self {
        match representation {
            Representation::Ket => Self::plus_ket(num_qubits),
            Representation::DensityMatrix => Self::plus_density(num_qubits),
        }
    }

    /// Diagonal matrix in density-matrix storage (e.g. a diagonal observable)
    pub fn diagonal_matrix(diag: &[f64]) -> QsimResult<Self> {
        let dim = diag.len();
        let mut data = vec![ZERO; dim * dim];
        for (i, &d) in diag.iter().enumerate() {
            data[i * dim + i] = Complex64::new(d, 0.0);
        }
        Self::from_density(data)
    }

    /// |ψ⟩⟨ψ| (density matrices are returned unchanged)
    pub fn to_density(&self) -> Self {
        if !self.is_ket() {
            return self.clone();
        }
        let dim = self.dim();
        let mut data = vec![ZERO; dim * dim];
        for r in 0..dim {
            for c in 0..dim {
                data[r * dim + c] = self.data[r] * self.data[c].conj();
            }
        }
        Self {
            data,
            num_qubits: self.num_qubits,
            representation: Representation::DensityMatrix,
        }
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Number of qubits
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.num_qubits
    }

    /// Hilbert-space dimension 2^N
    #[inline]
    pub fn dim(&self) -> usize {
        1 << self.num_qubits
    }

    /// Storage kind
    #[inline]
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Check if stored as a ket
    #[inline]
    pub fn is_ket(&self) -> bool {
        self.representation.is_ket()
    }

    /// Raw entries
    pub fn data(&self) -> &[Complex64] {
        &self.data
    }

    /// Mutable raw entries
    pub fn data_mut(&mut self) -> &mut [Complex64] {
        &mut self.data
    }

    /// Consume into raw entries
    pub fn into_data(self) -> Vec<Complex64> {
        self.data
    }

    /// Density-matrix entry (row, col)
    #[inline]
    pub fn entry(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim() + col]
    }

    // ========================================================================
    // Queries
    // ========================================================================

    /// ℓ2 norm of a ket (Frobenius norm of a density matrix)
    pub fn norm(&self) -> f64 {
        self.data.iter().map(|a| a.norm_sqr()).sum::<f64>().sqrt()
    }

    /// Trace (ket: ⟨ψ|ψ⟩)
    pub fn trace(&self) -> Complex64 {
        if self.is_ket() {
            return Complex64::new(self.data.iter().map(|a| a.norm_sqr()).sum(), 0.0);
        }
        let dim = self.dim();
        (0..dim).map(|i| self.data[i * dim + i]).sum()
    }

    /// Check ρ == ρ† (kets are trivially Hermitian as |ψ⟩⟨ψ|)
    pub fn is_hermitian(&self, tol: f64) -> bool {
        if self.is_ket() {
            return true;
        }
        let dim = self.dim();
        (0..dim).all(|r| (r..dim).all(|c| (self.entry(r, c) - self.entry(c, r).conj()).norm() <= tol))
    }

    /// Ket: unit norm. Density matrix: unit trace and Hermitian.
    pub fn is_valid(&self, tol: f64) -> bool {
        if self.is_ket() {
            (self.norm() - 1.0).abs() <= tol
        } else {
            (self.trace() - ONE).norm() <= tol && self.is_hermitian(tol)
        }
    }

    /// Ket, or density matrix with Tr ρ² == 1
    pub fn is_pure(&self, tol: f64) -> bool {
        if self.is_ket() {
            return true;
        }
        // Tr ρ² = Σ |ρ_rc|² for Hermitian ρ
        let purity: f64 = self.data.iter().map(|a| a.norm_sqr()).sum();
        (purity - 1.0).abs() <= tol
    }

    /// Computational-basis populations
    pub fn probabilities(&self) -> Vec<f64> {
        if self.is_ket() {
            self.data.iter().map(|a| a.norm_sqr()).collect()
        } else {
            let dim = self.dim();
            (0..dim).map(|i| self.data[i * dim + i].re).collect()
        }
    }

    /// ⟨ψ|φ⟩ for two kets
    pub fn inner(&self, other: &QuantumState) -> QsimResult<Complex64> {
        if !self.is_ket() || !other.is_ket() {
            return Err(QsimError::config("inner product is defined for kets only"));
        }
        if self.dim() != other.dim() {
            return Err(QsimError::dimension("inner", self.dim(), other.dim()));
        }
        Ok(self
            .data
            .iter()
            .zip(&other.data)
            .map(|(a, b)| a.conj() * b)
            .sum())
    }

    /// Tr(A · B) for two matrices in density-matrix storage
    pub fn trace_product(&self, other: &QuantumState) -> QsimResult<Complex64> {
        if self.is_ket() || other.is_ket() {
            return Err(QsimError::config("trace product needs density-matrix storage"));
        }
        if self.dim() != other.dim() {
            return Err(QsimError::dimension("trace_product", self.dim(), other.dim()));
        }
        let dim = self.dim();
        let mut acc = ZERO;
        for r in 0..dim {
            for c in 0..dim {
                acc += self.data[r * dim + c] * other.data[c * dim + r];
            }
        }
        Ok(acc)
    }

    /// ⟨O⟩ = ⟨ψ|O|ψ⟩ or Tr(Oρ) for a full-register operator
    pub fn expectation(&self, operator: &Operator) -> QsimResult<Complex64> {
        let dim = self.dim();
        if operator.dim() != dim {
            return Err(QsimError::dimension("expectation operator", dim, operator.dim()));
        }

        if self.is_ket() {
            let mut out = vec![ZERO; dim];
            operator.matvec(&self.data, &mut out);
            Ok(self.data.iter().zip(&out).map(|(a, b)| a.conj() * b).sum())
        } else {
            let mut acc = ZERO;
            for r in 0..dim {
                for k in 0..dim {
                    acc += operator.get(r, k) * self.data[k * dim + r];
                }
            }
            Ok(acc)
        }
    }

    /// ⟨D⟩ for a real diagonal observable
    pub fn expectation_diagonal(&self, diag: &[f64]) -> QsimResult<f64> {
        if diag.len() != self.dim() {
            return Err(QsimError::dimension("diagonal observable", self.dim(), diag.len()));
        }
        Ok(self
            .probabilities()
            .iter()
            .zip(diag)
            .map(|(p, d)| p * d)
            .sum())
    }
}

// ============================================================================
// Tests
// ============================================================================

//! Dense operators for the tensor kernel
//!
//! Gantree: L1_State → Operator
//!
//! A k-qubit operator is a row-major `2^k × 2^k` complex matrix. Local index
//! bit `j` belongs to the j-th target qubit the operator is applied to, so
//! [`Operator::tensor`] places its first factor on the first target.

use num_complex::Complex64;
use qsim_core::{Pauli, QsimError, QsimResult};

const ZERO: Complex64 = Complex64::new(0.0, 0.0);
const ONE: Complex64 = Complex64::new(1.0, 0.0);
const I: Complex64 = Complex64::new(0.0, 1.0);

/// Dense square operator
/// Gantree: Operator // 연산자 행렬
#[derive(Debug, Clone, PartialEq)]
pub struct Operator {
    /// Matrix dimension (power of two)
    dim: usize,

    /// Row-major entries
    data: Vec<Complex64>,
}

impl Operator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from row-major data
    pub fn new(dim: usize, data: Vec<Complex64>) -> QsimResult<Self> {
        if dim == 0 || !dim.is_power_of_two() {
            return Err(QsimError::dimension(
                "operator dimension must be a power of two",
                dim.next_power_of_two(),
                dim,
            ));
        }
        if data.len() != dim * dim {
            return Err(QsimError::dimension("operator data", dim * dim, data.len()));
        }
        Ok(Self { dim, data })
    }

    /// Create from rows
    pub fn from_rows(rows: &[Vec<Complex64>]) -> QsimResult<Self> {
        let dim = rows.len();
        let mut data = Vec::with_capacity(dim * dim);
        for row in rows {
            if row.len() != dim {
                return Err(QsimError::dimension("operator row", dim, row.len()));
            }
            data.extend_from_slice(row);
        }
        Self::new(dim, data)
    }

    /// Create from real rows
    pub fn from_real_rows(rows: &[Vec<f64>]) -> QsimResult<Self> {
        let rows: Vec<Vec<Complex64>> = rows
            .iter()
            .map(|row| row.iter().map(|&x| Complex64::new(x, 0.0)).collect())
            .collect();
        Self::from_rows(&rows)
    }

    /// Diagonal operator
    pub fn from_diagonal(diag: &[Complex64]) -> QsimResult<Self> {
        let dim = diag.len();
        let mut data = vec![ZERO; dim * dim];
        for (i, &d) in diag.iter().enumerate() {
            data[i * dim + i] = d;
        }
        Self::new(dim, data)
    }

    /// Identity on `num_qubits` qubits
    pub fn identity(num_qubits: usize) -> Self {
        let dim = 1 << num_qubits;
        let mut data = vec![ZERO; dim * dim];
        for i in 0..dim {
            data[i * dim + i] = ONE;
        }
        Self { dim, data }
    }

    /// Single-qubit Pauli matrix
    pub fn pauli(p: Pauli) -> Self {
        let data = match p {
            Pauli::I => vec![ONE, ZERO, ZERO, ONE],
            Pauli::X => vec![ZERO, ONE, ONE, ZERO],
            Pauli::Y => vec![ZERO, -I, I, ZERO],
            Pauli::Z => vec![ONE, ZERO, ZERO, -ONE],
        };
        Self { dim: 2, data }
    }

    /// Tensor product of Pauli letters; letter `j` acts on target `j`
    pub fn pauli_string(paulis: &[Pauli]) -> Self {
        let factors: Vec<Operator> = paulis.iter().map(|&p| Self::pauli(p)).collect();
        Self::tensor(&factors)
    }

    /// Tensor product; `factors[0]` acts on the lowest local bits
    /// Gantree: tensor(ops) -> Operator // 텐서곱
    pub fn tensor(factors: &[Operator]) -> Self {
        let mut result = Self::identity(0);

        for factor in factors {
            let dim = result.dim * factor.dim;
            let mut data = vec![ZERO; dim * dim];
            for r in 0..dim {
                let (r_lo, r_hi) = (r % result.dim, r / result.dim);
                for c in 0..dim {
                    let (c_lo, c_hi) = (c % result.dim, c / result.dim);
                    data[r * dim + c] = result.get(r_lo, c_lo) * factor.get(r_hi, c_hi);
                }
            }
            result = Self { dim, data };
        }

        result
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Matrix dimension
    #[inline]
    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Number of qubits the operator acts on
    #[inline]
    pub fn num_qubits(&self) -> usize {
        self.dim.trailing_zeros() as usize
    }

    /// Entry (row, col)
    #[inline]
    pub fn get(&self, row: usize, col: usize) -> Complex64 {
        self.data[row * self.dim + col]
    }

    /// Row-major entries
    pub fn as_slice(&self) -> &[Complex64] {
        &self.data
    }

    // ========================================================================
    // Algebra
    // ========================================================================

    /// Matrix product `self · other`
    pub fn matmul(&self, other: &Operator) -> QsimResult<Operator> {
        if self.dim != other.dim {
            return Err(QsimError::dimension("matmul", self.dim, other.dim));
        }
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for k in 0..n {
                let a = self.data[r * n + k];
                if a == ZERO {
                    continue;
                }
                for c in 0..n {
                    data[r * n + c] += a * other.data[k * n + c];
                }
            }
        }
        Ok(Self { dim: n, data })
    }

    /// Conjugate transpose
    pub fn dagger(&self) -> Operator {
        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            for c in 0..n {
                data[c * n + r] = self.data[r * n + c].conj();
            }
        }
        Self { dim: n, data }
    }

    /// Multiply every entry by a scalar
    pub fn scale(&self, factor: Complex64) -> Operator {
        Self {
            dim: self.dim,
            data: self.data.iter().map(|&x| x * factor).collect(),
        }
    }

    /// Entry-wise sum
    pub fn add(&self, other: &Operator) -> QsimResult<Operator> {
        if self.dim != other.dim {
            return Err(QsimError::dimension("add", self.dim, other.dim));
        }
        Ok(Self {
            dim: self.dim,
            data: self
                .data
                .iter()
                .zip(&other.data)
                .map(|(&a, &b)| a + b)
                .collect(),
        })
    }

    /// Reorder tensor legs: new local bit `k` is old local bit `order[k]`
    ///
    /// Used to bring an operator given for unsorted targets into the order of
    /// the sorted targets.
    pub fn permute_legs(&self, order: &[usize]) -> QsimResult<Operator> {
        let k = self.num_qubits();
        if order.len() != k {
            return Err(QsimError::dimension("permute_legs order", k, order.len()));
        }

        let remap = |idx: usize| -> usize {
            order
                .iter()
                .enumerate()
                .fold(0, |acc, (new_bit, &old_bit)| acc | (((idx >> new_bit) & 1) << old_bit))
        };

        let n = self.dim;
        let mut data = vec![ZERO; n * n];
        for r in 0..n {
            let old_r = remap(r);
            for c in 0..n {
                data[r * n + c] = self.data[old_r * n + remap(c)];
            }
        }
        Ok(Self { dim: n, data })
    }

    // ========================================================================
    // Checks
    // ========================================================================

    /// Check `self == self†`
    pub fn is_hermitian(&self, tol: f64) -> bool {
        let n = self.dim;
        (0..n).all(|r| (0..n).all(|c| (self.get(r, c) - self.get(c, r).conj()).norm() <= tol))
    }

    /// Check `self† · self == I`
    pub fn is_unitary(&self, tol: f64) -> bool {
        self.dagger()
            .matmul(self)
            .map(|p| p.approx_eq(&Self::identity(self.num_qubits()), tol))
            .unwrap_or(false)
    }

    /// Check `self · self == I`
    pub fn is_involutory(&self, tol: f64) -> bool {
        self.matmul(self)
            .map(|p| p.approx_eq(&Self::identity(self.num_qubits()), tol))
            .unwrap_or(false)
    }

    /// Check `self · self == self`
    pub fn is_idempotent(&self, tol: f64) -> bool {
        self.matmul(self)
            .map(|p| p.approx_eq(self, tol))
            .unwrap_or(false)
    }

    /// Entry-wise comparison
    pub fn approx_eq(&self, other: &Operator, tol: f64) -> bool {
        self.dim == other.dim
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| (a - b).norm() <= tol)
    }

    // ========================================================================
    // Kernel Helpers
    // ========================================================================

    /// `out = self · v`
    #[inline]
    pub(crate) fn matvec(&self, v: &[Complex64], out: &mut [Complex64]) {
        let n = self.dim;
        for (r, o) in out.iter_mut().enumerate().take(n) {
            let row = &self.data[r * n..(r + 1) * n];
            *o = row.iter().zip(v).map(|(a, b)| a * b).sum();
        }
    }

    /// `out = conj(self) · v`, i.e. `(v^T · self†)^T`
    #[inline]
    pub(crate) fn matvec_conj(&self, v: &[Complex64], out: &mut [Complex64]) {
        let n = self.dim;
        for (r, o) in out.iter_mut().enumerate().take(n) {
            let row = &self.data[r * n..(r + 1) * n];
            *o = row.iter().zip(v).map(|(a, b)| a.conj() * b).sum();
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

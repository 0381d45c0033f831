//! Core types for QSIM
//!
//! Gantree: L0_Foundation → CoreTypes
//!
//! Type aliases and small enums shared across the workspace.

use crate::error::{QsimError, QsimResult};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Type Aliases
// ============================================================================

/// Qubit identifier (0-indexed, bit `i` of a basis index)
pub type QubitId = usize;

/// Graph node identifier chosen by the caller
pub type NodeId = usize;

/// Rotation angle in radians
pub type Angle = f64;

/// Variational parameter vector `[γ_1..γ_p, β_1..β_p]`
pub type ParamVec = Vec<f64>;

// ============================================================================
// Pauli
// ============================================================================

/// Single-qubit Pauli letter
/// Gantree: Pauli // 파울리 연산자
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Pauli {
    /// Identity
    I,
    /// Bit flip
    X,
    /// Bit + phase flip
    Y,
    /// Phase flip
    Z,
}

impl Pauli {
    /// All non-trivial Pauli letters
    pub const XYZ: [Pauli; 3] = [Pauli::X, Pauli::Y, Pauli::Z];

    /// Parse a single letter (case-insensitive)
    pub fn from_char(c: char) -> QsimResult<Self> {
        match c.to_ascii_uppercase() {
            'I' => Ok(Pauli::I),
            'X' => Ok(Pauli::X),
            'Y' => Ok(Pauli::Y),
            'Z' => Ok(Pauli::Z),
            other => Err(QsimError::InvalidParameters(format!(
                "'{}' is not a Pauli letter",
                other
            ))),
        }
    }

    /// Parse a Pauli string such as `"XZIY"`; letter `k` acts on the k-th target
    pub fn parse_string(s: &str) -> QsimResult<Vec<Self>> {
        s.chars().map(Self::from_char).collect()
    }

    /// Whether this letter flips the computational-basis bit
    #[inline]
    pub fn flips_bit(&self) -> bool {
        matches!(self, Pauli::X | Pauli::Y)
    }

    /// Letter as char
    pub fn as_char(&self) -> char {
        match self {
            Pauli::I => 'I',
            Pauli::X => 'X',
            Pauli::Y => 'Y',
            Pauli::Z => 'Z',
        }
    }
}

impl fmt::Display for Pauli {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_char())
    }
}

impl TryFrom<char> for Pauli {
    type Error = QsimError;

    fn try_from(c: char) -> Result<Self, Self::Error> {
        Self::from_char(c)
    }
}

// ============================================================================
// Representation
// ============================================================================

/// How a quantum state is stored
/// Gantree: Representation // 상태 표현
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Representation {
    /// Pure state vector of length 2^N
    #[default]
    Ket,
    /// Mixed state, row-major 2^N × 2^N
    DensityMatrix,
}

impl Representation {
    /// Check if this is the ket representation
    pub fn is_ket(&self) -> bool {
        matches!(self, Representation::Ket)
    }
}

impl fmt::Display for Representation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Representation::Ket => write!(f, "ket"),
            Representation::DensityMatrix => write!(f, "density matrix"),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

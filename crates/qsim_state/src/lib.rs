//! # QSIM State
//!
//! Kets, density matrices and the tensor operation kernel.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsim_state // L1: State & Kernel (완료)
//!     Operator // 연산자 행렬 (완료)
//!         identity(), pauli(), tensor(), permute_legs()
//!         matmul(), dagger(), is_unitary()
//!     QuantumState // 양자 상태 (완료)
//!         plus_ket(), plus_density(), to_density()
//!         norm(), trace(), is_valid(), expectation()
//!     Kernel // 텐서 커널 (완료)
//!         left_multiply(), right_multiply(), multiply()
//!         single_qubit_operation(), all_qubit_operation()
//!     PauliPath // 파울리 고속 경로 (완료)
//!         apply_pauli(), op_x(), op_y(), op_z()
//!     Rotations // 회전 (완료)
//!         pauli_rotation(), all_qubit_rotation(), idempotent_rotation()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsim_state::prelude::*;
//!
//! let mut psi = QuantumState::zero_ket(3);
//! psi.op_x(0).unwrap();
//! psi.rot_y(2, 0.25).unwrap();
//!
//! assert!(psi.is_valid(1e-10));
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Dense operators (Gantree: L1_State → Operator)
pub mod operator;

/// Ket / density-matrix storage (Gantree: L1_State → QuantumState)
pub mod state;

/// Tensor operation kernel (Gantree: L1_State → Kernel)
pub mod kernel;

/// Pauli fast path (Gantree: L1_State → PauliPath)
pub mod pauli;

/// Closed-form rotations (Gantree: L1_State → Rotations)
pub mod rotation;

// ============================================================================
// Re-exports
// ============================================================================

pub use num_complex::Complex64;
pub use operator::Operator;
pub use rotation::{idempotent_unitary, involutory_unitary};
pub use state::QuantumState;

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qsim_state::prelude::*;
    //! ```

    pub use crate::operator::Operator;
    pub use crate::state::QuantumState;
    pub use num_complex::Complex64;
    pub use qsim_core::prelude::*;
}

// ============================================================================
// Integration Tests
// ============================================================================

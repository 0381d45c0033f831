//! # QSIM Core
//!
//! Foundation types, errors and problem graphs for the QAOA simulator.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsim_core // L0: Foundation (완료)
//!     CoreTypes // 핵심 타입 (완료)
//!         QubitId, NodeId, Angle, ParamVec
//!         Pauli, Representation
//!     Constants // QAOA/수치 상수 (완료)
//!     Errors // 에러 타입 (완료)
//!     Graph // 가중 그래프 (완료)
//!         add_edge(), degree(), degree_parity()
//!         resolve_index_map()
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsim_core::prelude::*;
//!
//! let mut graph = Graph::new();
//! graph.add_edge(0, 1, 1.0).unwrap();
//! graph.add_edge(1, 2, 2.0).unwrap();
//!
//! assert_eq!(graph.num_nodes(), 3);
//! assert_eq!(graph.degree_parity(), DegreeParity::Mixed);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Core types (Gantree: L0_Foundation → CoreTypes)
pub mod types;

/// Constants (Gantree: L0_Foundation → Constants)
pub mod constants;

/// Error types (Gantree: L0_Foundation → Errors)
pub mod error;

/// Weighted graphs (Gantree: L0_Foundation → Graph)
pub mod graph;

// ============================================================================
// Re-exports
// ============================================================================

pub use constants::{numerics, qaoa};
pub use error::{QsimError, QsimResult};
pub use graph::{DegreeParity, Graph};
pub use types::{Angle, NodeId, ParamVec, Pauli, QubitId, Representation};

// ============================================================================
// Prelude
// ============================================================================

pub mod prelude {
    //! Convenient imports for common use cases
    //!
    //! ```rust
    //! use qsim_core::prelude::*;
    //! ```

    pub use crate::constants::{numerics, qaoa};
    pub use crate::error::{QsimError, QsimResult};
    pub use crate::graph::{DegreeParity, Graph};
    pub use crate::types::{Angle, NodeId, ParamVec, Pauli, QubitId, Representation};
}

// ============================================================================
// Version Information
// ============================================================================

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Crate name
pub const NAME: &str = env!("CARGO_PKG_NAME");

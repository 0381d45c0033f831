//! Error types for QSIM
//!
//! Gantree: L0_Foundation → Errors
//!
//! Shared error type for the kernel, the QAOA engine and the optimizer.

// Error variant fields are self-documenting via error messages
#![allow(missing_docs)]

use thiserror::Error;

/// Main error type for QSIM
/// Gantree: QsimError // enum
#[derive(Error, Debug, Clone, PartialEq)]
pub enum QsimError {
    // ========================================================================
    // Kernel Errors
    // ========================================================================
    /// Operator / state dimension mismatch
    /// Gantree: DimensionError{{expected,actual}} // 차원 불일치
    #[error("Dimension error: {context}: expected {expected}, got {actual}")]
    DimensionError {
        context: String,
        expected: usize,
        actual: usize,
    },

    /// Qubit index out of range
    #[error("Qubit {qubit} out of range: max is {max}")]
    QubitOutOfRange { qubit: usize, max: usize },

    /// Same qubit listed twice in a target set
    #[error("Qubit {0} appears more than once in the target list")]
    DuplicateQubit(usize),

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// Invalid combination of representation / noise / symmetry options
    /// Gantree: ConfigurationError(String) // 설정 오류
    #[error("Configuration error: {0}")]
    ConfigurationError(String),

    /// Invalid variational parameter vector
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// Invalid probability for a noise channel
    #[error("Invalid probability {0}: must be in range [0, 1]")]
    InvalidProbability(f64),

    // ========================================================================
    // Graph Errors
    // ========================================================================
    /// Malformed problem graph
    #[error("Invalid graph: {0}")]
    InvalidGraph(String),

    /// Node missing from a node-to-qubit map
    #[error("Node {0} has no qubit index")]
    UnmappedNode(usize),

    // ========================================================================
    // I/O Errors
    // ========================================================================
    /// JSON serialization error
    #[error("JSON error: {0}")]
    JsonError(String),

    /// Output stream error
    #[error("I/O error: {0}")]
    IoError(String),

    // ========================================================================
    // Generic Errors
    // ========================================================================
    /// Internal error (should not happen)
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Result type alias for QSIM operations
/// Gantree: QsimResult<T> // type alias
pub type QsimResult<T> = Result<T, QsimError>;

// ============================================================================
// Error Conversion Helpers
// ============================================================================

impl From<serde_json::Error> for QsimError {
    fn from(err: serde_json::Error) -> Self {
        QsimError::JsonError(err.to_string())
    }
}

impl From<std::io::Error> for QsimError {
    fn from(err: std::io::Error) -> Self {
        QsimError::IoError(err.to_string())
    }
}

// ============================================================================
// Error Helpers
// ============================================================================

impl QsimError {
    /// Shorthand for a dimension mismatch
    pub fn dimension(context: impl Into<String>, expected: usize, actual: usize) -> Self {
        QsimError::DimensionError {
            context: context.into(),
            expected,
            actual,
        }
    }

    /// Shorthand for a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        QsimError::ConfigurationError(msg.into())
    }

    /// Check if error is a dimension error
    pub fn is_dimension_error(&self) -> bool {
        matches!(
            self,
            QsimError::DimensionError { .. }
                | QsimError::QubitOutOfRange { .. }
                | QsimError::DuplicateQubit(_)
        )
    }

    /// Check if error is a configuration error
    pub fn is_configuration_error(&self) -> bool {
        matches!(
            self,
            QsimError::ConfigurationError(_)
                | QsimError::InvalidParameters(_)
                | QsimError::InvalidProbability(_)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = QsimError::dimension("left_multiply", 4, 8);
        let msg = err.to_string();
        assert!(msg.contains("left_multiply"));
        assert!(msg.contains('4'));
        assert!(msg.contains('8'));
    }

    #[test]
    fn test_qubit_out_of_range() {
        let err = QsimError::QubitOutOfRange { qubit: 10, max: 5 };
        assert!(err.to_string().contains("10"));
        assert!(err.is_dimension_error());
    }

    #[test]
    fn test_is_configuration_error() {
        assert!(QsimError::config("noise on ket").is_configuration_error());
        assert!(!QsimError::InvalidGraph("empty".into()).is_configuration_error());
    }

    #[test]
    fn test_json_conversion() {
        let err: QsimError = serde_json::from_str::<u32>("not json").unwrap_err().into();
        assert!(matches!(err, QsimError::JsonError(_)));
    }
}

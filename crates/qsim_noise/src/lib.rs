//! # QSIM Noise
//!
//! Noise channels consumed by the QAOA engine between circuit layers.
//!
//! ## Gantree Architecture
//!
//! ```text
//! qsim_noise // L2: Noise Model (완료)
//!     NoiseChannel // 노이즈 채널 trait (완료)
//!         apply(), apply_adjoint()
//!     KrausChannel // 크라우스 채널 (완료)
//!         depolarizing(), dephasing(), amplitude_damping()
//!         is_trace_preserving()
//!     NoiseSchedule // 노이즈 삽입 위치 (완료)
//!         after_cost, after_mixer
//!         ChannelSpec (serde)
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use qsim_noise::prelude::*;
//! use qsim_state::QuantumState;
//!
//! let channel = KrausChannel::depolarizing(0.01).unwrap();
//! let mut rho = QuantumState::plus_density(2);
//! channel.apply(&mut rho).unwrap();
//! assert!(rho.is_valid(1e-10));
//!
//! let schedule = NoiseSchedule::depolarizing(0.001).unwrap();
//! assert!(!schedule.is_noiseless());
//! ```

#![warn(missing_docs)]

// ============================================================================
// Module Declarations
// ============================================================================

/// Kraus channels (Gantree: L2_Noise → NoiseChannel)
pub mod channel;

/// Insertion points (Gantree: L2_Noise → NoiseSchedule)
pub mod schedule;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{KrausChannel, NoiseChannel};
pub use schedule::{ChannelSpec, NoiseSchedule};

// ============================================================================
// Prelude
// ============================================================================

/// Convenient imports for common use cases
pub mod prelude {
    //! Prelude module for convenient imports
    //!
    //! ```rust
    //! use qsim_noise::prelude::*;
    //! ```

    pub use crate::channel::{KrausChannel, NoiseChannel};
    pub use crate::schedule::{ChannelSpec, NoiseSchedule};
}

// ============================================================================
// Integration Tests
// ============================================================================

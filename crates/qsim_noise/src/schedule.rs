//! Noise insertion points of a QAOA layer
//!
//! Gantree: L2_Noise → NoiseSchedule
//!
//! Each QAOA layer is `e^{-iγ H_C}` followed by `e^{-iβ H_B}`. A channel may
//! follow each of the two unitaries. [`ChannelSpec`] is the serializable
//! description used by configuration files; [`NoiseSchedule`] holds the
//! built channels.

use crate::channel::{KrausChannel, NoiseChannel};
use qsim_core::{QsimError, QsimResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;

/// Serializable channel description
/// Gantree: ChannelSpec // 채널 명세
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ChannelSpec {
    /// Depolarizing with probability `p`
    Depolarizing {
        /// Error probability
        p: f64,
    },
    /// Phase flip with probability `p`
    Dephasing {
        /// Error probability
        p: f64,
    },
    /// Amplitude damping with decay probability `gamma`
    AmplitudeDamping {
        /// Decay probability
        gamma: f64,
    },
}

impl ChannelSpec {
    /// Build the channel
    pub fn build(&self) -> QsimResult<KrausChannel> {
        match *self {
            ChannelSpec::Depolarizing { p } => KrausChannel::depolarizing(p),
            ChannelSpec::Dephasing { p } => KrausChannel::dephasing(p),
            ChannelSpec::AmplitudeDamping { gamma } => KrausChannel::amplitude_damping(gamma),
        }
    }
}

/// Channels applied after the cost and the mixer unitary of every layer
/// Gantree: NoiseSchedule // 노이즈 삽입 위치
#[derive(Debug, Clone, Default)]
pub struct NoiseSchedule {
    after_cost: Option<Arc<dyn NoiseChannel>>,
    after_mixer: Option<Arc<dyn NoiseChannel>>,
}

impl NoiseSchedule {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// No noise
    pub fn noiseless() -> Self {
        Self::default()
    }

    /// Depolarizing channel with probability `p` after both unitaries
    pub fn depolarizing(p: f64) -> QsimResult<Self> {
        let channel: Arc<dyn NoiseChannel> = Arc::new(KrausChannel::depolarizing(p)?);
        Ok(Self {
            after_cost: Some(channel.clone()),
            after_mixer: Some(channel),
        })
    }

    /// Build from serializable descriptions
    pub fn from_specs(
        after_cost: Option<ChannelSpec>,
        after_mixer: Option<ChannelSpec>,
    ) -> QsimResult<Self> {
        let build = |spec: Option<ChannelSpec>| -> QsimResult<Option<Arc<dyn NoiseChannel>>> {
            match spec {
                Some(s) => Ok(Some(Arc::new(s.build()?))),
                None => Ok(None),
            }
        };
        Ok(Self {
            after_cost: build(after_cost)?,
            after_mixer: build(after_mixer)?,
        })
    }

    // ========================================================================
    // Builder Methods
    // ========================================================================

    /// Set the channel applied after the cost unitary
    pub fn with_after_cost(mut self, channel: impl NoiseChannel + 'static) -> Self {
        self.after_cost = Some(Arc::new(channel));
        self
    }

    /// Set the channel applied after the mixer unitary
    pub fn with_after_mixer(mut self, channel: impl NoiseChannel + 'static) -> Self {
        self.after_mixer = Some(Arc::new(channel));
        self
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Channel after the cost unitary
    pub fn after_cost(&self) -> Option<&dyn NoiseChannel> {
        self.after_cost.as_deref()
    }

    /// Channel after the mixer unitary
    pub fn after_mixer(&self) -> Option<&dyn NoiseChannel> {
        self.after_mixer.as_deref()
    }

    /// Check if no channel is configured
    pub fn is_noiseless(&self) -> bool {
        self.after_cost.is_none() && self.after_mixer.is_none()
    }

    /// Fail unless the representation can carry mixed states
    pub fn check_representation(&self, is_ket: bool) -> QsimResult<()> {
        if is_ket && !self.is_noiseless() {
            return Err(QsimError::config(
                "noise channels require the density-matrix representation",
            ));
        }
        Ok(())
    }
}

impl fmt::Display for NoiseSchedule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = |c: &Option<Arc<dyn NoiseChannel>>| {
            c.as_ref()
                .map(|c| c.name().to_string())
                .unwrap_or_else(|| "none".to_string())
        };
        write!(
            f,
            "NoiseSchedule(after_cost={}, after_mixer={})",
            name(&self.after_cost),
            name(&self.after_mixer)
        )
    }
}

// ============================================================================
// Tests
// ============================================================================

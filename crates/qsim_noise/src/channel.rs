//! Noise channels for QSIM
//!
//! Gantree: L2_Noise → NoiseChannel
//!
//! A channel is a completely positive map `ρ → Σ_k A_k ρ A_k†` built from
//! single-qubit Kraus operators and applied independently to every qubit of
//! a density matrix. The adjoint `X → Σ_k A_k† X A_k` propagates observables
//! backwards (Heisenberg picture) for the gradient pass.

use num_complex::Complex64;
use qsim_core::{Pauli, QsimError, QsimResult};
use qsim_state::{Operator, QuantumState};
use std::fmt;

/// Tolerance for the completeness relation `Σ A†A = I`
const KRAUS_TOLERANCE: f64 = 1e-10;

/// Noise channel acting on density matrices
/// Gantree: NoiseChannel // 노이즈 채널 trait
pub trait NoiseChannel: fmt::Debug + Send + Sync {
    /// Channel name for logs
    fn name(&self) -> &str;

    /// `ρ → Σ_k A_k ρ A_k†` on every qubit
    fn apply(&self, state: &mut QuantumState) -> QsimResult<()>;

    /// `X → Σ_k A_k† X A_k` on every qubit
    fn apply_adjoint(&self, state: &mut QuantumState) -> QsimResult<()>;
}

/// Single-qubit Kraus channel applied to every qubit
/// Gantree: KrausChannel // 크라우스 채널
#[derive(Debug, Clone, PartialEq)]
pub struct KrausChannel {
    /// Channel name
    name: String,

    /// Kraus operators (2×2)
    kraus: Vec<Operator>,

    /// Adjoint Kraus operators, cached for the Heisenberg pass
    kraus_dagger: Vec<Operator>,
}

fn check_probability(p: f64) -> QsimResult<()> {
    if !(0.0..=1.0).contains(&p) || !p.is_finite() {
        return Err(QsimError::InvalidProbability(p));
    }
    Ok(())
}

fn real(x: f64) -> Complex64 {
    Complex64::new(x, 0.0)
}

impl KrausChannel {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create from single-qubit Kraus operators
    /// Gantree: new(name,kraus) -> Result<Self> // 생성+검증
    pub fn new(name: impl Into<String>, kraus: Vec<Operator>) -> QsimResult<Self> {
        if kraus.is_empty() {
            return Err(QsimError::config("a channel needs at least one Kraus operator"));
        }
        if let Some(op) = kraus.iter().find(|op| op.dim() != 2) {
            return Err(QsimError::dimension("Kraus operator", 2, op.dim()));
        }

        let channel = Self {
            name: name.into(),
            kraus_dagger: kraus.iter().map(Operator::dagger).collect(),
            kraus,
        };
        if !channel.is_trace_preserving(KRAUS_TOLERANCE) {
            return Err(QsimError::config(format!(
                "Kraus operators of '{}' do not satisfy Σ A†A = I",
                channel.name
            )));
        }
        Ok(channel)
    }

    /// `ρ → (1-p)ρ + p/3 (XρX + YρY + ZρZ)`
    pub fn depolarizing(p: f64) -> QsimResult<Self> {
        check_probability(p)?;
        let mut kraus = vec![Operator::identity(1).scale(real((1.0 - p).sqrt()))];
        for pauli in Pauli::XYZ {
            kraus.push(Operator::pauli(pauli).scale(real((p / 3.0).sqrt())));
        }
        Self::new(format!("depolarizing(p={})", p), kraus)
    }

    /// `ρ → (1-p)ρ + p ZρZ`
    pub fn dephasing(p: f64) -> QsimResult<Self> {
        check_probability(p)?;
        let kraus = vec![
            Operator::identity(1).scale(real((1.0 - p).sqrt())),
            Operator::pauli(Pauli::Z).scale(real(p.sqrt())),
        ];
        Self::new(format!("dephasing(p={})", p), kraus)
    }

    /// Decay `|1⟩ → |0⟩` with probability `gamma`
    pub fn amplitude_damping(gamma: f64) -> QsimResult<Self> {
        check_probability(gamma)?;
        let kraus = vec![
            Operator::from_real_rows(&[vec![1.0, 0.0], vec![0.0, (1.0 - gamma).sqrt()]])?,
            Operator::from_real_rows(&[vec![0.0, gamma.sqrt()], vec![0.0, 0.0]])?,
        ];
        Self::new(format!("amplitude_damping(gamma={})", gamma), kraus)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Kraus operators
    pub fn kraus_operators(&self) -> &[Operator] {
        &self.kraus
    }

    /// Check `Σ A†A = I`
    pub fn is_trace_preserving(&self, tol: f64) -> bool {
        let mut sum = vec![Complex64::new(0.0, 0.0); 4];
        for (a, a_dag) in self.kraus.iter().zip(&self.kraus_dagger) {
            if let Ok(prod) = a_dag.matmul(a) {
                for (s, p) in sum.iter_mut().zip(prod.as_slice()) {
                    *s += *p;
                }
            }
        }
        Operator::new(2, sum)
            .map(|s| s.approx_eq(&Operator::identity(1), tol))
            .unwrap_or(false)
    }

    /// `Σ_k L_k ρ R_k†` on one qubit
    fn sandwich(
        state: &QuantumState,
        qubit: usize,
        left: &[Operator],
        right: &[Operator],
    ) -> QsimResult<QuantumState> {
        let mut acc: Option<QuantumState> = None;
        for (l, r) in left.iter().zip(right) {
            let mut term = state.clone();
            term.left_multiply(&[qubit], l)?;
            term.right_multiply(&[qubit], r)?;
            match acc.as_mut() {
                Some(total) => {
                    for (t, x) in total.data_mut().iter_mut().zip(term.data()) {
                        *t += *x;
                    }
                }
                None => acc = Some(term),
            }
        }
        acc.ok_or_else(|| QsimError::InternalError("empty Kraus set".into()))
    }

    fn require_density(state: &QuantumState) -> QsimResult<()> {
        if state.is_ket() {
            return Err(QsimError::config(
                "noise channels require the density-matrix representation",
            ));
        }
        Ok(())
    }
}

impl NoiseChannel for KrausChannel {
    fn name(&self) -> &str {
        &self.name
    }

    fn apply(&self, state: &mut QuantumState) -> QsimResult<()> {
        Self::require_density(state)?;
        for q in 0..state.num_qubits() {
            // right_multiply(A) applies A†
            *state = Self::sandwich(state, q, &self.kraus, &self.kraus)?;
        }
        Ok(())
    }

    fn apply_adjoint(&self, state: &mut QuantumState) -> QsimResult<()> {
        Self::require_density(state)?;
        for q in 0..state.num_qubits() {
            // A† X A: left A†, right (A†)† = A
            *state = Self::sandwich(state, q, &self.kraus_dagger, &self.kraus_dagger)?;
        }
        Ok(())
    }
}

impl fmt::Display for KrausChannel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} [{} Kraus operators]", self.name, self.kraus.len())
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn one_qubit(entries: [[f64; 2]; 2]) -> QuantumState {
        QuantumState::from_density(
            entries
                .iter()
                .flat_map(|row| row.iter().map(|&x| real(x)))
                .collect(),
        )
        .unwrap()
    }

    #[test]
    fn test_probability_validation() {
        assert_eq!(
            KrausChannel::depolarizing(1.5).unwrap_err(),
            QsimError::InvalidProbability(1.5)
        );
        assert!(KrausChannel::dephasing(-0.1).is_err());
        assert!(KrausChannel::amplitude_damping(0.3).is_ok());
    }

    #[test]
    fn test_constructors_are_trace_preserving() {
        for ch in [
            KrausChannel::depolarizing(0.2).unwrap(),
            KrausChannel::dephasing(0.4).unwrap(),
            KrausChannel::amplitude_damping(0.7).unwrap(),
        ] {
            assert!(ch.is_trace_preserving(1e-12), "{}", ch);
        }
    }

    #[test]
    fn test_incomplete_kraus_rejected() {
        let half = Operator::identity(1).scale(real(0.5));
        assert!(KrausChannel::new("half", vec![half])
            .unwrap_err()
            .is_configuration_error());
    }

    #[test]
    fn test_depolarizing_shrinks_bloch_vector() {
        // |0><0| → diag(1 - 2p/3, 2p/3)
        let p = 0.3;
        let mut rho = one_qubit([[1.0, 0.0], [0.0, 0.0]]);
        KrausChannel::depolarizing(p).unwrap().apply(&mut rho).unwrap();
        assert_abs_diff_eq!(rho.entry(0, 0).re, 1.0 - 2.0 * p / 3.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rho.entry(1, 1).re, 2.0 * p / 3.0, epsilon = 1e-12);
    }

    #[test]
    fn test_amplitude_damping_decays_excited_state() {
        let mut rho = one_qubit([[0.0, 0.0], [0.0, 1.0]]);
        KrausChannel::amplitude_damping(0.25)
            .unwrap()
            .apply(&mut rho)
            .unwrap();
        assert_abs_diff_eq!(rho.entry(0, 0).re, 0.25, epsilon = 1e-12);
        assert_abs_diff_eq!(rho.entry(1, 1).re, 0.75, epsilon = 1e-12);
    }

    #[test]
    fn test_dephasing_kills_coherence() {
        let mut rho = QuantumState::plus_density(1);
        KrausChannel::dephasing(0.5).unwrap().apply(&mut rho).unwrap();
        assert_abs_diff_eq!(rho.entry(0, 1).norm(), 0.0, epsilon = 1e-12);
        assert_abs_diff_eq!(rho.entry(0, 0).re, 0.5, epsilon = 1e-12);
    }

    #[test]
    fn test_adjoint_duality() {
        // Tr(X · N(ρ)) == Tr(N†(X) · ρ)
        let channel = KrausChannel::amplitude_damping(0.35).unwrap();

        let mut rho = QuantumState::plus_density(2);
        rho.rot_y(1, 0.4).unwrap();
        let mut observable = QuantumState::diagonal_matrix(&[1.0, -2.0, 0.5, 3.0]).unwrap();
        observable.rot_x(0, 0.2).unwrap();

        let mut evolved = rho.clone();
        channel.apply(&mut evolved).unwrap();
        let forward = observable.trace_product(&evolved).unwrap();

        let mut heisenberg = observable;
        channel.apply_adjoint(&mut heisenberg).unwrap();
        let backward = heisenberg.trace_product(&rho).unwrap();

        assert_abs_diff_eq!(forward.re, backward.re, epsilon = 1e-12);
        assert_abs_diff_eq!(forward.im, backward.im, epsilon = 1e-12);
    }

    #[test]
    fn test_channel_rejects_ket() {
        let mut psi = QuantumState::plus_ket(2);
        let channel = KrausChannel::depolarizing(0.01).unwrap();
        assert!(channel.apply(&mut psi).unwrap_err().is_configuration_error());
        assert!(channel
            .apply_adjoint(&mut psi)
            .unwrap_err()
            .is_configuration_error());
    }

    #[test]
    fn test_channel_preserves_trace() {
        let mut rho = QuantumState::plus_density(3);
        rho.rot_z(2, 0.6).unwrap();
        KrausChannel::depolarizing(0.1).unwrap().apply(&mut rho).unwrap();
        assert!(rho.is_valid(1e-10));
        assert!(!rho.is_pure(1e-6));
    }
}

//! QAOA evolution and gradient engine
//!
//! Gantree: L3_Qaoa → QaoaSimulator
//!
//! Evolves `|+⟩^{⊗N}` through `p` layers `e^{-iβ_k H_B} e^{-iγ_k H_C}` with
//! `H_B = Σ_i X_i`, and returns `F = ⟨H_C⟩`. Parameters are laid out as
//! `[γ_1..γ_p, β_1..β_p]` and the gradient uses the same layout.
//!
//! The gradient is exact and costs `O(p)` layer applications: one forward
//! pass stores the state around every layer, then a costate `H_C|ψ_p⟩` (ket)
//! or observable `H_C` (density matrix, Heisenberg picture) is walked back
//! through the adjoint layers, reading off one overlap per parameter.

use crate::hamiltonian::CostHamiltonian;
use qsim_core::{Pauli, QsimError, QsimResult, Representation};
use qsim_noise::NoiseSchedule;
use qsim_state::{Complex64, QuantumState};

/// Split `[γ_1..γ_p, β_1..β_p]` into its two halves
pub fn split_params(params: &[f64]) -> QsimResult<(&[f64], &[f64])> {
    if params.is_empty() || params.len() % 2 != 0 {
        return Err(QsimError::InvalidParameters(format!(
            "expected 2p angles with p >= 1, got {}",
            params.len()
        )));
    }
    if let Some(x) = params.iter().find(|x| !x.is_finite()) {
        return Err(QsimError::InvalidParameters(format!(
            "angle {} is not finite",
            x
        )));
    }
    Ok(params.split_at(params.len() / 2))
}

/// QAOA circuit simulator
/// Gantree: QaoaSimulator // QAOA 시뮬레이터
#[derive(Debug, Clone)]
pub struct QaoaSimulator {
    /// Cost Hamiltonian (possibly Z2-reduced)
    hamiltonian: CostHamiltonian,

    /// Ket or density matrix
    representation: Representation,

    /// Channels between unitaries (density matrix only)
    noise: NoiseSchedule,
}

impl QaoaSimulator {
    // ========================================================================
    // Constructors
    // ========================================================================

    /// Create a simulator
    ///
    /// Fails with a configuration error when noise is requested on kets or a
    /// Z2-reduced Hamiltonian is used with density matrices.
    /// Gantree: new(h,repr,noise) -> Result<Self> // 생성+검증
    pub fn new(
        hamiltonian: CostHamiltonian,
        representation: Representation,
        noise: NoiseSchedule,
    ) -> QsimResult<Self> {
        noise.check_representation(representation.is_ket())?;
        if hamiltonian.is_z2_reduced() && !representation.is_ket() {
            return Err(QsimError::config(
                "Z2 reduction is only supported for the ket representation",
            ));
        }
        Ok(Self {
            hamiltonian,
            representation,
            noise,
        })
    }

    /// Noiseless ket simulator
    pub fn ket(hamiltonian: CostHamiltonian) -> QsimResult<Self> {
        Self::new(hamiltonian, Representation::Ket, NoiseSchedule::noiseless())
    }

    /// Density-matrix simulator with the given noise
    pub fn density(hamiltonian: CostHamiltonian, noise: NoiseSchedule) -> QsimResult<Self> {
        Self::new(hamiltonian, Representation::DensityMatrix, noise)
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Cost Hamiltonian
    pub fn hamiltonian(&self) -> &CostHamiltonian {
        &self.hamiltonian
    }

    /// Storage kind
    pub fn representation(&self) -> Representation {
        self.representation
    }

    /// Noise schedule
    pub fn noise(&self) -> &NoiseSchedule {
        &self.noise
    }

    // ========================================================================
    // Layer Operators
    // ========================================================================

    fn initial_state(&self) -> QuantumState {
        QuantumState::plus_state(self.hamiltonian.register_qubits(), self.representation)
    }

    /// `diag(e^{-iγ h})`
    fn cost_phases(&self, gamma: f64) -> Vec<Complex64> {
        self.hamiltonian
            .diagonal()
            .iter()
            .map(|&h| Complex64::from_polar(1.0, -gamma * h))
            .collect()
    }

    fn apply_cost(&self, state: &mut QuantumState, gamma: f64) -> QsimResult<()> {
        state.apply_diagonal(&self.cost_phases(gamma))
    }

    /// `e^{-iβ H_B}`; on a Z2-reduced register `X_{N-1}` acts as the flip of
    /// every remaining qubit
    fn apply_mixer(&self, state: &mut QuantumState, beta: f64) -> QsimResult<()> {
        state.all_qubit_pauli_rotation(Pauli::X, beta)?;
        if self.hamiltonian.is_z2_reduced() {
            let (targets, paulis) = self.flip_string(state.num_qubits());
            state.pauli_rotation(&targets, &paulis, beta)?;
        }
        Ok(())
    }

    /// `H_B ψ` (left multiplication for density matrices)
    fn mixer_generator(&self, state: &QuantumState) -> QsimResult<QuantumState> {
        let n = state.num_qubits();
        let mut acc = state.clone();
        acc.data_mut().iter_mut().for_each(|a| *a = Complex64::new(0.0, 0.0));

        let mut terms: Vec<(Vec<usize>, Vec<Pauli>)> =
            (0..n).map(|q| (vec![q], vec![Pauli::X])).collect();
        if self.hamiltonian.is_z2_reduced() {
            terms.push(self.flip_string(n));
        }

        for (targets, paulis) in terms {
            let mut term = state.clone();
            term.left_pauli(&targets, &paulis)?;
            for (a, t) in acc.data_mut().iter_mut().zip(term.data()) {
                *a += *t;
            }
        }
        Ok(acc)
    }

    fn flip_string(&self, n: usize) -> (Vec<usize>, Vec<Pauli>) {
        ((0..n).collect(), vec![Pauli::X; n])
    }

    fn h_complex(&self) -> Vec<Complex64> {
        self.hamiltonian
            .diagonal()
            .iter()
            .map(|&h| Complex64::new(h, 0.0))
            .collect()
    }

    // ========================================================================
    // Evaluation
    // ========================================================================

    /// State after all `p` layers (on the simulated register)
    pub fn evolve(&self, params: &[f64]) -> QsimResult<QuantumState> {
        let (gammas, betas) = split_params(params)?;
        let mut state = self.initial_state();

        for (&gamma, &beta) in gammas.iter().zip(betas) {
            self.apply_cost(&mut state, gamma)?;
            if let Some(channel) = self.noise.after_cost() {
                channel.apply(&mut state)?;
            }
            self.apply_mixer(&mut state, beta)?;
            if let Some(channel) = self.noise.after_mixer() {
                channel.apply(&mut state)?;
            }
        }
        Ok(state)
    }

    /// `F = ⟨H_C⟩` after the circuit; the quantity the optimizer minimizes
    /// Gantree: evaluate(params) -> f64 // 비용 평가
    pub fn evaluate(&self, params: &[f64]) -> QsimResult<f64> {
        let state = self.evolve(params)?;
        state.expectation_diagonal(self.hamiltonian.diagonal())
    }

    /// Alias of [`evaluate`](Self::evaluate)
    pub fn run(&self, params: &[f64]) -> QsimResult<f64> {
        self.evaluate(params)
    }

    /// Final state on the full `N`-qubit register
    ///
    /// A Z2-reduced ket is expanded to the symmetric full ket.
    pub fn final_state(&self, params: &[f64]) -> QsimResult<QuantumState> {
        let state = self.evolve(params)?;
        if !self.hamiltonian.is_z2_reduced() {
            return Ok(state);
        }

        let reduced = state.data();
        let dim = 1usize << self.hamiltonian.num_qubits();
        let half = dim / 2;
        let scale = std::f64::consts::FRAC_1_SQRT_2;
        let full = (0..dim)
            .map(|z| {
                let src = if z < half { z } else { z ^ (dim - 1) };
                reduced[src] * scale
            })
            .collect();
        QuantumState::from_ket(full)
    }

    /// Cost and its exact gradient in `[γ.., β..]` layout
    /// Gantree: evaluate_with_gradient(params) -> (f64,Vec) // 해석적 기울기
    pub fn evaluate_with_gradient(&self, params: &[f64]) -> QsimResult<(f64, Vec<f64>)> {
        split_params(params)?;
        if self.representation.is_ket() {
            self.gradient_ket(params)
        } else {
            self.gradient_density(params)
        }
    }

    // ========================================================================
    // Gradient: Ket
    // ========================================================================

    fn gradient_ket(&self, params: &[f64]) -> QsimResult<(f64, Vec<f64>)> {
        let (gammas, betas) = split_params(params)?;
        let p = gammas.len();
        let h = self.h_complex();

        // after_cost[k] = C_k ψ_{k-1}, after_mixer[k] = B_k C_k ψ_{k-1}
        let mut after_cost = Vec::with_capacity(p);
        let mut after_mixer = Vec::with_capacity(p);
        let mut state = self.initial_state();
        for (&gamma, &beta) in gammas.iter().zip(betas) {
            self.apply_cost(&mut state, gamma)?;
            after_cost.push(state.clone());
            self.apply_mixer(&mut state, beta)?;
            after_mixer.push(state.clone());
        }

        // costate λ = H_C ψ_p
        let mut costate = state.clone();
        costate.left_diagonal(&h)?;
        let cost = state.inner(&costate)?.re;

        let mut grad = vec![0.0; 2 * p];
        for k in (0..p).rev() {
            let generated = self.mixer_generator(&after_mixer[k])?;
            grad[p + k] = 2.0 * costate.inner(&generated)?.im;
            self.apply_mixer(&mut costate, -betas[k])?;

            let mut generated = after_cost[k].clone();
            generated.left_diagonal(&h)?;
            grad[k] = 2.0 * costate.inner(&generated)?.im;
            self.apply_cost(&mut costate, -gammas[k])?;
        }

        Ok((cost, grad))
    }

    // ========================================================================
    // Gradient: Density Matrix
    // ========================================================================

    fn gradient_density(&self, params: &[f64]) -> QsimResult<(f64, Vec<f64>)> {
        let (gammas, betas) = split_params(params)?;
        let p = gammas.len();
        let h = self.h_complex();

        // Unitary outputs before the noise that follows them
        let mut after_cost = Vec::with_capacity(p);
        let mut after_mixer = Vec::with_capacity(p);
        let mut rho = self.initial_state();
        for (&gamma, &beta) in gammas.iter().zip(betas) {
            self.apply_cost(&mut rho, gamma)?;
            after_cost.push(rho.clone());
            if let Some(channel) = self.noise.after_cost() {
                channel.apply(&mut rho)?;
            }
            self.apply_mixer(&mut rho, beta)?;
            after_mixer.push(rho.clone());
            if let Some(channel) = self.noise.after_mixer() {
                channel.apply(&mut rho)?;
            }
        }
        let cost = rho.expectation_diagonal(self.hamiltonian.diagonal())?;

        // Heisenberg-picture observable, starting at H_C
        let mut observable = QuantumState::diagonal_matrix(self.hamiltonian.diagonal())?;
        let mut grad = vec![0.0; 2 * p];

        for k in (0..p).rev() {
            if let Some(channel) = self.noise.after_mixer() {
                channel.apply_adjoint(&mut observable)?;
            }
            // dF/dβ = 2 Im Tr(Λ H_B b_k)
            let generated = self.mixer_generator(&after_mixer[k])?;
            grad[p + k] = 2.0 * observable.trace_product(&generated)?.im;
            self.apply_mixer(&mut observable, -betas[k])?;

            if let Some(channel) = self.noise.after_cost() {
                channel.apply_adjoint(&mut observable)?;
            }
            let mut generated = after_cost[k].clone();
            generated.left_diagonal(&h)?;
            grad[k] = 2.0 * observable.trace_product(&generated)?.im;
            self.apply_cost(&mut observable, -gammas[k])?;
        }

        Ok((cost, grad))
    }
}

// ============================================================================
// Tests
// ============================================================================

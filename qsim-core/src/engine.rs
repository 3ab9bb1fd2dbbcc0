//! Simulation engine
//!
//! Applies the gates of a [`Circuit`] one at a time. Each step computes a
//! fresh vector `next[i] = Σ_j M[i][j] · v[j]` and then replaces the working
//! vector with it, so a step never reads amplitudes it has already written.
//!
//! ## Complexity
//!
//! O(dim²) per gate, O(dim² · gates) per run. Gates are never multiplied
//! together ahead of time.

use crate::circuit::{Circuit, Gate, GateMatrix};
use crate::complex::Complex;
use crate::error::{SimResult, SimulationError};
use crate::state::StateVector;
use tracing::{debug, trace, warn};

/// Runs circuits against state vectors
#[derive(Debug, Clone, Copy, Default)]
pub struct Simulator;

impl Simulator {
    pub fn new() -> Self {
        Self
    }

    /// Applies every gate of `circuit` in order and returns the final state
    pub fn run(&self, mut state: StateVector, circuit: &Circuit) -> SimResult<StateVector> {
        for (step, gate) in circuit.iter().enumerate() {
            self.step(&mut state, gate, step)?;
        }
        Ok(state)
    }

    /// Applies a single gate
    pub fn step(&self, state: &mut StateVector, gate: &Gate, step: usize) -> SimResult<()> {
        let matrix = gate.matrix();
        if matrix.dim() != state.dim() {
            return Err(SimulationError::DimensionMismatch {
                gate: gate.name().to_string(),
                step,
                expected: state.dim(),
                found: matrix.dim(),
            });
        }

        let next = apply_matrix(matrix, state.amplitudes());
        state.replace_amplitudes(next);

        debug!(step, gate = gate.name(), "applied gate");
        trace!(step, norm_sqr = state.norm_sqr(), "state after gate");

        if state.amplitudes().iter().any(|a| !a.is_finite()) {
            warn!(step, gate = gate.name(), "non-finite amplitude after gate");
        }

        Ok(())
    }
}

/// Matrix-vector product `M · v` into a new vector.
///
/// `vector` must have `matrix.dim()` entries.
pub fn apply_matrix(matrix: &GateMatrix, vector: &[Complex]) -> Vec<Complex> {
    debug_assert_eq!(matrix.dim(), vector.len());

    (0..matrix.dim())
        .map(|i| {
            matrix
                .row(i)
                .iter()
                .zip(vector)
                .fold(Complex::new(0.0, 0.0), |acc, (m, v)| acc + m * v)
        })
        .collect()
}

/// Convenience wrapper for [`Simulator::run`]
pub fn simulate(state: StateVector, circuit: &Circuit) -> SimResult<StateVector> {
    Simulator::new().run(state, circuit)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_1_SQRT_2;
    use std::sync::Arc;

    fn c(re: f64, im: f64) -> Complex {
        Complex::new(re, im)
    }

    fn gate(name: &str, rows: Vec<Vec<Complex>>) -> Arc<Gate> {
        Arc::new(Gate::new(name, GateMatrix::from_rows(rows).unwrap()))
    }

    fn x() -> Arc<Gate> {
        gate("X", vec![vec![c(0.0, 0.0), c(1.0, 0.0)], vec![c(1.0, 0.0), c(0.0, 0.0)]])
    }

    fn h() -> Arc<Gate> {
        let s = FRAC_1_SQRT_2;
        gate("H", vec![vec![c(s, 0.0), c(s, 0.0)], vec![c(s, 0.0), c(-s, 0.0)]])
    }

    fn assert_close(actual: &[Complex], expected: &[Complex]) {
        assert_eq!(actual.len(), expected.len());
        for (a, e) in actual.iter().zip(expected) {
            assert!((a - e).norm() < 1e-12, "{a} != {e}");
        }
    }

    #[test]
    fn test_identity_keeps_state() {
        let id = Arc::new(Gate::new("I", GateMatrix::identity(2)));
        let state = StateVector::basis(1, 0).unwrap();
        let out = simulate(state, &Circuit::new(vec![id])).unwrap();
        assert_close(out.amplitudes(), &[c(1.0, 0.0), c(0.0, 0.0)]);
    }

    #[test]
    fn test_bit_flip() {
        let state = StateVector::basis(1, 0).unwrap();
        let out = simulate(state, &Circuit::new(vec![x()])).unwrap();
        assert_close(out.amplitudes(), &[c(0.0, 0.0), c(1.0, 0.0)]);
    }

    #[test]
    fn test_sequence_matches_composition_of_single_steps() {
        let start = StateVector::new(1, vec![c(0.6, 0.0), c(0.0, 0.8)]).unwrap();

        let after_h = apply_matrix(h().matrix(), start.amplitudes());
        let after_x = apply_matrix(x().matrix(), &after_h);

        let out = simulate(start, &Circuit::new(vec![h(), x()])).unwrap();
        assert_close(out.amplitudes(), &after_x);
    }

    #[test]
    fn test_complex_multiplication() {
        // Y = [[0, -i], [i, 0]]; Y|0> = i|1>
        let y = gate(
            "Y",
            vec![vec![c(0.0, 0.0), c(0.0, -1.0)], vec![c(0.0, 1.0), c(0.0, 0.0)]],
        );
        let out = apply_matrix(y.matrix(), &[c(1.0, 0.0), c(0.0, 0.0)]);
        assert_close(&out, &[c(0.0, 0.0), c(0.0, 1.0)]);

        let out = apply_matrix(y.matrix(), &[c(1.0, 2.0), c(3.0, -1.0)]);
        // -i(3 - i) = -1 - 3i ; i(1 + 2i) = -2 + i
        assert_close(&out, &[c(-1.0, -3.0), c(-2.0, 1.0)]);
    }

    #[test]
    fn test_repeated_gate_is_applied_each_time() {
        let flip = x();
        let circuit = Circuit::new(vec![flip.clone(), flip.clone(), flip]);
        let out = simulate(StateVector::basis(1, 0).unwrap(), &circuit).unwrap();
        assert_close(out.amplitudes(), &[c(0.0, 0.0), c(1.0, 0.0)]);
    }

    #[test]
    fn test_hadamard_twice_is_identity() {
        let circuit = Circuit::new(vec![h(), h()]);
        let out = simulate(StateVector::basis(1, 1).unwrap(), &circuit).unwrap();
        assert_close(out.amplitudes(), &[c(0.0, 0.0), c(1.0, 0.0)]);
    }

    #[test]
    fn test_empty_circuit_returns_input() {
        let state = StateVector::basis(2, 2).unwrap();
        let out = simulate(state.clone(), &Circuit::default()).unwrap();
        assert_eq!(out, state);
    }

    #[test]
    fn test_no_unitarity_check() {
        let scale = gate(
            "S2",
            vec![vec![c(2.0, 0.0), c(0.0, 0.0)], vec![c(0.0, 0.0), c(2.0, 0.0)]],
        );
        let state = StateVector::basis(1, 0).unwrap();
        let out = simulate(state, &Circuit::new(vec![scale])).unwrap();
        assert_close(out.amplitudes(), &[c(2.0, 0.0), c(0.0, 0.0)]);
    }

    #[test]
    fn test_dimension_mismatch() {
        let state = StateVector::basis(2, 0).unwrap();
        let err = simulate(state, &Circuit::new(vec![x()])).unwrap_err();
        assert_eq!(
            err,
            SimulationError::DimensionMismatch {
                gate: "X".to_string(),
                step: 0,
                expected: 4,
                found: 2,
            }
        );
    }
}

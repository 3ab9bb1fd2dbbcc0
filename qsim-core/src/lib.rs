//! # ⚛️ qsim-core: State-Vector Circuit Simulation
//!
//! Loads an initial state (`#qubits` / `#init`) and a circuit of named gate
//! matrices (`#define` / `#circ`), then applies the gates one after another.
//!
//! ## Computational Complexity
//!
//! **Loading O(dim²) per gate:**
//! - dim = 2^qubits amplitudes
//! - every gate matrix holds dim × dim complex literals
//!
//! **Simulation O(dim² × K):**
//! - K = number of entries on the `#circ` line
//! - one dense matrix-vector product per entry
//!
//! **Scalability:**
//! - Up to ~12 qubits: ✓ Excellent
//! - 13-15 qubits: △ gate files reach gigabytes
//! - Beyond that the file format itself is the limit
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────────┐   qubits   ┌────────────────┐
//! │ init file    │ ─────────▶ │ circuit file   │
//! │ load_state   │            │ load_circuit   │
//! └──────┬───────┘            └───────┬────────┘
//!        │ StateVector                │ Circuit
//!        └──────────────┬─────────────┘
//!                       ▼
//!               ┌───────────────┐      ┌──────────────┐
//!               │ Simulator     │ ───▶ │ format_state │
//!               └───────────────┘      └──────────────┘
//! ```
//!
//! ## Example
//!
//! ```
//! use qsim_core::{run, SimConfig, format_state};
//!
//! let init = "#qubits 1\n#init [1, 0]\n";
//! let circuit = "#define X [ (0,1) (1,0) ]\n#circ X\n";
//!
//! let config = SimConfig::default();
//! let state = run(init.as_bytes(), circuit.as_bytes(), &config).unwrap();
//! assert_eq!(format_state(state.amplitudes(), config.output.precision), "[0, 1]");
//! ```

pub mod circuit;
pub mod complex;
pub mod config;
pub mod engine;
pub mod error;
pub mod format;
pub mod scanner;
pub mod state;

pub use circuit::{
    Circuit, CircuitOptions, Gate, GateMatrix, MAX_GATE_NAME_LEN, load_circuit, load_circuit_file,
};
pub use complex::{Complex, parse_complex, parse_imaginary, parse_real};
pub use config::{CircuitConfig, MAX_PRECISION, OutputConfig, SimConfig};
pub use engine::{Simulator, apply_matrix, simulate};
pub use error::{
    ComplexParseError, ErrorKind, LoadError, LoadResult, QsimError, QsimResult, SimResult,
    SimulationError,
};
pub use format::{Canonical, DEFAULT_PRECISION, format_real, format_state};
pub use state::{MAX_QUBITS, StateVector, load_state, load_state_file};

use std::io::BufRead;
use std::path::Path;

/// Loads both inputs and simulates. Labels diagnostics `init` and `circuit`.
pub fn run<I: BufRead, C: BufRead>(
    init: I,
    circuit: C,
    config: &SimConfig,
) -> QsimResult<StateVector> {
    let state = load_state(init, "init")?;
    let circuit = load_circuit(circuit, "circuit", state.qubits(), &config.circuit_options())?;
    Ok(simulate(state, &circuit)?)
}

/// [`run`] for files on disk; diagnostics name the paths
pub fn run_files(
    init: impl AsRef<Path>,
    circuit: impl AsRef<Path>,
    config: &SimConfig,
) -> QsimResult<StateVector> {
    let state = load_state_file(init)?;
    let circuit = load_circuit_file(circuit, state.qubits(), &config.circuit_options())?;
    Ok(simulate(state, &circuit)?)
}

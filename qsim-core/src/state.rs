//! State vector and its loader (`#qubits` / `#init`)

use crate::complex::{Complex, parse_complex};
use crate::error::{LoadError, LoadResult};
use crate::scanner::{BracketBlock, LineReader, directive_rest, split_elements};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use tracing::{debug, info};

/// Largest supported register
pub const MAX_QUBITS: u32 = 30;

const QUBITS_DIRECTIVE: &str = "#qubits";
const INIT_DIRECTIVE: &str = "#init";

/// Amplitudes of a `qubits`-qubit register; index `i` is basis state `|i⟩`
#[derive(Debug, Clone, PartialEq)]
pub struct StateVector {
    qubits: u32,
    amplitudes: Vec<Complex>,
}

impl StateVector {
    /// Builds a state vector, checking that it holds exactly `2^qubits`
    /// amplitudes.
    pub fn new(qubits: u32, amplitudes: Vec<Complex>) -> Option<Self> {
        if !(1..=MAX_QUBITS).contains(&qubits) || amplitudes.len() != dimension(qubits) {
            return None;
        }
        Some(Self { qubits, amplitudes })
    }

    /// Basis state `|index⟩`
    pub fn basis(qubits: u32, index: usize) -> Option<Self> {
        if !(1..=MAX_QUBITS).contains(&qubits) {
            return None;
        }
        let dim = dimension(qubits);
        if index >= dim {
            return None;
        }
        let mut amplitudes = vec![Complex::new(0.0, 0.0); dim];
        amplitudes[index] = Complex::new(1.0, 0.0);
        Some(Self { qubits, amplitudes })
    }

    pub fn qubits(&self) -> u32 {
        self.qubits
    }

    /// Number of amplitudes (`2^qubits`)
    pub fn dim(&self) -> usize {
        self.amplitudes.len()
    }

    pub fn amplitudes(&self) -> &[Complex] {
        &self.amplitudes
    }

    pub fn into_amplitudes(self) -> Vec<Complex> {
        self.amplitudes
    }

    /// False once any amplitude has overflowed to infinity or become NaN
    pub fn is_finite(&self) -> bool {
        self.amplitudes.iter().all(|a| a.is_finite())
    }

    /// Squared norm, 1.0 for a normalized state
    pub fn norm_sqr(&self) -> f64 {
        self.amplitudes.iter().map(|a| a.norm_sqr()).sum()
    }

    // The engine swaps in a freshly computed vector of the same length
    pub(crate) fn replace_amplitudes(&mut self, amplitudes: Vec<Complex>) {
        debug_assert_eq!(amplitudes.len(), self.amplitudes.len());
        self.amplitudes = amplitudes;
    }
}

/// `2^qubits`; callers keep `qubits` within `1..=MAX_QUBITS`
pub fn dimension(qubits: u32) -> usize {
    1usize << qubits
}

/// Loads a state vector from a file
pub fn load_state_file(path: impl AsRef<Path>) -> LoadResult<StateVector> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::io(&origin, source))?;
    load_state(BufReader::new(file), &origin)
}

/// Loads a state vector from any buffered reader.
///
/// Only the first `#qubits` and the first `#init` lines are read, in any
/// order; every other line is ignored. Reading stops once both are found.
pub fn load_state<R: BufRead>(reader: R, origin: &str) -> LoadResult<StateVector> {
    let mut lines = LineReader::new(reader);
    let mut qubits: Option<u32> = None;
    let mut init: Option<BracketBlock> = None;

    while qubits.is_none() || init.is_none() {
        let Some(line) = lines.next_line().map_err(|e| LoadError::io(origin, e))? else {
            break;
        };

        if qubits.is_none() {
            if let Some(rest) = directive_rest(line.content(), QUBITS_DIRECTIVE) {
                let count = parse_qubit_count(rest, origin, line.number)?;
                debug!(origin, line = line.number, qubits = count, "found #qubits");
                qubits = Some(count);
                continue;
            }
        }

        if init.is_none() && directive_rest(line.content(), INIT_DIRECTIVE).is_some() {
            let number = line.number;
            let block = BracketBlock::collect(line, &mut lines)
                .map_err(|e| LoadError::scan(origin, number, INIT_DIRECTIVE, e))?;
            debug!(origin, line = number, "found #init");
            init = Some(block);
        }
    }

    let Some(qubits) = qubits else {
        return Err(LoadError::DirectiveMissing {
            origin: origin.to_string(),
            directive: QUBITS_DIRECTIVE,
        });
    };
    let Some(init) = init else {
        return Err(LoadError::DirectiveMissing {
            origin: origin.to_string(),
            directive: INIT_DIRECTIVE,
        });
    };

    let amplitudes = parse_amplitudes(&init, qubits, origin)?;
    info!(origin, qubits, dim = amplitudes.len(), "state vector loaded");

    Ok(StateVector { qubits, amplitudes })
}

fn parse_qubit_count(rest: &str, origin: &str, line: usize) -> LoadResult<u32> {
    let value = rest.trim_start();
    let count: i64 = value.parse().map_err(|_| LoadError::MalformedQubitCount {
        origin: origin.to_string(),
        line,
        value: value.to_string(),
    })?;

    if !(1..=i64::from(MAX_QUBITS)).contains(&count) {
        return Err(LoadError::QubitCountOutOfRange {
            origin: origin.to_string(),
            line,
            value: count,
            max: MAX_QUBITS,
        });
    }

    Ok(count as u32)
}

fn parse_amplitudes(
    block: &BracketBlock,
    qubits: u32,
    origin: &str,
) -> LoadResult<Vec<Complex>> {
    let dim = dimension(qubits);
    let line = block.first_line();
    let tokens = split_elements(block.body());

    if tokens.len() != dim {
        return Err(LoadError::ElementCount {
            origin: origin.to_string(),
            line,
            context: "#init".to_string(),
            expected: dim,
            found: tokens.len(),
        });
    }

    let mut amplitudes = Vec::new();
    amplitudes
        .try_reserve_exact(dim)
        .map_err(|source| LoadError::Allocation {
            origin: origin.to_string(),
            what: format!("{dim} amplitudes"),
            source: Some(source),
        })?;

    for (index, token) in tokens.into_iter().enumerate() {
        let value = parse_complex(token).map_err(|source| LoadError::InvalidLiteral {
            origin: origin.to_string(),
            line,
            context: format!("#init element {index}"),
            literal: token.to_string(),
            source,
        })?;
        amplitudes.push(value);
    }

    Ok(amplitudes)
}

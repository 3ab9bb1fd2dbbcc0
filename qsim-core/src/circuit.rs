//! Gates, circuits and the circuit loader (`#define` / `#circ`)
//!
//! A circuit file defines any number of named `dim × dim` matrices and one
//! application order:
//!
//! ```text
//! #define X [ (0, 1) (1, 0) ]
//! #define H [ (0.7071067812, 0.7071067812)
//!             (0.7071067812, -0.7071067812) ]
//! #circ H X H
//! ```
//!
//! Definitions and the order may appear in any sequence; names are resolved
//! after the whole input has been read.

use crate::complex::{Complex, parse_complex};
use crate::error::{LoadError, LoadResult};
use crate::scanner::{BracketBlock, LineReader, directive_rest, split_elements, split_rows};
use crate::state::{MAX_QUBITS, dimension};
use std::collections::HashMap;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Longest accepted gate name, in characters
pub const MAX_GATE_NAME_LEN: usize = 15;

const DEFINE_DIRECTIVE: &str = "#define";
const CIRC_DIRECTIVE: &str = "#circ";

/// Square complex matrix stored row-major
#[derive(Debug, Clone, PartialEq)]
pub struct GateMatrix {
    dim: usize,
    entries: Vec<Complex>,
}

impl GateMatrix {
    /// Builds a matrix from `dim` rows of `dim` entries each
    pub fn from_rows(rows: Vec<Vec<Complex>>) -> Option<Self> {
        let dim = rows.len();
        if dim == 0 || rows.iter().any(|row| row.len() != dim) {
            return None;
        }
        Some(Self {
            dim,
            entries: rows.into_iter().flatten().collect(),
        })
    }

    /// Identity matrix
    pub fn identity(dim: usize) -> Self {
        let mut entries = vec![Complex::new(0.0, 0.0); dim * dim];
        for i in 0..dim {
            entries[i * dim + i] = Complex::new(1.0, 0.0);
        }
        Self { dim, entries }
    }

    pub fn dim(&self) -> usize {
        self.dim
    }

    /// Entry at `(row, col)`
    pub fn get(&self, row: usize, col: usize) -> Complex {
        self.entries[row * self.dim + col]
    }

    pub fn row(&self, row: usize) -> &[Complex] {
        &self.entries[row * self.dim..(row + 1) * self.dim]
    }

    /// All entries, row-major
    pub fn entries(&self) -> &[Complex] {
        &self.entries
    }
}

/// Named gate
#[derive(Debug, Clone, PartialEq)]
pub struct Gate {
    name: String,
    matrix: GateMatrix,
    line: usize,
}

impl Gate {
    pub fn new(name: impl Into<String>, matrix: GateMatrix) -> Self {
        Self {
            name: name.into(),
            matrix,
            line: 0,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn matrix(&self) -> &GateMatrix {
        &self.matrix
    }

    /// Line of the `#define` (0 when built in code)
    pub fn line(&self) -> usize {
        self.line
    }
}

/// Ordered gate applications.
///
/// Repeated occurrences of a gate share one `Arc`, so each entry can be
/// dropped on its own without affecting the others.
#[derive(Debug, Clone, Default)]
pub struct Circuit {
    gates: Vec<Arc<Gate>>,
}

impl Circuit {
    pub fn new(gates: Vec<Arc<Gate>>) -> Self {
        Self { gates }
    }

    pub fn len(&self) -> usize {
        self.gates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    pub fn gates(&self) -> &[Arc<Gate>] {
        &self.gates
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Arc<Gate>> {
        self.gates.iter()
    }

    /// Gate names in application order
    pub fn names(&self) -> Vec<&str> {
        self.gates.iter().map(|g| g.name()).collect()
    }

    pub fn into_gates(self) -> Vec<Arc<Gate>> {
        self.gates
    }
}

impl<'a> IntoIterator for &'a Circuit {
    type Item = &'a Arc<Gate>;
    type IntoIter = std::slice::Iter<'a, Arc<Gate>>;

    fn into_iter(self) -> Self::IntoIter {
        self.gates.iter()
    }
}

/// Loader switches
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CircuitOptions {
    /// Reject definitions that `#circ` never references
    pub require_all_gates_used: bool,
}

/// Definitions seen so far, in definition order
#[derive(Default)]
struct GateTable {
    gates: Vec<Arc<Gate>>,
    index: HashMap<String, usize>,
}

impl GateTable {
    fn get(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }

    fn insert(&mut self, gate: Gate) {
        self.index.insert(gate.name.clone(), self.gates.len());
        self.gates.push(Arc::new(gate));
    }

    fn len(&self) -> usize {
        self.gates.len()
    }

    fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }
}

/// Loads a circuit for a `qubits`-qubit register from a file
pub fn load_circuit_file(
    path: impl AsRef<Path>,
    qubits: u32,
    options: &CircuitOptions,
) -> LoadResult<Circuit> {
    let path = path.as_ref();
    let origin = path.display().to_string();
    let file = File::open(path).map_err(|source| LoadError::io(&origin, source))?;
    load_circuit(BufReader::new(file), &origin, qubits, options)
}

/// Loads a circuit from any buffered reader.
///
/// Every `#define` is parsed as it is met; only the first `#circ` counts.
/// Names are resolved once the input is exhausted.
pub fn load_circuit<R: BufRead>(
    reader: R,
    origin: &str,
    qubits: u32,
    options: &CircuitOptions,
) -> LoadResult<Circuit> {
    if !(1..=MAX_QUBITS).contains(&qubits) {
        return Err(LoadError::RegisterSize {
            origin: origin.to_string(),
            qubits,
            max: MAX_QUBITS,
        });
    }

    let dim = dimension(qubits);
    let mut lines = LineReader::new(reader);
    let mut table = GateTable::default();
    let mut order: Option<(usize, Vec<String>)> = None;

    while let Some(line) = lines.next_line().map_err(|e| LoadError::io(origin, e))? {
        if directive_rest(line.content(), DEFINE_DIRECTIVE).is_some() {
            let number = line.number;
            let block = BracketBlock::collect(line, &mut lines)
                .map_err(|e| LoadError::scan(origin, number, DEFINE_DIRECTIVE, e))?;
            let gate = parse_definition(&block, &table, dim, origin)?;
            debug!(
                origin,
                line = number,
                gate = gate.name(),
                lines = block.last_line() - block.first_line() + 1,
                "found #define"
            );
            table.insert(gate);
            continue;
        }

        if let Some(rest) = directive_rest(line.content(), CIRC_DIRECTIVE) {
            if order.is_some() {
                debug!(origin, line = line.number, "ignoring repeated #circ");
                continue;
            }
            let names: Vec<String> = rest.split_whitespace().map(str::to_string).collect();
            debug!(origin, line = line.number, steps = names.len(), "found #circ");
            order = Some((line.number, names));
        }
    }

    let Some((circ_line, names)) = order else {
        return Err(LoadError::DirectiveMissing {
            origin: origin.to_string(),
            directive: CIRC_DIRECTIVE,
        });
    };

    if table.is_empty()
        && let Some(first) = names.first()
    {
        return Err(LoadError::NoDefinitions {
            origin: origin.to_string(),
            line: circ_line,
            name: first.clone(),
        });
    }

    let circuit = resolve(&table, names, circ_line, origin, options)?;

    if circuit.is_empty() {
        warn!(origin, line = circ_line, "#circ lists no gates");
    }
    info!(
        origin,
        defined = table.len(),
        steps = circuit.len(),
        "circuit loaded"
    );

    Ok(circuit)
}

fn resolve(
    table: &GateTable,
    names: Vec<String>,
    line: usize,
    origin: &str,
    options: &CircuitOptions,
) -> LoadResult<Circuit> {
    let mut used = vec![false; table.len()];
    let mut gates = Vec::with_capacity(names.len());

    for name in names {
        let Some(idx) = table.get(&name) else {
            return Err(LoadError::UnresolvedReference {
                origin: origin.to_string(),
                line,
                name,
            });
        };
        used[idx] = true;
        gates.push(Arc::clone(&table.gates[idx]));
    }

    if options.require_all_gates_used {
        let unused: Vec<String> = table
            .gates
            .iter()
            .zip(&used)
            .filter(|(_, used)| !**used)
            .map(|(gate, _)| gate.name.clone())
            .collect();
        if !unused.is_empty() {
            return Err(LoadError::UnusedDefinition {
                origin: origin.to_string(),
                names: unused,
            });
        }
    }

    Ok(Circuit::new(gates))
}

fn parse_definition(
    block: &BracketBlock,
    table: &GateTable,
    dim: usize,
    origin: &str,
) -> LoadResult<Gate> {
    let line = block.first_line();
    let name = parse_gate_name(block.head(), origin, line)?;

    if table.get(&name).is_some() {
        return Err(LoadError::DuplicateName {
            origin: origin.to_string(),
            line,
            name,
        });
    }

    let matrix = parse_matrix(block.body(), &name, dim, origin, line)?;

    Ok(Gate { name, matrix, line })
}

fn parse_gate_name(head: &str, origin: &str, line: usize) -> LoadResult<String> {
    let syntax = |message: String| LoadError::Syntax {
        origin: origin.to_string(),
        line,
        message,
    };

    let rest = head.strip_prefix(DEFINE_DIRECTIVE).unwrap_or(head);
    let mut tokens = rest.split_whitespace();

    let Some(name) = tokens.next() else {
        return Err(syntax("#define: missing gate name".to_string()));
    };
    if let Some(extra) = tokens.next() {
        return Err(syntax(format!(
            "#define {name}: unexpected '{extra}' before '['"
        )));
    }
    if let Some(bad) = name.chars().find(|c| matches!(c, '(' | ')' | ',')) {
        return Err(syntax(format!(
            "#define: invalid character '{bad}' in gate name '{name}'"
        )));
    }
    if name.chars().count() > MAX_GATE_NAME_LEN {
        return Err(syntax(format!(
            "#define: gate name '{name}' is longer than {MAX_GATE_NAME_LEN} characters"
        )));
    }

    Ok(name.to_string())
}

fn parse_matrix(
    body: &str,
    name: &str,
    dim: usize,
    origin: &str,
    line: usize,
) -> LoadResult<GateMatrix> {
    let rows = split_rows(body).map_err(|e| {
        LoadError::scan(origin, line, &format!("{DEFINE_DIRECTIVE} {name}"), e)
    })?;

    if rows.len() != dim {
        return Err(LoadError::RowCount {
            origin: origin.to_string(),
            line,
            gate: name.to_string(),
            expected: dim,
            found: rows.len(),
        });
    }

    let allocation = |source| LoadError::Allocation {
        origin: origin.to_string(),
        what: format!("{dim}x{dim} matrix for gate '{name}'"),
        source,
    };
    let capacity = dim.checked_mul(dim).ok_or_else(|| allocation(None))?;
    let mut entries = Vec::new();
    entries
        .try_reserve_exact(capacity)
        .map_err(|e| allocation(Some(e)))?;

    for (r, row) in rows.into_iter().enumerate() {
        let tokens = split_elements(row);
        if tokens.len() != dim {
            return Err(LoadError::ElementCount {
                origin: origin.to_string(),
                line,
                context: format!("row {r} of gate '{name}'"),
                expected: dim,
                found: tokens.len(),
            });
        }

        for (c, token) in tokens.into_iter().enumerate() {
            let value = parse_complex(token).map_err(|source| LoadError::InvalidLiteral {
                origin: origin.to_string(),
                line,
                context: format!("gate '{name}' at ({r}, {c})"),
                literal: token.to_string(),
                source,
            })?;
            entries.push(value);
        }
    }

    Ok(GateMatrix { dim, entries })
}

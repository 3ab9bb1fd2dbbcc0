//! Error types for qsim-core

use crate::scanner::ScanError;
use std::collections::TryReserveError;
use std::fmt;
use thiserror::Error;

/// Result of loading an init or circuit file
pub type LoadResult<T> = Result<T, LoadError>;

/// Result of running the simulation engine
pub type SimResult<T> = Result<T, SimulationError>;

/// Result for operations that can fail at any stage
pub type QsimResult<T> = Result<T, QsimError>;

/// Errors produced while parsing a single complex literal
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComplexParseError {
    #[error("empty literal")]
    Empty,

    #[error("'{0}' is not a real number")]
    InvalidReal(String),

    #[error("missing imaginary unit 'i' in '{0}'")]
    MissingImaginaryUnit(String),

    #[error("'{0}' is out of range for a 64-bit float")]
    OutOfRange(String),

    #[error("ambiguous sign in '{0}': exponent or real/imaginary separator")]
    Ambiguous(String),
}

/// Category of a [`LoadError`], independent of the detailed variant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    FileAccess,
    DirectiveMissing,
    Syntax,
    Dimension,
    DuplicateName,
    UnresolvedReference,
    UnusedDefinition,
    Allocation,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::FileAccess => "file access error",
            Self::DirectiveMissing => "missing directive",
            Self::Syntax => "syntax error",
            Self::Dimension => "dimension error",
            Self::DuplicateName => "duplicate name",
            Self::UnresolvedReference => "unresolved reference",
            Self::UnusedDefinition => "unused definition",
            Self::Allocation => "allocation error",
        };
        f.write_str(name)
    }
}

/// Errors raised by the state and circuit loaders.
///
/// Every variant names the origin (usually the file path) and, when the
/// failure is tied to a directive, the line that directive starts on.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("{origin}: cannot read input: {source}")]
    FileAccess {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{origin}: missing {directive} directive")]
    DirectiveMissing {
        origin: String,
        directive: &'static str,
    },

    #[error("{origin}:{line}: {message}")]
    Syntax {
        origin: String,
        line: usize,
        message: String,
    },

    #[error("{origin}:{line}: invalid complex literal '{literal}' in {context}: {source}")]
    InvalidLiteral {
        origin: String,
        line: usize,
        context: String,
        literal: String,
        #[source]
        source: ComplexParseError,
    },

    #[error("{origin}:{line}: #circ references gate '{name}' but no #define directive exists")]
    NoDefinitions {
        origin: String,
        line: usize,
        name: String,
    },

    #[error("{origin}:{line}: malformed qubit count '{value}'")]
    MalformedQubitCount {
        origin: String,
        line: usize,
        value: String,
    },

    #[error("{origin}:{line}: qubit count {value} out of range (1..={max})")]
    QubitCountOutOfRange {
        origin: String,
        line: usize,
        value: i64,
        max: u32,
    },

    #[error("{origin}: cannot size a circuit for {qubits} qubits (supported: 1..={max})")]
    RegisterSize { origin: String, qubits: u32, max: u32 },

    #[error("{origin}:{line}: {context} has {found} elements, expected {expected}")]
    ElementCount {
        origin: String,
        line: usize,
        context: String,
        expected: usize,
        found: usize,
    },

    #[error("{origin}:{line}: gate '{gate}' has {found} rows, expected {expected}")]
    RowCount {
        origin: String,
        line: usize,
        gate: String,
        expected: usize,
        found: usize,
    },

    #[error("{origin}:{line}: gate '{name}' is already defined")]
    DuplicateName {
        origin: String,
        line: usize,
        name: String,
    },

    #[error("{origin}:{line}: #circ references undefined gate '{name}'")]
    UnresolvedReference {
        origin: String,
        line: usize,
        name: String,
    },

    #[error("{origin}: gates defined but never used in #circ: {}", .names.join(", "))]
    UnusedDefinition { origin: String, names: Vec<String> },

    #[error("{origin}: cannot allocate {what}")]
    Allocation {
        origin: String,
        what: String,
        #[source]
        source: Option<TryReserveError>,
    },
}

impl LoadError {
    pub(crate) fn io(origin: &str, source: std::io::Error) -> Self {
        Self::FileAccess {
            origin: origin.to_string(),
            source,
        }
    }

    /// Maps a scanner failure inside `directive` (starting at `line`)
    pub(crate) fn scan(origin: &str, line: usize, directive: &str, err: ScanError) -> Self {
        match err {
            ScanError::Io(source) => Self::io(origin, source),
            other => Self::Syntax {
                origin: origin.to_string(),
                line,
                message: format!("{directive}: {other}"),
            },
        }
    }

    /// Category of the failure
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileAccess { .. } => ErrorKind::FileAccess,
            Self::DirectiveMissing { .. } | Self::NoDefinitions { .. } => {
                ErrorKind::DirectiveMissing
            }
            Self::Syntax { .. }
            | Self::InvalidLiteral { .. }
            | Self::MalformedQubitCount { .. } => ErrorKind::Syntax,
            Self::QubitCountOutOfRange { .. }
            | Self::RegisterSize { .. }
            | Self::ElementCount { .. }
            | Self::RowCount { .. } => ErrorKind::Dimension,
            Self::DuplicateName { .. } => ErrorKind::DuplicateName,
            Self::UnresolvedReference { .. } => ErrorKind::UnresolvedReference,
            Self::UnusedDefinition { .. } => ErrorKind::UnusedDefinition,
            Self::Allocation { .. } => ErrorKind::Allocation,
        }
    }

    /// Origin (file path or label) the error was raised for
    pub fn origin(&self) -> &str {
        match self {
            Self::FileAccess { origin, .. }
            | Self::DirectiveMissing { origin, .. }
            | Self::NoDefinitions { origin, .. }
            | Self::Syntax { origin, .. }
            | Self::InvalidLiteral { origin, .. }
            | Self::MalformedQubitCount { origin, .. }
            | Self::QubitCountOutOfRange { origin, .. }
            | Self::RegisterSize { origin, .. }
            | Self::ElementCount { origin, .. }
            | Self::RowCount { origin, .. }
            | Self::DuplicateName { origin, .. }
            | Self::UnresolvedReference { origin, .. }
            | Self::UnusedDefinition { origin, .. }
            | Self::Allocation { origin, .. } => origin,
        }
    }

    /// Line of the offending directive, when there is one
    pub fn line(&self) -> Option<usize> {
        match self {
            Self::Syntax { line, .. }
            | Self::NoDefinitions { line, .. }
            | Self::InvalidLiteral { line, .. }
            | Self::MalformedQubitCount { line, .. }
            | Self::QubitCountOutOfRange { line, .. }
            | Self::ElementCount { line, .. }
            | Self::RowCount { line, .. }
            | Self::DuplicateName { line, .. }
            | Self::UnresolvedReference { line, .. } => Some(*line),
            _ => None,
        }
    }
}

/// Errors raised by the simulation engine
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SimulationError {
    #[error(
        "gate '{gate}' at step {step} is {found}x{found}, state vector has {expected} amplitudes"
    )]
    DimensionMismatch {
        gate: String,
        step: usize,
        expected: usize,
        found: usize,
    },
}

/// Any failure along the load → simulate pipeline
#[derive(Debug, Error)]
pub enum QsimError {
    #[error(transparent)]
    Load(#[from] LoadError),

    #[error(transparent)]
    Simulation(#[from] SimulationError),

    #[error("Config error: {0}")]
    Config(String),
}

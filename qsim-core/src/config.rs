//! Simulator configuration (`qsim.toml`)
//!
//! ```toml
//! [output]
//! precision = 10
//!
//! [circuit]
//! require_all_gates_used = false
//! ```
//!
//! Missing tables and keys fall back to their defaults.

use crate::circuit::CircuitOptions;
use crate::error::{QsimError, QsimResult};
use crate::format::DEFAULT_PRECISION;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Largest precision that still changes the rendering of an `f64`
pub const MAX_PRECISION: usize = 17;

/// Top-level configuration
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub output: OutputConfig,
    pub circuit: CircuitConfig,
}

/// How the final state vector is printed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Significant digits per real component
    pub precision: usize,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
        }
    }
}

/// Circuit loader switches
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CircuitConfig {
    /// Reject gates that are defined but never referenced by `#circ`
    pub require_all_gates_used: bool,
}

impl SimConfig {
    /// Rejects definitions where every gate must be used
    pub fn strict() -> Self {
        Self {
            circuit: CircuitConfig {
                require_all_gates_used: true,
            },
            ..Default::default()
        }
    }

    /// Parse and validate a TOML document
    pub fn from_str(content: &str) -> QsimResult<Self> {
        let config: Self = toml::from_str(content)
            .map_err(|e| QsimError::Config(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file
    pub fn from_file(path: &Path) -> QsimResult<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| QsimError::Config(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_str(&content)
    }

    /// Serialize back to TOML
    pub fn to_toml(&self) -> QsimResult<String> {
        toml::to_string_pretty(self)
            .map_err(|e| QsimError::Config(format!("Failed to serialize config: {}", e)))
    }

    pub fn validate(&self) -> QsimResult<()> {
        if !(1..=MAX_PRECISION).contains(&self.output.precision) {
            return Err(QsimError::Config(format!(
                "output.precision must be in 1..={}, got {}",
                MAX_PRECISION, self.output.precision
            )));
        }
        Ok(())
    }

    pub fn circuit_options(&self) -> CircuitOptions {
        CircuitOptions {
            require_all_gates_used: self.circuit.require_all_gates_used,
        }
    }
}

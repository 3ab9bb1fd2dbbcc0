//! qsim - quantum circuit simulator
//!
//! Loads an init file and a circuit file, applies the circuit and prints the
//! final state vector on stdout.

use anyhow::{Context, Result, bail};
use clap::{ArgAction, Parser};
use colored::*;
use qsim_core::{
    Circuit, SimConfig, Simulator, StateVector, format_real, format_state, load_circuit_file,
    load_state_file,
};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "qsim")]
#[command(author, version, long_about = None)]
#[command(about = "Simulate a quantum circuit on a state vector")]
struct Cli {
    /// Initial state (#qubits / #init)
    #[arg(value_name = "INIT_FILE")]
    init: PathBuf,

    /// Gate definitions and order (#define / #circ)
    #[arg(value_name = "CIRCUIT_FILE")]
    circuit: PathBuf,

    /// TOML configuration file
    #[arg(short, long, value_name = "FILE", env = "QSIM_CONFIG")]
    config: Option<PathBuf>,

    /// Significant digits for output (1..=17)
    #[arg(short, long, value_name = "N")]
    precision: Option<usize>,

    /// Require every defined gate to appear in #circ
    #[arg(long)]
    strict: bool,

    /// Load and validate both files without simulating
    #[arg(long)]
    check: bool,

    /// Raise log level (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if let Err(e) = run(&cli) {
        eprintln!("{} {:#}", "error:".red().bold(), e);
        std::process::exit(1);
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_env("QSIM_LOG")
                .unwrap_or_else(|_| format!("qsim={level},qsim_core={level}").into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn run(cli: &Cli) -> Result<()> {
    let config = build_config(cli)?;
    debug!(?config, "resolved configuration");

    let state = load_state_file(&cli.init)
        .with_context(|| format!("failed to load initial state from {}", cli.init.display()))?;
    let circuit = load_circuit_file(&cli.circuit, state.qubits(), &config.circuit_options())
        .with_context(|| format!("failed to load circuit from {}", cli.circuit.display()))?;

    if cli.check {
        print_summary(&cli.init, &state, &cli.circuit, &circuit);
        return Ok(());
    }

    let result = Simulator::new().run(state, &circuit).context("simulation failed")?;
    info!(steps = circuit.len(), "simulation finished");

    // inf/NaN have no literal form
    if !result.is_finite() {
        bail!("final state has non-finite amplitudes (arithmetic overflow); nothing printed");
    }

    println!("{}", format_state(result.amplitudes(), config.output.precision));
    Ok(())
}

/// File config first, then command-line overrides
fn build_config(cli: &Cli) -> Result<SimConfig> {
    let mut config = match &cli.config {
        Some(path) => SimConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => SimConfig::default(),
    };

    if let Some(precision) = cli.precision {
        config.output.precision = precision;
    }
    if cli.strict {
        config.circuit.require_all_gates_used = true;
    }

    config.validate().context("invalid command-line options")?;
    Ok(config)
}

fn print_summary(init_path: &Path, state: &StateVector, circuit_path: &Path, circuit: &Circuit) {
    println!(
        "{} {}: {} qubit(s), {} amplitudes, norm² {}",
        "✓".green(),
        init_path.display(),
        state.qubits(),
        state.dim(),
        format_real(state.norm_sqr(), 6)
    );

    let mut distinct = circuit.names();
    distinct.sort_unstable();
    distinct.dedup();
    println!(
        "{} {}: {} step(s) using {} gate(s){}",
        "✓".green(),
        circuit_path.display(),
        circuit.len(),
        distinct.len(),
        if distinct.is_empty() {
            String::new()
        } else {
            format!(" ({})", distinct.join(", "))
        }
    );
}

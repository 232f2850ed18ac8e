//! Project command implementation.
//!
//! Prints the projected Bloch state of one or every qubit.

use anyhow::Result;
use console::style;
use serde::Serialize;
use tracing::{debug, warn};

use qcanvas_bloch::{BlochState, BlochVector, ProjectionCache, Projector};
use qcanvas_ir::{CircuitSnapshot, IrError, QubitId};

use super::common::load_circuit;

/// Output options resolved from flags and config.
#[derive(Debug, Clone)]
pub struct ProjectOptions<'a> {
    pub qubit: Option<u32>,
    pub format: &'a str,
    pub precision: usize,
    pub use_cache: bool,
}

/// One row of `--format json` output.
#[derive(Debug, Serialize)]
struct QubitReport {
    qubit: u32,
    theta: f64,
    phi: f64,
    vector: BlochVector,
    amplitudes: [AmplitudeReport; 2],
    probabilities: [f64; 2],
}

#[derive(Debug, Serialize)]
struct AmplitudeReport {
    re: f64,
    im: f64,
}

impl QubitReport {
    fn new(qubit: u32, state: &BlochState) -> Self {
        let [alpha, beta] = state.amplitudes;
        Self {
            qubit,
            theta: state.theta,
            phi: state.phi,
            vector: state.vector(),
            amplitudes: [
                AmplitudeReport {
                    re: alpha.re,
                    im: alpha.im,
                },
                AmplitudeReport {
                    re: beta.re,
                    im: beta.im,
                },
            ],
            probabilities: state.probabilities(),
        }
    }
}

/// Execute the project command.
pub fn execute(input: &str, options: &ProjectOptions<'_>) -> Result<()> {
    let circuit = load_circuit(input)?;

    // Projection stays defined on invalid circuits; only report it.
    if let Err(e) = circuit.validate() {
        warn!(error = %e, "projecting a circuit that fails validation");
    }

    if let Some(q) = options.qubit {
        if !circuit.contains_qubit(QubitId(q)) {
            return Err(IrError::QubitOutOfRange {
                qubit: QubitId(q),
                num_qubits: circuit.num_qubits(),
                gate_id: None,
            }
            .into());
        }
    }

    let snapshot = CircuitSnapshot::new(0, circuit);
    let qubits: Vec<u32> = match options.qubit {
        Some(q) => vec![q],
        None => (0..snapshot.circuit().num_qubits()).collect(),
    };

    let states: Vec<BlochState> = if options.use_cache {
        let cache = ProjectionCache::new();
        match options.qubit {
            Some(q) => vec![cache.get(&snapshot, QubitId(q))],
            None => cache.project_all(&snapshot),
        }
    } else {
        let mut projector = Projector::for_snapshot(&snapshot);
        qubits.iter().map(|&q| projector.project(QubitId(q))).collect()
    };
    debug!(qubits = states.len(), cached = options.use_cache, "projection finished");

    let reports: Vec<QubitReport> = qubits
        .iter()
        .zip(&states)
        .map(|(&q, state)| QubitReport::new(q, state))
        .collect();

    match options.format {
        "json" => {
            let json = serde_json::to_string_pretty(&reports)
                .map_err(|e| anyhow::anyhow!("JSON serialization failed: {e}"))?;
            println!("{json}");
        }
        "table" => print_table(input, &reports, options.precision),
        other => anyhow::bail!("Unknown output format: '{other}'. Available: table, json"),
    }

    Ok(())
}

fn print_table(input: &str, reports: &[QubitReport], precision: usize) {
    let width = precision + 4;

    println!(
        "{} Bloch states for {}",
        style("→").cyan().bold(),
        style(input).green()
    );
    println!(
        "  {:<6} {:>width$} {:>width$} {:>width$} {:>width$}  {:>width$}  {}",
        "qubit", "theta", "phi", "P(0)", "P(1)", "alpha", "beta",
    );

    for r in reports {
        let [alpha, beta] = &r.amplitudes;
        let beta = format!("{:.precision$}{:+.precision$}i", beta.re, beta.im);
        println!(
            "  {:<6} {:>width$.precision$} {:>width$.precision$} {:>width$.precision$} {:>width$.precision$}  {:>width$.precision$}  {}",
            style(format!("q{}", r.qubit)).cyan(),
            r.theta,
            r.phi,
            r.probabilities[0],
            r.probabilities[1],
            alpha.re,
            style(beta).yellow(),
        );
    }
}

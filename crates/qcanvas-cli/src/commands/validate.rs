//! Validate command implementation.
//!
//! Admits the circuit through the store, which enforces the same invariants
//! the editor does: qubit bounds, unique gate ids, no repeated operand and
//! operand count matching the gate kind.

use anyhow::{Context, Result};
use console::style;
use tracing::info;

use qcanvas_ir::{CircuitStore, GateKind};

use super::common::load_circuit;

/// Execute the validate command.
pub fn execute(input: &str) -> Result<()> {
    println!("{} Validating {}", style("→").cyan().bold(), style(input).green());

    let circuit = load_circuit(input)?;
    let store = CircuitStore::from_circuit(circuit)
        .with_context(|| format!("Circuit in {input} is invalid"))?;
    let circuit = store.circuit();

    println!(
        "{} Valid circuit: {} qubits, {} gates, {} measurements",
        style("✓").green().bold(),
        circuit.num_qubits(),
        circuit.len(),
        circuit.measurements().len()
    );

    let unrecognized: Vec<&str> = circuit
        .gates()
        .iter()
        .filter(|g| matches!(g.kind, GateKind::Unrecognized(_)))
        .map(|g| g.id.as_str())
        .collect();
    if !unrecognized.is_empty() {
        println!(
            "  {} {} gate(s) with unrecognized names project as no-ops: {}",
            style("!").yellow().bold(),
            unrecognized.len(),
            unrecognized.join(", ")
        );
    }

    info!(
        num_qubits = circuit.num_qubits(),
        num_gates = circuit.len(),
        "validated circuit"
    );
    Ok(())
}

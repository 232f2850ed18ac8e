//! Error types for the IR crate.

use crate::qubit::{ClbitId, QubitId};
use thiserror::Error;

/// Errors raised when a mutation or an imported circuit would break a
/// circuit invariant.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A gate or measurement references a qubit outside the circuit width.
    #[error("Qubit {qubit} is out of range for a {num_qubits}-qubit circuit{}", format_gate_context(.gate_id))]
    QubitOutOfRange {
        /// The offending qubit.
        qubit: QubitId,
        /// Width of the circuit.
        num_qubits: u32,
        /// Id of the gate that referenced the qubit, if any.
        gate_id: Option<String>,
    },

    /// Two gates share the same id.
    #[error("Duplicate gate id '{0}'")]
    DuplicateGateId(String),

    /// No gate with the given id exists.
    #[error("Gate '{0}' not found")]
    GateNotFound(String),

    /// The same qubit appears twice in one gate.
    #[error("Duplicate qubit {qubit} in operation{}", format_gate_context(.gate_id))]
    DuplicateQubit {
        /// The duplicate qubit.
        qubit: QubitId,
        /// Id of the offending gate, if known.
        gate_id: Option<String>,
    },

    /// Gate requires a different number of qubits.
    #[error("Gate '{gate_name}' requires {expected} qubits, got {got}")]
    ArityMismatch {
        /// Canonical name of the gate.
        gate_name: String,
        /// Expected number of qubits.
        expected: usize,
        /// Actual number of qubits provided.
        got: usize,
    },

    /// Shrinking the circuit would orphan a referenced qubit.
    #[error("Cannot shrink circuit to {requested} qubits: qubit {referenced} is still in use")]
    ShrinkBelowReferencedQubit {
        /// The requested width.
        requested: u32,
        /// The highest qubit still referenced by a gate or measurement.
        referenced: QubitId,
    },

    /// No measurement exists for the given pair.
    #[error("No measurement of {qubit} into {clbit}")]
    MeasurementNotFound {
        /// The measured qubit.
        qubit: QubitId,
        /// The classical bit.
        clbit: ClbitId,
    },

    /// Circuit JSON could not be decoded or encoded.
    #[error("Invalid circuit JSON: {0}")]
    Json(#[from] serde_json::Error),
}

#[allow(clippy::ref_option)]
fn format_gate_context(gate_id: &Option<String>) -> String {
    match gate_id {
        Some(id) => format!(" (gate: {id})"),
        None => String::new(),
    }
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_carry_gate_context() {
        let err = IrError::QubitOutOfRange {
            qubit: QubitId(4),
            num_qubits: 2,
            gate_id: Some("g7".into()),
        };
        assert_eq!(
            err.to_string(),
            "Qubit q4 is out of range for a 2-qubit circuit (gate: g7)"
        );

        let err = IrError::DuplicateQubit {
            qubit: QubitId(1),
            gate_id: None,
        };
        assert_eq!(err.to_string(), "Duplicate qubit q1 in operation");
    }
}

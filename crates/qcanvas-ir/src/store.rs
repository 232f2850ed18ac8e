//! Owned circuit state with validated mutations.
//!
//! The application layer holds one [`CircuitStore`] per editing session and
//! hands out [`CircuitSnapshot`]s to readers. A snapshot never changes after
//! it is taken; every successful mutation bumps the store revision so readers
//! can key caches on it.

use std::sync::Arc;

use tracing::{debug, warn};
use uuid::Uuid;

use crate::circuit::{Circuit, Measurement};
use crate::error::{IrError, IrResult};
use crate::gate::Gate;
use crate::qubit::{ClbitId, QubitId};
use crate::timeline::QubitTimeline;

/// An immutable view of the circuit at one revision.
#[derive(Debug, Clone)]
pub struct CircuitSnapshot {
    revision: u64,
    circuit: Arc<Circuit>,
    timeline: Arc<QubitTimeline>,
}

impl CircuitSnapshot {
    /// Take a snapshot of a circuit outside any store.
    pub fn new(revision: u64, circuit: Circuit) -> Self {
        let timeline = QubitTimeline::build(&circuit);
        Self {
            revision,
            circuit: Arc::new(circuit),
            timeline: Arc::new(timeline),
        }
    }

    /// Store revision this snapshot was taken at.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// The circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Per-qubit gate index of the circuit.
    pub fn timeline(&self) -> &QubitTimeline {
        &self.timeline
    }
}

/// The working circuit of an editing session.
#[derive(Debug, Default)]
pub struct CircuitStore {
    circuit: Circuit,
    revision: u64,
    snapshot: Option<CircuitSnapshot>,
}

impl CircuitStore {
    /// Create a store holding an empty circuit.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            circuit: Circuit::new(num_qubits),
            revision: 0,
            snapshot: None,
        }
    }

    /// Adopt an imported circuit.
    ///
    /// Gates without an id are given a fresh one. Fails if the circuit breaks
    /// any invariant.
    pub fn from_circuit(mut circuit: Circuit) -> IrResult<Self> {
        for gate in circuit.gates_mut().iter_mut() {
            if gate.id.is_empty() {
                gate.id = fresh_id();
            }
        }
        circuit.validate()?;
        debug!(
            num_qubits = circuit.num_qubits(),
            num_gates = circuit.len(),
            "adopted circuit"
        );
        Ok(Self {
            circuit,
            revision: 0,
            snapshot: None,
        })
    }

    /// The current circuit.
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Number of successful mutations so far.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// An immutable snapshot of the current revision.
    ///
    /// Repeated calls without an intervening mutation share the same
    /// underlying circuit.
    pub fn snapshot(&mut self) -> CircuitSnapshot {
        if let Some(snapshot) = &self.snapshot {
            return snapshot.clone();
        }
        let snapshot = CircuitSnapshot::new(self.revision, self.circuit.clone());
        self.snapshot = Some(snapshot.clone());
        snapshot
    }

    /// Add a gate and return its id.
    pub fn add_gate(&mut self, mut gate: Gate) -> IrResult<String> {
        if gate.id.is_empty() {
            gate.id = fresh_id();
        }
        self.circuit
            .check_gate(&gate, None)
            .inspect_err(|e| warn!(error = %e, "rejected gate"))?;

        let id = gate.id.clone();
        self.circuit.gates_mut().push(gate);
        self.bump();
        debug!(revision = self.revision, id = %id, "gate added");
        Ok(id)
    }

    /// Remove a gate by id.
    pub fn remove_gate(&mut self, id: &str) -> IrResult<Gate> {
        let index = self.index_of(id)?;
        let gate = self.circuit.gates_mut().remove(index);
        self.bump();
        debug!(revision = self.revision, id = %id, "gate removed");
        Ok(gate)
    }

    /// Replace the gate with id `id`.
    ///
    /// The replacement keeps the old id when its own id is empty.
    pub fn update_gate(&mut self, id: &str, mut gate: Gate) -> IrResult<()> {
        let index = self.index_of(id)?;
        if gate.id.is_empty() {
            gate.id = id.to_string();
        }
        self.circuit
            .check_gate(&gate, Some(id))
            .inspect_err(|e| warn!(error = %e, id = %id, "rejected gate update"))?;

        self.circuit.gates_mut()[index] = gate;
        self.bump();
        debug!(revision = self.revision, id = %id, "gate updated");
        Ok(())
    }

    /// Change the circuit width.
    ///
    /// Growing always succeeds. Shrinking fails while a gate or measurement
    /// still references a wire that would disappear.
    pub fn set_num_qubits(&mut self, num_qubits: u32) -> IrResult<()> {
        if let Some(highest) = self.circuit.highest_referenced_qubit() {
            if highest.0 >= num_qubits {
                return Err(IrError::ShrinkBelowReferencedQubit {
                    requested: num_qubits,
                    referenced: highest,
                });
            }
        }
        if num_qubits == self.circuit.num_qubits() {
            return Ok(());
        }
        self.circuit.set_num_qubits(num_qubits);
        self.bump();
        debug!(revision = self.revision, num_qubits, "circuit resized");
        Ok(())
    }

    /// Record a measurement of `qubit` into `clbit`. Recording the same pair
    /// twice is a no-op.
    pub fn add_measurement(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<()> {
        if !self.circuit.contains_qubit(qubit) {
            return Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.circuit.num_qubits(),
                gate_id: None,
            });
        }
        let measurement = Measurement::new(qubit, clbit);
        if self.circuit.measurements().contains(&measurement) {
            return Ok(());
        }
        self.circuit.measurements_mut().push(measurement);
        self.bump();
        Ok(())
    }

    /// Forget a recorded measurement.
    pub fn remove_measurement(&mut self, qubit: QubitId, clbit: ClbitId) -> IrResult<()> {
        let measurements = self.circuit.measurements_mut();
        let Some(index) = measurements
            .iter()
            .position(|m| m.qubit == qubit && m.clbit == clbit)
        else {
            return Err(IrError::MeasurementNotFound { qubit, clbit });
        };
        measurements.remove(index);
        self.bump();
        Ok(())
    }

    /// Remove every gate and measurement, keeping the width.
    pub fn clear(&mut self) {
        if self.circuit.is_empty() && self.circuit.measurements().is_empty() {
            return;
        }
        self.circuit = Circuit::new(self.circuit.num_qubits());
        self.bump();
        debug!(revision = self.revision, "circuit cleared");
    }

    fn index_of(&self, id: &str) -> IrResult<usize> {
        self.circuit
            .gates()
            .iter()
            .position(|g| g.id == id)
            .ok_or_else(|| IrError::GateNotFound(id.to_string()))
    }

    fn bump(&mut self) {
        self.revision += 1;
        self.snapshot = None;
    }
}

fn fresh_id() -> String {
    Uuid::new_v4().to_string()
}

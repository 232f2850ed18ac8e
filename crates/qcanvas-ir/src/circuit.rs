//! Circuit snapshots and the builder API.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::gate::{Gate, GateKind};
use crate::qubit::{ClbitId, QubitId};

/// A qubit read out into a classical bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Measurement {
    /// The measured qubit.
    pub qubit: QubitId,
    /// The classical bit receiving the result.
    #[serde(rename = "classicalBit")]
    pub clbit: ClbitId,
}

impl Measurement {
    /// Create a new measurement.
    pub fn new(qubit: QubitId, clbit: ClbitId) -> Self {
        Self { qubit, clbit }
    }
}

/// A quantum circuit as drawn on the canvas.
///
/// Gates are kept in declaration order, which is not necessarily time
/// order; time order is derived from [`Gate::position`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Circuit {
    #[serde(default)]
    gates: Vec<Gate>,
    #[serde(rename = "qubits", default)]
    num_qubits: u32,
    #[serde(default)]
    measurements: Vec<Measurement>,
}

impl Circuit {
    /// Create an empty circuit with the given width.
    pub fn new(num_qubits: u32) -> Self {
        Self {
            gates: vec![],
            num_qubits,
            measurements: vec![],
        }
    }

    /// Create a circuit from raw gates without validating them.
    ///
    /// Used for snapshots of partially edited circuits; see
    /// [`Circuit::validate`].
    pub fn from_gates(num_qubits: u32, gates: Vec<Gate>) -> Self {
        Self {
            gates,
            num_qubits,
            measurements: vec![],
        }
    }

    /// Decode a circuit from its JSON wire form. No invariants are checked.
    pub fn from_json(json: &str) -> IrResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Encode the circuit as JSON.
    pub fn to_json(&self) -> IrResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    // =========================================================================
    // Builder
    // =========================================================================

    /// Append a gate after checking it against the circuit invariants.
    ///
    /// A gate without an id is given `g{n}`, where `n` is its declaration
    /// index.
    pub fn apply(&mut self, mut gate: Gate) -> IrResult<&mut Self> {
        if gate.id.is_empty() {
            gate.id = format!("g{}", self.gates.len());
        }
        self.check_gate(&gate, None)?;
        self.gates.push(gate);
        Ok(self)
    }

    /// Apply Hadamard gate.
    pub fn h(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::H, [qubit], position))
    }

    /// Apply Pauli-X gate.
    pub fn x(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::X, [qubit], position))
    }

    /// Apply Pauli-Y gate.
    pub fn y(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Y, [qubit], position))
    }

    /// Apply Pauli-Z gate.
    pub fn z(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Z, [qubit], position))
    }

    /// Apply S gate.
    pub fn s(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::S, [qubit], position))
    }

    /// Apply S-dagger gate.
    pub fn sdg(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Sdg, [qubit], position))
    }

    /// Apply T gate.
    pub fn t(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::T, [qubit], position))
    }

    /// Apply T-dagger gate.
    pub fn tdg(&mut self, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Tdg, [qubit], position))
    }

    /// Apply Rx rotation gate.
    pub fn rx(&mut self, theta: f64, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Rx { theta }, [qubit], position))
    }

    /// Apply Ry rotation gate.
    pub fn ry(&mut self, theta: f64, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Ry { theta }, [qubit], position))
    }

    /// Apply Rz rotation gate.
    pub fn rz(&mut self, theta: f64, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Rz { theta }, [qubit], position))
    }

    /// Apply phase gate.
    pub fn p(&mut self, lambda: f64, qubit: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::P { lambda }, [qubit], position))
    }

    /// Apply universal U3 gate.
    pub fn u3(
        &mut self,
        theta: f64,
        phi: f64,
        lambda: f64,
        qubit: QubitId,
        position: u32,
    ) -> IrResult<&mut Self> {
        self.apply(Gate::new(
            GateKind::U3 { theta, phi, lambda },
            [qubit],
            position,
        ))
    }

    /// Apply CNOT (CX) gate.
    pub fn cx(&mut self, control: QubitId, target: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CX, [control, target], position))
    }

    /// Apply CY gate.
    pub fn cy(&mut self, control: QubitId, target: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CY, [control, target], position))
    }

    /// Apply CZ gate.
    pub fn cz(&mut self, control: QubitId, target: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CZ, [control, target], position))
    }

    /// Apply controlled-Rx gate.
    pub fn crx(
        &mut self,
        theta: f64,
        control: QubitId,
        target: QubitId,
        position: u32,
    ) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CRx { theta }, [control, target], position))
    }

    /// Apply controlled-Ry gate.
    pub fn cry(
        &mut self,
        theta: f64,
        control: QubitId,
        target: QubitId,
        position: u32,
    ) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CRy { theta }, [control, target], position))
    }

    /// Apply controlled-Rz gate.
    pub fn crz(
        &mut self,
        theta: f64,
        control: QubitId,
        target: QubitId,
        position: u32,
    ) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CRz { theta }, [control, target], position))
    }

    /// Apply Toffoli (CCX) gate.
    pub fn ccx(
        &mut self,
        c1: QubitId,
        c2: QubitId,
        target: QubitId,
        position: u32,
    ) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::CCX, [c1, c2, target], position))
    }

    /// Apply SWAP gate.
    pub fn swap(&mut self, q1: QubitId, q2: QubitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Swap, [q1, q2], position))
    }

    /// Measure a qubit into a classical bit.
    ///
    /// Places a `MEASURE` gate bound to `clbit` and records the pair in the
    /// measurement list.
    pub fn measure(&mut self, qubit: QubitId, clbit: ClbitId, position: u32) -> IrResult<&mut Self> {
        self.apply(Gate::new(GateKind::Measure, [qubit], position).with_conditional_bit(clbit))?;
        self.measurements.push(Measurement::new(qubit, clbit));
        Ok(self)
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Number of qubit wires.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Gates in declaration order.
    pub fn gates(&self) -> &[Gate] {
        &self.gates
    }

    /// Recorded measurements.
    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Number of gates.
    pub fn len(&self) -> usize {
        self.gates.len()
    }

    /// Check if the circuit has no gates.
    pub fn is_empty(&self) -> bool {
        self.gates.is_empty()
    }

    /// Look up a gate by id.
    pub fn gate(&self, id: &str) -> Option<&Gate> {
        self.gates.iter().find(|g| g.id == id)
    }

    /// Check if `qubit` is a wire of this circuit.
    #[inline]
    pub fn contains_qubit(&self, qubit: QubitId) -> bool {
        qubit.0 < self.num_qubits
    }

    // =========================================================================
    // Structural queries
    // =========================================================================

    /// Gates that act on `qubit`, in time order.
    ///
    /// The sort is stable, so gates sharing a position keep their declaration
    /// order. A qubit outside the circuit yields nothing.
    pub fn gates_on_qubit(&self, qubit: QubitId) -> Vec<&Gate> {
        if !self.contains_qubit(qubit) {
            return vec![];
        }
        let mut gates: Vec<&Gate> = self.gates.iter().filter(|g| g.touches(qubit)).collect();
        gates.sort_by_key(|g| g.position);
        gates
    }

    /// Gates that act on `qubit` strictly before `position`, in time order.
    pub fn gates_before(&self, qubit: QubitId, position: u32) -> Vec<&Gate> {
        let mut gates = self.gates_on_qubit(qubit);
        gates.retain(|g| g.position < position);
        gates
    }

    /// Highest qubit referenced by any gate or measurement.
    pub fn highest_referenced_qubit(&self) -> Option<QubitId> {
        self.gates
            .iter()
            .flat_map(|g| g.qubits.iter().copied())
            .chain(self.measurements.iter().map(|m| m.qubit))
            .max()
    }

    // =========================================================================
    // Validation
    // =========================================================================

    /// Check every invariant of the circuit.
    ///
    /// Qubit indices must be in range, no gate may repeat a qubit, fixed-width
    /// gates must have the right number of operands and assigned gate ids
    /// must be unique.
    pub fn validate(&self) -> IrResult<()> {
        let mut seen = FxHashSet::default();
        for gate in &self.gates {
            self.check_operands(gate)?;
            if !gate.id.is_empty() && !seen.insert(gate.id.as_str()) {
                return Err(IrError::DuplicateGateId(gate.id.clone()));
            }
        }
        for m in &self.measurements {
            self.check_qubit(m.qubit, None)?;
        }
        Ok(())
    }

    /// Check a single gate against this circuit, ignoring the gate with id
    /// `replacing` when looking for duplicate ids.
    pub(crate) fn check_gate(&self, gate: &Gate, replacing: Option<&str>) -> IrResult<()> {
        self.check_operands(gate)?;
        let clash = self
            .gates
            .iter()
            .any(|g| g.id == gate.id && Some(g.id.as_str()) != replacing);
        if clash {
            return Err(IrError::DuplicateGateId(gate.id.clone()));
        }
        Ok(())
    }

    fn check_operands(&self, gate: &Gate) -> IrResult<()> {
        if let Some(expected) = gate.kind.arity() {
            if gate.qubits.len() != expected {
                return Err(IrError::ArityMismatch {
                    gate_name: gate.name().to_string(),
                    expected,
                    got: gate.qubits.len(),
                });
            }
        }
        let mut seen = FxHashSet::default();
        for &qubit in &gate.qubits {
            self.check_qubit(qubit, Some(&gate.id))?;
            if !seen.insert(qubit) {
                return Err(IrError::DuplicateQubit {
                    qubit,
                    gate_id: Some(gate.id.clone()),
                });
            }
        }
        Ok(())
    }

    fn check_qubit(&self, qubit: QubitId, gate_id: Option<&str>) -> IrResult<()> {
        if self.contains_qubit(qubit) {
            Ok(())
        } else {
            Err(IrError::QubitOutOfRange {
                qubit,
                num_qubits: self.num_qubits,
                gate_id: gate_id.map(str::to_string),
            })
        }
    }

    // =========================================================================
    // Crate-internal mutation (used by the store)
    // =========================================================================

    pub(crate) fn gates_mut(&mut self) -> &mut Vec<Gate> {
        &mut self.gates
    }

    pub(crate) fn measurements_mut(&mut self) -> &mut Vec<Measurement> {
        &mut self.measurements
    }

    pub(crate) fn set_num_qubits(&mut self, num_qubits: u32) {
        self.num_qubits = num_qubits;
    }

    // =========================================================================
    // Pre-built circuits
    // =========================================================================

    /// Create a Bell state circuit: H on q0, then CX(q0, q1).
    pub fn bell() -> IrResult<Self> {
        let mut circuit = Self::new(2);
        circuit.h(QubitId(0), 0)?.cx(QubitId(0), QubitId(1), 1)?;
        Ok(circuit)
    }

    /// Create a GHZ state circuit: H on q0, then a CX chain.
    ///
    /// Gates are built directly with ids `g0..g{n-1}`, so long chains skip
    /// the per-gate duplicate-id scan of [`Circuit::apply`].
    pub fn ghz(n: u32) -> IrResult<Self> {
        if n == 0 {
            return Ok(Self::new(0));
        }
        let mut gates = Vec::with_capacity(n as usize);
        gates.push(Gate::new(GateKind::H, [QubitId(0)], 0).with_id("g0"));
        for i in 0..n - 1 {
            gates.push(
                Gate::new(GateKind::CX, [QubitId(i), QubitId(i + 1)], i + 1)
                    .with_id(format!("g{}", i + 1)),
            );
        }
        Ok(Self::from_gates(n, gates))
    }
}

//! Gate kinds and placed gates.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use crate::qubit::{ClbitId, QubitId};
use crate::wire::GateRecord;

/// Named real-valued gate parameters as they appear on the wire.
pub type GateParams = BTreeMap<String, f64>;

/// Every operation the canvas can place on a wire.
///
/// Parametric variants carry their angles (radians). A parameter that is
/// missing on the wire is read as `0.0`.
#[derive(Debug, Clone, PartialEq)]
pub enum GateKind {
    // Fixed single-qubit gates
    /// Identity gate.
    I,
    /// Hadamard gate.
    H,
    /// Pauli-X gate.
    X,
    /// Pauli-Y gate.
    Y,
    /// Pauli-Z gate.
    Z,
    /// S gate (sqrt(Z)).
    S,
    /// S-dagger gate.
    Sdg,
    /// T gate (fourth root of Z).
    T,
    /// T-dagger gate.
    Tdg,

    // Parametric single-qubit gates
    /// Rotation around X axis.
    Rx {
        /// Rotation angle.
        theta: f64,
    },
    /// Rotation around Y axis.
    Ry {
        /// Rotation angle.
        theta: f64,
    },
    /// Rotation around Z axis.
    Rz {
        /// Rotation angle.
        theta: f64,
    },
    /// Phase gate P(λ).
    P {
        /// Phase angle.
        lambda: f64,
    },
    /// Universal single-qubit gate U3(θ, φ, λ).
    U3 {
        /// Polar rotation.
        theta: f64,
        /// Final Z rotation.
        phi: f64,
        /// Initial Z rotation.
        lambda: f64,
    },

    // Controlled gates (controls first, target last)
    /// Controlled-X (CNOT).
    CX,
    /// Controlled-Y.
    CY,
    /// Controlled-Z.
    CZ,
    /// Toffoli (CCX).
    CCX,
    /// Controlled rotation around X.
    CRx {
        /// Rotation angle.
        theta: f64,
    },
    /// Controlled rotation around Y.
    CRy {
        /// Rotation angle.
        theta: f64,
    },
    /// Controlled rotation around Z.
    CRz {
        /// Rotation angle.
        theta: f64,
    },

    // Non-unitary and structural operations
    /// SWAP gate.
    Swap,
    /// Measurement into a classical bit.
    Measure,
    /// Barrier (visual grouping only).
    Barrier,
    /// A gate name outside the known set, kept verbatim.
    Unrecognized(String),
}

impl GateKind {
    /// Resolve a wire gate name and its parameters into a typed kind.
    ///
    /// Matching is case-insensitive. Unknown names become
    /// [`GateKind::Unrecognized`] rather than an error, since the canvas may
    /// hold gates this crate has never heard of.
    pub fn parse(name: &str, params: &GateParams) -> Self {
        let param = |key: &str| params.get(key).copied().unwrap_or(0.0);

        match name.trim().to_ascii_lowercase().as_str() {
            "i" | "id" => GateKind::I,
            "h" => GateKind::H,
            "x" => GateKind::X,
            "y" => GateKind::Y,
            "z" => GateKind::Z,
            "s" => GateKind::S,
            "sdg" | "sdag" | "s†" => GateKind::Sdg,
            "t" => GateKind::T,
            "tdg" | "tdag" | "t†" => GateKind::Tdg,
            "rx" => GateKind::Rx {
                theta: param("theta"),
            },
            "ry" => GateKind::Ry {
                theta: param("theta"),
            },
            "rz" => GateKind::Rz {
                theta: param("theta"),
            },
            "p" | "phase" => GateKind::P {
                lambda: param("theta"),
            },
            "u" | "u3" => GateKind::U3 {
                theta: param("theta"),
                phi: param("phi"),
                lambda: param("lambda"),
            },
            "cx" | "cnot" => GateKind::CX,
            "cy" => GateKind::CY,
            "cz" => GateKind::CZ,
            "ccx" | "toffoli" => GateKind::CCX,
            "crx" => GateKind::CRx {
                theta: param("theta"),
            },
            "cry" => GateKind::CRy {
                theta: param("theta"),
            },
            "crz" => GateKind::CRz {
                theta: param("theta"),
            },
            "swap" => GateKind::Swap,
            "measure" | "m" => GateKind::Measure,
            "barrier" => GateKind::Barrier,
            _ => GateKind::Unrecognized(name.to_string()),
        }
    }

    /// Canonical wire name of this gate.
    pub fn name(&self) -> &str {
        match self {
            GateKind::I => "I",
            GateKind::H => "H",
            GateKind::X => "X",
            GateKind::Y => "Y",
            GateKind::Z => "Z",
            GateKind::S => "S",
            GateKind::Sdg => "SDG",
            GateKind::T => "T",
            GateKind::Tdg => "TDG",
            GateKind::Rx { .. } => "RX",
            GateKind::Ry { .. } => "RY",
            GateKind::Rz { .. } => "RZ",
            GateKind::P { .. } => "P",
            GateKind::U3 { .. } => "U3",
            GateKind::CX => "CX",
            GateKind::CY => "CY",
            GateKind::CZ => "CZ",
            GateKind::CCX => "CCX",
            GateKind::CRx { .. } => "CRX",
            GateKind::CRy { .. } => "CRY",
            GateKind::CRz { .. } => "CRZ",
            GateKind::Swap => "SWAP",
            GateKind::Measure => "MEASURE",
            GateKind::Barrier => "BARRIER",
            GateKind::Unrecognized(name) => name,
        }
    }

    /// Number of qubits this gate acts on, if the kind fixes it.
    ///
    /// Barriers span any number of wires and unrecognized gates are not
    /// checked, so both return `None`.
    pub fn arity(&self) -> Option<usize> {
        match self {
            GateKind::I
            | GateKind::H
            | GateKind::X
            | GateKind::Y
            | GateKind::Z
            | GateKind::S
            | GateKind::Sdg
            | GateKind::T
            | GateKind::Tdg
            | GateKind::Rx { .. }
            | GateKind::Ry { .. }
            | GateKind::Rz { .. }
            | GateKind::P { .. }
            | GateKind::U3 { .. }
            | GateKind::Measure => Some(1),

            GateKind::CX
            | GateKind::CY
            | GateKind::CZ
            | GateKind::CRx { .. }
            | GateKind::CRy { .. }
            | GateKind::CRz { .. }
            | GateKind::Swap => Some(2),

            GateKind::CCX => Some(3),

            GateKind::Barrier | GateKind::Unrecognized(_) => None,
        }
    }

    /// Number of leading control qubits.
    pub fn num_controls(&self) -> usize {
        match self {
            GateKind::CX
            | GateKind::CY
            | GateKind::CZ
            | GateKind::CRx { .. }
            | GateKind::CRy { .. }
            | GateKind::CRz { .. } => 1,
            GateKind::CCX => 2,
            _ => 0,
        }
    }

    /// Check if this gate is conditioned on control qubits.
    #[inline]
    pub fn is_controlled(&self) -> bool {
        self.num_controls() > 0
    }

    /// Named parameters, in the shape used by the wire format.
    pub fn params(&self) -> GateParams {
        let mut params = GateParams::new();
        match self {
            GateKind::Rx { theta }
            | GateKind::Ry { theta }
            | GateKind::Rz { theta }
            | GateKind::CRx { theta }
            | GateKind::CRy { theta }
            | GateKind::CRz { theta } => {
                params.insert("theta".into(), *theta);
            }
            GateKind::P { lambda } => {
                params.insert("theta".into(), *lambda);
            }
            GateKind::U3 { theta, phi, lambda } => {
                params.insert("theta".into(), *theta);
                params.insert("phi".into(), *phi);
                params.insert("lambda".into(), *lambda);
            }
            _ => {}
        }
        params
    }
}

impl fmt::Display for GateKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A gate placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "GateRecord", into = "GateRecord")]
pub struct Gate {
    /// Identifier, unique within a circuit. Empty until a store assigns one.
    pub id: String,
    /// What the gate does.
    pub kind: GateKind,
    /// Operand wires. For controlled gates every entry but the last is a
    /// control and the last is the target.
    pub qubits: Vec<QubitId>,
    /// Time slot. Ties are broken by declaration order.
    pub position: u32,
    /// Classical bit bound to a measurement, if any.
    pub conditional_bit: Option<ClbitId>,
}

impl Gate {
    /// Create a gate with no id.
    pub fn new(kind: GateKind, qubits: impl IntoIterator<Item = QubitId>, position: u32) -> Self {
        Self {
            id: String::new(),
            kind,
            qubits: qubits.into_iter().collect(),
            position,
            conditional_bit: None,
        }
    }

    /// Set the gate id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Bind a classical bit.
    #[must_use]
    pub fn with_conditional_bit(mut self, clbit: ClbitId) -> Self {
        self.conditional_bit = Some(clbit);
        self
    }

    /// Get the name of this gate.
    pub fn name(&self) -> &str {
        self.kind.name()
    }

    /// Leading operands (all but the last).
    pub fn controls(&self) -> &[QubitId] {
        match self.qubits.split_last() {
            Some((_, controls)) => controls,
            None => &[],
        }
    }

    /// Last operand, the wire a controlled gate acts on.
    pub fn target(&self) -> Option<QubitId> {
        self.qubits.last().copied()
    }

    /// Check if the gate has `qubit` among its operands.
    #[inline]
    pub fn touches(&self, qubit: QubitId) -> bool {
        self.qubits.contains(&qubit)
    }
}

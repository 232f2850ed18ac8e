//! JSON wire shape of a gate, as exchanged with the canvas front end.
//!
//! ```json
//! { "id": "g1", "name": "RZ", "qubits": [0], "position": 2,
//!   "params": { "theta": 1.5707963 }, "conditionalBit": 0 }
//! ```
//!
//! Every field except `name` is optional. A missing or `null` qubit list is
//! read as empty so a half-edited gate never fails the whole circuit.

use serde::{Deserialize, Deserializer, Serialize};

use crate::gate::{Gate, GateKind, GateParams};
use crate::qubit::{ClbitId, QubitId};

/// Untyped gate record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GateRecord {
    /// Gate identifier.
    #[serde(default)]
    pub id: String,
    /// Symbolic gate name, e.g. `H`, `CX`, `RZ`.
    pub name: String,
    /// Operand wires.
    #[serde(default, deserialize_with = "null_as_empty")]
    pub qubits: Vec<QubitId>,
    /// Time slot.
    #[serde(default)]
    pub position: u32,
    /// Named parameters (`theta`, `phi`, `lambda`).
    #[serde(default, skip_serializing_if = "GateParams::is_empty")]
    pub params: GateParams,
    /// Classical bit bound to a measurement.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub conditional_bit: Option<ClbitId>,
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<QubitId>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<QubitId>>::deserialize(deserializer)?.unwrap_or_default())
}

impl From<GateRecord> for Gate {
    fn from(record: GateRecord) -> Self {
        let kind = GateKind::parse(&record.name, &record.params);
        if let GateKind::Unrecognized(name) = &kind {
            tracing::debug!(gate = %name, id = %record.id, "unrecognized gate name");
        }
        Gate {
            id: record.id,
            kind,
            qubits: record.qubits,
            position: record.position,
            conditional_bit: record.conditional_bit,
        }
    }
}

impl From<Gate> for GateRecord {
    fn from(gate: Gate) -> Self {
        GateRecord {
            name: gate.kind.name().to_string(),
            params: gate.kind.params(),
            id: gate.id,
            qubits: gate.qubits,
            position: gate.position,
            conditional_bit: gate.conditional_bit,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_minimal_record() {
        let gate: Gate = serde_json::from_str(r#"{"name": "h"}"#).unwrap();
        assert_eq!(gate.kind, GateKind::H);
        assert!(gate.qubits.is_empty());
        assert_eq!(gate.position, 0);
        assert!(gate.id.is_empty());
    }

    #[test]
    fn test_null_qubits_normalize_to_empty() {
        let gate: Gate = serde_json::from_str(r#"{"name": "x", "qubits": null}"#).unwrap();
        assert!(gate.qubits.is_empty());
    }

    #[test]
    fn test_full_record() {
        let json = r#"{
            "id": "g3",
            "name": "RY",
            "qubits": [1],
            "position": 4,
            "params": {"theta": 0.5},
            "conditionalBit": 2
        }"#;
        let gate: Gate = serde_json::from_str(json).unwrap();
        assert_eq!(gate.id, "g3");
        assert_eq!(gate.kind, GateKind::Ry { theta: 0.5 });
        assert_eq!(gate.qubits, vec![QubitId(1)]);
        assert_eq!(gate.position, 4);
        assert_eq!(gate.conditional_bit, Some(ClbitId(2)));
    }

    #[test]
    fn test_serialize_uses_canonical_name_and_camel_case() {
        let gate = Gate::new(GateKind::Rz { theta: 1.0 }, [QubitId(0)], 1)
            .with_id("g1")
            .with_conditional_bit(ClbitId(0));
        let value = serde_json::to_value(&gate).unwrap();
        assert_eq!(value["name"], "RZ");
        assert_eq!(value["params"]["theta"], 1.0);
        assert_eq!(value["conditionalBit"], 0);
    }

    #[test]
    fn test_fixed_gate_omits_params() {
        let gate = Gate::new(GateKind::H, [QubitId(0)], 0);
        let value = serde_json::to_value(&gate).unwrap();
        assert!(value.get("params").is_none());
        assert!(value.get("conditionalBit").is_none());
    }
}

//! Property-based tests for the projection engine.
//!
//! Random histories are built from the gates the canvas places most often
//! and checked against invariants that hold for every circuit.

use std::f64::consts::{PI, TAU};

use proptest::prelude::*;
use qcanvas_bloch::{BlochState, BlochVector, project_all, project_qubit_state, transform};
use qcanvas_ir::{Circuit, Gate, GateKind, QubitId};

const TOL: f64 = 1e-9;

/// Any kind whose single-qubit effect is a rotation.
fn arb_kind() -> impl Strategy<Value = GateKind> {
    let angle = -TAU..TAU;
    prop_oneof![
        prop::sample::select(vec![
            GateKind::H,
            GateKind::X,
            GateKind::Y,
            GateKind::Z,
            GateKind::S,
            GateKind::Sdg,
            GateKind::T,
            GateKind::Tdg,
        ]),
        angle.clone().prop_map(|theta| GateKind::Rx { theta }),
        angle.clone().prop_map(|theta| GateKind::Ry { theta }),
        angle.clone().prop_map(|theta| GateKind::Rz { theta }),
        (angle.clone(), angle.clone(), angle)
            .prop_map(|(theta, phi, lambda)| GateKind::U3 { theta, phi, lambda }),
    ]
}

/// A gate on a circuit of `num_qubits` wires, single-qubit or CX.
fn arb_gate(num_qubits: u32) -> impl Strategy<Value = Gate> {
    let single = (arb_kind(), 0..num_qubits, 0_u32..20)
        .prop_map(|(kind, q, position)| Gate::new(kind, [QubitId(q)], position));
    if num_qubits < 2 {
        single.boxed()
    } else {
        prop_oneof![
            3 => single,
            1 => (0..num_qubits, 0..num_qubits, 0_u32..20)
                .prop_filter("Control and target must differ", |(c, t, _)| c != t)
                .prop_map(|(c, t, position)| {
                    Gate::new(GateKind::CX, [QubitId(c), QubitId(t)], position)
                }),
        ]
        .boxed()
    }
}

fn arb_circuit() -> impl Strategy<Value = Circuit> {
    (1_u32..=4).prop_flat_map(|num_qubits| {
        prop::collection::vec(arb_gate(num_qubits), 0..=12)
            .prop_map(move |gates| Circuit::from_gates(num_qubits, gates))
    })
}

fn assert_normalized(state: &BlochState) -> Result<(), TestCaseError> {
    prop_assert!((0.0..=PI).contains(&state.theta), "theta {} out of range", state.theta);
    prop_assert!((0.0..TAU).contains(&state.phi), "phi {} out of range", state.phi);
    let [p0, p1] = state.probabilities();
    prop_assert!((p0 + p1 - 1.0).abs() < TOL);
    Ok(())
}

proptest! {
    /// Every projection is a valid point on the sphere.
    #[test]
    fn test_projection_is_normalized(circuit in arb_circuit()) {
        for state in project_all(&circuit) {
            assert_normalized(&state)?;
        }
    }

    /// RZ never changes the polar angle.
    #[test]
    fn test_rz_history_preserves_theta(
        prefix in prop::collection::vec(arb_kind(), 0..6),
        angles in prop::collection::vec(-TAU..TAU, 1..8),
    ) {
        let mut gates: Vec<Gate> = prefix
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Gate::new(kind, [QubitId(0)], i as u32))
            .collect();
        let before = project_qubit_state(&Circuit::from_gates(1, gates.clone()), QubitId(0));

        let start = gates.len() as u32;
        for (i, theta) in angles.into_iter().enumerate() {
            gates.push(Gate::new(GateKind::Rz { theta }, [QubitId(0)], start + i as u32));
        }
        let after = project_qubit_state(&Circuit::from_gates(1, gates), QubitId(0));

        prop_assert!((after.theta - before.theta).abs() < TOL,
            "theta moved from {} to {}", before.theta, after.theta);
    }

    /// SWAP is invisible to both of its operands.
    #[test]
    fn test_swap_is_no_op(circuit in arb_circuit(), position in 0_u32..25) {
        let num_qubits = circuit.num_qubits();
        prop_assume!(num_qubits >= 2);

        let mut gates = circuit.gates().to_vec();
        gates.push(Gate::new(GateKind::Swap, [QubitId(0), QubitId(1)], position));
        let swapped = Circuit::from_gates(num_qubits, gates);

        prop_assert_eq!(project_all(&swapped), project_all(&circuit));
    }

    /// The SWAP transform leaves any vector untouched.
    #[test]
    fn test_swap_transform_is_identity(theta in 0.0..PI, phi in 0.0..TAU) {
        let v = BlochVector::from_spherical(theta, phi);
        prop_assert_eq!(transform::apply(&GateKind::Swap, v), v);
    }

    /// H is self-inverse on any state.
    #[test]
    fn test_hadamard_is_self_inverse(
        prefix in prop::collection::vec(arb_kind(), 0..6),
    ) {
        let mut gates: Vec<Gate> = prefix
            .into_iter()
            .enumerate()
            .map(|(i, kind)| Gate::new(kind, [QubitId(0)], i as u32))
            .collect();
        let before = project_qubit_state(&Circuit::from_gates(1, gates.clone()), QubitId(0));

        let next = gates.len() as u32;
        gates.push(Gate::new(GateKind::H, [QubitId(0)], next));
        gates.push(Gate::new(GateKind::H, [QubitId(0)], next + 1));
        let after = project_qubit_state(&Circuit::from_gates(1, gates), QubitId(0));

        prop_assert!(after.vector().approx_eq(before.vector(), TOL));
    }

    /// Cartesian → spherical → Cartesian reproduces the vector.
    #[test]
    fn test_spherical_round_trip(theta in 0.0..=PI, phi in 0.0..TAU) {
        let v = BlochVector::from_spherical(theta, phi);
        let (t, p) = v.to_spherical();
        prop_assert!(BlochVector::from_spherical(t, p).approx_eq(v, TOL));
    }

    /// Gates declared in any order project the same as when sorted.
    #[test]
    fn test_declaration_order_is_irrelevant_without_ties(circuit in arb_circuit()) {
        let mut gates = circuit.gates().to_vec();
        // Distinct positions make the order fully determined by position.
        for (i, gate) in gates.iter_mut().enumerate() {
            gate.position = i as u32;
        }
        let forward = Circuit::from_gates(circuit.num_qubits(), gates.clone());
        gates.reverse();
        let reversed = Circuit::from_gates(circuit.num_qubits(), gates);

        prop_assert_eq!(project_all(&forward), project_all(&reversed));
    }
}

#[test]
fn spherical_round_trip_grid() {
    for i in 0..=16 {
        for j in 0..32 {
            let theta = PI * f64::from(i) / 16.0;
            let phi = TAU * f64::from(j) / 32.0;
            let v = BlochVector::from_spherical(theta, phi);
            let (t, p) = v.to_spherical();
            assert!(
                BlochVector::from_spherical(t, p).approx_eq(v, TOL),
                "round trip failed at theta={theta}, phi={phi}"
            );
        }
    }
}

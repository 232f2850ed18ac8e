//! Per-qubit Bloch sphere projection for qcanvas circuits.
//!
//! Reconstructs an approximate single-qubit state for every wire of a
//! [`qcanvas_ir::Circuit`] by replaying the gates that touch it in time
//! order. Controlled gates fire only when each control, evaluated
//! recursively over the gates before the controlled one, sits closer to |1⟩
//! than to |0⟩ (`z < 0.1`).
//!
//! The result is meant for visualization. There is no joint state, so
//! entanglement is not represented and `SWAP` leaves both wires unchanged.
//! Projection never fails: unknown gates are no-ops, missing parameters are
//! zero and wires without gates are |0⟩.
//!
//! # Quick start
//!
//! ```rust
//! use qcanvas_bloch::project_qubit_state;
//! use qcanvas_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(1);
//! circuit.x(QubitId(0), 0).unwrap();
//!
//! let state = project_qubit_state(&circuit, QubitId(0));
//! assert!((state.theta - std::f64::consts::PI).abs() < 1e-12);
//! ```
//!
//! # Editing sessions
//!
//! ```rust
//! use qcanvas_bloch::ProjectionCache;
//! use qcanvas_ir::{CircuitStore, Gate, GateKind, QubitId};
//!
//! let mut store = CircuitStore::new(2);
//! let cache = ProjectionCache::new();
//!
//! store.add_gate(Gate::new(GateKind::H, [QubitId(0)], 0)).unwrap();
//! let states = cache.project_all(&store.snapshot());
//! assert_eq!(states.len(), 2);
//! ```

pub mod cache;
pub mod projection;
pub mod state;
pub mod transform;
pub mod vector;

pub use cache::ProjectionCache;
pub use projection::{
    CONTROL_ACTIVATION_THRESHOLD, Projector, project_all, project_qubit_state,
};
pub use state::BlochState;
pub use vector::BlochVector;

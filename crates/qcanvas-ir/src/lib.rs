//! qcanvas Circuit Model
//!
//! This crate holds the data structures behind the circuit canvas: gates
//! placed on qubit wires at discrete time slots, the circuits they form, and
//! the store through which the editor mutates them.
//!
//! # Core Components
//!
//! - **Identifiers**: [`QubitId`], [`ClbitId`]
//! - **Gates**: [`GateKind`], a closed set of operations with typed
//!   parameters, and [`Gate`], a kind placed on wires at a position
//! - **Circuit**: [`Circuit`], an ordered gate list plus width and
//!   measurements, with time-ordered per-qubit queries
//! - **Timeline**: [`QubitTimeline`], a per-qubit index of gate positions
//! - **Store**: [`CircuitStore`], validated mutations and immutable
//!   [`CircuitSnapshot`]s
//!
//! # Example: Building a Bell Pair
//!
//! ```rust
//! use qcanvas_ir::{Circuit, QubitId};
//!
//! let mut circuit = Circuit::new(2);
//! circuit.h(QubitId(0), 0).unwrap();
//! circuit.cx(QubitId(0), QubitId(1), 1).unwrap();
//!
//! assert_eq!(circuit.gates_on_qubit(QubitId(1)).len(), 1);
//! assert_eq!(circuit.gates_before(QubitId(0), 1).len(), 1);
//! ```
//!
//! # Example: Editing Through the Store
//!
//! ```rust
//! use qcanvas_ir::{CircuitStore, Gate, GateKind, QubitId};
//!
//! let mut store = CircuitStore::new(1);
//! let id = store.add_gate(Gate::new(GateKind::X, [QubitId(0)], 0)).unwrap();
//! let snapshot = store.snapshot();
//!
//! store.remove_gate(&id).unwrap();
//! assert_eq!(snapshot.circuit().len(), 1);
//! assert!(store.circuit().is_empty());
//! ```
//!
//! # Supported Gates
//!
//! | Gate | Qubits | Parameters |
//! |------|--------|------------|
//! | `I`, `H`, `X`, `Y`, `Z` | 1 | |
//! | `S`, `SDG`, `T`, `TDG` | 1 | |
//! | `RX`, `RY`, `RZ` | 1 | `theta` |
//! | `P` | 1 | `theta` |
//! | `U3` | 1 | `theta`, `phi`, `lambda` |
//! | `CX`, `CY`, `CZ` | 2 | |
//! | `CRX`, `CRY`, `CRZ` | 2 | `theta` |
//! | `SWAP` | 2 | |
//! | `CCX` | 3 | |
//! | `MEASURE` | 1 | |
//! | `BARRIER` | any | |

pub mod circuit;
pub mod error;
pub mod gate;
pub mod qubit;
pub mod store;
pub mod timeline;
pub mod wire;

pub use circuit::{Circuit, Measurement};
pub use error::{IrError, IrResult};
pub use gate::{Gate, GateKind, GateParams};
pub use qubit::{ClbitId, QubitId};
pub use store::{CircuitSnapshot, CircuitStore};
pub use timeline::{QubitTimeline, TimelineEntry};
pub use wire::GateRecord;

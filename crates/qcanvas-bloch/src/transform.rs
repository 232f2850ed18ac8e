//! Single-qubit effect of each gate kind on a Bloch vector.
//!
//! | Gate | Effect on (x, y, z) |
//! |------|---------------------|
//! | `H` | (z, −y, x) |
//! | `X` | (x, −y, −z) |
//! | `Y` | (−x, y, −z) |
//! | `Z` | (−x, −y, z) |
//! | `S` / `SDG` | z-rotation by ±π/2 |
//! | `T` / `TDG` | z-rotation by ±π/4 |
//! | `RX(θ)`, `RY(θ)`, `RZ(θ)` | rotation by θ about x, y, z |
//! | `P(λ)` | z-rotation by λ |
//! | `U3(θ, φ, λ)` | `RZ(λ)`, then `RY(θ)`, then `RZ(φ)` |
//!
//! Controlled kinds report the effect of their base gate on the target;
//! whether it fires is decided by the projector. `SWAP` cannot be expressed
//! on a single qubit and is a no-op, as are `I`, `MEASURE`, `BARRIER` and
//! unrecognized gates.

use std::f64::consts::{FRAC_PI_2, FRAC_PI_4};

use qcanvas_ir::GateKind;

use crate::vector::BlochVector;

/// Apply the single-qubit effect of `kind` to `v`.
pub fn apply(kind: &GateKind, v: BlochVector) -> BlochVector {
    let BlochVector { x, y, z } = v;
    match kind {
        GateKind::H => BlochVector::new(z, -y, x),
        GateKind::X | GateKind::CX | GateKind::CCX => BlochVector::new(x, -y, -z),
        GateKind::Y | GateKind::CY => BlochVector::new(-x, y, -z),
        GateKind::Z | GateKind::CZ => BlochVector::new(-x, -y, z),

        GateKind::S => v.rotate_z(FRAC_PI_2),
        GateKind::Sdg => v.rotate_z(-FRAC_PI_2),
        GateKind::T => v.rotate_z(FRAC_PI_4),
        GateKind::Tdg => v.rotate_z(-FRAC_PI_4),

        GateKind::Rx { theta } | GateKind::CRx { theta } => v.rotate_x(*theta),
        GateKind::Ry { theta } | GateKind::CRy { theta } => v.rotate_y(*theta),
        GateKind::Rz { theta } | GateKind::CRz { theta } => v.rotate_z(*theta),
        GateKind::P { lambda } => v.rotate_z(*lambda),
        GateKind::U3 { theta, phi, lambda } => {
            v.rotate_z(*lambda).rotate_y(*theta).rotate_z(*phi)
        }

        GateKind::I
        | GateKind::Swap
        | GateKind::Measure
        | GateKind::Barrier
        | GateKind::Unrecognized(_) => v,
    }
}

/// Whether `kind` leaves every Bloch vector where it is.
pub fn is_no_op(kind: &GateKind) -> bool {
    matches!(
        kind,
        GateKind::I
            | GateKind::Swap
            | GateKind::Measure
            | GateKind::Barrier
            | GateKind::Unrecognized(_)
    )
}

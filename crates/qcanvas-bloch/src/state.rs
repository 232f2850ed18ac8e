//! Projected single-qubit state.

use num_complex::Complex64;
use serde::Serialize;

use crate::vector::BlochVector;

/// Spherical form of a projected qubit plus display amplitudes.
///
/// `theta` lies in `[0, π]` and `phi` in `[0, 2π)`. The amplitudes follow the
/// global-phase convention where the |0⟩ amplitude is real and non-negative:
///
/// ```text
/// α = cos(θ/2)
/// β = sin(θ/2) · e^{iφ}
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BlochState {
    /// Polar angle in radians.
    pub theta: f64,
    /// Azimuthal angle in radians.
    pub phi: f64,
    /// Amplitudes of |0⟩ and |1⟩.
    pub amplitudes: [Complex64; 2],
}

impl BlochState {
    /// The |0⟩ state.
    pub fn zero() -> Self {
        Self::from_vector(BlochVector::ZERO)
    }

    /// Convert a Cartesian Bloch vector.
    pub fn from_vector(v: BlochVector) -> Self {
        let (theta, phi) = v.to_spherical();
        Self::from_angles(theta, phi)
    }

    /// Build a state from already-normalized angles.
    pub fn from_angles(theta: f64, phi: f64) -> Self {
        let half = theta / 2.0;
        let alpha = Complex64::new(half.cos(), 0.0);
        let beta = Complex64::from_polar(half.sin(), phi);
        Self {
            theta,
            phi,
            amplitudes: [alpha, beta],
        }
    }

    /// Cartesian form of the state.
    pub fn vector(&self) -> BlochVector {
        BlochVector::from_spherical(self.theta, self.phi)
    }

    /// Measurement probabilities of |0⟩ and |1⟩.
    pub fn probabilities(&self) -> [f64; 2] {
        [self.amplitudes[0].norm_sqr(), self.amplitudes[1].norm_sqr()]
    }
}

impl Default for BlochState {
    fn default() -> Self {
        Self::zero()
    }
}

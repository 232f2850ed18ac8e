//! Cartesian Bloch vector and its rotation primitives.

use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;

/// Below this transverse magnitude the azimuth is undefined and reported as 0.
const POLE_EPSILON: f64 = 1e-12;

/// A point on (or inside) the Bloch sphere.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BlochVector {
    /// Expectation of Pauli-X.
    pub x: f64,
    /// Expectation of Pauli-Y.
    pub y: f64,
    /// Expectation of Pauli-Z.
    pub z: f64,
}

impl BlochVector {
    /// The |0⟩ state, north pole.
    pub const ZERO: Self = Self::new(0.0, 0.0, 1.0);

    /// The |1⟩ state, south pole.
    pub const ONE: Self = Self::new(0.0, 0.0, -1.0);

    /// Create a vector from components.
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    /// Create the unit vector at polar angle `theta` and azimuth `phi`.
    pub fn from_spherical(theta: f64, phi: f64) -> Self {
        let (sin_t, cos_t) = theta.sin_cos();
        let (sin_p, cos_p) = phi.sin_cos();
        Self::new(sin_t * cos_p, sin_t * sin_p, cos_t)
    }

    /// Polar angle in `[0, π]` and azimuth in `[0, 2π)`.
    ///
    /// At the poles the azimuth is pinned to 0.
    pub fn to_spherical(self) -> (f64, f64) {
        let theta = self.z.clamp(-1.0, 1.0).acos();
        if self.x.hypot(self.y) < POLE_EPSILON {
            return (theta, 0.0);
        }
        let mut phi = self.y.atan2(self.x);
        if phi < 0.0 {
            phi += TAU;
        }
        // -ε + 2π can round up to exactly 2π
        if phi >= TAU {
            phi = 0.0;
        }
        (theta, phi)
    }

    /// Euclidean length.
    pub fn norm(self) -> f64 {
        (self.x * self.x + self.y * self.y + self.z * self.z).sqrt()
    }

    /// Rotate the (y, z) plane by `theta` about the x axis.
    #[must_use]
    pub fn rotate_x(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.x, self.y * c - self.z * s, self.y * s + self.z * c)
    }

    /// Rotate the (x, z) plane about the y axis.
    ///
    /// `x' = x·cosθ + z·sinθ`, `z' = −x·sinθ + z·cosθ`, which takes |0⟩ to
    /// |+⟩ for `θ = π/2`.
    #[must_use]
    pub fn rotate_y(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.x * c + self.z * s, self.y, -self.x * s + self.z * c)
    }

    /// Rotate the (x, y) plane by `theta` about the z axis.
    #[must_use]
    pub fn rotate_z(self, theta: f64) -> Self {
        let (s, c) = theta.sin_cos();
        Self::new(self.x * c - self.y * s, self.x * s + self.y * c, self.z)
    }

    /// Component-wise comparison within `tol`.
    pub fn approx_eq(self, other: Self, tol: f64) -> bool {
        (self.x - other.x).abs() <= tol
            && (self.y - other.y).abs() <= tol
            && (self.z - other.z).abs() <= tol
    }
}

impl Default for BlochVector {
    fn default() -> Self {
        Self::ZERO
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::{FRAC_PI_2, PI};

    const TOL: f64 = 1e-12;

    #[test]
    fn test_poles() {
        assert_eq!(BlochVector::ZERO.to_spherical(), (0.0, 0.0));
        let (theta, phi) = BlochVector::ONE.to_spherical();
        assert!((theta - PI).abs() < TOL);
        assert_eq!(phi, 0.0);
    }

    #[test]
    fn test_negative_azimuth_wraps() {
        let (theta, phi) = BlochVector::new(0.0, -1.0, 0.0).to_spherical();
        assert!((theta - FRAC_PI_2).abs() < TOL);
        assert!((phi - 3.0 * FRAC_PI_2).abs() < TOL);
    }

    #[test]
    fn test_tiny_negative_azimuth_stays_below_tau() {
        let (_, phi) = BlochVector::new(1.0, -1e-17, 0.0).to_spherical();
        assert!((0.0..TAU).contains(&phi));
    }

    #[test]
    fn test_z_overshoot_is_clamped() {
        let (theta, _) = BlochVector::new(0.0, 0.0, 1.0 + 1e-15).to_spherical();
        assert_eq!(theta, 0.0);
    }

    #[test]
    fn test_rotations() {
        let plus = BlochVector::ZERO.rotate_y(FRAC_PI_2);
        assert!(plus.approx_eq(BlochVector::new(1.0, 0.0, 0.0), TOL));

        let plus_i = plus.rotate_z(FRAC_PI_2);
        assert!(plus_i.approx_eq(BlochVector::new(0.0, 1.0, 0.0), TOL));

        let minus_i = BlochVector::ZERO.rotate_x(FRAC_PI_2);
        assert!(minus_i.approx_eq(BlochVector::new(0.0, -1.0, 0.0), TOL));
    }

    #[test]
    fn test_rotations_preserve_norm() {
        let v = BlochVector::from_spherical(0.3, 1.1)
            .rotate_x(0.7)
            .rotate_y(-2.2)
            .rotate_z(5.0);
        assert!((v.norm() - 1.0).abs() < TOL);
    }
}

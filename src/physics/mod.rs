//! Physics module for black hole simulation
//!
//! This module contains the spacetime geometry (Schwarzschild and Kerr), the
//! geodesic integrator that moves photons through it, and the thin accretion
//! disk that lights the scene.

pub mod accretion_disk;
pub mod constants;
pub mod geodesics;
pub mod kerr;
pub mod schwarzschild;

// Re-export commonly used items
pub use accretion_disk::{AccretionDisk, DiskRing};
pub use geodesics::{
    AccelerationField, GeodesicIntegrator, PhotonState, Trajectory, TrajectoryEnd,
    TrajectoryPoint,
};
pub use kerr::KerrMetric;
pub use schwarzschild::SchwarzschildMetric;

/// Common 4D spacetime vector type
pub type Vec4 = nalgebra::Vector4<f64>;

/// Common matrix type for metric tensors
pub type Mat4 = nalgebra::Matrix4<f64>;

/// Properties shared by every black-hole geometry, independent of whether
/// photons can be transported through it.
pub trait BlackHoleGeometry {
    /// GM/c² in meters.
    fn mass_geometric(&self) -> f64;
    /// Radius of the outer event horizon (m).
    fn outer_horizon(&self) -> f64;
    /// Innermost stable circular orbit, prograde where that matters (m).
    fn isco(&self) -> f64;
    /// Radius of the (prograde, equatorial) circular photon orbit (m).
    fn photon_orbit(&self) -> f64;
    /// Hawking temperature (K).
    fn hawking_temperature(&self) -> f64;
    /// Bekenstein-Hawking entropy (J/K).
    fn entropy(&self) -> f64;
    /// Covariant metric components at (r, θ).
    fn metric_tensor(&self, r: f64, theta: f64) -> Mat4;
}

/// Physical units and conversion factors
#[derive(Debug, Clone, Copy)]
pub struct Units;

impl Units {
    /// Convert solar masses to kilograms
    pub const fn solar_mass_to_kg() -> f64 {
        constants::SOLAR_MASS
    }

    /// Convert a length in Schwarzschild radii to meters
    pub fn schwarzschild_to_meters(radii: f64, mass_solar: f64) -> f64 {
        radii * constants::schwarzschild_radius_solar(mass_solar)
    }

    /// Convert a length in meters to Schwarzschild radii
    pub fn meters_to_schwarzschild(meters: f64, mass_solar: f64) -> f64 {
        meters / constants::schwarzschild_radius_solar(mass_solar)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_unit_round_trip() {
        let m = Units::schwarzschild_to_meters(100.0, 10.0);
        assert_relative_eq!(Units::meters_to_schwarzschild(m, 10.0), 100.0, max_relative = 1e-12);
    }

    #[test]
    fn test_geometries_agree_without_spin() {
        let s = SchwarzschildMetric::new(8.0);
        let k = KerrMetric::new(8.0, 0.0);
        let geometries: [&dyn BlackHoleGeometry; 2] = [&s, &k];
        for g in geometries {
            assert_relative_eq!(g.outer_horizon(), s.schwarzschild_radius(), max_relative = 1e-12);
            assert_relative_eq!(g.isco(), 3.0 * s.schwarzschild_radius(), max_relative = 1e-9);
            assert_relative_eq!(g.photon_orbit(), 1.5 * s.schwarzschild_radius(), max_relative = 1e-9);
            assert_relative_eq!(g.hawking_temperature(), s.hawking_temperature(), max_relative = 1e-9);
            assert_relative_eq!(g.entropy(), s.entropy(), max_relative = 1e-9);
        }
    }
}

//! Global constants for the simulation.
//!
//! SI constants are used throughout. Lengths derived from a mass (horizon,
//! ISCO, photon sphere) are in meters, with M = GM/c² playing the role of the
//! geometric mass.

use std::f64::consts::PI;

// ---------------------------------------------------------------------------
// Physical Constants (SI)
// ---------------------------------------------------------------------------
pub const C: f64 = 299_792_458.0; // Speed of light (m/s)
pub const C2: f64 = C * C;
pub const G: f64 = 6.674_30e-11; // Gravitational constant (m^3 kg^-1 s^-2)
pub const H_PLANCK: f64 = 6.626_070_15e-34; // Planck constant (J s)
pub const HBAR: f64 = H_PLANCK / (2.0 * PI); // Reduced Planck constant (J s)
pub const KB: f64 = 1.380_649e-23; // Boltzmann constant (J/K)
pub const SIGMA_SB: f64 = 5.670_374_419e-8; // Stefan-Boltzmann constant (W m^-2 K^-4)
pub const SOLAR_MASS: f64 = 1.988_47e30; // Solar mass (kg)
pub const SECONDS_PER_YEAR: f64 = 365.25 * 24.0 * 3600.0;

// ---------------------------------------------------------------------------
// Black Hole Constants / Limits
// ---------------------------------------------------------------------------
pub const THORNE_SPIN_LIMIT: f64 = 0.998; // Practical astrophysical max |a*|
pub const SCHWARZSCHILD_FACTOR: f64 = 2.0; // r_s = 2 M (geometric units)
pub const ISCO_FACTOR: f64 = 3.0; // r_isco = 3 r_s (Schwarzschild)
pub const PHOTON_SPHERE_FACTOR: f64 = 1.5; // r_ph = 1.5 r_s (Schwarzschild)
pub const HORIZON_TOLERANCE: f64 = 1.001; // capture once r < 1.001 r_s

// ---------------------------------------------------------------------------
// Numerical / Integration Constants
// ---------------------------------------------------------------------------
pub const MAX_INTEGRATION_STEPS: usize = 10_000; // Upper bound on geodesic steps per ray
pub const DEFAULT_STEP: f64 = 0.1; // Base affine step, in units of r_s
pub const SINGULAR_SENTINEL: f64 = 1e10; // Stand-in for g_rr at or inside the horizon

// ---------------------------------------------------------------------------
// Accretion Disk / Astrophysical Model Constants
// ---------------------------------------------------------------------------
pub const EDDINGTON_LUMINOSITY_PER_SOLAR_MASS: f64 = 1.26e38; // W per M_sun
pub const RADIATIVE_EFFICIENCY: f64 = 0.1;
pub const DISK_OUTER_FACTOR: f64 = 500.0; // outer edge = 500 r_s

// ---------------------------------------------------------------------------
// Closed-form formulas
// ---------------------------------------------------------------------------

/// Geometric mass GM/c² (m).
#[inline]
pub fn geometric_mass(mass_kg: f64) -> f64 {
    G * mass_kg / C2
}

/// Schwarzschild radius 2GM/c² (m).
#[inline]
pub fn schwarzschild_radius(mass_kg: f64) -> f64 {
    SCHWARZSCHILD_FACTOR * geometric_mass(mass_kg)
}

/// Schwarzschild radius for a mass given in solar masses (m).
#[inline]
pub fn schwarzschild_radius_solar(mass_solar: f64) -> f64 {
    schwarzschild_radius(mass_solar * SOLAR_MASS)
}

/// Hawking temperature ħc³ / (8πGMk_B) (K).
pub fn hawking_temperature(mass_kg: f64) -> f64 {
    HBAR * C * C2 / (8.0 * PI * G * mass_kg * KB)
}

/// Hawking luminosity ħc⁶ / (15360πG²M²) (W).
pub fn hawking_luminosity(mass_kg: f64) -> f64 {
    HBAR * C2 * C2 * C2 / (15360.0 * PI * G * G * mass_kg * mass_kg)
}

/// Evaporation time 5120πG²M³ / (ħc⁴) (s).
pub fn evaporation_time(mass_kg: f64) -> f64 {
    5120.0 * PI * G * G * mass_kg.powi(3) / (HBAR * C2 * C2)
}

/// Bekenstein-Hawking entropy k_B c³ A / (4Għ) (J/K).
pub fn bekenstein_hawking_entropy(mass_kg: f64) -> f64 {
    let rs = schwarzschild_radius(mass_kg);
    horizon_entropy(4.0 * PI * rs * rs)
}

/// Entropy of a horizon with the given area (J/K).
#[inline]
pub fn horizon_entropy(area: f64) -> f64 {
    KB * C * C2 * area / (4.0 * G * HBAR)
}

/// Surface gravity c² / (2 r_s) of a Schwarzschild horizon (m/s²).
pub fn surface_gravity(mass_kg: f64) -> f64 {
    C2 / (2.0 * schwarzschild_radius(mass_kg))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_solar_schwarzschild_radius() {
        let rs = schwarzschild_radius_solar(1.0);
        assert_relative_eq!(rs, 2.0 * G * SOLAR_MASS / (C * C), max_relative = 1e-12);
        assert!((rs - 2953.25).abs() < 0.5, "rs = {rs}");
    }

    #[test]
    fn test_solar_hawking_temperature() {
        let t = hawking_temperature(SOLAR_MASS);
        assert_relative_eq!(t, 6.17e-8, max_relative = 1e-2);
    }

    #[test]
    fn test_hawking_quantities_scale_with_mass() {
        let m = 10.0 * SOLAR_MASS;
        assert_relative_eq!(
            hawking_temperature(m),
            hawking_temperature(SOLAR_MASS) / 10.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            hawking_luminosity(m),
            hawking_luminosity(SOLAR_MASS) / 100.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            evaporation_time(m),
            evaporation_time(SOLAR_MASS) * 1000.0,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            bekenstein_hawking_entropy(m),
            bekenstein_hawking_entropy(SOLAR_MASS) * 100.0,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_surface_gravity() {
        let rs = schwarzschild_radius(SOLAR_MASS);
        assert_relative_eq!(surface_gravity(SOLAR_MASS) * 2.0 * rs, C * C, max_relative = 1e-12);
    }
}

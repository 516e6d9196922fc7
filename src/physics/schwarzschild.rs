use crate::physics::constants::*;
use crate::physics::geodesics::{AccelerationField, PhotonState};
use crate::physics::{BlackHoleGeometry, Mat4};
use std::f64::consts::PI;

/// Static, spherically symmetric black hole in Schwarzschild coordinates
/// (t, r, θ, φ). All lengths are in meters.
///
/// Quantities evaluated at or inside the horizon return sentinels (zero, or
/// [`SINGULAR_SENTINEL`] for g_rr) instead of failing; callers are expected
/// to stop integrating before they get there.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SchwarzschildMetric {
    mass_solar: f64,
    mass_kg: f64,
    m: f64,
    rs: f64,
}

impl SchwarzschildMetric {
    pub fn new(mass_solar: f64) -> Self {
        let mass_kg = mass_solar * SOLAR_MASS;
        let m = geometric_mass(mass_kg);
        Self {
            mass_solar,
            mass_kg,
            m,
            rs: SCHWARZSCHILD_FACTOR * m,
        }
    }

    // ---------------- Metric components ----------------

    /// g_tt = -(1 - r_s/r)
    pub fn g_tt(&self, r: f64) -> f64 {
        if r <= self.rs {
            return 0.0;
        }
        -(1.0 - self.rs / r)
    }

    /// g_rr = 1 / (1 - r_s/r)
    pub fn g_rr(&self, r: f64) -> f64 {
        if r <= self.rs {
            return SINGULAR_SENTINEL;
        }
        1.0 / (1.0 - self.rs / r)
    }

    /// g_θθ = r²
    pub fn g_theta_theta(&self, r: f64) -> f64 {
        r * r
    }

    /// g_φφ = r² sin²θ
    pub fn g_phi_phi(&self, r: f64, theta: f64) -> f64 {
        let s = theta.sin();
        r * r * s * s
    }

    /// Full covariant metric, diagonal in these coordinates.
    pub fn metric_tensor(&self, r: f64, theta: f64) -> Mat4 {
        Mat4::from_diagonal(&nalgebra::Vector4::new(
            self.g_tt(r),
            self.g_rr(r),
            self.g_theta_theta(r),
            self.g_phi_phi(r, theta),
        ))
    }

    /// g_μν u^μ u^ν for a photon state; zero on an exact null geodesic.
    pub fn null_constraint(&self, state: &PhotonState) -> f64 {
        let u = state.velocity_vector();
        u.dot(&(self.metric_tensor(state.r, state.theta) * u))
    }

    // ---------------- Christoffel symbols (non-zero) ----------------

    /// Γ^t_tr = Γ^t_rt = r_s / (2r(r - r_s))
    pub fn christoffel_t_tr(&self, r: f64) -> f64 {
        if r <= self.rs {
            return 0.0;
        }
        self.rs / (2.0 * r * (r - self.rs))
    }

    /// Γ^r_tt = r_s(r - r_s) / (2r³)
    pub fn christoffel_r_tt(&self, r: f64) -> f64 {
        if r <= self.rs {
            return 0.0;
        }
        self.rs * (r - self.rs) / (2.0 * r * r * r)
    }

    /// Γ^r_rr = -r_s / (2r(r - r_s))
    pub fn christoffel_r_rr(&self, r: f64) -> f64 {
        if r <= self.rs {
            return 0.0;
        }
        -self.rs / (2.0 * r * (r - self.rs))
    }

    /// Γ^r_θθ = -(r - r_s)
    pub fn christoffel_r_theta_theta(&self, r: f64) -> f64 {
        -(r - self.rs)
    }

    /// Γ^r_φφ = -(r - r_s) sin²θ
    pub fn christoffel_r_phi_phi(&self, r: f64, theta: f64) -> f64 {
        let s = theta.sin();
        -(r - self.rs) * s * s
    }

    /// Γ^θ_rθ = Γ^θ_θr = 1/r
    pub fn christoffel_theta_r_theta(&self, r: f64) -> f64 {
        1.0 / r
    }

    /// Γ^θ_φφ = -sinθ cosθ
    pub fn christoffel_theta_phi_phi(&self, theta: f64) -> f64 {
        -theta.sin() * theta.cos()
    }

    /// Γ^φ_rφ = Γ^φ_φr = 1/r
    pub fn christoffel_phi_r_phi(&self, r: f64) -> f64 {
        1.0 / r
    }

    /// Γ^φ_θφ = Γ^φ_φθ = cotθ
    pub fn christoffel_phi_theta_phi(&self, theta: f64) -> f64 {
        1.0 / theta.tan()
    }

    // ---------------- Constants of motion ----------------

    /// Specific energy (1 - r_s/r) u_t.
    pub fn specific_energy(&self, r: f64, u_t: f64) -> f64 {
        (1.0 - self.rs / r) * u_t
    }

    /// Specific angular momentum r² sin²θ u_φ.
    pub fn specific_angular_momentum(&self, r: f64, theta: f64, u_phi: f64) -> f64 {
        self.g_phi_phi(r, theta) * u_phi
    }

    /// Squared effective potential for equatorial orbits with angular
    /// momentum `l`: (1 - r_s/r)(1 + L²/r²) for massive particles,
    /// (1 - r_s/r) L²/r² for photons.
    pub fn effective_potential(&self, r: f64, l: f64, massive: bool) -> f64 {
        let f = 1.0 - self.rs / r;
        let l2_r2 = l * l / (r * r);
        if massive {
            f * (1.0 + l2_r2)
        } else {
            f * l2_r2
        }
    }

    // ---------------- Derived properties ----------------

    pub fn mass_solar(&self) -> f64 {
        self.mass_solar
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn schwarzschild_radius(&self) -> f64 {
        self.rs
    }

    pub fn isco_radius(&self) -> f64 {
        ISCO_FACTOR * self.rs
    }

    pub fn photon_sphere_radius(&self) -> f64 {
        PHOTON_SPHERE_FACTOR * self.rs
    }

    pub fn horizon_area(&self) -> f64 {
        4.0 * PI * self.rs * self.rs
    }

    pub fn hawking_temperature(&self) -> f64 {
        hawking_temperature(self.mass_kg)
    }

    pub fn entropy(&self) -> f64 {
        bekenstein_hawking_entropy(self.mass_kg)
    }

    /// Gravitational time-dilation factor √(1 - r_s/r); zero at or inside the horizon.
    pub fn time_dilation(&self, r: f64) -> f64 {
        if r <= self.rs {
            return 0.0;
        }
        (1.0 - self.rs / r).sqrt()
    }

    /// Redshift z of light emitted at `r_emitter` and received at `r_observer`.
    pub fn redshift(&self, r_emitter: f64, r_observer: f64) -> f64 {
        self.time_dilation(r_observer) / self.time_dilation(r_emitter) - 1.0
    }

    /// Newtonian-form escape velocity c√(r_s/r), capped at c inside the horizon.
    pub fn escape_velocity(&self, r: f64) -> f64 {
        if r <= self.rs {
            return C;
        }
        C * (self.rs / r).sqrt()
    }

    /// Kretschmann scalar R_μνρσ R^μνρσ = 48M²/r⁶.
    pub fn kretschmann(&self, r: f64) -> f64 {
        48.0 * self.m * self.m / r.powi(6)
    }

    /// Vacuum solution: the Ricci scalar vanishes everywhere outside the singularity.
    pub fn ricci_scalar(&self) -> f64 {
        0.0
    }
}

impl AccelerationField for SchwarzschildMetric {
    /// d²x^μ/dλ² = -Γ^μ_αβ u^α u^β, returned after the four velocities.
    fn geodesic_acceleration(&self, position: &[f64; 4], velocity: &[f64; 4]) -> [f64; 8] {
        let r = position[1];
        let theta = position[2];
        let [u_t, u_r, u_theta, u_phi] = *velocity;

        let a_t = -2.0 * self.christoffel_t_tr(r) * u_t * u_r;
        let a_r = -self.christoffel_r_tt(r) * u_t * u_t
            - self.christoffel_r_rr(r) * u_r * u_r
            - self.christoffel_r_theta_theta(r) * u_theta * u_theta
            - self.christoffel_r_phi_phi(r, theta) * u_phi * u_phi;
        let a_theta = -2.0 * self.christoffel_theta_r_theta(r) * u_r * u_theta
            - self.christoffel_theta_phi_phi(theta) * u_phi * u_phi;
        let a_phi = -2.0 * self.christoffel_phi_r_phi(r) * u_r * u_phi
            - 2.0 * self.christoffel_phi_theta_phi(theta) * u_theta * u_phi;

        [u_t, u_r, u_theta, u_phi, a_t, a_r, a_theta, a_phi]
    }

    fn horizon_radius(&self) -> f64 {
        self.rs
    }
}

impl BlackHoleGeometry for SchwarzschildMetric {
    fn mass_geometric(&self) -> f64 {
        self.m
    }
    fn outer_horizon(&self) -> f64 {
        self.rs
    }
    fn isco(&self) -> f64 {
        self.isco_radius()
    }
    fn photon_orbit(&self) -> f64 {
        self.photon_sphere_radius()
    }
    fn hawking_temperature(&self) -> f64 {
        SchwarzschildMetric::hawking_temperature(self)
    }
    fn entropy(&self) -> f64 {
        SchwarzschildMetric::entropy(self)
    }
    fn metric_tensor(&self, r: f64, theta: f64) -> Mat4 {
        SchwarzschildMetric::metric_tensor(self, r, theta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use std::f64::consts::FRAC_PI_2;

    #[test]
    fn test_metric_invertibility_identity() {
        let bh = SchwarzschildMetric::new(10.0);
        let rs = bh.schwarzschild_radius();
        for factor in [1.0001, 1.5, 2.0, 3.0, 10.0, 1e3, 1e6] {
            let r = factor * rs;
            assert_relative_eq!(bh.g_rr(r) * (1.0 - rs / r), 1.0, max_relative = 1e-9);
            assert_relative_eq!(bh.g_tt(r) * bh.g_rr(r), -1.0, max_relative = 1e-9);
        }
    }

    #[test]
    fn test_sentinels_inside_horizon() {
        let bh = SchwarzschildMetric::new(1.0);
        let rs = bh.schwarzschild_radius();
        assert_eq!(bh.g_tt(rs), 0.0);
        assert_eq!(bh.g_rr(0.5 * rs), SINGULAR_SENTINEL);
        assert_eq!(bh.christoffel_t_tr(rs), 0.0);
        assert_eq!(bh.christoffel_r_tt(0.9 * rs), 0.0);
        assert_eq!(bh.christoffel_r_rr(0.9 * rs), 0.0);
        assert_eq!(bh.time_dilation(0.9 * rs), 0.0);
        assert_eq!(bh.escape_velocity(rs), C);
    }

    #[test]
    fn test_characteristic_radii() {
        for mass in [1.0, 4.3e6, 0.37, 65.0] {
            let bh = SchwarzschildMetric::new(mass);
            let rs = bh.schwarzschild_radius();
            assert!(rs > 0.0);
            assert_eq!(bh.isco_radius(), 3.0 * rs);
            assert_eq!(bh.photon_sphere_radius(), 1.5 * rs);
        }
    }

    #[test]
    fn test_solar_mass_scenario() {
        let bh = SchwarzschildMetric::new(1.0);
        assert_relative_eq!(bh.schwarzschild_radius(), 2953.25, max_relative = 1e-4);
        assert_relative_eq!(bh.hawking_temperature(), 6.17e-8, max_relative = 1e-2);
    }

    #[test]
    fn test_acceleration_is_pure() {
        let bh = SchwarzschildMetric::new(10.0);
        let rs = bh.schwarzschild_radius();
        let pos = [0.0, 7.0 * rs, 1.1, 0.3];
        let vel = [1.2, -0.4, 0.01 / rs, 0.02 / rs];
        assert_eq!(
            bh.geodesic_acceleration(&pos, &vel),
            bh.geodesic_acceleration(&pos, &vel)
        );
    }

    #[test]
    fn test_radial_null_ray_has_no_radial_acceleration() {
        // For E = 1 radial infall u_r = -1 and d²r/dλ² vanishes identically.
        let bh = SchwarzschildMetric::new(10.0);
        let rs = bh.schwarzschild_radius();
        let r = 12.0 * rs;
        let f = 1.0 - rs / r;
        let d = bh.geodesic_acceleration(&[0.0, r, 1.0, 0.0], &[1.0 / f, -1.0, 0.0, 0.0]);
        assert_abs_diff_eq!(d[5], 0.0, epsilon = 1e-15);
        assert_eq!(d[6], 0.0);
        assert_eq!(d[7], 0.0);
    }

    #[test]
    fn test_circular_photon_orbit_at_photon_sphere() {
        // u_r = 0 stays zero on the photon sphere for an equatorial null orbit.
        let bh = SchwarzschildMetric::new(10.0);
        let r = bh.photon_sphere_radius();
        let f = 1.0 - bh.schwarzschild_radius() / r;
        let u_t = 1.0 / f;
        let u_phi = (f * u_t * u_t).sqrt() / r;
        let d = bh.geodesic_acceleration(&[0.0, r, FRAC_PI_2, 0.0], &[u_t, 0.0, 0.0, u_phi]);
        assert_abs_diff_eq!(d[5] * r, 0.0, epsilon = 1e-9);
    }

    #[test]
    fn test_null_constraint_of_radial_ray() {
        let bh = SchwarzschildMetric::new(3.0);
        let rs = bh.schwarzschild_radius();
        let r = 40.0 * rs;
        let f = 1.0 - rs / r;
        let state = PhotonState {
            t: 0.0,
            r,
            theta: 0.8,
            phi: 0.0,
            u_t: 1.0 / f,
            u_r: -1.0,
            u_theta: 0.0,
            u_phi: 0.0,
        };
        assert_abs_diff_eq!(bh.null_constraint(&state), 0.0, epsilon = 1e-12);
    }

    #[test]
    fn test_redshift_and_curvature() {
        let bh = SchwarzschildMetric::new(10.0);
        let rs = bh.schwarzschild_radius();
        assert_abs_diff_eq!(bh.redshift(5.0 * rs, 5.0 * rs), 0.0, epsilon = 1e-15);
        assert!(bh.redshift(2.0 * rs, 100.0 * rs) > 0.0);
        let m = rs / 2.0;
        assert_relative_eq!(bh.kretschmann(rs), 48.0 * m * m / rs.powi(6), max_relative = 1e-12);
        assert_eq!(bh.ricci_scalar(), 0.0);
    }

    #[test]
    fn test_constants_of_motion() {
        let bh = SchwarzschildMetric::new(10.0);
        let rs = bh.schwarzschild_radius();
        let r = 4.0 * rs;
        assert_relative_eq!(bh.specific_energy(r, 1.0 / (1.0 - rs / r)), 1.0, max_relative = 1e-12);
        assert_relative_eq!(
            bh.specific_angular_momentum(r, FRAC_PI_2, 2.0 / (r * r)),
            2.0,
            max_relative = 1e-12
        );
        // Null effective potential peaks at the photon sphere.
        let l = 1.0;
        let peak = bh.effective_potential(bh.photon_sphere_radius(), l, false);
        assert!(peak > bh.effective_potential(1.4 * rs, l, false));
        assert!(peak > bh.effective_potential(1.6 * rs, l, false));
    }
}

use crate::physics::constants::*;
use crate::physics::{BlackHoleGeometry, Mat4};
use std::f64::consts::PI;

/// Rotating black hole in Boyer-Lindquist coordinates.
///
/// Exposes metric components and horizon properties only; photon transport
/// through Kerr spacetime is not wired into the integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KerrMetric {
    mass_kg: f64,
    m: f64,     // geometric mass GM/c² (m)
    a: f64,     // spin length a = J/(Mc) (m)
    spin: f64,  // dimensionless a/M, clamped to ±THORNE_SPIN_LIMIT
}

impl KerrMetric {
    /// Create a Kerr black hole with mass (solar masses) and dimensionless
    /// spin a/M, clamped to the astrophysical limit ±0.998.
    pub fn new(mass_solar: f64, spin: f64) -> Self {
        let mass_kg = mass_solar * SOLAR_MASS;
        let m = geometric_mass(mass_kg);
        let spin = spin.clamp(-THORNE_SPIN_LIMIT, THORNE_SPIN_LIMIT);
        Self {
            mass_kg,
            m,
            a: spin * m,
            spin,
        }
    }

    #[inline]
    fn sigma(&self, r: f64, theta: f64) -> f64 {
        let c = theta.cos();
        r * r + self.a * self.a * c * c
    }

    #[inline]
    fn delta(&self, r: f64) -> f64 {
        r * r - 2.0 * self.m * r + self.a * self.a
    }

    // ---------------- Metric components ----------------

    /// g_tt = -(1 - 2Mr/Σ)
    pub fn g_tt(&self, r: f64, theta: f64) -> f64 {
        -(1.0 - 2.0 * self.m * r / self.sigma(r, theta))
    }

    /// g_tφ = -2Mar sin²θ / Σ
    pub fn g_t_phi(&self, r: f64, theta: f64) -> f64 {
        let s = theta.sin();
        -2.0 * self.m * self.a * r * s * s / self.sigma(r, theta)
    }

    /// g_rr = Σ/Δ, sentinel on the horizons where Δ vanishes.
    pub fn g_rr(&self, r: f64, theta: f64) -> f64 {
        let delta = self.delta(r);
        if delta.abs() < 1e-10 {
            return SINGULAR_SENTINEL;
        }
        self.sigma(r, theta) / delta
    }

    /// g_θθ = Σ
    pub fn g_theta_theta(&self, r: f64, theta: f64) -> f64 {
        self.sigma(r, theta)
    }

    /// g_φφ = (r² + a² + 2Ma²r sin²θ/Σ) sin²θ
    pub fn g_phi_phi(&self, r: f64, theta: f64) -> f64 {
        let s2 = theta.sin().powi(2);
        let a2 = self.a * self.a;
        (r * r + a2 + 2.0 * self.m * a2 * r * s2 / self.sigma(r, theta)) * s2
    }

    pub fn metric_tensor(&self, r: f64, theta: f64) -> Mat4 {
        let g_tp = self.g_t_phi(r, theta);
        let mut g = Mat4::zeros();
        g[(0, 0)] = self.g_tt(r, theta);
        g[(0, 3)] = g_tp;
        g[(3, 0)] = g_tp;
        g[(1, 1)] = self.g_rr(r, theta);
        g[(2, 2)] = self.g_theta_theta(r, theta);
        g[(3, 3)] = self.g_phi_phi(r, theta);
        g
    }

    // ---------------- Horizons and ergosphere ----------------

    /// (r+, r-) = M ± √(M² - a²). NaN for |a| > M, which the spin clamp rules out.
    pub fn horizon_radii(&self) -> (f64, f64) {
        let root = (self.m * self.m - self.a * self.a).sqrt();
        (self.m + root, self.m - root)
    }

    pub fn outer_horizon(&self) -> f64 {
        self.horizon_radii().0
    }

    pub fn inner_horizon(&self) -> f64 {
        self.horizon_radii().1
    }

    /// Outer ergosurface r = M + √(M² - a² cos²θ).
    pub fn ergosphere_radius(&self, theta: f64) -> f64 {
        let c = theta.cos();
        self.m + (self.m * self.m - self.a * self.a * c * c).sqrt()
    }

    // ---------------- Physical properties ----------------

    /// Horizon angular velocity Ω_H = a c / (r+² + a²) (rad/s).
    pub fn horizon_angular_velocity(&self) -> f64 {
        let rp = self.outer_horizon();
        self.a * C / (rp * rp + self.a * self.a)
    }

    /// Hawking temperature ħc (r+ - r-) / (4π k_B (r+² + a²)) (K).
    pub fn hawking_temperature(&self) -> f64 {
        let (rp, rm) = self.horizon_radii();
        HBAR * C * (rp - rm) / (4.0 * PI * KB * (rp * rp + self.a * self.a))
    }

    pub fn horizon_area(&self) -> f64 {
        let rp = self.outer_horizon();
        4.0 * PI * (rp * rp + self.a * self.a)
    }

    pub fn entropy(&self) -> f64 {
        horizon_entropy(self.horizon_area())
    }

    /// Innermost stable circular orbit via the Bardeen-Press-Teukolsky
    /// z1/z2 construction.
    pub fn isco_radius(&self, prograde: bool) -> f64 {
        let s = self.spin;
        let z1 = 1.0 + (1.0 - s * s).cbrt() * ((1.0 + s).cbrt() + (1.0 - s).cbrt());
        let z2 = (3.0 * s * s + z1 * z1).sqrt();
        let root = ((3.0 - z1) * (3.0 + z1 + 2.0 * z2)).sqrt();
        if prograde {
            self.m * (3.0 + z2 - root)
        } else {
            self.m * (3.0 + z2 + root)
        }
    }

    /// Equatorial circular photon orbit 2M(1 + cos(⅔ arccos(∓a/M))).
    pub fn photon_orbit_radius(&self, prograde: bool) -> f64 {
        let s = if prograde { -self.spin } else { self.spin };
        2.0 * self.m * (1.0 + ((2.0 / 3.0) * s.acos()).cos())
    }

    /// Frame-dragging angular velocity ω = 2Mar c / A (rad/s).
    pub fn frame_dragging(&self, r: f64, theta: f64) -> f64 {
        let a2 = self.a * self.a;
        let r2a2 = r * r + a2;
        let big_a = r2a2 * r2a2 - self.delta(r) * a2 * theta.sin().powi(2);
        2.0 * self.m * self.a * r * C / big_a
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn spin_length(&self) -> f64 {
        self.a
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }
}

impl BlackHoleGeometry for KerrMetric {
    fn mass_geometric(&self) -> f64 {
        self.m
    }
    fn outer_horizon(&self) -> f64 {
        KerrMetric::outer_horizon(self)
    }
    fn isco(&self) -> f64 {
        self.isco_radius(true)
    }
    fn photon_orbit(&self) -> f64 {
        self.photon_orbit_radius(true)
    }
    fn hawking_temperature(&self) -> f64 {
        KerrMetric::hawking_temperature(self)
    }
    fn entropy(&self) -> f64 {
        KerrMetric::entropy(self)
    }
    fn metric_tensor(&self, r: f64, theta: f64) -> Mat4 {
        KerrMetric::metric_tensor(self, r, theta)
    }
}

use crate::color::Rgb;
use crate::physics::constants::*;
use serde::Serialize;
use std::f64::consts::PI;

/// Local properties of one annulus of the disk.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiskRing {
    pub radius: f64,           // m
    pub temperature: f64,      // K
    pub flux: f64,             // σT⁴, W/m²
    pub orbital_velocity: f64, // m/s
    pub redshift: f64,         // √(1 - r_s/r)
}

/// Geometrically thin, optically thick Shakura-Sunyaev disk in the
/// equatorial plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AccretionDisk {
    mass_kg: f64,
    rs: f64,
    spin: f64,
    accretion_rate: f64, // kg/s
    inner_radius: f64,
    outer_radius: f64,
    t_star: f64,
}

impl AccretionDisk {
    /// Disk around a hole of `mass_solar` accreting at `eddington_fraction`
    /// of the Eddington rate. Spin is clamped to [0, 0.998].
    pub fn new(mass_solar: f64, eddington_fraction: f64, spin: f64) -> Self {
        let mass_kg = mass_solar * SOLAR_MASS;
        let rs = schwarzschild_radius(mass_kg);
        let spin = spin.clamp(0.0, THORNE_SPIN_LIMIT);

        let inner_radius = if spin < 0.01 {
            ISCO_FACTOR * rs
        } else {
            rs * (3.0 + spin - ((3.0 - spin) * (1.0 + spin)).sqrt())
        };
        let outer_radius = DISK_OUTER_FACTOR * rs;

        let l_edd = EDDINGTON_LUMINOSITY_PER_SOLAR_MASS * mass_solar;
        let accretion_rate = eddington_fraction * l_edd / (RADIATIVE_EFFICIENCY * C2);

        let t_star = (3.0 * G * mass_kg * accretion_rate
            / (8.0 * PI * SIGMA_SB * inner_radius.powi(3)))
        .powf(0.25);

        Self {
            mass_kg,
            rs,
            spin,
            accretion_rate,
            inner_radius,
            outer_radius,
            t_star,
        }
    }

    /// Effective temperature (K); zero off the disk.
    pub fn temperature(&self, radius: f64) -> f64 {
        if !self.is_on_disk(radius) {
            return 0.0;
        }
        let x = radius / self.inner_radius;
        self.t_star * x.powf(-0.75) * (1.0 - (1.0 / x).sqrt()).powf(0.25)
    }

    /// Planck spectral radiance B(ν, T) (W sr⁻¹ m⁻² Hz⁻¹).
    pub fn planck(&self, frequency: f64, temperature: f64) -> f64 {
        if temperature <= 0.0 {
            return 0.0;
        }
        let x = H_PLANCK * frequency / (KB * temperature);
        if x > 700.0 {
            return 0.0;
        }
        (2.0 * H_PLANCK * frequency.powi(3) / C2) / x.exp_m1()
    }

    /// Empirical fit to the Planckian locus, keyed on T/100.
    pub fn blackbody_color(&self, temperature: f64) -> Rgb {
        if temperature <= 0.0 {
            return Rgb::BLACK;
        }
        let t = temperature / 100.0;

        let r = if t <= 66.0 {
            1.0
        } else {
            1.292_936_186_062_74 * (t - 60.0).powf(-0.133_204_759_2)
        };
        let g = if t <= 66.0 {
            0.390_081_578_769_871 * t.ln() - 0.631_841_443_788_627
        } else {
            1.129_890_860_895_29 * (t - 60.0).powf(-0.075_514_849_2)
        };
        let b = if t >= 66.0 {
            1.0
        } else if t <= 19.0 {
            0.0
        } else {
            0.543_206_789_110_196 * (t - 10.0).ln() - 1.196_254_089_14
        };

        Rgb::new(r, g, b).clamped()
    }

    /// Gravitational redshift factor √(1 - r_s/r); zero at or inside the horizon.
    pub fn redshift_factor(&self, radius: f64) -> f64 {
        if radius <= self.rs {
            return 0.0;
        }
        (1.0 - self.rs / radius).sqrt()
    }

    pub fn keplerian_velocity(&self, radius: f64) -> f64 {
        (G * self.mass_kg / radius).sqrt()
    }

    /// Relativistic beaming factor 1 / [γ(1 - β cos φ)].
    pub fn doppler_factor(&self, radius: f64, observer_angle: f64) -> f64 {
        let beta = self.keplerian_velocity(radius) / C;
        let gamma = 1.0 / (1.0 - beta * beta).sqrt();
        1.0 / (gamma * (1.0 - beta * observer_angle.cos()))
    }

    /// Blackbody color scaled by (D·z)⁴. Beaming and redshift dimming are
    /// folded into one quartic factor.
    pub fn observed_intensity(&self, radius: f64, observer_angle: f64) -> Rgb {
        let temperature = self.temperature(radius);
        if temperature <= 0.0 {
            return Rgb::BLACK;
        }
        let d = self.doppler_factor(radius, observer_angle);
        let z = self.redshift_factor(radius);
        self.blackbody_color(temperature) * (d * z).powi(4)
    }

    /// Inner and outer edges are both inclusive.
    #[inline]
    pub fn is_on_disk(&self, radius: f64) -> bool {
        radius >= self.inner_radius && radius <= self.outer_radius
    }

    pub fn ring(&self, radius: f64) -> DiskRing {
        let temperature = self.temperature(radius);
        DiskRing {
            radius,
            temperature,
            flux: SIGMA_SB * temperature.powi(4),
            orbital_velocity: self.keplerian_velocity(radius),
            redshift: self.redshift_factor(radius),
        }
    }

    /// ηṀc² with η = 1 - √(r_s/r_in) (W).
    pub fn total_luminosity(&self) -> f64 {
        let eta = 1.0 - (self.rs / self.inner_radius).sqrt();
        eta * self.accretion_rate * C2
    }

    /// Temperature at r ≈ 49/36 r_in, where the profile peaks.
    pub fn max_temperature(&self) -> f64 {
        self.temperature(1.361 * self.inner_radius)
    }

    pub fn inner_radius(&self) -> f64 {
        self.inner_radius
    }

    pub fn outer_radius(&self) -> f64 {
        self.outer_radius
    }

    pub fn accretion_rate(&self) -> f64 {
        self.accretion_rate
    }

    pub fn mass_kg(&self) -> f64 {
        self.mass_kg
    }

    pub fn spin(&self) -> f64 {
        self.spin
    }
}

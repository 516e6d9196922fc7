use crate::physics::constants::*;
use crate::physics::{AccretionDisk, BlackHoleGeometry, KerrMetric, SchwarzschildMetric};
use crate::simulation::config::{BlackHoleType, SimulationConfig};
use serde::Serialize;
use std::f64::consts::FRAC_PI_2;
use std::fmt;

/// Radii (in r_s) at which time dilation and escape velocity are reported.
pub const SAMPLE_RADII_RS: [f64; 6] = [1.5, 2.0, 3.0, 5.0, 10.0, 100.0];

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RadialSample {
    pub radius_rs: f64,
    pub time_dilation: f64,
    pub escape_velocity: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct KerrSummary {
    pub spin: f64,
    pub outer_horizon: f64,
    pub inner_horizon: f64,
    pub ergosphere_equator: f64,
    pub horizon_angular_velocity: f64,
    pub isco_prograde: f64,
    pub isco_retrograde: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct DiskSummary {
    pub inner_radius: f64,
    pub outer_radius: f64,
    pub accretion_rate: f64,
    pub max_temperature: f64,
    pub luminosity: f64,
}

/// Physical properties of the configured hole. Horizon, ISCO, photon
/// orbit, temperature and entropy come from the configured geometry, so
/// they include spin for Kerr holes.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PhysicalAnalysis {
    pub black_hole: BlackHoleType,
    pub mass_solar: f64,
    pub mass_kg: f64,
    pub schwarzschild_radius: f64,
    pub horizon_radius: f64,
    pub isco_radius: f64,
    pub photon_orbit_radius: f64,
    pub horizon_area: f64,
    pub hawking_temperature: f64,
    pub entropy: f64,
    pub hawking_luminosity: f64,
    pub evaporation_time_s: f64,
    pub evaporation_time_years: f64,
    pub radial: Vec<RadialSample>,
    pub kerr: Option<KerrSummary>,
    pub disk: Option<DiskSummary>,
}

impl PhysicalAnalysis {
    pub fn new(config: &SimulationConfig) -> Self {
        let schwarzschild = SchwarzschildMetric::new(config.mass_solar);
        let kerr = KerrMetric::new(config.mass_solar, config.spin);
        let (geometry, horizon_area) = match config.black_hole {
            BlackHoleType::Schwarzschild => (
                &schwarzschild as &dyn BlackHoleGeometry,
                schwarzschild.horizon_area(),
            ),
            BlackHoleType::Kerr => (&kerr as &dyn BlackHoleGeometry, kerr.horizon_area()),
        };

        let rs = schwarzschild.schwarzschild_radius();
        let mass_kg = schwarzschild.mass_kg();
        let evaporation_time_s = evaporation_time(mass_kg);

        let radial = SAMPLE_RADII_RS
            .iter()
            .map(|&k| RadialSample {
                radius_rs: k,
                time_dilation: schwarzschild.time_dilation(k * rs),
                escape_velocity: schwarzschild.escape_velocity(k * rs),
            })
            .collect();

        let kerr_summary = (config.black_hole == BlackHoleType::Kerr).then(|| KerrSummary {
            spin: kerr.spin(),
            outer_horizon: kerr.outer_horizon(),
            inner_horizon: kerr.inner_horizon(),
            ergosphere_equator: kerr.ergosphere_radius(FRAC_PI_2),
            horizon_angular_velocity: kerr.horizon_angular_velocity(),
            isco_prograde: kerr.isco_radius(true),
            isco_retrograde: kerr.isco_radius(false),
        });

        let disk = config.include_disk.then(|| {
            let d = AccretionDisk::new(config.mass_solar, config.eddington_fraction, config.spin);
            DiskSummary {
                inner_radius: d.inner_radius(),
                outer_radius: d.outer_radius(),
                accretion_rate: d.accretion_rate(),
                max_temperature: d.max_temperature(),
                luminosity: d.total_luminosity(),
            }
        });

        Self {
            black_hole: config.black_hole,
            mass_solar: config.mass_solar,
            mass_kg,
            schwarzschild_radius: rs,
            horizon_radius: geometry.outer_horizon(),
            isco_radius: geometry.isco(),
            photon_orbit_radius: geometry.photon_orbit(),
            horizon_area,
            hawking_temperature: geometry.hawking_temperature(),
            entropy: geometry.entropy(),
            hawking_luminosity: hawking_luminosity(mass_kg),
            evaporation_time_s,
            evaporation_time_years: evaporation_time_s / SECONDS_PER_YEAR,
            radial,
            kerr: kerr_summary,
            disk,
        }
    }
}

impl fmt::Display for PhysicalAnalysis {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let kind = match self.black_hole {
            BlackHoleType::Schwarzschild => "Schwarzschild",
            BlackHoleType::Kerr => "Kerr",
        };
        writeln!(f, "Black hole analysis ({kind}, {} M☉ = {:.3e} kg)", self.mass_solar, self.mass_kg)?;
        writeln!(f)?;
        writeln!(f, "Geometry:")?;
        writeln!(f, "  Schwarzschild radius : {:.4e} m", self.schwarzschild_radius)?;
        writeln!(f, "  Event horizon        : {:.4e} m", self.horizon_radius)?;
        writeln!(f, "  ISCO                 : {:.4e} m", self.isco_radius)?;
        writeln!(f, "  Photon orbit         : {:.4e} m", self.photon_orbit_radius)?;
        writeln!(f, "  Horizon area         : {:.4e} m²", self.horizon_area)?;
        writeln!(f)?;
        writeln!(f, "Thermodynamics:")?;
        writeln!(f, "  Hawking temperature  : {:.4e} K", self.hawking_temperature)?;
        writeln!(f, "  Entropy              : {:.4e} J/K", self.entropy)?;
        writeln!(f, "  Hawking luminosity   : {:.4e} W", self.hawking_luminosity)?;
        writeln!(
            f,
            "  Evaporation time     : {:.4e} s ({:.4e} years)",
            self.evaporation_time_s, self.evaporation_time_years
        )?;
        writeln!(f)?;
        writeln!(f, "Relativistic effects:")?;
        for s in &self.radial {
            writeln!(
                f,
                "  r = {:>5.1} r_s: time dilation {:.4}, escape velocity {:.2e} m/s ({:.1}% c)",
                s.radius_rs,
                s.time_dilation,
                s.escape_velocity,
                100.0 * s.escape_velocity / C
            )?;
        }
        if let Some(k) = &self.kerr {
            writeln!(f)?;
            writeln!(f, "Rotation (a/M = {:.3}):", k.spin)?;
            writeln!(f, "  Horizons r+ / r-     : {:.4e} / {:.4e} m", k.outer_horizon, k.inner_horizon)?;
            writeln!(f, "  Ergosphere (equator) : {:.4e} m", k.ergosphere_equator)?;
            writeln!(f, "  Horizon Ω            : {:.4e} rad/s", k.horizon_angular_velocity)?;
            writeln!(
                f,
                "  ISCO pro / retro     : {:.4e} / {:.4e} m",
                k.isco_prograde, k.isco_retrograde
            )?;
        }
        if let Some(d) = &self.disk {
            writeln!(f)?;
            writeln!(f, "Accretion disk:")?;
            writeln!(f, "  Inner / outer radius : {:.4e} / {:.4e} m", d.inner_radius, d.outer_radius)?;
            writeln!(f, "  Accretion rate       : {:.4e} kg/s", d.accretion_rate)?;
            writeln!(f, "  Peak temperature     : {:.4e} K", d.max_temperature)?;
            writeln!(f, "  Luminosity           : {:.4e} W", d.luminosity)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_schwarzschild_analysis() {
        let config = SimulationConfig {
            mass_solar: 1.0,
            ..Default::default()
        };
        let a = PhysicalAnalysis::new(&config);
        assert!((a.schwarzschild_radius - 2953.25).abs() < 0.5);
        assert_eq!(a.horizon_radius, a.schwarzschild_radius);
        assert_relative_eq!(a.isco_radius, 3.0 * a.schwarzschild_radius, max_relative = 1e-12);
        assert_relative_eq!(a.hawking_temperature, 6.17e-8, max_relative = 1e-2);
        assert_eq!(a.radial.len(), SAMPLE_RADII_RS.len());
        assert_relative_eq!(a.radial[1].time_dilation, 0.5f64.sqrt(), max_relative = 1e-12);
        assert!(a.kerr.is_none());
        assert!(a.disk.is_some());
    }

    #[test]
    fn test_kerr_analysis_uses_spin() {
        let mut config = SimulationConfig {
            include_disk: false,
            ..Default::default()
        };
        config.set_spin(0.9);
        let a = PhysicalAnalysis::new(&config);
        let k = a.kerr.expect("kerr summary");
        assert!(a.horizon_radius < a.schwarzschild_radius);
        assert!(k.isco_prograde < k.isco_retrograde);
        assert!(k.ergosphere_equator > k.outer_horizon);
        assert!(a.disk.is_none());
    }

    #[test]
    fn test_report_renders_and_serializes() {
        let mut config = SimulationConfig::default();
        config.set_spin(0.5);
        let a = PhysicalAnalysis::new(&config);
        let text = a.to_string();
        assert!(text.contains("Hawking temperature"));
        assert!(text.contains("Rotation"));
        assert!(text.contains("Accretion disk"));
        let json = serde_json::to_value(&a).unwrap();
        assert_eq!(json["black_hole"], "kerr");
        assert_eq!(json["radial"].as_array().map(Vec::len), Some(6));
    }
}

use crate::physics::constants::{DEFAULT_STEP, MAX_INTEGRATION_STEPS, THORNE_SPIN_LIMIT};
use log::debug;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

const MIN_MASS_SOLAR: f64 = 1e-6;
const MIN_DISTANCE_RS: f64 = 1.1;
const MIN_INCLINATION_DEG: f64 = 0.01;
const MAX_INCLINATION_DEG: f64 = 179.99;
const MIN_FOV_DEG: f64 = 0.01;
const MAX_FOV_DEG: f64 = 179.0;
/// Spin magnitude above which the command line selects a Kerr hole.
pub const KERR_SPIN_THRESHOLD: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BlackHoleType {
    #[default]
    Schwarzschild,
    Kerr,
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// Everything needed to set up and render one scene. Missing JSON fields
/// take their default values.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub black_hole: BlackHoleType,
    pub mass_solar: f64,
    /// Dimensionless spin a/M.
    pub spin: f64,
    pub include_disk: bool,
    pub eddington_fraction: f64,
    pub width: u32,
    pub height: u32,
    /// Observer radius in Schwarzschild radii.
    pub distance_rs: f64,
    /// Observer polar angle in degrees, 0 pole-on and 90 edge-on.
    pub inclination_deg: f64,
    /// Horizontal field of view in degrees.
    pub fov_deg: f64,
    /// Base affine step in Schwarzschild radii.
    pub step: f64,
    pub max_steps: usize,
    pub threads: usize,
    pub output_dir: PathBuf,
    pub file_prefix: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            black_hole: BlackHoleType::Schwarzschild,
            mass_solar: 10.0,
            spin: 0.0,
            include_disk: true,
            eddington_fraction: 0.1,
            width: 800,
            height: 600,
            distance_rs: 100.0,
            inclination_deg: 75.0,
            fov_deg: 45.0,
            step: DEFAULT_STEP,
            max_steps: MAX_INTEGRATION_STEPS,
            threads: 4,
            output_dir: PathBuf::from("output"),
            file_prefix: "black_hole".to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }

    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Set the spin; anything above 0.01 also switches the hole to Kerr.
    pub fn set_spin(&mut self, spin: f64) {
        self.spin = spin;
        if spin > KERR_SPIN_THRESHOLD {
            self.black_hole = BlackHoleType::Kerr;
        }
    }

    /// Pull every field into its valid range. Out-of-range input is
    /// corrected rather than rejected.
    pub fn clamped(mut self) -> Self {
        self.mass_solar = clamp_logged("mass_solar", self.mass_solar, MIN_MASS_SOLAR, f64::MAX);
        self.spin = clamp_logged("spin", self.spin, -THORNE_SPIN_LIMIT, THORNE_SPIN_LIMIT);
        self.eddington_fraction =
            clamp_logged("eddington_fraction", self.eddington_fraction, 0.0, f64::MAX);
        self.distance_rs = clamp_logged("distance_rs", self.distance_rs, MIN_DISTANCE_RS, f64::MAX);
        self.inclination_deg = clamp_logged(
            "inclination_deg",
            self.inclination_deg,
            MIN_INCLINATION_DEG,
            MAX_INCLINATION_DEG,
        );
        self.fov_deg = clamp_logged("fov_deg", self.fov_deg, MIN_FOV_DEG, MAX_FOV_DEG);

        if !(self.step > 0.0 && self.step.is_finite()) {
            debug!("step {} -> {}", self.step, DEFAULT_STEP);
            self.step = DEFAULT_STEP;
        }
        if self.width == 0 || self.height == 0 {
            debug!("resolution {}x{} raised to at least 1x1", self.width, self.height);
            self.width = self.width.max(1);
            self.height = self.height.max(1);
        }
        if self.max_steps == 0 {
            debug!("max_steps 0 -> 1");
            self.max_steps = 1;
        }
        if self.threads == 0 {
            debug!("threads 0 -> 1");
            self.threads = 1;
        }
        self
    }

    pub fn inclination_rad(&self) -> f64 {
        self.inclination_deg.to_radians()
    }

    pub fn fov_rad(&self) -> f64 {
        self.fov_deg.to_radians()
    }
}

/// Clamp into [lo, hi], mapping NaN to `lo`.
fn clamp_logged(name: &str, value: f64, lo: f64, hi: f64) -> f64 {
    let clamped = if value.is_nan() { lo } else { value.clamp(lo, hi) };
    if clamped != value {
        debug!("{name} {value} -> {clamped}");
    }
    clamped
}

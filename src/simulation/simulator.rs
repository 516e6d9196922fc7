use crate::data::{ExportResult, ImportExport};
use crate::physics::{AccretionDisk, GeodesicIntegrator, SchwarzschildMetric, Trajectory};
use crate::rendering::{Camera, Image, RayTracer, RenderProgress, RenderResult, RenderStats, Renderer};
use crate::simulation::analysis::PhysicalAnalysis;
use crate::simulation::config::{BlackHoleType, SimulationConfig};
use chrono::{DateTime, Local};
use log::{info, warn};
use std::fmt::Write as _;
use std::path::PathBuf;
use std::time::{Duration, Instant};

/// Affine-parameter bound for trajectory mode, in observer radii.
const TRAJECTORY_SPAN: f64 = 4.0;

/// Builds the tracer for a configuration, renders, times and saves.
pub struct Simulator {
    config: SimulationConfig,
    renderer: Renderer,
    last_render: Option<Duration>,
}

impl Simulator {
    /// The configuration is clamped first. Kerr holes are traced through
    /// Schwarzschild spacetime of the same mass; spin still shapes the disk.
    pub fn new(config: SimulationConfig) -> Self {
        let config = config.clamped();
        if config.black_hole == BlackHoleType::Kerr {
            warn!(
                "photon transport is Schwarzschild only; spin {} affects the disk and analysis",
                config.spin
            );
        }

        let metric = SchwarzschildMetric::new(config.mass_solar);
        let rs = metric.schwarzschild_radius();
        let camera = Camera::new(
            config.distance_rs * rs,
            config.inclination_rad(),
            config.fov_rad(),
            config.width,
            config.height,
        );

        let mut tracer = RayTracer::new(metric, camera)
            .with_step(config.step)
            .with_max_steps(config.max_steps);
        if config.include_disk {
            tracer = tracer.with_disk(AccretionDisk::new(
                config.mass_solar,
                config.eddington_fraction,
                config.spin,
            ));
        }

        let renderer = Renderer::new(tracer, config.threads);
        Self {
            config,
            renderer,
            last_render: None,
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    pub fn tracer(&self) -> &RayTracer {
        self.renderer.tracer()
    }

    pub fn progress(&self) -> RenderProgress {
        self.renderer.progress()
    }

    pub fn stats(&self) -> RenderStats {
        self.renderer.stats()
    }

    pub fn last_render_time(&self) -> Option<Duration> {
        self.last_render
    }

    pub fn render(&mut self) -> RenderResult<Image> {
        let start = Instant::now();
        let image = self.renderer.render()?;
        let elapsed = start.elapsed();
        self.last_render = Some(elapsed);

        let pixels = image.width() * image.height();
        info!(
            "Rendered {} pixels in {:.2} s ({:.0} pixels/s)",
            pixels,
            elapsed.as_secs_f64(),
            pixels as f64 / elapsed.as_secs_f64().max(1e-9)
        );
        Ok(image)
    }

    /// `<prefix>_M<mass>_inc<inclination>_<w>x<h>_<timestamp>`
    pub fn file_stem(&self, timestamp: DateTime<Local>) -> String {
        let c = &self.config;
        format!(
            "{}_M{}_inc{}_{}x{}_{}",
            c.file_prefix,
            c.mass_solar as i64,
            c.inclination_deg as i64,
            c.width,
            c.height,
            timestamp.format("%Y%m%d_%H%M%S")
        )
    }

    /// Write the image as PPM (and CSV when asked) into the output
    /// directory, creating it if needed. Returns the written paths.
    pub fn save(&self, image: &Image, with_csv: bool) -> ExportResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let stem = self.file_stem(Local::now());

        let ppm = self.config.output_dir.join(format!("{stem}.ppm"));
        ImportExport::export_ppm(image, &ppm)?;
        info!("Saved {}", ppm.display());
        let mut written = vec![ppm];

        if with_csv {
            let csv = self.config.output_dir.join(format!("{stem}.csv"));
            ImportExport::export_csv(image, &csv)?;
            info!("Saved {}", csv.display());
            written.push(csv);
        }
        Ok(written)
    }

    pub fn analysis(&self) -> PhysicalAnalysis {
        PhysicalAnalysis::new(&self.config)
    }

    /// Integrate one photon launched from the observer with impact
    /// parameter `impact_rs` (in r_s) in the azimuthal direction.
    pub fn trajectory(&self, impact_rs: f64) -> Trajectory {
        let tracer = self.tracer();
        let rs = tracer.metric().schwarzschild_radius();
        let start = tracer.initial_state(impact_rs * rs, 0.0);
        let integrator = GeodesicIntegrator::new(tracer.metric(), self.config.step * rs);
        integrator.integrate(
            start,
            TRAJECTORY_SPAN * tracer.camera().distance,
            self.config.max_steps,
        )
    }

    pub fn save_trajectory(&self, trajectory: &Trajectory, impact_rs: f64) -> ExportResult<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir)?;
        let path = self.config.output_dir.join(format!(
            "{}_trajectory_b{}_{}.csv",
            self.config.file_prefix,
            impact_rs,
            Local::now().format("%Y%m%d_%H%M%S")
        ));
        ImportExport::export_trajectory(trajectory, &path)?;
        info!("Saved {} ({} points)", path.display(), trajectory.points.len());
        Ok(path)
    }

    /// Human-readable parameter block printed before a render.
    pub fn parameter_summary(&self) -> String {
        let c = &self.config;
        let rs = self.tracer().metric().schwarzschild_radius();
        let mut s = String::new();
        let kind = match c.black_hole {
            BlackHoleType::Schwarzschild => "Schwarzschild (static, spherical)".to_string(),
            BlackHoleType::Kerr => format!("Kerr (rotating), spin = {:.3}", c.spin),
        };
        let _ = writeln!(s, "Black hole      : {kind}");
        let _ = writeln!(s, "Mass            : {} M☉", c.mass_solar);
        let _ = writeln!(s, "r_s             : {:.3} m ({:.1} km)", rs, rs / 1000.0);
        let _ = writeln!(s, "Disk            : {}", if c.include_disk { "on" } else { "off" });
        let _ = writeln!(s, "Resolution      : {} x {}", c.width, c.height);
        let _ = writeln!(s, "Distance        : {} r_s ({:.2e} m)", c.distance_rs, c.distance_rs * rs);
        let _ = writeln!(s, "Inclination     : {:.1}°", c.inclination_deg);
        let _ = writeln!(s, "Field of view   : {:.1}°", c.fov_deg);
        let _ = writeln!(s, "Step / budget   : {} r_s / {}", c.step, c.max_steps);
        let _ = writeln!(s, "Threads         : {}", c.threads);
        s
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::TrajectoryEnd;
    use chrono::TimeZone;
    use tempfile::tempdir;

    fn small_config(dir: &std::path::Path) -> SimulationConfig {
        SimulationConfig {
            width: 8,
            height: 6,
            distance_rs: 30.0,
            step: 0.2,
            threads: 2,
            output_dir: dir.to_path_buf(),
            ..Default::default()
        }
    }

    #[test]
    fn test_file_stem_format() {
        let dir = tempdir().unwrap();
        let sim = Simulator::new(small_config(dir.path()));
        let ts = Local.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        assert_eq!(sim.file_stem(ts), "black_hole_M10_inc75_8x6_20240309_140507");
    }

    #[test]
    fn test_render_and_save() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("nested").join("out");
        let mut sim = Simulator::new(SimulationConfig {
            output_dir: out.clone(),
            ..small_config(dir.path())
        });
        let image = sim.render().unwrap();
        assert!(sim.last_render_time().is_some());
        assert_eq!(sim.stats().rays(), 48);
        assert_eq!(sim.progress().completed_rows(), 6);

        let paths = sim.save(&image, true).unwrap();
        assert_eq!(paths.len(), 2);
        assert!(paths.iter().all(|p| p.starts_with(&out) && p.exists()));
        let back = ImportExport::read_ppm(&paths[0]).unwrap();
        assert_eq!(back.into_raw(), ImportExport::to_bytes(&image));
    }

    #[test]
    fn test_config_is_clamped_on_construction() {
        let dir = tempdir().unwrap();
        let sim = Simulator::new(SimulationConfig {
            threads: 0,
            spin: 4.0,
            ..small_config(dir.path())
        });
        assert_eq!(sim.config().threads, 1);
        assert!(sim.config().spin < 1.0);
        assert!(sim.parameter_summary().contains("Threads         : 1"));
    }

    #[test]
    fn test_trajectories() {
        let dir = tempdir().unwrap();
        let sim = Simulator::new(small_config(dir.path()));
        let plunge = sim.trajectory(0.0);
        assert_eq!(plunge.end, TrajectoryEnd::Horizon);

        let path = sim.save_trajectory(&plunge, 0.0).unwrap();
        assert!(path.exists());
    }
}

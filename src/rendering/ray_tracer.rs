use crate::color::Rgb;
use crate::physics::constants::{DEFAULT_STEP, HORIZON_TOLERANCE, MAX_INTEGRATION_STEPS};
use crate::physics::{AccretionDisk, GeodesicIntegrator, PhotonState, SchwarzschildMetric};
use crate::rendering::camera::Camera;
use std::f64::consts::{FRAC_PI_2, PI, TAU};

/// Angular half-width of the disk plane test (rad).
const DISK_PLANE_TOLERANCE: f64 = 0.01;
/// Rays farther than this multiple of the observer radius have escaped.
const ESCAPE_FACTOR: f64 = 2.0;
const GRID_SPACING: f64 = PI / 12.0;
const GRID_THICKNESS: f64 = 0.02;
const PLAIN_SKY: Rgb = Rgb::new(0.02, 0.02, 0.05);

/// Terminal state of a traced ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RayFate {
    CapturedByHorizon { radius: f64 },
    HitDisk { radius: f64, theta: f64, phi: f64 },
    EscapedToInfinity { theta: f64, phi: f64 },
    /// Step budget ran out before any other terminal state.
    IntegrationExhausted { radius: f64 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayOutcome {
    pub fate: RayFate,
    pub color: Rgb,
    pub steps: usize,
}

/// Backward ray tracer from a static observer through Schwarzschild
/// spacetime onto an optional disk and a procedural sky.
#[derive(Debug, Clone)]
pub struct RayTracer {
    metric: SchwarzschildMetric,
    disk: Option<AccretionDisk>,
    camera: Camera,
    rs: f64,
    base_step: f64, // in units of r_s
    max_steps: usize,
    background: bool,
}

impl RayTracer {
    pub fn new(metric: SchwarzschildMetric, camera: Camera) -> Self {
        let rs = metric.schwarzschild_radius();
        Self {
            metric,
            disk: None,
            camera,
            rs,
            base_step: DEFAULT_STEP,
            max_steps: MAX_INTEGRATION_STEPS,
            background: true,
        }
    }

    pub fn with_disk(mut self, disk: AccretionDisk) -> Self {
        self.disk = Some(disk);
        self
    }

    /// Base affine step in units of r_s, scaled by √(r/r_s) along the ray.
    pub fn with_step(mut self, step: f64) -> Self {
        self.base_step = step;
        self
    }

    pub fn with_max_steps(mut self, max_steps: usize) -> Self {
        self.max_steps = max_steps;
        self
    }

    /// Replace the star field and grid with a flat dark sky.
    pub fn with_background(mut self, enabled: bool) -> Self {
        self.background = enabled;
        self
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn metric(&self) -> &SchwarzschildMetric {
        &self.metric
    }

    pub fn disk(&self) -> Option<&AccretionDisk> {
        self.disk.as_ref()
    }

    pub fn max_steps(&self) -> usize {
        self.max_steps
    }

    /// Null initial state for impact parameters (α, β) in meters.
    ///
    /// The angular offsets α/r₀ and β/r₀ are taken as coordinate rates:
    /// u_θ = (β/r₀)/r₀ and u_φ = (α/r₀)/(r₀ sin θ₀), so that r₀ u_θ is the
    /// dimensionless transverse speed. u_r is the inward root of the null
    /// condition, floored at zero when the offsets are too large for a real
    /// root; such rays leave tangentially and are no longer exactly null.
    pub fn initial_state(&self, alpha: f64, beta: f64) -> PhotonState {
        let r0 = self.camera.distance;
        let theta0 = self.camera.inclination;
        let sin0 = theta0.sin();
        let f = 1.0 - self.rs / r0;

        let u_t = 1.0 / f;
        let u_theta = (beta / r0) / r0;
        let u_phi = (alpha / r0) / (r0 * sin0);

        let u_r_sq = f
            * (f * u_t * u_t
                - r0 * r0 * u_theta * u_theta
                - r0 * r0 * sin0 * sin0 * u_phi * u_phi);
        let u_r = -u_r_sq.max(0.0).sqrt();

        PhotonState {
            t: 0.0,
            r: r0,
            theta: theta0,
            phi: 0.0,
            u_t,
            u_r,
            u_theta,
            u_phi,
        }
    }

    pub fn trace_pixel(&self, i: u32, j: u32) -> RayOutcome {
        let (alpha, beta) = self.camera.impact_parameters(i, j);
        self.trace_ray(alpha, beta)
    }

    /// Trace one ray until it is captured, lands on the disk, escapes or
    /// runs out of steps.
    pub fn trace_ray(&self, alpha: f64, beta: f64) -> RayOutcome {
        let mut state = self.initial_state(alpha, beta);
        let mut integrator = GeodesicIntegrator::new(&self.metric, self.base_step * self.rs);
        let horizon = self.rs * HORIZON_TOLERANCE;
        let escape = self.camera.distance * ESCAPE_FACTOR;

        for steps in 0..self.max_steps {
            if state.r < horizon {
                return RayOutcome {
                    fate: RayFate::CapturedByHorizon { radius: state.r },
                    color: Rgb::BLACK,
                    steps,
                };
            }

            if let Some(disk) = &self.disk {
                if (state.theta - FRAC_PI_2).abs() < DISK_PLANE_TOLERANCE && disk.is_on_disk(state.r)
                {
                    return RayOutcome {
                        fate: RayFate::HitDisk {
                            radius: state.r,
                            theta: state.theta,
                            phi: state.phi,
                        },
                        color: disk.observed_intensity(state.r, state.phi),
                        steps,
                    };
                }
            }

            if state.r > escape {
                return RayOutcome {
                    fate: RayFate::EscapedToInfinity {
                        theta: state.theta,
                        phi: state.phi,
                    },
                    color: self.sky(state.theta, state.phi),
                    steps,
                };
            }

            integrator.set_step_size(self.base_step * self.rs * (state.r / self.rs).sqrt());
            state = integrator.step(&state);

            // Keep θ in [0, π]; crossing a pole mirrors the polar velocity.
            if state.theta < 0.0 {
                state.theta = -state.theta;
                state.u_theta = -state.u_theta;
            }
            if state.theta > PI {
                state.theta = TAU - state.theta;
                state.u_theta = -state.u_theta;
            }
        }

        #[cfg(feature = "debug-physics")]
        log::trace!(
            "ray (α={alpha:.3e}, β={beta:.3e}) exhausted at r={:.3} r_s, residual {:.3e}",
            state.r / self.rs,
            self.metric.null_constraint(&state)
        );

        RayOutcome {
            fate: RayFate::IntegrationExhausted { radius: state.r },
            color: Rgb::MAGENTA,
            steps: self.max_steps,
        }
    }

    fn sky(&self, theta: f64, phi: f64) -> Rgb {
        if self.background {
            background(theta, phi)
        } else {
            PLAIN_SKY
        }
    }
}

/// Celestial grid every 15° over a deterministic star field.
pub fn background(theta: f64, phi: f64) -> Rgb {
    let phi = phi.rem_euclid(TAU);
    let latitude = theta - FRAC_PI_2;

    let near_line = |angle: f64| {
        let nearest = (angle / GRID_SPACING).round() * GRID_SPACING;
        (angle - nearest).abs() < GRID_THICKNESS
    };
    if near_line(latitude) || near_line(phi) {
        let hue = phi / TAU;
        return Rgb::new(0.2 + 0.3 * hue, 0.1, 0.4 + 0.2 * (1.0 - hue));
    }

    let seed = theta * 100.0 + phi * 57.0;
    let star = (((seed * 12345.6789).sin() + 1.0) / 2.0).powi(100);
    Rgb::new(0.01 + 0.5 * star, 0.01 + 0.5 * star, 0.03 + 0.5 * star)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::physics::constants::schwarzschild_radius_solar;
    use approx::assert_abs_diff_eq;

    fn tracer(distance_rs: f64, inclination: f64) -> RayTracer {
        let metric = SchwarzschildMetric::new(10.0);
        let rs = metric.schwarzschild_radius();
        let camera = Camera::new(distance_rs * rs, inclination, 0.8, 40, 30);
        RayTracer::new(metric, camera).with_disk(AccretionDisk::new(10.0, 0.1, 0.0))
    }

    #[test]
    fn test_initial_state_is_null() {
        let t = tracer(100.0, 1.2);
        let r0 = t.camera().distance;
        for (a, b) in [(0.0, 0.0), (0.1 * r0, 0.0), (-0.05 * r0, 0.2 * r0)] {
            let s = t.initial_state(a, b);
            assert!(s.u_r < 0.0);
            let residual = t.metric().null_constraint(&s) / (s.u_t * s.u_t);
            assert_abs_diff_eq!(residual, 0.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_central_ray_is_captured_from_any_distance() {
        for distance in [10.0, 100.0, 1000.0] {
            let out = tracer(distance, 1.0).trace_ray(0.0, 0.0);
            assert!(
                matches!(out.fate, RayFate::CapturedByHorizon { .. }),
                "distance {distance}: {:?}",
                out.fate
            );
            assert_eq!(out.color, Rgb::BLACK);
            assert!(out.steps < MAX_INTEGRATION_STEPS);
        }
    }

    #[test]
    fn test_wide_horizontal_offsets_escape_without_touching_the_disk() {
        let t = tracer(100.0, 1.0);
        let r0 = t.camera().distance;
        for alpha in [3.0 * r0, 5.0 * r0, -5.0 * r0] {
            let out = t.trace_ray(alpha, 0.0);
            assert!(
                matches!(out.fate, RayFate::EscapedToInfinity { .. }),
                "alpha {alpha}: {:?}",
                out.fate
            );
        }
    }

    #[test]
    fn test_wide_vertical_offsets_away_from_the_plane_escape() {
        // From θ₀ = 2 a tangential ray needs more polar travel to reach the
        // pole than it has left before r = 2 r₀.
        let t = tracer(100.0, 2.0).with_step(0.05);
        let r0 = t.camera().distance;
        for k in [2.0, 3.0, 5.0] {
            let out = t.trace_ray(0.0, k * r0);
            match out.fate {
                RayFate::EscapedToInfinity { theta, .. } => {
                    assert!((theta - FRAC_PI_2).abs() > 0.5, "k = {k}: θ = {theta}");
                }
                other => panic!("k = {k}: expected escape, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_wide_vertical_offsets_toward_the_plane_meet_the_outer_disk() {
        // The disk reaches 500 r_s, beyond the 2 r₀ escape radius, so a
        // tangential ray tilted toward the equator crosses it near
        // r₀ / sin θ₀ before escaping.
        let t = tracer(100.0, 1.0).with_step(0.05);
        let r0 = t.camera().distance;
        for k in [2.0, 3.0, 4.0] {
            let out = t.trace_ray(0.0, k * r0);
            match out.fate {
                RayFate::HitDisk { radius, .. } => {
                    assert!(radius > r0 && radius < ESCAPE_FACTOR * r0, "k = {k}: r = {radius}");
                }
                other => panic!("k = {k}: expected a disk hit, got {other:?}"),
            }
        }

        // Without the disk the same rays escape.
        let metric = SchwarzschildMetric::new(10.0);
        let camera = *t.camera();
        let bare = RayTracer::new(metric, camera).with_step(0.05);
        assert!(matches!(
            bare.trace_ray(0.0, 3.0 * r0).fate,
            RayFate::EscapedToInfinity { .. }
        ));
    }

    #[test]
    fn test_downward_ray_lands_on_the_disk() {
        // From θ₀ = 1.2 rad a ray tilted 0.2 rad toward the equator crosses
        // the plane at roughly 35 r_s.
        let t = tracer(100.0, 1.2);
        let rs = schwarzschild_radius_solar(10.0);
        let r0 = t.camera().distance;
        let out = t.trace_ray(0.0, 0.2 * r0);
        match out.fate {
            RayFate::HitDisk { radius, theta, .. } => {
                assert!(radius > 15.0 * rs && radius < 60.0 * rs, "r = {} r_s", radius / rs);
                assert!((theta - FRAC_PI_2).abs() < DISK_PLANE_TOLERANCE);
                assert!(out.color.r > 0.0);
            }
            other => panic!("expected a disk hit, got {other:?}"),
        }
    }

    #[test]
    fn test_observer_in_the_disk_plane_sees_the_disk_at_once() {
        let t = tracer(100.0, FRAC_PI_2);
        let out = t.trace_ray(0.0, 0.0);
        assert!(matches!(out.fate, RayFate::HitDisk { .. }));
        assert_eq!(out.steps, 0);
    }

    #[test]
    fn test_exhausted_budget_is_magenta() {
        let t = tracer(100.0, 1.0).with_max_steps(3);
        let out = t.trace_ray(0.0, 0.0);
        assert!(matches!(out.fate, RayFate::IntegrationExhausted { .. }));
        assert_eq!(out.color, Rgb::MAGENTA);
        assert_eq!(out.steps, 3);
    }

    #[test]
    fn test_disk_can_be_disabled() {
        let metric = SchwarzschildMetric::new(10.0);
        let rs = metric.schwarzschild_radius();
        let bare = RayTracer::new(metric, Camera::new(100.0 * rs, FRAC_PI_2, 0.8, 40, 30));
        let out = bare.trace_ray(10.0 * rs, 0.0);
        assert!(matches!(out.fate, RayFate::EscapedToInfinity { .. }));
    }

    #[test]
    fn test_background_is_deterministic() {
        let a = background(1.234, 5.678);
        assert_eq!(a, background(1.234, 5.678));
        let wrapped = background(1.234, 5.678 + TAU);
        assert_abs_diff_eq!(wrapped.r, a.r, epsilon = 1e-6);
        assert_abs_diff_eq!(wrapped.b, a.b, epsilon = 1e-6);
        // On a longitude line.
        let line = background(1.3, GRID_SPACING * 3.0);
        assert_abs_diff_eq!(line.g, 0.1);
        // Dim sky between lines.
        let sky = background(FRAC_PI_2 + 0.13, 0.13);
        assert!(sky.b >= 0.03 && sky.b <= 0.53);
    }
}

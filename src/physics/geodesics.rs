use crate::physics::constants::HORIZON_TOLERANCE;
use crate::physics::Vec4;

// ---------------- Data Types ----------------

/// Right-hand side of the geodesic equation.
///
/// Given a position (t, r, θ, φ) and four-velocity, returns
/// `[u_t, u_r, u_θ, u_φ, d²t, d²r, d²θ, d²φ]`. Implementations must be pure:
/// Runge-Kutta stages call it with perturbed states.
pub trait AccelerationField {
    fn geodesic_acceleration(&self, position: &[f64; 4], velocity: &[f64; 4]) -> [f64; 8];

    /// Radius of the event horizon; zero for fields without one.
    fn horizon_radius(&self) -> f64 {
        0.0
    }
}

impl<F> AccelerationField for F
where
    F: Fn(&[f64; 4], &[f64; 4]) -> [f64; 8],
{
    fn geodesic_acceleration(&self, position: &[f64; 4], velocity: &[f64; 4]) -> [f64; 8] {
        self(position, velocity)
    }
}

/// Position and four-velocity of a photon, as derivatives with respect to
/// the affine parameter.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PhotonState {
    pub t: f64,
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
    pub u_t: f64,
    pub u_r: f64,
    pub u_theta: f64,
    pub u_phi: f64,
}

impl PhotonState {
    pub fn to_array(&self) -> [f64; 8] {
        [
            self.t,
            self.r,
            self.theta,
            self.phi,
            self.u_t,
            self.u_r,
            self.u_theta,
            self.u_phi,
        ]
    }

    pub fn from_array(y: [f64; 8]) -> Self {
        Self {
            t: y[0],
            r: y[1],
            theta: y[2],
            phi: y[3],
            u_t: y[4],
            u_r: y[5],
            u_theta: y[6],
            u_phi: y[7],
        }
    }

    pub fn position(&self) -> [f64; 4] {
        [self.t, self.r, self.theta, self.phi]
    }

    pub fn velocity(&self) -> [f64; 4] {
        [self.u_t, self.u_r, self.u_theta, self.u_phi]
    }

    pub fn velocity_vector(&self) -> Vec4 {
        Vec4::new(self.u_t, self.u_r, self.u_theta, self.u_phi)
    }

    /// Spatial position in Cartesian coordinates (x, y, z).
    pub fn cartesian(&self) -> [f64; 3] {
        let (st, ct) = self.theta.sin_cos();
        let (sp, cp) = self.phi.sin_cos();
        [self.r * st * cp, self.r * st * sp, self.r * ct]
    }

    pub fn is_finite(&self) -> bool {
        self.to_array().iter().all(|v| v.is_finite())
    }
}

/// One sample of an integrated trajectory.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrajectoryPoint {
    pub lambda: f64,
    pub t: f64,
    pub r: f64,
    pub theta: f64,
    pub phi: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl TrajectoryPoint {
    fn sample(lambda: f64, state: &PhotonState) -> Self {
        let [x, y, z] = state.cartesian();
        Self {
            lambda,
            t: state.t,
            r: state.r,
            theta: state.theta,
            phi: state.phi,
            x,
            y,
            z,
        }
    }
}

/// Why [`GeodesicIntegrator::integrate`] stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrajectoryEnd {
    /// Radius dropped below 1.001 horizon radii.
    Horizon,
    /// The affine parameter bound was reached.
    AffineLimit,
    /// The point budget was exhausted.
    PointBudget,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Trajectory {
    pub points: Vec<TrajectoryPoint>,
    pub end: TrajectoryEnd,
}

/// Classical fourth-order Runge-Kutta stepper over the 8-component photon
/// state. The state is not re-projected onto the null cone after a step.
pub struct GeodesicIntegrator<'a, F: AccelerationField + ?Sized> {
    field: &'a F,
    step: f64,
    min_radius: f64,
}

impl<'a, F: AccelerationField + ?Sized> GeodesicIntegrator<'a, F> {
    pub fn new(field: &'a F, step: f64) -> Self {
        Self {
            field,
            step,
            min_radius: field.horizon_radius() * HORIZON_TOLERANCE,
        }
    }

    pub fn step_size(&self) -> f64 {
        self.step
    }

    pub fn set_step_size(&mut self, step: f64) {
        self.step = step;
    }

    #[inline]
    fn derivatives(&self, y: &[f64; 8]) -> [f64; 8] {
        let position = [y[0], y[1], y[2], y[3]];
        let velocity = [y[4], y[5], y[6], y[7]];
        self.field.geodesic_acceleration(&position, &velocity)
    }

    /// Advance one affine-parameter step.
    pub fn step(&self, state: &PhotonState) -> PhotonState {
        let h = self.step;
        let y = state.to_array();
        let offset = |k: &[f64; 8], scale: f64| -> [f64; 8] {
            let mut out = y;
            for i in 0..8 {
                out[i] += scale * k[i];
            }
            out
        };

        let k1 = self.derivatives(&y);
        let k2 = self.derivatives(&offset(&k1, 0.5 * h));
        let k3 = self.derivatives(&offset(&k2, 0.5 * h));
        let k4 = self.derivatives(&offset(&k3, h));

        let mut next = y;
        for i in 0..8 {
            next[i] += h / 6.0 * (k1[i] + 2.0 * k2[i] + 2.0 * k3[i] + k4[i]);
        }
        PhotonState::from_array(next)
    }

    /// Integrate from `initial` until the affine parameter reaches
    /// `max_lambda`, `max_points` samples have been recorded, or the photon
    /// comes within 1.001 horizon radii.
    pub fn integrate(&self, initial: PhotonState, max_lambda: f64, max_points: usize) -> Trajectory {
        let mut points = Vec::with_capacity(max_points.min(4096));
        let mut state = initial;
        let mut lambda = 0.0;

        let end = loop {
            if lambda >= max_lambda {
                break TrajectoryEnd::AffineLimit;
            }
            if points.len() >= max_points {
                break TrajectoryEnd::PointBudget;
            }
            if state.r < self.min_radius {
                break TrajectoryEnd::Horizon;
            }
            points.push(TrajectoryPoint::sample(lambda, &state));
            state = self.step(&state);
            lambda += self.step;
        };

        Trajectory { points, end }
    }

    /// Photon state at (r, θ, φ) with unit conserved energy,
    /// (1 - r_h/r) u_t = 1. The spatial components are taken as given; null
    /// normalization is left to the caller.
    pub fn initial_photon_state(
        &self,
        r: f64,
        theta: f64,
        phi: f64,
        direction_r: f64,
        direction_theta: f64,
        direction_phi: f64,
    ) -> PhotonState {
        let f = 1.0 - self.field.horizon_radius() / r;
        PhotonState {
            t: 0.0,
            r,
            theta,
            phi,
            u_t: 1.0 / f,
            u_r: direction_r,
            u_theta: direction_theta,
            u_phi: direction_phi,
        }
    }
}

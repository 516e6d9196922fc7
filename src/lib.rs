//! Relativistic ray tracer for black holes.
//!
//! Photons are traced backwards from a static observer through
//! Schwarzschild spacetime with a fourth-order Runge-Kutta integrator and
//! land on a Shakura-Sunyaev accretion disk, fall through the horizon, or
//! escape to a procedural sky.

pub mod color;
pub mod data;
pub mod physics;
pub mod rendering;
pub mod simulation;

pub use color::Rgb;
pub use simulation::{SimulationConfig, Simulator};

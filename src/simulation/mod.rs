//! Simulation module: scene configuration, orchestration and reporting
//!
//! This module ties the physics and rendering layers together. It turns a
//! [`SimulationConfig`] into a ready-to-run tracer, times renders, names
//! and writes output files, and produces the physical analysis report.

pub mod analysis;
pub mod config;
pub mod simulator;

// Re-export commonly used items
pub use analysis::PhysicalAnalysis;
pub use config::{BlackHoleType, ConfigError, SimulationConfig};
pub use simulator::Simulator;

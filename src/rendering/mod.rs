//! Rendering module for the ray-traced black hole image
//!
//! This module turns camera pixels into photon initial states, follows each
//! photon through curved spacetime and composites the resulting image on a
//! pool of worker threads.

pub mod camera;
pub mod ray_tracer;
pub mod renderer;

// Re-export commonly used items
pub use camera::Camera;
pub use ray_tracer::{background, RayFate, RayOutcome, RayTracer};
pub use renderer::{row_blocks, Image, RenderProgress, RenderStats, Renderer};

/// Rendering error types
#[derive(Debug, thiserror::Error)]
pub enum RenderError {
    #[error("thread pool error: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error("image has no pixels ({width}x{height})")]
    EmptyImage { width: u32, height: u32 },
}

pub type RenderResult<T> = Result<T, RenderError>;

/// Static observer at (r₀, θ₀, φ = 0) looking at the hole.
///
/// Distances are in meters, angles in radians.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    pub distance: f64,
    pub inclination: f64,
    pub fov_horizontal: f64,
    pub fov_vertical: f64,
    pub width: u32,
    pub height: u32,
}

impl Camera {
    /// Horizontal field of view `fov`; the vertical one follows the aspect ratio.
    pub fn new(distance: f64, inclination: f64, fov: f64, width: u32, height: u32) -> Self {
        let fov_vertical = if width > 0 {
            fov * height as f64 / width as f64
        } else {
            fov
        };
        Self {
            distance,
            inclination,
            fov_horizontal: fov,
            fov_vertical,
            width,
            height,
        }
    }

    /// Impact parameters (α, β) in meters for pixel (i, j), measured from
    /// the image center.
    #[inline]
    pub fn impact_parameters(&self, i: u32, j: u32) -> (f64, f64) {
        let w = self.width as f64;
        let h = self.height as f64;
        let alpha = (i as f64 - w / 2.0) / w * self.fov_horizontal * self.distance;
        let beta = (j as f64 - h / 2.0) / h * self.fov_vertical * self.distance;
        (alpha, beta)
    }

    #[inline]
    pub fn pixel_count(&self) -> usize {
        self.width as usize * self.height as usize
    }

    #[inline]
    pub fn aspect(&self) -> f64 {
        self.width as f64 / self.height.max(1) as f64
    }
}

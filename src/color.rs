use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul};

/// Linear RGB triple. Channels are nominally in [0, 1]; intermediate
/// results (beamed disk light) may exceed that until clamped.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Rgb {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Rgb {
    pub const BLACK: Rgb = Rgb::new(0.0, 0.0, 0.0);
    /// Marks rays that ran out of integration steps.
    pub const MAGENTA: Rgb = Rgb::new(1.0, 0.0, 1.0);

    pub const fn new(r: f64, g: f64, b: f64) -> Self {
        Self { r, g, b }
    }

    pub const fn gray(v: f64) -> Self {
        Self { r: v, g: v, b: v }
    }

    pub fn clamped(self) -> Self {
        Self {
            r: self.r.clamp(0.0, 1.0),
            g: self.g.clamp(0.0, 1.0),
            b: self.b.clamp(0.0, 1.0),
        }
    }

    /// Clamp to [0, 1] and scale to 0..=255, truncating.
    pub fn to_bytes(self) -> [u8; 3] {
        let c = self.clamped();
        [
            (c.r * 255.0) as u8,
            (c.g * 255.0) as u8,
            (c.b * 255.0) as u8,
        ]
    }

    pub fn from_bytes(bytes: [u8; 3]) -> Self {
        Self {
            r: bytes[0] as f64 / 255.0,
            g: bytes[1] as f64 / 255.0,
            b: bytes[2] as f64 / 255.0,
        }
    }

    pub fn is_finite(&self) -> bool {
        self.r.is_finite() && self.g.is_finite() && self.b.is_finite()
    }
}

impl Add for Rgb {
    type Output = Rgb;
    fn add(self, o: Rgb) -> Rgb {
        Rgb::new(self.r + o.r, self.g + o.g, self.b + o.b)
    }
}

impl Mul<f64> for Rgb {
    type Output = Rgb;
    fn mul(self, s: f64) -> Rgb {
        Rgb::new(self.r * s, self.g * s, self.b * s)
    }
}

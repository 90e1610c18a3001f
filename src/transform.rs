//! Spherical pendulum state to drawing-surface coordinates.
//!
//! The pendulum hangs from a pivot above the middle of the canvas. Looking
//! straight down, the tip sits `L·sin(φ)` away from the center, in the
//! direction given by the azimuth `ω`.

use glam::DVec2;
use serde::{Deserialize, Serialize};

/// Default canvas width in pixels.
pub const CANVAS_WIDTH: f64 = 1920.0;
/// Default canvas height in pixels.
pub const CANVAS_HEIGHT: f64 = 1920.0;
/// Default string length, in canvas pixels.
pub const STRING_LENGTH: f64 = 20000.0;

/// Size of the drawing surface and length of the pendulum string.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasGeometry {
    /// Canvas width in pixels.
    pub width: f64,
    /// Canvas height in pixels.
    pub height: f64,
    /// Distance from pivot to tip.
    pub string_length: f64,
}

impl Default for CanvasGeometry {
    fn default() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            string_length: STRING_LENGTH,
        }
    }
}

/// Whole-pixel size of a `width × height` area, at least one pixel each way.
pub fn pixel_extent(width: f64, height: f64) -> (u32, u32) {
    let to_pixels = |v: f64| v.round().max(1.0) as u32;
    (to_pixels(width), to_pixels(height))
}

impl CanvasGeometry {
    /// Canvas size in whole pixels, rounded the same way surfaces round
    /// `clear` extents.
    #[inline]
    pub fn pixel_size(&self) -> (u32, u32) {
        pixel_extent(self.width, self.height)
    }

    /// Midpoint of the canvas, directly below the pivot.
    #[inline]
    pub fn center(&self) -> DVec2 {
        DVec2::new(self.width / 2.0, self.height / 2.0)
    }

    /// Horizontal distance of the tip from the point below the pivot.
    #[inline]
    pub fn planar_radius(&self, phi: f64) -> f64 {
        self.string_length * phi.sin()
    }

    /// Project deflection `phi` and azimuth `omega` onto the canvas.
    pub fn to_cartesian(&self, phi: f64, omega: f64) -> DVec2 {
        let r = self.planar_radius(phi);
        DVec2::new(r * omega.cos(), r * omega.sin()) + self.center()
    }
}

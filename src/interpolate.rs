//! Cubic densification of sampled points.
//!
//! Four consecutive samples `P0..P3` are taken as the values of a cubic
//! `P(t) = c3·t³ + c2·t² + c1·t + c0` at `t = 0, 1, 2, 3`. The cubic is then
//! evaluated at `t = i/D` for `1 <= i < 2.5·D`, where `D` is the interpolation
//! density. `t = 0` is left out, and so is everything past `t ≈ 2.5`, because
//! the following frame starts from the last sample and redraws that stretch.

use crate::error::SimulationError;
use crate::vector::Vector;

/// Number of raw samples fed to one cubic fit.
pub const INTERPOLATION_POINTS: usize = 4;

/// Line segments drawn per unit of `t` unless configured otherwise.
pub const DEFAULT_INTERPOLATION_DENSITY: usize = 5;

/// Upper bound (exclusive) of the sampled parameter range.
const SAMPLE_EXTENT: f64 = 2.5;

/// Cubic through four equally spaced samples.
#[derive(Debug, Clone)]
pub struct CubicFit {
    c0: Vector,
    c1: Vector,
    c2: Vector,
    c3: Vector,
}

impl CubicFit {
    /// Fit the cubic through `points`, which must hold exactly four vectors of
    /// equal length.
    pub fn through(points: &[Vector]) -> Result<Self, SimulationError> {
        let [p0, p1, p2, p3] = points else {
            return Err(SimulationError::InvalidInterpolationInput {
                points: points.len(),
            });
        };

        let c0 = p0.clone();
        let c1 = Vector::sum(&[
            (-11.0 / 6.0, p0),
            (3.0, p1),
            (-3.0 / 2.0, p2),
            (1.0 / 3.0, p3),
        ])?;
        let c2 = Vector::sum(&[(1.0, p0), (-5.0 / 2.0, p1), (2.0, p2), (-1.0 / 2.0, p3)])?;
        let c3 = Vector::sum(&[
            (-1.0 / 6.0, p0),
            (1.0 / 2.0, p1),
            (-1.0 / 2.0, p2),
            (1.0 / 6.0, p3),
        ])?;

        Ok(Self { c0, c1, c2, c3 })
    }

    /// Value of the cubic at parameter `t`.
    pub fn evaluate(&self, t: f64) -> Vector {
        let (t2, t3) = (t * t, t * t * t);
        // All coefficients share the length of the first control point.
        Vector::new(
            (0..self.c0.len())
                .map(|k| self.c0[k] + self.c1[k] * t + self.c2[k] * t2 + self.c3[k] * t3)
                .collect(),
        )
    }

    /// Samples at `t = i/density` for `1 <= i < 2.5·density`.
    pub fn samples(&self, density: usize) -> Vec<Vector> {
        let d = density as f64;
        (1..)
            .take_while(|&i| (i as f64) < SAMPLE_EXTENT * d)
            .map(|i| self.evaluate(i as f64 / d))
            .collect()
    }
}

/// Fit a cubic through `points` and sample it at the given density.
pub fn interpolate(points: &[Vector], density: usize) -> Result<Vec<Vector>, SimulationError> {
    Ok(CubicFit::through(points)?.samples(density))
}

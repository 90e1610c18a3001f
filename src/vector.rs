//! Fixed-length numeric tuples.
//!
//! [`Vector`] is the value type the interpolator works on. It never mutates
//! its operands: every operation returns a fresh vector, and equality is only
//! available through the explicit [`Vector::approx_eq`].
//!
//! # Example
//!
//! ```
//! use pendulograph::Vector;
//!
//! let a = Vector::new(vec![1.0, 2.0]);
//! let b = Vector::new(vec![3.0, 4.0]);
//! let sum = a.add(&b).unwrap();
//! assert_eq!(sum.components(), &[4.0, 6.0]);
//!
//! let scaled = &sum * 0.5;
//! assert_eq!(scaled.components(), &[2.0, 3.0]);
//! ```

use std::ops::{Index, Mul};

use glam::DVec2;

use crate::error::SimulationError;

/// A numeric tuple of arbitrary (but fixed) length.
#[derive(Debug, Clone)]
pub struct Vector {
    components: Box<[f64]>,
}

impl Vector {
    /// Create a vector owning `components`.
    pub fn new(components: Vec<f64>) -> Self {
        Self {
            components: components.into_boxed_slice(),
        }
    }

    /// Create a vector by copying `components`.
    pub fn from_slice(components: &[f64]) -> Self {
        Self {
            components: components.into(),
        }
    }

    /// Number of components.
    #[inline]
    pub fn len(&self) -> usize {
        self.components.len()
    }

    /// Whether the vector has no components.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.components.is_empty()
    }

    /// The components in order.
    #[inline]
    pub fn components(&self) -> &[f64] {
        &self.components
    }

    /// Component-wise sum.
    ///
    /// Fails with [`SimulationError::DimensionMismatch`] if the lengths differ.
    pub fn add(&self, other: &Vector) -> Result<Vector, SimulationError> {
        if self.len() != other.len() {
            return Err(SimulationError::DimensionMismatch {
                left: self.len(),
                right: other.len(),
            });
        }

        Ok(Vector {
            components: self
                .components
                .iter()
                .zip(other.components.iter())
                .map(|(a, b)| a + b)
                .collect(),
        })
    }

    /// Component-wise product with `scalar`.
    pub fn scale(&self, scalar: f64) -> Vector {
        Vector {
            components: self.components.iter().map(|c| c * scalar).collect(),
        }
    }

    /// Linear combination `Σ kᵢ·vᵢ` of the given terms.
    ///
    /// Every term must have the same length as the first one.
    pub fn sum(terms: &[(f64, &Vector)]) -> Result<Vector, SimulationError> {
        let Some(((k0, v0), rest)) = terms.split_first() else {
            return Ok(Vector::new(Vec::new()));
        };

        rest.iter()
            .try_fold(v0.scale(*k0), |acc, (k, v)| acc.add(&v.scale(*k)))
    }

    /// Whether every component lies within `tolerance` of `other`'s.
    ///
    /// Vectors of different length are never equal.
    pub fn approx_eq(&self, other: &Vector, tolerance: f64) -> bool {
        self.len() == other.len()
            && self
                .components
                .iter()
                .zip(other.components.iter())
                .all(|(a, b)| (a - b).abs() <= tolerance)
    }

    /// View a two-component vector as a point on the drawing surface.
    pub fn to_dvec2(&self) -> Result<DVec2, SimulationError> {
        match self.components() {
            &[x, y] => Ok(DVec2::new(x, y)),
            _ => Err(SimulationError::DimensionMismatch {
                left: self.len(),
                right: 2,
            }),
        }
    }
}

impl Index<usize> for Vector {
    type Output = f64;

    fn index(&self, index: usize) -> &f64 {
        &self.components[index]
    }
}

impl Mul<f64> for &Vector {
    type Output = Vector;

    fn mul(self, scalar: f64) -> Vector {
        self.scale(scalar)
    }
}

impl From<DVec2> for Vector {
    fn from(point: DVec2) -> Self {
        Vector::new(vec![point.x, point.y])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::Rng;

    const EPS: f64 = 1e-9;

    fn random_vector(rng: &mut impl Rng, len: usize) -> Vector {
        Vector::new((0..len).map(|_| rng.gen_range(-1e3..1e3)).collect())
    }

    #[test]
    fn test_add_is_componentwise() {
        let a = Vector::new(vec![1.0, -2.0, 3.5]);
        let b = Vector::new(vec![0.5, 2.0, -1.5]);
        let sum = a.add(&b).unwrap();
        assert_eq!(sum.components(), &[1.5, 0.0, 2.0]);

        // Operands untouched
        assert_eq!(a.components(), &[1.0, -2.0, 3.5]);
        assert_eq!(b.components(), &[0.5, 2.0, -1.5]);
    }

    #[test]
    fn test_add_dimension_mismatch() {
        let a = Vector::new(vec![1.0, 2.0]);
        let b = Vector::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(
            a.add(&b).unwrap_err(),
            SimulationError::DimensionMismatch { left: 2, right: 3 }
        );
        assert_eq!(
            b.add(&a).unwrap_err(),
            SimulationError::DimensionMismatch { left: 3, right: 2 }
        );
    }

    #[test]
    fn test_add_commutative_and_associative() {
        let mut rng = rand::thread_rng();
        for len in 1..6 {
            let a = random_vector(&mut rng, len);
            let b = random_vector(&mut rng, len);
            let c = random_vector(&mut rng, len);

            let ab = a.add(&b).unwrap();
            let ba = b.add(&a).unwrap();
            assert!(ab.approx_eq(&ba, EPS));

            let ab_c = ab.add(&c).unwrap();
            let a_bc = a.add(&b.add(&c).unwrap()).unwrap();
            assert!(ab_c.approx_eq(&a_bc, 1e-9));
        }
    }

    #[test]
    fn test_scale_distributes_over_add() {
        let mut rng = rand::thread_rng();
        for _ in 0..50 {
            let a = random_vector(&mut rng, 2);
            let b = random_vector(&mut rng, 2);
            let k: f64 = rng.gen_range(-10.0..10.0);

            let lhs = a.add(&b).unwrap().scale(k);
            let rhs = a.scale(k).add(&b.scale(k)).unwrap();
            assert!(lhs.approx_eq(&rhs, 1e-8));
        }
    }

    #[test]
    fn test_mul_operator_matches_scale() {
        let v = Vector::new(vec![2.0, -4.0]);
        assert!((&v * 0.25).approx_eq(&v.scale(0.25), 0.0));
    }

    #[test]
    fn test_sum_linear_combination() {
        let p = Vector::new(vec![1.0, 0.0]);
        let q = Vector::new(vec![0.0, 1.0]);
        let combo = Vector::sum(&[(2.0, &p), (-3.0, &q), (1.0, &p)]).unwrap();
        assert_eq!(combo.components(), &[3.0, -3.0]);
    }

    #[test]
    fn test_sum_rejects_mismatched_terms() {
        let p = Vector::new(vec![1.0, 0.0]);
        let q = Vector::new(vec![0.0]);
        assert!(matches!(
            Vector::sum(&[(1.0, &p), (1.0, &q)]),
            Err(SimulationError::DimensionMismatch { left: 2, right: 1 })
        ));
    }

    #[test]
    fn test_approx_eq_requires_equal_length() {
        let a = Vector::new(vec![1.0]);
        let b = Vector::new(vec![1.0, 0.0]);
        assert!(!a.approx_eq(&b, 1.0));
    }

    #[test]
    fn test_dvec2_bridge() {
        let v = Vector::from(DVec2::new(3.0, 4.0));
        assert_eq!(v.to_dvec2().unwrap(), DVec2::new(3.0, 4.0));
        assert_eq!(v[1], 4.0);

        let three = Vector::new(vec![1.0, 2.0, 3.0]);
        assert!(three.to_dvec2().is_err());
    }
}

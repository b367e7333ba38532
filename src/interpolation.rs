use std::collections::HashSet;

use num_bigint::BigInt;
use num_traits::{One, Zero};
use tracing::{debug, instrument};

use crate::error::{LagrangeError, Result};
use crate::polynomial::Polynomial;
use crate::rational::BigRational;

/// A decoded share: one sample `(x, y)` of the hidden polynomial.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Point {
    pub x: BigInt,
    pub y: BigInt,
}

impl Point {
    pub fn new(x: impl Into<BigInt>, y: impl Into<BigInt>) -> Self {
        Point {
            x: x.into(),
            y: y.into(),
        }
    }
}

/// Lagrange interpolation over exact rationals for a fixed threshold.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Interpolator {
    threshold: usize,
}

impl Interpolator {
    pub fn new(threshold: usize) -> Result<Self> {
        if threshold == 0 {
            return Err(LagrangeError::InvalidThreshold {
                threshold,
                share_count: 0,
            });
        }
        Ok(Interpolator { threshold })
    }

    pub fn threshold(&self) -> usize {
        self.threshold
    }

    /// Reconstructs the full polynomial of degree at most `threshold - 1`
    /// from the first `threshold` points.
    #[instrument(skip_all, fields(threshold = self.threshold))]
    pub fn interpolate(&self, points: &[Point]) -> Result<Polynomial> {
        let points = self.select(points)?;
        let mut result = Polynomial::zero();

        for (i, pi) in points.iter().enumerate() {
            let mut basis = Polynomial::constant(BigRational::one());
            let mut denom = BigInt::one();

            for (j, pj) in points.iter().enumerate() {
                if i == j {
                    continue;
                }
                basis = basis.multiply_by_linear(&pj.x);
                denom *= &pi.x - &pj.x;
            }

            let scale = BigRational::new(pi.y.clone(), denom)?;
            debug!(x = %pi.x, %scale, "accumulating basis polynomial");
            result = result.add(&basis.scale(&scale));
        }

        Ok(result.trimmed())
    }

    /// Evaluates the interpolated polynomial at `at` without building its
    /// coefficients.
    #[instrument(skip_all, fields(threshold = self.threshold, at = %at))]
    pub fn evaluate_at(&self, points: &[Point], at: &BigInt) -> Result<BigRational> {
        let points = self.select(points)?;
        let mut acc = BigRational::zero();

        for (i, pi) in points.iter().enumerate() {
            let mut num = pi.y.clone();
            let mut den = BigInt::one();

            for (j, pj) in points.iter().enumerate() {
                if i != j {
                    num *= at - &pj.x;
                    den *= &pi.x - &pj.x;
                }
            }

            acc = acc + BigRational::new(num, den)?;
        }

        Ok(acc)
    }

    /// The secret, i.e. the polynomial's value at `x = 0`.
    pub fn secret(&self, points: &[Point]) -> Result<BigRational> {
        self.evaluate_at(points, &BigInt::zero())
    }

    /// Takes the first `threshold` points and checks their x-coordinates are
    /// pairwise distinct.
    fn select<'a>(&self, points: &'a [Point]) -> Result<&'a [Point]> {
        if points.len() < self.threshold {
            return Err(LagrangeError::InsufficientShares {
                required: self.threshold,
                provided: points.len(),
            });
        }
        let selected = &points[..self.threshold];

        let mut seen = HashSet::with_capacity(selected.len());
        for p in selected {
            if !seen.insert(&p.x) {
                return Err(LagrangeError::DuplicateAbscissa(p.x.clone()));
            }
        }
        Ok(selected)
    }
}

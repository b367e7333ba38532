use num_bigint::BigInt;

use crate::rational::BigRational;

/// Polynomial over exact rationals, coefficients in ascending degree.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Polynomial {
    coefficients: Vec<BigRational>,
}

impl Polynomial {
    /// Builds a polynomial from ascending-degree coefficients. An empty list is
    /// the zero polynomial.
    pub fn from_coefficients(coefficients: Vec<BigRational>) -> Self {
        if coefficients.is_empty() {
            return Self::zero();
        }
        Polynomial { coefficients }
    }

    pub fn zero() -> Self {
        Self::constant(BigRational::zero())
    }

    pub fn constant(c: BigRational) -> Self {
        Polynomial {
            coefficients: vec![c],
        }
    }

    pub fn coefficients(&self) -> &[BigRational] {
        &self.coefficients
    }

    /// Degree of the stored representation, i.e. `len - 1`. Equals the true
    /// degree once the polynomial is trimmed.
    pub fn degree(&self) -> usize {
        self.coefficients.len() - 1
    }

    /// Canonical coefficient strings from highest to lowest degree.
    pub fn coefficients_high_to_low(&self) -> Vec<String> {
        self.coefficients.iter().rev().map(|c| c.to_string()).collect()
    }

    /// Returns `self * (x - root)`.
    pub fn multiply_by_linear(&self, root: &BigInt) -> Polynomial {
        let neg_root = BigRational::from_integer(-root);
        let mut out = vec![BigRational::zero(); self.coefficients.len() + 1];
        for (i, c) in self.coefficients.iter().enumerate() {
            out[i] = &out[i] + &(c * &neg_root);
            out[i + 1] = &out[i + 1] + c;
        }
        Polynomial { coefficients: out }
    }

    /// Pointwise sum; missing positions count as zero.
    pub fn add(&self, other: &Polynomial) -> Polynomial {
        let (long, short) = if self.coefficients.len() >= other.coefficients.len() {
            (&self.coefficients, &other.coefficients)
        } else {
            (&other.coefficients, &self.coefficients)
        };
        let coefficients = long
            .iter()
            .enumerate()
            .map(|(i, c)| match short.get(i) {
                Some(d) => c + d,
                None => c.clone(),
            })
            .collect();
        Polynomial { coefficients }
    }

    pub fn scale(&self, s: &BigRational) -> Polynomial {
        Polynomial {
            coefficients: self.coefficients.iter().map(|c| c * s).collect(),
        }
    }

    /// Drops zero leading coefficients, keeping at least one.
    pub fn trimmed(mut self) -> Polynomial {
        while self.coefficients.len() > 1
            && self.coefficients.last().is_some_and(BigRational::is_zero)
        {
            self.coefficients.pop();
        }
        self
    }

    /// Evaluates at `x` by Horner's rule.
    pub fn evaluate(&self, x: &BigRational) -> BigRational {
        self.coefficients
            .iter()
            .rev()
            .fold(BigRational::zero(), |acc, c| &(&acc * x) + c)
    }
}

use num_bigint::{BigInt, RandBigInt};
use num_traits::Zero;
use rand::Rng;

use crate::error::{LagrangeError, Result};
use crate::interpolation::Point;
use crate::share::{Share, ShareSet};

/// Dealer side of the scheme: a random integer polynomial whose constant term
/// is the secret, evaluated at `x = 1..=num_parties`.
pub struct SSS {
    polynomial: Vec<BigInt>,
    shares: Vec<(u64, BigInt)>,
}

impl SSS {
    pub fn create<R: Rng + ?Sized>(
        secret: &BigInt,
        threshold: usize,
        num_parties: usize,
        coefficient_bits: u64,
        rng: &mut R,
    ) -> Result<Self> {
        if threshold == 0 || threshold > num_parties {
            return Err(LagrangeError::InvalidThreshold {
                threshold,
                share_count: num_parties,
            });
        }

        let mut polynomial = vec![secret.clone()];
        for _ in 1..threshold {
            polynomial.push(rng.gen_bigint(coefficient_bits));
        }

        let shares = (1..=num_parties as u64)
            .map(|i| (i, Self::eval_polynomial(&polynomial, &BigInt::from(i))))
            .collect::<Vec<_>>();

        Ok(Self { polynomial, shares })
    }

    /// Coefficients in ascending degree; the first is the secret.
    pub fn polynomial(&self) -> &[BigInt] {
        &self.polynomial
    }

    pub fn points(&self) -> Vec<Point> {
        self.shares
            .iter()
            .map(|(x, y)| Point::new(*x, y.clone()))
            .collect()
    }

    /// Encodes every share in `base` as a share set with `k = threshold`.
    pub fn to_share_set(&self, base: u32) -> Result<ShareSet> {
        let mut set = ShareSet::new(self.shares.len(), self.polynomial.len());
        for (index, y) in &self.shares {
            set.insert(&Share::encode(*index, base, y)?);
        }
        Ok(set)
    }

    fn eval_polynomial(polynomial: &[BigInt], x: &BigInt) -> BigInt {
        polynomial
            .iter()
            .rev()
            .fold(BigInt::zero(), |acc, c| acc * x + c)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, SeedableRng};

    #[test]
    fn test_shares_lie_on_polynomial() {
        let mut rng = StdRng::seed_from_u64(5);
        let secret = BigInt::from(1234567);
        let sss = SSS::create(&secret, 3, 5, 32, &mut rng).unwrap();

        assert_eq!(sss.polynomial().len(), 3);
        assert_eq!(sss.polynomial()[0], secret);

        let points = sss.points();
        assert_eq!(points.len(), 5);
        for p in &points {
            let expected = SSS::eval_polynomial(sss.polynomial(), &p.x);
            assert_eq!(p.y, expected);
        }
    }

    #[test]
    fn test_eval_polynomial() {
        // x^2 + 3
        let poly = [BigInt::from(3), BigInt::zero(), BigInt::from(1)];
        assert_eq!(SSS::eval_polynomial(&poly, &BigInt::from(6)), BigInt::from(39));
    }

    #[test]
    fn test_share_set_header() {
        let mut rng = StdRng::seed_from_u64(6);
        let sss = SSS::create(&BigInt::from(9), 2, 4, 16, &mut rng).unwrap();
        let set = sss.to_share_set(36).unwrap();
        assert_eq!(set.share_count(), 4);
        assert_eq!(set.threshold(), 2);
        assert_eq!(set.present_indices(), vec![1, 2, 3, 4]);
        assert_eq!(set.share(1).unwrap().unwrap().base, 36);
    }

    #[test]
    fn test_invalid_threshold() {
        let mut rng = StdRng::seed_from_u64(7);
        for (t, n) in [(0, 3), (4, 3)] {
            assert!(matches!(
                SSS::create(&BigInt::from(1), t, n, 8, &mut rng),
                Err(LagrangeError::InvalidThreshold { .. })
            ));
        }
    }
}

use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};
use std::str::FromStr;

use num_bigint::BigInt;
use num_integer::Integer;
use num_traits::{One, Signed, Zero};
use serde::{Serialize, Serializer};

use crate::error::{LagrangeError, Result};

/// Exact fraction over arbitrary-precision integers.
///
/// Always stored in lowest terms with a positive denominator, so two equal
/// values have equal representations and the derived `PartialEq` is exact.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct BigRational {
    numer: BigInt,
    denom: BigInt,
}

impl BigRational {
    pub fn new(numer: BigInt, denom: BigInt) -> Result<Self> {
        if denom.is_zero() {
            return Err(LagrangeError::DivisionByZero);
        }
        Ok(Self::reduced(numer, denom))
    }

    pub fn from_integer(n: BigInt) -> Self {
        BigRational {
            numer: n,
            denom: BigInt::one(),
        }
    }

    pub fn zero() -> Self {
        Self::from_integer(BigInt::zero())
    }

    pub fn one() -> Self {
        Self::from_integer(BigInt::one())
    }

    // denom must be non-zero
    fn reduced(mut numer: BigInt, mut denom: BigInt) -> Self {
        if denom.is_negative() {
            numer = -numer;
            denom = -denom;
        }
        // gcd(0, d) == d, so zero collapses to 0/1
        let g = numer.gcd(&denom);
        if !g.is_one() {
            numer /= &g;
            denom /= &g;
        }
        BigRational { numer, denom }
    }

    pub fn numer(&self) -> &BigInt {
        &self.numer
    }

    pub fn denom(&self) -> &BigInt {
        &self.denom
    }

    pub fn is_zero(&self) -> bool {
        self.numer.is_zero()
    }

    pub fn is_integer(&self) -> bool {
        self.denom.is_one()
    }

    /// Divides by `other`, failing when `other` is zero.
    pub fn checked_div(&self, other: &BigRational) -> Result<BigRational> {
        if other.is_zero() {
            return Err(LagrangeError::DivisionByZero);
        }
        Ok(Self::reduced(
            &self.numer * &other.denom,
            &self.denom * &other.numer,
        ))
    }
}

impl From<BigInt> for BigRational {
    fn from(n: BigInt) -> Self {
        BigRational::from_integer(n)
    }
}

impl<'a> Add<&'a BigRational> for &'a BigRational {
    type Output = BigRational;

    fn add(self, other: &'a BigRational) -> BigRational {
        BigRational::reduced(
            &self.numer * &other.denom + &other.numer * &self.denom,
            &self.denom * &other.denom,
        )
    }
}

impl<'a> Sub<&'a BigRational> for &'a BigRational {
    type Output = BigRational;

    fn sub(self, other: &'a BigRational) -> BigRational {
        BigRational::reduced(
            &self.numer * &other.denom - &other.numer * &self.denom,
            &self.denom * &other.denom,
        )
    }
}

impl<'a> Mul<&'a BigRational> for &'a BigRational {
    type Output = BigRational;

    fn mul(self, other: &'a BigRational) -> BigRational {
        BigRational::reduced(&self.numer * &other.numer, &self.denom * &other.denom)
    }
}

macro_rules! forward_owned_binop {
    ($imp:ident, $method:ident) => {
        impl $imp<BigRational> for BigRational {
            type Output = BigRational;

            fn $method(self, other: BigRational) -> BigRational {
                $imp::$method(&self, &other)
            }
        }

        impl<'a> $imp<&'a BigRational> for BigRational {
            type Output = BigRational;

            fn $method(self, other: &'a BigRational) -> BigRational {
                $imp::$method(&self, other)
            }
        }

        impl<'a> $imp<BigRational> for &'a BigRational {
            type Output = BigRational;

            fn $method(self, other: BigRational) -> BigRational {
                $imp::$method(self, &other)
            }
        }
    };
}

forward_owned_binop!(Add, add);
forward_owned_binop!(Sub, sub);
forward_owned_binop!(Mul, mul);

impl Neg for &BigRational {
    type Output = BigRational;

    fn neg(self) -> BigRational {
        BigRational {
            numer: -&self.numer,
            denom: self.denom.clone(),
        }
    }
}

impl Neg for BigRational {
    type Output = BigRational;

    fn neg(self) -> BigRational {
        BigRational {
            numer: -self.numer,
            denom: self.denom,
        }
    }
}

impl fmt::Display for BigRational {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.denom.is_one() {
            write!(f, "{}", self.numer)
        } else {
            write!(f, "{}/{}", self.numer, self.denom)
        }
    }
}

impl FromStr for BigRational {
    type Err = LagrangeError;

    /// Parses `"<n>"` or `"<n>/<d>"`; unreduced input is reduced.
    fn from_str(s: &str) -> Result<Self> {
        let invalid = || LagrangeError::InvalidRational(s.to_string());
        match s.split_once('/') {
            Some((n, d)) => {
                let numer = BigInt::from_str(n).map_err(|_| invalid())?;
                let denom = BigInt::from_str(d).map_err(|_| invalid())?;
                BigRational::new(numer, denom)
            }
            None => BigInt::from_str(s)
                .map(BigRational::from_integer)
                .map_err(|_| invalid()),
        }
    }
}

impl Serialize for BigRational {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

use tracing::{info, warn};

use crate::error::Result;
use crate::interpolation::Interpolator;
use crate::polynomial::Polynomial;
use crate::rational::BigRational;
use crate::share::ShareSet;

/// What to reconstruct from a share set.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Mode {
    /// Every coefficient of the interpolated polynomial.
    Polynomial,
    /// Only the value at `x = 0`.
    Secret,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Recovery {
    Polynomial(Polynomial),
    Secret(BigRational),
}

/// Selects the first `k` shares of `set` and interpolates them.
pub fn recover(set: &ShareSet, mode: Mode) -> Result<Recovery> {
    let interpolator = Interpolator::new(set.threshold())?;
    let points = set.select()?;

    let recovery = match mode {
        Mode::Polynomial => {
            let poly = interpolator.interpolate(&points)?;
            info!(degree = poly.degree(), "reconstructed polynomial");
            Recovery::Polynomial(poly)
        }
        Mode::Secret => {
            let secret = interpolator.secret(&points)?;
            info!("reconstructed secret");
            Recovery::Secret(secret)
        }
    };
    Ok(recovery)
}

/// Recovers every input independently. A failed input, including one that
/// could not be read or parsed, yields an `Err` in its own slot only.
pub fn recover_batch<I>(inputs: I, mode: Mode) -> Vec<Result<Recovery>>
where
    I: IntoIterator<Item = Result<ShareSet>>,
{
    inputs
        .into_iter()
        .enumerate()
        .map(|(position, input)| {
            let outcome = input.and_then(|set| recover(&set, mode));
            if let Err(e) = &outcome {
                warn!(position, error = %e, "share set could not be recovered");
            }
            outcome
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::LagrangeError;
    use crate::share::SAMPLE_SHARE_SET;

    #[test]
    fn test_recover_sample_both_modes() {
        let set = ShareSet::from_json(SAMPLE_SHARE_SET).unwrap();

        match recover(&set, Mode::Polynomial).unwrap() {
            Recovery::Polynomial(poly) => {
                assert_eq!(poly.degree(), 2);
                assert_eq!(poly.coefficients_high_to_low(), vec!["1", "0", "3"]);
            }
            other => panic!("unexpected recovery: {other:?}"),
        }
        assert_eq!(
            recover(&set, Mode::Secret).unwrap(),
            Recovery::Secret(BigRational::from_integer(3.into()))
        );
    }

    #[test]
    fn test_recover_rejects_zero_threshold() {
        let set = ShareSet::from_json(r#"{ "keys": { "n": 2, "k": 0 } }"#).unwrap();
        assert!(matches!(
            recover(&set, Mode::Secret),
            Err(LagrangeError::InvalidThreshold { .. })
        ));
    }

    #[test]
    fn test_batch_isolates_failures() {
        let inputs = vec![
            ShareSet::from_json(SAMPLE_SHARE_SET),
            ShareSet::from_json("{ broken"),
            ShareSet::from_json(
                r#"{ "keys": { "n": 3, "k": 3 },
                     "1": { "base": "10", "value": "1" },
                     "2": { "base": "10", "value": "2" } }"#,
            ),
            ShareSet::from_json(
                r#"{ "keys": { "n": 2, "k": 2 },
                     "1": { "base": "10", "value": "5" },
                     "2": { "base": "10", "value": "9" } }"#,
            ),
        ];

        let results = recover_batch(inputs, Mode::Secret);
        assert_eq!(results.len(), 4);
        assert_eq!(
            results[0].as_ref().unwrap(),
            &Recovery::Secret(BigRational::from_integer(3.into()))
        );
        assert!(matches!(results[1], Err(LagrangeError::MalformedInput(_))));
        assert!(matches!(
            results[2],
            Err(LagrangeError::InsufficientShares {
                required: 3,
                provided: 2
            })
        ));
        // 4x + 1
        assert_eq!(
            results[3].as_ref().unwrap(),
            &Recovery::Secret(BigRational::from_integer(1.into()))
        );
    }
}

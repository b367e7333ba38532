use std::collections::BTreeMap;
use std::fmt;

use num_bigint::BigInt;
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::{json, Value};
use tracing::debug;

use crate::error::{LagrangeError, Result};
use crate::interpolation::Point;

/// Share set used when no input is supplied: n = 4, k = 3, shares at
/// indices 1, 2, 3 and 6 in bases 10, 2, 10 and 4.
pub const SAMPLE_SHARE_SET: &str = r#"{
    "keys": { "n": 4, "k": 3 },
    "1": { "base": "10", "value": "4" },
    "2": { "base": "2", "value": "111" },
    "3": { "base": "10", "value": "12" },
    "6": { "base": "4", "value": "213" }
}"#;

pub const MIN_BASE: u32 = 2;
pub const MAX_BASE: u32 = 36;

/// A JSON field that may be written either as a number or as a numeric string.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Numeric {
    Number(i64),
    Text(String),
}

impl Numeric {
    fn as_i64(&self) -> Option<i64> {
        match self {
            Numeric::Number(n) => Some(*n),
            Numeric::Text(s) => s.trim().parse().ok(),
        }
    }
}

impl fmt::Display for Numeric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Numeric::Number(n) => write!(f, "{}", n),
            Numeric::Text(s) => write!(f, "{}", s),
        }
    }
}

fn count<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<usize, D::Error> {
    let raw = Numeric::deserialize(deserializer)?;
    raw.as_i64()
        .and_then(|n| usize::try_from(n).ok())
        .ok_or_else(|| de::Error::custom(format!("expected a non-negative integer, got {raw:?}")))
}

/// The `"keys"` object: total share count `n` and threshold `k`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Keys {
    #[serde(deserialize_with = "count")]
    pub n: usize,
    #[serde(deserialize_with = "count")]
    pub k: usize,
}

#[derive(Debug, Deserialize)]
struct RawShare {
    base: Numeric,
    value: String,
}

/// One share as received: its index, base and encoded value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Share {
    pub index: u64,
    pub base: u32,
    pub value: String,
}

impl Share {
    /// Encodes `y` in `base` as the share at `index`.
    pub fn encode(index: u64, base: u32, y: &BigInt) -> Result<Self> {
        let base = check_base(index, Numeric::Number(base.into()))?;
        Ok(Share {
            index,
            base,
            value: y.to_str_radix(base),
        })
    }

    /// Decodes the share into the point `(index, value)`.
    pub fn decode(&self) -> Result<Point> {
        let y = decode_value(self.index, self.base, &self.value)?;
        Ok(Point::new(self.index, y))
    }
}

fn check_base(index: u64, base: Numeric) -> Result<u32> {
    base.as_i64()
        .and_then(|b| u32::try_from(b).ok())
        .filter(|b| (MIN_BASE..=MAX_BASE).contains(b))
        .ok_or(LagrangeError::InvalidBase {
            index,
            base: base.to_string(),
        })
}

/// Parses `value` as a base-`base` integer. Digits are case-insensitive and a
/// single leading sign is allowed.
pub fn decode_value(index: u64, base: u32, value: &str) -> Result<BigInt> {
    if !(MIN_BASE..=MAX_BASE).contains(&base) {
        return Err(LagrangeError::InvalidBase {
            index,
            base: base.to_string(),
        });
    }
    let invalid = || LagrangeError::InvalidEncoding {
        index,
        base,
        value: value.to_string(),
    };

    let (negative, digits) = match value.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, value.strip_prefix('+').unwrap_or(value)),
    };
    if digits.is_empty() || !digits.chars().all(|c| c.is_digit(base)) {
        return Err(invalid());
    }

    let magnitude = BigInt::parse_bytes(digits.as_bytes(), base).ok_or_else(invalid)?;
    Ok(if negative { -magnitude } else { magnitude })
}

/// A full share set: the `"keys"` header plus every share entry keyed by its
/// decimal index. Entries are kept as raw JSON and only decoded when selected.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShareSet {
    pub keys: Keys,
    #[serde(flatten)]
    entries: BTreeMap<String, Value>,
}

impl ShareSet {
    pub fn new(n: usize, k: usize) -> Self {
        ShareSet {
            keys: Keys { n, k },
            entries: BTreeMap::new(),
        }
    }

    pub fn from_json(input: &str) -> Result<Self> {
        Ok(serde_json::from_str(input)?)
    }

    pub fn to_json_pretty(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn share_count(&self) -> usize {
        self.keys.n
    }

    pub fn threshold(&self) -> usize {
        self.keys.k
    }

    pub fn insert(&mut self, share: &Share) {
        self.entries.insert(
            share.index.to_string(),
            json!({ "base": share.base.to_string(), "value": share.value }),
        );
    }

    /// Indices in `1..=n` that have an entry, ascending.
    pub fn present_indices(&self) -> Vec<u64> {
        let n = self.keys.n as u64;
        let mut indices: Vec<u64> = self
            .entries
            .keys()
            .filter_map(|key| {
                let index = key.parse::<u64>().ok()?;
                // only the canonical spelling counts, e.g. "7" but not "07"
                (index.to_string() == *key && (1..=n).contains(&index)).then_some(index)
            })
            .collect();
        indices.sort_unstable();
        indices
    }

    /// Looks up and validates the share at `index`.
    pub fn share(&self, index: u64) -> Result<Option<Share>> {
        let Some(entry) = self.entries.get(&index.to_string()) else {
            return Ok(None);
        };
        let raw = RawShare::deserialize(entry)?;
        let base = check_base(index, raw.base)?;
        Ok(Some(Share {
            index,
            base,
            value: raw.value,
        }))
    }

    /// Decodes the first `k` shares in ascending index order.
    pub fn select(&self) -> Result<Vec<Point>> {
        let Keys { n, k } = self.keys;
        if k == 0 {
            return Err(LagrangeError::InvalidThreshold {
                threshold: k,
                share_count: n,
            });
        }

        let indices = self.present_indices();
        if indices.len() < k {
            return Err(LagrangeError::InsufficientShares {
                required: k,
                provided: indices.len(),
            });
        }

        let mut points = Vec::with_capacity(k);
        for index in indices.into_iter().take(k) {
            if let Some(share) = self.share(index)? {
                debug!(index, base = share.base, "decoding share");
                points.push(share.decode()?);
            }
        }
        Ok(points)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_value() {
        assert_eq!(decode_value(1, 10, "4").unwrap(), BigInt::from(4));
        assert_eq!(decode_value(2, 2, "111").unwrap(), BigInt::from(7));
        assert_eq!(decode_value(6, 4, "213").unwrap(), BigInt::from(39));
        assert_eq!(decode_value(1, 16, "fF").unwrap(), BigInt::from(255));
        assert_eq!(decode_value(1, 36, "Zz").unwrap(), BigInt::from(1295));
        assert_eq!(decode_value(1, 10, "-12").unwrap(), BigInt::from(-12));
        assert_eq!(decode_value(1, 10, "+12").unwrap(), BigInt::from(12));
    }

    #[test]
    fn test_decode_value_large() {
        let value = "aed7050a9a3d5f2f6a4e0d8c7b6a5f4e3d2c1b0a9f8e7d6c5b4a3f2e1d0c9b8a7f6e5d4c3b2a1";
        let decoded = decode_value(1, 16, value).unwrap();
        assert_eq!(decoded.to_str_radix(16), value);
    }

    #[test]
    fn test_decode_value_rejects_bad_digits() {
        for (base, value) in [(2, "102"), (10, "12a"), (16, "g"), (10, ""), (10, "-"), (10, "1_000"), (10, " 1")] {
            assert!(
                matches!(
                    decode_value(3, base, value),
                    Err(LagrangeError::InvalidEncoding { index: 3, .. })
                ),
                "{value:?} in base {base}"
            );
        }
    }

    #[test]
    fn test_decode_value_rejects_bad_base() {
        assert!(matches!(decode_value(1, 1, "0"), Err(LagrangeError::InvalidBase { .. })));
        assert!(matches!(decode_value(1, 37, "0"), Err(LagrangeError::InvalidBase { .. })));
    }

    #[test]
    fn test_select_sample() {
        let set = ShareSet::from_json(SAMPLE_SHARE_SET).unwrap();
        assert_eq!(set.share_count(), 4);
        assert_eq!(set.threshold(), 3);
        assert_eq!(set.present_indices(), vec![1, 2, 3]);
        assert_eq!(
            set.select().unwrap(),
            vec![Point::new(1, 4), Point::new(2, 7), Point::new(3, 12)]
        );
    }

    #[test]
    fn test_select_skips_gaps_and_ignores_indices_above_n() {
        let set = ShareSet::from_json(
            r#"{
                "keys": { "n": "5", "k": "2" },
                "2": { "base": 16, "value": "A" },
                "5": { "base": "8", "value": "17" },
                "6": { "base": "10", "value": "1" },
                "03": { "base": "10", "value": "1" },
                "note": "ignored"
            }"#,
        )
        .unwrap();
        assert_eq!(set.present_indices(), vec![2, 5]);
        assert_eq!(
            set.select().unwrap(),
            vec![Point::new(2, 10), Point::new(5, 15)]
        );
    }

    #[test]
    fn test_select_insufficient() {
        let set = ShareSet::from_json(
            r#"{ "keys": { "n": 4, "k": 3 },
                 "1": { "base": "10", "value": "4" },
                 "4": { "base": "10", "value": "9" },
                 "9": { "base": "10", "value": "9" } }"#,
        )
        .unwrap();
        assert!(matches!(
            set.select(),
            Err(LagrangeError::InsufficientShares {
                required: 3,
                provided: 2
            })
        ));
    }

    #[test]
    fn test_select_zero_threshold() {
        let set = ShareSet::from_json(r#"{ "keys": { "n": 1, "k": 0 } }"#).unwrap();
        assert!(matches!(
            set.select(),
            Err(LagrangeError::InvalidThreshold { threshold: 0, share_count: 1 })
        ));
    }

    #[test]
    fn test_select_reports_invalid_encoding_and_base() {
        let bad_digit = ShareSet::from_json(
            r#"{ "keys": { "n": 2, "k": 2 },
                 "1": { "base": "2", "value": "12" },
                 "2": { "base": "10", "value": "3" } }"#,
        )
        .unwrap();
        assert!(matches!(
            bad_digit.select(),
            Err(LagrangeError::InvalidEncoding { index: 1, base: 2, .. })
        ));

        let bad_base = ShareSet::from_json(
            r#"{ "keys": { "n": 2, "k": 2 },
                 "1": { "base": "10", "value": "1" },
                 "2": { "base": "40", "value": "3" } }"#,
        )
        .unwrap();
        match bad_base.select() {
            Err(LagrangeError::InvalidBase { index, base }) => {
                assert_eq!(index, 2);
                assert_eq!(base, "40");
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_shares_beyond_threshold_are_not_decoded() {
        let set = ShareSet::from_json(
            r#"{ "keys": { "n": 3, "k": 2 },
                 "1": { "base": "10", "value": "1" },
                 "2": { "base": "10", "value": "2" },
                 "3": { "base": "10", "value": "zz" } }"#,
        )
        .unwrap();
        assert_eq!(set.select().unwrap().len(), 2);
    }

    #[test]
    fn test_malformed_input() {
        for input in [
            "not json",
            r#"{ "1": { "base": "10", "value": "1" } }"#,
            r#"{ "keys": { "n": -1, "k": 2 } }"#,
            r#"{ "keys": { "n": "four", "k": 2 } }"#,
        ] {
            assert!(
                matches!(ShareSet::from_json(input), Err(LagrangeError::MalformedInput(_))),
                "{input}"
            );
        }

        let missing_value = ShareSet::from_json(
            r#"{ "keys": { "n": 1, "k": 1 }, "1": { "base": "10" } }"#,
        )
        .unwrap();
        assert!(matches!(
            missing_value.select(),
            Err(LagrangeError::MalformedInput(_))
        ));
    }

    #[test]
    fn test_insert_and_serialize() {
        let mut set = ShareSet::new(2, 2);
        set.insert(&Share::encode(1, 16, &BigInt::from(255)).unwrap());
        set.insert(&Share::encode(2, 2, &BigInt::from(-5)).unwrap());

        let parsed = ShareSet::from_json(&set.to_json_pretty().unwrap()).unwrap();
        assert_eq!(parsed, set);
        assert_eq!(
            parsed.share(1).unwrap(),
            Some(Share {
                index: 1,
                base: 16,
                value: "ff".to_string()
            })
        );
        assert_eq!(
            parsed.select().unwrap(),
            vec![Point::new(1, 255), Point::new(2, -5)]
        );
    }

    #[test]
    fn test_encode_rejects_bad_base() {
        assert!(matches!(
            Share::encode(1, 37, &BigInt::from(1)),
            Err(LagrangeError::InvalidBase { .. })
        ));
    }
}

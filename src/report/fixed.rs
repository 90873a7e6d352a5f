//! Fixed-precision decimal values
//!
//! Report figures are rendered with a fixed number of fraction digits and
//! travel as strings (`"2.00"`, `"0.488"`), the same way the panel displays
//! them. `Fixed<P>` keeps the numeric value for comparisons and only applies
//! the precision when serialized or displayed.

use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::cmp::Ordering;
use std::fmt;
use std::marker::PhantomData;

/// A decimal rendered with exactly `P` fraction digits
#[derive(Debug, Clone, Copy, Default)]
pub struct Fixed<const P: usize>(f64);

impl<const P: usize> Fixed<P> {
    #[must_use]
    pub fn new(value: f64) -> Self {
        // NaN and infinities cannot be rendered as a fixed decimal
        if value.is_finite() {
            Self(value)
        } else {
            Self(0.0)
        }
    }

    #[must_use]
    pub fn value(self) -> f64 {
        self.0
    }

    /// The value as it is displayed, parsed back into a float
    #[must_use]
    pub fn rounded(self) -> f64 {
        self.to_string().parse().unwrap_or(self.0)
    }
}

impl<const P: usize> fmt::Display for Fixed<P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:.*}", P, self.0)
    }
}

impl<const P: usize> From<f64> for Fixed<P> {
    fn from(value: f64) -> Self {
        Self::new(value)
    }
}

impl<const P: usize> PartialEq for Fixed<P> {
    fn eq(&self, other: &Self) -> bool {
        self.to_string() == other.to_string()
    }
}

impl<const P: usize> PartialOrd for Fixed<P> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        self.rounded().partial_cmp(&other.rounded())
    }
}

impl<const P: usize> PartialEq<&str> for Fixed<P> {
    fn eq(&self, other: &&str) -> bool {
        self.to_string() == *other
    }
}

impl<const P: usize> Serialize for Fixed<P> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

struct FixedVisitor<const P: usize>(PhantomData<()>);

impl<const P: usize> Visitor<'_> for FixedVisitor<P> {
    type Value = Fixed<P>;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a decimal number or a decimal string")
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        Ok(Fixed::new(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        Ok(Fixed::new(v as f64))
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(Fixed::new(v as f64))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Self::Value, E> {
        v.trim()
            .parse::<f64>()
            .map(Fixed::new)
            .map_err(|_| E::invalid_value(de::Unexpected::Str(v), &self))
    }
}

impl<'de, const P: usize> Deserialize<'de> for Fixed<P> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(FixedVisitor::<P>(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_pads_fraction_digits() {
        assert_eq!(Fixed::<2>::new(2.0).to_string(), "2.00");
        assert_eq!(Fixed::<3>::new(0.0).to_string(), "0.000");
        assert_eq!(Fixed::<3>::new(512_000.0 / 1_048_576.0).to_string(), "0.488");
    }

    #[test]
    fn test_non_finite_becomes_zero() {
        assert_eq!(Fixed::<2>::new(f64::NAN), "0.00");
        assert_eq!(Fixed::<2>::new(f64::INFINITY), "0.00");
    }

    #[test]
    fn test_serde_uses_strings_and_accepts_numbers() {
        let json = serde_json::to_string(&Fixed::<2>::new(4.0)).unwrap();
        assert_eq!(json, "\"4.00\"");

        let from_str: Fixed<2> = serde_json::from_str("\"1.25\"").unwrap();
        let from_num: Fixed<2> = serde_json::from_str("1.25").unwrap();
        assert_eq!(from_str, from_num);
        assert!(serde_json::from_str::<Fixed<2>>("\"fast\"").is_err());
    }

    #[test]
    fn test_ordering_uses_displayed_precision() {
        assert!(Fixed::<3>::new(0.4881) > Fixed::<3>::new(0.0095));
        assert_eq!(
            Fixed::<3>::new(0.4881).partial_cmp(&Fixed::<3>::new(0.4879)),
            Some(Ordering::Equal)
        );
    }
}

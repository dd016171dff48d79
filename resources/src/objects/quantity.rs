use std::{fmt::Display, str::FromStr};

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    /// <signedNumber><suffix>, where suffix is a binary SI suffix (Ki..Ei),
    /// a decimal SI suffix (n, u, m, k, M..E) or a decimal exponent (e3, E-2).
    static ref QUANTITY: Regex = Regex::new(
        r"^[+-]?([0-9]+(\.[0-9]*)?|\.[0-9]+)((Ki|Mi|Gi|Ti|Pi|Ei)|[numkMGTPE]|[eE][+-]?[0-9]+)?$"
    )
    .expect("quantity pattern is valid");
}

/// A fixed-point resource amount such as `500m`, `256Mi` or `1.5`.
/// Only well-formed quantities can be constructed.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(try_from = "String", into = "String")]
pub struct Quantity(String);

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
#[error("'{0}' is not a valid resource quantity")]
pub struct InvalidQuantity(pub String);

impl Quantity {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for Quantity {
    type Err = InvalidQuantity;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        if QUANTITY.is_match(trimmed) {
            Ok(Quantity(trimmed.to_string()))
        } else {
            Err(InvalidQuantity(s.to_string()))
        }
    }
}

impl TryFrom<String> for Quantity {
    type Error = InvalidQuantity;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Quantity> for String {
    fn from(quantity: Quantity) -> Self {
        quantity.0
    }
}

impl Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_common_forms() {
        for value in ["500m", "0.5", "1", "256Mi", "1Gi", "2G", "1e3", ".5", "100k"] {
            assert!(value.parse::<Quantity>().is_ok(), "{} should parse", value);
        }
    }

    #[test]
    fn rejects_garbage() {
        for value in ["", "abc", "1.5.5", "10 Mi", "Mi", "5mi", "1KiB"] {
            assert_eq!(
                value.parse::<Quantity>(),
                Err(InvalidQuantity(value.to_string()))
            );
        }
    }

    #[test]
    fn deserialize_validates() {
        assert!(serde_yaml::from_str::<Quantity>("\"512Mi\"").is_ok());
        assert!(serde_yaml::from_str::<Quantity>("\"lots\"").is_err());
    }
}

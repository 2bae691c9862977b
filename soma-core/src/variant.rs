//! Experiment arm identifiers
//!
//! The experiment has exactly two arms. Codes are case-sensitive: `a` is
//! rejected the same way `C` is.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::ValidationError;

/// One arm of the running experiment
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Variant {
    #[default]
    A,
    B,
}

impl Variant {
    pub const ALL: [Variant; 2] = [Variant::A, Variant::B];

    /// Code as stored in the event table and views.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::A => "A",
            Self::B => "B",
        }
    }
}

impl FromStr for Variant {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "A" => Ok(Self::A),
            "B" => Ok(Self::B),
            other => Err(ValidationError::InvalidVariant {
                field: "variant",
                value: other.to_owned(),
                expected: "A, B",
            }),
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_both_arms() {
        assert_eq!("A".parse::<Variant>().unwrap(), Variant::A);
        assert_eq!("B".parse::<Variant>().unwrap(), Variant::B);
    }

    #[test]
    fn rejects_unknown_and_lowercase() {
        for bad in ["C", "a", "", "AB", " A"] {
            let err = bad.parse::<Variant>().unwrap_err();
            assert!(matches!(err, ValidationError::InvalidVariant { .. }), "{bad:?}");
        }
    }

    #[test]
    fn defaults_to_a() {
        assert_eq!(Variant::default(), Variant::A);
    }

    #[test]
    fn serializes_as_code() {
        assert_eq!(serde_json::to_string(&Variant::B).unwrap(), "\"B\"");
    }
}

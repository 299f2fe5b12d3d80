use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::SelectError;

/// The closed set of target selection strategies.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SelectionPolicy {
    /// Closest armor center to the aim point.
    #[default]
    #[serde(alias = "ATTACK_MID")]
    NearestToCenter,
    /// Smallest externally measured range.
    #[serde(alias = "ATTACK_NEAR")]
    NearestByDistance,
    /// Armor showing a given digit.
    #[serde(alias = "ATTACK_NUMBER_STATIC")]
    FixedDigit,
    /// Armor showing the digit seen most often over recent frames.
    #[serde(alias = "ATTACK_NUMBER_AUTO")]
    AutoDigit,
}

impl SelectionPolicy {
    pub const ALL: [SelectionPolicy; 4] = [
        Self::NearestToCenter,
        Self::NearestByDistance,
        Self::FixedDigit,
        Self::AutoDigit,
    ];

    /// Stable key, as accepted by `FromStr` and serde.
    pub fn key(self) -> &'static str {
        match self {
            Self::NearestToCenter => "nearest-to-center",
            Self::NearestByDistance => "nearest-by-distance",
            Self::FixedDigit => "fixed-digit",
            Self::AutoDigit => "auto-digit",
        }
    }

    /// Whether the policy reads digit annotations. The other policies let the
    /// recognizer skip the frame.
    pub fn uses_digits(self) -> bool {
        matches!(self, Self::FixedDigit | Self::AutoDigit)
    }
}

impl fmt::Display for SelectionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for SelectionPolicy {
    type Err = SelectError;

    /// Accepts the stable keys and the legacy `ATTACK_*` mode names.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "nearest-to-center" | "ATTACK_MID" => Ok(Self::NearestToCenter),
            "nearest-by-distance" | "ATTACK_NEAR" => Ok(Self::NearestByDistance),
            "fixed-digit" | "ATTACK_NUMBER_STATIC" => Ok(Self::FixedDigit),
            "auto-digit" | "ATTACK_NUMBER_AUTO" => Ok(Self::AutoDigit),
            other => Err(SelectError::UnknownPolicy(other.to_string())),
        }
    }
}

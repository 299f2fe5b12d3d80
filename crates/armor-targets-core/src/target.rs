use std::fmt;
use std::str::FromStr;

use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::geometry::{AxisRect, OrientedRect, PixelRect};

/// Team color of the light bars being tracked.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetColor {
    #[default]
    Red,
    Blue,
}

impl TargetColor {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Red => "red",
            Self::Blue => "blue",
        }
    }

    /// The other team's color.
    pub fn opposite(self) -> Self {
        match self {
            Self::Red => Self::Blue,
            Self::Blue => Self::Red,
        }
    }
}

impl fmt::Display for TargetColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
#[error("unknown target color {0:?} (expected \"red\" or \"blue\")")]
pub struct ParseColorError(pub String);

impl FromStr for TargetColor {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "red" | "r" => Ok(Self::Red),
            "blue" | "b" => Ok(Self::Blue),
            _ => Err(ParseColorError(s.to_string())),
        }
    }
}

/// Mask-gated channel means sampled inside a light bar's bounding box.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ChannelMean {
    pub red: f32,
    pub green: f32,
    pub blue: f32,
}

impl ChannelMean {
    pub fn channel(&self, color: TargetColor) -> f32 {
        match color {
            TargetColor::Red => self.red,
            TargetColor::Blue => self.blue,
        }
    }
}

/// A validated light bar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct LightBar {
    /// Fitted minimum-area rectangle, in the fitting convention.
    pub rect: OrientedRect,
    /// Bounding box of the source contour.
    pub bbox: PixelRect,
    pub mean: ChannelMean,
}

impl LightBar {
    /// Light bar from a fitted rectangle alone (no sampling information).
    pub fn from_rect(rect: OrientedRect) -> Self {
        let (short, long) = rect.normalized_size();
        let x = (rect.center.x - 0.5 * short).max(0.0) as u32;
        let y = (rect.center.y - 0.5 * long).max(0.0) as u32;
        Self {
            rect,
            bbox: PixelRect {
                x,
                y,
                width: short.ceil() as u32,
                height: long.ceil() as u32,
            },
            mean: ChannelMean::default(),
        }
    }

    pub fn center(&self) -> Point2<f32> {
        self.rect.center
    }

    /// `(width, height)` used by the pairing predicates.
    ///
    /// A rectangle fitted exactly at -90 degrees reports its long side as
    /// `width`; the two are swapped back here.
    pub fn pairing_size(&self) -> (f32, f32) {
        if self.rect.angle == -90.0 {
            (self.rect.height, self.rect.width)
        } else {
            (self.rect.width, self.rect.height)
        }
    }
}

/// Output of the external digit recognizer for one armor candidate.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DigitReading {
    /// The recognizer did not run on this candidate.
    #[default]
    NotRecognized,
    /// The recognizer ran and found no digit.
    Blank,
    Digit(u8),
}

impl DigitReading {
    pub fn digit(self) -> Option<u8> {
        match self {
            Self::Digit(d) => Some(d),
            _ => None,
        }
    }
}

/// Quantities measured by the pairing predicates for one accepted pair.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PairMetrics {
    /// `|aL - aR| / max(aL, aR)`.
    pub size_ratio: f32,
    /// `||angleL + 45| - |angleR + 45||` in degrees.
    pub angle_diff: f32,
    pub height_ratio: f32,
    pub width_ratio: f32,
    /// Center distance over the largest side of either bar.
    pub panel_ratio: f32,
}

/// Two light bars hypothesized to bound one armor plate.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ArmorCandidate {
    pub left: LightBar,
    pub right: LightBar,
    /// Tightest axis-aligned box around the corners of both bars.
    pub bbox: AxisRect,
    pub metrics: PairMetrics,
    /// Range estimate supplied by an external rangefinder.
    #[serde(default)]
    pub distance: Option<f32>,
    #[serde(default)]
    pub digit: DigitReading,
}

impl ArmorCandidate {
    pub fn center(&self) -> Point2<f32> {
        self.bbox.center()
    }

    pub fn with_distance(mut self, distance: f32) -> Self {
        self.distance = Some(distance);
        self
    }

    pub fn with_digit(mut self, digit: DigitReading) -> Self {
        self.digit = digit;
        self
    }
}

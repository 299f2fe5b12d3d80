use armor_targets_core::TargetColor;
use serde::{Deserialize, Serialize};

/// Binarization settings for the frame preprocessor.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PreprocessParams {
    /// Gray levels strictly above this become foreground.
    pub threshold: u8,
    /// Side of the square closing element; 0 or 1 disables closing.
    pub kernel_size: u8,
}

impl Default for PreprocessParams {
    fn default() -> Self {
        Self {
            threshold: 150,
            kernel_size: 5,
        }
    }
}

/// Shape and color gates for a single light bar.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightBarParams {
    /// Exclusive lower bound on short/long side ratio.
    pub min_aspect: f32,
    /// Exclusive upper bound on short/long side ratio.
    pub max_aspect: f32,
    /// The active channel mean must exceed this (0..255 scale).
    pub min_brightness: f32,
}

impl Default for LightBarParams {
    fn default() -> Self {
        Self {
            min_aspect: 0.05,
            max_aspect: 0.5,
            min_brightness: 220.0,
        }
    }
}

/// Thresholds of the five pairing predicates.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PairingParams {
    /// Exclusive bound on `|aL - aR| / max(aL, aR)`.
    pub max_size_ratio: f32,
    /// Exclusive bound on the tilt difference, degrees.
    pub max_angle_diff: f32,
    /// Inclusive bound on relative height difference.
    pub max_height_ratio: f32,
    /// Inclusive bound on relative width difference.
    pub max_width_ratio: f32,
    /// Closed ranges of center distance over the largest bar side.
    /// Defaults model the large and small plate form factors.
    pub panel_ranges: Vec<[f32; 2]>,
    /// Keep at most one candidate per light bar (best score wins).
    pub exclusive_bars: bool,
}

impl Default for PairingParams {
    fn default() -> Self {
        Self {
            max_size_ratio: 0.3,
            max_angle_diff: 9.0,
            max_height_ratio: 0.9,
            max_width_ratio: 0.9,
            panel_ranges: vec![[2.0, 3.5], [5.5, 7.0]],
            exclusive_bars: false,
        }
    }
}

/// Full per-frame detector configuration.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArmorDetectorParams {
    pub color: TargetColor,
    pub preprocess: PreprocessParams,
    pub light_bar: LightBarParams,
    pub pairing: PairingParams,
}

impl ArmorDetectorParams {
    pub fn for_color(color: TargetColor) -> Self {
        Self {
            color,
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let params: ArmorDetectorParams =
            serde_json::from_str(r#"{"color":"blue","pairing":{"exclusive_bars":true}}"#).unwrap();
        assert_eq!(params.color, TargetColor::Blue);
        assert!(params.pairing.exclusive_bars);
        assert_eq!(params.pairing.max_angle_diff, 9.0);
        assert_eq!(params.preprocess, PreprocessParams::default());
    }
}

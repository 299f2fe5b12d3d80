use armor_targets_core::{ArmorCandidate, LightBar, TargetColor};
use image::RgbImage;
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::DetectError;
use crate::lightbar::detect_light_bars;
use crate::pairing::pair_light_bars;
use crate::params::ArmorDetectorParams;
use crate::preprocess::preprocess;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Light bars and armor candidates found in one frame.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct ArmorDetection {
    pub light_bars: Vec<LightBar>,
    pub armors: Vec<ArmorCandidate>,
}

/// Per-frame armor detector: preprocess, extract light bars, pair them.
#[derive(Clone, Debug, Default)]
pub struct ArmorDetector {
    params: ArmorDetectorParams,
}

impl ArmorDetector {
    pub fn new(params: ArmorDetectorParams) -> Self {
        Self { params }
    }

    pub fn params(&self) -> &ArmorDetectorParams {
        &self.params
    }

    pub fn color(&self) -> TargetColor {
        self.params.color
    }

    /// Switch the tracked team color between frames.
    pub fn set_color(&mut self, color: TargetColor) {
        self.params.color = color;
    }

    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame), fields(width = frame.width(), height = frame.height(), color = %self.params.color))
    )]
    pub fn detect(&self, frame: &RgbImage) -> Result<ArmorDetection, DetectError> {
        let mask = preprocess(frame, &self.params.preprocess)?;
        let light_bars =
            detect_light_bars(frame, &mask, self.params.color, &self.params.light_bar)?;
        let armors = pair_light_bars(&light_bars, &self.params.pairing);
        debug!(
            "frame {}x{}: {} light bars, {} armors",
            frame.width(),
            frame.height(),
            light_bars.len(),
            armors.len()
        );
        Ok(ArmorDetection { light_bars, armors })
    }
}

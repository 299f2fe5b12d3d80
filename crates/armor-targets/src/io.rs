//! JSON configuration and report helpers.

use std::{fs, path::Path};

use armor_targets_core::{ArmorCandidate, LightBar, TargetColor};
use armor_targets_detect::ArmorDetectorParams;
use armor_targets_select::{PolicyArgs, Selection, SelectionPolicy, DEFAULT_HISTORY_FRAMES};
use serde::{Deserialize, Serialize};

use crate::pipeline::{FrameResult, PipelineError};

#[derive(thiserror::Error, Debug)]
pub enum IoError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Image(#[from] image::ImageError),
}

fn default_history_frames() -> usize {
    DEFAULT_HISTORY_FRAMES
}

/// Everything needed to run the aiming pipeline on a feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AimConfig {
    /// Detector settings, including the tracked team color.
    #[serde(default)]
    pub detector: ArmorDetectorParams,
    #[serde(default)]
    pub policy: SelectionPolicy,
    #[serde(default)]
    pub policy_args: PolicyArgs,
    /// Window length of the auto-digit history, in frames.
    #[serde(default = "default_history_frames")]
    pub history_frames: usize,
}

impl Default for AimConfig {
    fn default() -> Self {
        Self {
            detector: ArmorDetectorParams::default(),
            policy: SelectionPolicy::default(),
            policy_args: PolicyArgs::default(),
            history_frames: DEFAULT_HISTORY_FRAMES,
        }
    }
}

impl AimConfig {
    pub fn for_color(color: TargetColor) -> Self {
        Self {
            detector: ArmorDetectorParams::for_color(color),
            ..Self::default()
        }
    }

    /// Load a JSON config from disk.
    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// Write this config to disk as pretty JSON.
    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Serializable record of one processed frame.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FrameReport {
    pub width: u32,
    pub height: u32,
    pub color: TargetColor,
    pub policy: SelectionPolicy,
    pub light_bars: Vec<LightBar>,
    pub armors: Vec<ArmorCandidate>,
    #[serde(default)]
    pub selection: Option<Selection>,
    #[serde(default)]
    pub target: Option<ArmorCandidate>,
    #[serde(default)]
    pub error: Option<String>,
}

impl FrameReport {
    /// Empty report for a frame of the given size.
    pub fn new(config: &AimConfig, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            color: config.detector.color,
            policy: config.policy,
            light_bars: Vec::new(),
            armors: Vec::new(),
            selection: None,
            target: None,
            error: None,
        }
    }

    /// Populate report fields from a processed frame.
    pub fn set_result(&mut self, result: &FrameResult) {
        self.light_bars = result.detection.light_bars.clone();
        self.armors = result.detection.armors.clone();
        self.selection = Some(result.selection);
        self.target = result.target().copied();
        self.error = None;
    }

    /// Record a pipeline error.
    pub fn set_error(&mut self, err: &PipelineError) {
        self.error = Some(err.to_string());
    }

    pub fn load_json(path: impl AsRef<Path>) -> Result<Self, IoError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    pub fn write_json(&self, path: impl AsRef<Path>) -> Result<(), IoError> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json)?;
        Ok(())
    }
}

/// Decode an image file into an RGB frame.
pub fn load_frame(path: impl AsRef<Path>) -> Result<image::RgbImage, IoError> {
    Ok(image::ImageReader::open(path)?.decode()?.to_rgb8())
}

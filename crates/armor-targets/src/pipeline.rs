use armor_targets_core::{ArmorCandidate, TargetColor};
use armor_targets_detect::{ArmorDetection, ArmorDetector, DetectError};
use armor_targets_select::{
    select, PolicyArgs, SelectError, Selection, SelectionContext, SelectionPolicy,
};
use image::{DynamicImage, RgbImage};
use log::debug;

use crate::io::AimConfig;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Errors produced by the end-to-end pipeline.
#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("invalid RGB buffer length (expected {expected} bytes, got {got})")]
    InvalidRgbBuffer { expected: usize, got: usize },

    #[error(transparent)]
    Detect(#[from] DetectError),

    #[error(transparent)]
    Select(#[from] SelectError),
}

/// Detection and selection output for one frame.
#[derive(Clone, Debug, PartialEq)]
pub struct FrameResult {
    pub detection: ArmorDetection,
    pub selection: Selection,
}

impl FrameResult {
    /// The selected armor, if any.
    pub fn target(&self) -> Option<&ArmorCandidate> {
        self.selection.target(&self.detection.armors)
    }
}

/// Frame-at-a-time aiming pipeline for one camera feed.
///
/// Owns the detector, the active policy and the cross-frame selection state.
#[derive(Clone, Debug)]
pub struct AimPipeline {
    detector: ArmorDetector,
    config: AimConfig,
    context: SelectionContext,
}

impl AimPipeline {
    pub fn new(config: AimConfig) -> Self {
        Self {
            detector: ArmorDetector::new(config.detector.clone()),
            context: SelectionContext::with_history_capacity(config.history_frames),
            config,
        }
    }

    pub fn config(&self) -> &AimConfig {
        &self.config
    }

    pub fn context(&self) -> &SelectionContext {
        &self.context
    }

    /// Switch the tracked team color; takes effect on the next frame.
    ///
    /// Digits seen on the previous team's armors are dropped from the history.
    pub fn set_color(&mut self, color: TargetColor) {
        if color != self.config.detector.color {
            self.context.history.clear();
        }
        self.config.detector.color = color;
        self.detector.set_color(color);
    }

    /// Replace the policy and its arguments. The digit history is kept.
    pub fn set_policy(&mut self, policy: SelectionPolicy, args: PolicyArgs) {
        self.config.policy = policy;
        self.config.policy_args = args;
    }

    pub fn detect(&self, frame: &RgbImage) -> Result<ArmorDetection, PipelineError> {
        Ok(self.detector.detect(frame)?)
    }

    pub fn select(&mut self, candidates: &[ArmorCandidate]) -> Result<Selection, PipelineError> {
        Ok(select(
            candidates,
            self.config.policy,
            &self.config.policy_args,
            &mut self.context,
        )?)
    }

    /// Detect and select on one frame.
    pub fn process_frame(&mut self, frame: &RgbImage) -> Result<FrameResult, PipelineError> {
        self.process_frame_annotated(frame, |_, _| {})
    }

    /// Detect, let external collaborators (rangefinder, digit recognizer)
    /// annotate the candidates, then select.
    #[cfg_attr(
        feature = "tracing",
        instrument(level = "info", skip(self, frame, annotate), fields(width = frame.width(), height = frame.height()))
    )]
    pub fn process_frame_annotated<F>(
        &mut self,
        frame: &RgbImage,
        annotate: F,
    ) -> Result<FrameResult, PipelineError>
    where
        F: FnOnce(&RgbImage, &mut [ArmorCandidate]),
    {
        let mut detection = self.detect(frame)?;
        annotate(frame, &mut detection.armors);
        let selection = self.select(&detection.armors)?;
        debug!(
            "{}: {} armors, selected {:?}",
            self.config.policy,
            detection.armors.len(),
            selection.index
        );
        Ok(FrameResult {
            detection,
            selection,
        })
    }

    /// Convenience overload for decoded images of any pixel format.
    pub fn process_image(&mut self, image: &DynamicImage) -> Result<FrameResult, PipelineError> {
        self.process_frame(&image.to_rgb8())
    }
}

/// Build an `image::RgbImage` from a raw interleaved RGB buffer.
pub fn rgb_image_from_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<RgbImage, PipelineError> {
    if width == 0 || height == 0 {
        return Err(DetectError::InvalidFrame { width, height }.into());
    }
    let expected = (width as usize)
        .checked_mul(height as usize)
        .and_then(|n| n.checked_mul(3))
        .ok_or(DetectError::InvalidFrame { width, height })?;
    if pixels.len() != expected {
        return Err(PipelineError::InvalidRgbBuffer {
            expected,
            got: pixels.len(),
        });
    }
    RgbImage::from_raw(width, height, pixels.to_vec())
        .ok_or_else(|| DetectError::InvalidFrame { width, height }.into())
}

/// Build an `RgbImage` from a BGR buffer, the usual camera driver layout.
pub fn rgb_image_from_bgr_slice(
    width: u32,
    height: u32,
    pixels: &[u8],
) -> Result<RgbImage, PipelineError> {
    let mut img = rgb_image_from_slice(width, height, pixels)?;
    for px in img.pixels_mut() {
        px.0.swap(0, 2);
    }
    Ok(img)
}

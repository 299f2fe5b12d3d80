//! High-level facade crate for the `armor-targets-*` workspace.
//!
//! This crate provides:
//! - re-exports of the core types, the detector and the selection policies;
//! - [`AimPipeline`], which runs detection and selection frame by frame and
//!   keeps the per-feed selection state;
//! - JSON config and report helpers in [`io`].
//!
//! ## Quickstart
//!
//! ```no_run
//! use armor_targets::{io, AimConfig, AimPipeline, TargetColor};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let frame = io::load_frame("frame.png")?;
//! let mut pipeline = AimPipeline::new(AimConfig::for_color(TargetColor::Blue));
//!
//! let result = pipeline.process_frame(&frame)?;
//! if let Some(target) = result.target() {
//!     println!("aim at {:?}", target.center());
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## API map
//! - `armor_targets::core`: rectangles, light bars, armor candidates, logger.
//! - `armor_targets::detect`: preprocessing, light bars, pairing.
//! - `armor_targets::select`: selection policies and digit history.

pub use armor_targets_core as core;
pub use armor_targets_detect as detect;
pub use armor_targets_select as select;

pub use armor_targets_core::{ArmorCandidate, DigitReading, LightBar, OrientedRect, TargetColor};
pub use armor_targets_detect::{ArmorDetection, ArmorDetector, ArmorDetectorParams};
pub use armor_targets_select::{PolicyArgs, Selection, SelectionContext, SelectionPolicy};

pub mod io;
mod pipeline;

pub use io::{AimConfig, FrameReport, IoError};
pub use pipeline::{
    rgb_image_from_bgr_slice, rgb_image_from_slice, AimPipeline, FrameResult, PipelineError,
};

//! Core types for armor plate detection.
//!
//! This crate is small and purely geometric: fitted rectangles, light bars,
//! armor candidates and the logger shared by the detector crates. It does
//! *not* depend on any image type.

mod geometry;
mod logger;
mod target;

pub use geometry::{AxisRect, OrientedRect, PixelRect};
pub use target::{
    ArmorCandidate, ChannelMean, DigitReading, LightBar, PairMetrics, ParseColorError,
    TargetColor,
};

#[cfg(feature = "tracing")]
pub use logger::init_tracing;

pub use logger::{init_from_env, init_with_level, LOG_ENV_VAR};

/// Image-space point type used across the workspace.
pub type Point = nalgebra::Point2<f32>;

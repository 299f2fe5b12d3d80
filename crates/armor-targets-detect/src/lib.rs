//! Armor plate detection on color frames.
//!
//! The pipeline runs strictly forward per frame:
//! - [`preprocess`]: grayscale, fixed threshold, square closing;
//! - [`detect_light_bars`]: contours, minimum-area rectangles, aspect and
//!   color gates;
//! - [`pair_light_bars`]: five geometric predicates over every pair of bars.
//!
//! [`ArmorDetector`] wires the three stages together. Target selection lives
//! in `armor-targets-select`.

mod detector;
mod error;
mod lightbar;
mod pairing;
mod params;
mod preprocess;

pub use detector::{ArmorDetection, ArmorDetector};
pub use error::DetectError;
pub use lightbar::detect_light_bars;
pub use pairing::{accepts, dedup_shared_bars, pair_light_bars, pair_metrics, pair_score, try_pair};
pub use params::{ArmorDetectorParams, LightBarParams, PairingParams, PreprocessParams};
pub use preprocess::{luma, preprocess};

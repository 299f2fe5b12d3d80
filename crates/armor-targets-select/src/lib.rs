//! Target selection over the armor candidates of one frame.
//!
//! A [`SelectionPolicy`] is one of a closed set of strategies, dispatched by
//! [`select`]. Cross-frame state (the digit history used by the auto-digit
//! policy) lives in an explicit [`SelectionContext`] owned by the caller, one
//! per camera feed.
//!
//! Digit recognition itself is external: the digit policies read
//! [`armor_targets_core::DigitReading`] annotations on each candidate and
//! fail with [`SelectError::DigitRecognitionUnavailable`] if the recognizer
//! did not run.

mod error;
mod history;
mod policy;
mod select;

pub use error::SelectError;
pub use history::{DigitHistory, DEFAULT_HISTORY_FRAMES};
pub use policy::SelectionPolicy;
pub use select::{select, PolicyArgs, Selection, SelectionContext};

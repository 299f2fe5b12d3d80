use armor_targets_core::{ArmorCandidate, DigitReading};
use log::trace;
use nalgebra::Point2;
use serde::{Deserialize, Serialize};

use crate::error::SelectError;
use crate::history::DigitHistory;
use crate::policy::SelectionPolicy;

#[cfg(feature = "tracing")]
use tracing::instrument;

/// Policy-specific arguments.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyArgs {
    /// Reference point for nearest-to-center and tie-breaks.
    pub aim_point: Point2<f32>,
    /// Digit to lock onto with the fixed-digit policy.
    pub target_digit: Option<u8>,
}

impl Default for PolicyArgs {
    fn default() -> Self {
        Self {
            aim_point: Point2::new(320.0, 240.0),
            target_digit: None,
        }
    }
}

impl PolicyArgs {
    /// Aim at the center of a `width x height` frame.
    pub fn centered(width: u32, height: u32) -> Self {
        Self {
            aim_point: Point2::new(0.5 * width as f32, 0.5 * height as f32),
            ..Self::default()
        }
    }

    pub fn with_target_digit(mut self, digit: u8) -> Self {
        self.target_digit = Some(digit);
        self
    }
}

/// State carried across frames of one camera feed.
#[derive(Clone, Debug, Default)]
pub struct SelectionContext {
    pub history: DigitHistory,
}

impl SelectionContext {
    pub fn with_history_capacity(frames: usize) -> Self {
        Self {
            history: DigitHistory::new(frames),
        }
    }
}

/// Outcome of one selection call.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub policy: SelectionPolicy,
    /// Index of the chosen candidate; `None` means no selection.
    pub index: Option<usize>,
    /// Hint for the external recognizer: whether the next frame needs digits.
    pub recognize_digits: bool,
}

impl Selection {
    fn new(policy: SelectionPolicy, index: Option<usize>) -> Self {
        Self {
            policy,
            index,
            recognize_digits: policy.uses_digits(),
        }
    }

    pub fn is_none(&self) -> bool {
        self.index.is_none()
    }

    pub fn target<'a>(&self, candidates: &'a [ArmorCandidate]) -> Option<&'a ArmorCandidate> {
        candidates.get(self.index?)
    }
}

/// Index of the candidate closest to `aim` among `indices`; ties keep the
/// first index visited.
fn nearest_to(
    candidates: &[ArmorCandidate],
    indices: impl IntoIterator<Item = usize>,
    aim: Point2<f32>,
) -> Option<usize> {
    let mut best: Option<(usize, f32)> = None;
    for i in indices {
        let d = (candidates[i].center() - aim).norm();
        if best.map(|(_, bd)| d < bd).unwrap_or(true) {
            best = Some((i, d));
        }
    }
    best.map(|(i, _)| i)
}

fn nearest_by_distance(candidates: &[ArmorCandidate]) -> Result<Option<usize>, SelectError> {
    let mut best: Option<(usize, f32)> = None;
    for (index, c) in candidates.iter().enumerate() {
        let d = c
            .distance
            .filter(|d| d.is_finite())
            .ok_or(SelectError::MissingDistance { index })?;
        if best.map(|(_, bd)| d < bd).unwrap_or(true) {
            best = Some((index, d));
        }
    }
    Ok(best.map(|(i, _)| i))
}

fn ensure_recognized(
    candidates: &[ArmorCandidate],
    policy: SelectionPolicy,
) -> Result<(), SelectError> {
    if candidates
        .iter()
        .any(|c| c.digit == DigitReading::NotRecognized)
    {
        return Err(SelectError::DigitRecognitionUnavailable { policy });
    }
    Ok(())
}

fn fixed_digit(
    candidates: &[ArmorCandidate],
    args: &PolicyArgs,
) -> Result<Option<usize>, SelectError> {
    let target = args.target_digit.ok_or(SelectError::MissingTargetDigit)?;
    ensure_recognized(candidates, SelectionPolicy::FixedDigit)?;
    let matching = (0..candidates.len()).filter(|&i| candidates[i].digit.digit() == Some(target));
    Ok(nearest_to(candidates, matching, args.aim_point))
}

/// Majority vote over the history window, then nearest to the aim point,
/// then lowest index.
fn auto_digit(
    candidates: &[ArmorCandidate],
    args: &PolicyArgs,
    history: &mut DigitHistory,
) -> Result<Option<usize>, SelectError> {
    ensure_recognized(candidates, SelectionPolicy::AutoDigit)?;
    history.push_frame(candidates.iter().filter_map(|c| c.digit.digit()));

    let counts = history.counts();
    let votes = |i: usize| {
        candidates[i]
            .digit
            .digit()
            .and_then(|d| counts.get(&d).copied())
    };
    let Some(best_votes) = (0..candidates.len()).filter_map(votes).max() else {
        return Ok(None);
    };
    let leaders = (0..candidates.len()).filter(|&i| votes(i) == Some(best_votes));
    Ok(nearest_to(candidates, leaders, args.aim_point))
}

/// Pick one armor candidate according to `policy`.
///
/// An empty candidate list yields a selection with `index == None`; the
/// auto-digit policy still records the frame in the context history.
#[cfg_attr(
    feature = "tracing",
    instrument(level = "debug", skip(candidates, args, ctx), fields(candidates = candidates.len(), policy = %policy))
)]
pub fn select(
    candidates: &[ArmorCandidate],
    policy: SelectionPolicy,
    args: &PolicyArgs,
    ctx: &mut SelectionContext,
) -> Result<Selection, SelectError> {
    let index = match policy {
        SelectionPolicy::NearestToCenter => {
            nearest_to(candidates, 0..candidates.len(), args.aim_point)
        }
        SelectionPolicy::NearestByDistance => nearest_by_distance(candidates)?,
        SelectionPolicy::FixedDigit => fixed_digit(candidates, args)?,
        SelectionPolicy::AutoDigit => auto_digit(candidates, args, &mut ctx.history)?,
    };
    trace!(
        "{policy}: selected {:?} of {} candidates",
        index,
        candidates.len()
    );
    Ok(Selection::new(policy, index))
}

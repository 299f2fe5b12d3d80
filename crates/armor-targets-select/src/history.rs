//! Bounded per-frame digit history for majority-vote target locking.

use std::collections::{BTreeMap, VecDeque};

/// Default window length, in frames.
pub const DEFAULT_HISTORY_FRAMES: usize = 10;

/// Ring buffer of the digits recognized in the most recent frames.
///
/// Each entry holds the digits seen in one frame; an empty entry records a
/// frame with no recognized digit. Pushing past capacity evicts the oldest
/// frame.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DigitHistory {
    capacity: usize,
    frames: VecDeque<Vec<u8>>,
}

impl Default for DigitHistory {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_FRAMES)
    }
}

impl DigitHistory {
    /// A capacity of zero is raised to one frame.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            capacity,
            frames: VecDeque::with_capacity(capacity),
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Number of frames currently held.
    pub fn len(&self) -> usize {
        self.frames.len()
    }

    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn clear(&mut self) {
        self.frames.clear();
    }

    /// Record one frame's digits.
    pub fn push_frame(&mut self, digits: impl IntoIterator<Item = u8>) {
        if self.frames.len() == self.capacity {
            self.frames.pop_front();
        }
        self.frames.push_back(digits.into_iter().collect());
    }

    /// Frames oldest first; `&[]` marks a frame without digits.
    pub fn frames(&self) -> impl Iterator<Item = &[u8]> {
        self.frames.iter().map(Vec::as_slice)
    }

    /// Occurrences of `digit` across the window.
    pub fn count(&self, digit: u8) -> usize {
        self.frames
            .iter()
            .map(|f| f.iter().filter(|&&d| d == digit).count())
            .sum()
    }

    pub fn counts(&self) -> BTreeMap<u8, usize> {
        let mut counts = BTreeMap::new();
        for &d in self.frames.iter().flatten() {
            *counts.entry(d).or_insert(0) += 1;
        }
        counts
    }
}

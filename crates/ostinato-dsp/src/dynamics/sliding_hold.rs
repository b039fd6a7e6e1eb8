//! Sliding-window maximum used as the compressor's peak hold.
//!
//! Follows the input with an instant attack, holds each peak for `length`
//! samples, then drops to the next highest value still inside the window.
//! The window is kept as a run of descending maxima in a fixed circular
//! array: `upper` is the current maximum, `lower` the most recent entry, and
//! values are non-increasing from `upper` to `lower`. A new sample evicts
//! every entry it dominates, so each sample is pushed and popped at most once.
//!
//! Sample indices are block-relative; call [`SlidingHold::shift`] after each
//! block to rebase the stored expiries.

use ostinato_core::MAX_BLOCK_LENGTH;

const MASK: usize = MAX_BLOCK_LENGTH - 1;

#[derive(Clone)]
pub struct SlidingHold {
    values: [f32; MAX_BLOCK_LENGTH],
    expiries: [usize; MAX_BLOCK_LENGTH],
    lower: usize,
    upper: usize,
    length: usize,
}

impl SlidingHold {
    /// Create a hold of `length` samples, clamped to `2..MAX_BLOCK_LENGTH`.
    ///
    /// A one-sample hold would only echo its input, and the newest entry
    /// must outlive the current sample for the index walk to stay in range.
    pub fn new(length: usize) -> Self {
        let length = length.clamp(2, MAX_BLOCK_LENGTH - 1);
        let mut values = [0.0; MAX_BLOCK_LENGTH];
        let mut expiries = [0; MAX_BLOCK_LENGTH];
        values[0] = f32::NEG_INFINITY;
        expiries[0] = length;

        Self {
            values,
            expiries,
            lower: 0,
            upper: 0,
            length,
        }
    }

    pub fn length(&self) -> usize {
        self.length
    }

    /// Push sample `input` at block index `i` and return the window maximum.
    #[inline]
    pub fn update(&mut self, i: usize, input: f32) -> f32 {
        let mut lower = self.lower;
        let mut upper = self.upper;

        if i >= self.expiries[upper] {
            upper = (upper + 1) & MASK;
        }

        if input >= self.values[upper] {
            self.values[upper] = input;
            self.expiries[upper] = i + self.length;
            lower = upper;
        } else {
            // values[upper] > input, so the walk stops before passing it
            while input >= self.values[lower] {
                lower = lower.wrapping_sub(1) & MASK;
            }
            lower = (lower + 1) & MASK;
            self.values[lower] = input;
            self.expiries[lower] = i + self.length;
        }

        self.lower = lower;
        self.upper = upper;
        self.values[upper]
    }

    /// Rebase live expiries after a block of `n` samples.
    pub fn shift(&mut self, n: usize) {
        let mut start = self.upper;
        if self.lower < self.upper {
            for e in &mut self.expiries[start..] {
                *e = e.saturating_sub(n);
            }
            start = 0;
        }
        for e in &mut self.expiries[start..=self.lower] {
            *e = e.saturating_sub(n);
        }
    }

    /// Current window maximum without pushing a sample.
    pub fn peak(&self) -> f32 {
        self.values[self.upper]
    }
}

impl core::fmt::Debug for SlidingHold {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("SlidingHold")
            .field("length", &self.length)
            .field("lower", &self.lower)
            .field("upper", &self.upper)
            .field("peak", &self.peak())
            .finish()
    }
}

//! Compressor construction parameters.

use serde::{Deserialize, Serialize};

use super::compressor::Compressor;

/// Independent automation switches for the gain computer.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AutoFlags {
    /// Vary knee width from the gain deviation. Turns the stage into a limiter.
    pub knee: bool,
    /// Scale attack time by the crest factor.
    pub attack: bool,
    /// Scale release time by the crest factor.
    pub release: bool,
    /// Derive make-up gain from the gain deviation.
    pub post_gain: bool,
    /// Push the deviation up when the output would still clip.
    /// Only effective together with `post_gain`.
    pub declip: bool,
}

impl AutoFlags {
    pub const NONE: Self = Self {
        knee: false,
        attack: false,
        release: false,
        post_gain: false,
        declip: false,
    };

    pub const ALL: Self = Self {
        knee: true,
        attack: true,
        release: true,
        post_gain: true,
        declip: true,
    };

    pub fn knee(mut self, on: bool) -> Self {
        self.knee = on;
        self
    }

    pub fn attack(mut self, on: bool) -> Self {
        self.attack = on;
        self
    }

    pub fn release(mut self, on: bool) -> Self {
        self.release = on;
        self
    }

    pub fn post_gain(mut self, on: bool) -> Self {
        self.post_gain = on;
        self
    }

    pub fn declip(mut self, on: bool) -> Self {
        self.declip = on;
        self
    }

    /// Flags as the gain computer sees them.
    pub(crate) fn effective(self) -> Self {
        Self {
            declip: self.declip && self.post_gain,
            ..self
        }
    }
}

/// Builder for a [`Compressor`], serializable as a preset.
///
/// All times are in seconds and levels in decibels. Nothing is rejected:
/// [`build`](Self::build) clamps out-of-range values.
///
/// ```
/// use ostinato_dsp::{AutoFlags, CompressorSettings};
///
/// let comp = CompressorSettings::default()
///     .channels(2)
///     .sample_rate(48000.0)
///     .threshold_db(-18.0)
///     .ratio(4.0)
///     .look_ahead_seconds(0.001)
///     .auto(AutoFlags::NONE.attack(true).release(true))
///     .build();
///
/// assert_eq!(comp.look_ahead(), 48);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CompressorSettings {
    pub channels: usize,
    pub sample_rate: f32,
    pub auto: AutoFlags,
    pub look_ahead_seconds: f32,
    pub hold_seconds: f32,
    pub pre_gain_db: f32,
    pub post_gain_db: f32,
    pub threshold_db: f32,
    pub ratio: f32,
    pub knee_db: f32,
    pub attack_seconds: f32,
    pub release_seconds: f32,
}

impl Default for CompressorSettings {
    fn default() -> Self {
        Self {
            channels: 2,
            sample_rate: 44100.0,
            auto: AutoFlags::NONE,
            look_ahead_seconds: 0.0,
            hold_seconds: 0.0,
            pre_gain_db: 0.0,
            post_gain_db: 0.0,
            threshold_db: -20.0,
            ratio: 4.0,
            knee_db: 0.0,
            attack_seconds: 0.005,
            release_seconds: 0.1,
        }
    }
}

impl CompressorSettings {
    /// Output limiter: every automation on, 1 ms look-ahead, 2 ms hold,
    /// a ratio large enough for a flat slope, threshold just under full scale.
    ///
    /// The ratio stays finite so the preset survives a JSON round trip.
    pub fn limiter(channels: usize, sample_rate: f32) -> Self {
        Self {
            channels,
            sample_rate,
            auto: AutoFlags::ALL,
            look_ahead_seconds: 0.001,
            hold_seconds: 0.002,
            pre_gain_db: 0.0,
            post_gain_db: 0.0,
            threshold_db: -0.000_17,
            ratio: f32::MAX,
            knee_db: 0.0,
            attack_seconds: 0.02,
            release_seconds: 0.2,
        }
    }

    pub fn channels(mut self, channels: usize) -> Self {
        self.channels = channels;
        self
    }

    pub fn sample_rate(mut self, sample_rate: f32) -> Self {
        self.sample_rate = sample_rate;
        self
    }

    pub fn auto(mut self, flags: AutoFlags) -> Self {
        self.auto = flags;
        self
    }

    /// Look-ahead delay; also the latency the stage adds.
    pub fn look_ahead_seconds(mut self, seconds: f32) -> Self {
        self.look_ahead_seconds = seconds;
        self
    }

    /// Peak hold. Only used together with look-ahead.
    pub fn hold_seconds(mut self, seconds: f32) -> Self {
        self.hold_seconds = seconds;
        self
    }

    pub fn pre_gain_db(mut self, db: f32) -> Self {
        self.pre_gain_db = db;
        self
    }

    /// Make-up gain. Replaced by the automatic estimate when `auto.post_gain` is set.
    pub fn post_gain_db(mut self, db: f32) -> Self {
        self.post_gain_db = db;
        self
    }

    pub fn threshold_db(mut self, db: f32) -> Self {
        self.threshold_db = db;
        self
    }

    /// Compression ratio, `>= 1`. Ignored when `auto.knee` is set.
    pub fn ratio(mut self, ratio: f32) -> Self {
        self.ratio = ratio;
        self
    }

    pub fn knee_db(mut self, db: f32) -> Self {
        self.knee_db = db;
        self
    }

    pub fn attack_seconds(mut self, seconds: f32) -> Self {
        self.attack_seconds = seconds;
        self
    }

    pub fn release_seconds(mut self, seconds: f32) -> Self {
        self.release_seconds = seconds;
        self
    }

    /// Build the configured Compressor
    pub fn build(&self) -> Compressor {
        Compressor::new(self)
    }
}

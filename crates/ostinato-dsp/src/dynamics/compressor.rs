//! Feed-forward multichannel compressor/limiter with look-ahead.
//!
//! Each [`process`](Compressor::process) call runs a fixed pipeline over one
//! block: pre-gain, channel linking (max `|x|` across channels), optional
//! crest-factor estimation, log-domain peak (or peak-hold) detection, the
//! gain computer with its ballistics and automation, the look-ahead delay,
//! and finally the per-sample gain multiply. The side-chain buffer holds
//! `look_ahead` samples of history in front of the current block so gain can
//! be computed from samples the delayed output has not reached yet.
//!
//! Levels inside the side-chain are natural-log amplitudes until the gain
//! computer replaces them with linear gains.

use ostinato_core::{Arc, AtomicFloat, MAX_BLOCK_LENGTH};

use super::settings::{AutoFlags, CompressorSettings};
use super::sliding_hold::SlidingHold;
use super::utils::{
    db_to_amplitude, db_to_log, lerp, log_to_db, samples_to_coeff, seconds_to_block_samples,
    AMPLITUDE_FLOOR,
};

/// Squared-level clamp used by the crest detector.
const CREST_FLOOR: f32 = 0.000_001;
const CREST_CEILING: f32 = 1_000_000.0;

/// Crest detector release, seconds.
const CREST_TIME: f32 = 0.2;
/// Deviation tracker time constant, seconds.
const ADAPT_TIME: f32 = 2.0;

pub struct Compressor {
    channels: usize,
    auto: AutoFlags,
    look_ahead: usize,

    pre_gain: f32,
    post_gain: f32,
    threshold: f32,
    slope: f32,
    knee: f32,
    attack: f32,
    release: f32,

    crest_coeff: f32,
    gain_estimate: f32,
    adapt_coeff: f32,

    last_peak_sq: f32,
    last_rms_sq: f32,
    last_release: f32,
    last_attack: f32,
    last_gain_dev: f32,

    side_chain: Vec<f32>,
    crest_factor: Vec<f32>,
    hold: Option<Box<SlidingHold>>,
    delay: Vec<Vec<f32>>,

    gain_reduction: Arc<AtomicFloat>,
}

impl Compressor {
    /// Create a builder for configuring a compressor
    pub fn builder() -> CompressorSettings {
        CompressorSettings::default()
    }

    /// Derive sample counts and log-domain levels from `settings`.
    ///
    /// All buffers are allocated here; `process` never allocates.
    pub fn new(settings: &CompressorSettings) -> Self {
        let sample_rate = settings.sample_rate.max(1.0);
        let auto = settings.auto.effective();

        let look_ahead = seconds_to_block_samples(settings.look_ahead_seconds, sample_rate);
        let hold_len = seconds_to_block_samples(settings.hold_seconds, sample_rate);

        let threshold = db_to_log(settings.threshold_db);
        let slope = if auto.knee {
            -1.0
        } else {
            1.0 / settings.ratio.max(1.0) - 1.0
        };

        let (hold, delay) = if look_ahead > 0 {
            let hold = (hold_len > 1).then(|| Box::new(SlidingHold::new(hold_len)));
            (hold, vec![vec![0.0; look_ahead]; settings.channels])
        } else {
            (None, Vec::new())
        };

        // look-ahead history starts as silence
        let mut side_chain = vec![0.0; MAX_BLOCK_LENGTH + look_ahead];
        side_chain[..look_ahead].fill(AMPLITUDE_FLOOR.ln());

        let comp = Self {
            channels: settings.channels,
            auto,
            look_ahead,

            pre_gain: db_to_amplitude(settings.pre_gain_db),
            post_gain: db_to_log(settings.post_gain_db),
            threshold,
            slope,
            knee: db_to_log(settings.knee_db).max(0.0),
            attack: (settings.attack_seconds * sample_rate).max(1.0),
            release: (settings.release_seconds * sample_rate).max(1.0),

            crest_coeff: samples_to_coeff(CREST_TIME * sample_rate),
            gain_estimate: threshold * -0.5 * slope,
            adapt_coeff: samples_to_coeff(ADAPT_TIME * sample_rate),

            last_peak_sq: 0.0,
            last_rms_sq: 0.0,
            last_release: 0.0,
            last_attack: 0.0,
            last_gain_dev: 0.0,

            side_chain,
            crest_factor: vec![0.0; MAX_BLOCK_LENGTH],
            hold,
            delay,

            gain_reduction: Arc::new(AtomicFloat::new(0.0)),
        };

        tracing::debug!(
            channels = comp.channels,
            look_ahead = comp.look_ahead,
            hold = comp.hold.as_ref().map_or(0, |h| h.length()),
            attack = comp.attack,
            release = comp.release,
            auto = ?comp.auto,
            "compressor created"
        );
        comp
    }

    /// Look-ahead in samples. The output is delayed by exactly this much.
    pub fn look_ahead(&self) -> usize {
        self.look_ahead
    }

    pub fn channels(&self) -> usize {
        self.channels
    }

    pub fn auto(&self) -> AutoFlags {
        self.auto
    }

    /// Shared meter: deepest gain reduction of the last block in dB (`>= 0`),
    /// excluding make-up gain.
    pub fn gain_reduction_meter(&self) -> Arc<AtomicFloat> {
        Arc::clone(&self.gain_reduction)
    }

    pub fn gain_reduction_db(&self) -> f32 {
        self.gain_reduction.get()
    }

    /// Compress `sample_count` samples of every channel in place.
    ///
    /// `buffers` holds one sequence per channel; only the first
    /// [`channels`](Self::channels) are touched. The block is clamped to
    /// [`MAX_BLOCK_LENGTH`] and to the shortest buffer. State carries over,
    /// so blocks must be passed in stream order.
    pub fn process<B: AsMut<[f32]>>(&mut self, sample_count: usize, buffers: &mut [B]) {
        let channels = self.channels.min(buffers.len());
        let buffers = &mut buffers[..channels];
        let n = buffers
            .iter_mut()
            .fold(sample_count.min(MAX_BLOCK_LENGTH), |n, b| n.min(b.as_mut().len()));
        if n == 0 || buffers.is_empty() {
            return;
        }

        if self.pre_gain != 1.0 {
            for buffer in buffers.iter_mut() {
                for s in &mut buffer.as_mut()[..n] {
                    *s *= self.pre_gain;
                }
            }
        }

        self.link_channels(n, buffers);

        if self.auto.attack || self.auto.release {
            self.crest_detector(n);
        }

        if self.hold.is_some() {
            self.peak_hold_detector(n);
        } else {
            self.peak_detector(n);
        }

        self.gain_compressor(n);

        if self.look_ahead > 0 {
            self.signal_delay(n, buffers);
        }

        let gains = &self.side_chain[..n];
        for buffer in buffers.iter_mut() {
            for (s, g) in buffer.as_mut()[..n].iter_mut().zip(gains) {
                *s *= g;
            }
        }

        let la = self.look_ahead;
        self.side_chain.copy_within(n..n + la, 0);
    }

    /// Side-chain level: max `|x|` over all channels.
    fn link_channels<B: AsMut<[f32]>>(&mut self, n: usize, buffers: &mut [B]) {
        let side_chain = &mut self.side_chain[self.look_ahead..self.look_ahead + n];
        side_chain.fill(0.0);

        for buffer in buffers.iter_mut() {
            for (sc, &x) in side_chain.iter_mut().zip(&buffer.as_mut()[..n]) {
                *sc = sc.max(x.abs());
            }
        }
    }

    /// Squared crest factor (peak² / RMS²) of the linear side-chain.
    fn crest_detector(&mut self, n: usize) {
        let a_crest = self.crest_coeff;
        let mut y2_peak = self.last_peak_sq;
        let mut y2_rms = self.last_rms_sq;

        let side_chain = &self.side_chain[self.look_ahead..self.look_ahead + n];
        for (crest, &x_abs) in self.crest_factor.iter_mut().zip(side_chain) {
            let x2 = (x_abs * x_abs).clamp(CREST_FLOOR, CREST_CEILING);
            y2_peak = x2.max(lerp(x2, y2_peak, a_crest));
            y2_rms = lerp(x2, y2_rms, a_crest);
            *crest = y2_peak / y2_rms;
        }

        self.last_peak_sq = y2_peak;
        self.last_rms_sq = y2_rms;
    }

    fn peak_detector(&mut self, n: usize) {
        for s in &mut self.side_chain[self.look_ahead..self.look_ahead + n] {
            *s = s.max(AMPLITUDE_FLOOR).ln();
        }
    }

    fn peak_hold_detector(&mut self, n: usize) {
        let Some(hold) = self.hold.as_deref_mut() else {
            return;
        };
        let side_chain = &mut self.side_chain[self.look_ahead..self.look_ahead + n];
        for (i, s) in side_chain.iter_mut().enumerate() {
            *s = hold.update(i, s.max(AMPLITUDE_FLOOR).ln());
        }
        hold.shift(n);
    }

    /// Static curve, ballistics and automation. Rewrites `side_chain[..n]`
    /// with linear gains; `side_chain[la + i]` is the level `la` samples ahead.
    fn gain_compressor(&mut self, n: usize) {
        let auto = self.auto;
        let threshold = self.threshold;
        let slope = self.slope;
        let attack = self.attack;
        let release = self.release;
        let c_est = self.gain_estimate;
        let a_adp = self.adapt_coeff;
        let la = self.look_ahead;

        let mut post_gain = self.post_gain;
        let mut knee = self.knee;
        let mut t_att = attack;
        let mut t_rel = (release - attack).max(1.0);
        let mut a_att = samples_to_coeff(t_att);
        let mut a_rel = samples_to_coeff(t_rel);
        let mut y_1 = self.last_release;
        let mut y_l = self.last_attack;
        let mut c_dev = self.last_gain_dev;
        let mut deepest = 0.0f32;

        let side_chain = &mut self.side_chain[..la + n];
        for i in 0..n {
            let input = side_chain[i];

            if auto.knee {
                knee = (2.5 * (c_dev + c_est)).max(0.0);
            }
            let knee_h = 0.5 * knee;

            let x_over = side_chain[la + i] - threshold;
            let y_g = if x_over <= -knee_h {
                0.0
            } else if x_over.abs() < knee_h {
                (x_over + knee_h) * (x_over + knee_h) / (2.0 * knee)
            } else {
                x_over
            };

            if auto.attack || auto.release {
                let y2_crest = self.crest_factor[i];
                if auto.attack {
                    t_att = 2.0 * attack / y2_crest;
                    a_att = samples_to_coeff(t_att);
                }
                if auto.release {
                    t_rel = (2.0 * release / y2_crest - t_att).max(1.0);
                    a_rel = samples_to_coeff(t_rel);
                }
            }

            // Decoupled peak detector; release branch feeds the attack branch.
            let x_l = -slope * y_g;
            y_1 = x_l.max(lerp(x_l, y_1, a_rel));
            y_l = lerp(y_1, y_l, a_att);

            c_dev = lerp(-(y_l + c_est), c_dev, a_adp);

            if auto.post_gain {
                if auto.declip {
                    c_dev = c_dev.max(input - y_l - threshold - c_est);
                }
                post_gain = -(c_dev + c_est);
            }

            deepest = deepest.max(y_l);
            side_chain[i] = (post_gain - y_l).exp();
        }

        self.last_release = y_1;
        self.last_attack = y_l;
        self.last_gain_dev = c_dev;
        self.gain_reduction.set(log_to_db(deepest));
    }

    /// Delay every channel by `look_ahead` samples, in place.
    fn signal_delay<B: AsMut<[f32]>>(&mut self, n: usize, buffers: &mut [B]) {
        let la = self.look_ahead;

        for (buffer, delay) in buffers.iter_mut().zip(self.delay.iter_mut()) {
            let inout = &mut buffer.as_mut()[..n];
            if n >= la {
                inout.rotate_right(la);
                inout[..la].swap_with_slice(delay);
            } else {
                inout.swap_with_slice(&mut delay[..n]);
                delay.rotate_left(n);
            }
        }
    }
}

impl core::fmt::Debug for Compressor {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("Compressor")
            .field("channels", &self.channels)
            .field("look_ahead", &self.look_ahead)
            .field("hold", &self.hold.as_ref().map(|h| h.length()))
            .field("auto", &self.auto)
            .field("threshold", &self.threshold)
            .field("slope", &self.slope)
            .field("knee", &self.knee)
            .field("attack", &self.attack)
            .field("release", &self.release)
            .finish_non_exhaustive()
    }
}

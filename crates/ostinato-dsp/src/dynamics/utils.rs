//! Shared utilities for dynamics processors

use ostinato_core::MAX_BLOCK_LENGTH;

/// Natural-log units per decibel. The gain computer works in `ln` space.
pub(crate) const LN_PER_DB: f32 = core::f32::consts::LN_10 / 20.0;

/// Amplitude floor applied before taking logarithms.
pub(crate) const AMPLITUDE_FLOOR: f32 = 0.000_001;

/// Convert decibels to linear amplitude
#[inline]
pub fn db_to_amplitude(db: f32) -> f32 {
    10.0_f32.powf(db / 20.0)
}

/// Convert linear amplitude to decibels, floored at -120 dB
#[inline]
pub fn amplitude_to_db(amp: f32) -> f32 {
    20.0 * amp.max(AMPLITUDE_FLOOR).log10()
}

#[inline]
pub(crate) fn db_to_log(db: f32) -> f32 {
    db * LN_PER_DB
}

#[inline]
pub(crate) fn log_to_db(value: f32) -> f32 {
    value / LN_PER_DB
}

/// One-pole smoothing coefficient for a time constant given in samples.
#[inline]
pub(crate) fn samples_to_coeff(samples: f32) -> f32 {
    (-1.0 / samples).exp()
}

/// Seconds to a whole sample count that fits inside one block.
#[inline]
pub(crate) fn seconds_to_block_samples(seconds: f32, sample_rate: f32) -> usize {
    // NaN saturates to 0 in the cast
    (seconds * sample_rate)
        .round()
        .clamp(0.0, (MAX_BLOCK_LENGTH - 1) as f32) as usize
}

#[inline]
pub(crate) fn lerp(a: f32, b: f32, t: f32) -> f32 {
    a + t * (b - a)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_amplitude_db_conversion() {
        assert!((amplitude_to_db(1.0) - 0.0).abs() < 0.001);
        assert!((amplitude_to_db(0.5) - (-6.02)).abs() < 0.1);
        assert!((db_to_amplitude(0.0) - 1.0).abs() < 0.001);
        assert!((db_to_amplitude(-6.0) - 0.501).abs() < 0.01);
        assert_relative_eq!(amplitude_to_db(0.0), -120.0, epsilon = 1e-3);
    }

    #[test]
    fn test_log_domain_matches_decibels() {
        // ln(amplitude) == db * ln(10)/20
        let db = -12.0;
        assert_relative_eq!(db_to_log(db), db_to_amplitude(db).ln(), epsilon = 1e-5);
        assert_relative_eq!(log_to_db(db_to_log(db)), db, epsilon = 1e-4);
    }

    #[test]
    fn test_block_samples_are_clamped() {
        assert_eq!(seconds_to_block_samples(0.001, 48000.0), 48);
        assert_eq!(seconds_to_block_samples(-1.0, 48000.0), 0);
        assert_eq!(seconds_to_block_samples(10.0, 48000.0), MAX_BLOCK_LENGTH - 1);
        assert_eq!(seconds_to_block_samples(f32::NAN, 48000.0), 0);
    }

    #[test]
    fn test_coefficients() {
        assert!(samples_to_coeff(1.0) < 1.0);
        assert!(samples_to_coeff(1000.0) > samples_to_coeff(10.0));
        assert_relative_eq!(lerp(1.0, 3.0, 0.25), 1.5);
    }
}

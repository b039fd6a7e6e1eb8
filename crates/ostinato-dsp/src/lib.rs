//! Real-time DSP stages for Ostinato.
//!
//! The stages run on the audio thread: all buffers are sized at construction
//! and `process` never allocates, locks or logs. Metering is published through
//! [`ostinato_core::AtomicFloat`] so control threads can read it without
//! synchronizing with the audio callback.

pub mod dynamics;

pub use dynamics::{
    amplitude_to_db, db_to_amplitude, AutoFlags, Compressor, CompressorSettings, SlidingHold,
};

/// Largest block [`Compressor::process`] handles per call.
pub use ostinato_core::MAX_BLOCK_LENGTH;

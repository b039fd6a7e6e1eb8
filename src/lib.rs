//! # Ostinato - real-time audio building blocks
//!
//! Umbrella crate over:
//! - **ostinato-core** - wait-free SPSC [`RingBuffer`] transport, cache-aligned
//!   atomics, [`EngineConfig`], RT thread priority and data file search
//! - **ostinato-dsp** - feed-forward [`Compressor`]/limiter with look-ahead,
//!   sliding peak hold and parameter automation
//!
//! ## Quick Start
//!
//! ```
//! use ostinato::prelude::*;
//!
//! // audio thread side: a stereo limiter
//! let mut limiter = CompressorSettings::limiter(2, 48000.0).build();
//!
//! // mixer -> device: interleaved f32 frames
//! let (mut tx, mut rx) = RingBuffer::new(1024, 2 * 4, true)?.split();
//!
//! let frames = vec![0.5f32; 2 * 256];
//! assert_eq!(tx.write_pod(&frames[..]), 256);
//!
//! let mut interleaved = vec![0.0f32; 2 * 256];
//! assert_eq!(rx.read_pod(&mut interleaved[..]), 256);
//!
//! let mut block = vec![vec![0.0f32; 256]; 2];
//! for (i, frame) in interleaved.chunks_exact(2).enumerate() {
//!     block[0][i] = frame[0];
//!     block[1][i] = frame[1];
//! }
//! limiter.process(256, &mut block);
//! # Ok::<(), ostinato::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default) - [`RealtimePriority`] and [`DataFileSearch`]

/// Re-export of ostinato-core for direct access
pub use ostinato_core as core;

/// Re-export of ostinato-dsp for direct access
pub use ostinato_dsp as dsp;

mod error;
pub use error::{Error, Result};

// Transport and lock-free primitives
pub use ostinato_core::{
    AtomicFloat, CachePadded, Consumer, EngineConfig, Producer, ReadVector, RingBuffer,
    WriteVector, MAX_BLOCK_LENGTH, MAX_PRIORITY_LEVEL,
};

// Platform collaborators
#[cfg(feature = "std")]
pub use ostinato_core::{
    DataFileSearch, PriorityOutcome, PriorityStrategy, RealtimePriority, ThreadSchedulingStrategy,
};

// Dynamics
pub use ostinato_dsp::{
    amplitude_to_db, db_to_amplitude, AutoFlags, Compressor, CompressorSettings, SlidingHold,
};

/// Convenience prelude for common imports
pub mod prelude {
    // Transport
    pub use crate::{Consumer, Producer, RingBuffer};

    // Dynamics
    pub use crate::{AutoFlags, Compressor, CompressorSettings};

    // Configuration
    pub use crate::{EngineConfig, MAX_BLOCK_LENGTH};

    // RT priority
    #[cfg(feature = "std")]
    pub use crate::RealtimePriority;
}

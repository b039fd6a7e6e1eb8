//! Dynamic-range processing.
//!
//! - [`Compressor`] - feed-forward multichannel compressor/limiter with
//!   look-ahead, peak hold and parameter automation
//! - [`CompressorSettings`] / [`AutoFlags`] - serializable construction parameters
//! - [`SlidingHold`] - sliding-window maximum used as the peak hold
//!
//! ## Example
//!
//! ```
//! use ostinato_dsp::{AutoFlags, Compressor};
//!
//! let mut comp = Compressor::builder()
//!     .channels(2)
//!     .sample_rate(48000.0)
//!     .threshold_db(-12.0)
//!     .ratio(4.0)
//!     .auto(AutoFlags::NONE.post_gain(true))
//!     .build();
//!
//! let mut block = vec![vec![0.25f32; 256]; 2];
//! comp.process(256, &mut block);
//! ```

mod utils;

mod compressor;
mod settings;
mod sliding_hold;

pub use compressor::Compressor;
pub use settings::{AutoFlags, CompressorSettings};
pub use sliding_hold::SlidingHold;
pub use utils::{amplitude_to_db, db_to_amplitude};

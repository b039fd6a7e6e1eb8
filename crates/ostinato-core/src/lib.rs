//! Real-time core primitives shared by every Ostinato subsystem.
//!
//! # Primary API
//!
//! - [`RingBuffer`] / [`Producer`] / [`Consumer`]: wait-free SPSC transport
//! - [`AtomicFloat`], [`CachePadded`]: cache-line aligned lock-free cells
//! - [`EngineConfig`]: sample rate and RT priority settings
//!
//! # Feature-gated APIs
//!
//! - `"std"`: [`RealtimePriority`] thread elevation and [`DataFileSearch`]
//!   (enabled by default)
//!
//! # Example
//!
//! ```
//! use ostinato_core::RingBuffer;
//!
//! let (mut tx, mut rx) = RingBuffer::new(100, 4, true)?.split();
//! assert_eq!(tx.write_space(), 127);
//!
//! let frames = [0u8; 4 * 50];
//! assert_eq!(tx.write(&frames), 50);
//!
//! let mut out = [0u8; 4 * 20];
//! assert_eq!(rx.read(&mut out), 20);
//! assert_eq!(rx.read_space(), 30);
//! # Ok::<(), ostinato_core::Error>(())
//! ```

#![no_std]

#[cfg(feature = "std")]
extern crate std;

#[macro_use]
extern crate alloc;

pub mod error;
pub use error::{Error, Result};

pub mod compat;
pub use compat::{Arc, AtomicUsize, Ordering};

pub(crate) mod lockfree;
pub use lockfree::{AtomicFloat, CachePadded};

pub mod ringbuffer;
pub use ringbuffer::{Consumer, Producer, ReadVector, RingBuffer, WriteVector};

mod config;
pub use config::{EngineConfig, MAX_BLOCK_LENGTH, MAX_PRIORITY_LEVEL};

#[cfg(feature = "std")]
pub mod priority;
#[cfg(feature = "std")]
pub use priority::{PriorityOutcome, PriorityStrategy, RealtimePriority, ThreadSchedulingStrategy};

#[cfg(feature = "std")]
pub mod datafiles;
#[cfg(feature = "std")]
pub use datafiles::DataFileSearch;

//! Wait-free single-producer/single-consumer ring buffer.
//!
//! Moves fixed-size elements (opaque byte records) between exactly one
//! producer thread and one consumer thread without locks, allocation or
//! retry loops. All counts and offsets are in elements, not bytes.
//!
//! - [`RingBuffer`] - owns the storage; create it, then [`split`](RingBuffer::split) it
//! - [`Producer`] - write side (`write`, `write_vector` + `write_advance`)
//! - [`Consumer`] - read side (`read`, `peek`, `read_vector` + `read_advance`)
//!
//! The handles are not `Clone` and every mutating call takes `&mut self`, so
//! the single-producer/single-consumer contract is enforced by the type
//! system rather than by documentation.
//!
//! ## Example
//!
//! ```
//! use ostinato_core::RingBuffer;
//!
//! let (mut tx, mut rx) = RingBuffer::new(256, 8, false)?.split();
//!
//! // Zero-copy write: fill the spans in place, then commit.
//! let mut span = tx.write_vector();
//! span.first[..8].copy_from_slice(&1.5f64.to_le_bytes());
//! drop(span);
//! tx.write_advance(1);
//!
//! let mut out = [0u8; 8];
//! assert_eq!(rx.read(&mut out), 1);
//! assert_eq!(f64::from_le_bytes(out), 1.5);
//! # Ok::<(), ostinato_core::Error>(())
//! ```

mod handles;
mod storage;
mod vector;

pub use handles::{Consumer, Producer};
pub use storage::RingBuffer;
pub use vector::{ReadVector, WriteVector};

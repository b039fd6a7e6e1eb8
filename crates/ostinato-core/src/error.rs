//! Error types for ostinato-core.

use crate::compat::String;
use thiserror::Error;

/// Error type for ostinato-core operations.
///
/// Only construction and configuration can fail; the real-time operations of
/// the ring buffer are total and never return errors.
#[derive(Error, Debug)]
pub enum Error {
    #[error("Invalid config: {0}")]
    InvalidConfig(String),

    #[error("Ring buffer of {requested} elements x {element_size} bytes overflows the address space")]
    CapacityOverflow {
        requested: usize,
        element_size: usize,
    },

    #[error("Failed to allocate {bytes} bytes of ring buffer storage")]
    Allocation { bytes: usize },

    #[error("Producer and consumer belong to different ring buffers")]
    ForeignHandle,

    #[cfg(feature = "std")]
    #[error("Thread priority: {0}")]
    Priority(String),
}

/// Result type alias.
pub type Result<T> = core::result::Result<T, Error>;

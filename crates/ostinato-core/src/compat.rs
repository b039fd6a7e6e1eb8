//! Compatibility layer for no_std + alloc.
//!
//! Re-exports common types that work in both std and no_std environments.

pub use alloc::{
    boxed::Box,
    string::{String, ToString},
    sync::Arc,
    vec::Vec,
};

pub use core::sync::atomic::{AtomicUsize, Ordering};

//! Ring buffer storage and cursor bookkeeping.

use super::handles::{Consumer, Producer};
use super::vector::{ReadVector, WriteVector};
use crate::compat::{Arc, AtomicUsize, Box, Ordering, Vec};
use crate::lockfree::CachePadded;
use crate::{Error, Result};
use core::fmt;
use core::ptr::{self, NonNull};

/// Fixed-capacity circular buffer of `element_size`-byte records.
///
/// Capacity is a power of two so positions wrap with a mask. The two cursors
/// are unbounded counters (wrapping on `usize` overflow), each written only by
/// its owning side and published with release stores; the other side reads it
/// with acquire loads, which makes element bytes written before a cursor
/// update visible after that update is observed.
pub struct RingBuffer {
    write_ptr: CachePadded<AtomicUsize>,
    read_ptr: CachePadded<AtomicUsize>,

    write_size: usize,
    size_mask: usize,
    elem_size: usize,

    storage: Storage,
}

// SAFETY: the storage is only reached through the handles. The producer
// touches bytes in the free region and the consumer bytes in the filled
// region; the acquire/release cursor protocol keeps those regions disjoint.
unsafe impl Send for RingBuffer {}
unsafe impl Sync for RingBuffer {}

impl RingBuffer {
    /// Create a ring buffer holding at least `min_elements` records of
    /// `element_size` bytes.
    ///
    /// The element count is rounded up to the next power of two, even if it
    /// already is one, so the requested amount can always be written. With
    /// `limit_writes` one slot stays reserved and the writable limit is
    /// `capacity - 1`; otherwise the whole capacity is writable.
    pub fn new(min_elements: usize, element_size: usize, limit_writes: bool) -> Result<Self> {
        if min_elements == 0 || element_size == 0 {
            return Err(Error::InvalidConfig(format!(
                "ring buffer needs a non-zero size (elements={}, element_size={})",
                min_elements, element_size
            )));
        }

        let overflow = || Error::CapacityOverflow {
            requested: min_elements,
            element_size,
        };
        let capacity = min_elements
            .checked_add(1)
            .and_then(usize::checked_next_power_of_two)
            .ok_or_else(overflow)?;
        let bytes = capacity
            .checked_mul(element_size)
            .filter(|&b| b <= isize::MAX as usize)
            .ok_or_else(overflow)?;

        let storage = Storage::zeroed(bytes)?;
        let write_size = if limit_writes { capacity - 1 } else { capacity };

        tracing::debug!(
            capacity,
            element_size,
            write_limit = write_size,
            "created ring buffer"
        );

        Ok(Self {
            write_ptr: CachePadded::new(AtomicUsize::new(0)),
            read_ptr: CachePadded::new(AtomicUsize::new(0)),
            write_size,
            size_mask: capacity - 1,
            elem_size: element_size,
            storage,
        })
    }

    /// Split into the write and read handles.
    pub fn split(self) -> (Producer, Consumer) {
        let rb = Arc::new(self);
        (Producer::new(Arc::clone(&rb)), Consumer::new(rb))
    }

    /// Number of element slots in the storage (a power of two).
    #[inline]
    pub fn capacity(&self) -> usize {
        self.size_mask + 1
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.elem_size
    }

    /// Maximum number of elements that can be queued at once.
    #[inline]
    pub fn write_limit(&self) -> usize {
        self.write_size
    }

    /// Number of elements available for reading.
    #[inline]
    pub fn read_space(&self) -> usize {
        let w = self.write_ptr.load(Ordering::Acquire);
        let r = self.read_ptr.load(Ordering::Acquire);
        w.wrapping_sub(r)
    }

    /// Number of elements available for writing.
    #[inline]
    pub fn write_space(&self) -> usize {
        self.write_size - self.read_space()
    }

    /// Zero both cursors, discarding queued data.
    ///
    /// `&mut self` guarantees neither side is active; once split, use
    /// [`Producer::reset`].
    pub fn reset(&mut self) {
        self.clear_cursors();
    }

    pub(super) fn clear_cursors(&self) {
        self.write_ptr.store(0, Ordering::Release);
        self.read_ptr.store(0, Ordering::Release);
    }

    #[inline]
    pub(super) fn same_buffer(a: &Arc<Self>, b: &Arc<Self>) -> bool {
        Arc::ptr_eq(a, b)
    }

    /// Copy up to `src.len() / element_size` elements in. Producer side only.
    pub(super) fn write_from(&self, src: &[u8]) -> usize {
        let count = (src.len() / self.elem_size).min(self.write_space());
        if count == 0 {
            return 0;
        }

        let w = self.write_ptr.load(Ordering::Relaxed);
        let (start, n1, n2) = self.split_at_end(w, count);
        let bytes1 = n1 * self.elem_size;

        // SAFETY: `count <= write_space`, so [w, w + count) is free and owned
        // by the producer until the release store below.
        unsafe {
            self.span_mut(start, n1).copy_from_slice(&src[..bytes1]);
            self.span_mut(0, n2)
                .copy_from_slice(&src[bytes1..count * self.elem_size]);
        }

        self.write_ptr
            .store(w.wrapping_add(count), Ordering::Release);
        count
    }

    /// Copy up to `dest.len() / element_size` elements out without consuming
    /// them. Consumer side only.
    pub(super) fn peek_into(&self, dest: &mut [u8]) -> usize {
        let count = (dest.len() / self.elem_size).min(self.read_space());
        if count == 0 {
            return 0;
        }

        let r = self.read_ptr.load(Ordering::Relaxed);
        let (start, n1, n2) = self.split_at_end(r, count);
        let bytes1 = n1 * self.elem_size;

        // SAFETY: `count <= read_space`, so [r, r + count) was published by
        // the producer and will not be rewritten until the consumer advances.
        unsafe {
            dest[..bytes1].copy_from_slice(self.span(start, n1));
            dest[bytes1..count * self.elem_size].copy_from_slice(self.span(0, n2));
        }
        count
    }

    #[inline]
    pub(super) fn advance_read(&self, count: usize) {
        // a cursor past the other side would open spans beyond the storage
        let count = count.min(self.read_space());
        let r = self.read_ptr.load(Ordering::Relaxed);
        self.read_ptr.store(r.wrapping_add(count), Ordering::Release);
    }

    #[inline]
    pub(super) fn advance_write(&self, count: usize) {
        let count = count.min(self.write_space());
        let w = self.write_ptr.load(Ordering::Relaxed);
        self.write_ptr.store(w.wrapping_add(count), Ordering::Release);
    }

    /// Consumer side only; the spans stay valid until the next `read_advance`.
    pub(super) fn read_vector(&self) -> ReadVector<'_> {
        let count = self.read_space();
        let r = self.read_ptr.load(Ordering::Relaxed);
        let (start, n1, n2) = self.split_at_end(r, count);

        // SAFETY: the filled region belongs to the consumer.
        let (first, second) = unsafe { (self.span(start, n1), self.span(0, n2)) };
        ReadVector {
            first,
            second,
            element_size: self.elem_size,
        }
    }

    /// Producer side only; the spans stay valid until the next `write_advance`.
    pub(super) fn write_vector(&self) -> WriteVector<'_> {
        let count = self.write_space();
        let w = self.write_ptr.load(Ordering::Relaxed);
        let (start, n1, n2) = self.split_at_end(w, count);

        // SAFETY: the free region belongs to the producer, and `start..start+n1`
        // never overlaps `0..n2` because `n1 + n2 <= capacity`.
        let (first, second) = unsafe { (self.span_mut(start, n1), self.span_mut(0, n2)) };
        WriteVector {
            first,
            second,
            element_size: self.elem_size,
        }
    }

    /// Physical start index of `cursor` and the element counts before and
    /// after the end of the storage for a run of `count` elements.
    #[inline]
    fn split_at_end(&self, cursor: usize, count: usize) -> (usize, usize, usize) {
        let start = cursor & self.size_mask;
        let to_end = self.capacity() - start;
        if count > to_end {
            (start, to_end, count - to_end)
        } else {
            (start, count, 0)
        }
    }

    /// # Safety
    /// No writer may touch elements `[start, start + count)` while the slice lives.
    #[inline]
    unsafe fn span(&self, start: usize, count: usize) -> &[u8] {
        let offset = start * self.elem_size;
        core::slice::from_raw_parts(self.storage.ptr.as_ptr().add(offset), count * self.elem_size)
    }

    /// # Safety
    /// The caller must own elements `[start, start + count)` exclusively.
    #[allow(clippy::mut_from_ref)]
    #[inline]
    unsafe fn span_mut(&self, start: usize, count: usize) -> &mut [u8] {
        let offset = start * self.elem_size;
        core::slice::from_raw_parts_mut(
            self.storage.ptr.as_ptr().add(offset),
            count * self.elem_size,
        )
    }
}

impl fmt::Debug for RingBuffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RingBuffer")
            .field("capacity", &self.capacity())
            .field("element_size", &self.elem_size)
            .field("write_limit", &self.write_size)
            .field("read_space", &self.read_space())
            .finish()
    }
}

/// Byte arena allocated once at construction and released on drop.
struct Storage {
    ptr: NonNull<u8>,
    len: usize,
}

impl Storage {
    fn zeroed(len: usize) -> Result<Self> {
        let mut bytes = Vec::new();
        bytes
            .try_reserve_exact(len)
            .map_err(|_| Error::Allocation { bytes: len })?;
        bytes.resize(len, 0u8);

        let boxed: Box<[u8]> = bytes.into_boxed_slice();
        let ptr = NonNull::from(Box::leak(boxed)).cast::<u8>();
        Ok(Self { ptr, len })
    }
}

impl Drop for Storage {
    fn drop(&mut self) {
        // SAFETY: `ptr`/`len` came from `Box::leak` of a `Box<[u8]>` of this length.
        unsafe {
            drop(Box::from_raw(ptr::slice_from_raw_parts_mut(
                self.ptr.as_ptr(),
                self.len,
            )));
        }
    }
}

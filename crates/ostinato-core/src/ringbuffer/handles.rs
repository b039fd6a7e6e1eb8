//! Producer / consumer handles.

use super::storage::RingBuffer;
use super::vector::{ReadVector, WriteVector};
use crate::compat::Arc;
use crate::{Error, Result};
use bytemuck::Pod;

/// Write side of a [`RingBuffer`]. Exactly one exists per buffer.
#[derive(Debug)]
pub struct Producer {
    rb: Arc<RingBuffer>,
}

/// Read side of a [`RingBuffer`]. Exactly one exists per buffer.
#[derive(Debug)]
pub struct Consumer {
    rb: Arc<RingBuffer>,
}

impl Producer {
    pub(super) fn new(rb: Arc<RingBuffer>) -> Self {
        Self { rb }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.rb.capacity()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.rb.element_size()
    }

    /// Number of elements that can be written right now.
    #[inline]
    pub fn write_space(&self) -> usize {
        self.rb.write_space()
    }

    /// Number of elements queued and not yet consumed.
    #[inline]
    pub fn read_space(&self) -> usize {
        self.rb.read_space()
    }

    /// Copy at most `src.len() / element_size()` elements into the buffer.
    ///
    /// Returns the number of elements written, limited by `write_space()`.
    /// Never blocks and never writes a partial element.
    #[inline]
    pub fn write(&mut self, src: &[u8]) -> usize {
        self.rb.write_from(src)
    }

    /// [`write`](Self::write) for plain-old-data slices such as `f32` frames.
    ///
    /// `size_of::<T>() * src.len()` should be a multiple of `element_size()`;
    /// trailing bytes that do not form a whole element are ignored.
    #[inline]
    pub fn write_pod<T: Pod>(&mut self, src: &[T]) -> usize {
        self.rb.write_from(bytemuck::cast_slice(src))
    }

    /// Non-copying access to the writable region.
    ///
    /// Fill the spans in place, drop the view, then commit with
    /// [`write_advance`](Self::write_advance).
    #[inline]
    pub fn write_vector(&mut self) -> WriteVector<'_> {
        self.rb.write_vector()
    }

    /// Publish `count` elements written through [`write_vector`](Self::write_vector).
    ///
    /// Counts beyond the current write space are clamped to it.
    #[inline]
    pub fn write_advance(&mut self, count: usize) {
        self.rb.advance_write(count);
    }

    /// Zero both cursors, discarding queued data.
    ///
    /// Requires the matching consumer mutably, which proves that neither side
    /// is in the middle of an operation.
    pub fn reset(&mut self, consumer: &mut Consumer) -> Result<()> {
        if !RingBuffer::same_buffer(&self.rb, &consumer.rb) {
            return Err(Error::ForeignHandle);
        }
        self.rb.clear_cursors();
        Ok(())
    }
}

impl Consumer {
    pub(super) fn new(rb: Arc<RingBuffer>) -> Self {
        Self { rb }
    }

    #[inline]
    pub fn capacity(&self) -> usize {
        self.rb.capacity()
    }

    #[inline]
    pub fn element_size(&self) -> usize {
        self.rb.element_size()
    }

    /// Number of elements available for reading right now.
    #[inline]
    pub fn read_space(&self) -> usize {
        self.rb.read_space()
    }

    /// Number of free element slots.
    #[inline]
    pub fn write_space(&self) -> usize {
        self.rb.write_space()
    }

    /// Copy at most `dest.len() / element_size()` elements out and consume them.
    ///
    /// Returns the number of elements read, limited by `read_space()`.
    #[inline]
    pub fn read(&mut self, dest: &mut [u8]) -> usize {
        let count = self.rb.peek_into(dest);
        self.rb.advance_read(count);
        count
    }

    /// Like [`read`](Self::read) but leaves the elements queued.
    #[inline]
    pub fn peek(&self, dest: &mut [u8]) -> usize {
        self.rb.peek_into(dest)
    }

    /// [`read`](Self::read) into a plain-old-data slice.
    #[inline]
    pub fn read_pod<T: Pod>(&mut self, dest: &mut [T]) -> usize {
        self.read(bytemuck::cast_slice_mut(dest))
    }

    /// [`peek`](Self::peek) into a plain-old-data slice.
    #[inline]
    pub fn peek_pod<T: Pod>(&self, dest: &mut [T]) -> usize {
        self.peek(bytemuck::cast_slice_mut(dest))
    }

    /// Non-copying access to the readable region.
    ///
    /// Consume the spans in place, drop the view, then release them with
    /// [`read_advance`](Self::read_advance).
    #[inline]
    pub fn read_vector(&mut self) -> ReadVector<'_> {
        self.rb.read_vector()
    }

    /// Release `count` elements consumed through [`read_vector`](Self::read_vector).
    ///
    /// Counts beyond the current read space are clamped to it.
    #[inline]
    pub fn read_advance(&mut self, count: usize) {
        self.rb.advance_read(count);
    }
}

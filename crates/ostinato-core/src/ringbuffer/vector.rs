//! Non-copying views of the readable / writable regions.

/// Readable region of a ring buffer, split where it wraps past the physical
/// end of the storage. `second` is empty when the region does not wrap.
#[derive(Debug)]
pub struct ReadVector<'a> {
    pub first: &'a [u8],
    pub second: &'a [u8],
    pub(super) element_size: usize,
}

impl ReadVector<'_> {
    /// Number of whole elements covered by both spans.
    #[inline]
    pub fn len(&self) -> usize {
        (self.first.len() + self.second.len()) / self.element_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }
}

/// Writable region of a ring buffer, split where it wraps past the physical
/// end of the storage. `second` is empty when the region does not wrap.
///
/// Data written here becomes visible to the consumer only after
/// [`Producer::write_advance`](super::Producer::write_advance).
#[derive(Debug)]
pub struct WriteVector<'a> {
    pub first: &'a mut [u8],
    pub second: &'a mut [u8],
    pub(super) element_size: usize,
}

impl WriteVector<'_> {
    /// Number of whole elements covered by both spans.
    #[inline]
    pub fn len(&self) -> usize {
        (self.first.len() + self.second.len()) / self.element_size
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.first.is_empty()
    }

    /// Copy as many whole elements of `src` as fit, spanning the wrap.
    /// Returns the number of elements copied; commit them with `write_advance`.
    pub fn copy_from(&mut self, src: &[u8]) -> usize {
        let elems = (src.len() / self.element_size).min(self.len());
        let bytes = elems * self.element_size;
        let n1 = bytes.min(self.first.len());
        self.first[..n1].copy_from_slice(&src[..n1]);
        self.second[..bytes - n1].copy_from_slice(&src[n1..bytes]);
        elems
    }
}

//! Backing memory for a zpak context.

use crate::error::{Result, ZpakError};

/// Growable, owned archive buffer.
///
/// `len()` is the number of bytes in use, `capacity()` the number of bytes
/// reserved. All growth goes through fallible reservation, so an allocation
/// failure surfaces as [`ZpakError::Allocation`] and leaves the buffer as it
/// was.
#[derive(Debug)]
pub(crate) struct GrowBuffer {
    data: Vec<u8>,
    capacity: usize,
}

impl GrowBuffer {
    pub(crate) fn with_capacity(capacity: usize) -> Result<GrowBuffer> {
        let mut data = Vec::new();
        data.try_reserve_exact(capacity)
            .map_err(|source| ZpakError::Allocation {
                what: "internal buffer",
                size: capacity,
                source,
            })?;

        Ok(GrowBuffer { data, capacity })
    }

    /// Copies `blob` into a buffer of exactly its size.
    pub(crate) fn from_slice(blob: &[u8]) -> Result<GrowBuffer> {
        let mut buffer = GrowBuffer::with_capacity(blob.len())?;
        buffer.extend_from_slice(blob)?;
        Ok(buffer)
    }

    #[inline(always)]
    pub(crate) fn len(&self) -> usize {
        self.data.len()
    }

    #[inline(always)]
    pub(crate) fn capacity(&self) -> usize {
        self.capacity
    }

    #[inline(always)]
    pub(crate) fn remaining(&self) -> usize {
        self.capacity - self.data.len()
    }

    #[inline(always)]
    pub(crate) fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub(crate) fn extend_from_slice(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure(bytes.len(), 0)?;
        self.data.extend_from_slice(bytes);
        Ok(())
    }

    /// Makes room for at least `needed` more bytes. When the remaining
    /// capacity is short, the buffer grows by `max(needed, chunk)`.
    pub(crate) fn ensure(&mut self, needed: usize, chunk: usize) -> Result<()> {
        if needed <= self.remaining() {
            return Ok(());
        }

        let new_capacity = self
            .capacity
            .checked_add(needed.max(chunk))
            .ok_or(ZpakError::TooLarge {
                what: "archive",
                len: usize::MAX,
            })?;

        self.data
            .try_reserve_exact(new_capacity - self.data.len())
            .map_err(|source| ZpakError::Allocation {
                what: "extended buffer",
                size: new_capacity,
                source,
            })?;

        tracing::trace!(
            from = self.capacity,
            to = new_capacity,
            used = self.data.len(),
            "grew zpak buffer"
        );

        self.capacity = new_capacity;
        Ok(())
    }

    /// Zero-extends the used region by `len` bytes and returns the new bytes.
    /// The caller must have reserved the room with [`GrowBuffer::ensure`].
    pub(crate) fn claim(&mut self, len: usize) -> &mut [u8] {
        debug_assert!(len <= self.remaining());
        let start = self.data.len();
        self.data.resize(start + len, 0);
        &mut self.data[start..]
    }

    /// Shrinks the used region back to `len` bytes. Capacity is kept.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.data.truncate(len);
    }

    /// Exactly-sized copy of the used region.
    pub(crate) fn to_vec_exact(&self) -> Result<Vec<u8>> {
        let mut out = Vec::new();
        out.try_reserve_exact(self.data.len())
            .map_err(|source| ZpakError::Allocation {
                what: "zpak output buffer",
                size: self.data.len(),
                source,
            })?;
        out.extend_from_slice(&self.data);
        Ok(out)
    }
}

/// Where a context's bytes live.
///
/// Write access is only reachable through the `Owned` variant; a borrowed
/// blob is never handed out mutably.
#[derive(Debug, Default)]
pub(crate) enum Storage<'a> {
    #[default]
    Unbound,
    Owned(GrowBuffer),
    Borrowed(&'a [u8]),
}

impl<'a> Storage<'a> {
    #[inline(always)]
    pub(crate) fn bytes(&self) -> Option<&[u8]> {
        match self {
            Storage::Unbound => None,
            Storage::Owned(buffer) => Some(buffer.as_slice()),
            Storage::Borrowed(blob) => Some(*blob),
        }
    }

    #[inline(always)]
    pub(crate) fn is_bound(&self) -> bool {
        !matches!(self, Storage::Unbound)
    }
}

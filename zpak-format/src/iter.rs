use std::iter::FusedIterator;

use crate::error::{Result, ZpakError};
use crate::header::HEADER_SIZE;
use crate::record::RecordLayout;
use crate::{Compression, Zpak};

/// A validated view of one entry inside a [`Zpak`].
///
/// Borrows the context, so the context cannot be appended to while an entry is
/// alive.
#[derive(Clone, Copy)]
pub struct Entry<'z> {
    pub(crate) zpak: &'z Zpak<'z>,
    pub(crate) layout: RecordLayout,
    pub(crate) name: &'z str,
}

impl<'z> Entry<'z> {
    #[inline(always)]
    pub fn name(&self) -> &'z str {
        self.name
    }

    /// Uncompressed length of the payload.
    #[inline(always)]
    pub fn size(&self) -> usize {
        self.layout.header.size as usize
    }

    #[inline(always)]
    pub fn compressed_size(&self) -> usize {
        self.layout.header.compressed_size as usize
    }

    #[inline(always)]
    pub fn name_hash(&self) -> u64 {
        self.layout.header.name_hash
    }

    #[inline(always)]
    pub fn flags(&self) -> u32 {
        self.layout.header.flags
    }

    /// Byte offset of the record inside the archive. Can be handed back to
    /// [`Zpak::entry_at`].
    #[inline(always)]
    pub fn offset(&self) -> usize {
        self.layout.offset
    }

    /// Length of the whole record: header, name and stored payload.
    #[inline(always)]
    pub fn record_len(&self) -> usize {
        self.layout.header.record_len()
    }

    #[inline(always)]
    pub fn compression(&self) -> Compression {
        self.zpak.compression()
    }

    /// The payload as stored, before decompression.
    pub fn raw(&self) -> &'z [u8] {
        match self.zpak.storage.bytes() {
            Some(bytes) => &bytes[self.layout.payload_range()],
            None => &[],
        }
    }

    /// Decompresses the payload into a new buffer of exactly [`Entry::size`]
    /// bytes.
    pub fn read(&self) -> Result<Vec<u8>> {
        let result = self.read_vec();
        self.zpak.track(result)
    }

    /// Decompresses the payload into the front of `buf` and returns the number
    /// of bytes written.
    pub fn read_into(&self, buf: &mut [u8]) -> Result<usize> {
        let result = self.decompress(buf);
        self.zpak.track(result)
    }

    fn read_vec(&self) -> Result<Vec<u8>> {
        let size = self.size();
        let mut out = Vec::new();
        out.try_reserve_exact(size)
            .map_err(|source| ZpakError::Allocation {
                what: "entry output buffer",
                size,
                source,
            })?;
        out.resize(size, 0);

        self.decompress(&mut out)?;
        Ok(out)
    }

    fn decompress(&self, buf: &mut [u8]) -> Result<usize> {
        let size = self.size();
        if buf.len() < size {
            return Err(ZpakError::BufferTooSmall {
                needed: size,
                got: buf.len(),
            });
        }

        let compression = self.compression();
        let written = compression
            .decompress_into(&mut buf[..size], self.raw())
            .map_err(|source| ZpakError::Codec {
                codec: compression,
                name: self.name.to_string(),
                source,
            })?;

        if written != size {
            return Err(ZpakError::Corrupt {
                offset: self.layout.offset,
                reason: "decompressed length does not match entry size",
            });
        }

        tracing::trace!(entry = self.name, size, compression = %compression, "read entry");
        Ok(written)
    }
}

impl std::fmt::Debug for Entry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entry")
            .field("name", &self.name)
            .field("offset", &self.layout.offset)
            .field("header", &self.layout.header)
            .finish()
    }
}

/// Walks the entries of a [`Zpak`] in insertion order.
///
/// Stops at the end of the used region. A record that fails to parse is
/// yielded once as an error, after which the iterator is exhausted.
pub struct ZpakIter<'z> {
    zpak: &'z Zpak<'z>,
    offset: Option<usize>,
    done: bool,
}

impl<'z> ZpakIter<'z> {
    pub(crate) fn new(zpak: &'z Zpak<'z>) -> ZpakIter<'z> {
        ZpakIter {
            zpak,
            offset: None,
            done: false,
        }
    }
}

impl<'z> Iterator for ZpakIter<'z> {
    type Item = Result<Entry<'z>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        let len = self.zpak.len();
        let offset = *self.offset.get_or_insert(HEADER_SIZE);

        if offset >= len {
            self.done = true;
            return None;
        }

        match self.zpak.entry_at(offset) {
            Ok(entry) => {
                self.offset = Some(entry.layout.end());
                Some(Ok(entry))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

impl FusedIterator for ZpakIter<'_> {}

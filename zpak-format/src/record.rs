use std::ops::Range;

/// Serialized size of [`EntryHeader`].
pub const ENTRY_HEADER_SIZE: usize = 24;

/// Fixed-size header in front of every entry.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryHeader {
    /// Uncompressed payload length.
    pub size: u32,

    /// Stored payload length. May exceed `size` when the codec expands its input.
    pub compressed_size: u32,

    /// [`crate::name_hash`] of the entry name.
    pub name_hash: u64,

    /// Reserved, always written as zero.
    pub flags: u32,

    /// Length of the name including its NUL terminator.
    pub name_length: u32,
}

impl EntryHeader {
    /// Total on-disk length of the record: header, name and stored payload.
    #[inline(always)]
    pub fn record_len(&self) -> usize {
        ENTRY_HEADER_SIZE + self.name_length as usize + self.compressed_size as usize
    }
}

/// Location of one validated record inside a blob.
///
/// Only offsets are kept, so a layout stays meaningful after the owning
/// buffer has been reallocated.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct RecordLayout {
    pub(crate) offset: usize,
    pub(crate) header: EntryHeader,
}

impl RecordLayout {
    /// Name bytes without the terminator.
    #[inline(always)]
    pub(crate) fn name_range(&self) -> Range<usize> {
        let start = self.offset + ENTRY_HEADER_SIZE;
        start..start + self.header.name_length as usize - 1
    }

    #[inline(always)]
    pub(crate) fn payload_range(&self) -> Range<usize> {
        let start = self.offset + ENTRY_HEADER_SIZE + self.header.name_length as usize;
        start..start + self.header.compressed_size as usize
    }

    #[inline(always)]
    pub(crate) fn end(&self) -> usize {
        self.offset + self.header.record_len()
    }
}

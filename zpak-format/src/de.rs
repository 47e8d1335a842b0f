use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, ZpakError};
use crate::header::{ZpakHeader, HEADER_SIZE, MAGIC_BYTES, VERSION};
use crate::record::{EntryHeader, RecordLayout, ENTRY_HEADER_SIZE};
use crate::Compression;

/// Fixed-size structures read from a known offset. `buf` must hold at least
/// `SIZE` bytes; callers check lengths first.
pub(crate) trait Deserialize: Sized {
    const SIZE: usize;

    fn read(buf: &[u8]) -> Self;
}

impl Deserialize for ZpakHeader {
    const SIZE: usize = HEADER_SIZE;

    fn read(buf: &[u8]) -> Self {
        let mut magic_bytes = [0u8; 4];
        magic_bytes.copy_from_slice(&buf[0..4]);

        ZpakHeader {
            magic_bytes,
            version: buf[4],
            compression: Compression::from_id(buf[5]),
        }
    }
}

impl Deserialize for EntryHeader {
    const SIZE: usize = ENTRY_HEADER_SIZE;

    fn read(buf: &[u8]) -> Self {
        EntryHeader {
            size: LittleEndian::read_u32(&buf[0..4]),
            compressed_size: LittleEndian::read_u32(&buf[4..8]),
            name_hash: LittleEndian::read_u64(&buf[8..16]),
            flags: LittleEndian::read_u32(&buf[16..20]),
            name_length: LittleEndian::read_u32(&buf[20..24]),
        }
    }
}

/// Reads and validates the archive header. Magic and version are checked
/// before anything else in the blob is looked at.
pub(crate) fn read_header(blob: &[u8]) -> Result<ZpakHeader> {
    if blob.len() < HEADER_SIZE {
        return Err(ZpakError::TooShort { len: blob.len() });
    }

    let header = ZpakHeader::read(&blob[..ZpakHeader::SIZE]);

    if &header.magic_bytes != MAGIC_BYTES {
        return Err(ZpakError::InvalidMagic);
    }

    if header.version != VERSION {
        return Err(ZpakError::UnsupportedVersion(header.version));
    }

    if !header.compression.is_known() {
        return Err(ZpakError::UnsupportedCompression(header.compression.id()));
    }

    tracing::debug!(
        version = header.version,
        compression = %header.compression,
        bytes = HEADER_SIZE,
        "deserialized ZpakHeader"
    );

    Ok(header)
}

/// Reads the record starting at `offset`, checking every declared length
/// against the bytes actually present. Returns the record's layout and name.
pub(crate) fn read_record(
    blob: &[u8],
    offset: usize,
    compression: Compression,
) -> Result<(RecordLayout, &str)> {
    let remaining = blob.len().saturating_sub(offset);

    if remaining < EntryHeader::SIZE {
        return Err(ZpakError::Truncated {
            offset,
            needed: EntryHeader::SIZE,
            remaining,
        });
    }

    let header = EntryHeader::read(&blob[offset..offset + EntryHeader::SIZE]);

    let name_length = header.name_length as usize;
    if name_length < 2 {
        return Err(ZpakError::Corrupt {
            offset,
            reason: "entry name is empty",
        });
    }

    let with_name = ENTRY_HEADER_SIZE.saturating_add(name_length);
    if with_name > remaining {
        return Err(ZpakError::Truncated {
            offset,
            needed: with_name,
            remaining,
        });
    }

    let needed = with_name.saturating_add(header.compressed_size as usize);
    if needed > remaining {
        return Err(ZpakError::Truncated {
            offset,
            needed,
            remaining,
        });
    }

    if header.size == 0 || header.compressed_size == 0 {
        return Err(ZpakError::Corrupt {
            offset,
            reason: "entry has no data",
        });
    }

    if compression == Compression::Stored && header.size != header.compressed_size {
        return Err(ZpakError::Corrupt {
            offset,
            reason: "stored entry size does not match its stored length",
        });
    }

    if header.size as usize > compression.max_inflated(header.compressed_size as usize) {
        return Err(ZpakError::Corrupt {
            offset,
            reason: "entry size exceeds what its stored payload can decode to",
        });
    }

    let layout = RecordLayout { offset, header };
    let name = &blob[layout.name_range()];

    if blob[layout.name_range().end] != 0 {
        return Err(ZpakError::Corrupt {
            offset,
            reason: "entry name is not NUL-terminated",
        });
    }

    if name.contains(&0) {
        return Err(ZpakError::Corrupt {
            offset,
            reason: "entry name contains a NUL byte",
        });
    }

    let name = std::str::from_utf8(name).map_err(|_| ZpakError::Corrupt {
        offset,
        reason: "entry name is not valid UTF-8",
    })?;

    tracing::trace!(
        start = format_args!("{:#x}", offset),
        end = format_args!("{:#x}", layout.end()),
        bytes = layout.end() - offset,
        size = header.size,
        compressed_size = header.compressed_size,
        "deserialized EntryHeader"
    );

    Ok((layout, name))
}

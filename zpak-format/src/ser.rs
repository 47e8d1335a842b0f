use byteorder::{ByteOrder, LittleEndian};

use crate::error::{Result, ZpakError};
use crate::header::{ZpakHeader, HEADER_SIZE};
use crate::record::{EntryHeader, ENTRY_HEADER_SIZE};
use crate::{name_hash, Compression};

/// Fixed-size structures written at a known offset. `buf` must hold at least
/// `SIZE` bytes.
pub(crate) trait Serialize {
    const SIZE: usize;

    fn write(&self, buf: &mut [u8]);
}

impl Serialize for ZpakHeader {
    const SIZE: usize = HEADER_SIZE;

    fn write(&self, buf: &mut [u8]) {
        buf[0..4].copy_from_slice(&self.magic_bytes);
        buf[4] = self.version;
        buf[5] = self.compression.id();
    }
}

impl Serialize for EntryHeader {
    const SIZE: usize = ENTRY_HEADER_SIZE;

    fn write(&self, buf: &mut [u8]) {
        LittleEndian::write_u32(&mut buf[0..4], self.size);
        LittleEndian::write_u32(&mut buf[4..8], self.compressed_size);
        LittleEndian::write_u64(&mut buf[8..16], self.name_hash);
        LittleEndian::write_u32(&mut buf[16..20], self.flags);
        LittleEndian::write_u32(&mut buf[20..24], self.name_length);
    }
}

pub(crate) fn to_u32(len: usize, what: &'static str) -> Result<u32> {
    u32::try_from(len).map_err(|_| ZpakError::TooLarge { what, len })
}

/// Writes one record (header, NUL-terminated name, stored payload) at the
/// start of `region` and returns its header. `region` must be large enough for
/// the header, the name and the worst-case codec output; the codec failing to
/// fit is an error.
pub(crate) fn write_record(
    region: &mut [u8],
    name: &str,
    payload: &[u8],
    compression: Compression,
) -> Result<EntryHeader> {
    let name_length = name.len() + 1;
    let (head, rest) = region.split_at_mut(EntryHeader::SIZE);
    let (name_buf, payload_buf) = rest.split_at_mut(name_length);

    name_buf[..name.len()].copy_from_slice(name.as_bytes());
    name_buf[name.len()] = 0;

    let compressed = compression
        .compress_into(payload_buf, payload)
        .map_err(|source| ZpakError::Codec {
            codec: compression,
            name: name.to_string(),
            source,
        })?;

    let header = EntryHeader {
        size: to_u32(payload.len(), "entry payload")?,
        compressed_size: to_u32(compressed, "compressed entry payload")?,
        name_hash: name_hash(name),
        flags: 0,
        name_length: to_u32(name_length, "entry name")?,
    };
    header.write(head);

    Ok(header)
}

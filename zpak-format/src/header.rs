use crate::compression::Compression;

/// Magic bytes at the start of every zpak blob.
pub const MAGIC_BYTES: &[u8; 4] = b"ZPAK";

/// The only format version this crate reads or writes.
pub const VERSION: u8 = 1;

/// Serialized size of [`ZpakHeader`]: magic, version, compression id.
pub const HEADER_SIZE: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ZpakHeader {
    pub magic_bytes: [u8; 4],
    pub version: u8,
    pub compression: Compression,
}

impl ZpakHeader {
    pub(crate) fn new(compression: Compression) -> ZpakHeader {
        ZpakHeader {
            magic_bytes: *MAGIC_BYTES,
            version: VERSION,
            compression,
        }
    }
}

impl Default for ZpakHeader {
    fn default() -> Self {
        ZpakHeader::new(Compression::default())
    }
}

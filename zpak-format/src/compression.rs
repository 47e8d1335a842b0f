use std::fmt;
use std::io::{Cursor, Result};

#[cfg(feature = "deflate")]
use comde::deflate::{DeflateCompressor, DeflateDecompressor};
use comde::{
    stored::{StoredCompressor, StoredDecompressor},
    Compressor, Decompressor,
};

pub mod constants {
    pub const COMPRESSION_STORED: u8 = 0x00;
    pub const COMPRESSION_DEFLATE: u8 = 0x01;
}

use self::constants::*;

/// The codec applied to every entry of an archive.
///
/// A zpak blob carries exactly one compression id in its header; there is no
/// per-entry override.
#[derive(Clone, Copy, Eq, PartialEq)]
pub enum Compression {
    Stored,
    Deflate,
    Unknown(u8),
}

impl Default for Compression {
    fn default() -> Self {
        Self::Deflate
    }
}

impl Compression {
    pub const fn available_variants() -> &'static [&'static str] {
        &["stored", "deflate"]
    }

    pub const fn from_id(id: u8) -> Compression {
        match id {
            COMPRESSION_STORED => Compression::Stored,
            COMPRESSION_DEFLATE => Compression::Deflate,
            id => Compression::Unknown(id),
        }
    }

    pub const fn id(self) -> u8 {
        use Compression::*;

        match self {
            Stored => COMPRESSION_STORED,
            Deflate => COMPRESSION_DEFLATE,
            Unknown(id) => id,
        }
    }

    pub const fn is_known(self) -> bool {
        !matches!(self, Compression::Unknown(_))
    }

    /// Largest payload `compressed_len` stored bytes can decode to. DEFLATE
    /// tops out at 1032:1.
    pub const fn max_inflated(self, compressed_len: usize) -> usize {
        match self {
            Compression::Deflate => compressed_len.saturating_mul(1032),
            _ => compressed_len,
        }
    }

    /// Upper bound on how many bytes the codec may add to `len` bytes of
    /// incompressible input, beyond the per-entry slack margin.
    pub const fn max_expansion(self, len: usize) -> usize {
        match self {
            // stored deflate blocks cost 5 bytes per 16 KiB in the worst case
            Compression::Deflate => (len / 16384 + 1) * 5,
            _ => 0,
        }
    }
}

impl fmt::Display for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use Compression::*;

        let s = match self {
            Stored => "stored",
            Deflate => "DEFLATE",
            Unknown(id) => return write!(f, "Unknown(id: {:x})", id),
        };

        write!(f, "{}", s)
    }
}

impl fmt::Debug for Compression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(self, f)
    }
}

impl std::str::FromStr for Compression {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "stored" | "none" => Ok(Compression::Stored),
            "deflate" => Ok(Compression::Deflate),
            _ => Err(format!("Unknown compression method: {}", s)),
        }
    }
}

impl Compression {
    /// Compresses `src` into the front of `dest` and returns the number of
    /// bytes written. Running out of room in `dest` is an error.
    pub fn compress_into(self, dest: &mut [u8], src: &[u8]) -> Result<usize> {
        use Compression::*;

        let mut writer = Cursor::new(dest);
        let mut reader = src;

        match self {
            Stored => StoredCompressor.compress(&mut writer, &mut reader),
            #[cfg(feature = "deflate")]
            Deflate => DeflateCompressor.compress(&mut writer, &mut reader),
            Unknown(id) => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Cannot handle compression with id {}", id),
            )),
            #[allow(unreachable_patterns)]
            missing => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Compiled without support for {:?}", missing),
            )),
        }?;

        Ok(writer.position() as usize)
    }

    /// Decompresses `src` into the front of `dest` and returns the number of
    /// bytes produced. Output that does not fit in `dest` is an error.
    pub fn decompress_into(self, dest: &mut [u8], src: &[u8]) -> Result<usize> {
        use Compression::*;

        let mut writer = Cursor::new(dest);

        match self {
            Stored => StoredDecompressor.copy(src, &mut writer),
            #[cfg(feature = "deflate")]
            Deflate => DeflateDecompressor.copy(src, &mut writer),
            Unknown(id) => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Cannot handle decompression with id {}", id),
            )),
            #[allow(unreachable_patterns)]
            missing => Err(std::io::Error::new(
                std::io::ErrorKind::InvalidInput,
                format!("Compiled without support for {:?}", missing),
            )),
        }?;

        Ok(writer.position() as usize)
    }
}

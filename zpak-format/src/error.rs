use std::collections::TryReserveError;

pub type Result<T> = std::result::Result<T, ZpakError>;

/// Coarse classification of a [`ZpakError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad input or an operation the context does not permit.
    Validation,
    /// A buffer could not be allocated or grown.
    Allocation,
    /// The blob is truncated or structurally corrupt.
    Format,
    /// The compression codec failed.
    Codec,
}

#[derive(Debug, thiserror::Error)]
pub enum ZpakError {
    #[error("data buffer is not a valid zpak (bad magic bytes)")]
    InvalidMagic,

    #[error("unsupported zpak version: {0}")]
    UnsupportedVersion(u8),

    #[error("unsupported zpak compression type: {0}")]
    UnsupportedCompression(u8),

    #[error("data buffer is too small to be processed ({len} bytes)")]
    TooShort { len: usize },

    #[error("entry name should not be an empty string")]
    EmptyName,

    #[error("entry name `{0}` contains a NUL byte")]
    NulInName(String),

    #[error("entry `{0}` has no data")]
    EmptyPayload(String),

    #[error("{what} of {len} bytes does not fit the format")]
    TooLarge { what: &'static str, len: usize },

    #[error("cannot write entry in non-writable zpak")]
    ReadOnly,

    #[error("cannot write into a borrowed data buffer")]
    Borrowed,

    #[error("internal data buffer already exists")]
    AlreadyBound,

    #[error("zpak has no data")]
    NoData,

    #[error("output buffer too small: need {needed} bytes, got {got}")]
    BufferTooSmall { needed: usize, got: usize },

    #[error("could not allocate {what} of {size} bytes")]
    Allocation {
        what: &'static str,
        size: usize,
        #[source]
        source: TryReserveError,
    },

    #[error("entry at {offset:#x} is truncated: needs {needed} bytes, {remaining} remain")]
    Truncated {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("entry at {offset:#x} is corrupt: {reason}")]
    Corrupt { offset: usize, reason: &'static str },

    #[error("codec {codec} failed on entry `{name}`")]
    Codec {
        codec: crate::Compression,
        name: String,
        #[source]
        source: std::io::Error,
    },
}

impl ZpakError {
    pub fn kind(&self) -> ErrorKind {
        use ZpakError::*;

        match self {
            InvalidMagic
            | UnsupportedVersion(_)
            | UnsupportedCompression(_)
            | TooShort { .. }
            | EmptyName
            | NulInName(_)
            | EmptyPayload(_)
            | TooLarge { .. }
            | ReadOnly
            | Borrowed
            | AlreadyBound
            | NoData
            | BufferTooSmall { .. } => ErrorKind::Validation,
            Allocation { .. } => ErrorKind::Allocation,
            Truncated { .. } | Corrupt { .. } => ErrorKind::Format,
            Codec { .. } => ErrorKind::Codec,
        }
    }
}

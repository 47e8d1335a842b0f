use crate::Compression;

/// 256 KiB, the size of the first owned buffer and of every growth step.
pub const DEFAULT_CHUNK_SIZE: usize = 1024 * 256;

/// Extra room reserved per entry for codecs that expand incompressible input.
pub const DEFAULT_SLACK_MARGIN: usize = 1024;

/// Access a context is created with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Read,
    Write,
    ReadWrite,
}

impl Mode {
    #[inline(always)]
    pub fn is_writable(self) -> bool {
        !matches!(self, Mode::Read)
    }
}

/// Construction-time settings for a [`crate::Zpak`].
#[derive(Debug, Clone)]
pub struct ZpakConfig {
    pub mode: Mode,

    /// Codec for new archives. Loading a blob replaces it with the codec named
    /// in the blob's header.
    pub compression: Compression,

    /// Size of the owned buffer allocated by the first append.
    pub initial_capacity: usize,

    /// Minimum growth step once the buffer is full.
    pub growth_chunk: usize,

    /// Per-entry room reserved beyond the payload length.
    pub slack_margin: usize,

    /// Keep a name hash index so lookups skip the linear scan.
    pub index: bool,
}

impl Default for ZpakConfig {
    fn default() -> Self {
        ZpakConfig {
            mode: Mode::ReadWrite,
            compression: Compression::Deflate,
            initial_capacity: DEFAULT_CHUNK_SIZE,
            growth_chunk: DEFAULT_CHUNK_SIZE,
            slack_margin: DEFAULT_SLACK_MARGIN,
            index: false,
        }
    }
}

impl ZpakConfig {
    pub fn new(mode: Mode, compression: Compression) -> ZpakConfig {
        ZpakConfig {
            mode,
            compression,
            ..Default::default()
        }
    }

    pub fn read_only() -> ZpakConfig {
        ZpakConfig {
            mode: Mode::Read,
            ..Default::default()
        }
    }

    pub fn stored() -> ZpakConfig {
        ZpakConfig::default().with_compression(Compression::Stored)
    }

    pub fn with_mode(mut self, mode: Mode) -> ZpakConfig {
        self.mode = mode;
        self
    }

    pub fn with_compression(mut self, compression: Compression) -> ZpakConfig {
        self.compression = compression;
        self
    }

    pub fn with_capacity(mut self, initial_capacity: usize, growth_chunk: usize) -> ZpakConfig {
        self.initial_capacity = initial_capacity;
        self.growth_chunk = growth_chunk;
        self
    }

    pub fn with_slack_margin(mut self, slack_margin: usize) -> ZpakConfig {
        self.slack_margin = slack_margin;
        self
    }

    pub fn with_index(mut self, index: bool) -> ZpakConfig {
        self.index = index;
        self
    }
}

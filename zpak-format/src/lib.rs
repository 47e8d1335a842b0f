//! In-memory archive container: pack named byte blobs into one contiguous,
//! optionally compressed buffer and look them up by name.
//!
//! ```
//! use zpak_format::{Compression, Zpak, ZpakConfig};
//!
//! let mut zpak = Zpak::new(ZpakConfig::default().with_compression(Compression::Stored));
//! zpak.append("greeting.txt", b"hello").unwrap();
//! let blob = zpak.finish().unwrap();
//!
//! let zpak = Zpak::from_borrowed(&blob).unwrap();
//! assert_eq!(zpak.read("greeting.txt").unwrap().as_deref(), Some(&b"hello"[..]));
//! ```

mod archive;
mod buffer;
mod compression;
mod config;
mod de;
mod error;
mod hashing;
mod header;
mod index;
mod iter;
mod record;
mod ser;

pub use archive::Zpak;
pub use compression::{constants, Compression};
pub use config::{Mode, ZpakConfig, DEFAULT_CHUNK_SIZE, DEFAULT_SLACK_MARGIN};
pub use error::{ErrorKind, Result, ZpakError};
pub use hashing::name_hash;
pub use header::{ZpakHeader, HEADER_SIZE, MAGIC_BYTES, VERSION};
pub use iter::{Entry, ZpakIter};
pub use record::{EntryHeader, ENTRY_HEADER_SIZE};

#[doc(hidden)]
pub use comde;

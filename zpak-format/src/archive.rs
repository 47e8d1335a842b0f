use std::cell::RefCell;
use std::fmt;

use crate::buffer::{GrowBuffer, Storage};
use crate::config::{Mode, ZpakConfig};
use crate::de::{read_header, read_record};
use crate::error::{Result, ZpakError};
use crate::header::{ZpakHeader, HEADER_SIZE};
use crate::index::NameIndex;
use crate::iter::{Entry, ZpakIter};
use crate::record::ENTRY_HEADER_SIZE;
use crate::ser::{to_u32, write_record, Serialize};
use crate::{name_hash, Compression};

/// An in-memory archive of named, optionally compressed blobs.
///
/// A context starts out unbound. The first [`Zpak::append`] allocates an owned
/// buffer; [`Zpak::load`] copies an existing blob into one and
/// [`Zpak::load_borrowed`] reads a caller-owned blob in place, read-only.
///
/// Lookups and iteration work in every mode.
pub struct Zpak<'a> {
    config: ZpakConfig,
    pub(crate) storage: Storage<'a>,
    compression: Compression,
    index: Option<NameIndex>,
    last_error: RefCell<Option<String>>,
}

impl Default for Zpak<'_> {
    fn default() -> Self {
        Zpak::new(ZpakConfig::default())
    }
}

impl<'a> Zpak<'a> {
    pub fn new(config: ZpakConfig) -> Zpak<'a> {
        Zpak {
            compression: config.compression,
            index: None,
            storage: Storage::Unbound,
            last_error: RefCell::new(None),
            config,
        }
    }

    /// Copies `blob` into a new read-write context.
    pub fn from_bytes(blob: &[u8]) -> Result<Zpak<'a>> {
        let mut zpak = Zpak::default();
        zpak.load(blob)?;
        Ok(zpak)
    }

    /// Opens `blob` in place as a read-only context.
    pub fn from_borrowed(blob: &'a [u8]) -> Result<Zpak<'a>> {
        let mut zpak = Zpak::new(ZpakConfig::read_only());
        zpak.load_borrowed(blob)?;
        Ok(zpak)
    }

    #[inline(always)]
    pub fn mode(&self) -> Mode {
        self.config.mode
    }

    /// The codec in effect. Set from the configuration, or from the blob's
    /// header once one has been loaded.
    #[inline(always)]
    pub fn compression(&self) -> Compression {
        self.compression
    }

    /// Bytes in use: the header plus every record.
    #[inline(always)]
    pub fn len(&self) -> usize {
        self.storage.bytes().map(<[u8]>::len).unwrap_or(0)
    }

    #[inline(always)]
    pub fn is_empty(&self) -> bool {
        self.len() <= HEADER_SIZE
    }

    /// Bytes reserved. Equal to [`Zpak::len`] for a borrowed blob.
    pub fn capacity(&self) -> usize {
        match &self.storage {
            Storage::Unbound => 0,
            Storage::Owned(buffer) => buffer.capacity(),
            Storage::Borrowed(blob) => blob.len(),
        }
    }

    #[inline(always)]
    pub fn is_borrowed(&self) -> bool {
        matches!(self.storage, Storage::Borrowed(_))
    }

    #[inline(always)]
    pub fn is_bound(&self) -> bool {
        self.storage.is_bound()
    }

    /// The archive bytes as they stand, without spare capacity.
    #[inline(always)]
    pub fn as_bytes(&self) -> Option<&[u8]> {
        self.storage.bytes()
    }

    pub fn entry_count(&self) -> usize {
        self.iter().take_while(|entry| entry.is_ok()).count()
    }

    /// Message of the most recent failed operation on this context.
    pub fn last_error(&self) -> Option<String> {
        self.last_error.borrow().clone()
    }

    pub(crate) fn track<T>(&self, result: Result<T>) -> Result<T> {
        if let Err(e) = &result {
            tracing::debug!(error = %e, "zpak operation failed");
            *self.last_error.borrow_mut() = Some(e.to_string());
        }
        result
    }

    /// Appends an entry and returns the number of payload bytes stored after
    /// compression. On failure nothing is committed.
    pub fn append(&mut self, name: &str, payload: &[u8]) -> Result<usize> {
        let result = self.append_inner(name, payload);
        self.track(result)
    }

    fn append_inner(&mut self, name: &str, payload: &[u8]) -> Result<usize> {
        if name.is_empty() {
            return Err(ZpakError::EmptyName);
        }

        if name.as_bytes().contains(&0) {
            return Err(ZpakError::NulInName(name.to_string()));
        }

        if payload.is_empty() {
            return Err(ZpakError::EmptyPayload(name.to_string()));
        }

        if self.is_borrowed() {
            return Err(ZpakError::Borrowed);
        }

        if !self.config.mode.is_writable() {
            return Err(ZpakError::ReadOnly);
        }

        to_u32(name.len() + 1, "entry name")?;
        to_u32(payload.len(), "entry payload")?;

        let compression = self.compression;
        let chunk = self.config.growth_chunk;
        let estimated = [
            name.len() + 1,
            payload.len(),
            self.config.slack_margin,
            compression.max_expansion(payload.len()),
        ]
        .iter()
        .try_fold(ENTRY_HEADER_SIZE, |acc, n| acc.checked_add(*n))
        .ok_or(ZpakError::TooLarge {
            what: "entry",
            len: payload.len(),
        })?;

        let buffer = self.owned_buffer()?;
        buffer.ensure(estimated, chunk)?;

        let start = buffer.len();
        let header = match write_record(buffer.claim(estimated), name, payload, compression) {
            Ok(header) => header,
            Err(e) => {
                buffer.truncate(start);
                return Err(e);
            }
        };
        buffer.truncate(start + header.record_len());

        if let Some(index) = self.index.as_mut() {
            index.insert(header.name_hash, start);
        }

        tracing::debug!(
            entry = name,
            offset = start,
            size = header.size,
            compressed_size = header.compressed_size,
            "appended entry"
        );

        Ok(header.compressed_size as usize)
    }

    fn owned_buffer(&mut self) -> Result<&mut GrowBuffer> {
        if !self.storage.is_bound() {
            let capacity = self.config.initial_capacity.max(HEADER_SIZE);
            let mut buffer = GrowBuffer::with_capacity(capacity)?;
            ZpakHeader::new(self.compression).write(buffer.claim(ZpakHeader::SIZE));

            tracing::debug!(capacity, compression = %self.compression, "created zpak buffer");

            self.storage = Storage::Owned(buffer);
            if self.config.index {
                self.index = Some(NameIndex::default());
            }
        }

        match &mut self.storage {
            Storage::Owned(buffer) => Ok(buffer),
            Storage::Borrowed(_) => Err(ZpakError::Borrowed),
            Storage::Unbound => Err(ZpakError::NoData),
        }
    }

    /// Returns an exactly-sized copy of the archive and releases the context.
    pub fn finish(self) -> Result<Vec<u8>> {
        match &self.storage {
            Storage::Unbound => Err(ZpakError::NoData),
            Storage::Borrowed(_) => Err(ZpakError::Borrowed),
            Storage::Owned(_) if !self.config.mode.is_writable() => Err(ZpakError::ReadOnly),
            Storage::Owned(buffer) => {
                let out = buffer.to_vec_exact()?;
                tracing::debug!(bytes = out.len(), "finished zpak");
                Ok(out)
            }
        }
    }

    /// Validates `blob` and copies it into an owned buffer. The context keeps
    /// its mode, so a writable context can keep appending afterwards.
    pub fn load(&mut self, blob: &[u8]) -> Result<()> {
        let result = self.load_inner(blob);
        self.track(result)
    }

    fn load_inner(&mut self, blob: &[u8]) -> Result<()> {
        if self.storage.is_bound() {
            return Err(ZpakError::AlreadyBound);
        }

        let (header, index) = validate(blob, self.config.index)?;
        let buffer = GrowBuffer::from_slice(blob)?;

        self.storage = Storage::Owned(buffer);
        self.compression = header.compression;
        self.index = index;
        Ok(())
    }

    /// Validates `blob` and reads it in place. The context becomes read-only.
    pub fn load_borrowed(&mut self, blob: &'a [u8]) -> Result<()> {
        let result = self.load_borrowed_inner(blob);
        self.track(result)
    }

    fn load_borrowed_inner(&mut self, blob: &'a [u8]) -> Result<()> {
        if self.storage.is_bound() {
            return Err(ZpakError::AlreadyBound);
        }

        let (header, index) = validate(blob, self.config.index)?;

        self.storage = Storage::Borrowed(blob);
        self.config.mode = Mode::Read;
        self.compression = header.compression;
        self.index = index;
        Ok(())
    }

    #[inline(always)]
    pub fn iter(&self) -> ZpakIter<'_> {
        ZpakIter::new(self)
    }

    /// The entry whose record starts at `offset`, as returned by
    /// [`Entry::offset`].
    pub fn entry_at(&self, offset: usize) -> Result<Entry<'_>> {
        let result = self.parse_at(offset);
        self.track(result)
    }

    fn parse_at(&self, offset: usize) -> Result<Entry<'_>> {
        let bytes = self.storage.bytes().ok_or(ZpakError::NoData)?;

        if offset < HEADER_SIZE {
            return Err(ZpakError::Corrupt {
                offset,
                reason: "offset points into the archive header",
            });
        }

        let (layout, name) = read_record(bytes, offset, self.compression)?;
        Ok(Entry {
            zpak: self,
            layout,
            name,
        })
    }

    /// Finds the first entry called `name`.
    pub fn get(&self, name: &str) -> Result<Option<Entry<'_>>> {
        let result = self.find(name);
        self.track(result)
    }

    fn find(&self, name: &str) -> Result<Option<Entry<'_>>> {
        if name.is_empty() {
            return Err(ZpakError::EmptyName);
        }

        if !self.storage.is_bound() {
            return Err(ZpakError::NoData);
        }

        let hash = name_hash(name);

        if let Some(index) = &self.index {
            for &offset in index.candidates(hash) {
                let entry = self.parse_at(offset)?;
                if entry.name() == name {
                    return Ok(Some(entry));
                }
            }
            return Ok(None);
        }

        for entry in self.iter() {
            let entry = entry?;
            if entry.name_hash() == hash && entry.name() == name {
                return Ok(Some(entry));
            }
        }

        Ok(None)
    }

    /// Decompressed payload of the first entry called `name`, or `None` when
    /// there is no such entry.
    pub fn read(&self, name: &str) -> Result<Option<Vec<u8>>> {
        match self.get(name)? {
            Some(entry) => entry.read().map(Some),
            None => Ok(None),
        }
    }

    /// Decompresses the first entry called `name` into `buf` and returns the
    /// number of bytes written.
    pub fn read_into(&self, name: &str, buf: &mut [u8]) -> Result<Option<usize>> {
        match self.get(name)? {
            Some(entry) => entry.read_into(buf).map(Some),
            None => Ok(None),
        }
    }
}

impl<'z, 'a: 'z> IntoIterator for &'z Zpak<'a> {
    type Item = Result<Entry<'z>>;
    type IntoIter = ZpakIter<'z>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl fmt::Debug for Zpak<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Zpak")
            .field("mode", &self.config.mode)
            .field("compression", &self.compression)
            .field("len", &self.len())
            .field("capacity", &self.capacity())
            .field("borrowed", &self.is_borrowed())
            .field("indexed", &self.index.is_some())
            .finish()
    }
}

/// Walks every record of `blob` so that later reads only ever see
/// well-formed records.
fn validate(blob: &[u8], build_index: bool) -> Result<(ZpakHeader, Option<NameIndex>)> {
    let header = read_header(blob)?;
    let mut index = build_index.then(NameIndex::default);
    let mut offset = HEADER_SIZE;
    let mut count = 0usize;

    while offset < blob.len() {
        let (layout, name) = read_record(blob, offset, header.compression)?;

        if layout.header.name_hash != name_hash(name) {
            return Err(ZpakError::Corrupt {
                offset,
                reason: "stored name hash does not match the entry name",
            });
        }

        if let Some(index) = index.as_mut() {
            index.insert(layout.header.name_hash, offset);
        }

        offset = layout.end();
        count += 1;
    }

    tracing::debug!(
        entries = count,
        bytes = blob.len(),
        compression = %header.compression,
        indexed = index.as_ref().map(NameIndex::len),
        "validated zpak"
    );

    Ok((header, index))
}

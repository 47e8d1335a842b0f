use std::collections::HashMap;

/// Transient name hash index: hash to record offsets, in insertion order.
///
/// Only lives in memory. Buckets keep every offset for a hash so colliding
/// names and duplicate entries still resolve to the first match.
#[derive(Debug, Default)]
pub(crate) struct NameIndex {
    buckets: HashMap<u64, Vec<usize>>,
}

impl NameIndex {
    #[inline(always)]
    pub(crate) fn insert(&mut self, hash: u64, offset: usize) {
        self.buckets.entry(hash).or_default().push(offset);
    }

    #[inline(always)]
    pub(crate) fn candidates(&self, hash: u64) -> &[usize] {
        self.buckets.get(&hash).map(Vec::as_slice).unwrap_or(&[])
    }

    pub(crate) fn len(&self) -> usize {
        self.buckets.values().map(Vec::len).sum()
    }
}

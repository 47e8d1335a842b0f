//! Entry name hashing.
//!
//! Names are hashed with djb2 so lookups can skip most entries with a single
//! integer compare. The hash is not collision free; lookups confirm a hash
//! hit by comparing the full name.

const DJB2_SEED: u64 = 5381;

/// Hashes an entry name (without its NUL terminator).
#[inline]
pub fn name_hash<B: AsRef<[u8]>>(name: B) -> u64 {
    name.as_ref().iter().fold(DJB2_SEED, |hash, &byte| {
        hash.wrapping_shl(5)
            .wrapping_add(hash)
            .wrapping_add(u64::from(byte))
    })
}

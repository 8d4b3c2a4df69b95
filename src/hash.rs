//! Stable seeded hashing for filter keys.
//!
//! Goals:
//! - Use a stable, explicit hash (not std::DefaultHasher) so bit positions
//!   are invariant across toolchains/platforms and across filter instances.
//! - Derive the k hash functions of a filter from one base hash by
//!   perturbing the input with the seed's decimal representation. Trades a
//!   little independence for simplicity; standard practice for small k.
//! - Encode hash kind as u32 for forward compatibility.

use std::fmt;
use std::hash::Hasher;
use twox_hash::XxHash64;

/// Type of stable hash used by the filters.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HashKind {
    /// 64-bit xxhash, seeded per hash-function index. Fast and stable.
    Xx64Seeded = 1,
}

impl HashKind {
    /// Convert to a compact u32 code.
    pub fn to_u32(self) -> u32 {
        match self {
            HashKind::Xx64Seeded => 1,
        }
    }

    /// Parse from a u32 code. Unknown codes return None.
    pub fn from_u32(code: u32) -> Option<Self> {
        match code {
            1 => Some(HashKind::Xx64Seeded),
            _ => None,
        }
    }
}

impl fmt::Display for HashKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HashKind::Xx64Seeded => write!(f, "xxhash64(seeded)"),
        }
    }
}

/// Default hash kind for new filters.
pub const HASH_KIND_DEFAULT: HashKind = HashKind::Xx64Seeded;

/// Compute the 64-bit stable hash of a key for hash-function index `seed`.
///
/// The seed is mixed in by appending its decimal ASCII form to the key
/// bytes, so `hash64_seeded(k, "abc", 1)` equals the base hash of "abc1".
/// Valid seeds are [0, num_hashes) of the owning filter.
pub fn hash64_seeded(kind: HashKind, key: &str, seed: u32) -> u64 {
    match kind {
        HashKind::Xx64Seeded => {
            let mut h = XxHash64::with_seed(0);
            h.write(key.as_bytes());
            // decimal ASCII of the seed, no heap allocation
            let mut buf = [0u8; 10];
            let mut i = buf.len();
            let mut v = seed;
            loop {
                i -= 1;
                buf[i] = b'0' + (v % 10) as u8;
                v /= 10;
                if v == 0 {
                    break;
                }
            }
            h.write(&buf[i..]);
            h.finish()
        }
    }
}

/// Bit index for a key under hash-function `seed`, in [0, size_bits).
#[inline]
pub fn index_of(kind: HashKind, key: &str, seed: u32, size_bits: usize) -> usize {
    debug_assert!(size_bits > 0, "size_bits must be > 0");
    (hash64_seeded(kind, key, seed) % (size_bits as u64)) as usize
}

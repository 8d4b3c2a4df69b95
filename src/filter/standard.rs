//! filter/standard — classic Bloom filter.
//!
//! Probabilistic set of inserted keys: insert sets k bits, query checks all
//! k bits. Bits are never cleared, so an inserted key can never be reported
//! absent (no false negatives); false positives grow with the load factor.

use anyhow::{anyhow, Result};

use crate::bits::BitArray;
use crate::hash::{index_of, HashKind, HASH_KIND_DEFAULT};
use crate::metrics;

/// Classic Bloom filter over opaque string keys.
///
/// Insert/query only; no deletion, no resize.
#[derive(Debug, Clone)]
pub struct StandardBloomFilter {
    bits: BitArray,
    num_hashes: u32,
    hash_kind: HashKind,
}

impl StandardBloomFilter {
    /// Create a filter with `size_bits` capacity and `num_hashes` (k) hash
    /// functions. Fails fast on zero size or zero k.
    pub fn new(size_bits: usize, num_hashes: u32) -> Result<Self> {
        if num_hashes == 0 {
            return Err(anyhow!("num_hashes must be > 0"));
        }
        Ok(Self {
            bits: BitArray::new(size_bits)?,
            num_hashes,
            hash_kind: HASH_KIND_DEFAULT,
        })
    }

    /// Insert a key: set the k bits addressed by seeds 0..k.
    ///
    /// Idempotent; the set-bit count only ever grows.
    pub fn insert(&mut self, key: &str) {
        for seed in 0..self.num_hashes {
            let idx = index_of(self.hash_kind, key, seed, self.bits.size_bits());
            self.bits.set(idx);
        }
        metrics::inc_std_insert();
    }

    /// Membership test. `false` is exact (definitely never inserted);
    /// `true` may be a false positive.
    pub fn possibly_contains(&self, key: &str) -> bool {
        metrics::inc_std_query();
        for seed in 0..self.num_hashes {
            let idx = index_of(self.hash_kind, key, seed, self.bits.size_bits());
            if !self.bits.get(idx) {
                return false;
            }
        }
        true
    }

    /// Static memory cost in bits: the configured capacity, independent of
    /// how many keys were inserted.
    #[inline]
    pub fn memory_bits(&self) -> usize {
        self.bits.size_bits()
    }

    /// Number of 1 bits currently set.
    #[inline]
    pub fn bits_set(&self) -> u64 {
        self.bits.bits_set()
    }

    /// Load factor (set bits / capacity); drives the false-positive rate.
    #[inline]
    pub fn fill_ratio(&self) -> f64 {
        self.bits.fill_ratio()
    }

    #[inline]
    pub fn num_hashes(&self) -> u32 {
        self.num_hashes
    }
}

//! bits — fixed-size bit array backing the Bloom filters.
//!
//! - Capacity is fixed at construction and never changes.
//! - Bits start all-zero and can only be set, never cleared, so the set-bit
//!   count is monotone over the array's lifetime.
//! - Bits are packed into u64 words; a running set-bit counter is kept so
//!   fill-ratio reporting stays O(1).

use anyhow::{anyhow, Result};

/// Fixed-capacity bit vector. Bits can be set but never cleared.
#[derive(Debug, Clone, PartialEq)]
pub struct BitArray {
    words: Vec<u64>,
    size_bits: usize,
    bits_set: u64,
}

impl BitArray {
    /// Create an all-zero bit array with exactly `size_bits` addressable bits.
    ///
    /// Fails fast on zero size (constructor precondition).
    pub fn new(size_bits: usize) -> Result<Self> {
        if size_bits == 0 {
            return Err(anyhow!("bit array size must be > 0"));
        }
        let words = vec![0u64; size_bits.div_ceil(64)];
        Ok(Self {
            words,
            size_bits,
            bits_set: 0,
        })
    }

    /// Set bit `idx` to 1. Counting is only bumped on a 0→1 transition,
    /// so repeated sets of the same bit are observably idempotent.
    #[inline]
    pub fn set(&mut self, idx: usize) {
        debug_assert!(idx < self.size_bits, "bit index out of range");
        let word = idx / 64;
        let mask = 1u64 << (idx % 64);
        if self.words[word] & mask == 0 {
            self.words[word] |= mask;
            self.bits_set += 1;
        }
    }

    /// Read bit `idx`.
    #[inline]
    pub fn get(&self, idx: usize) -> bool {
        debug_assert!(idx < self.size_bits, "bit index out of range");
        self.words[idx / 64] & (1u64 << (idx % 64)) != 0
    }

    /// Fixed capacity in bits (the static memory cost, independent of load).
    #[inline]
    pub fn size_bits(&self) -> usize {
        self.size_bits
    }

    /// Number of 1 bits. Never decreases.
    #[inline]
    pub fn bits_set(&self) -> u64 {
        self.bits_set
    }

    /// Load factor: set bits / total bits.
    pub fn fill_ratio(&self) -> f64 {
        self.bits_set as f64 / self.size_bits as f64
    }
}

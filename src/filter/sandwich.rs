//! filter/sandwich — sandwiched learned Bloom filter.
//!
//! Two exact-guarantee Bloom filters around a borrowed classifier:
//! - L1 ("outer bread") holds every true-set key;
//! - the classifier does the bulk of the discrimination at near-zero
//!   marginal memory;
//! - L3 ("inner bread") holds exactly the true-set keys the classifier
//!   would mis-route to "absent".
//!
//! Correctness comes from the insertion policy, never from query-time
//! logic: a key goes into L3 iff the classifier predicts non-member for it
//! at insertion time. With that policy, query() can never answer false for
//! a populated key — L1 passes (bits never clear), and then either the
//! classifier accepts, or L3 was primed to accept.
//!
//! Memory accounting is L1 + L3; the classifier footprint is treated as
//! constant and excluded.

use anyhow::Result;
use log::info;

use crate::classifier::{extract_features, Classifier};
use crate::config::SandwichConfig;
use crate::filter::standard::StandardBloomFilter;
use crate::metrics;

/// Compressed probabilistic set with the no-false-negative contract of a
/// plain Bloom filter at lower memory.
///
/// L1 and L3 are exclusively owned; the classifier is borrowed since its
/// training and lifetime are managed outside the filter.
pub struct SandwichedLearnedBloomFilter<'m> {
    l1: StandardBloomFilter,
    l3: StandardBloomFilter,
    model: &'m dyn Classifier,
}

impl<'m> SandwichedLearnedBloomFilter<'m> {
    /// Create from raw sizing: L1 capacity/hashes, L3 capacity/hashes.
    pub fn new(
        l1_bits: usize,
        l1_hashes: u32,
        l3_bits: usize,
        l3_hashes: u32,
        model: &'m dyn Classifier,
    ) -> Result<Self> {
        Ok(Self {
            l1: StandardBloomFilter::new(l1_bits, l1_hashes)?,
            l3: StandardBloomFilter::new(l3_bits, l3_hashes)?,
            model,
        })
    }

    /// Create from a validated [`SandwichConfig`].
    pub fn with_config(cfg: &SandwichConfig, model: &'m dyn Classifier) -> Result<Self> {
        cfg.validate()?;
        Self::new(cfg.l1_bits, cfg.l1_hashes, cfg.l3_bits, cfg.l3_hashes, model)
    }

    /// Unconditional L1 insert. Every true-set key must pass through here,
    /// otherwise L1 could produce a false negative for it.
    pub fn insert_l1(&mut self, key: &str) {
        self.l1.insert(key);
        metrics::inc_insert_l1();
    }

    /// Raw L3 insert. Exposed for external population routines; the
    /// correct policy is to call this iff the classifier predicts
    /// non-member for `key` (which [`insert`](Self::insert) does for you).
    pub fn insert_l3(&mut self, key: &str) {
        self.l3.insert(key);
        metrics::inc_insert_l3();
    }

    /// Insert a true-set key under the correct protocol: always into L1,
    /// and into L3 iff the classifier predicts non-member. This is the
    /// operation that upholds the global no-false-negative invariant.
    pub fn insert(&mut self, key: &str) {
        self.insert_l1(key);
        if !self.model.predict(&extract_features(key)) {
            self.insert_l3(key);
        }
    }

    /// Bulk-populate from an iterator of keys, applying the insertion
    /// protocol to each. Logs a population summary.
    pub fn populate<I, S>(&mut self, keys: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let before_l3 = self.l3.bits_set();
        let mut total = 0u64;
        for key in keys {
            self.insert(key.as_ref());
            total += 1;
        }
        info!(
            "populated sandwich filter: {} keys, l1_fill={:.3}, l3_fill={:.3} (l3 bits {} -> {})",
            total,
            self.l1.fill_ratio(),
            self.l3.fill_ratio(),
            before_l3,
            self.l3.bits_set()
        );
    }

    /// Layered membership test: L1 -> classifier -> L3.
    ///
    /// - L1 negative is exact (true-set keys are always in L1);
    /// - classifier positive is trusted (keys it gets right never need L3);
    /// - otherwise L3 decides: primed true for mis-classified true-set
    ///   keys, possibly-false-positive for everything else.
    pub fn query(&self, key: &str) -> bool {
        metrics::inc_sandwich_query();

        if !self.l1.possibly_contains(key) {
            metrics::inc_l1_reject();
            return false;
        }

        if self.model.predict(&extract_features(key)) {
            metrics::inc_model_accept();
            return true;
        }

        let hit = self.l3.possibly_contains(key);
        metrics::inc_l3_probe(hit);
        hit
    }

    /// Static memory cost: L1 + L3 capacities. The classifier is excluded
    /// from the accounting.
    #[inline]
    pub fn memory_bits(&self) -> usize {
        self.l1.memory_bits() + self.l3.memory_bits()
    }

    /// Read-only view of the outer filter (stats, tests).
    #[inline]
    pub fn l1(&self) -> &StandardBloomFilter {
        &self.l1
    }

    /// Read-only view of the backstop filter (stats, tests).
    #[inline]
    pub fn l3(&self) -> &StandardBloomFilter {
        &self.l3
    }
}

impl std::fmt::Debug for SandwichedLearnedBloomFilter<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandwichedLearnedBloomFilter")
            .field("l1_bits", &self.l1.memory_bits())
            .field("l3_bits", &self.l3.memory_bits())
            .finish()
    }
}

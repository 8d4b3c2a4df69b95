//! Centralized configuration and builder for the sandwich filter.
//!
//! Goals:
//! - Single place to collect the four sizing knobs instead of threading
//!   them positionally through call sites.
//! - SandwichConfig::from_env() reads SBF_* env vars for ad-hoc tuning.
//! - Fluent with_* setters, then build(); validation is separate so the
//!   filter constructor can fail fast on bad sizes.
//!
//! Also hosts the classic Bloom sizing math, used when sizing L1/L3 from a
//! target item count and false-positive rate instead of raw bit counts.

use std::fmt;

use anyhow::{anyhow, Result};

/// Sizing for a sandwiched learned Bloom filter.
///
/// L1 must be sized for ALL true-set keys; L3 only for the subset the
/// classifier mis-routes to "absent". Defaults reproduce the reference
/// benchmark shape (1000/2 + 500/2 against a standalone 3000/3).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SandwichConfig {
    /// Bit capacity of the outer (L1) filter.
    /// Env: SBF_L1_BITS (default 1000)
    pub l1_bits: usize,

    /// Hash functions for L1.
    /// Env: SBF_L1_HASHES (default 2)
    pub l1_hashes: u32,

    /// Bit capacity of the inner backstop (L3) filter.
    /// Env: SBF_L3_BITS (default 500)
    pub l3_bits: usize,

    /// Hash functions for L3.
    /// Env: SBF_L3_HASHES (default 2)
    pub l3_hashes: u32,
}

impl Default for SandwichConfig {
    fn default() -> Self {
        Self {
            l1_bits: 1000,
            l1_hashes: 2,
            l3_bits: 500,
            l3_hashes: 2,
        }
    }
}

impl SandwichConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();

        if let Ok(v) = std::env::var("SBF_L1_BITS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.l1_bits = n;
            }
        }
        if let Ok(v) = std::env::var("SBF_L1_HASHES") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.l1_hashes = n;
            }
        }
        if let Ok(v) = std::env::var("SBF_L3_BITS") {
            if let Ok(n) = v.trim().parse::<usize>() {
                cfg.l3_bits = n;
            }
        }
        if let Ok(v) = std::env::var("SBF_L3_HASHES") {
            if let Ok(n) = v.trim().parse::<u32>() {
                cfg.l3_hashes = n;
            }
        }

        cfg
    }

    /// Fluent setters (builder-style) to override specific fields.

    pub fn with_l1_bits(mut self, bits: usize) -> Self {
        self.l1_bits = bits;
        self
    }

    pub fn with_l1_hashes(mut self, k: u32) -> Self {
        self.l1_hashes = k;
        self
    }

    pub fn with_l3_bits(mut self, bits: usize) -> Self {
        self.l3_bits = bits;
        self
    }

    pub fn with_l3_hashes(mut self, k: u32) -> Self {
        self.l3_hashes = k;
        self
    }

    /// Finish the builder and obtain the configuration.
    pub fn build(self) -> Self {
        self
    }

    /// Check the sizing invariants (all four knobs nonzero).
    pub fn validate(&self) -> Result<()> {
        if self.l1_bits == 0 || self.l3_bits == 0 {
            return Err(anyhow!(
                "filter sizes must be > 0 (l1_bits={}, l3_bits={})",
                self.l1_bits,
                self.l3_bits
            ));
        }
        if self.l1_hashes == 0 || self.l3_hashes == 0 {
            return Err(anyhow!(
                "hash counts must be > 0 (l1_hashes={}, l3_hashes={})",
                self.l1_hashes,
                self.l3_hashes
            ));
        }
        Ok(())
    }
}

impl fmt::Display for SandwichConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "SandwichConfig {{ l1: {} bits / {} hashes, l3: {} bits / {} hashes }}",
            self.l1_bits, self.l1_hashes, self.l3_bits, self.l3_hashes
        )
    }
}

/// Bits needed for a single Bloom filter holding `n_items` at
/// false-positive rate `target_fpr`: ceil(-n * ln p / ln^2 2).
pub fn optimal_bits(n_items: usize, target_fpr: f64) -> usize {
    debug_assert!(target_fpr > 0.0 && target_fpr < 1.0);
    let ln2 = std::f64::consts::LN_2;
    let m = -(n_items as f64) * target_fpr.ln() / (ln2 * ln2);
    m.ceil() as usize
}

/// Hash-function count minimizing FPR for `bits` capacity and `n_items`
/// keys: round((m/n) * ln 2), at least 1.
pub fn optimal_num_hashes(bits: usize, n_items: usize) -> u32 {
    if n_items == 0 {
        return 1;
    }
    let k = (bits as f64 / n_items as f64) * std::f64::consts::LN_2;
    (k.round() as u32).max(1)
}

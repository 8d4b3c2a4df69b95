//! Lightweight global metrics for the filters.
//!
//! Thread-safe atomic counters for the layered query path. Queries on a
//! populated filter are read-only, so counters are the only shared mutable
//! state the crate carries; Relaxed ordering is enough for statistics.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::Serialize;

// ----- standard filter -----
static STD_INSERTS: AtomicU64 = AtomicU64::new(0);
static STD_QUERIES: AtomicU64 = AtomicU64::new(0);

// ----- sandwich query path -----
static SANDWICH_QUERIES: AtomicU64 = AtomicU64::new(0);
static L1_REJECTS: AtomicU64 = AtomicU64::new(0);
static MODEL_ACCEPTS: AtomicU64 = AtomicU64::new(0);
static L3_PROBES: AtomicU64 = AtomicU64::new(0);
static L3_POSITIVE: AtomicU64 = AtomicU64::new(0);

// ----- sandwich population -----
static INSERTS_L1: AtomicU64 = AtomicU64::new(0);
static INSERTS_L3: AtomicU64 = AtomicU64::new(0);

#[derive(Debug, Clone, Default, Serialize)]
pub struct MetricsSnapshot {
    pub std_inserts: u64,
    pub std_queries: u64,

    pub sandwich_queries: u64,
    pub l1_rejects: u64,
    pub model_accepts: u64,
    pub l3_probes: u64,
    pub l3_positive: u64,

    pub inserts_l1: u64,
    pub inserts_l3: u64,
}

impl MetricsSnapshot {
    /// Share of sandwich queries settled before reaching L3.
    pub fn short_circuit_ratio(&self) -> f64 {
        if self.sandwich_queries == 0 {
            return 0.0;
        }
        (self.l1_rejects + self.model_accepts) as f64 / self.sandwich_queries as f64
    }
}

pub fn snapshot() -> MetricsSnapshot {
    MetricsSnapshot {
        std_inserts: STD_INSERTS.load(Ordering::Relaxed),
        std_queries: STD_QUERIES.load(Ordering::Relaxed),

        sandwich_queries: SANDWICH_QUERIES.load(Ordering::Relaxed),
        l1_rejects: L1_REJECTS.load(Ordering::Relaxed),
        model_accepts: MODEL_ACCEPTS.load(Ordering::Relaxed),
        l3_probes: L3_PROBES.load(Ordering::Relaxed),
        l3_positive: L3_POSITIVE.load(Ordering::Relaxed),

        inserts_l1: INSERTS_L1.load(Ordering::Relaxed),
        inserts_l3: INSERTS_L3.load(Ordering::Relaxed),
    }
}

/// Zero all counters (used by the bench before a run).
pub fn reset() {
    STD_INSERTS.store(0, Ordering::Relaxed);
    STD_QUERIES.store(0, Ordering::Relaxed);
    SANDWICH_QUERIES.store(0, Ordering::Relaxed);
    L1_REJECTS.store(0, Ordering::Relaxed);
    MODEL_ACCEPTS.store(0, Ordering::Relaxed);
    L3_PROBES.store(0, Ordering::Relaxed);
    L3_POSITIVE.store(0, Ordering::Relaxed);
    INSERTS_L1.store(0, Ordering::Relaxed);
    INSERTS_L3.store(0, Ordering::Relaxed);
}

// ----- increment helpers (crate-internal) -----

#[inline]
pub(crate) fn inc_std_insert() {
    STD_INSERTS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn inc_std_query() {
    STD_QUERIES.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn inc_sandwich_query() {
    SANDWICH_QUERIES.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn inc_l1_reject() {
    L1_REJECTS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn inc_model_accept() {
    MODEL_ACCEPTS.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn inc_l3_probe(positive: bool) {
    L3_PROBES.fetch_add(1, Ordering::Relaxed);
    if positive {
        L3_POSITIVE.fetch_add(1, Ordering::Relaxed);
    }
}

#[inline]
pub(crate) fn inc_insert_l1() {
    INSERTS_L1.fetch_add(1, Ordering::Relaxed);
}

#[inline]
pub(crate) fn inc_insert_l3() {
    INSERTS_L3.fetch_add(1, Ordering::Relaxed);
}

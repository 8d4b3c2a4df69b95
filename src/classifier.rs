//! classifier — feature extraction and the injected membership oracle.
//!
//! The sandwich filter never trusts the classifier for correctness; it only
//! uses it to route queries. The one contract that matters here:
//! - predictions are deterministic for identical features;
//! - feature extraction is the SAME function at population time and at
//!   query time. A mismatch silently wrecks classifier accuracy, so both
//!   paths go through [`extract_features`].

use std::fmt;

/// Numeric summary of a key, computed on demand and never stored.
///
/// f0 = byte length, f1 = count of ASCII digits, f2 = count of '-'.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureVector {
    pub len: u32,
    pub digits: u32,
    pub hyphens: u32,
}

/// Pure mapping from a key to its feature vector.
///
/// Empty string yields the all-zero vector; no error conditions.
pub fn extract_features(key: &str) -> FeatureVector {
    let mut digits = 0u32;
    let mut hyphens = 0u32;
    for b in key.bytes() {
        if b.is_ascii_digit() {
            digits += 1;
        }
        if b == b'-' {
            hyphens += 1;
        }
    }
    FeatureVector {
        len: key.len() as u32,
        digits,
        hyphens,
    }
}

/// Injected membership oracle.
///
/// `predict` answers "is this key plausibly a true-set member". No
/// soundness or completeness is assumed: the oracle may be wrong in either
/// direction, and the L1/L3 structure recovers correctness around it.
pub trait Classifier {
    fn predict(&self, features: &FeatureVector) -> bool;
}

/// Default oracle: a small fixed decision tree over (len, digits, hyphens).
///
/// Stands in for an externally trained model. The thresholds target the
/// URL-shaped workloads of the benchmark (hostile hostnames tend to be
/// long, digit-heavy and hyphenated) and are heuristic only — correctness
/// never depends on them.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecisionTreeClassifier;

impl Classifier for DecisionTreeClassifier {
    fn predict(&self, f: &FeatureVector) -> bool {
        if f.hyphens >= 2 {
            // heavily hyphenated hosts read as hostile unless very short
            f.len >= 20
        } else {
            // without hyphens, demand both length and digit load
            f.digits >= 6 && f.len >= 28
        }
    }
}

impl fmt::Display for DecisionTreeClassifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "decision-tree(len,digits,hyphens)")
    }
}

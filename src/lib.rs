#![allow(non_snake_case)]

// Base modules
pub mod bits;
pub mod config;
pub mod hash;
pub mod metrics;

// Classifier boundary (feature extraction + injected oracle)
pub mod classifier;

// Filters: standard Bloom + sandwiched learned Bloom
pub mod filter; // src/filter/{mod,standard,sandwich}.rs

// Convenience re-exports
pub use bits::BitArray;
pub use classifier::{extract_features, Classifier, DecisionTreeClassifier, FeatureVector};
pub use config::SandwichConfig;
pub use filter::{SandwichedLearnedBloomFilter, StandardBloomFilter};
pub use hash::{HashKind, HASH_KIND_DEFAULT};

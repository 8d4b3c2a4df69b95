//! filter — the two membership structures:
//! - standard.rs — classic Bloom filter (bit array + k seeded hashes)
//! - sandwich.rs — sandwiched learned Bloom filter (L1 / classifier / L3)

pub mod sandwich;
pub mod standard;

// Top-level re-exports
pub use sandwich::SandwichedLearnedBloomFilter;
pub use standard::StandardBloomFilter;

//! Identifier generation for catalog records.
//!
//! In production ids are drawn at random; tests inject a predictable
//! sequence so that created products can be asserted on.

use rand::Rng;

/// Source of new product identifiers.
pub trait IdGenerator: Send + Sync {
    /// Returns a fresh, strictly positive identifier.
    fn next_id(&self) -> i64;
}

/// Generates random positive identifiers from the thread-local RNG.
#[derive(Debug, Clone, Copy, Default)]
pub struct RandomIdGenerator;

impl IdGenerator for RandomIdGenerator {
    fn next_id(&self) -> i64 {
        rand::rng().random_range(1..=i64::MAX)
    }
}
